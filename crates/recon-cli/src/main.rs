//! Recon - discovery harness CLI
//!
//! The `recon` command runs the discovery domains against one target and
//! reports the aggregated findings.
//!
//! ## Commands
//!
//! - `scan`: Run network and identity discovery against a target
//! - `ports`: Show the port tables probed by each domain

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use recon_core::{
    render_markdown_report, serialize_run, write_markdown_report, write_run_json,
    DiscoveryModule, MismatchPolicy, Orchestrator, OrchestratorConfig, RunContext, RunResult,
};
use recon_probes::{
    default_identity_services, default_port_map, IdentityDiscoveryModule,
    NetworkDiscoveryModule, ProbeConfig,
};
use tracing::{info, Level};

const DEFAULT_ASSUMPTIONS: [&str; 3] = [
    "No credentials",
    "Agentless execution",
    "Non-exploitative discovery",
];

#[derive(Parser)]
#[command(name = "recon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Agentless discovery harness", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run discovery against a target
    Scan {
        /// Host or IP to assess
        target: String,

        /// Run identifier (generated if omitted)
        #[arg(long)]
        run_id: Option<String>,

        /// Scope or safety assumption (repeatable)
        #[arg(short, long = "assumption")]
        assumptions: Vec<String>,

        /// TCP connect timeout in milliseconds
        #[arg(long, env = "RECON_TCP_TIMEOUT_MS", default_value = "1000")]
        tcp_timeout_ms: u64,

        /// ICMP echo timeout in seconds
        #[arg(long, env = "RECON_PING_TIMEOUT_SECS", default_value = "1")]
        ping_timeout_secs: u64,

        /// Skip the ICMP reachability check
        #[arg(long)]
        no_ping: bool,

        /// Skip the identity domain
        #[arg(long)]
        skip_identity: bool,

        /// Do not execute modules bound to a foreign run context
        #[arg(long)]
        skip_mismatched: bool,

        /// What to print to stdout
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,

        /// Write the JSON run report to this path
        #[arg(long)]
        json_out: Option<PathBuf>,

        /// Write the Markdown report to this path
        #[arg(long)]
        markdown_out: Option<PathBuf>,
    },

    /// Show the port tables probed by each domain
    Ports,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
    Markdown,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    recon_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Scan {
            target,
            run_id,
            assumptions,
            tcp_timeout_ms,
            ping_timeout_secs,
            no_ping,
            skip_identity,
            skip_mismatched,
            output,
            json_out,
            markdown_out,
        } => {
            let probe = ProbeConfig {
                tcp_timeout_ms,
                ping_timeout_secs,
                ping_enabled: !no_ping,
            };
            let orchestrator_config = OrchestratorConfig {
                mismatch_policy: if skip_mismatched {
                    MismatchPolicy::Skip
                } else {
                    MismatchPolicy::Execute
                },
            };
            cmd_scan(
                &target,
                run_id,
                assumptions,
                probe,
                skip_identity,
                orchestrator_config,
                output,
                json_out.as_deref(),
                markdown_out.as_deref(),
            )
            .await
        }
        Commands::Ports => cmd_ports(),
    }
}

#[allow(clippy::too_many_arguments)]
async fn cmd_scan(
    target: &str,
    run_id: Option<String>,
    assumptions: Vec<String>,
    probe: ProbeConfig,
    skip_identity: bool,
    orchestrator_config: OrchestratorConfig,
    output: OutputFormat,
    json_out: Option<&Path>,
    markdown_out: Option<&Path>,
) -> Result<()> {
    let assumptions = if assumptions.is_empty() {
        DEFAULT_ASSUMPTIONS.iter().map(|a| a.to_string()).collect()
    } else {
        assumptions
    };
    let run_id = run_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let context = RunContext::new(target, source_host(), assumptions)
        .context("Invalid run context")?
        .with_run_id(run_id)
        .shared();

    let modules = build_modules(&context, &probe, skip_identity);
    let orchestrator = Orchestrator::with_config(modules, orchestrator_config);
    info!(modules = ?orchestrator.module_names(), "Starting discovery run");

    let result = orchestrator.run(&context).await;

    if let Some(path) = json_out {
        write_run_json(path, &result)?;
        info!(path = %path.display(), "Wrote JSON report");
    }
    if let Some(path) = markdown_out {
        write_markdown_report(path, &result)?;
        info!(path = %path.display(), "Wrote Markdown report");
    }

    match output {
        OutputFormat::Summary => print!("{}", render_summary(&result)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serialize_run(&result))
                .context("serialize run report")?
        ),
        OutputFormat::Markdown => print!("{}", render_markdown_report(&result)?),
    }

    Ok(())
}

fn cmd_ports() -> Result<()> {
    println!("network:");
    for (port, service) in default_port_map() {
        println!("  {:>5}  {}", port, service);
    }
    println!("identity:");
    for svc in default_identity_services() {
        println!("  {:>5}  {} ({})", svc.port, svc.service, svc.family);
    }
    Ok(())
}

fn build_modules(
    context: &Arc<RunContext>,
    probe: &ProbeConfig,
    skip_identity: bool,
) -> Vec<Box<dyn DiscoveryModule>> {
    let mut modules: Vec<Box<dyn DiscoveryModule>> = vec![Box::new(
        NetworkDiscoveryModule::new(Arc::clone(context), probe.clone()),
    )];
    if !skip_identity {
        modules.push(Box::new(IdentityDiscoveryModule::new(
            Arc::clone(context),
            probe.clone(),
        )));
    }
    modules
}

/// Name of the machine running the scan.
///
/// The OS hostname wins; `HOSTNAME`/`COMPUTERNAME` only cover platforms where
/// the lookup fails.
fn source_host() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.trim().is_empty())
        .or_else(|| {
            ["HOSTNAME", "COMPUTERNAME"]
                .iter()
                .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn render_summary(result: &RunResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Target: {}\n", result.context.target));
    if let Some(run_id) = &result.context.run_id {
        out.push_str(&format!("Run:    {}\n", run_id));
    }
    out.push_str(&format!("Findings: {}\n", result.findings.len()));
    for (category, findings) in result.findings_by_category() {
        out.push_str(&format!("  {}: {}\n", category, findings.len()));
        for finding in findings {
            out.push_str(&format!(
                "    - {} (confidence {:.2})\n",
                finding.target(),
                finding.confidence()
            ));
        }
    }
    out.push_str(&format!("Events: {}\n", result.events.len()));
    for event in &result.events {
        out.push_str(&format!(
            "  [{}] {}: {}\n",
            event.event_type(),
            event.module(),
            event.message()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Arc<RunContext> {
        RunContext::new("127.0.0.1", "test-host", vec![])
            .expect("context")
            .shared()
    }

    #[test]
    fn test_cli_parses_scan() {
        let cli = Cli::try_parse_from([
            "recon",
            "scan",
            "10.0.0.5",
            "-a",
            "No credentials",
            "--tcp-timeout-ms",
            "250",
            "--skip-identity",
            "--output",
            "json",
        ])
        .expect("parse");

        match cli.command {
            Commands::Scan {
                target,
                assumptions,
                tcp_timeout_ms,
                skip_identity,
                output,
                ..
            } => {
                assert_eq!(target, "10.0.0.5");
                assert_eq!(assumptions, vec!["No credentials".to_string()]);
                assert_eq!(tcp_timeout_ms, 250);
                assert!(skip_identity);
                assert!(matches!(output, OutputFormat::Json));
            }
            Commands::Ports => panic!("expected scan"),
        }
    }

    #[test]
    fn test_build_modules_shares_context() {
        let ctx = context();
        let modules = build_modules(&ctx, &ProbeConfig::default(), false);
        let names: Vec<&str> = modules.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["network", "identity"]);
        assert!(modules.iter().all(|m| Arc::ptr_eq(m.context(), &ctx)));

        let modules = build_modules(&ctx, &ProbeConfig::default(), true);
        assert_eq!(modules.len(), 1);
    }

    #[tokio::test]
    async fn test_summary_for_empty_run() {
        let ctx = context();
        let result = Orchestrator::new(vec![]).run(&ctx).await;
        let summary = render_summary(&result);
        assert!(summary.contains("Target: 127.0.0.1"));
        assert!(summary.contains("Findings: 0"));
        assert!(summary.contains("Events: 0"));
    }

    #[test]
    fn test_source_host_without_environment() {
        std::env::remove_var("HOSTNAME");
        std::env::remove_var("COMPUTERNAME");

        let host = source_host();
        assert_ne!(host, "unknown");
        let os_name = hostname::get().expect("hostname").to_string_lossy().to_string();
        assert_eq!(host, os_name);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
