//! Run serialization and analyst-facing reports.
//!
//! Reporting is a pure formatting layer over a [`RunResult`]: it never
//! modifies findings, and evidence is emitted verbatim. Orchestrator events
//! are always rendered in their own section.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{Finding, OrchestratorEvent, RunContext, RunResult};
use crate::timestamp::format_utc;

/// JSON-serializable mirror of a [`RunResult`].
///
/// Field order is fixed: `context`, `findings`, `events`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub context: RunContext,
    pub findings: Vec<Finding>,
    pub events: Vec<OrchestratorEvent>,
}

/// Convert a run into its JSON-serializable report structure.
pub fn serialize_run(run: &RunResult) -> RunReport {
    RunReport {
        context: RunContext::clone(&run.context),
        findings: run.findings.clone(),
        events: run.events.clone(),
    }
}

/// Write the run report as pretty JSON.
pub fn write_run_json(path: &Path, run: &RunResult) -> Result<()> {
    let content =
        serde_json::to_string_pretty(&serialize_run(run)).context("serialize run report")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Render a human-readable Markdown report.
///
/// Summary first (reachability, exposed services, per-category counts,
/// orchestrator events), then every finding verbatim in an appendix.
pub fn render_markdown_report(run: &RunResult) -> Result<String> {
    let ctx = &run.context;
    let mut out = String::new();

    out.push_str("# Discovery Report\n\n");
    out.push_str(&format!("**Target:** `{}`\n", ctx.target));
    out.push_str(&format!("**Source Host:** `{}`\n", ctx.source_host));
    out.push_str(&format!(
        "**Run Started:** {}\n",
        format_utc(&ctx.run_started_at)
    ));
    if let Some(run_id) = &ctx.run_id {
        out.push_str(&format!("**Run ID:** `{}`\n", run_id));
    }
    if !ctx.assumptions.is_empty() {
        out.push_str("\n**Assumptions:**\n");
        for assumption in &ctx.assumptions {
            out.push_str(&format!("- {}\n", assumption));
        }
    }
    out.push('\n');

    out.push_str("## Host Reachability\n");
    match run.findings.iter().find(|f| f.category() == "host_presence") {
        Some(finding) => {
            let reachable = finding
                .evidence()
                .get("reachable")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            let status = if reachable { "Reachable" } else { "Not Reachable" };
            out.push_str(&format!("- ICMP Echo: **{}**\n", status));
        }
        None => out.push_str("- Host reachability not assessed\n"),
    }
    out.push('\n');

    let open_ports: Vec<&Finding> = run
        .findings
        .iter()
        .filter(|f| f.category() == "open_port")
        .collect();

    out.push_str("## Exposed Services\n");
    if open_ports.is_empty() {
        out.push_str("- No externally reachable services observed\n");
    } else {
        out.push_str("| Port | Service | Confidence |\n");
        out.push_str("|------|---------|------------|\n");
        for finding in &open_ports {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                evidence_cell(finding, "port"),
                evidence_cell(finding, "service_hint"),
                finding.confidence()
            ));
        }
    }
    out.push('\n');

    out.push_str("## Findings by Category\n");
    let groups = run.findings_by_category();
    if groups.is_empty() {
        out.push_str("- No findings recorded\n");
    } else {
        for (category, findings) in &groups {
            out.push_str(&format!("- `{}`: {}\n", category, findings.len()));
        }
    }
    out.push('\n');

    out.push_str("## Orchestrator Events\n");
    if run.events.is_empty() {
        out.push_str("- None\n");
    } else {
        out.push_str("| Module | Event | Message |\n");
        out.push_str("|--------|-------|---------|\n");
        for event in &run.events {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                event.module(),
                event.event_type(),
                table_cell(event.message())
            ));
        }
    }
    out.push('\n');

    out.push_str("## Analyst Notes\n");
    if open_ports.is_empty() {
        out.push_str("- No network services were observed as externally reachable during this run.\n");
        out.push_str("- This may indicate a hardened firewall posture or disabled services.\n");
    } else {
        out.push_str("- One or more network services are externally reachable from this vantage point.\n");
        out.push_str("- Exposure is dependent on host firewall and network profile configuration.\n");
    }
    if !run.is_clean() {
        out.push_str("- Some modules did not complete normally; results may be partial.\n");
    }
    out.push('\n');

    out.push_str("## Appendix: Raw Findings\n");
    for finding in &run.findings {
        let body =
            serde_json::to_string_pretty(&finding.to_mapping()).context("serialize finding")?;
        out.push_str("```json\n");
        out.push_str(&body);
        out.push_str("\n```\n\n");
    }

    Ok(out)
}

/// Write the Markdown report.
pub fn write_markdown_report(path: &Path, run: &RunResult) -> Result<()> {
    let md = render_markdown_report(run)?;
    std::fs::write(path, md).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Keep free text inside a single Markdown table cell.
fn table_cell(text: &str) -> String {
    text.trim_end()
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

fn evidence_cell(finding: &Finding, key: &str) -> String {
    match finding.evidence().get(key) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}
