//! Network discovery domain.
//!
//! Safe, agentless visibility from a low-privilege vantage point:
//! - Host reachability (ICMP echo via system `ping`)
//! - TCP connect discovery across a predefined port set
//! - Heuristic service mapping by port number
//!
//! No exploitation, raw packet crafting or authentication attempts.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use recon_core::{DiscoveryModule, Evidence, Finding, ModuleOutput, ModuleResult, RunContext};
use serde_json::json;
use tracing::debug;

use crate::config::{default_port_map, ProbeConfig};
use crate::ping::{icmp_echo, PingOutcome};
use crate::tcp::{tcp_connect_probe, PortState};

pub const NETWORK_DOMAIN: &str = "network";

const CONFIDENCE_REACHABLE: f64 = 0.9;
const CONFIDENCE_UNREACHABLE: f64 = 0.6;
const CONFIDENCE_PING_UNAVAILABLE: f64 = 0.4;
const CONFIDENCE_OPEN_PORT: f64 = 0.85;
const CONFIDENCE_PROBE_ERROR: f64 = 0.5;

/// Reachability and open-port discovery against the run target.
#[derive(Debug)]
pub struct NetworkDiscoveryModule {
    context: Arc<RunContext>,
    config: ProbeConfig,
    port_map: BTreeMap<u16, String>,
}

impl NetworkDiscoveryModule {
    pub fn new(context: Arc<RunContext>, config: ProbeConfig) -> Self {
        Self {
            context,
            config,
            port_map: default_port_map(),
        }
    }

    /// Replace the probed port set.
    pub fn with_port_map(mut self, port_map: BTreeMap<u16, String>) -> Self {
        self.port_map = port_map;
        self
    }

    pub fn port_map(&self) -> &BTreeMap<u16, String> {
        &self.port_map
    }

    async fn discover_host_presence(&self) -> ModuleResult<Finding> {
        let target = &self.context.target;
        let mut evidence = Evidence::new();
        evidence.insert("method".to_string(), json!("icmp_echo_ping"));

        let confidence = match icmp_echo(target, self.config.ping_timeout()).await {
            PingOutcome::Completed { reachable } => {
                evidence.insert("reachable".to_string(), json!(reachable));
                evidence.insert(
                    "timeout_s".to_string(),
                    json!(self.config.ping_timeout_secs),
                );
                if reachable {
                    CONFIDENCE_REACHABLE
                } else {
                    CONFIDENCE_UNREACHABLE
                }
            }
            PingOutcome::Unavailable { error } => {
                evidence.insert("reachable".to_string(), json!(false));
                evidence.insert("error".to_string(), json!(error));
                CONFIDENCE_PING_UNAVAILABLE
            }
        };

        Ok(Finding::new(
            NETWORK_DOMAIN,
            "host_presence",
            target.as_str(),
            evidence,
            confidence,
        )?)
    }

    async fn discover_open_ports(&self) -> ModuleResult<Vec<Finding>> {
        let target = &self.context.target;
        let timeout = self.config.tcp_timeout();
        let mut findings = Vec::new();

        for (&port, service) in &self.port_map {
            let state = tcp_connect_probe(target, port, timeout).await;

            let (category, confidence, error) = match state {
                PortState::Open => ("open_port", CONFIDENCE_OPEN_PORT, None),
                PortState::Error(error) => ("port_probe_error", CONFIDENCE_PROBE_ERROR, Some(error)),
                PortState::Closed | PortState::TimedOut => continue,
            };

            let mut evidence = Evidence::new();
            evidence.insert("method".to_string(), json!("tcp_connect"));
            evidence.insert("port".to_string(), json!(port));
            evidence.insert("service_hint".to_string(), json!(service));
            evidence.insert(
                "timeout_s".to_string(),
                json!(self.config.tcp_timeout_secs_f64()),
            );
            if let Some(error) = error {
                evidence.insert("error".to_string(), json!(error));
            }

            findings.push(Finding::new(
                NETWORK_DOMAIN,
                category,
                format!("{target}:{port}"),
                evidence,
                confidence,
            )?);
        }

        debug!(target = %target, probed = self.port_map.len(), reported = findings.len(), "port sweep done");
        Ok(findings)
    }
}

#[async_trait]
impl DiscoveryModule for NetworkDiscoveryModule {
    fn name(&self) -> &str {
        NETWORK_DOMAIN
    }

    fn context(&self) -> &Arc<RunContext> {
        &self.context
    }

    async fn execute(&self) -> ModuleResult<ModuleOutput> {
        let mut findings = Vec::with_capacity(self.port_map.len() + 1);
        if self.config.ping_enabled {
            findings.push(self.discover_host_presence().await?);
        }
        findings.extend(self.discover_open_ports().await?);
        Ok(findings.into())
    }
}
