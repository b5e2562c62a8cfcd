//! Identity discovery domain.
//!
//! Agentless detection of exposed identity-bearing services (Kerberos, LDAP,
//! SMB, WinRM) by TCP connect only. No binds, no authentication, no protocol
//! negotiation. Findings are emitted as plain mappings and normalized by the
//! orchestrator.

use std::sync::Arc;

use async_trait::async_trait;
use recon_core::{format_utc, utc_now, DiscoveryModule, ModuleOutput, ModuleResult, RunContext};
use serde_json::{json, Value};

use crate::config::{default_identity_services, IdentityService, ProbeConfig};
use crate::tcp::{tcp_connect_probe, PortState};

pub const IDENTITY_DOMAIN: &str = "identity";

const CONFIDENCE_EXPOSED: f64 = 0.7;

/// Probes the run target for reachable identity services.
#[derive(Debug)]
pub struct IdentityDiscoveryModule {
    context: Arc<RunContext>,
    config: ProbeConfig,
    services: Vec<IdentityService>,
}

impl IdentityDiscoveryModule {
    pub fn new(context: Arc<RunContext>, config: ProbeConfig) -> Self {
        Self {
            context,
            config,
            services: default_identity_services(),
        }
    }

    /// Replace the probed service table.
    pub fn with_services(mut self, services: Vec<IdentityService>) -> Self {
        self.services = services;
        self
    }

    pub fn services(&self) -> &[IdentityService] {
        &self.services
    }

    fn make_finding(&self, category: &str, target: String, evidence: Value) -> Value {
        json!({
            "domain": IDENTITY_DOMAIN,
            "category": category,
            "target": target,
            "evidence": evidence,
            "confidence": CONFIDENCE_EXPOSED,
            "observed_at": format_utc(&utc_now()),
        })
    }
}

#[async_trait]
impl DiscoveryModule for IdentityDiscoveryModule {
    fn name(&self) -> &str {
        IDENTITY_DOMAIN
    }

    fn context(&self) -> &Arc<RunContext> {
        &self.context
    }

    async fn execute(&self) -> ModuleResult<ModuleOutput> {
        let target = &self.context.target;
        let timeout = self.config.tcp_timeout();
        let mut findings = Vec::new();

        for svc in &self.services {
            if tcp_connect_probe(target, svc.port, timeout).await != PortState::Open {
                continue;
            }

            findings.push(self.make_finding(
                "identity_service_exposed",
                format!("{target}:{}", svc.port),
                json!({
                    "method": "tcp_connect",
                    "port": svc.port,
                    "service": svc.service,
                    "protocol_family": svc.family,
                    "timeout_s": self.config.tcp_timeout_secs_f64(),
                }),
            ));
        }

        Ok(findings.into())
    }
}
