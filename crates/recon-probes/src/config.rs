//! Probe timeouts and port tables.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timeouts and switches shared by the probe modules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// Upper bound for a single TCP connect attempt, in milliseconds.
    #[serde(default = "default_tcp_timeout_ms")]
    pub tcp_timeout_ms: u64,

    /// Seconds `ping` waits for an echo reply.
    #[serde(default = "default_ping_timeout_secs")]
    pub ping_timeout_secs: u64,

    /// Whether the network domain runs the ICMP reachability check.
    #[serde(default = "default_true")]
    pub ping_enabled: bool,
}

fn default_tcp_timeout_ms() -> u64 {
    1000
}

fn default_ping_timeout_secs() -> u64 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            tcp_timeout_ms: default_tcp_timeout_ms(),
            ping_timeout_secs: default_ping_timeout_secs(),
            ping_enabled: true,
        }
    }
}

impl ProbeConfig {
    pub fn tcp_timeout(&self) -> Duration {
        Duration::from_millis(self.tcp_timeout_ms)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.ping_timeout_secs)
    }

    /// TCP timeout in fractional seconds, as recorded in evidence.
    pub fn tcp_timeout_secs_f64(&self) -> f64 {
        self.tcp_timeout_ms as f64 / 1000.0
    }
}

/// Enterprise-relevant port -> service hint mapping for the network domain.
pub fn default_port_map() -> BTreeMap<u16, String> {
    [
        (21, "FTP"),
        (22, "SSH"),
        (53, "DNS"),
        (80, "HTTP"),
        (88, "Kerberos"),
        (135, "RPC"),
        (139, "SMB"),
        (389, "LDAP"),
        (443, "HTTPS"),
        (445, "SMB"),
        (3389, "RDP"),
        (5985, "WinRM"),
        (5986, "WinRM-HTTPS"),
    ]
    .into_iter()
    .map(|(port, service)| (port, service.to_string()))
    .collect()
}

/// Identity-bearing services: port, service name, protocol family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityService {
    pub port: u16,
    pub service: String,
    pub family: String,
}

impl IdentityService {
    pub fn new(port: u16, service: &str, family: &str) -> Self {
        Self {
            port,
            service: service.to_string(),
            family: family.to_string(),
        }
    }
}

/// Default identity-service table for the identity domain, ascending by port.
pub fn default_identity_services() -> Vec<IdentityService> {
    vec![
        IdentityService::new(88, "Kerberos", "kerberos"),
        IdentityService::new(389, "LDAP", "directory"),
        IdentityService::new(445, "SMB", "file_sharing"),
        IdentityService::new(636, "LDAPS", "directory"),
        IdentityService::new(5985, "WinRM", "remote_management"),
        IdentityService::new(5986, "WinRM-HTTPS", "remote_management"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ProbeConfig::default();
        assert_eq!(cfg.tcp_timeout(), Duration::from_secs(1));
        assert_eq!(cfg.ping_timeout(), Duration::from_secs(1));
        assert!(cfg.ping_enabled);
        assert_eq!(cfg.tcp_timeout_secs_f64(), 1.0);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: ProbeConfig = serde_json::from_str(r#"{"tcp_timeout_ms": 250}"#).expect("parse");
        assert_eq!(cfg.tcp_timeout_ms, 250);
        assert_eq!(cfg.ping_timeout_secs, 1);
        assert!(cfg.ping_enabled);
    }

    #[test]
    fn test_default_port_map_contents() {
        let ports = default_port_map();
        assert_eq!(ports.len(), 13);
        assert_eq!(ports.get(&3389).map(String::as_str), Some("RDP"));
        assert_eq!(ports.keys().next(), Some(&21));
    }

    #[test]
    fn test_identity_services_sorted() {
        let services = default_identity_services();
        assert!(services.windows(2).all(|w| w[0].port < w[1].port));
        assert!(services.iter().any(|s| s.service == "LDAPS" && s.port == 636));
    }
}
