//! Recon Probes - concrete discovery domains
//!
//! Provides modules that satisfy the [`recon_core::DiscoveryModule`] contract:
//! - `NetworkDiscoveryModule`: ICMP reachability and TCP-connect port discovery
//! - `IdentityDiscoveryModule`: exposed identity-service detection
//!
//! Every blocking operation is bounded by a timeout taken from [`ProbeConfig`].

pub mod config;
pub mod identity;
pub mod network;
pub mod ping;
pub mod tcp;

// Re-export key types
pub use config::{default_identity_services, default_port_map, IdentityService, ProbeConfig};
pub use identity::{IdentityDiscoveryModule, IDENTITY_DOMAIN};
pub use network::{NetworkDiscoveryModule, NETWORK_DOMAIN};
pub use ping::{icmp_echo, PingOutcome};
pub use tcp::{tcp_connect_probe, PortState};
