//! TCP-connect port probing.
//!
//! Uses the OS connect path only (no raw sockets), bounded by a timeout.

use std::time::Duration;

use tokio::net::TcpStream;
use tracing::trace;

/// Observed state of a single port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortState {
    /// The connection was accepted.
    Open,

    /// The host actively refused the connection.
    Closed,

    /// No answer before the timeout elapsed.
    TimedOut,

    /// Any other connect failure, by error kind.
    Error(String),
}

impl PortState {
    pub fn is_open(&self) -> bool {
        matches!(self, PortState::Open)
    }
}

/// Attempt a TCP connection to `host:port` within `timeout`.
pub async fn tcp_connect_probe(host: &str, port: u16, timeout: Duration) -> PortState {
    let state = match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(_stream)) => PortState::Open,
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::ConnectionRefused => PortState::Closed,
        Ok(Err(e)) => PortState::Error(format!("{:?}", e.kind())),
        Err(_) => PortState::TimedOut,
    };
    trace!(host = %host, port = port, state = ?state, "tcp connect probe");
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_open_port_detected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("addr").port();

        let state = tcp_connect_probe("127.0.0.1", port, Duration::from_secs(1)).await;
        assert!(state.is_open());
    }

    #[tokio::test]
    async fn test_closed_port_detected() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
            listener.local_addr().expect("addr").port()
        };

        let state = tcp_connect_probe("127.0.0.1", port, Duration::from_secs(1)).await;
        assert_eq!(state, PortState::Closed);
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_an_error() {
        let state = tcp_connect_probe("host.invalid", 80, Duration::from_secs(2)).await;
        assert!(matches!(state, PortState::Error(_) | PortState::TimedOut));
    }
}
