//! Centralised tracing initialisation for recon binaries.
//!
//! Filter precedence: `RECON_LOG`, then `RUST_LOG`, then [`default_directives`]
//! for the requested level. Logs always go to stderr so report output on
//! stdout stays machine-readable.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding recon-specific filter directives.
pub const LOG_ENV: &str = "RECON_LOG";

/// Crates whose events are shown at the requested level.
const RECON_TARGETS: [&str; 3] = ["recon_core", "recon_probes", "recon_cli"];

/// Default directives: recon crates at `level`, everything else at `warn`.
pub fn default_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(RECON_TARGETS.iter().map(|t| format!("{t}={level}")));
    directives.join(",")
}

fn build_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Initialise the global tracing subscriber.
///
/// Targets are kept only in verbose (`DEBUG` and finer) output, where the
/// emitting crate matters. Later calls are ignored.
pub fn init_tracing(json: bool, level: Level) {
    let show_target = level >= Level::DEBUG;
    let layer = fmt::layer()
        .with_target(show_target)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(build_filter(level));
    let installed = if json {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer).try_init()
    };
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_scope_recon_crates() {
        assert_eq!(
            default_directives(Level::DEBUG),
            "warn,recon_core=debug,recon_probes=debug,recon_cli=debug"
        );
        assert!(default_directives(Level::INFO).ends_with("recon_cli=info"));
    }

    #[test]
    fn test_default_directives_parse() {
        for level in [Level::TRACE, Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR] {
            assert!(EnvFilter::try_new(default_directives(level)).is_ok());
        }
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing(false, Level::INFO);
        init_tracing(true, Level::DEBUG);
    }
}
