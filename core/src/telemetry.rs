// Logging setup for binaries and tests embedding saykit
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install a global fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns `false` if a subscriber was already installed; that is not an
/// error, so tests can call this freely.
pub fn init_tracing() -> bool {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        info!(target: "telemetry", "Tracing initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing();
        assert!(!init_tracing());
    }
}
