//! Diagnostic output for the host process.

#[cfg(feature = "napi")]
use napi_derive::napi;
use tracing_subscriber::EnvFilter;

const VERBOSE_DIRECTIVE: &str = "visual_editor_native=debug";
const QUIET_DIRECTIVE: &str = "visual_editor_native=warn";

/// Install a stderr fmt subscriber. `RUST_LOG` overrides the default directive.
/// Safe to call more than once; returns `false` when a global subscriber already exists.
pub fn init_tracing(verbose: bool) -> bool {
    let directive = if verbose {
        VERBOSE_DIRECTIVE
    } else {
        QUIET_DIRECTIVE
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(feature = "napi")]
#[napi(js_name = "initLogging")]
pub fn init_logging_native(verbose: bool) {
    init_tracing(verbose);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        // Another test may have installed the global subscriber first
        init_tracing(true);
        assert!(tracing::dispatcher::has_been_set());
        assert!(!init_tracing(false));
    }
}
