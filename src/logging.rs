use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Pick the filter directive: `RUST_LOG` wins, then `--verbose`, then the
/// configured default.
pub fn filter_directive(rust_log: Option<String>, verbose: bool, configured: &str) -> String {
    match rust_log.filter(|s| !s.trim().is_empty()) {
        Some(directive) => directive,
        None if verbose => "microtask=debug".to_string(),
        None => configured.to_string(),
    }
}

/// Install the global subscriber. Logs go to stderr so `--json` output on
/// stdout stays parseable. Calling this twice is harmless.
pub fn init(verbose: bool, configured: &str) {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), verbose, configured);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("microtask=warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_takes_precedence() {
        assert_eq!(
            filter_directive(Some("microtask=trace".into()), true, "microtask=warn"),
            "microtask=trace"
        );
    }

    #[test]
    fn test_verbose_then_configured() {
        assert_eq!(filter_directive(None, true, "microtask=warn"), "microtask=debug");
        assert_eq!(filter_directive(Some(" ".into()), false, "microtask=info"), "microtask=info");
    }
}
