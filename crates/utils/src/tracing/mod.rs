use scopekit_core::{CleanupFailure, FailurePolicy, DEFAULT_LOG_FILTER};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// Honours `RUST_LOG`, falling back to `info`. Output goes to stderr without
/// ANSI colours so it stays readable when captured.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact()
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Install a subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Span covering one cleanup pass
pub fn cleanup_pass_span(pending: usize, policy: FailurePolicy) -> Span {
    span!(Level::DEBUG, "cleanup_pass", pending = %pending, policy = %policy)
}

/// Emit a trace event before a callback runs
pub fn callback_started(index: usize, label: Option<&str>) {
    trace!(index = %index, label = label.unwrap_or(""), "cleanup_callback");
}

/// Emit a warning for a failed callback
pub fn callback_failed(failure: &CleanupFailure) {
    warn!(
        index = %failure.index,
        panicked = failure.is_panic(),
        "Cleanup callback failed: {failure}"
    );
}

/// Emit a summary event once a pass finishes
pub fn pass_completed(attempted: usize, failed: usize, skipped: usize) {
    if failed == 0 {
        debug!(attempted = %attempted, "cleanup_pass_completed");
    } else {
        warn!(
            attempted = %attempted,
            failed = %failed,
            skipped = %skipped,
            "cleanup_pass_failed"
        );
    }
}
