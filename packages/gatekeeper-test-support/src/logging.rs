//! One-time tracing setup shared by every gatekeeper test binary.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Install a test-friendly tracing subscriber.
///
/// Safe to call from any number of tests; only the first call installs.
/// Filter precedence is `TEST_LOG`, then `RUST_LOG`, then `warn`.
/// Set `TEST_LOG_FORMAT=json` to get the same JSON lines the service emits.
pub fn init() {
    INSTALLED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let json = std::env::var("TEST_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let builder = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time();

        // try_init: another harness may already own the global subscriber
        if json {
            builder.json().try_init().ok();
        } else {
            builder.try_init().ok();
        }
    });
}
