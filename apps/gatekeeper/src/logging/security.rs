use tracing::warn;

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// A login or password check did not succeed.
pub fn login_failed(reason: &str, email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %Redacted(email),
        reason,
        "Authentication failure"
    );
}

/// The authorization gate turned a request away.
pub fn access_denied(path: &str, reason: &str, subject: Option<&str>) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_ACCESS_DENIED",
        %trace_id,
        path,
        reason,
        subject = %Redacted(subject.unwrap_or("")),
        "Request rerouted by authorization gate"
    );
}
