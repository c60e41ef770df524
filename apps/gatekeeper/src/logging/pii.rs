use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Compact JWS: three base64url segments separated by dots.
static JWT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\b").unwrap()
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
});

/// bcrypt modular-crypt strings ($2a$, $2b$, $2y$).
static BCRYPT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\$2[aby]?\$\d{2}\$[./A-Za-z0-9]{53}").unwrap()
});

/// Masks bearer tokens, password hashes and email local parts.
///
/// Tokens go first: a JWT's dotted segments must not be half-eaten by the
/// email pattern.
pub fn redact(input: &str) -> String {
    let without_tokens = JWT_PATTERN.replace_all(input, "[REDACTED_TOKEN]");
    let without_hashes = BCRYPT_PATTERN.replace_all(&without_tokens, "[REDACTED_HASH]");

    EMAIL_PATTERN
        .replace_all(&without_hashes, |caps: &Captures| {
            let full = &caps[0];
            match full.split_once('@') {
                Some((local, domain)) => match local.chars().next() {
                    Some(first) => format!("{first}***@{domain}"),
                    None => format!("@{domain}"),
                },
                None => full.to_string(),
            }
        })
        .into_owned()
}

/// Display wrapper that redacts on formatting, for use in `tracing` fields.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
