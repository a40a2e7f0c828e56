//! Shared-secret gate for command mutation.
//!
//! With no secret configured the gate admits every request. That is a
//! deployment decision: set `API_TOKEN` to arm it. `main` logs a warning at
//! startup whenever the gate is inert.

/// Header the operator client presents the secret in.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Gate in front of Set Command.
#[derive(Clone, Default)]
pub struct AccessGate {
    secret: Option<String>,
}

impl AccessGate {
    /// Builds a gate; an empty secret is the same as none.
    #[must_use]
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// A gate that admits everything.
    #[must_use]
    pub const fn open() -> Self {
        Self { secret: None }
    }

    /// True when a secret is configured.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.secret.is_some()
    }

    /// Checks a presented token against the configured secret.
    ///
    /// Comparison is exact and case-sensitive, and takes the same time
    /// for any presented token of the secret's length.
    #[must_use]
    pub fn authorize(&self, presented: Option<&str>) -> bool {
        let Some(secret) = &self.secret else {
            return true;
        };
        presented.is_some_and(|token| constant_time_eq(secret.as_bytes(), token.as_bytes()))
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("armed", &self.is_armed())
            .finish()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_gate_admits_everything() {
        let gate = AccessGate::open();
        assert!(!gate.is_armed());
        assert!(gate.authorize(None));
        assert!(gate.authorize(Some("")));
        assert!(gate.authorize(Some("anything")));
    }

    #[test]
    fn test_empty_secret_is_inert() {
        let gate = AccessGate::new(Some(String::new()));
        assert!(!gate.is_armed());
        assert!(gate.authorize(None));
    }

    #[test]
    fn test_armed_gate_requires_exact_match() {
        let gate = AccessGate::new(Some("s3cret".to_string()));
        assert!(gate.is_armed());
        assert!(gate.authorize(Some("s3cret")));
        assert!(!gate.authorize(None));
        assert!(!gate.authorize(Some("")));
        assert!(!gate.authorize(Some("S3CRET")));
        assert!(!gate.authorize(Some("s3cret ")));
        assert!(!gate.authorize(Some("s3cre")));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let gate = AccessGate::new(Some("s3cret".to_string()));
        let rendered = format!("{gate:?}");
        assert!(!rendered.contains("s3cret"));
    }
}
