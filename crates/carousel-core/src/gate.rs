use secrecy::{ExposeSecret, SecretString};

/// Process-wide shared secret and the equality check against it.
///
/// The secret is loaded once at startup and never changes. `check` is pure:
/// it neither logs nor counts failures, callers decide how to report a
/// rejected token.
#[derive(Clone)]
pub struct SecretGate {
    secret: SecretString,
}

impl SecretGate {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// True iff `candidate` equals the secret byte for byte.
    pub fn check(&self, candidate: &str) -> bool {
        self.secret.expose_secret().as_bytes() == candidate.as_bytes()
    }

    /// Same as [`check`](Self::check), treating an absent token as a mismatch.
    pub fn check_opt(&self, candidate: Option<&str>) -> bool {
        candidate.is_some_and(|c| self.check(c))
    }

    /// The raw secret, for delivery over the push channel.
    pub fn reveal(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl std::fmt::Debug for SecretGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretGate([REDACTED])")
    }
}
