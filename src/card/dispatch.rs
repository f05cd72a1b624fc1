//! Credential submission and verification.
//!
//! A credential is the same thing whether it was typed or decoded from
//! a QR code. Empty credentials are rejected before verification is
//! ever asked; everything else goes to the [`Verifier`].

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A password, typed or decoded.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps credential text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the credential text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for an empty credential.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Credential {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

/// Result of asking the verification backend about a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The credential unlocks the session.
    Accepted,
    /// The credential was refused.
    Rejected,
}

/// The credential verification capability.
pub trait Verifier {
    /// Checks a non-empty credential.
    fn verify(&mut self, credential: &Credential) -> Verdict;
}

impl<V: Verifier + ?Sized> Verifier for Box<V> {
    fn verify(&mut self, credential: &Credential) -> Verdict {
        (**self).verify(credential)
    }
}

/// One verification attempt seen by [`StubVerifier`].
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    /// When the attempt was made.
    pub at: DateTime<Utc>,
    /// Length of the credential in bytes. The text itself is not kept.
    pub length: usize,
    /// What the stub answered.
    pub verdict: Verdict,
}

/// Stand-in verification backend.
///
/// Records every attempt and answers with a fixed verdict
/// (accept, unless built with [`StubVerifier::with_verdict`]).
#[derive(Debug, Clone)]
pub struct StubVerifier {
    verdict: Verdict,
    attempts: Vec<AttemptRecord>,
}

impl StubVerifier {
    /// A stub that accepts every credential.
    pub fn new() -> Self {
        Self::with_verdict(Verdict::Accepted)
    }

    /// A stub that always answers `verdict`.
    pub fn with_verdict(verdict: Verdict) -> Self {
        Self {
            verdict,
            attempts: Vec::new(),
        }
    }

    /// Changes the verdict for subsequent attempts.
    pub fn set_verdict(&mut self, verdict: Verdict) {
        self.verdict = verdict;
    }

    /// Every attempt so far, oldest first.
    pub fn attempts(&self) -> &[AttemptRecord] {
        &self.attempts
    }
}

impl Default for StubVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Verifier for StubVerifier {
    fn verify(&mut self, credential: &Credential) -> Verdict {
        let record = AttemptRecord {
            at: Utc::now(),
            length: credential.len(),
            verdict: self.verdict,
        };
        tracing::info!(
            length = record.length,
            verdict = ?record.verdict,
            at = %record.at.to_rfc3339(),
            "Authentication attempt recorded"
        );
        self.attempts.push(record);
        self.verdict
    }
}

/// What a submission led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Nothing to verify; feedback only.
    Empty,
    /// The session is authenticated.
    Accepted,
    /// Feedback shown, session stays open.
    Rejected,
    /// The session was already closed; the submission was dropped.
    Ignored,
}

/// Validates submissions and routes them to the verifier.
#[derive(Debug)]
pub struct Dispatcher<V> {
    verifier: V,
    closed: bool,
}

impl<V: Verifier> Dispatcher<V> {
    /// Creates an open dispatcher over `verifier`.
    pub fn new(verifier: V) -> Self {
        Self {
            verifier,
            closed: false,
        }
    }

    /// Submits a credential.
    ///
    /// Verification is synchronous. Once a credential is accepted the
    /// dispatcher is closed and later submissions are ignored.
    pub fn submit(&mut self, credential: &Credential) -> DispatchOutcome {
        if self.closed {
            return DispatchOutcome::Ignored;
        }
        if credential.is_empty() {
            tracing::debug!("Empty credential submitted");
            return DispatchOutcome::Empty;
        }

        match self.verifier.verify(credential) {
            Verdict::Accepted => {
                self.closed = true;
                tracing::info!("Credential accepted");
                DispatchOutcome::Accepted
            }
            Verdict::Rejected => {
                tracing::info!("Credential rejected");
                DispatchOutcome::Rejected
            }
        }
    }

    /// Returns true once a credential has been accepted.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the verifier.
    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Returns the verifier mutably.
    pub fn verifier_mut(&mut self) -> &mut V {
        &mut self.verifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_never_reaches_verifier() {
        let mut dispatcher = Dispatcher::new(StubVerifier::new());
        assert_eq!(
            dispatcher.submit(&Credential::new("")),
            DispatchOutcome::Empty
        );
        assert!(dispatcher.verifier().attempts().is_empty());
        assert!(!dispatcher.is_closed());
    }

    #[test]
    fn test_accept_closes() {
        let mut dispatcher = Dispatcher::new(StubVerifier::new());
        assert_eq!(
            dispatcher.submit(&Credential::new("pw")),
            DispatchOutcome::Accepted
        );
        assert!(dispatcher.is_closed());
        assert_eq!(
            dispatcher.submit(&Credential::new("again")),
            DispatchOutcome::Ignored
        );
        assert_eq!(dispatcher.verifier().attempts().len(), 1);
    }

    #[test]
    fn test_reject_keeps_open() {
        let mut dispatcher = Dispatcher::new(StubVerifier::with_verdict(Verdict::Rejected));
        assert_eq!(
            dispatcher.submit(&Credential::new("wrong")),
            DispatchOutcome::Rejected
        );
        assert!(!dispatcher.is_closed());

        dispatcher.verifier_mut().set_verdict(Verdict::Accepted);
        assert_eq!(
            dispatcher.submit(&Credential::new("right")),
            DispatchOutcome::Accepted
        );

        let attempts = dispatcher.verifier().attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].length, 5);
        assert_eq!(attempts[0].verdict, Verdict::Rejected);
    }

    #[test]
    fn test_credential_debug_redacted() {
        let printed = format!("{:?}", Credential::new("secret123"));
        assert!(!printed.contains("secret123"));
    }
}
