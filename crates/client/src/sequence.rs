//! Request correlation for verifiers.
//!
//! A verifier issues a fresh [`RequestToken`] on every invocation. When a
//! response arrives, it is applied only if its token is still the latest
//! one issued; an older response that lands after a newer invocation is
//! dropped instead of overwriting fresher UI state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifies one verifier invocation. Tokens start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for RequestToken {
    fn from(raw: u64) -> Self {
        RequestToken(raw)
    }
}

/// Monotonic token source. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    latest: Arc<AtomicU64>,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next token, superseding every earlier one.
    pub fn issue(&self) -> RequestToken {
        RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `token` is the most recently issued one.
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 != 0 && self.latest.load(Ordering::SeqCst) == token.0
    }

    /// The most recently issued token, if any.
    pub fn latest(&self) -> Option<RequestToken> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            n => Some(RequestToken(n)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_token_supersedes_older() {
        let seq = RequestSequence::new();
        assert_eq!(seq.latest(), None);

        let first = seq.issue();
        assert!(seq.is_current(first));

        let second = seq.issue();
        assert!(second > first);
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        assert_eq!(seq.latest(), Some(second));
    }

    #[test]
    fn clones_share_the_counter() {
        let seq = RequestSequence::new();
        let other = seq.clone();
        let token = seq.issue();
        other.issue();
        assert!(!seq.is_current(token));
    }

    #[test]
    fn unknown_token_is_never_current() {
        let seq = RequestSequence::new();
        assert!(!seq.is_current(RequestToken::from(0)));
        seq.issue();
        assert!(!seq.is_current(RequestToken::from(42)));
    }
}
