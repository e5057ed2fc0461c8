//! Session token issuance.
//!
//! The remote API has no token endpoint, so sessions carry a locally minted
//! placeholder. [`TokenIssuer`] is the seam where a server-issued credential
//! replaces it without changing the session manager.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use portal_model::{Account, Role};

/// Prefix of tokens minted by [`MockTokenIssuer`].
pub const MOCK_TOKEN_PREFIX: &str = "fake-jwt";

/// Issues the opaque token recorded when a session is committed.
pub trait TokenIssuer: Send + Sync {
    /// Issues a token for an authenticated account.
    fn issue(&self, account: &Account, role: Role) -> String;
}

/// Mints `fake-jwt-{id}-{role}-{micros}` tokens.
///
/// These tokens are not signed and prove nothing; they only mark the
/// session as authenticated. The timestamp is forced strictly increasing,
/// so two commits never share a token even within the same microsecond.
#[derive(Debug, Default)]
pub struct MockTokenIssuer {
    last_stamp: AtomicI64,
}

impl MockTokenIssuer {
    /// Creates a new issuer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_micros();
        let mut prev = self.last_stamp.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match self.last_stamp.compare_exchange_weak(
                prev,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}

impl TokenIssuer for MockTokenIssuer {
    fn issue(&self, account: &Account, role: Role) -> String {
        format!(
            "{MOCK_TOKEN_PREFIX}-{}-{}-{}",
            account.id,
            role,
            self.next_stamp()
        )
    }
}
