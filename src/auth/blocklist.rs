use std::collections::HashSet;

use parking_lot::RwLock;
use tracing::debug;

/// Set of revoked token IDs
///
/// Lives for the lifetime of the process. Membership checks take the read
/// lock, revocations the write lock.
#[derive(Debug, Default)]
pub struct Blocklist {
    revoked: RwLock<HashSet<String>>,
}

impl Blocklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revokes a token ID, returning `false` if it was already revoked
    pub fn revoke(&self, jti: &str) -> bool {
        let inserted = self.revoked.write().insert(jti.to_string());
        debug!(jti, inserted, "Token revoked");
        inserted
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.read().contains(jti)
    }

    pub fn len(&self) -> usize {
        self.revoked.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
