use crate::foundation::models::SessionIdentity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StoredIdentity {
    pub identity: SessionIdentity,
    pub stored_at: u64, // unix seconds
}

impl StoredIdentity {
    /// Whether this entry is still trusted under a maximum age in seconds.
    ///
    /// A `max_age_seconds` of zero means entries never expire.
    pub fn is_fresh(&self, now: u64, max_age_seconds: u64) -> bool {
        max_age_seconds == 0 || now.saturating_sub(self.stored_at) <= max_age_seconds
    }
}
