//! Caller-side session state and settlement of query outcomes.
//!
//! The orchestrator never mutates a session. The shell charges a query up
//! front with [`Session::begin_query`], passes the count used before it to
//! the orchestrator, and then lets [`Session::settle`] apply whatever the
//! outcome asks for.

use uuid::Uuid;

use crate::outcome::{QueryOutcome, QueryStatus};
use crate::quota::custom_credential;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub usage_count: u32,
    /// Caller's own provider key; present means unlimited use.
    pub credential: Option<String>,
}

/// What a credential update did, for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialChange {
    Added,
    Replaced,
    Removed,
    Unchanged,
}

/// Bookkeeping applied by [`Session::settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// The optimistic charge was undone.
    pub refunded: bool,
    /// The held credential was dropped after being rejected.
    pub credential_dropped: bool,
}

impl Session {
    /// A fresh session with a random id and no usage.
    pub fn new() -> Self {
        Self::with_usage(0)
    }

    pub fn with_usage(usage_count: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            usage_count,
            credential: None,
        }
    }

    pub fn has_credential(&self) -> bool {
        custom_credential(self.credential.as_deref()).is_some()
    }

    /// Set or clear the held credential. Blank input clears it.
    pub fn set_credential(&mut self, key: &str) -> CredentialChange {
        let new_key = custom_credential(Some(key)).map(str::to_string);
        let change = match (&self.credential, &new_key) {
            (None, None) => CredentialChange::Unchanged,
            (None, Some(_)) => CredentialChange::Added,
            (Some(_), None) => CredentialChange::Removed,
            (Some(old), Some(new)) if old == new => CredentialChange::Unchanged,
            (Some(_), Some(_)) => CredentialChange::Replaced,
        };
        self.credential = new_key;
        change
    }

    /// Charge one query up front. Returns the count used before it, which is
    /// what the orchestrator expects.
    pub fn begin_query(&mut self) -> u32 {
        let used_before = self.usage_count;
        self.usage_count = self.usage_count.saturating_add(1);
        used_before
    }

    /// Apply an outcome to the session.
    ///
    /// - Quota refusals keep the charge.
    /// - A rejected caller credential is dropped and the charge refunded.
    /// - Any other failure is refunded.
    /// - Successful replies are refunded only when the outcome asks for it
    ///   and no caller credential was used.
    pub fn settle(&mut self, outcome: &QueryOutcome) -> Settlement {
        let mut settlement = Settlement {
            refunded: false,
            credential_dropped: false,
        };
        match outcome.status {
            QueryStatus::RateLimited => {}
            QueryStatus::AuthFailed => {
                self.credential = None;
                settlement.credential_dropped = true;
                settlement.refunded = self.refund();
            }
            QueryStatus::ServerMisconfigured
            | QueryStatus::ProviderError
            | QueryStatus::UnknownError => {
                settlement.refunded = self.refund();
            }
            QueryStatus::Ok => {
                if outcome.suppress_quota_charge && !outcome.used_custom_credential {
                    settlement.refunded = self.refund();
                }
            }
        }
        settlement
    }

    fn refund(&mut self) -> bool {
        let before = self.usage_count;
        self.usage_count = self.usage_count.saturating_sub(1);
        before != self.usage_count
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
