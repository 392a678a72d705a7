//! Free-tier quota policy.
//!
//! Callers without their own credential get a fixed number of queries;
//! callers with one are never counted.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::config::QuotaConfig;

/// Number reported on the wire in place of "unlimited".
pub const UNLIMITED_WIRE_VALUE: u64 = 999_999;

/// Queries left for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingQuota {
    Limited(u32),
    Unlimited,
}

impl RemainingQuota {
    /// Numeric form used in serialized results.
    pub fn wire_value(self) -> u64 {
        match self {
            Self::Limited(n) => u64::from(n),
            Self::Unlimited => UNLIMITED_WIRE_VALUE,
        }
    }
}

impl fmt::Display for RemainingQuota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(n) => write!(f, "{n}"),
            Self::Unlimited => write!(f, "unlimited"),
        }
    }
}

impl Serialize for RemainingQuota {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.wire_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPolicy {
    free_queries: u32,
}

impl QuotaPolicy {
    pub fn new(free_queries: u32) -> Self {
        Self { free_queries }
    }

    pub fn free_queries(&self) -> u32 {
        self.free_queries
    }

    /// True once a caller without a credential may not query any more.
    pub fn is_exhausted(&self, usage_count: u32) -> bool {
        usage_count >= self.free_queries
    }

    /// What is left once `usage_count` queries have been used.
    pub fn remaining(&self, has_custom_credential: bool, usage_count: u32) -> RemainingQuota {
        if has_custom_credential {
            RemainingQuota::Unlimited
        } else {
            RemainingQuota::Limited(self.free_queries.saturating_sub(usage_count))
        }
    }

    /// What is left after the current query, given `usage_count` queries
    /// used before it.
    pub fn remaining_after(&self, has_custom_credential: bool, usage_count: u32) -> RemainingQuota {
        self.remaining(has_custom_credential, usage_count.saturating_add(1))
    }
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self::from(&QuotaConfig::default())
    }
}

impl From<&QuotaConfig> for QuotaPolicy {
    fn from(config: &QuotaConfig) -> Self {
        Self::new(config.free_queries)
    }
}

/// The caller's credential, if one was supplied and is not blank.
pub fn custom_credential(credential: Option<&str>) -> Option<&str> {
    credential.map(str::trim).filter(|key| !key.is_empty())
}
