//! # DNS Provider Trait
//!
//! Defines the interface for pushing a new address to a dynamic-DNS
//! provider, one domain at a time, together with the outcome types the
//! engine folds per-domain results into.

use std::net::Ipv4Addr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Outcome of a single domain update call.
///
/// An `Err` from [`DnsProvider::update_record`] means the call itself could
/// not be made or read; `Refused` means the provider answered and said no.
/// The engine treats both as per-domain failures, never as fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateResult {
    /// The provider confirmed the record now carries the new address
    Applied,
    /// The provider answered but reported errors or an incomplete update
    Refused(UpdateFailure),
}

/// Diagnostic detail for a failed domain update.
///
/// Carries the provider's own error count and completion flag plus the raw
/// response lines, so the log holds enough to debug a refusal after the
/// fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFailure {
    /// Error count reported by the provider
    pub err_count: u32,
    /// Whether the provider flagged the update as complete
    pub done: bool,
    /// Raw response lines, kept verbatim for the log
    pub raw: Vec<String>,
}

impl UpdateFailure {
    /// Failure record for a call that never produced a provider answer.
    ///
    /// Used when the request itself failed; counts as one error and an
    /// incomplete update, with `detail` as the only raw line.
    pub fn transport(detail: impl Into<String>) -> Self {
        Self {
            err_count: 1,
            done: false,
            raw: vec![detail.into()],
        }
    }
}

/// Trait for DNS provider implementations
///
/// Implementations must be `Send + Sync` to be usable from the async
/// engine.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Push `ip` to the apex record of `domain`.
    ///
    /// # Parameters
    ///
    /// - `domain`: domain name whose record to update
    /// - `password`: per-domain dynamic-DNS password
    /// - `ip`: address the record should carry
    ///
    /// # Returns
    ///
    /// [`UpdateResult::Applied`] when the provider confirmed the update,
    /// [`UpdateResult::Refused`] when it answered with errors.
    ///
    /// # Errors
    ///
    /// Returns an error only when no provider answer was obtained at all,
    /// for example a connect failure or an unreadable response.
    async fn update_record(
        &self,
        domain: &str,
        password: &str,
        ip: Ipv4Addr,
    ) -> Result<UpdateResult>;

    /// The provider's name (e.g., "namecheap")
    fn provider_name(&self) -> &'static str;
}
