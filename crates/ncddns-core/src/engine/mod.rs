//! # Update Engine
//!
//! Drives one complete update pass over pluggable components.
//!
//! ## Data flow
//!
//! ```text
//! ConfigStore::load ──> IpSource::current ──> compare with cached_ip
//!                                                  │
//!                              unchanged ──> RunOutcome::NoChange
//!                                                  │ changed
//!                              ConfigStore::set(cached_ip)
//!                                                  │
//!                              DnsProvider::update_record per domain
//!                                                  │
//!                              RunOutcome::Updated { failures }
//! ```
//!
//! ## Failure containment
//!
//! Store and discovery failures abort the pass. Per-domain dispatch
//! failures never do: they are folded into the outcome and logged, and
//! every remaining domain is still attempted.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use tracing::{debug, info};

use crate::error::Result;
use crate::report;
use crate::traits::{ConfigStore, DnsProvider, IpSource, UpdateFailure, UpdateResult, CACHED_IP_KEY};

/// Terminal outcome of one update pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The cached address still matches; nothing was written or dispatched
    NoChange {
        /// The address both the cache and the network agree on
        ip: Ipv4Addr,
    },
    /// The address changed: cache rewritten, every domain dispatched
    Updated {
        /// Previously cached address, if any run had recorded one
        previous: Option<String>,
        /// Newly observed external address
        ip: Ipv4Addr,
        /// Per-domain failures; empty means a clean update
        failures: BTreeMap<String, UpdateFailure>,
    },
}

impl RunOutcome {
    /// True when the pass finished without a single domain failure.
    pub fn is_clean(&self) -> bool {
        match self {
            RunOutcome::NoChange { .. } => true,
            RunOutcome::Updated { failures, .. } => failures.is_empty(),
        }
    }
}

/// One-shot update engine over pluggable components
pub struct UpdateEngine {
    store: Box<dyn ConfigStore>,
    ip_source: Box<dyn IpSource>,
    provider: Box<dyn DnsProvider>,
}

impl UpdateEngine {
    /// Assemble an engine from its three components.
    pub fn new(
        store: Box<dyn ConfigStore>,
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
    ) -> Self {
        Self {
            store,
            ip_source,
            provider,
        }
    }

    /// Run one complete update pass.
    ///
    /// # Returns
    ///
    /// [`RunOutcome::NoChange`] when the discovered address matches the
    /// cache, otherwise [`RunOutcome::Updated`] with any per-domain
    /// failures collected along the way.
    ///
    /// # Errors
    ///
    /// Fails only on store or discovery trouble. Provider refusals and
    /// transport errors for individual domains are contained in the
    /// outcome instead.
    pub async fn run(&self) -> Result<RunOutcome> {
        let settings = self.store.load().await?;
        debug!(domains = settings.domain_count(), "starting update pass");

        let ip = self.ip_source.current().await?;
        let ip_text = ip.to_string();

        if settings.cached_ip.as_deref() == Some(ip_text.as_str()) {
            info!(%ip, "external address unchanged, nothing to do");
            return Ok(RunOutcome::NoChange { ip });
        }

        info!(
            previous = settings.cached_ip.as_deref().unwrap_or("<none>"),
            current = %ip,
            "external address changed, updating domains"
        );

        // Cache first: the observed address must be durable before any
        // provider call happens.
        self.store.set(CACHED_IP_KEY, &ip_text).await?;
        debug!(%ip, "address cache written");

        let failures = self.dispatch_all(&settings.domains, ip).await;
        report::log_failures(&failures);

        info!(
            domains = settings.domain_count(),
            failed = failures.len(),
            "update pass complete"
        );

        Ok(RunOutcome::Updated {
            previous: settings.cached_ip,
            ip,
            failures,
        })
    }

    /// Push the new address to every configured domain.
    ///
    /// Domains are visited in name order. A failed domain is recorded and
    /// the sweep continues; the returned map holds one entry per failed
    /// domain.
    async fn dispatch_all(
        &self,
        domains: &BTreeMap<String, String>,
        ip: Ipv4Addr,
    ) -> BTreeMap<String, UpdateFailure> {
        let mut failures = BTreeMap::new();

        for (domain, password) in domains {
            debug!(%domain, provider = self.provider.provider_name(), "dispatching update");
            match self.provider.update_record(domain, password, ip).await {
                Ok(UpdateResult::Applied) => {
                    info!(%domain, %ip, "domain updated");
                }
                Ok(UpdateResult::Refused(detail)) => {
                    failures.insert(domain.clone(), detail);
                }
                Err(e) => {
                    failures.insert(domain.clone(), UpdateFailure::transport(e.to_string()));
                }
            }
        }

        failures
    }
}
