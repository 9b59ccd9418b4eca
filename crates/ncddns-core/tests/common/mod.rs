//! Test doubles and common utilities for architecture contract tests
//!
//! These doubles verify how the engine drives its components: call counts,
//! call arguments, and cross-component ordering via a shared journal.

use std::collections::{BTreeMap, HashMap};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ncddns_core::error::{Error, Result};
use ncddns_core::traits::{
    ConfigStore, DnsProvider, IpSource, Settings, UpdateFailure, UpdateResult,
};

/// Shared, ordered record of cross-component calls
#[derive(Clone, Default)]
pub struct CallJournal {
    entries: Arc<std::sync::Mutex<Vec<String>>>,
}

impl CallJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    /// Snapshot of all entries in call order.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Position of the first entry matching `needle`, if any.
    pub fn position_of(&self, needle: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == needle)
    }
}

/// Helper to build raw settings pairs for seeding stores
pub fn pairs(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A mock ConfigStore seeded with fixed pairs that tracks calls
pub struct MockConfigStore {
    /// Backing pairs, shared across sharing handles
    pairs: Arc<std::sync::Mutex<BTreeMap<String, String>>>,
    /// Recorded (key, value) arguments from set calls
    set_calls: Arc<std::sync::Mutex<Vec<(String, String)>>>,
    /// Call counter for load()
    load_call_count: Arc<AtomicUsize>,
    /// Shared journal for ordering assertions
    journal: CallJournal,
}

impl MockConfigStore {
    pub fn new(seed: BTreeMap<String, String>, journal: &CallJournal) -> Self {
        Self {
            pairs: Arc::new(std::sync::Mutex::new(seed)),
            set_calls: Arc::new(std::sync::Mutex::new(Vec::new())),
            load_call_count: Arc::new(AtomicUsize::new(0)),
            journal: journal.clone(),
        }
    }

    /// Get the number of times load() was called
    pub fn load_call_count(&self) -> usize {
        self.load_call_count.load(Ordering::SeqCst)
    }

    /// Get the recorded set() calls in order
    pub fn set_calls(&self) -> Vec<(String, String)> {
        self.set_calls.lock().unwrap().clone()
    }

    /// Current stored value for `key`
    pub fn stored(&self, key: &str) -> Option<String> {
        self.pairs.lock().unwrap().get(key).cloned()
    }

    /// Create a new MockConfigStore that shares state with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            pairs: Arc::clone(&other.pairs),
            set_calls: Arc::clone(&other.set_calls),
            load_call_count: Arc::clone(&other.load_call_count),
            journal: other.journal.clone(),
        }
    }
}

#[async_trait::async_trait]
impl ConfigStore for MockConfigStore {
    async fn load(&self) -> Result<Settings> {
        self.load_call_count.fetch_add(1, Ordering::SeqCst);
        self.journal.record("store.load");
        Ok(Settings::from_pairs(self.pairs.lock().unwrap().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.journal.record(format!("store.set {key}"));
        self.set_calls
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));
        self.pairs
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// An IpSource that always answers with a fixed address
pub struct ScriptedIpSource {
    ip: Ipv4Addr,
    /// Call counter for current()
    current_call_count: Arc<AtomicUsize>,
    /// Shared journal for ordering assertions
    journal: CallJournal,
}

impl ScriptedIpSource {
    pub fn new(ip: Ipv4Addr, journal: &CallJournal) -> Self {
        Self {
            ip,
            current_call_count: Arc::new(AtomicUsize::new(0)),
            journal: journal.clone(),
        }
    }

    /// Get the number of times current() was called
    pub fn current_call_count(&self) -> usize {
        self.current_call_count.load(Ordering::SeqCst)
    }

    /// Create a new ScriptedIpSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            ip: other.ip,
            current_call_count: Arc::clone(&other.current_call_count),
            journal: other.journal.clone(),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.current_call_count.fetch_add(1, Ordering::SeqCst);
        self.journal.record("ip.current");
        Ok(self.ip)
    }
}

/// An IpSource whose discovery always fails
pub struct ExhaustedIpSource {
    attempted: usize,
}

impl ExhaustedIpSource {
    pub fn new(attempted: usize) -> Self {
        Self { attempted }
    }
}

#[async_trait::async_trait]
impl IpSource for ExhaustedIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        Err(Error::NoIpAvailable {
            attempted: self.attempted,
        })
    }
}

/// Scripted behavior for a single domain in [`MockDnsProvider`]
#[derive(Clone)]
pub enum ProviderScript {
    /// Confirm the update
    Applied,
    /// Answer with a refusal carrying this detail
    Refused(UpdateFailure),
    /// Fail the call itself, before any provider answer
    Transport(String),
}

/// A mock DnsProvider with per-domain scripted outcomes
///
/// Domains without a script are confirmed. Calls are recorded in order.
pub struct MockDnsProvider {
    /// Per-domain scripted outcomes
    scripts: Arc<std::sync::Mutex<HashMap<String, ProviderScript>>>,
    /// Call counter for update_record()
    update_call_count: Arc<AtomicUsize>,
    /// Recorded (domain, password, ip) arguments in call order
    update_calls: Arc<std::sync::Mutex<Vec<(String, String, Ipv4Addr)>>>,
    /// Shared journal for ordering assertions
    journal: CallJournal,
}

impl MockDnsProvider {
    pub fn new(journal: &CallJournal) -> Self {
        Self {
            scripts: Arc::new(std::sync::Mutex::new(HashMap::new())),
            update_call_count: Arc::new(AtomicUsize::new(0)),
            update_calls: Arc::new(std::sync::Mutex::new(Vec::new())),
            journal: journal.clone(),
        }
    }

    /// Script the outcome for one domain.
    pub fn script(&self, domain: &str, script: ProviderScript) {
        self.scripts
            .lock()
            .unwrap()
            .insert(domain.to_string(), script);
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    /// Get the domains passed to update_record(), in call order
    pub fn updated_domains(&self) -> Vec<String> {
        self.update_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(domain, _, _)| domain.clone())
            .collect()
    }

    /// Get the full recorded update_record() arguments
    pub fn update_calls(&self) -> Vec<(String, String, Ipv4Addr)> {
        self.update_calls.lock().unwrap().clone()
    }

    /// Create a new MockDnsProvider that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            scripts: Arc::clone(&other.scripts),
            update_call_count: Arc::clone(&other.update_call_count),
            update_calls: Arc::clone(&other.update_calls),
            journal: other.journal.clone(),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn update_record(
        &self,
        domain: &str,
        password: &str,
        ip: Ipv4Addr,
    ) -> Result<UpdateResult> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        self.journal.record(format!("provider.update {domain}"));
        self.update_calls
            .lock()
            .unwrap()
            .push((domain.to_string(), password.to_string(), ip));

        let script = self.scripts.lock().unwrap().get(domain).cloned();
        match script {
            None | Some(ProviderScript::Applied) => Ok(UpdateResult::Applied),
            Some(ProviderScript::Refused(detail)) => Ok(UpdateResult::Refused(detail)),
            Some(ProviderScript::Transport(detail)) => Err(Error::http(detail)),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
