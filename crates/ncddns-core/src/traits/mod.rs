//! Core traits for the updater
//!
//! This module defines the three seams the update engine is built on:
//!
//! - [`ConfigStore`]: persisted settings (cached address plus domain secrets)
//! - [`IpSource`]: external IPv4 address discovery
//! - [`DnsProvider`]: pushing a new address to the DNS provider

pub mod config_store;
pub mod dns_provider;
pub mod ip_source;

pub use config_store::{ConfigStore, Settings, CACHED_IP_KEY};
pub use dns_provider::{DnsProvider, UpdateFailure, UpdateResult};
pub use ip_source::IpSource;
