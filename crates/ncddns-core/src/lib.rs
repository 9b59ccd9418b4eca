// # ncddns-core
//
// Core library for the one-shot Namecheap dynamic-DNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for one update pass:
// - **ConfigStore**: Trait for the persisted settings (cached address + domain secrets)
// - **IpSource**: Trait for discovering the current external IPv4 address
// - **DnsProvider**: Trait for pushing an address to a DNS provider
// - **UpdateEngine**: Drives the load → discover → compare → dispatch flow
//
// ## Design Principles
//
// 1. **One pass, then exit**: No daemon loop; schedulers re-run the binary
// 2. **Cache before dispatch**: The new address is durable before any provider call
// 3. **Contained failures**: A failing domain never stops the others
// 4. **Library-First**: The engine and stores are usable without the binary

pub mod engine;
pub mod error;
pub mod report;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use engine::{RunOutcome, UpdateEngine};
pub use error::{Error, Result};
pub use store::{EnvFileStore, MemoryConfigStore};
pub use traits::{
    ConfigStore, DnsProvider, IpSource, Settings, UpdateFailure, UpdateResult, CACHED_IP_KEY,
};
