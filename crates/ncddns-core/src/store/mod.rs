//! Settings store implementations
//!
//! This module provides the [`crate::traits::ConfigStore`] implementations:
//!
//! - [`EnvFileStore`]: flat `key="value"` file on disk (production)
//! - [`MemoryConfigStore`]: in-memory map (tests and embedding)

pub mod env_file;
pub mod memory;

pub use env_file::EnvFileStore;
pub use memory::MemoryConfigStore;
