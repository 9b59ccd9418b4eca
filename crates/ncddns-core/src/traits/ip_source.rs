//! # IP Source Trait
//!
//! Defines the interface for external IPv4 address discovery. The trait is
//! deliberately one method: sources that watch interfaces, poll echo
//! services, or read a router all answer the same question.

use std::net::Ipv4Addr;

use async_trait::async_trait;

use crate::error::Result;

/// Trait for IP source implementations
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Determine the current external IPv4 address.
    ///
    /// # Returns
    ///
    /// The address as seen from outside the local network.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoIpAvailable`] when no address could be
    /// determined. The engine treats this as fatal for the whole pass.
    async fn current(&self) -> Result<Ipv4Addr>;
}
