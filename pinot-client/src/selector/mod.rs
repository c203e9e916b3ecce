//! Broker selection strategies
//!
//! A selector resolves a table name to the `host:port` of a broker able to
//! serve queries for that table. Two strategies are provided:
//! - `SimpleBrokerSelector`: round-robins over a fixed broker list
//! - `DynamicBrokerSelector`: tracks the live table-to-broker mapping via
//!   the controller API and load-balances within each table's candidates

use crate::error::Result;
use async_trait::async_trait;

mod dynamic;
mod simple;

pub use dynamic::DynamicBrokerSelector;
pub use simple::SimpleBrokerSelector;

/// Resolves a table name to a broker address.
#[async_trait]
pub trait BrokerSelector: Send + Sync {
    /// Returns the broker address in the form `host:port`.
    ///
    /// Table names are matched verbatim; no case folding or type-suffix
    /// stripping is applied.
    async fn select(&self, table: &str) -> Result<String>;

    /// Stop any background work owned by the selector. The default is a
    /// no-op for selectors without background state.
    async fn shutdown(&self) {}
}
