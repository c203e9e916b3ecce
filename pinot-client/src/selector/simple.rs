use crate::error::{Error, Result};
use crate::selector::BrokerSelector;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Broker selector over a fixed, caller-supplied broker list.
///
/// The table argument is ignored; every broker in the list is assumed to
/// serve every table. Calls rotate through the list with a shared atomic
/// cursor, so N calls distribute exactly N / len picks to each broker.
#[derive(Debug)]
pub struct SimpleBrokerSelector {
    brokers: Vec<String>,
    cursor: AtomicUsize,
}

impl SimpleBrokerSelector {
    /// Create a selector from a non-empty broker list.
    ///
    /// # Errors
    /// Returns `Error::EmptyBrokerList` when `broker_list` is empty.
    pub fn new(broker_list: Vec<String>) -> Result<Self> {
        if broker_list.is_empty() {
            return Err(Error::EmptyBrokerList);
        }
        Ok(Self {
            brokers: broker_list,
            cursor: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl BrokerSelector for SimpleBrokerSelector {
    async fn select(&self, _table: &str) -> Result<String> {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.brokers.len();
        Ok(self.brokers[idx].clone())
    }
}
