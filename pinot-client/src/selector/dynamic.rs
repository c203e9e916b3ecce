use crate::config::ControllerConfig;
use crate::controller::PinotControllerClient;
use crate::error::{Error, Result};
use crate::selector::BrokerSelector;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Broker candidates for one table plus its rotation cursor. Rebuilt
/// wholesale on every refresh, so cursors for removed tables cannot leak.
#[derive(Debug)]
struct TableBrokers {
    addresses: Vec<String>,
    cursor: AtomicUsize,
}

type BrokerMapping = HashMap<String, TableBrokers>;

/// Broker selector backed by the controller's live table-to-broker mapping.
///
/// `start` performs an eager first fetch, then a background task re-fetches
/// the complete mapping every `update_frequency_ms` and swaps it in as a
/// unit: concurrent `select` calls observe either the old or the new
/// mapping, never a partially updated one. A failed refresh keeps the
/// previous mapping and is reported through `tracing`.
pub struct DynamicBrokerSelector {
    mapping: Arc<RwLock<BrokerMapping>>,
    shutdown_tx: watch::Sender<bool>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl DynamicBrokerSelector {
    /// Connect to the controller, fetch the initial mapping and start the
    /// background refresh task.
    ///
    /// # Errors
    /// Returns `Error::DiscoveryUnavailable` when the initial fetch fails;
    /// the selector never starts serving from an unfetched mapping.
    pub async fn start(config: ControllerConfig) -> Result<Self> {
        let client = PinotControllerClient::new(
            config.controller_address.clone(),
            &config.extra_controller_api_headers,
        )?;

        let initial = client
            .broker_mapping()
            .await
            .map_err(|e| Error::DiscoveryUnavailable(e.to_string()))?;
        let mapping = Arc::new(RwLock::new(build_mapping(initial)));

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let period = Duration::from_millis(match config.update_frequency_ms {
            // Treat an unset frequency as the documented 1000ms default.
            0 => 1000,
            ms => ms,
        });

        let task_mapping = Arc::clone(&mapping);
        let refresh_task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately and the initial fetch
            // already ran, so consume it before entering the loop.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => match client.broker_mapping().await {
                        Ok(fresh) => {
                            let fresh = build_mapping(fresh);
                            let table_count = fresh.len();
                            *task_mapping.write().await = fresh;
                            debug!("refreshed broker mapping for {} tables", table_count);
                        }
                        // Keep serving from the previous mapping.
                        Err(e) => warn!("broker mapping refresh failed: {}", e),
                    },
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        Ok(Self {
            mapping,
            shutdown_tx,
            refresh_task: Mutex::new(Some(refresh_task)),
        })
    }
}

#[async_trait]
impl BrokerSelector for DynamicBrokerSelector {
    async fn select(&self, table: &str) -> Result<String> {
        let mapping = self.mapping.read().await;
        let entry = mapping
            .get(table)
            .ok_or_else(|| Error::TableNotFound(table.to_string()))?;
        if entry.addresses.is_empty() {
            return Err(Error::NoBrokerAvailable(table.to_string()));
        }
        let idx = entry.cursor.fetch_add(1, Ordering::Relaxed) % entry.addresses.len();
        Ok(entry.addresses[idx].clone())
    }

    /// Stop the refresh task and wait for it to finish. Idempotent, and
    /// safe to call while a refresh is in flight: the in-flight fetch
    /// completes, its result is discarded with the task.
    async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        let task = self.refresh_task.lock().await.take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }
}

impl Drop for DynamicBrokerSelector {
    fn drop(&mut self) {
        // Backstop for selectors dropped without an explicit shutdown: the
        // refresh task exits on the signal even though nobody joins it.
        let _ = self.shutdown_tx.send(true);
    }
}

fn build_mapping(raw: HashMap<String, Vec<String>>) -> BrokerMapping {
    raw.into_iter()
        .map(|(table, addresses)| {
            (
                table,
                TableBrokers {
                    addresses,
                    cursor: AtomicUsize::new(0),
                },
            )
        })
        .collect()
}
