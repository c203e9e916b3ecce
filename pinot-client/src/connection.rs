//! Query dispatch: one selection, one transport attempt per call.

use crate::config::{ClientConfig, ControllerConfig};
use crate::error::{Error, Result};
use crate::format::{format_query, QueryParam};
use crate::response::Response;
use crate::selector::{BrokerSelector, DynamicBrokerSelector, SimpleBrokerSelector};
use crate::transport::{ClientTransport, JsonHttpTransport, Request};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

/// A logical connection to a Pinot cluster.
///
/// The connection holds no per-query state; it resolves a broker through
/// its selector and delegates the request to its transport. It is safe to
/// share across tasks.
///
/// # Example
/// ```no_run
/// use pinot_client::Connection;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let conn = Connection::from_broker_list(vec!["localhost:8000".to_string()]).await?;
/// let response = conn
///     .execute_sql("baseballStats", "select count(*) from baseballStats")
///     .await?;
/// println!("query took {} ms", response.time_used_ms);
/// # Ok(())
/// # }
/// ```
pub struct Connection {
    transport: Arc<dyn ClientTransport>,
    broker_selector: Arc<dyn BrokerSelector>,
    trace: AtomicBool,
    use_multistage_engine: AtomicBool,
}

impl Connection {
    /// Create a connection from explicit collaborators.
    pub fn new(transport: Arc<dyn ClientTransport>, broker_selector: Arc<dyn BrokerSelector>) -> Self {
        Self {
            transport,
            broker_selector,
            trace: AtomicBool::new(false),
            use_multistage_engine: AtomicBool::new(false),
        }
    }

    /// Create a connection from a client configuration: a non-empty
    /// `broker_list` selects the static strategy, otherwise
    /// `controller_config` selects controller-based discovery.
    pub async fn from_config(config: ClientConfig) -> Result<Self> {
        let timeout =
            (config.http_timeout_ms > 0).then(|| Duration::from_millis(config.http_timeout_ms));
        let transport = Arc::new(JsonHttpTransport::new(timeout, &config.extra_http_header)?);

        let broker_selector: Arc<dyn BrokerSelector> = if !config.broker_list.is_empty() {
            Arc::new(SimpleBrokerSelector::new(config.broker_list)?)
        } else if let Some(controller_config) = config.controller_config {
            Arc::new(DynamicBrokerSelector::start(controller_config).await?)
        } else {
            return Err(Error::InvalidConfig(
                "either a broker list or a controller config is required".to_string(),
            ));
        };

        let connection = Self::new(transport, broker_selector);
        connection.use_multistage_engine(config.use_multistage_engine);
        Ok(connection)
    }

    /// Create a connection over a fixed broker list
    pub async fn from_broker_list(broker_list: Vec<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new().with_broker_list(broker_list)).await
    }

    /// Create a connection with controller-based broker discovery
    pub async fn from_controller(controller_config: ControllerConfig) -> Result<Self> {
        Self::from_config(ClientConfig::new().with_controller(controller_config)).await
    }

    /// Use the multistage engine for subsequent queries on this connection
    pub fn use_multistage_engine(&self, val: bool) {
        self.use_multistage_engine.store(val, Ordering::Relaxed);
    }

    /// Open trace for subsequent queries on this connection
    pub fn open_trace(&self) {
        self.trace.store(true, Ordering::Relaxed);
    }

    /// Close trace for subsequent queries on this connection
    pub fn close_trace(&self) {
        self.trace.store(false, Ordering::Relaxed);
    }

    /// Execute SQL for a given table
    ///
    /// Exactly one broker is selected and exactly one transport attempt is
    /// made; retrying against another broker is the caller's decision.
    /// Dropping the returned future aborts the in-flight request.
    pub async fn execute_sql(&self, table: &str, query: &str) -> Result<Response> {
        // Snapshot the flags before the first await so concurrent toggles
        // never affect a call already in flight.
        let trace = self.trace.load(Ordering::Relaxed);
        let use_multistage_engine = self.use_multistage_engine.load(Ordering::Relaxed);

        let address = match self.broker_selector.select(table).await {
            Ok(address) => address,
            Err(e) => {
                error!("unable to find an available broker for table {}: {}", table, e);
                return Err(e);
            }
        };

        let request = Request::sql(query, trace, use_multistage_engine);
        match self.transport.execute(&address, &request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                error!("failed to execute SQL query on broker {}: {}", address, e);
                Err(e)
            }
        }
    }

    /// Execute an SQL query with parameters for a given table
    ///
    /// The query pattern is formatted first; a format failure returns
    /// without consulting the selector or the transport.
    pub async fn execute_sql_with_params(
        &self,
        table: &str,
        query_pattern: &str,
        params: &[QueryParam],
    ) -> Result<Response> {
        let query = format_query(query_pattern, params)?;
        self.execute_sql(table, &query).await
    }

    /// Stop background work owned by the broker selector. A no-op for
    /// static selectors.
    pub async fn close(&self) {
        self.broker_selector.shutdown().await;
    }
}
