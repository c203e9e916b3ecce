//! Client configuration for broker-list and controller-based connections.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for a Pinot client connection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Additional HTTP headers to include in broker query API requests
    pub extra_http_header: HashMap<String, String>,

    /// Fixed broker list, `host:port` entries. Takes precedence over
    /// `controller_config` when non-empty.
    pub broker_list: Vec<String>,

    /// Controller-based broker discovery settings
    pub controller_config: Option<ControllerConfig>,

    /// HTTP request timeout for broker query API requests, in
    /// milliseconds. Zero means no timeout.
    pub http_timeout_ms: u64,

    /// Enable the multistage query execution engine by default
    pub use_multistage_engine: bool,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fixed broker list
    pub fn with_broker_list(mut self, broker_list: Vec<String>) -> Self {
        self.broker_list = broker_list;
        self
    }

    /// Set controller-based broker discovery
    pub fn with_controller(mut self, controller_config: ControllerConfig) -> Self {
        self.controller_config = Some(controller_config);
        self
    }

    /// Set the broker HTTP request timeout in milliseconds
    pub fn with_http_timeout_ms(mut self, http_timeout_ms: u64) -> Self {
        self.http_timeout_ms = http_timeout_ms;
        self
    }

    /// Enable or disable the multistage engine default
    pub fn with_multistage_engine(mut self, enabled: bool) -> Self {
        self.use_multistage_engine = enabled;
        self
    }
}

/// Configuration of a controller-based selector that periodically fetches
/// the table-to-broker mapping via the controller API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Controller address, e.g. "localhost:9000" or "http://localhost:9000"
    pub controller_address: String,

    /// Additional HTTP headers to include in controller API requests
    #[serde(default)]
    pub extra_controller_api_headers: HashMap<String, String>,

    /// Frequency of broker mapping refresh in milliseconds - defaults to 1000ms
    #[serde(default = "default_update_frequency_ms")]
    pub update_frequency_ms: u64,
}

impl ControllerConfig {
    pub fn new(controller_address: impl Into<String>) -> Self {
        Self {
            controller_address: controller_address.into(),
            extra_controller_api_headers: HashMap::new(),
            update_frequency_ms: default_update_frequency_ms(),
        }
    }

    /// Set the mapping refresh frequency in milliseconds
    pub fn with_update_frequency_ms(mut self, update_frequency_ms: u64) -> Self {
        self.update_frequency_ms = update_frequency_ms;
        self
    }
}

fn default_update_frequency_ms() -> u64 {
    1000
}
