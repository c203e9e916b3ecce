//! Pinot Controller HTTP API client
//!
//! This module provides a client for the controller's broker-discovery
//! endpoint, used by the dynamic broker selector to learn which brokers
//! currently serve which tables.

use crate::error::{Error, Result};
use crate::transport::header_map;
use serde::Deserialize;
use std::collections::HashMap;

/// HTTP client for the Pinot controller broker-discovery API
///
/// # Example
/// ```no_run
/// use pinot_client::controller::PinotControllerClient;
/// use std::collections::HashMap;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = PinotControllerClient::new("localhost:9000", &HashMap::new())?;
/// let mapping = client.broker_mapping().await?;
/// println!("Tables with live brokers: {:?}", mapping.keys());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PinotControllerClient {
    base_url: String,
    client: reqwest::Client,
}

/// One broker instance entry from `/v2/brokers/tables`
///
/// The controller returns brokers grouped by table:
/// ```json
/// {
///   "baseballStats": [
///     {"host": "broker-1", "port": 8000, "instanceName": "Broker_broker-1_8000"}
///   ]
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerInstance {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub instance_name: String,
}

impl BrokerInstance {
    /// Broker address in the form `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl PinotControllerClient {
    /// Create a new controller client
    ///
    /// # Arguments
    /// * `controller_address` - Controller address; a bare `host:port` is
    ///   treated as `http://host:port`
    /// * `extra_headers` - Headers included in every controller API request
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` for malformed header names or values.
    pub fn new(
        controller_address: impl Into<String>,
        extra_headers: &HashMap<String, String>,
    ) -> Result<Self> {
        let address = controller_address.into();
        let base_url = if address.starts_with("http://") || address.starts_with("https://") {
            address
        } else {
            format!("http://{}", address)
        };

        let client = reqwest::Client::builder()
            .default_headers(header_map(extra_headers)?)
            .build()?;

        Ok(Self { base_url, client })
    }

    /// Fetch the complete live table-to-broker mapping
    ///
    /// Makes a GET request to `/v2/brokers/tables?state=ONLINE` and
    /// flattens each broker instance to a `host:port` address. Table names
    /// are kept verbatim as the controller reports them.
    ///
    /// # Errors
    /// Returns error if:
    /// - HTTP request fails
    /// - Controller returns non-200 status
    /// - Response cannot be parsed as JSON
    pub async fn broker_mapping(&self) -> Result<HashMap<String, Vec<String>>> {
        let url = format!("{}/v2/brokers/tables?state=ONLINE", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::HttpClient(format!(
                "Controller returned status {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let body = response.text().await?;
        let instances: HashMap<String, Vec<BrokerInstance>> = serde_json::from_str(&body)?;

        Ok(instances
            .into_iter()
            .map(|(table, brokers)| {
                let addresses = brokers.iter().map(BrokerInstance::address).collect();
                (table, addresses)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_scheme_defaulting() {
        let client = PinotControllerClient::new("localhost:9000", &HashMap::new()).unwrap();
        assert_eq!(client.base_url, "http://localhost:9000");

        let client =
            PinotControllerClient::new("https://pinot.example.com", &HashMap::new()).unwrap();
        assert_eq!(client.base_url, "https://pinot.example.com");
    }

    #[test]
    fn test_deserialize_broker_instances() {
        let json = r#"{
            "baseballStats": [
                {"host": "broker-1", "port": 8000, "instanceName": "Broker_broker-1_8000"},
                {"host": "broker-2", "port": 8000, "instanceName": "Broker_broker-2_8000"}
            ],
            "airlineStats": []
        }"#;
        let instances: HashMap<String, Vec<BrokerInstance>> = serde_json::from_str(json).unwrap();

        let brokers = &instances["baseballStats"];
        assert_eq!(brokers.len(), 2);
        assert_eq!(brokers[0].address(), "broker-1:8000");
        assert_eq!(brokers[1].instance_name, "Broker_broker-2_8000");
        assert!(instances["airlineStats"].is_empty());
    }
}
