//! Broker query API transport.
//!
//! `ClientTransport` is the seam between query dispatch and the wire:
//! given a broker address and a request it returns a typed `Response`.
//! `JsonHttpTransport` is the production implementation speaking the
//! broker's JSON/HTTP query endpoint.

use crate::error::{Error, Result};
use crate::response::Response;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// A single broker query request. Constructed fresh per call and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Request {
    /// Query endpoint format, currently always "sql"
    pub query_format: String,
    /// Query text, with parameters already encoded as literals
    pub query: String,
    /// Ask the broker to attach trace info to the response
    pub trace: bool,
    /// Route the query through the multistage execution engine
    pub use_multistage_engine: bool,
}

impl Request {
    /// Build a SQL request
    pub fn sql(query: impl Into<String>, trace: bool, use_multistage_engine: bool) -> Self {
        Self {
            query_format: "sql".to_string(),
            query: query.into(),
            trace,
            use_multistage_engine,
        }
    }
}

/// Executes a request against a broker at `host:port`.
///
/// Cancellation: dropping the future returned by `execute` aborts the
/// underlying HTTP request.
#[async_trait]
pub trait ClientTransport: Send + Sync {
    async fn execute(&self, broker_address: &str, request: &Request) -> Result<Response>;
}

/// HTTP transport for the broker query API (`POST /query/sql`).
#[derive(Debug, Clone)]
pub struct JsonHttpTransport {
    client: reqwest::Client,
}

impl JsonHttpTransport {
    /// Create a transport with an optional per-request timeout and extra
    /// headers applied to every broker request.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` for malformed header names or values.
    pub fn new(timeout: Option<Duration>, extra_headers: &HashMap<String, String>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().default_headers(header_map(extra_headers)?);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ClientTransport for JsonHttpTransport {
    async fn execute(&self, broker_address: &str, request: &Request) -> Result<Response> {
        let url = format!("http://{}/query/{}", broker_address, request.query_format);

        let mut body = serde_json::json!({ "sql": request.query });
        if request.trace {
            body["trace"] = Value::Bool(true);
        }
        if request.use_multistage_engine {
            body["queryOptions"] = Value::String("useMultiStageEngine=true".to_string());
        }

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(Error::HttpClient(format!(
                "Broker returned status {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        // Decode from text so a malformed payload surfaces as Error::Json
        // rather than a generic HTTP failure.
        let body = response.text().await?;
        let response: Response = serde_json::from_str(&body)?;
        Ok(response)
    }
}

/// Convert configured string headers into a reqwest header map.
pub(crate) fn header_map(extra_headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in extra_headers {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|e| Error::InvalidConfig(format!("invalid header name '{}': {}", name, e)))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|e| Error::InvalidConfig(format!("invalid header value for '{:?}': {}", name, e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_request() {
        let request = Request::sql("select 1", true, false);
        assert_eq!(request.query_format, "sql");
        assert_eq!(request.query, "select 1");
        assert!(request.trace);
        assert!(!request.use_multistage_engine);
    }

    #[test]
    fn test_header_map_rejects_invalid_name() {
        let mut headers = HashMap::new();
        headers.insert("bad header".to_string(), "v".to_string());
        assert!(matches!(
            header_map(&headers),
            Err(Error::InvalidConfig(_))
        ));
    }
}
