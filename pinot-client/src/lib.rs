// Rust client for the Apache Pinot broker query API

pub mod config;
pub mod connection;
pub mod controller;
pub mod error;
pub mod format;
pub mod response;
pub mod selector;
pub mod transport;

pub use config::{ClientConfig, ControllerConfig};
pub use connection::Connection;
pub use error::{Error, Result};
pub use format::{format_query, QueryParam};
pub use response::{DataSchema, PinotException, Response, ResultTable};
pub use selector::{BrokerSelector, DynamicBrokerSelector, SimpleBrokerSelector};
pub use transport::{ClientTransport, JsonHttpTransport, Request};
