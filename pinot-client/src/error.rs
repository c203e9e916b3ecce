use std::fmt;

#[derive(Debug)]
pub enum Error {
    PlaceholderMismatch { placeholders: usize, parameters: usize },
    UnsupportedParameter(String),
    EmptyBrokerList,
    TableNotFound(String),
    NoBrokerAvailable(String),
    DiscoveryUnavailable(String),
    InvalidConfig(String),
    HttpClient(String),
    Json(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PlaceholderMismatch {
                placeholders,
                parameters,
            } => write!(
                f,
                "query pattern has {} placeholders but {} parameters were supplied",
                placeholders, parameters
            ),
            Error::UnsupportedParameter(msg) => write!(f, "unsupported parameter type: {}", msg),
            Error::EmptyBrokerList => write!(f, "broker list is empty"),
            Error::TableNotFound(table) => {
                write!(f, "no broker mapping entry for table: {}", table)
            }
            Error::NoBrokerAvailable(table) => {
                write!(f, "no broker available for table: {}", table)
            }
            Error::DiscoveryUnavailable(msg) => write!(f, "discovery source unavailable: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Error::HttpClient(msg) => write!(f, "HTTP client error: {}", msg),
            Error::Json(msg) => write!(f, "JSON decode error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::HttpClient(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl Error {
    /// True for failures produced by the query formatter.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            Error::PlaceholderMismatch { .. } | Error::UnsupportedParameter(_)
        )
    }

    /// True for failures produced by broker selection, including
    /// selector construction and discovery bootstrap.
    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            Error::EmptyBrokerList
                | Error::TableNotFound(_)
                | Error::NoBrokerAvailable(_)
                | Error::DiscoveryUnavailable(_)
        )
    }

    /// True for failures produced by the broker transport.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::HttpClient(_) | Error::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
