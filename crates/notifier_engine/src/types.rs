use std::time::Duration;

/// HTTP client settings shared by the sources and the dispatcher.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Failures while producing the current set of observable items.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to '{url}' failed: {message}")]
    Network { url: String, message: String },
    #[error("'{url}' answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("could not parse source response: {0}")]
    Parse(String),
    /// Zero items is indistinguishable from a parsing regression, so it is a
    /// hard error rather than "no changes".
    #[error("source produced no items; body started with: {sample}")]
    EmptySource { sample: String },
    #[error("item id '{raw}' is not a valid snowflake")]
    InvalidId { raw: String },
}

/// Failures while handing a notification to the outbound channel.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("webhook request failed: {0}")]
    Network(String),
    #[error("webhook answered with status {status}")]
    Status { status: u16 },
}

pub(crate) fn map_reqwest_error(url: &str, err: reqwest::Error) -> SourceError {
    SourceError::Network {
        url: url.to_string(),
        message: err.to_string(),
    }
}
