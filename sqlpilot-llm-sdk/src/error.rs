use thiserror::Error;

/// Error types for completion requests against a local model server
#[derive(Error, Debug)]
pub enum LlmError {
    /// Authentication failed (HTTP 401/403)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// Invalid request parameters (HTTP 400)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// API error with status code (HTTP 4xx/5xx except above)
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Network or connection error, including request timeouts
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// JSON parsing or serialization error
    #[error("Parse error: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    /// Generic error for unexpected cases
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl LlmError {
    /// Create an authentication error
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a rate limit error
    pub fn rate_limit<S: Into<String>>(message: S, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Create an invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an API error
    pub fn api_error(status: u16, message: String) -> Self {
        Self::Api { status, message }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status from a model server to an error
    pub fn from_status(status: reqwest::StatusCode, error_text: String) -> Self {
        match status {
            reqwest::StatusCode::BAD_REQUEST => Self::invalid_request(error_text),
            reqwest::StatusCode::UNAUTHORIZED => Self::authentication(error_text),
            reqwest::StatusCode::FORBIDDEN => Self::authentication(error_text),
            reqwest::StatusCode::NOT_FOUND => Self::api_error(404, error_text),
            reqwest::StatusCode::PAYLOAD_TOO_LARGE => {
                Self::invalid_request("Request too large")
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => Self::rate_limit(error_text, None),
            _ => Self::api_error(status.as_u16(), error_text),
        }
    }

    /// Whether the failure was the HTTP client giving up on a slow server
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network { source } if source.is_timeout())
    }
}
