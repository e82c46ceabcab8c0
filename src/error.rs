//! Error type shared by the console library and binary.

/// Errors produced by configuration, transport, and decoding.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The HTTP request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body was not the expected JSON.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The backend returned a non-success HTTP status without a usable body.
    #[error("backend responded with status {status}")]
    ApiResponse { status: u16, body: String },

    /// Reading operator input failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}
