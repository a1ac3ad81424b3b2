use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Search request failed: {message}")]
    Search { message: String, status: Option<u16> },

    #[error("Invalid search response: {0}")]
    InvalidResponse(String),

    #[error("No access token configured (set DRIVE_DUPER_ACCESS_TOKEN)")]
    MissingAccessToken,

    #[error("{0}")]
    InvalidInput(String),
}

impl Error {
    /// Input errors halt the process before a sweep starts; everything else is
    /// scoped to a single file.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::MissingAccessToken | Error::InvalidInput(_)
        )
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Error::Search {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Error::Search {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidResponse(err.to_string())
    }
}
