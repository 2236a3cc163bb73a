use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("session expired; sign in at {login}")]
    Unauthorized { login: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// True when the failure is the global 401/403 signal that must
    /// redirect the whole screen rather than surface inline.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ConsoleError::Unauthorized { .. })
    }

    /// Inline message shown in the panel that triggered the request.
    pub fn inline_message(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
