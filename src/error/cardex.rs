use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum CardexError {
    /// The request never produced a readable response (DNS, connect, timeout, body read).
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered `success: false`.
    #[error("{0}")]
    Application(String),

    /// A payload that does not match the card schema, in either direction.
    #[error("{0}")]
    Validation(String),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl CardexError {
    /// Text surfaced to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            CardexError::Network(e) if e.is_timeout() => "request timed out".to_string(),
            CardexError::Network(e) if e.is_connect() => {
                "could not connect to the catalog server".to_string()
            }
            CardexError::Validation(msg) => format!("invalid response or input: {msg}"),
            other => other.to_string(),
        }
    }

    pub fn is_application(&self) -> bool {
        matches!(self, CardexError::Application(_))
    }
}
