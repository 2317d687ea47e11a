use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown source: '{name}'. Available sources: {}", .available.join(", "))]
    UnsupportedSource {
        name: String,
        available: Vec<String>,
    },

    #[error("Error scraping {source_name} ({target}): {message}")]
    Extraction {
        source_name: String,
        target: String,
        message: String,
    },

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    pub fn unsupported_source(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnsupportedSource {
            name: name.into(),
            available,
        }
    }

    /// Wraps a fetch or parse failure with the source and the URL that was attempted.
    pub fn extraction(
        source_name: impl Into<String>,
        target: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::Extraction {
            source_name: source_name.into(),
            target: target.into(),
            message: message.to_string(),
        }
    }

    pub fn contract_violation(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }

    pub fn selector(selector: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// True for the one failure a caller can fix by asking for another source.
    pub fn is_unsupported_source(&self) -> bool {
        matches!(self, Self::UnsupportedSource { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
