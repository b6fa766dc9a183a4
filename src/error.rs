//! Error handling for the career advisor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Error reading resume document: {0}")]
    Extraction(String),

    #[error("Error communicating with the AI model: {0}")]
    Service(String),

    /// The model answered, but the answer is not a JSON object.
    /// `raw` is the reply exactly as received, before fence stripping.
    #[error("AI model returned a malformed response: {source}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

impl AdvisorError {
    /// Raw model output for diagnosis, only present when a reply was actually received.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            AdvisorError::MalformedResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Whether retrying the same remote call could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AdvisorError::Service(_))
    }
}

impl From<reqwest::Error> for AdvisorError {
    fn from(err: reqwest::Error) -> Self {
        AdvisorError::Service(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_only_for_malformed() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = AdvisorError::MalformedResponse {
            source: parse_err,
            raw: "not json".to_string(),
        };
        assert_eq!(err.raw_response(), Some("not json"));

        let err = AdvisorError::Service("connection refused".to_string());
        assert!(err.raw_response().is_none());
    }

    #[test]
    fn test_only_service_errors_are_retryable() {
        assert!(AdvisorError::Service("503".into()).is_retryable());
        assert!(!AdvisorError::Extraction("bad".into()).is_retryable());
        assert!(!AdvisorError::Validation("empty".into()).is_retryable());
    }
}
