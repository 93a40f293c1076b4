// ABOUTME: Error taxonomy for a failed exchange.
// ABOUTME: Every variant collapses to the same apology in the transcript; detail goes to the log.

use thiserror::Error;

/// Why an exchange did not produce an assistant reply.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The request could not be completed (connection refused, reset, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status code.
    #[error("endpoint returned status {0}")]
    Status(u16),

    /// The response body was not the expected JSON.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response carried an `error` field.
    #[error("endpoint reported an error: {0}")]
    Application(String),

    /// The response had neither `response` nor `error`.
    #[error("response payload has no response text")]
    MissingResponse,
}

impl ExchangeError {
    /// Short label for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ExchangeError::Transport(_) => "transport",
            ExchangeError::Status(_) => "status",
            ExchangeError::Decode(_) => "decode",
            ExchangeError::Application(_) => "application",
            ExchangeError::MissingResponse => "missing_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_code() {
        let err = ExchangeError::Status(503);
        assert_eq!(err.to_string(), "endpoint returned status 503");
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn decode_error_converts_from_serde() {
        let parse = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: ExchangeError = parse.into();
        assert_eq!(err.kind(), "decode");
        assert!(err.to_string().starts_with("malformed response"));
    }

    #[test]
    fn application_error_keeps_detail() {
        let err = ExchangeError::Application("boom".to_string());
        assert!(err.to_string().contains("boom"));
    }
}
