// core/src/error/client_error.rs
use std::time::Duration;

use thiserror::Error;

/// Failures of a single request to the optimization service. None of these
/// reach the UI as errors; clients turn them into one `error` event using
/// [`ClientError::user_message`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connection failed: {message}")]
    Connect { message: String },

    #[error("unexpected status: {status}")]
    HttpStatus { status: u16, message: String },

    #[error("stream read failed: {message}")]
    Read { message: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("response decode error")]
    Decode(#[source] serde_json::Error),
}

impl ClientError {
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Connect { message } => message.clone(),
            ClientError::HttpStatus { message, .. } => message.clone(),
            ClientError::Read { message } => format!("Connection lost: {message}"),
            ClientError::Timeout(d) => {
                format!("Optimization timed out after {} seconds.", seconds(*d))
            }
            ClientError::Decode(e) => format!("Malformed response from server: {e}"),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }
}

/// Whole seconds print as an integer, anything finer keeps one decimal.
fn seconds(d: Duration) -> String {
    if d.subsec_millis() == 0 {
        d.as_secs().to_string()
    } else {
        format!("{:.1}", d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_uses_whole_seconds() {
        let e = ClientError::Timeout(Duration::from_millis(150_000));
        assert_eq!(e.user_message(), "Optimization timed out after 150 seconds.");
        assert!(e.is_timeout());
    }

    #[test]
    fn sub_second_timeout_is_not_reported_as_zero() {
        let e = ClientError::Timeout(Duration::from_millis(200));
        assert_eq!(e.user_message(), "Optimization timed out after 0.2 seconds.");

        let e = ClientError::Timeout(Duration::from_millis(1_500));
        assert_eq!(e.user_message(), "Optimization timed out after 1.5 seconds.");
    }

    #[test]
    fn status_message_is_passed_through() {
        let e = ClientError::HttpStatus {
            status: 500,
            message: "Server error: boom".into(),
        };
        assert_eq!(e.user_message(), "Server error: boom");
        assert!(!e.is_timeout());
    }
}
