//! Error type for server communication.

use thiserror::Error;

/// Any failure between sending a request and holding a decoded result.
///
/// DNS, refused connections, timeouts, non-2xx replies and undecodable
/// bodies all land here; callers never need to tell them apart.
#[derive(Debug, Error)]
pub enum ConnectivityError {
    /// Could not reach the server or the exchange was cut short
    #[error("could not connect to server: {0}")]
    Connect(String),

    /// Server answered with a non-success HTTP status
    #[error("server returned HTTP {0}")]
    Status(u16),

    /// Reply body was not the expected JSON shape
    #[error("malformed server response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ConnectivityError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            ConnectivityError::Connect(err.to_string())
        } else {
            ConnectivityError::Decode(err.to_string())
        }
    }
}

impl From<ureq::Error> for ConnectivityError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => ConnectivityError::Status(code),
            ureq::Error::Transport(t) => ConnectivityError::Connect(t.to_string()),
        }
    }
}
