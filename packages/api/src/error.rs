//! Error taxonomy for the remote boundary.
//!
//! Three families, per the failure model of the app:
//!
//! - [`Error::Remote`] — the backend or the network failed; surfaced to
//!   the user as a toast and never retried at this layer.
//! - [`Error::Validation`] — rejected client-side before any remote call,
//!   with no partial side effect.
//! - [`Error::Subscription`] — a realtime channel failed to establish or
//!   dropped; the app degrades to "not live" while plain fetches keep
//!   working.
//!
//! There are no fatal conditions: every failure degrades to stale or
//! missing data.

use serde::Deserialize;

pub type ApiResult<T> = Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{message}")]
    Remote {
        /// Backend error code, when the response body carried one.
        code: Option<String>,
        message: String,
    },
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("subscription failed: {0}")]
    Subscription(String),
}

impl Error {
    pub fn remote(code: Option<String>, message: impl Into<String>) -> Self {
        Error::Remote {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn subscription(message: impl Into<String>) -> Self {
        Error::Subscription(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Remote {
            code: None,
            message: err.to_string(),
        }
    }
}

/// Error body shape the backend's REST surface returns.
#[derive(Debug, Deserialize)]
pub(crate) struct RemoteErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_displays_its_message() {
        let err = Error::remote(Some("PGRST116".into()), "no rows returned");
        assert_eq!(err.to_string(), "no rows returned");
    }

    #[test]
    fn validation_errors_are_distinguishable() {
        assert!(Error::validation("too large").is_validation());
        assert!(!Error::remote(None, "boom").is_validation());
    }
}
