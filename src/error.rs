//! Errors raised before a remote call is made. They are shown on the result
//! page, never returned as an HTTP error.
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A required form field was empty.
    #[error("{operation} needs more input parameters")]
    MissingInput { operation: &'static str },

    /// No registered handle under this session id.
    #[error(
        "Login session {0} does not exist - login using users/login/user and click the SDK button"
    )]
    UnknownSession(String),

    /// The handle was registered but has been idle too long.
    #[error("Login session {0} has expired - login again using users/login/user")]
    ExpiredSession(String),

    /// `/url/<target>` named neither `api` nor `sdk`.
    #[error("url/{0} is not a node URL, use url/api or url/sdk")]
    UnknownUrlTarget(String),
}
