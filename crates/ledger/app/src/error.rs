use fantom_apdu_core::{StatusWord, TransportError};

use crate::path::PathError;

/// Result type for Fantom application operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Fantom application operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The derivation path could not be parsed or encoded
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// The response is too short or its declared lengths overrun the buffer
    #[error("Malformed response: {0}")]
    MalformedResponse(&'static str),

    /// The device answered with a status word other than 90 00
    #[error("Device error {status}: {}", .status.description())]
    Device {
        /// Status word returned by the device
        status: StatusWord,
    },

    /// Transport errors, propagated unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request was refused locally by the derivation policy
    #[error("Path {path} denied by policy: {reason}")]
    PolicyDenied {
        /// Path that was refused
        path: String,
        /// Rule that refused it
        reason: &'static str,
    },

    /// The request could not be framed as an APDU
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

impl Error {
    /// Get the status word if the device refused the request
    pub const fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::Device { status } => Some(*status),
            _ => None,
        }
    }

    /// Whether the user declined the request on the device
    pub const fn is_rejected_by_user(&self) -> bool {
        match self {
            Self::Device { status } => status.is_rejected_by_user(),
            _ => false,
        }
    }
}

impl From<fantom_apdu_core::Error> for Error {
    fn from(error: fantom_apdu_core::Error) -> Self {
        use fantom_apdu_core::Error as Apdu;

        match error {
            Apdu::Transport(e) => Self::Transport(e),
            Apdu::MalformedResponse(what) => Self::MalformedResponse(what),
            Apdu::Status { status } => Self::Device { status },
            e @ (Apdu::InvalidCommandLength(_) | Apdu::DataTooLong { .. }) => {
                Self::InvalidCommand(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fantom_apdu_core::response::status::common as status;

    #[test]
    fn test_core_errors_map_onto_taxonomy() {
        let error: Error = fantom_apdu_core::Error::status(status::REJECTED_BY_USER).into();
        assert!(error.is_rejected_by_user());
        assert_eq!(error.status_word(), Some(status::REJECTED_BY_USER));
        assert_eq!(error.to_string(), "Device error 6E 06: Rejected by user");

        let error: Error = fantom_apdu_core::Error::malformed("short").into();
        assert!(matches!(error, Error::MalformedResponse("short")));

        let error: Error = fantom_apdu_core::Error::from(TransportError::Timeout).into();
        assert!(matches!(error, Error::Transport(TransportError::Timeout)));

        let error: Error = fantom_apdu_core::Error::DataTooLong { actual: 300, max: 255 }.into();
        assert!(matches!(error, Error::InvalidCommand(_)));
        assert_eq!(error.status_word(), None);
    }

    #[test]
    fn test_path_error_display() {
        let error: Error = PathError::TooDeep { depth: 11 }.into();
        assert_eq!(
            error.to_string(),
            "Invalid path: Path has 11 segments, at most 10 are supported"
        );
    }
}
