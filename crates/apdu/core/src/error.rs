//! Codec errors

use crate::response::status::StatusWord;
use crate::transport::TransportError;

/// `Result` defaulting to the codec [`Error`]
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Anything that can go wrong framing a request or reading a response
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error raised by the transport, propagated unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response is shorter than the structure it is parsed as, or declares
    /// inner lengths past the end of the buffer
    #[error("Malformed response: {0}")]
    MalformedResponse(&'static str),

    /// Device answered with a non-success status word
    #[error("Device error {status}: {}", .status.description())]
    Status {
        /// The offending status word
        status: StatusWord,
    },

    /// Serialized request is truncated or its `Lc` disagrees with the data
    #[error("Request of {0} bytes is not CLA INS P1 P2 Lc [data]")]
    InvalidCommandLength(usize),

    /// Command data exceeds what a short APDU can carry
    #[error("Payload of {actual} bytes exceeds the {max} byte limit")]
    DataTooLong {
        /// Length of the rejected payload
        actual: usize,
        /// Largest accepted payload
        max: usize,
    },
}

impl Error {
    /// [`Error::Status`] for `status`
    pub const fn status(status: StatusWord) -> Self {
        Self::Status { status }
    }

    /// [`Error::MalformedResponse`] naming what could not be read
    pub const fn malformed(message: &'static str) -> Self {
        Self::MalformedResponse(message)
    }

    /// Status word carried by [`Error::Status`]
    pub const fn status_word(&self) -> Option<StatusWord> {
        match self {
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }
}
