//! Error types for the TCP transport

use std::io;

use fantom_apdu_core::TransportError;

/// TCP-specific errors
#[derive(Debug, thiserror::Error)]
pub enum TcpError {
    /// I/O error on the socket
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The endpoint did not resolve to any address
    #[error("Could not resolve {0}")]
    Resolve(String),

    /// No address of the endpoint accepted the connection
    #[error("Could not connect to {endpoint}: {source}")]
    Connect {
        /// Endpoint that refused
        endpoint: String,
        /// Last connection error
        source: io::Error,
    },

    /// The connection dropped and reconnecting is disabled
    #[error("Not connected")]
    NotConnected,

    /// The peer announced a frame larger than any APDU response
    #[error("Response frame too large: {0} bytes")]
    FrameTooLarge(usize),

    /// The request does not fit the length prefix
    #[error("Request too large: {0} bytes")]
    RequestTooLarge(usize),
}

impl From<TcpError> for TransportError {
    fn from(error: TcpError) -> Self {
        match error {
            TcpError::Io(e) => match e.kind() {
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout,
                io::ErrorKind::UnexpectedEof
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe => Self::Disconnected,
                _ => Self::transmission(e.to_string()),
            },
            TcpError::Resolve(_) | TcpError::Connect { .. } => Self::connection(error.to_string()),
            TcpError::NotConnected => Self::Disconnected,
            TcpError::FrameTooLarge(_) | TcpError::RequestTooLarge(_) => {
                Self::transmission(error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mapping() {
        let timeout: TransportError = TcpError::Io(io::ErrorKind::TimedOut.into()).into();
        assert!(matches!(timeout, TransportError::Timeout));

        let eof: TransportError = TcpError::Io(io::ErrorKind::UnexpectedEof.into()).into();
        assert!(matches!(eof, TransportError::Disconnected));

        let other: TransportError = TcpError::Io(io::ErrorKind::InvalidData.into()).into();
        assert!(matches!(other, TransportError::Transmission(_)));
    }

    #[test]
    fn test_connect_error_mapping() {
        let error: TransportError = TcpError::Connect {
            endpoint: "127.0.0.1:9999".to_string(),
            source: io::ErrorKind::ConnectionRefused.into(),
        }
        .into();
        match error {
            TransportError::Connection(message) => assert!(message.contains("127.0.0.1:9999")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
