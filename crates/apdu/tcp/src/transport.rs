//! TCP transport implementation

use std::fmt;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use bytes::{BufMut, Bytes, BytesMut};
use fantom_apdu_core::prelude::*;
use tracing::{debug, instrument, warn};

use crate::{config::TcpConfig, error::TcpError};

/// Length prefix of every frame on the emulator's APDU port
const LENGTH_PREFIX: usize = 4;

/// Upper bound on an announced response payload
pub const MAX_RESPONSE_LENGTH: usize = 64 * 1024;

/// Transport to communicate with the Speculos emulator
///
/// Requests are framed as a 4-byte big-endian length followed by the APDU.
/// Responses carry a 4-byte big-endian payload length, the payload and the
/// 2-byte status word, which the length does not count.
pub struct TcpTransport {
    /// Socket, if connected
    stream: Option<TcpStream>,
    /// Configuration
    config: TcpConfig,
}

impl fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TcpTransport")
            .field("endpoint", &self.config.endpoint())
            .field("connected", &self.stream.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl TcpTransport {
    /// Connect to the emulator described by `config`
    pub fn connect(config: TcpConfig) -> Result<Self, TcpError> {
        let mut transport = Self {
            stream: None,
            config,
        };
        transport.connect_stream()?;
        Ok(transport)
    }

    /// Establish the socket if there is none
    #[instrument(level = "debug", skip(self), fields(endpoint = %self.config.endpoint()))]
    fn connect_stream(&mut self) -> Result<(), TcpError> {
        if self.stream.is_some() {
            return Ok(());
        }

        let endpoint = self.config.endpoint();
        let addrs: Vec<_> = (self.config.host.as_str(), self.config.port)
            .to_socket_addrs()
            .map_err(|_| TcpError::Resolve(endpoint.clone()))?
            .collect();
        if addrs.is_empty() {
            return Err(TcpError::Resolve(endpoint));
        }

        let mut last_error = None;
        for addr in addrs {
            let attempt = match self.config.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    stream.set_read_timeout(self.config.read_timeout)?;
                    stream.set_nodelay(true)?;
                    debug!(%addr, "Connected");
                    self.stream = Some(stream);
                    return Ok(());
                }
                Err(e) => {
                    debug!(%addr, error = %e, "Connection attempt failed");
                    last_error = Some(e);
                }
            }
        }

        Err(TcpError::Connect {
            endpoint,
            source: last_error.unwrap_or_else(|| std::io::ErrorKind::NotConnected.into()),
        })
    }

    /// The endpoint this transport talks to
    pub fn endpoint(&self) -> String {
        self.config.endpoint()
    }

    /// Check if the transport currently holds a connection
    pub const fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Get the configuration
    pub const fn config(&self) -> &TcpConfig {
        &self.config
    }

    /// Send one framed command and read one framed response
    fn exchange_frame(&mut self, command: &[u8]) -> Result<Bytes, TcpError> {
        if self.stream.is_none() {
            if !self.config.auto_reconnect {
                return Err(TcpError::NotConnected);
            }
            self.connect_stream()?;
        }
        let stream = self.stream.as_mut().ok_or(TcpError::NotConnected)?;

        let length =
            u32::try_from(command.len()).map_err(|_| TcpError::RequestTooLarge(command.len()))?;
        let mut request = BytesMut::with_capacity(LENGTH_PREFIX + command.len());
        request.put_u32(length);
        request.put_slice(command);
        stream.write_all(&request)?;

        let mut prefix = [0u8; LENGTH_PREFIX];
        stream.read_exact(&mut prefix)?;
        let length = u32::from_be_bytes(prefix) as usize;
        if length > MAX_RESPONSE_LENGTH {
            return Err(TcpError::FrameTooLarge(length));
        }

        // payload plus the status word
        let mut response = vec![0u8; length + 2];
        stream.read_exact(&mut response)?;

        Ok(Bytes::from(response))
    }
}

impl Transport for TcpTransport {
    fn do_exchange(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        match self.exchange_frame(command) {
            Ok(response) => Ok(response),
            Err(e) => {
                // A half-read frame leaves the stream out of sync, drop it
                if matches!(e, TcpError::Io(_) | TcpError::FrameTooLarge(_)) {
                    warn!(error = %e, endpoint = %self.config.endpoint(), "Dropping connection");
                    if let Some(stream) = self.stream.take() {
                        let _ = stream.shutdown(Shutdown::Both);
                    }
                }
                Err(e.into())
            }
        }
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}
