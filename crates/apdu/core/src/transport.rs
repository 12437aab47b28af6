//! Moving request and response bytes between host and device
//!
//! Transports know nothing about headers or status words. Opening and closing
//! the underlying connection is up to each implementation.

use std::fmt;

use bytes::Bytes;
use tracing::{debug, trace};

/// Failure to move bytes to or from the device
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The device could not be reached
    #[error("Cannot reach device: {0}")]
    Connection(String),

    /// Sending or receiving broke off mid-exchange
    #[error("Exchange failed: {0}")]
    Transmission(String),

    /// The device side closed the connection
    #[error("Device closed the connection")]
    Disconnected,

    /// No answer within the configured time
    #[error("Device did not answer in time")]
    Timeout,

    /// Anything specific to one transport
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// [`TransportError::Connection`] from any message
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// [`TransportError::Transmission`] from any message
    pub fn transmission(message: impl Into<String>) -> Self {
        Self::Transmission(message.into())
    }

    /// [`TransportError::Other`] from any message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// A blocking byte pipe to a device
pub trait Transport: Send + fmt::Debug {
    /// Send request bytes and wait for the response bytes, status word included
    fn exchange(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        trace!(command = %hex::encode(command), "=>");
        let result = self.do_exchange(command);
        match &result {
            Ok(response) => trace!(response = %hex::encode(response), "<="),
            Err(error) => debug!(%error, "Exchange failed"),
        }
        result
    }

    /// The exchange itself; implementors provide this and callers use
    /// [`exchange`](Transport::exchange)
    fn do_exchange(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn do_exchange(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).do_exchange(command)
    }
}

/// Transport that replays queued responses and records what it was sent
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    /// Queued responses, front first
    pub responses: std::collections::VecDeque<Bytes>,
    /// Everything sent so far
    pub commands: Vec<Bytes>,
    /// Exchanges fail with [`TransportError::Disconnected`] when unset
    pub connected: bool,
}

#[cfg(any(test, feature = "mock"))]
impl MockTransport {
    /// Connected transport replaying `responses`
    pub fn new<I, B>(responses: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            commands: Vec::new(),
            connected: true,
        }
    }

    /// Connected transport with a single response
    pub fn with_response(response: impl Into<Bytes>) -> Self {
        Self::new([response.into()])
    }

    /// Connected transport answering `90 00` once
    pub fn with_success() -> Self {
        Self::with_response(Bytes::from_static(&[0x90, 0x00]))
    }

    /// Transport whose every exchange fails
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::default()
        }
    }

    /// Queue another response
    pub fn push_response(&mut self, response: impl Into<Bytes>) {
        self.responses.push_back(response.into());
    }

    /// Most recent request
    pub fn last_command(&self) -> Option<&Bytes> {
        self.commands.last()
    }
}

#[cfg(any(test, feature = "mock"))]
impl Transport for MockTransport {
    fn do_exchange(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        if !self.connected {
            return Err(TransportError::Disconnected);
        }

        self.commands.push(Bytes::copy_from_slice(command));

        self.responses
            .pop_front()
            .ok_or_else(|| TransportError::transmission("no scripted response left"))
    }
}
