//! Configuration options for the TCP transport

use std::time::Duration;

/// Host the Speculos emulator listens on by default
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default Speculos APDU port
pub const DEFAULT_PORT: u16 = 9999;

/// Default time allowed for establishing the connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration options for TCP transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpConfig {
    /// Host name or IP address of the emulator
    pub host: String,

    /// APDU port of the emulator
    pub port: u16,

    /// Time allowed for establishing the connection
    pub connect_timeout: Option<Duration>,

    /// Time allowed for a single response
    ///
    /// `None` waits forever, which is what on-device confirmation needs.
    pub read_timeout: Option<Duration>,

    /// Reconnect on the next exchange after the connection dropped
    pub auto_reconnect: bool,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            read_timeout: None,
            auto_reconnect: true,
        }
    }
}

impl TcpConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host
    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the connect timeout
    pub const fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the read timeout
    pub const fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set whether to automatically reconnect
    pub const fn with_auto_reconnect(mut self, auto_reconnect: bool) -> Self {
        self.auto_reconnect = auto_reconnect;
        self
    }

    /// `host:port` form, used for logging and errors
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TcpConfig::default();
        assert_eq!(config.endpoint(), "127.0.0.1:9999");
        assert_eq!(config.connect_timeout, Some(DEFAULT_CONNECT_TIMEOUT));
        assert!(config.read_timeout.is_none());
        assert!(config.auto_reconnect);
    }

    #[test]
    fn test_builder() {
        let config = TcpConfig::new()
            .with_host("speculos")
            .with_port(40000)
            .with_read_timeout(Some(Duration::from_millis(250)))
            .with_auto_reconnect(false);
        assert_eq!(config.endpoint(), "speculos:40000");
        assert_eq!(config.read_timeout, Some(Duration::from_millis(250)));
        assert!(!config.auto_reconnect);
    }
}
