//! Utility functions and types for the Fantom Ledger CLI

pub mod display;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use fantom_apdu_transport_tcp::{DEFAULT_HOST, DEFAULT_PORT, TcpConfig, TcpTransport};
use fantom_ledger::{AppConfig, DEFAULT_PATH, DerivationPath, FantomApp};
use tracing::debug;

/// Arguments for the emulator connection
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Host of the emulator's APDU port
    #[arg(long, env = "FANTOM_LEDGER_HOST", default_value = DEFAULT_HOST, global = true)]
    pub host: String,

    /// Port of the emulator's APDU port
    #[arg(long, env = "FANTOM_LEDGER_PORT", default_value_t = DEFAULT_PORT, global = true)]
    pub port: u16,

    /// Read timeout in milliseconds, at least 1 (waits for the user indefinitely if unset)
    #[arg(
        long,
        env = "FANTOM_LEDGER_TIMEOUT_MS",
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub timeout_ms: Option<u64>,
}

impl ConnectionArgs {
    /// Transport configuration for these arguments
    pub fn tcp_config(&self) -> TcpConfig {
        TcpConfig::default()
            .with_host(self.host.as_str())
            .with_port(self.port)
            .with_read_timeout(self.timeout_ms.map(Duration::from_millis))
    }
}

/// Arguments for derivation path
#[derive(Args, Debug, Clone)]
pub struct DerivationArgs {
    /// Derivation path (e.g. 44'/60'/0'/0/0)
    #[arg(long, default_value = DEFAULT_PATH)]
    pub path: String,
}

impl DerivationArgs {
    /// Parse the derivation path
    pub fn parse_derivation_path(&self) -> Result<DerivationPath> {
        DerivationPath::parse(&self.path)
            .with_context(|| format!("Invalid derivation path {:?}", self.path))
    }
}

/// Connect to the emulator and wrap the transport in a client
pub fn connect(connection: &ConnectionArgs, config: AppConfig) -> Result<FantomApp<TcpTransport>> {
    let tcp_config = connection.tcp_config();
    debug!(endpoint = %tcp_config.endpoint(), "Connecting");

    let transport = TcpTransport::connect(tcp_config)
        .with_context(|| format!("Failed to connect to {}:{}", connection.host, connection.port))?;

    Ok(FantomApp::with_config(transport, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tcp_config_from_args() {
        let args = ConnectionArgs {
            host: "speculos".to_string(),
            port: 41000,
            timeout_ms: Some(1500),
        };
        let config = args.tcp_config();
        assert_eq!(config.endpoint(), "speculos:41000");
        assert_eq!(config.read_timeout, Some(Duration::from_millis(1500)));

        let args = ConnectionArgs {
            timeout_ms: None,
            ..args
        };
        assert_eq!(args.tcp_config().read_timeout, None);
    }

    #[test]
    fn test_parse_derivation_path() {
        let args = DerivationArgs {
            path: DEFAULT_PATH.to_string(),
        };
        assert_eq!(args.parse_derivation_path().unwrap().len(), 5);

        let args = DerivationArgs {
            path: "m/44'".to_string(),
        };
        let error = args.parse_derivation_path().unwrap_err();
        assert!(error.to_string().contains("m/44'"));
    }
}
