//! Fantom application client
//!
//! This module provides the main interface for talking to the Fantom
//! application on a Ledger device over any [`Transport`].

use fantom_apdu_core::prelude::*;
use tracing::{Level, debug, info, instrument, warn};

use crate::bip44::{Policy, policy_for_get_address, policy_for_get_public_key};
use crate::commands::{GetAddress, GetPublicKey, GetVersion};
use crate::path::DerivationPath;
use crate::types::{AddressResponse, ExtendedPublicKey, VersionInfo};
use crate::{Error, Result};

/// How the client treats the derivation policy before sending a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum PolicyMode {
    /// Send every request as is
    Ignore,
    /// Log denied and unusual paths, then send anyway
    #[default]
    Warn,
    /// Refuse paths the device would deny
    Enforce,
}

/// Client configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Derivation policy handling
    pub policy: PolicyMode,
}

impl AppConfig {
    /// Set the derivation policy handling
    pub const fn with_policy(mut self, policy: PolicyMode) -> Self {
        self.policy = policy;
        self
    }
}

/// Fantom application on a Ledger device
#[derive(Debug)]
pub struct FantomApp<T: Transport> {
    /// Transport to the device
    transport: T,
    /// Client configuration
    config: AppConfig,
}

impl<T: Transport> FantomApp<T> {
    /// Create a client with the default configuration
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, AppConfig::default())
    }

    /// Create a client with an explicit configuration
    pub const fn with_config(transport: T, config: AppConfig) -> Self {
        Self { transport, config }
    }

    /// Send a typed command and parse its response
    pub fn execute<C>(&mut self, command: &C) -> std::result::Result<C::Success, C::Error>
    where
        C: ApduCommand + std::fmt::Debug,
    {
        debug!(?command, "Executing command");

        let request = command.to_bytes()?;
        let response = self
            .transport
            .exchange(&request)
            .map_err(|e| C::Error::from(fantom_apdu_core::Error::from(e)))?;

        let response = Response::from_bytes(&response)?;
        if !response.is_success() {
            log_status(response.status());
        }

        C::parse_response(response)
    }

    /// Read the application version
    #[instrument(level = "debug", skip(self))]
    pub fn get_version(&mut self) -> Result<VersionInfo> {
        let info = self.execute(&GetVersion::new())?;
        debug!(version = %info.version, flags = ?info.flags, "Application version");
        Ok(info)
    }

    /// Derive the address for `path`, showing it on the device when `display` is set
    #[instrument(level = "debug", skip(self, path, show_on_device), fields(path = %path, display = show_on_device))]
    pub fn get_address(&mut self, path: &DerivationPath, show_on_device: bool) -> Result<AddressResponse> {
        self.check_policy(path, policy_for_get_address(path))?;

        // Create the command
        let cmd = GetAddress::new(&path.encode(), show_on_device)?;

        // Execute the command
        let response = self.execute(&cmd)?;

        debug!(address = %response, "Derived address");
        Ok(response)
    }

    /// Derive the public key and chain code for `path`
    #[instrument(level = "debug", skip(self, path), fields(path = %path))]
    pub fn get_public_key(&mut self, path: &DerivationPath) -> Result<ExtendedPublicKey> {
        self.check_policy(path, policy_for_get_public_key(path))?;

        let cmd = GetPublicKey::new(&path.encode())?;
        self.execute(&cmd)
    }

    /// Apply the configured policy handling to a verdict
    fn check_policy(&self, path: &DerivationPath, policy: Policy) -> Result<()> {
        match (self.config.policy, policy) {
            (PolicyMode::Ignore, _) | (_, Policy::Prompt) => Ok(()),
            (PolicyMode::Enforce, Policy::Deny(reason)) => {
                warn!(%path, reason, "Refusing path denied by the device policy");
                Err(Error::PolicyDenied {
                    path: path.to_string(),
                    reason,
                })
            }
            (_, Policy::Deny(reason)) => {
                warn!(%path, reason, "The device is expected to deny this path");
                Ok(())
            }
            (_, Policy::Warn(reason)) => {
                warn!(%path, reason, "The device will warn about this path");
                Ok(())
            }
        }
    }

    /// Get the configuration
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the transport
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the client and return the transport
    pub fn into_transport(self) -> T {
        self.transport
    }
}

fn log_status(status: StatusWord) {
    let level = status.tracing_level();
    if level == Level::WARN {
        warn!(%status, description = status.description(), "Device returned an error");
    } else if level == Level::INFO {
        info!(%status, description = status.description(), "Device declined the request");
    } else {
        debug!(%status, description = status.description(), "Device returned a status");
    }
}
