//! TCP transport for APDU exchanges
//!
//! This crate provides an implementation of the `Transport` trait from
//! `fantom-apdu-core` that talks to the APDU port of the Speculos device
//! emulator. USB/HID device access is left to other transports.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use fantom_apdu_core::prelude::*;
//! use fantom_apdu_transport_tcp::{TcpConfig, TcpTransport};
//!
//! let mut transport = TcpTransport::connect(TcpConfig::default().with_port(9999))?;
//!
//! let command = Command::new(Header::plain(0xE0, 0x01));
//! let response = Command::parse_response_raw(&transport.exchange(&command.to_bytes()?)?)?;
//! println!("Status: {}", response.status());
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod config;
mod error;
mod transport;

pub use config::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_HOST, DEFAULT_PORT, TcpConfig};
pub use error::TcpError;
pub use transport::{MAX_RESPONSE_LENGTH, TcpTransport};
