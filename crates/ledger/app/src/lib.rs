//! Host side of the Fantom Ledger application
//!
//! The crate has two layers. The codec turns derivation paths and requests
//! into APDU bytes and parses the device's answers, without any I/O:
//!
//! ```
//! use fantom_ledger::{build_get_address_request, encode, parse_version};
//!
//! let path = encode("44'/60'/0'/0/0").unwrap();
//! let request = build_get_address_request(&path, true).unwrap();
//! assert_eq!(&request[..6], &[0xE0, 0x11, 0x02, 0x00, 0x15, 0x05]);
//!
//! let version = parse_version(&[1, 2, 3, 0x90, 0x00]).unwrap();
//! assert_eq!(version.to_string(), "1.2.3");
//! ```
//!
//! [`FantomApp`] sits on top and runs those requests over a
//! [`Transport`](fantom_apdu_core::Transport), checking the status word of
//! every answer.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod application;
pub mod bip44;
mod commands;
mod constants;
mod error;
mod path;
mod types;

pub use application::{AppConfig, FantomApp, PolicyMode};
pub use bip44::{Policy, policy_for_get_address, policy_for_get_public_key};
pub use commands::*;
pub use constants::*;
pub use error::{Error, Result};
pub use path::{
    ChildIndex, DerivationPath, EncodedPath, HARDENED_BIT, MAX_INDEX, MAX_PATH_DEPTH, PathError,
    encode,
};
pub use types::{AddressResponse, ExtendedPublicKey, Version, VersionInfo};
