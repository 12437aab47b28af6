//! Fantom application commands
//!
//! Each instruction is a typed [`ApduCommand`](fantom_apdu_core::ApduCommand).
//! The free functions below are the plain codec: they build request bytes and
//! parse response bytes without touching a transport.

mod get_address;
mod get_public_key;
mod get_version;

pub use get_address::GetAddress;
pub use get_public_key::GetPublicKey;
pub use get_version::GetVersion;

use bytes::Bytes;
use fantom_apdu_core::ApduCommand;

use crate::Result;
use crate::constants::{CLA, ins};
use crate::path::EncodedPath;
use crate::types::{AddressResponse, ExtendedPublicKey, Version};

const GET_VERSION_REQUEST: [u8; 5] = [CLA, ins::GET_VERSION, 0x00, 0x00, 0x00];

/// `E0 01 00 00 00`
pub fn build_get_version_request() -> Bytes {
    Bytes::from_static(&GET_VERSION_REQUEST)
}

/// `E0 11 P1 00 Lc [count][path]`, P1 selecting on-device display
pub fn build_get_address_request(path: &EncodedPath, display: bool) -> Result<Bytes> {
    Ok(GetAddress::new(path, display)?.to_bytes()?)
}

/// `E0 10 00 00 Lc [count][path]`
pub fn build_get_public_key_request(path: &EncodedPath) -> Result<Bytes> {
    Ok(GetPublicKey::new(path)?.to_bytes()?)
}

/// Read `major minor patch` from the start of a GET_VERSION response
///
/// The trailing status word is not checked; use
/// [`GetVersion::parse_response_raw`](fantom_apdu_core::ApduCommand::parse_response_raw)
/// to turn a failure status into [`Error::Device`](crate::Error::Device).
pub fn parse_version(bytes: &[u8]) -> Result<Version> {
    Version::parse(bytes)
}

/// Split a GET_ADDRESS response into public key and address
///
/// The trailing status word is not checked; use
/// [`GetAddress::parse_response_raw`](fantom_apdu_core::ApduCommand::parse_response_raw)
/// to turn a failure status into [`Error::Device`](crate::Error::Device).
pub fn parse_address(bytes: &[u8]) -> Result<AddressResponse> {
    AddressResponse::parse(bytes)
}

/// Split a GET_PUBLIC_KEY response into public key and chain code
///
/// The trailing status word is not checked; use
/// [`GetPublicKey::parse_response_raw`](fantom_apdu_core::ApduCommand::parse_response_raw)
/// for that.
pub fn parse_public_key(bytes: &[u8]) -> Result<ExtendedPublicKey> {
    ExtendedPublicKey::parse(bytes)
}
