//! Values returned by the Fantom application

mod address;
mod public_key;
mod version;

pub use address::AddressResponse;
pub use public_key::ExtendedPublicKey;
pub use version::{Version, VersionInfo};
