//! Constants used by the Fantom Ledger application protocol

/// Class byte of every Fantom application instruction
pub const CLA: u8 = 0xE0;

/// Instruction codes
pub mod ins {
    /// Read the application version
    pub const GET_VERSION: u8 = 0x01;
    /// Derive the public key and chain code for a path
    pub const GET_PUBLIC_KEY: u8 = 0x10;
    /// Derive the address for a path
    pub const GET_ADDRESS: u8 = 0x11;
}

/// P1 for GET_ADDRESS: return the address without showing it
pub const P1_RETURN_ADDRESS: u8 = 0x01;

/// P1 for GET_ADDRESS: show the address on the device for confirmation
pub const P1_DISPLAY_ADDRESS: u8 = 0x02;

/// Version flag set on development builds of the application
pub const FLAG_DEVELOPMENT_VERSION: u8 = 0x01;

/// Length of a BIP-32 chain code
pub const CHAIN_CODE_LENGTH: usize = 32;

/// Path derived when the caller does not name one
pub const DEFAULT_PATH: &str = "44'/60'/0'/0/0";
