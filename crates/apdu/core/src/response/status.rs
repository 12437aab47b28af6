//! Status words returned by Ledger applications
//!
//! The Fantom application reports its own failures in the `6E xx` range; the
//! Ledger OS and the dashboard answer with ISO 7816 style codes before the
//! request ever reaches the application.

use std::fmt;

use tracing::Level;

/// Two byte trailer of every response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// High byte
    pub sw1: u8,
    /// Low byte
    pub sw2: u8,
}

impl StatusWord {
    /// Build from the two trailer bytes
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Build from the big-endian `u16` form, e.g. `0x6E06`
    pub const fn from_u16(code: u16) -> Self {
        let [sw1, sw2] = code.to_be_bytes();
        Self::new(sw1, sw2)
    }

    /// Big-endian `u16` form
    pub const fn to_u16(&self) -> u16 {
        u16::from_be_bytes([self.sw1, self.sw2])
    }

    /// `90 00`
    pub const fn is_success(&self) -> bool {
        self.to_u16() == 0x9000
    }

    /// Raised by the Fantom application itself rather than the OS
    pub const fn is_application_error(&self) -> bool {
        matches!(self.to_u16(), 0x6E01..=0x6E08)
    }

    /// The user declined the request on the device
    pub const fn is_rejected_by_user(&self) -> bool {
        matches!(self.to_u16(), 0x6E06 | 0x6985)
    }

    /// The device is locked and needs the PIN first
    pub const fn is_device_locked(&self) -> bool {
        matches!(self.to_u16(), 0x6E08 | 0x5515)
    }

    /// Level at which a response carrying this status should be logged
    ///
    /// User decisions are expected outcomes, everything else is a failure.
    pub const fn tracing_level(&self) -> Level {
        if self.is_success() {
            Level::DEBUG
        } else if self.is_rejected_by_user() || self.is_device_locked() {
            Level::INFO
        } else {
            Level::WARN
        }
    }

    /// Human readable meaning
    pub const fn description(&self) -> &'static str {
        match self.to_u16() {
            0x9000 => "Success",

            0x6E01 => "Bad request header",
            0x6E02 => "Unknown CLA",
            0x6E03 => "Unknown INS",
            0x6E04 => "Request is not valid in the current context",
            0x6E05 => "Request contains invalid P1, P2, or data",
            0x6E06 => "Rejected by user",
            0x6E07 => "Rejected by security policy",
            0x6E08 => "Device is locked",

            0x5515 => "Device is locked",
            0x6511 => "Application is not open",
            0x6D00 | 0x6D02 => "Application is not running",
            0x6E00 => "Class not supported",
            0x6700 => "Wrong length",
            0x6982 => "Security status not satisfied",
            0x6985 => "Conditions of use not satisfied",
            0x6A80 => "Incorrect data",
            0x6A86 | 0x6B00 => "Incorrect parameters P1-P2",
            0x6F00 => "Technical problem",

            _ => "Unknown status word",
        }
    }
}

impl From<(u8, u8)> for StatusWord {
    fn from((sw1, sw2): (u8, u8)) -> Self {
        Self::new(sw1, sw2)
    }
}

impl From<u16> for StatusWord {
    fn from(code: u16) -> Self {
        Self::from_u16(code)
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        status.to_u16()
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.sw1, self.sw2)
    }
}

/// Status words of the Fantom application
pub mod common {
    use super::StatusWord;

    /// `90 00`
    pub const SUCCESS: StatusWord = StatusWord::from_u16(0x9000);

    /// `6E 01`
    pub const BAD_REQUEST_HEADER: StatusWord = StatusWord::from_u16(0x6E01);

    /// `6E 02`
    pub const UNKNOWN_CLA: StatusWord = StatusWord::from_u16(0x6E02);

    /// `6E 03`
    pub const UNKNOWN_INS: StatusWord = StatusWord::from_u16(0x6E03);

    /// `6E 04`, e.g. a request arriving in the middle of another flow
    pub const INVALID_STATE: StatusWord = StatusWord::from_u16(0x6E04);

    /// `6E 05`, a bad P1/P2 or a path the application cannot parse
    pub const INVALID_DATA: StatusWord = StatusWord::from_u16(0x6E05);

    /// `6E 06`
    pub const REJECTED_BY_USER: StatusWord = StatusWord::from_u16(0x6E06);

    /// `6E 07`, the derivation path is outside what the application allows
    pub const REJECTED_BY_POLICY: StatusWord = StatusWord::from_u16(0x6E07);

    /// `6E 08`
    pub const DEVICE_LOCKED: StatusWord = StatusWord::from_u16(0x6E08);
}
