use derive_more::Display;

use crate::constants::FLAG_DEVELOPMENT_VERSION;
use crate::{Error, Result};

/// Application version (major.minor.patch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("{}.{}.{}", major, minor, patch)]
pub struct Version {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
    /// Patch version
    pub patch: u8,
}

impl Version {
    /// Create a new version
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Read the version from the first three bytes, ignoring anything after
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [major, minor, patch, ..] => Ok(Self::new(*major, *minor, *patch)),
            _ => Err(Error::MalformedResponse("version response shorter than 3 bytes")),
        }
    }
}

impl From<(u8, u8, u8)> for Version {
    fn from((major, minor, patch): (u8, u8, u8)) -> Self {
        Self::new(major, minor, patch)
    }
}

/// Version together with the optional build flags byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{version}")]
pub struct VersionInfo {
    /// Application version
    pub version: Version,
    /// Build flags, absent on firmware that does not send them
    pub flags: Option<u8>,
}

impl VersionInfo {
    /// Parse a status-checked GET_VERSION payload
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        let version = Version::parse(payload)?;
        Ok(Self {
            version,
            flags: payload.get(3).copied(),
        })
    }

    /// Whether the application is a development build
    pub const fn is_development(&self) -> bool {
        matches!(self.flags, Some(flags) if flags & FLAG_DEVELOPMENT_VERSION != 0)
    }
}
