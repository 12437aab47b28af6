use fantom_apdu_core::prelude::*;

use crate::constants::{CLA, ins};
use crate::types::VersionInfo;

/// GET_VERSION command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetVersion;

impl GetVersion {
    /// Create a GET_VERSION command
    pub const fn new() -> Self {
        Self
    }
}

impl ApduCommand for GetVersion {
    type Success = VersionInfo;
    type Error = crate::Error;

    fn header(&self) -> Header {
        Header::plain(CLA, ins::GET_VERSION)
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        let payload = response.into_payload()?;
        VersionInfo::from_payload(&payload)
    }
}
