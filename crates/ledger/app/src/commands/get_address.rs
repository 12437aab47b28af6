use bytes::Bytes;
use fantom_apdu_core::prelude::*;

use crate::constants::{CLA, P1_DISPLAY_ADDRESS, P1_RETURN_ADDRESS, ins};
use crate::path::EncodedPath;
use crate::types::AddressResponse;

/// GET_ADDRESS command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAddress {
    /// `[count][encoded path]`
    payload: Bytes,
    /// Show the address on the device
    display: bool,
}

impl GetAddress {
    /// Create a GET_ADDRESS command, failing if the path is too deep
    pub fn new(path: &EncodedPath, display: bool) -> crate::Result<Self> {
        Ok(Self {
            payload: path.to_wire()?,
            display,
        })
    }

    /// Whether the device will show the address for confirmation
    pub const fn display(&self) -> bool {
        self.display
    }
}

impl ApduCommand for GetAddress {
    type Success = AddressResponse;
    type Error = crate::Error;

    fn header(&self) -> Header {
        let p1 = if self.display {
            P1_DISPLAY_ADDRESS
        } else {
            P1_RETURN_ADDRESS
        };
        Header::plain(CLA, ins::GET_ADDRESS).with_p1(p1)
    }

    fn data(&self) -> &[u8] {
        &self.payload
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        let payload = response.into_payload()?;
        AddressResponse::parse(&payload)
    }
}
