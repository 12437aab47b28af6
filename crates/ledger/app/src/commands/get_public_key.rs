use bytes::Bytes;
use fantom_apdu_core::prelude::*;

use crate::constants::{CLA, ins};
use crate::path::EncodedPath;
use crate::types::ExtendedPublicKey;

/// GET_PUBLIC_KEY command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPublicKey {
    payload: Bytes,
}

impl GetPublicKey {
    /// Create a GET_PUBLIC_KEY command, failing if the path is too deep
    pub fn new(path: &EncodedPath) -> crate::Result<Self> {
        Ok(Self {
            payload: path.to_wire()?,
        })
    }
}

impl ApduCommand for GetPublicKey {
    type Success = ExtendedPublicKey;
    type Error = crate::Error;

    fn header(&self) -> Header {
        Header::plain(CLA, ins::GET_PUBLIC_KEY)
    }

    fn data(&self) -> &[u8] {
        &self.payload
    }

    fn parse_response(response: Response) -> Result<Self::Success, Self::Error> {
        let payload = response.into_payload()?;
        ExtendedPublicKey::parse(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;

    #[test]
    fn test_get_public_key_header() {
        let path = encode("44'/60'/0'").unwrap();
        let command = GetPublicKey::new(&path).unwrap();
        assert_eq!(command.header(), Header::new(0xE0, 0x10, 0x00, 0x00));
        assert_eq!(command.data()[0], 3);
        assert_eq!(command.encoded_len(), 18);

        assert!(GetPublicKey::new(&encode("0/1/2/3/4/5/6/7/8/9/10").unwrap()).is_err());
    }

    #[test]
    fn test_get_public_key_parse() {
        let mut raw = vec![0x02, 0xAA, 0xBB];
        raw.extend_from_slice(&[0x55; 32]);
        raw.extend_from_slice(&[0x90, 0x00]);

        let key = GetPublicKey::parse_response_raw(&raw).unwrap();
        assert_eq!(key.public_key.as_ref(), &[0xAA, 0xBB]);
        assert_eq!(key.chain_code, [0x55; 32]);
    }

    #[test]
    fn test_get_public_key_rejected() {
        let error = GetPublicKey::parse_response_raw(&[0x6E, 0x07]).unwrap_err();
        assert_eq!(error.status_word(), Some(status::REJECTED_BY_POLICY));
        assert!(!error.is_rejected_by_user());
    }
}
