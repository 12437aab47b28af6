use bytes::Bytes;
use fantom_apdu_core::PayloadReader;

use crate::constants::CHAIN_CODE_LENGTH;
use crate::Result;

/// Public key and chain code returned by GET_PUBLIC_KEY
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    /// Raw public key
    pub public_key: Bytes,
    /// BIP-32 chain code
    pub chain_code: [u8; CHAIN_CODE_LENGTH],
}

impl ExtendedPublicKey {
    /// Parse `[keyLen][key][chain code]`, ignoring anything after the chain code
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = PayloadReader::new(bytes);
        let public_key = reader.read_length_prefixed("public key runs past the response")?;
        let chain_code = reader.read_array::<CHAIN_CODE_LENGTH>("chain code runs past the response")?;

        Ok(Self {
            public_key: Bytes::copy_from_slice(public_key),
            chain_code,
        })
    }

    /// Public key as lowercase hex
    pub fn public_key_hex(&self) -> String {
        hex::encode(&self.public_key)
    }

    /// Chain code as lowercase hex
    pub fn chain_code_hex(&self) -> String {
        hex::encode(self.chain_code)
    }
}
