use std::fmt;

use alloy_primitives::Address;
use bytes::Bytes;
use fantom_apdu_core::PayloadReader;

use crate::Result;

/// Public key and address returned by GET_ADDRESS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressResponse {
    /// Raw public key, empty when the device does not send one
    pub public_key: Bytes,
    /// Address blob as sent by the device
    pub address: Bytes,
}

impl AddressResponse {
    /// Parse `[pkLen][pk][addrLen][addr]`, ignoring anything after the address
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = PayloadReader::new(bytes);
        let public_key = reader.read_length_prefixed("public key runs past the response")?;
        let address = reader.read_length_prefixed("address runs past the response")?;

        Ok(Self {
            public_key: Bytes::copy_from_slice(public_key),
            address: Bytes::copy_from_slice(address),
        })
    }

    /// Public key as lowercase hex
    pub fn public_key_hex(&self) -> String {
        hex::encode(&self.public_key)
    }

    /// Address as `0x` prefixed lowercase hex
    pub fn address_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.address))
    }

    /// EIP-55 checksummed address when the blob is a raw 20-byte address
    pub fn checksummed(&self) -> Option<String> {
        Address::try_from(&self.address[..])
            .ok()
            .map(|address| address.to_checksum(None))
    }
}

impl fmt::Display for AddressResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.checksummed() {
            Some(address) => f.write_str(&address),
            None => f.write_str(&self.address_hex()),
        }
    }
}
