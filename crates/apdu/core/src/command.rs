//! Request framing
//!
//! Ledger applications always receive the `Lc` byte, even when the payload
//! is empty, so every serialized request is `CLA INS P1 P2 Lc [data]`.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{Error, Response};

/// Size of the `CLA INS P1 P2` header
pub const HEADER_LENGTH: usize = 4;

/// Largest payload a short APDU can carry
pub const MAX_DATA_LENGTH: usize = u8::MAX as usize;

/// The four header bytes of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    /// Application class
    pub cla: u8,
    /// Instruction
    pub ins: u8,
    /// First parameter
    pub p1: u8,
    /// Second parameter
    pub p2: u8,
}

impl Header {
    /// Header with explicit parameters
    pub const fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self { cla, ins, p1, p2 }
    }

    /// Header with both parameters zero
    pub const fn plain(cla: u8, ins: u8) -> Self {
        Self::new(cla, ins, 0x00, 0x00)
    }

    /// Same header with P1 replaced
    pub const fn with_p1(self, p1: u8) -> Self {
        Self { p1, ..self }
    }

    /// Wire form
    pub const fn to_array(self) -> [u8; HEADER_LENGTH] {
        [self.cla, self.ins, self.p1, self.p2]
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CLA={:02X} INS={:02X} P1={:02X} P2={:02X}",
            self.cla, self.ins, self.p1, self.p2
        )
    }
}

/// A request with a typed response
pub trait ApduCommand {
    /// Parsed payload of a successful response
    type Success;

    /// Error produced while parsing the response
    type Error: From<Error> + fmt::Debug;

    /// Request header
    fn header(&self) -> Header;

    /// Request payload, at most [`MAX_DATA_LENGTH`] bytes
    fn data(&self) -> &[u8] {
        &[]
    }

    /// Length of the serialized request
    fn encoded_len(&self) -> usize {
        HEADER_LENGTH + 1 + self.data().len()
    }

    /// Serialize as `CLA INS P1 P2 Lc [data]`
    ///
    /// Fails with [`Error::DataTooLong`] when the payload does not fit `Lc`.
    fn to_bytes(&self) -> Result<Bytes, Error> {
        let data = self.data();
        let lc = u8::try_from(data.len()).map_err(|_| Error::DataTooLong {
            actual: data.len(),
            max: MAX_DATA_LENGTH,
        })?;

        let mut buffer = BytesMut::with_capacity(self.encoded_len());
        buffer.put_slice(&self.header().to_array());
        buffer.put_u8(lc);
        buffer.put_slice(data);
        Ok(buffer.freeze())
    }

    /// Untyped copy of this request
    fn to_command(&self) -> Command {
        Command {
            header: self.header(),
            data: Bytes::copy_from_slice(self.data()),
        }
    }

    /// Turn a response into the typed result
    fn parse_response(response: Response) -> Result<Self::Success, Self::Error>;

    /// Same as [`parse_response`](Self::parse_response), starting from raw bytes
    fn parse_response_raw(bytes: &[u8]) -> Result<Self::Success, Self::Error> {
        Self::parse_response(Response::from_bytes(bytes)?)
    }
}

/// Untyped request, answered with the bare [`Response`]
///
/// The payload never exceeds [`MAX_DATA_LENGTH`] bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    header: Header,
    data: Bytes,
}

impl Command {
    /// Request without a payload
    pub const fn new(header: Header) -> Self {
        Self {
            header,
            data: Bytes::new(),
        }
    }

    /// Attach a payload, refusing more than [`MAX_DATA_LENGTH`] bytes
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Result<Self, Error> {
        let data = data.into();
        if data.len() > MAX_DATA_LENGTH {
            return Err(Error::DataTooLong {
                actual: data.len(),
                max: MAX_DATA_LENGTH,
            });
        }
        self.data = data;
        Ok(self)
    }

    /// Header bytes
    pub const fn header(&self) -> Header {
        self.header
    }

    /// Payload, empty when the request carries none
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Parse a serialized request
    ///
    /// The input must hold the header, the `Lc` byte and exactly `Lc` bytes of data.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let invalid = || Error::InvalidCommandLength(bytes.len());

        let (&[cla, ins, p1, p2, lc], data) = bytes.split_first_chunk::<5>().ok_or_else(invalid)?;
        if data.len() != lc as usize {
            return Err(invalid());
        }

        Ok(Self {
            header: Header::new(cla, ins, p1, p2),
            data: Bytes::copy_from_slice(data),
        })
    }
}

impl ApduCommand for Command {
    type Success = Response;
    type Error = Error;

    fn header(&self) -> Header {
        self.header
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn parse_response(response: Response) -> Result<Response, Error> {
        Ok(response)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Lc={:02X}", self.header, self.data.len())?;
        if !self.data.is_empty() {
            write!(f, " DATA={}", hex::encode_upper(&self.data))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_with_payload() {
        let command = Command::new(Header::plain(0xE0, 0x10))
            .with_data(vec![0x01, 0x80, 0x00, 0x00, 0x2C])
            .unwrap();

        assert_eq!(
            command.to_bytes().unwrap().as_ref(),
            &[0xE0, 0x10, 0x00, 0x00, 0x05, 0x01, 0x80, 0x00, 0x00, 0x2C]
        );
        assert_eq!(command.encoded_len(), 10);
    }

    #[test]
    fn test_empty_payload_keeps_lc() {
        let command = Command::new(Header::plain(0xE0, 0x01));
        assert_eq!(command.to_bytes().unwrap().as_ref(), &[0xE0, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(command.encoded_len(), 5);
    }

    #[test]
    fn test_payload_limit() {
        let header = Header::new(0xE0, 0x11, 0x02, 0x00);
        assert!(matches!(
            Command::new(header).with_data(vec![0u8; 256]),
            Err(Error::DataTooLong { actual: 256, max: 255 })
        ));
        assert!(Command::new(header).with_data(vec![0u8; 255]).is_ok());
    }

    struct Oversized;

    impl ApduCommand for Oversized {
        type Success = Response;
        type Error = Error;

        fn header(&self) -> Header {
            Header::plain(0xE0, 0x11)
        }

        fn data(&self) -> &[u8] {
            &[0u8; 300]
        }

        fn parse_response(response: Response) -> Result<Response, Error> {
            Ok(response)
        }
    }

    #[test]
    fn test_oversized_payload_does_not_serialize() {
        assert!(matches!(
            Oversized.to_bytes(),
            Err(Error::DataTooLong { actual: 300, max: 255 })
        ));
        assert!(matches!(
            Oversized.to_command().to_bytes(),
            Err(Error::DataTooLong { actual: 300, .. })
        ));
    }

    #[test]
    fn test_from_bytes() {
        let command = Command::from_bytes(&[0xE0, 0x01, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(command.header(), Header::plain(0xE0, 0x01));
        assert!(command.data().is_empty());

        let command = Command::from_bytes(&[0xE0, 0x11, 0x02, 0x00, 0x03, 0x01, 0x02, 0x03]).unwrap();
        assert_eq!(command.header(), Header::plain(0xE0, 0x11).with_p1(0x02));
        assert_eq!(command.data(), &[0x01, 0x02, 0x03]);
        assert_eq!(Command::from_bytes(&command.to_bytes().unwrap()).unwrap(), command);

        assert!(matches!(
            Command::from_bytes(&[0xE0, 0x01, 0x00, 0x00]),
            Err(Error::InvalidCommandLength(4))
        ));
        // Lc must match the payload exactly
        assert!(Command::from_bytes(&[0xE0, 0x11, 0x02, 0x00, 0x04, 0x01]).is_err());
        assert!(Command::from_bytes(&[0xE0, 0x11, 0x02, 0x00, 0x01, 0x01, 0x02]).is_err());
    }

    #[test]
    fn test_display() {
        let command = Command::new(Header::new(0xE0, 0x11, 0x01, 0x00))
            .with_data(vec![0xAB])
            .unwrap();
        assert_eq!(command.to_string(), "CLA=E0 INS=11 P1=01 P2=00 Lc=01 DATA=AB");
        assert_eq!(
            Command::new(Header::plain(0xE0, 0x01)).to_string(),
            "CLA=E0 INS=01 P1=00 P2=00 Lc=00"
        );
    }
}
