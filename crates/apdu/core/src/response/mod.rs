//! Responses: a payload followed by a two byte status word

mod reader;
pub mod status;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

use crate::Error;
pub use reader::PayloadReader;
use status::StatusWord;

/// Length of the status word trailer
pub const STATUS_WORD_LENGTH: usize = 2;

/// Response split into payload and status word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    payload: Bytes,
    status: StatusWord,
}

impl Response {
    /// Assemble a response from its parts
    pub fn new(payload: impl Into<Bytes>, status: impl Into<StatusWord>) -> Self {
        Self {
            payload: payload.into(),
            status: status.into(),
        }
    }

    /// Response carrying `payload` and `90 00`
    pub const fn success(payload: Bytes) -> Self {
        Self {
            payload,
            status: status::common::SUCCESS,
        }
    }

    /// Split raw response bytes; the last two bytes are the status word
    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let Some(split) = data.len().checked_sub(STATUS_WORD_LENGTH) else {
            debug!(len = data.len(), "Response shorter than a status word");
            return Err(Error::malformed("response shorter than a status word"));
        };

        let (payload, sw) = data.split_at(split);
        let status = StatusWord::new(sw[0], sw[1]);
        trace!(%status, payload_len = payload.len(), "Parsed response");

        Ok(Self::new(Bytes::copy_from_slice(payload), status))
    }

    /// Payload, whatever the status
    pub const fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Status word
    pub const fn status(&self) -> StatusWord {
        self.status
    }

    /// Whether the status word is `90 00`
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Check the status word and hand out the payload
    ///
    /// Anything other than `90 00` is reported as [`Error::Status`]; the
    /// payload of a failed response is never returned.
    pub fn into_payload(self) -> Result<Bytes, Error> {
        if self.is_success() {
            Ok(self.payload)
        } else {
            Err(Error::status(self.status))
        }
    }
}

impl TryFrom<&[u8]> for Response {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self, Error> {
        Self::from_bytes(data)
    }
}

impl From<Response> for Bytes {
    fn from(response: Response) -> Self {
        let mut bytes = BytesMut::with_capacity(response.payload.len() + STATUS_WORD_LENGTH);
        bytes.put_slice(&response.payload);
        bytes.put_u16(response.status.to_u16());
        bytes.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_splits_trailer() {
        let response = Response::from_bytes(&[0x01, 0x02, 0x03, 0x90, 0x00]).unwrap();
        assert_eq!(response.payload().as_ref(), &[0x01, 0x02, 0x03]);
        assert_eq!(response.status(), status::common::SUCCESS);
        assert!(response.is_success());

        let response = Response::try_from(&[0x6E, 0x06][..]).unwrap();
        assert!(response.payload().is_empty());
        assert!(response.status().is_rejected_by_user());
    }

    #[test]
    fn test_from_bytes_too_short() {
        for data in [&[][..], &[0x90]] {
            assert!(matches!(
                Response::from_bytes(data),
                Err(Error::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn test_into_payload_checks_status() {
        let success = Response::success(Bytes::from_static(&[0x01, 0x02, 0x03]));
        assert_eq!(success.into_payload().unwrap().as_ref(), &[0x01, 0x02, 0x03]);

        let failure = Response::new(vec![0x01, 0x02], StatusWord::new(0x6E, 0x05));
        assert_eq!(
            failure.into_payload().unwrap_err().status_word(),
            Some(status::common::INVALID_DATA)
        );
    }

    #[test]
    fn test_back_to_bytes() {
        let bytes: Bytes = Response::new(vec![0xAA], StatusWord::from_u16(0x6E06)).into();
        assert_eq!(bytes.as_ref(), &[0xAA, 0x6E, 0x06]);
    }
}
