//! Request/response framing for Ledger device applications
//!
//! A request is `CLA INS P1 P2 Lc [data]` and a response is a payload
//! followed by a two byte status word, `90 00` meaning success. The codec
//! types here only ever see byte sequences; moving those bytes to and from a
//! device is the job of a [`Transport`].
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub use bytes::{Bytes, BytesMut};

pub mod command;
pub mod error;
pub mod response;
pub mod transport;

pub use command::{ApduCommand, Command, Header, MAX_DATA_LENGTH};
pub use error::{Error, Result};
pub use response::status::StatusWord;
pub use response::{PayloadReader, Response};
pub use transport::{Transport, TransportError};

#[cfg(any(test, feature = "mock"))]
pub use transport::MockTransport;

/// Everything a device application crate usually needs
pub mod prelude {
    pub use crate::response::status::{StatusWord, common as status};
    pub use crate::{
        ApduCommand, Bytes, BytesMut, Command, Error, Header, PayloadReader, Response, Result,
        Transport, TransportError,
    };
}
