use crate::Error;

/// Cursor over a response payload
///
/// Every read names the field being read; running past the end of the
/// payload yields [`Error::MalformedResponse`] with that name.
#[derive(Debug, Clone)]
pub struct PayloadReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> PayloadReader<'a> {
    /// Start reading at the beginning of `data`
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Read one byte
    pub fn read_u8(&mut self, what: &'static str) -> Result<u8, Error> {
        let [byte] = self.read_array::<1>(what)?;
        Ok(byte)
    }

    /// Read exactly `len` bytes
    pub fn read_bytes(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], Error> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(Error::malformed(what))?;
        let field = &self.data[self.offset..end];
        self.offset = end;
        Ok(field)
    }

    /// Read a fixed size field
    pub fn read_array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], Error> {
        let field = self.read_bytes(N, what)?;
        <[u8; N]>::try_from(field).map_err(|_| Error::malformed(what))
    }

    /// Read a length byte followed by that many bytes
    pub fn read_length_prefixed(&mut self, what: &'static str) -> Result<&'a [u8], Error> {
        let len = self.read_u8(what)?;
        self.read_bytes(len as usize, what)
    }

    /// Bytes consumed so far
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not read yet
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }
}
