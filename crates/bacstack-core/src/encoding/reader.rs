use crate::DecodeError;

/// Read cursor over a borrowed byte buffer.
///
/// Every read either succeeds and advances, or fails with
/// [`DecodeError::BufferUnderrun`] and leaves the position untouched.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub const fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn peek_u8(&self) -> Result<u8, DecodeError> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::BufferUnderrun)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::BufferUnderrun);
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..start + len])
    }

    pub fn read_be_u16(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.read_exact(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_be_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.read_exact(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_be_f32(&mut self) -> Result<f32, DecodeError> {
        self.read_be_u32().map(f32::from_bits)
    }

    /// Reads `len` bytes as UTF-8.
    pub fn read_string(&mut self, len: usize) -> Result<&'a str, DecodeError> {
        let checkpoint = self.pos;
        let raw = self.read_exact(len)?;
        std::str::from_utf8(raw).map_err(|_| {
            self.pos = checkpoint;
            DecodeError::InvalidValue
        })
    }

    /// Absolute sub-slice of the underlying buffer; does not move the cursor.
    pub fn slice(&self, start: usize, end: usize) -> Result<&'a [u8], DecodeError> {
        if start > end {
            return Err(DecodeError::InvalidLength);
        }
        self.buf.get(start..end).ok_or(DecodeError::BufferUnderrun)
    }

    /// Skips `n` bytes and returns the offset before the skip.
    pub fn advance(&mut self, n: usize) -> Result<usize, DecodeError> {
        let old = self.pos;
        self.read_exact(n)?;
        Ok(old)
    }

    /// Runs `f` on a copy of the cursor. The position never moves, whether
    /// `f` succeeds or not.
    pub fn peek<T>(
        &self,
        f: impl FnOnce(&mut Reader<'a>) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        let mut lookahead = *self;
        f(&mut lookahead)
    }

    /// Runs `f` and commits its reads on success. On failure the position is
    /// restored and `None` is returned instead of the error.
    pub fn optional<T>(
        &mut self,
        f: impl FnOnce(&mut Reader<'a>) -> Result<T, DecodeError>,
    ) -> Option<T> {
        let checkpoint = self.pos;
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.pos = checkpoint;
                None
            }
        }
    }
}
