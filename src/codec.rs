//! Primitive readers shared by the element decoders.
//!
//! All reads are bounds-checked against the slice the reader was created
//! over and fail with [`AnqpError::Truncated`] instead of reading past it.
//! Nothing here interprets a field as signed.

use crate::error::{AnqpError, Result};

/// Byte order of a multi-byte integer field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

/// Character encoding of a string field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    Utf8,
}

impl Encoding {
    /// Select the encoding from a record's flag byte (bit 0 set means UTF-8)
    pub fn from_flags(flags: u8) -> Self {
        if flags & 0x01 != 0 {
            Encoding::Utf8
        } else {
            Encoding::Ascii
        }
    }
}

/// Extract `width` bits starting at bit `shift` from `value`
#[inline]
pub fn bits(value: u8, shift: u32, width: u32) -> u8 {
    (value >> shift) & (((1u16 << width) - 1) as u8)
}

/// Cursor over a bounded byte slice
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn ensure(&self, needed: usize, context: &'static str) -> Result<()> {
        if needed > self.remaining() {
            return Err(AnqpError::truncated(context, needed, self.remaining()));
        }
        Ok(())
    }

    /// Borrow the next `len` bytes and advance past them
    pub fn take(&mut self, len: usize, context: &'static str) -> Result<&'a [u8]> {
        self.ensure(len, context)?;
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Split off a reader bounded to the next `len` bytes
    pub fn sub_reader(&mut self, len: usize, context: &'static str) -> Result<ByteReader<'a>> {
        self.take(len, context).map(ByteReader::new)
    }

    pub fn skip(&mut self, len: usize, context: &'static str) -> Result<()> {
        self.take(len, context).map(|_| ())
    }

    /// Consume everything that is left
    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.buf[self.pos..];
        self.pos = self.buf.len();
        slice
    }

    pub fn read_u8(&mut self, context: &'static str) -> Result<u8> {
        Ok(self.take(1, context)?[0])
    }

    pub fn read_u16_le(&mut self, context: &'static str) -> Result<u16> {
        Ok(self.read_uint(2, ByteOrder::LittleEndian, context)? as u16)
    }

    pub fn read_u32_le(&mut self, context: &'static str) -> Result<u32> {
        Ok(self.read_uint(4, ByteOrder::LittleEndian, context)? as u32)
    }

    /// Read an unsigned integer of `width` bytes (0..=8) in the given order
    pub fn read_uint(&mut self, width: usize, order: ByteOrder, context: &'static str) -> Result<u64> {
        if width > 8 {
            return Err(AnqpError::malformed(
                context,
                format!("integer width {} exceeds 8 bytes", width),
            ));
        }
        let bytes = self.take(width, context)?;
        let value = match order {
            ByteOrder::BigEndian => bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64),
            ByteOrder::LittleEndian => bytes
                .iter()
                .rev()
                .fold(0u64, |acc, &b| (acc << 8) | b as u64),
        };
        Ok(value)
    }

    /// Read a string of exactly `len` bytes.
    ///
    /// Bytes that are invalid for the encoding become U+FFFD, so one bad
    /// character never costs the whole record.
    pub fn read_string(&mut self, len: usize, encoding: Encoding, context: &'static str) -> Result<String> {
        let bytes = self.take(len, context)?;
        Ok(decode_string(bytes, encoding))
    }

    /// Read a string preceded by a 1- or 2-byte little-endian length field
    pub fn read_prefixed_string(
        &mut self,
        length_width: usize,
        encoding: Encoding,
        context: &'static str,
    ) -> Result<String> {
        if length_width != 1 && length_width != 2 {
            return Err(AnqpError::malformed(
                context,
                format!("unsupported length prefix width {}", length_width),
            ));
        }
        let len = self.read_uint(length_width, ByteOrder::LittleEndian, context)? as usize;
        self.read_string(len, encoding, context)
    }
}

fn decode_string(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Ascii => bytes
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
            .collect(),
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
    }
}
