//! Primitive decoding over an already-decompressed tag stream.
//!
//! All values are big-endian. The reader only moves forward; there is no peeking or rewinding.

use std::borrow::Cow;

use byteorder::{BigEndian, ByteOrder};

use crate::{
    error::{Error, Result, Violation},
    tag::TagKind,
};

/// A tag header: either the `End` sentinel, or a kind with its name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagHeader<'a> {
    End,
    Named { kind: TagKind, name: Cow<'a, str> },
}

#[derive(Clone, Debug)]
pub struct TagReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> TagReader<'a> {
    pub fn new(data: &'a [u8]) -> TagReader<'a> {
        Self { data, offset: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        self.data
    }

    fn take(&mut self, step: &'static str, len: usize) -> Result<&'a [u8]> {
        if self.data.len() < len {
            return Err(Error::TruncatedInput {
                step,
                actual: self.data.len(),
                expected: len,
            });
        }
        let (head, tail) = self.data.split_at(len);
        self.data = tail;
        self.offset += len;
        Ok(head)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.take("decode u16", 2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.take("decode Short", 2)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.take("decode Int", 4)?))
    }

    /// Read a `u16` length, then that many bytes as text. Invalid UTF-8 sequences are replaced
    /// rather than rejected; names are only ever compared against ASCII literals.
    pub fn read_string(&mut self) -> Result<Cow<'a, str>> {
        let len = self.read_u16()? as usize;
        let raw = self.take("decode String", len)?;
        Ok(String::from_utf8_lossy(raw))
    }

    /// Read an `i32` length, then that many bytes. A negative length is malformed; a length
    /// longer than the remaining stream is a truncation.
    pub fn read_byte_array(&mut self) -> Result<&'a [u8]> {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(Error::MalformedLength {
                step: "decode ByteArray",
                length: len as i64,
            });
        }
        self.take("decode ByteArray", len as usize)
    }

    pub fn read_tag_kind(&mut self) -> Result<TagKind> {
        let byte = self.take("decode tag kind", 1)?[0];
        TagKind::try_from(byte).map_err(|b| Error::SchemaViolation(Violation::UnknownKind(b)))
    }

    pub fn read_tag_header(&mut self) -> Result<TagHeader<'a>> {
        let kind = self.read_tag_kind()?;
        if kind == TagKind::End {
            return Ok(TagHeader::End);
        }
        let name = self.read_string()?;
        log::trace!("tag {} '{}' ending at offset {}", kind, name, self.offset);
        Ok(TagHeader::Named { kind, name })
    }
}
