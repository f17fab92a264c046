//! Test-only encoder for building tag streams.

use crate::tag::TagKind;
use std::io::Write;

#[derive(Clone, Debug, Default)]
pub(crate) struct NbtWriter {
    buf: Vec<u8>,
}

impl NbtWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&mut self, kind: TagKind) -> &mut Self {
        self.buf.push(kind.into());
        self
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn str_payload(&mut self, s: &str) -> &mut Self {
        self.buf.extend_from_slice(&(s.len() as u16).to_be_bytes());
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    pub fn header(&mut self, kind: TagKind, name: &str) -> &mut Self {
        self.kind(kind).str_payload(name)
    }

    pub fn short(&mut self, name: &str, v: i16) -> &mut Self {
        self.header(TagKind::Short, name).raw(&v.to_be_bytes())
    }

    pub fn int(&mut self, name: &str, v: i32) -> &mut Self {
        self.header(TagKind::Int, name).raw(&v.to_be_bytes())
    }

    pub fn string(&mut self, name: &str, v: &str) -> &mut Self {
        self.header(TagKind::String, name).str_payload(v)
    }

    pub fn byte_array(&mut self, name: &str, v: &[u8]) -> &mut Self {
        self.header(TagKind::ByteArray, name)
            .raw(&(v.len() as i32).to_be_bytes())
            .raw(v)
    }

    pub fn compound(&mut self, name: &str) -> &mut Self {
        self.header(TagKind::Compound, name)
    }

    pub fn end(&mut self) -> &mut Self {
        self.kind(TagKind::End)
    }

    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }
}

/// Write a complete document with the given dimensions and buffers, plus offsets of (1, 2, 3) and
/// an empty entity list.
pub(crate) fn schematic(
    (width, length, height): (i16, i16, i16),
    blocks: &[u8],
    data: Option<&[u8]>,
) -> Vec<u8> {
    let mut w = NbtWriter::new();
    w.compound("Schematic")
        .short("Width", width)
        .short("Length", length)
        .short("Height", height)
        .string("Materials", "Alpha")
        .byte_array("Blocks", blocks);
    if let Some(data) = data {
        w.byte_array("Data", data);
    }
    w.int("WEOffsetX", 1)
        .int("WEOffsetY", 2)
        .int("WEOffsetZ", 3)
        .header(TagKind::List, "Entities")
        .end()
        .end()
        .finish()
}

/// A 128³ cylinder standing on the Y axis, radius 32 around (64, 64) in the XZ plane, filled
/// with material 1 on every layer.
pub(crate) fn cylinder_blocks() -> Vec<u8> {
    let side = 128usize;
    let mut blocks = vec![0u8; side * side * side];
    for y in 0..side {
        for z in 0..side {
            for x in 0..side {
                let dx = x as i64 - 64;
                let dz = z as i64 - 64;
                if dx * dx + dz * dz <= 32 * 32 {
                    blocks[y * side * side + z * side + x] = 1;
                }
            }
        }
    }
    blocks
}

pub(crate) fn gzip(raw: &[u8]) -> Vec<u8> {
    let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
    enc.write_all(raw).unwrap();
    enc.finish().unwrap()
}

pub(crate) fn zstd(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(zstd_safe::compress_bound(raw.len()));
    zstd_safe::compress(&mut out, raw, 3).unwrap();
    out
}
