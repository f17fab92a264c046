//! Decompression of the byte source into a raw tag stream.
//!
//! Schematic files are gzip streams. Zstandard streams and bare tag streams are accepted when asked
//! for, and [`Compression::Auto`] picks between all three by looking at the first bytes.

use std::io::{BufRead, BufReader, ErrorKind, Read};

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// The envelope wrapped around the tag stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compression {
    /// gzip, as written by every schematic editor.
    #[default]
    Gzip,
    /// A Zstandard frame.
    Zstd,
    /// No envelope: the source is the tag stream itself.
    None,
    /// Detect gzip or Zstandard by their magic numbers, and fall back to no envelope.
    Auto,
}

impl Compression {
    /// Pick the envelope from the first bytes of a stream.
    pub fn detect(header: &[u8]) -> Compression {
        if header.starts_with(&GZIP_MAGIC) {
            Compression::Gzip
        } else if header.starts_with(&ZSTD_MAGIC) {
            Compression::Zstd
        } else {
            Compression::None
        }
    }
}

fn transport(context: &str, err: impl std::fmt::Display) -> Error {
    Error::Transport(format!("{}: {}", context, err))
}

/// Read at most `max_size` bytes from `src` into `dst`, failing if there is more.
fn read_bounded<R: Read>(src: R, dst: &mut Vec<u8>, max_size: usize, context: &str) -> Result<()> {
    let limit = (max_size as u64).saturating_add(1);
    src.take(limit).read_to_end(dst).map_err(|e| match e.kind() {
        // The envelope opened fine, but the source stopped before the stream did.
        ErrorKind::UnexpectedEof => Error::TruncatedInput {
            step: "decompress",
            actual: dst.len(),
            expected: dst.len() + 1,
        },
        _ => transport(context, e),
    })?;
    if dst.len() > max_size {
        return Err(Error::Transport(format!(
            "{}: decompressed stream exceeds maximum size of {} bytes",
            context, max_size
        )));
    }
    Ok(())
}

/// Decompress the whole source. The result is never larger than `max_size`.
pub(crate) fn decompress<R: Read>(
    source: R,
    compression: Compression,
    max_size: usize,
) -> Result<Vec<u8>> {
    let mut source = BufReader::new(source);
    let compression = match compression {
        Compression::Auto => {
            let header = source
                .fill_buf()
                .map_err(|e| transport("read stream header", e))?;
            Compression::detect(header)
        }
        other => other,
    };
    log::debug!("decompressing source as {:?}", compression);

    let mut out = Vec::new();
    match compression {
        Compression::Gzip => read_bounded(GzDecoder::new(source), &mut out, max_size, "gzip")?,
        Compression::None => read_bounded(source, &mut out, max_size, "raw")?,
        Compression::Zstd => {
            let mut compressed = Vec::new();
            source
                .read_to_end(&mut compressed)
                .map_err(|e| transport("zstd", e))?;
            zstd_decompress(&compressed, &mut out, max_size)?;
        }
        Compression::Auto => unreachable!("Auto is resolved above"),
    }
    log::debug!("decompressed {} bytes", out.len());
    Ok(out)
}

fn zstd_error(code: zstd_safe::ErrorCode) -> Error {
    transport("zstd", zstd_safe::get_error_name(code))
}

/// Stream-decompress every frame in `input`, since the frame content size is optional.
fn zstd_decompress(input: &[u8], output: &mut Vec<u8>, max_size: usize) -> Result<()> {
    use zstd_safe::{DCtx, InBuffer, OutBuffer};

    let mut dctx = DCtx::create();
    let mut chunk = vec![0u8; DCtx::out_size()];
    let mut src = InBuffer::around(input);
    // Nonzero while a frame is still open.
    let mut pending = 1;
    while src.pos() < input.len() || pending != 0 {
        let before = src.pos();
        let written = {
            let mut dst = OutBuffer::around(&mut chunk[..]);
            pending = dctx.decompress_stream(&mut dst, &mut src).map_err(zstd_error)?;
            dst.pos()
        };
        if output.len() + written > max_size {
            return Err(Error::Transport(format!(
                "zstd: decompressed stream exceeds maximum size of {} bytes",
                max_size
            )));
        }
        output.extend_from_slice(&chunk[..written]);
        if written == 0 && src.pos() == before {
            if pending != 0 {
                return Err(Error::TruncatedInput {
                    step: "decompress",
                    actual: input.len(),
                    expected: input.len() + pending,
                });
            }
            break;
        }
    }
    Ok(())
}
