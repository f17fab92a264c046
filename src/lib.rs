//! nbt-schematic decodes `.schematic` files: gzip-compressed named binary tag documents that hold
//! a rectangular volume of block material codes, with placement offsets and an entity list.
//!
//! Decoding is eager and all-or-nothing. A call either returns a fully checked
//! [`VolumetricMap`], or the first [`Error`] hit along the way:
//!
//! - [`Error::Transport`] when the byte source or its compression envelope can't be read,
//! - [`Error::TruncatedInput`] when the tag stream ends early,
//! - [`Error::MalformedLength`] for a negative length prefix,
//! - [`Error::SchemaViolation`] when well-formed tags don't make up a schematic we accept.
//!
//! ```no_run
//! let file = std::fs::File::open("castle.schematic")?;
//! let map = nbt_schematic::decode(file)?;
//! if map.is_filled(4, 0, 4) {
//!     println!("material {}", map.material_at(4, 0, 4));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The decoder is strict: the root compound must be named `Schematic`, every member must be one
//! of the known fields with its expected tag kind, `Materials` must be `Alpha`, and the block
//! buffers must hold exactly one byte per cell.

use std::io::Read;

mod compress;
mod error;
mod map;
mod options;
pub mod reader;
pub mod schematic;
pub mod tag;

#[cfg(test)]
mod fixture;

pub use self::compress::Compression;
pub use self::error::{DecodeError, Error, ErrorKind, Result, Violation};
pub use self::map::{EntityRecord, VolumetricMap};
pub use self::options::DecodeOptions;
pub use self::reader::{TagHeader, TagReader};
pub use self::tag::TagKind;

/// Name of the root compound of every schematic.
pub const ROOT_NAME: &str = "Schematic";

/// The only `Materials` value accepted.
pub const SUPPORTED_MATERIALS: &str = "Alpha";

/// Default cap on the decompressed tag stream: 256 MiB. The largest possible `Blocks` buffer
/// exceeds this; raise it through [`DecodeOptions`] if needed.
pub const MAX_DECODED_SIZE: usize = 1usize << 28;

/// Decode a gzip-compressed schematic from `source`.
pub fn decode<R: Read>(source: R) -> Result<VolumetricMap> {
    decode_with(source, &DecodeOptions::default())
}

/// Decode a schematic from `source` using the given envelope and size limit.
pub fn decode_with<R: Read>(source: R, options: &DecodeOptions) -> Result<VolumetricMap> {
    let raw = compress::decompress(source, options.compression, options.max_size)?;
    decode_nbt(&raw)
}

/// Decode a schematic from an already-decompressed tag stream.
pub fn decode_nbt(data: &[u8]) -> Result<VolumetricMap> {
    schematic::parse_document(&mut TagReader::new(data))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fixture::{self, NbtWriter};

    fn cylinder() -> Vec<u8> {
        fixture::schematic((128, 128, 128), &fixture::cylinder_blocks(), None)
    }

    #[test]
    fn cylinder_gzip() {
        let map = decode(&fixture::gzip(&cylinder())[..]).unwrap();
        assert_eq!(map.dimension_x(), 128);
        assert_eq!(map.dimension_y(), 128);
        assert_eq!(map.dimension_z(), 128);
        assert_eq!(map.offset(), [1, 2, 3]);
        assert!(map.is_filled(64, 64, 64));
        assert!(!map.is_filled(0, 0, 0));
        assert!(map.is_filled(64, 0, 96));
        assert!(!map.is_filled(64, 0, 97));
        assert!(!map.is_filled(64, 128, 64));
        assert_eq!(map.material_at(64, 127, 64), 1);
    }

    #[test]
    fn cylinder_other_envelopes() {
        let raw = cylinder();
        let zstd = DecodeOptions::default().with_compression(Compression::Zstd);
        let map = decode_with(&fixture::zstd(&raw)[..], &zstd).unwrap();
        assert!(map.is_filled(64, 64, 64));

        let auto = DecodeOptions::default().with_compression(Compression::Auto);
        for source in [fixture::gzip(&raw), fixture::zstd(&raw), raw.clone()].iter() {
            let map = decode_with(&source[..], &auto).unwrap();
            assert_eq!(map.filled().count(), decode_nbt(&raw).unwrap().filled().count());
        }
    }

    #[test]
    fn raw_stream_is_not_gzip() {
        let err = decode(&cylinder()[..]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn size_limit() {
        let opts = DecodeOptions::default().with_max_size(1 << 20);
        let err = decode_with(&fixture::gzip(&cylinder())[..], &opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn truncated_inside_envelope() {
        let raw = fixture::schematic((4, 4, 4), &[3; 64], None);
        for cut in [0, 1, 10, raw.len() / 2, raw.len() - 1].iter() {
            let err = decode(&fixture::gzip(&raw[..*cut])[..]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TruncatedInput, "cut at {}", cut);
        }
    }

    #[test]
    fn truncated_envelope() {
        let gz = fixture::gzip(&fixture::schematic((4, 4, 4), &[3; 64], None));
        for cut in 0..gz.len() {
            let err = decode(&gz[..cut]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TruncatedInput, "gzip cut at {}", cut);
        }

        let raw = fixture::schematic((4, 4, 4), &[3; 64], None);
        let z = fixture::zstd(&raw);
        let opts = DecodeOptions::default().with_compression(Compression::Zstd);
        for cut in 0..z.len() {
            let err = decode_with(&z[..cut], &opts).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::TruncatedInput, "zstd cut at {}", cut);
        }
    }

    #[test]
    fn schema_violations() {
        let wrong_root = NbtWriter::new()
            .compound("schematic")
            .string("Materials", "Alpha")
            .end()
            .finish();
        let wrong_materials = NbtWriter::new()
            .compound("Schematic")
            .string("Materials", "Pocket")
            .end()
            .finish();
        let unknown_field = NbtWriter::new()
            .compound("Schematic")
            .string("Materials", "Alpha")
            .byte_array("Biomes", &[1, 2])
            .end()
            .finish();
        let entity_member = NbtWriter::new()
            .compound("Schematic")
            .string("Materials", "Alpha")
            .header(TagKind::List, "Entities")
            .kind(TagKind::Compound)
            .short("Health", 20)
            .end()
            .end()
            .end()
            .finish();
        for doc in [wrong_root, wrong_materials, unknown_field, entity_member].iter() {
            let err = decode(&fixture::gzip(doc)[..]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::SchemaViolation, "got {}", err);
        }
    }

    #[test]
    fn negative_byte_array_length() {
        let data = NbtWriter::new()
            .compound("Schematic")
            .header(TagKind::ByteArray, "Blocks")
            .raw(&(-1i32).to_be_bytes())
            .end()
            .finish();
        let err = decode_nbt(&data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedLength);
    }

    #[test]
    fn shared_read_only() {
        let map = std::sync::Arc::new(decode_nbt(&cylinder()).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let map = map.clone();
                std::thread::spawn(move || map.is_filled(64, i * 10, 64))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
