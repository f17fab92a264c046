use serde::{Deserialize, Serialize};

use crate::{compress::Compression, MAX_DECODED_SIZE};

/// Settings for [`decode_with`][crate::decode_with].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    /// Envelope around the tag stream. Defaults to gzip.
    pub compression: Compression,
    /// Largest decompressed tag stream accepted, in bytes.
    pub max_size: usize,
}

impl DecodeOptions {
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }
}

impl std::default::Default for DecodeOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Gzip,
            max_size: MAX_DECODED_SIZE,
        }
    }
}
