//! The decoded volume and its query surface.
//!
//! Cells are stored flattened with X varying fastest, then Z, then Y:
//! `index = y * (width * length) + z * width + x`.


use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;

use crate::error::{Error, Result, Violation};

/// One member of a schematic's entity list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub(crate) id: String,
}

impl EntityRecord {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A rectangular block volume decoded from a schematic.
///
/// The block buffers are guaranteed to hold exactly one byte per cell, so every in-bounds query is
/// answered from the buffers and every out-of-bounds query returns 0. A map is never modified
/// after it is decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MapSerde", into = "MapSerde")]
pub struct VolumetricMap {
    width: u16,
    length: u16,
    height: u16,
    offset: [i32; 3],
    materials: String,
    blocks: Vec<u8>,
    data: Option<Vec<u8>>,
    entities: Vec<EntityRecord>,
}

/// Raw, unchecked map contents, as gathered from a tag stream or a serde source.
#[derive(Clone, Debug, Default)]
pub(crate) struct RawMap {
    pub width: i16,
    pub length: i16,
    pub height: i16,
    pub offset: [i32; 3],
    pub materials: String,
    pub blocks: Vec<u8>,
    pub data: Option<Vec<u8>>,
    pub entities: Vec<EntityRecord>,
}

fn dimension(field: &'static str, value: i16) -> Result<u16> {
    u16::try_from(value)
        .map_err(|_| Error::SchemaViolation(Violation::NegativeDimension { field, value }))
}

fn check_len(field: &'static str, expected: usize, buf: &[u8]) -> Result<()> {
    if buf.len() != expected {
        return Err(Error::SchemaViolation(Violation::BufferLength {
            field,
            expected,
            actual: buf.len(),
        }));
    }
    Ok(())
}

impl RawMap {
    /// Check the schema variant, the dimensions, and the buffer lengths, in that order.
    pub(crate) fn validate(self) -> Result<VolumetricMap> {
        if self.materials != crate::SUPPORTED_MATERIALS {
            return Err(Error::SchemaViolation(Violation::Materials(self.materials)));
        }
        let width = dimension("Width", self.width)?;
        let length = dimension("Length", self.length)?;
        let height = dimension("Height", self.height)?;
        // Three u16 values can't overflow a 64-bit usize, but can a 32-bit one.
        let volume = (width as usize)
            .checked_mul(length as usize)
            .and_then(|v| v.checked_mul(height as usize))
            .unwrap_or(usize::MAX);
        check_len("Blocks", volume, &self.blocks)?;
        if let Some(data) = &self.data {
            check_len("Data", volume, data)?;
        }
        Ok(VolumetricMap {
            width,
            length,
            height,
            offset: self.offset,
            materials: self.materials,
            blocks: self.blocks,
            data: self.data,
            entities: self.entities,
        })
    }
}

impl VolumetricMap {
    /// Number of cells along the X axis (the schematic's `Width`).
    pub fn dimension_x(&self) -> usize {
        self.width as usize
    }

    /// Number of cells along the Y axis (the schematic's `Height`).
    pub fn dimension_y(&self) -> usize {
        self.height as usize
    }

    /// Number of cells along the Z axis (the schematic's `Length`).
    pub fn dimension_z(&self) -> usize {
        self.length as usize
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn length(&self) -> u16 {
        self.length
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// The `WEOffsetX`, `WEOffsetY`, and `WEOffsetZ` values.
    pub fn offset(&self) -> [i32; 3] {
        self.offset
    }

    pub fn materials(&self) -> &str {
        &self.materials
    }

    /// Low byte of every cell, in flattening order.
    pub fn blocks(&self) -> &[u8] {
        &self.blocks
    }

    /// High byte of every cell, in flattening order, if the schematic carried one.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub fn entities(&self) -> &[EntityRecord] {
        &self.entities
    }

    /// Total number of cells.
    pub fn volume(&self) -> usize {
        self.blocks.len()
    }

    /// Flattened buffer index of a cell, or `None` if the cell is outside the volume.
    pub fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        let (w, l) = (self.dimension_x(), self.dimension_z());
        if x >= w || y >= self.dimension_y() || z >= l {
            return None;
        }
        Some(y * w * l + z * w + x)
    }

    /// Material code of a cell. Out-of-bounds cells are empty (0).
    pub fn material_at(&self, x: i32, y: i32, z: i32) -> u16 {
        self.index(x, y, z).map_or(0, |i| self.material_by_index(i))
    }

    pub fn is_filled(&self, x: i32, y: i32, z: i32) -> bool {
        self.material_at(x, y, z) != 0
    }

    fn material_by_index(&self, i: usize) -> u16 {
        let low = self.blocks[i] as u16;
        match &self.data {
            Some(data) => ((data[i] as u16) << 8) | low,
            None => low,
        }
    }

    /// Iterate over every non-empty cell as `(x, y, z, material)`, in flattening order.
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize, usize, u16)> + '_ {
        let w = self.dimension_x().max(1);
        let l = self.dimension_z().max(1);
        (0..self.volume()).filter_map(move |i| {
            let material = self.material_by_index(i);
            if material == 0 {
                return None;
            }
            Some((i % w, i / (w * l), (i / w) % l, material))
        })
    }
}

// Struct used solely for serialization/deserialization
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct MapSerde {
    width: i16,
    length: i16,
    height: i16,
    offset: [i32; 3],
    materials: String,
    blocks: ByteBuf,
    #[serde(default)]
    data: Option<ByteBuf>,
    #[serde(default)]
    entities: Vec<EntityRecord>,
}

impl TryFrom<MapSerde> for VolumetricMap {
    type Error = Error;
    fn try_from(value: MapSerde) -> Result<Self> {
        RawMap {
            width: value.width,
            length: value.length,
            height: value.height,
            offset: value.offset,
            materials: value.materials,
            blocks: value.blocks.into_vec(),
            data: value.data.map(ByteBuf::into_vec),
            entities: value.entities,
        }
        .validate()
    }
}

impl From<VolumetricMap> for MapSerde {
    fn from(value: VolumetricMap) -> Self {
        // Dimensions were read from i16 values and checked non-negative.
        Self {
            width: value.width as i16,
            length: value.length as i16,
            height: value.height as i16,
            offset: value.offset,
            materials: value.materials,
            blocks: ByteBuf::from(value.blocks),
            data: value.data.map(ByteBuf::from),
            entities: value.entities,
        }
    }
}
