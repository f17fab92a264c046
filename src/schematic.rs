//! Schematic layout on top of the tag reader.
//!
//! A schematic is a single compound named `Schematic`. Its members are looked up by name in
//! `DOCUMENT_FIELDS`; entity members in `ENTITY_FIELDS`. Any name missing from the matching
//! table fails the decode, as does a known name carrying the wrong tag kind.

use crate::{
    error::{Error, Result, Violation},
    map::{EntityRecord, RawMap, VolumetricMap},
    reader::{TagHeader, TagReader},
    tag::TagKind,
};

type FieldReader<T> = fn(&mut TagReader<'_>, &mut T) -> Result<()>;

/// A recognized compound member: its name, the tag kind it must carry, and how to read its
/// payload into the target.
pub(crate) struct Field<T> {
    pub name: &'static str,
    pub kind: TagKind,
    pub read: FieldReader<T>,
}

pub(crate) const DOCUMENT_FIELDS: &[Field<RawMap>] = &[
    Field {
        name: "Width",
        kind: TagKind::Short,
        read: |r, map| {
            map.width = r.read_i16()?;
            Ok(())
        },
    },
    Field {
        name: "Length",
        kind: TagKind::Short,
        read: |r, map| {
            map.length = r.read_i16()?;
            Ok(())
        },
    },
    Field {
        name: "Height",
        kind: TagKind::Short,
        read: |r, map| {
            map.height = r.read_i16()?;
            Ok(())
        },
    },
    Field {
        name: "Materials",
        kind: TagKind::String,
        read: |r, map| {
            map.materials = r.read_string()?.into_owned();
            Ok(())
        },
    },
    Field {
        name: "Blocks",
        kind: TagKind::ByteArray,
        read: |r, map| {
            map.blocks = r.read_byte_array()?.to_vec();
            Ok(())
        },
    },
    Field {
        name: "Data",
        kind: TagKind::ByteArray,
        read: |r, map| {
            map.data = Some(r.read_byte_array()?.to_vec());
            Ok(())
        },
    },
    Field {
        name: "WEOffsetX",
        kind: TagKind::Int,
        read: |r, map| {
            map.offset[0] = r.read_i32()?;
            Ok(())
        },
    },
    Field {
        name: "WEOffsetY",
        kind: TagKind::Int,
        read: |r, map| {
            map.offset[1] = r.read_i32()?;
            Ok(())
        },
    },
    Field {
        name: "WEOffsetZ",
        kind: TagKind::Int,
        read: |r, map| {
            map.offset[2] = r.read_i32()?;
            Ok(())
        },
    },
    Field {
        name: "Entities",
        kind: TagKind::List,
        read: |r, map| {
            map.entities = parse_entity_list(r)?;
            Ok(())
        },
    },
];

/// No entity fields are decoded yet, so any entity with members is rejected.
pub(crate) const ENTITY_FIELDS: &[Field<EntityRecord>] = &[];

/// Read named tags until `End`, dispatching each through `fields`. Unknown names are reported with
/// `unknown`.
fn parse_members<T>(
    reader: &mut TagReader<'_>,
    fields: &[Field<T>],
    target: &mut T,
    unknown: fn(TagKind, String) -> Violation,
) -> Result<()> {
    loop {
        let (kind, name) = match reader.read_tag_header()? {
            TagHeader::End => return Ok(()),
            TagHeader::Named { kind, name } => (kind, name),
        };
        let field = fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::SchemaViolation(unknown(kind, name.to_string())))?;
        if field.kind != kind {
            return Err(Error::SchemaViolation(Violation::UnexpectedKind {
                field: field.name,
                expected: field.kind,
                actual: kind,
            }));
        }
        (field.read)(reader, target)?;
    }
}

/// Parse a complete schematic document from the start of the reader.
pub fn parse_document(reader: &mut TagReader<'_>) -> Result<VolumetricMap> {
    match reader.read_tag_header()? {
        TagHeader::End => return Err(Error::SchemaViolation(Violation::RootKind(TagKind::End))),
        TagHeader::Named { kind, .. } if kind != TagKind::Compound => {
            return Err(Error::SchemaViolation(Violation::RootKind(kind)))
        }
        TagHeader::Named { name, .. } if name != crate::ROOT_NAME => {
            return Err(Error::SchemaViolation(Violation::RootName(name.into_owned())))
        }
        TagHeader::Named { .. } => (),
    }

    let mut raw = RawMap::default();
    parse_members(reader, DOCUMENT_FIELDS, &mut raw, |kind, name| {
        Violation::UnknownField { kind, name }
    })?;
    if !reader.remaining().is_empty() {
        log::debug!(
            "ignoring {} trailing bytes after the root compound",
            reader.remaining().len()
        );
    }
    let map = raw.validate()?;
    log::debug!(
        "decoded schematic {}x{}x{} with {} entities",
        map.width(),
        map.height(),
        map.length(),
        map.entities().len()
    );
    Ok(map)
}

/// Parse an entity list: kind bytes, each followed by a compound payload, until an `End` kind.
pub fn parse_entity_list(reader: &mut TagReader<'_>) -> Result<Vec<EntityRecord>> {
    let mut entities = Vec::new();
    loop {
        match reader.read_tag_kind()? {
            TagKind::End => break,
            TagKind::Compound => entities.push(parse_entity(reader)?),
            actual => {
                return Err(Error::SchemaViolation(Violation::UnexpectedKind {
                    field: "Entities",
                    expected: TagKind::Compound,
                    actual,
                }))
            }
        }
    }
    log::trace!("read {} entities", entities.len());
    Ok(entities)
}

/// Parse the members of one entity compound, up to and including its `End` tag.
pub fn parse_entity(reader: &mut TagReader<'_>) -> Result<EntityRecord> {
    let mut entity = EntityRecord::default();
    parse_members(reader, ENTITY_FIELDS, &mut entity, |kind, name| {
        Violation::UnknownEntityField { kind, name }
    })?;
    Ok(entity)
}
