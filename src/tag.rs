//! Tag kinds of the named binary tag format.
//!
//! Every tag starts with a single kind byte. All kinds except [`TagKind::End`] are followed by a
//! name (a `u16` big-endian length, then that many bytes), then the kind's payload:
//!
//! | Kind        | Byte | Payload                                              |
//! | ----------- | ---- | ---------------------------------------------------- |
//! | `End`       | 0    | none, and no name                                    |
//! | `Byte`      | 1    | 1 byte                                               |
//! | `Short`     | 2    | 2 bytes, signed                                      |
//! | `Int`       | 3    | 4 bytes, signed                                      |
//! | `Long`      | 4    | 8 bytes, signed                                      |
//! | `Float`     | 5    | 4 bytes                                              |
//! | `Double`    | 6    | 8 bytes                                              |
//! | `ByteArray` | 7    | `i32` length, then that many bytes                   |
//! | `String`    | 8    | `u16` length, then that many bytes                   |
//! | `List`      | 9    | unnamed elements, see below                          |
//! | `Compound`  | 10   | named tags, terminated by an `End` tag               |
//!
//! Schematic files only use lists for their entity collection, which is encoded as a run of kind
//! bytes each followed by a compound payload, terminated by an `End` kind byte.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    End,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    ByteArray,
    String,
    List,
    Compound,
}

impl TagKind {
    /// Construct a kind from its discriminator byte. Returns `None` if the byte isn't a known kind.
    pub fn from_u8(n: u8) -> Option<TagKind> {
        match n {
            0 => Some(TagKind::End),
            1 => Some(TagKind::Byte),
            2 => Some(TagKind::Short),
            3 => Some(TagKind::Int),
            4 => Some(TagKind::Long),
            5 => Some(TagKind::Float),
            6 => Some(TagKind::Double),
            7 => Some(TagKind::ByteArray),
            8 => Some(TagKind::String),
            9 => Some(TagKind::List),
            10 => Some(TagKind::Compound),
            _ => None,
        }
    }

    pub fn into_u8(self) -> u8 {
        match self {
            TagKind::End => 0,
            TagKind::Byte => 1,
            TagKind::Short => 2,
            TagKind::Int => 3,
            TagKind::Long => 4,
            TagKind::Float => 5,
            TagKind::Double => 6,
            TagKind::ByteArray => 7,
            TagKind::String => 8,
            TagKind::List => 9,
            TagKind::Compound => 10,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TagKind::End => "End",
            TagKind::Byte => "Byte",
            TagKind::Short => "Short",
            TagKind::Int => "Int",
            TagKind::Long => "Long",
            TagKind::Float => "Float",
            TagKind::Double => "Double",
            TagKind::ByteArray => "ByteArray",
            TagKind::String => "String",
            TagKind::List => "List",
            TagKind::Compound => "Compound",
        }
    }
}

impl TryFrom<u8> for TagKind {
    type Error = u8;
    fn try_from(val: u8) -> Result<TagKind, u8> {
        TagKind::from_u8(val).ok_or(val)
    }
}

impl From<TagKind> for u8 {
    fn from(val: TagKind) -> u8 {
        val.into_u8()
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.into_u8())
    }
}
