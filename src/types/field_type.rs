//! # Field Types
//!
//! A record field is one of three primitive types. The type fixes the binary
//! layout of the field and decides which format conversions and SQL column
//! types are legal for it.
//!
//! | Type    | Binary encoding                         | Fixed Size |
//! |---------|-----------------------------------------|------------|
//! | Integer | i64, big-endian                         | 8 bytes    |
//! | Float   | f64 bit pattern, big-endian             | 8 bytes    |
//! | Text    | u32 big-endian byte length + UTF-8 data | Variable   |
//!
//! ## Discriminant Values
//!
//! `#[repr(u8)]` keeps the discriminant to a single byte so a type can be
//! stored next to a column name in compact schema dumps:
//! - 0: Integer
//! - 1: Float
//! - 2: Text

use crate::config::{NUMERIC_FIELD_WIDTH, TEXT_LENGTH_PREFIX_WIDTH};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Integer = 0,
    Float = 1,
    Text = 2,
}

impl FieldType {
    /// Returns the fixed binary width for this type, or None for Text.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            FieldType::Integer | FieldType::Float => Some(NUMERIC_FIELD_WIDTH),
            FieldType::Text => None,
        }
    }

    /// Width of the binary header that precedes the payload. Numeric fields
    /// have no header; text fields carry their length prefix.
    pub fn prefix_size(&self) -> usize {
        match self {
            FieldType::Integer | FieldType::Float => 0,
            FieldType::Text => TEXT_LENGTH_PREFIX_WIDTH,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Text => "text",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for FieldType {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FieldType::Integer),
            1 => Ok(FieldType::Float),
            2 => Ok(FieldType::Text),
            _ => eyre::bail!("invalid field type discriminant: {}", value),
        }
    }
}
