//! # SQL Column Types
//!
//! The declared database type of each column. These are not derivable from the
//! field type alone: two Float columns may be `float(24)` and `float(53)`, two
//! Text columns `varchar2(1)` and `varchar2(40)`. The declaration drives three
//! things:
//!
//! | Use                 | number(p)            | float(b)  | varchar2(n)            |
//! |---------------------|----------------------|-----------|------------------------|
//! | CREATE TABLE text   | `number(p)`          | `float(b)`| `varchar2(n)`          |
//! | setter range check  | `|v| < 10^p`         | none      | at most n characters   |
//! | max binary size     | 8                    | 8         | 4 + min(4n, 65535)     |
//!
//! Precisions above 18 digits exceed the i64 range and are not range checked.
//! `varchar2(n)` limits characters while the binary codec writes UTF-8 bytes,
//! so the size bound allows four bytes per character up to the text limit.

use eyre::{bail, Result};

use crate::config::{
    MAX_CHECKED_PRECISION, MAX_TEXT_FIELD_BYTES, MAX_UTF8_CHAR_BYTES, NUMERIC_FIELD_WIDTH,
    TEXT_LENGTH_PREFIX_WIDTH,
};
use crate::error::RowError;
use crate::types::{FieldType, FieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Number(u8),
    Float(u8),
    Varchar2(u32),
}

impl SqlType {
    /// True if a column of `ty` may be stored with this declaration.
    pub fn accepts(&self, ty: FieldType) -> bool {
        matches!(
            (self, ty),
            (SqlType::Number(_), FieldType::Integer)
                | (SqlType::Float(_), FieldType::Float)
                | (SqlType::Varchar2(_), FieldType::Text)
        )
    }

    /// Upper bound of the binary encoding of one value of this column.
    pub fn max_binary_width(&self) -> usize {
        match self {
            SqlType::Number(_) | SqlType::Float(_) => NUMERIC_FIELD_WIDTH,
            SqlType::Varchar2(n) => {
                let payload = (*n as usize).saturating_mul(MAX_UTF8_CHAR_BYTES);
                TEXT_LENGTH_PREFIX_WIDTH + payload.min(MAX_TEXT_FIELD_BYTES)
            }
        }
    }

    /// Rejects values that do not fit the declared width.
    pub fn check(&self, column: &str, value: &FieldValue) -> Result<()> {
        match (self, value) {
            (SqlType::Number(p), FieldValue::Integer(v)) if *p <= MAX_CHECKED_PRECISION => {
                let bound = 10u64.pow(*p as u32);
                if v.unsigned_abs() >= bound {
                    bail!(RowError::OutOfRange {
                        column: column.to_string(),
                        value: v.to_string(),
                        bound: format!("{} holds at most {} digits", self, p),
                    });
                }
            }
            (SqlType::Varchar2(n), FieldValue::Text(s)) => {
                let len = s.chars().count();
                if len > *n as usize {
                    bail!(RowError::OutOfRange {
                        column: column.to_string(),
                        value: format!("of length {}", len),
                        bound: format!("{} holds at most {} characters", self, n),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqlType::Number(p) => write!(f, "number({})", p),
            SqlType::Float(b) => write!(f, "float({})", b),
            SqlType::Varchar2(n) => write!(f, "varchar2({})", n),
        }
    }
}
