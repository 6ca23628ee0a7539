//! # Field Type System
//!
//! The primitive types a record field may hold, the in-memory value
//! representation, and the printf-style format specifiers used for text
//! output.
//!
//! ## Module Structure
//!
//! - `field_type`: `FieldType` discriminant and binary widths
//! - `value`: `FieldValue`, with `NotAvailable` as an explicit variant
//! - `format`: `FormatSpec` parser and renderer
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `FieldType` | Integer, Float or Text |
//! | `FieldValue` | One field of one record |
//! | `FormatSpec` | Column text format (`%d`, `%1.3f`, `%10.3e`, `%s`) |

mod field_type;
mod format;
mod value;

pub use field_type::FieldType;
pub use format::{float_literal, Conversion, FormatSpec};
pub use value::FieldValue;
