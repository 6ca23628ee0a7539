//! # Record Codecs
//!
//! Four wire forms for the same record, all built on the per-column
//! [`FieldCodec`]:
//!
//! | Codec | Module | Column order | NA on the wire |
//! |-------|--------|--------------|----------------|
//! | Text line | [`text`] | `ColumnOrdering` (input / output) | sentinel rendered by format |
//! | Binary stream | [`binary`] | natural | sentinel bytes |
//! | Buffer | [`binary`] | natural | sentinel bytes |
//! | Result set | [`result_set`] | natural, from an offset | `NULL` or sentinel in, sentinel out |
//!
//! Every decoder maps the column's sentinel back to `NotAvailable`, so a record
//! survives any encode/decode pair unchanged as long as the text ordering is
//! the same on both sides.

pub mod binary;
mod field;
pub mod result_set;
pub mod text;

pub use field::FieldCodec;
pub use text::TextReader;
