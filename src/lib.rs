//! # rowdef - Column Registry and Record Codecs
//!
//! rowdef implements fixed-schema table rows once, generically, instead of one
//! generated type per table. A table definition supplies an ordered list of
//! columns with their types, text formats, NA sentinels and SQL declarations;
//! every row of that table is a [`Record`] that shares the definition and gets
//! four wire encodings, SQL text generation, key comparison and a cached
//! content signature for free.
//!
//! ## Quick Start
//!
//! ```ignore
//! use rowdef::schema::{ColumnDef, TableDef};
//! use rowdef::sql::SqlType;
//! use rowdef::Record;
//!
//! let scores = TableDef::builder("scores")
//!     .column(ColumnDef::integer("id", "%d").optional(), SqlType::Number(9))
//!     .column(ColumnDef::text("name", "%s"), SqlType::Varchar2(40))
//!     .column(ColumnDef::float("score", "%1.3f"), SqlType::Float(53))
//!     .primary_key(&["id"])
//!     .build()?;
//!
//! let records = rowdef::codec::text::read_records(&scores, "#score name\n3.500 Alice\n".as_bytes())?;
//! assert_eq!(records[0].text("name")?, Some("Alice"));
//! assert!(records[0].is_na("id")?);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  Record (values + HashCache, identity predicates)     │
//! ├──────────────┬───────────────┬───────────────────────┤
//! │  codec::text │ codec::binary │ codec::result_set     │
//! │  (ordering)  │ (natural)     │ (natural, offset)     │
//! ├──────────────┴───────────────┴───────────────────────┤
//! │  FieldCodec: parse / format / read / write per column │
//! ├──────────────────────────────────────────────────────┤
//! │  TableDef: ColumnRegistry + SqlTypes + keys +         │
//! │            default ColumnOrdering                     │
//! ├──────────────────────────────────────────────────────┤
//! │  types: FieldType, FieldValue, FormatSpec             │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`]: layout constants and text codec options
//! - [`types`]: field types, values and printf-style formats
//! - [`schema`]: column registry, orderings and table definitions
//! - [`codec`]: text, binary, buffer and result-set codecs
//! - [`record`]: the record type, identity predicates and hash cache
//! - [`sql`]: SQL column types, DDL scripts and INSERT text
//! - [`error`]: typed error payload carried inside `eyre::Report`

pub mod codec;
pub mod config;
pub mod error;
pub mod record;
pub mod schema;
pub mod sql;
pub mod types;

pub use error::{ErrorKind, RowError};
pub use record::Record;
pub use schema::{ColumnDef, ColumnOrdering, TableDef};
pub use sql::SqlType;
pub use types::{FieldType, FieldValue};
