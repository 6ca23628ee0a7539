//! # Record Kind Schemas
//!
//! This module describes the shape of a record kind: which columns it has, in
//! which natural order, with which text formats and NA sentinels, and which
//! text ordering is currently the default.
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | `ColumnDef` | Builder-side column description |
//! | `ColumnDescriptor` | Immutable registered column |
//! | `ColumnRegistry` | Natural-order column list with name validation |
//! | `ColumnOrdering` | Input/output column sequences for text I/O |
//! | `TableDef` | Record kind: registry, SQL types, keys, default ordering |
//!
//! ## Lifecycle
//!
//! ```text
//! ColumnDef ──add──> ColumnRegistry ──build──> Arc<TableDef> ──> Record
//!                                                   │
//!                                                   └── default ColumnOrdering
//!                                                       (replaceable, snapshot per codec call)
//! ```

mod column;
mod ordering;
mod registry;
mod table;

pub use column::{ColumnDef, ColumnDescriptor};
pub use ordering::ColumnOrdering;
pub use registry::ColumnRegistry;
pub use table::{TableDef, TableDefBuilder};
