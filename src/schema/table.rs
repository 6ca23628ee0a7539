//! # Table Definitions
//!
//! A `TableDef` is one record kind: a table name, its column registry, the
//! declared SQL type of every column, the primary and unique key columns, and
//! the kind's default text ordering. It is built once, shared behind an `Arc`
//! and never structurally modified afterwards.
//!
//! ## Building
//!
//! ```ignore
//! use rowdef::schema::{ColumnDef, TableDef};
//! use rowdef::sql::SqlType;
//!
//! let origin = TableDef::builder("origin")
//!     .column(ColumnDef::float("lat", "%9.4f").with_na(-999.0), SqlType::Float(53))
//!     .column(ColumnDef::float("lon", "%9.4f").with_na(-999.0), SqlType::Float(53))
//!     .column(ColumnDef::integer("orid", "%d"), SqlType::Number(9))
//!     .column(ColumnDef::text("auth", "%s"), SqlType::Varchar2(15))
//!     .primary_key(&["orid"])
//!     .unique_key(&["lat", "lon", "auth"])
//!     .build()?;
//! ```
//!
//! ## Default Ordering
//!
//! The default input/output ordering is the only mutable part of a table
//! definition. It sits behind a `parking_lot::RwLock`; codecs clone a snapshot
//! (two `Arc` bumps) when they start, so replacing the default while a read is
//! in flight affects only reads that start later.

use std::sync::Arc;

use eyre::{bail, Result, WrapErr};
use parking_lot::RwLock;
use tracing::debug;

use super::{ColumnDef, ColumnDescriptor, ColumnOrdering, ColumnRegistry};
use crate::config::MAX_TEXT_FIELD_BYTES;
use crate::error::RowError;
use crate::sql::SqlType;
use crate::types::FieldValue;

#[derive(Debug)]
pub struct TableDef {
    name: String,
    registry: ColumnRegistry,
    sql_types: Vec<SqlType>,
    primary_key: Option<Box<[usize]>>,
    unique_key: Option<Box<[usize]>>,
    max_bytes: usize,
    default_ordering: RwLock<ColumnOrdering>,
}

#[derive(Debug, Clone)]
pub struct TableDefBuilder {
    name: String,
    columns: Vec<(ColumnDef, SqlType)>,
    primary_key: Option<Vec<String>>,
    unique_key: Option<Vec<String>>,
}

impl TableDefBuilder {
    pub fn column(mut self, def: ColumnDef, sql_type: SqlType) -> Self {
        self.columns.push((def, sql_type));
        self
    }

    pub fn primary_key<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.primary_key = Some(columns.iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    pub fn unique_key<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.unique_key = Some(columns.iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    pub fn build(self) -> Result<Arc<TableDef>> {
        let name = self.name;
        if name.trim().is_empty() {
            bail!(RowError::InvalidDefinition {
                kind: name,
                reason: "table name must not be empty".to_string(),
            });
        }
        if self.columns.is_empty() {
            bail!(RowError::InvalidDefinition {
                kind: name,
                reason: "a table needs at least one column".to_string(),
            });
        }

        let mut registry = ColumnRegistry::new(name.clone());
        let mut sql_types = Vec::with_capacity(self.columns.len());
        for (def, sql_type) in self.columns {
            if !sql_type.accepts(def.field_type()) {
                bail!(RowError::TypeMismatch {
                    column: def.name().to_string(),
                    expected: def.field_type().name(),
                    actual: sql_type_name(sql_type),
                });
            }
            if let SqlType::Varchar2(n) = sql_type {
                if n as usize > MAX_TEXT_FIELD_BYTES {
                    bail!(RowError::InvalidDefinition {
                        kind: name,
                        reason: format!(
                            "column '{}' declares {} but text fields hold at most {} bytes",
                            def.name(),
                            sql_type,
                            MAX_TEXT_FIELD_BYTES
                        ),
                    });
                }
            }
            registry.add(def)?;
            sql_types.push(sql_type);
        }

        let primary_key = resolve_key(&registry, self.primary_key.as_deref())
            .wrap_err_with(|| format!("invalid primary key for {}", name))?;
        let unique_key = resolve_key(&registry, self.unique_key.as_deref())
            .wrap_err_with(|| format!("invalid unique key for {}", name))?;

        let max_bytes = sql_types.iter().map(SqlType::max_binary_width).sum();
        let default_ordering = RwLock::new(ColumnOrdering::natural(&registry));

        Ok(Arc::new(TableDef {
            name,
            registry,
            sql_types,
            primary_key,
            unique_key,
            max_bytes,
            default_ordering,
        }))
    }
}

fn resolve_key(registry: &ColumnRegistry, names: Option<&[String]>) -> Result<Option<Box<[usize]>>> {
    match names {
        None => Ok(None),
        Some([]) => bail!(RowError::InvalidDefinition {
            kind: registry.kind().to_string(),
            reason: "key declarations need at least one column".to_string(),
        }),
        Some(names) => Ok(Some(registry.validate(names, false)?.into_boxed_slice())),
    }
}

fn sql_type_name(sql_type: SqlType) -> &'static str {
    match sql_type {
        SqlType::Number(_) => "number",
        SqlType::Float(_) => "float",
        SqlType::Varchar2(_) => "varchar2",
    }
}

impl TableDef {
    pub fn builder(name: impl Into<String>) -> TableDefBuilder {
        TableDefBuilder {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
            unique_key: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &ColumnRegistry {
        &self.registry
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        self.registry.columns()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn sql_types(&self) -> &[SqlType] {
        &self.sql_types
    }

    pub fn primary_key(&self) -> Option<&[usize]> {
        self.primary_key.as_deref()
    }

    pub fn unique_key(&self) -> Option<&[usize]> {
        self.unique_key.as_deref()
    }

    /// Upper bound on the binary size of one record of this kind.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// True if records of `other` share this kind's layout.
    pub fn same_kind(&self, other: &TableDef) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        self.name == other.name
            && self.sql_types == other.sql_types
            && self.registry.natural_names().eq(other.registry.natural_names())
    }

    /// Snapshot of the default text ordering.
    pub fn ordering(&self) -> ColumnOrdering {
        self.default_ordering.read().clone()
    }

    /// Replaces the default input ordering. Fails, leaving the default
    /// unchanged, if a name is unknown or a mandatory column is missing.
    pub fn set_input_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        let mut guard = self.default_ordering.write();
        let updated = guard.with_input(&self.registry, names)?;
        debug!(
            table = %self.name,
            columns = ?updated.input_names(&self.registry),
            "default input ordering replaced"
        );
        *guard = updated;
        Ok(())
    }

    /// Replaces the default output ordering with any subset of columns.
    pub fn set_output_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        let mut guard = self.default_ordering.write();
        let updated = guard.with_output(&self.registry, names)?;
        debug!(
            table = %self.name,
            columns = ?updated.output_names(&self.registry),
            "default output ordering replaced"
        );
        *guard = updated;
        Ok(())
    }

    /// Restores natural order for both default sequences.
    pub fn reset_ordering(&self) {
        *self.default_ordering.write() = ColumnOrdering::natural(&self.registry);
    }

    /// Type-checks, normalizes and range-checks a value for column `index`.
    pub(crate) fn accept_value(&self, index: usize, value: FieldValue) -> Result<FieldValue> {
        let value = self.registry.check_value(index, value)?;
        if let Some(col) = self.registry.column(index) {
            self.sql_types[index].check(col.name(), &value)?;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{error_kind, ErrorKind};

    fn origin() -> Arc<TableDef> {
        TableDef::builder("origin")
            .column(ColumnDef::float("lat", "%9.4f").with_na(-999.0), SqlType::Float(53))
            .column(ColumnDef::integer("orid", "%d").with_na(-1), SqlType::Number(9))
            .column(ColumnDef::text("auth", "%s"), SqlType::Varchar2(15))
            .primary_key(&["orid"])
            .unique_key(&["lat", "auth"])
            .build()
            .unwrap()
    }

    #[test]
    fn max_bytes_sums_declared_widths() {
        assert_eq!(origin().max_bytes(), 8 + 8 + 4 + 4 * 15);
    }

    #[test]
    fn keys_resolve_to_positions() {
        let table = origin();
        assert_eq!(table.primary_key(), Some(&[1][..]));
        assert_eq!(table.unique_key(), Some(&[0, 2][..]));
    }

    #[test]
    fn rejects_unknown_key_column() {
        let err = TableDef::builder("t")
            .column(ColumnDef::integer("a", "%d"), SqlType::Number(4))
            .primary_key(&["b"])
            .build()
            .unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Schema));
        assert!(format!("{:#}", err).contains("'b'"));
    }

    #[test]
    fn rejects_incompatible_sql_type() {
        let err = TableDef::builder("t")
            .column(ColumnDef::text("a", "%s"), SqlType::Number(4))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("expects text"));
    }

    #[test]
    fn rejects_varchar_wider_than_text_limit() {
        let err = TableDef::builder("t")
            .column(ColumnDef::text("remark", "%s"), SqlType::Varchar2(100_000))
            .build()
            .unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Schema));
        assert!(err.to_string().contains("remark"));
        assert!(TableDef::builder("t")
            .column(ColumnDef::text("remark", "%s"), SqlType::Varchar2(65_535))
            .build()
            .is_ok());
    }

    #[test]
    fn rejects_empty_table() {
        assert!(TableDef::builder("t").build().is_err());
    }

    #[test]
    fn failed_ordering_change_keeps_default() {
        let table = origin();
        assert!(table.set_input_columns(&["lat", "orid"]).is_err());
        assert_eq!(table.ordering(), ColumnOrdering::natural(table.registry()));

        table.set_output_columns(&["auth"]).unwrap();
        assert_eq!(table.ordering().output(), &[2]);
        table.reset_ordering();
        assert_eq!(table.ordering().output(), &[0, 1, 2]);
    }

    #[test]
    fn accept_value_applies_range_checks() {
        let table = origin();
        assert!(table.accept_value(1, FieldValue::Integer(-1)).unwrap().is_na());
        let err = table
            .accept_value(1, FieldValue::Integer(1_000_000_000))
            .unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Range));
        assert!(table.accept_value(2, FieldValue::from("x".repeat(16))).is_err());
    }

    #[test]
    fn separately_built_tables_share_kind() {
        assert!(origin().same_kind(&origin()));
    }
}
