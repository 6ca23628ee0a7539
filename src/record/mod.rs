//! # Records
//!
//! A `Record` is one row of one record kind: a shared [`TableDef`] plus one
//! [`FieldValue`] per column in natural order. Every record kind uses this
//! single type; the table definition supplies everything that differs between
//! kinds.
//!
//! ## Construction
//!
//! | Constructor | Result |
//! |-------------|--------|
//! | `Record::new(&table)` | every field `NotAvailable` |
//! | `Record::from_values(&table, values)` | type-checked, range-checked value list |
//! | `record.clone()` | independent copy |
//! | `Record::from_text_line`, `read_binary`, `from_buf`, `from_row` | decoded |
//!
//! ## Mutation
//!
//! Fields change only through the setters. A setter type-checks the value,
//! maps the column's legacy NA constant to `NotAvailable`, enforces the SQL
//! width of the column and then invalidates the cached signature. A rejected
//! value leaves the field and the cache untouched.
//!
//! ## Equality and Hashing
//!
//! Two records are equal when they are of the same kind and all fields are
//! equal (floats by bit pattern). `Hash` feeds the cached content signature,
//! so `hashbrown::HashSet<Record>` deduplicates rows.

mod identity;
mod signature;

pub use signature::HashCache;

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use eyre::{bail, Result};
use smallvec::SmallVec;

use crate::config::INLINE_COLUMN_CAPACITY;
use crate::error::RowError;
use crate::schema::TableDef;
use crate::types::{FieldType, FieldValue};

pub(crate) type FieldValues = SmallVec<[FieldValue; INLINE_COLUMN_CAPACITY]>;

#[derive(Clone)]
pub struct Record {
    table: Arc<TableDef>,
    values: FieldValues,
    hash: HashCache,
}

impl Record {
    /// Creates a record with every field `NotAvailable`.
    pub fn new(table: &Arc<TableDef>) -> Self {
        let values = std::iter::repeat(FieldValue::NotAvailable)
            .take(table.len())
            .collect();
        Self::from_decoded(table, values)
    }

    /// Creates a record from one value per column in natural order.
    pub fn from_values(
        table: &Arc<TableDef>,
        values: impl IntoIterator<Item = FieldValue>,
    ) -> Result<Self> {
        let mut checked = FieldValues::with_capacity(table.len());
        for (idx, value) in values.into_iter().enumerate() {
            if idx >= table.len() {
                bail!(RowError::ValueCount {
                    kind: table.name().to_string(),
                    expected: table.len(),
                    actual: idx + 1,
                });
            }
            checked.push(table.accept_value(idx, value)?);
        }
        if checked.len() != table.len() {
            bail!(RowError::ValueCount {
                kind: table.name().to_string(),
                expected: table.len(),
                actual: checked.len(),
            });
        }
        Ok(Self::from_decoded(table, checked))
    }

    /// Wraps values a decoder has already normalized.
    pub(crate) fn from_decoded(table: &Arc<TableDef>, values: FieldValues) -> Self {
        debug_assert_eq!(values.len(), table.len());
        Self {
            table: Arc::clone(table),
            values,
            hash: HashCache::new(),
        }
    }

    pub fn table(&self) -> &Arc<TableDef> {
        &self.table
    }

    /// Name of the record kind.
    pub fn kind(&self) -> &str {
        self.table.name()
    }

    /// Field values in natural order, with `NotAvailable` for missing values.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Field values in natural order with each column's NA sentinel in place
    /// of `NotAvailable`.
    pub fn legacy_values(&self) -> Vec<FieldValue> {
        self.table
            .columns()
            .iter()
            .zip(&self.values)
            .map(|(col, value)| col.legacy(value).clone())
            .collect()
    }

    pub fn value_at(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }

    pub fn get(&self, column: &str) -> Result<&FieldValue> {
        let idx = self.table.registry().resolve(column)?;
        Ok(&self.values[idx])
    }

    pub fn is_na(&self, column: &str) -> Result<bool> {
        Ok(self.get(column)?.is_na())
    }

    pub fn integer(&self, column: &str) -> Result<Option<i64>> {
        let idx = self.typed_index(column, FieldType::Integer)?;
        Ok(self.values[idx].as_integer())
    }

    pub fn float(&self, column: &str) -> Result<Option<f64>> {
        let idx = self.typed_index(column, FieldType::Float)?;
        Ok(self.values[idx].as_float())
    }

    pub fn text(&self, column: &str) -> Result<Option<&str>> {
        let idx = self.typed_index(column, FieldType::Text)?;
        Ok(self.values[idx].as_text())
    }

    /// Sets a field by column name. `NotAvailable` or the column's NA
    /// constant clears the field.
    pub fn set(&mut self, column: &str, value: impl Into<FieldValue>) -> Result<()> {
        let idx = self.table.registry().resolve(column)?;
        self.set_at(idx, value.into())
    }

    pub fn set_at(&mut self, index: usize, value: FieldValue) -> Result<()> {
        if index >= self.values.len() {
            bail!(RowError::ValueCount {
                kind: self.table.name().to_string(),
                expected: self.values.len(),
                actual: index + 1,
            });
        }
        let value = self.table.accept_value(index, value)?;
        self.values[index] = value;
        self.hash.invalidate();
        Ok(())
    }

    pub fn set_na(&mut self, column: &str) -> Result<()> {
        self.set(column, FieldValue::NotAvailable)
    }

    pub fn set_integer(&mut self, column: &str, value: i64) -> Result<()> {
        let idx = self.typed_index(column, FieldType::Integer)?;
        self.set_at(idx, FieldValue::Integer(value))
    }

    pub fn set_float(&mut self, column: &str, value: f64) -> Result<()> {
        let idx = self.typed_index(column, FieldType::Float)?;
        self.set_at(idx, FieldValue::Float(value))
    }

    pub fn set_text(&mut self, column: &str, value: impl Into<String>) -> Result<()> {
        let idx = self.typed_index(column, FieldType::Text)?;
        self.set_at(idx, FieldValue::Text(value.into()))
    }

    /// Content signature over the kind name and all fields, cached until the
    /// next setter call.
    pub fn signature(&self) -> u64 {
        self.hash
            .get_or_compute(|| signature::compute_signature(&self.table, &self.values))
    }

    pub fn is_hash_cached(&self) -> bool {
        self.hash.is_cached()
    }

    fn typed_index(&self, column: &str, expected: FieldType) -> Result<usize> {
        let idx = self.table.registry().resolve(column)?;
        let actual = self.table.columns()[idx].field_type();
        if actual != expected {
            bail!(RowError::TypeMismatch {
                column: self.table.columns()[idx].name().to_string(),
                expected: actual.name(),
                actual: expected.name(),
            });
        }
        Ok(idx)
    }

    /// Fails unless every record is of `table`'s kind.
    pub(crate) fn ensure_kind<'a>(
        table: &TableDef,
        records: impl IntoIterator<Item = &'a Record>,
    ) -> Result<()> {
        for record in records {
            if !table.same_kind(record.table()) {
                bail!(RowError::KindMismatch {
                    expected: table.name().to_string(),
                    actual: record.kind().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.table.same_kind(&other.table) && self.values == other.values
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.signature());
    }
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (col, value) in self.table.columns().iter().zip(&self.values) {
            map.entry(&col.name(), value);
        }
        map.finish()
    }
}
