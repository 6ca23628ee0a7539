//! # Column Definitions
//!
//! `ColumnDef` is the builder-side description of a column supplied by a
//! table definition: a name, a field type, a printf-style text format and two
//! optional refinements.
//!
//! - `with_na(value)`: replaces the type's default legacy NA constant. Many
//!   tables use `-1` for missing ids or `-999.0` for missing measurements.
//! - `optional()`: the column may be omitted from an input header. Columns are
//!   mandatory unless declared otherwise.
//!
//! Registration in a [`ColumnRegistry`](super::ColumnRegistry) turns a
//! `ColumnDef` into an immutable [`ColumnDescriptor`] with a parsed
//! [`FormatSpec`] and a resolved sentinel.
//!
//! ## Usage
//!
//! ```ignore
//! use rowdef::schema::ColumnDef;
//!
//! let orid = ColumnDef::integer("orid", "%d").with_na(-1);
//! let lat = ColumnDef::float("lat", "%9.4f").with_na(-999.0);
//! let auth = ColumnDef::text("auth", "%s").optional();
//! ```

use crate::config::{DEFAULT_FLOAT_NA, DEFAULT_INTEGER_NA, DEFAULT_TEXT_NA};
use crate::types::{FieldType, FieldValue, FormatSpec};

#[derive(Debug, Clone)]
pub struct ColumnDef {
    name: String,
    field_type: FieldType,
    format: String,
    na: Option<FieldValue>,
    mandatory: bool,
}

impl ColumnDef {
    /// Creates a mandatory column. The name is stored lower-cased.
    pub fn new(name: impl Into<String>, field_type: FieldType, format: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_lowercase(),
            field_type,
            format: format.into(),
            na: None,
            mandatory: true,
        }
    }

    pub fn integer(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer, format)
    }

    pub fn float(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float, format)
    }

    pub fn text(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text, format)
    }

    /// Overrides the legacy NA sentinel for this column.
    pub fn with_na(mut self, sentinel: impl Into<FieldValue>) -> Self {
        self.na = Some(sentinel.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.mandatory = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn na_override(&self) -> Option<&FieldValue> {
        self.na.as_ref()
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }
}

/// A registered column: immutable once added to a registry.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    pub(crate) name: String,
    pub(crate) field_type: FieldType,
    pub(crate) format: FormatSpec,
    pub(crate) sentinel: FieldValue,
    pub(crate) mandatory: bool,
}

impl ColumnDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn format(&self) -> &FormatSpec {
        &self.format
    }

    /// Legacy value written in place of `NotAvailable`. Never `NotAvailable`
    /// itself.
    pub fn sentinel(&self) -> &FieldValue {
        &self.sentinel
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// True if `value` is this column's legacy NA constant.
    pub fn is_sentinel(&self, value: &FieldValue) -> bool {
        match (&self.sentinel, value) {
            (FieldValue::Float(a), FieldValue::Float(b)) if a.is_nan() => b.is_nan(),
            (a, b) => a == b,
        }
    }

    /// Maps the legacy NA constant to `NotAvailable`, leaving other values as is.
    pub fn normalize(&self, value: FieldValue) -> FieldValue {
        if self.is_sentinel(&value) {
            FieldValue::NotAvailable
        } else {
            value
        }
    }

    /// Substitutes the legacy NA constant for `NotAvailable`.
    pub fn legacy<'a>(&'a self, value: &'a FieldValue) -> &'a FieldValue {
        if value.is_na() {
            &self.sentinel
        } else {
            value
        }
    }
}

pub(crate) fn default_sentinel(field_type: FieldType) -> FieldValue {
    match field_type {
        FieldType::Integer => FieldValue::Integer(DEFAULT_INTEGER_NA),
        FieldType::Float => FieldValue::Float(DEFAULT_FLOAT_NA),
        FieldType::Text => FieldValue::Text(DEFAULT_TEXT_NA.to_string()),
    }
}
