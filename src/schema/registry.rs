//! # Column Registry
//!
//! The ordered list of column descriptors for one record kind. The order of
//! registration is the *natural order*: it fixes the binary layout, the
//! result-set column offsets and every SQL column list, and nothing done to a
//! text ordering ever changes it.
//!
//! ## Validation Rules
//!
//! `validate` resolves a candidate list of column names to positions in the
//! registry and rejects it when:
//!
//! 1. a name is not registered (first such name in candidate order)
//! 2. a name appears more than once
//! 3. `require_all_mandatory` is set and a mandatory column is absent (first
//!    such column in natural order)
//!
//! Input orderings are validated with `require_all_mandatory = true`, output
//! orderings with `false`. Names are matched case-insensitively.

use std::sync::Arc;

use eyre::{bail, Result};
use hashbrown::HashMap;

use super::column::{default_sentinel, ColumnDef, ColumnDescriptor};
use crate::error::RowError;
use crate::types::{FieldType, FieldValue, FormatSpec};

#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    kind: String,
    columns: Vec<ColumnDescriptor>,
    by_name: HashMap<String, usize>,
}

impl ColumnRegistry {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            columns: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Appends a column in natural order.
    pub fn add(&mut self, def: ColumnDef) -> Result<()> {
        if self.by_name.contains_key(def.name()) {
            bail!(RowError::DuplicateColumn {
                kind: self.kind.clone(),
                column: def.name().to_string(),
            });
        }
        if def.name().is_empty() {
            bail!(self.invalid("column names must not be empty".to_string()));
        }

        let format = FormatSpec::parse(def.format())
            .map_err(|e| self.invalid(format!("column '{}': {}", def.name(), e)))?;
        if !format.accepts(def.field_type()) {
            bail!(self.invalid(format!(
                "column '{}': format '{}' cannot render {} values",
                def.name(),
                format,
                def.field_type()
            )));
        }

        let sentinel = match def.na_override() {
            None => default_sentinel(def.field_type()),
            Some(v) if v.field_type() == Some(def.field_type()) => v.clone(),
            Some(v) => bail!(RowError::TypeMismatch {
                column: def.name().to_string(),
                expected: def.field_type().name(),
                actual: v.type_name(),
            }),
        };

        self.by_name.insert(def.name().to_string(), self.columns.len());
        self.columns.push(ColumnDescriptor {
            name: def.name().to_string(),
            field_type: def.field_type(),
            format,
            sentinel,
            mandatory: def.is_mandatory(),
        });
        Ok(())
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        match self.by_name.get(name) {
            Some(&idx) => Some(idx),
            None => self.by_name.get(name.to_lowercase().as_str()).copied(),
        }
    }

    /// Looks up a column, failing with a schema error for unknown names.
    pub fn resolve(&self, name: &str) -> Result<usize> {
        match self.index_of(name) {
            Some(idx) => Ok(idx),
            None => bail!(RowError::UnknownColumn {
                kind: self.kind.clone(),
                column: name.trim().to_lowercase(),
            }),
        }
    }

    pub fn natural_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub(crate) fn natural_positions(&self) -> Arc<[usize]> {
        (0..self.columns.len()).collect()
    }

    pub fn field_types(&self) -> impl ExactSizeIterator<Item = FieldType> + '_ {
        self.columns.iter().map(|c| c.field_type)
    }

    /// Resolves `candidates` to registry positions in candidate order.
    pub fn validate<S: AsRef<str>>(
        &self,
        candidates: &[S],
        require_all_mandatory: bool,
    ) -> Result<Vec<usize>> {
        let mut positions = Vec::with_capacity(candidates.len());
        let mut seen = vec![false; self.columns.len()];
        for candidate in candidates {
            let idx = self.resolve(candidate.as_ref())?;
            if seen[idx] {
                bail!(RowError::DuplicateColumn {
                    kind: self.kind.clone(),
                    column: self.columns[idx].name.clone(),
                });
            }
            seen[idx] = true;
            positions.push(idx);
        }

        if require_all_mandatory {
            if let Some(missing) = self
                .columns
                .iter()
                .zip(&seen)
                .find(|(col, present)| col.mandatory && !**present)
            {
                bail!(RowError::MissingMandatoryColumn {
                    kind: self.kind.clone(),
                    column: missing.0.name.clone(),
                });
            }
        }
        Ok(positions)
    }

    /// Type-checks a value for the column at `index` and maps the legacy NA
    /// constant to `NotAvailable`.
    pub(crate) fn check_value(&self, index: usize, value: FieldValue) -> Result<FieldValue> {
        let col = &self.columns[index];
        match value.field_type() {
            None => Ok(value),
            Some(ty) if ty == col.field_type => Ok(col.normalize(value)),
            Some(_) => bail!(RowError::TypeMismatch {
                column: col.name.clone(),
                expected: col.field_type.name(),
                actual: value.type_name(),
            }),
        }
    }

    fn invalid(&self, reason: String) -> RowError {
        RowError::InvalidDefinition {
            kind: self.kind.clone(),
            reason,
        }
    }
}
