//! # Column Orderings
//!
//! A `ColumnOrdering` is the pair of column sequences used for one text I/O
//! operation: the order in which input tokens are assigned to columns, and
//! the order in which columns are written on output.
//!
//! Orderings are plain values. Every text codec call receives one explicitly,
//! so a header that overrides the input order for one stream is confined to
//! that stream's reader and cannot affect a concurrent read of the same record
//! kind. Each [`TableDef`](super::TableDef) keeps a default ordering that
//! callers may replace; codecs take a snapshot of it when they start.
//!
//! ```text
//!   TableDef.default ──snapshot──> ColumnOrdering ──header override──> local copy
//!                                        │                                 │
//!                                        └── writer                        └── reader
//! ```
//!
//! Binary and SQL encodings never consult an ordering; they always follow the
//! registry's natural order.

use std::sync::Arc;

use eyre::Result;

use super::ColumnRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOrdering {
    input: Arc<[usize]>,
    output: Arc<[usize]>,
}

impl ColumnOrdering {
    /// Both sequences in natural order.
    pub fn natural(registry: &ColumnRegistry) -> Self {
        let positions = registry.natural_positions();
        Self {
            input: positions.clone(),
            output: positions,
        }
    }

    /// Returns a copy with the input sequence replaced. The names must cover
    /// every mandatory column.
    pub fn with_input<S: AsRef<str>>(&self, registry: &ColumnRegistry, names: &[S]) -> Result<Self> {
        let input = registry.validate(names, true)?;
        Ok(Self {
            input: input.into(),
            output: self.output.clone(),
        })
    }

    /// Returns a copy with the output sequence replaced. Any subset of columns
    /// is accepted.
    pub fn with_output<S: AsRef<str>>(&self, registry: &ColumnRegistry, names: &[S]) -> Result<Self> {
        let output = registry.validate(names, false)?;
        Ok(Self {
            input: self.input.clone(),
            output: output.into(),
        })
    }

    /// Registry positions of the input columns, in token order.
    pub fn input(&self) -> &[usize] {
        &self.input
    }

    /// Registry positions of the output columns, in write order.
    pub fn output(&self) -> &[usize] {
        &self.output
    }

    pub fn input_names<'a>(&self, registry: &'a ColumnRegistry) -> Vec<&'a str> {
        names(registry, &self.input)
    }

    pub fn output_names<'a>(&self, registry: &'a ColumnRegistry) -> Vec<&'a str> {
        names(registry, &self.output)
    }
}

fn names<'a>(registry: &'a ColumnRegistry, positions: &[usize]) -> Vec<&'a str> {
    positions
        .iter()
        .filter_map(|&idx| registry.column(idx).map(|c| c.name()))
        .collect()
}
