//! # Content Signature Cache
//!
//! Records are deduplicated in hash sets by a 64-bit content signature: a
//! CRC-64/ECMA-182 over the kind name and the binary encoding of every field in
//! natural order. The signature is computed on first use and cached until the
//! next mutation.
//!
//! ```text
//! setter ──> HashCache::invalidate()     (always, even for an identical value)
//! hash() ──> HashCache::get_or_compute() (recomputes after invalidation)
//! ```
//!
//! The signature is derived from content only, so two records with equal
//! fields always share a signature regardless of their mutation history.
//! It is a collision-resistant checksum, not a cryptographic digest.

use std::sync::OnceLock;

use crc::{Crc, CRC_64_ECMA_182};

use crate::schema::TableDef;
use crate::types::FieldValue;

const CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_ECMA_182);

#[derive(Debug, Clone, Default)]
pub struct HashCache {
    cell: OnceLock<u64>,
}

impl HashCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&self, compute: impl FnOnce() -> u64) -> u64 {
        *self.cell.get_or_init(compute)
    }

    pub fn invalidate(&mut self) {
        self.cell.take();
    }

    pub fn is_cached(&self) -> bool {
        self.cell.get().is_some()
    }
}

pub(crate) fn compute_signature(table: &TableDef, values: &[FieldValue]) -> u64 {
    let mut digest = CRC64.digest();
    digest.update(table.name().as_bytes());
    for (column, value) in table.columns().iter().zip(values) {
        match column.legacy(value) {
            FieldValue::Integer(v) => digest.update(&v.to_be_bytes()),
            FieldValue::Float(v) => digest.update(&v.to_bits().to_be_bytes()),
            FieldValue::Text(v) => {
                digest.update(&(v.len() as u64).to_be_bytes());
                digest.update(v.as_bytes());
            }
            FieldValue::NotAvailable => {}
        }
    }
    digest.finalize()
}
