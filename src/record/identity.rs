//! Primary-key and unique-key equality.
//!
//! Both predicates require the other record to be of the same kind and then
//! compare only the declared key columns. A kind without a declaration for the
//! requested key never compares equal.

use super::Record;

impl Record {
    pub fn equal_primary_key(&self, other: &Record) -> bool {
        self.keys_equal(other, self.table().primary_key())
    }

    pub fn equal_unique_key(&self, other: &Record) -> bool {
        self.keys_equal(other, self.table().unique_key())
    }

    fn keys_equal(&self, other: &Record, key: Option<&[usize]>) -> bool {
        let Some(key) = key else {
            return false;
        };
        self.table().same_kind(other.table())
            && key
                .iter()
                .all(|&idx| self.values().get(idx) == other.values().get(idx))
    }
}
