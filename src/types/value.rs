//! # Field Values
//!
//! `FieldValue` is the in-memory form of a single record field. A field that
//! is "not available" is the explicit `NotAvailable` variant; the legacy
//! sentinel constants (`i64::MIN`, `NaN`, `"-"`, per-column overrides) only
//! appear when a value crosses the text, binary or SQL boundary.
//!
//! ## Equality
//!
//! Floats compare by bit pattern so that `FieldValue` can implement `Eq` and
//! `Hash`: `-0.0` and `0.0` are different values, two NaNs with the same
//! payload are equal. Values coming out of any decoder are therefore equal
//! to the values that were encoded.

use std::hash::{Hash, Hasher};

use super::FieldType;

#[derive(Debug, Clone, Default)]
pub enum FieldValue {
    #[default]
    NotAvailable,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_na(&self) -> bool {
        matches!(self, FieldValue::NotAvailable)
    }

    /// Field type of a present value, None for `NotAvailable`.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            FieldValue::NotAvailable => None,
            FieldValue::Integer(_) => Some(FieldType::Integer),
            FieldValue::Float(_) => Some(FieldType::Float),
            FieldValue::Text(_) => Some(FieldType::Text),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self.field_type() {
            Some(ty) => ty.name(),
            None => "NA",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::NotAvailable, FieldValue::NotAvailable) => true,
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a == b,
            (FieldValue::Float(a), FieldValue::Float(b)) => a.to_bits() == b.to_bits(),
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for FieldValue {}

impl Hash for FieldValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::NotAvailable => {}
            FieldValue::Integer(v) => v.hash(state),
            FieldValue::Float(v) => v.to_bits().hash(state),
            FieldValue::Text(v) => v.hash(state),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::NotAvailable => f.write_str("NA"),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(v) => write!(f, "'{}'", v),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => FieldValue::NotAvailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_compare_by_bits() {
        assert_eq!(FieldValue::Float(f64::NAN), FieldValue::Float(f64::NAN));
        assert_ne!(FieldValue::Float(0.0), FieldValue::Float(-0.0));
        assert_eq!(FieldValue::Float(3.5), FieldValue::from(3.5));
    }

    #[test]
    fn variants_never_cross_compare() {
        assert_ne!(FieldValue::Integer(1), FieldValue::Float(1.0));
        assert_ne!(FieldValue::Text("NA".into()), FieldValue::NotAvailable);
    }

    #[test]
    fn option_none_is_not_available() {
        assert!(FieldValue::from(None::<i64>).is_na());
        assert_eq!(FieldValue::from(Some("x")), FieldValue::Text("x".into()));
    }

    #[test]
    fn accessors_match_variant() {
        let v = FieldValue::from(42i64);
        assert_eq!(v.as_integer(), Some(42));
        assert_eq!(v.as_float(), None);
        assert_eq!(v.field_type(), Some(FieldType::Integer));
        assert_eq!(FieldValue::NotAvailable.type_name(), "NA");
    }
}
