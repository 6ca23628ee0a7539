//! INSERT statement text.
//!
//! [`insert_statement`] and [`batch_insert_statement`] use positional `?`
//! placeholders and are what the result-set codec executes.
//! [`legacy_insert_sql`] reproduces the historical literal form byte for byte:
//! values are embedded in the text and quotes inside text values are **not**
//! escaped, so it must only be used with trusted data.

use crate::config::{CURRENT_TIMESTAMP_MARKER, LEGACY_TIMESTAMP_MARKER, LOAD_DATE_COLUMN};
use crate::record::Record;
use crate::schema::TableDef;
use crate::types::FieldValue;

/// `insert into T (a, b, lddate) values (?, ?, CURRENT_TIMESTAMP)`
pub fn insert_statement(table: &TableDef, table_name: &str) -> String {
    let placeholders = vec!["?"; table.len()].join(", ");
    format!(
        "insert into {} ({}) values ({}, {})",
        table_name,
        column_list(table),
        placeholders,
        CURRENT_TIMESTAMP_MARKER
    )
}

/// `insert into T values (?,?,?)` with one trailing placeholder for the
/// load date.
pub fn batch_insert_statement(table: &TableDef, table_name: &str) -> String {
    let placeholders = vec!["?"; table.len() + 1].join(",");
    format!("insert into {} values ({})", table_name, placeholders)
}

/// Literal INSERT with values embedded and `SYSDATE` as the load date.
pub fn legacy_insert_sql(record: &Record, table_name: &str) -> String {
    let table = record.table();
    let values: Vec<String> = record
        .legacy_values()
        .iter()
        .map(|value| match value {
            FieldValue::Integer(v) => v.to_string(),
            FieldValue::Float(v) => legacy_float_literal(*v),
            FieldValue::Text(v) => format!("'{}'", v),
            FieldValue::NotAvailable => "null".to_string(),
        })
        .collect();
    format!(
        "insert into {} ({}) values ({}, {})",
        table_name,
        column_list(table),
        values.join(", "),
        LEGACY_TIMESTAMP_MARKER
    )
}

fn column_list(table: &TableDef) -> String {
    let mut names: Vec<&str> = table.registry().natural_names().collect();
    names.push(LOAD_DATE_COLUMN);
    names.join(", ")
}

/// Shortest round-trip rendering in the historical style: plain decimal with
/// at least one fractional digit for magnitudes in `[1e-3, 1e7)`, otherwise
/// `d.dddE±n`.
pub fn legacy_float_literal(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        let word = if v > 0.0 { "Infinity" } else { "-Infinity" };
        return word.to_string();
    }
    let magnitude = v.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return format!("{:?}", v);
    }
    let rendered = format!("{:e}", v);
    match rendered.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => {
            format!("{}E{}", mantissa, exponent)
        }
        Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
        None => rendered,
    }
}

impl Record {
    /// Literal INSERT text. Text values are embedded without escaping.
    pub fn legacy_insert_sql(&self, table_name: &str) -> String {
        legacy_insert_sql(self, table_name)
    }

    pub fn insert_statement(&self, table_name: &str) -> String {
        insert_statement(self.table(), table_name)
    }
}
