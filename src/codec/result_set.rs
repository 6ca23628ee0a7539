//! # Result-Set Codec
//!
//! Reads records from SQLite rows and writes them in prepared-statement
//! batches through `rusqlite`.
//!
//! ## Positional Reads
//!
//! A record occupies `table.len()` consecutive result columns starting at a
//! caller-supplied zero-based offset, in natural order. A join that selects
//! several tables' columns side by side can decode each record kind from its
//! own offset:
//!
//! ```ignore
//! let sql = "select origin.*, origerr.* from origin, origerr where origin.orid = origerr.orid";
//! let mut stmt = conn.prepare(sql)?;
//! let mut rows = stmt.query([])?;
//! while let Some(row) = rows.next()? {
//!     let origin = Record::from_row(&origin_def, row, 0)?;
//!     let origerr = Record::from_row(&origerr_def, row, origin_def.len())?;
//! }
//! ```
//!
//! SQL `NULL` and the column's NA sentinel both decode to `NotAvailable`.
//!
//! ## Batch Writes
//!
//! `insert_batch` binds each record's legacy values in natural order, plus a
//! trailing load-date parameter, to `insert into <table> values (?,...,?)`.
//! With `commit` set, the batch runs in its own transaction, committed at the
//! end and rolled back on failure. Without it the statements join whatever
//! transaction the caller has open. Nothing is retried.

use std::sync::Arc;

use chrono::NaiveDateTime;
use eyre::{Result, WrapErr};
use hashbrown::HashSet;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, Row, ToSql};
use tracing::debug;

use crate::error::RowError;
use crate::record::{FieldValues, Record};
use crate::schema::TableDef;
use crate::sql;
use crate::types::{FieldType, FieldValue};

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::NotAvailable => ToSqlOutput::Owned(Value::Null),
            FieldValue::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            FieldValue::Float(v) => ToSqlOutput::Owned(Value::Real(*v)),
            FieldValue::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        })
    }
}

impl Record {
    /// Decodes `table.len()` columns of `row` starting at `offset`.
    pub fn from_row(table: &Arc<TableDef>, row: &Row<'_>, offset: usize) -> Result<Record> {
        let mut values = FieldValues::with_capacity(table.len());
        for (i, col) in table.columns().iter().enumerate() {
            let position = offset + i;
            let read = match col.field_type() {
                FieldType::Integer => row.get::<_, Option<i64>>(position).map(FieldValue::from),
                FieldType::Float => row.get::<_, Option<f64>>(position).map(FieldValue::from),
                FieldType::Text => row.get::<_, Option<String>>(position).map(FieldValue::from),
            };
            let value = read.map_err(|source| RowError::ColumnRead {
                column: col.name().to_string(),
                position,
                source,
            })?;
            values.push(col.normalize(value));
        }
        Ok(Record::from_decoded(table, values))
    }

    /// Values to bind to a batch insert statement: legacy values in natural
    /// order followed by the load date.
    pub fn legacy_values_with_load_date(&self, lddate: NaiveDateTime) -> Vec<Value> {
        let mut params: Vec<Value> = self
            .legacy_values()
            .into_iter()
            .map(|value| match value {
                FieldValue::NotAvailable => Value::Null,
                FieldValue::Integer(v) => Value::Integer(v),
                FieldValue::Float(v) => Value::Real(v),
                FieldValue::Text(v) => Value::Text(v),
            })
            .collect();
        params.push(Value::Text(lddate.format("%Y-%m-%d %H:%M:%S%.f").to_string()));
        params
    }

    /// Inserts this record with a parameterized statement and a server-side
    /// load date.
    pub fn insert(&self, conn: &Connection, table_name: &str) -> Result<usize> {
        let statement = sql::insert_statement(self.table(), table_name);
        let legacy = self.legacy_values();
        conn.execute(&statement, params_from_iter(legacy.iter()))
            .map_err(|e| RowError::sql(statement.as_str(), e).into())
    }
}

/// Reads every row of `query` as a record starting at column 0.
pub fn read_records(conn: &Connection, table: &Arc<TableDef>, query: &str) -> Result<Vec<Record>> {
    read_records_at(conn, table, query, 0)
}

/// Reads every row of `query`, dropping duplicate records.
pub fn read_record_set(
    conn: &Connection,
    table: &Arc<TableDef>,
    query: &str,
) -> Result<HashSet<Record>> {
    let records = read_records_at(conn, table, query, 0)?;
    Ok(records.into_iter().collect())
}

/// Reads every row of `query`, decoding the record from `offset` onwards.
pub fn read_records_at(
    conn: &Connection,
    table: &Arc<TableDef>,
    query: &str,
    offset: usize,
) -> Result<Vec<Record>> {
    let mut stmt = conn.prepare(query).map_err(|e| RowError::sql(query, e))?;
    let mut rows = stmt.query([]).map_err(|e| RowError::sql(query, e))?;
    let mut records = Vec::new();
    while let Some(row) = rows.next().map_err(|e| RowError::sql(query, e))? {
        let record = Record::from_row(table, row, offset)
            .wrap_err_with(|| format!("reading row {} of: {}", records.len() + 1, query))?;
        records.push(record);
    }
    debug!(table = %table.name(), rows = records.len(), offset, "records read from query");
    Ok(records)
}

/// Inserts `records` into `table_name` with one prepared statement and a
/// shared load date. Returns the number of rows inserted.
pub fn insert_batch<'a>(
    conn: &Connection,
    table_name: &str,
    records: impl IntoIterator<Item = &'a Record>,
    lddate: NaiveDateTime,
    commit: bool,
) -> Result<usize> {
    let records: Vec<&Record> = records.into_iter().collect();
    let Some(first) = records.first() else {
        return Ok(0);
    };
    let table = Arc::clone(first.table());
    Record::ensure_kind(&table, records.iter().copied())?;

    let statement = sql::batch_insert_statement(&table, table_name);
    let tx = if commit {
        Some(
            conn.unchecked_transaction()
                .map_err(|e| RowError::sql(statement.as_str(), e))?,
        )
    } else {
        None
    };

    let mut inserted = 0;
    {
        let mut stmt = conn
            .prepare_cached(&statement)
            .map_err(|e| RowError::sql(statement.as_str(), e))?;
        for record in &records {
            let params = record.legacy_values_with_load_date(lddate);
            inserted += stmt
                .execute(params_from_iter(params.iter()))
                .map_err(|e| RowError::sql(statement.as_str(), e))?;
        }
    }

    if let Some(tx) = tx {
        tx.commit().map_err(|e| RowError::sql(statement.as_str(), e))?;
    }
    debug!(
        table = %table_name,
        rows = inserted,
        commit,
        "batch insert complete"
    );
    Ok(inserted)
}
