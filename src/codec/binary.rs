//! # Binary Record Codecs
//!
//! Two codecs share one layout: the concatenation of every field in natural
//! order, each encoded by [`FieldCodec`](super::FieldCodec).
//!
//! ```text
//! +---------+---------+------------------+---------+
//! | field 0 | field 1 | ...              | field n |   natural order, no header
//! +---------+---------+------------------+---------+
//!   i64/f64: 8 bytes big-endian
//!   text:    u32 big-endian byte length, then UTF-8 bytes
//! ```
//!
//! - **Stream codec**: `std::io::Read` / `std::io::Write`. A stream holding
//!   several records is read until a clean end of input between records; an
//!   end of input inside a record is a format error.
//! - **Buffer codec**: `bytes::Buf` / `bytes::BufMut`. Capacity is checked
//!   before anything is written, so a failed encode leaves the buffer as it
//!   was.
//!
//! Both encoders check every text length against the limit before the first
//! field is written. Only an I/O failure can leave a partial record behind.
//!
//! Binary encodings ignore every [`ColumnOrdering`](crate::schema::ColumnOrdering).
//! A record written as text under a custom ordering and the same record
//! written as binary are therefore not mirror images of each other.

use std::io::{BufRead, Read, Write};
use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use eyre::{bail, Result, WrapErr};

use super::field::FieldCodec;
use crate::error::RowError;
use crate::record::{FieldValues, Record};
use crate::schema::TableDef;

/// Exact number of bytes `record` occupies in the binary encoding.
pub fn encoded_len(record: &Record) -> usize {
    record
        .table()
        .columns()
        .iter()
        .zip(record.values())
        .map(|(col, value)| FieldCodec::new(col).binary_width(value))
        .sum()
}

/// Fails if any field of `record` cannot be encoded.
fn ensure_encodable(record: &Record) -> Result<()> {
    for (col, value) in record.table().columns().iter().zip(record.values()) {
        FieldCodec::new(col).check_encodable(value)?;
    }
    Ok(())
}

pub fn write_record<W: Write>(record: &Record, out: &mut W) -> Result<()> {
    ensure_encodable(record)?;
    for (col, value) in record.table().columns().iter().zip(record.values()) {
        FieldCodec::new(col).write(value, out)?;
    }
    Ok(())
}

pub fn read_record<R: Read>(table: &Arc<TableDef>, input: &mut R) -> Result<Record> {
    let mut values = FieldValues::with_capacity(table.len());
    for col in table.columns() {
        values.push(FieldCodec::new(col).read(input)?);
    }
    Ok(Record::from_decoded(table, values))
}

/// Reads records until the stream ends cleanly between two records.
pub fn read_records<R: BufRead>(table: &Arc<TableDef>, input: &mut R) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    loop {
        let at_end = input
            .fill_buf()
            .map_err(RowError::from)?
            .is_empty();
        if at_end {
            return Ok(records);
        }
        let record = read_record(table, input)
            .wrap_err_with(|| format!("binary record {}", records.len() + 1))?;
        records.push(record);
    }
}

pub fn write_records<'a, W: Write>(
    table: &TableDef,
    records: impl IntoIterator<Item = &'a Record>,
    out: &mut W,
) -> Result<usize> {
    let mut written = 0;
    for record in records {
        Record::ensure_kind(table, [record])?;
        write_record(record, out)?;
        written += 1;
    }
    out.flush().map_err(RowError::from)?;
    Ok(written)
}

/// Appends `record` to `buf`. Fails without writing if a field cannot be
/// encoded or the remaining capacity is too small.
pub fn encode_to_buf<B: BufMut>(record: &Record, buf: &mut B) -> Result<()> {
    ensure_encodable(record)?;
    let needed = encoded_len(record);
    if buf.remaining_mut() < needed {
        bail!(RowError::BufferTooSmall {
            needed,
            available: buf.remaining_mut(),
        });
    }
    for (col, value) in record.table().columns().iter().zip(record.values()) {
        FieldCodec::new(col).put(value, buf)?;
    }
    Ok(())
}

pub fn decode_from_buf<B: Buf>(table: &Arc<TableDef>, buf: &mut B) -> Result<Record> {
    let mut values = FieldValues::with_capacity(table.len());
    for col in table.columns() {
        values.push(FieldCodec::new(col).get(buf)?);
    }
    Ok(Record::from_decoded(table, values))
}

pub fn to_bytes(record: &Record) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(encoded_len(record));
    encode_to_buf(record, &mut buf)?;
    Ok(buf.freeze())
}

impl Record {
    pub fn write_binary<W: Write>(&self, out: &mut W) -> Result<()> {
        write_record(self, out)
    }

    pub fn read_binary<R: Read>(table: &Arc<TableDef>, input: &mut R) -> Result<Record> {
        read_record(table, input)
    }

    pub fn put_buf<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        encode_to_buf(self, buf)
    }

    pub fn from_buf<B: Buf>(table: &Arc<TableDef>, buf: &mut B) -> Result<Record> {
        decode_from_buf(table, buf)
    }

    pub fn to_bytes(&self) -> Result<Bytes> {
        to_bytes(self)
    }

    pub fn encoded_len(&self) -> usize {
        encoded_len(self)
    }
}
