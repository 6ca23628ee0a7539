//! # Field Codec
//!
//! Per-column conversion rules shared by every record codec. A `FieldCodec`
//! borrows one [`ColumnDescriptor`] and converts a single value between its
//! in-memory form and each wire form.
//!
//! ## NA Handling
//!
//! `NotAvailable` never appears on the wire. Encoders substitute the column's
//! legacy sentinel; decoders map a decoded sentinel back to `NotAvailable`.
//! Text output renders the sentinel through the column's format specifier
//! exactly like any other value, so `%1.3f` writes `NaN` and a `-999.0`
//! sentinel as `-999.000`. Suppressing NA output is up to the caller.
//!
//! ## Binary Layout
//!
//! ```text
//! Integer:  [i64 big-endian: 8 bytes]
//! Float:    [f64 bits big-endian: 8 bytes]
//! Text:     [byte length: u32 big-endian][UTF-8 bytes]
//! ```
//!
//! The same layout is used by the stream codec (`std::io`) and the buffer
//! codec (`bytes::Buf` / `bytes::BufMut`).

use std::io::{ErrorKind as IoErrorKind, Read, Write};

use bytes::{Buf, BufMut};
use eyre::{bail, Result};

use crate::config::{MAX_TEXT_FIELD_BYTES, NUMERIC_FIELD_WIDTH, TEXT_LENGTH_PREFIX_WIDTH};
use crate::error::RowError;
use crate::schema::ColumnDescriptor;
use crate::types::{FieldType, FieldValue};

#[derive(Debug, Clone, Copy)]
pub struct FieldCodec<'a> {
    column: &'a ColumnDescriptor,
}

impl<'a> FieldCodec<'a> {
    pub fn new(column: &'a ColumnDescriptor) -> Self {
        Self { column }
    }

    /// Parses a text token as the column's type.
    pub fn parse(&self, token: &str) -> Result<FieldValue> {
        let value = match self.column.field_type() {
            FieldType::Integer => match token.trim().parse::<i64>() {
                Ok(v) => FieldValue::Integer(v),
                Err(_) => bail!(self.invalid_token(token)),
            },
            FieldType::Float => match token.trim().parse::<f64>() {
                Ok(v) => FieldValue::Float(v),
                Err(_) => bail!(self.invalid_token(token)),
            },
            FieldType::Text => FieldValue::Text(token.to_string()),
        };
        Ok(self.column.normalize(value))
    }

    /// Renders a value through the column's format specifier.
    pub fn format(&self, value: &FieldValue) -> String {
        let spec = self.column.format();
        match self.column.legacy(value) {
            FieldValue::Integer(v) => spec.format_integer(*v),
            FieldValue::Float(v) => spec.format_float(*v),
            FieldValue::Text(v) => spec.format_text(v),
            FieldValue::NotAvailable => String::new(),
        }
    }

    /// Number of bytes `value` occupies in the binary encoding.
    pub fn binary_width(&self, value: &FieldValue) -> usize {
        match self.column.legacy(value) {
            FieldValue::Text(v) => TEXT_LENGTH_PREFIX_WIDTH + v.len(),
            _ => NUMERIC_FIELD_WIDTH,
        }
    }

    pub fn write<W: Write>(&self, value: &FieldValue, out: &mut W) -> Result<()> {
        let written = match self.column.legacy(value) {
            FieldValue::Integer(v) => out.write_all(&v.to_be_bytes()),
            FieldValue::Float(v) => out.write_all(&v.to_bits().to_be_bytes()),
            FieldValue::Text(v) => {
                let len = self.checked_text_len(v.len())?;
                out.write_all(&len.to_be_bytes())
                    .and_then(|_| out.write_all(v.as_bytes()))
            }
            FieldValue::NotAvailable => Ok(()),
        };
        written.map_err(RowError::from)?;
        Ok(())
    }

    pub fn read<R: Read>(&self, input: &mut R) -> Result<FieldValue> {
        let value = match self.column.field_type() {
            FieldType::Integer => {
                let mut raw = [0u8; NUMERIC_FIELD_WIDTH];
                self.read_exact(input, &mut raw)?;
                FieldValue::Integer(i64::from_be_bytes(raw))
            }
            FieldType::Float => {
                let mut raw = [0u8; NUMERIC_FIELD_WIDTH];
                self.read_exact(input, &mut raw)?;
                FieldValue::Float(f64::from_bits(u64::from_be_bytes(raw)))
            }
            FieldType::Text => {
                let mut raw = [0u8; TEXT_LENGTH_PREFIX_WIDTH];
                self.read_exact(input, &mut raw)?;
                let len = self.checked_text_len(u32::from_be_bytes(raw) as usize)? as usize;
                let mut bytes = vec![0u8; len];
                self.read_exact(input, &mut bytes)?;
                self.text_from_utf8(bytes)?
            }
        };
        Ok(self.column.normalize(value))
    }

    /// Writes `value` into a buffer whose capacity the caller has checked.
    pub fn put<B: BufMut>(&self, value: &FieldValue, buf: &mut B) -> Result<()> {
        match self.column.legacy(value) {
            FieldValue::Integer(v) => buf.put_i64(*v),
            FieldValue::Float(v) => buf.put_f64(*v),
            FieldValue::Text(v) => {
                let len = self.checked_text_len(v.len())?;
                buf.put_u32(len);
                buf.put_slice(v.as_bytes());
            }
            FieldValue::NotAvailable => {}
        }
        Ok(())
    }

    pub fn get<B: Buf>(&self, buf: &mut B) -> Result<FieldValue> {
        let value = match self.column.field_type() {
            FieldType::Integer => {
                ensure_remaining(buf, NUMERIC_FIELD_WIDTH)?;
                FieldValue::Integer(buf.get_i64())
            }
            FieldType::Float => {
                ensure_remaining(buf, NUMERIC_FIELD_WIDTH)?;
                FieldValue::Float(buf.get_f64())
            }
            FieldType::Text => {
                ensure_remaining(buf, TEXT_LENGTH_PREFIX_WIDTH)?;
                let len = self.checked_text_len(buf.get_u32() as usize)? as usize;
                ensure_remaining(buf, len)?;
                let mut bytes = vec![0u8; len];
                buf.copy_to_slice(&mut bytes);
                self.text_from_utf8(bytes)?
            }
        };
        Ok(self.column.normalize(value))
    }

    fn read_exact<R: Read>(&self, input: &mut R, raw: &mut [u8]) -> Result<()> {
        match input.read_exact(raw) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::UnexpectedEof => bail!(RowError::UnexpectedEof {
                column: self.column.name().to_string(),
            }),
            Err(e) => bail!(RowError::from(e)),
        }
    }

    /// Fails if `value` cannot be written by `write` or `put`.
    pub fn check_encodable(&self, value: &FieldValue) -> Result<()> {
        if let FieldValue::Text(v) = self.column.legacy(value) {
            self.checked_text_len(v.len())?;
        }
        Ok(())
    }

    fn checked_text_len(&self, len: usize) -> Result<u32> {
        if len > MAX_TEXT_FIELD_BYTES {
            bail!(RowError::TextTooLong {
                column: self.column.name().to_string(),
                length: len,
                limit: MAX_TEXT_FIELD_BYTES,
            });
        }
        Ok(len as u32)
    }

    fn text_from_utf8(&self, bytes: Vec<u8>) -> Result<FieldValue> {
        match String::from_utf8(bytes) {
            Ok(s) => Ok(FieldValue::Text(s)),
            Err(_) => bail!(RowError::InvalidUtf8 {
                column: self.column.name().to_string(),
            }),
        }
    }

    fn invalid_token(&self, token: &str) -> RowError {
        RowError::InvalidToken {
            column: self.column.name().to_string(),
            token: token.to_string(),
            expected: self.column.field_type().name(),
        }
    }
}

fn ensure_remaining<B: Buf>(buf: &B, needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        bail!(RowError::Truncated {
            needed,
            available: buf.remaining(),
        });
    }
    Ok(())
}
