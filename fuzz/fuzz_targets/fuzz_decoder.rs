//! Fuzz testing for the record decoders.
//!
//! This fuzz target builds a table definition from arbitrary column types and
//! feeds arbitrary bytes to the binary stream, buffer and text decoders to
//! ensure malformed input is reported as an error rather than a panic.

#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use rowdef::codec::{binary, text};
use rowdef::{ColumnDef, Record, SqlType, TableDef};

#[derive(Debug, Arbitrary)]
struct DecoderInput {
    column_types: Vec<FuzzFieldType>,
    data: Vec<u8>,
}

#[derive(Debug, Arbitrary, Clone, Copy)]
enum FuzzFieldType {
    Integer,
    Float,
    Text,
}

impl FuzzFieldType {
    fn column(self, index: usize) -> (ColumnDef, SqlType) {
        let name = format!("c{}", index);
        match self {
            FuzzFieldType::Integer => (ColumnDef::integer(&name, "%d"), SqlType::Number(18)),
            FuzzFieldType::Float => (ColumnDef::float(&name, "%.6e"), SqlType::Float(53)),
            FuzzFieldType::Text => (ColumnDef::text(&name, "%s"), SqlType::Varchar2(4000)),
        }
    }
}

fuzz_target!(|input: DecoderInput| {
    if input.column_types.is_empty() || input.column_types.len() > 64 {
        return;
    }

    let builder = input
        .column_types
        .iter()
        .enumerate()
        .fold(TableDef::builder("fuzz"), |builder, (i, ty)| {
            let (def, sql_type) = ty.column(i);
            builder.column(def, sql_type)
        });
    let Ok(table) = builder.build() else {
        return;
    };

    let mut stream = input.data.as_slice();
    let _ = binary::read_records(&table, &mut stream);

    let mut buf = Bytes::from(input.data.clone());
    while let Ok(record) = Record::from_buf(&table, &mut buf) {
        let _ = record.to_bytes();
    }

    if let Ok(lines) = std::str::from_utf8(&input.data) {
        let _ = text::read_records(&table, lines.as_bytes());
    }
});
