//! # Text Codec Tests
//!
//! End-to-end tests of the line codec through files and in-memory streams:
//! - default-order round trips
//! - header-declared permutations and subsets
//! - isolation of header overrides from later and concurrent reads
//! - error reporting for malformed lines

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::sync::Arc;

use rowdef::codec::text::{self, TextReader};
use rowdef::config::TextOptions;
use rowdef::error::error_kind;
use rowdef::{ColumnDef, ErrorKind, FieldValue, Record, SqlType, TableDef};
use tempfile::tempdir;

fn scores() -> Arc<TableDef> {
    TableDef::builder("scores")
        .column(ColumnDef::integer("id", "%d").optional(), SqlType::Number(9))
        .column(ColumnDef::text("name", "%s"), SqlType::Varchar2(40))
        .column(ColumnDef::float("score", "%1.3f"), SqlType::Float(53))
        .primary_key(&["id"])
        .build()
        .unwrap()
}

fn origin() -> Arc<TableDef> {
    TableDef::builder("origin")
        .column(ColumnDef::float("lat", "%9.4f").with_na(-999.0), SqlType::Float(53))
        .column(ColumnDef::float("lon", "%9.4f").with_na(-999.0), SqlType::Float(53))
        .column(ColumnDef::float("depth", "%9.4f").with_na(-999.0), SqlType::Float(24))
        .column(ColumnDef::float("time", "%17.5f"), SqlType::Float(53))
        .column(ColumnDef::integer("orid", "%d"), SqlType::Number(9))
        .column(ColumnDef::integer("nass", "%4d").with_na(-1).optional(), SqlType::Number(4))
        .column(ColumnDef::text("etype", "%-7s").optional(), SqlType::Varchar2(7))
        .column(ColumnDef::float("mb", "%7.2f").with_na(-999.0).optional(), SqlType::Float(24))
        .column(ColumnDef::text("auth", "%-15s"), SqlType::Varchar2(15))
        .primary_key(&["orid"])
        .unique_key(&["lat", "lon", "depth", "time", "auth"])
        .build()
        .unwrap()
}

fn origin_row(table: &Arc<TableDef>, orid: i64) -> Record {
    Record::from_values(
        table,
        [
            43.5.into(),
            (-110.25).into(),
            12.0.into(),
            1_262_304_000.125.into(),
            orid.into(),
            FieldValue::NotAvailable,
            "eq".into(),
            4.75.into(),
            "NEIC:bulletin".into(),
        ],
    )
    .unwrap()
}

mod round_trip_tests {
    use super::*;

    #[test]
    fn header_selects_and_reorders_input_columns() {
        let table = scores();
        let records = text::read_records(&table, "#score name\n3.500 Alice\n".as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert!(record.is_na("id").unwrap());
        assert_eq!(record.text("name").unwrap(), Some("Alice"));
        assert_eq!(record.float("score").unwrap(), Some(3.5));

        let ordering = table
            .ordering()
            .with_output(table.registry(), &["score", "name"])
            .unwrap();
        assert_eq!(
            text::format_line(record, &ordering, &TextOptions::default()).unwrap(),
            "3.500 Alice"
        );
    }

    #[test]
    fn default_order_round_trips_through_a_file() {
        let table = origin();
        let records: Vec<Record> = (1..=25).map(|orid| origin_row(&table, orid)).collect();

        let dir = tempdir().unwrap();
        let path = dir.path().join("origin.txt");
        {
            let mut out = BufWriter::new(File::create(&path).unwrap());
            let written = text::write_records(
                &table,
                &table.ordering(),
                &TextOptions::default(),
                &records,
                &mut out,
            )
            .unwrap();
            assert_eq!(written, 25);
        }

        let decoded = text::read_records(&table, BufReader::new(File::open(&path).unwrap())).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn custom_order_round_trip_sets_omitted_columns_na() {
        let table = origin();
        let source = origin_row(&table, 7);
        let ordering = table
            .ordering()
            .with_output(table.registry(), &["auth", "orid", "time", "depth", "lon", "lat"])
            .unwrap();

        let mut encoded = Vec::new();
        text::write_records(&table, &ordering, &TextOptions::default(), [&source], &mut encoded)
            .unwrap();
        let decoded = text::read_records(&table, encoded.as_slice()).unwrap();

        assert_eq!(decoded.len(), 1);
        let record = &decoded[0];
        for column in ["auth", "orid", "time", "depth", "lon", "lat"] {
            assert_eq!(record.get(column).unwrap(), source.get(column).unwrap());
        }
        for column in ["nass", "etype", "mb"] {
            assert!(record.is_na(column).unwrap(), "{} should be NA", column);
        }
    }

    #[test]
    fn tab_delimited_files_round_trip() {
        let table = scores();
        let opts = TextOptions::from_delimiter_description("tab");
        let records = vec![
            Record::from_values(&table, [1i64.into(), "Ann Lee".into(), 9.5.into()]).unwrap(),
            Record::new(&table),
        ];
        let mut out = Vec::new();
        text::write_records(&table, &table.ordering(), &opts, &records, &mut out).unwrap();
        let written = String::from_utf8(out.clone()).unwrap();
        assert!(written.starts_with("#id\tname\tscore\n"));

        let decoded: Vec<Record> = TextReader::new(&table, out.as_slice())
            .with_options(opts)
            .collect::<eyre::Result<_>>()
            .unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn comma_delimited_input() {
        let table = scores();
        let opts = TextOptions::new().with_delimiter(",");
        let input = "#name,score\nAnn Lee, 9.500\n'Bob', NaN\n";
        let decoded: Vec<Record> = TextReader::new(&table, input.as_bytes())
            .with_options(opts)
            .collect::<eyre::Result<_>>()
            .unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].text("name").unwrap(), Some("Ann Lee"));
        assert_eq!(decoded[0].float("score").unwrap(), Some(9.5));
        assert_eq!(decoded[1].text("name").unwrap(), Some("Bob"));
        assert!(decoded[1].is_na("score").unwrap());
    }
}

mod comment_marker_tests {
    use super::*;

    fn tags() -> Arc<TableDef> {
        TableDef::builder("tags")
            .column(ColumnDef::text("name", "%s"), SqlType::Varchar2(20))
            .column(ColumnDef::integer("id", "%d"), SqlType::Number(9))
            .build()
            .unwrap()
    }

    fn tag_rows(table: &Arc<TableDef>) -> Vec<Record> {
        vec![
            Record::from_values(table, ["#tag".into(), 1i64.into()]).unwrap(),
            Record::from_values(table, ["ok".into(), 2i64.into()]).unwrap(),
            Record::from_values(table, ["  #padded".into(), 3i64.into()]).unwrap(),
        ]
    }

    #[test]
    fn leading_marker_in_first_column_round_trips() {
        let table = tags();
        let records = tag_rows(&table);
        let mut out = Vec::new();
        text::write_records(&table, &table.ordering(), &TextOptions::default(), &records, &mut out)
            .unwrap();
        let written = String::from_utf8(out.clone()).unwrap();
        assert!(written.starts_with("#name id\n\"#tag\" 1\n"), "{}", written);

        let decoded = text::read_records(&table, out.as_slice()).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn headerless_stream_starting_with_marker_text() {
        let table = tags();
        let records = tag_rows(&table);
        let lines: String = records
            .iter()
            .map(|r| format!("{}\n", r.to_text_line().unwrap()))
            .collect();
        let decoded = text::read_records(&table, lines.as_bytes()).unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn tab_delimited_marker_text_round_trips() {
        let table = tags();
        let records = tag_rows(&table);
        let opts = TextOptions::from_delimiter_description("tab");
        let mut out = Vec::new();
        text::write_records(&table, &table.ordering(), &opts, &records, &mut out).unwrap();
        let decoded: Vec<Record> = TextReader::new(&table, out.as_slice())
            .with_options(opts)
            .collect::<eyre::Result<_>>()
            .unwrap();
        assert_eq!(decoded, records);
    }
}

mod ordering_isolation_tests {
    use super::*;

    #[test]
    fn header_override_does_not_leak_into_next_read() {
        let table = scores();
        let first = text::read_records(&table, "#name score\nAlice 1.0\n".as_bytes()).unwrap();
        assert_eq!(first[0].text("name").unwrap(), Some("Alice"));

        let second = text::read_records(&table, "3 Bob 2.0\n".as_bytes()).unwrap();
        assert_eq!(second[0].integer("id").unwrap(), Some(3));
        assert_eq!(second[0].text("name").unwrap(), Some("Bob"));
        assert_eq!(table.ordering().input(), &[0, 1, 2]);
    }

    #[test]
    fn replaced_default_applies_until_reset() {
        let table = scores();
        table.set_input_columns(&["score", "name"]).unwrap();
        let records = text::read_records(&table, "2.500 Carol\n".as_bytes()).unwrap();
        assert_eq!(records[0].float("score").unwrap(), Some(2.5));

        table.reset_ordering();
        assert!(text::read_records(&table, "2.500 Carol\n".as_bytes()).is_err());
    }

    #[test]
    fn reader_keeps_snapshot_when_default_changes_mid_stream() {
        let table = scores();
        let mut reader = TextReader::new(&table, "1 a 1.0\n2 b 2.0\n".as_bytes());
        assert!(reader.next_record().unwrap().is_some());
        table.set_input_columns(&["name", "score"]).unwrap();
        let second = reader.next_record().unwrap().unwrap();
        assert_eq!(second.integer("id").unwrap(), Some(2));
    }

    #[test]
    fn concurrent_reads_with_different_headers() {
        let table = scores();
        let forward: String = std::iter::once("#id name score\n".to_string())
            .chain((0..500).map(|i| format!("{} n{} {}.0\n", i, i, i)))
            .collect();
        let reversed: String = std::iter::once("#score name id\n".to_string())
            .chain((0..500).map(|i| format!("{}.0 n{} {}\n", i, i, i)))
            .collect();

        std::thread::scope(|s| {
            let a = s.spawn(|| text::read_records(&table, forward.as_bytes()).unwrap());
            let b = s.spawn(|| text::read_records(&table, reversed.as_bytes()).unwrap());
            let a = a.join().unwrap();
            let b = b.join().unwrap();
            assert_eq!(a, b);
            assert_eq!(a[499].integer("id").unwrap(), Some(499));
        });
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn wrong_token_count_aborts_the_read() {
        let table = scores();
        let err = text::read_records(&table, "1 a 1.0\n2 b\n3 c 3.0\n".as_bytes()).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Format));
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn unparsable_number_is_a_format_error() {
        let table = scores();
        let err = Record::from_text_line(&table, "x a 1.0").unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Format));
    }

    #[test]
    fn header_with_unknown_column_is_a_schema_error() {
        let table = scores();
        let err = text::read_records(&table, "#name score rank\n".as_bytes()).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Schema));
        assert!(format!("{:#}", err).contains("'rank'"));
    }

    #[test]
    fn duplicates_collapse_in_record_sets() {
        let table = scores();
        let input = "1 a 1.0\n1 a 1.0\n1 a 1.5\n";
        let set = text::read_record_set(&table, input.as_bytes()).unwrap();
        assert_eq!(set.len(), 2);
    }
}
