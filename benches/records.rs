//! Record benchmarks for rowdef
//!
//! These benchmarks measure record construction, setters, signature
//! computation and set insertion, which dominate bulk loading.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashbrown::HashSet;
use rowdef::{ColumnDef, FieldValue, Record, SqlType, TableDef};
use std::hint::black_box as hint_black_box;

fn arrival() -> Arc<TableDef> {
    TableDef::builder("arrival")
        .column(ColumnDef::text("sta", "%-6s"), SqlType::Varchar2(6))
        .column(ColumnDef::float("time", "%17.5f"), SqlType::Float(53))
        .column(ColumnDef::integer("arid", "%d"), SqlType::Number(9))
        .column(ColumnDef::integer("jdate", "%d").with_na(-1), SqlType::Number(8))
        .column(ColumnDef::text("iphase", "%-8s"), SqlType::Varchar2(8))
        .column(ColumnDef::float("azimuth", "%7.2f").with_na(-1.0), SqlType::Float(24))
        .column(ColumnDef::float("snr", "%10.2f").with_na(-1.0), SqlType::Float(24))
        .column(ColumnDef::text("auth", "%-15s"), SqlType::Varchar2(15))
        .primary_key(&["arid"])
        .build()
        .expect("arrival table")
}

fn row(table: &Arc<TableDef>, arid: i64) -> Record {
    Record::from_values(
        table,
        [
            "ARCES".into(),
            (1_262_304_000.0 + arid as f64).into(),
            arid.into(),
            2010001i64.into(),
            "Pn".into(),
            FieldValue::NotAvailable,
            12.5.into(),
            "IDC".into(),
        ],
    )
    .expect("arrival row")
}

fn bench_construction(c: &mut Criterion) {
    let table = arrival();
    let mut group = c.benchmark_group("record_construction");

    group.bench_function("new_all_na", |b| {
        b.iter(|| hint_black_box(Record::new(black_box(&table))));
    });

    group.bench_function("from_values", |b| {
        b.iter(|| hint_black_box(row(&table, black_box(42))));
    });

    group.bench_function("set_by_name", |b| {
        let mut record = row(&table, 1);
        b.iter(|| {
            record.set_float("snr", black_box(3.25)).expect("set");
            record.set_text("iphase", black_box("Sn")).expect("set");
        });
    });

    group.finish();
}

fn bench_signature(c: &mut Criterion) {
    let table = arrival();
    let mut group = c.benchmark_group("record_signature");

    group.bench_function("cold", |b| {
        let mut record = row(&table, 7);
        b.iter(|| {
            record.set_integer("arid", black_box(7)).expect("set");
            hint_black_box(record.signature())
        });
    });

    group.bench_function("cached", |b| {
        let record = row(&table, 7);
        record.signature();
        b.iter(|| hint_black_box(record.signature()));
    });

    group.finish();
}

fn bench_set_insertion(c: &mut Criterion) {
    let table = arrival();
    let mut group = c.benchmark_group("record_set");

    for count in [100usize, 1_000, 10_000] {
        let records: Vec<Record> = (0..count as i64).map(|i| row(&table, i % 500)).collect();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("dedup", count), &records, |b, records| {
            b.iter(|| {
                let set: HashSet<Record> = records.iter().cloned().collect();
                hint_black_box(set.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_construction, bench_signature, bench_set_insertion);
criterion_main!(benches);
