//! # Record Behavior Tests
//!
//! Column validation, key predicates, signature caching and SQL text for a
//! realistic multi-column record kind.

use std::sync::Arc;

use hashbrown::HashSet;
use rowdef::error::error_kind;
use rowdef::sql::{self, SqlType};
use rowdef::{ColumnDef, ErrorKind, FieldValue, Record, TableDef};

fn netmag() -> Arc<TableDef> {
    TableDef::builder("netmag")
        .column(ColumnDef::integer("magid", "%d"), SqlType::Number(9))
        .column(ColumnDef::text("net", "%-8s"), SqlType::Varchar2(8))
        .column(ColumnDef::integer("orid", "%d"), SqlType::Number(9))
        .column(ColumnDef::integer("evid", "%d").with_na(-1), SqlType::Number(9))
        .column(ColumnDef::text("magtype", "%-6s"), SqlType::Varchar2(6))
        .column(ColumnDef::integer("nsta", "%d").with_na(-1).optional(), SqlType::Number(8))
        .column(ColumnDef::float("magnitude", "%7.2f"), SqlType::Float(24))
        .column(ColumnDef::float("uncertainty", "%7.2f").with_na(-1.0).optional(), SqlType::Float(24))
        .column(ColumnDef::text("auth", "%-15s"), SqlType::Varchar2(15))
        .primary_key(&["magid"])
        .unique_key(&["orid", "magtype", "auth"])
        .build()
        .unwrap()
}

fn sample(table: &Arc<TableDef>, magid: i64, magnitude: f64) -> Record {
    Record::from_values(
        table,
        [
            magid.into(),
            "IDC".into(),
            100i64.into(),
            FieldValue::NotAvailable,
            "mb".into(),
            12i64.into(),
            magnitude.into(),
            0.1.into(),
            "IDC_SEL3".into(),
        ],
    )
    .unwrap()
}

mod validation_tests {
    use super::*;

    #[test]
    fn input_ordering_rejects_unknown_name() {
        let table = netmag();
        let err = table.set_input_columns(&["magid", "magnitudes"]).unwrap_err();
        assert_eq!(error_kind(&err), Some(ErrorKind::Schema));
        assert!(err.to_string().contains("'magnitudes'"));
    }

    #[test]
    fn input_ordering_rejects_missing_mandatory_column() {
        let table = netmag();
        let err = table
            .set_input_columns(&["magid", "net", "orid", "evid", "magtype", "magnitude"])
            .unwrap_err();
        assert!(err.to_string().contains("'auth'"));
    }

    #[test]
    fn input_ordering_may_omit_optional_columns() {
        let table = netmag();
        table
            .set_input_columns(&["auth", "magnitude", "magtype", "evid", "orid", "net", "magid"])
            .unwrap();
        assert_eq!(table.ordering().input().len(), 7);
    }

    #[test]
    fn output_ordering_accepts_any_subset() {
        let table = netmag();
        table.set_output_columns(&["MAGNITUDE"]).unwrap();
        let record = sample(&table, 1, 4.5);
        assert_eq!(record.to_text_line().unwrap(), "   4.50");
        assert!(table.set_output_columns(&["bogus"]).is_err());
    }

    #[test]
    fn column_names_are_case_insensitive() {
        let table = netmag();
        let mut record = sample(&table, 1, 4.5);
        record.set("MagType", "ML").unwrap();
        assert_eq!(record.text("magtype").unwrap(), Some("ML"));
    }
}

mod identity_tests {
    use super::*;

    #[test]
    fn primary_key_compares_only_magid() {
        let table = netmag();
        let a = sample(&table, 1, 4.5);
        let b = sample(&table, 1, 5.5);
        assert!(a.equal_primary_key(&b));
        assert!(!a.equal_primary_key(&sample(&table, 2, 4.5)));
    }

    #[test]
    fn unique_key_ignores_other_columns() {
        let table = netmag();
        let a = sample(&table, 1, 4.5);
        let mut b = sample(&table, 2, 3.0);
        assert!(a.equal_unique_key(&b));
        b.set_text("auth", "other").unwrap();
        assert!(!a.equal_unique_key(&b));
    }

    #[test]
    fn key_predicates_ignore_ordering_and_hash_state() {
        let table = netmag();
        let a = sample(&table, 1, 4.5);
        let b = sample(&table, 1, 4.5);
        let _ = a.signature();
        table.set_output_columns(&["auth"]).unwrap();
        assert!(a.equal_primary_key(&b));
        assert!(a.equal_unique_key(&b));
    }
}

mod hash_cache_tests {
    use super::*;

    #[test]
    fn every_setter_clears_the_cached_signature() {
        let table = netmag();
        let mut record = sample(&table, 1, 4.5);
        let setters: Vec<Box<dyn Fn(&mut Record) -> eyre::Result<()>>> = vec![
            Box::new(|r: &mut Record| r.set_integer("magid", 1)),
            Box::new(|r: &mut Record| r.set_text("net", "IDC")),
            Box::new(|r: &mut Record| r.set_float("magnitude", 4.5)),
            Box::new(|r: &mut Record| r.set_na("evid")),
            Box::new(|r: &mut Record| r.set("uncertainty", 0.1)),
        ];
        let original = record.signature();
        for setter in &setters {
            let _ = record.signature();
            assert!(record.is_hash_cached());
            setter(&mut record).unwrap();
            assert!(!record.is_hash_cached());
            assert_eq!(record.signature(), original);
        }
    }

    #[test]
    fn changed_value_changes_signature() {
        let table = netmag();
        let mut record = sample(&table, 1, 4.5);
        let before = record.signature();
        record.set_float("magnitude", 4.6).unwrap();
        assert_ne!(record.signature(), before);
    }

    #[test]
    fn sets_deduplicate_equal_rows() {
        let table = netmag();
        let mut set = HashSet::new();
        for i in 0..50 {
            set.insert(sample(&table, i % 10, 4.5));
        }
        assert_eq!(set.len(), 10);
        assert!(set.contains(&sample(&table, 3, 4.5)));
    }
}

mod sql_text_tests {
    use super::*;

    #[test]
    fn create_script_lists_natural_order() {
        let table = netmag();
        table.set_output_columns(&["auth", "magid"]).unwrap();
        let script = sql::create_table_script(&table, "idc.netmag", true, true);
        assert_eq!(script.len(), 4);
        let columns: Vec<&str> = script[0]
            .lines()
            .skip(1)
            .filter_map(|line| line.split_whitespace().next())
            .filter(|name| *name != ")")
            .collect();
        assert_eq!(
            columns,
            [
                "magid", "net", "orid", "evid", "magtype", "nsta", "magnitude", "uncertainty",
                "auth", "lddate"
            ]
        );
        assert_eq!(
            script[2],
            "alter table idc.netmag add constraint netmag_uk unique (orid,magtype,auth)"
        );
    }

    #[test]
    fn legacy_insert_uses_sentinels_and_sysdate() {
        let table = netmag();
        let record = sample(&table, 9, 4.5);
        assert_eq!(
            record.legacy_insert_sql("netmag"),
            "insert into netmag (magid, net, orid, evid, magtype, nsta, magnitude, uncertainty, auth, lddate) \
             values (9, 'IDC', 100, -1, 'mb', 12, 4.5, 0.1, 'IDC_SEL3', SYSDATE)"
        );
    }
}
