//! CREATE TABLE, key constraint and grant statements.

use crate::config::{DDL_NAME_WIDTH, DDL_TYPE_WIDTH, LOAD_DATE_COLUMN, LOAD_DATE_SQL_TYPE};
use crate::schema::TableDef;

/// Builds the statements that create `table_name` for records of `table`:
/// the CREATE TABLE, optionally the primary and unique key constraints, and a
/// public SELECT grant. Constraints are skipped for undeclared keys.
pub fn create_table_script(
    table: &TableDef,
    table_name: &str,
    include_primary_key: bool,
    include_unique_key: bool,
) -> Vec<String> {
    let mut script = Vec::with_capacity(4);

    let mut create = format!("create table {} (\n", table_name);
    for (col, sql_type) in table.columns().iter().zip(table.sql_types()) {
        create.push_str(&column_line(col.name(), &sql_type.to_string()));
        create.push_str(",\n");
    }
    create.push_str(&column_line(LOAD_DATE_COLUMN, LOAD_DATE_SQL_TYPE));
    create.push_str("\n)");
    script.push(create);

    let constraint = table_name.rsplit('.').next().unwrap_or(table_name);
    if include_primary_key {
        if let Some(key) = table.primary_key() {
            script.push(format!(
                "alter table {} add constraint {}_pk primary key ({})",
                table_name,
                constraint,
                key_list(table, key)
            ));
        }
    }
    if include_unique_key {
        if let Some(key) = table.unique_key() {
            script.push(format!(
                "alter table {} add constraint {}_uk unique ({})",
                table_name,
                constraint,
                key_list(table, key)
            ));
        }
    }
    script.push(format!("grant select on {} to public", table_name));
    script
}

fn column_line(name: &str, sql_type: &str) -> String {
    format!(
        "{:<name_w$} {:<type_w$} NOT NULL",
        name,
        sql_type,
        name_w = DDL_NAME_WIDTH,
        type_w = DDL_TYPE_WIDTH
    )
}

fn key_list(table: &TableDef, key: &[usize]) -> String {
    key.iter()
        .map(|&idx| table.columns()[idx].name())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnDef;
    use crate::sql::SqlType;

    #[test]
    fn script_matches_legacy_layout() {
        let table = TableDef::builder("gregion")
            .column(ColumnDef::integer("grn", "%d"), SqlType::Number(8))
            .column(ColumnDef::text("grname", "%s"), SqlType::Varchar2(40))
            .primary_key(&["grn"])
            .unique_key(&["grname"])
            .build()
            .unwrap();
        let script = create_table_script(&table, "kb.gregion", true, true);
        assert_eq!(
            script,
            [
                "create table kb.gregion (\n\
                 grn          number(8)            NOT NULL,\n\
                 grname       varchar2(40)         NOT NULL,\n\
                 lddate       date                 NOT NULL\n\
                 )",
                "alter table kb.gregion add constraint gregion_pk primary key (grn)",
                "alter table kb.gregion add constraint gregion_uk unique (grname)",
                "grant select on kb.gregion to public",
            ]
        );
    }

    #[test]
    fn undeclared_or_excluded_keys_are_skipped() {
        let table = TableDef::builder("remark")
            .column(ColumnDef::integer("commid", "%d"), SqlType::Number(9))
            .column(ColumnDef::integer("lineno", "%d"), SqlType::Number(8))
            .primary_key(&["commid", "lineno"])
            .build()
            .unwrap();
        let script = create_table_script(&table, "remark", true, true);
        assert_eq!(script.len(), 3);
        assert_eq!(
            script[1],
            "alter table remark add constraint remark_pk primary key (commid,lineno)"
        );
        assert_eq!(create_table_script(&table, "remark", false, true).len(), 2);
    }
}
