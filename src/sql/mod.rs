//! # SQL Text Generation
//!
//! Builds the DDL and DML text for a record kind from its table definition.
//! Column lists always follow the registry's natural order and end with the
//! `lddate` load-date column.
//!
//! ## Module Structure
//!
//! - `sql_type`: declared column types, range checks and binary bounds
//! - `ddl`: CREATE TABLE script with key constraints and grant
//! - `dml`: parameterized and legacy literal INSERT text
//!
//! ## Example
//!
//! ```ignore
//! let script = rowdef::sql::create_table_script(&gregion, "kb.gregion", true, false);
//! // create table kb.gregion (
//! // grn          number(8)            NOT NULL,
//! // grname       varchar2(40)         NOT NULL,
//! // lddate       date                 NOT NULL
//! // )
//! // alter table kb.gregion add constraint gregion_pk primary key (grn)
//! // grant select on kb.gregion to public
//! ```

mod ddl;
mod dml;
mod sql_type;

pub use ddl::create_table_script;
pub use dml::{batch_insert_statement, insert_statement, legacy_float_literal, legacy_insert_sql};
pub use sql_type::SqlType;
