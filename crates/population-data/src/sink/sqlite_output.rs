//! SQLite output through Diesel.
//!
//! The table is created when absent and rows are appended inside a single
//! transaction, so a failed run leaves the table as it was.

use camino::Utf8Path;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Integer, Text};
use tracing::debug;

use crate::error::{GenerationError, SinkError};
use crate::record::{FIELD_NAMES, PersonRecord};
use crate::validation::is_valid_table_name;

const AGE_COLUMN: &str = "edad";

/// Appends records to `table` in the SQLite database at `database`.
///
/// Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`SinkError::Database`] if the table name is not a plain
/// identifier or a statement fails, and [`SinkError::Generation`] if a
/// record cannot be generated. Either rolls the inserts back.
pub fn write_sqlite<I>(database: &Utf8Path, table: &str, records: I) -> Result<usize, SinkError>
where
    I: IntoIterator<Item = Result<PersonRecord, GenerationError>>,
{
    if !is_valid_table_name(table) {
        return Err(SinkError::Database {
            message: format!("invalid table name '{table}'"),
        });
    }

    let mut conn =
        SqliteConnection::establish(database.as_str()).map_err(|err| SinkError::Database {
            message: format!("failed to open '{database}': {err}"),
        })?;
    conn.batch_execute(&create_table_sql(table))?;

    let insert = insert_sql(table);
    conn.transaction::<_, SinkError, _>(|conn| {
        let mut inserted = 0_usize;
        for record in records {
            insert_record(conn, &insert, &record?)?;
            inserted += 1;
        }
        debug!(table, inserted, "committing population rows");
        Ok(inserted)
    })
}

fn insert_record(
    conn: &mut SqliteConnection,
    insert: &str,
    record: &PersonRecord,
) -> Result<(), SinkError> {
    sql_query(insert)
        .bind::<Text, _>(record.given_name.as_str())
        .bind::<Text, _>(record.surnames.as_str())
        .bind::<Text, _>(record.street.as_str())
        .bind::<Text, _>(record.house_number.as_str())
        .bind::<Text, _>(record.postcode.as_str())
        .bind::<Text, _>(record.locality.as_str())
        .bind::<Text, _>(record.province.as_str())
        .bind::<Integer, _>(i32::from(record.age))
        .bind::<Text, _>(record.sex.as_str())
        .bind::<Text, _>(record.gender.as_str())
        .bind::<Text, _>(record.birth_date.to_string())
        .bind::<Text, _>(record.national_id.as_str())
        .bind::<Text, _>(record.phone.as_str())
        .execute(conn)?;
    Ok(())
}

fn create_table_sql(table: &str) -> String {
    let columns = FIELD_NAMES
        .iter()
        .map(|name| {
            let sql_type = if *name == AGE_COLUMN { "INTEGER" } else { "TEXT" };
            format!("{name} {sql_type}")
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE IF NOT EXISTS \"{table}\" ({columns})")
}

fn insert_sql(table: &str) -> String {
    let placeholders = vec!["?"; FIELD_NAMES.len()].join(", ");
    format!(
        "INSERT INTO \"{table}\" ({}) VALUES ({placeholders})",
        FIELD_NAMES.join(", ")
    )
}
