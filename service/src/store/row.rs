use tokio_postgres::{types::ToSql, Row};

use crate::model::person::Person;

use super::{StoreError, StoreResult};

pub const EMAIL_COLUMN: &str = "email";
pub const FIRST_NAME_COLUMN: &str = "first_name";
pub const LAST_NAME_COLUMN: &str = "last_name";
pub const YEAR_BIRTH_COLUMN: &str = "year_birth";

/// Statements for a single person table
///
/// The table name cannot be bound as a parameter so it is validated and
/// formatted into each statement once, when the store is created.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonTableStatements {
    pub create_table: String,
    pub upsert: String,
    pub select_by_email: String,
    pub delete_by_email: String,
}

impl PersonTableStatements {
    pub fn new(table: &str) -> StoreResult<Self> {
        validate_table_name(table)?;

        Ok(Self {
            create_table: format!(
                r#"CREATE TABLE IF NOT EXISTS "{table}" (
                    "{EMAIL_COLUMN}" text NOT NULL,
                    "{FIRST_NAME_COLUMN}" text,
                    "{LAST_NAME_COLUMN}" text,
                    "{YEAR_BIRTH_COLUMN}" int4,
                    PRIMARY KEY ("{EMAIL_COLUMN}")
                );"#
            ),
            upsert: format!(
                r#"INSERT INTO "{table}" ("{EMAIL_COLUMN}", "{FIRST_NAME_COLUMN}", "{LAST_NAME_COLUMN}", "{YEAR_BIRTH_COLUMN}")
                VALUES ($1, $2, $3, $4)
                ON CONFLICT ("{EMAIL_COLUMN}") DO UPDATE SET
                    "{FIRST_NAME_COLUMN}" = EXCLUDED."{FIRST_NAME_COLUMN}",
                    "{LAST_NAME_COLUMN}" = EXCLUDED."{LAST_NAME_COLUMN}",
                    "{YEAR_BIRTH_COLUMN}" = EXCLUDED."{YEAR_BIRTH_COLUMN}";"#
            ),
            select_by_email: format!(
                r#"SELECT "{EMAIL_COLUMN}", "{FIRST_NAME_COLUMN}", "{LAST_NAME_COLUMN}", "{YEAR_BIRTH_COLUMN}"
                FROM "{table}" WHERE "{EMAIL_COLUMN}" = $1;"#
            ),
            delete_by_email: format!(r#"DELETE FROM "{table}" WHERE "{EMAIL_COLUMN}" = $1;"#),
        })
    }
}

fn validate_table_name(table: &str) -> StoreResult<()> {
    let mut chars = table.chars();

    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);

    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidTableName(table.to_string()));
    }

    Ok(())
}

/// Parameters for [`PersonTableStatements::upsert`], in column order
pub fn person_to_params(person: &Person) -> [&(dyn ToSql + Sync); 4] {
    [
        &person.email,
        &person.first_name,
        &person.last_name,
        &person.year_birth,
    ]
}

/// Text columns may be null in the table, a null name maps to an empty string
pub fn person_from_row(row: &Row) -> StoreResult<Person> {
    let text = |column: &str| -> StoreResult<String> {
        row.try_get::<_, Option<String>>(column)
            .map(Option::unwrap_or_default)
            .map_err(|e| StoreError::Mapping(format!("{}: {}", column, e)))
    };

    let year_birth = row
        .try_get::<_, Option<i32>>(YEAR_BIRTH_COLUMN)
        .map_err(|e| StoreError::Mapping(format!("{}: {}", YEAR_BIRTH_COLUMN, e)))?
        .unwrap_or_default();

    Ok(Person {
        email: text(EMAIL_COLUMN)?,
        first_name: text(FIRST_NAME_COLUMN)?,
        last_name: text(LAST_NAME_COLUMN)?,
        year_birth,
    })
}
