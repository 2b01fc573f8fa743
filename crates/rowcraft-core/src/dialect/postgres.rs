//! `PostgreSQL` dialect.

use super::Dialect;
use crate::schema::{ColumnMeta, SqlType};

/// `PostgreSQL` dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new `PostgreSQL` dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn map_sql_type(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Smallint => "SMALLINT".to_string(),
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::Bigint => "BIGINT".to_string(),
            SqlType::Real => "REAL".to_string(),
            SqlType::Double => "DOUBLE PRECISION".to_string(),
            SqlType::Varchar(Some(n)) => format!("VARCHAR({n})"),
            SqlType::Varchar(None) => "VARCHAR".to_string(),
            SqlType::Text => "TEXT".to_string(),
            SqlType::Blob => "BYTEA".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Datetime | SqlType::Timestamp => "TIMESTAMP".to_string(),
            SqlType::Boolean => "BOOLEAN".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    fn column_definition(&self, col: &ColumnMeta) -> String {
        // PostgreSQL uses SERIAL/BIGSERIAL for auto-increment
        let data_type = if col.autoincrement && col.primary_key {
            match col.sql_type {
                SqlType::Integer | SqlType::Smallint => "SERIAL".to_string(),
                SqlType::Bigint => "BIGSERIAL".to_string(),
                _ => self.map_sql_type(&col.sql_type),
            }
        } else {
            self.map_sql_type(&col.sql_type)
        };

        let mut sql = format!("{} {}", self.quote_identifier(&col.name), data_type);

        if col.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if !col.nullable {
            sql.push_str(" NOT NULL");
        }

        if let Some(ref default) = col.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }

        sql
    }
}
