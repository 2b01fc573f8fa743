//! SQL Dialect support.
//!
//! Different databases quote identifiers, spell column types and accept
//! table options differently. This module provides a trait for that
//! behavior; statements are generic over it.

mod generic;
mod mysql;
mod postgres;
mod sqlite;

pub use generic::GenericDialect;
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use crate::schema::{ColumnMeta, SqlType};

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character: `"` by default, `` ` `` in `MySQL`.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Quotes an identifier, doubling any quote character inside it.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(quote);
        for c in name.chars() {
            if c == quote {
                quoted.push(quote);
            }
            quoted.push(c);
        }
        quoted.push(quote);
        quoted
    }

    /// Returns whether `CREATE TABLE` accepts an `ENGINE=` option.
    fn supports_storage_engine(&self) -> bool {
        false
    }

    /// Returns whether `CREATE TABLE` accepts a `DEFAULT CHARSET` option.
    fn supports_charset(&self) -> bool {
        false
    }

    /// Maps a `SqlType` to the dialect-specific spelling.
    fn map_sql_type(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Smallint => "SMALLINT".to_string(),
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::Bigint => "BIGINT".to_string(),
            SqlType::Real => "REAL".to_string(),
            SqlType::Double => "DOUBLE".to_string(),
            SqlType::Varchar(Some(n)) => format!("VARCHAR({n})"),
            SqlType::Varchar(None) => "VARCHAR".to_string(),
            SqlType::Text => "TEXT".to_string(),
            SqlType::Blob => "BLOB".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Datetime => "DATETIME".to_string(),
            SqlType::Timestamp => "TIMESTAMP".to_string(),
            SqlType::Boolean => "BOOLEAN".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    /// Returns the auto-increment keyword, including its leading space.
    fn autoincrement_keyword(&self) -> &'static str {
        ""
    }

    /// Generates the definition of a column inside `CREATE TABLE`.
    fn column_definition(&self, col: &ColumnMeta) -> String {
        let mut sql = format!(
            "{} {}",
            self.quote_identifier(&col.name),
            self.map_sql_type(&col.sql_type)
        );

        if col.primary_key {
            sql.push_str(" PRIMARY KEY");
            if col.autoincrement {
                sql.push_str(self.autoincrement_keyword());
            }
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
