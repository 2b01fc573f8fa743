//! `MySQL` dialect.

use super::Dialect;
use crate::schema::SqlType;

/// `MySQL` dialect: backtick quoting, storage engines and charsets.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new `MySQL` dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn supports_storage_engine(&self) -> bool {
        true
    }

    fn supports_charset(&self) -> bool {
        true
    }

    fn map_sql_type(&self, sql_type: &SqlType) -> String {
        match sql_type {
            SqlType::Smallint => "SMALLINT".to_string(),
            SqlType::Integer => "INT".to_string(),
            SqlType::Bigint => "BIGINT".to_string(),
            SqlType::Real => "FLOAT".to_string(),
            SqlType::Double => "DOUBLE".to_string(),
            SqlType::Varchar(len) => format!("VARCHAR({})", len.unwrap_or(255)),
            SqlType::Text => "TEXT".to_string(),
            SqlType::Blob => "BLOB".to_string(),
            SqlType::Date => "DATE".to_string(),
            SqlType::Datetime => "DATETIME".to_string(),
            SqlType::Timestamp => "TIMESTAMP".to_string(),
            // MySQL has no real bool, use 0/1
            SqlType::Boolean => "TINYINT(1)".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    fn autoincrement_keyword(&self) -> &'static str {
        " AUTO_INCREMENT"
    }
}
