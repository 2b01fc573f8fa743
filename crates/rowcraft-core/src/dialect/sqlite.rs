//! `SQLite` dialect.

use super::Dialect;
use crate::schema::SqlType;

/// `SQLite` dialect: type affinities, no table options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new `SQLite` dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn map_sql_type(&self, sql_type: &SqlType) -> String {
        // SQLite has dynamic typing with type affinity
        match sql_type {
            SqlType::Smallint | SqlType::Integer | SqlType::Bigint | SqlType::Boolean => {
                "INTEGER".to_string()
            }
            SqlType::Real | SqlType::Double => "REAL".to_string(),
            SqlType::Varchar(_)
            | SqlType::Text
            | SqlType::Date
            | SqlType::Datetime
            | SqlType::Timestamp => "TEXT".to_string(),
            SqlType::Blob => "BLOB".to_string(),
            SqlType::Custom(name) => name.clone(),
        }
    }

    fn autoincrement_keyword(&self) -> &'static str {
        " AUTOINCREMENT"
    }
}
