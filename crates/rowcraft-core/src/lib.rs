//! # rowcraft-core
//!
//! A statement accumulator and dialect-aware SQL renderer with
//! example-based WHERE derivation.
//!
//! This crate provides:
//! - [`Statement`], a per-query builder collecting WHERE/JOIN/ORDER/GROUP
//!   fragments, column selection and pagination
//! - [`derive_conditions`], turning the set fields of an entity into
//!   `column = ?` conditions
//! - Renderers for SELECT, count, CREATE TABLE, CREATE INDEX and DROP TABLE
//!
//! Every value is bound as a positional `?` parameter; the output is
//! `(sql, params)` for an external execution layer.
//!
//! ## Query by example
//!
//! ```rust
//! use rowcraft_core::dialect::GenericDialect;
//! use rowcraft_core::schema::{ColumnMeta, Entity, FieldValue, SqlType, TableMeta, ToField};
//! use rowcraft_core::{Registry, SqlValue, Statement};
//!
//! struct User {
//!     name: String,
//!     age: i32,
//! }
//!
//! impl Entity for User {
//!     fn table() -> TableMeta {
//!         TableMeta::new("user")
//!             .column(ColumnMeta::new("name", SqlType::Varchar(None)))
//!             .column(ColumnMeta::new("age", SqlType::Integer))
//!     }
//!
//!     fn describe(&self) -> TableMeta {
//!         Self::table()
//!     }
//!
//!     fn field_value(&self, column: &str) -> Option<FieldValue<'_>> {
//!         match column {
//!             "name" => Some(self.name.to_field()),
//!             "age" => Some(self.age.to_field()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! let stmt = Statement::new(GenericDialect::new());
//! let example = User { name: "a".to_string(), age: 0 };
//!
//! let (sql, params) = stmt.get_by_example(&mut registry, &example).unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT \"user\".\"name\", \"user\".\"age\" FROM \"user\" WHERE \"name\" = ?"
//! );
//! assert_eq!(params, vec![SqlValue::Text("a".to_string())]);
//! ```
//!
//! Zero and empty values mean "not specified": `age: 0` above produces no
//! condition. Use [`Statement::where_clause`] to match on zero.

pub mod condition;
pub mod dialect;
mod error;
mod options;
mod render;
pub mod schema;
mod statement;
pub mod value;

pub use condition::{derive_conditions, Conditions, SkipReason, SkippedField};
pub use error::{Error, Result};
pub use options::TableOptions;
pub use schema::{Entity, Registry, TableMeta};
pub use statement::Statement;
pub use value::{SqlValue, ToSqlValue};
