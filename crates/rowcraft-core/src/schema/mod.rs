//! Table metadata consumed by the renderer.
//!
//! `TableMeta` is normally produced by `#[derive(Entity)]` and cached in a
//! [`Registry`]; the renderer only ever reads it.

mod field;
mod registry;

use std::any::TypeId;

pub use field::{FieldValue, ToField};
pub use registry::Registry;

/// SQL column types, mapped to dialect-specific spellings by
/// [`Dialect::map_sql_type`](crate::dialect::Dialect::map_sql_type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlType {
    /// Small integer (2 bytes).
    Smallint,
    /// Integer (4 bytes).
    Integer,
    /// Big integer (8 bytes).
    Bigint,
    /// Real (4-byte float).
    Real,
    /// Double precision (8-byte float).
    Double,
    /// Variable-length character string.
    Varchar(Option<u32>),
    /// Text (variable length, no limit).
    Text,
    /// Binary large object.
    Blob,
    /// Date.
    Date,
    /// Date and time without zone.
    Datetime,
    /// Timestamp.
    Timestamp,
    /// Boolean.
    Boolean,
    /// Database-specific type, emitted verbatim.
    Custom(String),
}

/// Direction a column is mapped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapType {
    /// Read from and written to the database.
    #[default]
    Both,
    /// Only written; never part of a SELECT projection.
    ToDbOnly,
    /// Only read back from the database.
    FromDbOnly,
}

/// Metadata for a single column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    /// SQL column name.
    pub name: String,
    /// SQL type.
    pub sql_type: SqlType,
    /// Mapping direction.
    pub map_type: MapType,
    /// Whether the column is nullable.
    pub nullable: bool,
    /// Whether this is the primary key.
    pub primary_key: bool,
    /// Whether the column auto-increments.
    pub autoincrement: bool,
    /// Raw SQL default expression.
    pub default: Option<String>,
}

impl ColumnMeta {
    /// Creates a nullable, bidirectional column.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            map_type: MapType::Both,
            nullable: true,
            default: None,
            primary_key: false,
            autoincrement: false,
        }
    }

    /// Marks the column as PRIMARY KEY (implies NOT NULL).
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Marks the column as auto-incrementing.
    #[must_use]
    pub const fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the mapping direction.
    #[must_use]
    pub const fn map_type(mut self, map_type: MapType) -> Self {
        self.map_type = map_type;
        self
    }

    /// Sets a raw SQL default expression.
    #[must_use]
    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }
}

/// A named index or unique constraint over one or more columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMeta {
    /// Index name (without the `IDX_`/`UQE_` prefix).
    pub name: String,
    /// Column names, in index order.
    pub columns: Vec<String>,
}

/// Metadata for a mapped table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMeta {
    /// SQL table name.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnMeta>,
    /// Plain indexes in declaration order.
    pub indexes: Vec<IndexMeta>,
    /// Unique constraints in declaration order.
    pub uniques: Vec<IndexMeta>,
}

impl TableMeta {
    /// Creates metadata for a table with no columns yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            uniques: Vec::new(),
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: ColumnMeta) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds `column` to the index `name`, creating the index on first use.
    #[must_use]
    pub fn index(mut self, name: &str, column: &str) -> Self {
        add_to_group(&mut self.indexes, name, column);
        self
    }

    /// Adds `column` to the unique constraint `name`, creating it on first use.
    #[must_use]
    pub fn unique(mut self, name: &str, column: &str) -> Self {
        add_to_group(&mut self.uniques, name, column);
        self
    }

    /// Returns the primary key column, if any.
    #[must_use]
    pub fn primary_key(&self) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }
}

fn add_to_group(groups: &mut Vec<IndexMeta>, name: &str, column: &str) {
    if let Some(group) = groups.iter_mut().find(|g| g.name == name) {
        group.columns.push(column.to_string());
        return;
    }
    groups.push(IndexMeta {
        name: name.to_string(),
        columns: vec![column.to_string()],
    });
}

/// A struct mapped to a table.
///
/// Implemented by `#[derive(Entity)]`. The trait is object-safe so the
/// condition deriver can walk nested references as `&dyn Entity`.
pub trait Entity: 'static {
    /// Builds the table metadata for this type.
    fn table() -> TableMeta
    where
        Self: Sized;

    /// Object-safe access to [`Entity::table`].
    fn describe(&self) -> TableMeta;

    /// Returns the value held for `column`, or `None` if the type does not
    /// expose that column.
    fn field_value(&self, column: &str) -> Option<FieldValue<'_>>;

    /// Runtime type key used by the [`Registry`].
    fn entity_type(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}
