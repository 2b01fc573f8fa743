//! Per-query statement accumulator.
//!
//! A [`Statement`] collects the fragments of one logical query through
//! setter calls and is rendered by the methods in [`crate::render`].
//! Fragments are trusted raw SQL; values always travel as parameters.
//!
//! # Example
//!
//! ```rust
//! use rowcraft_core::dialect::GenericDialect;
//! use rowcraft_core::{SqlValue, Statement};
//!
//! let mut stmt = Statement::new(GenericDialect::new());
//! stmt.table("user")
//!     .where_clause("age > ?", vec![SqlValue::Int(18)])
//!     .in_values("status", ["active", "invited"])
//!     .order_by("id DESC")
//!     .limit(10, Some(20));
//!
//! let sql = stmt.select_sql("*", None);
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM \"user\" WHERE age > ? AND status IN (?,?) ORDER BY id DESC LIMIT 10 OFFSET 20"
//! );
//! assert_eq!(stmt.params().len(), 3);
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::dialect::Dialect;
use crate::options::TableOptions;
use crate::schema::TableMeta;
use crate::value::{SqlValue, ToSqlValue};

/// Fragments of a single query under construction.
///
/// One instance belongs to one logical query. Call [`Statement::reset`]
/// before reusing it; rendering never writes back into it.
#[derive(Debug, Clone)]
pub struct Statement<D> {
    pub(crate) dialect: D,
    pub(crate) table: Option<Arc<TableMeta>>,
    pub(crate) alt_table_name: Option<String>,
    pub(crate) where_str: String,
    pub(crate) params: Vec<SqlValue>,
    pub(crate) order_by: String,
    pub(crate) joins: Vec<String>,
    pub(crate) group_by: String,
    pub(crate) having: String,
    pub(crate) columns: Vec<String>,
    pub(crate) selected: HashSet<String>,
    pub(crate) raw_sql: String,
    pub(crate) raw_params: Vec<SqlValue>,
    pub(crate) limit: u64,
    pub(crate) offset: u64,
    pub(crate) use_cascade: bool,
    pub(crate) use_auto_join: bool,
    pub(crate) options: TableOptions,
}

impl<D: Dialect> Statement<D> {
    /// Creates an empty statement for `dialect`.
    #[must_use]
    pub fn new(dialect: D) -> Self {
        Self {
            dialect,
            table: None,
            alt_table_name: None,
            where_str: String::new(),
            params: Vec::new(),
            order_by: String::new(),
            joins: Vec::new(),
            group_by: String::new(),
            having: String::new(),
            columns: Vec::new(),
            selected: HashSet::new(),
            raw_sql: String::new(),
            raw_params: Vec::new(),
            limit: 0,
            offset: 0,
            use_cascade: true,
            use_auto_join: false,
            options: TableOptions::default(),
        }
    }

    /// Clears every fragment and restores the flags to their defaults.
    ///
    /// The dialect is kept.
    pub fn reset(&mut self) -> &mut Self {
        self.table = None;
        self.alt_table_name = None;
        self.where_str.clear();
        self.params.clear();
        self.order_by.clear();
        self.joins.clear();
        self.group_by.clear();
        self.having.clear();
        self.columns.clear();
        self.selected.clear();
        self.raw_sql.clear();
        self.raw_params.clear();
        self.limit = 0;
        self.offset = 0;
        self.use_cascade = true;
        self.use_auto_join = false;
        self.options = TableOptions::default();
        self
    }

    /// Stores a complete statement that bypasses fragment composition.
    ///
    /// Only [`Statement::raw_query`] and the `find_query`/`count_query`
    /// helpers consult it; the individual renderers ignore it.
    pub fn sql(&mut self, query: impl Into<String>, params: Vec<SqlValue>) -> &mut Self {
        self.raw_sql = query.into();
        self.raw_params = params;
        self
    }

    /// Replaces the WHERE fragment and its parameters.
    pub fn where_clause(&mut self, condition: impl Into<String>, params: Vec<SqlValue>) -> &mut Self {
        self.where_str = condition.into();
        self.params = params;
        self
    }

    /// Overrides the table name taken from the metadata.
    pub fn table(&mut self, name: impl Into<String>) -> &mut Self {
        self.alt_table_name = Some(name.into());
        self
    }

    /// Attaches resolved table metadata.
    pub fn with_table(&mut self, table: Arc<TableMeta>) -> &mut Self {
        self.table = Some(table);
        self
    }

    /// Adds `(id) = ?` to the WHERE fragment.
    pub fn id(&mut self, id: impl ToSqlValue) -> &mut Self {
        self.and_where("(id) = ?", std::iter::once(id.to_sql_value()));
        self
    }

    /// Adds `column IN (?,...)` with one placeholder per value.
    ///
    /// An empty list adds `0 = 1`, so the statement matches nothing.
    pub fn in_values<V, I>(&mut self, column: &str, values: I) -> &mut Self
    where
        V: ToSqlValue,
        I: IntoIterator<Item = V>,
    {
        let values: Vec<SqlValue> = values.into_iter().map(ToSqlValue::to_sql_value).collect();
        if values.is_empty() {
            warn!(column, "empty IN list, statement will match no rows");
            self.and_where("0 = 1", std::iter::empty());
        } else {
            let placeholders = vec!["?"; values.len()].join(",");
            self.and_where(&format!("{column} IN ({placeholders})"), values);
        }
        self
    }

    /// Selects an explicit column list and marks each column as selected.
    pub fn cols<S: AsRef<str>>(&mut self, columns: &[S]) -> &mut Self {
        self.columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self.selected
            .extend(columns.iter().map(|c| c.as_ref().to_string()));
        self
    }

    /// Sets the row cap and, optionally, the starting offset.
    pub const fn limit(&mut self, limit: u64, offset: Option<u64>) -> &mut Self {
        self.limit = limit;
        if let Some(offset) = offset {
            self.offset = offset;
        }
        self
    }

    /// Sets the ORDER BY fragment.
    pub fn order_by(&mut self, order: impl Into<String>) -> &mut Self {
        self.order_by = order.into();
        self
    }

    /// Appends `<operator> JOIN <table> ON <condition>`.
    ///
    /// `operator` is e.g. `INNER`, `LEFT OUTER` or `CROSS`.
    pub fn join(&mut self, operator: &str, table: &str, condition: &str) -> &mut Self {
        self.joins
            .push(format!("{operator} JOIN {table} ON {condition}"));
        self
    }

    /// Sets the comma-separated GROUP BY keys.
    pub fn group_by(&mut self, keys: impl Into<String>) -> &mut Self {
        self.group_by = keys.into();
        self
    }

    /// Sets the HAVING condition.
    pub fn having(&mut self, condition: impl Into<String>) -> &mut Self {
        self.having = condition.into();
        self
    }

    /// Sets the storage engine used by `CREATE TABLE`.
    pub fn store_engine(&mut self, engine: impl Into<String>) -> &mut Self {
        self.options.store_engine = Some(engine.into());
        self
    }

    /// Sets the default charset used by `CREATE TABLE`.
    pub fn charset(&mut self, charset: impl Into<String>) -> &mut Self {
        self.options.charset = Some(charset.into());
        self
    }

    /// Replaces all table options at once.
    pub fn options(&mut self, options: TableOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Enables or disables cascading loads of referenced entities.
    pub const fn cascade(&mut self, enabled: bool) -> &mut Self {
        self.use_cascade = enabled;
        self
    }

    /// Enables or disables automatic joins of referenced tables.
    pub const fn auto_join(&mut self, enabled: bool) -> &mut Self {
        self.use_auto_join = enabled;
        self
    }

    /// Returns the table name: override, else metadata name, else empty.
    #[must_use]
    pub fn table_name(&self) -> &str {
        if let Some(ref name) = self.alt_table_name {
            return name;
        }
        self.table.as_ref().map_or("", |t| t.name.as_str())
    }

    /// Returns the dialect.
    #[must_use]
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Returns the attached table metadata.
    #[must_use]
    pub const fn table_meta(&self) -> Option<&Arc<TableMeta>> {
        self.table.as_ref()
    }

    /// Returns the explicit WHERE fragment.
    #[must_use]
    pub fn where_str(&self) -> &str {
        &self.where_str
    }

    /// Returns the explicit WHERE parameters.
    #[must_use]
    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    /// Returns the raw statement, if one was set.
    #[must_use]
    pub fn raw_sql(&self) -> Option<&str> {
        if self.raw_sql.is_empty() {
            None
        } else {
            Some(&self.raw_sql)
        }
    }

    /// Returns whether `column` was named in [`Statement::cols`].
    #[must_use]
    pub fn is_selected(&self, column: &str) -> bool {
        self.selected.contains(column)
    }

    /// Returns whether cascading loads are enabled.
    #[must_use]
    pub const fn use_cascade(&self) -> bool {
        self.use_cascade
    }

    /// Returns whether automatic joins are enabled.
    #[must_use]
    pub const fn use_auto_join(&self) -> bool {
        self.use_auto_join
    }

    /// Returns the configured table options.
    #[must_use]
    pub const fn table_options(&self) -> &TableOptions {
        &self.options
    }

    fn and_where(&mut self, condition: &str, params: impl IntoIterator<Item = SqlValue>) {
        if self.where_str.is_empty() {
            self.where_str = condition.to_string();
        } else {
            self.where_str.push_str(" AND ");
            self.where_str.push_str(condition);
        }
        self.params.extend(params);
    }
}
