//! SQL rendering for [`Statement`].
//!
//! Renderers read the accumulated fragments and return `(sql, params)` or
//! plain SQL text. Conditions derived from an example entity are passed
//! through as local values and never stored on the statement.

use tracing::debug;

use crate::condition::{derive_conditions, Conditions};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::schema::{Entity, IndexMeta, MapType, Registry, TableMeta};
use crate::statement::Statement;
use crate::value::SqlValue;

impl<D: Dialect> Statement<D> {
    /// Returns the raw statement and its parameters, if one was set.
    #[must_use]
    pub fn raw_query(&self) -> Option<(String, Vec<SqlValue>)> {
        self.raw_sql()
            .map(|sql| (sql.to_string(), self.raw_params.clone()))
    }

    /// Default projection: every readable column as `"table"."column"`.
    ///
    /// # Errors
    ///
    /// [`Error::NoTable`] without metadata, [`Error::NoColumns`] when no
    /// column is readable.
    pub fn select_columns(&self) -> Result<String> {
        let table = self.table.as_deref().ok_or(Error::NoTable)?;
        self.projection(self.table_name(), table)
    }

    /// Composes a SELECT over the accumulated fragments.
    ///
    /// `derived` is an extra condition appended to the explicit WHERE with
    /// `and`.
    #[must_use]
    pub fn select_sql(&self, columns: &str, derived: Option<&str>) -> String {
        self.compose_select(self.table_name(), columns, derived)
    }

    /// Renders a row fetch filtered by the set fields of `entity`.
    ///
    /// Parameters are the explicit WHERE parameters followed by the derived
    /// ones, matching their order in the text.
    ///
    /// # Errors
    ///
    /// Fails when the entity's table has no readable columns or a
    /// referenced table has no primary key.
    pub fn get_by_example(
        &self,
        registry: &mut Registry,
        entity: &dyn Entity,
    ) -> Result<(String, Vec<SqlValue>)> {
        let table = registry.resolve(entity);
        let name = self.alt_table_name.as_deref().unwrap_or(&table.name);
        let conditions = derive_conditions(registry, &self.dialect, &table, entity)?;

        let columns = if self.columns.is_empty() {
            self.projection(name, &table)?
        } else {
            self.explicit_columns()
        };

        Ok(self.finish_select(name, &columns, conditions))
    }

    /// Renders a `count(*)` filtered by the set fields of `entity`.
    ///
    /// # Errors
    ///
    /// Fails when a referenced table has no primary key.
    pub fn count_by_example(
        &self,
        registry: &mut Registry,
        entity: &dyn Entity,
    ) -> Result<(String, Vec<SqlValue>)> {
        let table = registry.resolve(entity);
        let name = self.alt_table_name.as_deref().unwrap_or(&table.name);
        let conditions = derive_conditions(registry, &self.dialect, &table, entity)?;
        let columns = format!("count(*) as {}", self.dialect.quote_identifier("total"));

        Ok(self.finish_select(name, &columns, conditions))
    }

    /// Query to hand to the execution layer for a fetch.
    ///
    /// A raw statement set with [`Statement::sql`] wins over every fragment.
    ///
    /// # Errors
    ///
    /// See [`Statement::get_by_example`].
    pub fn find_query(
        &self,
        registry: &mut Registry,
        entity: &dyn Entity,
    ) -> Result<(String, Vec<SqlValue>)> {
        self.raw_query()
            .map_or_else(|| self.get_by_example(registry, entity), Ok)
    }

    /// Query to hand to the execution layer for a count.
    ///
    /// A raw statement set with [`Statement::sql`] wins over every fragment.
    ///
    /// # Errors
    ///
    /// See [`Statement::count_by_example`].
    pub fn count_query(
        &self,
        registry: &mut Registry,
        entity: &dyn Entity,
    ) -> Result<(String, Vec<SqlValue>)> {
        self.raw_query()
            .map_or_else(|| self.count_by_example(registry, entity), Ok)
    }

    /// Renders `CREATE TABLE IF NOT EXISTS` for the attached metadata.
    ///
    /// # Errors
    ///
    /// [`Error::NoTable`] without metadata, [`Error::NoColumns`] for a table
    /// without columns.
    pub fn create_table_sql(&self) -> Result<String> {
        let table = self.require_table()?;
        if table.columns.is_empty() {
            return Err(Error::NoColumns {
                table: self.table_name().to_string(),
            });
        }

        let definitions: Vec<String> = table
            .columns
            .iter()
            .map(|c| self.dialect.column_definition(c).trim().to_string())
            .collect();

        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.dialect.quote_identifier(self.table_name()),
            definitions.join(", ")
        );
        if let Some(ref engine) = self.options.store_engine {
            if self.dialect.supports_storage_engine() {
                sql.push_str(" ENGINE=");
                sql.push_str(engine);
            }
        }
        if let Some(ref charset) = self.options.charset {
            if self.dialect.supports_charset() {
                sql.push_str(" DEFAULT CHARSET ");
                sql.push_str(charset);
            }
        }
        sql.push(';');

        debug!(table = %self.table_name(), dialect = self.dialect.name(), "rendered create table");
        Ok(sql)
    }

    /// Renders one `CREATE INDEX` per declared index.
    ///
    /// # Errors
    ///
    /// [`Error::NoTable`] without metadata.
    pub fn create_index_sqls(&self) -> Result<Vec<String>> {
        let table = self.require_table()?;
        Ok(self.index_sqls("INDEX", "IDX", &table.indexes))
    }

    /// Renders one `CREATE UNIQUE INDEX` per declared unique constraint.
    ///
    /// # Errors
    ///
    /// [`Error::NoTable`] without metadata.
    pub fn create_unique_sqls(&self) -> Result<Vec<String>> {
        let table = self.require_table()?;
        Ok(self.index_sqls("UNIQUE INDEX", "UQE", &table.uniques))
    }

    /// Renders `DROP TABLE IF EXISTS`.
    ///
    /// # Errors
    ///
    /// [`Error::NoTable`] when no table name is known.
    pub fn drop_table_sql(&self) -> Result<String> {
        let name = self.table_name();
        if name.is_empty() {
            return Err(Error::NoTable);
        }
        Ok(format!(
            "DROP TABLE IF EXISTS {};",
            self.dialect.quote_identifier(name)
        ))
    }

    fn require_table(&self) -> Result<&TableMeta> {
        self.table.as_deref().ok_or(Error::NoTable)
    }

    fn projection(&self, name: &str, table: &TableMeta) -> Result<String> {
        let quoted_table = self.dialect.quote_identifier(name);
        let columns: Vec<String> = table
            .columns
            .iter()
            .filter(|c| c.map_type != MapType::ToDbOnly)
            .map(|c| format!("{quoted_table}.{}", self.dialect.quote_identifier(&c.name)))
            .collect();

        if columns.is_empty() {
            return Err(Error::NoColumns {
                table: name.to_string(),
            });
        }
        Ok(columns.join(", "))
    }

    fn explicit_columns(&self) -> String {
        self.columns
            .iter()
            .map(|c| self.dialect.quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn finish_select(
        &self,
        name: &str,
        columns: &str,
        conditions: Conditions,
    ) -> (String, Vec<SqlValue>) {
        let derived = conditions.joined();
        let sql = self.compose_select(name, columns, derived.as_deref());

        let mut params = self.params.clone();
        params.extend(conditions.params);

        debug!(sql = %sql, params = params.len(), skipped = conditions.skipped.len(), "rendered select");
        (sql, params)
    }

    fn compose_select(&self, name: &str, columns: &str, derived: Option<&str>) -> String {
        let mut sql = format!(
            "SELECT {columns} FROM {}",
            self.dialect.quote_identifier(name)
        );

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }

        let explicit = Some(self.where_str.as_str()).filter(|w| !w.trim().is_empty());
        let derived = derived.filter(|d| !d.trim().is_empty());
        let conditions: Vec<&str> = explicit.into_iter().chain(derived).collect();
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" and "));
        }

        let keys: Vec<String> = self
            .group_by
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| self.dialect.quote_identifier(k))
            .collect();
        if !keys.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&keys.join(","));
        }

        if !self.having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.having);
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by);
        }

        if self.offset > 0 || self.limit > 0 {
            sql.push_str(" LIMIT ");
            sql.push_str(&self.limit.to_string());
        }
        if self.offset > 0 {
            sql.push_str(" OFFSET ");
            sql.push_str(&self.offset.to_string());
        }

        sql
    }

    fn index_sqls(&self, kind: &str, prefix: &str, indexes: &[IndexMeta]) -> Vec<String> {
        let name = self.table_name();
        indexes
            .iter()
            .map(|index| {
                format!(
                    "CREATE {kind} {prefix}_{name}_{} ON {name} ({});",
                    index.name,
                    index.columns.join(",")
                )
            })
            .collect()
    }
}
