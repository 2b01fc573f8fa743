//! Example-based WHERE conditions.
//!
//! [`derive_conditions`] turns the set fields of an entity into a conjunction
//! of `column = ?` fragments. "Set" follows [`FieldValue::is_unset`]: empty
//! text, zero integers and the unset instant count as "not specified".
//!
//! This policy is lossy on purpose: a condition such as `age = 0` cannot be
//! expressed through an example entity. Use
//! [`Statement::where_clause`](crate::Statement::where_clause) for that.

use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::schema::{Entity, FieldValue, Registry, TableMeta};
use crate::value::SqlValue;

/// Why a column did not produce a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The value is the unset value of its kind.
    Unset,
    /// The field kind never takes part in conditions.
    Unsupported(&'static str),
    /// The referenced entity has no primary key value yet.
    UnsetReference,
    /// The entity does not expose a value for the column.
    NotExposed,
}

/// A column left out of the derived conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    /// Column name.
    pub column: String,
    /// Reason it was skipped.
    pub reason: SkipReason,
}

/// Conditions derived from an example entity.
///
/// `fragments` and `params` are always the same length and index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    /// `"column" = ?` fragments in column declaration order.
    pub fragments: Vec<String>,
    /// Bound values, one per fragment.
    pub params: Vec<SqlValue>,
    /// Columns that were left out, with the reason.
    pub skipped: Vec<SkippedField>,
}

impl Conditions {
    /// Number of derived conditions.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns whether no condition was derived.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Joins the fragments with `and`, or `None` when there are none.
    #[must_use]
    pub fn joined(&self) -> Option<String> {
        if self.fragments.is_empty() {
            None
        } else {
            Some(self.fragments.join(" and "))
        }
    }

    fn push(&mut self, fragment: String, value: SqlValue) {
        self.fragments.push(fragment);
        self.params.push(value);
    }

    fn skip(&mut self, column: &str, reason: SkipReason) {
        self.skipped.push(SkippedField {
            column: column.to_string(),
            reason,
        });
    }
}

/// Derives equality conditions from the set fields of `entity`.
///
/// Referenced entities are registered in `registry` on first sight and bound
/// through their primary key value.
///
/// # Errors
///
/// Returns [`Error::MissingPrimaryKey`] when a referenced table declares no
/// primary key.
pub fn derive_conditions<D: Dialect + ?Sized>(
    registry: &mut Registry,
    dialect: &D,
    table: &TableMeta,
    entity: &dyn Entity,
) -> Result<Conditions> {
    let mut conditions = Conditions::default();

    for col in &table.columns {
        let Some(field) = entity.field_value(&col.name) else {
            conditions.skip(&col.name, SkipReason::NotExposed);
            continue;
        };

        let value = match field {
            FieldValue::Reference(target) => match reference_key(registry, target)? {
                Some(value) => value,
                None => {
                    conditions.skip(&col.name, SkipReason::UnsetReference);
                    continue;
                }
            },
            FieldValue::Unsupported(kind) => {
                debug!(table = %table.name, column = %col.name, kind, "unsupported field kind skipped");
                conditions.skip(&col.name, SkipReason::Unsupported(kind));
                continue;
            }
            scalar => match scalar.to_sql_value() {
                Some(value) if !scalar.is_unset() => value,
                _ => {
                    conditions.skip(&col.name, SkipReason::Unset);
                    continue;
                }
            },
        };

        conditions.push(format!("{} = ?", dialect.quote_identifier(&col.name)), value);
    }

    Ok(conditions)
}

/// Returns the primary key value of a referenced entity, if it is set.
fn reference_key(registry: &mut Registry, target: &dyn Entity) -> Result<Option<SqlValue>> {
    let table = registry.resolve(target);
    let pk = table.primary_key().ok_or_else(|| Error::MissingPrimaryKey {
        table: table.name.clone(),
    })?;

    Ok(match target.field_value(&pk.name) {
        Some(FieldValue::Reference(_) | FieldValue::Unsupported(_)) | None => None,
        Some(key) if key.is_unset() => None,
        Some(key) => key.to_sql_value(),
    })
}
