//! Explicit cache of table metadata keyed by Rust type.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{Entity, TableMeta};

/// Maps entity types to their table metadata.
///
/// Passed explicitly to the renderer so tests can use isolated fixtures.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    tables: HashMap<TypeId, Arc<TableMeta>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T`, computing its metadata only on first use.
    pub fn register<T: Entity>(&mut self) -> Arc<TableMeta> {
        self.get_or_insert_with(TypeId::of::<T>(), T::table)
    }

    /// Returns the metadata for `entity`'s type, registering it on first use.
    pub fn resolve(&mut self, entity: &dyn Entity) -> Arc<TableMeta> {
        self.get_or_insert_with(entity.entity_type(), || entity.describe())
    }

    /// Returns the metadata registered for `type_id`.
    #[must_use]
    pub fn get(&self, type_id: TypeId) -> Option<Arc<TableMeta>> {
        self.tables.get(&type_id).cloned()
    }

    /// Returns whether `type_id` has been registered.
    #[must_use]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.tables.contains_key(&type_id)
    }

    /// Number of registered tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn get_or_insert_with(
        &mut self,
        type_id: TypeId,
        describe: impl FnOnce() -> TableMeta,
    ) -> Arc<TableMeta> {
        Arc::clone(self.tables.entry(type_id).or_insert_with(|| {
            let table = describe();
            debug!(table = %table.name, columns = table.columns.len(), "registered table metadata");
            Arc::new(table)
        }))
    }
}
