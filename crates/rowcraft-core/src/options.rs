//! Table options applied to `CREATE TABLE`.

use serde::Deserialize;

/// Storage options for generated DDL.
///
/// Options a dialect does not support are ignored at render time. The type
/// deserializes from configuration files with every field optional:
///
/// ```rust
/// use rowcraft_core::TableOptions;
///
/// let options = TableOptions::default().store_engine("InnoDB").charset("utf8mb4");
/// assert_eq!(options.charset.as_deref(), Some("utf8mb4"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Storage engine, e.g. `InnoDB`.
    pub store_engine: Option<String>,
    /// Default character set, e.g. `utf8`.
    pub charset: Option<String>,
}

impl TableOptions {
    /// Sets the storage engine.
    #[must_use]
    pub fn store_engine(mut self, engine: impl Into<String>) -> Self {
        self.store_engine = Some(engine.into());
        self
    }

    /// Sets the default character set.
    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }
}
