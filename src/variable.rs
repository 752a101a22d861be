use crate::key::ConfigKey;
use crate::metadata::{DisplayEntry, MetadataKey, MetadataStore};
use crate::value::ConfigValueType;

/// A named, typed configuration variable with a default.
///
/// Variables are plain values: define them once (often as `static`-like
/// constructors or `LazyLock`s) and read them through
/// [`ConfigAccessor::variable`](crate::ConfigAccessor::variable).
///
/// ```ignore
/// let pool_size = ConfigVariable::new("database.pool_size", 5i64)
///     .with_metadata::<Team>(Some("storage".into()))
///     .with_metadata::<Lifecycle>(Some(Stage::Stable));
/// ```
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct ConfigVariable<T> {
    key: ConfigKey,
    default: T,
    secret: bool,
    metadata: MetadataStore,
}

impl<T: ConfigValueType> ConfigVariable<T> {
    pub fn new(key: impl Into<ConfigKey>, default: T) -> Self {
        Self {
            key: key.into(),
            default,
            secret: false,
            metadata: MetadataStore::new(),
        }
    }

    /// Mark the variable as secret. Access reports will not show its value.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Return a copy with metadata `K` set to `value`.
    pub fn with_metadata<K: MetadataKey>(mut self, value: K::Value) -> Self {
        self.metadata.set::<K>(value);
        self
    }

    pub fn set_metadata<K: MetadataKey>(&mut self, value: K::Value) {
        self.metadata.set::<K>(value);
    }

    /// Metadata `K`, or its default if never attached.
    pub fn metadata<K: MetadataKey>(&self) -> K::Value {
        self.metadata.get::<K>()
    }

    /// All explicitly attached metadata, as display entries. Order is
    /// unspecified.
    pub fn metadata_entries(&self) -> Vec<DisplayEntry> {
        self.metadata.display_entries()
    }

    pub fn key(&self) -> &ConfigKey {
        &self.key
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }
}
