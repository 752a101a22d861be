//! The seam between accessors and whatever resolves configuration.
//!
//! [`ConfigSource`] is the only thing a [`ConfigAccessor`](crate::ConfigAccessor)
//! needs from the outside world: given a key and a requested type, return the
//! value, report that it is absent, or explain why it is unusable.
//!
//! [`TableSource`] answers from a resolved `toml::Table` snapshot. The table
//! can come from TOML text, a file, any `Serialize` struct, or a confique
//! `Config` loaded from its declared defaults.

use std::path::Path;

use confique::Config;
use serde::Serialize;
use toml::{Table, Value};

use crate::error::ConfigVarError;
use crate::key::ConfigKey;
use crate::types::{ConfigType, ConfigValue};

/// A resolved view of configuration that accessors read from.
pub trait ConfigSource: Send + Sync {
    /// Short name used in access reports.
    fn name(&self) -> &str;

    /// Look up `key` as type `ty`.
    ///
    /// `Ok(None)` means the key is not present. `Err` means it is present
    /// but cannot be read as `ty`.
    fn fetch(&self, key: &ConfigKey, ty: ConfigType) -> Result<Option<ConfigValue>, ConfigVarError>;
}

/// A [`ConfigSource`] over an in-memory `toml::Table`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSource {
    name: String,
    table: Table,
}

impl TableSource {
    pub fn from_table(table: Table) -> Self {
        Self {
            name: "table".into(),
            table,
        }
    }

    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigVarError> {
        let table: Table = toml::from_str(content).map_err(|e| ConfigVarError::ParseError {
            path: "<inline>".into(),
            source: e,
        })?;
        Ok(Self::from_table(table))
    }

    /// Read and parse a TOML file. The source is named after the path.
    pub fn from_file(path: &Path) -> Result<Self, ConfigVarError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigVarError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let table: Table = toml::from_str(&content).map_err(|e| ConfigVarError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::from_table(table).named(&path.display().to_string()))
    }

    /// Snapshot any serializable value. `None` fields are omitted.
    pub fn from_serialize<S: Serialize>(source: &S) -> Result<Self, ConfigVarError> {
        let value = Value::try_from(source).map_err(|e| ConfigVarError::InvalidValue {
            key: "<root>".into(),
            reason: e.to_string(),
        })?;
        match value {
            Value::Table(table) => Ok(Self::from_table(table)),
            other => Err(ConfigVarError::InvalidValue {
                key: "<root>".into(),
                reason: format!("expected a table, found {}", other.type_str()),
            }),
        }
    }

    /// Load `C` from its `#[config(default)]` values and snapshot it.
    ///
    /// Fails if `C` has required fields without defaults.
    pub fn from_config<C: Config + Serialize>() -> Result<Self, ConfigVarError> {
        let config = C::builder().load()?;
        Self::from_serialize(&config)
    }

    /// Rename the source as it appears in access reports.
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }
}

impl ConfigSource for TableSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, key: &ConfigKey, ty: ConfigType) -> Result<Option<ConfigValue>, ConfigVarError> {
        match table_get(&self.table, key) {
            Some(value) => convert(key, value, ty).map(Some),
            None => Ok(None),
        }
    }
}

/// Navigate a `toml::Table` by key components.
pub(crate) fn table_get<'a>(table: &'a Table, key: &ConfigKey) -> Option<&'a Value> {
    let (leaf, path) = key.components().split_last()?;
    let mut current = table;
    for segment in path {
        current = current.get(segment)?.as_table()?;
    }
    current.get(leaf)
}

fn mismatch(key: &ConfigKey, expected: ConfigType, found: &Value) -> ConfigVarError {
    ConfigVarError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.type_str().to_string(),
    }
}

/// Convert a TOML value to the requested type.
///
/// Integers widen to doubles; bytes are arrays of integers in `0..=255`.
fn convert(key: &ConfigKey, value: &Value, ty: ConfigType) -> Result<ConfigValue, ConfigVarError> {
    let converted = match ty {
        ConfigType::String => value.as_str().map(|s| ConfigValue::String(s.to_string())),
        ConfigType::Int => value.as_integer().map(ConfigValue::Int),
        ConfigType::Double => as_double(value).map(ConfigValue::Double),
        ConfigType::Bool => value.as_bool().map(ConfigValue::Bool),
        ConfigType::Bytes => return as_bytes(key, value).map(ConfigValue::Bytes),
        ConfigType::StringArray => {
            array_of(value, |v| v.as_str().map(str::to_string)).map(ConfigValue::StringArray)
        }
        ConfigType::IntArray => array_of(value, Value::as_integer).map(ConfigValue::IntArray),
        ConfigType::DoubleArray => array_of(value, as_double).map(ConfigValue::DoubleArray),
        ConfigType::BoolArray => array_of(value, Value::as_bool).map(ConfigValue::BoolArray),
        ConfigType::BytesArray => {
            let items = value.as_array().ok_or_else(|| mismatch(key, ty, value))?;
            let chunks = items
                .iter()
                .map(|item| as_bytes(key, item))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| mismatch(key, ty, value))?;
            Some(ConfigValue::BytesArray(chunks))
        }
    };
    converted.ok_or_else(|| mismatch(key, ty, value))
}

fn as_double(value: &Value) -> Option<f64> {
    match value {
        Value::Float(f) => Some(*f),
        Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

fn array_of<T>(value: &Value, item: impl Fn(&Value) -> Option<T>) -> Option<Vec<T>> {
    value.as_array()?.iter().map(item).collect()
}

fn as_bytes(key: &ConfigKey, value: &Value) -> Result<Vec<u8>, ConfigVarError> {
    let items = value
        .as_array()
        .ok_or_else(|| mismatch(key, ConfigType::Bytes, value))?;
    items
        .iter()
        .map(|item| {
            item.as_integer()
                .and_then(|i| u8::try_from(i).ok())
                .ok_or_else(|| ConfigVarError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("byte values must be integers in 0..=255, found {item}"),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{RequiredConfig, TestConfig};
    use std::io::Write;

    fn source(content: &str) -> TableSource {
        TableSource::from_toml_str(content).unwrap()
    }

    fn fetch(src: &TableSource, key: &str, ty: ConfigType) -> Option<ConfigValue> {
        src.fetch(&ConfigKey::new(key), ty).unwrap()
    }

    #[test]
    fn table_get_flat() {
        let table: Table = toml::from_str("port = 8080").unwrap();
        let val = table_get(&table, &"port".into()).unwrap();
        assert_eq!(val.as_integer().unwrap(), 8080);
    }

    #[test]
    fn table_get_nested() {
        let table: Table = toml::from_str("[database]\npool_size = 5").unwrap();
        let val = table_get(&table, &"database.pool_size".into()).unwrap();
        assert_eq!(val.as_integer().unwrap(), 5);
    }

    #[test]
    fn table_get_missing() {
        let table: Table = toml::from_str("port = 8080").unwrap();
        assert!(table_get(&table, &"nope".into()).is_none());
        assert!(table_get(&table, &"port.inner".into()).is_none());
        assert!(table_get(&table, &ConfigKey::default()).is_none());
    }

    #[test]
    fn fetch_scalars() {
        let src = source("host = \"h\"\nport = 80\nrate = 0.5\ndebug = true\n");
        assert_eq!(
            fetch(&src, "host", ConfigType::String),
            Some(ConfigValue::String("h".into()))
        );
        assert_eq!(fetch(&src, "port", ConfigType::Int), Some(ConfigValue::Int(80)));
        assert_eq!(
            fetch(&src, "rate", ConfigType::Double),
            Some(ConfigValue::Double(0.5))
        );
        assert_eq!(
            fetch(&src, "debug", ConfigType::Bool),
            Some(ConfigValue::Bool(true))
        );
    }

    #[test]
    fn missing_key_is_none() {
        let src = source("port = 80");
        assert_eq!(fetch(&src, "host", ConfigType::String), None);
    }

    #[test]
    fn integer_widens_to_double() {
        let src = source("timeout = 30");
        assert_eq!(
            fetch(&src, "timeout", ConfigType::Double),
            Some(ConfigValue::Double(30.0))
        );
    }

    #[test]
    fn wrong_type_is_mismatch() {
        let src = source("port = \"eighty\"");
        let err = src
            .fetch(&ConfigKey::new("port"), ConfigType::Int)
            .unwrap_err();
        match err {
            ConfigVarError::TypeMismatch {
                key,
                expected,
                found,
            } => {
                assert_eq!(key, "port");
                assert_eq!(expected, ConfigType::Int);
                assert_eq!(found, "string");
            }
            other => panic!("Expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn arrays() {
        let src = source(
            "names = [\"a\", \"b\"]\nids = [1, 2]\nweights = [1, 2.5]\nflags = [true]\n",
        );
        assert_eq!(
            fetch(&src, "names", ConfigType::StringArray),
            Some(ConfigValue::StringArray(vec!["a".into(), "b".into()]))
        );
        assert_eq!(
            fetch(&src, "ids", ConfigType::IntArray),
            Some(ConfigValue::IntArray(vec![1, 2]))
        );
        assert_eq!(
            fetch(&src, "weights", ConfigType::DoubleArray),
            Some(ConfigValue::DoubleArray(vec![1.0, 2.5]))
        );
        assert_eq!(
            fetch(&src, "flags", ConfigType::BoolArray),
            Some(ConfigValue::BoolArray(vec![true]))
        );
    }

    #[test]
    fn mixed_array_is_mismatch() {
        let src = source("ids = [1, \"two\"]");
        assert!(matches!(
            src.fetch(&ConfigKey::new("ids"), ConfigType::IntArray),
            Err(ConfigVarError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn bytes_from_integer_arrays() {
        let src = source("key = [0, 127, 255]\nchunks = [[1], [2, 3]]\n");
        assert_eq!(
            fetch(&src, "key", ConfigType::Bytes),
            Some(ConfigValue::Bytes(vec![0, 127, 255]))
        );
        assert_eq!(
            fetch(&src, "chunks", ConfigType::BytesArray),
            Some(ConfigValue::BytesArray(vec![vec![1], vec![2, 3]]))
        );
    }

    #[test]
    fn out_of_range_byte_is_invalid() {
        let src = source("key = [256]");
        let err = src
            .fetch(&ConfigKey::new("key"), ConfigType::Bytes)
            .unwrap_err();
        assert!(matches!(err, ConfigVarError::InvalidValue { .. }));
        assert!(err.to_string().contains("0..=255"));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let result = TableSource::from_toml_str("port = ");
        assert!(matches!(result, Err(ConfigVarError::ParseError { .. })));
    }

    #[test]
    fn from_file_names_source_after_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\npool_size = 12").unwrap();
        let src = TableSource::from_file(file.path()).unwrap();
        assert_eq!(src.name(), file.path().display().to_string());
        assert_eq!(
            fetch(&src, "database.pool_size", ConfigType::Int),
            Some(ConfigValue::Int(12))
        );
    }

    #[test]
    fn from_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = TableSource::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigVarError::IoError { .. })));
    }

    #[test]
    fn from_config_uses_declared_defaults() {
        let src = TableSource::from_config::<TestConfig>().unwrap();
        assert_eq!(fetch(&src, "port", ConfigType::Int), Some(ConfigValue::Int(8080)));
        assert_eq!(
            fetch(&src, "database.replicas", ConfigType::StringArray),
            Some(ConfigValue::StringArray(vec![
                "replica-1".into(),
                "replica-2".into()
            ]))
        );
        // Option::None fields are omitted from the snapshot.
        assert_eq!(fetch(&src, "database.url", ConfigType::String), None);
    }

    #[test]
    fn from_config_missing_required_field_fails() {
        let result = TableSource::from_config::<RequiredConfig>();
        assert!(matches!(result, Err(ConfigVarError::ConfigError(_))));
    }

    #[test]
    fn from_serialize_rejects_non_tables() {
        let result = TableSource::from_serialize(&42);
        assert!(result.is_err());
    }

    #[test]
    fn default_name_and_rename() {
        let src = source("a = 1");
        assert_eq!(src.name(), "table");
        assert_eq!(src.named("defaults").name(), "defaults");
    }
}
