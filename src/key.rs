use std::fmt;

/// A dotted configuration key such as `database.pool_size`.
///
/// Stored as components; empty segments (`a..b`, leading or trailing dots)
/// are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ConfigKey {
    components: Vec<String>,
}

impl ConfigKey {
    pub fn new(dotted: &str) -> Self {
        Self {
            components: dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn from_components<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Return `prefix.self`.
    pub fn prefixed(&self, prefix: &ConfigKey) -> ConfigKey {
        let mut components = prefix.components.clone();
        components.extend(self.components.iter().cloned());
        ConfigKey { components }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("."))
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey::new(s)
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey::new(&s)
    }
}

impl From<&ConfigKey> for ConfigKey {
    fn from(key: &ConfigKey) -> Self {
        key.clone()
    }
}
