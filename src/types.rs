use std::fmt;

/// The fixed set of value types an accessor can request from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigType {
    String,
    Int,
    Double,
    Bool,
    Bytes,
    StringArray,
    IntArray,
    DoubleArray,
    BoolArray,
    BytesArray,
}

impl ConfigType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigType::String => "string",
            ConfigType::Int => "int",
            ConfigType::Double => "double",
            ConfigType::Bool => "bool",
            ConfigType::Bytes => "bytes",
            ConfigType::StringArray => "string_array",
            ConfigType::IntArray => "int_array",
            ConfigType::DoubleArray => "double_array",
            ConfigType::BoolArray => "bool_array",
            ConfigType::BytesArray => "bytes_array",
        }
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved configuration value, tagged with its [`ConfigType`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    StringArray(Vec<String>),
    IntArray(Vec<i64>),
    DoubleArray(Vec<f64>),
    BoolArray(Vec<bool>),
    BytesArray(Vec<Vec<u8>>),
}

impl ConfigValue {
    pub fn config_type(&self) -> ConfigType {
        match self {
            ConfigValue::String(_) => ConfigType::String,
            ConfigValue::Int(_) => ConfigType::Int,
            ConfigValue::Double(_) => ConfigType::Double,
            ConfigValue::Bool(_) => ConfigType::Bool,
            ConfigValue::Bytes(_) => ConfigType::Bytes,
            ConfigValue::StringArray(_) => ConfigType::StringArray,
            ConfigValue::IntArray(_) => ConfigType::IntArray,
            ConfigValue::DoubleArray(_) => ConfigType::DoubleArray,
            ConfigValue::BoolArray(_) => ConfigType::BoolArray,
            ConfigValue::BytesArray(_) => ConfigType::BytesArray,
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "]")
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => write!(f, "{s}"),
            ConfigValue::Int(i) => write!(f, "{i}"),
            ConfigValue::Double(d) => write!(f, "{d}"),
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            ConfigValue::StringArray(a) => write_list(f, a),
            ConfigValue::IntArray(a) => write_list(f, a),
            ConfigValue::DoubleArray(a) => write_list(f, a),
            ConfigValue::BoolArray(a) => write_list(f, a),
            ConfigValue::BytesArray(chunks) => {
                let sizes: Vec<String> = chunks
                    .iter()
                    .map(|c| format!("<{} bytes>", c.len()))
                    .collect();
                write_list(f, &sizes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_type_matches_variant() {
        assert_eq!(ConfigValue::Int(1).config_type(), ConfigType::Int);
        assert_eq!(
            ConfigValue::BytesArray(vec![]).config_type(),
            ConfigType::BytesArray
        );
    }

    #[test]
    fn type_names_are_snake_case() {
        assert_eq!(ConfigType::StringArray.to_string(), "string_array");
        assert_eq!(ConfigType::Double.to_string(), "double");
    }

    #[test]
    fn scalar_display() {
        assert_eq!(ConfigValue::String("localhost".into()).to_string(), "localhost");
        assert_eq!(ConfigValue::Int(8080).to_string(), "8080");
        assert_eq!(ConfigValue::Bool(true).to_string(), "true");
    }

    #[test]
    fn bytes_display_hides_content() {
        assert_eq!(ConfigValue::Bytes(vec![1, 2, 3]).to_string(), "<3 bytes>");
        assert_eq!(
            ConfigValue::BytesArray(vec![vec![1], vec![]]).to_string(),
            "[<1 bytes>, <0 bytes>]"
        );
    }

    #[test]
    fn array_display() {
        let value = ConfigValue::StringArray(vec!["a".into(), "b".into()]);
        assert_eq!(value.to_string(), "[a, b]");
        assert_eq!(ConfigValue::IntArray(vec![]).to_string(), "[]");
    }
}
