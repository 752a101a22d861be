//! Per-type dispatch between Rust types and [`ConfigValue`].
//!
//! Each type in the fixed set names the [`ConfigType`] it asks a source for
//! and knows how to get itself back out of the returned value.

use crate::types::{ConfigType, ConfigValue};

/// A Rust type that can be read through a [`ConfigAccessor`](crate::ConfigAccessor).
pub trait ConfigValueType: Clone + Sized {
    /// The type requested from the source.
    const TYPE: ConfigType;

    /// Extract `Self` from a value. Returns `None` on a variant mismatch.
    fn from_config_value(value: ConfigValue) -> Option<Self>;

    fn into_config_value(self) -> ConfigValue;
}

macro_rules! config_value_type {
    ($ty:ty, $variant:ident) => {
        impl ConfigValueType for $ty {
            const TYPE: ConfigType = ConfigType::$variant;

            fn from_config_value(value: ConfigValue) -> Option<Self> {
                match value {
                    ConfigValue::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn into_config_value(self) -> ConfigValue {
                ConfigValue::$variant(self)
            }
        }
    };
}

config_value_type!(String, String);
config_value_type!(i64, Int);
config_value_type!(f64, Double);
config_value_type!(bool, Bool);
config_value_type!(Vec<u8>, Bytes);
config_value_type!(Vec<String>, StringArray);
config_value_type!(Vec<i64>, IntArray);
config_value_type!(Vec<f64>, DoubleArray);
config_value_type!(Vec<bool>, BoolArray);
config_value_type!(Vec<Vec<u8>>, BytesArray);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_type_requests_its_own_variant() {
        assert_eq!(String::TYPE, ConfigType::String);
        assert_eq!(i64::TYPE, ConfigType::Int);
        assert_eq!(f64::TYPE, ConfigType::Double);
        assert_eq!(bool::TYPE, ConfigType::Bool);
        assert_eq!(<Vec<u8>>::TYPE, ConfigType::Bytes);
        assert_eq!(<Vec<String>>::TYPE, ConfigType::StringArray);
        assert_eq!(<Vec<Vec<u8>>>::TYPE, ConfigType::BytesArray);
    }

    #[test]
    fn matching_variant_converts() {
        assert_eq!(i64::from_config_value(ConfigValue::Int(5)), Some(5));
        assert_eq!(
            <Vec<bool>>::from_config_value(ConfigValue::BoolArray(vec![true])),
            Some(vec![true])
        );
    }

    #[test]
    fn mismatched_variant_is_none() {
        assert_eq!(i64::from_config_value(ConfigValue::String("5".into())), None);
        assert_eq!(
            <Vec<u8>>::from_config_value(ConfigValue::IntArray(vec![1])),
            None
        );
    }

    #[test]
    fn into_value_tags_correctly() {
        let value = "x".to_string().into_config_value();
        assert_eq!(value.config_type(), ConfigType::String);
        assert_eq!(2.5f64.into_config_value(), ConfigValue::Double(2.5));
    }
}
