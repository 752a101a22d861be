//! Custom serde Serializer that renders any `Serialize` value as display
//! text, treating `Option::None` as "nothing to show".
//!
//! This is the default formatter behind [`MetadataKey::format`](crate::MetadataKey::format):
//!
//! - `None` → no text; `Some(x)` → the text of `x`
//! - unit enum variants → their serialized name, so `#[serde(rename_all)]`
//!   controls the raw string
//! - strings, numbers, booleans → as-is
//! - sequences → `[a, b]`, maps → `{k: v}`, structs → `Name { field: v }`

use std::fmt;

use serde::ser::{self, Serialize};

/// Render `value` as display text. `None` means the value has no meaningful
/// textual form (an absent optional).
///
/// If the value's `Serialize` impl fails, its `Debug` output is used instead.
pub fn describe<T: Serialize + fmt::Debug + ?Sized>(value: &T) -> Option<String> {
    match value.serialize(Describer) {
        Ok(text) => text,
        Err(_) => Some(format!("{value:?}")),
    }
}

#[derive(Debug)]
pub struct DescribeError(String);

impl fmt::Display for DescribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "describe error: {}", self.0)
    }
}

impl std::error::Error for DescribeError {}

impl ser::Error for DescribeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DescribeError(msg.to_string())
    }
}

struct Describer;

type Described = Result<Option<String>, DescribeError>;

impl ser::Serializer for Describer {
    type Ok = Option<String>;
    type Error = DescribeError;
    type SerializeSeq = SeqDescriber;
    type SerializeTuple = SeqDescriber;
    type SerializeTupleStruct = SeqDescriber;
    type SerializeTupleVariant = SeqDescriber;
    type SerializeMap = MapDescriber;
    type SerializeStruct = MapDescriber;
    type SerializeStructVariant = MapDescriber;

    fn serialize_bool(self, v: bool) -> Described {
        Ok(Some(v.to_string()))
    }

    fn serialize_i8(self, v: i8) -> Described {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Described {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Described {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Described {
        Ok(Some(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Described {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Described {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Described {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Described {
        Ok(Some(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Described {
        Ok(Some(v.to_string()))
    }

    fn serialize_f64(self, v: f64) -> Described {
        Ok(Some(v.to_string()))
    }

    fn serialize_char(self, v: char) -> Described {
        Ok(Some(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Described {
        Ok(Some(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Described {
        Ok(Some(format!("<{} bytes>", v.len())))
    }

    fn serialize_none(self) -> Described {
        Ok(None)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Described {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Described {
        Ok(Some("()".to_string()))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Described {
        Ok(Some(name.to_string()))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Described {
        Ok(Some(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Described {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Described {
        Ok(Some(match value.serialize(Describer)? {
            Some(inner) => format!("{variant}({inner})"),
            None => variant.to_string(),
        }))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(SeqDescriber {
            name: None,
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(SeqDescriber {
            name: Some(name),
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(SeqDescriber {
            name: Some(variant),
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(MapDescriber {
            name: None,
            entries: Vec::new(),
            current_key: None,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(MapDescriber {
            name: Some(name),
            entries: Vec::new(),
            current_key: None,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(MapDescriber {
            name: Some(variant),
            entries: Vec::new(),
            current_key: None,
        })
    }
}

// --- Sequences and tuples ---

struct SeqDescriber {
    name: Option<&'static str>,
    items: Vec<String>,
}

impl SeqDescriber {
    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DescribeError> {
        // Absent elements have nothing to show.
        if let Some(text) = value.serialize(Describer)? {
            self.items.push(text);
        }
        Ok(())
    }

    fn finish(self) -> Described {
        let body = self.items.join(", ");
        Ok(Some(match self.name {
            Some(name) => format!("{name}({body})"),
            None => format!("[{body}]"),
        }))
    }
}

impl ser::SerializeSeq for SeqDescriber {
    type Ok = Option<String>;
    type Error = DescribeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Described {
        self.finish()
    }
}

impl ser::SerializeTuple for SeqDescriber {
    type Ok = Option<String>;
    type Error = DescribeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Described {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SeqDescriber {
    type Ok = Option<String>;
    type Error = DescribeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Described {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SeqDescriber {
    type Ok = Option<String>;
    type Error = DescribeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.push(value)
    }

    fn end(self) -> Described {
        self.finish()
    }
}

// --- Maps and structs ---

struct MapDescriber {
    name: Option<&'static str>,
    entries: Vec<String>,
    current_key: Option<String>,
}

impl MapDescriber {
    fn push<T: Serialize + ?Sized>(&mut self, key: String, value: &T) -> Result<(), DescribeError> {
        if let Some(text) = value.serialize(Describer)? {
            self.entries.push(format!("{key}: {text}"));
        }
        Ok(())
    }

    fn finish(self) -> Described {
        let body = self.entries.join(", ");
        Ok(Some(match self.name {
            Some(name) if body.is_empty() => name.to_string(),
            Some(name) => format!("{name} {{ {body} }}"),
            None => format!("{{{body}}}"),
        }))
    }
}

impl ser::SerializeMap for MapDescriber {
    type Ok = Option<String>;
    type Error = DescribeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), Self::Error> {
        self.current_key = Some(key.serialize(Describer)?.unwrap_or_default());
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Self::Error> {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| DescribeError("serialize_value called without serialize_key".into()))?;
        self.push(key, value)
    }

    fn end(self) -> Described {
        self.finish()
    }
}

impl ser::SerializeStruct for MapDescriber {
    type Ok = Option<String>;
    type Error = DescribeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.push(key.to_string(), value)
    }

    fn end(self) -> Described {
        self.finish()
    }
}

impl ser::SerializeStructVariant for MapDescriber {
    type Ok = Option<String>;
    type Error = DescribeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        self.push(key.to_string(), value)
    }

    fn end(self) -> Described {
        self.finish()
    }
}
