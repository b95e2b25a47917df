//! Unstringify walker: a `Deserializer` over a borrowed JSON tree whose
//! leaves may be strings or native JSON scalars.
use std::fmt::Display;

use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, DeserializeSeed, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde_json::{Map, Value};

use super::leaf::{self, ScalarKind};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct Unstringifier<'de> {
    value: &'de Value,
}

impl<'de> Unstringifier<'de> {
    pub fn new(value: &'de Value) -> Self {
        Self { value }
    }

    fn signed(&self) -> Result<i64> {
        match self.value {
            Value::String(s) => leaf::parse_int(s),
            Value::Number(n) => leaf::number_to_i64(n),
            other => Err(Error::mismatch("integer", other)),
        }
    }

    fn unsigned(&self) -> Result<u64> {
        match self.value {
            Value::String(s) => leaf::parse_uint(s),
            Value::Number(n) => leaf::number_to_u64(n),
            other => Err(Error::mismatch("unsigned integer", other)),
        }
    }

    fn float(&self) -> Result<f64> {
        match self.value {
            Value::String(s) => leaf::parse_float(s),
            Value::Number(n) => leaf::number_to_f64(n),
            other => Err(Error::mismatch("float", other)),
        }
    }

    fn signed_wide(&self) -> Result<i128> {
        match self.value {
            Value::String(s) => leaf::parse_int128(s),
            Value::Number(n) => match n.as_u64() {
                Some(u) => Ok(i128::from(u)),
                None => leaf::number_to_i64(n).map(i128::from),
            },
            other => Err(Error::mismatch("integer", other)),
        }
    }

    fn unsigned_wide(&self) -> Result<u128> {
        match self.value {
            Value::String(s) => leaf::parse_uint128(s),
            Value::Number(n) => leaf::number_to_u64(n).map(u128::from),
            other => Err(Error::mismatch("unsigned integer", other)),
        }
    }
}

fn out_of_range(kind: ScalarKind, value: impl Display, target: &str) -> Error {
    Error::InvalidLeaf {
        kind,
        value: value.to_string(),
        reason: format!("out of range for {target}"),
    }
}

fn key(s: &str) -> BorrowedStrDeserializer<'_, Error> {
    BorrowedStrDeserializer::new(s)
}

macro_rules! deserialize_narrowed {
    ($($method:ident: $ty:ty => $visit:ident via $wide:ident as $kind:expr;)*) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
            let wide = self.$wide()?;
            let narrow = <$ty>::try_from(wide).map_err(|_| out_of_range($kind, wide, stringify!($ty)))?;
            visitor.$visit(narrow)
        }
    )*};
}

impl<'de> de::Deserializer<'de> for Unstringifier<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    visitor.visit_u64(u)
                } else if let Some(i) = n.as_i64() {
                    visitor.visit_i64(i)
                } else {
                    visitor.visit_f64(leaf::number_to_f64(n)?)
                }
            }
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Array(xs) => visit_array(xs, visitor),
            Value::Object(m) => visit_object(m, visitor),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::String(s) => visitor.visit_bool(leaf::parse_bool(s)),
            other => Err(Error::mismatch("boolean", other)),
        }
    }

    deserialize_narrowed! {
        deserialize_i8: i8 => visit_i8 via signed as ScalarKind::Int;
        deserialize_i16: i16 => visit_i16 via signed as ScalarKind::Int;
        deserialize_i32: i32 => visit_i32 via signed as ScalarKind::Int;
        deserialize_i64: i64 => visit_i64 via signed as ScalarKind::Int;
        deserialize_u8: u8 => visit_u8 via unsigned as ScalarKind::Uint;
        deserialize_u16: u16 => visit_u16 via unsigned as ScalarKind::Uint;
        deserialize_u32: u32 => visit_u32 via unsigned as ScalarKind::Uint;
        deserialize_u64: u64 => visit_u64 via unsigned as ScalarKind::Uint;
        deserialize_i128: i128 => visit_i128 via signed_wide as ScalarKind::Int;
        deserialize_u128: u128 => visit_u128 via unsigned_wide as ScalarKind::Uint;
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.float()? as f32)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.float()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Bool(b) => visitor.visit_string(leaf::render_bool(*b)),
            Value::Number(n) => visitor.visit_string(n.to_string()),
            other => Err(Error::mismatch("string", other)),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::String(s) => visitor.visit_borrowed_bytes(s.as_bytes()),
            Value::Array(xs) => visit_array(xs, visitor),
            other => Err(Error::mismatch("bytes", other)),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Null => visitor.visit_unit(),
            other => Err(Error::mismatch("null", other)),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Array(xs) => visit_array(xs, visitor),
            other => Err(Error::mismatch("array", other)),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            Value::Object(m) => visit_object(m, visitor),
            other => Err(Error::mismatch("object", other)),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.value {
            Value::String(s) => visitor.visit_enum(key(s)),
            Value::Object(m) => {
                let mut entries = m.iter();
                match (entries.next(), entries.next()) {
                    (Some((variant, value)), None) => visitor.visit_enum(VariantEntry { variant, value }),
                    _ => Err(Error::Message(format!(
                        "expected an object with a single variant key, found {} keys",
                        m.len()
                    ))),
                }
            }
            other => Err(Error::mismatch("enum variant", other)),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SEQUENCES & MAPPINGS
// ————————————————————————————————————————————————————————————————————————————

fn visit_array<'de, V: Visitor<'de>>(xs: &'de [Value], visitor: V) -> Result<V::Value> {
    let mut elements = Elements { iter: xs.iter() };
    let out = visitor.visit_seq(&mut elements)?;
    if elements.iter.len() == 0 {
        Ok(out)
    } else {
        Err(de::Error::invalid_length(xs.len(), &"fewer elements in array"))
    }
}

fn visit_object<'de, V: Visitor<'de>>(m: &'de Map<String, Value>, visitor: V) -> Result<V::Value> {
    visitor.visit_map(Entries { iter: m.iter(), value: None })
}

struct Elements<'de> {
    iter: std::slice::Iter<'de, Value>,
}

impl<'de> SeqAccess<'de> for Elements<'de> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        self.iter
            .next()
            .map(|value| seed.deserialize(Unstringifier::new(value)))
            .transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct Entries<'de> {
    iter: serde_json::map::Iter<'de>,
    value: Option<&'de Value>,
}

impl<'de> MapAccess<'de> for Entries<'de> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        match self.iter.next() {
            Some((k, value)) => {
                self.value = Some(value);
                seed.deserialize(MapKey { key: k }).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let value = self
            .value
            .take()
            .ok_or_else(|| Error::Message("map value requested before its key".to_owned()))?;
        seed.deserialize(Unstringifier::new(value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// A mapping key. String targets get it verbatim; scalar targets parse it
/// with the leaf rules, so rendered integer or boolean keys read back.
struct MapKey<'de> {
    key: &'de str,
}

impl MapKey<'_> {
    fn signed(&self) -> Result<i64> {
        leaf::parse_int(self.key)
    }

    fn unsigned(&self) -> Result<u64> {
        leaf::parse_uint(self.key)
    }

    fn signed_wide(&self) -> Result<i128> {
        leaf::parse_int128(self.key)
    }

    fn unsigned_wide(&self) -> Result<u128> {
        leaf::parse_uint128(self.key)
    }
}

impl<'de> de::Deserializer<'de> for MapKey<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.key)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(leaf::parse_bool(self.key))
    }

    deserialize_narrowed! {
        deserialize_i8: i8 => visit_i8 via signed as ScalarKind::Int;
        deserialize_i16: i16 => visit_i16 via signed as ScalarKind::Int;
        deserialize_i32: i32 => visit_i32 via signed as ScalarKind::Int;
        deserialize_i64: i64 => visit_i64 via signed as ScalarKind::Int;
        deserialize_u8: u8 => visit_u8 via unsigned as ScalarKind::Uint;
        deserialize_u16: u16 => visit_u16 via unsigned as ScalarKind::Uint;
        deserialize_u32: u32 => visit_u32 via unsigned as ScalarKind::Uint;
        deserialize_u64: u64 => visit_u64 via unsigned as ScalarKind::Uint;
        deserialize_i128: i128 => visit_i128 via signed_wide as ScalarKind::Int;
        deserialize_u128: u128 => visit_u128 via unsigned_wide as ScalarKind::Uint;
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(leaf::parse_float(self.key)? as f32)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(leaf::parse_float(self.key)?)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_enum(key(self.key))
    }

    serde::forward_to_deserialize_any! {
        char str string bytes byte_buf unit unit_struct seq tuple tuple_struct
        map struct identifier ignored_any
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ENUMS
// ————————————————————————————————————————————————————————————————————————————

struct VariantEntry<'de> {
    variant: &'de str,
    value: &'de Value,
}

impl<'de> EnumAccess<'de> for VariantEntry<'de> {
    type Error = Error;
    type Variant = Unstringifier<'de>;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let variant = seed.deserialize(key(self.variant))?;
        Ok((variant, Unstringifier::new(self.value)))
    }
}

impl<'de> VariantAccess<'de> for Unstringifier<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null => Ok(()),
            other => Err(Error::mismatch("unit variant", other)),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        de::Deserializer::deserialize_map(self, visitor)
    }
}
