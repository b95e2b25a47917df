//! Stringify walker: any `Serialize` value into a [`StrValue`] tree.
use indexmap::IndexMap;
use serde::ser::{self, Serialize};

use super::leaf;
use super::value::StrValue;
use crate::error::{Error, Result};

/// Serializer whose output is a [`StrValue`].
///
/// `Option`, newtypes and smart pointers are transparent. Null entries are
/// stripped from mappings; sequences keep them so length is preserved. An
/// enum variant tag is not a data mapping, so `{"Tcp": null}` stays.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stringifier;

impl ser::Serializer for Stringifier {
    type Ok = StrValue;
    type Error = Error;

    type SerializeSeq = SequenceBuilder;
    type SerializeTuple = SequenceBuilder;
    type SerializeTupleStruct = SequenceBuilder;
    type SerializeTupleVariant = VariantBuilder<SequenceBuilder>;
    type SerializeMap = MappingBuilder;
    type SerializeStruct = MappingBuilder;
    type SerializeStructVariant = VariantBuilder<MappingBuilder>;

    fn serialize_bool(self, v: bool) -> Result<StrValue> {
        Ok(StrValue::String(leaf::render_bool(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<StrValue> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<StrValue> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<StrValue> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<StrValue> {
        Ok(StrValue::String(v.to_string()))
    }

    fn serialize_i128(self, v: i128) -> Result<StrValue> {
        Ok(StrValue::String(v.to_string()))
    }

    fn serialize_u8(self, v: u8) -> Result<StrValue> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<StrValue> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<StrValue> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<StrValue> {
        Ok(StrValue::String(v.to_string()))
    }

    fn serialize_u128(self, v: u128) -> Result<StrValue> {
        Ok(StrValue::String(v.to_string()))
    }

    fn serialize_f32(self, v: f32) -> Result<StrValue> {
        // f32's own Display; widening first would print the binary expansion
        Ok(StrValue::String(v.to_string()))
    }

    fn serialize_f64(self, v: f64) -> Result<StrValue> {
        Ok(StrValue::String(leaf::render_float(v)))
    }

    fn serialize_char(self, v: char) -> Result<StrValue> {
        Ok(StrValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<StrValue> {
        Ok(StrValue::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<StrValue> {
        Ok(StrValue::Sequence(v.iter().map(|b| StrValue::String(b.to_string())).collect()))
    }

    fn serialize_none(self) -> Result<StrValue> {
        Ok(StrValue::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<StrValue> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<StrValue> {
        Ok(StrValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<StrValue> {
        Ok(StrValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<StrValue> {
        Ok(StrValue::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<StrValue> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<StrValue> {
        // the tag is not a data mapping, so a null payload stays
        Ok(tagged(variant, value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SequenceBuilder> {
        Ok(SequenceBuilder { items: Vec::with_capacity(len.unwrap_or(0)) })
    }

    fn serialize_tuple(self, len: usize) -> Result<SequenceBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SequenceBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder<SequenceBuilder>> {
        Ok(VariantBuilder { variant, inner: self.serialize_seq(Some(len))? })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MappingBuilder> {
        Ok(MappingBuilder { entries: IndexMap::with_capacity(len.unwrap_or(0)), key: None })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MappingBuilder> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder<MappingBuilder>> {
        Ok(VariantBuilder { variant, inner: self.serialize_map(Some(len))? })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// COMPOUND BUILDERS
// ————————————————————————————————————————————————————————————————————————————

pub struct SequenceBuilder {
    items: Vec<StrValue>,
}

impl SequenceBuilder {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(value.serialize(Stringifier)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SequenceBuilder {
    type Ok = StrValue;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<StrValue> {
        Ok(StrValue::Sequence(self.items))
    }
}

impl ser::SerializeTuple for SequenceBuilder {
    type Ok = StrValue;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<StrValue> {
        Ok(StrValue::Sequence(self.items))
    }
}

impl ser::SerializeTupleStruct for SequenceBuilder {
    type Ok = StrValue;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<StrValue> {
        Ok(StrValue::Sequence(self.items))
    }
}

pub struct MappingBuilder {
    entries: IndexMap<String, StrValue>,
    key: Option<String>,
}

impl MappingBuilder {
    fn insert<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<()> {
        let value = value.serialize(Stringifier)?;
        if !value.is_null() {
            self.entries.insert(key, value);
        }
        Ok(())
    }
}

impl ser::SerializeMap for MappingBuilder {
    type Ok = StrValue;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        match key.serialize(Stringifier)? {
            StrValue::String(key) => {
                self.key = Some(key);
                Ok(())
            }
            StrValue::Null => Err(Error::Unsupported("null map key")),
            _ => Err(Error::Unsupported("non-scalar map key")),
        }
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self
            .key
            .take()
            .ok_or_else(|| Error::Message("map value serialized before its key".to_owned()))?;
        self.insert(key, value)
    }

    fn end(self) -> Result<StrValue> {
        Ok(StrValue::Mapping(self.entries))
    }
}

impl ser::SerializeStruct for MappingBuilder {
    type Ok = StrValue;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.insert(key.to_owned(), value)
    }

    fn end(self) -> Result<StrValue> {
        Ok(StrValue::Mapping(self.entries))
    }
}

/// Externally tagged enum payload: `{ variant: payload }`.
pub struct VariantBuilder<B> {
    variant: &'static str,
    inner: B,
}

fn tagged(variant: &str, payload: StrValue) -> StrValue {
    let mut entries = IndexMap::with_capacity(1);
    entries.insert(variant.to_owned(), payload);
    StrValue::Mapping(entries)
}

impl VariantBuilder<SequenceBuilder> {
    fn finish(self) -> StrValue {
        tagged(self.variant, StrValue::Sequence(self.inner.items))
    }
}

impl VariantBuilder<MappingBuilder> {
    fn finish(self) -> StrValue {
        tagged(self.variant, StrValue::Mapping(self.inner.entries))
    }
}

impl ser::SerializeTupleVariant for VariantBuilder<SequenceBuilder> {
    type Ok = StrValue;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.inner.push(value)
    }

    fn end(self) -> Result<StrValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for VariantBuilder<MappingBuilder> {
    type Ok = StrValue;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.inner.insert(key.to_owned(), value)
    }

    fn end(self) -> Result<StrValue> {
        Ok(self.finish())
    }
}
