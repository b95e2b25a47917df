//! Scalars that are strings on the wire even under a plain JSON encoder.
//!
//! Use these for fields that go through `serde_json` directly instead of the
//! transcoder. Decoding is strict: the JSON value must be a string, and it
//! must parse.
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use super::leaf;

macro_rules! string_scalar {
    ($(#[$meta:meta])* $name:ident($inner:ty), $render:expr, $parse:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
        pub struct $name(pub $inner);

        impl $name {
            pub fn value(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&($render)(self.0))
            }
        }

        impl FromStr for $name {
            type Err = crate::error::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ($parse)(s).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&($render)(self.0))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_str(ParsedStr::<$name>::default())
            }
        }
    };
}

string_scalar!(
    /// A boolean carried as `"true"`/`"false"`.
    Bool(bool),
    leaf::render_bool,
    |s: &str| leaf::parse_bool_strict(s).ok_or_else(|| crate::error::Error::InvalidLeaf {
        kind: leaf::ScalarKind::Bool,
        value: s.to_owned(),
        reason: "not a boolean".to_owned(),
    })
);

string_scalar!(
    /// A signed integer carried as its decimal string.
    Int(i64),
    |v: i64| v.to_string(),
    leaf::parse_int
);

string_scalar!(
    /// A float carried as its shortest decimal string.
    Float(f64),
    leaf::render_float,
    leaf::parse_float
);

/// A plain string; kept for symmetry with the other wrappers.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Str(pub String);

impl Str {
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Str {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Str {
    fn from(value: String) -> Self {
        Self(value)
    }
}

struct ParsedStr<T>(std::marker::PhantomData<T>);

impl<T> Default for ParsedStr<T> {
    fn default() -> Self {
        Self(std::marker::PhantomData)
    }
}

impl<'de, T> Visitor<'de> for ParsedStr<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string-encoded scalar")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        v.parse().map_err(E::custom)
    }
}
