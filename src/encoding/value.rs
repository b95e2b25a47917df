use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Value};

/// A stringified tree: every leaf is a string, or absent.
///
/// Mappings keep insertion order, which for aggregates is field-declaration
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StrValue {
    #[default]
    Null,
    String(String),
    Sequence(Vec<StrValue>),
    Mapping(IndexMap<String, StrValue>),
}

impl StrValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[StrValue]> {
        match self {
            Self::Sequence(xs) => Some(xs),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&IndexMap<String, StrValue>> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a key of a mapping.
    pub fn get(&self, key: &str) -> Option<&StrValue> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    pub fn into_json(self) -> Value {
        Value::from(self)
    }
}

impl From<StrValue> for Value {
    fn from(value: StrValue) -> Self {
        match value {
            StrValue::Null => Value::Null,
            StrValue::String(s) => Value::String(s),
            StrValue::Sequence(xs) => Value::Array(xs.into_iter().map(Value::from).collect()),
            StrValue::Mapping(m) => Value::Object(
                m.into_iter().map(|(k, v)| (k, Value::from(v))).collect::<Map<String, Value>>(),
            ),
        }
    }
}

impl From<&str> for StrValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for StrValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl Serialize for StrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(xs) => {
                let mut seq = serializer.serialize_seq(Some(xs.len()))?;
                for x in xs {
                    seq.serialize_element(x)?;
                }
                seq.end()
            }
            Self::Mapping(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
