//! String transcoding for resource models.
//!
//! The resource-provider wire format carries every scalar property as a JSON
//! string. [`stringify`] turns any `Serialize` value into a [`StrValue`]
//! tree of that form; [`unstringify`] rebuilds a typed value from a JSON tree
//! whose leaves may be strings *or* native JSON scalars.
//!
//! Shape rules, both directions:
//! - `Option::None` is absent: dropped from mappings, `null` at the root.
//! - `Some(x)`, `Box<x>`, newtypes are transparent.
//! - Sequences keep order and length; mappings keep their keys verbatim.
//! - Omitting a field is opt-in per field:
//!   `#[serde(skip_serializing_if = "cfn_resource::encoding::is_default")]`
//!   on the way out, `#[serde(default)]` to accept its absence on the way in.
//!
//! ```
//! use cfn_resource::encoding;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Model {
//!     #[serde(rename = "Count", default, skip_serializing_if = "encoding::is_default")]
//!     count: i64,
//!     #[serde(rename = "Active")]
//!     active: bool,
//! }
//!
//! let wire = encoding::stringify(&Model { count: 0, active: true }).unwrap();
//! assert_eq!(wire.into_json(), serde_json::json!({"Active": "true"}));
//!
//! let model: Model = encoding::unstringify(&serde_json::json!({"Active": true})).unwrap();
//! assert_eq!(model, Model { count: 0, active: true });
//! ```
pub mod de;
pub mod leaf;
pub mod ser;
pub mod value;
pub mod wrappers;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

pub use de::Unstringifier;
pub use ser::Stringifier;
pub use value::StrValue;

pub use crate::error::{Error, Result};

// ————————————————————————————————————————————————————————————————————————————
// TREE LEVEL
// ————————————————————————————————————————————————————————————————————————————

/// Render `value` as a tree of strings.
pub fn stringify<T: ?Sized + Serialize>(value: &T) -> Result<StrValue> {
    serde_path_to_error::serialize(value, Stringifier).map_err(|error| {
        let path = error.path().to_string();
        trace!(%path, "stringify failed");
        Error::at(path, error.into_inner())
    })
}

/// Build a `T` from a string- or scalar-leafed JSON tree.
///
/// Errors below the root carry the JSON path of the offending value.
pub fn unstringify<'de, T: Deserialize<'de>>(source: &'de Value) -> Result<T> {
    serde_path_to_error::deserialize(Unstringifier::new(source)).map_err(|error| {
        let path = error.path().to_string();
        trace!(%path, "unstringify failed");
        Error::at(path, error.into_inner())
    })
}

/// Populate `dest` from `source`. `dest` is only overwritten on success.
pub fn unstringify_into<'de, T: Deserialize<'de>>(source: &'de Value, dest: &mut T) -> Result<()> {
    *dest = unstringify(source)?;
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// BYTE LEVEL
// ————————————————————————————————————————————————————————————————————————————

pub fn to_string<T: ?Sized + Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(&stringify(value)?)?)
}

pub fn to_vec<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&stringify(value)?)?)
}

pub fn from_str<T: DeserializeOwned>(source: &str) -> Result<T> {
    let value: Value = serde_json::from_str(source)?;
    unstringify(&value)
}

pub fn from_slice<T: DeserializeOwned>(source: &[u8]) -> Result<T> {
    let value: Value = serde_json::from_slice(source)?;
    unstringify(&value)
}

// ————————————————————————————————————————————————————————————————————————————
// FIELD POLICY
// ————————————————————————————————————————————————————————————————————————————

/// `skip_serializing_if` predicate for the omit-when-empty policy.
///
/// Pair it with `#[serde(default)]` on the same field: without it the
/// omitted key is a `missing field` error when the value is read back.
pub fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
