//! The handler event as delivered by the resource-provider service.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::cfnerr::HandlerError;
use crate::path_de;

/// Tags are key/value paired strings.
pub type Tags = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub aws_account_id: String,
    #[serde(default)]
    pub bearer_token: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub resource_type_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_context: Option<Value>,
    #[serde(default)]
    pub request_data: RequestData,
    #[serde(default)]
    pub stack_id: String,
    #[serde(default, alias = "NextToken", skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Service-internal part of the event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestData {
    /// Role assigned to the resource (acts on the caller's account).
    #[serde(default)]
    pub caller_credentials: Option<Credentials>,
    /// Role of the provider itself.
    #[serde(default)]
    pub provider_credentials: Option<Credentials>,
    #[serde(default)]
    pub logical_resource_id: String,
    #[serde(default)]
    pub resource_properties: Option<Value>,
    #[serde(default)]
    pub previous_resource_properties: Option<Value>,
    #[serde(default)]
    pub type_configuration: Option<Value>,
    #[serde(default)]
    pub provider_log_group_name: String,
    #[serde(default)]
    pub stack_tags: Option<Tags>,
    #[serde(default)]
    pub system_tags: Option<Tags>,
}

/// Temporary credentials. Never printed, never re-serialized.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default)]
    pub session_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("REDACTED")
    }
}

impl Serialize for Credentials {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("REDACTED")
    }
}

impl FromStr for Event {
    type Err = crate::error::Error;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        path_de::from_str_with_path(source)
    }
}

impl Event {
    pub fn from_slice(bytes: &[u8]) -> crate::error::Result<Self> {
        path_de::from_slice_with_path(bytes)
    }

    /// Reject events missing the fields every response depends on.
    pub fn validate(&self) -> Result<(), HandlerError> {
        if self.bearer_token.is_empty() {
            return Err(HandlerError::invalid_request("event is missing bearerToken"));
        }
        if self.region.is_empty() {
            return Err(HandlerError::invalid_request("event is missing region"));
        }
        Ok(())
    }
}
