//! The typed view of an event handed to handler code.
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::cfnerr::{HandlerError, HandlerErrorCode};
use crate::encoding;
use crate::event::{Event, Tags};
use crate::handler::Action;
use crate::progress::ProgressEvent;

static STACK_ARN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^arn:[^:]+:cloudformation:[^:]*:[^:]*:stack/([^/]+)(?:/.*)?$")
        .expect("stack ARN pattern is valid")
});

/// Name of the stack in `arn:<partition>:cloudformation:<region>:<account>:stack/<name>/<id>`,
/// or `""` when `arn` is not a stack ARN.
pub fn stack_name_from_arn(arn: &str) -> &str {
    STACK_ARN
        .captures(arn)
        .and_then(|caps| caps.get(1))
        .map_or("", |name| name.as_str())
}

#[derive(Clone)]
pub struct Request<M, C> {
    pub action: Action,
    pub aws_account_id: String,
    pub region: String,
    pub stack_id: String,
    pub stack_name: String,
    pub logical_resource_id: String,
    pub resource_properties: Option<M>,
    pub previous_resource_properties: Option<M>,
    pub callback_context: Option<C>,
    pub stack_tags: Tags,
    pub system_tags: Tags,
    pub next_token: Option<String>,
    /// Type configuration, as sent; decode it with [`encoding::unstringify`].
    pub type_configuration: Option<Value>,
    bearer_token: String,
}

impl<M: DeserializeOwned, C: DeserializeOwned> Request<M, C> {
    /// Decode the model and callback payloads of `event`.
    pub fn from_event(action: Action, event: &Event) -> Result<Self, HandlerError> {
        let data = &event.request_data;
        debug!(%action, logical_id = %data.logical_resource_id, "decoding request");
        Ok(Self {
            action,
            aws_account_id: event.aws_account_id.clone(),
            region: event.region.clone(),
            stack_id: event.stack_id.clone(),
            stack_name: stack_name_from_arn(&event.stack_id).to_owned(),
            logical_resource_id: data.logical_resource_id.clone(),
            resource_properties: decode("resourceProperties", data.resource_properties.as_ref())?,
            previous_resource_properties: decode(
                "previousResourceProperties",
                data.previous_resource_properties.as_ref(),
            )?,
            callback_context: decode("callbackContext", event.callback_context.as_ref())?,
            stack_tags: data.stack_tags.clone().unwrap_or_default(),
            system_tags: data.system_tags.clone().unwrap_or_default(),
            next_token: event.next_token.clone(),
            type_configuration: data.type_configuration.clone(),
            bearer_token: event.bearer_token.clone(),
        })
    }
}

/// `null` and absent payloads both decode to `None`.
fn decode<T: DeserializeOwned>(name: &str, raw: Option<&Value>) -> Result<Option<T>, HandlerError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(value) => encoding::unstringify(value).map(Some).map_err(|error| {
            HandlerError::new(HandlerErrorCode::InternalFailure, format!("{name}: {error}"))
        }),
    }
}

impl<M, C> Request<M, C> {
    pub fn bearer_token(&self) -> &str {
        &self.bearer_token
    }

    pub fn in_progress(&self, model: Option<M>, callback_context: Option<C>) -> ProgressEvent<M, C> {
        ProgressEvent::in_progress(model, callback_context)
    }

    pub fn success(&self, model: Option<M>) -> ProgressEvent<M, C> {
        ProgressEvent::success(model)
    }

    /// A `FAILED` event; classified errors keep their code.
    pub fn failure(&self, err: &anyhow::Error) -> ProgressEvent<M, C> {
        match HandlerError::find(err) {
            Some(classified) => ProgressEvent::failed(classified.code(), classified.message()),
            None => ProgressEvent::failed(HandlerErrorCode::InternalFailure, err.to_string()),
        }
    }
}

impl<M: fmt::Debug, C: fmt::Debug> fmt::Debug for Request<M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("action", &self.action)
            .field("aws_account_id", &self.aws_account_id)
            .field("region", &self.region)
            .field("stack_id", &self.stack_id)
            .field("stack_name", &self.stack_name)
            .field("logical_resource_id", &self.logical_resource_id)
            .field("resource_properties", &self.resource_properties)
            .field("previous_resource_properties", &self.previous_resource_properties)
            .field("callback_context", &self.callback_context)
            .field("stack_tags", &self.stack_tags)
            .field("system_tags", &self.system_tags)
            .field("next_token", &self.next_token)
            .field("type_configuration", &self.type_configuration)
            .finish_non_exhaustive()
    }
}
