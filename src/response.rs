//! The wire response returned to the resource-provider service.
use serde::Serialize;

use crate::cfnerr::{HandlerError, HandlerErrorCode};
use crate::encoding::{self, StrValue};
use crate::progress::{OperationStatus, ProgressEvent};

/// Every model in a response is stringified; empty fields are omitted except
/// `resourceModels`, which LIST callers always expect (`null` when unset).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub operation_status: Option<OperationStatus>,
    #[serde(skip_serializing_if = "StrValue::is_null")]
    pub resource_model: StrValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<HandlerErrorCode>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bearer_token: String,
    pub resource_models: Option<Vec<StrValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(skip_serializing_if = "StrValue::is_null")]
    pub callback_context: StrValue,
    #[serde(skip_serializing_if = "encoding::is_default")]
    pub callback_delay_seconds: i64,
}

impl Response {
    pub fn from_progress<M: Serialize, C: Serialize>(
        event: &ProgressEvent<M, C>,
        bearer_token: &str,
    ) -> encoding::Result<Self> {
        let resource_models = match &event.resource_models {
            Some(models) => Some(
                models
                    .iter()
                    .map(encoding::stringify)
                    .collect::<encoding::Result<Vec<_>>>()?,
            ),
            None => None,
        };
        Ok(Self {
            message: event.message.clone(),
            operation_status: Some(event.operation_status),
            resource_model: encoding::stringify(&event.resource_model)?,
            error_code: event.error_code,
            bearer_token: bearer_token.to_owned(),
            resource_models,
            next_token: event.next_token.clone(),
            callback_context: encoding::stringify(&event.callback_context)?,
            callback_delay_seconds: event.callback_delay_seconds,
        })
    }

    /// A `FAILED` response; classified errors keep their code, anything else
    /// is an `InternalFailure`.
    pub fn failed(err: &anyhow::Error, bearer_token: &str) -> Self {
        let (code, message) = match HandlerError::find(err) {
            Some(classified) => (classified.code(), classified.message().to_owned()),
            None => (HandlerErrorCode::InternalFailure, format!("{err:#}")),
        };
        Self {
            message,
            operation_status: Some(OperationStatus::Failed),
            error_code: Some(code),
            bearer_token: bearer_token.to_owned(),
            ..Self::default()
        }
    }
}
