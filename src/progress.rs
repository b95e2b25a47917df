//! What a handler reports back after one invocation.
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cfnerr::HandlerErrorCode;

/// Whether the handler reached a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Pending,
    InProgress,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent<M, C> {
    pub operation_status: OperationStatus,
    /// Set for `FAILED` (and optionally `IN_PROGRESS`) events.
    pub error_code: Option<HandlerErrorCode>,
    /// Shown to callers, e.g. "propagating to edge".
    pub message: String,
    /// State handed back on the next invocation of an `IN_PROGRESS` operation.
    pub callback_context: Option<C>,
    /// Delay before the next invocation; `<= 0` means no callback.
    pub callback_delay_seconds: i64,
    /// Output of READ, or the final state of CREATE/UPDATE/DELETE.
    pub resource_model: Option<M>,
    /// Output of LIST.
    pub resource_models: Option<Vec<M>>,
    /// Token for the next LIST page.
    pub next_token: Option<String>,
}

impl<M, C> ProgressEvent<M, C> {
    fn with_status(operation_status: OperationStatus) -> Self {
        Self {
            operation_status,
            error_code: None,
            message: String::new(),
            callback_context: None,
            callback_delay_seconds: 0,
            resource_model: None,
            resource_models: None,
            next_token: None,
        }
    }

    pub fn in_progress(model: Option<M>, callback_context: Option<C>) -> Self {
        Self {
            resource_model: model,
            callback_context,
            ..Self::with_status(OperationStatus::InProgress)
        }
    }

    pub fn success(model: Option<M>) -> Self {
        Self { resource_model: model, ..Self::with_status(OperationStatus::Success) }
    }

    pub fn failed(code: HandlerErrorCode, message: impl Into<String>) -> Self {
        Self {
            error_code: Some(code),
            message: message.into(),
            ..Self::with_status(OperationStatus::Failed)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Whole seconds; sub-second remainders are dropped.
    pub fn with_callback_delay(mut self, delay: Duration) -> Self {
        self.callback_delay_seconds = i64::try_from(delay.as_secs()).unwrap_or(i64::MAX);
        self
    }

    pub fn with_model(mut self, model: M) -> Self {
        self.resource_model = Some(model);
        self
    }

    pub fn with_models(mut self, models: Vec<M>) -> Self {
        self.resource_models = Some(models);
        self
    }

    pub fn with_error_code(mut self, code: HandlerErrorCode) -> Self {
        self.error_code = Some(code);
        self
    }

    pub fn with_next_token(mut self, token: impl Into<String>) -> Self {
        self.next_token = Some(token.into());
        self
    }
}
