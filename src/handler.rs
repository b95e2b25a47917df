//! Handler contract and dispatch: event in, response out.
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cfnerr::HandlerError;
use crate::event::Event;
use crate::progress::{OperationStatus, ProgressEvent};
use crate::request::Request;
use crate::response::Response;

/// Lifecycle operation named by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::List => "LIST",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = HandlerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(Self::Create),
            "READ" => Ok(Self::Read),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            "LIST" => Ok(Self::List),
            other => Err(HandlerError::invalid_request(format!(
                "no action or invalid action specified: {other:?}"
            ))),
        }
    }
}

/// What a lifecycle method returns.
pub type Outcome<M, C> = anyhow::Result<ProgressEvent<M, C>>;

pub type HandlerRequest<H> = Request<<H as Handler>::Model, <H as Handler>::CallbackContext>;
pub type HandlerResult<H> = Outcome<<H as Handler>::Model, <H as Handler>::CallbackContext>;

/// User-supplied resource logic.
///
/// Return a [`HandlerError`] (directly or anywhere in an `anyhow` chain) to
/// report a specific error code; any other error is an `InternalFailure`.
pub trait Handler {
    type Model: Serialize + DeserializeOwned;
    type CallbackContext: Serialize + DeserializeOwned;

    fn create(
        &self,
        request: &Request<Self::Model, Self::CallbackContext>,
    ) -> Outcome<Self::Model, Self::CallbackContext>;
    fn read(
        &self,
        request: &Request<Self::Model, Self::CallbackContext>,
    ) -> Outcome<Self::Model, Self::CallbackContext>;
    fn update(
        &self,
        request: &Request<Self::Model, Self::CallbackContext>,
    ) -> Outcome<Self::Model, Self::CallbackContext>;
    fn delete(
        &self,
        request: &Request<Self::Model, Self::CallbackContext>,
    ) -> Outcome<Self::Model, Self::CallbackContext>;
    fn list(
        &self,
        request: &Request<Self::Model, Self::CallbackContext>,
    ) -> Outcome<Self::Model, Self::CallbackContext>;

    /// Delay applied to `IN_PROGRESS` events that set none.
    fn default_callback_delay(&self) -> Option<Duration> {
        None
    }
}

fn route<H: Handler>(handler: &H, request: &HandlerRequest<H>) -> HandlerResult<H> {
    match request.action {
        Action::Create => handler.create(request),
        Action::Read => handler.read(request),
        Action::Update => handler.update(request),
        Action::Delete => handler.delete(request),
        Action::List => handler.list(request),
    }
}

/// Run one event through `handler`. Failures at any stage come back as a
/// `FAILED` response carrying the event's bearer token.
pub fn dispatch<H: Handler>(handler: &H, event: &Event) -> Response {
    match try_dispatch(handler, event) {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %format!("{err:#}"), action = %event.action, "handler failed");
            Response::failed(&err, &event.bearer_token)
        }
    }
}

/// Decode `bytes` as an event, then [`dispatch`] it.
pub fn dispatch_slice<H: Handler>(handler: &H, bytes: &[u8]) -> Response {
    match Event::from_slice(bytes) {
        Ok(event) => dispatch(handler, &event),
        Err(err) => {
            warn!(error = %err, "undecodable event");
            Response::failed(&anyhow::Error::new(err), "")
        }
    }
}

fn try_dispatch<H: Handler>(handler: &H, event: &Event) -> anyhow::Result<Response> {
    event.validate()?;
    let action: Action = event.action.parse()?;
    let request = HandlerRequest::<H>::from_event(action, event)?;
    debug!(%action, stack = %request.stack_name, "invoking handler");

    let mut progress = match route(handler, &request) {
        Ok(progress) => progress,
        Err(err) => {
            debug!(error = %format!("{err:#}"), "handler returned an error");
            request.failure(&err)
        }
    };
    let needs_delay = progress.operation_status == OperationStatus::InProgress
        && progress.callback_delay_seconds == 0;
    if let Some(delay) = handler.default_callback_delay().filter(|_| needs_delay) {
        progress = progress.with_callback_delay(delay);
    }
    Ok(Response::from_progress(&progress, &event.bearer_token)?)
}
