//! CloudFormation resource-provider handler plumbing.
//!
//! An [`Event`] is decoded into a typed [`Request`], routed to a [`Handler`],
//! and the returned [`ProgressEvent`] is turned into a wire [`Response`].
//! Resource models cross the wire with every scalar as a string; the
//! [`encoding`] module converts in both directions.
pub mod cfnerr;
pub mod encoding;
pub mod error;
pub mod event;
pub mod handler;
pub mod path_de;
pub mod progress;
pub mod request;
pub mod response;

pub use cfnerr::{HandlerError, HandlerErrorCode};
pub use encoding::{StrValue, stringify, unstringify};
pub use event::{Event, Tags};
pub use handler::{Action, Handler, dispatch, dispatch_slice};
pub use progress::{OperationStatus, ProgressEvent};
pub use request::Request;
pub use response::Response;
