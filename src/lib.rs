//! A single-endpoint ingestion relay.
//!
//! Submissions arrive on `POST /input` as flat JSON objects, are reshaped
//! into a fixed event schema and forwarded to one configured webhook.
//!
//! ## Guarantees
//! - Bounded queue; a full queue blocks the submitter instead of dropping
//! - Events are forwarded in the order they were accepted
//! - A malformed submission never stops the worker
//! - Every outbound POST is bounded by a timeout
//!
//! ## Non-Guarantees
//! - Delivery: one best-effort attempt, no retry, no dead-letter queue
//! - Feedback: the `200` reply only means "queued". Conversion and
//!   delivery failures are logged on the worker and never reach the caller
//! - Durability across restarts

mod config;
mod converter;
mod dispatcher;
mod error;
mod extractor;
mod forwarder;
mod server;
mod signing;
mod types;
mod worker;

pub use config::{RelayConfig, CONFIG_PATH_ENV};
pub use converter::convert;
pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use error::{ConfigError, DispatchError, FailureReason, ProcessingOutcome, SchemaError};
pub use extractor::{extract_attributes, extract_details, extract_user_traits};
pub use forwarder::{EventSink, InMemorySink, WebhookForwarder};
pub use server::{create_router, serve, ACCEPTED_BODY, SHUTTING_DOWN_BODY};
pub use signing::{
    compute_signature,
    verify_signature,
    verify_relay_request,
    SignatureHeaders,
    Signer,
    VerificationError,
    SIGNATURE_HEADER,
    TIMESTAMP_HEADER,
};
pub use types::{AttributeDetail, AttributeSet, CanonicalEvent, DispatchStats, RawPayload, TripletScheme};
