//! HTTP boundary.
//!
//! - POST /input - accept a submission and queue it for forwarding
//!
//! Any other method on `/input` gets 405 with an empty body.

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::dispatcher::Dispatcher;
use crate::types::RawPayload;

pub const ACCEPTED_BODY: &str = "Received form data successfully";
pub const SHUTTING_DOWN_BODY: &str = "Relay is shutting down";

/// POST /input
///
/// Responds once the payload is queued. The response never reflects
/// conversion or delivery, which happen later on the worker.
async fn receive_input(
    State(dispatcher): State<Arc<Dispatcher>>,
    body: Bytes,
) -> impl IntoResponse {
    let payload = match decode_payload(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "rejecting undecodable submission");
            return (StatusCode::BAD_REQUEST, format!("Error decoding JSON: {}", err));
        }
    };

    match dispatcher.submit(payload).await {
        Ok(()) => (StatusCode::OK, ACCEPTED_BODY.to_string()),
        Err(err) => {
            warn!(error = %err, "rejecting submission");
            (StatusCode::SERVICE_UNAVAILABLE, SHUTTING_DOWN_BODY.to_string())
        }
    }
}

/// Decode the first JSON value in `body`.
///
/// Anything after that value is ignored, so trailing data or a second
/// newline-delimited object does not fail the request.
fn decode_payload(body: &[u8]) -> Result<RawPayload, serde_json::Error> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    RawPayload::deserialize(&mut deserializer)
}

/// Create the relay router
pub fn create_router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/input", post(receive_input))
        .with_state(dispatcher)
}

/// Serve the relay on `listener` until `shutdown` resolves.
///
/// In-flight requests finish before this returns. Draining the dispatch
/// queue is left to the caller.
pub async fn serve<F>(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("relay listening on {}", addr);
    }

    axum::serve(listener, create_router(dispatcher))
        .with_graceful_shutdown(shutdown)
        .await
}
