//! HTTP intake boundary: one `POST /submit` route feeding the pipeline queue.

// crates.io
use axum::{Router, extract::State, http::StatusCode, routing::post};
use tokio::net::TcpListener;
// self
use crate::{
	pipeline::IntakeHandle,
	reading::Reading,
};

/// Builds the intake router over a pipeline handle.
///
/// The boundary owns all HTTP framing: a payload that does not carry exactly two
/// `;`-delimited fields is rejected with `400` before it ever reaches the queue; a valid
/// payload is enqueued (suspending the request while the queue is full) and acknowledged
/// with `200 OK`.
pub fn router(handle: IntakeHandle) -> Router {
	Router::new().route("/submit", post(submit_reading)).with_state(handle)
}

/// Serves the intake router on an already-bound listener until the server fails.
pub async fn serve(listener: TcpListener, handle: IntakeHandle) -> std::io::Result<()> {
	if let Ok(addr) = listener.local_addr() {
		tracing::info!(%addr, "Intake listening.");
	}

	axum::serve(listener, router(handle)).await
}

async fn submit_reading(
	State(handle): State<IntakeHandle>,
	body: String,
) -> (StatusCode, &'static str) {
	let Ok(reading) = Reading::parse(&body) else {
		return (StatusCode::BAD_REQUEST, "Invalid format\n");
	};

	match handle.enqueue(reading).await {
		Ok(()) => (StatusCode::OK, "OK\n"),
		Err(closed) => {
			tracing::error!(error = %closed, "Reading accepted but the pipeline is gone.");

			(StatusCode::SERVICE_UNAVAILABLE, "Pipeline unavailable\n")
		},
	}
}
