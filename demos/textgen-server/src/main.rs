//! HTTP adapter in front of the robata dispatch engine.
//!
//! Thin by design: parse the submission, build a tagged request, submit it,
//! await the rendezvous, and translate the outcome into a status code. All
//! concurrency, ordering, and failure semantics live in the library.

mod model;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use robata::config::{DEFAULT_BATCH_SIZE, DEFAULT_DENYLIST};
use robata::error::{SubmitError, WaitError};
use robata::generation::{GenerationBatchInference, GenerationBatcher, GenerationRequest};

use crate::model::ToyModel;

/// Upper bound on how long a request handler waits for its job's result.
const RESULT_TIMEOUT: Duration = Duration::from_secs(120);

type Engine = GenerationBatchInference<DEFAULT_BATCH_SIZE>;

#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
}

#[derive(Deserialize)]
struct GenerateForm {
    text: String,
    num_samples: usize,
    length: Option<usize>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let port: u16 = std::env::var("TEXTGEN_PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(8080);

    let engine = Arc::new(Engine::new(ToyModel::new(), DEFAULT_DENYLIST.to_vec()));
    let state = AppState { engine };

    let app = Router::new()
        .route("/", get(health))
        .route("/healthz", get(health))
        .route("/generate/{variant}", post(generate))
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    info!(%addr, "textgen server listening");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("binds the listen address");
    axum::serve(listener, app).await.expect("server runs");
}

/// Liveness only: reports the process is up, not that the dispatcher is.
async fn health() -> &'static str {
    "ok"
}

async fn generate(
    State(state): State<AppState>,
    Path(variant): Path<String>,
    Form(form): Form<GenerateForm>,
) -> Response {
    let request = match build_request(&variant, form) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let item = match state.engine.submit(request).await {
        Ok(item) => item,
        Err(SubmitError::TooManyRequests { queued }) => {
            warn!(queued, "admission rejected a submission");
            return message(StatusCode::TOO_MANY_REQUESTS, "too many requests");
        }
    };

    match item.wait_timeout(RESULT_TIMEOUT).await {
        Ok(Ok(samples)) => Json(samples).into_response(),
        Ok(Err(_failed)) => message(
            StatusCode::INTERNAL_SERVER_ERROR,
            "an unknown error occurred on the server",
        ),
        Err(WaitError::TimedOut) => message(
            StatusCode::INTERNAL_SERVER_ERROR,
            "timed out awaiting the generation result",
        ),
        Err(WaitError::WorkerGone) => message(
            StatusCode::INTERNAL_SERVER_ERROR,
            "the worker dropped the request",
        ),
    }
}

/// Maps the URL variant and form fields onto a typed request. Malformed
/// submissions are rejected here and never reach the queue.
fn build_request(variant: &str, form: GenerateForm) -> Result<GenerationRequest, Response> {
    match variant {
        "short" => Ok(GenerationRequest::Short {
            prompt: form.text,
            num_samples: form.num_samples,
        }),
        "long" => {
            let length = form
                .length
                .ok_or_else(|| message(StatusCode::BAD_REQUEST, "missing length field"))?;
            Ok(GenerationRequest::Long {
                prompt: form.text,
                num_samples: form.num_samples,
                length,
            })
        }
        _ => Err(message(
            StatusCode::BAD_REQUEST,
            "cannot route variant; expected short or long",
        )),
    }
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(length: Option<usize>) -> GenerateForm {
        GenerateForm {
            text: "hello".to_string(),
            num_samples: 1,
            length,
        }
    }

    #[test]
    fn short_submissions_map_to_the_short_variant() {
        let request = build_request("short", form(None)).expect("routes");
        assert!(matches!(request, GenerationRequest::Short { .. }));
    }

    #[test]
    fn long_submissions_require_a_length() {
        let request = build_request("long", form(Some(20))).expect("routes");
        assert!(matches!(request, GenerationRequest::Long { length: 20, .. }));

        let rejected = build_request("long", form(None)).expect_err("missing length");
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_variants_are_rejected() {
        let rejected = build_request("medium", form(None)).expect_err("unroutable");
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    }
}
