//! Replay stub of the mathjs HTTP API.
//!
//! Serves `GET /?expr=..&precision=..` and `POST /` from recorded exchanges
//! so the conformance suite can run without network access.

pub mod recordings;

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{debug, info};

pub use recordings::{Outcome, Recordings};

#[derive(Debug, Deserialize)]
pub struct EvalQuery {
    pub expr: Option<String>,
    pub precision: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EvalBody {
    pub expr: Vec<String>,
    #[serde(default)]
    pub precision: Option<serde_json::Value>,
}

/// Reply body for `POST /`. Field order matches the live service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalReply {
    pub result: Option<Vec<String>>,
    pub error: Option<String>,
}

impl EvalReply {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(error.into()),
        }
    }
}

pub type Db = Arc<Recordings>;

/// Router over the embedded recordings.
pub fn app() -> Result<Router, serde_json::Error> {
    Ok(router(Recordings::embedded()?))
}

pub fn router(recordings: Recordings) -> Router {
    let db: Db = Arc::new(recordings);
    Router::new()
        .route("/", get(evaluate_get).post(evaluate_post))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    let app = app().map_err(std::io::Error::other)?;
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mathjs replay stub listening");
    }
    axum::serve(listener, app).await
}

async fn evaluate_get(State(db): State<Db>, Query(query): Query<EvalQuery>) -> (StatusCode, String) {
    let Some(expr) = query.expr else {
        return (StatusCode::BAD_REQUEST, "Error: Required parameter \"expr\" missing in url.".to_string());
    };
    let precision = query.precision.as_deref().and_then(recordings::precision_from_text);
    debug!(%expr, ?precision, "GET evaluate");
    match db.lookup(&expr, precision) {
        Outcome::Value(value) => (StatusCode::OK, value),
        Outcome::Error(message) => (StatusCode::BAD_REQUEST, format!("Error: {message}")),
    }
}

/// The body is decoded as JSON whatever `Content-Type` says, like the live
/// service does.
async fn evaluate_post(State(db): State<Db>, body: Bytes) -> (StatusCode, Json<EvalReply>) {
    let input: EvalBody = match serde_json::from_slice(&body) {
        Ok(input) => input,
        Err(e) => {
            debug!(error = %e, "rejecting POST body");
            return (StatusCode::BAD_REQUEST, Json(EvalReply::failed(format!("Invalid request: {e}"))));
        }
    };
    let precision = input.precision.as_ref().and_then(recordings::precision_from_json);
    debug!(exprs = input.expr.len(), ?precision, "POST evaluate");

    let mut result = Vec::with_capacity(input.expr.len());
    for expr in &input.expr {
        match db.lookup(expr, precision) {
            Outcome::Value(value) => result.push(value),
            Outcome::Error(message) => {
                return (StatusCode::BAD_REQUEST, Json(EvalReply::failed(message)));
            }
        }
    }
    (
        StatusCode::OK,
        Json(EvalReply {
            result: Some(result),
            error: None,
        }),
    )
}
