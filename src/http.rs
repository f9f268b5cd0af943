//! HTTP surface
//!
//! `GET /api/fraud/query?key=..&timeframe=..&subject=..`
//!
//! - 200 with the responder's body on success
//! - 400 with no body when `key` or `subject` is missing
//! - 502 with the canonical error body for every other failure

use crate::codec::Codec;
use crate::gateway::{FraudQueryGateway, QueryOutcome};
use crate::query_bus::RequestReply;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

/// Query string of the lookup endpoint
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    pub key: Option<String>,
    pub timeframe: Option<String>,
    pub subject: Option<String>,
}

/// Build the gateway router
pub fn router<B, C>(gateway: Arc<FraudQueryGateway<B, C>>) -> Router
where
    B: RequestReply + 'static,
    C: Codec + 'static,
{
    Router::new()
        .route("/livez", get(livez))
        .route("/api/fraud/query", get(query::<B, C>))
        .with_state(gateway)
}

async fn livez() -> StatusCode {
    StatusCode::OK
}

async fn query<B, C>(
    State(gateway): State<Arc<FraudQueryGateway<B, C>>>,
    Query(params): Query<QueryParams>,
) -> Response
where
    B: RequestReply + 'static,
    C: Codec + 'static,
{
    let outcome = gateway
        .query(
            params.key.as_deref(),
            params.timeframe.as_deref(),
            params.subject.as_deref(),
        )
        .await;

    into_response(outcome)
}

fn into_response(outcome: QueryOutcome) -> Response {
    match outcome {
        QueryOutcome::Found(response) => (StatusCode::OK, Json(response)).into_response(),
        QueryOutcome::Rejected(_) => StatusCode::BAD_REQUEST.into_response(),
        QueryOutcome::Failed(response) => (StatusCode::BAD_GATEWAY, Json(response)).into_response(),
    }
}
