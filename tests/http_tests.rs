//! HTTP routing tests for the fraud query endpoint

use async_nats::HeaderMap;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bytes::Bytes;
use fraud_query_gateway::{
    http, FraudQueryGateway, QueryRequest, QueryResponse, Reply, RequestReply, Result,
};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Answers every key except `unknown`
struct LookupBus;

#[async_trait]
impl RequestReply for LookupBus {
    async fn request(
        &self,
        _topic: &str,
        _headers: HeaderMap,
        payload: Bytes,
        _timeout: Duration,
    ) -> Result<Option<Reply>> {
        let request: QueryRequest = serde_json::from_slice(&payload).unwrap();
        if request.key == "unknown" {
            return Ok(None);
        }
        let response = QueryResponse {
            key: request.key,
            timeframe: request.timeframe,
            correlation_id: Some("resp-1".to_string()),
            ..QueryResponse::default()
        };
        Ok(Some(Reply {
            headers: None,
            payload: Bytes::from(serde_json::to_vec(&response).unwrap()),
        }))
    }
}

fn app() -> axum::Router {
    let gateway = FraudQueryGateway::new(LookupBus, "fraud.query", Duration::from_millis(500));
    http::router(Arc::new(gateway))
}

async fn get(uri: &str) -> (StatusCode, Bytes) {
    let response = app()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

#[tokio::test]
async fn test_query_ok() {
    let (status, body) = get("/api/fraud/query?key=4111&timeframe=2%20days&subject=card").await;
    assert_eq!(status, StatusCode::OK);

    let response: QueryResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.key, "4111");
    assert_eq!(response.timeframe, 172_800_000);
    assert_eq!(response.correlation_id.as_deref(), Some("resp-1"));
}

#[tokio::test]
async fn test_query_missing_subject_is_bad_request() {
    let (status, body) = get("/api/fraud/query?key=4111&timeframe=2%20days").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_query_unknown_key_is_bad_gateway() {
    let (status, body) = get("/api/fraud/query?key=unknown&timeframe=1%20hour&subject=card").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["key"], "ERROR");
    assert_eq!(json["timeframe"], 0);
    assert_eq!(json["records"]["error: The key 'unknown' was not found."]["count"], 0);
    assert!(json.get("correlationId").is_none());
}

#[tokio::test]
async fn test_livez() {
    let (status, _) = get("/livez").await;
    assert_eq!(status, StatusCode::OK);
}
