//! Middleware behaviour against a real axum router.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use http::{Method, Request, StatusCode};
use lantern_http::{RequestFailure, RequestLoggingLayer};
use lantern_logging::{
    LoggerOptions, LoggerSetting, Logging, RouteConfig, current_request_id, current_request_log,
};
use lantern_test_support::CaptureSink;
use serde_json::json;
use tower::ServiceExt;

fn registry(sink: Arc<CaptureSink>) -> (Arc<Logging>, lantern_logging::RouteId) {
    let mut builder = Logging::builder(LoggerSetting::Options(LoggerOptions {
        sink: Some(sink),
        ..LoggerOptions::default()
    }));
    let root = builder.root();
    let route = builder.route(root, Method::GET, "/items", RouteConfig::default());
    (
        Arc::new(builder.build().expect("registry builds")),
        route,
    )
}

async fn ok_handler() -> &'static str {
    // The request-scoped logger, not the root logger, is what handlers see.
    let log = current_request_log().expect("inside request scope");
    log.info("from handler", &[("step", json!("work"))]);
    assert!(current_request_id().is_some());
    "ok"
}

async fn failing_handler() -> Response {
    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    response.extensions_mut().insert(RequestFailure::unhandled("boom"));
    response
}

async fn handled_handler() -> Response {
    let mut response = (StatusCode::SERVICE_UNAVAILABLE, "degraded").into_response();
    response
        .extensions_mut()
        .insert(RequestFailure::handled("degraded"));
    response
}

#[tokio::test]
async fn successful_request_logs_start_handler_and_completion() -> anyhow::Result<()> {
    let sink = CaptureSink::shared();
    let (logging, route) = registry(sink.clone());
    let app = Router::new()
        .route("/items", get(ok_handler))
        .route_layer(RequestLoggingLayer::new(logging, route));

    let response = app
        .oneshot(Request::builder().uri("/items").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let records = sink.records();
    assert_eq!(
        sink.messages(),
        vec![
            "incoming request".to_string(),
            "from handler".to_string(),
            "request completed".to_string()
        ]
    );
    assert_eq!(records[0]["req"]["method"], json!("GET"));
    assert_eq!(records[0]["req"]["url"], json!("/items"));
    assert_eq!(records[2]["res"]["statusCode"], json!(200));

    // Every record carries the same correlation id, echoed on the response.
    let id = records[0]["reqId"].as_str().expect("reqId").to_string();
    assert!(records.iter().all(|record| record["reqId"] == json!(id)));
    let echoed = response
        .headers()
        .get("request-id")
        .and_then(|value| value.to_str().ok());
    assert_eq!(echoed, Some(id.as_str()));
    Ok(())
}

#[tokio::test]
async fn inbound_header_id_is_reused_and_echoed() -> anyhow::Result<()> {
    let sink = CaptureSink::shared();
    let (logging, route) = registry(sink.clone());
    let app = Router::new()
        .route("/items", get(ok_handler))
        .route_layer(RequestLoggingLayer::new(logging, route));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/items")
                .header("request-id", "42")
                .body(Body::empty())?,
        )
        .await?;

    assert!(sink
        .records()
        .iter()
        .all(|record| record["reqId"] == json!("42")));
    let echoed = response
        .headers()
        .get("request-id")
        .and_then(|value| value.to_str().ok());
    assert_eq!(echoed, Some("42"));
    Ok(())
}

#[tokio::test]
async fn unhandled_failure_produces_error_records() -> anyhow::Result<()> {
    let sink = CaptureSink::shared();
    let (logging, route) = registry(sink.clone());
    let app = Router::new()
        .route("/items", get(failing_handler))
        .route_layer(RequestLoggingLayer::new(logging, route));

    let response = app
        .oneshot(Request::builder().uri("/items").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(
        sink.messages(),
        vec![
            "incoming request".to_string(),
            "boom".to_string(),
            "request completed".to_string()
        ]
    );
    assert_eq!(
        sink.levels(),
        vec!["info".to_string(), "error".to_string(), "error".to_string()]
    );
    assert_eq!(sink.records()[2]["res"]["statusCode"], json!(500));
    Ok(())
}

#[tokio::test]
async fn handled_failure_adds_no_error_record() -> anyhow::Result<()> {
    let sink = CaptureSink::shared();
    let (logging, route) = registry(sink.clone());
    let app = Router::new()
        .route("/items", get(handled_handler))
        .route_layer(RequestLoggingLayer::new(logging, route));

    let _response = app
        .oneshot(Request::builder().uri("/items").body(Body::empty())?)
        .await?;

    assert_eq!(
        sink.messages(),
        vec![
            "incoming request".to_string(),
            "request completed".to_string()
        ]
    );
    assert!(sink.levels().iter().all(|level| level != "error"));
    Ok(())
}
