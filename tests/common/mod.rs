use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::Value;
use tally::server::{cors_layer, router, AppState};
use tally_core::{FixedClock, ForecastOptions, MemorySource};
use tally_domain::CompanySettings;
use tower::ServiceExt;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Router over in-memory records with the clock pinned to `today`.
pub fn test_app(source: MemorySource, today: NaiveDate) -> Router {
    let state = AppState::new(
        Arc::new(source),
        Arc::new(FixedClock(today)),
        ForecastOptions::default(),
        CompanySettings::new("USD", "01"),
    );
    router(state, cors_layer(None).expect("cors"))
}

/// Sends `body` verbatim to `POST /api/forecast`.
pub async fn post_raw(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/forecast")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    send(app, request).await
}

pub async fn post_forecast(app: Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, &body.to_string()).await
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
