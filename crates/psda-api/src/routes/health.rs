//! Liveness and echo endpoints.

use axum::{extract::Query, Json};

use crate::dto::{EchoMessage, HealthResponse};

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn echo_get(query: Option<Query<EchoMessage>>) -> Json<EchoMessage> {
    let message = query.and_then(|Query(q)| q.message);
    echo(message)
}

pub async fn echo_post(body: Option<Json<EchoMessage>>) -> Json<EchoMessage> {
    let message = body.and_then(|Json(b)| b.message);
    echo(message)
}

fn echo(message: Option<String>) -> Json<EchoMessage> {
    Json(EchoMessage {
        message: Some(message.unwrap_or_default()),
    })
}
