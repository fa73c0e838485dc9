//! HTTP request handlers

use super::AppState;
use super::twiml;
use crate::domain::review::{DeliveryStatusUpdate, ReviewRecord};
use axum::{
    Form, Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Inbound messages from the messaging provider
        .route("/webhook", post(receive_message))
        // Delivery receipts
        .route("/twilio-status-callback", post(receive_status))
        // Dashboard listing
        .route("/api/reviews", get(list_reviews))
        .with_state(state)
}

/// Form fields of an inbound-message webhook. Other provider fields are ignored.
#[derive(Debug, Deserialize)]
struct InboundForm {
    #[serde(rename = "From")]
    from: String,
    #[serde(rename = "Body")]
    body: String,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
}

async fn receive_message(
    State(state): State<AppState>,
    Form(form): Form<InboundForm>,
) -> Result<Response, AppError> {
    let reply = state
        .engine
        .handle_message(&form.from, &form.body)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, twiml::CONTENT_TYPE)],
        twiml::message_response(&reply.text),
    )
        .into_response())
}

async fn receive_status(
    State(state): State<AppState>,
    Form(update): Form<DeliveryStatusUpdate>,
) -> Result<Json<StatusResponse>, AppError> {
    state
        .relay
        .apply(&update)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(StatusResponse { status: "updated" }))
}

async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<ReviewRecord>>, AppError> {
    let reviews = state
        .reviews
        .list()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(reviews))
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
enum AppError {
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        tracing::error!(%status, error = %message, "Request failed");

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
