use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::ingredient::Ingredient;
use crate::parser::{IngredientParser, ParseError};

#[derive(Clone)]
pub struct AppState {
    pub parser: Arc<IngredientParser>,
}

#[derive(Deserialize)]
pub struct IngredientsRequest {
    pub ingredients: String,
}

#[derive(Serialize)]
pub struct ParseResponse {
    ingredients: Vec<Ingredient>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/parse", post(parse))
        .route("/v1/encode", post(encode))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn parse(
    State(state): State<AppState>,
    Json(request): Json<IngredientsRequest>,
) -> Result<Json<ParseResponse>, ApiError> {
    if request.ingredients.trim().is_empty() {
        return Err(ApiError::bad_request("ingredients is required"));
    }

    let parser = Arc::clone(&state.parser);
    let ingredients = tokio::task::spawn_blocking(move || parser.parse(&request.ingredients))
        .await
        .map_err(|err| {
            error!("parse task failed: {err}");
            ApiError::Internal
        })??;

    Ok(Json(ParseResponse { ingredients }))
}

async fn encode(
    State(state): State<AppState>,
    Json(request): Json<IngredientsRequest>,
) -> Response {
    let table = state.parser.encode(&request.ingredients);
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )],
        table,
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("parser is not configured")]
    NotConfigured,
    #[error("{0}")]
    Tagger(String),
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::NotConfigured => ApiError::NotConfigured,
            other => {
                warn!("tagging failed: {other}");
                ApiError::Tagger(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Tagger(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal => {
                let body = Json(json!({ "error": "internal server error" }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
