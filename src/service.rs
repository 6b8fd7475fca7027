//! HTTP boundary: parses request parameters into a filter, calls the engine,
//! and serializes the result. No ranking or validation logic lives here.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;

use crate::data::model::Listing;
use crate::error::QueryError;
use crate::query::engine::QueryEngine;
use crate::query::filter::RecommendParams;

/// Shared, read-only state handed to every request.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pub engine: QueryEngine,
    pub default_budget: f64,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A rejected request; always a 400 with an [`ErrorBody`].
#[derive(Debug)]
pub enum ApiError {
    /// The query string parsed but a parameter value is invalid.
    Parameter(QueryError),
    /// The query string itself could not be deserialized.
    QueryString(QueryRejection),
}

impl ApiError {
    fn message(&self) -> String {
        match self {
            ApiError::Parameter(e) => e.to_string(),
            ApiError::QueryString(rejection) => rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.message();
        log::warn!("Rejected request: {error}");
        (StatusCode::BAD_REQUEST, Json(ErrorBody { error })).into_response()
    }
}

pub fn router(ctx: Arc<ServiceContext>) -> Router {
    Router::new()
        .route("/", get(handle_home))
        .route("/recommend", get(handle_recommend))
        .layer(Extension(ctx))
}

pub async fn handle_home() -> Html<&'static str> {
    Html("<h1>Car Recommender API is live</h1><p>Use /recommend?budget=5000</p>")
}

pub async fn handle_recommend(
    query: Result<Query<RecommendParams>, QueryRejection>,
    Extension(ctx): Extension<Arc<ServiceContext>>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let Query(params) = query.map_err(ApiError::QueryString)?;
    log::debug!("recommend {params:?}");
    let spec = params
        .into_filter(ctx.default_budget)
        .map_err(ApiError::Parameter)?;
    Ok(Json(ctx.engine.recommend(&spec)))
}
