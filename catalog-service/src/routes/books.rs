use crate::error::ApiError;
use crate::models::query::RawParams;
use crate::routes::AppState;
use crate::services::executor::execute;
use crate::services::filter_builder::build_filter;
use crate::services::lookup::lookup;
use crate::services::shaper::shape;
use crate::services::validation::validate;
use crate::storage::FindOptions;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, info};

fn json_response<T: Serialize>(value: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_vec(value).map_err(ApiError::Encoding)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

pub async fn list_books(
    State(state): State<AppState>,
    Query(raw): Query<RawParams>,
) -> Result<Response, ApiError> {
    let params = validate(&raw, state.settings.filter_policy)?;
    info!("Book query: {:?}", params);

    let filter = build_filter(&params);
    let options = FindOptions {
        skip: params.offset,
        limit: params.limit,
        sort_by_id: state.settings.sort_by_id,
    };

    let records = execute(&state.backend, &filter, options, state.settings.response_mode).await?;
    debug!("Query returned {} records", records.len());

    json_response(&shape(records, &params))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<Response, ApiError> {
    info!("Book lookup: {}", book_id);

    let record = lookup(&state.backend, &book_id, state.settings.response_mode).await?;

    json_response(&record)
}

pub async fn missing_book_id() -> ApiError {
    ApiError::MissingId
}

pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
