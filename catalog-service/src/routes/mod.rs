use crate::config::QuerySettings;
use crate::storage::Backend;
use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub mod books;
pub mod health;

use books::{get_book, list_books, missing_book_id, preflight};
use health::health_check;

#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    pub settings: QuerySettings,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(health_check))
        .route("/api/books", get(list_books).options(preflight))
        .route("/api/books/", get(missing_book_id).options(preflight))
        .route("/api/books/:id", get(get_book).options(preflight))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ))
        .with_state(state)
}
