use crate::error::ApiError;
use crate::models::responses::{Record, ResponseMode};
use crate::storage::Backend;
use uuid::Uuid;

pub fn parse_book_id(raw: &str) -> Result<Uuid, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::MissingId);
    }
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId)
}

/// Fetches a single record by its identifier.
pub async fn lookup(backend: &Backend, raw_id: &str, mode: ResponseMode) -> Result<Record, ApiError> {
    let id = parse_book_id(raw_id)?;

    let doc = backend.find_one(id).await?.ok_or(ApiError::NotFound)?;

    Record::decode(doc, mode).map_err(ApiError::Decode)
}
