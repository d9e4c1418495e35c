use crate::error::ApiError;
use crate::models::filter::FilterExpression;
use crate::models::responses::{Record, ResponseMode};
use crate::storage::{Backend, FindOptions};
use futures_util::StreamExt;
use tracing::error;

/// Runs a filter against the backend and decodes the page one document at
/// a time. The first failure aborts the whole page.
pub async fn execute(
    backend: &Backend,
    filter: &FilterExpression,
    options: FindOptions,
    mode: ResponseMode,
) -> Result<Vec<Record>, ApiError> {
    let mut cursor = backend.find(filter, options).await?;

    let mut records = Vec::new();
    while let Some(doc) = cursor.next().await {
        let record = Record::decode(doc?, mode).map_err(|e| {
            error!("Failed to decode document at position {}: {}", records.len(), e);
            ApiError::Decode(e)
        })?;
        records.push(record);
    }

    Ok(records)
}
