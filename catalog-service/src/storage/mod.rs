use crate::models::filter::FilterExpression;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod postgres;
mod redis;

pub use self::memory::MemoryBackend;
pub use self::postgres::PostgresBackend;
pub use self::redis::RedisBackend;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Stream of raw stored documents for one query.
///
/// Dropping the cursor releases whatever the backend holds for it.
pub type DocumentCursor = BoxStream<'static, Result<Value, StorageError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    pub skip: u64,
    pub limit: u64,
    pub sort_by_id: bool,
}

#[async_trait]
pub trait StorageBackend {
    async fn ping(&self) -> Result<(), StorageError>;
    async fn find(
        &self,
        filter: &FilterExpression,
        options: FindOptions,
    ) -> Result<DocumentCursor, StorageError>;
    async fn find_one(&self, id: Uuid) -> Result<Option<Value>, StorageError>;
}

pub type Backend = Arc<dyn StorageBackend + Send + Sync>;

/// Reads the identifier of a stored document, under either `id` or `_id`.
/// `id` wins when both are present, as in `Book::from_document`.
pub fn document_id(doc: &Value) -> Option<Uuid> {
    doc.get("id")
        .or_else(|| doc.get("_id"))
        .and_then(Value::as_str)
        .and_then(|raw| Uuid::parse_str(raw).ok())
}

/// Accumulates one page from a stream of documents that already passed the
/// filter: drops the first `skip`, keeps at most `limit`.
pub(crate) struct PageCollector {
    to_skip: u64,
    limit: usize,
    page: Vec<Value>,
}

impl PageCollector {
    pub(crate) fn new(options: FindOptions) -> Self {
        Self {
            to_skip: options.skip,
            limit: usize::try_from(options.limit).unwrap_or(usize::MAX),
            page: Vec::new(),
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.page.len() >= self.limit
    }

    /// Offers a matching document; it is only copied when it lands in the
    /// page. Returns true once the page is full.
    pub(crate) fn push(&mut self, doc: Cow<'_, Value>) -> bool {
        if self.is_full() {
            return true;
        }
        if self.to_skip > 0 {
            self.to_skip -= 1;
            return false;
        }
        self.page.push(doc.into_owned());
        self.is_full()
    }

    pub(crate) fn into_page(self) -> Vec<Value> {
        self.page
    }
}

/// Applies filter, ordering and pagination to documents held in process.
pub(crate) fn select_in_process<'a, I>(
    docs: I,
    filter: &FilterExpression,
    options: FindOptions,
) -> Vec<Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut collector = PageCollector::new(options);
    let matching = docs.into_iter().filter(|doc| filter.matches(doc));

    if options.sort_by_id {
        let mut matched: Vec<&Value> = matching.collect();
        matched.sort_by_key(|doc| document_id(doc));
        for doc in matched {
            if collector.push(Cow::Borrowed(doc)) {
                break;
            }
        }
    } else {
        for doc in matching {
            if collector.push(Cow::Borrowed(doc)) {
                break;
            }
        }
    }

    collector.into_page()
}
