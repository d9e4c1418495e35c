use super::{DocumentCursor, FindOptions, PageCollector, StorageBackend, StorageError};
use crate::models::filter::FilterExpression;
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde_json::Value;
use std::borrow::Cow;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

const SCAN_BATCH: usize = 256;

/// Documents live as JSON strings under `<collection>:<id>`; the list
/// `<collection>:ids` keeps insertion order. Identifiers in both places must
/// be lowercase hyphenated UUIDs, the same text `find_one` builds its key
/// from. Index entries in any other form are skipped.
pub struct RedisBackend {
    connection: MultiplexedConnection,
    collection: String,
}

impl RedisBackend {
    pub async fn connect(
        redis_url: &str,
        collection: &str,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let client = redis::Client::open(redis_url)?;
        let connection = tokio::time::timeout(timeout, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| StorageError::Timeout(timeout))??;

        Ok(Self {
            connection,
            collection: collection.to_string(),
        })
    }

    fn document_key(&self, id: &str) -> String {
        format!("{}:{}", self.collection, id)
    }

    fn index_key(&self) -> String {
        format!("{}:ids", self.collection)
    }
}

/// Keeps the index entries written in canonical UUID form.
fn canonical_ids(listed: Vec<String>) -> Vec<Uuid> {
    listed
        .into_iter()
        .filter_map(|raw| match Uuid::parse_str(&raw) {
            Ok(id) if id.to_string() == raw => Some(id),
            _ => {
                warn!("Skipping non-canonical index entry {:?}", raw);
                None
            }
        })
        .collect()
}

/// Feeds one MGET batch into the page. Keys whose document is gone are
/// skipped; a stored value that is not JSON fails the scan.
fn collect_batch(
    keys: &[String],
    values: Vec<Option<String>>,
    filter: &FilterExpression,
    collector: &mut PageCollector,
) -> Result<(), StorageError> {
    for (key, value) in keys.iter().zip(values) {
        let Some(raw) = value else {
            debug!("Skipping dangling index entry {}", key);
            continue;
        };
        let doc: Value = serde_json::from_str(&raw)?;
        if filter.matches(&doc) && collector.push(Cow::Owned(doc)) {
            break;
        }
    }
    Ok(())
}

#[async_trait]
impl StorageBackend for RedisBackend {
    async fn ping(&self) -> Result<(), StorageError> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn find(
        &self,
        filter: &FilterExpression,
        options: FindOptions,
    ) -> Result<DocumentCursor, StorageError> {
        let mut conn = self.connection.clone();

        let listed: Vec<String> = conn.lrange(self.index_key(), 0, -1).await?;
        let mut ids = canonical_ids(listed);
        if options.sort_by_id {
            ids.sort();
        }

        let mut collector = PageCollector::new(options);
        for chunk in ids.chunks(SCAN_BATCH) {
            let keys: Vec<String> = chunk
                .iter()
                .map(|id| self.document_key(&id.to_string()))
                .collect();
            let values: Vec<Option<String>> =
                redis::cmd("MGET").arg(&keys).query_async(&mut conn).await?;

            collect_batch(&keys, values, filter, &mut collector)?;
            if collector.is_full() {
                break;
            }
        }
        let page = collector.into_page();

        Ok(stream::iter(page.into_iter().map(Ok)).boxed())
    }

    async fn find_one(&self, id: Uuid) -> Result<Option<Value>, StorageError> {
        let mut conn = self.connection.clone();

        let value: Option<String> = conn.get(self.document_key(&id.to_string())).await?;

        match value {
            Some(json_str) => Ok(Some(serde_json::from_str(&json_str)?)),
            None => Ok(None),
        }
    }
}
