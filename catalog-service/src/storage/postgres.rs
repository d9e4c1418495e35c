use super::{DocumentCursor, FindOptions, StorageBackend, StorageError};
use crate::models::filter::{FilterExpression, Predicate};
use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

/// Rows buffered between the query task and the request handler.
const CURSOR_BUFFER: usize = 64;

/// Expects a table shaped as:
///
/// ```sql
/// CREATE TABLE books (
///     id UUID PRIMARY KEY,
///     title TEXT NOT NULL,
///     authors JSONB NOT NULL DEFAULT '[]',
///     isbn TEXT NOT NULL,
///     publication_year INTEGER NOT NULL,
///     image_url TEXT
/// );
/// CREATE INDEX books_title_fts ON books USING GIN (to_tsvector('simple', title));
/// ```
pub struct PostgresBackend {
    pool: PgPool,
    collection: String,
}

impl PostgresBackend {
    pub async fn connect(
        database_url: &str,
        collection: &str,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let pool = tokio::time::timeout(
            timeout,
            PgPoolOptions::new()
                .acquire_timeout(timeout)
                .connect(database_url),
        )
        .await
        .map_err(|_| StorageError::Timeout(timeout))??;

        Ok(Self {
            pool,
            collection: collection.to_string(),
        })
    }
}

/// Builds the document query for a filter. `collection` must already be a
/// validated SQL identifier.
pub(crate) fn select_documents(
    collection: &str,
    filter: &FilterExpression,
    options: FindOptions,
) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!(
        "SELECT row_to_json(b)::jsonb AS doc FROM {} b WHERE TRUE",
        collection
    ));

    for predicate in filter.predicates() {
        query.push(" AND ");
        match predicate {
            Predicate::TextSearch(phrase) => {
                query.push("to_tsvector('simple', b.title) @@ phraseto_tsquery('simple', ");
                query.push_bind(phrase.clone());
                query.push(")");
            }
            Predicate::PublishedAfter(year) => {
                query.push("b.publication_year >= ");
                query.push_bind(*year);
            }
            Predicate::PublishedBefore(year) => {
                query.push("b.publication_year <= ");
                query.push_bind(*year);
            }
            Predicate::AuthorsAnyOf(ids) => {
                query.push(
                    "EXISTS (SELECT 1 FROM jsonb_array_elements(b.authors) AS a \
                     WHERE a->>'author_id' = ANY(",
                );
                query.push_bind(ids.clone());
                query.push("))");
            }
        }
    }

    if options.sort_by_id {
        query.push(" ORDER BY b.id");
    }

    query.push(" OFFSET ");
    query.push_bind(i64::try_from(options.skip).unwrap_or(i64::MAX));
    query.push(" LIMIT ");
    query.push_bind(i64::try_from(options.limit).unwrap_or(i64::MAX));

    query
}

#[async_trait]
impl StorageBackend for PostgresBackend {
    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn find(
        &self,
        filter: &FilterExpression,
        options: FindOptions,
    ) -> Result<DocumentCursor, StorageError> {
        let (tx, rx) = mpsc::channel(CURSOR_BUFFER);
        let pool = self.pool.clone();
        let mut query = select_documents(&self.collection, filter, options);

        // The task stops as soon as the receiving cursor is dropped.
        tokio::spawn(async move {
            let mut rows = query.build().fetch(&pool);
            while let Some(row) = rows.next().await {
                let item = row
                    .and_then(|row| row.try_get::<Value, _>("doc"))
                    .map_err(StorageError::from);
                let failed = item.is_err();
                if tx.send(item).await.is_err() || failed {
                    break;
                }
            }
        });

        Ok(ReceiverStream::new(rx).boxed())
    }

    async fn find_one(&self, id: Uuid) -> Result<Option<Value>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT row_to_json(b)::jsonb AS doc FROM {} b WHERE b.id = $1",
            self.collection
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row.try_get::<Value, _>("doc")?)),
            None => Ok(None),
        }
    }
}
