use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use thiserror::Error;

/// One row of the grouped size query: a queue name and its item count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSizeRow {
    pub queue_name: String,
    pub num_items: u64,
}

#[derive(Debug, Error)]
pub enum SizeSourceError {
    #[error("queue size query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Counting query over the persisted queue records, grouped by queue name.
///
/// Errors propagate to the caller untouched; retries, if any, belong to the
/// invoking scheduler.
#[async_trait]
pub trait QueueSizeSource: Send + Sync {
    async fn fetch_counts(
        &self,
        queue_name: Option<&str>,
    ) -> Result<Vec<QueueSizeRow>, SizeSourceError>;
}

/// Counts queue items in the sqlite `queue` table.
#[derive(Clone)]
pub struct SqliteQueueSizeSource {
    pool: SqlitePool,
}

impl SqliteQueueSizeSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueSizeSource for SqliteQueueSizeSource {
    async fn fetch_counts(
        &self,
        queue_name: Option<&str>,
    ) -> Result<Vec<QueueSizeRow>, SizeSourceError> {
        let rows: Vec<(String, i64)> = match queue_name {
            Some(name) => {
                sqlx::query_as(
                    r#"SELECT name, COUNT(item_id) FROM queue WHERE name = ?1 GROUP BY name"#,
                )
                .bind(name)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(r#"SELECT name, COUNT(item_id) FROM queue GROUP BY name"#)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows
            .into_iter()
            .map(|(queue_name, num_items)| QueueSizeRow {
                queue_name,
                num_items: num_items.max(0) as u64,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_pool;

    async fn seeded_pool(dir: &tempfile::TempDir, rows: &[&str]) -> SqlitePool {
        let pool = init_pool(&dir.path().join("queue.db")).await.unwrap();
        for name in rows {
            sqlx::query("INSERT INTO queue (name, payload) VALUES (?1, 'x')")
                .bind(name)
                .execute(&pool)
                .await
                .unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn groups_counts_by_queue_name() {
        let dir = tempfile::tempdir().unwrap();
        let pool = seeded_pool(&dir, &["mail", "mail", "orders"]).await;
        let source = SqliteQueueSizeSource::new(pool);

        let mut rows = source.fetch_counts(None).await.unwrap();
        rows.sort_by(|a, b| a.queue_name.cmp(&b.queue_name));
        assert_eq!(
            rows,
            vec![
                QueueSizeRow {
                    queue_name: "mail".to_string(),
                    num_items: 2
                },
                QueueSizeRow {
                    queue_name: "orders".to_string(),
                    num_items: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn filters_to_a_single_queue() {
        let dir = tempfile::tempdir().unwrap();
        let pool = seeded_pool(&dir, &["mail", "orders"]).await;
        let source = SqliteQueueSizeSource::new(pool);

        let rows = source.fetch_counts(Some("orders")).await.unwrap();
        assert_eq!(
            rows,
            vec![QueueSizeRow {
                queue_name: "orders".to_string(),
                num_items: 1
            }]
        );

        let rows = source.fetch_counts(Some("missing")).await.unwrap();
        assert!(rows.is_empty());
    }
}
