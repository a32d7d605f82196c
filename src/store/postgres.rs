//! Postgres Store
//!
//! [`StatsStore`] backed by the platform's PostgreSQL database.
//! Every query is read-only and bounded by `query_timeout`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{EntityKind, Role, UserOverview};
use crate::stats::ranking::RankedKey;

use super::{ReferenceRow, ReferenceTable, StatsStore, StoreError, StoreResult, UsageTable};

/// Postgres-backed statistics store
#[derive(Debug, Clone)]
pub struct PgStatsStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgStatsStore {
    /// Create a new PgStatsStore
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Run a query, mapping an elapsed timeout to [`StoreError::Timeout`]
    async fn timed<T, F>(&self, operation: &'static str, query: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => {
                tracing::warn!(
                    operation = operation,
                    timeout_ms = %self.query_timeout.as_millis(),
                    "Store query timed out"
                );
                Err(StoreError::Timeout {
                    operation,
                    after: self.query_timeout,
                })
            }
        }
    }
}

/// `LIMIT` bind value; limits beyond `i64::MAX` mean "no limit"
fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl StatsStore for PgStatsStore {
    async fn count(&self, kind: EntityKind) -> StoreResult<u64> {
        // Table names come from a closed enum, never from input.
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table());

        let count: i64 = self
            .timed("count", sqlx::query_scalar(&sql).fetch_one(&self.pool))
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn grouped_counts(
        &self,
        usage: UsageTable,
        limit: usize,
    ) -> StoreResult<Vec<RankedKey<String>>> {
        // Ties are broken by key so the native order is repeatable.
        let sql = format!(
            r#"
            SELECT {key}, COUNT(*)
            FROM {table}
            GROUP BY {key}
            ORDER BY COUNT(*) DESC, {key} ASC
            LIMIT $1
            "#,
            key = usage.key_column(),
            table = usage.table(),
        );

        let rows: Vec<(String, i64)> = self
            .timed(
                "grouped_counts",
                sqlx::query_as(&sql)
                    .bind(limit_param(limit))
                    .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|(key, count)| RankedKey::new(key, count.max(0) as u64))
            .collect())
    }

    async fn lookup_references(
        &self,
        reference: ReferenceTable,
        ids: &[String],
    ) -> StoreResult<Vec<ReferenceRow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT id, name, COALESCE({detail}, '')
            FROM {table}
            WHERE id = ANY($1)
            "#,
            detail = reference.detail_column(),
            table = reference.table(),
        );

        let rows: Vec<(String, String, String)> = self
            .timed(
                "lookup_references",
                sqlx::query_as(&sql).bind(ids).fetch_all(&self.pool),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, detail)| ReferenceRow { id, name, detail })
            .collect())
    }

    async fn trip_timestamps_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<DateTime<Utc>>> {
        self.timed(
            "trip_timestamps_since",
            sqlx::query_scalar(
                r#"
                SELECT created_at
                FROM trips
                WHERE created_at >= $1
                ORDER BY created_at DESC
                "#,
            )
            .bind(since)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn user_overviews(&self) -> StoreResult<Vec<UserOverview>> {
        let rows: Vec<(String, String, String, String, DateTime<Utc>, i64)> = self
            .timed(
                "user_overviews",
                sqlx::query_as(
                    r#"
                    SELECT u.id, u.email, u.name, u.role, u.created_at, COUNT(t.id)
                    FROM users u
                    LEFT JOIN trips t ON t.owner_id = u.id
                    GROUP BY u.id, u.email, u.name, u.role, u.created_at
                    ORDER BY u.created_at DESC
                    "#,
                )
                .fetch_all(&self.pool),
            )
            .await?;

        rows.into_iter()
            .map(|(id, email, name, role, created_at, trip_count)| {
                let role: Role = role.parse().map_err(StoreError::InvalidData)?;
                Ok(UserOverview {
                    id,
                    email,
                    name,
                    role,
                    created_at,
                    trip_count: trip_count.max(0) as u64,
                })
            })
            .collect()
    }
}
