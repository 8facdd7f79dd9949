//! Query monitoring: a decorator over [`GenericClient`].
//!
//! The statement builders never log or time anything themselves. Wrapping an
//! executor in [`InstrumentedClient`] attaches timing, structured logging and
//! slow-query detection without touching the core.
//!
//! # Example
//!
//! ```ignore
//! use pgstmt::monitor::{InstrumentedClient, LoggingMonitor};
//! use std::time::Duration;
//!
//! let client = InstrumentedClient::new(db_client)
//!     .with_monitor(LoggingMonitor::new())
//!     .with_slow_query_threshold(Duration::from_secs(5));
//! ```

use crate::client::GenericClient;
use crate::error::StmtResult;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// The type of SQL operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// SELECT query
    Select,
    /// DELETE statement
    Delete,
    /// Other SQL (DDL, custom text)
    Other,
}

impl QueryType {
    /// Detect query type from SQL text.
    pub fn from_sql(sql: &str) -> Self {
        let head = sql.trim_start();
        let starts_with = |kw: &str| {
            head.get(..kw.len())
                .is_some_and(|p| p.eq_ignore_ascii_case(kw))
        };
        if starts_with("SELECT") {
            QueryType::Select
        } else if starts_with("DELETE") {
            QueryType::Delete
        } else {
            QueryType::Other
        }
    }
}

/// Context describing one query execution.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// The SQL text being executed.
    pub sql: String,
    /// Detected operation type.
    pub query_type: QueryType,
    /// Number of positional parameters.
    pub param_count: usize,
}

impl QueryContext {
    /// Build a context from SQL text and its parameter count.
    pub fn new(sql: &str, param_count: usize) -> Self {
        Self {
            sql: sql.to_string(),
            query_type: QueryType::from_sql(sql),
            param_count,
        }
    }
}

/// Result of a query execution for monitoring purposes.
#[derive(Debug, Clone)]
pub enum QueryResult {
    /// Query returned rows.
    Rows(usize),
    /// Query affected rows (for mutations).
    Affected(u64),
    /// Query returned a single optional row.
    OptionalRow(bool),
    /// Query failed with an error.
    Error(String),
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Rows(n) => write!(f, "{n} rows"),
            QueryResult::Affected(n) => write!(f, "{n} affected"),
            QueryResult::OptionalRow(found) => {
                write!(f, "{}", if *found { "1 row" } else { "0 rows" })
            }
            QueryResult::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Trait for monitoring SQL query execution.
///
/// Implement this to collect metrics, log queries, or feed an observability
/// system.
pub trait QueryMonitor: Send + Sync {
    /// Called after a query completes (success or failure).
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult);

    /// Called when a query exceeds the slow-query threshold.
    ///
    /// Default implementation does nothing. Override to add alerting.
    fn on_slow_query(&self, _ctx: &QueryContext, _duration: Duration) {}
}

/// A no-op monitor that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl QueryMonitor for NoopMonitor {
    fn on_query_complete(&self, _ctx: &QueryContext, _duration: Duration, _result: &QueryResult) {}
}

/// A monitor that emits structured `tracing` events.
#[derive(Debug, Clone)]
pub struct LoggingMonitor {
    /// Maximum SQL length to include in events; longer text is truncated.
    pub max_sql_length: usize,
}

impl Default for LoggingMonitor {
    fn default() -> Self {
        Self {
            max_sql_length: 200,
        }
    }
}

impl LoggingMonitor {
    /// Create a logging monitor with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum SQL length to include in events.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = len;
        self
    }

    fn truncate<'a>(&self, sql: &'a str) -> &'a str {
        if sql.len() <= self.max_sql_length {
            return sql;
        }
        let mut end = self.max_sql_length;
        while end > 0 && !sql.is_char_boundary(end) {
            end -= 1;
        }
        &sql[..end]
    }
}

impl QueryMonitor for LoggingMonitor {
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        tracing::debug!(
            target: "pgstmt.sql",
            query_type = ?ctx.query_type,
            param_count = ctx.param_count,
            duration_ms = duration.as_millis() as u64,
            result = %result,
            sql = %self.truncate(&ctx.sql),
        );
    }

    fn on_slow_query(&self, ctx: &QueryContext, duration: Duration) {
        tracing::warn!(
            target: "pgstmt.sql",
            query_type = ?ctx.query_type,
            duration_ms = duration.as_millis() as u64,
            sql = %self.truncate(&ctx.sql),
            "slow query",
        );
    }
}

/// A monitor that tracks aggregate query statistics.
#[derive(Debug, Default)]
pub struct StatsMonitor {
    total_queries: AtomicU64,
    failed_queries: AtomicU64,
    total_duration_nanos: AtomicU64,
    select_count: AtomicU64,
    delete_count: AtomicU64,
    slow_count: AtomicU64,
}

/// Snapshot of collected query statistics.
#[derive(Debug, Clone, Default)]
pub struct QueryStats {
    /// Total number of queries executed.
    pub total_queries: u64,
    /// Total number of failed queries.
    pub failed_queries: u64,
    /// Total execution time.
    pub total_duration: Duration,
    /// Number of SELECT queries.
    pub select_count: u64,
    /// Number of DELETE statements.
    pub delete_count: u64,
    /// Number of queries past the slow threshold.
    pub slow_count: u64,
}

impl StatsMonitor {
    /// Create a new stats monitor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of current statistics.
    pub fn stats(&self) -> QueryStats {
        QueryStats {
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            total_duration: Duration::from_nanos(self.total_duration_nanos.load(Ordering::Relaxed)),
            select_count: self.select_count.load(Ordering::Relaxed),
            delete_count: self.delete_count.load(Ordering::Relaxed),
            slow_count: self.slow_count.load(Ordering::Relaxed),
        }
    }

    /// Reset all statistics.
    pub fn reset(&self) {
        self.total_queries.store(0, Ordering::Relaxed);
        self.failed_queries.store(0, Ordering::Relaxed);
        self.total_duration_nanos.store(0, Ordering::Relaxed);
        self.select_count.store(0, Ordering::Relaxed);
        self.delete_count.store(0, Ordering::Relaxed);
        self.slow_count.store(0, Ordering::Relaxed);
    }
}

impl QueryMonitor for StatsMonitor {
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        let duration_nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);

        self.total_queries.fetch_add(1, Ordering::Relaxed);
        self.total_duration_nanos
            .fetch_add(duration_nanos, Ordering::Relaxed);

        match ctx.query_type {
            QueryType::Select => {
                self.select_count.fetch_add(1, Ordering::Relaxed);
            }
            QueryType::Delete => {
                self.delete_count.fetch_add(1, Ordering::Relaxed);
            }
            QueryType::Other => {}
        }

        if matches!(result, QueryResult::Error(_)) {
            self.failed_queries.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn on_slow_query(&self, _ctx: &QueryContext, _duration: Duration) {
        self.slow_count.fetch_add(1, Ordering::Relaxed);
    }
}

/// An instrumented database client wrapping a [`GenericClient`].
pub struct InstrumentedClient<C> {
    client: C,
    monitor: Arc<dyn QueryMonitor>,
    slow_query_threshold: Option<Duration>,
}

impl<C: GenericClient> InstrumentedClient<C> {
    /// Create a new instrumented client with no monitoring.
    pub fn new(client: C) -> Self {
        Self {
            client,
            monitor: Arc::new(NoopMonitor),
            slow_query_threshold: None,
        }
    }

    /// Set the query monitor.
    pub fn with_monitor<M: QueryMonitor + 'static>(mut self, monitor: M) -> Self {
        self.monitor = Arc::new(monitor);
        self
    }

    /// Set the query monitor from an Arc.
    pub fn with_monitor_arc(mut self, monitor: Arc<dyn QueryMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Queries taking longer than this trigger `on_slow_query`.
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    /// Get a reference to the inner client.
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Get the inner client, consuming this wrapper.
    pub fn into_inner(self) -> C {
        self.client
    }

    fn report(&self, ctx: &QueryContext, started: Instant, result: &QueryResult) {
        let duration = started.elapsed();
        self.monitor.on_query_complete(ctx, duration, result);
        if let Some(threshold) = self.slow_query_threshold
            && duration >= threshold
        {
            self.monitor.on_slow_query(ctx, duration);
        }
    }
}

impl<C: GenericClient> GenericClient for InstrumentedClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<Vec<Row>> {
        let ctx = QueryContext::new(sql, params.len());
        let started = Instant::now();
        let outcome = self.client.query(sql, params).await;
        let result = match &outcome {
            Ok(rows) => QueryResult::Rows(rows.len()),
            Err(e) => QueryResult::Error(e.to_string()),
        };
        self.report(&ctx, started, &result);
        outcome
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<Row> {
        let ctx = QueryContext::new(sql, params.len());
        let started = Instant::now();
        let outcome = self.client.query_one(sql, params).await;
        let result = match &outcome {
            Ok(_) => QueryResult::Rows(1),
            Err(e) => QueryResult::Error(e.to_string()),
        };
        self.report(&ctx, started, &result);
        outcome
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StmtResult<Option<Row>> {
        let ctx = QueryContext::new(sql, params.len());
        let started = Instant::now();
        let outcome = self.client.query_opt(sql, params).await;
        let result = match &outcome {
            Ok(row) => QueryResult::OptionalRow(row.is_some()),
            Err(e) => QueryResult::Error(e.to_string()),
        };
        self.report(&ctx, started, &result);
        outcome
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<u64> {
        let ctx = QueryContext::new(sql, params.len());
        let started = Instant::now();
        let outcome = self.client.execute(sql, params).await;
        let result = match &outcome {
            Ok(n) => QueryResult::Affected(*n),
            Err(e) => QueryResult::Error(e.to_string()),
        };
        self.report(&ctx, started, &result);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_type_detection() {
        assert_eq!(
            QueryType::from_sql("SELECT id FROM users"),
            QueryType::Select
        );
        assert_eq!(
            QueryType::from_sql("  select id FROM users"),
            QueryType::Select
        );
        assert_eq!(
            QueryType::from_sql("DELETE FROM users WHERE id = $1"),
            QueryType::Delete
        );
        assert_eq!(
            QueryType::from_sql("CREATE TABLE users (id INT)"),
            QueryType::Other
        );
        assert_eq!(QueryType::from_sql(""), QueryType::Other);
    }

    #[test]
    fn test_stats_monitor_counts() {
        let monitor = StatsMonitor::new();
        let select_ctx = QueryContext::new("SELECT id FROM users", 0);
        let delete_ctx = QueryContext::new("DELETE FROM users WHERE id = $1", 1);

        monitor.on_query_complete(&select_ctx, Duration::from_millis(3), &QueryResult::Rows(2));
        monitor.on_query_complete(
            &delete_ctx,
            Duration::from_millis(2),
            &QueryResult::Error("boom".to_string()),
        );
        monitor.on_slow_query(&select_ctx, Duration::from_secs(6));

        let stats = monitor.stats();
        assert_eq!(stats.total_queries, 2);
        assert_eq!(stats.failed_queries, 1);
        assert_eq!(stats.select_count, 1);
        assert_eq!(stats.delete_count, 1);
        assert_eq!(stats.slow_count, 1);

        monitor.reset();
        assert_eq!(monitor.stats().total_queries, 0);
    }

    struct FakeClient;

    impl GenericClient for FakeClient {
        async fn query(
            &self,
            _sql: &str,
            _params: &[&(dyn ToSql + Sync)],
        ) -> StmtResult<Vec<Row>> {
            Ok(Vec::new())
        }

        async fn query_one(&self, _sql: &str, _params: &[&(dyn ToSql + Sync)]) -> StmtResult<Row> {
            Err(crate::error::StmtError::not_found("empty"))
        }

        async fn query_opt(
            &self,
            _sql: &str,
            _params: &[&(dyn ToSql + Sync)],
        ) -> StmtResult<Option<Row>> {
            Ok(None)
        }

        async fn execute(&self, _sql: &str, _params: &[&(dyn ToSql + Sync)]) -> StmtResult<u64> {
            Ok(3)
        }
    }

    #[tokio::test]
    async fn test_instrumented_client_reports() {
        let stats = Arc::new(StatsMonitor::new());
        let client = InstrumentedClient::new(FakeClient).with_monitor_arc(stats.clone());

        client.query("SELECT id FROM users", &[]).await.unwrap();
        let affected = client
            .execute("DELETE FROM users WHERE id = $1", &[&1i64])
            .await
            .unwrap();
        assert_eq!(affected, 3);

        let err = client.query_one("SELECT id FROM users", &[]).await.unwrap_err();
        assert!(err.is_not_found());

        let snapshot = stats.stats();
        assert_eq!(snapshot.total_queries, 3);
        assert_eq!(snapshot.select_count, 2);
        assert_eq!(snapshot.delete_count, 1);
        assert_eq!(snapshot.failed_queries, 1);
    }

    #[test]
    fn test_query_result_display() {
        assert_eq!(QueryResult::Rows(3).to_string(), "3 rows");
        assert_eq!(QueryResult::Affected(1).to_string(), "1 affected");
        assert_eq!(QueryResult::OptionalRow(false).to_string(), "0 rows");
    }
}
