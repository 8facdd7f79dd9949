//! Generic client trait: the executor seam consumed by statements.
//!
//! Built statements hand `(sql, args)` to this trait positionally and
//! unmodified. Implementations exist for direct clients, transactions and
//! pooled clients, so repository code can accept any of them.

use crate::error::{StmtError, StmtResult};
use tokio_postgres::types::ToSql;
use tokio_postgres::Row;

/// A trait that unifies database clients and transactions.
///
/// Passing a transaction anywhere a client is expected makes it easy to
/// compose statement execution within transactions.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = StmtResult<Vec<Row>>> + Send;

    /// Execute a query and return the **first** row.
    ///
    /// Returns [`StmtError::NotFound`] if no rows are returned; multiple rows
    /// are not an error.
    fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = StmtResult<Row>> + Send;

    /// Execute a query and return the first row, if any.
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = StmtResult<Option<Row>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = StmtResult<u64>> + Send;
}

impl GenericClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<Vec<Row>> {
        tokio_postgres::Client::query(self, sql, params)
            .await
            .map_err(StmtError::from_db_error)
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<Row> {
        let rows = GenericClient::query(self, sql, params).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StmtError::not_found("Expected one row, got none"))
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StmtResult<Option<Row>> {
        let rows = GenericClient::query(self, sql, params).await?;
        Ok(rows.into_iter().next())
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<u64> {
        tokio_postgres::Client::execute(self, sql, params)
            .await
            .map_err(StmtError::from_db_error)
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<Vec<Row>> {
        tokio_postgres::Transaction::query(self, sql, params)
            .await
            .map_err(StmtError::from_db_error)
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<Row> {
        let rows = GenericClient::query(self, sql, params).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StmtError::not_found("Expected one row, got none"))
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StmtResult<Option<Row>> {
        let rows = GenericClient::query(self, sql, params).await?;
        Ok(rows.into_iter().next())
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<u64> {
        tokio_postgres::Transaction::execute(self, sql, params)
            .await
            .map_err(StmtError::from_db_error)
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<Vec<Row>> {
        // Delegate to the deref target (ClientWrapper -> tokio_postgres::Client).
        let inner: &tokio_postgres::Client = self;
        GenericClient::query(inner, sql, params).await
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<Row> {
        let inner: &tokio_postgres::Client = self;
        GenericClient::query_one(inner, sql, params).await
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StmtResult<Option<Row>> {
        let inner: &tokio_postgres::Client = self;
        GenericClient::query_opt(inner, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StmtResult<u64> {
        let inner: &tokio_postgres::Client = self;
        GenericClient::execute(inner, sql, params).await
    }
}
