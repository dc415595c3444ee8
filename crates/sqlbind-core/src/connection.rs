//! Connection trait consumed by bound query execution

use crate::{QueryResult, Result, StatementResult, Value};
use async_trait::async_trait;

/// A database connection supplied by the surrounding driver layer.
///
/// SQLBIND never opens connections itself; it only hands rewritten SQL to
/// an implementation of this trait.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the driver name (e.g., "postgresql", "odbc")
    fn driver_name(&self) -> &str;

    /// Execute a statement that modifies data (INSERT/UPDATE/DELETE)
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult>;

    /// Execute a query that returns rows (SELECT)
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult>;
}
