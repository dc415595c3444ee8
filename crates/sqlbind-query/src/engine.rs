//! Bound query execution engine

use std::str::FromStr;
use std::sync::Arc;

use sqlbind_core::{BindConfig, Connection, QueryResult, Row};

use crate::error::{QueryServiceError, QueryServiceResult};
use crate::parameters::{Rewriter, ValueSource};

/// How a bound statement is run and what it must return
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindCommand {
    /// INSERT/UPDATE/DELETE, returns the affected row count
    Dml,
    /// Query that must return exactly one row
    OneRow,
    /// Query that may return zero or one row
    ZeroOrOneRow,
    /// Query returning any number of rows
    Select,
    /// Any statement; the result says whether rows came back
    Exec,
}

impl BindCommand {
    /// The command's name as used by script callers
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dml => "dml",
            Self::OneRow => "1row",
            Self::ZeroOrOneRow => "0or1row",
            Self::Select => "select",
            Self::Exec => "exec",
        }
    }
}

impl std::fmt::Display for BindCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BindCommand {
    type Err = QueryServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dml" => Ok(Self::Dml),
            "1row" => Ok(Self::OneRow),
            "0or1row" => Ok(Self::ZeroOrOneRow),
            "select" => Ok(Self::Select),
            "exec" => Ok(Self::Exec),
            other => Err(QueryServiceError::UnknownCommand(other.to_string())),
        }
    }
}

/// Outcome of a bound statement
#[derive(Debug, Clone)]
pub enum BoundExecution {
    /// Rows affected by a data-modifying statement
    Dml { affected_rows: u64 },
    /// The single row of a `1row` query
    Row(Row),
    /// The row of a `0or1row` query, if there was one
    OptionalRow(Option<Row>),
    /// Full result of a row-returning statement
    Rows(QueryResult),
}

impl BoundExecution {
    /// Returns true if the statement produced rows rather than a DML count
    pub fn returned_rows(&self) -> bool {
        !matches!(self, Self::Dml { .. })
    }
}

/// Rewrites statements with bind values and runs them on a connection
#[derive(Debug, Clone, Default)]
pub struct QueryEngine {
    rewriter: Rewriter,
}

impl QueryEngine {
    /// Create an engine with legacy-compatible bind options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with explicit bind options
    pub fn with_config(config: BindConfig) -> Self {
        Self {
            rewriter: Rewriter::new(config),
        }
    }

    /// The rewriter used for substitution
    pub fn rewriter(&self) -> &Rewriter {
        &self.rewriter
    }

    /// Rewrite `sql` without executing it
    pub fn bind<S>(&self, sql: &str, source: &S) -> QueryServiceResult<String>
    where
        S: ValueSource + ?Sized,
    {
        Ok(self.rewriter.bind(sql, source)?)
    }

    /// Rewrite `sql` with values from `source`, then run it as `command`.
    ///
    /// A bind error is returned before the connection is used.
    #[tracing::instrument(
        skip(self, conn, command, sql, source),
        fields(command = %command, sql_preview = %sql.chars().take(100).collect::<String>())
    )]
    pub async fn execute_bound<S>(
        &self,
        conn: &Arc<dyn Connection>,
        command: BindCommand,
        sql: &str,
        source: &S,
    ) -> QueryServiceResult<BoundExecution>
    where
        S: ValueSource + ?Sized,
    {
        let bound = self.bind(sql, source).inspect_err(|e| {
            tracing::error!(error = %e, "bind substitution failed");
        })?;

        tracing::info!(driver = conn.driver_name(), "executing bound statement");
        let execution = match command {
            BindCommand::Dml => {
                let result = conn.execute(&bound, &[]).await?;
                BoundExecution::Dml {
                    affected_rows: result.affected_rows,
                }
            }
            BindCommand::OneRow => {
                let result = conn.query(&bound, &[]).await?;
                let actual = result.row_count();
                match <[Row; 1]>::try_from(result.rows) {
                    Ok([row]) => BoundExecution::Row(row),
                    Err(_) => {
                        return Err(QueryServiceError::RowCount {
                            command,
                            expected: "1",
                            actual,
                        });
                    }
                }
            }
            BindCommand::ZeroOrOneRow => {
                let result = conn.query(&bound, &[]).await?;
                let actual = result.row_count();
                if actual > 1 {
                    return Err(QueryServiceError::RowCount {
                        command,
                        expected: "0 or 1",
                        actual,
                    });
                }
                BoundExecution::OptionalRow(result.rows.into_iter().next())
            }
            BindCommand::Select => BoundExecution::Rows(conn.query(&bound, &[]).await?),
            BindCommand::Exec => {
                let result = conn.execute(&bound, &[]).await?;
                if result.is_query {
                    BoundExecution::Rows(result.result.unwrap_or_else(QueryResult::empty))
                } else {
                    BoundExecution::Dml {
                        affected_rows: result.affected_rows,
                    }
                }
            }
        };

        tracing::info!(
            returned_rows = execution.returned_rows(),
            "bound statement executed successfully"
        );
        Ok(execution)
    }
}
