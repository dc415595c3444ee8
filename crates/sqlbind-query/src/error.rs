//! Query service errors

use sqlbind_core::SqlBindError;
use thiserror::Error;

use crate::engine::BindCommand;
use crate::parameters::BindError;

pub type QueryServiceResult<T> = Result<T, QueryServiceError>;

/// Errors from binding and running a statement
#[derive(Debug, Error)]
pub enum QueryServiceError {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error("Query execution failed: {0}")]
    Core(#[from] SqlBindError),

    #[error("{command} expected {expected} row(s), got {actual}")]
    RowCount {
        command: BindCommand,
        expected: &'static str,
        actual: usize,
    },

    #[error("unknown command `{0}', expected one of dml, 1row, 0or1row, select, exec")]
    UnknownCommand(String),
}
