use thiserror::Error;

/// Errors that can occur while tokenizing or rewriting bind variables.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    /// A bind variable referenced in the SQL has no value in the source.
    #[error("undefined variable `{0}'")]
    UnresolvedBindVariable(String),

    /// The SQL ended inside a quoted literal (strict tokenizing only).
    #[error("unterminated quoted literal starting at byte {position}")]
    MalformedQuotedLiteral { position: usize },
}

/// Result type for bind variable operations.
pub type BindResult<T> = Result<T, BindError>;
