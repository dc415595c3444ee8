//! SQL Bind Variable Tokenizing and Rewriting
//!
//! This module emulates bind variables for drivers that cannot bind them
//! natively. A statement using `:name` markers is split into literal
//! fragments and bind names, then rebuilt with each marker replaced by a
//! quoted literal looked up in a [`ValueSource`].
//!
//! # Example
//!
//! ```
//! use sqlbind_query::parameters::{NamedSet, rewrite, tokenize};
//!
//! let parsed = tokenize("update t set x = 'a:b' where y = :y");
//! assert_eq!(parsed.names(), ["y"]);
//!
//! let values: NamedSet = [("y", "7")].into_iter().collect();
//! let sql = rewrite(&parsed, &values).unwrap();
//! assert_eq!(sql, "update t set x = 'a:b' where y = '7'");
//! ```

mod error;
pub mod rewriter;
mod tokenizer;
mod value_source;

pub use error::{BindError, BindResult};
pub use rewriter::{
    Rewriter, bind_query, bind_query_with, push_quoted, quote_literal, rewrite, rewrite_with,
};
pub use tokenizer::{ParseResult, Tokenizer, tokenize, tokenize_with, try_tokenize};
pub use value_source::{FnSource, NamedSet, ValueSource, from_fn};
