//! SQLBIND Core - Shared types for bind-variable substitution
//!
//! This crate provides the types the other SQLBIND crates depend on:
//!
//! - `BindConfig` - Tokenizer and rewriter options, loadable from TOML
//! - `Connection` - Trait implemented by the driver layer that runs SQL
//! - Common types like `Value`, `Row`, `QueryResult`, etc.

pub mod config;
mod connection;
mod error;
mod types;

pub use config::{BindConfig, EscapeStyle, QuoteHandling, UnterminatedLiteral};
pub use connection::*;
pub use error::*;
pub use types::*;
