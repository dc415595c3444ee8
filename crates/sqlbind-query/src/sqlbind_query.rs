//! SQLBIND Query - Bind-variable emulation and bound query execution
//!
//! This crate turns SQL containing `:name` bind markers into executable SQL
//! by substituting quoted literals from a value source, and runs the result
//! on a [`sqlbind_core::Connection`].

mod engine;
mod error;
pub mod parameters;

pub use engine::{BindCommand, BoundExecution, QueryEngine};
pub use error::{QueryServiceError, QueryServiceResult};

// Re-export the bind API for convenient access
pub use parameters::{
    BindError, BindResult, NamedSet, ParseResult, Rewriter, Tokenizer, ValueSource, bind_query,
    rewrite, tokenize,
};

#[cfg(test)]
mod engine_tests;
