//! SQL Bind Variable Rewriter
//!
//! Reassembles a tokenized statement, replacing every bind variable with a
//! quoted literal taken from a [`ValueSource`].
//!
//! Substitution rules:
//!
//! - a missing value fails with [`BindError::UnresolvedBindVariable`];
//! - an empty value becomes the unquoted keyword `NULL`;
//! - anything else becomes a single-quoted literal. Embedded `'` is doubled
//!   to `''`; with [`EscapeStyle::Backslash`] every `\` is doubled as well.
//!
//! Numbers are quoted too. A value like `35 union select ...` then fails the
//! database's string-to-integer conversion instead of being executed.

use sqlbind_core::{BindConfig, EscapeStyle};

use super::tokenizer::{ParseResult, try_tokenize};
use super::{BindError, BindResult, ValueSource};

const NULL_KEYWORD: &str = "NULL";

/// Appends `value` to `out` as a single-quoted SQL literal.
pub fn push_quoted(out: &mut String, value: &str, escape: EscapeStyle) {
    out.reserve(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' if escape == EscapeStyle::Backslash => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('\'');
}

/// Quotes `value` as a single-quoted SQL literal.
///
/// # Example
///
/// ```
/// use sqlbind_core::EscapeStyle;
/// use sqlbind_query::parameters::quote_literal;
///
/// assert_eq!(quote_literal("O'Brien", EscapeStyle::Standard), "'O''Brien'");
/// assert_eq!(quote_literal(r"C:\tmp", EscapeStyle::Backslash), r"'C:\\tmp'");
/// ```
pub fn quote_literal(value: &str, escape: EscapeStyle) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    push_quoted(&mut out, value, escape);
    out
}

/// Reusable rewriter carrying a [`BindConfig`].
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    config: BindConfig,
}

impl Rewriter {
    /// Create a rewriter with the given options.
    pub fn new(config: BindConfig) -> Self {
        Self { config }
    }

    /// The options this rewriter was built with.
    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    /// Rebuilds the statement with every bind variable substituted.
    pub fn rewrite<S>(&self, parsed: &ParseResult, source: &S) -> BindResult<String>
    where
        S: ValueSource + ?Sized,
    {
        rewrite_with(parsed, source, &self.config)
    }

    /// Tokenizes `sql` and rewrites it in one step.
    pub fn bind<S>(&self, sql: &str, source: &S) -> BindResult<String>
    where
        S: ValueSource + ?Sized,
    {
        bind_query_with(sql, source, &self.config)
    }
}

/// Rewrites a tokenized statement with the default options.
pub fn rewrite<S>(parsed: &ParseResult, source: &S) -> BindResult<String>
where
    S: ValueSource + ?Sized,
{
    rewrite_with(parsed, source, &BindConfig::default())
}

/// Rewrites a tokenized statement with explicit options.
///
/// Fragments and names are walked in lockstep; the final fragment has no
/// substitution after it. The first unresolved name aborts the rewrite and
/// nothing partial is returned.
pub fn rewrite_with<S>(
    parsed: &ParseResult,
    source: &S,
    config: &BindConfig,
) -> BindResult<String>
where
    S: ValueSource + ?Sized,
{
    let fragments = parsed.fragments();
    let names = parsed.names();

    let mut out = String::with_capacity(
        fragments.iter().map(String::len).sum::<usize>() + names.len() * 8,
    );

    for (i, fragment) in fragments.iter().enumerate() {
        out.push_str(fragment);

        let Some(name) = names.get(i) else {
            continue;
        };
        let Some(value) = source.lookup(name) else {
            tracing::debug!(name = %name, "unresolved bind variable");
            return Err(BindError::UnresolvedBindVariable(name.clone()));
        };

        if value.is_empty() && config.empty_as_null {
            out.push_str(NULL_KEYWORD);
        } else {
            push_quoted(&mut out, &value, config.escape);
        }
    }

    tracing::trace!(substitutions = names.len(), output_len = out.len(), "rewrote SQL");
    Ok(out)
}

/// Tokenizes and rewrites `sql` with the default options.
///
/// Statements without bind variables are returned unchanged.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use sqlbind_query::parameters::bind_query;
///
/// let mut values = HashMap::new();
/// values.insert("id".to_string(), "42".to_string());
/// values.insert("name".to_string(), "O'Brien".to_string());
///
/// let sql = bind_query("select * from users where id = :id and name = :name", &values).unwrap();
/// assert_eq!(sql, "select * from users where id = '42' and name = 'O''Brien'");
/// ```
pub fn bind_query<S>(sql: &str, source: &S) -> BindResult<String>
where
    S: ValueSource + ?Sized,
{
    bind_query_with(sql, source, &BindConfig::default())
}

/// Tokenizes and rewrites `sql` with explicit options.
pub fn bind_query_with<S>(sql: &str, source: &S, config: &BindConfig) -> BindResult<String>
where
    S: ValueSource + ?Sized,
{
    let parsed = try_tokenize(sql, config)?;
    if !parsed.has_bind_variables() {
        return Ok(sql.to_string());
    }
    rewrite_with(&parsed, source, config)
}
