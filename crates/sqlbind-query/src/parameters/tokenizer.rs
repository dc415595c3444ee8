//! Bind Marker Tokenizer
//!
//! Splits raw SQL into literal fragments and the `:name` bind variables
//! between them, in a single left-to-right pass. Single-quoted literals are
//! opaque: a colon inside one is never a marker, and `::` casts are left
//! alone.

use std::collections::HashSet;

use sqlbind_core::{BindConfig, QuoteHandling, UnterminatedLiteral};

use super::{BindError, BindResult};

/// Fragments and bind names extracted from one SQL statement.
///
/// There is always exactly one more fragment than there are names: the text
/// before the first marker, between each pair of markers, and after the
/// last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    fragments: Vec<String>,
    names: Vec<String>,
}

impl ParseResult {
    /// Builds a result from caller-supplied sequences.
    ///
    /// Returns `None` unless `fragments.len() == names.len() + 1`.
    pub fn from_parts(fragments: Vec<String>, names: Vec<String>) -> Option<Self> {
        (fragments.len() == names.len() + 1).then_some(Self { fragments, names })
    }

    /// Literal SQL fragments, in order.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Bind variable names, in order of appearance, duplicates included.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns true if the statement references at least one bind variable.
    pub fn has_bind_variables(&self) -> bool {
        !self.names.is_empty()
    }

    /// Distinct bind names in order of first occurrence.
    pub fn unique_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.names
            .iter()
            .map(String::as_str)
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Consumes the result, returning `(fragments, names)`.
    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.fragments, self.names)
    }
}

/// Lexer state. Each variant has its own transition method on [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    /// Plain SQL text.
    Base,
    /// Inside a single-quoted literal that opened at byte `opened_at`.
    InString { len: usize, opened_at: usize },
    /// Collecting the identifier after a `:` marker.
    InBind,
}

/// What the driver loop does after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Advance,
    /// Run the same character again in the new state.
    Reprocess,
    /// The lookahead character was consumed too.
    SkipNext,
}

fn is_bind_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '#')
}

struct Scanner<'a> {
    config: &'a BindConfig,
    state: LexState,
    fragments: Vec<String>,
    names: Vec<String>,
    fragment: String,
    name: String,
}

impl<'a> Scanner<'a> {
    fn new(config: &'a BindConfig, capacity: usize) -> Self {
        Self {
            config,
            state: LexState::Base,
            fragments: Vec::new(),
            names: Vec::new(),
            fragment: String::with_capacity(capacity),
            name: String::new(),
        }
    }

    fn base(&mut self, pos: usize, c: char, last: Option<char>, next: Option<char>) -> Step {
        match c {
            '\'' => {
                self.fragment.push(c);
                self.state = LexState::InString {
                    len: 0,
                    opened_at: pos,
                };
            }
            ':' if next != Some(':') && last != Some(':') => {
                self.fragments.push(std::mem::take(&mut self.fragment));
                self.name.clear();
                self.state = LexState::InBind;
            }
            _ => self.fragment.push(c),
        }
        Step::Advance
    }

    fn in_string(
        &mut self,
        c: char,
        last: Option<char>,
        next: Option<char>,
        len: usize,
        opened_at: usize,
    ) -> Step {
        self.fragment.push(c);
        if c != '\'' {
            self.state = LexState::InString {
                len: len + 1,
                opened_at,
            };
            return Step::Advance;
        }

        match self.config.quote_handling {
            QuoteHandling::Legacy => {
                // Closes unless the previous char was a quote inside a non-empty literal.
                self.state = if last != Some('\'') || len == 0 {
                    LexState::Base
                } else {
                    LexState::InString {
                        len: len + 1,
                        opened_at,
                    }
                };
                Step::Advance
            }
            QuoteHandling::Standard if next == Some('\'') => {
                self.fragment.push('\'');
                self.state = LexState::InString {
                    len: len + 2,
                    opened_at,
                };
                Step::SkipNext
            }
            QuoteHandling::Standard => {
                self.state = LexState::Base;
                Step::Advance
            }
        }
    }

    fn in_bind(&mut self, c: char) -> Step {
        if c == '=' && self.config.equals_terminates_bind {
            // `:name=` ends the name and swallows the `=`.
            self.finish_name();
            self.state = LexState::Base;
            return Step::Advance;
        }
        if is_bind_char(c) {
            self.name.push(c);
            return Step::Advance;
        }
        self.finish_name();
        self.state = LexState::Base;
        Step::Reprocess
    }

    fn finish_name(&mut self) {
        self.names.push(std::mem::take(&mut self.name));
    }

    fn feed(&mut self, pos: usize, c: char, last: Option<char>, next: Option<char>) -> Step {
        loop {
            let step = match self.state {
                LexState::Base => self.base(pos, c, last, next),
                LexState::InString { len, opened_at } => {
                    self.in_string(c, last, next, len, opened_at)
                }
                LexState::InBind => self.in_bind(c),
            };
            if step != Step::Reprocess {
                return step;
            }
        }
    }

    /// Closes the scan. Returns the opening position of a literal left open.
    fn finish(mut self) -> (ParseResult, Option<usize>) {
        let unterminated = match self.state {
            LexState::InBind => {
                self.finish_name();
                None
            }
            LexState::InString { opened_at, .. } => Some(opened_at),
            LexState::Base => None,
        };
        self.fragments.push(self.fragment);
        (
            ParseResult {
                fragments: self.fragments,
                names: self.names,
            },
            unterminated,
        )
    }
}

fn scan(sql: &str, config: &BindConfig) -> (ParseResult, Option<usize>) {
    let mut scanner = Scanner::new(config, sql.len());
    let mut chars = sql.char_indices().peekable();
    let mut last = None;

    while let Some((pos, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);
        match scanner.feed(pos, c, last, next) {
            Step::SkipNext => {
                chars.next();
                last = next;
            }
            _ => last = Some(c),
        }
    }

    let (result, unterminated) = scanner.finish();
    tracing::trace!(
        fragments = result.fragments.len(),
        names = result.names.len(),
        unterminated_literal = unterminated.is_some(),
        "tokenized SQL"
    );
    (result, unterminated)
}

/// Reusable tokenizer carrying a [`BindConfig`].
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    config: BindConfig,
}

impl Tokenizer {
    /// Create a tokenizer with the given options.
    pub fn new(config: BindConfig) -> Self {
        Self { config }
    }

    /// The options this tokenizer was built with.
    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    /// Tokenizes `sql`. Never fails; an unterminated literal becomes part of
    /// the trailing fragment.
    pub fn tokenize(&self, sql: &str) -> ParseResult {
        scan(sql, &self.config).0
    }

    /// Tokenizes `sql`, honoring [`BindConfig::unterminated_literal`].
    pub fn try_tokenize(&self, sql: &str) -> BindResult<ParseResult> {
        try_tokenize(sql, &self.config)
    }
}

/// Tokenizes SQL with the default (legacy-compatible) options.
///
/// # Example
///
/// ```
/// use sqlbind_query::parameters::tokenize;
///
/// let parsed = tokenize("select * from t where id = :id");
/// assert_eq!(parsed.fragments(), ["select * from t where id = ", ""]);
/// assert_eq!(parsed.names(), ["id"]);
/// ```
pub fn tokenize(sql: &str) -> ParseResult {
    scan(sql, &BindConfig::default()).0
}

/// Tokenizes SQL with explicit options. Never fails.
pub fn tokenize_with(sql: &str, config: &BindConfig) -> ParseResult {
    scan(sql, config).0
}

/// Tokenizes SQL with explicit options, rejecting unterminated literals
/// when the config asks for it.
pub fn try_tokenize(sql: &str, config: &BindConfig) -> BindResult<ParseResult> {
    let (result, unterminated) = scan(sql, config);
    match unterminated {
        Some(position) if config.unterminated_literal == UnterminatedLiteral::Reject => {
            tracing::debug!(position, "rejecting unterminated quoted literal");
            Err(BindError::MalformedQuotedLiteral { position })
        }
        _ => Ok(result),
    }
}
