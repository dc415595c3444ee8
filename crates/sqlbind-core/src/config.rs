//! Bind Substitution Configuration
//!
//! Controls how bind markers are recognized and how substituted values are
//! quoted. The defaults keep the single-lookback quote rule, double
//! backslashes in values and let `=` end a bind name; [`BindConfig::standard`]
//! switches every knob to the standard SQL behavior instead.
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```toml
//! quote_handling = "standard"
//! escape = "standard"
//! equals_terminates_bind = false
//! unterminated_literal = "reject"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// How a `'` inside a quoted literal is interpreted by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteHandling {
    /// A quote closes the literal unless the previous character was also a
    /// quote and the literal is non-empty (single-character lookback)
    #[default]
    Legacy,
    /// A doubled quote (`''`) is an escaped quote, any other quote closes
    Standard,
}

/// How embedded special characters are escaped in substituted literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeStyle {
    /// Double `'` and double `\` (databases that treat backslash as an escape)
    #[default]
    Backslash,
    /// Double `'` only; `\` passes through (SQL standard strings)
    Standard,
}

/// What to do when the input ends inside a quoted literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnterminatedLiteral {
    /// Keep the partial literal as the trailing fragment
    #[default]
    Accept,
    /// Report a malformed literal with the opening quote position
    Reject,
}

/// Options shared by the tokenizer and the rewriter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindConfig {
    /// Quote interpretation inside string literals
    #[serde(default)]
    pub quote_handling: QuoteHandling,
    /// Escaping applied to substituted values
    #[serde(default)]
    pub escape: EscapeStyle,
    /// Whether `=` directly after a bind name ends the name and is dropped
    #[serde(default = "default_true")]
    pub equals_terminates_bind: bool,
    /// Whether an empty value is substituted as an unquoted `NULL`
    #[serde(default = "default_true")]
    pub empty_as_null: bool,
    /// Handling of a literal left open at end of input
    #[serde(default)]
    pub unterminated_literal: UnterminatedLiteral,
}

fn default_true() -> bool {
    true
}

impl Default for BindConfig {
    fn default() -> Self {
        Self::legacy()
    }
}

impl BindConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-lookback quote rule, backslash doubling, `=` ends a bind name
    pub fn legacy() -> Self {
        Self {
            quote_handling: QuoteHandling::Legacy,
            escape: EscapeStyle::Backslash,
            equals_terminates_bind: true,
            empty_as_null: true,
            unterminated_literal: UnterminatedLiteral::Accept,
        }
    }

    /// Standard SQL quoting with strict literal checking
    pub fn standard() -> Self {
        Self {
            quote_handling: QuoteHandling::Standard,
            escape: EscapeStyle::Standard,
            equals_terminates_bind: false,
            empty_as_null: true,
            unterminated_literal: UnterminatedLiteral::Reject,
        }
    }

    /// Set quote handling
    pub fn with_quote_handling(mut self, quote_handling: QuoteHandling) -> Self {
        self.quote_handling = quote_handling;
        self
    }

    /// Set escape style
    pub fn with_escape(mut self, escape: EscapeStyle) -> Self {
        self.escape = escape;
        self
    }

    /// Enable or disable the `=` terminator quirk
    pub fn with_equals_terminates_bind(mut self, enabled: bool) -> Self {
        self.equals_terminates_bind = enabled;
        self
    }

    /// Enable or disable empty-value-as-NULL substitution
    pub fn with_empty_as_null(mut self, enabled: bool) -> Self {
        self.empty_as_null = enabled;
        self
    }

    /// Set unterminated literal handling
    pub fn with_unterminated_literal(mut self, handling: UnterminatedLiteral) -> Self {
        self.unterminated_literal = handling;
        self
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: BindConfig = toml::from_str(text)?;
        tracing::debug!(?config, "loaded bind config");
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "reading bind config");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize the config to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| crate::SqlBindError::Configuration(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_bind_config_defaults_are_legacy() {
        let config = BindConfig::default();
        assert_eq!(config, BindConfig::legacy());
        assert_eq!(config.quote_handling, QuoteHandling::Legacy);
        assert_eq!(config.escape, EscapeStyle::Backslash);
        assert!(config.equals_terminates_bind);
        assert!(config.empty_as_null);
        assert_eq!(config.unterminated_literal, UnterminatedLiteral::Accept);
    }

    #[test]
    fn test_bind_config_builder() {
        let config = BindConfig::new()
            .with_quote_handling(QuoteHandling::Standard)
            .with_escape(EscapeStyle::Standard)
            .with_equals_terminates_bind(false)
            .with_empty_as_null(false)
            .with_unterminated_literal(UnterminatedLiteral::Reject);

        assert_eq!(config.quote_handling, QuoteHandling::Standard);
        assert_eq!(config.escape, EscapeStyle::Standard);
        assert!(!config.equals_terminates_bind);
        assert!(!config.empty_as_null);
        assert_eq!(config.unterminated_literal, UnterminatedLiteral::Reject);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = BindConfig::from_toml_str("").unwrap();
        assert_eq!(config, BindConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = BindConfig::from_toml_str(
            "escape = \"standard\"\nunterminated_literal = \"reject\"\n",
        )
        .unwrap();

        assert_eq!(config.escape, EscapeStyle::Standard);
        assert_eq!(config.unterminated_literal, UnterminatedLiteral::Reject);
        assert_eq!(config.quote_handling, QuoteHandling::Legacy);
        assert!(config.equals_terminates_bind);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = BindConfig::from_toml_str("escape = \"sometimes\"").unwrap_err();
        assert!(matches!(err, crate::SqlBindError::Toml(_)));
    }

    #[test]
    fn test_toml_round_trip_of_standard_preset() {
        let text = BindConfig::standard().to_toml_string().unwrap();
        assert_eq!(BindConfig::from_toml_str(&text).unwrap(), BindConfig::standard());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "quote_handling = \"standard\"").unwrap();
        writeln!(file, "empty_as_null = false").unwrap();

        let config = BindConfig::load(file.path()).unwrap();
        assert_eq!(config.quote_handling, QuoteHandling::Standard);
        assert!(!config.empty_as_null);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BindConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, crate::SqlBindError::Io(_)));
    }
}
