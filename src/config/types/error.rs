//! Configuration errors and collected validation diagnostics.
//!
//! Validation never stops at the first problem: every section pushes into one
//! [`ConfigDiagnostics`], which is turned into a single error at the end.
//!
//! ```text
//! config validation failed:
//!
//!   bundles.sources  [0] `app` at least one source is required
//!   assets.root      `public` does not exist
//!                    hint: create it or set `assets.root`
//! ```

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to load `minweb.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file")]
    Toml(#[from] toml::de::Error),

    // no #[source]: the diagnostics already render in full
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One problem found at `field`.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl ConfigDiagnostic {
    fn write_aligned(&self, f: &mut fmt::Formatter<'_>, width: usize) -> fmt::Result {
        let field = self.field.as_str();
        write!(f, "  {:<width$}  {}", field.cyan(), self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n  {:<width$}  {} {hint}", "", "hint:".yellow())?;
        }
        Ok(())
    }
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_aligned(f, self.field.as_str().len())
    }
}

/// Errors and warnings collected while validating a [`crate::config::MinwebConfig`].
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
    warnings: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.errors.push(diagnostic(field, message, None));
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.errors
            .push(diagnostic(field, message, Some(hint.into())));
    }

    /// Record a non-fatal problem, printed by [`Self::print_warnings`].
    pub fn warn(&mut self, field: FieldPath, message: impl Into<String>) {
        self.warnings.push(diagnostic(field, message, None));
    }

    pub fn print_warnings(&self) {
        for warning in &self.warnings {
            crate::log!("warning"; "{}: {}", warning.field.as_str(), warning.message);
        }
    }

    pub fn warnings(&self) -> &[ConfigDiagnostic] {
        &self.warnings
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of errors; warnings are not counted.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.has_errors() { Err(self) } else { Ok(()) }
    }
}

fn diagnostic(field: FieldPath, message: impl Into<String>, hint: Option<String>) -> ConfigDiagnostic {
    ConfigDiagnostic {
        field,
        message: message.into(),
        hint,
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "config validation failed:".red().bold())?;
        let width = self
            .errors
            .iter()
            .map(|e| e.field.as_str().len())
            .max()
            .unwrap_or(0);
        for error in &self.errors {
            writeln!(f)?;
            error.write_aligned(f, width)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}
