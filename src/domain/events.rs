//! Core domain models for checkstyle audit events
//!
//! Architecture: Rich Domain Models - events know which rule raised them
//! - An AuditEvent carries the qualified class name of the check that produced it
//! - Rule name and category are derived on demand, never stored

use crate::rules;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity levels reported by checkstyle
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suppressed; never reported
    Ignore,
    /// Informational messages
    Info,
    /// Warnings that should be addressed but don't fail the build
    Warning,
    /// Errors; checkstyle's default severity for a module
    #[default]
    Error,
}

impl Severity {
    /// Whether this severity level should fail the build
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Whether events at this level appear in reports
    pub fn is_reported(self) -> bool {
        !matches!(self, Self::Ignore)
    }

    /// Convert to string for display
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A diagnostic raised by a checkstyle check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// File the event was raised for
    pub file: PathBuf,
    /// Line number (1-indexed)
    #[serde(default)]
    pub line: Option<u32>,
    /// Column number (1-indexed)
    #[serde(default)]
    pub column: Option<u32>,
    /// Severity of the event
    #[serde(default)]
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Fully qualified class name of the check that raised the event
    #[serde(default, alias = "source")]
    pub source_name: Option<String>,
    /// Configured id of the check module, if any
    #[serde(default)]
    pub module_id: Option<String>,
}

impl AuditEvent {
    /// Create a new event at error severity
    pub fn new(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
            column: None,
            severity: Severity::default(),
            message: message.into(),
            source_name: None,
            module_id: None,
        }
    }

    /// Set the check class that raised this event
    pub fn with_source(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = Some(source_name.into());
        self
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set line and column position
    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Set the module id
    pub fn with_module_id(mut self, module_id: impl Into<String>) -> Self {
        self.module_id = Some(module_id.into());
        self
    }

    /// Rule name of the check that raised this event
    pub fn rule_name(&self) -> Option<&str> {
        rules::rule_name(self.source_name.as_deref())
    }

    /// Rule category of the check that raised this event
    pub fn rule_category(&self) -> Option<&str> {
        rules::rule_category(self.source_name.as_deref())
    }

    /// Whether this event fails the build
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }

    /// Format event for display, tagged with the module id when configured, else the rule name
    pub fn format_display(&self) -> String {
        let location = match (self.line, self.column) {
            (Some(line), Some(col)) => format!(":{line}:{col}"),
            (Some(line), None) => format!(":{line}"),
            _ => String::new(),
        };

        let rule = match self.module_id.as_deref().or_else(|| self.rule_name()) {
            Some(name) => format!(" [{name}]"),
            None => String::new(),
        };

        format!(
            "{}{} {}: {}{}",
            self.file.display(),
            location,
            self.severity.as_str(),
            self.message,
            rule
        )
    }
}

/// Error types that can occur while deriving and reporting rules
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Event input could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Report could not be rendered
    #[error("Report error: {message}")]
    Report { message: String },
}

impl RuleError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create a report error
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }
}

/// Result type for rule operations
pub type RuleResult<T> = Result<T, RuleError>;
