//! Core types for findings and analysis results.

use crate::token::Span;
use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};

/// Severity level for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single style finding, created by a rule and owned by the collector.
///
/// Value object: the message is already interpolated and nothing is mutated
/// after creation, except the severity override the analyzer applies from
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Kebab-case rule name (e.g. "valid-variable-name").
    pub rule: String,
    /// Violation code within the rule (e.g. "NameHasTypePrefix").
    pub code: String,
    /// Severity of this finding.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Index of the offending token in the stream.
    pub token_index: usize,
    /// Source position of the offending token.
    pub span: Span,
}

impl Finding {
    /// Creates a new finding.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        code: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        token_index: usize,
        span: Span,
    ) -> Self {
        Self {
            rule: rule.into(),
            code: code.into(),
            severity,
            message: message.into(),
            token_index,
            span,
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}.{}] {}",
            self.span.line, self.span.column, self.severity, self.rule, self.code, self.message
        )
    }
}

/// Converts a [`Finding`] to a miette diagnostic for rich terminal display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct FindingDiagnostic {
    message: String,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Finding> for FindingDiagnostic {
    fn from(finding: &Finding) -> Self {
        Self {
            message: format!("[{}.{}] {}", finding.rule, finding.code, finding.message),
            span: SourceSpan::from((finding.span.offset, finding.span.length)),
            label_message: finding.rule.clone(),
        }
    }
}

/// Result of analyzing one token stream.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// All findings, sorted by token index.
    pub findings: Vec<Finding>,
    /// Number of tokens dispatched.
    pub tokens_scanned: usize,
}

impl AnalysisResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any finding is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    /// Checks if any findings meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_findings_at(&self, severity: Severity) -> bool {
        self.findings.iter().any(|f| f.severity >= severity)
    }

    /// Returns findings filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .collect()
    }

    /// Counts findings as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        (errors, self.findings.len() - errors)
    }

    /// Prints a summary report to stdout.
    pub fn print_report(&self) {
        for finding in &self.findings {
            println!("{finding}");
        }
        let (errors, warnings) = self.count_by_severity();
        println!(
            "\nFound {} error(s), {} warning(s) in {} token(s)",
            errors, warnings, self.tokens_scanned
        );
    }
}
