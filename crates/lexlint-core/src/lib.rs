//! # lexlint-core
//!
//! Core framework for token-level style linting over host-provided token
//! streams.
//!
//! This crate provides the foundational traits and types for building
//! token-stream linters. It includes:
//!
//! - [`TokenStream`] — the host-independent token model with span and scope
//!   navigation
//! - [`Pattern`] / [`PatternSet`] — a compiled layout-pattern matcher
//! - [`NamingPolicy`] — naming-convention checks with camelCase suggestions
//! - [`TokenRule`] trait for token-level rules
//! - [`Analyzer`] for dispatching streams through registered rules
//! - [`Finding`] for representing lint findings
//!
//! ## Example
//!
//! ```ignore
//! use lexlint_core::Analyzer;
//! use lexlint_rules::standard_rules;
//!
//! let analyzer = Analyzer::builder()
//!     .rules(standard_rules())
//!     .build()?;
//!
//! let result = analyzer.analyze(&stream);
//! result.print_report();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod collector;
mod config;
mod naming;
mod pattern;
mod registry;
mod rule;
mod token;
mod types;

#[cfg(any(test, feature = "testlex"))]
#[doc(hidden)]
pub mod testlex;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use collector::FindingCollector;
pub use config::{Config, ConfigError, RuleConfig};
pub use naming::{is_lower_camel, to_lower_camel, NameViolation, NameViolationKind, NamingPolicy};
pub use pattern::{
    AnchorGuard, FailureKind, Pattern, PatternElement, PatternError, PatternFailure,
    PatternOutcome, PatternSet,
};
pub use registry::{RegistryError, RuleRegistry};
pub use rule::{RuleBox, TokenRule};
pub use token::{Scope, ScopeKind, Span, StreamError, Token, TokenKind, TokenStream};
pub use types::{AnalysisResult, Finding, FindingDiagnostic, Severity};
