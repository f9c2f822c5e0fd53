//! # lexlint-rules
//!
//! Built-in rules for the lexlint token-stream linter.
//!
//! | Rule | Checks |
//! |------|--------|
//! | [`ControlSignature`] | Control structure signatures match the expected layout |
//! | [`ValidVariableName`] | Variable names are lowerCamelCase without separators or type prefixes |
//!
//! Rules are composed into an analyzer either individually or through the
//! [`Dialect`] presets:
//!
//! ```ignore
//! use lexlint_core::Analyzer;
//! use lexlint_rules::standard_rules;
//!
//! let analyzer = Analyzer::builder()
//!     .rules(standard_rules())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod control_signature;
mod presets;
mod variable_name;

pub use control_signature::{default_patterns, ControlSignature};
pub use presets::{contao_rules, standard_rules, Dialect};
pub use variable_name::ValidVariableName;
