//! Preset rule sets for the supported dialects.

use crate::control_signature::ControlSignature;
use crate::variable_name::ValidVariableName;
use lexlint_core::{NamingPolicy, RuleBox};

/// Member names inherited from the Contao framework's base classes, which a
/// subclass cannot rename.
const CONTAO_INHERITED_MEMBERS: &[&str] = &["strTable", "strTemplate", "blnSubmitInput"];

/// Coding-standard dialect selecting a preset rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// The base standard.
    #[default]
    Standard,
    /// The Contao variant: identical layout rules, but inherited framework
    /// member names are exempt from the naming policy.
    Contao,
}

impl Dialect {
    /// Returns the preset rules for this dialect.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Standard => standard_rules(),
            Self::Contao => contao_rules(),
        }
    }
}

/// Rules of the base standard: control-structure layout and variable naming.
#[must_use]
pub fn standard_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ControlSignature::new()),
        Box::new(ValidVariableName::new()),
    ]
}

/// Rules of the Contao dialect.
#[must_use]
pub fn contao_rules() -> Vec<RuleBox> {
    let policy = NamingPolicy::default().exempts(CONTAO_INHERITED_MEMBERS.iter().copied());
    vec![
        Box::new(ControlSignature::new()),
        Box::new(ValidVariableName::with_policy(policy)),
    ]
}
