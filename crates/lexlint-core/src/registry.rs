//! Static token-kind to rule dispatch table.

use crate::rule::{RuleBox, TokenRule};
use crate::token::TokenKind;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while building a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two rules registered under the same name.
    #[error("duplicate rule name: {name}")]
    DuplicateRule {
        /// The conflicting rule name.
        name: String,
    },
}

/// Maps each token kind to the ordered list of rules interested in it.
///
/// The table is fixed once all rules are registered; dispatch is a lookup,
/// not a scan over every rule per token.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<RuleBox>,
    by_kind: HashMap<TokenKind, Vec<usize>>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule, indexing it under each kind it is interested in.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRule`] when a rule with the same
    /// name is already registered.
    pub fn register(&mut self, rule: RuleBox) -> Result<(), RegistryError> {
        if self.rules.iter().any(|r| r.name() == rule.name()) {
            return Err(RegistryError::DuplicateRule {
                name: rule.name().to_string(),
            });
        }
        let slot = self.rules.len();
        for kind in rule.interests() {
            self.by_kind.entry(*kind).or_default().push(slot);
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Rules interested in the given token kind, in registration order.
    pub fn rules_for(&self, kind: TokenKind) -> impl Iterator<Item = &dyn TokenRule> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|&slot| self.rules[slot].as_ref())
    }

    /// All registered rules, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn TokenRule> {
        self.rules.iter().map(AsRef::as_ref)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .finish()
    }
}
