//! The rule trait every token-level check implements.

use crate::collector::FindingCollector;
use crate::token::{TokenKind, TokenStream};
use crate::types::Severity;

/// A token-level style rule.
///
/// A rule is a configuration value composed into the analyzer, not a
/// subclass: its pattern set or naming policy is fixed at construction, and
/// `check` threads all scan state through parameters so one rule instance can
/// serve concurrent per-file analyses.
///
/// # Example
///
/// ```ignore
/// use lexlint_core::{Finding, FindingCollector, Severity, TokenKind, TokenRule, TokenStream};
///
/// pub struct NoTabs;
///
/// impl TokenRule for NoTabs {
///     fn name(&self) -> &'static str { "no-tabs" }
///     fn interests(&self) -> &[TokenKind] { &[TokenKind::Whitespace] }
///
///     fn check(&self, stream: &TokenStream, index: usize, out: &mut FindingCollector) {
///         // inspect stream.get(index) and push findings
///     }
/// }
/// ```
pub trait TokenRule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g. "control-signature").
    fn name(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for findings from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Token kinds this rule wants to be dispatched on.
    fn interests(&self) -> &[TokenKind];

    /// Inspects the token at `index` and pushes any findings.
    ///
    /// Called once per token whose kind is in [`TokenRule::interests`], in
    /// stream order. The rule decides for itself whether the token is an
    /// anchor it cares about.
    fn check(&self, stream: &TokenStream, index: usize, out: &mut FindingCollector);
}

/// Type alias for boxed rule trait objects.
pub type RuleBox = Box<dyn TokenRule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Finding;

    struct TestRule;

    impl TokenRule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }
        fn interests(&self) -> &[TokenKind] {
            &[TokenKind::Identifier]
        }

        fn check(&self, stream: &TokenStream, index: usize, out: &mut FindingCollector) {
            if let Some(token) = stream.get(index) {
                out.push(Finding::new(
                    self.name(),
                    "TestViolation",
                    self.default_severity(),
                    format!("saw \"{}\"", token.text),
                    index,
                    token.span.clone(),
                ));
            }
        }
    }

    #[test]
    fn trait_defaults() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.default_severity(), Severity::Error);
        assert_eq!(rule.interests(), &[TokenKind::Identifier]);
    }
}
