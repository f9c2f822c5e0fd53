//! Rule: variable names must be lowerCamelCase without separators, type
//! prefixes, or raw superglobal access.
//!
//! The policy itself is scope-agnostic; this rule derives the scope label
//! from the token stream, so a variable inside a class body (and outside any
//! function body) is reported as a member variable.

use lexlint_core::{
    Finding, FindingCollector, NamingPolicy, RuleConfig, ScopeKind, Severity, TokenKind,
    TokenRule, TokenStream,
};

/// Rule name used in configuration and findings.
pub const NAME: &str = "valid-variable-name";

/// Checks variable tokens against a [`NamingPolicy`].
pub struct ValidVariableName {
    policy: NamingPolicy,
    severity: Severity,
}

impl Default for ValidVariableName {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidVariableName {
    /// Creates the rule with the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            policy: NamingPolicy::default(),
            severity: Severity::Error,
        }
    }

    /// Creates the rule with a custom policy.
    #[must_use]
    pub fn with_policy(policy: NamingPolicy) -> Self {
        Self {
            policy,
            severity: Severity::Error,
        }
    }

    /// Sets the severity for findings.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Builds the rule from per-rule configuration options.
    ///
    /// Recognized options: `exempt_names` and `exempt_members` (both extend
    /// the allow list) and `type_prefixes` (replaces the prefix set when
    /// non-empty).
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        let mut policy = NamingPolicy::default()
            .exempts(config.get_str_array("exempt_names"))
            .exempts(config.get_str_array("exempt_members"));
        let prefixes = config.get_str_array("type_prefixes");
        if !prefixes.is_empty() {
            policy = policy.type_prefixes(prefixes);
        }
        Self::with_policy(policy)
    }

    fn scope_label(stream: &TokenStream, index: usize) -> &'static str {
        match stream.enclosing_scope(index) {
            Some(scope) if scope.kind == ScopeKind::Class => "member ",
            _ => "",
        }
    }
}

impl TokenRule for ValidVariableName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Variable names must be lowerCamelCase without separators or type prefixes"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interests(&self) -> &[TokenKind] {
        &[TokenKind::Variable]
    }

    fn check(&self, stream: &TokenStream, index: usize, out: &mut FindingCollector) {
        let Some(token) = stream.get(index) else {
            return;
        };
        let name = token.text.strip_prefix('$').unwrap_or(&token.text);
        let scope = Self::scope_label(stream, index);

        let violations = self.policy.check(name, scope);
        if !violations.is_empty() {
            tracing::trace!(name, count = violations.len(), "naming violations");
        }
        for violation in violations {
            out.push(Finding::new(
                NAME,
                violation.kind.code(),
                self.severity,
                violation.message,
                index,
                token.span.clone(),
            ));
        }
    }
}
