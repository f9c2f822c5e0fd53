//! Rule: control structure signatures must match the expected layout.
//!
//! Each control keyword (and each close brace continued by `else`/`elseif`)
//! anchors a set of layout patterns: single spaces between the keyword, its
//! parenthesized condition and the opening brace, and a line break after the
//! brace. A `do` body may keep its `while (...);` tail on the closing line.

use lexlint_core::{
    AnchorGuard, FailureKind, Finding, FindingCollector, Pattern, PatternFailure, PatternOutcome,
    PatternSet, Severity, TokenKind, TokenRule, TokenStream,
};

/// Rule name used in configuration and findings.
pub const NAME: &str = "control-signature";

/// Checks control structure layout against a fixed pattern set.
pub struct ControlSignature {
    patterns: PatternSet,
    severity: Severity,
}

impl Default for ControlSignature {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlSignature {
    /// Creates the rule with the standard pattern set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: default_patterns(),
            severity: Severity::Error,
        }
    }

    /// Creates the rule with a custom pattern set.
    #[must_use]
    pub fn with_patterns(patterns: PatternSet) -> Self {
        Self {
            patterns,
            severity: Severity::Error,
        }
    }

    /// Sets the severity for findings.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn finding(&self, stream: &TokenStream, failure: &PatternFailure) -> Finding {
        let message = match failure.kind {
            FailureKind::Mismatch => format!(
                "Expected \"{}\"; {} expected but found {}",
                failure.pattern, failure.expected, failure.found
            ),
            FailureKind::NotTerminated => format!(
                "Expected \"{}\"; {} not found before {}",
                failure.pattern, failure.expected, failure.found
            ),
            FailureKind::UnbalancedBrackets => format!(
                "Expected \"{}\"; bracket at the deviation point has {}",
                failure.pattern, failure.found
            ),
        };
        let span = stream
            .get(failure.token_index)
            .map(|t| t.span.clone())
            .unwrap_or_default();
        Finding::new(
            NAME,
            failure.kind.code(),
            self.severity,
            message,
            failure.token_index,
            span,
        )
    }
}

impl TokenRule for ControlSignature {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Control structure signatures must match the expected layout"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interests(&self) -> &[TokenKind] {
        &[TokenKind::Keyword, TokenKind::CloseBrace]
    }

    fn check(&self, stream: &TokenStream, index: usize, out: &mut FindingCollector) {
        if let Some(PatternOutcome::Failed(failure)) = self.patterns.check_at(stream, index) {
            tracing::trace!(
                pattern = failure.pattern,
                token_index = failure.token_index,
                "layout deviation"
            );
            out.push(self.finding(stream, &failure));
        }
    }
}

/// The standard control-signature pattern set.
#[must_use]
pub fn default_patterns() -> PatternSet {
    PatternSet::new(vec![
        pat("do {...} while (...);EOL", AnchorGuard::None),
        pat("while (...) {EOL", AnchorGuard::NotDoWhileTail),
        pat("for (...) {EOL", AnchorGuard::None),
        pat("if (...) {EOL", AnchorGuard::NotPrecededBy("else")),
        pat("foreach (...) {EOL", AnchorGuard::None),
        pat("}EOL...else if (...) {EOL", AnchorGuard::FollowedBy("else")),
        pat("}EOL...elseif (...) {EOL", AnchorGuard::FollowedBy("elseif")),
        pat("}EOL...else {EOL", AnchorGuard::FollowedBy("else")),
    ])
}

#[allow(clippy::expect_used)]
fn pat(source: &str, guard: AnchorGuard) -> Pattern {
    Pattern::compile(source)
        .expect("built-in pattern must compile")
        .with_guard(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexlint_core::testlex::lex;
    use lexlint_core::Analyzer;

    fn findings(source: &str) -> Vec<Finding> {
        let analyzer = Analyzer::builder()
            .rule(ControlSignature::new())
            .build()
            .unwrap();
        analyzer.analyze(&lex(source)).findings
    }

    #[test]
    fn well_formed_control_structures_pass() {
        let source = "\
while ($a) {
\tif ($b) {
\t\tx();
\t}
\telse if ($c) {
\t\ty();
\t}
\telse {
\t\tz();
\t}
}
do {
\t$i = $i + 1;
} while ($i);
foreach ($rows as $row) {
\techo $row;
}
";
        assert!(findings(source).is_empty(), "{:?}", findings(source));
    }

    #[test]
    fn brace_on_next_line_is_a_mismatch() {
        let source = "if ($a)\n{\n\tx();\n}\n";
        let all = findings(source);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].code, "PatternMismatch");
        assert!(all[0].message.contains("if (...) {"));
    }

    #[test]
    fn do_while_tail_on_closing_line_passes() {
        assert!(findings("do { x(); } while (true);\n").is_empty());
    }

    #[test]
    fn unspaced_do_while_tail_reports_at_the_while() {
        let source = "do { x(); }while(true);\n";
        let all = findings(source);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].code, "PatternMismatch");

        let stream = lex(source);
        let while_idx = stream.iter().position(|t| t.text == "while").unwrap();
        assert_eq!(all[0].token_index, while_idx);
    }

    #[test]
    fn else_on_same_line_as_close_brace() {
        let source = "if ($a) {\n\tx();\n} else {\n\ty();\n}\n";
        let all = findings(source);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].code, "PatternMismatch");
        // The close brace before `else` anchors the failing patterns.
        let stream = lex(source);
        let brace_idx = stream.iter().position(|t| t.text == "}").unwrap();
        assert!(all[0].token_index >= brace_idx);
    }

    #[test]
    fn one_finding_per_anchor() {
        // Both `else if` and `else` patterns anchor at the close brace and
        // fail; only the best attempt is reported.
        let source = "if ($a) {\n\tx();\n} else if ($b) {\n\ty();\n}\n";
        let all = findings(source);
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn standalone_while_is_not_mistaken_for_a_tail() {
        let source = "while ($a)\n{\n\tx();\n}\n";
        let all = findings(source);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].code, "PatternMismatch");
    }

    #[test]
    fn elseif_variant_matches() {
        let source = "if ($a) {\n\tx();\n}\nelseif ($b) {\n\ty();\n}\n";
        assert!(findings(source).is_empty());
    }

    #[test]
    fn unclosed_do_body_is_unbalanced() {
        let all = findings("do { x();\n");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].code, "UnbalancedBrackets");
    }
}
