//! Analyzer that dispatches token streams through registered rules.

use crate::collector::FindingCollector;
use crate::config::{Config, ConfigError};
use crate::registry::{RegistryError, RuleRegistry};
use crate::rule::{RuleBox, TokenRule};
use crate::token::TokenStream;
use crate::types::AnalysisResult;

/// Errors raised while building or running an analyzer.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Registry error.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Builder for constructing an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    rules: Vec<RuleBox>,
    config: Config,
}

impl AnalyzerBuilder {
    /// Creates a new builder with no rules and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: TokenRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds a set of boxed rules to the analyzer.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error when two rules share a name.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let mut registry = RuleRegistry::new();
        for rule in self.rules {
            registry.register(rule)?;
        }
        Ok(Analyzer {
            registry,
            config: self.config,
        })
    }
}

/// Runs registered rules over token streams.
///
/// Holds no per-file state: the same analyzer can check any number of
/// streams, sequentially or from several threads.
pub struct Analyzer {
    registry: RuleRegistry,
    config: Config,
}

impl Analyzer {
    /// Creates a builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// The configuration this analyzer was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The registered rules.
    pub fn rules(&self) -> impl Iterator<Item = &dyn TokenRule> {
        self.registry.iter()
    }

    /// Analyzes a token stream and returns all findings.
    ///
    /// Tokens are visited in stream order; for each token, the rules
    /// interested in its kind run in registration order. Findings are
    /// sorted by token index, ties keeping collection order.
    #[must_use]
    pub fn analyze(&self, stream: &TokenStream) -> AnalysisResult {
        let mut collector = FindingCollector::new();

        for index in 0..stream.len() {
            let Some(token) = stream.get(index) else {
                break;
            };
            for rule in self.registry.rules_for(token.kind) {
                if !self.config.is_rule_enabled(rule.name()) {
                    tracing::debug!(rule = rule.name(), "skipping disabled rule");
                    continue;
                }
                rule.check(stream, index, &mut collector);
            }
        }

        let mut findings = collector.drain();
        for finding in &mut findings {
            if let Some(severity) = self.config.rule_severity(&finding.rule) {
                finding.severity = severity;
            }
        }
        findings.sort_by_key(|f| f.token_index);

        tracing::debug!(
            tokens = stream.len(),
            findings = findings.len(),
            "analysis complete"
        );

        AnalysisResult {
            findings,
            tokens_scanned: stream.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{TokenKind, TokenStream};
    use crate::types::{Finding, Severity};

    struct FlagIdentifiers;

    impl TokenRule for FlagIdentifiers {
        fn name(&self) -> &'static str {
            "flag-identifiers"
        }
        fn interests(&self) -> &[TokenKind] {
            &[TokenKind::Identifier]
        }
        fn check(&self, stream: &TokenStream, index: usize, out: &mut FindingCollector) {
            if let Some(token) = stream.get(index) {
                out.push(Finding::new(
                    self.name(),
                    "IdentifierSeen",
                    Severity::Error,
                    format!("identifier \"{}\"", token.text),
                    index,
                    token.span.clone(),
                ));
            }
        }
    }

    fn stream() -> TokenStream {
        TokenStream::from_lexemes([
            (TokenKind::Identifier, "foo".to_string()),
            (TokenKind::Whitespace, " ".to_string()),
            (TokenKind::Identifier, "bar".to_string()),
            (TokenKind::Eol, "\n".to_string()),
        ])
        .unwrap()
    }

    #[test]
    fn findings_come_back_in_stream_order() {
        let analyzer = Analyzer::builder().rule(FlagIdentifiers).build().unwrap();
        let result = analyzer.analyze(&stream());

        assert_eq!(result.tokens_scanned, 4);
        assert_eq!(
            result
                .findings
                .iter()
                .map(|f| f.token_index)
                .collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[test]
    fn analysis_is_idempotent() {
        let analyzer = Analyzer::builder().rule(FlagIdentifiers).build().unwrap();
        let stream = stream();

        let first = analyzer.analyze(&stream);
        let second = analyzer.analyze(&stream);
        assert_eq!(first.findings, second.findings);
    }

    #[test]
    fn config_can_disable_a_rule() {
        let config = Config::parse("[rules.flag-identifiers]\nenabled = false\n").unwrap();
        let analyzer = Analyzer::builder()
            .rule(FlagIdentifiers)
            .config(config)
            .build()
            .unwrap();

        assert!(analyzer.analyze(&stream()).findings.is_empty());
    }

    #[test]
    fn config_can_override_severity() {
        let config = Config::parse("[rules.flag-identifiers]\nseverity = \"warning\"\n").unwrap();
        let analyzer = Analyzer::builder()
            .rule(FlagIdentifiers)
            .config(config)
            .build()
            .unwrap();

        let result = analyzer.analyze(&stream());
        assert!(!result.has_errors());
        assert_eq!(result.count_by_severity(), (0, 2));
    }

    #[test]
    fn duplicate_rules_fail_the_build() {
        let result = Analyzer::builder()
            .rule(FlagIdentifiers)
            .rule(FlagIdentifiers)
            .build();
        assert!(matches!(result, Err(AnalyzerError::Registry(_))));
    }
}
