//! End-to-end runs of the standard rule set over tokenized source snippets.

use lexlint_core::testlex::lex;
use lexlint_core::{Analyzer, Config, Severity};
use lexlint_rules::{standard_rules, Dialect};

const FIXTURE: &str = "\
class ContentText extends ContentElement {
\tpublic $strTable;
\tpublic $int_counter;

\tfunction generate() {
\t\tif ($this)
\t\t{
\t\t\t$value = $_POST;
\t\t}
\t\twhile ($int_counter) {
\t\t\t$htmlContent = 1;
\t\t}
\t}
}
";

#[test]
fn standard_rules_report_in_stream_order() {
    let analyzer = Analyzer::builder()
        .rules(standard_rules())
        .build()
        .expect("preset should build");
    let stream = lex(FIXTURE);
    let result = analyzer.analyze(&stream);

    let codes: Vec<&str> = result.findings.iter().map(|f| f.code.as_str()).collect();
    assert_eq!(
        codes,
        vec![
            "NameHasTypePrefix",
            "NameHasForbiddenSeparator",
            "PatternMismatch",
            "ForbiddenDirectAccess",
            "NameHasForbiddenSeparator",
        ]
    );

    // Non-decreasing token indices, spans pointing into the source.
    let mut last = 0;
    for finding in &result.findings {
        assert!(finding.token_index >= last);
        last = finding.token_index;
        assert!(finding.span.offset < FIXTURE.len());
    }
    assert_eq!(result.tokens_scanned, stream.len());
}

#[test]
fn analysis_is_idempotent_across_runs() {
    let analyzer = Analyzer::builder()
        .rules(standard_rules())
        .build()
        .expect("preset should build");
    let stream = lex(FIXTURE);

    let first = serde_json::to_string(&analyzer.analyze(&stream).findings).unwrap();
    let second = serde_json::to_string(&analyzer.analyze(&stream).findings).unwrap();
    assert_eq!(first, second);
}

#[test]
fn config_disables_and_downgrades_rules() {
    let config = Config::parse(
        "\
[rules.control-signature]
enabled = false

[rules.valid-variable-name]
severity = \"warning\"
",
    )
    .expect("config should parse");

    let analyzer = Analyzer::builder()
        .rules(standard_rules())
        .config(config)
        .build()
        .expect("preset should build");
    let result = analyzer.analyze(&lex(FIXTURE));

    assert!(result
        .findings
        .iter()
        .all(|f| f.rule == "valid-variable-name" && f.severity == Severity::Warning));
    assert!(!result.has_errors());
    assert!(result.has_findings_at(Severity::Warning));
}

#[test]
fn contao_dialect_accepts_inherited_members() {
    let analyzer = Analyzer::builder()
        .rules(Dialect::Contao.rules())
        .build()
        .expect("preset should build");
    let result = analyzer.analyze(&lex(FIXTURE));

    assert!(result
        .findings
        .iter()
        .all(|f| !f.message.contains("strTable")));
}

#[test]
fn findings_serialize_for_host_reporters() {
    let analyzer = Analyzer::builder()
        .rules(standard_rules())
        .build()
        .expect("preset should build");
    let result = analyzer.analyze(&lex("$my_var = 1;\n"));

    let json = serde_json::to_value(&result.findings).unwrap();
    let first = &json[0];
    assert_eq!(first["rule"], "valid-variable-name");
    assert_eq!(first["code"], "NameHasForbiddenSeparator");
    assert_eq!(first["span"]["line"], 1);
}
