//! Identifier naming policy and the analyzer that classifies names against it.
//!
//! A [`NamingPolicy`] is configured once, is immutable during analysis, and
//! can be shared freely across threads. The checks themselves are pure string
//! classification; scope context ("member " vs "") is threaded in by the
//! caller, so the analyzer never touches the token stream.

use std::collections::{HashMap, HashSet};

/// Classification of a naming violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameViolationKind {
    /// The name contains a forbidden separator character.
    ForbiddenSeparator,
    /// The name is on the direct-access deny list (e.g. a raw superglobal).
    ForbiddenDirectAccess,
    /// The name does not satisfy the lowerCamelCase convention.
    NotConventionCase,
    /// The name starts with a short type prefix.
    TypePrefix,
}

impl NameViolationKind {
    /// Stable finding code for this violation kind.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::ForbiddenSeparator => "NameHasForbiddenSeparator",
            Self::ForbiddenDirectAccess => "ForbiddenDirectAccess",
            Self::NotConventionCase => "NameNotInConventionCase",
            Self::TypePrefix => "NameHasTypePrefix",
        }
    }
}

/// One naming violation with its fully interpolated message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameViolation {
    /// Violation classification.
    pub kind: NameViolationKind,
    /// Human-readable message, including the suggested rewrite.
    pub message: String,
}

/// Naming convention policy: lowerCamelCase identifiers without separators or
/// type prefixes, with an allow list and a direct-access deny list.
///
/// Defaults: underscore separator, the
/// `var`/`int`/`str`/`flt`/`bln`/`obj`/`res` prefixes, superglobal exemptions,
/// and denied raw `_POST`/`_GET` access pointing at the request accessor API.
#[derive(Debug, Clone)]
pub struct NamingPolicy {
    separators: Vec<char>,
    type_prefixes: Vec<String>,
    exempt_names: HashSet<String>,
    denied_direct_access: HashMap<String, String>,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        let exempt_names = ["GLOBALS", "_REQUEST", "_SERVER", "_COOKIE", "_FILES"]
            .into_iter()
            .map(String::from)
            .collect();
        let denied_direct_access = [
            ("_POST", "Input::post()"),
            ("_GET", "Input::get()"),
        ]
        .into_iter()
        .map(|(name, accessor)| (name.to_string(), accessor.to_string()))
        .collect();
        Self {
            separators: vec!['_'],
            type_prefixes: ["var", "int", "str", "flt", "bln", "obj", "res"]
                .into_iter()
                .map(String::from)
                .collect(),
            exempt_names,
            denied_direct_access,
        }
    }
}

impl NamingPolicy {
    /// Creates the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty policy with only the given separator configured.
    #[must_use]
    pub fn bare(separator: char) -> Self {
        Self {
            separators: vec![separator],
            type_prefixes: Vec::new(),
            exempt_names: HashSet::new(),
            denied_direct_access: HashMap::new(),
        }
    }

    /// Adds a name to the allow list.
    #[must_use]
    pub fn exempt(mut self, name: impl Into<String>) -> Self {
        self.exempt_names.insert(name.into());
        self
    }

    /// Adds several names to the allow list.
    #[must_use]
    pub fn exempts<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exempt_names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Denies direct access to a name, pointing at the approved accessor.
    #[must_use]
    pub fn deny(mut self, name: impl Into<String>, accessor: impl Into<String>) -> Self {
        self.denied_direct_access
            .insert(name.into(), accessor.into());
        self
    }

    /// Adds a forbidden short type prefix.
    #[must_use]
    pub fn type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.type_prefixes.push(prefix.into());
        self
    }

    /// Replaces the forbidden type prefix set.
    #[must_use]
    pub fn type_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Classifies `name` against the policy. `scope` is a label such as
    /// `"member "` (or `""`), threaded into every message for context.
    ///
    /// The decision sequence short-circuits: exempt names produce nothing at
    /// all; the separator check supersedes the case check; the type prefix
    /// check runs independently, so one name can collect two violations.
    #[must_use]
    pub fn check(&self, name: &str, scope: &str) -> Vec<NameViolation> {
        if name.is_empty() || self.exempt_names.contains(name) {
            return Vec::new();
        }

        let mut violations = Vec::new();
        let subject = ucfirst(&format!("{scope}variable"));

        if name.contains(&self.separators[..]) {
            if let Some(accessor) = self.denied_direct_access.get(name) {
                violations.push(NameViolation {
                    kind: NameViolationKind::ForbiddenDirectAccess,
                    message: format!(
                        "Direct access to \"{name}\" is not allowed; use {accessor} instead"
                    ),
                });
            } else {
                let suggestion = to_lower_camel(name, &self.separators);
                violations.push(NameViolation {
                    kind: NameViolationKind::ForbiddenSeparator,
                    message: format!(
                        "Separators are not allowed in the {scope}variable name \"{name}\"; \
                         use lowerCamelCase instead, e.g. \"{suggestion}\""
                    ),
                });
            }
        } else if !is_lower_camel(name, &self.separators) {
            let suggestion = to_lower_camel(name, &self.separators);
            violations.push(NameViolation {
                kind: NameViolationKind::NotConventionCase,
                message: format!(
                    "{subject} name must be lowerCamelCase; \
                     expected \"{suggestion}\" but found \"{name}\""
                ),
            });
        }

        for prefix in &self.type_prefixes {
            if let Some(rest) = name.strip_prefix(prefix.as_str()) {
                if rest.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                    let suggestion = to_lower_camel(rest, &self.separators);
                    violations.push(NameViolation {
                        kind: NameViolationKind::TypePrefix,
                        message: format!(
                            "{subject} name must not contain a type prefix; \
                             expected \"{suggestion}\" but found \"{name}\""
                        ),
                    });
                    break;
                }
            }
        }

        violations
    }
}

/// Returns true when `name` is lowerCamelCase: ASCII lowercase initial,
/// alphanumeric throughout, no separators, no consecutive uppercase letters.
#[must_use]
pub fn is_lower_camel(name: &str, separators: &[char]) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_lowercase() {
        return false;
    }
    let mut previous_upper = false;
    for c in chars {
        if separators.contains(&c) || !c.is_ascii_alphanumeric() {
            return false;
        }
        let upper = c.is_ascii_uppercase();
        if upper && previous_upper {
            return false;
        }
        previous_upper = upper;
    }
    true
}

/// Canonical lowerCamelCase normalization: splits on separators, folds
/// uppercase runs (`HTML` becomes `Html`; a run followed by a lowercase
/// letter donates its last letter to the next word), lowercases the first
/// word's initial and capitalizes the rest.
#[must_use]
pub fn to_lower_camel(name: &str, separators: &[char]) -> String {
    let mut out = String::with_capacity(name.len());
    let parts = name
        .split(|c: char| separators.contains(&c))
        .filter(|p| !p.is_empty());
    for (i, part) in parts.enumerate() {
        let folded = fold_uppercase_runs(part);
        if i == 0 {
            out.push_str(&lcfirst(&folded));
        } else {
            out.push_str(&ucfirst(&folded));
        }
    }
    out
}

/// Folds runs of consecutive uppercase letters to `Ucfirst(lowercase(run))`.
fn fold_uppercase_runs(part: &str) -> String {
    let chars: Vec<char> = part.chars().collect();
    let mut out = String::with_capacity(part.len());
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_uppercase() {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < chars.len() && chars[j].is_ascii_uppercase() {
            j += 1;
        }
        if j - i == 1 {
            out.push(chars[i]);
            i = j;
            continue;
        }
        // A run followed by a lowercase letter keeps its last letter as the
        // initial of the next word (HTMLContent -> HtmlContent).
        let followed_by_lower = j < chars.len() && chars[j].is_ascii_lowercase();
        let fold_end = if followed_by_lower { j - 1 } else { j };
        out.push(chars[i]);
        for c in &chars[i + 1..fold_end] {
            out.push(c.to_ascii_lowercase());
        }
        if followed_by_lower {
            out.push(chars[j - 1]);
        }
        i = j;
    }
    out
}

fn lcfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(violations: &[NameViolation]) -> Vec<&'static str> {
        violations.iter().map(|v| v.kind.code()).collect()
    }

    #[test]
    fn exempt_superglobals_pass() {
        let policy = NamingPolicy::default();
        assert!(policy.check("GLOBALS", "").is_empty());
        assert!(policy.check("_SERVER", "").is_empty());
    }

    #[test]
    fn denied_direct_access_wins_over_separator() {
        let policy = NamingPolicy::default();
        let violations = policy.check("_POST", "");
        assert_eq!(codes(&violations), vec!["ForbiddenDirectAccess"]);
        assert!(violations[0].message.contains("Input::post()"));
    }

    #[test]
    fn separator_violation_suggests_camel_case() {
        let policy = NamingPolicy::default();
        let violations = policy.check("my_variable_name", "");
        assert_eq!(codes(&violations), vec!["NameHasForbiddenSeparator"]);
        assert!(violations[0].message.contains("\"myVariableName\""));
    }

    #[test]
    fn uppercase_run_is_folded() {
        let policy = NamingPolicy::default();
        let violations = policy.check("HTMLContent", "");
        assert_eq!(codes(&violations), vec!["NameNotInConventionCase"]);
        assert!(violations[0].message.contains("\"htmlContent\""));
    }

    #[test]
    fn type_prefix_is_stripped() {
        let policy = NamingPolicy::default();
        let violations = policy.check("intCounter", "");
        assert_eq!(codes(&violations), vec!["NameHasTypePrefix"]);
        assert!(violations[0].message.contains("\"counter\""));
    }

    #[test]
    fn separator_and_prefix_violations_stack() {
        let policy = NamingPolicy::default();
        let violations = policy.check("strTable_name", "");
        assert_eq!(
            codes(&violations),
            vec!["NameHasForbiddenSeparator", "NameHasTypePrefix"]
        );
    }

    #[test]
    fn prefix_without_uppercase_is_a_word() {
        let policy = NamingPolicy::default();
        // "interval" starts with "int" but is an ordinary word.
        assert!(policy.check("interval", "").is_empty());
    }

    #[test]
    fn member_scope_label_is_threaded() {
        let policy = NamingPolicy::default();
        let violations = policy.check("str_table", "member ");
        assert!(violations[0]
            .message
            .contains("member variable name \"str_table\""));

        let violations = policy.check("HTMLContent", "member ");
        assert!(violations[0].message.starts_with("Member variable name"));
    }

    #[test]
    fn exemption_short_circuits_prefix_check() {
        let policy = NamingPolicy::default().exempt("strTable");
        assert!(policy.check("strTable", "member ").is_empty());
    }

    #[test]
    fn is_lower_camel_cases() {
        let seps = ['_'];
        assert!(is_lower_camel("myVariableName", &seps));
        assert!(is_lower_camel("a", &seps));
        assert!(is_lower_camel("value2", &seps));
        assert!(!is_lower_camel("MyVariable", &seps));
        assert!(!is_lower_camel("my_variable", &seps));
        assert!(!is_lower_camel("myHTML", &seps));
        assert!(!is_lower_camel("", &seps));
    }

    #[test]
    fn to_lower_camel_unifies_both_normalizations() {
        let seps = ['_'];
        assert_eq!(to_lower_camel("my_small_variable", &seps), "mySmallVariable");
        assert_eq!(to_lower_camel("HTMLContent", &seps), "htmlContent");
        assert_eq!(to_lower_camel("MY_var", &seps), "myVar");
        assert_eq!(to_lower_camel("__trailing__", &seps), "trailing");
        assert_eq!(to_lower_camel("myVar_name", &seps), "myVarName");
        assert_eq!(to_lower_camel("ABC9", &seps), "abc9");
    }
}
