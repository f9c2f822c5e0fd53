//! Append-only accumulation of findings during one file's analysis.

use crate::types::Finding;

/// Collects findings in dispatch order for one token stream.
///
/// No deduplication happens here: one token may legitimately receive several
/// findings from different rules. Draining clears the collector so it can be
/// reused for the next file.
#[derive(Debug, Default)]
pub struct FindingCollector {
    findings: Vec<Finding>,
}

impl FindingCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finding.
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Number of findings collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Returns true when nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Takes all findings, leaving the collector empty.
    #[must_use]
    pub fn drain(&mut self) -> Vec<Finding> {
        std::mem::take(&mut self.findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Span;
    use crate::types::Severity;

    fn finding(token_index: usize) -> Finding {
        Finding::new(
            "control-signature",
            "PatternMismatch",
            Severity::Error,
            "layout deviates",
            token_index,
            Span::default(),
        )
    }

    #[test]
    fn drain_returns_in_insertion_order_and_clears() {
        let mut collector = FindingCollector::new();
        collector.push(finding(1));
        collector.push(finding(5));
        collector.push(finding(5));
        assert_eq!(collector.len(), 3);

        let drained = collector.drain();
        assert_eq!(
            drained.iter().map(|f| f.token_index).collect::<Vec<_>>(),
            vec![1, 5, 5]
        );
        assert!(collector.is_empty());
    }

    #[test]
    fn duplicate_token_findings_are_kept() {
        let mut collector = FindingCollector::new();
        collector.push(finding(2));
        collector.push(finding(2));
        assert_eq!(collector.drain().len(), 2);
    }
}
