use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::interaction::InteractionSet;

/// Provider labels present in a raw dump that no longer appear after
/// filtering and deduplication. Reported, never fatal: filtering can
/// legitimately remove a provider's whole contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCoverageWarning {
    pub table: String,
    pub missing: Vec<String>,
}

impl fmt::Display for SourceCoverageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: sources absent from output: {}",
            self.table,
            self.missing.join(", ")
        )
    }
}

pub fn check_source_coverage(
    table: &str,
    raw_labels: &BTreeSet<String>,
    output: &InteractionSet,
) -> Option<SourceCoverageWarning> {
    let produced = output.sources();
    let missing: Vec<String> = raw_labels.difference(&produced).cloned().collect();
    if missing.is_empty() {
        return None;
    }
    let warning = SourceCoverageWarning {
        table: table.to_string(),
        missing,
    };
    tracing::warn!(table, missing = ?warning.missing, "some sources did not reach the output");
    Some(warning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::InteractionRecord;

    #[test]
    fn reports_vanished_sources() {
        let raw: BTreeSet<String> = ["intact", "mint"].into_iter().map(String::from).collect();
        let output = InteractionSet::from(vec![InteractionRecord::new(
            "P1".parse().unwrap(),
            "P2".parse().unwrap(),
            0.5,
            0.5,
            "intact",
        )]);
        let warning = check_source_coverage("imex", &raw, &output).unwrap();
        assert_eq!(warning.missing, vec!["mint".to_string()]);
        assert!(warning.to_string().contains("mint"));
    }

    #[test]
    fn full_coverage_is_silent() {
        let raw = BTreeSet::new();
        assert!(check_source_coverage("inweb", &raw, &InteractionSet::new()).is_none());
    }
}
