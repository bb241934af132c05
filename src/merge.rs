use std::collections::HashSet;

use crate::complex::ComplexMembership;
use crate::interaction::{InteractionRecord, InteractionSet};

/// All of `primary`, then every record of `secondary` whose pair is absent
/// from `primary`. Membership is by unordered pair only; records are never
/// edited and `secondary` is not deduplicated against itself.
pub fn combine(primary: InteractionSet, secondary: InteractionSet) -> InteractionSet {
    let known = primary.pairs();
    let primary_len = primary.len();
    let mut combined = primary;
    let mut admitted = 0usize;
    for record in secondary {
        if !known.contains(&record.pair()) {
            combined.push(record);
            admitted += 1;
        }
    }
    tracing::debug!(primary = primary_len, admitted, "interaction sets combined");
    combined
}

/// Drops every candidate whose pair appears in `blacklist`, in either orientation.
pub fn remove_listed(candidates: InteractionSet, blacklist: &InteractionSet) -> InteractionSet {
    let banned = blacklist.pairs();
    let before = candidates.len();
    let kept: InteractionSet = candidates
        .into_iter()
        .filter(|record| !banned.contains(&record.pair()))
        .collect();
    tracing::debug!(before, removed = before - kept.len(), "blacklist applied");
    kept
}

/// Appends curated rows after the derived ones without deduplication.
/// Curated rows may repeat or shadow derived pairs.
pub fn overlay_curated(derived: InteractionSet, curated: InteractionSet) -> InteractionSet {
    let shadowed = {
        let derived_pairs = derived.pairs();
        curated
            .iter()
            .filter(|record| derived_pairs.contains(&record.pair()))
            .count()
    };
    if shadowed > 0 {
        tracing::info!(shadowed, "curated rows repeat derived pairs");
    }
    derived.into_iter().chain(curated).collect()
}

/// Drops interactions where either member takes part in a known complex.
pub fn only_noncomplex(set: InteractionSet, complexes: &ComplexMembership) -> InteractionSet {
    set.into_iter()
        .filter(|record| !involves_complex(record, complexes))
        .collect()
}

fn involves_complex(record: &InteractionRecord, complexes: &ComplexMembership) -> bool {
    complexes.contains(&record.protein_1) || complexes.contains(&record.protein_2)
}

/// Pairs present in both sets, useful when auditing overlaps between sources.
pub fn shared_pairs(left: &InteractionSet, right: &InteractionSet) -> usize {
    let right: HashSet<_> = right.pairs();
    left.pairs().intersection(&right).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Accession;

    fn record(a: &str, b: &str, score: f64, source: &str) -> InteractionRecord {
        let a: Accession = a.parse().unwrap();
        let b: Accession = b.parse().unwrap();
        InteractionRecord::new(a, b, score, score, source)
    }

    #[test]
    fn combine_keeps_primary_and_admits_new_pairs() {
        let a = InteractionSet::from(vec![record("P1", "P2", 0.9, "intact")]);
        let b = InteractionSet::from(vec![
            record("P2", "P1", 0.1, "inweb"),
            record("P3", "P4", 0.2, "inweb"),
        ]);
        let out = combine(a, b);
        assert_eq!(
            out.records(),
            &[record("P1", "P2", 0.9, "intact"), record("P3", "P4", 0.2, "inweb")]
        );
    }

    #[test]
    fn combine_with_itself_is_identity() {
        let a = InteractionSet::from(vec![
            record("P1", "P2", 0.9, "intact"),
            record("P3", "P4", 0.2, "intact"),
        ]);
        assert_eq!(combine(a.clone(), a.clone()), a);
    }

    #[test]
    fn removal_is_symmetric() {
        let candidates = InteractionSet::from(vec![
            record("P4", "P3", 0.5, "intact"),
            record("P5", "P6", 0.5, "intact"),
        ]);
        let blacklist = InteractionSet::from(vec![record("P3", "P4", 0.0, "")]);
        let out = remove_listed(candidates, &blacklist);
        assert_eq!(out.records(), &[record("P5", "P6", 0.5, "intact")]);
    }

    #[test]
    fn overlay_concatenates_without_dedup() {
        let derived = InteractionSet::from(vec![record("P1", "P2", 0.5, "intact")]);
        let curated = InteractionSet::from(vec![record("P2", "P1", 1.0, "curated")]);
        let out = overlay_curated(derived, curated);
        assert_eq!(out.len(), 2);
        assert_eq!(out.records()[1].source, "curated");
    }

    #[test]
    fn noncomplex_filter() {
        let complexes = ComplexMembership::from_accessions(["P2".parse().unwrap()]);
        let set = InteractionSet::from(vec![
            record("P1", "P2", 0.5, "inweb"),
            record("P3", "P4", 0.5, "inweb"),
        ]);
        let out = only_noncomplex(set, &complexes);
        assert_eq!(out.records(), &[record("P3", "P4", 0.5, "inweb")]);
    }

    #[test]
    fn shared_pairs_counts_overlap() {
        let a = InteractionSet::from(vec![record("P1", "P2", 0.5, "a")]);
        let b = InteractionSet::from(vec![record("P2", "P1", 0.5, "b"), record("P7", "P8", 0.1, "b")]);
        assert_eq!(shared_pairs(&a, &b), 1);
    }
}
