use std::cmp::Ordering;
use std::collections::HashMap;

use crate::interaction::{InteractionRecord, InteractionSet, UnorderedPair};

/// Collapses permutation-equivalent records into one record per pair.
///
/// Scores become the element-wise maximum over the group. The source label
/// follows the record with the strictly larger `(score_1, score_2)`; on equal
/// scores the label earlier in `precedence` wins, otherwise the first seen
/// label stays. A missing score ranks below any present one.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    precedence: Vec<String>,
}

struct Group {
    record: InteractionRecord,
    best: (Option<f64>, Option<f64>),
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precedence<I, S>(precedence: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            precedence: precedence.into_iter().map(Into::into).collect(),
        }
    }

    pub fn run(&self, set: InteractionSet) -> InteractionSet {
        let before = set.len();
        let mut index: HashMap<UnorderedPair, usize> = HashMap::new();
        let mut groups: Vec<Group> = Vec::new();

        for record in set {
            let record = record.canonical();
            match index.get(&record.pair()) {
                Some(&slot) => self.absorb(&mut groups[slot], record),
                None => {
                    index.insert(record.pair(), groups.len());
                    groups.push(Group {
                        best: (record.score_1, record.score_2),
                        record,
                    });
                }
            }
        }

        let deduplicated: InteractionSet = groups.into_iter().map(|group| group.record).collect();
        tracing::debug!(before, after = deduplicated.len(), "pairs deduplicated");
        deduplicated
    }

    fn absorb(&self, group: &mut Group, incoming: InteractionRecord) {
        let candidate = (incoming.score_1, incoming.score_2);
        let takes_source = match compare_scores(candidate, group.best) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.rank(&incoming.source) < self.rank(&group.record.source),
        };
        if takes_source {
            group.best = candidate;
            group.record.source = incoming.source;
        }
        group.record.score_1 = max_score(group.record.score_1, incoming.score_1);
        group.record.score_2 = max_score(group.record.score_2, incoming.score_2);
    }

    /// Position in the precedence list; unlisted labels rank last and tie with each other.
    fn rank(&self, source: &str) -> usize {
        self.precedence
            .iter()
            .position(|label| label == source)
            .unwrap_or(self.precedence.len())
    }
}

fn compare_scores(left: (Option<f64>, Option<f64>), right: (Option<f64>, Option<f64>)) -> Ordering {
    compare_score(left.0, right.0).then_with(|| compare_score(left.1, right.1))
}

fn compare_score(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (left, right) => left.is_some().cmp(&right.is_some()),
    }
}

fn max_score(left: Option<f64>, right: Option<f64>) -> Option<f64> {
    match (left, right) {
        (Some(left), Some(right)) => Some(left.max(right)),
        (left, right) => left.or(right),
    }
}

/// Deduplicates with first-seen precedence only.
pub fn deduplicate(set: InteractionSet) -> InteractionSet {
    Deduplicator::new().run(set)
}
