use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::Accession;
use crate::error::InteractomeError;
use crate::score::parse_score;
use crate::table::open_maybe_gz;

/// One canonical interaction row.
///
/// Derived records always carry both scores. Rows read back from a table
/// without score cells (curated lists, blacklists) leave them `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub protein_1: Accession,
    pub protein_2: Accession,
    pub score_1: Option<f64>,
    pub score_2: Option<f64>,
    pub source: String,
}

impl InteractionRecord {
    pub fn new(
        protein_1: Accession,
        protein_2: Accession,
        score_1: f64,
        score_2: f64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            protein_1,
            protein_2,
            score_1: Some(score_1),
            score_2: Some(score_2),
            source: source.into(),
        }
    }

    pub fn pair(&self) -> UnorderedPair {
        UnorderedPair::new(self.protein_1.clone(), self.protein_2.clone())
    }

    /// Same record with the lexicographically smaller accession first. Scores
    /// describe the interaction, not a member, so they stay in place.
    pub fn canonical(mut self) -> Self {
        if self.protein_2 < self.protein_1 {
            std::mem::swap(&mut self.protein_1, &mut self.protein_2);
        }
        self
    }
}

/// `{a, b}` with member order erased: stored smaller-first so equality and
/// hashing are structural.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnorderedPair {
    low: Accession,
    high: Accession,
}

impl UnorderedPair {
    pub fn new(a: Accession, b: Accession) -> Self {
        if b < a {
            Self { low: b, high: a }
        } else {
            Self { low: a, high: b }
        }
    }

    pub fn low(&self) -> &Accession {
        &self.low
    }
}

/// Ordered interaction rows. Raw and intermediate sets may hold permutation
/// duplicates; sets produced by the deduplicator never do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionSet {
    records: Vec<InteractionRecord>,
}

impl InteractionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: InteractionRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InteractionRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn pairs(&self) -> HashSet<UnorderedPair> {
        self.records.iter().map(InteractionRecord::pair).collect()
    }

    pub fn sources(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .map(|record| record.source.clone())
            .collect()
    }
}

impl From<Vec<InteractionRecord>> for InteractionSet {
    fn from(records: Vec<InteractionRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<InteractionRecord> for InteractionSet {
    fn from_iter<T: IntoIterator<Item = InteractionRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for InteractionSet {
    type Item = InteractionRecord;
    type IntoIter = std::vec::IntoIter<InteractionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a InteractionSet {
    type Item = &'a InteractionRecord;
    type IntoIter = std::slice::Iter<'a, InteractionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Row shape of every canonical interaction table this crate reads back:
/// derived outputs, blacklists and curated lists.
#[derive(Debug, Deserialize)]
struct InteractionRow {
    #[serde(alias = "uniprot_1", alias = "multidata_name_1")]
    protein_1: String,
    #[serde(alias = "uniprot_2", alias = "multidata_name_2")]
    protein_2: String,
    #[serde(default)]
    score_1: Option<String>,
    #[serde(default)]
    score_2: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

const MEMBER_COLUMNS: [[&str; 3]; 2] = [
    ["protein_1", "uniprot_1", "multidata_name_1"],
    ["protein_2", "uniprot_2", "multidata_name_2"],
];

/// Reads a comma-separated canonical interaction table.
pub fn read_interactions(path: &Path) -> Result<InteractionSet, InteractomeError> {
    let reader = open_maybe_gz(path)?;
    read_interactions_from(reader, &path.display().to_string()).map_err(|err| match err {
        InteractomeError::TableRead { message, .. } => InteractomeError::TableRead {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

pub fn read_interactions_from<R: std::io::Read>(
    reader: R,
    name: &str,
) -> Result<InteractionSet, InteractomeError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|err| InteractomeError::TableRead {
            path: name.into(),
            message: err.to_string(),
        })?
        .clone();
    for aliases in MEMBER_COLUMNS {
        if !headers.iter().any(|header| aliases.contains(&header)) {
            return Err(InteractomeError::MissingColumn {
                table: name.to_string(),
                column: aliases[0].to_string(),
            });
        }
    }

    let mut set = InteractionSet::new();
    for row in reader.deserialize::<InteractionRow>() {
        let row = row.map_err(|err| InteractomeError::TableRead {
            path: name.into(),
            message: err.to_string(),
        })?;
        let score = |value: &Option<String>| value.as_deref().and_then(parse_score);
        set.push(InteractionRecord {
            protein_1: row.protein_1.parse()?,
            protein_2: row.protein_2.parse()?,
            score_1: score(&row.score_1),
            score_2: score(&row.score_2),
            source: row.source.unwrap_or_default(),
        });
    }
    Ok(set)
}
