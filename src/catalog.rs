use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::domain::{Accession, CatalogKind};
use crate::error::InteractomeError;
use crate::interaction::{InteractionRecord, InteractionSet};
use crate::table::{RawTable, cell};

/// Read-only whitelist of known entities, keyed by UniProt (protein catalog)
/// or Ensembl (gene catalog). Every key resolves to the UniProt accession(s)
/// it stands for.
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    kind: CatalogKind,
    entries: HashMap<Accession, Vec<Accession>>,
}

impl ReferenceCatalog {
    pub fn read(path: &Path, kind: CatalogKind) -> Result<Self, InteractomeError> {
        let table = RawTable::read_delimited(path, &path.display().to_string(), b',')?;
        Self::from_table(&table, kind)
    }

    pub fn from_table(table: &RawTable, kind: CatalogKind) -> Result<Self, InteractomeError> {
        let uniprot = table.column("uniprot")?;
        let key = match kind {
            CatalogKind::Protein => uniprot,
            CatalogKind::Gene => table.column("ensembl")?,
        };

        let mut catalog = Self {
            kind,
            entries: HashMap::new(),
        };
        let mut skipped = 0usize;
        for row in table.rows() {
            let (Some(key), Some(uniprot)) = (cell(row, key), cell(row, uniprot)) else {
                skipped += 1;
                continue;
            };
            match (key.parse(), uniprot.parse()) {
                (Ok(key), Ok(uniprot)) => catalog.insert(key, uniprot),
                _ => skipped += 1,
            }
        }
        tracing::info!(
            kind = %kind,
            entries = catalog.len(),
            skipped,
            "reference catalog loaded"
        );
        Ok(catalog)
    }

    /// Builds a protein catalog directly from accessions.
    pub fn proteins<I: IntoIterator<Item = Accession>>(accessions: I) -> Self {
        let mut catalog = Self {
            kind: CatalogKind::Protein,
            entries: HashMap::new(),
        };
        for accession in accessions {
            catalog.insert(accession.clone(), accession);
        }
        catalog
    }

    /// Builds a gene catalog from `(ensembl, uniprot)` rows; an Ensembl key may repeat.
    pub fn genes<I: IntoIterator<Item = (Accession, Accession)>>(rows: I) -> Self {
        let mut catalog = Self {
            kind: CatalogKind::Gene,
            entries: HashMap::new(),
        };
        for (ensembl, uniprot) in rows {
            catalog.insert(ensembl, uniprot);
        }
        catalog
    }

    fn insert(&mut self, key: Accession, uniprot: Accession) {
        let targets = self.entries.entry(key).or_default();
        if !targets.contains(&uniprot) {
            targets.push(uniprot);
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, accession: &Accession) -> bool {
        self.entries.contains_key(accession)
    }

    /// UniProt accessions a key stands for; empty when the key is unknown.
    pub fn resolve(&self, accession: &Accession) -> &[Accession] {
        self.entries
            .get(accession)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Keeps records whose members both resolve in this catalog, rewriting
    /// members to their UniProt accession.
    ///
    /// A key that resolves to several accessions fans out into one record
    /// per combination; afterwards any row identical in every column to an
    /// earlier one is dropped, so catalog-side duplication never leaks.
    pub fn filter(&self, set: InteractionSet) -> InteractionSet {
        let before = set.len();
        let mut seen = HashSet::new();
        let mut kept = InteractionSet::new();
        for record in set {
            for protein_1 in self.resolve(&record.protein_1) {
                for protein_2 in self.resolve(&record.protein_2) {
                    let candidate = InteractionRecord {
                        protein_1: protein_1.clone(),
                        protein_2: protein_2.clone(),
                        score_1: record.score_1,
                        score_2: record.score_2,
                        source: record.source.clone(),
                    };
                    if seen.insert(row_key(&candidate)) {
                        kept.push(candidate);
                    }
                }
            }
        }
        tracing::debug!(
            kind = %self.kind,
            before,
            after = kept.len(),
            "reference filter applied"
        );
        kept
    }
}

type RowKey = (Accession, Accession, Option<u64>, Option<u64>, String);

fn row_key(record: &InteractionRecord) -> RowKey {
    (
        record.protein_1.clone(),
        record.protein_2.clone(),
        record.score_1.map(f64::to_bits),
        record.score_2.map(f64::to_bits),
        record.source.clone(),
    )
}

/// The catalogs supplied for one run.
#[derive(Debug, Clone, Default)]
pub struct CatalogSet {
    pub protein: Option<ReferenceCatalog>,
    pub gene: Option<ReferenceCatalog>,
}

impl CatalogSet {
    pub fn get(&self, kind: CatalogKind) -> Result<&ReferenceCatalog, InteractomeError> {
        let catalog = match kind {
            CatalogKind::Protein => self.protein.as_ref(),
            CatalogKind::Gene => self.gene.as_ref(),
        };
        catalog.ok_or(InteractomeError::MissingCatalog(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acc(value: &str) -> Accession {
        value.parse().unwrap()
    }

    fn record(a: &str, b: &str) -> InteractionRecord {
        InteractionRecord::new(acc(a), acc(b), 0.5, 0.5, "intact")
    }

    #[test]
    fn protein_filter_requires_both_members() {
        let catalog = ReferenceCatalog::proteins([acc("P1"), acc("P2")]);
        let set = InteractionSet::from(vec![record("P1", "P2"), record("P1", "P9")]);
        let kept = catalog.filter(set);
        assert_eq!(kept.len(), 1);
        assert!(kept.iter().all(|r| catalog.contains(&r.protein_1) && catalog.contains(&r.protein_2)));
    }

    #[test]
    fn duplicated_catalog_rows_do_not_fan_out() {
        let data = "uniprot,name\nP1,a\nP1,a\nP2,b\n";
        let table = RawTable::from_reader(data.as_bytes(), "protein", b',').unwrap();
        let catalog = ReferenceCatalog::from_table(&table, CatalogKind::Protein).unwrap();
        let kept = catalog.filter(InteractionSet::from(vec![record("P1", "P2")]));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn gene_filter_translates_to_uniprot() {
        let catalog = ReferenceCatalog::genes([
            (acc("ENSG1"), acc("P1")),
            (acc("ENSG2"), acc("P2")),
            (acc("ENSG2"), acc("P3")),
        ]);
        let kept = catalog.filter(InteractionSet::from(vec![record("ENSG1", "ENSG2")]));
        let members: Vec<_> = kept
            .iter()
            .map(|r| (r.protein_1.as_str(), r.protein_2.as_str()))
            .collect();
        assert_eq!(members, vec![("P1", "P2"), ("P1", "P3")]);
    }

    #[test]
    fn missing_catalog_is_reported() {
        let catalogs = CatalogSet::default();
        assert!(matches!(
            catalogs.get(CatalogKind::Gene),
            Err(InteractomeError::MissingCatalog(CatalogKind::Gene))
        ));
    }
}
