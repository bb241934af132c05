use crate::catalog::{CatalogSet, ReferenceCatalog};
use crate::domain::{Accession, IdentifierNamespace, SourceKind};
use crate::error::InteractomeError;
use crate::identifier::{extract_accession, extract_all};
use crate::interaction::InteractionRecord;
use crate::score::imex_score;
use crate::sources::{Extraction, SourceAdapter, log_skipped};
use crate::table::{RawTable, cell};

const FALLBACK_PROVIDER: &str = "imex";

/// IMEx consortium dump (IntAct, MINT, DIP, ...), pre-renamed to columns
/// `A`, `B`, `altA`, `altB`, `confidenceScore`, `provider`.
///
/// Each partner comes from its UniProt-qualified primary identifier; when
/// the primary is of another namespace, the Ensembl identifiers in the
/// alternate column are resolved through the gene catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImexAdapter;

struct Columns {
    a: usize,
    b: usize,
    alt_a: usize,
    alt_b: usize,
    score: usize,
    provider: usize,
}

impl Columns {
    fn locate(table: &RawTable) -> Result<Self, InteractomeError> {
        Ok(Self {
            a: table.column("A")?,
            b: table.column("B")?,
            alt_a: table.column("altA")?,
            alt_b: table.column("altB")?,
            score: table.column("confidenceScore")?,
            provider: table.column("provider")?,
        })
    }
}

impl SourceAdapter for ImexAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Imex
    }

    fn extract(
        &self,
        table: &RawTable,
        catalogs: &CatalogSet,
    ) -> Result<Extraction, InteractomeError> {
        let columns = Columns::locate(table)?;
        let genes = catalogs.gene.as_ref();
        if genes.is_none() {
            tracing::info!("no gene catalog supplied; Ensembl fallback disabled for IMEx");
        }

        let mut extraction = Extraction::default();
        for (index, row) in table.rows().enumerate() {
            let (Some(raw_a), Some(raw_b)) = (cell(row, columns.a), cell(row, columns.b)) else {
                extraction.dropped_rows += 1;
                continue;
            };
            let provider = cell(row, columns.provider).unwrap_or(FALLBACK_PROVIDER);
            extraction.provider_labels.insert(provider.to_string());

            let members = resolve_member(raw_a, cell(row, columns.alt_a), genes).and_then(
                |first| Ok((first, resolve_member(raw_b, cell(row, columns.alt_b), genes)?)),
            );
            let (first, second) = match members {
                Ok(members) => members,
                Err(err) => {
                    log_skipped(table, index + 2, &err);
                    extraction.skipped_rows += 1;
                    continue;
                }
            };
            if first.is_empty() || second.is_empty() {
                extraction.unresolved_rows += 1;
                continue;
            }

            let score = imex_score(cell(row, columns.score));
            for protein_1 in &first {
                for protein_2 in &second {
                    extraction.interactions.push(InteractionRecord::new(
                        protein_1.clone(),
                        protein_2.clone(),
                        score,
                        score,
                        provider,
                    ));
                }
            }
        }
        Ok(extraction)
    }
}

/// UniProt accession of the primary identifier, or the UniProt accessions
/// the alternate Ensembl identifiers map to.
fn resolve_member(
    primary: &str,
    alternate: Option<&str>,
    genes: Option<&ReferenceCatalog>,
) -> Result<Vec<Accession>, InteractomeError> {
    if let Some(accession) = extract_accession(primary, IdentifierNamespace::Uniprotkb)? {
        return Ok(vec![accession]);
    }
    let (Some(alternate), Some(genes)) = (alternate, genes) else {
        return Ok(Vec::new());
    };

    let mut resolved: Vec<Accession> = Vec::new();
    for ensembl in extract_all(alternate, IdentifierNamespace::Ensembl)? {
        for uniprot in genes.resolve(&ensembl) {
            if !resolved.contains(uniprot) {
                resolved.push(uniprot.clone());
            }
        }
    }
    Ok(resolved)
}
