use crate::catalog::CatalogSet;
use crate::domain::{IdentifierNamespace, SourceKind};
use crate::error::InteractomeError;
use crate::identifier::extract_first;
use crate::interaction::InteractionRecord;
use crate::score::INNATEDB_SCORES;
use crate::sources::{Extraction, SourceAdapter, log_skipped};
use crate::table::{RawTable, cell};

const PROVIDER: &str = "innatedb";

/// InnateDB curated export. Partners are Ensembl genes taken from
/// `alt_identifier_A`/`alt_identifier_B`; the gene catalog later maps them
/// to UniProt. Rows carry the sentinel scores from [`INNATEDB_SCORES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InnateDbAdapter;

impl SourceAdapter for InnateDbAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Innatedb
    }

    fn extract(
        &self,
        table: &RawTable,
        _catalogs: &CatalogSet,
    ) -> Result<Extraction, InteractomeError> {
        let gene_a = table.column("alt_identifier_A")?;
        let gene_b = table.column("alt_identifier_B")?;
        let (score_1, score_2) = INNATEDB_SCORES;

        let mut extraction = Extraction::default();
        for (index, row) in table.rows().enumerate() {
            let (Some(raw_a), Some(raw_b)) = (cell(row, gene_a), cell(row, gene_b)) else {
                extraction.dropped_rows += 1;
                continue;
            };
            extraction.provider_labels.insert(PROVIDER.to_string());

            let members = extract_first(raw_a, IdentifierNamespace::Ensembl).and_then(|first| {
                Ok((first, extract_first(raw_b, IdentifierNamespace::Ensembl)?))
            });
            match members {
                Ok((Some(gene_1), Some(gene_2))) => extraction.interactions.push(
                    InteractionRecord::new(gene_1, gene_2, score_1, score_2, PROVIDER),
                ),
                Ok(_) => extraction.unresolved_rows += 1,
                Err(err) => {
                    log_skipped(table, index + 2, &err);
                    extraction.skipped_rows += 1;
                }
            }
        }
        Ok(extraction)
    }
}
