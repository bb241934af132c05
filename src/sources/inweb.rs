use crate::catalog::CatalogSet;
use crate::domain::{IdentifierNamespace, SourceKind};
use crate::error::InteractomeError;
use crate::identifier::extract_first;
use crate::interaction::InteractionRecord;
use crate::score::inweb_scores;
use crate::sources::{Extraction, SourceAdapter, log_skipped};
use crate::table::{RawTable, cell};

const PROVIDER: &str = "inweb";
const PARTNER_A: usize = 0;
const PARTNER_B: usize = 1;
const CONFIDENCE: usize = 14;

/// InWeb InBioMap `core.psimitab`. The layout is positional MITAB: partners
/// in the first two columns, the `score|score` pair in the fifteenth.
#[derive(Debug, Clone, Copy, Default)]
pub struct InwebAdapter;

impl SourceAdapter for InwebAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Inweb
    }

    fn extract(
        &self,
        table: &RawTable,
        _catalogs: &CatalogSet,
    ) -> Result<Extraction, InteractomeError> {
        table.require_width(CONFIDENCE + 1)?;

        let mut extraction = Extraction::default();
        for (index, row) in table.rows().enumerate() {
            let (Some(raw_a), Some(raw_b)) = (cell(row, PARTNER_A), cell(row, PARTNER_B)) else {
                extraction.dropped_rows += 1;
                continue;
            };
            extraction.provider_labels.insert(PROVIDER.to_string());

            let members = extract_first(raw_a, IdentifierNamespace::Uniprotkb).and_then(|first| {
                Ok((first, extract_first(raw_b, IdentifierNamespace::Uniprotkb)?))
            });
            match members {
                Ok((Some(protein_1), Some(protein_2))) => {
                    let (score_1, score_2) = inweb_scores(cell(row, CONFIDENCE));
                    extraction.interactions.push(InteractionRecord::new(
                        protein_1, protein_2, score_1, score_2, PROVIDER,
                    ));
                }
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

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn mitab_row(a: &str, b: &str, score: &str) -> String {
        let mut fields = vec!["-".to_string(); CONFIDENCE + 1];
        fields[PARTNER_A] = a.to_string();
        fields[PARTNER_B] = b.to_string();
        fields[CONFIDENCE] = score.to_string();
        fields.join("\t")
    }

    #[test]
    fn parses_positional_scores() {
        let header = (0..=CONFIDENCE)
            .map(|i| format!("c{i}"))
            .collect::<Vec<_>>()
            .join("\t");
        let data = format!(
            "{header}\n{}\n{}\n",
            mitab_row("uniprotkb:P1", "uniprotkb:P2", "0.25|-"),
            mitab_row("uniprotkb:P3", "uniprotkb:P4", "-"),
        );
        let table = RawTable::from_reader(data.as_bytes(), "inweb", b'\t').unwrap();
        let extraction = InwebAdapter.extract(&table, &CatalogSet::default()).unwrap();
        let scores: Vec<_> = extraction
            .interactions
            .iter()
            .map(|r| (r.score_1, r.score_2))
            .collect();
        assert_eq!(scores, vec![(Some(0.25), Some(0.0)), (Some(0.0), Some(0.0))]);
    }

    #[test]
    fn narrow_table_is_fatal() {
        let table = RawTable::from_reader("a\tb\n".as_bytes(), "inweb", b'\t').unwrap();
        let err = InwebAdapter.extract(&table, &CatalogSet::default()).unwrap_err();
        assert_matches!(err, InteractomeError::MissingColumn { .. });
    }
}
