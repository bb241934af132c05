//! Source adapters: one per provider dump, each a pure transform from a raw
//! table to canonical interaction records.
//!
//! Adapters only parse. [`run_adapter`] drives the shared tail of every
//! source: reference filter, pair deduplication and the coverage check.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::catalog::CatalogSet;
use crate::dedup::Deduplicator;
use crate::domain::SourceKind;
use crate::error::InteractomeError;
use crate::interaction::InteractionSet;
use crate::table::RawTable;
use crate::validation::{SourceCoverageWarning, check_source_coverage};

pub mod imex;
pub mod innatedb;
pub mod inweb;

pub use imex::ImexAdapter;
pub use innatedb::InnateDbAdapter;
pub use inweb::InwebAdapter;

pub trait SourceAdapter {
    fn kind(&self) -> SourceKind;

    /// Parses rows into candidate records. Row-scoped failures are counted
    /// in [`Extraction::skipped_rows`]; only table-level problems fail.
    fn extract(
        &self,
        table: &RawTable,
        catalogs: &CatalogSet,
    ) -> Result<Extraction, InteractomeError>;
}

#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub interactions: InteractionSet,
    /// Provider labels seen on rows that had both partners.
    pub provider_labels: BTreeSet<String>,
    /// Rows lacking one of the two partners.
    pub dropped_rows: usize,
    /// Rows with a malformed identifier.
    pub skipped_rows: usize,
    /// Rows whose identifiers were of another namespace or had no lookup hit.
    pub unresolved_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub source: SourceKind,
    pub raw_rows: usize,
    pub dropped_rows: usize,
    pub skipped_rows: usize,
    pub unresolved_rows: usize,
    pub extracted: usize,
    pub in_catalog: usize,
    pub interactions: usize,
    pub coverage: Option<SourceCoverageWarning>,
}

#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub interactions: InteractionSet,
    pub summary: SourceSummary,
}

pub fn adapter_for(kind: SourceKind) -> Box<dyn SourceAdapter> {
    match kind {
        SourceKind::Imex => Box::new(ImexAdapter),
        SourceKind::Innatedb => Box::new(InnateDbAdapter),
        SourceKind::Inweb => Box::new(InwebAdapter),
    }
}

/// Extract, filter against the adapter's catalog, then deduplicate.
pub fn run_adapter(
    adapter: &dyn SourceAdapter,
    table: &RawTable,
    catalogs: &CatalogSet,
    dedup: &Deduplicator,
) -> Result<SourceBatch, InteractomeError> {
    let kind = adapter.kind();
    let catalog = catalogs.get(kind.catalog_kind())?;

    let extraction = adapter.extract(table, catalogs)?;
    let extracted = extraction.interactions.len();
    let filtered = catalog.filter(extraction.interactions);
    let in_catalog = filtered.len();
    let interactions = dedup.run(filtered);
    let coverage = check_source_coverage(kind.as_str(), &extraction.provider_labels, &interactions);

    tracing::info!(
        source = %kind,
        raw_rows = table.len(),
        dropped = extraction.dropped_rows,
        skipped = extraction.skipped_rows,
        unresolved = extraction.unresolved_rows,
        extracted,
        in_catalog,
        interactions = interactions.len(),
        "source processed"
    );

    Ok(SourceBatch {
        summary: SourceSummary {
            source: kind,
            raw_rows: table.len(),
            dropped_rows: extraction.dropped_rows,
            skipped_rows: extraction.skipped_rows,
            unresolved_rows: extraction.unresolved_rows,
            extracted,
            in_catalog,
            interactions: interactions.len(),
            coverage,
        },
        interactions,
    })
}

/// Records a malformed-identifier row and moves on.
pub(crate) fn log_skipped(table: &RawTable, line: usize, err: &InteractomeError) {
    tracing::debug!(table = table.name(), line, error = %err, "row skipped");
}
