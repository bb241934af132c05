use std::path::Path;
use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use serde::Serialize;

use crate::acquire::{InwebClient, acquire_inweb};
use crate::catalog::{CatalogSet, ReferenceCatalog};
use crate::complex::ComplexMembership;
use crate::config::{ResolvedConfig, SourceRequest};
use crate::dedup::Deduplicator;
use crate::domain::{CatalogKind, SourceKind};
use crate::error::InteractomeError;
use crate::interaction::{InteractionSet, read_interactions};
use crate::merge::{combine, only_noncomplex, overlay_curated, remove_listed, shared_pairs};
use crate::output::{OutputSchema, TableWriter};
use crate::sources::{SourceBatch, SourceSummary, adapter_for, run_adapter};
use crate::table::RawTable;
use crate::validation::SourceCoverageWarning;

pub const COMBINED_FILE: &str = "interactions_combined.csv";
pub const NONCOMPLEX_FILE: &str = "no_complex_interactions.csv";
pub const CLEAN_FILE: &str = "clean_interactions.csv";
pub const FINAL_FILE: &str = "interaction.csv";

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: String,
    pub sources: Vec<SourceSummary>,
    pub combined: usize,
    pub complex_excluded: usize,
    pub blacklisted: usize,
    pub curated: usize,
    pub interactions: usize,
    pub output_path: String,
    pub warnings: Vec<SourceCoverageWarning>,
}

/// Reads one raw dump and runs it through its adapter, reference filter and deduplicator.
pub fn load_source(
    kind: SourceKind,
    path: &Path,
    catalogs: &CatalogSet,
    dedup: &Deduplicator,
) -> Result<SourceBatch, InteractomeError> {
    let table = RawTable::read_tsv(path, kind.as_str())?;
    let adapter = adapter_for(kind);
    run_adapter(adapter.as_ref(), &table, catalogs, dedup)
}

/// The whole integration run, driven by one [`ResolvedConfig`].
pub struct Pipeline<C: InwebClient> {
    config: ResolvedConfig,
    inweb: C,
}

impl<C: InwebClient> Pipeline<C> {
    pub fn new(config: ResolvedConfig, inweb: C) -> Self {
        Self { config, inweb }
    }

    /// Runs every stage in memory and only then writes tables, so a failing
    /// stage leaves `output_dir` untouched.
    pub fn run(&self, sink: &dyn ProgressSink) -> Result<RunReport, InteractomeError> {
        let start = Instant::now();
        let catalogs = self.load_catalogs(sink)?;
        let dedup = Deduplicator::with_precedence(self.config.source_precedence.clone());

        let mut pending = Vec::new();
        let mut summaries = Vec::new();
        let mut combined: Option<InteractionSet> = None;
        for request in &self.config.sources {
            let batch = self.run_source(request, &catalogs, &dedup, sink)?;
            self.stage(&mut pending, request.schema, &batch.interactions, &request.output);
            summaries.push(batch.summary);
            combined = Some(match combined {
                None => batch.interactions,
                Some(primary) => {
                    let overlap = shared_pairs(&primary, &batch.interactions);
                    tracing::info!(source = %request.kind, overlap, "merging into combined set");
                    combine(primary, batch.interactions)
                }
            });
        }
        let mut interactions = combined.unwrap_or_default();
        let combined_len = interactions.len();
        self.stage(&mut pending, OutputSchema::Interactions, &interactions, COMBINED_FILE);

        let mut complex_excluded = 0;
        if let Some(name) = &self.config.complexes {
            sink.event(phase("Filter; excluding complex members"));
            let membership = ComplexMembership::read(self.config.locate(name).as_std_path())?;
            let before = interactions.len();
            interactions = only_noncomplex(interactions, &membership);
            complex_excluded = before - interactions.len();
            self.stage(&mut pending, OutputSchema::Interactions, &interactions, NONCOMPLEX_FILE);
        }

        let mut blacklisted = 0;
        if let Some(name) = &self.config.blacklist {
            sink.event(phase("Filter; removing blacklisted pairs"));
            let blacklist = read_interactions(self.config.locate(name).as_std_path())?;
            let before = interactions.len();
            interactions = remove_listed(interactions, &blacklist);
            blacklisted = before - interactions.len();
            self.stage(&mut pending, OutputSchema::Interactions, &interactions, CLEAN_FILE);
        }

        let mut curated = 0;
        let mut schema = OutputSchema::Interactions;
        if let Some(name) = &self.config.curated {
            sink.event(phase("Merge; appending curated interactions"));
            let curated_set = read_interactions(self.config.locate(name).as_std_path())?;
            curated = curated_set.len();
            interactions = overlay_curated(interactions, curated_set);
            schema = OutputSchema::Multidata;
        }

        let output_path = self.config.output_path(FINAL_FILE);
        sink.event(phase("Store; writing interaction tables"));
        for table in &pending {
            TableWriter::new(table.schema).write(&table.interactions, &table.path)?;
        }
        TableWriter::new(schema)
            .with_precision(self.config.float_precision)
            .write(&interactions, &output_path)?;
        sink.event(ProgressEvent {
            message: format!("phase=Done; {} interactions", interactions.len()),
            elapsed: Some(start.elapsed()),
        });

        let warnings = summaries
            .iter()
            .filter_map(|summary| summary.coverage.clone())
            .collect();
        Ok(RunReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            sources: summaries,
            combined: combined_len,
            complex_excluded,
            blacklisted,
            curated,
            interactions: interactions.len(),
            output_path: output_path.to_string(),
            warnings,
        })
    }

    pub fn load_catalogs(&self, sink: &dyn ProgressSink) -> Result<CatalogSet, InteractomeError> {
        sink.event(phase("Resolve; loading reference catalogs"));
        let load = |name: &Option<String>, kind: CatalogKind| {
            name.as_deref()
                .map(|name| ReferenceCatalog::read(self.config.locate(name).as_std_path(), kind))
                .transpose()
        };
        Ok(CatalogSet {
            protein: load(&self.config.protein_catalog, CatalogKind::Protein)?,
            gene: load(&self.config.gene_catalog, CatalogKind::Gene)?,
        })
    }

    pub fn run_source(
        &self,
        request: &SourceRequest,
        catalogs: &CatalogSet,
        dedup: &Deduplicator,
        sink: &dyn ProgressSink,
    ) -> Result<SourceBatch, InteractomeError> {
        let path = self.source_path(request, sink)?;
        sink.event(phase(&format!("Parse; {} from {}", request.kind, path)));
        let start = Instant::now();
        let batch = load_source(request.kind, path.as_std_path(), catalogs, dedup)?;
        sink.event(ProgressEvent {
            message: format!(
                "phase=Dedup; {} yielded {} interactions",
                request.kind,
                batch.interactions.len()
            ),
            elapsed: Some(start.elapsed()),
        });
        Ok(batch)
    }

    fn source_path(
        &self,
        request: &SourceRequest,
        sink: &dyn ProgressSink,
    ) -> Result<Utf8PathBuf, InteractomeError> {
        if let Some(name) = &request.input {
            return Ok(self.config.locate(name));
        }
        sink.event(phase("Acquire; downloading InWeb InBioMap"));
        let work_dir = self.config.output_dir.join("temp");
        let core = acquire_inweb(&self.inweb, work_dir.as_std_path())?;
        Utf8PathBuf::from_path_buf(core)
            .map_err(|_| InteractomeError::Filesystem("non-utf8 download path".to_string()))
    }

    fn stage(
        &self,
        pending: &mut Vec<PendingTable>,
        schema: OutputSchema,
        interactions: &InteractionSet,
        name: &str,
    ) {
        if self.config.write_intermediates {
            pending.push(PendingTable {
                schema,
                interactions: interactions.clone(),
                path: self.config.output_path(name),
            });
        }
    }
}

/// An intermediate table held back until the whole run has succeeded.
struct PendingTable {
    schema: OutputSchema,
    interactions: InteractionSet,
    path: Utf8PathBuf,
}

fn phase(message: &str) -> ProgressEvent {
    ProgressEvent {
        message: format!("phase={message}"),
        elapsed: None,
    }
}
