use std::io::{self, Write};

use camino::Utf8Path;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::app::{ProgressEvent, ProgressSink, RunReport};
use crate::error::InteractomeError;
use crate::fs_util::write_atomic;
use crate::interaction::{InteractionRecord, InteractionSet};

/// Column layout of a written interaction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputSchema {
    /// `protein_1, protein_2, score_1, score_2, source`
    Interactions,
    /// `uniprot_1, uniprot_2, source`, for sources without a true score.
    Pairs,
    /// `multidata_name_1, multidata_name_2, score_1, score_2, source`
    Multidata,
}

impl OutputSchema {
    fn header(&self) -> &'static [&'static str] {
        match self {
            OutputSchema::Interactions => &["protein_1", "protein_2", "score_1", "score_2", "source"],
            OutputSchema::Pairs => &["uniprot_1", "uniprot_2", "source"],
            OutputSchema::Multidata => &[
                "multidata_name_1",
                "multidata_name_2",
                "score_1",
                "score_2",
                "source",
            ],
        }
    }

    fn row(&self, record: &InteractionRecord, precision: Option<usize>) -> Vec<String> {
        let members = [record.protein_1.to_string(), record.protein_2.to_string()];
        match self {
            OutputSchema::Pairs => members
                .into_iter()
                .chain([record.source.clone()])
                .collect(),
            OutputSchema::Interactions | OutputSchema::Multidata => members
                .into_iter()
                .chain([
                    format_score(record.score_1, precision),
                    format_score(record.score_2, precision),
                    record.source.clone(),
                ])
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TableWriter {
    schema: OutputSchema,
    precision: Option<usize>,
}

impl TableWriter {
    pub fn new(schema: OutputSchema) -> Self {
        Self {
            schema,
            precision: None,
        }
    }

    /// Fixed number of decimals for score columns, as used for the final artifact.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn write_to<W: Write>(&self, set: &InteractionSet, writer: W) -> Result<(), InteractomeError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer
            .write_record(self.schema.header())
            .map_err(|err| InteractomeError::TableWrite(err.to_string()))?;
        for record in set {
            writer
                .write_record(self.schema.row(record, self.precision))
                .map_err(|err| InteractomeError::TableWrite(err.to_string()))?;
        }
        writer
            .flush()
            .map_err(|err| InteractomeError::TableWrite(err.to_string()))?;
        Ok(())
    }

    pub fn write(&self, set: &InteractionSet, path: &Utf8Path) -> Result<(), InteractomeError> {
        write_atomic(path, |file| self.write_to(set, file))?;
        tracing::info!(path = %path, rows = set.len(), "table written");
        Ok(())
    }
}

/// Absent scores are written as empty cells.
fn format_score(value: Option<f64>, precision: Option<usize>) -> String {
    match (value, precision) {
        (None, _) => String::new(),
        (Some(value), Some(precision)) => format!("{value:.precision$}"),
        (Some(value), None) => value.to_string(),
    }
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_run(report: &RunReport) -> io::Result<()> {
        Self::print_json(report)
    }

    pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

/// Forwards progress events to the tracing subscriber.
pub struct LogSink;

impl ProgressSink for LogSink {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => {
                tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "{}", event.message)
            }
            None => tracing::info!("{}", event.message),
        }
    }
}
