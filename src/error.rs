use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::CatalogKind;

#[derive(Debug, Error, Diagnostic)]
pub enum InteractomeError {
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(String),

    #[error("invalid accession: {0:?}")]
    InvalidAccession(String),

    #[error("table {table} is missing expected column {column}")]
    MissingColumn { table: String, column: String },

    #[error("no {0} catalog supplied for this run")]
    MissingCatalog(CatalogKind),

    #[error("unknown interaction source: {0}")]
    UnknownSource(String),

    #[error("failed to read table {path}: {message}")]
    TableRead { path: PathBuf, message: String },

    #[error("failed to write table: {0}")]
    TableWrite(String),

    #[error("missing config file kira-im.json in current directory")]
    MissingConfig,

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("download failed: {0}")]
    DownloadHttp(String),

    #[error("download returned status {status}: {message}")]
    DownloadStatus { status: u16, message: String },
}
