use std::fs;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::domain::SourceKind;
use crate::error::InteractomeError;
use crate::output::OutputSchema;

pub const DEFAULT_CONFIG_FILE: &str = "kira-im.json";

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub protein_catalog: Option<String>,
    #[serde(default)]
    pub gene_catalog: Option<String>,
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
    #[serde(default)]
    pub blacklist: Option<String>,
    #[serde(default)]
    pub curated: Option<String>,
    #[serde(default)]
    pub complexes: Option<String>,
    #[serde(default)]
    pub source_precedence: Vec<String>,
    #[serde(default)]
    pub float_precision: Option<usize>,
    #[serde(default)]
    pub write_intermediates: Option<bool>,
}

/// `"imex:interactions.txt"` or a detailed object.
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SourceEntry {
    Shorthand(String),
    Detailed(SourceEntryObject),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SourceEntryObject {
    pub kind: SourceKind,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub schema: Option<OutputSchema>,
}

#[derive(Debug, Clone)]
pub struct SourceRequest {
    pub kind: SourceKind,
    /// `None` means acquire the dump over the network (InWeb only).
    pub input: Option<String>,
    pub output: String,
    pub schema: OutputSchema,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub data_dir: Utf8PathBuf,
    pub output_dir: Utf8PathBuf,
    pub protein_catalog: Option<String>,
    pub gene_catalog: Option<String>,
    pub sources: Vec<SourceRequest>,
    pub blacklist: Option<String>,
    pub curated: Option<String>,
    pub complexes: Option<String>,
    pub source_precedence: Vec<String>,
    pub float_precision: usize,
    pub write_intermediates: bool,
}

impl ResolvedConfig {
    /// Absolute paths pass through; relative names are looked up in
    /// `data_dir` first, then `output_dir`, so earlier stage outputs can
    /// feed later ones.
    pub fn locate(&self, name: &str) -> Utf8PathBuf {
        let candidate = Utf8Path::new(name);
        if candidate.is_absolute() {
            return candidate.to_path_buf();
        }
        let in_data = self.data_dir.join(name);
        if in_data.as_std_path().exists() {
            return in_data;
        }
        self.output_dir.join(name)
    }

    pub fn output_path(&self, name: &str) -> Utf8PathBuf {
        self.output_dir.join(name)
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, InteractomeError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Err(InteractomeError::MissingConfig);
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| InteractomeError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| InteractomeError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, InteractomeError> {
        let schema_version = config.schema_version.unwrap_or(1);

        let sources = config
            .sources
            .into_iter()
            .map(|entry| match entry {
                SourceEntry::Shorthand(value) => {
                    let (kind, path) = value
                        .split_once(':')
                        .ok_or_else(|| InteractomeError::ConfigParse(format!(
                            "source entry {value:?} must look like kind:path"
                        )))?;
                    let kind: SourceKind = kind.parse()?;
                    Ok(SourceRequest {
                        kind,
                        input: Some(path.trim().to_string()),
                        output: kind.default_output_name(),
                        schema: default_schema(kind),
                    })
                }
                SourceEntry::Detailed(obj) => {
                    if obj.path.is_none() && obj.kind != SourceKind::Inweb {
                        return Err(InteractomeError::ConfigParse(format!(
                            "source {} needs a path",
                            obj.kind
                        )));
                    }
                    Ok(SourceRequest {
                        kind: obj.kind,
                        input: obj.path,
                        output: obj
                            .output
                            .unwrap_or_else(|| obj.kind.default_output_name()),
                        schema: obj.schema.unwrap_or_else(|| default_schema(obj.kind)),
                    })
                }
            })
            .collect::<Result<Vec<_>, InteractomeError>>()?;

        Ok(ResolvedConfig {
            schema_version,
            data_dir: Utf8PathBuf::from(config.data_dir.unwrap_or_else(|| "data".to_string())),
            output_dir: Utf8PathBuf::from(config.output_dir.unwrap_or_else(|| "out".to_string())),
            protein_catalog: config.protein_catalog,
            gene_catalog: config.gene_catalog,
            sources,
            blacklist: config.blacklist,
            curated: config.curated,
            complexes: config.complexes,
            source_precedence: config.source_precedence,
            float_precision: config.float_precision.unwrap_or(4),
            write_intermediates: config.write_intermediates.unwrap_or(true),
        })
    }
}

/// Gene-derived sources carry no true score, so their tables omit score columns.
pub fn default_schema(kind: SourceKind) -> OutputSchema {
    match kind {
        SourceKind::Innatedb => OutputSchema::Pairs,
        SourceKind::Imex | SourceKind::Inweb => OutputSchema::Interactions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config_shorthand() {
        let config: Config = serde_json::from_str(
            r#"{ "sources": ["imex:imex.txt", { "kind": "inweb" }], "protein_catalog": "protein.csv" }"#,
        )
        .unwrap();

        let resolved = ConfigLoader::resolve_config(config).unwrap();
        assert_eq!(resolved.schema_version, 1);
        assert_eq!(resolved.sources.len(), 2);
        assert_eq!(resolved.sources[0].kind, SourceKind::Imex);
        assert_eq!(resolved.sources[0].input.as_deref(), Some("imex.txt"));
        assert_eq!(resolved.sources[1].input, None);
        assert_eq!(resolved.sources[1].output, "interactions_inweb.csv");
        assert_eq!(resolved.float_precision, 4);
        assert!(resolved.write_intermediates);
    }
}
