use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::InteractomeError;

/// A bare UniProt or Ensembl accession, with namespace and isoform suffix removed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Accession(String);

impl Accession {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Accession {
    type Err = InteractomeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        let is_valid = !normalized.is_empty() && !normalized.chars().any(char::is_whitespace);
        if !is_valid {
            return Err(InteractomeError::InvalidAccession(value.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }
}

impl TryFrom<String> for Accession {
    type Error = InteractomeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Accession> for String {
    fn from(value: Accession) -> Self {
        value.0
    }
}

/// Namespace prefix of a PSI-MITAB style qualified identifier (`uniprotkb:P12345`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierNamespace {
    Uniprotkb,
    Ensembl,
}

impl IdentifierNamespace {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdentifierNamespace::Uniprotkb => "uniprotkb",
            IdentifierNamespace::Ensembl => "ensembl",
        }
    }
}

impl fmt::Display for IdentifierNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// Keyed by UniProt accession.
    Protein,
    /// Keyed by Ensembl gene accession, resolving to UniProt.
    Gene,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Protein => write!(f, "protein"),
            CatalogKind::Gene => write!(f, "gene"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Imex,
    Innatedb,
    Inweb,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Imex => "imex",
            SourceKind::Innatedb => "innatedb",
            SourceKind::Inweb => "inweb",
        }
    }

    /// Which catalog the adapter's identifiers are filtered against.
    pub fn catalog_kind(&self) -> CatalogKind {
        match self {
            SourceKind::Imex | SourceKind::Inweb => CatalogKind::Protein,
            SourceKind::Innatedb => CatalogKind::Gene,
        }
    }

    pub fn default_output_name(&self) -> String {
        format!("interactions_{}.csv", self.as_str())
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = InteractomeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "imex" => Ok(SourceKind::Imex),
            "innatedb" => Ok(SourceKind::Innatedb),
            "inweb" => Ok(SourceKind::Inweb),
            _ => Err(InteractomeError::UnknownSource(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_accession_trims() {
        let acc: Accession = " P12345 ".parse().unwrap();
        assert_eq!(acc.as_str(), "P12345");
    }

    #[test]
    fn parse_accession_empty() {
        let err = "  ".parse::<Accession>().unwrap_err();
        assert_matches!(err, InteractomeError::InvalidAccession(_));
    }

    #[test]
    fn source_kind_routing() {
        let kind: SourceKind = "InWeb".parse().unwrap();
        assert_eq!(kind, SourceKind::Inweb);
        assert_eq!(kind.catalog_kind(), CatalogKind::Protein);
        assert_eq!(SourceKind::Innatedb.catalog_kind(), CatalogKind::Gene);
        assert_matches!(
            "biogrid".parse::<SourceKind>(),
            Err(InteractomeError::UnknownSource(_))
        );
    }
}
