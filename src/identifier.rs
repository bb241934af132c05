use crate::domain::{Accession, IdentifierNamespace};
use crate::error::InteractomeError;

/// Extracts the bare accession from one qualified token such as
/// `uniprotkb:P12345-2` or `ensembl:ENSG00000123456`.
///
/// Returns `Ok(None)` when the token belongs to another namespace; the caller
/// treats that as "not applicable" rather than a failure. A token without a
/// `:` separator, or with nothing after it, is malformed.
pub fn extract_accession(
    token: &str,
    namespace: IdentifierNamespace,
) -> Result<Option<Accession>, InteractomeError> {
    let trimmed = token.trim();
    let (prefix, rest) = trimmed
        .split_once(':')
        .ok_or_else(|| InteractomeError::MalformedIdentifier(token.to_string()))?;
    if prefix != namespace.prefix() {
        return Ok(None);
    }
    let bare = rest.split('-').next().unwrap_or_default();
    if bare.is_empty() {
        return Err(InteractomeError::MalformedIdentifier(token.to_string()));
    }
    bare.parse()
        .map(Some)
        .map_err(|_| InteractomeError::MalformedIdentifier(token.to_string()))
}

/// Extracts every accession of `namespace` from a `|`-separated identifier field.
///
/// Tokens of other namespaces are skipped. Any malformed token fails the
/// whole field so the row can be dropped.
pub fn extract_all(
    field: &str,
    namespace: IdentifierNamespace,
) -> Result<Vec<Accession>, InteractomeError> {
    let mut found = Vec::new();
    for token in field.split('|').filter(|token| !token.trim().is_empty()) {
        if let Some(accession) = extract_accession(token, namespace)? {
            if !found.contains(&accession) {
                found.push(accession);
            }
        }
    }
    Ok(found)
}

/// First accession of `namespace` in a `|`-separated identifier field.
pub fn extract_first(
    field: &str,
    namespace: IdentifierNamespace,
) -> Result<Option<Accession>, InteractomeError> {
    Ok(extract_all(field, namespace)?.into_iter().next())
}
