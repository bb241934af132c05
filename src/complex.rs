use std::collections::HashSet;
use std::path::Path;

use crate::domain::Accession;
use crate::error::InteractomeError;
use crate::table::{RawTable, cell};

/// Member columns of the complex table.
const MEMBER_COLUMNS: [&str; 4] = ["protein_1", "protein_2", "protein_3", "protein_4"];

/// Every protein that takes part in at least one curated complex.
#[derive(Debug, Clone, Default)]
pub struct ComplexMembership {
    members: HashSet<Accession>,
}

impl ComplexMembership {
    pub fn read(path: &Path) -> Result<Self, InteractomeError> {
        let table = RawTable::read_delimited(path, &path.display().to_string(), b',')?;
        Self::from_table(&table)
    }

    /// Collects members from whichever `protein_N` columns exist; `protein_1` is required.
    pub fn from_table(table: &RawTable) -> Result<Self, InteractomeError> {
        let mut columns = vec![table.column(MEMBER_COLUMNS[0])?];
        columns.extend(
            MEMBER_COLUMNS[1..]
                .iter()
                .filter_map(|name| table.column(name).ok()),
        );

        let members = table
            .rows()
            .flat_map(|row| {
                columns
                    .iter()
                    .filter_map(|&index| cell(row, index))
                    .filter_map(|value| value.parse().ok())
                    .collect::<Vec<Accession>>()
            })
            .collect::<HashSet<_>>();
        tracing::info!(complexes = table.len(), members = members.len(), "complex table loaded");
        Ok(Self { members })
    }

    pub fn from_accessions<I: IntoIterator<Item = Accession>>(accessions: I) -> Self {
        Self {
            members: accessions.into_iter().collect(),
        }
    }

    pub fn contains(&self, accession: &Accession) -> bool {
        self.members.contains(accession)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_members_across_columns() {
        let data = "name,protein_1,protein_2,protein_3\nIL12,P29459,P29460,\nTGFBR,P36897,P37173,Q9\n";
        let table = RawTable::from_reader(data.as_bytes(), "complex", b',').unwrap();
        let membership = ComplexMembership::from_table(&table).unwrap();
        assert_eq!(membership.len(), 5);
        assert!(membership.contains(&"Q9".parse().unwrap()));
    }

    #[test]
    fn requires_first_member_column() {
        let table = RawTable::from_reader("name\nIL12\n".as_bytes(), "complex", b',').unwrap();
        assert!(ComplexMembership::from_table(&table).is_err());
    }
}
