use crate::error::{HarmonizerError, Result};

use super::dataset::Row;

/// A canonical column and the raw header names that resolve to it.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
}

impl ColumnSpec {
    pub const fn required(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases, required: true }
    }

    pub const fn optional(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases, required: false }
    }

    /// Resolve against a header. A missing required column is an error; a
    /// missing optional one resolves to [`ColumnIndex::ABSENT`].
    pub fn resolve(&self, header: &[String]) -> Result<ColumnIndex> {
        match find_column(header, self.name, self.aliases) {
            Some(idx) => Ok(ColumnIndex(Some(idx))),
            None if self.required => Err(HarmonizerError::ColumnNotFound(self.name.to_string())),
            None => Ok(ColumnIndex::ABSENT),
        }
    }
}

/// Shared by every category that carries patient identifiers.
pub const PATIENT_ID: ColumnSpec = ColumnSpec::required(
    "patient_id",
    &["patient_id", "patientid", "id", "patient_number", "mrn"],
);

/// Case-insensitive lookup of `name`, then of each alias in order.
pub fn find_column(header: &[String], name: &str, aliases: &[&str]) -> Option<usize> {
    let position = |wanted: &str| {
        let wanted = wanted.to_lowercase();
        header.iter().position(|h| h.to_lowercase() == wanted)
    };
    position(name).or_else(|| aliases.iter().find_map(|alias| position(*alias)))
}

/// Position of a resolved column, or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex(Option<usize>);

impl ColumnIndex {
    pub const ABSENT: ColumnIndex = ColumnIndex(None);

    pub fn at(idx: usize) -> Self {
        ColumnIndex(Some(idx))
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// The cell in `row`, if the column exists and the row is long enough.
    pub fn value<'a>(&self, row: &'a Row) -> Option<&'a str> {
        self.0.and_then(|i| row.get(i)).map(String::as_str)
    }

    /// Rewrite the cell in place. No-op for absent columns and short rows.
    pub fn apply<F>(&self, row: &mut Row, normalize: F)
    where
        F: FnOnce(&str) -> String,
    {
        if let Some(cell) = self.0.and_then(|i| row.get_mut(i)) {
            let normalized = normalize(cell);
            *cell = normalized;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn direct_name_wins() {
        let h = header(&["mrn", "patient_id"]);
        assert_eq!(PATIENT_ID.resolve(&h).unwrap(), ColumnIndex::at(1));
    }

    #[test]
    fn aliases_tried_in_order() {
        let h = header(&["MRN", "ID"]);
        // "id" precedes "mrn" in the alias list
        assert_eq!(PATIENT_ID.resolve(&h).unwrap(), ColumnIndex::at(1));
    }

    #[test]
    fn missing_required_column_errors() {
        let h = header(&["name"]);
        let err = PATIENT_ID.resolve(&h).unwrap_err();
        assert_eq!(err.to_string(), "column not found: patient_id");
    }

    #[test]
    fn missing_optional_column_is_absent() {
        let spec = ColumnSpec::optional("route", &["route"]);
        let idx = spec.resolve(&header(&["dose"])).unwrap();
        assert!(!idx.is_present());

        let mut row = vec!["5 mg".to_string()];
        idx.apply(&mut row, |_| "changed".to_string());
        assert_eq!(row, vec!["5 mg".to_string()]);
    }

    #[test]
    fn short_rows_are_left_alone() {
        let idx = ColumnIndex::at(3);
        let mut row = vec!["a".to_string()];
        idx.apply(&mut row, |v| v.to_uppercase());
        assert_eq!(row, vec!["a".to_string()]);
        assert_eq!(idx.value(&row), None);
    }
}
