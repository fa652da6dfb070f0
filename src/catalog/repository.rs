use std::collections::HashSet;

use crate::error::CatalogError;
use crate::models::{BookId, BookRecord, BookStatus, MAX_SEQUENCE};

/// Ordered, session-scoped collection of book records. Order is insertion
/// order and doubles as the table order in the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<BookRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from pre-existing rows, keeping their order. Ids must
    /// be unique; everything else is taken as-is.
    pub fn from_records(records: Vec<BookRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.clone()) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Allocate the id for the next record: highest existing sequence plus
    /// one. Ids without a numeric suffix count as zero. Allocation fails
    /// closed once the three-digit space is used up.
    pub fn next_id(&self) -> Result<BookId, CatalogError> {
        let max = self
            .records
            .iter()
            .map(|record| record.id.sequence().unwrap_or(0))
            .max()
            .unwrap_or(0);

        if max >= MAX_SEQUENCE {
            return Err(CatalogError::IdSpaceExhausted);
        }
        Ok(BookId::from_sequence(max + 1))
    }

    /// Push a record to the end of the table. Titles and authors may repeat;
    /// ids may not.
    pub fn append(&mut self, record: BookRecord) -> Result<&BookRecord, CatalogError> {
        if self.find_by_id(&record.id).is_some() {
            return Err(CatalogError::DuplicateId(record.id));
        }
        self.records.push(record);
        let last = self.records.len() - 1;
        Ok(&self.records[last])
    }

    /// First record whose title matches exactly.
    pub fn find_by_title(&self, title: &str) -> Option<&BookRecord> {
        self.records.iter().find(|record| record.title == title)
    }

    pub fn find_by_id(&self, id: &BookId) -> Option<&BookRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// Overwrite the status of the record with `id`. Returns the updated
    /// record, or `None` when no such id exists.
    pub fn set_status(&mut self, id: &BookId, status: BookStatus) -> Option<&BookRecord> {
        let record = self.records.iter_mut().find(|record| &record.id == id)?;
        record.status = status;
        Some(record)
    }

    /// Distinct non-empty categories, sorted case-insensitively. Feeds the
    /// category autocomplete on the Add Book form.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for record in &self.records {
            let category = record.category.trim();
            if category.is_empty() {
                continue;
            }
            if !categories
                .iter()
                .any(|known| known.eq_ignore_ascii_case(category))
            {
                categories.push(category.to_string());
            }
        }
        categories.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then(a.cmp(b)));
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, status: BookStatus) -> BookRecord {
        BookRecord {
            id: BookId::new(id),
            title: title.to_string(),
            author: "Author".to_string(),
            category: "Fiction".to_string(),
            status,
        }
    }

    #[test]
    fn next_id_on_empty_catalog_starts_at_one() {
        assert_eq!(Catalog::new().next_id().unwrap().as_str(), "B001");
    }

    #[test]
    fn next_id_uses_highest_sequence_not_row_count() {
        let catalog = Catalog::from_records(vec![
            record("B007", "A", BookStatus::Available),
            record("B002", "B", BookStatus::Available),
        ])
        .unwrap();
        assert_eq!(catalog.next_id().unwrap().as_str(), "B008");
    }

    #[test]
    fn malformed_ids_count_as_zero() {
        let catalog = Catalog::from_records(vec![
            record("legacy", "A", BookStatus::Available),
            record("Bxx", "B", BookStatus::Available),
        ])
        .unwrap();
        assert_eq!(catalog.next_id().unwrap().as_str(), "B001");
    }

    #[test]
    fn next_id_fails_closed_past_999() {
        let catalog =
            Catalog::from_records(vec![record("B999", "Last", BookStatus::Available)]).unwrap();
        assert_eq!(catalog.next_id(), Err(CatalogError::IdSpaceExhausted));
    }

    #[test]
    fn from_records_rejects_duplicate_ids() {
        let err = Catalog::from_records(vec![
            record("B001", "A", BookStatus::Available),
            record("B001", "B", BookStatus::Issued),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId(BookId::new("B001")));
    }

    #[test]
    fn append_allows_repeated_titles() {
        let mut catalog = Catalog::new();
        catalog
            .append(record("B001", "Dune", BookStatus::Available))
            .unwrap();
        catalog
            .append(record("B002", "Dune", BookStatus::Available))
            .unwrap();
        assert_eq!(catalog.len(), 2);
        let titles: Vec<&str> = catalog.records().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Dune"]);
    }

    #[test]
    fn find_by_title_returns_first_match() {
        let catalog = Catalog::from_records(vec![
            record("B001", "Dune", BookStatus::Issued),
            record("B002", "Dune", BookStatus::Available),
        ])
        .unwrap();
        let found = catalog.find_by_title("Dune").unwrap();
        assert_eq!(found.id.as_str(), "B001");
        assert!(catalog.find_by_title("dune").is_none());
    }

    #[test]
    fn set_status_only_touches_matching_id() {
        let mut catalog = Catalog::from_records(vec![
            record("B001", "Dune", BookStatus::Available),
            record("B002", "Dune", BookStatus::Available),
        ])
        .unwrap();
        let updated = catalog
            .set_status(&BookId::new("B002"), BookStatus::Issued)
            .unwrap();
        assert_eq!(updated.status, BookStatus::Issued);
        assert!(catalog.records()[0].is_available());
        assert!(catalog
            .set_status(&BookId::new("B404"), BookStatus::Issued)
            .is_none());
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let mut catalog = Catalog::new();
        for (id, category) in [("B001", "science"), ("B002", "Fiction"), ("B003", "Science")] {
            let mut book = record(id, "T", BookStatus::Available);
            book.category = category.to_string();
            catalog.append(book).unwrap();
        }
        assert_eq!(catalog.categories(), vec!["Fiction", "science"]);
    }
}
