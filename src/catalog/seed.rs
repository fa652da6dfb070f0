use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use super::Catalog;
use crate::models::{BookId, BookRecord, BookStatus};

/// Shape of a seed file: a list of `[[books]]` tables.
#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    books: Vec<BookRecord>,
}

/// Rows the desk opens with when no seed file is configured.
pub fn default_records() -> Vec<BookRecord> {
    let rows: [(&str, &str, &str, &str, BookStatus); 5] = [
        ("B001", "1984", "George Orwell", "Fiction", BookStatus::Available),
        (
            "B002",
            "To Kill a Mockingbird",
            "Harper Lee",
            "Fiction",
            BookStatus::Issued,
        ),
        (
            "B003",
            "A Brief History of Time",
            "Stephen Hawking",
            "Science",
            BookStatus::Available,
        ),
        (
            "B004",
            "The Pragmatic Programmer",
            "Andrew Hunt",
            "Technology",
            BookStatus::Available,
        ),
        (
            "B005",
            "Sapiens",
            "Yuval Noah Harari",
            "History",
            BookStatus::Issued,
        ),
    ];

    rows.into_iter()
        .map(|(id, title, author, category, status)| BookRecord {
            id: BookId::new(id),
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
            status,
        })
        .collect()
}

/// Parse seed TOML into a catalog.
pub fn parse_seed(raw: &str) -> Result<Catalog> {
    let seed: SeedFile = toml::from_str(raw).context("failed to parse seed catalog")?;
    let count = seed.books.len();
    let catalog = Catalog::from_records(seed.books).context("invalid seed catalog")?;
    debug!(count, "parsed seed catalog");
    Ok(catalog)
}

/// Read a seed file from disk. The file is only read; session changes are
/// never written back.
pub fn load_seed_file(path: &Path) -> Result<Catalog> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file '{}'", path.display()))?;
    let catalog = parse_seed(&raw)
        .with_context(|| format!("failed to load seed file '{}'", path.display()))?;
    info!(path = %path.display(), books = catalog.len(), "loaded seed catalog");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_seed_is_a_valid_catalog() {
        let catalog = Catalog::from_records(default_records()).unwrap();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.next_id().unwrap().as_str(), "B006");
    }

    #[test]
    fn status_defaults_to_available() {
        let catalog = parse_seed(
            r#"
            [[books]]
            id = "B001"
            title = "1984"
            author = "Orwell"
            category = "Fiction"

            [[books]]
            id = "B002"
            title = "Dune"
            author = "Herbert"
            category = "Fiction"
            status = "issued"
            "#,
        )
        .unwrap();

        assert_eq!(catalog.records()[0].status, BookStatus::Available);
        assert_eq!(catalog.records()[1].status, BookStatus::Issued);
    }

    #[test]
    fn empty_seed_gives_empty_catalog() {
        assert!(parse_seed("").unwrap().is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected_with_context() {
        let err = parse_seed(
            r#"
            [[books]]
            id = "B001"
            title = "A"
            author = "X"
            category = "Y"

            [[books]]
            id = "B001"
            title = "B"
            author = "X"
            category = "Y"
            "#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("appears more than once"));
    }

    #[test]
    fn loads_seed_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[books]]\nid = \"B010\"\ntitle = \"Dune\"\nauthor = \"Herbert\"\ncategory = \"Fiction\""
        )
        .unwrap();

        let catalog = load_seed_file(file.path()).unwrap();
        assert_eq!(catalog.next_id().unwrap().as_str(), "B011");
    }

    #[test]
    fn missing_seed_file_names_the_path() {
        let err = load_seed_file(Path::new("/nonexistent/seed.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/seed.toml"));
    }
}
