//! Form handlers expressed as a pure dispatcher. Every user action becomes a
//! [`Command`]; [`dispatch`] validates it against the current catalog and
//! either returns the next catalog plus an [`Outcome`], or a [`CatalogError`]
//! with the current catalog left untouched. The TUI is just one consumer.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::models::{BookId, BookRecord, BookStatus};

/// Date format accepted by the Issue form.
pub const ISSUE_DATE_FORMAT: &str = "%Y-%m-%d";

static BOOK_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^B[0-9]{3}$").expect("book id pattern is valid"));

/// How an Issue request names its book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookRef {
    /// Exact id; unambiguous even when titles repeat.
    Id(BookId),
    /// Exact title; the first matching row wins.
    Title(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddBook {
    pub title: String,
    pub author: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueBook {
    pub borrower: String,
    pub book: BookRef,
    /// Raw date text, expected as `YYYY-MM-DD`.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnBook {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(AddBook),
    Issue(IssueBook),
    Return(ReturnBook),
}

/// What a successful command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(BookRecord),
    Issued {
        book: BookRecord,
        borrower: String,
        date: NaiveDate,
    },
    Returned(BookRecord),
}

impl Outcome {
    /// Confirmation text for the user.
    pub fn message(&self) -> String {
        match self {
            Outcome::Added(book) => format!(
                "Book \"{}\" has been added successfully with ID: {}",
                book.title, book.id
            ),
            Outcome::Issued {
                book,
                borrower,
                date,
            } => format!(
                "Book \"{}\" has been issued to {} on {}",
                book.title,
                borrower,
                date.format(ISSUE_DATE_FORMAT)
            ),
            Outcome::Returned(book) => format!(
                "Book \"{}\" (ID: {}) has been returned successfully",
                book.title, book.id
            ),
        }
    }

    pub fn book(&self) -> &BookRecord {
        match self {
            Outcome::Added(book) | Outcome::Returned(book) => book,
            Outcome::Issued { book, .. } => book,
        }
    }
}

/// The catalog after a successful command, plus what happened.
#[derive(Debug, Clone)]
pub struct Transition {
    pub catalog: Catalog,
    pub outcome: Outcome,
}

/// Apply one command to a catalog snapshot.
pub fn dispatch(catalog: &Catalog, command: Command) -> Result<Transition, CatalogError> {
    match command {
        Command::Add(input) => add_book(catalog, input),
        Command::Issue(input) => issue_book(catalog, input),
        Command::Return(input) => return_book(catalog, input),
    }
}

/// Check a typed id against the canonical `B` + three digits shape.
pub fn is_valid_book_id(raw: &str) -> bool {
    BOOK_ID_PATTERN.is_match(raw)
}

fn add_book(catalog: &Catalog, input: AddBook) -> Result<Transition, CatalogError> {
    let title = input.title.trim();
    let author = input.author.trim();
    let category = input.category.trim();
    if title.is_empty() || author.is_empty() || category.is_empty() {
        return Err(CatalogError::MissingFields);
    }

    let id = catalog.next_id()?;
    let mut next = catalog.clone();
    let book = next
        .append(BookRecord::available(id, title, author, category))?
        .clone();

    Ok(Transition {
        catalog: next,
        outcome: Outcome::Added(book),
    })
}

fn issue_book(catalog: &Catalog, input: IssueBook) -> Result<Transition, CatalogError> {
    let borrower = input.borrower.trim();
    let date_raw = input.date.trim();
    let book_missing = match &input.book {
        BookRef::Id(id) => id.as_str().trim().is_empty(),
        BookRef::Title(title) => title.trim().is_empty(),
    };
    if borrower.is_empty() || book_missing || date_raw.is_empty() {
        return Err(CatalogError::MissingFields);
    }

    let date = NaiveDate::parse_from_str(date_raw, ISSUE_DATE_FORMAT)
        .map_err(|_| CatalogError::InvalidDate(date_raw.to_string()))?;

    let target = match &input.book {
        BookRef::Id(id) => catalog
            .find_by_id(id)
            .ok_or_else(|| CatalogError::IdNotFound(id.clone()))?,
        BookRef::Title(title) => catalog
            .find_by_title(title)
            .ok_or_else(|| CatalogError::TitleNotFound(title.clone()))?,
    };
    if !target.is_available() {
        return Err(CatalogError::AlreadyIssued(target.id.clone()));
    }

    let id = target.id.clone();
    let mut next = catalog.clone();
    let book = next
        .set_status(&id, BookStatus::Issued)
        .ok_or_else(|| CatalogError::IdNotFound(id.clone()))?
        .clone();

    Ok(Transition {
        catalog: next,
        outcome: Outcome::Issued {
            book,
            borrower: borrower.to_string(),
            date,
        },
    })
}

fn return_book(catalog: &Catalog, input: ReturnBook) -> Result<Transition, CatalogError> {
    let raw = input.id.trim();
    if raw.is_empty() {
        return Err(CatalogError::MissingBookId);
    }
    if !is_valid_book_id(raw) {
        return Err(CatalogError::InvalidBookId(raw.to_string()));
    }

    let id = BookId::new(raw);
    let target = catalog
        .find_by_id(&id)
        .ok_or_else(|| CatalogError::IdNotFound(id.clone()))?;
    if target.is_available() {
        return Err(CatalogError::AlreadyAvailable(id));
    }

    let mut next = catalog.clone();
    let book = next
        .set_status(&id, BookStatus::Available)
        .ok_or_else(|| CatalogError::IdNotFound(id.clone()))?
        .clone();

    Ok(Transition {
        catalog: next,
        outcome: Outcome::Returned(book),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ErrorKind;

    fn catalog_with(rows: &[(&str, &str, BookStatus)]) -> Catalog {
        Catalog::from_records(
            rows.iter()
                .map(|(id, title, status)| BookRecord {
                    id: BookId::new(*id),
                    title: title.to_string(),
                    author: "Author".to_string(),
                    category: "Fiction".to_string(),
                    status: *status,
                })
                .collect(),
        )
        .unwrap()
    }

    fn add(title: &str, author: &str, category: &str) -> Command {
        Command::Add(AddBook {
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
        })
    }

    fn issue_title(title: &str, date: &str) -> Command {
        Command::Issue(IssueBook {
            borrower: "Ada".to_string(),
            book: BookRef::Title(title.to_string()),
            date: date.to_string(),
        })
    }

    fn return_id(id: &str) -> Command {
        Command::Return(ReturnBook { id: id.to_string() })
    }

    #[test]
    fn add_trims_and_appends_available_record() {
        let catalog = Catalog::new();
        let transition = dispatch(&catalog, add("  Dune ", " Herbert", "Fiction ")).unwrap();

        let expected = BookRecord::available(BookId::new("B001"), "Dune", "Herbert", "Fiction");
        assert_eq!(transition.catalog.records(), &[expected.clone()]);
        assert_eq!(transition.outcome, Outcome::Added(expected));
        assert_eq!(
            transition.outcome.message(),
            "Book \"Dune\" has been added successfully with ID: B001"
        );
    }

    #[test]
    fn add_rejects_blank_fields() {
        let catalog = Catalog::new();
        for command in [
            add("", "Herbert", "Fiction"),
            add("Dune", "   ", "Fiction"),
            add("Dune", "Herbert", ""),
        ] {
            let err = dispatch(&catalog, command).unwrap_err();
            assert_eq!(err, CatalogError::MissingFields);
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[test]
    fn add_fails_closed_when_ids_run_out() {
        let catalog = catalog_with(&[("B999", "Last", BookStatus::Available)]);
        let err = dispatch(&catalog, add("Dune", "Herbert", "Fiction")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
    }

    #[test]
    fn issue_checks_fields_before_anything_else() {
        let catalog = catalog_with(&[("B001", "Dune", BookStatus::Issued)]);
        let command = Command::Issue(IssueBook {
            borrower: " ".to_string(),
            book: BookRef::Title("Dune".to_string()),
            date: "2024-01-01".to_string(),
        });
        assert_eq!(
            dispatch(&catalog, command).unwrap_err(),
            CatalogError::MissingFields
        );
        assert_eq!(
            dispatch(&catalog, issue_title("Dune", "")).unwrap_err(),
            CatalogError::MissingFields
        );
    }

    #[test]
    fn issue_rejects_unparsable_date() {
        let catalog = catalog_with(&[("B001", "Dune", BookStatus::Available)]);
        let err = dispatch(&catalog, issue_title("Dune", "01/02/2024")).unwrap_err();
        assert_eq!(err, CatalogError::InvalidDate("01/02/2024".to_string()));
    }

    #[test]
    fn issue_unknown_title_is_not_found() {
        let catalog = catalog_with(&[("B001", "Dune", BookStatus::Available)]);
        let err = dispatch(&catalog, issue_title("Emma", "2024-01-01")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn issue_marks_record_and_reports_borrower_and_date() {
        let catalog = catalog_with(&[("B001", "Dune", BookStatus::Available)]);
        let transition = dispatch(&catalog, issue_title("Dune", "2024-01-01")).unwrap();
        assert_eq!(transition.catalog.records()[0].status, BookStatus::Issued);
        assert_eq!(
            transition.outcome.message(),
            "Book \"Dune\" has been issued to Ada on 2024-01-01"
        );
    }

    #[test]
    fn issuing_an_issued_book_is_a_conflict() {
        let catalog = catalog_with(&[("B001", "Dune", BookStatus::Issued)]);
        let err = dispatch(&catalog, issue_title("Dune", "2024-01-01")).unwrap_err();
        assert_eq!(err, CatalogError::AlreadyIssued(BookId::new("B001")));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn issue_by_title_hits_first_duplicate_even_if_issued() {
        let catalog = catalog_with(&[
            ("B001", "Dune", BookStatus::Issued),
            ("B002", "Dune", BookStatus::Available),
        ]);
        let err = dispatch(&catalog, issue_title("Dune", "2024-01-01")).unwrap_err();
        assert_eq!(err, CatalogError::AlreadyIssued(BookId::new("B001")));
    }

    #[test]
    fn issue_by_id_reaches_later_duplicate() {
        let catalog = catalog_with(&[
            ("B001", "Dune", BookStatus::Issued),
            ("B002", "Dune", BookStatus::Available),
        ]);
        let command = Command::Issue(IssueBook {
            borrower: "Ada".to_string(),
            book: BookRef::Id(BookId::new("B002")),
            date: "2024-01-01".to_string(),
        });
        let transition = dispatch(&catalog, command).unwrap();
        assert_eq!(transition.outcome.book().id.as_str(), "B002");
        assert_eq!(transition.catalog.records()[1].status, BookStatus::Issued);
    }

    #[test]
    fn issue_unknown_id_is_not_found() {
        let catalog = catalog_with(&[("B001", "Dune", BookStatus::Available)]);
        let snapshot = catalog.clone();
        let command = Command::Issue(IssueBook {
            borrower: "Ada".to_string(),
            book: BookRef::Id(BookId::new("B404")),
            date: "2024-01-01".to_string(),
        });
        let err = dispatch(&catalog, command).unwrap_err();
        assert_eq!(err, CatalogError::IdNotFound(BookId::new("B404")));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(catalog, snapshot);
    }

    #[test]
    fn return_validates_in_order() {
        let catalog = catalog_with(&[("B001", "Dune", BookStatus::Available)]);
        assert_eq!(
            dispatch(&catalog, return_id("  ")).unwrap_err(),
            CatalogError::MissingBookId
        );
        assert_eq!(
            dispatch(&catalog, return_id("b001")).unwrap_err().kind(),
            ErrorKind::Format
        );
        assert_eq!(
            dispatch(&catalog, return_id("B0001")).unwrap_err().kind(),
            ErrorKind::Format
        );
        assert_eq!(
            dispatch(&catalog, return_id("B404")).unwrap_err(),
            CatalogError::IdNotFound(BookId::new("B404"))
        );
        let err = dispatch(&catalog, return_id("B001")).unwrap_err();
        assert_eq!(err, CatalogError::AlreadyAvailable(BookId::new("B001")));
        assert_eq!(err.to_string(), "Book with ID \"B001\" is already available");
    }

    #[test]
    fn return_restores_availability() {
        let catalog = catalog_with(&[("B001", "Dune", BookStatus::Issued)]);
        let transition = dispatch(&catalog, return_id(" B001 ")).unwrap();
        assert!(transition.catalog.records()[0].is_available());
        assert_eq!(
            transition.outcome.message(),
            "Book \"Dune\" (ID: B001) has been returned successfully"
        );
    }

    #[test]
    fn rejected_commands_leave_catalog_untouched() {
        let catalog = catalog_with(&[("B001", "Dune", BookStatus::Issued)]);
        let before = catalog.clone();
        let _ = dispatch(&catalog, issue_title("Dune", "2024-01-01"));
        let _ = dispatch(&catalog, add("", "", ""));
        assert_eq!(catalog, before);
    }

    #[test]
    fn book_id_pattern_is_ascii_only() {
        assert!(is_valid_book_id("B123"));
        assert!(!is_valid_book_id("B12"));
        assert!(!is_valid_book_id("B١٢٣"));
        assert!(!is_valid_book_id(" B123"));
    }
}
