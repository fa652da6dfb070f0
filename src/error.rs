use thiserror::Error;

use crate::models::BookId;

/// Broad classes of rejected catalog operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field was missing or unparsable.
    Validation,
    /// A book id did not match `B` plus three digits.
    Format,
    /// No record for the given id or title.
    NotFound,
    /// The record is already in the requested state.
    Conflict,
    /// The id space cannot hold another record.
    Capacity,
}

/// Every way a catalog operation can be refused. The `Display` text is what
/// the user sees, so keep it phrased for the front desk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Please enter a Book ID")]
    MissingBookId,
    #[error("Invalid issue date \"{0}\". Please use format like 2024-01-31")]
    InvalidDate(String),
    #[error("Invalid Book ID format. Please use format like B001")]
    InvalidBookId(String),
    #[error("No book titled \"{0}\" in the catalog")]
    TitleNotFound(String),
    #[error("Book with ID \"{0}\" not found")]
    IdNotFound(BookId),
    #[error("This book is already issued. Please choose another book.")]
    AlreadyIssued(BookId),
    #[error("Book with ID \"{0}\" is already available")]
    AlreadyAvailable(BookId),
    #[error("The catalog is full: no book IDs left after B999")]
    IdSpaceExhausted,
    #[error("Book ID \"{0}\" appears more than once")]
    DuplicateId(BookId),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::MissingFields
            | CatalogError::MissingBookId
            | CatalogError::InvalidDate(_) => ErrorKind::Validation,
            CatalogError::InvalidBookId(_) => ErrorKind::Format,
            CatalogError::TitleNotFound(_) | CatalogError::IdNotFound(_) => ErrorKind::NotFound,
            CatalogError::AlreadyIssued(_)
            | CatalogError::AlreadyAvailable(_)
            | CatalogError::DuplicateId(_) => ErrorKind::Conflict,
            CatalogError::IdSpaceExhausted => ErrorKind::Capacity,
        }
    }
}
