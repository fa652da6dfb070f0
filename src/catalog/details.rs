use std::fmt;

use crate::models::{BookRecord, BookStatus};

/// Read-only summary of a selected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDetails {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub status: BookStatus,
}

impl From<&BookRecord> for RowDetails {
    fn from(record: &BookRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            author: record.author.clone(),
            category: record.category.clone(),
            status: record.status,
        }
    }
}

impl fmt::Display for RowDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Book Details:")?;
        writeln!(f)?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Name: {}", self.title)?;
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "Category: {}", self.category)?;
        write!(f, "Status: {}", self.status)
    }
}
