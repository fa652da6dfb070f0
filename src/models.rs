//! Domain models shared by the catalog repository, the command dispatcher and
//! the TUI. These types stay plain data holders; validation lives in
//! `commands` and lookups live in `catalog`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest sequence that still fits the three-digit id format.
pub const MAX_SEQUENCE: u32 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Catalog identifier such as `B001`. The wrapper keeps whatever text the seed
/// provided so malformed legacy ids still round-trip into the table.
pub struct BookId(String);

impl BookId {
    /// Build the canonical id for a sequence number (`7` becomes `B007`).
    pub fn from_sequence(sequence: u32) -> Self {
        Self(format!("B{sequence:03}"))
    }

    /// Wrap raw id text without validating it.
    pub fn new<S: Into<String>>(raw: S) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix used for id allocation. Only the leading digits after
    /// the first character count, so `B12x` yields 12 and `Bxyz` yields
    /// `None`.
    pub fn sequence(&self) -> Option<u32> {
        let mut chars = self.0.chars();
        chars.next()?;
        let digits: String = chars.take_while(|ch| ch.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Circulation state of a single record. Both states are stable; the only
/// transitions are Issue (Available to Issued) and Return (Issued to
/// Available).
pub enum BookStatus {
    #[default]
    Available,
    Issued,
}

impl BookStatus {
    /// Label shown in the Status column.
    pub fn label(self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Issued => "Issued",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One row of the catalog table.
pub struct BookRecord {
    pub id: BookId,
    /// Title, also used by the title-keyed issue lookup.
    pub title: String,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub status: BookStatus,
}

impl BookRecord {
    /// Fresh record in the Available state, as produced by Add.
    pub fn available(id: BookId, title: &str, author: &str, category: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
            status: BookStatus::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == BookStatus::Available
    }

    /// The five visible cells in column order.
    pub fn cells(&self) -> [&str; 5] {
        [
            self.id.as_str(),
            &self.title,
            &self.author,
            &self.category,
            self.status.label(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sequence_with_three_digits() {
        assert_eq!(BookId::from_sequence(2).as_str(), "B002");
        assert_eq!(BookId::from_sequence(45).as_str(), "B045");
        assert_eq!(BookId::from_sequence(999).as_str(), "B999");
    }

    #[test]
    fn sequence_reads_leading_digits_only() {
        assert_eq!(BookId::new("B001").sequence(), Some(1));
        assert_eq!(BookId::new("B12x").sequence(), Some(12));
        assert_eq!(BookId::new("B1000").sequence(), Some(1000));
        assert_eq!(BookId::new("Bxyz").sequence(), None);
        assert_eq!(BookId::new("").sequence(), None);
    }

    #[test]
    fn status_labels_match_table_text() {
        assert_eq!(BookStatus::Available.to_string(), "Available");
        assert_eq!(BookStatus::Issued.to_string(), "Issued");
    }
}
