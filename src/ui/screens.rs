use crate::catalog::{matches_query, Catalog};
use crate::models::BookRecord;

/// Top-level panels, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Panel {
    Books,
    AddBook,
    IssueBook,
    ReturnBook,
}

impl Panel {
    pub(crate) const ALL: [Panel; 4] = [
        Panel::Books,
        Panel::AddBook,
        Panel::IssueBook,
        Panel::ReturnBook,
    ];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Panel::Books => "Books",
            Panel::AddBook => "Add Book",
            Panel::IssueBook => "Issue Book",
            Panel::ReturnBook => "Return Book",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Panel::Books => 0,
            Panel::AddBook => 1,
            Panel::IssueBook => 2,
            Panel::ReturnBook => 3,
        }
    }

    pub(crate) fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub(crate) fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Snapshot of the catalog rows backing the Books table, with the live
/// search filter applied on top. The filter only hides rows.
pub(crate) struct CatalogScreen {
    pub(crate) books: Vec<BookRecord>,
    pub(crate) filtered_books: Vec<BookRecord>,
    pub(crate) filter: Option<String>,
    pub(crate) selected: usize,
}

impl CatalogScreen {
    pub(crate) fn new(catalog: &Catalog) -> Self {
        let mut screen = Self {
            books: catalog.records().to_vec(),
            filtered_books: Vec::new(),
            filter: None,
            selected: 0,
        };
        screen.apply_filter();
        screen
    }

    pub(crate) fn apply_filter(&mut self) {
        let query = self.filter.as_deref().unwrap_or("");
        self.filtered_books = self
            .books
            .iter()
            .filter(|book| matches_query(book, query))
            .cloned()
            .collect();
        self.ensure_in_bounds();
    }

    pub(crate) fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter;
        self.apply_filter();
    }

    /// Replace the snapshot after a catalog mutation.
    pub(crate) fn set_books(&mut self, catalog: &Catalog) {
        self.books = catalog.records().to_vec();
        self.apply_filter();
    }

    pub(crate) fn current_book(&self) -> Option<&BookRecord> {
        self.filtered_books.get(self.selected)
    }

    pub(crate) fn is_filtered(&self) -> bool {
        self.filter.as_deref().is_some_and(|query| !query.is_empty())
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.filtered_books.is_empty() {
            return;
        }
        let len = self.filtered_books.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.filtered_books.is_empty() {
            self.selected = 0;
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.filtered_books.is_empty() {
            self.selected = self.filtered_books.len() - 1;
        }
    }

    fn ensure_in_bounds(&mut self) {
        if self.filtered_books.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.filtered_books.len() {
            self.selected = self.filtered_books.len() - 1;
        }
    }
}
