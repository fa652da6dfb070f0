use std::time::Duration;

use chrono::NaiveDate;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::catalog::{fold_case, Catalog};
use crate::commands::{AddBook, BookRef, Command, IssueBook, ReturnBook, ISSUE_DATE_FORMAT};
use crate::models::{BookId, BookStatus};

use super::helpers::{StatusKind, TimedMessage};

/// Style for a form value depending on focus and emptiness.
fn field_style(is_active: bool, is_empty: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Yellow)
    } else if is_empty {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    }
}

/// Add Book form state, including category autocomplete tracking.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) category: String,
    pub(crate) active: BookField,
    pub(crate) suggestion: Option<String>,
    pub(crate) autocomplete_disabled: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Category,
}

impl BookForm {
    /// Cycle focus forward across the three fields.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Author,
            BookField::Author => BookField::Category,
            BookField::Category => BookField::Title,
        };
        if self.active != BookField::Category {
            self.suggestion = None;
        }
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Category,
            BookField::Author => BookField::Title,
            BookField::Category => BookField::Author,
        };
        if self.active != BookField::Category {
            self.suggestion = None;
        }
    }

    /// Insert a character into the active field.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            BookField::Title => self.title.push(ch),
            BookField::Author => self.author.push(ch),
            BookField::Category => {
                self.autocomplete_disabled = false;
                self.category.push(ch);
            }
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Author => {
                self.author.pop();
            }
            BookField::Category => {
                self.category.pop();
                self.autocomplete_disabled = false;
            }
        }
    }

    /// Package the raw fields; trimming and validation happen in dispatch.
    pub(crate) fn to_command(&self) -> Command {
        Command::Add(AddBook {
            title: self.title.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
        })
    }

    /// Suggest an existing category once two characters are typed.
    pub(crate) fn update_suggestion(&mut self, categories: &[String]) {
        if self.active != BookField::Category
            || self.autocomplete_disabled
            || self.category.chars().count() < 2
        {
            self.suggestion = None;
            return;
        }

        let current_lower = fold_case(&self.category);
        self.suggestion = categories
            .iter()
            .find(|candidate| fold_case(candidate).starts_with(&current_lower))
            .filter(|candidate| fold_case(candidate) != current_lower)
            .cloned();
    }

    /// Replace the typed category with the suggestion.
    pub(crate) fn accept_suggestion(&mut self) -> bool {
        if self.suggestion_suffix().is_none() {
            return false;
        }
        match self.suggestion.take() {
            Some(candidate) => {
                self.category = candidate;
                self.autocomplete_disabled = true;
                true
            }
            None => false,
        }
    }

    /// Dismiss the suggestion until the category is edited again.
    pub(crate) fn cancel_autocomplete(&mut self) -> bool {
        if self.has_active_suggestion() {
            self.autocomplete_disabled = true;
            self.suggestion = None;
            return true;
        }
        false
    }

    /// Untyped remainder of the suggestion, shown ghosted after the cursor.
    pub(crate) fn suggestion_suffix(&self) -> Option<String> {
        let candidate = self.suggestion.as_ref()?;
        let suffix: String = candidate
            .chars()
            .skip(self.category.chars().count())
            .collect();
        if suffix.is_empty() {
            None
        } else {
            Some(suffix)
        }
    }

    pub(crate) fn has_active_suggestion(&self) -> bool {
        self.active == BookField::Category && self.suggestion.is_some()
    }

    pub(crate) fn build_line(&self, field_name: &str, field: BookField) -> Line<'static> {
        let value = match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Category => &self.category,
        };
        let is_active = self.active == field;
        let style = field_style(is_active, value.is_empty());

        let mut spans = vec![Span::raw(format!("{field_name}: "))];
        if value.is_empty() && !(is_active && self.suggestion.is_some()) {
            spans.push(Span::styled("<required>", style));
        } else {
            spans.push(Span::styled(value.clone(), style));
        }
        if field == BookField::Category && is_active {
            if let Some(suffix) = self.suggestion_suffix() {
                spans.push(Span::styled(suffix, Style::default().fg(Color::DarkGray)));
            }
        }
        Line::from(spans)
    }

    pub(crate) fn value_len(&self, field: BookField) -> usize {
        match field {
            BookField::Title => self.title.chars().count(),
            BookField::Author => self.author.chars().count(),
            BookField::Category => self.category.chars().count(),
        }
    }
}

/// One entry of the Issue form's book selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BookOption {
    pub(crate) id: BookId,
    pub(crate) title: String,
    pub(crate) status: BookStatus,
}

impl BookOption {
    pub(crate) fn label(&self) -> String {
        match self.status {
            BookStatus::Available => format!("{} ({})", self.title, self.id),
            BookStatus::Issued => format!("{} ({}) - issued", self.title, self.id),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum IssueField {
    #[default]
    Borrower,
    Book,
    Date,
}

/// Issue Book form state. The book is picked from the catalog, so issuing is
/// always keyed by id.
#[derive(Clone)]
pub(crate) struct IssueForm {
    pub(crate) borrower: String,
    pub(crate) options: Vec<BookOption>,
    pub(crate) selected: usize,
    pub(crate) date: String,
    pub(crate) active: IssueField,
}

impl IssueForm {
    pub(crate) fn new(catalog: &Catalog, today: NaiveDate) -> Self {
        let mut form = Self {
            borrower: String::new(),
            options: Vec::new(),
            selected: 0,
            date: today.format(ISSUE_DATE_FORMAT).to_string(),
            active: IssueField::Borrower,
        };
        form.refresh_options(catalog);
        form
    }

    /// Rebuild the selector from the catalog, keeping the current pick when
    /// it still exists.
    pub(crate) fn refresh_options(&mut self, catalog: &Catalog) {
        let current = self.selected_option().map(|option| option.id.clone());
        self.options = catalog
            .records()
            .iter()
            .map(|record| BookOption {
                id: record.id.clone(),
                title: record.title.clone(),
                status: record.status,
            })
            .collect();
        self.selected = current
            .and_then(|id| self.options.iter().position(|option| option.id == id))
            .unwrap_or(0);
    }

    /// Clear the inputs after a successful issue and re-default the date.
    pub(crate) fn reset(&mut self, today: NaiveDate) {
        self.borrower.clear();
        self.selected = 0;
        self.date = today.format(ISSUE_DATE_FORMAT).to_string();
        self.active = IssueField::Borrower;
    }

    pub(crate) fn selected_option(&self) -> Option<&BookOption> {
        self.options.get(self.selected)
    }

    /// Step through the selector, wrapping at both ends.
    pub(crate) fn cycle_book(&mut self, offset: isize) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len() as isize;
        self.selected = (self.selected as isize + offset).rem_euclid(len) as usize;
    }

    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            IssueField::Borrower => IssueField::Book,
            IssueField::Book => IssueField::Date,
            IssueField::Date => IssueField::Borrower,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            IssueField::Borrower => IssueField::Date,
            IssueField::Book => IssueField::Borrower,
            IssueField::Date => IssueField::Book,
        };
    }

    /// Borrower takes any printable character, the date only digits and
    /// dashes. The book field is a selector and ignores typing.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            IssueField::Borrower if !ch.is_control() => {
                self.borrower.push(ch);
                true
            }
            IssueField::Date if ch.is_ascii_digit() || ch == '-' => {
                self.date.push(ch);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            IssueField::Borrower => {
                self.borrower.pop();
            }
            IssueField::Date => {
                self.date.pop();
            }
            IssueField::Book => {}
        }
    }

    pub(crate) fn to_command(&self) -> Command {
        let book = match self.selected_option() {
            Some(option) => BookRef::Id(option.id.clone()),
            None => BookRef::Title(String::new()),
        };
        Command::Issue(IssueBook {
            borrower: self.borrower.clone(),
            book,
            date: self.date.clone(),
        })
    }

    pub(crate) fn build_line(&self, field_name: &str, field: IssueField) -> Line<'static> {
        let is_active = self.active == field;
        let (display, is_empty) = match field {
            IssueField::Borrower => (self.borrower.clone(), self.borrower.is_empty()),
            IssueField::Date => (self.date.clone(), self.date.is_empty()),
            IssueField::Book => match self.selected_option() {
                Some(option) => (format!("< {} >", option.label()), false),
                None => ("<no books in catalog>".to_string(), true),
            },
        };
        let display = if is_empty && field != IssueField::Book {
            "<required>".to_string()
        } else {
            display
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, field_style(is_active, is_empty)),
        ])
    }

    pub(crate) fn value_len(&self, field: IssueField) -> usize {
        match field {
            IssueField::Borrower => self.borrower.chars().count(),
            IssueField::Date => self.date.chars().count(),
            IssueField::Book => 0,
        }
    }
}

/// Return Book form state plus its inline banner.
#[derive(Default, Clone)]
pub(crate) struct ReturnForm {
    pub(crate) book_id: String,
    pub(crate) banner: Option<TimedMessage>,
}

impl ReturnForm {
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.book_id.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.book_id.pop();
    }

    pub(crate) fn to_command(&self) -> Command {
        Command::Return(ReturnBook {
            id: self.book_id.clone(),
        })
    }

    /// Show a banner, replacing any message still on screen.
    pub(crate) fn show_banner<S: Into<String>>(&mut self, text: S, kind: StatusKind, ttl: Duration) {
        self.banner = Some(TimedMessage::new(text, kind, ttl));
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        let display = if self.book_id.is_empty() {
            "<required, e.g. B001>".to_string()
        } else {
            self.book_id.clone()
        };
        Line::from(vec![
            Span::raw("Book ID: "),
            Span::styled(display, field_style(true, self.book_id.is_empty())),
        ])
    }
}

/// Blocking message box; dismissed with Enter or Esc.
#[derive(Clone, Debug)]
pub(crate) struct Dialog {
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) kind: StatusKind,
}

impl Dialog {
    pub(crate) fn info<T: Into<String>, B: Into<String>>(title: T, body: B) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            kind: StatusKind::Info,
        }
    }

    pub(crate) fn error<T: Into<String>, B: Into<String>>(title: T, body: B) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            kind: StatusKind::Error,
        }
    }
}
