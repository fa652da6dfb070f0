use std::mem;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap,
};
use ratatui::Frame;
use tracing::{info, warn};

use crate::catalog::{Catalog, RowDetails};
use crate::commands::{dispatch, Command, Outcome};
use crate::config::Settings;
use crate::error::CatalogError;
use crate::models::{BookRecord, BookStatus};

use super::forms::{BookField, BookForm, Dialog, IssueField, IssueForm, ReturnForm};
use super::helpers::{centered_rect, expire, hint_line, StatusKind, TimedMessage};
use super::screens::{CatalogScreen, Panel};

/// Height of the tab strip.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const PAGE_STEP: isize = 5;

/// Modes layered over whichever panel is showing.
enum Mode {
    Normal,
    Searching(SearchState),
    Dialog(Dialog),
}

/// State for an active inline search on the Books panel.
struct SearchState {
    query: String,
}

/// Central application state shared across the TUI.
pub struct App {
    catalog: Catalog,
    panel: Panel,
    mode: Mode,
    books: CatalogScreen,
    add_form: BookForm,
    issue_form: IssueForm,
    return_form: ReturnForm,
    status: Option<TimedMessage>,
    toast_ttl: Duration,
    banner_ttl: Duration,
}

impl App {
    pub fn new(catalog: Catalog, settings: &Settings) -> Self {
        Self {
            books: CatalogScreen::new(&catalog),
            issue_form: IssueForm::new(&catalog, today()),
            catalog,
            panel: Panel::Books,
            mode: Mode::Normal,
            add_form: BookForm::default(),
            return_form: ReturnForm::default(),
            status: None,
            toast_ttl: settings.toast_duration(),
            banner_ttl: settings.banner_duration(),
        }
    }

    /// Current session catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Handle one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => match self.panel {
                Panel::Books => self.handle_books_key(code, &mut exit),
                Panel::AddBook => self.handle_add_key(code),
                Panel::IssueBook => self.handle_issue_key(code),
                Panel::ReturnBook => self.handle_return_key(code),
            },
            Mode::Searching(state) => self.handle_search(code, state),
            Mode::Dialog(dialog) => self.handle_dialog(code, dialog),
        };

        exit
    }

    /// Expire toasts and banners whose time is up.
    pub fn tick(&mut self, now: Instant) {
        expire(&mut self.status, now);
        expire(&mut self.return_form.banner, now);
    }

    /// Ctrl+N: next panel.
    pub(crate) fn handle_ctrl_n(&mut self) {
        if matches!(self.mode, Mode::Normal) {
            self.switch_panel(self.panel.next());
        }
    }

    /// Ctrl+P: previous panel.
    pub(crate) fn handle_ctrl_p(&mut self) {
        if matches!(self.mode, Mode::Normal) {
            self.switch_panel(self.panel.previous());
        }
    }

    fn handle_books_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up => self.books.move_selection(-1),
            KeyCode::Down => self.books.move_selection(1),
            KeyCode::PageUp => self.books.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.books.move_selection(PAGE_STEP),
            KeyCode::Home => self.books.select_first(),
            KeyCode::End => self.books.select_last(),
            KeyCode::Enter => {
                if let Some(book) = self.books.current_book() {
                    let details = RowDetails::from(book);
                    return Mode::Dialog(Dialog::info(
                        format!("Book {}", details.id),
                        details.to_string(),
                    ));
                }
                self.set_status("No book selected.", StatusKind::Error);
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                self.clear_status();
                return Mode::Searching(SearchState {
                    query: self.books.filter.clone().unwrap_or_default(),
                });
            }
            KeyCode::Char('a') | KeyCode::Char('A') => self.switch_panel(Panel::AddBook),
            KeyCode::Char('i') | KeyCode::Char('I') => self.switch_panel(Panel::IssueBook),
            KeyCode::Char('r') | KeyCode::Char('R') => self.switch_panel(Panel::ReturnBook),
            _ => {}
        }
        Mode::Normal
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.books.set_filter(None);
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => self.books.move_selection(-1),
            KeyCode::Down => self.books.move_selection(1),
            KeyCode::PageUp => self.books.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.books.move_selection(PAGE_STEP),
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => {}
        }

        if state.query.is_empty() {
            self.books.set_filter(None);
        } else {
            self.books.set_filter(Some(state.query.clone()));
        }
        Mode::Searching(state)
    }

    fn handle_dialog(&mut self, code: KeyCode, dialog: Dialog) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Mode::Normal,
            _ => Mode::Dialog(dialog),
        }
    }

    fn handle_add_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc => {
                if !self.add_form.cancel_autocomplete() {
                    self.switch_panel(Panel::Books);
                }
            }
            KeyCode::Tab => {
                if !self.add_form.accept_suggestion() {
                    self.add_form.next_field();
                }
            }
            KeyCode::BackTab => self.add_form.previous_field(),
            KeyCode::Backspace => self.add_form.backspace(),
            KeyCode::Enter => return self.submit_add(),
            KeyCode::Char(ch) => {
                self.add_form.push_char(ch);
            }
            _ => {}
        }
        let categories = self.catalog.categories();
        self.add_form.update_suggestion(&categories);
        Mode::Normal
    }

    fn handle_issue_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc => self.switch_panel(Panel::Books),
            KeyCode::Tab => self.issue_form.next_field(),
            KeyCode::BackTab => self.issue_form.previous_field(),
            KeyCode::Up | KeyCode::Left if self.issue_form.active == IssueField::Book => {
                self.issue_form.cycle_book(-1)
            }
            KeyCode::Down | KeyCode::Right if self.issue_form.active == IssueField::Book => {
                self.issue_form.cycle_book(1)
            }
            KeyCode::Backspace => self.issue_form.backspace(),
            KeyCode::Enter => return self.submit_issue(),
            KeyCode::Char(ch) => {
                self.issue_form.push_char(ch);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_return_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc => self.switch_panel(Panel::Books),
            KeyCode::Backspace => self.return_form.backspace(),
            KeyCode::Enter => self.submit_return(),
            KeyCode::Char(ch) => {
                self.return_form.push_char(ch);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn submit_add(&mut self) -> Mode {
        match self.apply(self.add_form.to_command()) {
            Ok(outcome) => {
                self.add_form = BookForm::default();
                Mode::Dialog(Dialog::info("Book Added", outcome.message()))
            }
            Err(err) => {
                self.set_status(err.to_string(), StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn submit_issue(&mut self) -> Mode {
        match self.apply(self.issue_form.to_command()) {
            Ok(outcome) => {
                self.issue_form.reset(today());
                Mode::Dialog(Dialog::info("Book Issued", outcome.message()))
            }
            Err(err) => Mode::Dialog(Dialog::error("Cannot Issue Book", err.to_string())),
        }
    }

    fn submit_return(&mut self) {
        match self.apply(self.return_form.to_command()) {
            Ok(outcome) => {
                self.return_form.book_id.clear();
                self.return_form
                    .show_banner(outcome.message(), StatusKind::Info, self.banner_ttl);
            }
            Err(err) => {
                self.return_form
                    .show_banner(err.to_string(), StatusKind::Error, self.banner_ttl);
            }
        }
    }

    /// Run a command through the dispatcher and adopt the new catalog on
    /// success. Rejections leave every piece of state untouched.
    fn apply(&mut self, command: Command) -> Result<Outcome, CatalogError> {
        match dispatch(&self.catalog, command) {
            Ok(transition) => {
                let outcome = transition.outcome;
                let book = outcome.book();
                info!(id = %book.id, title = %book.title, status = %book.status, "catalog updated");
                self.catalog = transition.catalog;
                self.books.set_books(&self.catalog);
                self.issue_form.refresh_options(&self.catalog);
                Ok(outcome)
            }
            Err(err) => {
                warn!(kind = ?err.kind(), "rejected: {err}");
                Err(err)
            }
        }
    }

    fn switch_panel(&mut self, panel: Panel) {
        if self.panel != panel {
            self.clear_status();
            self.panel = panel;
        }
    }

    /// Show a footer toast. A newer toast replaces the current one.
    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(TimedMessage::new(text, kind, self.toast_ttl));
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        match self.panel {
            Panel::Books => self.draw_books(frame, chunks[1]),
            Panel::AddBook => self.draw_add_form(frame, chunks[1]),
            Panel::IssueBook => self.draw_issue_form(frame, chunks[1]),
            Panel::ReturnBook => self.draw_return_form(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Searching(state) => self.draw_search_bar(frame, chunks[1], state),
            Mode::Dialog(dialog) => self.draw_dialog(frame, area, dialog),
            Mode::Normal => {}
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let tabs = Tabs::new(Panel::ALL.iter().map(|panel| panel.title()))
            .block(Block::default().borders(Borders::ALL).title("Library Desk"))
            .select(self.panel.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_books(&self, frame: &mut Frame, area: Rect) {
        let title = if self.books.is_filtered() {
            format!(
                "Books ({} of {})",
                self.books.filtered_books.len(),
                self.books.books.len()
            )
        } else {
            format!("Books ({})", self.books.books.len())
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.books.filtered_books.is_empty() {
            let text = if self.books.books.is_empty() {
                "No books yet. Press 'a' to add one.".to_string()
            } else {
                format!(
                    "No books match \"{}\".",
                    self.books.filter.as_deref().unwrap_or_default()
                )
            };
            let message = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(["ID", "Title", "Author", "Category", "Status"]).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        let rows = self.books.filtered_books.iter().map(book_row);
        let widths = [
            Constraint::Length(6),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
            Constraint::Length(10),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(Some(self.books.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_add_form(&self, frame: &mut Frame, area: Rect) {
        let form = &self.add_form;
        let block = Block::default().borders(Borders::ALL).title("Add Book");
        let inner = block.inner(area);
        let lines = vec![
            form.build_line("Title", BookField::Title),
            form.build_line("Author", BookField::Author),
            form.build_line("Category", BookField::Category),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to add • Tab to accept/switch • Esc to go back",
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);

        let (prefix, row) = match form.active {
            BookField::Title => ("Title: ", 0),
            BookField::Author => ("Author: ", 1),
            BookField::Category => ("Category: ", 2),
        };
        if !matches!(self.mode, Mode::Dialog(_)) {
            frame.set_cursor_position((
                inner.x + prefix.len() as u16 + form.value_len(form.active) as u16,
                inner.y + row,
            ));
        }
    }

    fn draw_issue_form(&self, frame: &mut Frame, area: Rect) {
        let form = &self.issue_form;
        let block = Block::default().borders(Borders::ALL).title("Issue Book");
        let inner = block.inner(area);
        let lines = vec![
            form.build_line("Borrower", IssueField::Borrower),
            form.build_line("Book", IssueField::Book),
            form.build_line("Issue date", IssueField::Date),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to issue • Tab to switch • ↑↓ to pick a book • Esc to go back",
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if matches!(self.mode, Mode::Dialog(_)) {
            return;
        }
        let cursor = match form.active {
            IssueField::Borrower => Some(("Borrower: ", 0)),
            IssueField::Date => Some(("Issue date: ", 2)),
            IssueField::Book => None,
        };
        if let Some((prefix, row)) = cursor {
            frame.set_cursor_position((
                inner.x + prefix.len() as u16 + form.value_len(form.active) as u16,
                inner.y + row,
            ));
        }
    }

    fn draw_return_form(&self, frame: &mut Frame, area: Rect) {
        let form = &self.return_form;
        let block = Block::default().borders(Borders::ALL).title("Return Book");
        let inner = block.inner(area);
        let mut lines = vec![form.build_line(), Line::from("")];
        if let Some(banner) = &form.banner {
            lines.push(Line::from(Span::styled(
                banner.text.clone(),
                banner.kind.style().add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to return • Esc to go back",
                Style::default().fg(Color::Gray),
            )));
        }
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
            area,
        );

        if !matches!(self.mode, Mode::Dialog(_)) {
            frame.set_cursor_position((
                inner.x + "Book ID: ".len() as u16 + form.book_id.chars().count() as u16,
                inner.y,
            ));
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_dialog(&self, frame: &mut Frame, area: Rect, dialog: &Dialog) {
        let popup_area = centered_rect(60, 45, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(dialog.title.clone())
            .borders(Borders::ALL)
            .border_style(dialog.kind.style());
        let mut lines: Vec<Line> = dialog.body.lines().map(Line::from).collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(Color::Gray),
        )));
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup_area);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match (&self.mode, self.panel) {
            (Mode::Dialog(_), _) => hint_line(&[("Enter", "OK")]),
            (Mode::Searching(_), _) => hint_line(&[
                ("↑↓", "Select"),
                ("Enter", "Keep Filter"),
                ("Esc", "Clear Filter"),
            ]),
            (Mode::Normal, Panel::Books) => hint_line(&[
                ("↑↓", "Select"),
                ("Enter", "Details"),
                ("f", "Search"),
                ("a", "Add"),
                ("i", "Issue"),
                ("r", "Return"),
                ("Ctrl+N/P", "Panels"),
                ("q", "Quit"),
            ]),
            (Mode::Normal, Panel::AddBook) => hint_line(&[
                ("Tab", "Next Field"),
                ("Enter", "Add"),
                ("Ctrl+N/P", "Panels"),
                ("Esc", "Back"),
            ]),
            (Mode::Normal, Panel::IssueBook) => hint_line(&[
                ("Tab", "Next Field"),
                ("↑↓", "Pick Book"),
                ("Enter", "Issue"),
                ("Ctrl+N/P", "Panels"),
                ("Esc", "Back"),
            ]),
            (Mode::Normal, Panel::ReturnBook) => hint_line(&[
                ("Enter", "Return"),
                ("Ctrl+N/P", "Panels"),
                ("Esc", "Back"),
            ]),
        }
    }
}

fn book_row(book: &BookRecord) -> Row<'static> {
    let status_style = match book.status {
        BookStatus::Available => Style::default().fg(Color::Green),
        BookStatus::Issued => Style::default().fg(Color::Red),
    };
    Row::new(vec![
        Cell::from(book.id.to_string()),
        Cell::from(book.title.clone()),
        Cell::from(book.author.clone()),
        Cell::from(book.category.clone()),
        Cell::from(Span::styled(book.status.label(), status_style)),
    ])
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
