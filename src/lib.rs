//! Core library surface for the library front-desk TUI.
//!
//! The catalog and command dispatcher know nothing about the terminal; the
//! `ui` module is one consumer of them.
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

pub use catalog::{default_records, load_seed_file, Catalog, RowDetails};
pub use commands::{dispatch, AddBook, BookRef, Command, IssueBook, Outcome, ReturnBook};
pub use config::{load_settings, Settings};
pub use error::{CatalogError, ErrorKind};
pub use logging::init_logging;
pub use models::{BookId, BookRecord, BookStatus};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
