//! In-memory catalog split across logical submodules: the repository itself,
//! the read-only views the Books panel uses, and seed loading.

mod details;
mod repository;
mod search;
mod seed;

pub use details::RowDetails;
pub use repository::Catalog;
pub(crate) use search::fold_case;
pub use search::{matches_query, row_text};
pub use seed::{default_records, load_seed_file, parse_seed};
