//! Ratatui front end. `App` owns the session catalog and turns key presses
//! into dispatcher commands; everything here is presentation.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
