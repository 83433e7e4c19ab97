//! Ratatui front-end for the CD inventory. It renders the menu, the inventory
//! table and the modal prompts, and turns key presses into session actions.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
