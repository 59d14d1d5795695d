//! Terminal UI: crossterm setup and ratatui rendering

mod terminal;
mod ui;

pub use terminal::Tui;
pub use ui::render;
