//! Application state and core logic

pub mod screen;
pub mod state;

pub use screen::{clamp_handle, AppCoordinator, MenuOption, Screen, SessionSettings};
pub use state::{App, DEFAULT_ROUND_DURATION, FALLBACK_PLAYER};
