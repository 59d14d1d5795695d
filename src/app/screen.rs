//! Application screen state management
//!
//! Handles transitions between different application screens:
//! - Main menu
//! - Playing (solo or pass & play), including the end-of-round summary
//! - Lifetime stats
//! - Error display

use crate::game::progress::{NullReporter, ProgressReporter};
use crate::game::{PlayMode, RoundFactory};
use crate::stats::{PlayerStats, StatsTracker};
use crate::storage::{Storage, StorageReporter};
use crossterm::event::KeyCode;
use std::rc::Rc;

use super::state::App;

/// Longest handle accepted from the menu
pub const MAX_HANDLE_LEN: usize = 12;

/// Trim a handle and cut it to `MAX_HANDLE_LEN` chars
pub fn clamp_handle(handle: &str) -> String {
    handle.trim().chars().take(MAX_HANDLE_LEN).collect::<String>().trim_end().to_string()
}

/// Menu option on the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Solo,
    PassAndPlay,
    Stats,
    Quit,
}

impl MenuOption {
    /// All menu options in order
    pub fn all() -> &'static [MenuOption] {
        &[
            MenuOption::Solo,
            MenuOption::PassAndPlay,
            MenuOption::Stats,
            MenuOption::Quit,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::Solo => "Solo",
            MenuOption::PassAndPlay => "Pass & Play",
            MenuOption::Stats => "Stats",
            MenuOption::Quit => "Quit",
        }
    }
}

/// The current application screen
pub enum Screen {
    /// Main menu
    Menu {
        selected: usize,
        handle_input: String,
        editing_handle: bool,
    },
    /// Playing a round (the end-of-round summary is part of this screen)
    Playing { app: App },
    /// Lifetime statistics
    Stats {
        players: Vec<PlayerStats>,
        elo: Vec<(String, f64)>,
    },
    Error { message: String },
}

/// Session-wide settings handed to the coordinator
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub handle: String,
    /// Extra players for pass & play
    pub guests: Vec<String>,
    /// Round duration in seconds, 0 for untimed
    pub duration: u32,
}

/// Main application coordinator
pub struct AppCoordinator {
    pub screen: Screen,
    pub should_quit: bool,
    /// Current player handle
    pub handle: String,
    factory: RoundFactory,
    storage: Option<Rc<Storage>>,
    guests: Vec<String>,
    duration: u32,
}

impl AppCoordinator {
    /// Create a coordinator starting at the menu. Without storage, rounds
    /// are not recorded and stats are unavailable.
    pub fn new(factory: RoundFactory, storage: Option<Rc<Storage>>, settings: SessionSettings) -> Self {
        let handle = clamp_handle(&settings.handle);
        Self {
            screen: Screen::Menu {
                selected: 0,
                handle_input: handle.clone(),
                editing_handle: false,
            },
            should_quit: false,
            handle,
            factory,
            storage,
            guests: settings.guests,
            duration: settings.duration,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Go back to the main menu
    pub fn go_to_menu(&mut self) {
        self.screen = Screen::Menu {
            selected: 0,
            handle_input: self.handle.clone(),
            editing_handle: false,
        };
    }

    /// Route a key press to the current screen
    pub fn on_key(&mut self, code: KeyCode) {
        match &self.screen {
            Screen::Menu { editing_handle: true, .. } => match code {
                KeyCode::Enter | KeyCode::Tab => self.menu_tab(),
                KeyCode::Esc => self.menu_cancel_edit(),
                KeyCode::Backspace => self.menu_backspace(),
                KeyCode::Char(c) => self.menu_char(c),
                _ => {}
            },
            Screen::Menu { .. } => match code {
                KeyCode::Up => self.menu_up(),
                KeyCode::Down => self.menu_down(),
                KeyCode::Tab => self.menu_tab(),
                KeyCode::Enter => self.menu_select(),
                KeyCode::Esc => self.quit(),
                _ => {}
            },
            Screen::Playing { .. } => self.playing_key(code),
            Screen::Stats { .. } | Screen::Error { .. } => {
                if matches!(code, KeyCode::Esc | KeyCode::Enter) {
                    self.go_to_menu();
                }
            }
        }
    }

    fn playing_key(&mut self, code: KeyCode) {
        let Screen::Playing { app } = &mut self.screen else {
            return;
        };

        if app.is_round_over() {
            match code {
                KeyCode::Enter => self.next_round(),
                KeyCode::Esc => self.go_to_menu(),
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Up => app.move_cursor(-1, 0),
            KeyCode::Down => app.move_cursor(1, 0),
            KeyCode::Left => app.move_cursor(0, -1),
            KeyCode::Right => app.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => app.on_select(),
            KeyCode::Backspace => app.cancel_selection(),
            KeyCode::Tab => app.next_player(),
            KeyCode::Char('g') => app.give_up(),
            KeyCode::Esc => {
                if app.anchor.is_some() {
                    app.cancel_selection();
                } else {
                    // Leaving mid-round still records it
                    app.give_up();
                    self.go_to_menu();
                }
            }
            _ => {}
        }
    }

    /// Handle menu navigation (up)
    pub fn menu_up(&mut self) {
        if let Screen::Menu { selected, .. } = &mut self.screen {
            *selected = selected.saturating_sub(1);
        }
    }

    /// Handle menu navigation (down)
    pub fn menu_down(&mut self) {
        if let Screen::Menu { selected, .. } = &mut self.screen {
            if *selected < MenuOption::all().len() - 1 {
                *selected += 1;
            }
        }
    }

    /// Handle menu character input (for handle editing)
    pub fn menu_char(&mut self, c: char) {
        if let Screen::Menu { handle_input, editing_handle: true, .. } = &mut self.screen {
            if handle_input.chars().count() < MAX_HANDLE_LEN && !c.is_control() {
                handle_input.push(c);
            }
        }
    }

    /// Handle menu backspace (for handle editing)
    pub fn menu_backspace(&mut self) {
        if let Screen::Menu { handle_input, editing_handle: true, .. } = &mut self.screen {
            handle_input.pop();
        }
    }

    fn menu_cancel_edit(&mut self) {
        if let Screen::Menu { handle_input, editing_handle, .. } = &mut self.screen {
            *handle_input = self.handle.clone();
            *editing_handle = false;
        }
    }

    /// Toggle handle editing; finishing an edit saves the handle
    pub fn menu_tab(&mut self) {
        let Screen::Menu { handle_input, editing_handle, .. } = &mut self.screen else {
            return;
        };

        if *editing_handle {
            let trimmed = handle_input.trim().to_string();
            if trimmed.is_empty() {
                *handle_input = self.handle.clone();
            } else {
                *handle_input = trimmed.clone();
                self.handle = trimmed;
                if let Some(storage) = &self.storage {
                    if let Err(e) = storage.set_handle(&self.handle) {
                        tracing::warn!(error = %e, "failed to save handle");
                    }
                }
            }
        }
        *editing_handle = !*editing_handle;
    }

    /// Handle menu selection (Enter)
    pub fn menu_select(&mut self) {
        let Screen::Menu { selected, .. } = &self.screen else {
            return;
        };
        let option = MenuOption::all()[*selected];

        match option {
            MenuOption::Solo => self.start_round(PlayMode::Solo),
            MenuOption::PassAndPlay => self.start_round(PlayMode::PassAndPlay),
            MenuOption::Stats => self.show_stats(),
            MenuOption::Quit => self.quit(),
        }
    }

    fn players_for(&self, mode: PlayMode) -> Vec<String> {
        let mut players = vec![self.handle.clone()];
        if mode == PlayMode::PassAndPlay {
            players.extend(self.guests.iter().filter(|g| **g != self.handle).cloned());
        }
        players
    }

    fn reporter(&self) -> Box<dyn ProgressReporter> {
        match &self.storage {
            Some(storage) => Box::new(StorageReporter::new(Rc::clone(storage))),
            None => Box::new(NullReporter),
        }
    }

    /// Start the first round of a session
    pub fn start_round(&mut self, mode: PlayMode) {
        match self.factory.next_puzzle() {
            Ok(puzzle) => {
                let app = App::new(
                    puzzle,
                    mode,
                    self.players_for(mode),
                    self.factory.theme_label().to_string(),
                    self.duration,
                    self.reporter(),
                );
                self.screen = Screen::Playing { app };
            }
            Err(e) => {
                tracing::error!(error = %e, "could not generate puzzle");
                self.screen = Screen::Error {
                    message: e.to_string(),
                };
            }
        }
    }

    /// Replace a finished round with a fresh puzzle
    pub fn next_round(&mut self) {
        let Screen::Playing { app } = &mut self.screen else {
            return;
        };
        if !app.is_round_over() {
            return;
        }

        match self.factory.next_puzzle() {
            Ok(puzzle) => app.start_round(puzzle),
            Err(e) => {
                tracing::error!(error = %e, "could not generate puzzle");
                self.screen = Screen::Error {
                    message: e.to_string(),
                };
            }
        }
    }

    /// Rebuild lifetime stats from the round history
    pub fn show_stats(&mut self) {
        let Some(storage) = &self.storage else {
            self.screen = Screen::Error {
                message: "stats unavailable: no database".to_string(),
            };
            return;
        };

        match storage.round_records() {
            Ok(mut records) => {
                let mut tracker = StatsTracker::new();
                tracker.rebuild_from_records(&mut records);
                self.screen = Screen::Stats {
                    players: tracker.points_leaderboard().into_iter().cloned().collect(),
                    elo: tracker.elo_leaderboard(),
                };
            }
            Err(e) => {
                tracing::error!(error = %e, "could not load round history");
                self.screen = Screen::Error {
                    message: e.to_string(),
                };
            }
        }
    }

    /// Advance timers (call once per second)
    pub fn tick(&mut self) {
        if let Screen::Playing { app } = &mut self.screen {
            app.tick();
        }
    }
}
