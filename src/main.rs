//! motmele - a terminal word search
//!
//! Find the hidden words. Alone against the clock, or pass the keyboard around.

mod app;
mod config;
mod game;
mod logging;
mod puzzle;
mod stats;
mod storage;
mod tui;

use app::{AppCoordinator, SessionSettings, FALLBACK_PLAYER};
use clap::Parser;
use config::{Cli, Command, Config, ConfigError};
use crossterm::event::{self, Event, KeyEventKind};
use game::vocabulary::VocabularyError;
use game::{GameError, RoundFactory};
use puzzle::Puzzle;
use std::fmt::{Debug, Formatter};
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use storage::Storage;
use tui::Tui;

#[derive(thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

// Returned from main, so print the message rather than the variant
impl Debug for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error: {}", self)
    }
}

fn main() -> Result<(), AppError> {
    let config = Config::from_cli(Cli::parse())?;

    let data_dir = config.data_dir.clone().or_else(|| Storage::data_dir().ok());
    if let Some(dir) = &data_dir {
        if let Err(e) = logging::init(dir) {
            eprintln!("warning: logging disabled: {}", e);
        }
    }

    let factory = RoundFactory::new(
        config.vocabulary()?,
        config.theme.clone(),
        config.word_count,
        config.options.clone(),
        config.seed,
    )?;

    match config.command {
        Command::Print { answers } => print_puzzle(factory, answers),
        Command::Play => play(factory, &config, data_dir),
    }
}

/// Write one puzzle to stdout
fn print_puzzle(mut factory: RoundFactory, answers: bool) -> Result<(), AppError> {
    let puzzle = factory.next_puzzle()?;
    print!("{}", render_text(&puzzle, answers));
    Ok(())
}

fn render_text(puzzle: &Puzzle, answers: bool) -> String {
    let mut out = puzzle.grid().to_string();
    out.push('\n');
    for placement in puzzle.placements() {
        if answers {
            let reversed = if placement.reversed { ", reversed" } else { "" };
            out.push_str(&format!(
                "{:<14} {} -> {} {}{}\n",
                placement.word,
                placement.start,
                placement.end(),
                placement.direction.label(),
                reversed
            ));
        } else {
            out.push_str(&placement.word);
            out.push('\n');
        }
    }
    out
}

fn open_storage(data_dir: Option<PathBuf>) -> Option<Rc<Storage>> {
    let Some(dir) = data_dir else {
        tracing::warn!("no data directory; rounds will not be recorded");
        return None;
    };
    match Storage::open_in(&dir) {
        Ok(storage) => Some(Rc::new(storage)),
        Err(e) => {
            tracing::warn!(error = %e, "could not open database; rounds will not be recorded");
            None
        }
    }
}

/// Pick the player handle: command line, then saved, then the login name
fn resolve_handle(config: &Config, storage: Option<&Storage>) -> String {
    if let Some(handle) = &config.handle {
        if let Some(storage) = storage {
            if let Err(e) = storage.set_handle(handle) {
                tracing::warn!(error = %e, "failed to save handle");
            }
        }
        return handle.clone();
    }

    let saved = storage.and_then(|s| match s.handle() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load handle");
            None
        }
    });

    saved
        .or_else(|| std::env::var("USER").ok().filter(|u| !u.is_empty()))
        .unwrap_or_else(|| FALLBACK_PLAYER.to_string())
}

fn play(factory: RoundFactory, config: &Config, data_dir: Option<PathBuf>) -> Result<(), AppError> {
    let storage = open_storage(data_dir);
    let handle = resolve_handle(config, storage.as_deref());
    let guests = if config.guests.is_empty() {
        vec![format!("{} 2", FALLBACK_PLAYER)]
    } else {
        config.guests.clone()
    };

    tracing::info!(handle = %handle, guests = guests.len(), "starting session");

    let mut coordinator = AppCoordinator::new(
        factory,
        storage,
        SessionSettings {
            handle,
            guests,
            duration: config.duration,
        },
    );

    let mut terminal = Tui::new()?;
    terminal.enter()?;

    let tick_rate = Duration::from_secs(1);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| tui::render(frame, &coordinator))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    coordinator.on_key(key.code);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            coordinator.tick();
            last_tick = Instant::now();
        }

        if coordinator.should_quit {
            break;
        }
    }

    tracing::info!("session ended");
    // Terminal cleanup happens via Tui::drop
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::vocabulary::Vocabulary;
    use crate::puzzle::PuzzleOptions;

    fn seeded_factory() -> RoundFactory {
        RoundFactory::new(
            Vocabulary::embedded(),
            Some("vertus".to_string()),
            4,
            PuzzleOptions::default(),
            Some(9),
        )
        .unwrap()
    }

    fn test_config(args: &[&str]) -> Config {
        let mut argv = vec!["motmele"];
        argv.extend_from_slice(args);
        Config::from_cli(Cli::try_parse_from(argv).unwrap()).unwrap()
    }

    #[test]
    fn test_render_text_lists_words() {
        let puzzle = seeded_factory().next_puzzle().unwrap();
        let text = render_text(&puzzle, false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), puzzle.grid().height() + 1 + puzzle.placements().len());
        for word in puzzle.placed_words() {
            assert!(lines.contains(&word.as_str()));
        }
    }

    #[test]
    fn test_render_text_answers() {
        let puzzle = seeded_factory().next_puzzle().unwrap();
        let text = render_text(&puzzle, true);
        for placement in puzzle.placements() {
            assert!(text.contains(&format!("{} -> {}", placement.start, placement.end())));
        }
    }

    #[test]
    fn test_resolve_handle_prefers_command_line_and_saves_it() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set_handle("Ancien").unwrap();

        let config = test_config(&["--handle", "Ana"]);
        assert_eq!(resolve_handle(&config, Some(&storage)), "Ana");
        assert_eq!(storage.handle().unwrap(), Some("Ana".to_string()));
    }

    #[test]
    fn test_saved_handle_matches_session_handle() {
        let storage = Storage::open_in_memory().unwrap();
        let config = test_config(&["--handle", "Marie-Bernadette"]);
        let handle = resolve_handle(&config, Some(&storage));

        let coordinator = AppCoordinator::new(
            seeded_factory(),
            None,
            SessionSettings {
                handle: handle.clone(),
                guests: Vec::new(),
                duration: 0,
            },
        );
        assert_eq!(storage.handle().unwrap(), Some(coordinator.handle.clone()));
        assert_eq!(handle, coordinator.handle);
    }

    #[test]
    fn test_resolve_handle_uses_saved() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set_handle("Bérénice").unwrap();
        assert_eq!(resolve_handle(&test_config(&[]), Some(&storage)), "Bérénice");
    }

    #[test]
    fn test_open_storage_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_storage(Some(dir.path().to_path_buf())).is_some());
        assert!(open_storage(None).is_none());
    }
}
