//! UI rendering using ratatui
//!
//! Supports multiple screens:
//! - Menu: Main menu with options and handle editing
//! - Playing: Grid, word list, timer, scoreboard, end-of-round summary
//! - Stats: Lifetime stats and Elo leaderboard
//! - Error: Error message display

use crate::app::{App, AppCoordinator, MenuOption, Screen};
use crate::game::PlayMode;
use crate::puzzle::Coord;
use crate::stats::PlayerStats;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) {
    match &coordinator.screen {
        Screen::Menu {
            selected,
            handle_input,
            editing_handle,
        } => {
            render_menu(frame, *selected, &coordinator.handle, handle_input, *editing_handle);
        }
        Screen::Playing { app } => render_game(frame, app),
        Screen::Stats { players, elo } => render_stats(frame, players, elo),
        Screen::Error { message } => render_error(frame, message),
    }
}

/// Render the main menu
fn render_menu(frame: &mut Frame, selected: usize, handle: &str, handle_input: &str, editing_handle: bool) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Logo
            Constraint::Length(3), // Handle input
            Constraint::Length(1), // Spacer
            Constraint::Min(6),    // Menu options
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = r#"
 __  __  ___ _____ __  __ _____ _     _____
|  \/  |/ _ \_   _|  \/  | ____| |   | ____|
| |\/| | | | || | | |\/| |  _| | |   |  _|
| |  | | |_| || | | |  | | |___| |___| |___
|_|  |_|\___/ |_| |_|  |_|_____|_____|_____|
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    let handle_display = if editing_handle {
        format!("Handle: [{}]_", handle_input)
    } else {
        format!("Handle: {} (Tab to edit)", handle)
    };
    let handle_style = if editing_handle {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let handle_widget = Paragraph::new(handle_display)
        .style(handle_style)
        .alignment(Alignment::Center);
    frame.render_widget(handle_widget, layout[1]);

    let items: Vec<ListItem> = MenuOption::all()
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            ListItem::new(format!("{}{}", prefix, opt.label())).style(style)
        })
        .collect();
    frame.render_widget(List::new(items).block(Block::default()), layout[3]);

    let footer = Paragraph::new("↑↓ Navigate  Enter Select  Esc Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[4]);
}

/// Render the in-game screen
fn render_game(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header: title, theme, player, timer
            Constraint::Min(0),    // Grid and side panels
            Constraint::Length(1), // Feedback
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, layout[0], app);

    let grid_width = (app.grid().width() as u16) * 3 + 2;
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(grid_width), // Grid
            Constraint::Min(24),            // Words / summary
        ])
        .split(layout[1]);

    render_grid(frame, body[0], app);
    if app.is_round_over() {
        render_end_summary(frame, body[1], app);
    } else {
        render_side_panels(frame, body[1], app);
    }

    let (feedback_text, feedback_color) = format_feedback(&app.feedback);
    frame.render_widget(
        Paragraph::new(feedback_text).style(Style::default().fg(feedback_color).bold()),
        layout[2],
    );

    let help = if app.is_round_over() {
        "Enter Next round  Esc Menu"
    } else if app.mode == PlayMode::PassAndPlay {
        "←↑↓→ Move  Enter/Space Select  Tab Next player  Bksp Cancel  g Give up  Esc Menu"
    } else {
        "←↑↓→ Move  Enter/Space Select  Bksp Cancel  g Give up  Esc Menu"
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        layout[3],
    );
}

/// Render the header: title, theme, active player, timer
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Title
            Constraint::Min(20),    // Theme and player
            Constraint::Length(12), // Timer
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new("MOTMELE").style(Style::default().fg(Color::Yellow).bold()),
        header_layout[0],
    );

    let found = app.arbitrator().words().len() - app.arbitrator().remaining().len();
    let player = app.active_player();
    let info = format!(
        "{} · {} · {}/{} found · {} to play ({} pts)",
        app.mode.label(),
        app.theme,
        found,
        app.arbitrator().words().len(),
        player,
        app.arbitrator().player_score(player)
    );
    frame.render_widget(
        Paragraph::new(info)
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center),
        header_layout[1],
    );

    let (timer_display, timer_color) = if app.is_timed() {
        let color = if app.time_remaining <= 10 {
            Color::Red
        } else if app.time_remaining <= 30 {
            Color::Yellow
        } else {
            Color::Green
        };
        (format_timer(app.time_remaining), color)
    } else {
        (format_timer(app.elapsed), Color::White)
    };
    frame.render_widget(
        Paragraph::new(timer_display)
            .style(Style::default().fg(timer_color).bold())
            .alignment(Alignment::Right),
        header_layout[2],
    );
}

/// Render the letter grid with cursor, selection preview and found words
fn render_grid(frame: &mut Frame, area: Rect, app: &App) {
    let grid = app.grid();
    let preview = app.preview_cells();
    let missed: Vec<Coord> = if app.is_round_over() {
        app.missed_placements().iter().flat_map(|p| p.cells()).collect()
    } else {
        Vec::new()
    };

    let lines: Vec<Line> = (0..grid.height())
        .map(|row| {
            let spans: Vec<Span> = grid
                .row(row)
                .iter()
                .enumerate()
                .map(|(col, letter)| {
                    let coord = Coord::new(row, col);
                    let mut style = Style::default().fg(Color::White);
                    if app.is_found_cell(coord) {
                        style = style.fg(Color::Green).bold();
                    }
                    if missed.contains(&coord) {
                        style = style.fg(Color::Red).bold();
                    }
                    if preview.contains(&coord) {
                        style = style.bg(Color::Yellow).fg(Color::Black);
                    }
                    if app.anchor == Some(coord) {
                        style = style.bg(Color::Magenta).fg(Color::White);
                    }
                    if coord == app.cursor && !app.is_round_over() {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Span::styled(format!(" {} ", letter), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title("Grille");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Word list plus, in pass & play, the scoreboard and claim feed
fn render_side_panels(frame: &mut Frame, area: Rect, app: &App) {
    if app.mode == PlayMode::PassAndPlay {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(6),                                  // Words
                Constraint::Length(app.players().len() as u16 + 2), // Scoreboard
                Constraint::Length(8),                               // Claim feed
            ])
            .split(area);
        render_word_list(frame, layout[0], app);
        render_scoreboard(frame, layout[1], app);
        render_claim_feed(frame, layout[2], app);
    } else {
        render_word_list(frame, area, app);
    }
}

/// Render the words to find, found ones struck through
fn render_word_list(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .arbitrator()
        .words()
        .iter()
        .map(|word| match app.arbitrator().finder(word) {
            Some(by) => {
                let label = if app.mode == PlayMode::PassAndPlay {
                    format!("{} ({})", word, by)
                } else {
                    word.clone()
                };
                ListItem::new(label).style(
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            }
            None => ListItem::new(word.clone()).style(Style::default().fg(Color::White)),
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Mots"),
    );
    frame.render_widget(list, area);
}

/// Render the live scoreboard
fn render_scoreboard(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .arbitrator()
        .scores()
        .into_iter()
        .enumerate()
        .map(|(i, (name, score))| {
            let style = if name == app.active_player() {
                Style::default().fg(Color::Cyan).bold()
            } else if i == 0 && score > 0 {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if name == app.active_player() { "▶" } else { " " };
            let words = app.arbitrator().found_by(&name).len();
            ListItem::new(format!("{} {} - {} ({} words)", marker, name, score, words)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Scoreboard"),
    );
    frame.render_widget(list, area);
}

/// Render the claim feed, most recent first
fn render_claim_feed(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .claim_feed
        .iter()
        .rev()
        .take(6)
        .map(|entry| {
            ListItem::new(format!("{}: {} +{}", entry.player_name, entry.word, entry.points))
                .style(Style::default().fg(Color::Green))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Claims"),
    );
    frame.render_widget(list, area);
}

/// Render the end-of-round summary
fn render_end_summary(frame: &mut Frame, area: Rect, app: &App) {
    let summary = app.round_summary();

    let title = if summary.completed {
        Line::from("ALL WORDS FOUND!").style(Style::default().fg(Color::Green).bold())
    } else {
        Line::from("ROUND OVER").style(Style::default().fg(Color::Red).bold())
    };

    let mut lines = vec![
        title,
        Line::from(""),
        Line::from(format!("Time: {}", format_timer(summary.elapsed_secs))),
        Line::from(""),
    ];

    for (i, (name, score)) in summary.scores.iter().enumerate() {
        let style = if i == 0 {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(format!("{} - {}", name, score)).style(style));
    }

    lines.push(Line::from(""));
    lines.push(
        Line::from(format!(
            "Found: {}/{}",
            summary.found.len(),
            summary.found.len() + summary.missed.len()
        ))
        .style(Style::default().fg(Color::Cyan)),
    );
    if !summary.missed.is_empty() {
        lines.push(Line::from("Missed:").style(Style::default().fg(Color::Red)));
        for word in &summary.missed {
            let location = app
                .puzzle()
                .placement(word)
                .map(|p| format!(" {} -> {}", p.start, p.end()))
                .unwrap_or_default();
            lines.push(
                Line::from(format!("  {}{}", word, location)).style(Style::default().fg(Color::Red)),
            );
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title("Résultat");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Render lifetime stats and the Elo leaderboard
fn render_stats(frame: &mut Frame, players: &[PlayerStats], elo: &[(String, f64)]) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Tables
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    let header = Paragraph::new("Stats")
        .style(Style::default().fg(Color::Cyan).bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, layout[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(28)])
        .split(layout[1]);

    let items: Vec<ListItem> = if players.is_empty() {
        vec![ListItem::new("No rounds played yet").style(Style::default().fg(Color::DarkGray))]
    } else {
        players
            .iter()
            .map(|p| {
                let fastest = p
                    .fastest_completion
                    .map_or_else(|| "-".to_string(), format_timer);
                ListItem::new(format!(
                    "{:<12} rounds {:>3}  wins {:>3}  elo {:>5.0}  pts {:>4}  avg {:>5.1}  best {:>3}  words {:>3}  done {:>3}  fastest {:>5}  longest {}",
                    p.handle,
                    p.rounds_played,
                    p.wins,
                    p.elo,
                    p.total_points,
                    p.average_score(),
                    p.best_score,
                    p.words_found,
                    p.puzzles_completed,
                    fastest,
                    p.longest_word
                ))
            })
            .collect()
    };
    frame.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title("Players")),
        columns[0],
    );

    let elo_items: Vec<ListItem> = elo
        .iter()
        .map(|(name, rating)| ListItem::new(format!("{:<12} {:>6.0}", name, rating)))
        .collect();
    frame.render_widget(
        List::new(elo_items).block(Block::default().borders(Borders::ALL).title("Elo (Pass & Play)")),
        columns[1],
    );

    let footer = Paragraph::new("Esc Back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);
}

/// Render error screen
fn render_error(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Percentage(40),
        ])
        .margin(2)
        .split(area);

    let error = Paragraph::new(format!("Error: {}", message))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center);
    frame.render_widget(error, layout[1]);

    let hint = Paragraph::new("Press Esc to go back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hint, layout[2]);
}

/// Format a number of seconds as m:ss
fn format_timer(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Pick a color for a feedback message
fn format_feedback(feedback: &str) -> (String, Color) {
    let color = if feedback.starts_with("OK") || feedback.starts_with("ALL WORDS") {
        Color::Green
    } else if feedback.starts_with("NOPE")
        || feedback.starts_with("NOT A LINE")
        || feedback.starts_with("TIME'S UP")
        || feedback.starts_with("GAVE UP")
    {
        Color::Red
    } else if feedback.starts_with("ALREADY FOUND") {
        Color::Yellow
    } else {
        Color::White
    };

    (feedback.to_string(), color)
}
