//! TUI (Terminal User Interface) module for Wordle Assistant
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # State Machine
//! - `EnteringGuess` → `MarkingFeedback` → `ConfirmingFeedback` → back to `EnteringGuess`
//! - Terminal state: `GameOver` (solution found or rounds used up)
//!
//! Marks are entered per letter (G/Y/X) and collapsed into the yellow and
//! green letter lists the accumulator expects.

use crate::cli::format_constraints;
use crate::constraints::ConstraintState;
use crate::feedback::{Mark, RoundFeedback};
use crate::game_state::{FeedbackAction, GameConfig, GameInterface, SessionInfo, UserAction};
use crate::solver::Suggestions;
use crate::{debug_log, info_log};
use itertools::Itertools;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ROW_SPACING: u16 = 2;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const FILLER_STYLE: Style = Style::new().fg(Color::DarkGray);

/// Status line while marking `guess`.
///
/// Marks only keep their letters, so repeated letters are placed on the
/// leftmost copies first whatever position was marked.
fn marking_status(guess: &str) -> String {
    let base = "Mark each letter: G (green), Y (yellow), or X (gray)";
    if guess.chars().all_unique() {
        base.to_string()
    } else {
        format!("{base}. Repeated letters: marks apply to the leftmost copies first")
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum LetterState {
    Entered,
    Marked(Mark),
}

impl LetterState {
    fn colors(self) -> (Color, Color) {
        match self {
            Self::Entered => (Color::DarkGray, Color::White),
            Self::Marked(Mark::Green) => (Color::Green, Color::Black),
            Self::Marked(Mark::Yellow) => (Color::Yellow, Color::Black),
            Self::Marked(Mark::Gray) => (Color::Gray, Color::White),
        }
    }
}

#[derive(Debug)]
struct GuessRow {
    letters: Vec<char>,
    states: Vec<LetterState>,
}

impl GuessRow {
    fn from_guess(guess: &str) -> Self {
        let letters: Vec<char> = guess.chars().map(|c| c.to_ascii_uppercase()).collect();
        let states = vec![LetterState::Entered; letters.len()];
        Self { letters, states }
    }

    fn marks(&self) -> Option<Vec<Mark>> {
        self.states
            .iter()
            .map(|state| match state {
                LetterState::Marked(mark) => Some(*mark),
                LetterState::Entered => None,
            })
            .collect()
    }
}

#[derive(Debug)]
enum TuiState {
    EnteringGuess,
    MarkingFeedback { marking_index: usize },
    ConfirmingFeedback,
    /// Game has ended - message stored in interface.message
    GameOver,
}

/// Result of one key press while marking feedback.
enum MarkingOutcome {
    Pending,
    Confirmed,
    Exit,
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    word_length: usize,
    attempts: usize,
    guesses: &'a [GuessRow],
    current_input: &'a str,
    state: &'a TuiState,
    suggestions: &'a Suggestions,
    page: usize,
    page_size: usize,
    constraints: &'a [String],
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    word_length: usize,
    attempts: usize,
    page_size: usize,
    guesses: Vec<GuessRow>,
    current_input: String,
    state: TuiState,
    suggestions: Suggestions,
    page: usize,
    constraints: Vec<String>,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new(config: &GameConfig) -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete");

        Ok(Self {
            terminal,
            word_length: config.word_length,
            attempts: config.attempts,
            page_size: config.suggestions_count.max(1),
            guesses: Vec::new(),
            current_input: String::new(),
            state: TuiState::EnteringGuess,
            suggestions: Suggestions::default(),
            page: 0,
            constraints: Vec::new(),
            message: String::new(),
            error_message: String::new(),
            status: "Ready to start".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    /// Draw the current UI state to the terminal.
    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            word_length: self.word_length,
            attempts: self.attempts,
            guesses: &self.guesses,
            current_input: &self.current_input,
            state: &self.state,
            suggestions: &self.suggestions,
            page: self.page,
            page_size: self.page_size,
            constraints: &self.constraints,
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn page_count(&self) -> usize {
        self.suggestions.words.len().div_ceil(self.page_size)
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Title
                Constraint::Min(10),    // Board and suggestions
                Constraint::Length(3),  // Status line
                Constraint::Length(3),  // Instructions
            ])
            .split(f.area());
        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(8)])
            .split(middle[0]);

        Self::render_title(f, chunks[0]);
        Self::render_board(f, left[0], ctx);
        Self::render_constraints(f, left[1], ctx);
        Self::render_suggestions(f, middle[1], ctx);
        Self::render_status(f, chunks[2], ctx.status);
        Self::render_instructions(f, chunks[3], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("WORDLE ASSISTANT")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_board(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let block = Block::default()
            .title(format!("Guesses ({}/{})", ctx.guesses.len(), ctx.attempts))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let available_rows = (inner.height / ROW_SPACING).max(1) as usize;
        let showing_current_input =
            matches!(ctx.state, TuiState::EnteringGuess) && ctx.guesses.len() < ctx.attempts;
        let rows_needed = ctx.guesses.len() + usize::from(showing_current_input);
        let skip_count = rows_needed.saturating_sub(available_rows);
        let visible = ctx.guesses.len().saturating_sub(skip_count);

        for (display_index, guess) in ctx.guesses.iter().skip(skip_count).enumerate() {
            let marking = match ctx.state {
                TuiState::MarkingFeedback { marking_index } if display_index + 1 == visible => {
                    Some(*marking_index)
                }
                _ => None,
            };
            Self::render_guess_row(f, guess, display_index, inner, marking);
        }

        if showing_current_input {
            Self::render_current_input(f, visible, inner, ctx.current_input, ctx.word_length);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_guess_row(
        f: &mut Frame,
        guess: &GuessRow,
        row_index: usize,
        area: Rect,
        marking: Option<usize>,
    ) {
        let y = area.y + (row_index as u16 * ROW_SPACING);
        if y >= area.y + area.height {
            return;
        }

        let mut spans = vec![Span::raw("  ")];
        for (letter, state) in guess.letters.iter().zip(&guess.states) {
            let (bg_color, fg_color) = state.colors();
            spans.push(Span::styled(
                format!(" {letter} "),
                Style::default().fg(fg_color).bg(bg_color),
            ));
            spans.push(Span::raw(" "));
        }
        if let Some(index) = marking {
            spans.push(Span::raw(format!(" <- Marking letter {} (G/Y/X)", index + 1)));
        }

        Self::render_line(f, area, y, spans);
    }

    fn render_line(f: &mut Frame, area: Rect, y: u16, spans: Vec<Span>) {
        let paragraph = Paragraph::new(Line::from(spans));
        f.render_widget(
            paragraph,
            Rect {
                x: area.x,
                y,
                width: area.width,
                height: 1,
            },
        );
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_current_input(
        f: &mut Frame,
        row_index: usize,
        area: Rect,
        current_input: &str,
        word_length: usize,
    ) {
        let y = area.y + (row_index as u16 * ROW_SPACING);
        if y >= area.y + area.height {
            return;
        }

        let mut spans = vec![Span::raw("  ")];
        for i in 0..word_length {
            let letter = current_input.chars().nth(i).unwrap_or(' ');
            spans.push(Span::styled(
                format!(" {letter} "),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            ));
            spans.push(Span::raw(" "));
        }

        Self::render_line(f, area, y, spans);
    }

    fn render_constraints(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let lines: Vec<Line> = ctx
            .constraints
            .iter()
            .map(|line| Line::from(line.as_str()))
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Constraints").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_suggestions(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = Vec::new();
        let suggestions = ctx.suggestions;

        if !suggestions.is_empty() {
            let pages = suggestions.words.len().div_ceil(ctx.page_size);
            lines.push(Line::from(vec![Span::styled(
                format!(
                    "{} candidates, {} ranked (page {}/{})",
                    suggestions.candidate_count,
                    suggestions.ranked_count,
                    ctx.page + 1,
                    pages
                ),
                INFO_STYLE,
            )]));
            let start = ctx.page * ctx.page_size;
            let end = (start + ctx.page_size).min(suggestions.words.len());
            for (i, word) in suggestions.words[start..end].iter().enumerate() {
                let style = if start + i < suggestions.ranked_count {
                    Style::default()
                } else {
                    FILLER_STYLE
                };
                lines.push(Line::from(Span::styled(format!("  {word}"), style)));
            }
            lines.push(Line::from(""));
        }

        if !ctx.message.is_empty() {
            lines.push(Line::from(vec![Span::styled(ctx.message, MESSAGE_STYLE)]));
        }
        if !ctx.error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(ctx.error_message, ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Suggestions").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: &TuiState) {
        let text = match state {
            TuiState::EnteringGuess => {
                "Type your guess | ENTER: Submit | TAB/SHIFT-TAB: Page suggestions | F2: New game | ESC: Quit"
            }
            TuiState::MarkingFeedback { .. } => {
                "G: Green (correct) | Y: Yellow (wrong position) | X: Gray (not in word) | BACKSPACE: Go back"
            }
            TuiState::ConfirmingFeedback => "ENTER: Confirm feedback | BACKSPACE: Go back and edit",
            TuiState::GameOver => "N / F2: New Game | ESC: Quit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    /// Waits briefly for a key press, filtering out everything else.
    fn next_key() -> Result<Option<KeyEvent>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => {
                // Only process Press events, ignore Release and Repeat to avoid double input
                if key.kind != event::KeyEventKind::Press {
                    return Ok(None);
                }
                // Garbage from escape sequences when alt-tabbing
                if let KeyCode::Char(c) = key.code
                    && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
                {
                    debug_log!("next_key() - Ignoring invalid character: {:?}", c);
                    return Ok(None);
                }
                debug_log!(
                    "next_key() - code={:?}, modifiers={:?}",
                    key.code,
                    key.modifiers
                );
                Ok(Some(key))
            }
            other => {
                debug_log!("next_key() - Ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
    }

    fn handle_guess_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        self.error_message.clear();

        match key.code {
            KeyCode::Esc => {
                info_log!("handle_guess_input() - ESC pressed, returning Exit");
                return Some(UserAction::Exit);
            }
            KeyCode::F(2) => return Some(UserAction::NewGame),
            KeyCode::Tab | KeyCode::PageDown => {
                if self.page + 1 < self.page_count() {
                    self.page += 1;
                }
            }
            KeyCode::BackTab | KeyCode::PageUp => {
                self.page = self.page.saturating_sub(1);
            }
            _ if Self::has_modifier_keys(&key) => {
                debug_log!(
                    "handle_guess_input() - Ignoring key with modifier: {:?}",
                    key.modifiers
                );
            }
            KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                if self.current_input.chars().count() < self.word_length {
                    self.current_input.push(c.to_ascii_uppercase());
                }
            }
            KeyCode::Char(c) => {
                self.error_message = format!("Only letters are allowed! ('{c}' is not a letter)");
            }
            KeyCode::Backspace => {
                self.current_input.pop();
            }
            KeyCode::Enter if self.current_input.chars().count() == self.word_length => {
                let guess = self.current_input.to_lowercase();
                self.current_input.clear();
                info_log!("handle_guess_input() - Guess submitted: '{}'", guess);
                return Some(UserAction::Guess(guess));
            }
            KeyCode::Enter => {
                self.error_message = format!("Guess must be exactly {} letters!", self.word_length);
            }
            _ => {}
        }
        None
    }

    fn handle_feedback_input(&mut self, key: KeyEvent) -> MarkingOutcome {
        if key.code == KeyCode::Esc {
            info_log!("handle_feedback_input() - ESC pressed, returning Exit");
            return MarkingOutcome::Exit;
        }
        if Self::has_modifier_keys(&key) {
            return MarkingOutcome::Pending;
        }

        match self.state {
            TuiState::MarkingFeedback { marking_index } => {
                let Some(last_guess) = self.guesses.last_mut() else {
                    return MarkingOutcome::Exit;
                };
                match key.code {
                    KeyCode::Char(c) => match Mark::from_char(c) {
                        Some(mark) => {
                            last_guess.states[marking_index] = LetterState::Marked(mark);
                            self.error_message.clear();
                            self.advance_feedback_marking(marking_index);
                        }
                        None => {
                            self.error_message = format!(
                                "Invalid feedback! Use G (green), Y (yellow), or X (gray). ('{c}' is not valid)"
                            );
                        }
                    },
                    KeyCode::Backspace if marking_index > 0 => {
                        last_guess.states[marking_index - 1] = LetterState::Entered;
                        self.state = TuiState::MarkingFeedback {
                            marking_index: marking_index - 1,
                        };
                    }
                    _ => {}
                }
                MarkingOutcome::Pending
            }
            TuiState::ConfirmingFeedback => match key.code {
                KeyCode::Enter => MarkingOutcome::Confirmed,
                KeyCode::Backspace => {
                    if let Some(last_guess) = self.guesses.last_mut() {
                        let last = self.word_length - 1;
                        last_guess.states[last] = LetterState::Entered;
                        self.state = TuiState::MarkingFeedback {
                            marking_index: last,
                        };
                    }
                    MarkingOutcome::Pending
                }
                _ => MarkingOutcome::Pending,
            },
            TuiState::EnteringGuess | TuiState::GameOver => MarkingOutcome::Pending,
        }
    }

    fn advance_feedback_marking(&mut self, current_index: usize) {
        if current_index + 1 < self.word_length {
            self.state = TuiState::MarkingFeedback {
                marking_index: current_index + 1,
            };
        } else {
            self.state = TuiState::ConfirmingFeedback;
            self.status = "Press ENTER to confirm feedback".to_string();
        }
    }

    fn handle_game_over_input(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Char('n' | 'N') | KeyCode::F(2) => Some(UserAction::NewGame),
            KeyCode::Esc => Some(UserAction::Exit),
            _ => None,
        }
    }

    fn transition_to_game_over(&mut self) {
        self.state = TuiState::GameOver;
    }
}

impl GameInterface for TuiInterface {
    fn display_session_start(&mut self, info: &SessionInfo) {
        self.message = if info.valid_word_count == 0 {
            "No valid words loaded. Suggestions will not be ranked.".to_string()
        } else {
            format!(
                "Loaded {} valid {}-letter words.",
                info.valid_word_count, info.word_length
            )
        };
        self.status = format!("Ready - Enter your first {}-letter guess", info.word_length);
        self.draw_or_log();
    }

    fn read_guess(&mut self, round: usize) -> Option<UserAction> {
        if !matches!(self.state, TuiState::GameOver) {
            self.state = TuiState::EnteringGuess;
            self.status = format!("Round {round}: enter your guess");
        }
        loop {
            if self.draw().is_err() {
                info_log!("read_guess() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }
            let key = match Self::next_key() {
                Ok(Some(key)) => key,
                Ok(None) => continue,
                Err(e) => {
                    info_log!("read_guess() - Input error: {}", e);
                    return Some(UserAction::Exit);
                }
            };
            let action = if matches!(self.state, TuiState::GameOver) {
                Self::handle_game_over_input(key)
            } else {
                self.handle_guess_input(key)
            };
            if let Some(action) = action {
                info_log!("read_guess() - Action received: {:?}", action);
                if let UserAction::Guess(guess) = &action {
                    self.guesses.push(GuessRow::from_guess(guess));
                    self.state = TuiState::MarkingFeedback { marking_index: 0 };
                    self.status = format!("Guess entered: {guess} - Now mark feedback");
                }
                return Some(action);
            }
        }
    }

    fn read_feedback(&mut self, guess: &str) -> FeedbackAction {
        self.state = TuiState::MarkingFeedback { marking_index: 0 };
        self.error_message.clear();
        self.status = marking_status(guess);
        if let Some(last_guess) = self.guesses.last_mut() {
            last_guess.states.fill(LetterState::Entered);
        }

        loop {
            if self.draw().is_err() {
                debug_log!("read_feedback() - Draw failed");
                return FeedbackAction::Exit;
            }
            let key = match Self::next_key() {
                Ok(Some(key)) => key,
                Ok(None) => continue,
                Err(e) => {
                    debug_log!("read_feedback() - Input error: {}", e);
                    return FeedbackAction::Exit;
                }
            };
            match self.handle_feedback_input(key) {
                MarkingOutcome::Pending => {}
                MarkingOutcome::Exit => return FeedbackAction::Exit,
                MarkingOutcome::Confirmed => {
                    let Some(marks) = self.guesses.last().and_then(GuessRow::marks) else {
                        return FeedbackAction::Invalid;
                    };
                    self.status = "Feedback recorded".to_string();
                    self.state = TuiState::EnteringGuess;
                    return FeedbackAction::Feedback(RoundFeedback::from_marks(guess, &marks));
                }
            }
        }
    }

    fn display_computing_message(&mut self) {
        self.status = "Calculating suggestions...".to_string();
        self.draw_or_log();
    }

    fn display_suggestions(&mut self, suggestions: &Suggestions) {
        self.suggestions = suggestions.clone();
        self.page = 0;
        self.message.clear();
        self.status = format!("{} candidates remain", suggestions.candidate_count);
        self.draw_or_log();
    }

    fn display_constraints(&mut self, state: &ConstraintState) {
        self.constraints = format_constraints(state);
        self.draw_or_log();
    }

    fn display_no_candidates_message(&mut self) {
        self.suggestions = Suggestions::default();
        self.message = "No candidates remain. Check your inputs or press F2.".to_string();
        self.status = "Error: No valid candidates found".to_string();
        self.draw_or_log();
    }

    fn display_solution_found(&mut self, solution: &str) {
        self.transition_to_game_over();
        self.message = format!("✓ Solution found: {solution}");
        self.status = format!("Game Over - Solution: {solution}");
        self.draw_or_log();
    }

    fn display_out_of_rounds(&mut self, attempts: usize) {
        self.transition_to_game_over();
        self.status = format!("Game Over - all {attempts} rounds used");
        self.draw_or_log();
    }

    fn display_game_over_hint(&mut self) {
        self.error_message = "This game is over. Press N for a new game.".to_string();
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }

    fn display_new_game_message(&mut self) {
        self.guesses.clear();
        self.current_input.clear();
        self.suggestions = Suggestions::default();
        self.page = 0;
        self.constraints.clear();
        self.state = TuiState::EnteringGuess;
        self.message = "New game started. Constraints cleared.".to_string();
        self.status = "New game - Enter your first guess".to_string();
        self.error_message.clear();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
