use crate::constraints::ConstraintState;
use crate::feedback::RoundFeedback;
use crate::solver::{SuggestOptions, Suggestions, suggest};
use crate::{debug_log, info_log};
use rand::Rng;
use std::collections::HashSet;

pub const DEFAULT_WORD_LENGTH: usize = 5;
pub const DEFAULT_ATTEMPTS: usize = 6;
pub const DEFAULT_SUGGESTIONS_COUNT: usize = 20;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 100;
pub const DEFAULT_MAX_CANDIDATES: usize = 500_000;

/// Session settings, fixed before the first round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub word_length: usize,
    /// Rounds per game.
    pub attempts: usize,
    /// Suggestions shown per page.
    pub suggestions_count: usize,
    /// Suggestions generated per round.
    pub max_suggestions: usize,
    /// Cap on surviving candidates collected per round.
    pub max_candidates: Option<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            word_length: DEFAULT_WORD_LENGTH,
            attempts: DEFAULT_ATTEMPTS,
            suggestions_count: DEFAULT_SUGGESTIONS_COUNT,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            max_candidates: Some(DEFAULT_MAX_CANDIDATES),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn suggest_options(&self) -> SuggestOptions {
        SuggestOptions {
            target_count: self.max_suggestions,
            max_candidates: self.max_candidates,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    /// Show the accumulated constraints.
    Inspect,
    NewGame,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackAction {
    Feedback(RoundFeedback),
    /// Rejected input; ask again for the same guess.
    Invalid,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub word_length: usize,
    pub attempts: usize,
    pub valid_word_count: usize,
}

/// Input provider and result consumer for [`game_loop`].
pub trait GameInterface {
    fn display_session_start(&mut self, info: &SessionInfo);
    /// `None` means the input was rejected and the round should be re-read.
    fn read_guess(&mut self, round: usize) -> Option<UserAction>;
    fn read_feedback(&mut self, guess: &str) -> FeedbackAction;
    fn display_computing_message(&mut self);
    fn display_suggestions(&mut self, suggestions: &Suggestions);
    fn display_constraints(&mut self, state: &ConstraintState);
    fn display_no_candidates_message(&mut self);
    fn display_solution_found(&mut self, solution: &str);
    fn display_out_of_rounds(&mut self, attempts: usize);
    fn display_game_over_hint(&mut self);
    fn display_exit_message(&mut self);
    fn display_new_game_message(&mut self);
}

enum GameState {
    Continue,
    Solved(String),
    OutOfRounds,
}

fn check_game_state(state: &ConstraintState, config: &GameConfig) -> GameState {
    if let Some(solution) = state.solution() {
        GameState::Solved(solution)
    } else if state.history().len() >= config.attempts {
        GameState::OutOfRounds
    } else {
        GameState::Continue
    }
}

fn read_round_feedback<I: GameInterface + ?Sized>(
    interface: &mut I,
    guess: &str,
) -> Option<RoundFeedback> {
    loop {
        match interface.read_feedback(guess) {
            FeedbackAction::Feedback(feedback) => return Some(feedback),
            FeedbackAction::Invalid => {}
            FeedbackAction::Exit => return None,
        }
    }
}

/// Runs rounds until the player exits. Returns the final constraint state.
pub fn game_loop<I, R>(
    config: &GameConfig,
    valid_words: &HashSet<String>,
    interface: &mut I,
    rng: &mut R,
) -> ConstraintState
where
    I: GameInterface + ?Sized,
    R: Rng + ?Sized,
{
    let mut state = ConstraintState::new(config.word_length);
    interface.display_session_start(&SessionInfo {
        word_length: config.word_length,
        attempts: config.attempts,
        valid_word_count: valid_words.len(),
    });

    loop {
        let game_over = !matches!(check_game_state(&state, config), GameState::Continue);
        let Some(action) = interface.read_guess(state.history().len() + 1) else {
            continue;
        };
        debug_log!("game_loop() - action {:?}", action);

        let guess = match action {
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
            UserAction::NewGame => {
                state.reset();
                interface.display_new_game_message();
                continue;
            }
            UserAction::Inspect => {
                interface.display_constraints(&state);
                continue;
            }
            UserAction::Guess(_) if game_over => {
                interface.display_game_over_hint();
                continue;
            }
            UserAction::Guess(guess) => guess,
        };

        let Some(feedback) = read_round_feedback(interface, &guess) else {
            interface.display_exit_message();
            break;
        };
        state.update(&guess, feedback.yellow(), feedback.green());
        info_log!(
            "Round {}: '{}' yellow={:?} green={:?}",
            state.history().len(),
            guess,
            feedback.yellow(),
            feedback.green()
        );

        interface.display_constraints(&state);

        if let GameState::Solved(solution) = check_game_state(&state, config) {
            interface.display_solution_found(&solution);
            continue;
        }

        interface.display_computing_message();
        let suggestions = suggest(&state, valid_words, &config.suggest_options(), rng);
        if suggestions.is_empty() {
            interface.display_no_candidates_message();
        } else {
            interface.display_suggestions(&suggestions);
        }

        if let GameState::OutOfRounds = check_game_state(&state, config) {
            interface.display_out_of_rounds(config.attempts);
        }
    }

    state
}
