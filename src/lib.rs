// Library interface for wordle-assistant
// This allows integration tests to access internal modules

pub mod cli;
pub mod constraints;
pub mod feedback;
pub mod game_state;
pub mod logging;
pub mod solver;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use constraints::ConstraintState;
pub use feedback::{InputError, Mark, RoundFeedback, normalize_guess};
pub use game_state::{GameConfig, GameInterface, game_loop};
pub use solver::{
    SuggestOptions, Suggestions, allowed_letters, candidates, rank_valid_words, score_word,
    suggest, surviving_candidates,
};
pub use wordbank::{WordSource, load_valid_words, load_wordbank_from_file, load_wordbank_from_str};
