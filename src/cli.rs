use crate::constraints::ConstraintState;
use crate::feedback::{RoundFeedback, normalize_guess};
use crate::game_state::{
    DEFAULT_ATTEMPTS, DEFAULT_MAX_CANDIDATES, DEFAULT_MAX_SUGGESTIONS, DEFAULT_SUGGESTIONS_COUNT,
    DEFAULT_WORD_LENGTH, FeedbackAction, GameConfig, GameInterface, SessionInfo, UserAction,
};
use crate::solver::Suggestions;
use crate::wordbank::{WordSource, default_word_source};
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

const ORDINALS: [&str; 10] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth", "tenth",
];

/// Wordle assistant: narrows and ranks candidate words from round feedback
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Length of the words to guess
    #[arg(short = 'l', long = "word-length", default_value_t = DEFAULT_WORD_LENGTH, value_parser = parse_word_length)]
    pub word_length: usize,

    /// Number of rounds per game
    #[arg(short = 'a', long = "attempts", default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: usize,

    /// Number of suggestions to show at once
    #[arg(short = 's', long = "suggestions-count", default_value_t = DEFAULT_SUGGESTIONS_COUNT)]
    pub suggestions_count: usize,

    /// Number of suggestions generated per round
    #[arg(short = 'n', long = "max-suggestions", default_value_t = DEFAULT_MAX_SUGGESTIONS)]
    pub max_suggestions: usize,

    /// Stop collecting candidates after this many survivors (0 for no limit)
    #[arg(long = "max-candidates", default_value_t = DEFAULT_MAX_CANDIDATES)]
    pub max_candidates: usize,

    /// Path to a newline-delimited list of valid words
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<String>,

    /// Do not rank against a valid-word list
    #[arg(long = "disable-wordlist", conflicts_with = "wordbank_path")]
    pub disable_wordlist: bool,

    /// Do not fetch the word list online; use the local one instead
    #[arg(long = "disable-fetch")]
    pub disable_fetch: bool,

    /// Seed for the random filler suggestions
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Use the full-screen terminal interface
    #[arg(long = "tui")]
    pub tui: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_word_length(value: &str) -> Result<usize, String> {
    let length: usize = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if (1..=26).contains(&length) {
        Ok(length)
    } else {
        Err(format!("word length must be between 1 and 26 (got {length})"))
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

impl Cli {
    #[must_use]
    pub fn config(&self) -> GameConfig {
        GameConfig {
            word_length: self.word_length,
            attempts: self.attempts,
            suggestions_count: self.suggestions_count.max(1),
            max_suggestions: self.max_suggestions,
            max_candidates: (self.max_candidates > 0).then_some(self.max_candidates),
        }
    }

    #[must_use]
    pub fn word_source(&self) -> WordSource {
        if self.disable_wordlist {
            WordSource::Disabled
        } else if let Some(path) = &self.wordbank_path {
            WordSource::File(PathBuf::from(path))
        } else {
            default_word_source(self.word_length, !self.disable_fetch)
        }
    }
}

// UI Input/Output functions

pub enum GuessInput {
    Valid(String),
    Invalid,
    Inspect,
    Exit,
    NewGame,
}

fn ordinal(round: usize) -> String {
    round
        .checked_sub(1)
        .and_then(|i| ORDINALS.get(i))
        .map_or_else(|| format!("#{round}"), |s| (*s).to_string())
}

/// Reads one line; `None` at end of input.
fn read_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) => None,
        Ok(_) => Some(input),
        Err(e) => {
            log::warn!("Failed to read input: {e}");
            None
        }
    }
}

pub fn display_session_start(info: &SessionInfo) {
    println!("------------- Wordle Assistant -------------\n");
    if info.valid_word_count == 0 {
        println!("No valid words loaded. Suggestions will not be ranked.");
    } else {
        println!(
            "Loaded {} valid {}-letter words.",
            info.valid_word_count, info.word_length
        );
    }
    println!(
        "Type 'exit' to quit, 'next' to start a new game, '?' to show constraints."
    );
}

pub fn read_guess<R: BufRead>(reader: &mut R, round: usize, word_length: usize) -> GuessInput {
    println!("\nRound {round}");
    println!(
        "Enter the {} guessed word ({word_length} letters):",
        ordinal(round)
    );
    let Some(input) = read_line(reader) else {
        return GuessInput::Exit;
    };
    let trimmed = input.trim().to_lowercase();

    match trimmed.as_str() {
        "exit" => GuessInput::Exit,
        "next" => GuessInput::NewGame,
        "?" => GuessInput::Inspect,
        _ => match normalize_guess(&trimmed, word_length) {
            Ok(guess) => GuessInput::Valid(guess),
            Err(e) => {
                println!("Invalid input: {e}. Please enter a {word_length}-letter word.");
                GuessInput::Invalid
            }
        },
    }
}

pub fn read_feedback<R: BufRead>(reader: &mut R, guess: &str) -> FeedbackAction {
    println!("Enter yellow letters (repeat if needed):");
    let Some(yellow) = read_line(reader) else {
        return FeedbackAction::Exit;
    };
    println!("Enter green letters:");
    let Some(green) = read_line(reader) else {
        return FeedbackAction::Exit;
    };

    match RoundFeedback::parse(guess, &yellow, &green) {
        Ok(feedback) => FeedbackAction::Feedback(feedback),
        Err(e) => {
            println!("Invalid feedback: {e}. Please enter it again.");
            FeedbackAction::Invalid
        }
    }
}

#[must_use]
pub fn suggestions_summary(suggestions: &Suggestions) -> String {
    if suggestions.ranked_count == 0 {
        format!(
            "{} candidates remain (suggestions are unranked).",
            suggestions.candidate_count
        )
    } else {
        format!(
            "{} candidates remain ({} ranked suggestions).",
            suggestions.candidate_count, suggestions.ranked_count
        )
    }
}

/// Shows `suggestions` a page at a time while the player answers `y`.
///
/// Returns how many pages were shown.
pub fn display_suggestions<R: BufRead>(
    reader: &mut R,
    suggestions: &Suggestions,
    page_size: usize,
) -> usize {
    println!("\n{}", suggestions_summary(suggestions));
    let mut offset = 0;
    let mut pages = 0;
    while offset < suggestions.words.len() {
        let which = if offset == 0 { "the" } else { "more" };
        println!("Do you want to see {which} suggestions? (y/N):");
        let answer = read_line(reader).unwrap_or_default();
        if answer.trim().to_lowercase() != "y" {
            break;
        }
        println!("\nSuggestions:");
        let end = (offset + page_size).min(suggestions.words.len());
        for (i, word) in suggestions.words[offset..end].iter().enumerate() {
            let marker = if offset + i < suggestions.ranked_count {
                ""
            } else {
                " (unranked)"
            };
            println!("  - {word}{marker}");
        }
        offset = end;
        pages += 1;
    }
    pages
}

#[must_use]
pub fn format_constraints(state: &ConstraintState) -> Vec<String> {
    let pattern: String = state
        .green()
        .iter()
        .map(|g| g.map_or('_', |c| c.to_ascii_uppercase()))
        .collect();
    let mut lines = vec![format!("Green:  {pattern}")];
    for (i, letters) in state.yellow().iter().enumerate() {
        if !letters.is_empty() {
            let letters: String = letters.iter().collect();
            lines.push(format!("Yellow: position {} is not {letters}", i + 1));
        }
    }
    let gray: String = state.gray().iter().collect();
    lines.push(format!("Gray:   {gray}"));
    if !state.history().is_empty() {
        lines.push(format!("Guesses: {}", state.history().join(", ")));
    }
    lines
}

pub fn display_constraints(state: &ConstraintState) {
    for line in format_constraints(state) {
        println!("{line}");
    }
}

pub fn display_exit_message() {
    println!("Exiting.");
}

pub fn display_new_game_message() {
    println!("New game started. Constraints cleared.");
}

pub fn display_computing_message() {
    println!("\nCalculating suggestions...");
}

pub fn display_no_candidates_message() {
    println!("No candidates remain under the current constraints. Check your inputs.");
}

pub fn display_solution_found(solution: &str) {
    println!("Solution found: {solution}");
}

pub fn display_out_of_rounds(attempts: usize) {
    println!("\nAll {attempts} rounds used.");
}

pub fn display_game_over_hint() {
    println!("This game is over. Type 'next' for a new game or 'exit' to quit.");
}

/// CLI implementation of the `GameInterface` trait over any `BufRead`.
pub struct CliInterface<R: BufRead> {
    reader: R,
    word_length: usize,
    page_size: usize,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R, config: &GameConfig) -> Self {
        Self {
            reader,
            word_length: config.word_length,
            page_size: config.suggestions_count.max(1),
        }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_session_start(&mut self, info: &SessionInfo) {
        display_session_start(info);
    }

    fn read_guess(&mut self, round: usize) -> Option<UserAction> {
        match read_guess(&mut self.reader, round, self.word_length) {
            GuessInput::Valid(guess) => Some(UserAction::Guess(guess)),
            GuessInput::Inspect => Some(UserAction::Inspect),
            GuessInput::Exit => Some(UserAction::Exit),
            GuessInput::NewGame => Some(UserAction::NewGame),
            GuessInput::Invalid => None,
        }
    }

    fn read_feedback(&mut self, guess: &str) -> FeedbackAction {
        read_feedback(&mut self.reader, guess)
    }

    fn display_computing_message(&mut self) {
        display_computing_message();
    }

    fn display_suggestions(&mut self, suggestions: &Suggestions) {
        display_suggestions(&mut self.reader, suggestions, self.page_size);
        println!("\n{}\n", "-".repeat(30));
    }

    fn display_constraints(&mut self, state: &ConstraintState) {
        display_constraints(state);
    }

    fn display_no_candidates_message(&mut self) {
        display_no_candidates_message();
    }

    fn display_solution_found(&mut self, solution: &str) {
        display_solution_found(solution);
    }

    fn display_out_of_rounds(&mut self, attempts: usize) {
        display_out_of_rounds(attempts);
    }

    fn display_game_over_hint(&mut self) {
        display_game_over_hint();
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }

    fn display_new_game_message(&mut self) {
        display_new_game_message();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn suggestions(words: &[&str], ranked_count: usize) -> Suggestions {
        Suggestions {
            words: words.iter().map(|w| (*w).to_string()).collect(),
            ranked_count,
            candidate_count: words.len(),
        }
    }

    #[test]
    fn test_parse_cli_defaults() {
        let cli = Cli::try_parse_from(["wordle-assistant"]).unwrap();
        assert_eq!(cli.word_length, 5);
        assert_eq!(cli.attempts, 6);
        assert_eq!(cli.suggestions_count, 20);
        assert_eq!(cli.max_suggestions, 100);
        assert_eq!(cli.wordbank_path, None);
        assert!(!cli.disable_wordlist);
        assert!(!cli.tui);
        assert_eq!(cli.config(), GameConfig::default());
    }

    #[test]
    fn test_zero_max_candidates_means_unlimited() {
        let cli = Cli::try_parse_from(["wordle-assistant", "--max-candidates", "0"]).unwrap();
        assert_eq!(cli.config().max_candidates, None);
        let cli = Cli::try_parse_from(["wordle-assistant", "--max-candidates", "1000"]).unwrap();
        assert_eq!(cli.config().max_candidates, Some(1000));
    }

    #[test]
    fn test_parse_cli_with_options() {
        let cli = Cli::try_parse_from([
            "wordle-assistant",
            "--word-length",
            "6",
            "--attempts",
            "8",
            "-s",
            "10",
            "--seed",
            "42",
            "-i",
            "words.txt",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.word_length, 6);
        assert_eq!(cli.attempts, 8);
        assert_eq!(cli.suggestions_count, 10);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.word_source(), WordSource::File(PathBuf::from("words.txt")));
    }

    #[test]
    fn test_parse_cli_rejects_bad_word_length() {
        assert!(Cli::try_parse_from(["wordle-assistant", "--word-length", "0"]).is_err());
        assert!(Cli::try_parse_from(["wordle-assistant", "--word-length", "27"]).is_err());
        assert!(Cli::try_parse_from(["wordle-assistant", "--word-length", "five"]).is_err());
    }

    #[test]
    fn test_disable_wordlist() {
        let cli = Cli::try_parse_from(["wordle-assistant", "--disable-wordlist"]).unwrap();
        assert_eq!(cli.word_source(), WordSource::Disabled);
        assert!(
            Cli::try_parse_from(["wordle-assistant", "--disable-wordlist", "-i", "w.txt"])
                .is_err()
        );
    }

    #[test]
    fn test_disable_fetch_uses_local_word_list() {
        let cli = Cli::try_parse_from(["wordle-assistant", "--disable-fetch"]).unwrap();
        assert!(cli.disable_fetch);
        assert!(!matches!(cli.word_source(), WordSource::Url(_)));

        let cli = Cli::try_parse_from(["wordle-assistant", "--disable-fetch", "-i", "w.txt"])
            .unwrap();
        assert_eq!(cli.word_source(), WordSource::File(PathBuf::from("w.txt")));
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "first");
        assert_eq!(ordinal(6), "sixth");
        assert_eq!(ordinal(12), "#12");
    }

    #[test]
    fn test_read_guess_valid_word() {
        let mut reader = Cursor::new("CRANE\n");
        match read_guess(&mut reader, 1, 5) {
            GuessInput::Valid(word) => assert_eq!(word, "crane"),
            _ => panic!("Expected Valid guess"),
        }
    }

    #[test]
    fn test_read_guess_commands() {
        assert!(matches!(
            read_guess(&mut Cursor::new("exit\n"), 1, 5),
            GuessInput::Exit
        ));
        assert!(matches!(
            read_guess(&mut Cursor::new("NEXT\n"), 1, 5),
            GuessInput::NewGame
        ));
        assert!(matches!(
            read_guess(&mut Cursor::new(" ? \n"), 1, 5),
            GuessInput::Inspect
        ));
    }

    #[test]
    fn test_read_guess_invalid() {
        for input in ["CRAN\n", "CRANES\n", "CRAN3\n", "\n"] {
            assert!(
                matches!(read_guess(&mut Cursor::new(input), 1, 5), GuessInput::Invalid),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_read_guess_eof_exits() {
        assert!(matches!(
            read_guess(&mut Cursor::new(""), 1, 5),
            GuessInput::Exit
        ));
    }

    #[test]
    fn test_read_guess_respects_word_length() {
        match read_guess(&mut Cursor::new("planet\n"), 2, 6) {
            GuessInput::Valid(word) => assert_eq!(word, "planet"),
            _ => panic!("Expected Valid guess"),
        }
    }

    #[test]
    fn test_read_feedback_valid() {
        let mut reader = Cursor::new("n\nRA\n");
        match read_feedback(&mut reader, "crane") {
            FeedbackAction::Feedback(feedback) => {
                assert_eq!(feedback.yellow(), &['n']);
                assert_eq!(feedback.green(), &['r', 'a']);
            }
            other => panic!("Expected feedback, got {other:?}"),
        }
    }

    #[test]
    fn test_read_feedback_empty_lines() {
        let mut reader = Cursor::new("\n\n");
        match read_feedback(&mut reader, "crane") {
            FeedbackAction::Feedback(feedback) => {
                assert!(feedback.yellow().is_empty());
                assert!(feedback.green().is_empty());
            }
            other => panic!("Expected feedback, got {other:?}"),
        }
    }

    #[test]
    fn test_read_feedback_invalid() {
        let mut reader = Cursor::new("z\n\n");
        assert_eq!(read_feedback(&mut reader, "crane"), FeedbackAction::Invalid);
        let mut reader = Cursor::new("1\n\n");
        assert_eq!(read_feedback(&mut reader, "crane"), FeedbackAction::Invalid);
    }

    #[test]
    fn test_read_feedback_eof_exits() {
        assert_eq!(
            read_feedback(&mut Cursor::new("r\n"), "crane"),
            FeedbackAction::Exit
        );
    }

    #[test]
    fn test_display_suggestions_pages() {
        let list = suggestions(&["aa", "bb", "cc", "dd", "ee"], 3);
        assert_eq!(display_suggestions(&mut Cursor::new("y\ny\ny\ny\n"), &list, 2), 3);
        assert_eq!(display_suggestions(&mut Cursor::new("y\nn\n"), &list, 2), 1);
        assert_eq!(display_suggestions(&mut Cursor::new(""), &list, 2), 0);
    }

    #[test]
    fn test_suggestions_summary_reports_unranked_lists() {
        let ranked = suggestions(&["aa", "bb", "cc"], 2);
        assert_eq!(
            suggestions_summary(&ranked),
            "3 candidates remain (2 ranked suggestions)."
        );
        let unranked = suggestions(&["aa", "bb", "cc"], 0);
        assert_eq!(
            suggestions_summary(&unranked),
            "3 candidates remain (suggestions are unranked)."
        );
    }

    #[test]
    fn test_format_constraints() {
        let mut state = ConstraintState::new(5);
        state.update("crane", &['n'], &['r']);
        let lines = format_constraints(&state);
        assert_eq!(lines[0], "Green:  _R___");
        assert_eq!(lines[1], "Yellow: position 4 is not n");
        assert_eq!(lines[2], "Gray:   ace");
        assert_eq!(lines[3], "Guesses: crane");
    }
}
