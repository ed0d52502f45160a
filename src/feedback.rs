//! Validation of round input before it reaches the accumulator.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("guess must be exactly {expected} letters (got {actual})")]
    WrongLength { expected: usize, actual: usize },
    #[error("only letters are allowed ('{0}' is not a letter)")]
    NotALetter(char),
    #[error("'{letter}' is marked {marked} time(s) but the guess has it {typed} time(s)")]
    TooManyMarks {
        letter: char,
        marked: usize,
        typed: usize,
    },
}

/// Per-letter mark as shown on a game board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Green,
    Yellow,
    Gray,
}

impl Mark {
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'G' => Some(Self::Green),
            'Y' => Some(Self::Yellow),
            'X' => Some(Self::Gray),
            _ => None,
        }
    }
}

/// Trims and lowercases `input`, which must be `word_length` ASCII letters.
pub fn normalize_guess(input: &str, word_length: usize) -> Result<String, InputError> {
    let guess = input.trim().to_lowercase();
    if let Some(bad) = guess.chars().find(|c| !c.is_ascii_alphabetic()) {
        return Err(InputError::NotALetter(bad));
    }
    let actual = guess.chars().count();
    if actual != word_length {
        return Err(InputError::WrongLength {
            expected: word_length,
            actual,
        });
    }
    Ok(guess)
}

fn parse_letters(input: &str) -> Result<Vec<char>, InputError> {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            if c.is_ascii_alphabetic() {
                Ok(c.to_ascii_lowercase())
            } else {
                Err(InputError::NotALetter(c))
            }
        })
        .collect()
}

/// Yellow and green letters reported for one guess, without positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundFeedback {
    yellow: Vec<char>,
    green: Vec<char>,
}

impl RoundFeedback {
    /// Parses the yellow and green letter lists typed for `guess`.
    ///
    /// A letter may not be marked more often than it occurs in the guess.
    pub fn parse(guess: &str, yellow: &str, green: &str) -> Result<Self, InputError> {
        let yellow = parse_letters(yellow)?;
        let green = parse_letters(green)?;

        let mut marked: HashMap<char, usize> = HashMap::new();
        for &letter in yellow.iter().chain(&green) {
            *marked.entry(letter).or_insert(0) += 1;
        }
        let mut letters: Vec<(char, usize)> = marked.into_iter().collect();
        letters.sort_unstable();
        for (letter, marked) in letters {
            let typed = guess.chars().filter(|&c| c == letter).count();
            if marked > typed {
                return Err(InputError::TooManyMarks {
                    letter,
                    marked,
                    typed,
                });
            }
        }
        Ok(Self { yellow, green })
    }

    /// Collects the letters of `guess` by their marks, left to right.
    #[must_use]
    pub fn from_marks(guess: &str, marks: &[Mark]) -> Self {
        let mut feedback = Self::default();
        for (letter, mark) in guess.chars().zip(marks) {
            match mark {
                Mark::Green => feedback.green.push(letter),
                Mark::Yellow => feedback.yellow.push(letter),
                Mark::Gray => {}
            }
        }
        feedback
    }

    #[must_use]
    pub fn yellow(&self) -> &[char] {
        &self.yellow
    }

    #[must_use]
    pub fn green(&self) -> &[char] {
        &self.green
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_guess() {
        assert_eq!(normalize_guess("  CRANE \n", 5), Ok("crane".to_string()));
        assert_eq!(normalize_guess("AbCdE", 5), Ok("abcde".to_string()));
        assert_eq!(
            normalize_guess("cran", 5),
            Err(InputError::WrongLength {
                expected: 5,
                actual: 4
            })
        );
        assert_eq!(
            normalize_guess("cranes", 5),
            Err(InputError::WrongLength {
                expected: 5,
                actual: 6
            })
        );
        assert_eq!(normalize_guess("cr4ne", 5), Err(InputError::NotALetter('4')));
        assert_eq!(normalize_guess("cr ne", 5), Err(InputError::NotALetter(' ')));
        assert!(normalize_guess("", 5).is_err());
        assert_eq!(normalize_guess("planet", 6), Ok("planet".to_string()));
    }

    #[test]
    fn test_parse_feedback() {
        let feedback = RoundFeedback::parse("crane", "", "RA").unwrap();
        assert!(feedback.yellow().is_empty());
        assert_eq!(feedback.green(), &['r', 'a']);

        let feedback = RoundFeedback::parse("sassy", "s", "s").unwrap();
        assert_eq!(feedback.yellow(), &['s']);
        assert_eq!(feedback.green(), &['s']);
    }

    #[test]
    fn test_parse_feedback_ignores_whitespace() {
        let feedback = RoundFeedback::parse("crane", " c n ", "").unwrap();
        assert_eq!(feedback.yellow(), &['c', 'n']);
    }

    #[test]
    fn test_parse_feedback_rejects_non_letters() {
        assert_eq!(
            RoundFeedback::parse("crane", "c1", ""),
            Err(InputError::NotALetter('1'))
        );
        assert_eq!(
            RoundFeedback::parse("crane", "", "r,a"),
            Err(InputError::NotALetter(','))
        );
    }

    #[test]
    fn test_parse_feedback_rejects_excess_marks() {
        assert_eq!(
            RoundFeedback::parse("crane", "z", ""),
            Err(InputError::TooManyMarks {
                letter: 'z',
                marked: 1,
                typed: 0
            })
        );
        assert_eq!(
            RoundFeedback::parse("sassy", "ss", "ss"),
            Err(InputError::TooManyMarks {
                letter: 's',
                marked: 4,
                typed: 3
            })
        );
    }

    #[test]
    fn test_from_marks() {
        let marks = [Mark::Gray, Mark::Green, Mark::Yellow, Mark::Gray, Mark::Green];
        let feedback = RoundFeedback::from_marks("crane", &marks);
        assert_eq!(feedback.green(), &['r', 'e']);
        assert_eq!(feedback.yellow(), &['a']);
    }

    #[test]
    fn test_mark_from_char() {
        assert_eq!(Mark::from_char('g'), Some(Mark::Green));
        assert_eq!(Mark::from_char('Y'), Some(Mark::Yellow));
        assert_eq!(Mark::from_char('x'), Some(Mark::Gray));
        assert_eq!(Mark::from_char('a'), None);
    }

    #[test]
    fn test_error_messages() {
        let err = InputError::WrongLength {
            expected: 5,
            actual: 3,
        };
        assert_eq!(err.to_string(), "guess must be exactly 5 letters (got 3)");
        assert_eq!(
            InputError::NotALetter('3').to_string(),
            "only letters are allowed ('3' is not a letter)"
        );
    }
}
