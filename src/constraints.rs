//! Letter constraints accumulated from round feedback.
//!
//! Feedback is entered as bare letters (no positions), so every round the
//! guess is re-scanned left to right to decide where each green and yellow
//! letter belongs.

use crate::debug_log;
use std::collections::{BTreeSet, HashMap};

/// Per-session constraint state. Owned by the caller and passed to the
/// candidate generator by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintState {
    word_length: usize,
    green: Vec<Option<char>>,
    yellow: Vec<BTreeSet<char>>,
    gray: BTreeSet<char>,
    history: Vec<String>,
}

fn count_letters<I: IntoIterator<Item = char>>(letters: I) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for letter in letters {
        *counts.entry(letter).or_insert(0) += 1;
    }
    counts
}

/// Takes one unit of `letter` from `counts` if any is left.
fn consume(counts: &mut HashMap<char, usize>, letter: char) -> bool {
    match counts.get_mut(&letter) {
        Some(left) if *left > 0 => {
            *left -= 1;
            true
        }
        _ => false,
    }
}

impl ConstraintState {
    #[must_use]
    pub fn new(word_length: usize) -> Self {
        Self {
            word_length,
            green: vec![None; word_length],
            yellow: vec![BTreeSet::new(); word_length],
            gray: BTreeSet::new(),
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    #[must_use]
    pub fn green(&self) -> &[Option<char>] {
        &self.green
    }

    #[must_use]
    pub fn yellow(&self) -> &[BTreeSet<char>] {
        &self.yellow
    }

    #[must_use]
    pub fn gray(&self) -> &BTreeSet<char> {
        &self.gray
    }

    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Every letter that must appear somewhere in a candidate.
    #[must_use]
    pub fn mandatory_letters(&self) -> BTreeSet<char> {
        let mut letters: BTreeSet<char> = self.green.iter().flatten().copied().collect();
        for forbidden_here in &self.yellow {
            letters.extend(forbidden_here.iter().copied());
        }
        letters
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.word_length > 0 && self.green.iter().all(Option::is_some)
    }

    /// The fully determined word once every position is green.
    #[must_use]
    pub fn solution(&self) -> Option<String> {
        if self.is_solved() {
            self.green.iter().copied().collect()
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.word_length);
    }

    /// Merges one round of feedback into the state.
    ///
    /// `guess` must already be validated (exactly `word_length` letters). Must
    /// be called once per round; calling it twice for the same round counts
    /// the feedback twice.
    pub fn update(&mut self, guess: &str, yellow_feedback: &[char], green_feedback: &[char]) {
        let guess: Vec<char> = guess.chars().take(self.word_length).collect();
        let typed = count_letters(guess.iter().copied());
        let mut yellow_left = count_letters(yellow_feedback.iter().copied());
        let mut green_left = count_letters(green_feedback.iter().copied());

        // A copy typed more often than it was confirmed is an excess copy.
        for (&letter, &typed_count) in &typed {
            let confirmed = yellow_left.get(&letter).copied().unwrap_or(0)
                + green_left.get(&letter).copied().unwrap_or(0);
            if confirmed < typed_count {
                self.gray.insert(letter);
            }
        }

        for (i, &letter) in guess.iter().enumerate() {
            match self.green[i] {
                Some(existing) if existing != letter => {
                    if green_left.get(&letter).is_some_and(|left| *left > 0) {
                        debug_log!(
                            "update() - position {} already green '{}', not reassigning '{}'",
                            i,
                            existing,
                            letter
                        );
                    }
                }
                _ => {
                    if consume(&mut green_left, letter) {
                        self.green[i] = Some(letter);
                    }
                }
            }
        }

        for (i, &letter) in guess.iter().enumerate() {
            if self.green[i] == Some(letter) {
                continue;
            }
            if consume(&mut yellow_left, letter) {
                self.yellow[i].insert(letter);
            }
        }

        self.history.push(guess.into_iter().collect());
        debug_log!(
            "update() - green={:?} yellow={:?} gray={:?}",
            self.green,
            self.yellow,
            self.gray
        );
    }

    /// Whether `candidate` satisfies every accumulated constraint.
    #[must_use]
    pub fn accepts(&self, candidate: &[char]) -> bool {
        self.filter().accepts(candidate)
    }

    /// Snapshot of the constraints for checking many candidates.
    #[must_use]
    pub fn filter(&self) -> CandidateFilter<'_> {
        CandidateFilter {
            green: &self.green,
            yellow: &self.yellow,
            mandatory: self.mandatory_letters().into_iter().collect(),
        }
    }
}

/// Per-candidate predicate with the mandatory letters precomputed.
#[derive(Debug, Clone)]
pub struct CandidateFilter<'a> {
    green: &'a [Option<char>],
    yellow: &'a [BTreeSet<char>],
    mandatory: Vec<char>,
}

impl CandidateFilter<'_> {
    #[must_use]
    pub fn accepts(&self, candidate: &[char]) -> bool {
        if candidate.len() != self.green.len() {
            return false;
        }
        let green_ok = self
            .green
            .iter()
            .zip(candidate)
            .all(|(green, &letter)| green.is_none_or(|g| g == letter));
        if !green_ok {
            return false;
        }
        if !self.mandatory.iter().all(|letter| candidate.contains(letter)) {
            return false;
        }
        !self
            .yellow
            .iter()
            .zip(candidate)
            .any(|(forbidden_here, letter)| forbidden_here.contains(letter))
    }

    /// Whether `letter` may sit at `position` given the green and yellow
    /// constraints alone.
    #[must_use]
    pub fn allows_at(&self, position: usize, letter: char) -> bool {
        let green_ok = self
            .green
            .get(position)
            .is_none_or(|green| green.is_none_or(|g| g == letter));
        green_ok && !self.yellow.get(position).is_some_and(|y| y.contains(&letter))
    }

    #[must_use]
    pub fn mandatory(&self) -> &[char] {
        &self.mandatory
    }
}
