//! Candidate generation: enumerate, filter, rank and pad.

use crate::constraints::{CandidateFilter, ConstraintState};
use crate::debug_log;
use itertools::Itertools;
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use std::cmp::Reverse;
use std::collections::HashSet;

/// English letter frequencies in hundredths of a percent.
pub const LETTER_FREQUENCY: [(char, u32); 26] = [
    ('e', 1202),
    ('t', 910),
    ('a', 812),
    ('o', 768),
    ('i', 731),
    ('n', 695),
    ('s', 628),
    ('h', 592),
    ('r', 602),
    ('d', 432),
    ('l', 398),
    ('u', 288),
    ('c', 271),
    ('m', 261),
    ('f', 230),
    ('y', 211),
    ('w', 209),
    ('g', 203),
    ('p', 182),
    ('b', 149),
    ('v', 111),
    ('k', 69),
    ('x', 17),
    ('q', 11),
    ('j', 10),
    ('z', 7),
];

#[must_use]
pub fn letter_weight(letter: char) -> u32 {
    LETTER_FREQUENCY
        .iter()
        .find(|(c, _)| *c == letter)
        .map_or(0, |(_, weight)| *weight)
}

/// Sum of the weights of the distinct letters in `word`.
#[must_use]
pub fn score_word(word: &str) -> u32 {
    word.chars()
        .collect::<HashSet<char>>()
        .into_iter()
        .map(letter_weight)
        .sum()
}

/// Letters candidates may be built from, most frequent first.
///
/// Every gray letter is excluded, including one that is also mandatory after
/// an excess copy was marked; such a state has no survivors.
#[must_use]
pub fn allowed_letters(state: &ConstraintState) -> Vec<char> {
    let mut letters: Vec<char> = LETTER_FREQUENCY
        .iter()
        .map(|(c, _)| *c)
        .filter(|c| !state.gray().contains(c))
        .collect();
    letters.sort_by_key(|&c| (Reverse(letter_weight(c)), c));
    letters
}

/// Lazily yields every surviving candidate in enumeration order.
///
/// Each call starts a fresh enumeration.
pub fn candidates(state: &ConstraintState) -> impl Iterator<Item = String> + '_ {
    let filter = state.filter();
    allowed_letters(state)
        .into_iter()
        .permutations(state.word_length())
        .filter(move |candidate| filter.accepts(candidate))
        .map(|candidate| candidate.into_iter().collect())
}

/// Depth-first enumeration in the same order as [`candidates`], pruning
/// prefixes that already break a positional constraint or can no longer fit
/// every mandatory letter.
struct Search<'a> {
    filter: &'a CandidateFilter<'a>,
    allowed: &'a [char],
    length: usize,
    limit: usize,
}

impl Search<'_> {
    fn partition(&self, first_index: usize) -> Vec<String> {
        let mut out = Vec::new();
        let first = self.allowed[first_index];
        if !self.filter.allows_at(0, first) {
            return out;
        }
        let mut used = vec![false; self.allowed.len()];
        used[first_index] = true;
        let mut prefix = Vec::with_capacity(self.length);
        prefix.push(first);
        self.extend(&mut prefix, &mut used, &mut out);
        out
    }

    fn extend(&self, prefix: &mut Vec<char>, used: &mut [bool], out: &mut Vec<String>) {
        if prefix.len() == self.length {
            if self.filter.accepts(prefix) {
                out.push(prefix.iter().collect());
            }
            return;
        }
        let position = prefix.len();
        let missing = self
            .filter
            .mandatory()
            .iter()
            .filter(|letter| !prefix.contains(letter))
            .count();
        if missing > self.length - position {
            return;
        }

        for (i, &letter) in self.allowed.iter().enumerate() {
            if out.len() >= self.limit {
                return;
            }
            if used[i] || !self.filter.allows_at(position, letter) {
                continue;
            }
            used[i] = true;
            prefix.push(letter);
            self.extend(prefix, used, out);
            prefix.pop();
            used[i] = false;
        }
    }
}

/// Same sequence as [`candidates`], computed in parallel by first letter.
///
/// Enumeration dominates the cost of a round, so each first letter is
/// searched on its own rayon task.
///
/// With `limit`, only the first `limit` survivors are produced.
#[must_use]
pub fn surviving_candidates(state: &ConstraintState, limit: Option<usize>) -> Vec<String> {
    let allowed = allowed_letters(state);
    let length = state.word_length();
    if length == 0 || length > allowed.len() {
        return Vec::new();
    }
    let limit = limit.unwrap_or(usize::MAX);
    let filter = state.filter();

    let search = Search {
        filter: &filter,
        allowed: &allowed,
        length,
        limit,
    };

    let partitions: Vec<Vec<String>> = (0..allowed.len())
        .into_par_iter()
        .map(|first_index| search.partition(first_index))
        .collect();
    let mut survivors = partitions.concat();
    survivors.truncate(limit);
    debug_log!(
        "surviving_candidates() - {} survivors from {} allowed letters",
        survivors.len(),
        allowed.len()
    );
    survivors
}

/// Position of each letter of `word` in `allowed`, or `None` when the word
/// could never be enumerated (a letter outside `allowed` or used twice).
///
/// Comparing these keys reproduces enumeration order.
fn enumeration_key(word: &[char], allowed: &[char]) -> Option<Vec<usize>> {
    if !word.iter().all_unique() {
        return None;
    }
    word.iter()
        .map(|letter| allowed.iter().position(|c| c == letter))
        .collect()
}

/// The valid words that are also surviving candidates, by descending score.
///
/// Equal scores keep enumeration order. Works from the word list directly, so
/// the result does not depend on any cap on the enumeration.
#[must_use]
pub fn rank_valid_words(state: &ConstraintState, valid_words: &HashSet<String>) -> Vec<String> {
    let allowed = allowed_letters(state);
    let filter = state.filter();
    let mut ranked: Vec<(Reverse<u32>, Vec<usize>, &String)> = valid_words
        .iter()
        .filter_map(|word| {
            let letters: Vec<char> = word.chars().collect();
            let key = enumeration_key(&letters, &allowed)?;
            filter
                .accepts(&letters)
                .then(|| (Reverse(score_word(word)), key, word))
        })
        .collect();
    ranked.sort_unstable();
    debug_log!(
        "rank_valid_words() - {} of {} valid words survive",
        ranked.len(),
        valid_words.len()
    );
    ranked.into_iter().map(|(_, _, word)| word.clone()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestOptions {
    pub target_count: usize,
    pub max_candidates: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    /// Ranked words first, then random filler.
    pub words: Vec<String>,
    /// How many of `words` came from ranking. Zero without a word list.
    pub ranked_count: usize,
    /// Size of the surviving set, up to the enumeration cap.
    pub candidate_count: usize,
}

impl Suggestions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words not backed by the valid-word list.
    #[must_use]
    pub fn filler(&self) -> &[String] {
        &self.words[self.ranked_count..]
    }
}

/// Builds the suggestion list for the current constraints.
///
/// Ranked words come from [`rank_valid_words`]. Filler is drawn uniformly
/// from the surviving set with `rng` (repeats allowed) until the list holds
/// `min(target_count, survivors)` words. Without a word list the survivors
/// are returned unranked in enumeration order. `max_candidates` bounds only
/// the surviving set used for filler.
pub fn suggest<R: Rng + ?Sized>(
    state: &ConstraintState,
    valid_words: &HashSet<String>,
    options: &SuggestOptions,
    rng: &mut R,
) -> Suggestions {
    if options.target_count == 0 {
        return Suggestions::default();
    }
    let survivors = surviving_candidates(state, options.max_candidates);
    if survivors.is_empty() {
        return Suggestions::default();
    }

    if valid_words.is_empty() {
        let words: Vec<String> = survivors
            .iter()
            .take(options.target_count)
            .cloned()
            .collect();
        debug_log!(
            "suggest() - {} unranked of {} survivors",
            words.len(),
            survivors.len()
        );
        return Suggestions {
            words,
            ranked_count: 0,
            candidate_count: survivors.len(),
        };
    }

    let mut words = rank_valid_words(state, valid_words);
    words.truncate(options.target_count);
    let ranked_count = words.len();

    let wanted = options.target_count.min(survivors.len());
    while words.len() < wanted {
        match survivors.choose(rng) {
            Some(word) => words.push(word.clone()),
            None => break,
        }
    }

    debug_log!(
        "suggest() - {} ranked, {} filler, {} survivors",
        ranked_count,
        words.len() - ranked_count,
        survivors.len()
    );
    Suggestions {
        words,
        ranked_count,
        candidate_count: survivors.len(),
    }
}
