/// The round engine. A Round owns all mutable state for one game of
/// guess-the-capital: the in-progress input buffer, the guess history with
/// per-letter feedback, the aggregated keyboard feedback, and the
/// bounded-attempt state machine. Nothing here survives past the round.
use std::collections::HashMap;

use anyhow::anyhow;
use rand::seq::SliceRandom;

use crate::dataset::{normalize, CountryRecord, Dataset};

/// Maximum number of validated guesses per round.
pub const MAX_ATTEMPTS: usize = 5;

/// Upper bound on the in-progress input buffer, in characters.
pub const MAX_INPUT_LEN: usize = 30;

/// Feedback classifies a single guessed letter. The derived order is the
/// upgrade order for the keyboard summary: Absent < Present < Correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feedback {
    Absent,
    Present,
    Correct,
}

/// Status of the round. Correct and OutOfAttempts are terminal: once
/// reached, all input is ignored until a new round starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    Correct,
    OutOfAttempts,
}

/// A logical key event from the input layer. Printable keys are the letters
/// A-Z (either case) and space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
}

/// Turn is the outcome of a submitted guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Empty input or terminal round; nothing happened.
    Ignored,
    /// The guess is not a known capital. No attempt was consumed.
    NotACapital,
    /// A valid capital, but not the target.
    Incorrect,
    /// The target capital.
    Correct,
    /// A valid capital, wrong, and the attempt budget is now spent.
    OutOfAttempts,
}

/// Round represents a single game against one target country.
#[derive(Debug, Clone)]
pub struct Round {
    /// The country whose capital the player is trying to guess.
    pub target: CountryRecord,

    /// The unsubmitted input buffer, raw form.
    pub input: String,

    pub status: Status,
    pub attempts_used: usize,

    /// Best feedback seen so far per normalized letter, upgraded
    /// monotonically across guesses.
    pub letter_feedback: HashMap<char, Feedback>,

    /// Past guesses in submission order, each letter with the feedback it
    /// scored at the time.
    pub history: Vec<Vec<(char, Feedback)>>,

    /// Most recent advisory or hint text. Cleared on the next keystroke.
    pub message: Option<String>,
}

impl Round {
    /// `new` starts a fresh round against a uniformly random country.
    pub fn new(dataset: &Dataset) -> anyhow::Result<Round> {
        let target = dataset
            .records()
            .choose(&mut rand::thread_rng())
            .ok_or(anyhow!("no countries to choose from"))?
            .clone();

        Ok(Round::with_target(target))
    }

    /// `with_target` starts a fresh round against the given country.
    pub fn with_target(target: CountryRecord) -> Round {
        Round {
            target,
            input: String::new(),
            status: Status::Playing,
            attempts_used: 0,
            letter_feedback: HashMap::new(),
            history: Vec::new(),
            message: None,
        }
    }

    /// `apply_key` feeds one logical key event into the round. Letters and
    /// spaces append to the input buffer while it is under its length bound
    /// (past the bound they are silently dropped), backspace removes the last
    /// character, and enter submits the buffer as a guess. Accepted edits
    /// clear any stale advisory text. Terminal rounds ignore all keys.
    pub fn apply_key(&mut self, dataset: &Dataset, key: Key) -> Turn {
        if self.status != Status::Playing {
            return Turn::Ignored;
        }

        match key {
            Key::Char(c) => {
                let c = c.to_ascii_uppercase();
                if (c.is_ascii_uppercase() || c == ' ') && self.input.len() < MAX_INPUT_LEN {
                    self.input.push(c);
                    self.message = None;
                }
                Turn::Ignored
            }
            Key::Backspace => {
                self.input.pop();
                self.message = None;
                Turn::Ignored
            }
            Key::Enter => {
                let input = self.input.clone();
                self.submit_guess(dataset, &input)
            }
        }
    }

    /// `submit_guess` plays one turn of the round.
    ///
    /// An empty guess is a no-op. A guess that doesn't normalize to any
    /// capital in the dataset sets an advisory message and consumes nothing.
    /// Otherwise the guess is scored against the target, the keyboard
    /// feedback is upgraded, the scored guess is appended to the history, a
    /// directional hint may be set, one attempt is consumed, the input
    /// buffer is cleared, and the round advances: Correct on an exact match,
    /// OutOfAttempts when the last attempt misses, Playing otherwise.
    pub fn submit_guess(&mut self, dataset: &Dataset, raw: &str) -> Turn {
        if self.status != Status::Playing || raw.is_empty() {
            return Turn::Ignored;
        }

        let guess = normalize(raw);

        let guessed = match dataset.find_capital(&guess) {
            Some(record) => record,
            None => {
                self.message = Some("That's not a Capital".to_string());
                return Turn::NotACapital;
            }
        };

        let target = normalize(&self.target.capital);
        let scored = score_guess(&guess, &target);

        for &(c, feedback) in &scored {
            let entry = self.letter_feedback.entry(c).or_insert(feedback);
            *entry = (*entry).max(feedback);
        }
        self.history.push(scored);

        self.message = directional_hint(&self.target, guessed);

        self.attempts_used += 1;
        self.input.clear();

        self.status = if guess == target {
            Status::Correct
        } else if self.attempts_used >= MAX_ATTEMPTS {
            Status::OutOfAttempts
        } else {
            Status::Playing
        };

        match self.status {
            Status::Playing => Turn::Incorrect,
            Status::Correct => Turn::Correct,
            Status::OutOfAttempts => Turn::OutOfAttempts,
        }
    }

    /// `attempted_letters` returns a sorted view of the keyboard feedback
    /// collected so far.
    pub fn attempted_letters(&self) -> Vec<(char, Feedback)> {
        let mut letters = self
            .letter_feedback
            .iter()
            .map(|(c, f)| (*c, *f))
            .collect::<Vec<_>>();
        letters.sort();
        letters
    }

    /// `image` selects the image handle for the current status: the colored
    /// reveal once the capital is guessed, the silhouette otherwise.
    pub fn image(&self) -> &str {
        match self.status {
            Status::Correct => &self.target.colored_image,
            _ => &self.target.image,
        }
    }
}

/// `score_guess` compares a normalized guess to the normalized target and
/// returns one feedback entry per guessed character.
///
/// Two passes keep repeated letters honest. The first pass marks exact-index
/// matches Correct and consumes from a per-letter tally of the target's
/// characters, so a duplicate elsewhere in the guess can't steal an exact
/// match. The second pass marks the remaining positions Present while the
/// tally still covers that letter, Absent after. A letter never collects
/// more Correct+Present marks than it occurs in the target. Guess and target
/// may differ in length; positions past the target's end can only score in
/// the second pass.
pub fn score_guess(guess: &str, target: &str) -> Vec<(char, Feedback)> {
    let target_chars: Vec<char> = target.chars().collect();

    let mut tally = target_chars.iter().fold(HashMap::new(), |mut acc, c| {
        *acc.entry(*c).or_insert(0) += 1;
        acc
    });

    let mut scored: Vec<(char, Feedback)> = guess
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if target_chars.get(i) == Some(&c) {
                *tally.entry(c).or_insert(0) -= 1;
                (c, Feedback::Correct)
            } else {
                (c, Feedback::Absent)
            }
        })
        .collect();

    for (c, feedback) in scored.iter_mut() {
        if *feedback == Feedback::Correct {
            continue;
        }
        let count = tally.entry(*c).or_insert(0);
        if *count > 0 {
            *count -= 1;
            *feedback = Feedback::Present;
        }
    }

    scored
}

/// `directional_hint` computes the coarse compass hint from the target
/// toward a validly guessed capital. A hint is only produced when the guess
/// is close (within 10 degrees on both axes), and an axis difference within
/// one degree contributes no direction word. A close guess with no words
/// produces no hint at all.
pub fn directional_hint(target: &CountryRecord, guessed: &CountryRecord) -> Option<String> {
    let lat_diff = target.lat - guessed.lat;
    let lon_diff = target.lon - guessed.lon;

    if lat_diff.abs() >= 10.0 || lon_diff.abs() >= 10.0 {
        return None;
    }

    let mut directions = Vec::new();
    if lat_diff > 1.0 {
        directions.push("more north");
    } else if lat_diff < -1.0 {
        directions.push("more south");
    }
    if lon_diff > 1.0 {
        directions.push("more east");
    } else if lon_diff < -1.0 {
        directions.push("more west");
    }

    if directions.is_empty() {
        return None;
    }

    Some(format!("Close! Try {}", directions.join(" and ")))
}
