/// App is the main bot application state. It wires the round engine to the
/// chat: the country dataset is shared across chats, while the active round
/// and the score tally live per chat ID.
use std::{fmt::Display, sync::Arc};

use anyhow::{anyhow, Result};
use mobot::*;

use crate::dataset::Dataset;
use crate::game::{Round, Status, Turn};

/// Score represents a user's score for this session.
#[derive(Clone, Default)]
pub struct Score {
    pub games: u32,
    pub wins: u32,
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.0}% ({}/{})",
            self.wins as f32 / self.games as f32 * 100.0,
            self.wins,
            self.games
        )
    }
}

/// App represents the bot state for the capital-guessing bot.
#[derive(Clone, Default, BotState)]
pub struct App {
    // App global
    pub game_name: String,
    dataset: Arc<Dataset>,

    // Per chat ID
    pub round: Option<Round>,
    pub score: Score,
}

impl App {
    /// Creates a new App instance around a loaded dataset.
    pub fn new(game_name: String, dataset: Dataset) -> App {
        App {
            game_name,
            dataset: Arc::new(dataset),
            ..Default::default()
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(
            self.round.as_ref().map(|r| r.status),
            Some(Status::Playing)
        )
    }

    /// Starts a fresh round, discarding any previous one. Returns the name
    /// of the new target country.
    pub fn start_round(&mut self) -> Result<String> {
        let round = Round::new(&self.dataset)?;
        let country = round.target.country.clone();
        self.score.games += 1;
        self.round = Some(round);
        Ok(country)
    }

    /// Plays one guess against the active round.
    pub fn play_turn(&mut self, text: &str) -> Result<Turn> {
        let round = self.round.as_mut().ok_or(anyhow!("no active round"))?;
        let turn = round.submit_guess(self.dataset.as_ref(), text);
        if turn == Turn::Correct {
            self.score.wins += 1;
        }
        Ok(turn)
    }
}
