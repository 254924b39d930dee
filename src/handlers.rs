use anyhow::anyhow;
use log::*;
use mobot::api::escape_md;
use mobot::*;

use crate::app::App;
use crate::game::{Feedback, Round, Turn, MAX_ATTEMPTS};

/// emoji_letter takes a capital letter and returns the corresponding emoji letter
/// inside the Regional Indicator Symbol range.
fn emoji_letter(l: char) -> char {
    let base = 0x1F1E6;
    let a = 'A' as u32;
    let target = l.to_ascii_uppercase() as u32;

    std::char::from_u32(base + target - a).unwrap_or('?')
}

/// render_round renders the guess history as Telegram markdown. Letters in
/// the right position become regional-indicator emoji, misplaced letters are
/// shown in backticks, absent letters as a heavy minus. Spaces inside a
/// capital name are rendered as-is.
fn render_round(round: &Round) -> String {
    let mut s = String::from("Your guesses:\n\n");
    for attempt in &round.history {
        for (c, feedback) in attempt {
            match feedback {
                Feedback::Correct if c.is_ascii_alphabetic() => {
                    s.push_str(&format!("{} ", emoji_letter(*c)))
                }
                Feedback::Correct => s.push_str(&format!("{} ", c)),
                Feedback::Present => s.push_str(&format!(" `{}`  ", c)),
                Feedback::Absent => s.push_str("\u{2796} "),
            }
        }
        s.push_str("\n\n");
    }
    s
}

/// render_letters renders the aggregated keyboard feedback: bold for letters
/// pinned to their position, backticks for letters that are in the capital
/// somewhere, strikethrough for letters it doesn't contain.
fn render_letters(round: &Round) -> String {
    round
        .attempted_letters()
        .iter()
        .map(|(c, feedback)| match feedback {
            Feedback::Correct => format!("*{}*", c),
            Feedback::Present => format!("`{}`", c),
            Feedback::Absent => format!("~{}~", c),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// handle_new_game starts a fresh round for this chat.
pub async fn handle_new_game(e: Event, state: State<App>) -> Result<Action, anyhow::Error> {
    // Get the sender's first name
    let from = e.update.get_message()?.clone().from.unwrap_or_default();

    let mut app = state.get().write().await;
    let country = app.start_round()?;
    let image = app
        .round
        .as_ref()
        .map(|r| r.image().to_string())
        .unwrap_or_default();

    info!(
        "Starting new round with {} ({}), capital of {}.",
        from.first_name,
        from.username.clone().unwrap_or("unknown".into()),
        country
    );

    Ok(Action::ReplyText(format!(
        "Hi {}, Welcome to {}!\n\nGuess the capital of {}! You have {} guesses.\n{}",
        from.first_name, app.game_name, country, MAX_ATTEMPTS, image
    )))
}

/// handle_bot_command handles the slash commands.
pub async fn handle_bot_command(e: Event, state: State<App>) -> Result<Action, anyhow::Error> {
    let command = e
        .update
        .get_message()?
        .text
        .as_ref()
        .ok_or(anyhow!("No command"))?;

    let reply = match command.as_str() {
        "/help" => {
            let game_name = state.get().read().await.game_name.clone();
            format!(
                "Welcome to {}! Guess the capital of the given country within {} tries.

After each guess you get Wordle-style feedback per letter, and a compass
hint when your guess is geographically close.

Type /new to start a new round or /score to see your score",
                game_name, MAX_ATTEMPTS
            )
        }

        "/new" => {
            return handle_new_game(e, state).await;
        }

        "/start" => {
            return handle_new_game(e, state).await;
        }

        "/score" => {
            let app = state.get().read().await;
            if app.score.games == 0 {
                "You have not played any games yet.".to_string()
            } else {
                format!("Your score: {}", app.score)
            }
        }

        _ => "I don't know that command.".into(),
    };

    Ok(Action::ReplyText(reply))
}

/// handle_chat_event is the main Telegram handler for the bot. Any message
/// while no round is open starts one; otherwise the message is played as a
/// guess against the active round.
pub async fn handle_chat_event(e: Event, state: State<App>) -> Result<Action, anyhow::Error> {
    // Get the message
    let message = e
        .update
        .get_message()?
        .text
        .clone()
        .ok_or(anyhow!("no message text"))?;

    // Get the sender's first name
    let from = e.update.get_message()?.clone().from.unwrap_or_default();

    if message.starts_with('/') {
        return handle_bot_command(e, state).await;
    }

    // If there's no active round, start one.
    if !state.get().read().await.is_playing() {
        return handle_new_game(e, state).await;
    }

    info!(
        "{} ({}) guessed {}",
        from.first_name,
        from.username.clone().unwrap_or("unknown".into()),
        message
    );

    // Play the guess against the active round.
    let turn = state.get().write().await.play_turn(&message)?;

    let (board, letters, capital, attempts_used, hint, image, score) = {
        let app = state.get().read().await;
        let round = app.round.as_ref().ok_or(anyhow!("no active round"))?;

        (
            render_round(round),
            render_letters(round),
            round.target.capital.clone(),
            round.attempts_used,
            round.message.clone(),
            round.image().to_string(),
            app.score.clone(),
        )
    };

    let reply = match turn {
        Turn::Ignored => {
            format!(
                "Type a capital city to guess, {}\\.",
                escape_md(from.first_name.as_str())
            )
        }
        Turn::NotACapital => {
            format!(
                "Sorry {}, that's not a Capital\\. Try again\\.",
                escape_md(from.first_name.as_str())
            )
        }
        Turn::Incorrect => {
            let mut reply = board;
            reply.push_str(&format!(
                "\nIncorrect, try again\\! \\({} / {}\\)\nLetters: {}",
                attempts_used, MAX_ATTEMPTS, letters
            ));
            if let Some(hint) = hint {
                reply.push_str(&format!("\n{}", escape_md(hint.as_str())));
            }
            reply
        }
        Turn::Correct => {
            info!("{} won with {}", from.first_name, message);
            let mut reply = board;
            reply.push_str(
                escape_md(
                    format!(
                        "\nCorrect! The capital is {}. \u{1F389}\n{}\nYour score: {}",
                        capital, image, score
                    )
                    .as_str(),
                )
                .as_str(),
            );
            reply.push_str("\n\nSend /new for the next round\\.");
            reply
        }
        Turn::OutOfAttempts => {
            info!(
                "{} lost with {} (capital: {})",
                from.first_name, message, capital
            );
            let mut reply = board;
            reply.push_str(
                escape_md(
                    format!(
                        "\nOut of guesses! The capital was {}. \u{1F6D1}\nYour score: {}",
                        capital, score
                    )
                    .as_str(),
                )
                .as_str(),
            );
            reply.push_str("\n\nSend /new for the next round\\.");
            reply
        }
    };

    Ok(Action::ReplyMarkdown(reply))
}
