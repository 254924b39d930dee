use anyhow::Context;
use argh::FromArgs;
use log::*;
use mobot::*;

use crate::app::App;
use crate::dataset::{Dataset, EMBEDDED_COUNTRIES};

mod app;
mod dataset;
mod game;
mod handlers;

#[cfg(test)]
mod app_test;
#[cfg(test)]
mod dataset_test;

/// Telegram bot that plays guess-the-capital.
#[derive(FromArgs)]
struct Args {
    /// JSON file with country records, overriding the built-in dataset
    #[argh(option, short = 'c')]
    countries: Option<String>,

    /// name the bot introduces itself with
    #[argh(option, short = 'n', default = "String::from(\"Capitle\")")]
    game_name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mobot::init_logger();
    let args: Args = argh::from_env();

    let dataset = match &args.countries {
        Some(path) => Dataset::from_file(path)?,
        None => Dataset::from_json(EMBEDDED_COUNTRIES)?,
    };
    info!("Loaded {} countries.", dataset.len());

    let app = App::new(args.game_name, dataset);

    let token = std::env::var("TELEGRAM_TOKEN").context("TELEGRAM_TOKEN not set")?;
    let client = Client::new(token);
    info!("Starting bot...");
    Router::new(client)
        .with_state(app)
        .add_route(Route::Message(Matcher::Any), handlers::handle_chat_event)
        .start()
        .await;

    Ok(())
}
