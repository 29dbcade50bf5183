//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the V-Bucks ledger: slash
//! commands, autocomplete handlers, and the shared bot context. Commands only parse
//! arguments and format replies; every ledger rule lives in `core`.

/// Discord command implementations (account, ledger, refund, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::settings::Settings,
    core::user,
    entities,
    errors::{Error, ErrorKind, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Currency settings from config.toml
    pub settings: Settings,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(database: DatabaseConnection, settings: Settings) -> Self {
        Self { database, settings }
    }
}

/// Poise context used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Looks up the ledger user bound to the command author.
///
/// # Errors
/// Returns [`Error::Validation`] asking the author to `/register` first.
pub async fn current_user(ctx: Context<'_>) -> Result<entities::user::Model> {
    let discord_id = ctx.author().id.to_string();
    user::get_user_by_discord_id(&ctx.data().database, &discord_id)
        .await?
        .ok_or_else(|| Error::validation("You are not registered yet. Use `/register` first."))
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = match error.kind() {
                ErrorKind::Validation | ErrorKind::NotFound => {
                    warn!("Command `{}` rejected: {}", ctx.command().name, error);
                    format!("❌ {error}")
                }
                ErrorKind::Store | ErrorKind::Other => {
                    error!("Error in command `{}`: {:?}", ctx.command().name, error);
                    "❌ Something went wrong, nothing was saved.".to_string()
                }
            };
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the poise framework and runs the Discord client until it stops.
#[instrument(skip_all)]
pub async fn run_bot(token: String, settings: Settings, database: DatabaseConnection) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::register(),
                commands::balance(),
                commands::purchase(),
                commands::earn(),
                commands::spend(),
                commands::refund(),
                commands::unrefund(),
                commands::delete_purchase(),
                commands::delete_spending(),
                commands::history(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered commands globally");
                Ok(BotData::new(database, settings))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Starting bot client...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    client.start().await?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
