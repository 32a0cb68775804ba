//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `StaffingBuddy` application,
//! including all slash commands, autocomplete handlers, and bot context management.
//! Commands only parse input, call into [`crate::core`] and format the reply.

/// Discord command implementations (employees, engagements, clients, findings)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::Settings,
    core::employee,
    entities::employee::Model as EmployeeModel,
    errors::{Error, Result},
    notify::NotificationDispatcher,
};
use chrono::NaiveDate;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Poise context used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Settings loaded at start-up
    pub settings: Arc<Settings>,
    /// Where assignment and leave notifications go
    pub notifier: Arc<dyn NotificationDispatcher>,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub fn new(
        database: DatabaseConnection,
        settings: Arc<Settings>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            database,
            settings,
            notifier,
        }
    }
}

/// The current local calendar day.
#[must_use]
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Resolves an employee by username or full name, or the caller's linked employee when
/// no name is given.
///
/// Replies with an explanation and returns `None` when nobody matches.
pub async fn resolve_employee(ctx: Context<'_>, name: Option<&str>) -> Result<Option<EmployeeModel>> {
    let db = &ctx.data().database;
    let found = match name {
        Some(name) => employee::find_employee(db, name).await?,
        None => employee::get_employee_by_discord_id(db, &ctx.author().id.to_string()).await?,
    };

    if found.is_none() {
        let message = name.map_or_else(
            || "❌ Your Discord account is not linked to an employee. Pass a name instead.".to_string(),
            |name| format!("❌ Employee '{name}' not found."),
        );
        ctx.say(message).await?;
    }
    Ok(found)
}

/// Every command the bot registers
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::status(),
        commands::next_event(),
        commands::availability(),
        commands::free(),
        commands::workload(),
        commands::team(),
        commands::dashboard(),
        commands::leave(),
        commands::add_employee(),
        commands::engagements(),
        commands::engagement_info(),
        commands::create_engagement(),
        commands::assign(),
        commands::unassign(),
        commands::client_report(),
        commands::clients(),
        commands::add_client(),
        commands::add_vulnerability(),
        commands::fix_vulnerability(),
        commands::overdue(),
    ]
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ {error}")).await {
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
#[instrument(skip(token, data))]
pub async fn run_bot(token: &str, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered {} commands", framework.options().commands.len());
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
