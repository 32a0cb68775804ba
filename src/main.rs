use dotenvy::dotenv;
use poise::serenity_prelude as serenity;
use staffing_buddy::{
    bot::{self, BotData},
    config::{database, settings},
    core::service,
    errors::{Error, Result},
    notify::{self, DiscordChannelSink, LogSink, QueueDispatcher},
};
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();

    // 3. Settings
    let settings = Arc::new(
        settings::load_default_settings()
            .inspect_err(|e| error!("Failed to load settings: {}", e))?,
    );
    info!(
        "Loaded settings: {} services, utilization window {} days",
        settings.services.len(),
        settings.utilization.window_days
    );

    // 4. Database
    if database::get_database_url().starts_with("sqlite://data/") {
        std::fs::create_dir_all("data")?;
    }
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;
    service::seed_services(&db, &settings.services)
        .await
        .inspect(|added| info!("Seeded {} services", added))
        .inspect_err(|e| error!("Failed to seed services: {}", e))?;

    // 5. Notification queue
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    let (dispatcher, receiver) = QueueDispatcher::new(notify::QUEUE_CAPACITY);
    match settings.notifications.channel_id {
        Some(channel_id) => {
            let http = Arc::new(serenity::Http::new(&token));
            tokio::spawn(notify::run_worker(
                DiscordChannelSink::new(http, channel_id),
                receiver,
            ));
            info!("Notifications go to channel {}", channel_id);
        }
        None => {
            tokio::spawn(notify::run_worker(LogSink, receiver));
            info!("No notification channel configured, logging notifications instead");
        }
    }

    // 6. Run the bot
    let data = BotData::new(db, Arc::clone(&settings), Arc::new(dispatcher));
    bot::run_bot(&token, data).await
}
