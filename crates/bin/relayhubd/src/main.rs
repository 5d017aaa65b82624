//! # relayhubd — relayhub daemon
//!
//! Composition root that wires all adapters together and runs the engine.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct the token service and the reference clock
//! - Build the hook registry covering every catalog (service, kind) pair
//! - Start the scheduler and handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use chrono::FixedOffset;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use relayhub_adapter_providers::clock::{SystemTimeSource, WorldTimeSource};
use relayhub_adapter_providers::oauth::{HttpTokenEndpoint, OAuthClient};
use relayhub_adapter_providers::{discord, github, gmail, spotify, timer, youtube};
use relayhub_adapter_storage_sqlite_sqlx::automation_repo::SqliteAutomationRepository;
use relayhub_adapter_storage_sqlite_sqlx::credential_repo::SqliteCredentialRepository;
use relayhub_adapter_storage_sqlite_sqlx::pool;
use relayhub_app::ports::{AccessTokens, TimeSource};
use relayhub_app::registry::HookRegistry;
use relayhub_app::scheduler::{HookExecutor, SchedulerConfig};
use relayhub_app::token_service::TokenService;

use crate::config::{Config, OAuthClientConfig};

fn oauth_client(config: &OAuthClientConfig) -> OAuthClient {
    OAuthClient {
        token_url: config.token_url.clone(),
        client_id: config.client_id.clone(),
        client_secret: config.client_secret.clone(),
    }
}

/// Register every catalog (service, kind) pair exactly once.
fn build_registry(
    client: &reqwest::Client,
    tokens: Arc<dyn AccessTokens>,
    clock: Arc<dyn TimeSource>,
) -> HookRegistry {
    let mut registry = HookRegistry::new();

    // Actions
    registry.register_evaluator(
        "timer",
        "time_reached",
        Arc::new(timer::TimeReachedEvaluator::new(Arc::clone(&clock))),
    );
    registry.register_evaluator(
        "timer",
        "date_reached",
        Arc::new(timer::DateReachedEvaluator::new(Arc::clone(&clock))),
    );
    registry.register_evaluator(
        "timer",
        "day_of_week",
        Arc::new(timer::DayOfWeekEvaluator::new(Arc::clone(&clock))),
    );
    registry.register_evaluator(
        "gmail",
        "new_email",
        Arc::new(gmail::NewEmailEvaluator::new(
            client.clone(),
            Arc::clone(&tokens),
        )),
    );
    registry.register_evaluator(
        "spotify",
        "new_saved_track",
        Arc::new(spotify::NewSavedTrackEvaluator::new(
            client.clone(),
            Arc::clone(&tokens),
        )),
    );
    registry.register_evaluator(
        "youtube",
        "new_video",
        Arc::new(youtube::NewVideoEvaluator::new(
            client.clone(),
            Arc::clone(&tokens),
        )),
    );

    // Reactions
    registry.register_executor(
        "discord",
        "send_webhook_message",
        Arc::new(discord::WebhookExecutor::new(client.clone())),
    );
    registry.register_executor(
        "gmail",
        "send_email",
        Arc::new(gmail::SendEmailExecutor::new(
            client.clone(),
            Arc::clone(&tokens),
        )),
    );
    registry.register_executor(
        "spotify",
        "skip_track",
        Arc::new(spotify::SkipTrackExecutor::new(
            client.clone(),
            Arc::clone(&tokens),
        )),
    );
    registry.register_executor(
        "spotify",
        "play_playlist",
        Arc::new(spotify::PlayPlaylistExecutor::new(
            client.clone(),
            Arc::clone(&tokens),
        )),
    );
    registry.register_executor(
        "youtube",
        "like_video",
        Arc::new(youtube::LikeVideoExecutor::new(
            client.clone(),
            Arc::clone(&tokens),
        )),
    );
    registry.register_executor(
        "youtube",
        "add_to_playlist",
        Arc::new(youtube::AddToPlaylistExecutor::new(
            client.clone(),
            Arc::clone(&tokens),
        )),
    );
    registry.register_executor(
        "youtube",
        "post_comment",
        Arc::new(youtube::PostCommentExecutor::new(
            client.clone(),
            Arc::clone(&tokens),
        )),
    );
    registry.register_executor(
        "github",
        "create_issue",
        Arc::new(github::CreateIssueExecutor::new(
            client.clone(),
            Arc::clone(&tokens),
        )),
    );
    registry.register_executor(
        "github",
        "add_comment",
        Arc::new(github::AddCommentExecutor::new(
            client.clone(),
            Arc::clone(&tokens),
        )),
    );

    registry
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = pool::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let automation_repo = SqliteAutomationRepository::new(db.pool().clone());
    let credential_repo = SqliteCredentialRepository::new(db.pool().clone());

    // Outbound HTTP
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(20))
        .build()?;

    // Token lifecycle
    let endpoint = HttpTokenEndpoint::new(client.clone())
        .with_provider("google", oauth_client(&config.oauth.google))
        .with_provider("spotify", oauth_client(&config.oauth.spotify))
        .with_provider("github", oauth_client(&config.oauth.github));
    let tokens: Arc<dyn AccessTokens> = Arc::new(TokenService::new(credential_repo, endpoint));

    // Reference clock
    let offset = FixedOffset::east_opt(config.time.utc_offset_hours * 3600)
        .ok_or("invalid utc offset")?;
    let clock: Arc<dyn TimeSource> = match &config.time.worldtime_url {
        Some(url) => Arc::new(WorldTimeSource::new(client.clone(), url.clone(), offset)),
        None => Arc::new(SystemTimeSource::new(offset)),
    };

    // Hooks & scheduler
    let registry = build_registry(&client, tokens, clock);
    let scheduler_config = SchedulerConfig {
        interval: std::time::Duration::from_secs(config.scheduler.interval_secs),
        cooldown: chrono::Duration::seconds(config.scheduler.cooldown_secs),
        concurrency: config.scheduler.concurrency,
        item_timeout: std::time::Duration::from_secs(config.scheduler.item_timeout_secs),
    };
    let executor = Arc::new(HookExecutor::new(
        automation_repo,
        Arc::new(registry),
        scheduler_config,
    ));

    let seeded = executor.rehydrate().await?;
    info!(seeded, "cooldown latch rehydrated");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = tokio::spawn(Arc::clone(&executor).run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    shutdown_tx.send(true)?;
    scheduler.await?;

    Ok(())
}
