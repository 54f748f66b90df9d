use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use levelgate_adapters::infrastructure::{
    FileStorageProvider, HttpApiAdapter, SystemTimeProvider, TokioSleepProvider,
};
use levelgate_app::application::services::{
    CatalogService, LevelGate, PaymentWatcher, SessionService,
};
use levelgate_app::application::{Api, ClientConfig, ServiceError};
use levelgate_domain::SessionContext;
use levelgate_ports::outbound::{RawApiPort, StorageProvider};

use crate::command::{Command, PATH_ID_ENV};

const DEFAULT_LOG_FILTER: &str =
    "levelgate_runner=info,levelgate_app=debug,levelgate_adapters=debug";

/// Cancels `cancel_token` on Ctrl+C
fn setup_shutdown_signal(cancel_token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received Ctrl+C, cancelling");
                cancel_token.cancel();
            }
            Err(e) => tracing::error!(error = %e, "Failed to install Ctrl+C handler"),
        }
    });
}

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args, std::env::var(PATH_ID_ENV).ok())?;

    let config = ClientConfig::from_env();
    tracing::info!(
        api_url = %config.api_url,
        timeout_ms = config.request_timeout_ms,
        "Configuration loaded"
    );

    let raw: Arc<dyn RawApiPort> = Arc::new(HttpApiAdapter::new(&config)?);
    let api = Api::new(raw);
    let sessions = SessionService::new(FileStorageProvider::from_config(&config));
    let session = sessions.load();
    tracing::debug!(authenticated = session.is_authenticated(), "Session loaded");

    let cancel_token = CancellationToken::new();
    setup_shutdown_signal(cancel_token.clone());

    let result = execute(command, api, &sessions, &session, &cancel_token).await;
    let output = report_cancelled(result)?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn execute<S: StorageProvider>(
    command: Command,
    api: Api,
    sessions: &SessionService<S>,
    session: &SessionContext,
    cancel_token: &CancellationToken,
) -> Result<Value> {
    let output = match command {
        Command::Path(path_id) => {
            let levels = CatalogService::new(api.clone())
                .list_levels(session, &path_id)
                .await?;
            let view = LevelGate::new(api)
                .load_path(session, &path_id, levels, cancel_token)
                .await?;
            serde_json::to_value(view)?
        }
        Command::Level {
            path_id,
            level_id,
            exercise_id,
        } => {
            let check = LevelGate::new(api)
                .check_level(
                    session,
                    &path_id,
                    &level_id,
                    exercise_id.as_ref(),
                    cancel_token,
                )
                .await?;
            serde_json::to_value(check)?
        }
        Command::Payment(payment_id) => {
            let outcome = PaymentWatcher::new(api, SystemTimeProvider, TokioSleepProvider)
                .watch(session, &payment_id, cancel_token)
                .await?;
            json!({ "paymentId": payment_id, "outcome": outcome, "paid": outcome.is_paid() })
        }
        Command::Logout => {
            sessions.clear();
            tracing::info!("Session cleared");
            json!({ "loggedOut": true })
        }
    };
    Ok(output)
}

/// A cancelled operation is reported, not treated as a failure.
fn report_cancelled(result: Result<Value>) -> Result<Value> {
    match result {
        Err(e) if e
            .downcast_ref::<ServiceError>()
            .is_some_and(ServiceError::is_cancelled) =>
        {
            tracing::info!("Operation cancelled before completing");
            Ok(json!({ "cancelled": true }))
        }
        other => other,
    }
}
