//! Developer host: reads one message per line from stdin and prints the
//! response envelopes as JSON.
//!
//! A `save` action is acknowledged immediately, standing in for the
//! persistence layer, so a dialogue can be walked end to end from a terminal.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use travel_chat_agent::{ContextSweeper, TravelAssistant};
use travel_chat_config::{load_settings, Settings};
use travel_chat_core::{CompletionOutcome, EnvelopeAction, ResponseEnvelope};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("TRAVEL_CHAT_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        },
    };

    init_tracing(&settings);
    tracing::info!(
        environment = ?settings.environment,
        backend = ?settings.store.backend,
        "Starting travel-chat console v{}",
        env!("CARGO_PKG_VERSION")
    );

    let assistant =
        TravelAssistant::from_settings(&settings).context("failed to build the assistant")?;

    let sweeper = if assistant.store().is_distributed() {
        None
    } else {
        Some(ContextSweeper::start(
            assistant.store().clone(),
            settings.store.context_ttl(),
            settings.store.cleanup_interval(),
        ))
    };

    let subject_id = std::env::var("TRAVEL_CHAT_TRIP_ID").unwrap_or_else(|_| "demo-trip".into());
    let requester_id = std::env::var("TRAVEL_CHAT_USER_ID").unwrap_or_else(|_| "demo-user".into());
    tracing::info!(%subject_id, %requester_id, "Reading messages from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let routed = match assistant.handle(&line, &subject_id, &requester_id) {
            Ok(routed) => routed,
            Err(e) => {
                tracing::error!(error = %e, "Failed to process message");
                continue;
            },
        };

        if !routed.is_handled() {
            println!("(nessuna azione)");
            continue;
        }
        print_envelope(&routed.envelope)?;

        if let (Some(kind), Some(EnvelopeAction::Save)) = (routed.kind, routed.envelope.action) {
            let record = serde_json::to_string(&routed.envelope.data)?;
            tracing::info!(%kind, %record, "Persisting record");
            let done = assistant.complete(
                kind,
                &subject_id,
                &requester_id,
                &CompletionOutcome::succeeded(),
            )?;
            print_envelope(&done)?;
        }
    }

    if let Some(sweeper) = sweeper {
        sweeper.stop().await;
    }
    tracing::info!("Console session ended");
    Ok(())
}

fn print_envelope(envelope: &ResponseEnvelope) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(envelope)?);
    Ok(())
}

/// Initialize tracing from the observability settings
fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("travel_chat={}", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}
