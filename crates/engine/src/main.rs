//! daggerheart-replay - fold an event log into projections.
//!
//! Reads one event envelope per line from a JSONL file, applies each in
//! order to an in-memory store, and prints the resulting campaign state.

use anyhow::Context;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daggerheart_engine::infrastructure::config::EngineConfig;
use daggerheart_engine::use_cases::ApplyOutcome;
use daggerheart_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daggerheart_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: daggerheart-replay <events.jsonl>")?;
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read {path}"))?;

    let config = EngineConfig::from_env();
    tracing::info!(
        path = %path,
        massive_damage_enabled = config.massive_damage_enabled,
        unknown_event_policy = %config.unknown_event_policy,
        "Replaying event log"
    );
    let (app, store) = App::in_memory(config);

    let (mut applied, mut recorded, mut skipped) = (0usize, 0usize, 0usize);
    for (index, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let outcome = app
            .use_cases
            .apply
            .apply_json(line)
            .await
            .with_context(|| format!("{path}:{}", index + 1))?;
        match outcome {
            ApplyOutcome::Applied(_) => applied += 1,
            ApplyOutcome::Recorded(_) => recorded += 1,
            ApplyOutcome::Skipped => skipped += 1,
        }
    }
    tracing::info!(applied, recorded, skipped, "Replay complete");

    let mut campaigns = serde_json::Map::new();
    for campaign_id in store.campaign_ids().await {
        let snapshot = app
            .use_cases
            .snapshot
            .snapshot(campaign_id.as_str())
            .await?;
        campaigns.insert(
            campaign_id.to_string(),
            json!({
                "snapshot": snapshot,
                "characters": store.characters_in(&campaign_id).await,
                "adversaries": store.adversaries_in(&campaign_id).await,
                "countdowns": store.countdowns_in(&campaign_id).await,
            }),
        );
    }
    println!("{}", serde_json::to_string_pretty(&campaigns)?);
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
