//! Application state and composition.

use std::sync::Arc;

use daggerheart_domain::commands::DecideOptions;
use daggerheart_domain::game_systems::daggerheart::DiceRoller;

use crate::infrastructure::{
    clock::SystemClock,
    config::EngineConfig,
    dice::SeededDiceRoller,
    memory::InMemoryProjectionStore,
    ports::{ClockPort, ProjectionStore},
};
use crate::use_cases::{ApplyEvent, CommandService, Projections, SnapshotQuery};

/// Main application state.
///
/// Holds the storage port and every use case wired against it.
pub struct App {
    pub config: EngineConfig,
    pub store: Arc<dyn ProjectionStore>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub apply: Arc<ApplyEvent>,
    pub commands: Arc<CommandService>,
    pub snapshot: Arc<SnapshotQuery>,
}

impl App {
    pub fn new(
        store: Arc<dyn ProjectionStore>,
        dice: Arc<dyn DiceRoller + Send + Sync>,
        clock: Arc<dyn ClockPort>,
        config: EngineConfig,
    ) -> Self {
        let projections = Arc::new(Projections::new(store.clone(), config.store_timeout()));
        let apply = Arc::new(ApplyEvent::new(
            projections.clone(),
            config.unknown_event_policy,
        ));
        let commands = Arc::new(CommandService::new(
            projections.clone(),
            apply.clone(),
            dice,
            clock,
            DecideOptions {
                massive_damage_enabled: config.massive_damage_enabled,
            },
        ));
        let snapshot = Arc::new(SnapshotQuery::new(projections));

        Self {
            config,
            store,
            use_cases: UseCases {
                apply,
                commands,
                snapshot,
            },
        }
    }

    /// In-memory store, seeded dice, and the system clock.
    pub fn in_memory(config: EngineConfig) -> (Self, Arc<InMemoryProjectionStore>) {
        let store = Arc::new(InMemoryProjectionStore::new());
        let app = Self::new(
            store.clone(),
            Arc::new(SeededDiceRoller::new()),
            Arc::new(SystemClock::new()),
            config,
        );
        (app, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::infrastructure::config::UnknownEventPolicy;

    #[tokio::test]
    async fn config_reaches_the_event_layer() {
        let config = EngineConfig {
            unknown_event_policy: UnknownEventPolicy::Ignore,
            ..EngineConfig::default()
        };
        let (app, _) = App::in_memory(config);
        let outcome = app
            .use_cases
            .apply
            .apply_json(
                &json!({
                    "event_id": "00000000-0000-0000-0000-000000000001",
                    "campaign_id": "camp-1",
                    "event_type": "spell_cast",
                    "payload": {},
                    "occurred_at": "2026-03-01T20:00:00Z"
                })
                .to_string(),
            )
            .await
            .unwrap();
        assert_eq!(outcome, crate::use_cases::ApplyOutcome::Skipped);
    }

    #[tokio::test]
    async fn commands_and_queries_share_the_store() {
        let (app, store) = App::in_memory(EngineConfig::default());
        app.use_cases
            .commands
            .execute("camp-1", "change_gm_fear", json!({"delta": 4}))
            .await
            .unwrap();

        let snapshot = app.use_cases.snapshot.snapshot("camp-1").await.unwrap();
        assert_eq!(snapshot.gm_fear, 4);
        assert_eq!(store.campaign_ids().await.len(), 1);
    }
}
