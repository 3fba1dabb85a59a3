//! Command execution use case.
//!
//! Loads the projections a command reads, runs the pure decider, stamps
//! each decided event into an envelope, and applies the envelopes in order
//! through the event layer. The envelopes are returned for the caller's
//! event log.

mod error;

pub use error::CommandError;

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use daggerheart_domain::commands::{decide, DaggerheartCommand, DecideOptions, DecisionState};
use daggerheart_domain::events::EventEnvelope;
use daggerheart_domain::game_systems::daggerheart::DiceRoller;
use daggerheart_domain::{CampaignId, DomainError};

use super::events::ApplyEvent;
use super::projections::Projections;
use crate::infrastructure::ports::ClockPort;

pub struct CommandService {
    projections: Arc<Projections>,
    apply: Arc<ApplyEvent>,
    dice: Arc<dyn DiceRoller + Send + Sync>,
    clock: Arc<dyn ClockPort>,
    options: DecideOptions,
}

impl CommandService {
    pub fn new(
        projections: Arc<Projections>,
        apply: Arc<ApplyEvent>,
        dice: Arc<dyn DiceRoller + Send + Sync>,
        clock: Arc<dyn ClockPort>,
        options: DecideOptions,
    ) -> Self {
        Self {
            projections,
            apply,
            dice,
            clock,
            options,
        }
    }

    /// Decode and run one command against a campaign.
    pub async fn execute(
        &self,
        campaign_id: &str,
        command_type: &str,
        payload: serde_json::Value,
    ) -> Result<Vec<EventEnvelope>, CommandError> {
        let campaign_id = CampaignId::new(campaign_id)?;
        let command = DaggerheartCommand::parse(command_type, payload)
            .map_err(|e| DomainError::parse(format!("{command_type}: {e}")))?
            .ok_or_else(|| CommandError::UnknownCommandType(command_type.to_string()))?;
        self.run(&campaign_id, &command).await
    }

    pub async fn run(
        &self,
        campaign_id: &CampaignId,
        command: &DaggerheartCommand,
    ) -> Result<Vec<EventEnvelope>, CommandError> {
        let state = self.load_state(campaign_id, command).await?;
        let events = decide(command, &state, self.dice.as_ref(), self.options)?;

        let occurred_at = self.clock.now();
        let mut envelopes = Vec::with_capacity(events.len());
        for event in &events {
            let envelope = EventEnvelope::new(Uuid::new_v4(), campaign_id, event, occurred_at)
                .map_err(|e| CommandError::Encode(e.to_string()))?;
            self.apply.apply(&envelope).await?;
            envelopes.push(envelope);
        }

        info!(
            campaign_id = %campaign_id,
            command_type = command.command_type(),
            events = envelopes.len(),
            "Command executed"
        );
        Ok(envelopes)
    }

    /// Read every projection the command depends on. Adversaries and
    /// countdowns that do not exist are left out; the decider reports them.
    async fn load_state(
        &self,
        campaign_id: &CampaignId,
        command: &DaggerheartCommand,
    ) -> Result<DecisionState, CommandError> {
        let deps = command.dependencies()?;
        let mut state = DecisionState::new(campaign_id.clone());
        state.snapshot = self.projections.snapshot(campaign_id).await?;

        for id in deps.characters {
            let character = self.projections.character(campaign_id, &id).await?;
            state.characters.insert(id, character);
        }
        for id in deps.adversaries {
            if let Some(adversary) = self.projections.adversary(campaign_id, &id).await? {
                state.adversaries.insert(id, adversary);
            }
        }
        for id in deps.countdowns {
            if let Some(countdown) = self.projections.countdown(campaign_id, &id).await? {
                state.countdowns.insert(id, countdown);
            }
        }
        Ok(state)
    }
}
