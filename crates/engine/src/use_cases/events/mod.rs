//! Event application use case.
//!
//! Folds Daggerheart events onto the stored projections:
//! - Checks the envelope belongs to this game system
//! - Skips legacy types and applies the unknown-type policy
//! - Decodes and validates the payload before anything is loaded
//! - Merges only the fields an event sets, re-validates the whole row, and
//!   writes it once (rest events also write every listed character)

mod adversary;
mod campaign;
mod character;
mod countdown;
mod error;

pub use error::ApplyError;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use daggerheart_domain::events::{
    classify_event_type, DaggerheartEvent, DaggerheartEventType, EventEnvelope, EventHandling,
    EventTypeClass,
};
use daggerheart_domain::{CampaignId, DaggerheartSystem, GameSystem};

use super::projections::Projections;
use crate::infrastructure::config::UnknownEventPolicy;

/// What happened to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A projection was written.
    Applied(DaggerheartEventType),
    /// Audit-only event, validated and nothing written.
    Recorded(DaggerheartEventType),
    /// Legacy or tolerated unknown type.
    Skipped,
}

/// Shared inputs for the per-event handlers.
pub(crate) struct ApplyContext<'a> {
    pub projections: &'a Projections,
    pub campaign_id: &'a CampaignId,
    pub occurred_at: DateTime<Utc>,
}

/// Overwrite `target` when the event carries a value.
pub(crate) fn merge<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

pub struct ApplyEvent {
    projections: Arc<Projections>,
    system: DaggerheartSystem,
    unknown_event_policy: UnknownEventPolicy,
}

impl ApplyEvent {
    pub fn new(projections: Arc<Projections>, unknown_event_policy: UnknownEventPolicy) -> Self {
        Self {
            projections,
            system: DaggerheartSystem::new(),
            unknown_event_policy,
        }
    }

    /// Parse one serialized envelope and apply it.
    pub async fn apply_json(&self, raw: &str) -> Result<ApplyOutcome, ApplyError> {
        let envelope: EventEnvelope = serde_json::from_str(raw).map_err(ApplyError::from_json)?;
        self.apply(&envelope).await
    }

    pub async fn apply(&self, envelope: &EventEnvelope) -> Result<ApplyOutcome, ApplyError> {
        if !self
            .system
            .handles(&envelope.system_id, &envelope.system_version)
        {
            return Err(ApplyError::SystemMismatch {
                system_id: envelope.system_id.clone(),
                system_version: envelope.system_version.clone(),
            });
        }

        let event_type = match classify_event_type(&envelope.event_type) {
            EventTypeClass::Known(event_type) => event_type,
            EventTypeClass::Legacy => {
                warn!(
                    event_id = %envelope.event_id,
                    event_type = %envelope.event_type,
                    "Skipping legacy event type"
                );
                return Ok(ApplyOutcome::Skipped);
            }
            EventTypeClass::Unknown => match self.unknown_event_policy {
                UnknownEventPolicy::Ignore => {
                    warn!(
                        event_id = %envelope.event_id,
                        event_type = %envelope.event_type,
                        "Ignoring unknown event type"
                    );
                    return Ok(ApplyOutcome::Skipped);
                }
                UnknownEventPolicy::Reject => {
                    return Err(ApplyError::UnknownEventType(envelope.event_type.clone()));
                }
            },
        };

        let campaign_id = CampaignId::new(&envelope.campaign_id)?;
        let event = DaggerheartEvent::decode(event_type, envelope.payload.clone())
            .map_err(ApplyError::from_json)?;
        self.apply_event(&campaign_id, &event, envelope.occurred_at)
            .await
    }

    /// Apply an already decoded event.
    pub async fn apply_event(
        &self,
        campaign_id: &CampaignId,
        event: &DaggerheartEvent,
        occurred_at: DateTime<Utc>,
    ) -> Result<ApplyOutcome, ApplyError> {
        event.validate()?;
        let ctx = ApplyContext {
            projections: &self.projections,
            campaign_id,
            occurred_at,
        };

        match event {
            DaggerheartEvent::CharacterStatePatched(p) => character::state_patched(&ctx, p).await?,
            DaggerheartEvent::DamageApplied(p) => character::damage_applied(&ctx, p).await?,
            DaggerheartEvent::ConditionChanged(p) => character::condition_changed(&ctx, p).await?,
            DaggerheartEvent::TemporaryArmorApplied(p) => {
                character::temporary_armor_applied(&ctx, p).await?
            }
            DaggerheartEvent::DowntimeMoveApplied(p) => {
                character::downtime_move_applied(&ctx, p).await?
            }
            DaggerheartEvent::LoadoutSwapped(p) => character::loadout_swapped(&ctx, p).await?,
            DaggerheartEvent::DeathMoveResolved(p) => {
                character::death_move_resolved(&ctx, p).await?
            }
            DaggerheartEvent::GmFearChanged(p) => campaign::gm_fear_changed(&ctx, p).await?,
            DaggerheartEvent::RestTaken(p) => campaign::rest_taken(&ctx, p).await?,
            DaggerheartEvent::AdversaryCreated(p) => adversary::created(&ctx, p).await?,
            DaggerheartEvent::AdversaryUpdated(p) => adversary::updated(&ctx, p).await?,
            DaggerheartEvent::AdversaryDamageApplied(p) => {
                adversary::damage_applied(&ctx, p).await?
            }
            DaggerheartEvent::AdversaryConditionChanged(p) => {
                adversary::condition_changed(&ctx, p).await?
            }
            DaggerheartEvent::AdversaryDeleted(p) => adversary::deleted(&ctx, p).await?,
            DaggerheartEvent::CountdownCreated(p) => countdown::created(&ctx, p).await?,
            DaggerheartEvent::CountdownUpdated(p) => countdown::updated(&ctx, p).await?,
            DaggerheartEvent::CountdownDeleted(p) => countdown::deleted(&ctx, p).await?,
            DaggerheartEvent::AttackResolved(_) | DaggerheartEvent::AdversaryAttackResolved(_) => {}
        }

        let event_type = event.event_type();
        Ok(match event_type.handling() {
            EventHandling::Projection => ApplyOutcome::Applied(event_type),
            EventHandling::AuditOnly => {
                debug!(campaign_id = %campaign_id, event_type = %event_type, "Recorded audit event");
                ApplyOutcome::Recorded(event_type)
            }
        })
    }
}
