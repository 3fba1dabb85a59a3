//! Daggerheart events.
//!
//! The catalog is closed: every event type maps to one variant of
//! [`DaggerheartEvent`] carrying its typed payload. Projection-handled and
//! audit-only types are listed separately in [`PROJECTION_EVENT_TYPES`] and
//! [`AUDIT_ONLY_EVENT_TYPES`]. Types that older producers emitted and that
//! no longer carry state are listed in [`LEGACY_EVENT_TYPES`].
//!
//! Payloads carry raw string ids; `validate()` checks shape and ranges
//! before anything is loaded or written.

mod adversary;
mod audit;
mod campaign;
mod character;
mod checks;
mod countdown;

pub use adversary::{
    AdversaryConditionChangedPayload, AdversaryCreatedPayload, AdversaryDamageAppliedPayload,
    AdversaryDeletedPayload, AdversaryUpdatedPayload,
};
pub use audit::{AdversaryAttackResolvedPayload, AttackResolvedPayload};
pub use campaign::{GmFearChangedPayload, RestCharacterPatch, RestTakenPayload};
pub use character::{
    CharacterStatePatchedPayload, ConditionChangedPayload, DamageAppliedPayload,
    DeathMoveResolvedPayload, DowntimeMoveAppliedPayload, LoadoutSwappedPayload,
    TemporaryArmorAppliedPayload,
};
pub use checks::{ConditionPatch, NormalizedConditions};
pub use countdown::{CountdownCreatedPayload, CountdownDeletedPayload, CountdownUpdatedPayload};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::game_systems::DaggerheartSystem;
use crate::ids::CampaignId;

/// What applying an event does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandling {
    /// Writes a projection.
    Projection,
    /// Validated and recorded only.
    AuditOnly,
}

macro_rules! define_events {
    ($($variant:ident($payload:ty) => $name:literal, $handling:ident;)*) => {
        /// Every Daggerheart event type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum DaggerheartEventType {
            $($variant,)*
        }

        impl DaggerheartEventType {
            pub const ALL: &'static [DaggerheartEventType] = &[$(Self::$variant,)*];

            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }

            pub const fn handling(&self) -> EventHandling {
                match self {
                    $(Self::$variant => EventHandling::$handling,)*
                }
            }
        }

        /// A decoded Daggerheart event.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum DaggerheartEvent {
            $($variant($payload),)*
        }

        impl DaggerheartEvent {
            pub fn event_type(&self) -> DaggerheartEventType {
                match self {
                    $(Self::$variant(_) => DaggerheartEventType::$variant,)*
                }
            }

            /// Decode a payload for a known event type.
            pub fn decode(
                event_type: DaggerheartEventType,
                payload: serde_json::Value,
            ) -> Result<Self, serde_json::Error> {
                Ok(match event_type {
                    $(DaggerheartEventType::$variant => Self::$variant(serde_json::from_value(payload)?),)*
                })
            }

            pub fn to_payload(&self) -> Result<serde_json::Value, serde_json::Error> {
                match self {
                    $(Self::$variant(p) => serde_json::to_value(p),)*
                }
            }

            /// Structural and range checks on the payload.
            pub fn validate(&self) -> Result<(), DomainError> {
                match self {
                    $(Self::$variant(p) => p.validate(),)*
                }
            }
        }
    };
}

define_events! {
    CharacterStatePatched(CharacterStatePatchedPayload) => "character_state_patched", Projection;
    DamageApplied(DamageAppliedPayload) => "damage_applied", Projection;
    ConditionChanged(ConditionChangedPayload) => "condition_changed", Projection;
    TemporaryArmorApplied(TemporaryArmorAppliedPayload) => "temporary_armor_applied", Projection;
    DowntimeMoveApplied(DowntimeMoveAppliedPayload) => "downtime_move_applied", Projection;
    LoadoutSwapped(LoadoutSwappedPayload) => "loadout_swapped", Projection;
    DeathMoveResolved(DeathMoveResolvedPayload) => "death_move_resolved", Projection;
    GmFearChanged(GmFearChangedPayload) => "gm_fear_changed", Projection;
    RestTaken(RestTakenPayload) => "rest_taken", Projection;
    AdversaryCreated(AdversaryCreatedPayload) => "adversary_created", Projection;
    AdversaryUpdated(AdversaryUpdatedPayload) => "adversary_updated", Projection;
    AdversaryDamageApplied(AdversaryDamageAppliedPayload) => "adversary_damage_applied", Projection;
    AdversaryConditionChanged(AdversaryConditionChangedPayload) => "adversary_condition_changed", Projection;
    AdversaryDeleted(AdversaryDeletedPayload) => "adversary_deleted", Projection;
    CountdownCreated(CountdownCreatedPayload) => "countdown_created", Projection;
    CountdownUpdated(CountdownUpdatedPayload) => "countdown_updated", Projection;
    CountdownDeleted(CountdownDeletedPayload) => "countdown_deleted", Projection;
    AttackResolved(AttackResolvedPayload) => "attack_resolved", AuditOnly;
    AdversaryAttackResolved(AdversaryAttackResolvedPayload) => "adversary_attack_resolved", AuditOnly;
}

impl fmt::Display for DaggerheartEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event types that write a projection.
pub const PROJECTION_EVENT_TYPES: &[DaggerheartEventType] = &[
    DaggerheartEventType::CharacterStatePatched,
    DaggerheartEventType::DamageApplied,
    DaggerheartEventType::ConditionChanged,
    DaggerheartEventType::TemporaryArmorApplied,
    DaggerheartEventType::DowntimeMoveApplied,
    DaggerheartEventType::LoadoutSwapped,
    DaggerheartEventType::DeathMoveResolved,
    DaggerheartEventType::GmFearChanged,
    DaggerheartEventType::RestTaken,
    DaggerheartEventType::AdversaryCreated,
    DaggerheartEventType::AdversaryUpdated,
    DaggerheartEventType::AdversaryDamageApplied,
    DaggerheartEventType::AdversaryConditionChanged,
    DaggerheartEventType::AdversaryDeleted,
    DaggerheartEventType::CountdownCreated,
    DaggerheartEventType::CountdownUpdated,
    DaggerheartEventType::CountdownDeleted,
];

/// Event types that are validated but write nothing.
pub const AUDIT_ONLY_EVENT_TYPES: &[DaggerheartEventType] = &[
    DaggerheartEventType::AttackResolved,
    DaggerheartEventType::AdversaryAttackResolved,
];

/// Retired event types. Always skipped.
pub const LEGACY_EVENT_TYPES: &[&str] = &["action_roll_resolved", "outcome_applied"];

/// How an incoming type string is recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTypeClass {
    Known(DaggerheartEventType),
    Legacy,
    Unknown,
}

pub fn classify_event_type(event_type: &str) -> EventTypeClass {
    match DaggerheartEventType::parse(event_type) {
        Some(known) => EventTypeClass::Known(known),
        None if LEGACY_EVENT_TYPES.contains(&event_type) => EventTypeClass::Legacy,
        None => EventTypeClass::Unknown,
    }
}

fn default_system_id() -> String {
    DaggerheartSystem::SYSTEM_ID.to_string()
}

fn default_system_version() -> String {
    DaggerheartSystem::SYSTEM_VERSION.to_string()
}

/// An event as it travels on the campaign event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: Uuid,
    pub campaign_id: String,
    #[serde(default = "default_system_id")]
    pub system_id: String,
    #[serde(default = "default_system_version")]
    pub system_version: String,
    pub event_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

impl EventEnvelope {
    /// Wrap a Daggerheart event for `campaign_id`.
    pub fn new(
        event_id: Uuid,
        campaign_id: &CampaignId,
        event: &DaggerheartEvent,
        occurred_at: DateTime<Utc>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_id,
            campaign_id: campaign_id.to_string(),
            system_id: default_system_id(),
            system_version: default_system_version(),
            event_type: event.event_type().as_str().to_string(),
            payload: event.to_payload()?,
            occurred_at,
        })
    }
}
