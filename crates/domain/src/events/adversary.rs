//! Adversary event payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::checks::{require_id, ConditionPatch};
use super::character::validate_damage_fields;
use crate::aggregates::{AdversaryState, AdversaryStats};
use crate::error::DomainError;
use crate::game_systems::daggerheart::{normalize_conditions, Condition, DamageSeverity};
use crate::ids::{AdversaryId, CampaignId, SessionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversaryCreatedPayload {
    pub adversary_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub hp: i32,
    pub hp_max: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress: Option<i32>,
    pub stress_max: i32,
    pub evasion: i32,
    pub major_threshold: i32,
    pub severe_threshold: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<String>>,
}

impl AdversaryCreatedPayload {
    /// Build the new record. The result is fully validated.
    pub fn to_state(
        &self,
        campaign_id: CampaignId,
        created_at: DateTime<Utc>,
    ) -> Result<AdversaryState, DomainError> {
        self.validate()?;
        let stats = self.stats();
        Ok(AdversaryState {
            campaign_id,
            adversary_id: AdversaryId::new(&self.adversary_id)?,
            name: self.name.trim().to_string(),
            kind: self.kind.clone().unwrap_or_default(),
            session_id: self.session_id()?,
            notes: self.notes.clone().unwrap_or_default(),
            hp: stats.hp,
            hp_max: stats.hp_max,
            stress: stats.stress,
            stress_max: stats.stress_max,
            evasion: stats.evasion,
            major_threshold: stats.major_threshold,
            severe_threshold: stats.severe_threshold,
            armor: stats.armor,
            conditions: self.conditions()?,
            created_at,
            updated_at: created_at,
        })
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("adversary_id", &self.adversary_id)?;
        AdversaryId::new(&self.adversary_id)?;
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("adversary name is required"));
        }
        self.session_id()?;
        self.stats().validate()?;
        self.conditions().map(|_| ())
    }

    fn stats(&self) -> AdversaryStats {
        AdversaryStats {
            hp: self.hp,
            hp_max: self.hp_max,
            stress: self.stress.unwrap_or(0),
            stress_max: self.stress_max,
            evasion: self.evasion,
            major_threshold: self.major_threshold,
            severe_threshold: self.severe_threshold,
            armor: self.armor.unwrap_or(0),
        }
    }

    fn session_id(&self) -> Result<Option<SessionId>, DomainError> {
        self.session_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(SessionId::new)
            .transpose()
    }

    fn conditions(&self) -> Result<Vec<Condition>, DomainError> {
        normalize_conditions(self.conditions.as_deref().unwrap_or_default())
    }
}

/// Partial update. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversaryUpdatedPayload {
    pub adversary_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_max: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_max: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evasion: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_threshold: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severe_threshold: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor: Option<i32>,
}

impl AdversaryUpdatedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("adversary_id", &self.adversary_id)?;
        if let Some(name) = &self.name {
            require_id("name", name)?;
        }
        let sets_anything = self.name.is_some()
            || self.kind.is_some()
            || self.session_id.is_some()
            || self.notes.is_some()
            || self.hp.is_some()
            || self.hp_max.is_some()
            || self.stress.is_some()
            || self.stress_max.is_some()
            || self.evasion.is_some()
            || self.major_threshold.is_some()
            || self.severe_threshold.is_some()
            || self.armor.is_some();
        if !sets_anything {
            return Err(DomainError::no_op("adversary update sets no fields"));
        }
        Ok(())
    }

    /// Merge the present fields onto `state`. The caller re-validates.
    pub fn merge_into(&self, state: &mut AdversaryState) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            state.name = name.trim().to_string();
        }
        if let Some(kind) = &self.kind {
            state.kind = kind.clone();
        }
        if let Some(session_id) = &self.session_id {
            state.session_id = if session_id.trim().is_empty() {
                None
            } else {
                Some(SessionId::new(session_id)?)
            };
        }
        if let Some(notes) = &self.notes {
            state.notes = notes.clone();
        }
        macro_rules! merge {
            ($($field:ident),*) => {
                $(if let Some(v) = self.$field { state.$field = v; })*
            };
        }
        merge!(hp, hp_max, stress, stress_max, evasion, major_threshold, severe_threshold, armor);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversaryDamageAppliedPayload {
    pub adversary_id: String,
    pub damage: i32,
    pub severity: DamageSeverity,
    pub marks: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_seq: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_before: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_spent: Option<i32>,
}

impl AdversaryDamageAppliedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("adversary_id", &self.adversary_id)?;
        validate_damage_fields(
            self.damage,
            self.severity,
            self.marks,
            self.roll_seq,
            (self.hp_before, self.hp_after),
            (self.armor_before, self.armor_after),
            self.armor_spent,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversaryConditionChangedPayload {
    pub adversary_id: String,
    #[serde(flatten)]
    pub conditions: ConditionPatch,
}

impl AdversaryConditionChangedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("adversary_id", &self.adversary_id)?;
        self.conditions.normalize().map(|_| ())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversaryDeletedPayload {
    pub adversary_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AdversaryDeletedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("adversary_id", &self.adversary_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created() -> AdversaryCreatedPayload {
        AdversaryCreatedPayload {
            adversary_id: "gob".into(),
            name: " Goblin ".into(),
            kind: Some("minion".into()),
            session_id: None,
            notes: None,
            hp: 3,
            hp_max: 3,
            stress: None,
            stress_max: 1,
            evasion: 9,
            major_threshold: 3,
            severe_threshold: 6,
            armor: None,
            conditions: Some(vec!["Hidden".into()]),
        }
    }

    #[test]
    fn created_payload_checks_fields_without_a_campaign() {
        assert!(created().validate().is_ok());

        let mut blank = created();
        blank.name = "  ".into();
        assert_eq!(
            blank.validate().unwrap_err(),
            DomainError::validation("adversary name is required")
        );

        let mut hurt = created();
        hurt.hp = 4;
        assert!(hurt.validate().is_err());

        let mut unknown = created();
        unknown.conditions = Some(vec!["cursed".into()]);
        assert!(unknown.validate().is_err());
    }

    #[test]
    fn created_payload_builds_normalized_state() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let state = created()
            .to_state(CampaignId::new("camp").unwrap(), at)
            .unwrap();
        assert_eq!(state.name, "Goblin");
        assert_eq!(state.conditions.len(), 1);
        assert_eq!(state.created_at, at);
    }

    #[test]
    fn created_payload_with_bad_thresholds_fails() {
        let mut payload = created();
        payload.major_threshold = 7;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn update_merges_only_present_fields() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut state = created()
            .to_state(CampaignId::new("camp").unwrap(), at)
            .unwrap();
        let update = AdversaryUpdatedPayload {
            adversary_id: "gob".into(),
            hp: Some(1),
            notes: Some("wounded".into()),
            ..Default::default()
        };
        update.validate().unwrap();
        update.merge_into(&mut state).unwrap();
        assert_eq!(state.hp, 1);
        assert_eq!(state.notes, "wounded");
        assert_eq!(state.hp_max, 3);
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let update = AdversaryUpdatedPayload {
            adversary_id: "gob".into(),
            ..Default::default()
        };
        assert!(matches!(update.validate(), Err(DomainError::NoOpUpdate(_))));
    }
}
