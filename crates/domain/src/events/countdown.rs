//! Countdown event payloads.

use serde::{Deserialize, Serialize};

use super::checks::require_id;
use crate::aggregates::{validate_countdown, CountdownState};
use crate::error::DomainError;
use crate::game_systems::daggerheart::{CountdownDirection, CountdownKind, CountdownSpec};
use crate::ids::{CampaignId, CountdownId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownCreatedPayload {
    pub countdown_id: String,
    pub name: String,
    #[serde(default)]
    pub kind: CountdownKind,
    #[serde(default)]
    pub current: i32,
    pub max: i32,
    #[serde(default)]
    pub direction: CountdownDirection,
    #[serde(default)]
    pub looping: bool,
}

impl CountdownCreatedPayload {
    pub fn to_state(&self, campaign_id: CampaignId) -> Result<CountdownState, DomainError> {
        self.validate()?;
        Ok(CountdownState {
            campaign_id,
            countdown_id: CountdownId::new(&self.countdown_id)?,
            name: self.name.trim().to_string(),
            kind: self.kind,
            current: self.current,
            max: self.max,
            direction: self.direction,
            looping: self.looping,
        })
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("countdown_id", &self.countdown_id)?;
        CountdownId::new(&self.countdown_id)?;
        validate_countdown(&self.name, &self.spec())
    }

    fn spec(&self) -> CountdownSpec {
        CountdownSpec {
            current: self.current,
            max: self.max,
            direction: self.direction,
            looping: self.looping,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownUpdatedPayload {
    pub countdown_id: String,
    /// Value the producer saw. Must match the stored value when applied.
    pub before: i32,
    pub after: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub looped: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CountdownUpdatedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("countdown_id", &self.countdown_id)?;
        if self.before < 0 || self.after < 0 {
            return Err(DomainError::validation("countdown values must be non-negative"));
        }
        if let Some(delta) = self.delta {
            if delta != (self.after - self.before).abs() {
                return Err(DomainError::validation(format!(
                    "delta {delta} does not match {} -> {}",
                    self.before, self.after
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownDeletedPayload {
    pub countdown_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CountdownDeletedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("countdown_id", &self.countdown_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn created_defaults_fill_in() {
        let payload: CountdownCreatedPayload = serde_json::from_value(json!({
            "countdown_id": "doom",
            "name": "Doom",
            "max": 6
        }))
        .unwrap();
        let state = payload.to_state(CampaignId::new("c").unwrap()).unwrap();
        assert_eq!(state.current, 0);
        assert_eq!(state.kind, CountdownKind::Progress);
        assert_eq!(state.direction, CountdownDirection::Increase);
    }

    #[test]
    fn created_with_zero_max_fails() {
        let payload = CountdownCreatedPayload {
            countdown_id: "doom".into(),
            name: "Doom".into(),
            kind: CountdownKind::Consequence,
            current: 0,
            max: 0,
            direction: CountdownDirection::Increase,
            looping: false,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn created_validation_matches_stored_checks() {
        let payload = CountdownCreatedPayload {
            countdown_id: "doom".into(),
            name: " ".into(),
            kind: CountdownKind::Consequence,
            current: 0,
            max: 4,
            direction: CountdownDirection::Increase,
            looping: false,
        };
        assert_eq!(
            payload.validate().unwrap_err(),
            DomainError::validation("countdown name is required")
        );
        assert_eq!(
            payload.to_state(CampaignId::new("c").unwrap()).unwrap_err(),
            payload.validate().unwrap_err()
        );
    }

    #[test]
    fn update_delta_must_match_values() {
        let payload = CountdownUpdatedPayload {
            countdown_id: "doom".into(),
            before: 1,
            after: 4,
            delta: Some(2),
            looped: None,
            reason: None,
        };
        assert!(payload.validate().is_err());
    }
}
