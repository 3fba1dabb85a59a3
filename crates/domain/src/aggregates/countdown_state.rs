//! Countdown projection.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::game_systems::daggerheart::{CountdownDirection, CountdownKind, CountdownSpec};
use crate::ids::{CampaignId, CountdownId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub campaign_id: CampaignId,
    pub countdown_id: CountdownId,
    pub name: String,
    pub kind: CountdownKind,
    pub current: i32,
    pub max: i32,
    pub direction: CountdownDirection,
    #[serde(default)]
    pub looping: bool,
}

impl CountdownState {
    pub fn spec(&self) -> CountdownSpec {
        CountdownSpec {
            current: self.current,
            max: self.max,
            direction: self.direction,
            looping: self.looping,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_countdown(&self.name, &self.spec())
    }

    /// The countdown has run to the end of its direction.
    pub fn is_complete(&self) -> bool {
        match self.direction {
            CountdownDirection::Increase => self.current == self.max,
            CountdownDirection::Decrease => self.current == 0,
        }
    }
}

/// Checks shared by stored countdowns and creation payloads.
pub fn validate_countdown(name: &str, spec: &CountdownSpec) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("countdown name is required"));
    }
    spec.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(current: i32, max: i32) -> CountdownState {
        CountdownState {
            campaign_id: CampaignId::new("camp").unwrap(),
            countdown_id: CountdownId::new("doom").unwrap(),
            name: "Doom".into(),
            kind: CountdownKind::Consequence,
            current,
            max,
            direction: CountdownDirection::Increase,
            looping: false,
        }
    }

    #[test]
    fn validates_bounds() {
        assert!(clock(2, 4).validate().is_ok());
        assert!(clock(5, 4).validate().is_err());
        assert!(clock(0, 0).validate().is_err());
    }

    #[test]
    fn completion_follows_direction() {
        assert!(clock(4, 4).is_complete());
        let mut down = clock(0, 4);
        down.direction = CountdownDirection::Decrease;
        assert!(down.is_complete());
    }
}
