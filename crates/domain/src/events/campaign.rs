//! Campaign-wide event payloads: GM Fear and rests.

use serde::{Deserialize, Serialize};

use super::checks::{check_opt, check_range, require_id};
use crate::error::DomainError;
use crate::game_systems::daggerheart::{
    RestType, ARMOR_CAP, GM_FEAR_CAP, HOPE_CAP, HP_CAP, SHORT_REST_CAP, STRESS_CAP,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmFearChangedPayload {
    pub before: i32,
    pub after: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl GmFearChangedPayload {
    pub fn validate(&self) -> Result<(), DomainError> {
        check_range("before", self.before, 0, GM_FEAR_CAP)?;
        check_range("after", self.after, 0, GM_FEAR_CAP)?;
        if self.before == self.after {
            return Err(DomainError::no_op("gm fear unchanged"));
        }
        Ok(())
    }
}

/// Per-character results of a rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestCharacterPatch {
    pub character_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hope_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_after: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor_after: Option<i32>,
}

impl RestCharacterPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_id("character_id", &self.character_id)?;
        check_opt("hp_after", self.hp_after, 0, HP_CAP)?;
        check_opt("hope_after", self.hope_after, 0, HOPE_CAP)?;
        check_opt("stress_after", self.stress_after, 0, STRESS_CAP)?;
        check_opt("armor_after", self.armor_after, 0, ARMOR_CAP)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestTakenPayload {
    pub rest_type: RestType,
    #[serde(default)]
    pub interrupted: bool,
    pub gm_fear_before: i32,
    pub gm_fear_after: i32,
    pub short_rests_before: i32,
    pub short_rests_after: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_rest: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_long_rest: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_term_countdown_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub character_states: Vec<RestCharacterPatch>,
}

impl RestTakenPayload {
    /// Rest type after interruption.
    pub fn effective_rest_type(&self) -> RestType {
        if self.interrupted {
            RestType::Short
        } else {
            self.rest_type
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_range("gm_fear_before", self.gm_fear_before, 0, GM_FEAR_CAP)?;
        check_range("gm_fear_after", self.gm_fear_after, 0, GM_FEAR_CAP)?;
        if self.gm_fear_after < self.gm_fear_before {
            return Err(DomainError::validation("a rest cannot lower gm fear"));
        }
        if self.short_rests_before < 0 {
            return Err(DomainError::validation(
                "short_rests_before must be non-negative",
            ));
        }

        let expected_after = match self.effective_rest_type() {
            RestType::Short => {
                if self.short_rests_before >= SHORT_REST_CAP {
                    return Err(DomainError::ShortRestLimitReached {
                        cap: SHORT_REST_CAP,
                    });
                }
                self.short_rests_before + 1
            }
            RestType::Long => 0,
        };
        if self.short_rests_after != expected_after {
            return Err(DomainError::validation(format!(
                "short_rests_after must be {expected_after}, got {}",
                self.short_rests_after
            )));
        }
        if self.refresh_long_rest == Some(true) && self.effective_rest_type() == RestType::Short {
            return Err(DomainError::validation(
                "a short rest cannot refresh long-rest effects",
            ));
        }
        if let Some(id) = &self.long_term_countdown_id {
            require_id("long_term_countdown_id", id)?;
        }

        let mut seen = std::collections::HashSet::new();
        for patch in &self.character_states {
            patch.validate()?;
            if !seen.insert(patch.character_id.trim()) {
                return Err(DomainError::validation(format!(
                    "character {} listed twice",
                    patch.character_id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rest(rest_type: RestType, interrupted: bool, before: i32, after: i32) -> RestTakenPayload {
        RestTakenPayload {
            rest_type,
            interrupted,
            gm_fear_before: 1,
            gm_fear_after: 3,
            short_rests_before: before,
            short_rests_after: after,
            refresh_rest: Some(true),
            refresh_long_rest: None,
            long_term_countdown_id: None,
            character_states: vec![],
        }
    }

    #[test]
    fn short_rest_counter_must_increment() {
        assert!(rest(RestType::Short, false, 1, 2).validate().is_ok());
        assert!(rest(RestType::Short, false, 1, 0).validate().is_err());
    }

    #[test]
    fn interrupted_long_rest_counts_as_short() {
        assert!(rest(RestType::Long, true, 0, 1).validate().is_ok());
        assert!(rest(RestType::Long, true, 0, 0).validate().is_err());
    }

    #[test]
    fn short_rest_at_cap_is_rejected() {
        assert!(matches!(
            rest(RestType::Short, false, 3, 4).validate(),
            Err(DomainError::ShortRestLimitReached { cap: 3 })
        ));
    }

    #[test]
    fn duplicate_characters_are_rejected() {
        let mut payload = rest(RestType::Long, false, 2, 0);
        payload.character_states = vec![
            RestCharacterPatch {
                character_id: "pc".into(),
                ..Default::default()
            },
            RestCharacterPatch {
                character_id: "pc".into(),
                ..Default::default()
            },
        ];
        assert!(payload.validate().is_err());
    }

    #[test]
    fn fear_change_must_change() {
        let payload = GmFearChangedPayload {
            before: 2,
            after: 2,
            reason: None,
        };
        assert!(matches!(payload.validate(), Err(DomainError::NoOpUpdate(_))));
        let payload = GmFearChangedPayload {
            before: 2,
            after: 13,
            reason: None,
        };
        assert!(payload.validate().is_err());
    }
}
