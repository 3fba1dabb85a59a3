//! Campaign-wide GM state.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::game_systems::daggerheart::{ensure_range, CampaignResources, GM_FEAR_CAP};
use crate::ids::CampaignId;

/// One per campaign. Created lazily with zero values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotState {
    pub campaign_id: CampaignId,
    pub gm_fear: i32,
    pub consecutive_short_rests: i32,
}

impl SnapshotState {
    pub fn new(campaign_id: CampaignId) -> Self {
        Self {
            campaign_id,
            gm_fear: 0,
            consecutive_short_rests: 0,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        ensure_range("gm_fear", self.gm_fear, 0, GM_FEAR_CAP)?;
        if self.consecutive_short_rests < 0 {
            return Err(DomainError::validation(
                "consecutive short rests must be non-negative",
            ));
        }
        Ok(())
    }

    pub fn resources(&self) -> CampaignResources {
        CampaignResources::new(self.gm_fear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let snap = SnapshotState::new(CampaignId::new("c").unwrap());
        assert_eq!(snap.gm_fear, 0);
        assert!(snap.validate().is_ok());
    }

    #[test]
    fn fear_over_cap_fails() {
        let mut snap = SnapshotState::new(CampaignId::new("c").unwrap());
        snap.gm_fear = 13;
        assert!(snap.validate().is_err());
        snap.gm_fear = 5;
        snap.consecutive_short_rests = -1;
        assert!(snap.validate().is_err());
    }
}
