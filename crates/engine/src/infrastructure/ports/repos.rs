//! Projection storage port.
//!
//! Keyed by campaign plus entity id (campaign alone for the snapshot). The
//! store persists whole rows and never computes transitions.

use async_trait::async_trait;
use daggerheart_domain::aggregates::{
    AdversaryState, CharacterState, CountdownState, SnapshotState,
};
use daggerheart_domain::{AdversaryId, CampaignId, CharacterId, CountdownId};

use super::error::RepoError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectionStore: Send + Sync {
    // Characters
    async fn get_character_state(
        &self,
        campaign_id: &CampaignId,
        character_id: &CharacterId,
    ) -> Result<Option<CharacterState>, RepoError>;
    async fn put_character_state(&self, state: &CharacterState) -> Result<(), RepoError>;

    // Adversaries
    async fn get_adversary(
        &self,
        campaign_id: &CampaignId,
        adversary_id: &AdversaryId,
    ) -> Result<Option<AdversaryState>, RepoError>;
    async fn put_adversary(&self, state: &AdversaryState) -> Result<(), RepoError>;
    /// Fails with [`RepoError::NotFound`] when no row exists.
    async fn delete_adversary(
        &self,
        campaign_id: &CampaignId,
        adversary_id: &AdversaryId,
    ) -> Result<(), RepoError>;

    // Countdowns
    async fn get_countdown(
        &self,
        campaign_id: &CampaignId,
        countdown_id: &CountdownId,
    ) -> Result<Option<CountdownState>, RepoError>;
    async fn put_countdown(&self, state: &CountdownState) -> Result<(), RepoError>;
    /// Fails with [`RepoError::NotFound`] when no row exists.
    async fn delete_countdown(
        &self,
        campaign_id: &CampaignId,
        countdown_id: &CountdownId,
    ) -> Result<(), RepoError>;

    // Campaign snapshot
    async fn get_snapshot(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Option<SnapshotState>, RepoError>;
    async fn put_snapshot(&self, state: &SnapshotState) -> Result<(), RepoError>;
}
