//! Projection access shared by the use cases.
//!
//! Wraps the storage port with the configured per-call timeout and fills in
//! zero-value defaults for characters and the campaign snapshot.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use daggerheart_domain::aggregates::{
    AdversaryState, CharacterState, CountdownState, SnapshotState,
};
use daggerheart_domain::{AdversaryId, CampaignId, CharacterId, CountdownId};

use crate::infrastructure::ports::{ProjectionStore, RepoError};

pub struct Projections {
    store: Arc<dyn ProjectionStore>,
    timeout: Option<Duration>,
}

impl Projections {
    pub fn new(store: Arc<dyn ProjectionStore>, timeout: Option<Duration>) -> Self {
        Self { store, timeout }
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, RepoError>>,
    ) -> Result<T, RepoError> {
        let Some(limit) = self.timeout else {
            return fut.await;
        };
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                let after_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(operation, after_ms, "Storage call timed out");
                Err(RepoError::Timeout {
                    operation,
                    after_ms,
                })
            }
        }
    }

    // =========================================================================
    // Characters
    // =========================================================================

    /// Stored state, or a zero-valued character when no row exists yet.
    pub async fn character(
        &self,
        campaign_id: &CampaignId,
        character_id: &CharacterId,
    ) -> Result<CharacterState, RepoError> {
        let stored = self
            .call(
                "get_character_state",
                self.store.get_character_state(campaign_id, character_id),
            )
            .await?;
        Ok(stored
            .unwrap_or_else(|| CharacterState::new(campaign_id.clone(), character_id.clone())))
    }

    pub async fn put_character(&self, state: &CharacterState) -> Result<(), RepoError> {
        self.call("put_character_state", self.store.put_character_state(state))
            .await
    }

    // =========================================================================
    // Adversaries
    // =========================================================================

    pub async fn adversary(
        &self,
        campaign_id: &CampaignId,
        adversary_id: &AdversaryId,
    ) -> Result<Option<AdversaryState>, RepoError> {
        self.call(
            "get_adversary",
            self.store.get_adversary(campaign_id, adversary_id),
        )
        .await
    }

    pub async fn put_adversary(&self, state: &AdversaryState) -> Result<(), RepoError> {
        self.call("put_adversary", self.store.put_adversary(state))
            .await
    }

    pub async fn delete_adversary(
        &self,
        campaign_id: &CampaignId,
        adversary_id: &AdversaryId,
    ) -> Result<(), RepoError> {
        self.call(
            "delete_adversary",
            self.store.delete_adversary(campaign_id, adversary_id),
        )
        .await
    }

    // =========================================================================
    // Countdowns
    // =========================================================================

    pub async fn countdown(
        &self,
        campaign_id: &CampaignId,
        countdown_id: &CountdownId,
    ) -> Result<Option<CountdownState>, RepoError> {
        self.call(
            "get_countdown",
            self.store.get_countdown(campaign_id, countdown_id),
        )
        .await
    }

    pub async fn put_countdown(&self, state: &CountdownState) -> Result<(), RepoError> {
        self.call("put_countdown", self.store.put_countdown(state))
            .await
    }

    pub async fn delete_countdown(
        &self,
        campaign_id: &CampaignId,
        countdown_id: &CountdownId,
    ) -> Result<(), RepoError> {
        self.call(
            "delete_countdown",
            self.store.delete_countdown(campaign_id, countdown_id),
        )
        .await
    }

    // =========================================================================
    // Campaign snapshot
    // =========================================================================

    /// Stored snapshot, or defaults when the campaign has none yet.
    pub async fn snapshot(&self, campaign_id: &CampaignId) -> Result<SnapshotState, RepoError> {
        let stored = self
            .call("get_snapshot", self.store.get_snapshot(campaign_id))
            .await?;
        Ok(stored.unwrap_or_else(|| SnapshotState::new(campaign_id.clone())))
    }

    pub async fn put_snapshot(&self, state: &SnapshotState) -> Result<(), RepoError> {
        self.call("put_snapshot", self.store.put_snapshot(state))
            .await
    }
}
