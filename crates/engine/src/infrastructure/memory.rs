//! In-memory projection store.
//!
//! Backs the replay binary and behaviour tests. Rows are cloned in and out
//! so callers never hold a lock across rule evaluation.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use daggerheart_domain::aggregates::{
    AdversaryState, CharacterState, CountdownState, SnapshotState,
};
use daggerheart_domain::{AdversaryId, CampaignId, CharacterId, CountdownId};

use crate::infrastructure::ports::{ProjectionStore, RepoError};

/// Thread-safe map-backed [`ProjectionStore`].
#[derive(Default)]
pub struct InMemoryProjectionStore {
    characters: RwLock<HashMap<(CampaignId, CharacterId), CharacterState>>,
    adversaries: RwLock<HashMap<(CampaignId, AdversaryId), AdversaryState>>,
    countdowns: RwLock<HashMap<(CampaignId, CountdownId), CountdownState>>,
    snapshots: RwLock<HashMap<CampaignId, SnapshotState>>,
}

impl InMemoryProjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every campaign with at least one stored row, sorted.
    pub async fn campaign_ids(&self) -> Vec<CampaignId> {
        let mut ids = BTreeSet::new();
        ids.extend(self.snapshots.read().await.keys().cloned());
        ids.extend(self.characters.read().await.keys().map(|(c, _)| c.clone()));
        ids.extend(self.adversaries.read().await.keys().map(|(c, _)| c.clone()));
        ids.extend(self.countdowns.read().await.keys().map(|(c, _)| c.clone()));
        ids.into_iter().collect()
    }

    /// Characters stored for a campaign, sorted by id.
    pub async fn characters_in(&self, campaign_id: &CampaignId) -> Vec<CharacterState> {
        rows_in(&*self.characters.read().await, campaign_id)
    }

    /// Adversaries stored for a campaign, sorted by id.
    pub async fn adversaries_in(&self, campaign_id: &CampaignId) -> Vec<AdversaryState> {
        rows_in(&*self.adversaries.read().await, campaign_id)
    }

    /// Countdowns stored for a campaign, sorted by id.
    pub async fn countdowns_in(&self, campaign_id: &CampaignId) -> Vec<CountdownState> {
        rows_in(&*self.countdowns.read().await, campaign_id)
    }
}

fn rows_in<K: Ord + Clone, V: Clone>(
    rows: &HashMap<(CampaignId, K), V>,
    campaign_id: &CampaignId,
) -> Vec<V> {
    let mut matching: Vec<(&K, &V)> = rows
        .iter()
        .filter(|((campaign, _), _)| campaign == campaign_id)
        .map(|((_, id), row)| (id, row))
        .collect();
    matching.sort_by(|a, b| a.0.cmp(b.0));
    matching.into_iter().map(|(_, row)| row.clone()).collect()
}

#[async_trait]
impl ProjectionStore for InMemoryProjectionStore {
    async fn get_character_state(
        &self,
        campaign_id: &CampaignId,
        character_id: &CharacterId,
    ) -> Result<Option<CharacterState>, RepoError> {
        let key = (campaign_id.clone(), character_id.clone());
        Ok(self.characters.read().await.get(&key).cloned())
    }

    async fn put_character_state(&self, state: &CharacterState) -> Result<(), RepoError> {
        let key = (state.campaign_id.clone(), state.character_id.clone());
        self.characters.write().await.insert(key, state.clone());
        Ok(())
    }

    async fn get_adversary(
        &self,
        campaign_id: &CampaignId,
        adversary_id: &AdversaryId,
    ) -> Result<Option<AdversaryState>, RepoError> {
        let key = (campaign_id.clone(), adversary_id.clone());
        Ok(self.adversaries.read().await.get(&key).cloned())
    }

    async fn put_adversary(&self, state: &AdversaryState) -> Result<(), RepoError> {
        let key = (state.campaign_id.clone(), state.adversary_id.clone());
        self.adversaries.write().await.insert(key, state.clone());
        Ok(())
    }

    async fn delete_adversary(
        &self,
        campaign_id: &CampaignId,
        adversary_id: &AdversaryId,
    ) -> Result<(), RepoError> {
        let key = (campaign_id.clone(), adversary_id.clone());
        self.adversaries
            .write()
            .await
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("Adversary", adversary_id))
    }

    async fn get_countdown(
        &self,
        campaign_id: &CampaignId,
        countdown_id: &CountdownId,
    ) -> Result<Option<CountdownState>, RepoError> {
        let key = (campaign_id.clone(), countdown_id.clone());
        Ok(self.countdowns.read().await.get(&key).cloned())
    }

    async fn put_countdown(&self, state: &CountdownState) -> Result<(), RepoError> {
        let key = (state.campaign_id.clone(), state.countdown_id.clone());
        self.countdowns.write().await.insert(key, state.clone());
        Ok(())
    }

    async fn delete_countdown(
        &self,
        campaign_id: &CampaignId,
        countdown_id: &CountdownId,
    ) -> Result<(), RepoError> {
        let key = (campaign_id.clone(), countdown_id.clone());
        self.countdowns
            .write()
            .await
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("Countdown", countdown_id))
    }

    async fn get_snapshot(
        &self,
        campaign_id: &CampaignId,
    ) -> Result<Option<SnapshotState>, RepoError> {
        Ok(self.snapshots.read().await.get(campaign_id).cloned())
    }

    async fn put_snapshot(&self, state: &SnapshotState) -> Result<(), RepoError> {
        self.snapshots
            .write()
            .await
            .insert(state.campaign_id.clone(), state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign() -> CampaignId {
        CampaignId::new("camp").unwrap()
    }

    #[tokio::test]
    async fn missing_rows_read_as_none() {
        let store = InMemoryProjectionStore::new();
        let pc = CharacterId::new("pc").unwrap();
        assert!(store
            .get_character_state(&campaign(), &pc)
            .await
            .unwrap()
            .is_none());
        assert!(store.get_snapshot(&campaign()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rows_are_scoped_by_campaign() {
        let store = InMemoryProjectionStore::new();
        let pc = CharacterId::new("pc").unwrap();
        let mut state = CharacterState::new(campaign(), pc.clone());
        state.hp = 5;
        store.put_character_state(&state).await.unwrap();

        let other = CampaignId::new("other").unwrap();
        assert!(store.get_character_state(&other, &pc).await.unwrap().is_none());
        assert_eq!(
            store
                .get_character_state(&campaign(), &pc)
                .await
                .unwrap()
                .map(|s| s.hp),
            Some(5)
        );
        assert_eq!(store.characters_in(&campaign()).await.len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_missing_countdown_is_not_found() {
        let store = InMemoryProjectionStore::new();
        let id = CountdownId::new("clock").unwrap();
        let err = store.delete_countdown(&campaign(), &id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn campaign_ids_cover_every_table() {
        let store = InMemoryProjectionStore::new();
        let b = CampaignId::new("b").unwrap();
        store
            .put_character_state(&CharacterState::new(b.clone(), CharacterId::new("pc").unwrap()))
            .await
            .unwrap();
        store
            .put_snapshot(&SnapshotState::new(CampaignId::new("a").unwrap()))
            .await
            .unwrap();

        let ids: Vec<String> = store
            .campaign_ids()
            .await
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(store.adversaries_in(&b).await.is_empty());
    }
}
