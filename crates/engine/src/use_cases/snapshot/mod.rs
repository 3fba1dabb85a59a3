//! Read-side queries over the campaign projections.

use std::sync::Arc;

use daggerheart_domain::aggregates::{
    AdversaryState, CharacterState, CountdownState, SnapshotState,
};
use daggerheart_domain::{AdversaryId, CampaignId, CharacterId, CountdownId, DomainError};

use super::projections::Projections;
use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid query: {0}")]
    Validation(#[from] DomainError),
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl QueryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub struct SnapshotQuery {
    projections: Arc<Projections>,
}

impl SnapshotQuery {
    pub fn new(projections: Arc<Projections>) -> Self {
        Self { projections }
    }

    /// Campaign snapshot. A campaign with no events yet reads as zero Fear
    /// and no short rests.
    pub async fn snapshot(&self, campaign_id: &str) -> Result<SnapshotState, QueryError> {
        let campaign_id = CampaignId::new(campaign_id)?;
        Ok(self.projections.snapshot(&campaign_id).await?)
    }

    pub async fn character_state(
        &self,
        campaign_id: &str,
        character_id: &str,
    ) -> Result<CharacterState, QueryError> {
        let campaign_id = CampaignId::new(campaign_id)?;
        let character_id = CharacterId::new(character_id)?;
        Ok(self
            .projections
            .character(&campaign_id, &character_id)
            .await?)
    }

    pub async fn adversary(
        &self,
        campaign_id: &str,
        adversary_id: &str,
    ) -> Result<AdversaryState, QueryError> {
        let campaign_id = CampaignId::new(campaign_id)?;
        let adversary_id = AdversaryId::new(adversary_id)?;
        self.projections
            .adversary(&campaign_id, &adversary_id)
            .await?
            .ok_or_else(|| QueryError::NotFound {
                entity_type: "Adversary",
                id: adversary_id.to_string(),
            })
    }

    pub async fn countdown(
        &self,
        campaign_id: &str,
        countdown_id: &str,
    ) -> Result<CountdownState, QueryError> {
        let campaign_id = CampaignId::new(campaign_id)?;
        let countdown_id = CountdownId::new(countdown_id)?;
        self.projections
            .countdown(&campaign_id, &countdown_id)
            .await?
            .ok_or_else(|| QueryError::NotFound {
                entity_type: "Countdown",
                id: countdown_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryProjectionStore;
    use crate::infrastructure::ports::{MockProjectionStore, ProjectionStore};

    fn query_over(store: Arc<dyn ProjectionStore>) -> SnapshotQuery {
        SnapshotQuery::new(Arc::new(Projections::new(store, None)))
    }

    #[tokio::test]
    async fn missing_snapshot_reads_as_defaults() {
        let query = query_over(Arc::new(InMemoryProjectionStore::new()));
        let snapshot = query.snapshot("camp-1").await.unwrap();
        assert_eq!(snapshot.gm_fear, 0);
        assert_eq!(snapshot.consecutive_short_rests, 0);
    }

    #[tokio::test]
    async fn stored_snapshot_is_returned() {
        let store = Arc::new(InMemoryProjectionStore::new());
        let mut snapshot = SnapshotState::new(CampaignId::new("camp-1").unwrap());
        snapshot.gm_fear = 7;
        store.put_snapshot(&snapshot).await.unwrap();

        let query = query_over(store);
        assert_eq!(query.snapshot(" camp-1 ").await.unwrap().gm_fear, 7);
    }

    #[tokio::test]
    async fn blank_campaign_is_rejected() {
        let query = query_over(Arc::new(MockProjectionStore::new()));
        assert!(matches!(
            query.snapshot("   ").await,
            Err(QueryError::Validation(DomainError::InvalidId(_)))
        ));
    }

    #[tokio::test]
    async fn missing_adversary_and_countdown_are_not_found() {
        let query = query_over(Arc::new(InMemoryProjectionStore::new()));
        assert!(query.adversary("camp-1", "gob").await.unwrap_err().is_not_found());
        assert!(query.countdown("camp-1", "doom").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn unknown_character_reads_as_zero_state() {
        let query = query_over(Arc::new(InMemoryProjectionStore::new()));
        let state = query.character_state("camp-1", "pc-1").await.unwrap();
        assert_eq!(state.hp, 0);
        assert!(state.conditions.is_empty());
    }

    #[tokio::test]
    async fn storage_errors_surface() {
        let mut store = MockProjectionStore::new();
        store
            .expect_get_snapshot()
            .returning(|_| Err(RepoError::database("get_snapshot", "connection reset")));
        let query = query_over(Arc::new(store));
        assert!(matches!(
            query.snapshot("camp-1").await,
            Err(QueryError::Repo(_))
        ));
    }
}
