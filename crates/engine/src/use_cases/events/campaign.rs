//! Campaign snapshot handlers.

use tracing::{debug, info};

use daggerheart_domain::aggregates::SnapshotState;
use daggerheart_domain::events::{GmFearChangedPayload, RestTakenPayload};
use daggerheart_domain::CharacterId;

use super::{merge, ApplyContext, ApplyError};

async fn save_snapshot(
    ctx: &ApplyContext<'_>,
    snapshot: &SnapshotState,
    event_type: &'static str,
) -> Result<(), ApplyError> {
    snapshot.validate()?;
    ctx.projections.put_snapshot(snapshot).await?;
    debug!(
        campaign_id = %ctx.campaign_id,
        event_type,
        gm_fear = snapshot.gm_fear,
        consecutive_short_rests = snapshot.consecutive_short_rests,
        "Snapshot projection written"
    );
    Ok(())
}

pub(super) async fn gm_fear_changed(
    ctx: &ApplyContext<'_>,
    p: &GmFearChangedPayload,
) -> Result<(), ApplyError> {
    let mut snapshot = ctx.projections.snapshot(ctx.campaign_id).await?;
    snapshot.gm_fear = p.after;
    save_snapshot(ctx, &snapshot, "gm_fear_changed").await
}

/// Writes every listed character and then the snapshot. Every merged row is
/// validated before the first write.
pub(super) async fn rest_taken(
    ctx: &ApplyContext<'_>,
    p: &RestTakenPayload,
) -> Result<(), ApplyError> {
    let effective = p.effective_rest_type();

    let mut snapshot = ctx.projections.snapshot(ctx.campaign_id).await?;
    snapshot.gm_fear = p.gm_fear_after;
    snapshot.consecutive_short_rests = p.short_rests_after;
    snapshot.validate()?;

    let mut characters = Vec::with_capacity(p.character_states.len());
    for patch in &p.character_states {
        let id = CharacterId::new(&patch.character_id)?;
        let mut state = ctx.projections.character(ctx.campaign_id, &id).await?;
        let expired = state.expire_temporary_armor(|d| d.expires_after(effective));
        state.armor = patch
            .armor_after
            .unwrap_or_else(|| (state.armor - expired).max(0));
        merge(&mut state.hp, patch.hp_after);
        merge(&mut state.hope, patch.hope_after);
        merge(&mut state.stress, patch.stress_after);
        state.validate()?;
        characters.push(state);
    }

    for state in &characters {
        super::character::save(ctx, state, "rest_taken").await?;
    }
    save_snapshot(ctx, &snapshot, "rest_taken").await?;

    info!(
        campaign_id = %ctx.campaign_id,
        rest_type = %effective,
        interrupted = p.interrupted,
        characters = characters.len(),
        gm_fear = snapshot.gm_fear,
        consecutive_short_rests = snapshot.consecutive_short_rests,
        "Rest taken"
    );
    Ok(())
}
