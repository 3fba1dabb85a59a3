//! Adversary projection handlers.

use tracing::{debug, info};

use daggerheart_domain::aggregates::AdversaryState;
use daggerheart_domain::events::{
    AdversaryConditionChangedPayload, AdversaryCreatedPayload, AdversaryDamageAppliedPayload,
    AdversaryDeletedPayload, AdversaryUpdatedPayload,
};
use daggerheart_domain::game_systems::daggerheart::apply_damage_marks;
use daggerheart_domain::{AdversaryId, DomainError};

use super::{ApplyContext, ApplyError};

/// Load an adversary that must already exist.
async fn existing(ctx: &ApplyContext<'_>, raw_id: &str) -> Result<AdversaryState, ApplyError> {
    let id = AdversaryId::new(raw_id)?;
    ctx.projections
        .adversary(ctx.campaign_id, &id)
        .await?
        .ok_or_else(|| ApplyError::not_found("Adversary", &id))
}

async fn save(
    ctx: &ApplyContext<'_>,
    state: &mut AdversaryState,
    event_type: &'static str,
) -> Result<(), ApplyError> {
    state.touch(ctx.occurred_at);
    state.validate()?;
    ctx.projections.put_adversary(state).await?;
    debug!(
        campaign_id = %ctx.campaign_id,
        adversary_id = %state.adversary_id,
        event_type,
        hp = state.hp,
        stress = state.stress,
        armor = state.armor,
        "Adversary projection written"
    );
    Ok(())
}

pub(super) async fn created(
    ctx: &ApplyContext<'_>,
    p: &AdversaryCreatedPayload,
) -> Result<(), ApplyError> {
    let id = AdversaryId::new(&p.adversary_id)?;
    if ctx
        .projections
        .adversary(ctx.campaign_id, &id)
        .await?
        .is_some()
    {
        return Err(DomainError::constraint(format!("adversary {id} already exists")).into());
    }

    let state = p.to_state(ctx.campaign_id.clone(), ctx.occurred_at)?;
    ctx.projections.put_adversary(&state).await?;
    info!(
        campaign_id = %ctx.campaign_id,
        adversary_id = %state.adversary_id,
        name = %state.name,
        hp = state.hp,
        hp_max = state.hp_max,
        "Adversary created"
    );
    Ok(())
}

pub(super) async fn updated(
    ctx: &ApplyContext<'_>,
    p: &AdversaryUpdatedPayload,
) -> Result<(), ApplyError> {
    let mut state = existing(ctx, &p.adversary_id).await?;
    p.merge_into(&mut state)?;
    save(ctx, &mut state, "adversary_updated").await
}

pub(super) async fn damage_applied(
    ctx: &ApplyContext<'_>,
    p: &AdversaryDamageAppliedPayload,
) -> Result<(), ApplyError> {
    let mut state = existing(ctx, &p.adversary_id).await?;
    state.hp = p
        .hp_after
        .unwrap_or_else(|| apply_damage_marks(state.hp, p.marks));
    state.armor = p
        .armor_after
        .unwrap_or_else(|| (state.armor - p.armor_spent.unwrap_or(0)).max(0));
    save(ctx, &mut state, "adversary_damage_applied").await?;

    if state.is_defeated() {
        info!(
            campaign_id = %ctx.campaign_id,
            adversary_id = %state.adversary_id,
            "Adversary defeated"
        );
    }
    Ok(())
}

pub(super) async fn condition_changed(
    ctx: &ApplyContext<'_>,
    p: &AdversaryConditionChangedPayload,
) -> Result<(), ApplyError> {
    let conditions = p.conditions.normalize()?;
    let mut state = existing(ctx, &p.adversary_id).await?;
    state.conditions = conditions.after;
    save(ctx, &mut state, "adversary_condition_changed").await
}

pub(super) async fn deleted(
    ctx: &ApplyContext<'_>,
    p: &AdversaryDeletedPayload,
) -> Result<(), ApplyError> {
    let state = existing(ctx, &p.adversary_id).await?;
    ctx.projections
        .delete_adversary(ctx.campaign_id, &state.adversary_id)
        .await?;
    info!(
        campaign_id = %ctx.campaign_id,
        adversary_id = %state.adversary_id,
        reason = p.reason.as_deref().unwrap_or(""),
        "Adversary deleted"
    );
    Ok(())
}
