//! Character projection handlers.

use tracing::{debug, info};

use daggerheart_domain::aggregates::{CharacterState, TemporaryArmorBucket};
use daggerheart_domain::events::{
    CharacterStatePatchedPayload, ConditionChangedPayload, DamageAppliedPayload,
    DeathMoveResolvedPayload, DowntimeMoveAppliedPayload, LoadoutSwappedPayload,
    TemporaryArmorAppliedPayload,
};
use daggerheart_domain::game_systems::daggerheart::{apply_damage_marks, ARMOR_CAP};
use daggerheart_domain::CharacterId;

use super::{merge, ApplyContext, ApplyError};

async fn load(ctx: &ApplyContext<'_>, raw_id: &str) -> Result<CharacterState, ApplyError> {
    let id = CharacterId::new(raw_id)?;
    Ok(ctx.projections.character(ctx.campaign_id, &id).await?)
}

/// Re-validate the merged row against the absolute caps, then write it.
pub(super) async fn save(
    ctx: &ApplyContext<'_>,
    state: &CharacterState,
    event_type: &'static str,
) -> Result<(), ApplyError> {
    state.validate()?;
    ctx.projections.put_character(state).await?;
    debug!(
        campaign_id = %ctx.campaign_id,
        character_id = %state.character_id,
        event_type,
        hp = state.hp,
        hope = state.hope,
        stress = state.stress,
        armor = state.armor,
        "Character projection written"
    );
    Ok(())
}

pub(super) async fn state_patched(
    ctx: &ApplyContext<'_>,
    p: &CharacterStatePatchedPayload,
) -> Result<(), ApplyError> {
    let mut state = load(ctx, &p.character_id).await?;
    if let Some(hope_max) = p.hope_max_after {
        state.set_hope_max(hope_max);
    }
    merge(&mut state.hp, p.hp_after);
    merge(&mut state.hope, p.hope_after);
    merge(&mut state.stress, p.stress_after);
    merge(&mut state.armor, p.armor_after);
    merge(&mut state.life_state, p.life_state_after);
    save(ctx, &state, "character_state_patched").await
}

pub(super) async fn damage_applied(
    ctx: &ApplyContext<'_>,
    p: &DamageAppliedPayload,
) -> Result<(), ApplyError> {
    let mut state = load(ctx, &p.character_id).await?;
    // Without explicit after values the marks and spent armor are applied as deltas.
    state.hp = p
        .hp_after
        .unwrap_or_else(|| apply_damage_marks(state.hp, p.marks));
    state.armor = p
        .armor_after
        .unwrap_or_else(|| (state.armor - p.armor_spent.unwrap_or(0)).max(0));
    save(ctx, &state, "damage_applied").await
}

pub(super) async fn condition_changed(
    ctx: &ApplyContext<'_>,
    p: &ConditionChangedPayload,
) -> Result<(), ApplyError> {
    let conditions = p.conditions.normalize()?;
    let mut state = load(ctx, &p.character_id).await?;
    state.conditions = conditions.after;
    save(ctx, &state, "condition_changed").await
}

pub(super) async fn temporary_armor_applied(
    ctx: &ApplyContext<'_>,
    p: &TemporaryArmorAppliedPayload,
) -> Result<(), ApplyError> {
    let mut state = load(ctx, &p.character_id).await?;
    let bucket = TemporaryArmorBucket {
        source: p.source.trim().to_string(),
        duration: p.duration,
        source_id: p.source_id.clone(),
        amount: p.amount,
    };
    // A regrant from the same source replaces the old bucket rather than stacking.
    let replaced = state
        .temporary_armor
        .iter()
        .find(|b| b.same_grant(&bucket))
        .map_or(0, |b| b.amount);
    state.upsert_temporary_armor(bucket);
    state.armor = p
        .armor_after
        .unwrap_or_else(|| (state.armor - replaced + p.amount).clamp(0, ARMOR_CAP));
    save(ctx, &state, "temporary_armor_applied").await
}

pub(super) async fn downtime_move_applied(
    ctx: &ApplyContext<'_>,
    p: &DowntimeMoveAppliedPayload,
) -> Result<(), ApplyError> {
    let mut state = load(ctx, &p.character_id).await?;
    merge(&mut state.hp, p.hp_after);
    merge(&mut state.hope, p.hope_after);
    merge(&mut state.stress, p.stress_after);
    merge(&mut state.armor, p.armor_after);
    save(ctx, &state, "downtime_move_applied").await
}

pub(super) async fn loadout_swapped(
    ctx: &ApplyContext<'_>,
    p: &LoadoutSwappedPayload,
) -> Result<(), ApplyError> {
    let mut state = load(ctx, &p.character_id).await?;
    merge(&mut state.stress, p.stress_after);
    save(ctx, &state, "loadout_swapped").await
}

pub(super) async fn death_move_resolved(
    ctx: &ApplyContext<'_>,
    p: &DeathMoveResolvedPayload,
) -> Result<(), ApplyError> {
    let mut state = load(ctx, &p.character_id).await?;
    state.life_state = p.life_state_after;
    if let Some(hope_max) = p.hope_max_after {
        state.set_hope_max(hope_max);
    }
    merge(&mut state.hp, p.hp_after);
    merge(&mut state.hope, p.hope_after);
    merge(&mut state.stress, p.stress_after);
    save(ctx, &state, "death_move_resolved").await?;

    info!(
        campaign_id = %ctx.campaign_id,
        character_id = %state.character_id,
        death_move = %p.death_move,
        life_state = %state.life_state,
        scarred = p.scarred.unwrap_or(false),
        "Death move resolved"
    );
    Ok(())
}
