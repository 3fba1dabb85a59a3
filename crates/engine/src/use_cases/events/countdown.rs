//! Countdown projection handlers.

use tracing::{debug, info};

use daggerheart_domain::aggregates::CountdownState;
use daggerheart_domain::events::{
    CountdownCreatedPayload, CountdownDeletedPayload, CountdownUpdatedPayload,
};
use daggerheart_domain::{CountdownId, DomainError};

use super::{ApplyContext, ApplyError};

async fn existing(ctx: &ApplyContext<'_>, raw_id: &str) -> Result<CountdownState, ApplyError> {
    let id = CountdownId::new(raw_id)?;
    ctx.projections
        .countdown(ctx.campaign_id, &id)
        .await?
        .ok_or_else(|| ApplyError::not_found("Countdown", &id))
}

pub(super) async fn created(
    ctx: &ApplyContext<'_>,
    p: &CountdownCreatedPayload,
) -> Result<(), ApplyError> {
    let id = CountdownId::new(&p.countdown_id)?;
    if ctx
        .projections
        .countdown(ctx.campaign_id, &id)
        .await?
        .is_some()
    {
        return Err(DomainError::constraint(format!("countdown {id} already exists")).into());
    }

    let state = p.to_state(ctx.campaign_id.clone())?;
    ctx.projections.put_countdown(&state).await?;
    info!(
        campaign_id = %ctx.campaign_id,
        countdown_id = %state.countdown_id,
        name = %state.name,
        kind = %state.kind,
        current = state.current,
        max = state.max,
        "Countdown created"
    );
    Ok(())
}

/// The event's `before` must match the stored value.
pub(super) async fn updated(
    ctx: &ApplyContext<'_>,
    p: &CountdownUpdatedPayload,
) -> Result<(), ApplyError> {
    let mut state = existing(ctx, &p.countdown_id).await?;
    if state.current != p.before {
        return Err(ApplyError::StaleCountdown {
            countdown_id: state.countdown_id.to_string(),
            expected: p.before,
            actual: state.current,
        });
    }

    state.current = p.after;
    state.validate()?;
    ctx.projections.put_countdown(&state).await?;
    debug!(
        campaign_id = %ctx.campaign_id,
        countdown_id = %state.countdown_id,
        before = p.before,
        after = p.after,
        looped = p.looped.unwrap_or(false),
        "Countdown projection written"
    );

    if state.is_complete() {
        info!(
            campaign_id = %ctx.campaign_id,
            countdown_id = %state.countdown_id,
            "Countdown complete"
        );
    }
    Ok(())
}

pub(super) async fn deleted(
    ctx: &ApplyContext<'_>,
    p: &CountdownDeletedPayload,
) -> Result<(), ApplyError> {
    let state = existing(ctx, &p.countdown_id).await?;
    ctx.projections
        .delete_countdown(ctx.campaign_id, &state.countdown_id)
        .await?;
    info!(
        campaign_id = %ctx.campaign_id,
        countdown_id = %state.countdown_id,
        reason = p.reason.as_deref().unwrap_or(""),
        "Countdown deleted"
    );
    Ok(())
}
