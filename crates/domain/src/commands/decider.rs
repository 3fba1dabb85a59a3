//! Command decider.
//!
//! Pure: reads projections from a [`DecisionState`], runs the rules, and
//! returns validated events. Nothing is written here.

use std::collections::HashMap;

use super::{
    ApplyAdversaryDamageCommand, ApplyDamageCommand, ApplyDowntimeMoveCommand,
    ApplyTemporaryArmorCommand, ChangeConditionsCommand, ChangeGmFearCommand, ConditionTarget,
    DaggerheartCommand, ResolveDeathMoveCommand, ResourceCommand, SwapLoadoutCommand,
    TakeRestCommand, UpdateCountdownCommand,
};
use crate::aggregates::{
    AdversaryState, CharacterState, CountdownState, SnapshotState, TemporaryArmorBucket,
};
use crate::error::DomainError;
use crate::events::{
    AdversaryConditionChangedPayload, AdversaryDamageAppliedPayload, CharacterStatePatchedPayload,
    ConditionChangedPayload, ConditionPatch, CountdownUpdatedPayload, DaggerheartEvent,
    DamageAppliedPayload, DeathMoveResolvedPayload, DowntimeMoveAppliedPayload,
    GmFearChangedPayload, LoadoutSwappedPayload, RestCharacterPatch, RestTakenPayload,
    TemporaryArmorAppliedPayload,
};
use crate::game_systems::daggerheart::{
    apply_countdown_update, normalize_conditions, resolve_damage, resolve_death_move,
    resolve_rest, CampaignResource, CharacterResource, DamageRequest, DeathMoveInput,
    DiceRoller, Loadout, LoadoutZone, ResourceChange, ResourceHolder, RestInput,
};
use crate::ids::{AdversaryId, CampaignId, CharacterId, CountdownId};

/// Rule switches that come from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecideOptions {
    pub massive_damage_enabled: bool,
}

impl Default for DecideOptions {
    fn default() -> Self {
        Self {
            massive_damage_enabled: true,
        }
    }
}

/// Projections loaded for one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionState {
    pub campaign_id: CampaignId,
    pub snapshot: SnapshotState,
    pub characters: HashMap<CharacterId, CharacterState>,
    pub adversaries: HashMap<AdversaryId, AdversaryState>,
    pub countdowns: HashMap<CountdownId, CountdownState>,
}

impl DecisionState {
    pub fn new(campaign_id: CampaignId) -> Self {
        Self {
            snapshot: SnapshotState::new(campaign_id.clone()),
            campaign_id,
            characters: HashMap::new(),
            adversaries: HashMap::new(),
            countdowns: HashMap::new(),
        }
    }

    /// Characters without a row start from zero values.
    pub fn character(&self, id: &CharacterId) -> CharacterState {
        self.characters
            .get(id)
            .cloned()
            .unwrap_or_else(|| CharacterState::new(self.campaign_id.clone(), id.clone()))
    }

    pub fn adversary(&self, id: &AdversaryId) -> Result<&AdversaryState, DomainError> {
        self.adversaries
            .get(id)
            .ok_or_else(|| DomainError::not_found("Adversary", id.as_str()))
    }

    pub fn countdown(&self, id: &CountdownId) -> Result<&CountdownState, DomainError> {
        self.countdowns
            .get(id)
            .ok_or_else(|| DomainError::not_found("Countdown", id.as_str()))
    }
}

/// Decide the events for `command`.
pub fn decide(
    command: &DaggerheartCommand,
    state: &DecisionState,
    roller: &dyn DiceRoller,
    options: DecideOptions,
) -> Result<Vec<DaggerheartEvent>, DomainError> {
    let events = match command {
        DaggerheartCommand::ApplyDamage(c) => vec![apply_damage(c, state, options)?],
        DaggerheartCommand::ApplyAdversaryDamage(c) => {
            vec![apply_adversary_damage(c, state, options)?]
        }
        DaggerheartCommand::GainResource(c) => vec![change_resource(c, state, true)?],
        DaggerheartCommand::SpendResource(c) => vec![change_resource(c, state, false)?],
        DaggerheartCommand::ChangeGmFear(c) => vec![change_gm_fear(c, state)?],
        DaggerheartCommand::ChangeConditions(c) => vec![change_conditions(c, state)?],
        DaggerheartCommand::ResolveDeathMove(c) => vec![resolve_death(c, state, roller)?],
        DaggerheartCommand::TakeRest(c) => take_rest(c, state, roller)?,
        DaggerheartCommand::ApplyDowntimeMove(c) => vec![apply_downtime(c, state)?],
        DaggerheartCommand::SwapLoadout(c) => vec![swap_loadout(c, state)?],
        DaggerheartCommand::ApplyTemporaryArmor(c) => vec![apply_temporary_armor(c, state)?],
        DaggerheartCommand::UpdateCountdown(c) => vec![update_countdown(c, state)?],
    };
    for event in &events {
        event.validate()?;
    }
    Ok(events)
}

fn require_positive(field: &str, amount: i32) -> Result<(), DomainError> {
    if amount == 0 {
        return Err(DomainError::no_op(format!("{field} of 0 changes nothing")));
    }
    if amount < 0 {
        return Err(DomainError::validation(format!(
            "{field} must be positive, got {amount}"
        )));
    }
    Ok(())
}

fn apply_damage(
    c: &ApplyDamageCommand,
    state: &DecisionState,
    options: DecideOptions,
) -> Result<DaggerheartEvent, DomainError> {
    let id = CharacterId::new(&c.character_id)?;
    let res = state.character(&id).resources(c.limits);
    let resolution = resolve_damage(DamageRequest {
        amount: c.amount,
        types: c.types,
        resistance: c.resistance,
        major_threshold: c.major_threshold,
        severe_threshold: c.severe_threshold,
        hp: res.hp(),
        armor: res.armor(),
        use_armor: c.use_armor,
        massive_enabled: options.massive_damage_enabled,
    })?;

    Ok(DaggerheartEvent::DamageApplied(DamageAppliedPayload {
        character_id: id.into_inner(),
        damage: resolution.amount,
        severity: resolution.result.severity,
        marks: resolution.result.marks,
        roll_seq: c.roll_seq,
        hp_before: Some(resolution.hp_before),
        hp_after: Some(resolution.hp_after),
        armor_before: Some(resolution.armor_before),
        armor_after: Some(resolution.armor_after),
        armor_spent: Some(resolution.armor_spent),
        mitigated: Some(resolution.mitigated()),
    }))
}

fn apply_adversary_damage(
    c: &ApplyAdversaryDamageCommand,
    state: &DecisionState,
    options: DecideOptions,
) -> Result<DaggerheartEvent, DomainError> {
    let id = AdversaryId::new(&c.adversary_id)?;
    let adversary = state.adversary(&id)?;
    let resolution = resolve_damage(DamageRequest {
        amount: c.amount,
        types: c.types,
        resistance: c.resistance,
        major_threshold: adversary.major_threshold,
        severe_threshold: adversary.severe_threshold,
        hp: adversary.hp,
        armor: adversary.armor,
        use_armor: c.use_armor,
        massive_enabled: options.massive_damage_enabled,
    })?;

    Ok(DaggerheartEvent::AdversaryDamageApplied(
        AdversaryDamageAppliedPayload {
            adversary_id: id.into_inner(),
            damage: resolution.amount,
            severity: resolution.result.severity,
            marks: resolution.result.marks,
            roll_seq: c.roll_seq,
            hp_before: Some(resolution.hp_before),
            hp_after: Some(resolution.hp_after),
            armor_before: Some(resolution.armor_before),
            armor_after: Some(resolution.armor_after),
            armor_spent: Some(resolution.armor_spent),
        },
    ))
}

fn patch_field(
    patch: &mut CharacterStatePatchedPayload,
    resource: CharacterResource,
    change: ResourceChange,
) {
    let (before, after) = (Some(change.before), Some(change.after));
    match resource {
        CharacterResource::Hp => (patch.hp_before, patch.hp_after) = (before, after),
        CharacterResource::Hope => (patch.hope_before, patch.hope_after) = (before, after),
        CharacterResource::Stress => (patch.stress_before, patch.stress_after) = (before, after),
        CharacterResource::Armor => (patch.armor_before, patch.armor_after) = (before, after),
    }
}

fn change_resource(
    c: &ResourceCommand,
    state: &DecisionState,
    gain: bool,
) -> Result<DaggerheartEvent, DomainError> {
    let id = CharacterId::new(&c.character_id)?;
    require_positive("amount", c.amount)?;
    let mut res = state.character(&id).resources(c.limits);
    let mut patch = CharacterStatePatchedPayload {
        character_id: id.into_inner(),
        ..Default::default()
    };

    if gain && c.resource == CharacterResource::Stress {
        let stress = res.gain_stress(c.amount)?;
        patch_field(&mut patch, CharacterResource::Stress, stress.stress);
        if stress.overflow > 0 {
            patch_field(&mut patch, CharacterResource::Hp, stress.hp);
        }
    } else {
        let change = if gain {
            res.gain(c.resource, c.amount)?
        } else {
            res.spend(c.resource, c.amount)?
        };
        if change.is_unchanged() {
            return Err(DomainError::no_op(format!("{} already at its limit", c.resource)));
        }
        patch_field(&mut patch, c.resource, change);
    }
    Ok(DaggerheartEvent::CharacterStatePatched(patch))
}

fn change_gm_fear(
    c: &ChangeGmFearCommand,
    state: &DecisionState,
) -> Result<DaggerheartEvent, DomainError> {
    let mut fear = state.snapshot.resources();
    let change = match c.delta {
        0 => return Err(DomainError::no_op("gm fear delta of 0 changes nothing")),
        d if d > 0 => fear.gain(CampaignResource::GmFear, d)?,
        d => fear.spend(CampaignResource::GmFear, -d)?,
    };
    if change.is_unchanged() {
        return Err(DomainError::no_op("gm fear already at its cap"));
    }
    Ok(DaggerheartEvent::GmFearChanged(GmFearChangedPayload {
        before: change.before,
        after: change.after,
        reason: c.reason.clone(),
    }))
}

fn change_conditions(
    c: &ChangeConditionsCommand,
    state: &DecisionState,
) -> Result<DaggerheartEvent, DomainError> {
    let after = normalize_conditions(&c.conditions)?;
    match &c.target {
        ConditionTarget::Character(raw) => {
            let id = CharacterId::new(raw)?;
            let before = state.character(&id).conditions;
            if before == after {
                return Err(DomainError::no_op("conditions unchanged"));
            }
            Ok(DaggerheartEvent::ConditionChanged(ConditionChangedPayload {
                character_id: id.into_inner(),
                conditions: ConditionPatch::from_change(&before, &after),
            }))
        }
        ConditionTarget::Adversary(raw) => {
            let id = AdversaryId::new(raw)?;
            let before = &state.adversary(&id)?.conditions;
            if before == &after {
                return Err(DomainError::no_op("conditions unchanged"));
            }
            Ok(DaggerheartEvent::AdversaryConditionChanged(
                AdversaryConditionChangedPayload {
                    adversary_id: id.into_inner(),
                    conditions: ConditionPatch::from_change(before, &after),
                },
            ))
        }
    }
}

fn resolve_death(
    c: &ResolveDeathMoveCommand,
    state: &DecisionState,
    roller: &dyn DiceRoller,
) -> Result<DaggerheartEvent, DomainError> {
    let id = CharacterId::new(&c.character_id)?;
    if c.death_move.uses_dice() && c.roll_seq.unwrap_or(0) == 0 {
        return Err(DomainError::validation(format!(
            "{} requires a positive roll_seq",
            c.death_move
        )));
    }
    let character = state.character(&id);
    let res = character.resources(c.limits);
    let outcome = resolve_death_move(
        c.death_move,
        DeathMoveInput {
            level: c.level,
            hp: res.hp(),
            hp_max: res.hp_max(),
            hope: res.hope(),
            hope_max: res.hope_max(),
            stress: res.stress(),
            stress_max: res.stress_max(),
            hp_clear: c.hp_clear,
            stress_clear: c.stress_clear,
            seed: c.seed.or(c.roll_seq).unwrap_or(0),
        },
        roller,
    )?;

    Ok(DaggerheartEvent::DeathMoveResolved(DeathMoveResolvedPayload {
        character_id: id.into_inner(),
        death_move: c.death_move,
        life_state_after: outcome.life_state,
        roll_seq: if c.death_move.uses_dice() {
            c.roll_seq
        } else {
            None
        },
        hope_die: outcome.hope_die,
        fear_die: outcome.fear_die,
        hp_after: Some(outcome.hp_after),
        hope_after: Some(outcome.hope_after),
        hope_max_after: Some(outcome.hope_max_after),
        stress_after: Some(outcome.stress_after),
        scarred: Some(outcome.scarred),
    }))
}

fn take_rest(
    c: &TakeRestCommand,
    state: &DecisionState,
    roller: &dyn DiceRoller,
) -> Result<Vec<DaggerheartEvent>, DomainError> {
    let countdown = c
        .long_term_countdown_id
        .as_deref()
        .map(CountdownId::new)
        .transpose()?
        .map(|id| state.countdown(&id))
        .transpose()?;

    let party = c
        .party
        .iter()
        .map(CharacterId::new)
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = resolve_rest(
        RestInput {
            rest_type: c.rest_type,
            interrupted: c.interrupted,
            consecutive_short_rests: state.snapshot.consecutive_short_rests,
            gm_fear: state.snapshot.gm_fear,
            party_size: i32::try_from(party.len())
                .map_err(|_| DomainError::validation("party too large"))?,
            refresh_effects: c.refresh_effects.clone(),
            long_term_countdown: countdown.map(CountdownState::spec),
            seed: c.seed,
        },
        roller,
    )?;

    let character_states = party
        .iter()
        .map(|id| {
            let mut character = state.character(id);
            let expired = character.expire_temporary_armor(|d| outcome.expires(d));
            RestCharacterPatch {
                character_id: id.to_string(),
                armor_after: (expired > 0).then(|| (character.armor - expired).max(0)),
                ..Default::default()
            }
        })
        .collect();

    let mut events = vec![DaggerheartEvent::RestTaken(RestTakenPayload {
        rest_type: c.rest_type,
        interrupted: c.interrupted,
        gm_fear_before: outcome.gm_fear_before,
        gm_fear_after: outcome.gm_fear_after,
        short_rests_before: outcome.short_rests_before,
        short_rests_after: outcome.short_rests_after,
        refresh_rest: Some(outcome.refresh_rest),
        refresh_long_rest: Some(outcome.refresh_long_rest),
        long_term_countdown_id: c.long_term_countdown_id.clone(),
        character_states,
    })];

    if let (Some(countdown), Some(update)) = (countdown, outcome.countdown) {
        events.push(DaggerheartEvent::CountdownUpdated(CountdownUpdatedPayload {
            countdown_id: countdown.countdown_id.to_string(),
            before: update.before,
            after: update.after,
            delta: Some(update.delta),
            looped: Some(update.looped),
            reason: Some("long_rest".to_string()),
        }));
    }
    Ok(events)
}

fn apply_downtime(
    c: &ApplyDowntimeMoveCommand,
    state: &DecisionState,
) -> Result<DaggerheartEvent, DomainError> {
    let id = CharacterId::new(&c.character_id)?;
    let mut res = state.character(&id).resources(c.limits);
    let change = c.downtime_move.apply(&mut res, c.with_party);
    let (before, after) = (Some(change.before), Some(change.after));

    let mut payload = DowntimeMoveAppliedPayload {
        character_id: id.into_inner(),
        downtime_move: c.downtime_move,
        hp_before: None,
        hp_after: None,
        hope_before: None,
        hope_after: None,
        stress_before: None,
        stress_after: None,
        armor_before: None,
        armor_after: None,
    };
    match c.downtime_move.resource() {
        CharacterResource::Hp => (payload.hp_before, payload.hp_after) = (before, after),
        CharacterResource::Hope => (payload.hope_before, payload.hope_after) = (before, after),
        CharacterResource::Stress => {
            (payload.stress_before, payload.stress_after) = (before, after)
        }
        CharacterResource::Armor => {
            (payload.armor_before, payload.armor_after) = (before, after)
        }
    }
    Ok(DaggerheartEvent::DowntimeMoveApplied(payload))
}

fn swap_loadout(
    c: &SwapLoadoutCommand,
    state: &DecisionState,
) -> Result<DaggerheartEvent, DomainError> {
    let id = CharacterId::new(&c.character_id)?;
    let card_id = crate::ids::CardId::new(&c.card_id)?;
    let mut loadout = Loadout::new(c.active.clone(), c.vault.clone())?;
    let from = loadout
        .zone_of(&card_id)
        .ok_or_else(|| DomainError::CardNotFound(card_id.to_string()))?;
    if from == c.to {
        return Err(DomainError::no_op(format!("{card_id} already in {from}")));
    }

    let mut res = state.character(&id).resources(c.limits);
    let (recall_cost, stress) = match c.to {
        LoadoutZone::Active => {
            let recall = loadout.move_to_active_with_recall(&card_id, &mut res, c.at_rest)?;
            (recall.recall_cost, recall.stress)
        }
        LoadoutZone::Vault => {
            loadout.move_to_vault(&card_id)?;
            (0, None)
        }
    };

    Ok(DaggerheartEvent::LoadoutSwapped(LoadoutSwappedPayload {
        character_id: id.into_inner(),
        card_id: card_id.into_inner(),
        from,
        to: c.to,
        recall_cost,
        stress_before: stress.map(|s| s.before),
        stress_after: stress.map(|s| s.after),
    }))
}

fn apply_temporary_armor(
    c: &ApplyTemporaryArmorCommand,
    state: &DecisionState,
) -> Result<DaggerheartEvent, DomainError> {
    let id = CharacterId::new(&c.character_id)?;
    require_positive("amount", c.amount)?;
    let grant = TemporaryArmorBucket {
        source: c.source.trim().to_string(),
        duration: c.duration,
        source_id: c.source_id.clone(),
        amount: c.amount,
    };

    // A regrant replaces the earlier bucket, so its armor comes off first.
    let mut character = state.character(&id);
    let armor_before = character.armor;
    let replaced = character
        .temporary_armor
        .iter()
        .find(|b| b.same_grant(&grant))
        .map_or(0, |b| b.amount);
    character.armor = (character.armor - replaced).max(0);
    let base = character.armor;
    let change = character
        .resources(c.limits)
        .gain(CharacterResource::Armor, c.amount)?;

    // The bucket records only what was actually gained so a rest removes no base armor.
    let gained = change.after - base;
    if gained <= 0 {
        return Err(DomainError::no_op(format!(
            "armor already at maximum for {}",
            grant.source
        )));
    }

    Ok(DaggerheartEvent::TemporaryArmorApplied(
        TemporaryArmorAppliedPayload {
            character_id: id.into_inner(),
            source: grant.source,
            duration: grant.duration,
            source_id: grant.source_id,
            amount: gained,
            armor_before: Some(armor_before),
            armor_after: Some(change.after),
        },
    ))
}

fn update_countdown(
    c: &UpdateCountdownCommand,
    state: &DecisionState,
) -> Result<DaggerheartEvent, DomainError> {
    let id = CountdownId::new(&c.countdown_id)?;
    let countdown = state.countdown(&id)?;
    let update = apply_countdown_update(&countdown.spec(), c.delta, c.value)?;

    Ok(DaggerheartEvent::CountdownUpdated(CountdownUpdatedPayload {
        countdown_id: id.into_inner(),
        before: update.before,
        after: update.after,
        delta: Some(update.delta),
        looped: Some(update.looped),
        reason: c.reason.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::{ResourceLimits, TemporaryArmorBucket};
    use crate::commands::TakeRestCommand;
    use crate::game_systems::daggerheart::{
        ArmorDuration, CountdownDirection, CountdownKind, DamageSeverity, DamageTypes, DeathMove,
        DomainCard, LifeState, ManualDice, ResistanceProfile, RestType,
    };
    use crate::ids::CardId;

    fn campaign() -> CampaignId {
        CampaignId::new("camp").unwrap()
    }

    fn pc() -> CharacterId {
        CharacterId::new("pc").unwrap()
    }

    fn state_with(character: CharacterState) -> DecisionState {
        let mut state = DecisionState::new(campaign());
        state
            .characters
            .insert(character.character_id.clone(), character);
        state
    }

    fn hero() -> CharacterState {
        let mut c = CharacterState::new(campaign(), pc());
        c.hp = 6;
        c.hope = 2;
        c.stress = 1;
        c.armor = 2;
        c
    }

    fn limits() -> ResourceLimits {
        ResourceLimits {
            hp_max: 6,
            stress_max: 6,
            armor_max: 3,
        }
    }

    fn no_dice() -> ManualDice {
        ManualDice(vec![])
    }

    #[test]
    fn apply_damage_emits_resolved_marks() {
        let command = DaggerheartCommand::ApplyDamage(ApplyDamageCommand {
            character_id: "pc".into(),
            amount: 11,
            types: DamageTypes::PHYSICAL,
            resistance: ResistanceProfile::default(),
            major_threshold: 5,
            severe_threshold: 10,
            use_armor: true,
            limits: limits(),
            roll_seq: Some(4),
        });
        let events = decide(&command, &state_with(hero()), &no_dice(), DecideOptions::default())
            .unwrap();
        let DaggerheartEvent::DamageApplied(p) = &events[0] else {
            panic!("expected damage_applied");
        };
        assert_eq!(p.severity, DamageSeverity::Major);
        assert_eq!(p.hp_after, Some(4));
        assert_eq!(p.armor_after, Some(1));
        assert_eq!(p.mitigated, Some(true));
    }

    #[test]
    fn adversary_damage_requires_adversary() {
        let command = DaggerheartCommand::ApplyAdversaryDamage(ApplyAdversaryDamageCommand {
            adversary_id: "ghost".into(),
            amount: 3,
            types: DamageTypes::MAGIC,
            resistance: ResistanceProfile::default(),
            use_armor: false,
            roll_seq: None,
        });
        let err = decide(
            &command,
            &DecisionState::new(campaign()),
            &no_dice(),
            DecideOptions::default(),
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn stress_gain_reports_hp_overflow() {
        let mut tired = hero();
        tired.stress = 5;
        let command = DaggerheartCommand::GainResource(ResourceCommand {
            character_id: "pc".into(),
            resource: CharacterResource::Stress,
            amount: 3,
            limits: limits(),
        });
        let events =
            decide(&command, &state_with(tired), &no_dice(), DecideOptions::default()).unwrap();
        let DaggerheartEvent::CharacterStatePatched(p) = &events[0] else {
            panic!("expected character_state_patched");
        };
        assert_eq!(p.stress_after, Some(6));
        assert_eq!(p.hp_after, Some(4));
    }

    #[test]
    fn spend_more_than_available_fails() {
        let command = DaggerheartCommand::SpendResource(ResourceCommand {
            character_id: "pc".into(),
            resource: CharacterResource::Hope,
            amount: 3,
            limits: limits(),
        });
        let err = decide(&command, &state_with(hero()), &no_dice(), DecideOptions::default())
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientResource { .. }));
    }

    #[test]
    fn gm_fear_spend_and_zero_delta() {
        let mut state = DecisionState::new(campaign());
        state.snapshot.gm_fear = 4;
        let spend = DaggerheartCommand::ChangeGmFear(ChangeGmFearCommand {
            delta: -3,
            reason: None,
        });
        let events = decide(&spend, &state, &no_dice(), DecideOptions::default()).unwrap();
        assert_eq!(
            events[0],
            DaggerheartEvent::GmFearChanged(GmFearChangedPayload {
                before: 4,
                after: 1,
                reason: None
            })
        );

        let zero = DaggerheartCommand::ChangeGmFear(ChangeGmFearCommand {
            delta: 0,
            reason: None,
        });
        assert!(decide(&zero, &state, &no_dice(), DecideOptions::default()).is_err());
    }

    #[test]
    fn change_conditions_emits_diff() {
        let command = DaggerheartCommand::ChangeConditions(ChangeConditionsCommand {
            target: ConditionTarget::Character("pc".into()),
            conditions: vec!["Vulnerable".into(), "hidden".into()],
        });
        let events =
            decide(&command, &state_with(hero()), &no_dice(), DecideOptions::default()).unwrap();
        let DaggerheartEvent::ConditionChanged(p) = &events[0] else {
            panic!("expected condition_changed");
        };
        assert_eq!(p.conditions.conditions_after, vec!["hidden", "vulnerable"]);
        assert_eq!(
            p.conditions.added,
            Some(vec!["hidden".to_string(), "vulnerable".to_string()])
        );
    }

    #[test]
    fn death_move_rolls_with_seed() {
        let command = DaggerheartCommand::ResolveDeathMove(ResolveDeathMoveCommand {
            character_id: "pc".into(),
            death_move: DeathMove::RiskItAll,
            level: 2,
            limits: limits(),
            hp_clear: None,
            stress_clear: None,
            roll_seq: Some(9),
            seed: None,
        });
        let mut down = hero();
        down.hp = 0;
        let events = decide(
            &command,
            &state_with(down),
            &ManualDice(vec![5, 5]),
            DecideOptions::default(),
        )
        .unwrap();
        let DaggerheartEvent::DeathMoveResolved(p) = &events[0] else {
            panic!("expected death_move_resolved");
        };
        assert_eq!(p.life_state_after, LifeState::Alive);
        assert_eq!(p.hp_after, Some(6));
        assert_eq!(p.stress_after, Some(6));
        assert_eq!(p.roll_seq, Some(9));
    }

    #[test]
    fn dice_death_move_needs_roll_seq() {
        let command = DaggerheartCommand::ResolveDeathMove(ResolveDeathMoveCommand {
            character_id: "pc".into(),
            death_move: DeathMove::AvoidDeath,
            level: 2,
            limits: limits(),
            hp_clear: None,
            stress_clear: None,
            roll_seq: None,
            seed: Some(3),
        });
        assert!(decide(
            &command,
            &state_with(hero()),
            &ManualDice(vec![5]),
            DecideOptions::default()
        )
        .is_err());
    }

    #[test]
    fn long_rest_expires_armor_and_ticks_countdown() {
        let mut character = hero();
        character.armor = 3;
        character.upsert_temporary_armor(TemporaryArmorBucket {
            source: "ward".into(),
            duration: ArmorDuration::LongRest,
            source_id: None,
            amount: 2,
        });
        let mut state = state_with(character);
        let clock = CountdownId::new("clock").unwrap();
        state.countdowns.insert(
            clock.clone(),
            CountdownState {
                campaign_id: campaign(),
                countdown_id: clock,
                name: "The Long Night".into(),
                kind: CountdownKind::Consequence,
                current: 2,
                max: 8,
                direction: CountdownDirection::Increase,
                looping: false,
            },
        );

        let command = DaggerheartCommand::TakeRest(TakeRestCommand {
            rest_type: RestType::Long,
            interrupted: false,
            party: vec!["pc".into()],
            refresh_effects: vec![],
            long_term_countdown_id: Some("clock".into()),
            seed: 1,
        });
        let events =
            decide(&command, &state, &ManualDice(vec![2]), DecideOptions::default()).unwrap();
        assert_eq!(events.len(), 2);
        let DaggerheartEvent::RestTaken(rest) = &events[0] else {
            panic!("expected rest_taken");
        };
        assert_eq!(rest.gm_fear_after, 3);
        assert_eq!(rest.character_states[0].armor_after, Some(1));
        let DaggerheartEvent::CountdownUpdated(update) = &events[1] else {
            panic!("expected countdown_updated");
        };
        assert_eq!((update.before, update.after), (2, 3));
    }

    #[test]
    fn short_rest_at_cap_is_rejected() {
        let mut state = DecisionState::new(campaign());
        state.snapshot.consecutive_short_rests = 3;
        let command = DaggerheartCommand::TakeRest(TakeRestCommand {
            rest_type: RestType::Short,
            interrupted: false,
            party: vec![],
            refresh_effects: vec![],
            long_term_countdown_id: None,
            seed: 1,
        });
        assert_eq!(
            decide(&command, &state, &ManualDice(vec![2]), DecideOptions::default()).unwrap_err(),
            DomainError::ShortRestLimitReached { cap: 3 }
        );
    }

    #[test]
    fn swap_into_active_pays_recall() {
        let command = DaggerheartCommand::SwapLoadout(SwapLoadoutCommand {
            character_id: "pc".into(),
            card_id: "bolt".into(),
            to: LoadoutZone::Active,
            active: vec![],
            vault: vec![DomainCard::new(CardId::new("bolt").unwrap(), 1)],
            at_rest: false,
            limits: limits(),
        });
        let events =
            decide(&command, &state_with(hero()), &no_dice(), DecideOptions::default()).unwrap();
        let DaggerheartEvent::LoadoutSwapped(p) = &events[0] else {
            panic!("expected loadout_swapped");
        };
        assert_eq!(p.from, LoadoutZone::Vault);
        assert_eq!((p.stress_before, p.stress_after), (Some(1), Some(0)));
    }

    #[test]
    fn swap_to_current_zone_is_a_no_op() {
        let command = DaggerheartCommand::SwapLoadout(SwapLoadoutCommand {
            character_id: "pc".into(),
            card_id: "bolt".into(),
            to: LoadoutZone::Vault,
            active: vec![],
            vault: vec![DomainCard::new(CardId::new("bolt").unwrap(), 1)],
            at_rest: false,
            limits: limits(),
        });
        assert!(matches!(
            decide(&command, &state_with(hero()), &no_dice(), DecideOptions::default()),
            Err(DomainError::NoOpUpdate(_))
        ));
    }

    #[test]
    fn update_countdown_missing_is_not_found() {
        let command = DaggerheartCommand::UpdateCountdown(UpdateCountdownCommand {
            countdown_id: "nope".into(),
            delta: Some(1),
            value: None,
            reason: None,
        });
        assert!(decide(
            &command,
            &DecisionState::new(campaign()),
            &no_dice(),
            DecideOptions::default()
        )
        .unwrap_err()
        .is_not_found());
    }

    #[test]
    fn temporary_armor_raises_armor() {
        let command = DaggerheartCommand::ApplyTemporaryArmor(ApplyTemporaryArmorCommand {
            character_id: "pc".into(),
            source: "ward".into(),
            duration: ArmorDuration::ShortRest,
            source_id: None,
            amount: 1,
            limits: limits(),
        });
        let events =
            decide(&command, &state_with(hero()), &no_dice(), DecideOptions::default()).unwrap();
        let DaggerheartEvent::TemporaryArmorApplied(p) = &events[0] else {
            panic!("expected temporary_armor_applied");
        };
        assert_eq!((p.armor_before, p.armor_after), (Some(2), Some(3)));
    }

    fn ward(amount: i32) -> ApplyTemporaryArmorCommand {
        ApplyTemporaryArmorCommand {
            character_id: "pc".into(),
            source: "ward".into(),
            duration: ArmorDuration::ShortRest,
            source_id: None,
            amount,
            limits: limits(),
        }
    }

    fn short_rest() -> DaggerheartCommand {
        DaggerheartCommand::TakeRest(TakeRestCommand {
            rest_type: RestType::Short,
            interrupted: false,
            party: vec!["pc".into()],
            refresh_effects: vec![],
            long_term_countdown_id: None,
            seed: 1,
        })
    }

    fn granted(events: &[DaggerheartEvent]) -> &TemporaryArmorAppliedPayload {
        let DaggerheartEvent::TemporaryArmorApplied(p) = &events[0] else {
            panic!("expected temporary_armor_applied");
        };
        p
    }

    #[test]
    fn regrant_replaces_the_earlier_bucket() {
        let mut character = hero();
        character.armor = 3;
        character.upsert_temporary_armor(TemporaryArmorBucket {
            source: "ward".into(),
            duration: ArmorDuration::ShortRest,
            source_id: None,
            amount: 2,
        });
        let command = DaggerheartCommand::ApplyTemporaryArmor(ward(2));
        let events =
            decide(&command, &state_with(character), &no_dice(), DecideOptions::default())
                .unwrap();
        let p = granted(&events);
        assert_eq!((p.armor_before, p.armor_after), (Some(3), Some(3)));
        assert_eq!(p.amount, 2);
    }

    #[test]
    fn clamped_grant_records_only_the_gain_and_rest_restores_base() {
        let command = DaggerheartCommand::ApplyTemporaryArmor(ward(3));
        let events =
            decide(&command, &state_with(hero()), &no_dice(), DecideOptions::default()).unwrap();
        let p = granted(&events);
        assert_eq!((p.armor_before, p.armor_after), (Some(2), Some(3)));
        assert_eq!(p.amount, 1);

        let mut character = hero();
        character.armor = 3;
        character.upsert_temporary_armor(TemporaryArmorBucket {
            source: p.source.clone(),
            duration: p.duration,
            source_id: p.source_id.clone(),
            amount: p.amount,
        });
        let events = decide(
            &short_rest(),
            &state_with(character),
            &ManualDice(vec![1]),
            DecideOptions::default(),
        )
        .unwrap();
        let DaggerheartEvent::RestTaken(rest) = &events[0] else {
            panic!("expected rest_taken");
        };
        assert_eq!(rest.character_states[0].armor_after, Some(2));
    }

    #[test]
    fn grant_at_full_armor_changes_nothing() {
        let mut character = hero();
        character.armor = 3;
        let command = DaggerheartCommand::ApplyTemporaryArmor(ward(1));
        let err = decide(&command, &state_with(character), &no_dice(), DecideOptions::default())
            .unwrap_err();
        assert!(matches!(err, DomainError::NoOpUpdate(_)));
    }

    #[test]
    fn downtime_clears_stress() {
        let command = DaggerheartCommand::ApplyDowntimeMove(ApplyDowntimeMoveCommand {
            character_id: "pc".into(),
            downtime_move: crate::game_systems::daggerheart::DowntimeMove::ClearAllStress,
            with_party: false,
            limits: limits(),
        });
        let events =
            decide(&command, &state_with(hero()), &no_dice(), DecideOptions::default()).unwrap();
        let DaggerheartEvent::DowntimeMoveApplied(p) = &events[0] else {
            panic!("expected downtime_move_applied");
        };
        assert_eq!((p.stress_before, p.stress_after), (Some(1), Some(0)));
    }
}
