//! Dice boundary.
//!
//! The domain never owns a random source. Rolls come from a [`DiceRoller`]
//! supplied by the caller, which must return the same dice for the same seed
//! so that replaying a command reproduces its events.

use crate::error::DomainError;

/// A four-sided die (rest Fear gain).
pub const D4: u8 = 4;
/// A twelve-sided die (Hope/Fear dice).
pub const D12: u8 = 12;
/// A twenty-sided die (adversary and attack rolls).
pub const D20: u8 = 20;

/// How many dice of which size to roll in one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollRequest {
    pub sides: u8,
    pub count: u8,
}

impl RollRequest {
    pub const fn new(sides: u8, count: u8) -> Self {
        Self { sides, count }
    }
}

/// Deterministic dice source injected by the caller.
pub trait DiceRoller {
    /// Roll `request.count` dice of `request.sides` sides for the given seed.
    fn roll(&self, seed: u64, request: RollRequest) -> Result<Vec<u8>, DomainError>;
}

impl<F> DiceRoller for F
where
    F: Fn(u64, RollRequest) -> Result<Vec<u8>, DomainError>,
{
    fn roll(&self, seed: u64, request: RollRequest) -> Result<Vec<u8>, DomainError> {
        self(seed, request)
    }
}

/// Dice entered by hand (physical dice at the table, or fixed faces in tests).
///
/// Faces are handed out in order and repeat if a request asks for more dice
/// than were entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualDice(pub Vec<u8>);

impl DiceRoller for ManualDice {
    fn roll(&self, _seed: u64, request: RollRequest) -> Result<Vec<u8>, DomainError> {
        Ok(self
            .0
            .iter()
            .copied()
            .cycle()
            .take(request.count as usize)
            .collect())
    }
}

/// Roll through `roller` and verify the shape and face range of the result.
pub fn roll_checked(
    roller: &dyn DiceRoller,
    seed: u64,
    request: RollRequest,
) -> Result<Vec<u8>, DomainError> {
    let dice = roller.roll(seed, request)?;
    if dice.len() != request.count as usize {
        return Err(DomainError::validation(format!(
            "dice roller returned {} dice, expected {}",
            dice.len(),
            request.count
        )));
    }
    if let Some(bad) = dice.iter().find(|d| **d == 0 || **d > request.sides) {
        return Err(DomainError::validation(format!(
            "die result {bad} outside 1..={}",
            request.sides
        )));
    }
    Ok(dice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_act_as_rollers() {
        let roller = |_seed: u64, req: RollRequest| -> Result<Vec<u8>, DomainError> {
            Ok(vec![3; req.count as usize])
        };
        let dice = roll_checked(&roller, 7, RollRequest::new(D12, 2)).unwrap();
        assert_eq!(dice, vec![3, 3]);
    }

    #[test]
    fn out_of_range_faces_are_rejected() {
        let roller = |_seed: u64, _req: RollRequest| -> Result<Vec<u8>, DomainError> { Ok(vec![13]) };
        let err = roll_checked(&roller, 7, RollRequest::new(D12, 1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn wrong_die_count_is_rejected() {
        let roller = |_seed: u64, _req: RollRequest| -> Result<Vec<u8>, DomainError> { Ok(vec![1]) };
        assert!(roll_checked(&roller, 7, RollRequest::new(D12, 2)).is_err());
    }

    #[test]
    fn manual_dice_repeat_in_order() {
        let dice = ManualDice(vec![5, 9]);
        let rolled = roll_checked(&dice, 0, RollRequest::new(D12, 3)).unwrap();
        assert_eq!(rolled, vec![5, 9, 5]);
    }

    #[test]
    fn empty_manual_dice_fail_the_count_check() {
        let dice = ManualDice(vec![]);
        assert!(roll_checked(&dice, 0, RollRequest::new(D4, 1)).is_err());
    }
}
