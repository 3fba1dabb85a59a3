//! Seeded dice adapter.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use daggerheart_domain::game_systems::daggerheart::{DiceRoller, RollRequest};
use daggerheart_domain::DomainError;

/// Rolls from a `StdRng` seeded per call, so one seed always gives the
/// same dice.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeededDiceRoller;

impl SeededDiceRoller {
    pub fn new() -> Self {
        Self
    }
}

impl DiceRoller for SeededDiceRoller {
    fn roll(&self, seed: u64, request: RollRequest) -> Result<Vec<u8>, DomainError> {
        if request.sides == 0 {
            return Err(DomainError::validation("dice must have at least one side"));
        }
        let mut rng = StdRng::seed_from_u64(seed);
        Ok((0..request.count)
            .map(|_| rng.gen_range(1..=request.sides))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daggerheart_domain::game_systems::daggerheart::{roll_checked, D12, D4};

    #[test]
    fn same_seed_same_dice() {
        let roller = SeededDiceRoller::new();
        let request = RollRequest::new(D12, 2);
        assert_eq!(
            roller.roll(7, request).unwrap(),
            roller.roll(7, request).unwrap()
        );
    }

    #[test]
    fn faces_stay_in_range() {
        let roller = SeededDiceRoller::new();
        for seed in 0..200 {
            let dice = roll_checked(&roller, seed, RollRequest::new(D4, 3)).unwrap();
            assert_eq!(dice.len(), 3);
        }
    }

    #[test]
    fn zero_sided_dice_are_rejected() {
        let roller = SeededDiceRoller::new();
        assert!(roller.roll(1, RollRequest::new(0, 1)).is_err());
    }
}
