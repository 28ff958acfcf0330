//! Chance-model implementations.
//!
//! The engine samples every challenge/block decision through an injected
//! [`ChanceModel`], so opponents' dispute behavior stays swappable: a
//! coin-flip model for real searches, [`NoContest`] for deterministic tests.

use coup_core::{Action, ChanceModel, GameState};
use rand::Rng;

/// Coin-flip chance model over an injected RNG.
pub struct RandomChance<R: Rng> {
    rng: R,
    challenge_odds: f64,
    block_odds: f64,
}

impl<R: Rng> RandomChance<R> {
    /// Even odds on every dispute axis.
    pub fn new(rng: R) -> Self {
        Self::with_odds(rng, 0.5, 0.5)
    }

    /// Custom per-axis odds; block challenges reuse the challenge odds.
    pub fn with_odds(rng: R, challenge_odds: f64, block_odds: f64) -> Self {
        Self {
            rng,
            challenge_odds,
            block_odds,
        }
    }
}

impl<S: GameState, R: Rng> ChanceModel<S> for RandomChance<R> {
    fn challenges(&mut self, _state: &S, _action: &Action) -> bool {
        self.rng.gen_bool(self.challenge_odds)
    }

    fn blocks(&mut self, _state: &S, _action: &Action) -> bool {
        self.rng.gen_bool(self.block_odds)
    }

    fn challenges_block(&mut self, _state: &S, _action: &Action) -> bool {
        self.rng.gen_bool(self.challenge_odds)
    }
}

/// A world where nothing is ever disputed. Useful in tests that need
/// simulations to play out deterministically.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoContest;

impl<S: GameState> ChanceModel<S> for NoContest {
    fn challenges(&mut self, _state: &S, _action: &Action) -> bool {
        false
    }

    fn blocks(&mut self, _state: &S, _action: &Action) -> bool {
        false
    }

    fn challenges_block(&mut self, _state: &S, _action: &Action) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::CourtState;
    use coup_core::{ActionKind, Seat};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn probe() -> (CourtState, Action) {
        (
            CourtState::new(7),
            Action::new(ActionKind::Tax, Seat::Opponent),
        )
    }

    #[test]
    fn test_no_contest() {
        let (state, action) = probe();
        let mut model = NoContest;
        assert!(!ChanceModel::<CourtState>::challenges(&mut model, &state, &action));
        assert!(!ChanceModel::<CourtState>::blocks(&mut model, &state, &action));
        assert!(!ChanceModel::<CourtState>::challenges_block(&mut model, &state, &action));
    }

    #[test]
    fn test_random_chance_extremes() {
        let (state, action) = probe();

        let rng = ChaCha8Rng::seed_from_u64(1);
        let mut always = RandomChance::with_odds(rng, 1.0, 1.0);
        for _ in 0..20 {
            assert!(ChanceModel::<CourtState>::challenges(&mut always, &state, &action));
            assert!(ChanceModel::<CourtState>::blocks(&mut always, &state, &action));
        }

        let rng = ChaCha8Rng::seed_from_u64(1);
        let mut never = RandomChance::with_odds(rng, 0.0, 0.0);
        for _ in 0..20 {
            assert!(!ChanceModel::<CourtState>::challenges(&mut never, &state, &action));
            assert!(!ChanceModel::<CourtState>::blocks(&mut never, &state, &action));
        }
    }

    #[test]
    fn test_random_chance_deterministic_per_seed() {
        let (state, action) = probe();

        let run = |seed: u64| -> Vec<bool> {
            let rng = ChaCha8Rng::seed_from_u64(seed);
            let mut model = RandomChance::new(rng);
            (0..32)
                .map(|_| ChanceModel::<CourtState>::challenges(&mut model, &state, &action))
                .collect()
        };

        assert_eq!(run(42), run(42));
    }
}
