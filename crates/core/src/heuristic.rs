//! Heuristic and chance-model contracts.
//!
//! Both are injected into the engine as strategy objects, so tests can
//! substitute deterministic stubs for every randomized decision point.

use crate::{Action, GameState, Seat};

/// Position evaluation and non-search action selection.
///
/// The engine uses this three ways: to drive the agent's side of rollouts,
/// to score positions for the mercy rule and for no-winner reward leaning,
/// and to pick which card the agent surrenders when it loses influence.
pub trait Heuristic<S: GameState> {
    /// Picks an action for the agent from a non-empty candidate list.
    /// Returns `None` only when `actions` is empty.
    fn select_action(&self, actions: &[Action], state: &S) -> Option<Action>;

    /// An integer score for a seat's standing; higher is better.
    fn evaluate_position(&self, state: &S, seat: Seat) -> i32;

    /// Which card the agent gives up when forced to lose influence.
    /// Returns `None` only when the seat holds no cards.
    fn select_card_to_surrender(&self, state: &S, seat: Seat) -> Option<S::Card>;
}

/// Models how simulated participants contest actions.
///
/// Called once per simulated ply for each axis; implementations are free to
/// flip coins, inspect the state, or answer from a script.
pub trait ChanceModel<S: GameState> {
    /// Does anyone dispute the truth of this action's claim?
    fn challenges(&mut self, state: &S, action: &Action) -> bool;

    /// Does the rival counter-claim a block?
    fn blocks(&mut self, state: &S, action: &Action) -> bool;

    /// Is a declared block itself successfully challenged?
    fn challenges_block(&mut self, state: &S, action: &Action) -> bool;
}
