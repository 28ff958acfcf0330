//! The game-state contract the search engine consumes.

use crate::{Action, Seat};
use rand::RngCore;

/// Outcome of the claim/counter-claim phase for one applied action, plus any
/// cards the resolution forces out of the target's hand.
///
/// By the time the engine calls [`GameState::apply_action`] the action has
/// already survived its challenge and block resolution (card losses for a
/// failed challenge or an overturned block are applied by the engine before
/// the effect). The flags record how the action was contested for state
/// implementations that care; the effect itself must apply unconditionally.
#[derive(Clone, Debug)]
pub struct Resolution<C> {
    pub challenged: bool,
    pub blocked: bool,
    /// Cards the target must surrender as part of the effect (coup,
    /// assassination).
    pub forfeits: Vec<C>,
}

impl<C> Default for Resolution<C> {
    fn default() -> Self {
        Self {
            challenged: false,
            blocked: false,
            forfeits: Vec::new(),
        }
    }
}

/// An opaque, cloneable snapshot of the game the search can simulate on.
///
/// The engine never constructs one of these; it clones the snapshot it was
/// given and drives the clone forward. `Clone` must produce an independent
/// deep copy, since every selection step and every rollout ply operates on
/// its own copy.
pub trait GameState: Clone {
    /// Hidden influence card type. Opaque to the engine; it only moves cards
    /// between the heuristic's choice and [`GameState::surrender_card`].
    type Card: Clone + PartialEq;

    /// True once the game has ended.
    fn is_terminal(&self) -> bool;

    /// The seat to move, or none once the game has ended.
    fn current_actor(&self) -> Option<Seat>;

    /// Legal actions for a seat, in a stable order.
    fn available_actions(&self, seat: Seat) -> Vec<Action>;

    /// Re-validates that an action is performable right now. The search
    /// orchestrator uses this to defend against cached tree children whose
    /// legality went stale between decisions.
    fn can_perform(&self, action: &Action) -> bool;

    /// A 64-bit digest of the decision-relevant state. Must be stable across
    /// state-equivalent clones and differ with high probability for
    /// non-equivalent states; used as the transposition key.
    fn canonical_hash(&self) -> u64;

    /// True if the implicit claim behind `action` would withstand a
    /// challenge (the actor actually holds the claimed role).
    fn claim_holds(&self, action: &Action) -> bool;

    /// Applies an action's effect. Only called for actions that survived
    /// resolution; see [`Resolution`].
    fn apply_action(&mut self, action: &Action, resolution: &Resolution<Self::Card>);

    /// Passes the turn to the next seat.
    fn advance_turn(&mut self);

    /// Seats still holding influence, in seat order. May be empty.
    fn active_participants(&self) -> Vec<Seat>;

    /// The cards a seat currently holds.
    fn holdings(&self, seat: Seat) -> Vec<Self::Card>;

    /// Removes a specific card from a seat's hand (a deliberate surrender,
    /// chosen by the heuristic when the seat is the agent).
    fn surrender_card(&mut self, seat: Seat, card: &Self::Card);

    /// Removes a random card from a seat's hand (how non-agent participants
    /// lose influence in simulation). No-op on an empty hand.
    fn lose_random_influence(&mut self, seat: Seat, rng: &mut dyn RngCore);
}
