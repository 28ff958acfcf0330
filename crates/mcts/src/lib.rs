//! Monte Carlo tree search for a hidden-information bluffing card game.
//!
//! This crate provides the decision engine consumed once per turn by a
//! surrounding game loop: it receives the live game state and returns the
//! agent's chosen action, or none.
//!
//! # Features
//!
//! - **UCB1 selection** with unvisited-first ordering and a tunable
//!   exploration constant
//! - **Mixed rollout policy**: heuristic play for the agent, uniform random
//!   for the opponent, with challenge/block resolution through an
//!   injectable chance model
//! - **Transposition table** with depth-aware entry reuse, rebuilt per
//!   decision
//! - **Online pruning** of branches whose score collapses relative to their
//!   parent
//! - **Tree reuse** across real turns, plus learning from the actual game
//!   outcome
//!
//! # Example
//!
//! ```
//! use coup_mcts::games::{CourtState, MaterialHeuristic};
//! use coup_mcts::{Mcts, NoContest, SearchConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let state = CourtState::new(42);
//! let rng = ChaCha8Rng::seed_from_u64(7);
//! let mut engine = Mcts::new(
//!     SearchConfig::for_testing(),
//!     state.clone(),
//!     MaterialHeuristic,
//!     NoContest,
//!     rng,
//! )
//! .unwrap();
//!
//! let action = engine.best_move(&state);
//! assert!(action.is_some());
//! ```

pub mod chance;
pub mod config;
pub mod games;
mod node;
pub mod search;
pub mod table;
mod tree;

pub use chance::{NoContest, RandomChance};
pub use config::{SearchConfig, TieBreak};
pub use node::{Node, NodeId};
pub use search::Mcts;
pub use table::{TranspositionEntry, TranspositionTable};
pub use tree::Tree;
