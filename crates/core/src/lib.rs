//! Coup Core - collaborator contracts for the decision engine
//!
//! This crate defines the vocabulary and trait seams the Monte Carlo tree
//! search engine consumes: seats and the closed action set, the cloneable
//! game-state snapshot, and the injectable heuristic and chance-model
//! strategies. The engine itself lives in `coup-mcts`; the full rules engine
//! of the game is a host-application concern and only appears here as the
//! [`GameState`] contract.
//!
//! # Types
//!
//! - [`Seat`], [`ActionKind`], [`Action`] - identity vocabulary
//! - [`GameState`], [`Resolution`] - the simulated-state contract
//! - [`Heuristic`], [`ChanceModel`] - injectable strategies
//! - [`EngineError`], [`Result`] - error surface

mod action;
mod error;
mod heuristic;
mod state;

pub use action::{Action, ActionKind, Seat};
pub use error::{EngineError, Result};
pub use heuristic::{ChanceModel, Heuristic};
pub use state::{GameState, Resolution};
