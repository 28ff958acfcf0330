//! Search configuration parameters.
//!
//! These parameters control the behavior of the Monte Carlo tree search.
//! They are tunables of the engine, not rules of the game; the defaults
//! reproduce the tuning the engine shipped with.

use coup_core::{EngineError, Result, Seat};
use serde::{Deserialize, Serialize};

/// Who wins a heuristic score comparison when both sides score equally.
///
/// Applied when a rollout ends without a resolved winner and the two seats'
/// position scores must break the tie.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TieBreak {
    Agent,
    Opponent,
}

impl TieBreak {
    /// The seat favored by comparing `agent_score` against `opponent_score`
    /// under this policy.
    pub fn favored(self, agent_score: i32, opponent_score: i32) -> Seat {
        if agent_score > opponent_score {
            Seat::Agent
        } else if opponent_score > agent_score {
            Seat::Opponent
        } else {
            match self {
                TieBreak::Agent => Seat::Agent,
                TieBreak::Opponent => Seat::Opponent,
            }
        }
    }
}

/// Search configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of simulations per decision.
    pub num_simulations: usize,

    /// Maximum tree/rollout depth in plies.
    pub max_depth: usize,

    /// UCB1 exploration constant. Higher values spread visits across
    /// siblings; lower values exploit the current best line.
    pub exploration: f64,

    /// Visit count a node must exceed before it is eligible for pruning.
    pub prune_threshold: u32,

    /// A node is pruned when its score drops below this fraction of its
    /// parent's score. Must be in (0, 1].
    pub prune_factor: f64,

    /// Minimum number of nodes freshly expanded during a selection walk
    /// before the transposition table is consulted.
    pub table_warmup: usize,

    /// Rollouts are abandoned once the agent's heuristic score falls more
    /// than this many points below the opponent's (the mercy rule).
    pub mercy_margin: i32,

    /// Reward magnitude for a resolved winner.
    pub win_reward: i64,

    /// Reward magnitude when no winner was resolved and the heuristic
    /// comparison leans one way.
    pub lean_reward: i64,

    /// Tie policy for heuristic score comparisons.
    pub tie_break: TieBreak,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_simulations: 500,
            max_depth: 12,
            exploration: std::f64::consts::SQRT_2,
            prune_threshold: 300,
            prune_factor: 0.75,
            table_warmup: 10,
            mercy_margin: 30,
            win_reward: 20,
            lean_reward: 10,
            tie_break: TieBreak::Agent,
        }
    }
}

impl SearchConfig {
    /// Create a config with the specified simulation budget.
    pub fn with_simulations(num_simulations: usize) -> Self {
        Self {
            num_simulations,
            ..Default::default()
        }
    }

    /// Small budgets for fast tests.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 50,
            max_depth: 6,
            ..Default::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidConfig` for parameter combinations that
    /// would produce a degenerate search (non-finite exploration, a pruning
    /// fraction outside (0, 1], a zero pruning threshold or depth).
    pub fn validate(&self) -> Result<()> {
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "exploration constant {} must be finite and non-negative",
                self.exploration
            )));
        }
        if !self.prune_factor.is_finite() || self.prune_factor <= 0.0 || self.prune_factor > 1.0 {
            return Err(EngineError::InvalidConfig(format!(
                "prune factor {} must be in (0, 1]",
                self.prune_factor
            )));
        }
        if self.prune_threshold == 0 {
            return Err(EngineError::InvalidConfig(
                "prune threshold must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(EngineError::InvalidConfig(
                "max depth must be at least 1".to_string(),
            ));
        }
        if self.mercy_margin < 0 {
            return Err(EngineError::InvalidConfig(format!(
                "mercy margin {} must be non-negative",
                self.mercy_margin
            )));
        }
        Ok(())
    }
}
