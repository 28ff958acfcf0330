//! Monte Carlo tree search over a bluffing card game.
//!
//! Implements the full decision cycle:
//! 1. Selection: walk from the root using UCB1, expanding leaves on demand
//!    and consulting the transposition table once the walk has paid enough
//!    expansion cost
//! 2. Rollout: simulate forward with a mixed policy (heuristic for the
//!    agent, uniform random for the opponent), resolving challenges and
//!    blocks through the injected chance model
//! 3. Backpropagation: push the outcome up the path, pruning branches whose
//!    score has collapsed relative to their parent
//!
//! The engine also owns cross-turn tree reuse (`handle_action`) and learning
//! from the real game outcome (`handle_game_over`).

use coup_core::{Action, ChanceModel, GameState, Heuristic, Resolution, Result, Seat};
use rand::Rng;
use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::node::NodeId;
use crate::table::{TranspositionEntry, TranspositionTable};
use crate::tree::Tree;

/// The search engine.
///
/// Generic over:
/// - `S`: the game-state snapshot being searched
/// - `H`: the heuristic collaborator (rollout policy, scoring, card choice)
/// - `C`: the chance model deciding simulated challenges and blocks
/// - `R`: the random number generator (opponent moves, random card loss)
///
/// Single-threaded and synchronous; the only bounds on work are the
/// simulation count and depth fixed in the configuration.
pub struct Mcts<S, H, C, R>
where
    S: GameState,
    H: Heuristic<S>,
    C: ChanceModel<S>,
    R: Rng,
{
    config: SearchConfig,
    tree: Tree,
    table: TranspositionTable,
    root_state: S,
    heuristic: H,
    chance: C,
    rng: R,
    transposition_hits: u32,
    prune_count: u32,
}

impl<S, H, C, R> Mcts<S, H, C, R>
where
    S: GameState,
    H: Heuristic<S>,
    C: ChanceModel<S>,
    R: Rng,
{
    /// Create a new engine rooted at a snapshot of the game.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidConfig` if the configuration fails
    /// validation.
    pub fn new(config: SearchConfig, root_state: S, heuristic: H, chance: C, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tree: Tree::new(),
            table: TranspositionTable::new(),
            root_state,
            heuristic,
            chance,
            rng,
            transposition_hits: 0,
            prune_count: 0,
        })
    }

    /// Decide the agent's move from the live game state.
    ///
    /// Resets the per-decision counters and the transposition table, adopts
    /// a clone of `live` as the root snapshot, and runs the configured
    /// simulation budget. Root children are then reconciled against the
    /// live state: an action must still be legal *and* re-validate as
    /// performable to survive, which defends against the cached tree holding
    /// stale legality from an earlier snapshot. Survivors are ranked by
    /// descending score; if none survive, selection falls back to the
    /// heuristic over the live actions.
    ///
    /// Returns `None` when the game is already over or no action exists.
    pub fn best_move(&mut self, live: &S) -> Option<Action> {
        self.root_state = live.clone();
        if self.root_state.is_terminal() {
            return None;
        }
        self.transposition_hits = 0;
        self.prune_count = 0;
        self.table.clear();

        self.search(self.config.num_simulations, self.config.max_depth);

        let live_actions = live.available_actions(Seat::Agent);
        let mut ranked: Vec<(Action, NodeId)> = self
            .tree
            .get(self.tree.root())
            .children()
            .iter()
            .filter(|(a, _)| live_actions.contains(a))
            .filter(|(a, _)| live.can_perform(a))
            .copied()
            .collect();

        let c = self.config.exploration;
        ranked.sort_by(|&(_, x), &(_, y)| {
            self.tree
                .ucb1(y, c)
                .partial_cmp(&self.tree.ucb1(x, c))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for (rank, &(action, id)) in ranked.iter().enumerate() {
            let node = self.tree.get(id);
            debug!(
                rank = rank + 1,
                action = %action,
                visits = node.visits(),
                reward = node.reward(),
                score = self.tree.ucb1(id, c),
                "candidate"
            );
        }
        debug!(
            transposition_hits = self.transposition_hits,
            pruned = self.prune_count,
            "decision complete"
        );

        match ranked.first() {
            Some(&(action, _)) => Some(action),
            None => self.heuristic.select_action(&live_actions, &self.root_state),
        }
    }

    /// Run the select -> rollout -> backpropagate cycle exactly
    /// `num_simulations` times from the current root snapshot.
    pub fn search(&mut self, num_simulations: usize, max_depth: usize) {
        for _ in 0..num_simulations {
            let (frontier, state) = self.select_node(max_depth);
            let winner = self.rollout(&state, max_depth);
            self.backpropagate(frontier, winner, &state);
        }
    }

    /// Advance the persistent tree across a real turn. If the root has a
    /// child keyed by the action actually taken, that child becomes the new
    /// root with its subtree statistics intact; otherwise the tree is
    /// discarded and a fresh empty root is created.
    pub fn handle_action(&mut self, action: &Action) {
        if !self.tree.advance_root(action) {
            trace!(action = %action, "action outside the tree, starting over");
            self.tree.reset();
        }
    }

    /// Fold the real game outcome back into the persisted tree: a final
    /// reward adjustment at the root plus a visit along the retained
    /// ancestor chain.
    pub fn handle_game_over(&mut self, winner: Seat) {
        let delta = match winner {
            Seat::Agent => self.config.win_reward,
            Seat::Opponent => -self.config.win_reward,
        };
        let root = self.tree.root();
        self.tree.get_mut(root).add_reward(delta);

        let mut current = Some(root);
        while let Some(id) = current {
            self.tree.get_mut(id).record_visit();
            current = self.tree.get(id).parent();
        }
    }

    /// Number of transposition-table hits during the last decision.
    pub fn transposition_hits(&self) -> u32 {
        self.transposition_hits
    }

    /// Number of branches pruned during the last decision.
    pub fn prune_count(&self) -> u32 {
        self.prune_count
    }

    /// The search tree (for inspection and tests).
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Walk from the root to a frontier node, expanding leaves on demand.
    ///
    /// The transposition table is consulted only once this walk has freshly
    /// expanded `table_warmup` nodes, and an entry is reused only when its
    /// recorded depth covers the remaining depth budget. A walk that runs
    /// the full depth stores its endpoint in the table before returning;
    /// early exits do not store.
    fn select_node(&mut self, max_depth: usize) -> (NodeId, S) {
        let mut node = self.tree.root();
        let mut state = self.root_state.clone();
        let mut depth = 0usize;
        let mut expanded = 0usize;

        while depth < max_depth {
            if self.tree.get(node).is_leaf() {
                self.expand(node, &state);
                expanded += 1;
            }
            if self.tree.get(node).is_leaf() {
                // Terminal or no legal actions: nothing below here.
                return (node, state);
            }

            if expanded >= self.config.table_warmup {
                let hash = state.canonical_hash();
                if let Some(entry) = self.table.lookup(hash) {
                    if entry.covers(max_depth - depth) {
                        self.transposition_hits += 1;
                        trace!(hash, depth, "transposition hit");
                        return (entry.node, state);
                    }
                }
            }

            let child = self
                .tree
                .select_child(node, self.config.exploration)
                .expect("BUG: non-leaf node must yield a child selection");
            node = child;
            let action = self
                .tree
                .get(node)
                .action()
                .expect("BUG: non-root node carries its action");

            let challenged = self.chance.challenges(&state, &action);
            let blocked = self.chance.blocks(&state, &action);
            let mut next = state.clone();
            self.apply_resolved(&mut next, &action, challenged, blocked);
            next.advance_turn();
            state = next;
            depth += 1;
        }

        let hash = state.canonical_hash();
        let score = self.tree.ucb1(node, self.config.exploration);
        self.table.store(
            hash,
            TranspositionEntry {
                node,
                depth,
                score,
            },
        );
        (node, state)
    }

    /// Attach one child per legal action of the current actor. Terminal
    /// states and actor-less states expand to nothing.
    fn expand(&mut self, node: NodeId, state: &S) {
        if state.is_terminal() {
            return;
        }
        let Some(actor) = state.current_actor() else {
            return;
        };
        let actions = state.available_actions(actor);
        self.tree.add_children(node, &actions);
    }

    /// Simulate forward from the frontier up to `max_depth` additional
    /// plies. Returns the winner, or `None` when the line was abandoned
    /// (mercy rule) or no participant remained.
    fn rollout(&mut self, frontier: &S, max_depth: usize) -> Option<Seat> {
        let mut state = frontier.clone();
        let mut depth = 0usize;

        while !state.is_terminal() && depth < max_depth {
            if let Some(actor) = state.current_actor() {
                let actions = state.available_actions(actor);
                if !actions.is_empty() {
                    let action = if actor == Seat::Agent {
                        self.heuristic
                            .select_action(&actions, &state)
                            .expect("BUG: heuristic returned no action for a non-empty candidate list")
                    } else {
                        // Unknown opponent: uniform random.
                        actions[self.rng.gen_range(0..actions.len())]
                    };
                    let challenged = self.chance.challenges(&state, &action);
                    let blocked = self.chance.blocks(&state, &action);
                    self.apply_resolved(&mut state, &action, challenged, blocked);
                }
            }
            if !state.is_terminal() {
                state.advance_turn();
            }
            depth += 1;

            if !state.is_terminal() && self.should_abandon(&state) {
                trace!(depth, "rollout abandoned, agent hopelessly behind");
                return None;
            }
        }

        self.determine_winner(&state)
    }

    /// Resolve the claim/counter-claim phase and, if the action survives,
    /// apply its effect. Influence lost along the way is resolved
    /// immediately: the heuristic picks the agent's card, the opponent
    /// loses a random one.
    fn apply_resolved(&mut self, state: &mut S, action: &Action, challenged: bool, blocked: bool) {
        if !self.resolve_challenge(state, action, challenged) {
            return;
        }
        if !self.resolve_block(state, action, blocked) {
            return;
        }
        if state.is_terminal() {
            // Resolution itself ended the game; there is no effect to apply.
            return;
        }
        let resolution = Resolution {
            challenged,
            blocked,
            forfeits: self.forfeits_for(state, action),
        };
        state.apply_action(action, &resolution);
    }

    /// Returns whether the action goes ahead after any challenge. A caught
    /// bluff costs the actor a card and cancels the action; a verified
    /// claim costs the challenger a card.
    fn resolve_challenge(&mut self, state: &mut S, action: &Action, challenged: bool) -> bool {
        if state.is_terminal() {
            return true;
        }
        if !(action.can_be_challenged() && challenged) {
            return true;
        }
        if state.claim_holds(action) {
            self.lose_influence(state, action.seat.rival());
            true
        } else {
            self.lose_influence(state, action.seat);
            false
        }
    }

    /// Returns whether the action goes ahead after any block. A block that
    /// is itself successfully challenged costs the blocker a card and the
    /// action proceeds; otherwise the block stands.
    fn resolve_block(&mut self, state: &mut S, action: &Action, blocked: bool) -> bool {
        if state.is_terminal() {
            return true;
        }
        if !(action.can_be_blocked() && blocked) {
            return true;
        }
        if self.chance.challenges_block(state, action) {
            self.lose_influence(state, action.seat.rival());
            true
        } else {
            false
        }
    }

    fn lose_influence(&mut self, state: &mut S, seat: Seat) {
        if seat == Seat::Agent {
            if let Some(card) = self.heuristic.select_card_to_surrender(state, seat) {
                state.surrender_card(seat, &card);
            }
        } else {
            state.lose_random_influence(seat, &mut self.rng);
        }
    }

    /// Cards the effect forces the target to give up: coups and
    /// assassinations take the target's first held card.
    fn forfeits_for(&self, state: &S, action: &Action) -> Vec<S::Card> {
        use coup_core::ActionKind;
        match action.kind {
            ActionKind::Assassinate | ActionKind::Coup => state
                .holdings(action.seat.rival())
                .into_iter()
                .take(1)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Mercy rule: abandon lines where the agent has fallen hopelessly
    /// behind on the heuristic score.
    fn should_abandon(&self, state: &S) -> bool {
        let agent = self.heuristic.evaluate_position(state, Seat::Agent);
        let opponent = self.heuristic.evaluate_position(state, Seat::Opponent);
        agent < opponent - self.config.mercy_margin
    }

    /// Winner of a finished or depth-capped simulation. A terminal state is
    /// won by its sole remaining active participant (first active when more
    /// than one remains, none when none remain); a non-terminal state is
    /// decided by comparing heuristic scores under the configured tie
    /// policy.
    fn determine_winner(&self, state: &S) -> Option<Seat> {
        if !state.is_terminal() {
            let agent = self.heuristic.evaluate_position(state, Seat::Agent);
            let opponent = self.heuristic.evaluate_position(state, Seat::Opponent);
            return Some(self.config.tie_break.favored(agent, opponent));
        }
        state.active_participants().first().copied()
    }

    /// Push the simulation outcome up the path from the frontier to the
    /// root: +win_reward for an agent win, -win_reward for an opponent win,
    /// ±lean_reward by heuristic comparison on the frontier state when no
    /// winner was resolved.
    ///
    /// Each node on the way is also prune-checked: past the visit
    /// threshold, a node scoring below `prune_factor` of its parent is
    /// detached together with its subtree, and the pass stops immediately
    /// so a detached branch never receives further updates.
    fn backpropagate(&mut self, frontier: NodeId, winner: Option<Seat>, state: &S) {
        let delta = match winner {
            Some(Seat::Agent) => self.config.win_reward,
            Some(Seat::Opponent) => -self.config.win_reward,
            None => {
                let agent = self.heuristic.evaluate_position(state, Seat::Agent);
                let opponent = self.heuristic.evaluate_position(state, Seat::Opponent);
                match self.config.tie_break.favored(agent, opponent) {
                    Seat::Agent => self.config.lean_reward,
                    Seat::Opponent => -self.config.lean_reward,
                }
            }
        };

        let mut current = Some(frontier);
        while let Some(id) = current {
            self.tree.get_mut(id).record_visit();
            self.tree.get_mut(id).add_reward(delta);

            let parent = self.tree.get(id).parent();
            if let Some(pid) = parent {
                if self.tree.get(id).visits() > self.config.prune_threshold {
                    let score = self.tree.ucb1(id, self.config.exploration);
                    let parent_score = self.tree.ucb1(pid, self.config.exploration);
                    if score < parent_score * self.config.prune_factor {
                        let action = self
                            .tree
                            .get(id)
                            .action()
                            .expect("BUG: a parented node carries its action");
                        self.tree.detach(pid, &action);
                        self.prune_count += 1;
                        trace!(action = %action, score, parent_score, "branch pruned");
                        return;
                    }
                }
            }
            current = parent;
        }
    }
}
