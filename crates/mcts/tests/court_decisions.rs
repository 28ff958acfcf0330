//! Scenario tests driving the engine over the court test game.
//!
//! These exercise the whole decision cycle the way a host game loop would:
//! pick a move, advance the real game, feed the turn back into the tree,
//! and report the final outcome.

use coup_core::{Action, ActionKind, GameState, Seat};
use coup_mcts::games::{CourtCard, CourtState, MaterialHeuristic};
use coup_mcts::{Mcts, NoContest, SearchConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

type CourtEngine = Mcts<CourtState, MaterialHeuristic, NoContest, ChaCha8Rng>;

fn engine_over(state: &CourtState, config: SearchConfig) -> CourtEngine {
    Mcts::new(
        config,
        state.clone(),
        MaterialHeuristic,
        NoContest,
        ChaCha8Rng::seed_from_u64(99),
    )
    .unwrap()
}

/// With a one-card opponent and a full purse, only a finishing blow ends the
/// game on the spot; lines that dawdle let the armed opponent strike back.
/// The search must prefer the kill.
#[test]
fn test_finds_finishing_blow() {
    let state = CourtState::with_setup(
        [10, 3],
        [vec![CourtCard::Duke], vec![CourtCard::Assassin]],
        vec![],
        5,
    );
    let config = SearchConfig {
        num_simulations: 250,
        max_depth: 6,
        ..SearchConfig::default()
    };
    let mut engine = engine_over(&state, config);

    let best = engine.best_move(&state).expect("a move must exist");
    assert!(
        matches!(best.kind, ActionKind::Coup | ActionKind::Assassinate),
        "expected a finishing blow, got {}",
        best
    );

    // Playing it out with no contest ends the game with the agent standing.
    let mut played = state.clone();
    let forfeits = played.holdings(Seat::Opponent);
    let resolution = coup_core::Resolution {
        forfeits,
        ..Default::default()
    };
    played.apply_action(&best, &resolution);
    assert!(played.is_terminal());
    assert_eq!(played.active_participants(), vec![Seat::Agent]);
}

/// After a real turn, the chosen child becomes the root with its statistics
/// intact: no information is lost on reuse.
#[test]
fn test_root_advancement_preserves_statistics() {
    let state = CourtState::new(21);
    let mut engine = engine_over(&state, SearchConfig::for_testing());

    let best = engine.best_move(&state).expect("a move must exist");

    let root = engine.tree().root();
    let (visits, reward) = engine
        .tree()
        .get(root)
        .children()
        .iter()
        .find(|(a, _)| *a == best)
        .map(|&(_, id)| {
            let node = engine.tree().get(id);
            (node.visits(), node.reward())
        })
        .expect("the chosen action must have a child");

    engine.handle_action(&best);

    let new_root = engine.tree().root();
    assert_eq!(engine.tree().get(new_root).action(), Some(best));
    assert_eq!(engine.tree().get(new_root).visits(), visits);
    assert_eq!(engine.tree().get(new_root).reward(), reward);
}

/// An off-tree action (for instance, an opponent surprise the search never
/// expanded) discards the tree rather than advancing it.
#[test]
fn test_off_tree_action_discards_tree() {
    let state = CourtState::new(21);
    let mut engine = engine_over(&state, SearchConfig::for_testing());
    engine.best_move(&state);

    engine.handle_action(&Action::new(ActionKind::Coup, Seat::Opponent));

    let root = engine.tree().root();
    assert_eq!(engine.tree().get(root).visits(), 0);
    assert!(engine.tree().get(root).is_leaf());
}

/// The real outcome flows into the persisted tree after the game ends.
#[test]
fn test_outcome_adjusts_persisted_tree() {
    let state = CourtState::new(21);
    let mut engine = engine_over(&state, SearchConfig::for_testing());

    let best = engine.best_move(&state).expect("a move must exist");
    engine.handle_action(&best);

    let root = engine.tree().root();
    let reward = engine.tree().get(root).reward();
    let visits = engine.tree().get(root).visits();

    engine.handle_game_over(Seat::Opponent);
    assert_eq!(engine.tree().get(root).reward(), reward - 20);
    assert_eq!(engine.tree().get(root).visits(), visits + 1);

    engine.handle_game_over(Seat::Agent);
    assert_eq!(engine.tree().get(root).reward(), reward);
    assert_eq!(engine.tree().get(root).visits(), visits + 2);
}

/// Consecutive decisions keep working against the advancing tree.
#[test]
fn test_repeated_decisions_stay_legal() {
    let mut state = CourtState::new(33);
    let mut engine = engine_over(&state, SearchConfig::for_testing());

    for _ in 0..4 {
        if state.is_terminal() {
            break;
        }
        let best = match engine.best_move(&state) {
            Some(action) => action,
            None => break,
        };
        assert!(state.available_actions(Seat::Agent).contains(&best));

        let forfeits = match best.kind {
            ActionKind::Coup | ActionKind::Assassinate => state
                .holdings(Seat::Opponent)
                .into_iter()
                .take(1)
                .collect(),
            _ => Vec::new(),
        };
        let resolution = coup_core::Resolution {
            forfeits,
            ..Default::default()
        };
        state.apply_action(&best, &resolution);
        engine.handle_action(&best);
        if !state.is_terminal() {
            state.advance_turn();
            // The opponent passes its turn straight back in this drill.
            state.advance_turn();
        }
    }
}
