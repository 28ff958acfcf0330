//! A compact two-seat bluffing game for search validation.
//!
//! Five court roles, coins, and a small draw pile: enough of the real game
//! to exercise every engine path (bluffable claims, challenges, blocks,
//! influence loss, state-randomizing exchanges) while staying small enough
//! that tests can rig exact positions.

use coup_core::{Action, ActionKind, GameState, Heuristic, Resolution, Seat};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// A court role card.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CourtCard {
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
}

impl CourtCard {
    const ALL: [CourtCard; 5] = [
        CourtCard::Duke,
        CourtCard::Assassin,
        CourtCard::Captain,
        CourtCard::Ambassador,
        CourtCard::Contessa,
    ];

    /// The role an action's claim rests on, if any.
    fn claimed_by(kind: ActionKind) -> Option<CourtCard> {
        match kind {
            ActionKind::Tax => Some(CourtCard::Duke),
            ActionKind::Steal => Some(CourtCard::Captain),
            ActionKind::Assassinate => Some(CourtCard::Assassin),
            ActionKind::Exchange => Some(CourtCard::Ambassador),
            _ => None,
        }
    }

    /// Rough usefulness rank, used by [`MaterialHeuristic`] to decide which
    /// card to give up first.
    fn rank(self) -> u8 {
        match self {
            CourtCard::Duke => 5,
            CourtCard::Captain => 4,
            CourtCard::Assassin => 3,
            CourtCard::Ambassador => 2,
            CourtCard::Contessa => 1,
        }
    }
}

impl fmt::Display for CourtCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CourtCard::Duke => "Duke",
            CourtCard::Assassin => "Assassin",
            CourtCard::Captain => "Captain",
            CourtCard::Ambassador => "Ambassador",
            CourtCard::Contessa => "Contessa",
        };
        write!(f, "{}", name)
    }
}

const ASSASSINATE_COST: u8 = 3;
const COUP_COST: u8 = 7;

/// Game state: two seats with coins and hidden hands, plus a draw pile.
///
/// Carries its own seeded RNG for state-randomizing effects (which cards an
/// exchange keeps), so clones replay deterministically.
#[derive(Clone, Debug)]
pub struct CourtState {
    coins: [u8; 2],
    hands: [Vec<CourtCard>; 2],
    deck: Vec<CourtCard>,
    turn: Seat,
    rng: ChaCha8Rng,
}

fn seat_index(seat: Seat) -> usize {
    match seat {
        Seat::Agent => 0,
        Seat::Opponent => 1,
    }
}

impl CourtState {
    /// Standard setup: three copies of each role shuffled, two cards dealt
    /// to each seat, two coins each, agent to move.
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut deck: Vec<CourtCard> = CourtCard::ALL
            .iter()
            .flat_map(|&c| std::iter::repeat(c).take(3))
            .collect();
        // Fisher-Yates with the state's own stream.
        for i in (1..deck.len()).rev() {
            let j = rng.gen_range(0..=i);
            deck.swap(i, j);
        }
        let hands = [
            vec![deck.pop().unwrap(), deck.pop().unwrap()],
            vec![deck.pop().unwrap(), deck.pop().unwrap()],
        ];
        Self {
            coins: [2, 2],
            hands,
            deck,
            turn: Seat::Agent,
            rng,
        }
    }

    /// Rigged setup for tests: explicit coins, hands, and draw pile.
    pub fn with_setup(
        coins: [u8; 2],
        hands: [Vec<CourtCard>; 2],
        deck: Vec<CourtCard>,
        seed: u64,
    ) -> Self {
        Self {
            coins,
            hands,
            deck,
            turn: Seat::Agent,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn coins(&self, seat: Seat) -> u8 {
        self.coins[seat_index(seat)]
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    fn remove_card(&mut self, seat: Seat, card: &CourtCard) {
        let hand = &mut self.hands[seat_index(seat)];
        if let Some(pos) = hand.iter().position(|c| c == card) {
            hand.remove(pos);
        }
    }

    fn exchange(&mut self, seat: Seat) {
        let i = seat_index(seat);
        let keep = self.hands[i].len();
        let mut pool: Vec<CourtCard> = self.hands[i].drain(..).collect();
        for _ in 0..2 {
            if let Some(card) = self.deck.pop() {
                pool.push(card);
            }
        }
        for _ in 0..keep {
            let pick = self.rng.gen_range(0..pool.len());
            let card = pool.swap_remove(pick);
            self.hands[i].push(card);
        }
        // Unkept cards go back under the pile.
        self.deck.extend(pool);
    }
}

impl GameState for CourtState {
    type Card = CourtCard;

    fn is_terminal(&self) -> bool {
        self.hands[0].is_empty() || self.hands[1].is_empty()
    }

    fn current_actor(&self) -> Option<Seat> {
        if self.is_terminal() {
            None
        } else {
            Some(self.turn)
        }
    }

    fn available_actions(&self, seat: Seat) -> Vec<Action> {
        let coins = self.coins(seat);
        let mut actions = vec![
            Action::new(ActionKind::Income, seat),
            Action::new(ActionKind::ForeignAid, seat),
            Action::new(ActionKind::Tax, seat),
            Action::new(ActionKind::Steal, seat),
            Action::new(ActionKind::Exchange, seat),
        ];
        if coins >= ASSASSINATE_COST {
            actions.push(Action::new(ActionKind::Assassinate, seat));
        }
        if coins >= COUP_COST {
            actions.push(Action::new(ActionKind::Coup, seat));
        }
        actions
    }

    fn can_perform(&self, action: &Action) -> bool {
        match action.kind {
            ActionKind::Assassinate => self.coins(action.seat) >= ASSASSINATE_COST,
            ActionKind::Coup => self.coins(action.seat) >= COUP_COST,
            _ => true,
        }
    }

    fn canonical_hash(&self) -> u64 {
        // FNV-1a over the decision-relevant fields. Hand contents are folded
        // as per-role counts so card order never distinguishes states; the
        // draw pile and rng stream are hidden information and excluded, so
        // converging lines hash alike.
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |b: u8| {
            h ^= b as u64;
            h = h.wrapping_mul(0x0000_0100_0000_01b3);
        };
        mix(self.coins[0]);
        mix(self.coins[1]);
        for hand in &self.hands {
            for role in CourtCard::ALL {
                let count = hand.iter().filter(|c| **c == role).count() as u8;
                mix(count);
            }
        }
        mix(seat_index(self.turn) as u8);
        h
    }

    fn claim_holds(&self, action: &Action) -> bool {
        match CourtCard::claimed_by(action.kind) {
            Some(role) => self.hands[seat_index(action.seat)].contains(&role),
            None => true,
        }
    }

    fn apply_action(&mut self, action: &Action, resolution: &Resolution<CourtCard>) {
        let actor = seat_index(action.seat);
        let rival = seat_index(action.seat.rival());
        match action.kind {
            ActionKind::Income => self.coins[actor] += 1,
            ActionKind::ForeignAid => self.coins[actor] += 2,
            ActionKind::Tax => self.coins[actor] += 3,
            ActionKind::Steal => {
                let take = self.coins[rival].min(2);
                self.coins[rival] -= take;
                self.coins[actor] += take;
            }
            ActionKind::Assassinate => {
                self.coins[actor] = self.coins[actor].saturating_sub(ASSASSINATE_COST);
                for card in &resolution.forfeits {
                    self.remove_card(action.seat.rival(), card);
                }
            }
            ActionKind::Coup => {
                self.coins[actor] = self.coins[actor].saturating_sub(COUP_COST);
                for card in &resolution.forfeits {
                    self.remove_card(action.seat.rival(), card);
                }
            }
            ActionKind::Exchange => self.exchange(action.seat),
        }
    }

    fn advance_turn(&mut self) {
        self.turn = self.turn.rival();
    }

    fn active_participants(&self) -> Vec<Seat> {
        [Seat::Agent, Seat::Opponent]
            .into_iter()
            .filter(|&s| !self.hands[seat_index(s)].is_empty())
            .collect()
    }

    fn holdings(&self, seat: Seat) -> Vec<CourtCard> {
        self.hands[seat_index(seat)].clone()
    }

    fn surrender_card(&mut self, seat: Seat, card: &CourtCard) {
        self.remove_card(seat, card);
    }

    fn lose_random_influence(&mut self, seat: Seat, rng: &mut dyn RngCore) {
        let hand = &mut self.hands[seat_index(seat)];
        if !hand.is_empty() {
            let pick = rng.gen_range(0..hand.len());
            hand.remove(pick);
        }
    }
}

/// Material-counting heuristic: influence is worth far more than coins, and
/// finishing blows come before economy.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialHeuristic;

impl MaterialHeuristic {
    const CARD_WORTH: i32 = 15;

    const PREFERENCE: [ActionKind; 7] = [
        ActionKind::Coup,
        ActionKind::Assassinate,
        ActionKind::Tax,
        ActionKind::Steal,
        ActionKind::ForeignAid,
        ActionKind::Exchange,
        ActionKind::Income,
    ];
}

impl Heuristic<CourtState> for MaterialHeuristic {
    fn select_action(&self, actions: &[Action], _state: &CourtState) -> Option<Action> {
        Self::PREFERENCE
            .iter()
            .find_map(|&kind| actions.iter().find(|a| a.kind == kind).copied())
            .or_else(|| actions.first().copied())
    }

    fn evaluate_position(&self, state: &CourtState, seat: Seat) -> i32 {
        Self::CARD_WORTH * state.holdings(seat).len() as i32 + state.coins(seat) as i32
    }

    fn select_card_to_surrender(&self, state: &CourtState, seat: Seat) -> Option<CourtCard> {
        state.holdings(seat).into_iter().min_by_key(|c| c.rank())
    }
}
