//! One room's game: roster, seats, deck, the running turn and turn rotation.
//!
//! The game is synchronous and expects its owner to serialize calls, one
//! `apply_move` at a time per room.

use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use crate::action::{Move, Submission, Target};
use crate::config::GameConfig;
use crate::deck::Deck;
use crate::error::{CoupError, Result};
use crate::history::{MoveLog, MoveRecord};
use crate::legality;
use crate::player::Player;
use crate::rules::{self, MoveTarget, Table};
use crate::turn::Turn;

pub const MAX_SEATS: usize = 6;
pub const MIN_PLAYERS: usize = 2;
pub const STARTING_HAND: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    pub(crate) name: String,
    pub(crate) config: GameConfig,
    pub(crate) table: Table,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) seats: [Option<String>; MAX_SEATS],
    pub(crate) turn_player_idx: usize,
    pub(crate) turn: Option<Turn>,
    pub(crate) started: bool,
    pub(crate) finished: bool,
    games_played: u64,
    log: MoveLog,
}

impl Game {
    pub fn new(name: impl Into<String>, config: GameConfig) -> Self {
        let deck = Deck::new(config.deck, config.seed);
        Self {
            name: name.into(),
            config,
            table: Table { players: Vec::with_capacity(MAX_SEATS), deck },
            index: HashMap::new(),
            seats: Default::default(),
            turn_player_idx: 0,
            turn: None,
            started: false,
            finished: false,
            games_played: 0,
            log: MoveLog::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn players(&self) -> &[Player] {
        &self.table.players
    }

    pub fn player(&self, name: &str) -> Result<&Player> {
        Ok(&self.table.players[self.player_idx(name)?])
    }

    pub fn deck(&self) -> &Deck {
        &self.table.deck
    }

    pub fn turn(&self) -> Option<&Turn> {
        self.turn.as_ref()
    }

    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_empty(&self) -> bool {
        self.table.players.is_empty()
    }

    pub fn num_players(&self) -> usize {
        self.table.players.len()
    }

    pub fn turn_player(&self) -> Option<&Player> {
        if self.started {
            self.table.players.get(self.turn_player_idx)
        } else {
            None
        }
    }

    pub fn seat_of(&self, name: &str) -> Option<usize> {
        self.seats.iter().position(|seat| seat.as_deref() == Some(name))
    }

    /// How long the room should wait before playing default moves, only while
    /// a game is running.
    pub fn move_timeout(&self) -> Option<Duration> {
        if self.started {
            self.config.move_timeout
        } else {
            None
        }
    }

    fn player_idx(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| CoupError::UnknownPlayer(name.to_string()))
    }

    fn rebuild_index(&mut self) {
        self.index = self.table.players
            .iter()
            .enumerate()
            .map(|(idx, player)| (player.name.clone(), idx))
            .collect();
    }

    /// Seat a new player. Returns the seat taken, or `None` if the name was
    /// already at the table.
    pub fn add_player(&mut self, name: &str, seat: Option<usize>) -> Result<Option<usize>> {
        if self.index.contains_key(name) {
            debug!(room = %self.name, "{name} rejoined");
            return Ok(None);
        }

        if self.started {
            return Err(CoupError::BadGameState(format!("{name} can't join a game in progress")));
        }

        if let Some(seat) = seat {
            if seat >= MAX_SEATS {
                return Err(CoupError::InvalidSeat(seat));
            }
            if self.seats[seat].is_some() {
                return Err(CoupError::SeatOccupied(seat));
            }
        }

        if self.table.players.len() >= MAX_SEATS {
            return Err(CoupError::GameIsFull);
        }

        let seat = match seat {
            Some(seat) => seat,
            None => self.seats
                .iter()
                .position(Option::is_none)
                .ok_or(CoupError::GameIsFull)?,
        };

        if self.finished {
            self.reopen_lobby();
        }

        let mut player = Player::new(name);
        player.coins = self.config.starting_coins;
        self.table.players.push(player);
        self.index.insert(name.to_string(), self.table.players.len() - 1);
        self.seats[seat] = Some(name.to_string());

        info!(room = %self.name, seat, "{name} joined");
        Ok(Some(seat))
    }

    pub fn remove_player(&mut self, name: &str) -> Result<()> {
        if self.started {
            return Err(CoupError::BadGameState(format!("{name} can't leave a game in progress")));
        }

        let idx = self.player_idx(name)?;
        if self.finished {
            self.reopen_lobby();
        }
        self.table.players.remove(idx);
        self.rebuild_index();
        if let Some(seat) = self.seat_of(name) {
            self.seats[seat] = None;
        }

        info!(room = %self.name, "{name} left");
        Ok(())
    }

    /// Forget the last game so the roster can change: hands go back, every
    /// player is in again and the room shows the lobby until the next start.
    fn reopen_lobby(&mut self) {
        for player in self.table.players.iter_mut() {
            player.reset(self.config.starting_coins);
        }
        self.table.deck = Deck::new(self.config.deck, self.config.seed);
        self.turn = None;
        self.finished = false;
        self.log.clear();
        debug!(room = %self.name, "back to the lobby");
    }

    pub fn change_seat(&mut self, name: &str, seat: usize) -> Result<()> {
        if self.started {
            return Err(CoupError::BadGameState("seats are fixed once the game starts".into()));
        }
        self.player_idx(name)?;

        if seat >= MAX_SEATS {
            return Err(CoupError::InvalidSeat(seat));
        }

        match &self.seats[seat] {
            Some(occupant) if occupant == name => return Ok(()),
            Some(_) => return Err(CoupError::SeatOccupied(seat)),
            None => {}
        }

        if let Some(old_seat) = self.seat_of(name) {
            self.seats[old_seat] = None;
        }
        self.seats[seat] = Some(name.to_string());
        Ok(())
    }

    /// Shuffle, deal and hand the first turn to the first player who joined.
    /// Calling it again after a game resets everything for a rematch.
    pub fn start(&mut self) -> Result<()> {
        let count = self.table.players.len();
        if count < MIN_PLAYERS {
            return Err(CoupError::NotEnoughPlayers { count });
        }

        let seed = self.config.seed.map(|seed| seed.wrapping_add(self.games_played));
        let mut deck = Deck::new(self.config.deck, seed);

        for player in self.table.players.iter_mut() {
            player.reset(self.config.starting_coins);
            for _ in 0..STARTING_HAND {
                if player.draw_from(&mut deck).is_none() {
                    return Err(CoupError::BadGameState("court deck ran out while dealing".into()));
                }
            }
        }

        self.table.deck = deck;
        self.games_played += 1;
        self.turn_player_idx = 0;
        self.turn = Some(Turn::new(0, 0));
        self.started = true;
        self.finished = false;
        self.log.clear();

        info!(room = %self.name, players = count, "game started");
        Ok(())
    }

    fn resolve_target(&self, target: Option<&Target>) -> Result<Option<MoveTarget>> {
        match target {
            None => Ok(None),
            Some(Target::Card(card)) => Ok(Some(MoveTarget::Card(*card))),
            Some(Target::Player(name)) => {
                let idx = self.index
                    .get(name)
                    .copied()
                    .ok_or_else(|| CoupError::BadPlayerMove(format!("no player named {name:?} to target")))?;
                if !self.table.players[idx].is_in_game() {
                    return Err(CoupError::BadPlayerMove(format!("{name} is already out of the game")));
                }
                Ok(Some(MoveTarget::Player(idx)))
            }
        }
    }

    pub fn apply_move(&mut self, player: &str, mv: Move, target: Option<Target>) -> Result<()> {
        if !self.started {
            return Err(CoupError::BadGameState("game is not running".into()));
        }

        let player_idx = self.player_idx(player)?;
        let turn = self.turn
            .as_ref()
            .ok_or_else(|| CoupError::BadTurnState("running game without a turn".into()))?;

        let resolved = self.resolve_target(target.as_ref())?;

        // work on copies so a rejected move leaves the room exactly as it was
        let mut table = self.table.clone();
        let next = rules::apply_move(turn, &mut table, player_idx, mv, resolved)
            .map_err(|err| {
                warn!(room = %self.name, "{player} tried {mv}: {err}");
                err
            })?;

        match &target {
            Some(target) => info!(room = %self.name, "{player} used {mv} on {target}"),
            None => info!(room = %self.name, "{player} used {mv}"),
        }

        self.log.push(MoveRecord {
            turn: next.number(),
            player: player.to_string(),
            mv,
            // exchange discards stay secret
            target: match mv {
                Move::DiscardInfluence => None,
                _ => target.map(|target| target.to_string()),
            },
        });

        self.table = table;
        let done = next.is_done();
        self.turn = Some(next);

        if self.table.living_players() == 1 {
            self.finish();
        } else if done {
            self.next_turn();
        }

        Ok(())
    }

    /// Apply a move as it arrived from a client. The move decides whether the
    /// target string names a player or a card.
    pub fn submit(&mut self, submission: &Submission) -> Result<()> {
        let mv = submission.mv;
        let target = match submission.target.as_deref() {
            None => None,
            Some(card) if mv.needs_card_target() => Some(Target::Card(card.parse()?)),
            Some(name) if mv.needs_player_target() => Some(Target::Player(name.to_string())),
            Some(extra) => {
                return Err(CoupError::BadPlayerMove(format!("{mv} takes no target, got {extra:?}")));
            }
        };
        self.apply_move(&submission.player, submission.mv, target)
    }

    fn finish(&mut self) {
        self.finished = true;
        self.started = false;
        if let Some(winner) = self.get_winner() {
            info!(room = %self.name, "game finished, winner {}", winner.name());
        }
    }

    fn next_turn(&mut self) {
        self.turn_player_idx = self.next_living_player();
        let number = self.turn.as_ref().map_or(0, |turn| turn.number() + 1);
        self.turn = Some(Turn::new(number, self.turn_player_idx));

        debug!(room = %self.name, turn = number, "turn {} : {}", self.turn_player_idx, self.table.players[self.turn_player_idx].name());
    }

    fn next_living_player(&self) -> usize {
        let len = self.table.players.len();
        (1..=len)
            .map(|n| (self.turn_player_idx + n) % len)
            .find(|&idx| self.table.players[idx].is_in_game())
            .unwrap_or(self.turn_player_idx)
    }

    pub fn get_winner(&self) -> Option<&Player> {
        if !self.finished {
            return None;
        }
        self.table.players.iter().find(|player| player.is_in_game())
    }

    pub fn legal_moves(&self, player: &str) -> Result<Vec<Move>> {
        let player_idx = self.player_idx(player)?;
        match (&self.turn, self.started) {
            (Some(turn), true) => Ok(legality::legal_moves(turn, &self.table.players, player_idx)),
            _ => Ok(vec![]),
        }
    }

    /// Legal moves as the strings clients send back.
    pub fn interface(&self, player: &str) -> Result<Vec<String>> {
        Ok(self.legal_moves(player)?.iter().map(Move::to_string).collect())
    }

    pub fn default_move(&self, player: &str) -> Result<Option<(Move, Option<Target>)>> {
        let player_idx = self.player_idx(player)?;
        match (&self.turn, self.started) {
            (Some(turn), true) => Ok(legality::default_move(turn, &self.table.players, player_idx)),
            _ => Ok(None),
        }
    }

    /// Play the default move for everyone who currently owes one, in roster
    /// order. Returns how many moves were made.
    pub fn apply_default_moves(&mut self) -> Result<usize> {
        let owing: Vec<String> = self.table.players
            .iter()
            .map(|player| player.name.clone())
            .filter(|name| self.legal_moves(name).is_ok_and(|moves| !moves.is_empty()))
            .collect();

        let mut applied = 0;
        for name in owing {
            if !self.started {
                break;
            }
            if let Some((mv, target)) = self.default_move(&name)? {
                self.apply_move(&name, mv, target)?;
                applied += 1;
            }
        }
        Ok(applied)
    }
}


#[cfg(test)]
mod properties {
    use proptest::prelude::*;
    use crate::action::{Move, Target};
    use crate::config::{DeckComposition, GameConfig};
    use crate::game::Game;
    use crate::legality::other_player_indexes;
    use crate::turn::Phase;

    fn total_cards(game: &Game) -> usize {
        game.deck().len()
            + game.players()
                .iter()
                .map(|player| player.influence().len() + player.revealed().len())
                .sum::<usize>()
    }

    /// Pick a random legal move for someone who owes one and play it.
    fn random_step(game: &mut Game, choice: u64) -> Result<(), TestCaseError> {
        let candidates: Vec<(usize, Vec<Move>)> = (0..game.num_players())
            .map(|idx| (idx, game.legal_moves(game.players()[idx].name()).unwrap()))
            .filter(|(_, moves)| !moves.is_empty())
            .collect();
        prop_assert!(!candidates.is_empty(), "running game with nobody to move");

        let (player_idx, moves) = &candidates[choice as usize % candidates.len()];
        let mv = moves[(choice / 7) as usize % moves.len()];
        let player = game.players()[*player_idx].clone();

        let target = if mv.needs_player_target() {
            let opponents = other_player_indexes(game.players(), *player_idx);
            let opponent = opponents[(choice / 13) as usize % opponents.len()];
            Some(Target::Player(game.players()[opponent].name().to_string()))
        } else if mv.needs_card_target() {
            let hand = player.influence();
            Some(Target::Card(hand[(choice / 13) as usize % hand.len()]))
        } else {
            None
        };

        let coins_before: u32 = game.players().iter().map(|p| p.coins() as u32).sum();
        let result = game.apply_move(player.name(), mv, target);
        prop_assert!(result.is_ok(), "legal move {} by {} rejected: {:?}", mv, player.name(), result);
        let coins_after: u32 = game.players().iter().map(|p| p.coins() as u32).sum();
        prop_assert!(coins_after <= coins_before + 3);
        Ok(())
    }

    proptest! {
        #[test]
        fn random_games_keep_invariants(
            seed in any::<u64>(),
            num_players in 2usize..=6,
            legacy in any::<bool>(),
            choices in prop::collection::vec(any::<u64>(), 1..300),
        ) {
            let deck = if legacy { DeckComposition::Legacy } else { DeckComposition::Standard };
            let mut game = Game::new("prop", GameConfig::default().with_seed(seed).with_deck(deck));
            for idx in 0..num_players {
                game.add_player(&format!("player{idx}"), None).unwrap();
            }
            game.start().unwrap();
            prop_assert_eq!(game.deck().len(), 15 - 2 * num_players);

            for choice in choices {
                if game.is_finished() {
                    break;
                }

                let exchanging_before = game.turn().map(|turn| turn.phase()) == Some(Phase::ExchangeInfluence);
                let actor = game.turn().unwrap().actor();

                random_step(&mut game, choice)?;

                prop_assert_eq!(total_cards(&game), 15);
                for player in game.players() {
                    prop_assert_eq!(player.is_in_game(), !player.influence().is_empty());
                    prop_assert!(player.influence().len() + player.revealed().len() <= 4);
                }

                // a finished exchange always leaves two cards behind
                let exchanging_after = game.turn().map(|turn| turn.phase()) == Some(Phase::ExchangeInfluence);
                if exchanging_before && !exchanging_after && game.players()[actor].is_in_game() {
                    prop_assert_eq!(game.players()[actor].influence().len() + game.players()[actor].revealed().len(), 2);
                }

                let living = game.players().iter().filter(|player| player.is_in_game()).count();
                prop_assert_eq!(game.is_finished(), living == 1);
                if game.is_finished() {
                    prop_assert!(!game.is_started());
                    prop_assert!(game.get_winner().is_some());
                } else {
                    prop_assert!(game.turn_player().unwrap().is_in_game());
                }
            }
        }

        #[test]
        fn default_moves_always_apply(seed in any::<u64>(), num_players in 2usize..=6) {
            let mut game = Game::new("prop", GameConfig::default().with_seed(seed));
            for idx in 0..num_players {
                game.add_player(&format!("player{idx}"), None).unwrap();
            }
            game.start().unwrap();

            // income forever, then forced coups, until someone wins
            for _ in 0..500 {
                if game.is_finished() {
                    break;
                }
                prop_assert!(game.apply_default_moves().unwrap() > 0);
            }
            prop_assert!(game.is_finished());
        }
    }
}
