//! Move application. Every move is checked against [`legal_moves`] and its
//! target validated before anything is touched, then applied in one go.

use tracing::{debug, info};
use crate::action::{ActionKind, Claim, Move};
use crate::card::CardType;
use crate::deck::Deck;
use crate::error::{CoupError, Result};
use crate::legality::legal_moves;
use crate::player::Player;
use crate::turn::{ChallengeOutcome, Phase, Turn};

pub const MAX_STEAL: u8 = 2;
pub const EXCHANGE_DRAW: usize = 2;

/// Everything a move can change outside the turn itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    pub(crate) players: Vec<Player>,
    pub(crate) deck: Deck,
}

impl Table {
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn living_players(&self) -> usize {
        self.players.iter().filter(|player| player.is_in_game()).count()
    }
}

/// A move target after names have been resolved to seats.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveTarget {
    Player(usize),
    Card(CardType),
}

pub fn apply_move(
    turn: &Turn,
    table: &mut Table,
    player_idx: usize,
    mv: Move,
    target: Option<MoveTarget>,
) -> Result<Turn> {
    if !legal_moves(turn, &table.players, player_idx).contains(&mv) {
        let name = table.players.get(player_idx).map(Player::name).unwrap_or("?");
        return Err(CoupError::BadPlayerMove(format!(
            "{name} may not {mv} during {}", turn.phase()
        )));
    }

    let mut turn = turn.clone();

    match turn.phase {
        Phase::Action => on_action(&mut turn, table, mv, target)?,
        Phase::ActionResponse => on_action_response(&mut turn, table, player_idx, mv)?,
        Phase::CounterResponse => on_counter_response(&mut turn, table, player_idx, mv)?,
        Phase::LoseInfluence => on_lose_influence(&mut turn, table, player_idx, target)?,
        Phase::ExchangeInfluence => on_exchange_influence(&mut turn, table, player_idx, target)?,
        Phase::Done => return Err(CoupError::BadTurnState("turn is already over".into())),
    }

    Ok(turn)
}

fn card_target(target: Option<MoveTarget>) -> Result<CardType> {
    match target {
        Some(MoveTarget::Card(card)) => Ok(card),
        _ => Err(CoupError::BadPlayerMove(format!("expected a card target, got {target:?}"))),
    }
}

fn on_action(turn: &mut Turn, table: &mut Table, mv: Move, target: Option<MoveTarget>) -> Result<()> {
    let action = match mv {
        Move::Action(action) => action,
        _ => return Err(CoupError::BadPlayerMove(format!("expected an action, got {mv}"))),
    };

    let actor = turn.actor;
    let target_idx = if action.is_targetable() {
        match target {
            Some(MoveTarget::Player(idx)) if idx == actor => {
                return Err(CoupError::BadPlayerMove(format!("can't {} yourself", action.as_str())));
            }
            Some(MoveTarget::Player(idx)) if table.players.get(idx).is_some_and(Player::is_in_game) => Some(idx),
            _ => {
                return Err(CoupError::BadPlayerMove(format!(
                    "{} needs a living opponent as target", action.as_str()
                )));
            }
        }
    } else {
        None
    };

    let cost = action.cost();
    if table.players[actor].coins < cost {
        return Err(CoupError::BadPlayerMove(format!("{} costs {cost}", action.as_str())));
    }

    // validated, from here on nothing fails on the player's account
    table.players[actor].coins -= cost;
    turn.action = Some(action);
    turn.target = target_idx;

    if !action.is_counterable() && !action.is_challengeable() {
        resolve_action(turn, table)
    } else {
        turn.open_response_window(table.living_players());
        turn.change_phase(Phase::ActionResponse)
    }
}

fn on_action_response(turn: &mut Turn, table: &mut Table, responder: usize, mv: Move) -> Result<()> {
    let action = turn.action
        .ok_or_else(|| CoupError::BadTurnState("waiting on a response without an action".into()))?;

    match mv {
        Move::Pass => {
            turn.record_pass(responder);
            if turn.all_passed() {
                resolve_action(turn, table)?;
            }
            Ok(())
        }
        Move::Challenge => {
            let outcome = contest(table, turn.actor, responder, Claim::Action(action))?;
            turn.record_challenge(outcome);
            turn.change_phase(Phase::LoseInfluence)
        }
        Move::Counter(counter) if action.counter() == Some(counter) => {
            turn.counter = Some(counter);
            turn.counter_player = Some(responder);
            turn.open_response_window(table.living_players());
            turn.change_phase(Phase::CounterResponse)
        }
        _ => Err(CoupError::BadPlayerMove(format!("{mv} is not a response to {}", action.as_str()))),
    }
}

fn on_counter_response(turn: &mut Turn, table: &mut Table, actor: usize, mv: Move) -> Result<()> {
    match mv {
        Move::Pass => {
            turn.record_pass(actor);
            if turn.all_passed() {
                debug!(turn = turn.number, "counter stands");
                turn.change_phase(Phase::Done)?;
            }
            Ok(())
        }
        Move::Challenge => {
            let (counter_player, counter) = turn.counter()
                .ok_or_else(|| CoupError::BadTurnState("challenging a counter that was never played".into()))?;
            let outcome = contest(table, counter_player, actor, Claim::Counter(counter))?;
            turn.record_challenge(outcome);
            turn.change_phase(Phase::LoseInfluence)
        }
        _ => Err(CoupError::BadPlayerMove(format!("{mv} is not a response to a counter"))),
    }
}

fn on_lose_influence(turn: &mut Turn, table: &mut Table, loser: usize, target: Option<MoveTarget>) -> Result<()> {
    let card = card_target(target)?;
    if !table.players[loser].lose_influence(card) {
        return Err(CoupError::BadPlayerMove(format!(
            "{} has no {card} to lose", table.players[loser].name()
        )));
    }

    let deferred = !turn.action_applied
        && turn.challenge.as_ref().is_some_and(ChallengeOutcome::action_survives);

    if deferred {
        resolve_action(turn, table)
    } else {
        turn.change_phase(Phase::Done)
    }
}

fn on_exchange_influence(turn: &mut Turn, table: &mut Table, actor: usize, target: Option<MoveTarget>) -> Result<()> {
    let card = card_target(target)?;
    let Table { players, deck } = table;
    if !players[actor].return_to_deck(card, deck) {
        return Err(CoupError::BadPlayerMove(format!(
            "{} has no {card} to discard", players[actor].name()
        )));
    }

    turn.pending_discards -= 1;
    if turn.pending_discards == 0 {
        turn.change_phase(Phase::Done)?;
    }
    Ok(())
}

/// Carry out the pending action now that nobody stands in its way.
fn resolve_action(turn: &mut Turn, table: &mut Table) -> Result<()> {
    let action = turn.action
        .ok_or_else(|| CoupError::BadTurnState("resolving a turn with no action".into()))?;
    let actor = turn.actor;
    turn.action_applied = true;

    match action {
        ActionKind::Income => gain(table, actor, 1),
        ActionKind::ForeignAid => gain(table, actor, 2),
        ActionKind::Tax => gain(table, actor, 3),
        ActionKind::Steal => {
            let target_idx = required_target(turn, action)?;
            let amount = table.players[target_idx].coins.min(MAX_STEAL);
            table.players[target_idx].coins -= amount;
            gain(table, actor, amount);
        }
        ActionKind::Assassinate | ActionKind::Coup => {
            let target_idx = required_target(turn, action)?;
            // the target may already be out after losing a challenge this turn
            if table.players[target_idx].is_in_game() {
                turn.set_influence_loser(target_idx);
                return turn.change_phase(Phase::LoseInfluence);
            }
        }
        ActionKind::Exchange => {
            let Table { players, deck } = table;
            let drawn = (0..EXCHANGE_DRAW)
                .filter_map(|_| players[actor].draw_from(deck))
                .count();
            turn.pending_discards = drawn;
            if drawn > 0 {
                return turn.change_phase(Phase::ExchangeInfluence);
            }
        }
    }

    turn.change_phase(Phase::Done)
}

fn required_target(turn: &Turn, action: ActionKind) -> Result<usize> {
    turn.target
        .ok_or_else(|| CoupError::BadTurnState(format!("{} without a target", action.as_str())))
}

fn gain(table: &mut Table, player_idx: usize, coins: u8) {
    let player = &mut table.players[player_idx];
    player.coins = player.coins.saturating_add(coins);
}

/// Settle a challenge. The accused wins if any held card backs the claim,
/// in which case that card is swapped for a fresh one from the deck.
pub(crate) fn contest(table: &mut Table, accused: usize, accuser: usize, claim: Claim) -> Result<ChallengeOutcome> {
    let Table { players, deck } = table;
    let proof = players[accused].influence().iter().copied().find(|card| card.backs(claim));

    let (winner, loser) = match proof {
        Some(card) => {
            if !players[accused].exchange_card(card, deck) {
                return Err(CoupError::BadTurnState(format!("couldn't swap proven {card}")));
            }
            (accused, accuser)
        }
        None => (accuser, accused),
    };

    info!(
        accuser = players[accuser].name(),
        accused = players[accused].name(),
        winner = players[winner].name(),
        "challenge on {:?}", claim
    );

    Ok(ChallengeOutcome { claim, accuser, accused, winner, loser })
}
