//! Which moves a player may submit right now. Nothing in here mutates state,
//! the transport layer calls it freely to build client hints.

use tracing::warn;
use crate::action::{ActionKind, Move, Target};
use crate::player::Player;
use crate::turn::{Phase, Turn};

pub const FORCED_COUP_COINS: u8 = 10;

/// Actions affordable with `coins`, in the order they're offered.
pub fn actions_from_coins(coins: u8) -> Vec<ActionKind> {
    if coins >= FORCED_COUP_COINS {
        return vec![ActionKind::Coup];
    }

    ActionKind::ALL
        .iter()
        .copied()
        .filter(|action| coins >= action.cost())
        .collect()
}

/// Living players other than `exclude_idx`, starting from the seat after it.
pub(crate) fn other_player_indexes(players: &[Player], exclude_idx: usize) -> Vec<usize> {
    (1..players.len())
        .map(|n| (exclude_idx + n) % players.len())
        .filter(|&idx| players[idx].is_in_game())
        .collect()
}

pub fn legal_moves(turn: &Turn, players: &[Player], player_idx: usize) -> Vec<Move> {
    let player = match players.get(player_idx) {
        Some(player) if player.is_in_game() => player,
        _ => return vec![],
    };

    match turn.phase() {
        Phase::Action => {
            if player_idx != turn.actor() {
                return vec![];
            }
            actions_from_coins(player.coins())
                .into_iter()
                .map(Move::Action)
                .collect()
        }
        Phase::ActionResponse => {
            if !turn.awaits_response_from(player_idx) {
                return vec![];
            }

            let mut moves = vec![Move::Pass];
            if let Some(action) = turn.action() {
                if let Some(counter) = action.counter() {
                    moves.push(Move::Counter(counter));
                }
                if action.is_challengeable() {
                    moves.push(Move::Challenge);
                }
            }
            moves
        }
        Phase::CounterResponse => {
            if turn.awaits_response_from(player_idx) {
                vec![Move::Pass, Move::Challenge]
            } else {
                vec![]
            }
        }
        Phase::LoseInfluence => {
            if turn.influence_loser() == Some(player_idx) {
                vec![Move::LoseInfluence]
            } else {
                vec![]
            }
        }
        Phase::ExchangeInfluence => {
            if player_idx == turn.actor() {
                vec![Move::DiscardInfluence; turn.pending_discards()]
            } else {
                vec![]
            }
        }
        Phase::Done => vec![],
    }
}

/// The move played for someone who doesn't answer in time. Always the
/// cheapest safe option, never a random one.
pub fn default_move(turn: &Turn, players: &[Player], player_idx: usize) -> Option<(Move, Option<Target>)> {
    let moves = legal_moves(turn, players, player_idx);
    if moves.is_empty() {
        return None;
    }

    let income = Move::Action(ActionKind::Income);
    let coup = Move::Action(ActionKind::Coup);

    if moves.contains(&income) {
        return Some((income, None));
    }

    if moves.contains(&coup) {
        let opponent_idx = *other_player_indexes(players, player_idx).first()?;
        return Some((coup, Some(Target::Player(players[opponent_idx].name().to_string()))));
    }

    if moves.contains(&Move::LoseInfluence) || moves.contains(&Move::DiscardInfluence) {
        let card = *players[player_idx].influence().first()?;
        return Some((moves[0], Some(Target::Card(card))));
    }

    if moves.contains(&Move::Pass) {
        return Some((Move::Pass, None));
    }

    warn!(player = players[player_idx].name(), "no default for {:?}, using first legal move", moves);
    Some((moves[0], None))
}

#[cfg(test)]
mod tests {
    use crate::action::ActionKind::{Assassinate, Coup, Exchange, ForeignAid, Income, Steal, Tax};
    use crate::action::{Move, Target};
    use crate::card::CardType::{Contessa, Duke};
    use crate::legality::{actions_from_coins, default_move, legal_moves, other_player_indexes};
    use crate::player::{Player, PlayerStatus};
    use crate::turn::{Phase, Turn};

    fn players(n: usize) -> Vec<Player> {
        (0..n)
            .map(|idx| {
                let mut player = Player::new(format!("player{idx}"));
                player.influence = vec![Duke, Contessa];
                player
            })
            .collect()
    }

    #[test]
    fn affordable_actions() {
        assert_eq!(actions_from_coins(0), vec![Income, ForeignAid, Exchange, Steal, Tax]);
        assert_eq!(actions_from_coins(3), vec![Income, ForeignAid, Exchange, Steal, Tax, Assassinate]);
        assert_eq!(actions_from_coins(7), vec![Income, ForeignAid, Exchange, Steal, Tax, Assassinate, Coup]);
        assert_eq!(actions_from_coins(9).len(), 7);
        assert_eq!(actions_from_coins(10), vec![Coup]);
        assert_eq!(actions_from_coins(14), vec![Coup]);
    }

    #[test]
    fn only_actor_acts() {
        let players = players(3);
        let turn = Turn::new(0, 1);
        assert!(legal_moves(&turn, &players, 0).is_empty());
        assert_eq!(legal_moves(&turn, &players, 1).len(), 5);
        assert!(legal_moves(&turn, &players, 7).is_empty());
    }

    #[test]
    fn eliminated_players_have_no_moves() {
        let mut players = players(3);
        players[1].influence.clear();
        players[1].status = PlayerStatus::Eliminated;

        let turn = Turn::new(0, 1);
        assert!(legal_moves(&turn, &players, 1).is_empty());
        assert_eq!(other_player_indexes(&players, 0), vec![2]);
    }

    #[test]
    fn response_moves() {
        let players = players(3);

        let mut turn = Turn::new(0, 0);
        turn.action = Some(ForeignAid);
        turn.phase = Phase::ActionResponse;
        turn.open_response_window(3);
        assert!(legal_moves(&turn, &players, 0).is_empty());
        assert_eq!(
            legal_moves(&turn, &players, 1),
            vec![Move::Pass, Move::Counter(crate::action::Counteraction::BlockForeignAid)]
        );

        let mut turn = Turn::new(0, 0);
        turn.action = Some(Tax);
        turn.phase = Phase::ActionResponse;
        turn.open_response_window(3);
        assert_eq!(legal_moves(&turn, &players, 2), vec![Move::Pass, Move::Challenge]);

        let mut turn = Turn::new(0, 0);
        turn.action = Some(Steal);
        turn.target = Some(2);
        turn.phase = Phase::ActionResponse;
        turn.open_response_window(3);
        assert!(legal_moves(&turn, &players, 1).is_empty());
        assert_eq!(
            legal_moves(&turn, &players, 2),
            vec![Move::Pass, Move::Counter(crate::action::Counteraction::BlockSteal), Move::Challenge]
        );
    }

    #[test]
    fn discard_offered_per_pending_card() {
        let players = players(2);
        let mut turn = Turn::new(0, 0);
        turn.phase = Phase::ExchangeInfluence;
        turn.pending_discards = 2;
        assert_eq!(legal_moves(&turn, &players, 0), vec![Move::DiscardInfluence, Move::DiscardInfluence]);
        assert!(legal_moves(&turn, &players, 1).is_empty());
    }

    #[test]
    fn defaults() {
        let mut players = players(3);

        let turn = Turn::new(0, 0);
        assert_eq!(default_move(&turn, &players, 0), Some((Move::Action(Income), None)));
        assert_eq!(default_move(&turn, &players, 1), None);

        players[0].coins = 10;
        assert_eq!(
            default_move(&turn, &players, 0),
            Some((Move::Action(Coup), Some(Target::Player("player1".into()))))
        );

        let mut turn = Turn::new(0, 0);
        turn.phase = Phase::LoseInfluence;
        turn.influence_loser = Some(2);
        assert_eq!(default_move(&turn, &players, 2), Some((Move::LoseInfluence, Some(Target::Card(Duke)))));

        let mut turn = Turn::new(0, 0);
        turn.action = Some(Tax);
        turn.phase = Phase::ActionResponse;
        turn.open_response_window(3);
        assert_eq!(default_move(&turn, &players, 1), Some((Move::Pass, None)));
    }
}
