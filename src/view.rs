//! Snapshots of a room for clients. The public view hides every card still in
//! hand, the private view shows the viewer their own.

use serde::Serialize;
use crate::card::CardType;
use crate::error::Result;
use crate::game::{Game, MAX_SEATS};
use crate::player::{Player, PlayerStatus};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "face", content = "card", rename_all = "kebab-case")]
pub enum CardFace {
    Folded,
    Hidden(CardType),
    Revealed(CardType),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeatView {
    pub seat: usize,
    pub player: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub player: String,
    pub seat: Option<usize>,
    /// order of play
    pub position: usize,
    pub coins: u8,
    pub cards: Vec<CardFace>,
    pub status: PlayerStatus,
    pub turn: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "players", rename_all = "kebab-case")]
pub enum GameView {
    /// seats before the first deal
    Lobby(Vec<SeatView>),
    Table(Vec<PlayerView>),
}

impl GameView {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Game {
    pub fn public_view(&self) -> GameView {
        self.view(None)
    }

    pub fn private_view(&self, viewer: &str) -> Result<GameView> {
        self.player(viewer)?;
        Ok(self.view(Some(viewer)))
    }

    fn view(&self, viewer: Option<&str>) -> GameView {
        if self.turn.is_none() {
            let seats = (0..MAX_SEATS)
                .map(|seat| SeatView { seat, player: self.seats[seat].clone() })
                .collect();
            return GameView::Lobby(seats);
        }

        let players = self.table.players
            .iter()
            .enumerate()
            .map(|(position, player)| PlayerView {
                player: player.name().to_string(),
                seat: self.seat_of(player.name()),
                position,
                coins: player.coins(),
                cards: card_faces(player, viewer == Some(player.name())),
                status: player.status(),
                turn: self.started && position == self.turn_player_idx,
            })
            .collect();
        GameView::Table(players)
    }
}

fn card_faces(player: &Player, own: bool) -> Vec<CardFace> {
    let held = player.influence().iter().map(|&card| {
        if own {
            CardFace::Hidden(card)
        } else {
            CardFace::Folded
        }
    });
    let revealed = player.revealed().iter().map(|&card| CardFace::Revealed(card));
    held.chain(revealed).collect()
}
