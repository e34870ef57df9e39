//! Per-turn state.
//!
//! A [`Turn`] is a plain value. Move application clones it, changes the clone
//! and hands back the new one, so a transition can be checked by comparing
//! whole snapshots before and after.
//!
//! Phases only move forward along the edges of [`transition_graph`]. The one
//! exception is re-entering the current phase (a lost challenge followed by an
//! assassination puts the same turn in `LoseInfluence` twice); doing that
//! [`SAME_PHASE_LIMIT`] times in a single turn means the turn is stuck.

use std::fmt::{Debug, Display, Formatter};
use std::sync::OnceLock;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use crate::action::{ActionKind, Claim, Counteraction};
use crate::error::{CoupError, Result};

pub const SAME_PHASE_LIMIT: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Action,
    ActionResponse,
    CounterResponse,
    LoseInfluence,
    ExchangeInfluence,
    Done,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Action => "wait-action",
            Phase::ActionResponse => "wait-action-response",
            Phase::CounterResponse => "wait-counter-response",
            Phase::LoseInfluence => "wait-lose-influence",
            Phase::ExchangeInfluence => "wait-exchange-influence",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

static TRANSITIONS: OnceLock<DiGraphMap<Phase, ()>> = OnceLock::new();

/// Every phase change a turn is allowed to make.
pub fn transition_graph() -> &'static DiGraphMap<Phase, ()> {
    TRANSITIONS.get_or_init(|| {
        DiGraphMap::from_edges([
            // income and coup skip the response window
            (Phase::Action, Phase::ActionResponse),
            (Phase::Action, Phase::LoseInfluence),
            (Phase::Action, Phase::Done),
            (Phase::ActionResponse, Phase::CounterResponse),
            (Phase::ActionResponse, Phase::LoseInfluence),
            (Phase::ActionResponse, Phase::ExchangeInfluence),
            (Phase::ActionResponse, Phase::Done),
            (Phase::CounterResponse, Phase::LoseInfluence),
            (Phase::CounterResponse, Phase::Done),
            // challenge loss, then the deferred action
            (Phase::LoseInfluence, Phase::LoseInfluence),
            (Phase::LoseInfluence, Phase::ExchangeInfluence),
            (Phase::LoseInfluence, Phase::Done),
            (Phase::ExchangeInfluence, Phase::Done),
        ])
    })
}

/// Result of the most recent challenge in a turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeOutcome {
    pub claim: Claim,
    pub accuser: usize,
    pub accused: usize,
    pub winner: usize,
    pub loser: usize,
}

impl ChallengeOutcome {
    pub fn claim_stood(&self) -> bool {
        self.winner == self.accused
    }

    /// Whether the pending action still goes ahead once the loser has paid.
    pub fn action_survives(&self) -> bool {
        match self.claim {
            Claim::Action(_) => self.claim_stood(),
            Claim::Counter(_) => !self.claim_stood(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Turn {
    pub(crate) number: usize,
    pub(crate) phase: Phase,
    pub(crate) actor: usize,

    pub(crate) action: Option<ActionKind>,
    pub(crate) target: Option<usize>,
    pub(crate) action_applied: bool,

    pub(crate) counter: Option<Counteraction>,
    pub(crate) counter_player: Option<usize>,

    pub(crate) challenge: Option<ChallengeOutcome>,
    pub(crate) influence_loser: Option<usize>,

    pub(crate) passed: Vec<usize>,
    pub(crate) passes_remaining: usize,

    pub(crate) pending_discards: usize,

    same_phase_changes: usize,
}

impl Debug for Turn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("T {} | P {} | {}", self.number, self.actor, self.phase))?;
        if let Some(action) = self.action {
            f.write_fmt(format_args!(" | {}", action.as_str()))?;
            if let Some(target) = self.target {
                f.write_fmt(format_args!(" -> P {target}"))?;
            }
        }
        if let (Some(counter), Some(counter_player)) = (self.counter, self.counter_player) {
            f.write_fmt(format_args!(" | P {counter_player} {}", counter.as_str()))?;
        }
        if let Some(loser) = self.influence_loser {
            f.write_fmt(format_args!(" | loser P {loser}"))?;
        }
        f.write_fmt(format_args!(" | passes left {}", self.passes_remaining))
    }
}

impl Turn {
    pub fn new(number: usize, actor: usize) -> Self {
        Self {
            number,
            phase: Phase::Action,
            actor,
            action: None,
            target: None,
            action_applied: false,
            counter: None,
            counter_player: None,
            challenge: None,
            influence_loser: None,
            passed: Vec::new(),
            passes_remaining: 0,
            pending_discards: 0,
            same_phase_changes: 0,
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn actor(&self) -> usize {
        self.actor
    }

    pub fn action(&self) -> Option<ActionKind> {
        self.action
    }

    pub fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn counter(&self) -> Option<(usize, Counteraction)> {
        self.counter_player.zip(self.counter)
    }

    pub fn challenge(&self) -> Option<&ChallengeOutcome> {
        self.challenge.as_ref()
    }

    pub fn influence_loser(&self) -> Option<usize> {
        self.influence_loser
    }

    pub fn passes_remaining(&self) -> usize {
        self.passes_remaining
    }

    pub fn pending_discards(&self) -> usize {
        self.pending_discards
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub(crate) fn change_phase(&mut self, next: Phase) -> Result<()> {
        if !transition_graph().contains_edge(self.phase, next) {
            return Err(CoupError::BadTurnState(format!(
                "no transition from {} to {}", self.phase, next
            )));
        }

        if next == self.phase {
            self.same_phase_changes += 1;
            if self.same_phase_changes >= SAME_PHASE_LIMIT {
                return Err(CoupError::BadTurnState(format!(
                    "re-entered {} {} times", next, self.same_phase_changes
                )));
            }
        }

        self.phase = next;
        Ok(())
    }

    /// Size the pass window for the claim currently on the table. A targeted
    /// action or a pending counter needs a single pass, anything else needs
    /// every living opponent of the actor.
    pub(crate) fn open_response_window(&mut self, living_players: usize) {
        self.passed.clear();
        self.passes_remaining = if self.target.is_some() || self.counter.is_some() {
            1
        } else {
            living_players.saturating_sub(1)
        };
    }

    pub fn has_passed(&self, player_idx: usize) -> bool {
        self.passed.contains(&player_idx)
    }

    /// Whether a player still gets a say in the currently open window.
    pub fn awaits_response_from(&self, player_idx: usize) -> bool {
        if self.has_passed(player_idx) {
            return false;
        }

        match self.phase {
            Phase::ActionResponse => match self.target {
                Some(target) => player_idx == target,
                None => player_idx != self.actor,
            },
            Phase::CounterResponse => player_idx == self.actor,
            _ => false,
        }
    }

    pub(crate) fn record_pass(&mut self, player_idx: usize) {
        self.passed.push(player_idx);
        self.passes_remaining = self.passes_remaining.saturating_sub(1);
    }

    pub(crate) fn all_passed(&self) -> bool {
        self.passes_remaining == 0
    }

    pub(crate) fn set_influence_loser(&mut self, player_idx: usize) {
        self.influence_loser = Some(player_idx);
    }

    pub(crate) fn record_challenge(&mut self, outcome: ChallengeOutcome) {
        self.influence_loser = Some(outcome.loser);
        self.challenge = Some(outcome);
    }
}
