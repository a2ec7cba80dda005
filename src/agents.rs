//! Agents: the per-seat decision makers.
//!
//! Every seat gets one [`ActionPolicy`]. Automated strategies live in
//! [`bots`]; the interactive seat wraps a [`DecisionSource`] supplied by the
//! front-end and blocks on it until a decision arrives. [`PolicyTable`] maps
//! seats to policies so the betting round never branches on a strategy tag.

use crate::cards::Card;
use crate::config::TableConfig;
use crate::engine::TableView;
use crate::game::Street;
use crate::participant::{Participant, Strategy};
use core::fmt;
use rand::RngCore;
use std::collections::VecDeque;

mod bots;

pub use bots::{automated_policy, AggressivePolicy, CautiousPolicy, ErraticPolicy};

/// One turn's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Fold,
    /// Pay what is owed, or the whole stack when that is less.
    Call,
    /// Pay what is owed plus this many chips.
    Raise(u64),
    AllIn,
}

impl Decision {
    pub fn label(self) -> &'static str {
        match self {
            Decision::Fold => "Fold",
            Decision::Call => "Call",
            Decision::Raise(_) => "Raise",
            Decision::AllIn => "All-in",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PolicyError {
    #[error("interrupted by the player")]
    Interrupted,
    #[error("decision source failed: {0}")]
    Source(String),
}

/// Everything a policy may look at when it is asked to act.
pub struct DecisionContext<'a> {
    pub seat: usize,
    pub to_call: u64,
    /// Someone already raised in this round.
    pub any_raise: bool,
    /// Increment used when an interactive seat picks Raise.
    pub raise_step: u64,
    pub table: &'a dyn TableView,
}

impl DecisionContext<'_> {
    pub fn participant(&self) -> &Participant {
        &self.table.participants()[self.seat]
    }

    pub fn stack(&self) -> u64 {
        self.participant().stack()
    }

    pub fn pot(&self) -> u64 {
        self.table.pot()
    }

    pub fn street(&self) -> Street {
        self.table.street()
    }

    pub fn community(&self) -> &[Card] {
        self.table.community()
    }

    /// The choices offered to an interactive seat. Raise only appears when the
    /// stack covers more than the call.
    pub fn offered(&self) -> Vec<Decision> {
        let mut xs = vec![Decision::Fold, Decision::Call];
        if self.stack() > self.to_call {
            xs.push(Decision::Raise(self.raise_step));
        }
        xs.push(Decision::AllIn);
        xs
    }
}

impl fmt::Debug for DecisionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionContext")
            .field("seat", &self.seat)
            .field("to_call", &self.to_call)
            .field("any_raise", &self.any_raise)
            .field("pot", &self.pot())
            .field("street", &self.street())
            .finish()
    }
}

/// A seat's decision maker.
pub trait ActionPolicy {
    fn decide(
        &mut self,
        ctx: &DecisionContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Decision, PolicyError>;

    fn strategy(&self) -> Strategy;
}

/// External provider of interactive decisions. Calls may block indefinitely.
pub trait DecisionSource {
    fn request(&mut self, ctx: &DecisionContext<'_>) -> Result<Decision, PolicyError>;
}

impl<F> DecisionSource for F
where
    F: FnMut(&DecisionContext<'_>) -> Result<Decision, PolicyError>,
{
    fn request(&mut self, ctx: &DecisionContext<'_>) -> Result<Decision, PolicyError> {
        self(ctx)
    }
}

/// Decisions queued ahead of time; asking an empty queue counts as the player leaving.
#[derive(Debug, Default, Clone)]
pub struct QueuedSource {
    pending: VecDeque<Decision>,
}

impl QueuedSource {
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self { pending: decisions.into_iter().collect() }
    }

    pub fn push(&mut self, decision: Decision) {
        self.pending.push_back(decision);
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl DecisionSource for QueuedSource {
    fn request(&mut self, _ctx: &DecisionContext<'_>) -> Result<Decision, PolicyError> {
        self.pending.pop_front().ok_or(PolicyError::Interrupted)
    }
}

/// Policy for a human seat: forwards to the injected source.
pub struct InteractivePolicy {
    source: Box<dyn DecisionSource>,
}

impl InteractivePolicy {
    pub fn new(source: Box<dyn DecisionSource>) -> Self {
        Self { source }
    }
}

impl ActionPolicy for InteractivePolicy {
    fn decide(
        &mut self,
        ctx: &DecisionContext<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<Decision, PolicyError> {
        self.source.request(ctx)
    }

    fn strategy(&self) -> Strategy {
        Strategy::Interactive
    }
}

/// One optional policy per seat.
pub struct PolicyTable {
    seats: Vec<Option<Box<dyn ActionPolicy>>>,
}

impl fmt::Debug for PolicyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: String = self
            .seats
            .iter()
            .map(|p| match p.as_deref().map(|p| p.strategy()) {
                Some(Strategy::Interactive) => 'I',
                Some(Strategy::Aggressive) => 'A',
                Some(Strategy::Cautious) => 'C',
                Some(Strategy::Erratic) => 'E',
                None => '-',
            })
            .collect();
        write!(f, "PolicyTable({flags})")
    }
}

impl PolicyTable {
    /// A table with `n` empty seats.
    pub fn for_seats(n: usize) -> Self {
        let mut seats = Vec::with_capacity(n);
        seats.resize_with(n, || None);
        Self { seats }
    }

    /// Attach a policy to every participant from its strategy tag. Interactive
    /// seats get a source from `make_source(seat)`.
    pub fn for_participants<F>(participants: &[Participant], config: &TableConfig, mut make_source: F) -> Self
    where
        F: FnMut(usize) -> Box<dyn DecisionSource>,
    {
        let mut table = Self::for_seats(participants.len());
        for (seat, p) in participants.iter().enumerate() {
            let policy: Box<dyn ActionPolicy> = match automated_policy(p.strategy(), config) {
                Some(bot) => bot,
                None => Box::new(InteractivePolicy::new(make_source(seat))),
            };
            table.set_policy(seat, Some(policy));
        }
        table
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Assign a policy to a seat (or remove it with `None`), growing the table if needed.
    pub fn set_policy(&mut self, seat: usize, policy: Option<Box<dyn ActionPolicy>>) {
        if seat >= self.seats.len() {
            self.seats.resize_with(seat + 1, || None);
        }
        self.seats[seat] = policy;
    }

    pub fn policy_mut(&mut self, seat: usize) -> Option<&mut (dyn ActionPolicy + 'static)> {
        self.seats.get_mut(seat).and_then(|p| p.as_deref_mut())
    }

    pub fn strategy(&self, seat: usize) -> Option<Strategy> {
        self.seats.get(seat).and_then(|p| p.as_deref().map(|p| p.strategy()))
    }

    pub fn has_policy(&self, seat: usize) -> bool {
        self.seats.get(seat).is_some_and(Option::is_some)
    }

    pub fn any_interactive(&self) -> bool {
        (0..self.seats.len()).any(|s| self.strategy(s) == Some(Strategy::Interactive))
    }

    pub fn clear(&mut self) {
        self.seats.iter_mut().for_each(|p| *p = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TableSnapshot;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn seats() -> Vec<Participant> {
        vec![
            Participant::new("You", Strategy::Interactive, 1000),
            Participant::new("Bot Aggressive", Strategy::Aggressive, 1000),
            Participant::new("Bot Cautious", Strategy::Cautious, 1000),
            Participant::new("Bot Random", Strategy::Erratic, 1000),
        ]
    }

    #[test]
    fn builds_policies_from_strategy_tags() {
        let cfg = TableConfig::default();
        let table = PolicyTable::for_participants(&seats(), &cfg, |_| {
            Box::new(QueuedSource::default())
        });
        assert_eq!(format!("{table:?}"), "PolicyTable(IACE)");
        assert!(table.any_interactive());
    }

    #[test]
    fn set_policy_grows_and_clears() {
        let mut table = PolicyTable::for_seats(1);
        table.set_policy(3, automated_policy(Strategy::Cautious, &TableConfig::default()));
        assert_eq!(table.len(), 4);
        assert!(table.has_policy(3));
        assert!(!table.has_policy(0));
        table.clear();
        assert!(!table.has_policy(3));
    }

    #[test]
    fn interactive_policy_forwards_queued_decisions() {
        let ps = seats();
        let view = TableSnapshot {
            participants: &ps,
            pot: 0,
            community: &[],
            street: Street::Preflop,
            highest_bet: 10,
        };
        let ctx = DecisionContext { seat: 0, to_call: 10, any_raise: false, raise_step: 50, table: &view };
        let mut policy =
            InteractivePolicy::new(Box::new(QueuedSource::new([Decision::Raise(50)])));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(policy.decide(&ctx, &mut rng), Ok(Decision::Raise(50)));
        assert_eq!(policy.decide(&ctx, &mut rng), Err(PolicyError::Interrupted));
    }

    #[test]
    fn raise_offered_only_when_stack_covers_more_than_the_call() {
        let mut ps = seats();
        ps[0].commit(960);
        let view = TableSnapshot {
            participants: &ps,
            pot: 960,
            community: &[],
            street: Street::Flop,
            highest_bet: 1000,
        };
        let short = DecisionContext { seat: 0, to_call: 40, any_raise: true, raise_step: 50, table: &view };
        assert_eq!(short.offered(), vec![Decision::Fold, Decision::Call, Decision::AllIn]);
        let deep = DecisionContext { seat: 1, to_call: 40, any_raise: true, raise_step: 50, table: &view };
        assert!(deep.offered().contains(&Decision::Raise(50)));
    }
}
