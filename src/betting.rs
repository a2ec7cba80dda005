//! One street of betting, run to a fixed point.
//!
//! Seats are visited in rotation from the first actor. Passes repeat until a
//! full pass leaves the high bet unchanged and every seat still able to act
//! has matched it. Folded and all-in seats are skipped. Any raise reopens
//! the action for everyone else, so the loop always needs another pass after
//! one.

use crate::agents::{Decision, DecisionContext, PolicyError, PolicyTable};
use crate::cards::Card;
use crate::engine::{TableEvent, TableObserver, TableSnapshot};
use crate::game::{HistoryVerb, Street};
use crate::participant::Participant;
use rand::RngCore;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    #[error("seat {0} has no action policy")]
    MissingPolicy(usize),
    #[error("seat {seat} returned an invalid decision: {reason}")]
    InvalidDecision { seat: usize, reason: &'static str },
    #[error("betting did not settle within {limit} passes")]
    PassLimit { limit: usize },
    #[error("starting seat {seat} is outside a table of {seats}")]
    InvalidSeat { seat: usize, seats: usize },
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// A decision after it was applied to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedAction {
    pub seat: usize,
    pub street: Street,
    pub verb: HistoryVerb,
    /// Chips moved from the stack into the pot by this action.
    pub paid: u64,
    /// The seat's round contribution afterwards.
    pub contribution: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub pot: u64,
    pub highest_bet: u64,
    pub any_raise: bool,
    pub passes: usize,
    pub actions: Vec<AppliedAction>,
}

struct RoundState {
    highest_bet: u64,
    any_raise: bool,
    order: Vec<usize>,
}

impl RoundState {
    fn new(starting_seat: usize, seats: usize, minimum_bet: u64) -> Self {
        let order = (0..seats).map(|i| (starting_seat + i) % seats).collect();
        Self { highest_bet: minimum_bet, any_raise: false, order }
    }

    /// Every seat that can still act has matched the high bet.
    fn settled(&self, participants: &[Participant]) -> bool {
        participants.iter().filter(|p| p.can_act()).all(|p| p.contribution() == self.highest_bet)
    }
}

/// Configuration of one betting round.
#[derive(Debug, Clone, Copy)]
pub struct BettingRound<'a> {
    street: Street,
    starting_seat: usize,
    minimum_bet: u64,
    community: &'a [Card],
    raise_step: u64,
    max_passes_per_seat: usize,
}

impl<'a> BettingRound<'a> {
    pub fn new(street: Street, starting_seat: usize, minimum_bet: u64) -> Self {
        Self {
            street,
            starting_seat,
            minimum_bet,
            community: &[],
            raise_step: 50,
            max_passes_per_seat: 16,
        }
    }

    pub fn with_community(mut self, community: &'a [Card]) -> Self {
        self.community = community;
        self
    }

    pub fn with_raise_step(mut self, step: u64) -> Self {
        self.raise_step = step;
        self
    }

    pub fn with_pass_limit(mut self, per_seat: usize) -> Self {
        self.max_passes_per_seat = per_seat;
        self
    }

    /// Run the round over `participants`, starting from `pot`.
    ///
    /// Every contribution is reset to zero first. Returns the new pot along
    /// with the final high bet and the actions in the order they happened.
    pub fn run(
        &self,
        participants: &mut [Participant],
        pot: u64,
        policies: &mut PolicyTable,
        rng: &mut dyn RngCore,
        observer: &mut dyn TableObserver,
    ) -> Result<RoundOutcome, RoundError> {
        let seats = participants.len();
        if self.starting_seat >= seats {
            return Err(RoundError::InvalidSeat { seat: self.starting_seat, seats });
        }
        participants.iter_mut().for_each(Participant::reset_for_round);

        let mut state = RoundState::new(self.starting_seat, seats, self.minimum_bet);
        let mut pot = pot;
        let mut actions = Vec::new();
        let active = participants.iter().filter(|p| p.can_act()).count();
        let limit = active.max(1) * self.max_passes_per_seat;
        let mut passes = 0;

        loop {
            if passes == limit {
                return Err(RoundError::PassLimit { limit });
            }
            passes += 1;
            let mut changed = false;

            for i in 0..state.order.len() {
                let seat = state.order[i];
                if !participants[seat].can_act() {
                    continue;
                }
                let to_call = state.highest_bet.saturating_sub(participants[seat].contribution());
                let decision = {
                    let view = self.snapshot(participants, pot, state.highest_bet);
                    let ctx = DecisionContext {
                        seat,
                        to_call,
                        any_raise: state.any_raise,
                        raise_step: self.raise_step,
                        table: &view,
                    };
                    let policy = policies.policy_mut(seat).ok_or(RoundError::MissingPolicy(seat))?;
                    policy.decide(&ctx, rng)?
                };

                let action = self.apply(seat, decision, to_call, &mut participants[seat])?;
                pot += action.paid;
                if action.contribution > state.highest_bet {
                    state.highest_bet = action.contribution;
                    state.any_raise = true;
                    changed = true;
                }
                log::debug!(
                    "{}: seat {} {} ({:?}) paid {}, high bet {}, pot {}",
                    self.street.label(),
                    seat,
                    action.verb.label(),
                    decision,
                    action.paid,
                    state.highest_bet,
                    pot
                );
                actions.push(action);
                let view = self.snapshot(participants, pot, state.highest_bet);
                observer.notify(&view, &TableEvent::ActionApplied(action));
            }

            if !changed && state.settled(participants) {
                break;
            }
            log::debug!("{} pass {passes} reopened at high bet {}", self.street.label(), state.highest_bet);
        }

        let view = self.snapshot(participants, pot, state.highest_bet);
        observer.notify(
            &view,
            &TableEvent::RoundSettled { street: self.street, highest_bet: state.highest_bet, passes },
        );
        Ok(RoundOutcome {
            pot,
            highest_bet: state.highest_bet,
            any_raise: state.any_raise,
            passes,
            actions,
        })
    }

    /// Turn a decision into chips. Payment is clamped at the stack by `commit`.
    fn apply(
        &self,
        seat: usize,
        decision: Decision,
        to_call: u64,
        p: &mut Participant,
    ) -> Result<AppliedAction, RoundError> {
        let wanted = match decision {
            Decision::Fold => {
                p.fold();
                return Ok(AppliedAction {
                    seat,
                    street: self.street,
                    verb: HistoryVerb::Fold,
                    paid: 0,
                    contribution: p.contribution(),
                });
            }
            Decision::Call => to_call,
            Decision::Raise(0) => {
                return Err(RoundError::InvalidDecision { seat, reason: "raise by zero chips" })
            }
            Decision::Raise(by) => to_call.saturating_add(by),
            Decision::AllIn => p.stack(),
        };
        let paid = p.commit(wanted);
        let contribution = p.contribution();
        let verb = if p.stack() == 0 {
            HistoryVerb::AllIn
        } else if paid > to_call {
            HistoryVerb::Raise
        } else if paid == 0 {
            HistoryVerb::Check
        } else {
            HistoryVerb::Call
        };
        Ok(AppliedAction { seat, street: self.street, verb, paid, contribution })
    }

    fn snapshot<'v>(
        &'v self,
        participants: &'v [Participant],
        pot: u64,
        highest_bet: u64,
    ) -> TableSnapshot<'v> {
        TableSnapshot {
            participants,
            pot,
            community: self.community,
            street: self.street,
            highest_bet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{ActionPolicy, CautiousPolicy, InteractivePolicy, QueuedSource};
    use crate::engine::NullObserver;
    use crate::participant::Strategy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn table(n: usize, stack: u64) -> Vec<Participant> {
        (0..n).map(|i| Participant::new(format!("p{i}"), Strategy::Interactive, stack)).collect()
    }

    fn scripted(scripts: Vec<Vec<Decision>>) -> PolicyTable {
        let mut t = PolicyTable::for_seats(scripts.len());
        for (seat, script) in scripts.into_iter().enumerate() {
            let policy: Box<dyn ActionPolicy> =
                Box::new(InteractivePolicy::new(Box::new(QueuedSource::new(script))));
            t.set_policy(seat, Some(policy));
        }
        t
    }

    #[test]
    fn rotation_wraps_from_starting_seat() {
        let s = RoundState::new(2, 4, 0);
        assert_eq!(s.order, vec![2, 3, 0, 1]);
    }

    #[test]
    fn all_in_seats_are_not_asked_again() {
        let mut ps = table(2, 100);
        ps[1].stack = 30;
        // Seat 1 only has one scripted decision; a second request would interrupt.
        let mut pols = scripted(vec![vec![Decision::Raise(50), Decision::Call], vec![Decision::Call]]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let out = BettingRound::new(Street::Flop, 0, 0)
            .run(&mut ps, 0, &mut pols, &mut rng, &mut NullObserver)
            .unwrap();
        assert_eq!(out.highest_bet, 50);
        assert_eq!(out.pot, 80);
        assert!(ps[1].is_all_in());
        assert_eq!(ps[1].contribution(), 30);
        let seat1 = out.actions.iter().find(|a| a.seat == 1).map(|a| a.verb);
        assert_eq!(seat1, Some(HistoryVerb::AllIn));
        assert_eq!(out.actions.last().map(|a| a.verb), Some(HistoryVerb::Check));
    }

    #[test]
    fn zero_raise_is_rejected() {
        let mut ps = table(2, 100);
        let mut pols = scripted(vec![vec![Decision::Raise(0)], vec![]]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = BettingRound::new(Street::Turn, 0, 0)
            .run(&mut ps, 0, &mut pols, &mut rng, &mut NullObserver)
            .unwrap_err();
        assert_eq!(err, RoundError::InvalidDecision { seat: 0, reason: "raise by zero chips" });
    }

    #[test]
    fn missing_policy_is_a_configuration_error() {
        let mut ps = table(3, 100);
        let mut pols = PolicyTable::for_seats(3);
        pols.set_policy(0, Some(Box::new(CautiousPolicy::default())));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = BettingRound::new(Street::River, 0, 0)
            .run(&mut ps, 0, &mut pols, &mut rng, &mut NullObserver)
            .unwrap_err();
        assert_eq!(err, RoundError::MissingPolicy(1));
    }

    #[test]
    fn endless_raising_hits_the_pass_limit() {
        let mut ps = table(2, 1_000_000);
        let forever = |_: &DecisionContext<'_>| -> Result<Decision, PolicyError> { Ok(Decision::Raise(1)) };
        let mut pols = PolicyTable::for_seats(2);
        pols.set_policy(0, Some(Box::new(InteractivePolicy::new(Box::new(forever)))));
        pols.set_policy(1, Some(Box::new(InteractivePolicy::new(Box::new(forever)))));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = BettingRound::new(Street::Flop, 0, 0)
            .with_pass_limit(3)
            .run(&mut ps, 0, &mut pols, &mut rng, &mut NullObserver)
            .unwrap_err();
        assert_eq!(err, RoundError::PassLimit { limit: 6 });
    }

    #[test]
    fn bad_starting_seat() {
        let mut ps = table(2, 100);
        let mut pols = scripted(vec![vec![], vec![]]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = BettingRound::new(Street::Flop, 2, 0)
            .run(&mut ps, 0, &mut pols, &mut rng, &mut NullObserver)
            .unwrap_err();
        assert_eq!(err, RoundError::InvalidSeat { seat: 2, seats: 2 });
    }
}
