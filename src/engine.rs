// Read-only boundary between the core and whatever renders it. Rounds and the
// hand loop publish a `TableView` with every `TableEvent`, so a UI never needs
// mutable access to seats or the pot.

use crate::betting::AppliedAction;
use crate::cards::Card;
use crate::game::{HandResult, Street};
use crate::participant::Participant;

pub trait TableView {
    fn participants(&self) -> &[Participant];
    fn pot(&self) -> u64;
    fn community(&self) -> &[Card];
    fn street(&self) -> Street;
    /// The bet every active seat must match in the current round.
    fn highest_bet(&self) -> u64;

    fn num_seats(&self) -> usize {
        self.participants().len()
    }

    fn stack(&self, seat: usize) -> u64 {
        self.participants().get(seat).map_or(0, Participant::stack)
    }

    fn contribution(&self, seat: usize) -> u64 {
        self.participants().get(seat).map_or(0, Participant::contribution)
    }

    fn is_folded(&self, seat: usize) -> bool {
        self.participants().get(seat).is_some_and(Participant::is_folded)
    }

    fn to_call(&self, seat: usize) -> u64 {
        match self.participants().get(seat) {
            Some(p) if !p.is_folded() => self.highest_bet().saturating_sub(p.contribution()),
            _ => 0,
        }
    }
}

/// A borrowed view of the table taken mid-round.
#[derive(Debug, Clone, Copy)]
pub struct TableSnapshot<'a> {
    pub participants: &'a [Participant],
    pub pot: u64,
    pub community: &'a [Card],
    pub street: Street,
    pub highest_bet: u64,
}

impl TableView for TableSnapshot<'_> {
    fn participants(&self) -> &[Participant] {
        self.participants
    }
    fn pot(&self) -> u64 {
        self.pot
    }
    fn community(&self) -> &[Card] {
        self.community
    }
    fn street(&self) -> Street {
        self.street
    }
    fn highest_bet(&self) -> u64 {
        self.highest_bet
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableEvent {
    HandStarted { hand: u64 },
    StreetStarted { street: Street },
    ActionApplied(AppliedAction),
    RoundSettled { street: Street, highest_bet: u64, passes: usize },
    HandFinished(HandResult),
}

/// Render/notify sink, called after every state change.
pub trait TableObserver {
    fn notify(&mut self, view: &dyn TableView, event: &TableEvent);
}

impl<F> TableObserver for F
where
    F: FnMut(&dyn TableView, &TableEvent),
{
    fn notify(&mut self, view: &dyn TableView, event: &TableEvent) {
        self(view, event)
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl TableObserver for NullObserver {
    fn notify(&mut self, _view: &dyn TableView, _event: &TableEvent) {}
}
