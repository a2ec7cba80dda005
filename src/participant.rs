use crate::hand::HoleCards;
use std::fmt;

/// How a seat makes its decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Strategy {
    Interactive,
    Aggressive,
    Cautious,
    Erratic,
}

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Interactive => "interactive",
            Strategy::Aggressive => "aggressive",
            Strategy::Cautious => "cautious",
            Strategy::Erratic => "erratic",
        }
    }

    pub fn is_automated(self) -> bool {
        !matches!(self, Strategy::Interactive)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-seat state that lives for the whole session.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Participant {
    pub(crate) name: String,
    pub(crate) strategy: Strategy,
    pub(crate) hole: Option<HoleCards>,
    pub(crate) stack: u64,
    /// Paid in the current betting round.
    pub(crate) contribution: u64,
    /// Paid across the current hand.
    pub(crate) contributed: u64,
    pub(crate) folded: bool,
}

impl Participant {
    pub fn new(name: impl Into<String>, strategy: Strategy, stack: u64) -> Self {
        Self {
            name: name.into(),
            strategy,
            hole: None,
            stack,
            contribution: 0,
            contributed: 0,
            folded: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn hole(&self) -> Option<HoleCards> {
        self.hole
    }

    pub fn stack(&self) -> u64 {
        self.stack
    }

    /// Chips paid in the current betting round.
    pub fn contribution(&self) -> u64 {
        self.contribution
    }

    /// Chips paid since the hand started.
    pub fn contributed(&self) -> u64 {
        self.contributed
    }

    pub fn is_folded(&self) -> bool {
        self.folded
    }

    /// Still in the hand but with nothing left to bet.
    pub fn is_all_in(&self) -> bool {
        !self.folded && self.stack == 0
    }

    /// Whether the seat is asked to act in a betting round.
    pub fn can_act(&self) -> bool {
        !self.folded && self.stack > 0
    }

    pub fn reset_for_hand(&mut self, hole: HoleCards) {
        self.hole = Some(hole);
        self.folded = false;
        self.contribution = 0;
        self.contributed = 0;
    }

    pub fn reset_for_round(&mut self) {
        self.contribution = 0;
    }

    /// Move up to `amount` chips from the stack into this round's contribution.
    ///
    /// Requests above the stack are clamped, so the stack never goes negative.
    /// Returns what was actually paid; the caller adds it to the pot in the same turn.
    pub fn commit(&mut self, amount: u64) -> u64 {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.contribution += paid;
        self.contributed += paid;
        paid
    }

    pub fn fold(&mut self) {
        self.folded = true;
    }

    pub(crate) fn award(&mut self, amount: u64) {
        self.stack += amount;
    }
}
