//! Table configuration.
//!
//! Every tunable constant of the table lives in [`TableConfig`]; the binary
//! fills it from command-line flags and library callers build it directly.

use crate::participant::{Participant, Strategy};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("a table needs at least 2 seats, got {0}")]
    TooFewSeats(usize),
    #[error("a table holds at most {max} seats, got {seats}")]
    TooManySeats { seats: usize, max: usize },
    #[error("first actor seat {seat} is outside a table of {seats}")]
    FirstActorOutOfRange { seat: usize, seats: usize },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// A seat at table setup: who sits there and how they decide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatSpec {
    pub name: String,
    pub strategy: Strategy,
}

impl SeatSpec {
    pub fn new(name: impl Into<String>, strategy: Strategy) -> Self {
        Self { name: name.into(), strategy }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TableConfig {
    pub seats: Vec<SeatSpec>,
    pub starting_stack: u64,
    /// Forced bet every seat must match before the flop.
    pub preflop_min_bet: u64,
    /// Seat that acts first in every round.
    pub first_actor: usize,
    /// Increment an interactive raise adds on top of the call.
    pub raise_step: u64,
    pub aggressive_margin: u64,
    pub aggressive_extra_max: u64,
    pub erratic_fold_one_in: u32,
    pub cautious_fold_divisor: u64,
    pub cautious_cheap_divisor: u64,
    /// Passes allowed per active seat before a round is declared stuck.
    pub max_passes_per_seat: usize,
}

impl TableConfig {
    /// 2 hole cards per seat plus 5 community cards must fit in 52.
    pub const MAX_SEATS: usize = 23;

    pub fn with_seats(mut self, seats: Vec<SeatSpec>) -> Self {
        self.seats = seats;
        self
    }

    pub fn with_starting_stack(mut self, stack: u64) -> Self {
        self.starting_stack = stack;
        self
    }

    pub fn with_preflop_min_bet(mut self, bet: u64) -> Self {
        self.preflop_min_bet = bet;
        self
    }

    pub fn with_raise_step(mut self, step: u64) -> Self {
        self.raise_step = step;
        self
    }

    pub fn with_first_actor(mut self, seat: usize) -> Self {
        self.first_actor = seat;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.seats.len();
        if n < 2 {
            return Err(ConfigError::TooFewSeats(n));
        }
        if n > Self::MAX_SEATS {
            return Err(ConfigError::TooManySeats { seats: n, max: Self::MAX_SEATS });
        }
        if self.first_actor >= n {
            return Err(ConfigError::FirstActorOutOfRange { seat: self.first_actor, seats: n });
        }
        let checks = [
            ("starting_stack", self.starting_stack == 0),
            ("raise_step", self.raise_step == 0),
            ("aggressive_margin", self.aggressive_margin == 0),
            ("erratic_fold_one_in", self.erratic_fold_one_in == 0),
            ("cautious_fold_divisor", self.cautious_fold_divisor == 0),
            ("cautious_cheap_divisor", self.cautious_cheap_divisor == 0),
            ("max_passes_per_seat", self.max_passes_per_seat == 0),
        ];
        match checks.into_iter().find(|(_, zero)| *zero) {
            Some((field, _)) => Err(ConfigError::Zero(field)),
            None => Ok(()),
        }
    }

    /// Fresh participants for every configured seat.
    pub fn participants(&self) -> Vec<Participant> {
        self.seats
            .iter()
            .map(|s| Participant::new(s.name.clone(), s.strategy, self.starting_stack))
            .collect()
    }
}

impl Default for TableConfig {
    /// One human against the three bot personalities.
    fn default() -> Self {
        Self {
            seats: vec![
                SeatSpec::new("You", Strategy::Interactive),
                SeatSpec::new("Bot Aggressive", Strategy::Aggressive),
                SeatSpec::new("Bot Cautious", Strategy::Cautious),
                SeatSpec::new("Bot Random", Strategy::Erratic),
            ],
            starting_stack: 1000,
            preflop_min_bet: 10,
            first_actor: 0,
            raise_step: 50,
            aggressive_margin: 30,
            aggressive_extra_max: 50,
            erratic_fold_one_in: 4,
            cautious_fold_divisor: 2,
            cautious_cheap_divisor: 8,
            max_passes_per_seat: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = TableConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.participants().len(), 4);
        assert!(cfg.participants().iter().all(|p| p.stack() == 1000));
    }

    #[test]
    fn rejects_bad_tables() {
        let one = vec![SeatSpec::new("solo", Strategy::Cautious)];
        assert_eq!(
            TableConfig::default().with_seats(one).validate(),
            Err(ConfigError::TooFewSeats(1))
        );

        let crowd = (0..24).map(|i| SeatSpec::new(format!("b{i}"), Strategy::Erratic)).collect();
        assert_eq!(
            TableConfig::default().with_seats(crowd).validate(),
            Err(ConfigError::TooManySeats { seats: 24, max: 23 })
        );

        assert_eq!(
            TableConfig::default().with_first_actor(4).validate(),
            Err(ConfigError::FirstActorOutOfRange { seat: 4, seats: 4 })
        );
        assert_eq!(
            TableConfig::default().with_raise_step(0).validate(),
            Err(ConfigError::Zero("raise_step"))
        );
        assert_eq!(
            TableConfig::default().with_starting_stack(0).validate(),
            Err(ConfigError::Zero("starting_stack"))
        );

        let mut flat = TableConfig::default();
        flat.aggressive_margin = 0;
        assert_eq!(flat.validate(), Err(ConfigError::Zero("aggressive_margin")));
    }
}
