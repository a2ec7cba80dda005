use crate::config::TableConfig;
use crate::participant::Strategy;
use rand::{Rng, RngCore};

use super::{ActionPolicy, Decision, DecisionContext, PolicyError};

#[derive(Debug, Clone, Copy)]
struct BotDecision {
    decision: Decision,
    reason: &'static str,
}

impl BotDecision {
    fn new(decision: Decision, reason: &'static str) -> Self {
        Self { decision, reason }
    }

    fn log(self, name: &str, ctx: &DecisionContext<'_>) -> Decision {
        log::debug!(
            "{name} seat {} decides {:?} ({}; to_call {}, stack {})",
            ctx.seat,
            self.decision,
            self.reason,
            ctx.to_call,
            ctx.stack()
        );
        self.decision
    }
}

/// Build the automated policy for `strategy`; `None` for interactive seats.
pub fn automated_policy(strategy: Strategy, config: &TableConfig) -> Option<Box<dyn ActionPolicy>> {
    match strategy {
        Strategy::Aggressive => Some(Box::new(AggressivePolicy::from_config(config))),
        Strategy::Cautious => Some(Box::new(CautiousPolicy::from_config(config))),
        Strategy::Erratic => Some(Box::new(ErraticPolicy::from_config(config))),
        Strategy::Interactive => None,
    }
}

/// Opens the raising once per round when it can comfortably afford to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggressivePolicy {
    /// Stack must exceed the call by more than this; also the base raise.
    pub margin: u64,
    /// Upper bound of the random extra added to the base raise.
    pub extra_max: u64,
}

impl AggressivePolicy {
    pub fn from_config(config: &TableConfig) -> Self {
        Self { margin: config.aggressive_margin, extra_max: config.aggressive_extra_max }
    }
}

impl Default for AggressivePolicy {
    fn default() -> Self {
        Self::from_config(&TableConfig::default())
    }
}

impl ActionPolicy for AggressivePolicy {
    fn decide(
        &mut self,
        ctx: &DecisionContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Decision, PolicyError> {
        let d = if !ctx.any_raise && ctx.stack() > ctx.to_call.saturating_add(self.margin) {
            let extra = rng.random_range(0..=self.extra_max);
            let by = self.margin.saturating_add(extra).max(1);
            BotDecision::new(Decision::Raise(by), "open_raise")
        } else {
            BotDecision::new(Decision::Call, "call")
        };
        Ok(d.log("aggressive", ctx))
    }

    fn strategy(&self) -> Strategy {
        Strategy::Aggressive
    }
}

/// Gives up on expensive calls, otherwise just calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CautiousPolicy {
    /// Fold when the call exceeds `stack / fold_divisor`.
    pub fold_divisor: u64,
    /// A call below `stack / cheap_divisor` is taken without thought.
    pub cheap_divisor: u64,
}

impl CautiousPolicy {
    /// `TableConfig::validate` rejects zero divisors; configs that skipped it are clamped to 1.
    pub fn from_config(config: &TableConfig) -> Self {
        Self {
            fold_divisor: config.cautious_fold_divisor.max(1),
            cheap_divisor: config.cautious_cheap_divisor.max(1),
        }
    }
}

impl Default for CautiousPolicy {
    fn default() -> Self {
        Self::from_config(&TableConfig::default())
    }
}

impl ActionPolicy for CautiousPolicy {
    fn decide(
        &mut self,
        ctx: &DecisionContext<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<Decision, PolicyError> {
        let stack = ctx.stack();
        let d = if ctx.to_call > stack / self.fold_divisor {
            BotDecision::new(Decision::Fold, "too_expensive")
        } else if ctx.to_call < stack / self.cheap_divisor {
            BotDecision::new(Decision::Call, "cheap_call")
        } else {
            BotDecision::new(Decision::Call, "call")
        };
        Ok(d.log("cautious", ctx))
    }

    fn strategy(&self) -> Strategy {
        Strategy::Cautious
    }
}

/// Folds at random, one turn in `fold_one_in`; calls otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErraticPolicy {
    pub fold_one_in: u32,
}

impl ErraticPolicy {
    /// Zero odds are rejected by `TableConfig::validate` and clamped to 1 here.
    pub fn from_config(config: &TableConfig) -> Self {
        Self { fold_one_in: config.erratic_fold_one_in.max(1) }
    }
}

impl Default for ErraticPolicy {
    fn default() -> Self {
        Self::from_config(&TableConfig::default())
    }
}

impl ActionPolicy for ErraticPolicy {
    fn decide(
        &mut self,
        ctx: &DecisionContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Decision, PolicyError> {
        let d = if rng.random_range(0..self.fold_one_in) == 0 {
            BotDecision::new(Decision::Fold, "coin_flip")
        } else {
            BotDecision::new(Decision::Call, "call")
        };
        Ok(d.log("erratic", ctx))
    }

    fn strategy(&self) -> Strategy {
        Strategy::Erratic
    }
}
