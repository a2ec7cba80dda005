use crate::agents::{DecisionSource, PolicyError, PolicyTable};
use crate::betting::{BettingRound, RoundError};
use crate::cards::Card;
use crate::config::{ConfigError, SeatSpec, TableConfig};
use crate::deck::{Deck, DeckError};
use crate::engine::{TableEvent, TableObserver, TableView};
use crate::hand::{Community, HandError, HoleCards};
use crate::participant::Participant;
use rand::{Rng, RngCore};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    /// The four streets that carry a betting round, in order.
    pub const BETTING: [Street; 4] = [Street::Preflop, Street::Flop, Street::Turn, Street::River];

    pub fn label(self) -> &'static str {
        match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
            Street::Showdown => "showdown",
        }
    }

    /// Community cards turned over when this street begins.
    pub fn reveals(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::Preflop | Street::Showdown => 0,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryVerb {
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
    Win,
    Refund,
}

impl HistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HistoryVerb::Fold => "Fold",
            HistoryVerb::Check => "Check",
            HistoryVerb::Call => "Call",
            HistoryVerb::Raise => "Raise",
            HistoryVerb::AllIn => "All-in",
            HistoryVerb::Win => "Win",
            HistoryVerb::Refund => "Refund",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HistoryEntry {
    pub seat: usize,
    pub verb: HistoryVerb,
    pub amount: Option<u64>,
    pub street: Street,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Round(#[from] RoundError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

impl GameError {
    /// The player asked to stop; not a failure.
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            GameError::Policy(PolicyError::Interrupted)
                | GameError::Round(RoundError::Policy(PolicyError::Interrupted))
        )
    }
}

/// How a hand ended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HandResult {
    pub hand: u64,
    /// `None` when every participant folded and the pot went back to its owners.
    pub winner: Option<usize>,
    pub pot: u64,
    /// Last street that was dealt before the hand ended.
    pub ended_on: Street,
    pub message: String,
}

impl HandResult {
    pub fn everyone_folded(&self) -> bool {
        self.winner.is_none()
    }
}

/// Asked after every hand whether to deal another one.
pub trait SessionControl {
    /// Checked once before the first deal of a session.
    fn wants_first_hand(&self) -> bool {
        true
    }

    fn play_again(&mut self, view: &dyn TableView, result: &HandResult) -> Result<bool, PolicyError>;
}

/// Keeps dealing until a fixed number of hands has been played. A limit of zero deals nothing.
#[derive(Debug, Clone, Copy)]
pub struct HandLimit {
    remaining: u64,
}

impl HandLimit {
    pub fn new(hands: u64) -> Self {
        Self { remaining: hands }
    }
}

impl SessionControl for HandLimit {
    fn wants_first_hand(&self) -> bool {
        self.remaining > 0
    }

    fn play_again(&mut self, _view: &dyn TableView, _result: &HandResult) -> Result<bool, PolicyError> {
        self.remaining = self.remaining.saturating_sub(1);
        Ok(self.remaining > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SessionSummary {
    pub hands_played: u64,
    pub stacks: Vec<(String, u64)>,
}

/// A table of participants playing hands one after another.
#[derive(Debug)]
#[non_exhaustive]
pub struct Table {
    pub(crate) config: TableConfig,
    pub(crate) participants: Vec<Participant>,
    pub(crate) deck: Deck,
    pub(crate) community: Community,
    pub(crate) pot: u64,
    pub(crate) street: Street,
    pub(crate) highest_bet: u64,
    pub(crate) hands_played: u64,
    history: Vec<HistoryEntry>,
    last_result: Option<HandResult>,
}

impl Table {
    pub fn new(config: TableConfig) -> Result<Self, ConfigError> {
        let participants = config.participants();
        Self::with_participants(config, participants)
    }

    /// Seat existing participants, keeping their stacks, under `config`'s rules.
    pub fn with_participants(
        config: TableConfig,
        participants: Vec<Participant>,
    ) -> Result<Self, ConfigError> {
        let mut check = config.clone();
        check.seats = participants
            .iter()
            .map(|p| SeatSpec::new(p.name(), p.strategy()))
            .collect();
        check.validate()?;
        Ok(Self {
            config: check,
            participants,
            deck: Deck::ordered(),
            community: Community::new(),
            pot: 0,
            street: Street::Preflop,
            highest_bet: 0,
            hands_played: 0,
            history: Vec::new(),
            last_result: None,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Cards left in this hand's deck.
    pub fn deck_remaining(&self) -> usize {
        self.deck.len()
    }

    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    pub fn last_result(&self) -> Option<&HandResult> {
        self.last_result.as_ref()
    }

    pub fn history_recent(&self, n: usize) -> &[HistoryEntry] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn seats_with_chips(&self) -> usize {
        self.participants.iter().filter(|p| p.stack() > 0).count()
    }

    /// A hand needs two participants with chips.
    pub fn can_continue(&self) -> bool {
        self.seats_with_chips() >= 2
    }

    fn unfolded(&self) -> usize {
        self.participants.iter().filter(|p| !p.is_folded()).count()
    }

    /// Policies for every seat from their strategy tags.
    pub fn policies<F>(&self, make_source: F) -> PolicyTable
    where
        F: FnMut(usize) -> Box<dyn DecisionSource>,
    {
        PolicyTable::for_participants(&self.participants, &self.config, make_source)
    }

    /// Fresh deck, empty pot and board, two cards to every seat.
    ///
    /// A seat with an empty stack is dealt in but folded for the whole hand.
    pub fn start_hand(&mut self, rng: &mut dyn RngCore) -> Result<(), GameError> {
        self.hands_played += 1;
        self.deck = Deck::shuffled(rng);
        self.community.clear();
        self.pot = 0;
        self.highest_bet = 0;
        self.street = Street::Preflop;
        self.history.clear();
        self.last_result = None;
        for p in &mut self.participants {
            let cards = self.deck.draw_n(2)?;
            p.reset_for_hand(HoleCards::from_slice(&cards)?);
            if p.stack() == 0 {
                log::warn!("{} has no chips and sits out hand {}", p.name(), self.hands_played);
                p.fold();
            }
        }
        log::info!("hand {} dealt to {} seats", self.hands_played, self.participants.len());
        Ok(())
    }

    /// Deal and play one complete hand, then pay out the pot.
    pub fn play_hand(
        &mut self,
        policies: &mut PolicyTable,
        rng: &mut dyn RngCore,
        observer: &mut dyn TableObserver,
    ) -> Result<HandResult, GameError> {
        self.start_hand(rng)?;
        observer.notify(&*self, &TableEvent::HandStarted { hand: self.hands_played });

        for street in Street::BETTING {
            if self.unfolded() <= 1 {
                log::info!("hand {} decided before the {street}", self.hands_played);
                break;
            }
            self.begin_street(street)?;
            observer.notify(&*self, &TableEvent::StreetStarted { street });
            let minimum_bet =
                if street == Street::Preflop { self.config.preflop_min_bet } else { 0 };
            self.betting_round(street, minimum_bet, policies, rng, observer)?;
        }

        let result = self.resolve(rng);
        observer.notify(&*self, &TableEvent::HandFinished(result.clone()));
        Ok(result)
    }

    /// Play hands until `control` says stop or fewer than two seats have chips.
    pub fn run_session(
        &mut self,
        policies: &mut PolicyTable,
        rng: &mut dyn RngCore,
        observer: &mut dyn TableObserver,
        control: &mut dyn SessionControl,
    ) -> Result<SessionSummary, GameError> {
        let first = self.hands_played;
        let mut deal = control.wants_first_hand();
        while deal && self.can_continue() {
            let result = self.play_hand(policies, rng, observer)?;
            deal = control.play_again(&*self, &result)?;
        }
        if !self.can_continue() {
            log::warn!("session over: {} seat(s) left with chips", self.seats_with_chips());
        }
        Ok(SessionSummary {
            hands_played: self.hands_played - first,
            stacks: self.participants.iter().map(|p| (p.name().to_string(), p.stack())).collect(),
        })
    }

    fn begin_street(&mut self, street: Street) -> Result<(), GameError> {
        let n = street.reveals();
        if n > 0 {
            let cards = self.deck.draw_n(n)?;
            log::info!(
                "{street}: {}",
                cards.iter().map(Card::to_string).collect::<Vec<_>>().join(" ")
            );
            self.community.reveal(cards)?;
        }
        self.street = street;
        self.highest_bet = 0;
        self.participants.iter_mut().for_each(Participant::reset_for_round);
        Ok(())
    }

    fn betting_round(
        &mut self,
        street: Street,
        minimum_bet: u64,
        policies: &mut PolicyTable,
        rng: &mut dyn RngCore,
        observer: &mut dyn TableObserver,
    ) -> Result<(), GameError> {
        let outcome = BettingRound::new(street, self.config.first_actor, minimum_bet)
            .with_community(self.community.as_slice())
            .with_raise_step(self.config.raise_step)
            .with_pass_limit(self.config.max_passes_per_seat)
            .run(&mut self.participants, self.pot, policies, rng, observer)?;
        log::info!(
            "{street} settled at {} after {} pass(es); pot {} -> {}",
            outcome.highest_bet,
            outcome.passes,
            self.pot,
            outcome.pot
        );
        self.pot = outcome.pot;
        self.highest_bet = outcome.highest_bet;
        for a in &outcome.actions {
            let amount = (a.paid > 0).then_some(a.paid);
            self.record_history(a.seat, a.verb, amount, a.street);
        }
        Ok(())
    }

    /// Pay the pot to one unfolded seat picked at random; hands are not ranked.
    fn resolve(&mut self, rng: &mut dyn RngCore) -> HandResult {
        let ended_on = self.street;
        let pot = self.pot;
        let alive: Vec<usize> = self
            .participants
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_folded())
            .map(|(i, _)| i)
            .collect();

        let (winner, message) = if alive.is_empty() {
            for seat in 0..self.participants.len() {
                let back = self.participants[seat].contributed();
                if back > 0 {
                    self.participants[seat].award(back);
                    self.record_history(seat, HistoryVerb::Refund, Some(back), ended_on);
                }
            }
            log::warn!("hand {}: everyone folded, {pot} chips returned", self.hands_played);
            (None, "Everyone folded!".to_string())
        } else {
            let seat = alive[rng.random_range(0..alive.len())];
            self.participants[seat].award(pot);
            self.record_history(seat, HistoryVerb::Win, Some(pot), ended_on);
            let name = self.participants[seat].name();
            log::info!("hand {}: {name} wins {pot} among {} contender(s)", self.hands_played, alive.len());
            (Some(seat), format!("Winner: {name}! +{pot} chips"))
        };

        self.pot = 0;
        self.highest_bet = 0;
        self.street = Street::Showdown;
        let result = HandResult { hand: self.hands_played, winner, pot, ended_on, message };
        self.last_result = Some(result.clone());
        result
    }

    fn record_history(&mut self, seat: usize, verb: HistoryVerb, amount: Option<u64>, street: Street) {
        self.history.push(HistoryEntry { seat, verb, amount, street });
    }
}

impl TableView for Table {
    fn participants(&self) -> &[Participant] {
        &self.participants
    }
    fn pot(&self) -> u64 {
        self.pot
    }
    fn community(&self) -> &[Card] {
        self.community.as_slice()
    }
    fn street(&self) -> Street {
        self.street
    }
    fn highest_bet(&self) -> u64 {
        self.highest_bet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{ActionPolicy, Decision, InteractivePolicy, QueuedSource};
    use crate::engine::NullObserver;
    use crate::participant::Strategy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn scripted(n: usize, script: Vec<Decision>) -> PolicyTable {
        let mut t = PolicyTable::for_seats(n);
        for seat in 0..n {
            let policy: Box<dyn ActionPolicy> =
                Box::new(InteractivePolicy::new(Box::new(QueuedSource::new(script.clone()))));
            t.set_policy(seat, Some(policy));
        }
        t
    }

    #[test]
    fn busted_seat_sits_out() {
        let mut table = Table::new(TableConfig::default()).unwrap();
        table.participants[2].stack = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        table.start_hand(&mut rng).unwrap();
        assert!(table.participants[2].is_folded());
        assert!(table.participants[2].hole().is_some());
        assert_eq!(table.unfolded(), 3);
    }

    #[test]
    fn everyone_folding_returns_the_chips() {
        let cfg = TableConfig::default();
        let mut table = Table::new(cfg).unwrap();
        // Everyone calls the forced bet, then folds on the flop.
        let mut pols = scripted(4, vec![Decision::Call, Decision::Fold]);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let result = table.play_hand(&mut pols, &mut rng, &mut NullObserver).unwrap();
        assert!(result.everyone_folded());
        assert_eq!(result.message, "Everyone folded!");
        assert_eq!(result.pot, 40);
        assert_eq!(result.ended_on, Street::Flop);
        assert!(table.participants.iter().all(|p| p.stack() == 1000));
        assert_eq!(table.history_recent(1)[0].verb, HistoryVerb::Refund);
    }

    #[test]
    fn lone_survivor_ends_the_hand_early() {
        let mut table = Table::new(TableConfig::default()).unwrap();
        let mut pols = PolicyTable::for_seats(4);
        pols.set_policy(
            0,
            Some(Box::new(InteractivePolicy::new(Box::new(QueuedSource::new([Decision::Call]))))),
        );
        for seat in 1..4 {
            pols.set_policy(
                seat,
                Some(Box::new(InteractivePolicy::new(Box::new(QueuedSource::new([Decision::Fold]))))),
            );
        }
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let result = table.play_hand(&mut pols, &mut rng, &mut NullObserver).unwrap();
        assert_eq!(result.winner, Some(0));
        assert_eq!(result.pot, 10);
        assert_eq!(result.ended_on, Street::Preflop);
        assert!(table.community().is_empty(), "no cards revealed after the hand was decided");
        assert_eq!(table.participants[0].stack(), 1000);
        assert_eq!(table.deck_remaining(), 52 - 8);
    }

    #[test]
    fn interrupted_is_recognised() {
        let mut table = Table::new(TableConfig::default()).unwrap();
        let mut pols = scripted(4, vec![]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = table.play_hand(&mut pols, &mut rng, &mut NullObserver).unwrap_err();
        assert!(err.is_interrupted());
    }

    #[test]
    fn with_participants_keeps_stacks() {
        let ps = vec![
            Participant::new("a", Strategy::Cautious, 5),
            Participant::new("b", Strategy::Erratic, 500),
        ];
        let table = Table::with_participants(TableConfig::default(), ps).unwrap();
        assert_eq!(table.stack(0), 5);
        assert_eq!(table.config().seats.len(), 2);
    }
}
