use crate::agents::{Decision, DecisionContext};
use crate::cards::Card;
use crate::engine::{TableEvent, TableView};
use crate::game::{HandResult, Street};
use crate::participant::Participant;
use std::collections::VecDeque;

/// What the screen is waiting for from the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Prompt {
    Idle,
    Decision { seat: usize, to_call: u64, offered: Vec<Decision> },
    PlayAgain,
}

/// High-level input actions, already decoded from keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    Fold,
    Call,
    Raise,
    AllIn,
    Yes,
    No,
    ToggleHelp,
    Quit,
}

/// An answer to the current prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Decide(Decision),
    PlayAgain(bool),
    Quit,
}

/// Everything the table screen draws, copied out of the engine after each event.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Screen {
    /// Seat whose cards are always face up.
    pub human_seat: usize,
    pub hand: u64,
    pub street: Street,
    pub pot: u64,
    pub highest_bet: u64,
    pub community: Vec<Card>,
    pub seats: Vec<Participant>,
    pub result: Option<HandResult>,
    pub prompt: Prompt,
    notice: Option<String>,
    log: VecDeque<String>,
    help_open: bool,
}

impl Screen {
    pub const LOG_CAPACITY: usize = 200;

    pub fn new(human_seat: usize) -> Self {
        Self {
            human_seat,
            hand: 0,
            street: Street::Preflop,
            pot: 0,
            highest_bet: 0,
            community: Vec::new(),
            seats: Vec::new(),
            result: None,
            prompt: Prompt::Idle,
            notice: None,
            log: VecDeque::new(),
            help_open: false,
        }
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn log_recent(&self, n: usize) -> impl Iterator<Item = &str> {
        let skip = self.log.len().saturating_sub(n);
        self.log.iter().skip(skip).map(String::as_str)
    }

    /// Hole cards are shown for the human seat, and for everyone once the hand is over.
    pub fn reveals(&self, seat: usize) -> bool {
        seat == self.human_seat || self.result.is_some()
    }

    pub fn capture(&mut self, view: &dyn TableView) {
        self.street = view.street();
        self.pot = view.pot();
        self.highest_bet = view.highest_bet();
        self.community.clear();
        self.community.extend_from_slice(view.community());
        self.seats.clear();
        self.seats.extend_from_slice(view.participants());
    }

    pub fn observe(&mut self, view: &dyn TableView, event: &TableEvent) {
        self.capture(view);
        match event {
            TableEvent::HandStarted { hand } => {
                self.hand = *hand;
                self.result = None;
                self.push_log(format!("Hand {hand}"));
            }
            TableEvent::StreetStarted { street } => {
                let board: Vec<String> = self.community.iter().map(Card::to_string).collect();
                self.push_log(format!("-- {street} {}", board.join(" ")));
            }
            TableEvent::ActionApplied(a) => {
                let name = self.seats.get(a.seat).map_or("?", Participant::name);
                let line = if a.paid > 0 {
                    format!("{name}: {} {}", a.verb.label(), a.paid)
                } else {
                    format!("{name}: {}", a.verb.label())
                };
                self.push_log(line);
            }
            TableEvent::HandFinished(result) => {
                self.push_log(result.message.clone());
                self.result = Some(result.clone());
            }
            _ => {}
        }
    }

    pub fn begin_decision(&mut self, ctx: &DecisionContext<'_>) {
        self.capture(ctx.table);
        self.notice = None;
        self.prompt =
            Prompt::Decision { seat: ctx.seat, to_call: ctx.to_call, offered: ctx.offered() };
    }

    pub fn begin_play_again(&mut self) {
        self.notice = None;
        self.prompt = Prompt::PlayAgain;
    }

    /// Apply one input. Returns a reply once the current prompt is answered.
    pub fn handle_input(&mut self, action: InputAction) -> Option<Reply> {
        match action {
            InputAction::Quit => {
                self.prompt = Prompt::Idle;
                return Some(Reply::Quit);
            }
            InputAction::ToggleHelp => {
                self.help_open = !self.help_open;
                return None;
            }
            _ => {}
        }
        let reply = match (&self.prompt, action) {
            (Prompt::Decision { .. }, InputAction::Fold) => Reply::Decide(Decision::Fold),
            (Prompt::Decision { .. }, InputAction::Call) => Reply::Decide(Decision::Call),
            (Prompt::Decision { .. }, InputAction::AllIn) => Reply::Decide(Decision::AllIn),
            (Prompt::Decision { offered, .. }, InputAction::Raise) => {
                match offered.iter().find(|d| matches!(d, Decision::Raise(_))) {
                    Some(raise) => Reply::Decide(*raise),
                    None => {
                        self.notice = Some("Not enough chips to raise".to_string());
                        return None;
                    }
                }
            }
            (Prompt::PlayAgain, InputAction::Yes) => Reply::PlayAgain(true),
            (Prompt::PlayAgain, InputAction::No) => Reply::PlayAgain(false),
            _ => return None,
        };
        self.prompt = Prompt::Idle;
        self.notice = None;
        Some(reply)
    }

    fn push_log(&mut self, line: String) {
        if self.log.len() == Self::LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TableSnapshot;
    use crate::participant::Strategy;

    fn seats() -> Vec<Participant> {
        vec![
            Participant::new("You", Strategy::Interactive, 1000),
            Participant::new("Bot", Strategy::Cautious, 1000),
        ]
    }

    #[test]
    fn decision_prompt_accepts_actions_only() {
        let ps = seats();
        let view = TableSnapshot {
            participants: &ps,
            pot: 10,
            community: &[],
            street: Street::Preflop,
            highest_bet: 10,
        };
        let ctx = DecisionContext { seat: 0, to_call: 10, any_raise: false, raise_step: 50, table: &view };
        let mut screen = Screen::new(0);
        screen.begin_decision(&ctx);
        assert_eq!(screen.handle_input(InputAction::Yes), None);
        assert_eq!(screen.handle_input(InputAction::Raise), Some(Reply::Decide(Decision::Raise(50))));
        assert_eq!(screen.prompt, Prompt::Idle);
        assert_eq!(screen.handle_input(InputAction::Fold), None);
    }

    #[test]
    fn raise_refused_when_not_offered() {
        let mut ps = seats();
        ps[0].commit(995);
        let view = TableSnapshot {
            participants: &ps,
            pot: 995,
            community: &[],
            street: Street::Flop,
            highest_bet: 1000,
        };
        let ctx = DecisionContext { seat: 0, to_call: 5, any_raise: true, raise_step: 50, table: &view };
        let mut screen = Screen::new(0);
        screen.begin_decision(&ctx);
        assert_eq!(screen.handle_input(InputAction::Raise), None);
        assert!(screen.notice().is_some());
        assert_eq!(screen.handle_input(InputAction::Call), Some(Reply::Decide(Decision::Call)));
    }

    #[test]
    fn play_again_prompt_and_quit() {
        let mut screen = Screen::new(0);
        screen.begin_play_again();
        assert_eq!(screen.handle_input(InputAction::Call), None);
        assert_eq!(screen.handle_input(InputAction::No), Some(Reply::PlayAgain(false)));
        assert_eq!(screen.handle_input(InputAction::Quit), Some(Reply::Quit));
    }

    #[test]
    fn log_is_bounded() {
        let mut screen = Screen::new(0);
        for i in 0..(Screen::LOG_CAPACITY + 5) {
            screen.push_log(format!("line {i}"));
        }
        assert_eq!(screen.log_recent(usize::MAX).count(), Screen::LOG_CAPACITY);
        assert_eq!(screen.log_recent(1).next(), Some("line 204"));
    }
}
