use crate::agents::{Decision, DecisionContext, DecisionSource, PolicyError};
use crate::engine::{TableEvent, TableObserver, TableView};
use crate::game::{HandResult, SessionControl};
use crate::tui::app::{InputAction, Reply, Screen};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

/// Blocking supply of key presses.
pub trait KeySource {
    fn next_key(&mut self) -> io::Result<KeyCode>;
}

/// Reads the real keyboard through crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn next_key(&mut self) -> io::Result<KeyCode> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key.code);
                }
            }
        }
    }
}

/// Scripted keys; running dry reads as end of input.
impl KeySource for VecDeque<KeyCode> {
    fn next_key(&mut self) -> io::Result<KeyCode> {
        self.pop_front().ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more keys"))
    }
}

pub fn map_key(code: KeyCode) -> Option<InputAction> {
    let action = match code {
        KeyCode::Char('f') | KeyCode::Char('F') => InputAction::Fold,
        KeyCode::Char('c') | KeyCode::Char('C') => InputAction::Call,
        KeyCode::Char('r') | KeyCode::Char('R') => InputAction::Raise,
        KeyCode::Char('a') | KeyCode::Char('A') => InputAction::AllIn,
        KeyCode::Char('y') | KeyCode::Char('Y') => InputAction::Yes,
        KeyCode::Char('n') | KeyCode::Char('N') => InputAction::No,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputAction::Quit,
        _ => return None,
    };
    Some(action)
}

/// Terminal, keyboard and render model, shared by the source, observer and
/// session control handed to the engine.
pub struct Console<B: Backend, K> {
    screen: Screen,
    terminal: Terminal<B>,
    keys: K,
    pace: Duration,
}

pub type SharedConsole<B, K> = Rc<RefCell<Console<B, K>>>;

impl<B: Backend, K: KeySource> Console<B, K> {
    pub fn new(terminal: Terminal<B>, keys: K, human_seat: usize) -> Self {
        Self { screen: Screen::new(human_seat), terminal, keys, pace: Duration::ZERO }
    }

    /// Pause after every automated action so the table can be followed.
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    pub fn shared(self) -> SharedConsole<B, K> {
        Rc::new(RefCell::new(self))
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    pub fn draw(&mut self) -> Result<(), PolicyError> {
        let Self { screen, terminal, .. } = self;
        terminal
            .draw(|f| ui::draw(f, screen))
            .map(|_| ())
            .map_err(|e| PolicyError::Source(e.to_string()))
    }

    fn wait_for_reply(&mut self) -> Result<Reply, PolicyError> {
        loop {
            self.draw()?;
            let code = match self.keys.next_key() {
                Ok(code) => code,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(Reply::Quit),
                Err(e) => return Err(PolicyError::Source(e.to_string())),
            };
            if let Some(reply) = map_key(code).and_then(|a| self.screen.handle_input(a)) {
                return Ok(reply);
            }
        }
    }
}

/// Decisions for the interactive seat, read from the keyboard.
pub struct ConsoleSource<B: Backend, K>(pub SharedConsole<B, K>);

impl<B: Backend, K: KeySource> DecisionSource for ConsoleSource<B, K> {
    fn request(&mut self, ctx: &DecisionContext<'_>) -> Result<Decision, PolicyError> {
        let mut console = self.0.borrow_mut();
        console.screen.begin_decision(ctx);
        loop {
            match console.wait_for_reply()? {
                Reply::Decide(decision) => return Ok(decision),
                Reply::Quit => return Err(PolicyError::Interrupted),
                Reply::PlayAgain(_) => {}
            }
        }
    }
}

/// Redraws after every table event.
pub struct ConsoleObserver<B: Backend, K>(pub SharedConsole<B, K>);

impl<B: Backend, K: KeySource> TableObserver for ConsoleObserver<B, K> {
    fn notify(&mut self, view: &dyn TableView, event: &TableEvent) {
        let mut console = self.0.borrow_mut();
        console.screen.observe(view, event);
        if let Err(e) = console.draw() {
            log::warn!("redraw failed: {e}");
        }
        let human = console.screen.human_seat;
        let automated = matches!(event, TableEvent::ActionApplied(a) if a.seat != human);
        if automated && !console.pace.is_zero() {
            thread::sleep(console.pace);
        }
    }
}

/// The Y/N prompt shown after each hand.
pub struct ConsoleControl<B: Backend, K>(pub SharedConsole<B, K>);

impl<B: Backend, K: KeySource> SessionControl for ConsoleControl<B, K> {
    fn play_again(&mut self, view: &dyn TableView, _result: &HandResult) -> Result<bool, PolicyError> {
        let mut console = self.0.borrow_mut();
        console.screen.capture(view);
        console.screen.begin_play_again();
        loop {
            match console.wait_for_reply()? {
                Reply::PlayAgain(again) => return Ok(again),
                Reply::Quit => return Ok(false),
                Reply::Decide(_) => {}
            }
        }
    }
}
