//! Terminal front-end.
//!
//! The engine drives the session; the terminal only answers it. A shared
//! [`controller::Console`] redraws on every table event and blocks on the
//! keyboard whenever the interactive seat or the restart prompt needs input.

pub mod app;
pub mod controller;
pub mod ui;

pub use controller::{
    map_key, Console, ConsoleControl, ConsoleObserver, ConsoleSource, CrosstermKeys, KeySource,
    SharedConsole,
};
