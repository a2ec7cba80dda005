//! poker-rounds: a Hold'em style table that plays betting rounds to a fixed point.
//!
//! Goals:
//! - Each street's betting settles only when a full pass changes nothing
//! - Chips are conserved: stacks plus pot never change within a hand
//! - Decisions come from pluggable policies; the interactive seat can be driven
//!   by a terminal, a script, or a closure
//!
//! Hands are not ranked. The pot goes to a random participant still in the hand.
//!
//! ## Quick start: a table of bots
//! ```
//! use poker_rounds::config::{SeatSpec, TableConfig};
//! use poker_rounds::engine::NullObserver;
//! use poker_rounds::game::{HandLimit, Table};
//! use poker_rounds::participant::Strategy;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let config = TableConfig::default().with_seats(vec![
//!     SeatSpec::new("Ann", Strategy::Aggressive),
//!     SeatSpec::new("Bo", Strategy::Cautious),
//!     SeatSpec::new("Cy", Strategy::Erratic),
//! ]);
//! let mut table = Table::new(config).unwrap();
//! let mut policies = table.policies(|_| unreachable!("no interactive seats"));
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//!
//! let summary = table
//!     .run_session(&mut policies, &mut rng, &mut NullObserver, &mut HandLimit::new(5))
//!     .unwrap();
//! let chips: u64 = summary.stacks.iter().map(|(_, s)| s).sum();
//! assert_eq!(chips, 3 * 1000);
//! ```
//!
//! ## TUI
//! Play against the bots with:
//! ```sh
//! cargo run --bin poker-rounds
//! ```

pub mod agents;
pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod game;
pub mod hand;
pub mod participant;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
