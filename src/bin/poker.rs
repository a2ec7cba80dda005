use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use poker_rounds::agents::DecisionSource;
use poker_rounds::config::TableConfig;
use poker_rounds::engine::TableView;
use poker_rounds::game::Table;
use poker_rounds::participant::Strategy;
use poker_rounds::tui::{Console, ConsoleControl, ConsoleObserver, ConsoleSource, CrosstermKeys};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ratatui::prelude::*;
use std::error::Error;
use std::fs::File;
use std::io::{self, IsTerminal, Stdout};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "poker-rounds")]
#[command(about = "Play Hold'em style betting rounds against three bots", version)]
struct Args {
    /// Seed for shuffling and bot decisions; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Chips every seat starts with
    #[arg(long, default_value_t = 1000)]
    stack: u64,

    /// Forced bet everyone matches before the flop
    #[arg(long, default_value_t = 10)]
    min_bet: u64,

    /// Chips added on top of the call when you press R
    #[arg(long, default_value_t = 50)]
    raise_step: u64,

    /// Pause after each bot action, in milliseconds
    #[arg(long, default_value_t = 400)]
    delay_ms: u64,

    /// Write the hand log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Level for --log-file (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,
}

impl Args {
    fn table_config(&self) -> TableConfig {
        TableConfig::default()
            .with_starting_stack(self.stack)
            .with_preflop_min_bet(self.min_bet)
            .with_raise_step(self.raise_step)
    }
}

fn init_logging(path: &Path, level: log::LevelFilter) -> Result<(), Box<dyn Error>> {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::WriteLogger::init(level, config, File::create(path)?)?;
    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_logging(path, args.log_level)?;
    }

    let mut table = Table::new(args.table_config())?;
    if !io::stdout().is_terminal() {
        println!(
            "poker-rounds needs a real terminal (TTY). Run it in a terminal and press q to quit. Version: {}",
            poker_rounds::VERSION
        );
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("session seed {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let human = table
        .participants()
        .iter()
        .position(|p| p.strategy() == Strategy::Interactive)
        .unwrap_or(0);

    let console = Console::new(setup_terminal()?, CrosstermKeys, human)
        .with_pace(Duration::from_millis(args.delay_ms))
        .shared();
    let mut policies = table.policies(|_| -> Box<dyn DecisionSource> {
        Box::new(ConsoleSource(Rc::clone(&console)))
    });
    let outcome = table.run_session(
        &mut policies,
        &mut rng,
        &mut ConsoleObserver(Rc::clone(&console)),
        &mut ConsoleControl(Rc::clone(&console)),
    );

    // Always attempt to restore the terminal
    restore_terminal(console.borrow_mut().terminal_mut())?;

    match outcome {
        Ok(summary) => {
            println!("Played {} hand(s).", summary.hands_played);
            for (name, stack) in &summary.stacks {
                println!("  {name}: {stack}");
            }
        }
        Err(e) if e.is_interrupted() => println!("Left the table after {} hand(s).", table.hands_played()),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
