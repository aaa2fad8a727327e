use anyhow::{Context, Result};
use archess_core::controller::{GameController, GameEvent};
use archess_core::engine::config::EngineConfig;
use archess_core::engine::opponent::OpponentKind;
use archess_core::logic::board::{Board, Position};
use archess_core::logic::rules::legal_moves;
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    Random,
    Greedy,
    Minimax,
}

/// Play Archess against the computer in the terminal. You are White.
#[derive(Debug, Parser)]
#[command(name = "archess", version)]
struct Args {
    /// Computer opponent
    #[arg(long, value_enum, default_value_t = Strategy::Random)]
    opponent: Strategy,

    /// Maximum minimax depth in plies
    #[arg(long, default_value_t = 3)]
    depth: u8,

    /// Minimax thinking time in seconds
    #[arg(long, default_value_t = 5)]
    time: u32,

    /// Seed for coin flips and random moves
    #[arg(long)]
    seed: Option<u64>,

    /// Engine tuning file (JSON, weights given as multipliers)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from a placement string instead of the opening position
    #[arg(long)]
    fen: Option<String>,
}

impl Args {
    const fn opponent_kind(&self) -> OpponentKind {
        match self.opponent {
            Strategy::Random => OpponentKind::Random,
            Strategy::Greedy => OpponentKind::Greedy,
            Strategy::Minimax => OpponentKind::Minimax {
                max_depth: self.depth,
                thinking_time_secs: self.time,
            },
        }
    }
}

enum Command {
    Move(Position, Position),
    Moves,
    Export,
    Reset,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line {
        "quit" | "exit" | "q" => return Some(Command::Quit),
        "reset" | "new" => return Some(Command::Reset),
        "export" | "log" => return Some(Command::Export),
        "moves" => return Some(Command::Moves),
        "help" | "?" => return Some(Command::Help),
        _ => {}
    }

    let squares: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == '-' || c == 'x')
        .filter(|s| !s.is_empty())
        .collect();
    match squares.as_slice() {
        [from, to] => Some(Command::Move(Position::parse(from)?, Position::parse(to)?)),
        [both] if both.len() == 4 => {
            let (from, to) = both.split_at(2);
            Some(Command::Move(Position::parse(from)?, Position::parse(to)?))
        }
        _ => None,
    }
}

fn print_events(events: Vec<GameEvent>) {
    for event in events {
        match event {
            GameEvent::BoardChanged(board) => println!("\n{}", board.to_text()),
            GameEvent::StatusChanged { message, .. } => println!("{message}"),
            GameEvent::MoveLogged(record) => match &record.note {
                Some(note) => println!("{record}   [{note}]"),
                None => println!("{record}"),
            },
            GameEvent::Special { details, .. } => println!("*** {details}"),
        }
    }
}

fn print_help() {
    println!("Enter moves as `e2 e4` or `e2e4`. An Archer shoots by naming its target square.");
    println!("Commands: moves, export, reset, help, quit");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            EngineConfig::load_from_json(&json)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    let reply_delay = Duration::from_millis(config.reply_delay_ms);

    let mut game = match args.seed {
        Some(seed) => GameController::seeded(config, seed),
        None => GameController::new(config),
    };
    game.set_opponent_strategy(args.opponent_kind())?;

    if let Some(fen) = &args.fen {
        let (board, turn) = Board::from_fen(fen).context("parsing --fen")?;
        game.load_board(board, turn)?;
    } else {
        game.reset_game();
    }
    tracing::info!(opponent = %game.opponent(), "game started");

    print_help();
    print_events(game.drain_events());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if game.state().status.is_terminal() {
            println!("Game over. Type `reset` for a new game or `quit`.");
        } else if game.computer_to_move() {
            std::thread::sleep(reply_delay);
            if let Err(err) = game.request_computer_move() {
                tracing::error!(%err, "computer could not move");
            }
            print_events(game.drain_events());
            continue;
        }

        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::Reset) => game.reset_game(),
            Some(Command::Help) => print_help(),
            Some(Command::Export) => println!("{}", game.export_moves()),
            Some(Command::Moves) => {
                let state = game.state();
                let moves: Vec<String> = legal_moves(&state.board, state.turn)
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                println!("{}", moves.join(" "));
            }
            Some(Command::Move(from, to)) => {
                if let Err(err) = game.attempt_move(from, to) {
                    println!("{err}");
                }
            }
            None => println!("Unrecognised input. Type `help`."),
        }
        print_events(game.drain_events());
    }

    Ok(())
}
