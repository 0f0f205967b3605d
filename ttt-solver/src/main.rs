//! Tic-tac-toe Solver
//!
//! Analyses the full game tree with the same exhaustive minimax the AI uses.

mod tree;

use std::time::Instant;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ttt_core::{Ai, Game, Player, Position, Search};

use crate::tree::count_tree;

#[derive(Parser, Debug)]
#[command(name = "solver", about = "Game-tree analysis for tic-tac-toe")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count every node and terminal position of the full game tree
    Tree,
    /// Minimax value of the empty board and of each opening move
    Openings,
    /// Let the AI play both sides from each opening; fails unless all are draws
    Selfplay {
        /// Print every position, not just the final one
        #[arg(long)]
        verbose: bool,
    },
}

fn outcome_str(value: i8) -> &'static str {
    match value {
        1 => "X wins",
        -1 => "O wins",
        _ => "Draw",
    }
}

fn run_tree() {
    info!("counting game tree from the empty board");
    let start = Instant::now();
    let counts = count_tree(&Game::new());

    println!("Nodes:        {}", counts.nodes);
    println!("Games:        {}", counts.games());
    println!("  X wins:     {}", counts.wins_p1);
    println!("  O wins:     {}", counts.wins_p2);
    println!("  Draws:      {}", counts.draws);
    println!("Max depth:    {}", counts.max_depth);
    println!("Time:         {:.2}s", start.elapsed().as_secs_f64());
}

fn run_openings() {
    let start = Instant::now();
    let mut search = Search::new(Player::One);
    let (value, best) = search.minimax(&Game::new());
    println!(
        "Empty board: {} (best opening {}, {} nodes)",
        outcome_str(value),
        best.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
        search.nodes()
    );
    println!();

    for opening in Position::all() {
        let mut game = Game::new();
        game.make_move(opening);

        let mut search = Search::new(Player::One);
        let (value, _) = search.minimax(&game);
        println!(
            "Opening {} (cell {}): {:<6} {:>7} nodes",
            opening,
            opening.index() + 1,
            outcome_str(value),
            search.nodes()
        );
    }
    println!("\nTime: {:.2}s", start.elapsed().as_secs_f64());
}

fn run_selfplay(verbose: bool) -> anyhow::Result<()> {
    let ais = [Ai::new(Player::One), Ai::new(Player::Two)];
    let mut decisive = Vec::new();

    for opening in Position::all() {
        let mut game = Game::new();
        game.make_move(opening);
        if verbose {
            println!("{}\n", game);
        }

        while ais[(game.turns() % 2) as usize].make_move(&mut game) {
            if verbose {
                println!("{}\n", game);
            }
        }

        let state = game.state();
        println!("Opening {}: {}", opening, if state.is_draw() { "draw" } else { "DECIDED" });
        println!("{}\n", game.board());
        if !state.is_draw() {
            decisive.push((opening, state.winner));
        }
    }

    if !decisive.is_empty() {
        bail!("{} self-play games were not drawn: {:?}", decisive.len(), decisive);
    }
    println!("All 9 openings end in a draw with optimal play.");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Command::Tree => run_tree(),
        Command::Openings => run_openings(),
        Command::Selfplay { verbose } => run_selfplay(verbose)?,
    }
    Ok(())
}
