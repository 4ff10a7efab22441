//! Gobblet Gobblers engine
//!
//! Plays, solves and suggests moves using depth-bounded alpha-beta search.

mod cli;
mod play;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gobblet_core::{Board, Player};
use gobblet_solver::notation::parse_move;
use gobblet_solver::{SearchConfig, SearchResult, Searcher};

use crate::cli::{Cli, Command, PositionArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.search.config();
    let show_stats = cli.search.stats;
    debug!(?config, "search configuration");

    match cli.command {
        Command::Play { human, depth } => {
            let human = Player::from_bits(human).context("--human must be 1 or 2")?;
            play::run(human, depth, config, show_stats)
        }
        Command::Solve(args) => {
            let result = analyse(&args, config, show_stats)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                match result.winner {
                    Some(winner) => println!("{winner} wins with best play (depth {}).", args.depth),
                    None => println!("No forced win within {} plies (eval {}).", args.depth, result.value),
                }
            }
            Ok(())
        }
        Command::BestMove(args) => {
            let result = analyse(&args, config, show_stats)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                match result.best_move {
                    Some(mov) => println!("{mov} (eval {})", result.value),
                    None => println!("No move available."),
                }
            }
            Ok(())
        }
    }
}

/// Replay `args.moves` and search the resulting position.
fn analyse(args: &PositionArgs, config: SearchConfig, show_stats: bool) -> Result<SearchResult> {
    let board = replay(args.moves.as_deref().unwrap_or(""))?;
    if !args.json {
        println!("{board}\n");
    }

    let mut searcher = Searcher::new(config);
    let result = searcher.search(&board, args.depth);
    if show_stats {
        searcher.stats().print_summary(searcher.table().len());
    }
    Ok(result)
}

/// Play `;`-separated moves from the initial position.
fn replay(moves: &str) -> Result<Board> {
    let mut board = Board::new();
    let texts = moves.split(';').map(str::trim).filter(|s| !s.is_empty());
    for (i, text) in texts.enumerate() {
        let mov = parse_move(text, board.active_player())
            .with_context(|| format!("move {} ({text:?}) could not be parsed", i + 1))?;
        board
            .make_move(mov)
            .with_context(|| format!("move {} ({mov}) is illegal", i + 1))?;
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gobblet_core::{Pos, Size};

    #[test]
    fn test_replay() {
        let board = replay("b1 M; a1 S; b1 a2").unwrap();
        assert_eq!(board.active_player(), Player::Two);
        assert!(board.square(Pos::new(1, 1)).is_empty());
        assert_eq!(board.top_piece(Pos::new(2, 0)).map(|p| p.size), Some(Size::Medium));
    }

    #[test]
    fn test_replay_reports_illegal_move() {
        let err = replay("b1 M; b1 S").unwrap_err();
        assert!(err.to_string().contains("move 2"));
    }

    #[test]
    fn test_replay_empty() {
        assert_eq!(replay("").unwrap(), Board::new());
        assert_eq!(replay(" ; ").unwrap(), Board::new());
    }
}
