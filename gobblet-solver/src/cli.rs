//! Command-line interface for the gobblet binary.

use clap::{Args, Parser, Subcommand, ValueEnum};

use gobblet_solver::{MoveOrdering, SearchConfig};

/// Default search depth; a few seconds at most from the opening.
pub const DEFAULT_DEPTH: u32 = 8;

/// Largest accepted search depth.
pub const MAX_DEPTH: u32 = 64;

/// Gobblet Gobblers engine - play against it or analyse positions
#[derive(Parser, Debug)]
#[command(name = "gobblet")]
#[command(about = "Minimax engine for Gobblet Gobblers", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Search switches shared by every subcommand
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Disable alpha-beta cutoffs (plain minimax)
    #[arg(long, global = true)]
    pub no_prune: bool,

    /// Disable the transposition table
    #[arg(long, global = true)]
    pub no_table: bool,

    /// Child ordering
    #[arg(long, global = true, value_enum, default_value_t = OrderingArg::Heuristic)]
    pub ordering: OrderingArg,

    /// Seed for --ordering shuffled
    #[arg(long, global = true, default_value_t = 0)]
    pub seed: u64,

    /// Print search statistics after each search
    #[arg(long, global = true)]
    pub stats: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderingArg {
    Natural,
    Heuristic,
    Shuffled,
}

impl SearchArgs {
    pub fn config(&self) -> SearchConfig {
        SearchConfig {
            pruning: !self.no_prune,
            use_table: !self.no_table,
            ordering: match self.ordering {
                OrderingArg::Natural => MoveOrdering::Natural,
                OrderingArg::Heuristic => MoveOrdering::Heuristic,
                OrderingArg::Shuffled => MoveOrdering::Shuffled { seed: self.seed },
            },
        }
    }
}

/// Position to analyse
#[derive(Args, Debug)]
pub struct PositionArgs {
    /// Plies to search
    #[arg(short, long, default_value_t = DEFAULT_DEPTH, value_parser = clap::value_parser!(u32).range(0..=MAX_DEPTH as i64))]
    pub depth: u32,

    /// Moves to replay from the initial position, separated by ';'
    /// (e.g. "b1 M; a0 S; b1 a2")
    #[arg(long)]
    pub moves: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game against the engine
    Play {
        /// Which player the human controls
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
        human: u8,

        /// Engine search depth
        #[arg(short, long, default_value_t = DEFAULT_DEPTH, value_parser = clap::value_parser!(u32).range(1..=MAX_DEPTH as i64))]
        depth: u32,
    },

    /// Report the forced winner of a position at a given depth
    Solve(PositionArgs),

    /// Print the engine's move for a position
    BestMove(PositionArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["gobblet", "solve"]).unwrap();
        assert_eq!(cli.search.config(), SearchConfig::default());
        match cli.command {
            Command::Solve(args) => {
                assert_eq!(args.depth, DEFAULT_DEPTH);
                assert_eq!(args.moves, None);
                assert!(!args.json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gobblet",
            "best-move",
            "--depth",
            "3",
            "--moves",
            "b1 M; a0 S",
            "--no-prune",
            "--ordering",
            "shuffled",
            "--seed",
            "7",
        ])
        .unwrap();

        let config = cli.search.config();
        assert!(!config.pruning);
        assert!(config.use_table);
        assert_eq!(config.ordering, MoveOrdering::Shuffled { seed: 7 });
        match cli.command {
            Command::BestMove(args) => {
                assert_eq!(args.depth, 3);
                assert_eq!(args.moves.as_deref(), Some("b1 M; a0 S"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_depth_is_capped() {
        let cli = Cli::try_parse_from(["gobblet", "solve", "--depth", "64"]).unwrap();
        assert!(matches!(cli.command, Command::Solve(PositionArgs { depth: MAX_DEPTH, .. })));
        assert!(Cli::try_parse_from(["gobblet", "solve", "--depth", "0"]).is_ok());
        assert!(Cli::try_parse_from(["gobblet", "solve", "--depth", "65"]).is_err());
        assert!(Cli::try_parse_from(["gobblet", "best-move", "--depth", "4294967295"]).is_err());
        assert!(Cli::try_parse_from(["gobblet", "play", "--depth", "65"]).is_err());
    }

    #[test]
    fn test_play_rejects_bad_player() {
        assert!(Cli::try_parse_from(["gobblet", "play", "--human", "3"]).is_err());
        assert!(Cli::try_parse_from(["gobblet", "play", "--depth", "0"]).is_err());
        let cli = Cli::try_parse_from(["gobblet", "play", "--human", "2"]).unwrap();
        assert!(matches!(cli.command, Command::Play { human: 2, depth: DEFAULT_DEPTH }));
    }
}
