//! Search statistics tracking.

use std::time::Instant;

use tracing::info;

/// Counters collected during one root search.
#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    /// Nodes entered, table hits included
    pub nodes: u64,

    /// Nodes answered from the transposition table
    pub table_hits: u64,

    /// Nodes scored by the evaluator (depth exhausted or game won)
    pub leaves: u64,

    /// Won positions reached, indexed by winner
    pub terminal_wins: [u64; 2],

    /// Positions where the side to move had no legal move
    pub no_move_losses: u64,

    /// Beta cutoffs
    pub cutoffs: u64,

    start_time: Option<Instant>,
}

impl SearchStats {
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Nodes per second since the search started.
    pub fn nodes_per_sec(&self) -> f64 {
        if let Some(start) = self.start_time {
            let elapsed = start.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                return self.nodes as f64 / elapsed;
            }
        }
        0.0
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|s| s.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Emit the counters as one structured log event.
    pub fn log_summary(&self, table_size: usize) {
        info!(
            nodes = self.nodes,
            table_hits = self.table_hits,
            leaves = self.leaves,
            p1_wins = self.terminal_wins[0],
            p2_wins = self.terminal_wins[1],
            no_move_losses = self.no_move_losses,
            cutoffs = self.cutoffs,
            table_size,
            elapsed_secs = self.elapsed_secs(),
            "search finished"
        );
    }

    /// Print final summary
    pub fn print_summary(&self, table_size: usize) {
        println!("Nodes searched: {}", self.nodes);
        println!("Table hits: {}", self.table_hits);
        println!("Table size: {}", table_size);
        println!("Leaves evaluated: {}", self.leaves);
        println!("  - P1 wins: {}", self.terminal_wins[0]);
        println!("  - P2 wins: {}", self.terminal_wins[1]);
        println!("No-move losses: {}", self.no_move_losses);
        println!("Cutoffs: {}", self.cutoffs);
        println!(
            "Time: {:.2}s ({:.0} nodes/sec)",
            self.elapsed_secs(),
            self.nodes_per_sec()
        );
    }
}
