//! Zobrist keys for board hashing.
//!
//! One key per (square, piece id) and one per player to move. The table is
//! generated from a fixed seed so hashes are stable across runs.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Piece, Player, Pos};

const SEED: u64 = 0x6f62_626c_6574_2121;

struct ZobristKeys {
    pieces: [[u64; 6]; 9],
    players: [u64; 2],
}

static KEYS: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut pieces = [[0u64; 6]; 9];
    for square in pieces.iter_mut() {
        for key in square.iter_mut() {
            *key = rng.random::<u64>();
        }
    }
    let players = [rng.random::<u64>(), rng.random::<u64>()];
    ZobristKeys { pieces, players }
});

/// Key for `piece` sitting anywhere in the stack at `pos`.
#[inline]
pub fn piece_key(pos: Pos, piece: Piece) -> u64 {
    KEYS.pieces[pos.index()][piece.id()]
}

/// Key for `player` being the side to move.
#[inline]
pub fn player_key(player: Player) -> u64 {
    KEYS.players[player.index()]
}
