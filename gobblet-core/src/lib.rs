//! Gobblet Gobblers game logic with a stack-based, incrementally hashed board.
//!
//! # Board Layout
//!
//! ```text
//!        a      b      c        notation: column letter, then row digit
//!   0  (0,0)  (0,1)  (0,2)      index = row * 3 + col
//!   1  (1,0)  (1,1)  (1,2)
//!   2  (2,0)  (2,1)  (2,2)      "b2" = row 2, column 1
//! ```
//!
//! Each square holds a stack of at most three pieces, bottom to top. Sizes
//! strictly increase up a stack, and only the top piece counts for win
//! detection and gobbling.
//!
//! # Hashing
//!
//! `Board::hash()` is the XOR of one Zobrist key per (square, piece) for
//! every piece on the board, covered pieces included, and the key of the
//! player to move. `make_move` and `undo_move` toggle exactly the keys that
//! changed, so the hash never has to be recomputed during search.

use std::fmt;

use serde::{Deserialize, Serialize};

mod board;
mod error;
mod zobrist;

pub use board::{Board, Square, STOCK_PER_SIZE, WIN_LINES};
pub use error::MoveError;
pub use zobrist::{piece_key, player_key};

/// Player identifier.
///
/// "No winner yet" is `Option::<Player>::None`, so a move can never be owned
/// by nobody.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Zero-based index (0 for `One`, 1 for `Two`) for per-player tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Convert from u8 (1 or 2) to Player.
    #[inline]
    pub fn from_bits(bits: u8) -> Option<Player> {
        match bits {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", *self as u8)
    }
}

/// Piece size.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Size {
    Small = 0,
    Medium = 1,
    Large = 2,
}

impl Size {
    /// Check if this size can gobble (cover) another size.
    #[inline]
    pub fn can_gobble(self, other: Size) -> bool {
        self > other
    }

    /// Get all sizes as an iterator, smallest first.
    pub fn all() -> impl Iterator<Item = Size> {
        [Size::Small, Size::Medium, Size::Large].into_iter()
    }

    /// One-letter notation symbol.
    pub fn symbol(self) -> char {
        match self {
            Size::Small => 'S',
            Size::Medium => 'M',
            Size::Large => 'L',
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
        })
    }
}

/// A piece: owner and size. Pieces of the same owner and size are
/// interchangeable.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub owner: Player,
    pub size: Size,
}

impl Piece {
    #[inline]
    pub const fn new(owner: Player, size: Size) -> Piece {
        Piece { owner, size }
    }

    /// Identity in `0..6` (owner-major), used to index Zobrist keys.
    #[inline]
    pub fn id(self) -> usize {
        self.owner.index() * 3 + self.size as usize
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.owner as u8, self.size.symbol())
    }
}

/// Position on the 3x3 board.
///
/// Any row and column can be represented so that untrusted input can be
/// rejected by move validation; only `is_valid()` positions index the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    /// Create a position from row and column.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Pos {
        Pos { row, col }
    }

    /// Create a position from a row-major index (0-8).
    #[inline]
    pub const fn from_index(idx: u8) -> Pos {
        Pos { row: idx / 3, col: idx % 3 }
    }

    /// Row-major index (0-8). Only meaningful for valid positions.
    #[inline]
    pub fn index(self) -> usize {
        self.row as usize * 3 + self.col as usize
    }

    /// Check if both row and column are in range.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.row < 3 && self.col < 3
    }

    /// Iterate over all 9 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..9).map(Pos::from_index)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}{}", (b'a' + self.col) as char, self.row)
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}

/// A move in the game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Place a piece from the owner's stock onto the board.
    Place { piece: Piece, to: Pos },
    /// Move whatever piece is on top of `from` to `to`. Its owner and size are
    /// read from the board when the move is applied.
    Relocate { from: Pos, to: Pos },
}

impl Move {
    /// Placement of a new `size` piece owned by `player`.
    #[inline]
    pub fn place(player: Player, to: Pos, size: Size) -> Move {
        Move::Place {
            piece: Piece::new(player, size),
            to,
        }
    }

    /// Relocation of the top piece at `from`.
    #[inline]
    pub fn relocate(from: Pos, to: Pos) -> Move {
        Move::Relocate { from, to }
    }

    /// Get the destination position of the move.
    #[inline]
    pub fn to(&self) -> Pos {
        match self {
            Move::Place { to, .. } => *to,
            Move::Relocate { to, .. } => *to,
        }
    }

    /// Get the source position for relocations.
    #[inline]
    pub fn from(&self) -> Option<Pos> {
        match self {
            Move::Place { .. } => None,
            Move::Relocate { from, .. } => Some(*from),
        }
    }

    #[inline]
    pub fn is_place(&self) -> bool {
        matches!(self, Move::Place { .. })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place { piece, to } => write!(f, "{} {}", to, piece.size.symbol()),
            Move::Relocate { from, to } => write!(f, "{} {}", from, to),
        }
    }
}

/// Upper bound on legal moves in one position: 3 sizes x 9 squares of
/// placements plus 6 pieces x 8 destinations of relocations is 75.
pub const MAX_MOVES: usize = 80;

/// A fixed-size move list that avoids heap allocation.
#[derive(Clone, Copy)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: u8,
}

impl MoveList {
    const FILLER: Move = Move::Relocate {
        from: Pos::new(0, 0),
        to: Pos::new(0, 0),
    };

    /// Create an empty move list.
    #[inline]
    pub const fn new() -> MoveList {
        MoveList {
            moves: [Self::FILLER; MAX_MOVES],
            len: 0,
        }
    }

    /// Add a move to the list.
    #[inline]
    pub fn push(&mut self, mov: Move) {
        debug_assert!((self.len as usize) < MAX_MOVES);
        self.moves[self.len as usize] = mov;
        self.len += 1;
    }

    /// Get the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Check if empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get a move by index.
    #[inline]
    pub fn get(&self, idx: usize) -> Move {
        self.as_slice()[idx]
    }

    pub fn contains(&self, mov: &Move) -> bool {
        self.as_slice().contains(mov)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len as usize]
    }

    /// Mutable view, for reordering in place.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len as usize]
    }

    /// Iterate over moves.
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.as_slice().iter().copied()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::Two.opponent(), Player::One);
    }

    #[test]
    fn test_player_index() {
        assert_eq!(Player::One.index(), 0);
        assert_eq!(Player::Two.index(), 1);
        assert_eq!(Player::from_bits(2), Some(Player::Two));
        assert_eq!(Player::from_bits(0), None);
    }

    #[test]
    fn test_size_can_gobble() {
        assert!(!Size::Small.can_gobble(Size::Small));
        assert!(!Size::Small.can_gobble(Size::Medium));
        assert!(!Size::Small.can_gobble(Size::Large));

        assert!(Size::Medium.can_gobble(Size::Small));
        assert!(!Size::Medium.can_gobble(Size::Medium));
        assert!(!Size::Medium.can_gobble(Size::Large));

        assert!(Size::Large.can_gobble(Size::Small));
        assert!(Size::Large.can_gobble(Size::Medium));
        assert!(!Size::Large.can_gobble(Size::Large));
    }

    #[test]
    fn test_piece_ids_are_distinct() {
        let mut seen = [false; 6];
        for owner in [Player::One, Player::Two] {
            for size in Size::all() {
                let id = Piece::new(owner, size).id();
                assert!(!seen[id], "duplicate id {id}");
                seen[id] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_pos_index_roundtrip() {
        for i in 0..9 {
            let pos = Pos::from_index(i);
            assert!(pos.is_valid());
            assert_eq!(pos.index(), i as usize);
            assert_eq!(Pos::new(pos.row, pos.col), pos);
        }
    }

    #[test]
    fn test_pos_validity() {
        assert!(Pos::new(2, 2).is_valid());
        assert!(!Pos::new(3, 0).is_valid());
        assert!(!Pos::new(0, 3).is_valid());
    }

    #[test]
    fn test_pos_display() {
        assert_eq!(Pos::new(2, 1).to_string(), "b2");
        assert_eq!(Pos::new(0, 0).to_string(), "a0");
        assert_eq!(Pos::new(4, 0).to_string(), "(4, 0)");
    }

    #[test]
    fn test_move_accessors() {
        let place = Move::place(Player::One, Pos::new(1, 1), Size::Small);
        let slide = Move::relocate(Pos::new(0, 0), Pos::new(2, 2));

        assert_eq!(place.to(), Pos::new(1, 1));
        assert_eq!(place.from(), None);
        assert!(place.is_place());
        assert_eq!(slide.to(), Pos::new(2, 2));
        assert_eq!(slide.from(), Some(Pos::new(0, 0)));
        assert!(!slide.is_place());
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::place(Player::Two, Pos::new(2, 1), Size::Small).to_string(), "b2 S");
        assert_eq!(Move::relocate(Pos::new(1, 1), Pos::new(0, 0)).to_string(), "b1 a0");
    }

    #[test]
    fn test_move_json_shape() {
        let mov = Move::relocate(Pos::new(1, 1), Pos::new(0, 0));
        let json = serde_json::to_value(mov).unwrap();
        assert_eq!(json["Relocate"]["from"]["row"], 1);
        assert_eq!(json["Relocate"]["to"]["col"], 0);
    }

    #[test]
    fn test_move_list_basic() {
        let mut list = MoveList::new();
        assert!(list.is_empty());

        let a = Move::place(Player::One, Pos::new(0, 0), Size::Large);
        let b = Move::relocate(Pos::new(0, 0), Pos::new(1, 1));
        list.push(a);
        list.push(b);

        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0), a);
        assert!(list.contains(&b));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![a, b]);

        list.as_mut_slice().reverse();
        assert_eq!(list.get(0), b);
    }
}
