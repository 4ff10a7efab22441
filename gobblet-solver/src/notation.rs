//! Text notation for squares and moves.
//!
//! A square is its column letter (`a`-`c`) followed by its row digit
//! (`0`-`2`), so `b2` is row 2, column 1. A placement is `"<square> <size>"`
//! (`"b2 S"`) and a relocation is `"<from> <to>"` (`"b1 a0"`). Input is
//! case-insensitive and is the same text `Move`'s `Display` produces.

use thiserror::Error;

use gobblet_core::{Move, Player, Pos, Size};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("expected \"<square> <size>\" or \"<from> <to>\", got {0:?}")]
    Malformed(String),
    #[error("bad square {0:?}: expected a column a-c followed by a row 0-2")]
    BadSquare(String),
}

pub fn parse_square(text: &str) -> Result<Pos, NotationError> {
    match text.to_ascii_lowercase().as_bytes() {
        &[col @ b'a'..=b'c', row @ b'0'..=b'2'] => Ok(Pos::new(row - b'0', col - b'a')),
        _ => Err(NotationError::BadSquare(text.to_string())),
    }
}

pub fn parse_size(text: &str) -> Option<Size> {
    match text.to_ascii_uppercase().as_str() {
        "S" => Some(Size::Small),
        "M" => Some(Size::Medium),
        "L" => Some(Size::Large),
        _ => None,
    }
}

/// Parse a move for `player`, who owns any placed piece.
pub fn parse_move(text: &str, player: Player) -> Result<Move, NotationError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let &[first, second] = parts.as_slice() else {
        return Err(NotationError::Malformed(text.to_string()));
    };

    let square = parse_square(first)?;
    match parse_size(second) {
        Some(size) => Ok(Move::place(player, square, size)),
        None => Ok(Move::relocate(square, parse_square(second)?)),
    }
}
