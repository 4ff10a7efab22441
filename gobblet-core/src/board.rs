use std::fmt;
use std::ops::ControlFlow;

use smallvec::SmallVec;

use crate::zobrist::{piece_key, player_key};
use crate::{MoveError, Move, MoveList, Piece, Player, Pos, Size};

/// Pieces of each size each player starts with.
pub const STOCK_PER_SIZE: u8 = 2;

/// Winning lines: rows, then columns, then diagonals.
pub const WIN_LINES: [[Pos; 3]; 8] = [
    [Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 2)],
    [Pos::new(1, 0), Pos::new(1, 1), Pos::new(1, 2)],
    [Pos::new(2, 0), Pos::new(2, 1), Pos::new(2, 2)],
    [Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)],
    [Pos::new(0, 1), Pos::new(1, 1), Pos::new(2, 1)],
    [Pos::new(0, 2), Pos::new(1, 2), Pos::new(2, 2)],
    [Pos::new(0, 0), Pos::new(1, 1), Pos::new(2, 2)],
    [Pos::new(0, 2), Pos::new(1, 1), Pos::new(2, 0)],
];

/// A stack of pieces on one square, bottom to top.
///
/// Sizes strictly increase up the stack, so it never holds more than three.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Square {
    stack: SmallVec<[Piece; 3]>,
}

impl Square {
    /// The visible piece, if any.
    #[inline]
    pub fn top(&self) -> Option<Piece> {
        self.stack.last().copied()
    }

    /// All pieces, bottom first.
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.stack
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// The piece that becomes visible once the top is lifted.
    #[inline]
    fn under_top(&self) -> Option<Piece> {
        self.stack.iter().rev().nth(1).copied()
    }

    #[inline]
    fn push(&mut self, piece: Piece) {
        debug_assert!(self.top().map_or(true, |top| piece.size.can_gobble(top.size)));
        self.stack.push(piece);
    }

    #[inline]
    fn pop(&mut self) -> Option<Piece> {
        self.stack.pop()
    }
}

/// Mutable game state: square stacks, stock, side to move and Zobrist hash.
///
/// Moves are applied in place with [`Board::make_move`] and reversed with
/// [`Board::undo_move`]; the hash is kept in sync by both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Square; 9],
    remaining: [[u8; 3]; 2],
    active: Player,
    hash: u64,
}

impl Board {
    /// Empty board, full stock, Player One to move.
    pub fn new() -> Board {
        Board {
            squares: Default::default(),
            remaining: [[STOCK_PER_SIZE; 3]; 2],
            active: Player::One,
            hash: player_key(Player::One),
        }
    }

    // ========== Accessors ==========

    #[inline]
    pub fn active_player(&self) -> Player {
        self.active
    }

    /// Zobrist hash of the position, side to move included.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Pieces of `size` that `player` can still place.
    #[inline]
    pub fn remaining(&self, player: Player, size: Size) -> u8 {
        self.remaining[player.index()][size as usize]
    }

    /// Remaining stock of `player`, indexed by size.
    pub fn stock(&self, player: Player) -> [u8; 3] {
        self.remaining[player.index()]
    }

    /// Pieces of `player` on the board (visible or covered), indexed by size.
    pub fn pieces_on_board(&self, player: Player) -> [u8; 3] {
        let mut counts = [0u8; 3];
        for square in &self.squares {
            for piece in square.pieces().iter().filter(|p| p.owner == player) {
                counts[piece.size as usize] += 1;
            }
        }
        counts
    }

    /// Square at `pos`. Panics if `pos` is off the board.
    #[inline]
    pub fn square(&self, pos: Pos) -> &Square {
        &self.squares[pos.index()]
    }

    /// Square at (`row`, `col`), or `None` if out of range.
    pub fn get(&self, row: u8, col: u8) -> Option<&Square> {
        let pos = Pos::new(row, col);
        pos.is_valid().then(|| self.square(pos))
    }

    /// Visible piece at `pos`; `None` for an empty or off-board square.
    #[inline]
    pub fn top_piece(&self, pos: Pos) -> Option<Piece> {
        if pos.is_valid() {
            self.square(pos).top()
        } else {
            None
        }
    }

    // ========== Win Detection ==========

    /// Owner of the piece visible at `pos`, pretending the top piece of
    /// `lifted` has been picked up.
    #[inline]
    fn visible_owner(&self, pos: Pos, lifted: Option<Pos>) -> Option<Player> {
        let square = self.square(pos);
        let piece = if lifted == Some(pos) {
            square.under_top()
        } else {
            square.top()
        };
        piece.map(|p| p.owner)
    }

    fn line_owner(&self, line: &[Pos; 3], lifted: Option<Pos>) -> Option<Player> {
        let owner = self.visible_owner(line[0], lifted)?;
        line[1..]
            .iter()
            .all(|&pos| self.visible_owner(pos, lifted) == Some(owner))
            .then_some(owner)
    }

    fn has_line(&self, player: Player, lifted: Option<Pos>) -> bool {
        WIN_LINES
            .iter()
            .any(|line| self.line_owner(line, lifted) == Some(player))
    }

    /// Owner of the first complete line (rows, columns, diagonals), if any.
    pub fn check_win(&self) -> Option<Player> {
        WIN_LINES
            .iter()
            .find_map(|line| self.line_owner(line, None))
    }

    // ========== Validation ==========

    #[inline]
    fn fits(&self, size: Size, to: Pos) -> bool {
        self.top_piece(to)
            .map_or(true, |top| size.can_gobble(top.size))
    }

    fn check_destination(&self, size: Size, to: Pos) -> Result<(), MoveError> {
        match self.top_piece(to) {
            Some(top) if !size.can_gobble(top.size) => Err(MoveError::CannotGobble {
                size,
                top: top.size,
                to,
            }),
            _ => Ok(()),
        }
    }

    /// Check a move against the current position without applying it.
    pub fn validate(&self, mov: Move) -> Result<(), MoveError> {
        let to = mov.to();
        if !to.is_valid() {
            return Err(MoveError::OutOfBounds(to));
        }
        if let Some(from) = mov.from() {
            if !from.is_valid() {
                return Err(MoveError::OutOfBounds(from));
            }
        }
        if self.check_win().is_some() {
            return Err(MoveError::GameOver);
        }

        let size = match mov {
            Move::Place { piece, .. } => {
                if piece.owner != self.active {
                    return Err(MoveError::WrongPlayer {
                        owner: piece.owner,
                        active: self.active,
                    });
                }
                if self.remaining(piece.owner, piece.size) == 0 {
                    return Err(MoveError::NoStock {
                        player: piece.owner,
                        size: piece.size,
                    });
                }
                piece.size
            }
            Move::Relocate { from, to } => {
                let piece = self.top_piece(from).ok_or(MoveError::EmptySource(from))?;
                if piece.owner != self.active {
                    return Err(MoveError::NotYourPiece(from));
                }
                if from == to {
                    return Err(MoveError::SameSquare);
                }
                if self.has_line(self.active.opponent(), Some(from)) {
                    return Err(MoveError::UncoversWin(from));
                }
                piece.size
            }
        };

        self.check_destination(size, to)
    }

    #[inline]
    pub fn is_legal(&self, mov: Move) -> bool {
        self.validate(mov).is_ok()
    }

    // ========== Make & Undo ==========

    /// Validate and apply a move, then pass the turn.
    ///
    /// On error the board is left untouched.
    pub fn make_move(&mut self, mov: Move) -> Result<(), MoveError> {
        self.validate(mov)?;
        self.apply(mov);
        Ok(())
    }

    /// Apply a move already known to be legal.
    ///
    /// # Panics
    ///
    /// If the move is illegal in this position.
    pub fn must_make_move(&mut self, mov: Move) {
        if let Err(err) = self.make_move(mov) {
            panic!("illegal move {mov}: {err}");
        }
    }

    fn apply(&mut self, mov: Move) {
        let piece = match mov {
            Move::Place { piece, .. } => {
                self.remaining[piece.owner.index()][piece.size as usize] -= 1;
                piece
            }
            Move::Relocate { from, .. } => {
                let piece = self.squares[from.index()]
                    .pop()
                    .expect("No piece at source");
                self.hash ^= piece_key(from, piece);
                piece
            }
        };
        let to = mov.to();
        self.squares[to.index()].push(piece);
        self.hash ^= piece_key(to, piece);
        self.switch_player();
    }

    /// Reverse the most recent `make_move(mov)`.
    ///
    /// # Panics
    ///
    /// If the destination does not show the moved piece on top, i.e. `mov`
    /// was not the last move made.
    pub fn undo_move(&mut self, mov: Move) {
        let to = mov.to();
        let mover = self.active.opponent();
        let top = self.top_piece(to);
        let matches = match (mov, top) {
            (Move::Place { piece, .. }, Some(top)) => top == piece && piece.owner == mover,
            (Move::Relocate { from, .. }, Some(top)) => top.owner == mover && from.is_valid(),
            (_, None) => false,
        };
        if !matches {
            panic!("cannot undo {mov}: {to} does not hold the moved piece");
        }

        let piece = self.squares[to.index()]
            .pop()
            .expect("No piece at destination");
        self.hash ^= piece_key(to, piece);
        match mov {
            Move::Place { .. } => {
                self.remaining[piece.owner.index()][piece.size as usize] += 1;
            }
            Move::Relocate { from, .. } => {
                self.squares[from.index()].push(piece);
                self.hash ^= piece_key(from, piece);
            }
        }
        self.switch_player();
    }

    #[inline]
    fn switch_player(&mut self) {
        self.hash ^= player_key(self.active);
        self.active = self.active.opponent();
        self.hash ^= player_key(self.active);
    }

    // ========== Position Setup ==========

    /// Take a piece from its owner's stock and stack it on `pos` without
    /// passing the turn. The piece must fit on the square.
    pub fn push_piece(&mut self, pos: Pos, piece: Piece) -> Result<(), MoveError> {
        if !pos.is_valid() {
            return Err(MoveError::OutOfBounds(pos));
        }
        if self.remaining(piece.owner, piece.size) == 0 {
            return Err(MoveError::NoStock {
                player: piece.owner,
                size: piece.size,
            });
        }
        self.check_destination(piece.size, pos)?;

        self.remaining[piece.owner.index()][piece.size as usize] -= 1;
        self.squares[pos.index()].push(piece);
        self.hash ^= piece_key(pos, piece);
        Ok(())
    }

    /// Set the side to move, keeping the hash consistent.
    pub fn set_active_player(&mut self, player: Player) {
        if self.active != player {
            self.switch_player();
        }
    }

    /// Hash recomputed from scratch. Always equals [`Board::hash`].
    pub fn compute_hash(&self) -> u64 {
        let mut hash = player_key(self.active);
        for pos in Pos::all() {
            for &piece in self.square(pos).pieces() {
                hash ^= piece_key(pos, piece);
            }
        }
        hash
    }

    // ========== Move Generation ==========

    /// Feed every legal move to `f` in generation order until it breaks.
    fn for_each_legal(&self, mut f: impl FnMut(Move) -> ControlFlow<()>) -> ControlFlow<()> {
        if self.check_win().is_some() {
            return ControlFlow::Continue(());
        }
        let player = self.active;

        for size in Size::all() {
            if self.remaining(player, size) == 0 {
                continue;
            }
            for to in Pos::all() {
                if self.fits(size, to) {
                    f(Move::place(player, to, size))?;
                }
            }
        }

        let opponent = player.opponent();
        for from in Pos::all() {
            let Some(piece) = self.top_piece(from) else {
                continue;
            };
            // One uncover check covers every destination from this square.
            if piece.owner != player || self.has_line(opponent, Some(from)) {
                continue;
            }
            for to in Pos::all() {
                if to != from && self.fits(piece.size, to) {
                    f(Move::relocate(from, to))?;
                }
            }
        }

        ControlFlow::Continue(())
    }

    /// All legal moves for the side to move: placements (small to large,
    /// row-major) then relocations (source then destination, row-major).
    /// Empty once the game is won.
    pub fn legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let _ = self.for_each_legal(|mov| {
            moves.push(mov);
            ControlFlow::Continue(())
        });
        moves
    }

    /// Whether `legal_moves()` would be non-empty.
    pub fn has_any_legal_move(&self) -> bool {
        self.for_each_legal(|_| ControlFlow::Break(())).is_break()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   a  b  c")?;
        for row in 0..3u8 {
            let mut line = format!("{row} ");
            for col in 0..3u8 {
                let cell = match self.top_piece(Pos::new(row, col)) {
                    Some(piece) => piece.to_string(),
                    None => ".".to_string(),
                };
                line.push_str(&format!(" {cell:<2}"));
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        for player in [Player::One, Player::Two] {
            let [s, m, l] = self.stock(player);
            writeln!(f, "{player} stock: S{s} M{m} L{l}")?;
        }
        write!(f, "{} to move", self.active)
    }
}
