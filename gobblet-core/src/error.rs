use thiserror::Error;

use crate::{Player, Pos, Size};

/// Reason a move was rejected by [`Board::make_move`](crate::Board::make_move).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("square {0} is off the board")]
    OutOfBounds(Pos),
    #[error("the game is already over")]
    GameOver,
    #[error("it is {active}'s turn, not {owner}'s")]
    WrongPlayer { owner: Player, active: Player },
    #[error("{player} has no {size} pieces left")]
    NoStock { player: Player, size: Size },
    #[error("there is no piece at {0}")]
    EmptySource(Pos),
    #[error("the piece at {0} belongs to the opponent")]
    NotYourPiece(Pos),
    #[error("a piece cannot move onto its own square")]
    SameSquare,
    #[error("lifting the piece at {0} would uncover a winning line for the opponent")]
    UncoversWin(Pos),
    #[error("a {size} piece cannot cover the {top} piece at {to}")]
    CannotGobble { size: Size, top: Size, to: Pos },
}
