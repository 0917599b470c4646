use thiserror::Error;

use crate::grid::Move;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid position: {reason}")]
    InvalidPosition { reason: String },

    #[error("no legal move available")]
    NoLegalMove,

    #[error("move {mv} is out of bounds")]
    OutOfBounds { mv: Move },

    #[error("move {mv} targets an occupied cell")]
    Occupied { mv: Move },

    #[error("game already over")]
    GameOver,

    #[error("board string has {got} cells, expected {expected}")]
    InvalidBoardLength { expected: usize, got: usize },

    #[error("invalid character '{character}' at cell {position}")]
    InvalidCellCharacter { character: char, position: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
