//! Perfect-play search for noughts and crosses.
//!
//! The engine plays the maximizing side (`O`) against a minimizing human
//! (`X`) and searches every position to the end of the game.

pub mod error;
pub mod evaluator;
pub mod game;
pub mod grid;
pub mod search;

pub use error::{Error, Result};
pub use evaluator::{evaluate, Outcome};
pub use game::Game;
pub use grid::{Cell, Grid, Move, Side, SIZE};
pub use search::{Score, Search, SearchResult, INFINITY, WIN};

/// The optimal move for the Maximizer, using alpha-beta search.
pub fn best_move(grid: &mut Grid) -> Result<Move> {
    Search::new().best_move(grid)
}
