use log::info;

use crate::error::{Error, Result};
use crate::evaluator::{evaluate, Outcome};
use crate::grid::{Grid, Move, Side};
use crate::search::Search;

/// The authoritative board of a game between the human and the engine.
#[derive(Debug, Clone)]
pub struct Game {
    grid: Grid,
    to_move: Side,
    outcome: Outcome,
}

impl Game {
    pub fn new(first: Side) -> Self {
        Self {
            grid: Grid::new(),
            to_move: first,
            outcome: Outcome::NotTerminal,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn done(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Plays `mv` for the side to move and passes the turn unless the game
    /// ended.
    pub fn step(&mut self, mv: Move) -> Result<Outcome> {
        if self.done() {
            return Err(Error::GameOver);
        }
        self.grid.place(mv, self.to_move)?;
        self.outcome = evaluate(&self.grid);
        if self.done() {
            info!("game over after {:?} played {}: {:?}", self.to_move, mv, self.outcome);
        } else {
            self.to_move = self.to_move.opponent();
        }
        Ok(self.outcome)
    }

    /// Lets the engine choose and play the Maximizer's move.
    pub fn ai_move(&mut self, search: &mut Search) -> Result<Move> {
        if self.done() {
            return Err(Error::GameOver);
        }
        if self.to_move != Side::Maximizer {
            return Err(Error::InvalidPosition {
                reason: "engine asked to move on the human's turn".to_string(),
            });
        }
        let mv = search.best_move(&mut self.grid)?;
        info!("engine plays {} after {} nodes", mv, search.nodes());
        self.step(mv)?;
        Ok(mv)
    }
}
