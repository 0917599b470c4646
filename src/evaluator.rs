use crate::grid::{Cell, Grid, Move, Side, SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    MaximizerWins,
    MinimizerWins,
    Draw,
    NotTerminal,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::NotTerminal
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::MaximizerWins => Some(Side::Maximizer),
            Outcome::MinimizerWins => Some(Side::Minimizer),
            Outcome::Draw | Outcome::NotTerminal => None,
        }
    }

    fn won_by(side: Side) -> Self {
        match side {
            Side::Maximizer => Outcome::MaximizerWins,
            Side::Minimizer => Outcome::MinimizerWins,
        }
    }
}

/// Classifies `grid`. A completed line takes precedence over a full board.
pub fn evaluate(grid: &Grid) -> Outcome {
    // Check rows
    for row in 0..SIZE {
        if let Some(side) = line_owner(grid, (0..SIZE).map(|col| Move::new(row, col))) {
            return Outcome::won_by(side);
        }
    }

    // Check columns
    for col in 0..SIZE {
        if let Some(side) = line_owner(grid, (0..SIZE).map(|row| Move::new(row, col))) {
            return Outcome::won_by(side);
        }
    }

    // Check diagonals
    if let Some(side) = line_owner(grid, (0..SIZE).map(|i| Move::new(i, i))) {
        return Outcome::won_by(side);
    }
    if let Some(side) = line_owner(grid, (0..SIZE).map(|i| Move::new(i, SIZE - 1 - i))) {
        return Outcome::won_by(side);
    }

    if grid.is_full() {
        Outcome::Draw
    } else {
        Outcome::NotTerminal
    }
}

fn line_owner(grid: &Grid, mut line: impl Iterator<Item = Move>) -> Option<Side> {
    let first = line.next()?;
    let Some(Cell::Marked(side)) = grid.get(first) else {
        return None;
    };
    line.all(|mv| grid.get(mv) == Some(Cell::Marked(side)))
        .then_some(side)
}
