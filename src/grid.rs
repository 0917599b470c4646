use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Rows and columns on the board.
pub const SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The computer, plays `O`.
    Maximizer,
    /// The human, plays `X`.
    Minimizer,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Maximizer => Side::Minimizer,
            Side::Minimizer => Side::Maximizer,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Side::Maximizer => 'O',
            Side::Minimizer => 'X',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Marked(Side),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Every coordinate on the board in row-major order.
    pub fn all() -> impl Iterator<Item = Move> {
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| Move::new(row, col)))
    }
}

impl From<(usize, usize)> for Move {
    fn from((row, col): (usize, usize)) -> Self {
        Move::new(row, col)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [[Cell; SIZE]; SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; SIZE]; SIZE],
        }
    }

    /// The cell at `mv`, or `None` when `mv` lies outside the board.
    pub fn get(&self, mv: Move) -> Option<Cell> {
        self.cells.get(mv.row)?.get(mv.col).copied()
    }

    pub fn is_empty(&self, mv: Move) -> bool {
        self.get(mv) == Some(Cell::Empty)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|&cell| cell != Cell::Empty)
    }

    pub fn rows(&self) -> &[[Cell; SIZE]; SIZE] {
        &self.cells
    }

    /// Legal moves in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Move> + '_ {
        Move::all().filter(move |&mv| self.is_empty(mv))
    }

    pub fn count(&self, side: Side) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == Cell::Marked(side))
            .count()
    }

    /// Permanently marks `mv` for `side`.
    pub fn place(&mut self, mv: Move, side: Side) -> Result<()> {
        match self.get(mv) {
            None => Err(Error::OutOfBounds { mv }),
            Some(Cell::Marked(_)) => Err(Error::Occupied { mv }),
            Some(Cell::Empty) => {
                self.cells[mv.row][mv.col] = Cell::Marked(side);
                Ok(())
            }
        }
    }

    /// Marks `mv` for `side` until the returned guard is dropped.
    ///
    /// The guard dereferences to the grid, so a search can recurse through it,
    /// and whatever `mv` held before is put back on every exit path. `mv`
    /// must lie on the board.
    pub fn apply(&mut self, mv: Move, side: Side) -> Applied<'_> {
        let previous = std::mem::replace(&mut self.cells[mv.row][mv.col], Cell::Marked(side));
        Applied {
            grid: self,
            mv,
            previous,
        }
    }
}

/// A move held on the grid for the lifetime of the guard.
pub struct Applied<'a> {
    grid: &'a mut Grid,
    mv: Move,
    previous: Cell,
}

impl Deref for Applied<'_> {
    type Target = Grid;

    fn deref(&self) -> &Grid {
        self.grid
    }
}

impl DerefMut for Applied<'_> {
    fn deref_mut(&mut self) -> &mut Grid {
        self.grid
    }
}

impl Drop for Applied<'_> {
    fn drop(&mut self) {
        self.grid.cells[self.mv.row][self.mv.col] = self.previous;
    }
}

impl FromStr for Grid {
    type Err = Error;

    /// Parses nine cells of `X`, `O` or `.`, ignoring whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let symbols: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if symbols.len() != SIZE * SIZE {
            return Err(Error::InvalidBoardLength {
                expected: SIZE * SIZE,
                got: symbols.len(),
            });
        }

        let mut grid = Grid::new();
        for (position, &character) in symbols.iter().enumerate() {
            let cell = match character {
                '.' => Cell::Empty,
                'O' | 'o' => Cell::Marked(Side::Maximizer),
                'X' | 'x' => Cell::Marked(Side::Minimizer),
                _ => {
                    return Err(Error::InvalidCellCharacter {
                        character,
                        position,
                    })
                }
            };
            grid.cells[position / SIZE][position % SIZE] = cell;
        }
        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::Marked(side) => side.symbol(),
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
