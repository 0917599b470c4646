use log::{debug, trace};

use crate::error::{Error, Result};
use crate::evaluator::{evaluate, Outcome};
use crate::grid::{Grid, Move, Side, SIZE};

pub type Score = i32;

/// Score of a win on the spot. Each ply of delay costs one point.
pub const WIN: Score = 10;

/// Unbounded end of the search window.
pub const INFINITY: Score = Score::MAX;

const MAX_PLIES: Score = (SIZE * SIZE) as Score;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: Score,
    /// Absent at terminal positions.
    pub mv: Option<Move>,
}

impl SearchResult {
    fn leaf(score: Score) -> Self {
        Self { score, mv: None }
    }
}

impl Side {
    /// Whether this side would rather have `a` than `b`. Equal scores never
    /// replace, so the first candidate in move order wins ties.
    fn prefers(self, a: Score, b: Score) -> bool {
        match self {
            Side::Maximizer => a > b,
            Side::Minimizer => a < b,
        }
    }
}

/// Depth-first minimax over the full game tree.
///
/// Moves are made and undone on the caller's grid, so a search leaves the
/// grid exactly as it found it.
#[derive(Debug, Clone)]
pub struct Search {
    pruning: bool,
    nodes: usize,
    origin: Score,
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

impl Search {
    /// Alpha-beta search.
    pub fn new() -> Self {
        Self::with_pruning(true)
    }

    /// Plain minimax visiting every node.
    pub fn exhaustive() -> Self {
        Self::with_pruning(false)
    }

    pub fn with_pruning(pruning: bool) -> Self {
        Self {
            pruning,
            nodes: 0,
            origin: 0,
        }
    }

    /// Nodes visited by the most recent call.
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    /// Scores `grid` for `side` to move within the window `(alpha, beta)`.
    ///
    /// `depth` counts the moves already made before `grid`. Decided games
    /// are rejected since there is no move left to choose.
    pub fn search(
        &mut self,
        grid: &mut Grid,
        depth: usize,
        side: Side,
        alpha: Score,
        beta: Score,
    ) -> Result<SearchResult> {
        check_balance(grid)?;
        let outcome = evaluate(grid);
        if outcome.is_terminal() {
            return Err(Error::InvalidPosition {
                reason: format!("game is already decided ({:?})", outcome),
            });
        }
        let plies = Score::try_from(depth)
            .ok()
            .filter(|plies| plies.checked_add(MAX_PLIES).is_some())
            .ok_or_else(|| Error::InvalidPosition {
                reason: format!("depth {} is out of range", depth),
            })?;

        self.nodes = 0;
        self.origin = plies;
        let result = self.node(grid, plies, side, alpha, beta);
        debug!(
            "searched {} nodes for {:?}: score {}, move {:?}",
            self.nodes, side, result.score, result.mv
        );
        Ok(result)
    }

    /// The Maximizer's best move from `grid`.
    pub fn best_move(&mut self, grid: &mut Grid) -> Result<Move> {
        let result = self.search(grid, 0, Side::Maximizer, -INFINITY, INFINITY)?;
        result.mv.ok_or(Error::NoLegalMove)
    }

    fn node(
        &mut self,
        grid: &mut Grid,
        plies: Score,
        side: Side,
        mut alpha: Score,
        mut beta: Score,
    ) -> SearchResult {
        self.nodes += 1;
        match evaluate(grid) {
            Outcome::MaximizerWins => return SearchResult::leaf(WIN - plies),
            Outcome::MinimizerWins => return SearchResult::leaf(plies - WIN),
            Outcome::Draw => return SearchResult::leaf(0),
            Outcome::NotTerminal => {}
        }

        let mut best = SearchResult {
            score: match side {
                Side::Maximizer => -INFINITY,
                Side::Minimizer => INFINITY,
            },
            mv: None,
        };

        for mv in Move::all() {
            if !grid.is_empty(mv) {
                continue;
            }
            let score = {
                let mut child = grid.apply(mv, side);
                self.node(&mut child, plies + 1, side.opponent(), alpha, beta)
                    .score
            };
            if plies == self.origin {
                trace!("{:?} {} scores {}", side, mv, score);
            }
            if best.mv.is_none() || side.prefers(score, best.score) {
                best = SearchResult {
                    score,
                    mv: Some(mv),
                };
            }

            match side {
                Side::Maximizer => alpha = alpha.max(best.score),
                Side::Minimizer => beta = beta.min(best.score),
            }
            if self.pruning && alpha >= beta {
                break;
            }
        }

        best
    }
}

/// Rejects grids that alternating play cannot produce.
fn check_balance(grid: &Grid) -> Result<()> {
    let maximizer = grid.count(Side::Maximizer);
    let minimizer = grid.count(Side::Minimizer);
    if maximizer.abs_diff(minimizer) > 1 {
        return Err(Error::InvalidPosition {
            reason: format!(
                "mark counts {}={} and {}={} differ by more than one",
                Side::Maximizer.symbol(),
                maximizer,
                Side::Minimizer.symbol(),
                minimizer
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::seq::IteratorRandom;
    use rand::{Rng, SeedableRng};

    use crate::grid::Cell;

    fn root(search: &mut Search, grid: &mut Grid, side: Side) -> SearchResult {
        search.search(grid, 0, side, -INFINITY, INFINITY).unwrap()
    }

    /// Plays random legal moves from the empty board, returning the position
    /// and the side to move, or `None` if the game ended on the way.
    fn random_position(rng: &mut StdRng) -> Option<(Grid, Side)> {
        let mut grid = Grid::new();
        let mut side = if rng.gen_bool(0.5) {
            Side::Maximizer
        } else {
            Side::Minimizer
        };
        let plies = rng.gen_range(1..=6);
        for _ in 0..plies {
            let mv = grid.empty_cells().choose(rng)?;
            grid.place(mv, side).unwrap();
            if evaluate(&grid).is_terminal() {
                return None;
            }
            side = side.opponent();
        }
        Some((grid, side))
    }

    /// Every non-terminal position reachable with `first` to move first,
    /// paired with the side to move.
    fn reachable(first: Side) -> HashSet<(Grid, Side)> {
        fn walk(grid: &mut Grid, side: Side, seen: &mut HashSet<(Grid, Side)>) {
            if evaluate(grid).is_terminal() || !seen.insert((*grid, side)) {
                return;
            }
            for mv in Move::all() {
                if grid.is_empty(mv) {
                    let mut child = grid.apply(mv, side);
                    walk(&mut child, side.opponent(), seen);
                }
            }
        }
        let mut seen = HashSet::new();
        walk(&mut Grid::new(), first, &mut seen);
        seen
    }

    #[test]
    fn test_empty_board_is_a_draw() {
        let mut grid = Grid::new();
        let result = root(&mut Search::new(), &mut grid, Side::Maximizer);
        assert_eq!(result.score, 0);
        assert!(result.mv.is_some());
        assert_eq!(grid, Grid::new());
    }

    #[test]
    fn test_exhaustive_empty_board() {
        let mut grid = Grid::new();
        let mut search = Search::exhaustive();
        let result = root(&mut search, &mut grid, Side::Maximizer);
        assert_eq!(result.score, 0);
        assert_eq!(search.nodes(), 549_946);
        assert_eq!(grid, Grid::new());
    }

    #[test]
    fn test_takes_immediate_win() {
        let mut grid: Grid = "OO. .X. ...".parse().unwrap();
        let result = root(&mut Search::new(), &mut grid, Side::Maximizer);
        assert_eq!(result.mv, Some(Move::new(0, 2)));
        assert_eq!(result.score, WIN - 1);
        assert_eq!(Search::new().best_move(&mut grid), Ok(Move::new(0, 2)));
    }

    #[test]
    fn test_blocks_diagonal() {
        let mut grid: Grid = "XO. .X. ...".parse().unwrap();
        assert_eq!(Search::new().best_move(&mut grid), Ok(Move::new(2, 2)));
        assert_eq!(crate::best_move(&mut grid), Ok(Move::new(2, 2)));

        // the block only delays the loss: X forks with (2, 0)
        let result = root(&mut Search::new(), &mut grid, Side::Maximizer);
        assert_eq!(result.score, 4 - WIN);
    }

    #[test]
    fn test_minimizer_takes_immediate_win() {
        let mut grid: Grid = "X.. OX. O..".parse().unwrap();
        let result = root(&mut Search::new(), &mut grid, Side::Minimizer);
        assert_eq!(result.mv, Some(Move::new(2, 2)));
        assert_eq!(result.score, 1 - WIN);
    }

    #[test]
    fn test_rejects_decided_games() {
        for (board, side) in [("OOO XX. ...", Side::Minimizer), ("XOX XOO OXX", Side::Maximizer)] {
            let mut grid: Grid = board.parse().unwrap();
            let before = grid;
            assert!(matches!(
                Search::new().search(&mut grid, 0, side, -INFINITY, INFINITY),
                Err(Error::InvalidPosition { .. })
            ));
            assert_eq!(grid, before);
        }
    }

    #[test]
    fn test_depth_offsets_scores() {
        let mut grid: Grid = "OO. .X. ...".parse().unwrap();
        let result = Search::new()
            .search(&mut grid, 4, Side::Maximizer, -INFINITY, INFINITY)
            .unwrap();
        assert_eq!(result.score, WIN - 5);
    }

    #[test]
    fn test_rejects_depth_out_of_range() {
        let mut grid: Grid = "OO. .X. ...".parse().unwrap();
        for depth in [usize::MAX, Score::MAX as usize] {
            assert!(matches!(
                Search::new().search(&mut grid, depth, Side::Maximizer, -INFINITY, INFINITY),
                Err(Error::InvalidPosition { .. })
            ));
        }
    }

    #[test]
    fn test_pruning_matches_exhaustive() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut checked = 0;
        while checked < 60 {
            let Some((mut grid, side)) = random_position(&mut rng) else {
                continue;
            };
            let before = grid;

            let mut pruned = Search::new();
            let mut full = Search::exhaustive();
            let fast = root(&mut pruned, &mut grid, side);
            let slow = root(&mut full, &mut grid, side);

            assert_eq!(fast, slow, "position\n{}", before);
            assert!(pruned.nodes() <= full.nodes());
            assert_eq!(grid, before);
            checked += 1;
        }
    }

    #[test]
    fn test_best_move_is_total() {
        for first in [Side::Maximizer, Side::Minimizer] {
            for (grid, side) in reachable(first) {
                if side != Side::Maximizer {
                    continue;
                }
                let mut copy = grid;
                let mv = Search::new().best_move(&mut copy).unwrap();
                assert_eq!(grid.get(mv), Some(Cell::Empty), "position\n{}", grid);
                assert_eq!(copy, grid);
            }
        }
    }

    #[test]
    fn test_rejects_invalid_positions() {
        let mut grid: Grid = "OOO XX. ...".parse().unwrap();
        assert!(matches!(
            Search::new().best_move(&mut grid),
            Err(Error::InvalidPosition { .. })
        ));

        let mut grid: Grid = "XX. X.. ...".parse().unwrap();
        assert!(matches!(
            Search::new().best_move(&mut grid),
            Err(Error::InvalidPosition { .. })
        ));
        assert!(matches!(
            Search::new().search(&mut grid, 0, Side::Maximizer, -INFINITY, INFINITY),
            Err(Error::InvalidPosition { .. })
        ));
    }
}
