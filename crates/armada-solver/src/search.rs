use std::ops::ControlFlow;

use armada_core::{Board, CellState, Clues, Grid, Orientation, ShipPlacement, Solution};

use crate::propagate::propagate;

/// The result of an exhaustive search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Exactly one arrangement satisfies the clues.
    Unique(Solution),
    /// At least two arrangements satisfy the clues; both witnesses are
    /// returned.
    NonUnique {
        /// The first arrangement found.
        first: Solution,
        /// The second, distinct arrangement.
        second: Solution,
    },
    /// No arrangement satisfies the clues.
    NoSolution,
    /// The call budget ran out before the search finished.
    LimitExceeded,
}

/// An outcome together with the number of recursive placement calls, a
/// rough measure of how hard the instance was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    /// What the search established.
    pub outcome: SearchOutcome,
    /// Number of recursive placement calls made.
    pub calls: u32,
}

/// The exhaustive solver.
///
/// Ships are placed one at a time in descending length order, depth
/// first over (orientation, row, column) in lexicographic order. When
/// consecutive ships have equal length, the later one resumes
/// enumeration just past the earlier one's position, so permutations of
/// equal ships are not revisited. Each placed ship contributes one
/// blocked layer: its cells, the one-cell border around them, and every
/// line whose occupancy total is already saturated.
///
/// The first complete arrangement is recorded and the search continues;
/// finding a second one stops it immediately with
/// [`NonUnique`](SearchOutcome::NonUnique). An optional call budget
/// bounds the search during puzzle generation.
///
/// # Examples
///
/// ```
/// use armada_core::{Board, Clues};
/// use armada_solver::{ExactSolver, SearchOutcome};
///
/// // two singletons on opposite corners admit two arrangements
/// let clues = Clues::new(
///     vec![1, 1],
///     vec![Some(1), Some(0), Some(1)],
///     vec![Some(1), Some(0), Some(1)],
///     Board::undef(3, 3),
/// );
/// let report = ExactSolver::new().solve(&clues);
/// assert!(matches!(report.outcome, SearchOutcome::NonUnique { .. }));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSolver {
    call_limit: Option<u32>,
}

impl ExactSolver {
    /// A solver without a call budget.
    #[must_use]
    pub fn new() -> Self {
        Self { call_limit: None }
    }

    /// A solver that gives up with
    /// [`LimitExceeded`](SearchOutcome::LimitExceeded) after `limit`
    /// recursive calls.
    #[must_use]
    pub fn with_call_limit(limit: u32) -> Self {
        Self {
            call_limit: Some(limit),
        }
    }

    /// Searches for all arrangements satisfying the clues, stopping at
    /// the second.
    #[must_use]
    pub fn solve(&self, clues: &Clues) -> SearchReport {
        let mut enriched = clues.init().clone();
        propagate(&mut enriched);

        let ship_count = clues.ships().len();
        let mut search = Search {
            clues,
            enriched,
            ship_cells: Grid::new(clues.height(), clues.width(), false),
            blocked: vec![
                Grid::new(clues.height(), clues.width(), false);
                ship_count.saturating_sub(1)
            ],
            stack: vec![ShipPlacement::new(Orientation::Horizontal, 0, 0); ship_count],
            calls: 0,
            limit: self.call_limit,
            limited: false,
            first: None,
            second: None,
        };
        let _ = search.place(0, (0, 0, 0));

        let outcome = if search.limited {
            SearchOutcome::LimitExceeded
        } else {
            match (search.first, search.second) {
                (Some(first), Some(second)) => SearchOutcome::NonUnique { first, second },
                (Some(first), None) => SearchOutcome::Unique(first),
                _ => SearchOutcome::NoSolution,
            }
        };
        SearchReport {
            outcome,
            calls: search.calls,
        }
    }
}

struct Search<'a> {
    clues: &'a Clues,
    /// The disclosed cells enriched by one propagation pass.
    enriched: Board,
    /// Occupancy of the ships placed so far.
    ship_cells: Grid<bool>,
    /// One layer per non-final ship, indexed by depth.
    blocked: Vec<Grid<bool>>,
    stack: Vec<ShipPlacement>,
    calls: u32,
    limit: Option<u32>,
    limited: bool,
    first: Option<Solution>,
    second: Option<Solution>,
}

impl Search<'_> {
    /// Tries every placement of ship `idx` at or after `start`
    /// (orientation, row, column). Breaks to abort the whole search.
    fn place(&mut self, idx: usize, start: (usize, usize, usize)) -> ControlFlow<()> {
        self.calls += 1;
        if let Some(limit) = self.limit {
            if self.calls > limit {
                self.limited = true;
                return ControlFlow::Break(());
            }
        }

        let (h, w) = (self.clues.height(), self.clues.width());
        let ships = self.clues.ships();
        let len = ships[idx] as usize;
        let last = idx == ships.len() - 1;

        // a one-cell ship has a single canonical orientation
        let orientations = if len == 1 { 1 } else { 2 };
        for vert in 0..orientations {
            let (ship_h, ship_w) = if vert == 1 { (len, 1) } else { (1, len) };
            for y in 0..=(h - ship_h) {
                for x in 0..=(w - ship_w) {
                    if (vert, y, x) < start {
                        continue;
                    }
                    if !self.admissible(len, y, x, ship_h, ship_w) {
                        continue;
                    }
                    if self.any_cell_excluded(idx, y, x, ship_h, ship_w) {
                        continue;
                    }

                    for i in 0..ship_h {
                        for j in 0..ship_w {
                            self.ship_cells.set(y + i, x + j, true);
                        }
                    }
                    self.stack[idx] = ShipPlacement::new(
                        if vert == 1 {
                            Orientation::Vertical
                        } else {
                            Orientation::Horizontal
                        },
                        y,
                        x,
                    );

                    if !last {
                        if self.within_budgets() && self.build_layer(idx, y, x, ship_h, ship_w) {
                            let next_start = if ships[idx + 1] == ships[idx] {
                                let pos = vert * h * w + y * w + x + 1;
                                (pos / (h * w), (pos % (h * w)) / w, pos % w)
                            } else {
                                (0, 0, 0)
                            };
                            let flow = self.place(idx + 1, next_start);
                            if flow.is_break() {
                                return flow;
                            }
                        }
                        self.blocked[idx].fill(false);
                    } else if self.complete() {
                        let solution = self.stack.clone();
                        if self.first.is_none() {
                            self.first = Some(solution);
                        } else {
                            self.second = Some(solution);
                            return ControlFlow::Break(());
                        }
                    }

                    for i in 0..ship_h {
                        for j in 0..ship_w {
                            self.ship_cells.set(y + i, x + j, false);
                        }
                    }
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Checks a candidate against the enriched disclosures: its ends may
    /// not land on inner cells, a singleton needs an unconstrained or
    /// singleton-compatible cell, and no ship cell may be known vacant.
    fn admissible(&self, len: usize, y: usize, x: usize, ship_h: usize, ship_w: usize) -> bool {
        use CellState::{Inner, Occ, One, Undef, Vacant};

        let head = self.enriched.get(y, x);
        let tail = self.enriched.get(y + ship_h - 1, x + ship_w - 1);
        if head == Inner || tail == Inner {
            return false;
        }
        if len == 1 && !matches!(head, Undef | Occ | One) {
            return false;
        }
        for i in 0..ship_h {
            for j in 0..ship_w {
                if self.enriched.get(y + i, x + j) == Vacant {
                    return false;
                }
            }
        }
        true
    }

    /// Checks the candidate cells against the layers of the ships placed
    /// before `idx`.
    fn any_cell_excluded(&self, idx: usize, y: usize, x: usize, ship_h: usize, ship_w: usize) -> bool {
        for layer in &self.blocked[..idx] {
            for i in 0..ship_h {
                for j in 0..ship_w {
                    if layer.get(y + i, x + j) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Running feasibility: no visible line may exceed its total, and the
    /// hidden lines of an axis may not exceed their shared budget.
    fn within_budgets(&self) -> bool {
        let (h, w) = (self.clues.height(), self.clues.width());

        let mut hidden = 0;
        for (y, &total) in self.clues.rows().iter().enumerate() {
            let sum = (0..w).filter(|&x| self.ship_cells.get(y, x)).count();
            match total {
                Some(total) => {
                    if sum > total as usize {
                        return false;
                    }
                }
                None => hidden += sum,
            }
        }
        if hidden > self.clues.hidden_rows_budget() {
            return false;
        }

        let mut hidden = 0;
        for (x, &total) in self.clues.cols().iter().enumerate() {
            let sum = (0..h).filter(|&y| self.ship_cells.get(y, x)).count();
            match total {
                Some(total) => {
                    if sum > total as usize {
                        return false;
                    }
                }
                None => hidden += sum,
            }
        }
        hidden <= self.clues.hidden_cols_budget()
    }

    /// Builds the blocked layer for the ship just placed: its cells plus
    /// the one-cell border, every saturated visible line, and all hidden
    /// lines of an axis once their shared budget is used up. Returns
    /// `false` when the layer would wall off a cell the clues require to
    /// be occupied.
    fn build_layer(&mut self, idx: usize, y: usize, x: usize, ship_h: usize, ship_w: usize) -> bool {
        let (h, w) = (self.clues.height(), self.clues.width());
        let layer = &mut self.blocked[idx];

        for i in y.saturating_sub(1)..(y + ship_h + 1).min(h) {
            for j in x.saturating_sub(1)..(x + ship_w + 1).min(w) {
                layer.set(i, j, true);
            }
        }

        let mut hidden = 0;
        for (row, &total) in self.clues.rows().iter().enumerate() {
            let sum = (0..w).filter(|&j| self.ship_cells.get(row, j)).count();
            match total {
                Some(total) if sum == total as usize => {
                    for j in 0..w {
                        layer.set(row, j, true);
                    }
                }
                Some(_) => {}
                None => hidden += sum,
            }
        }
        if hidden == self.clues.hidden_rows_budget() {
            for (row, &total) in self.clues.rows().iter().enumerate() {
                if total.is_none() {
                    for j in 0..w {
                        layer.set(row, j, true);
                    }
                }
            }
        }

        let mut hidden = 0;
        for (col, &total) in self.clues.cols().iter().enumerate() {
            let sum = (0..h).filter(|&i| self.ship_cells.get(i, col)).count();
            match total {
                Some(total) if sum == total as usize => {
                    for i in 0..h {
                        layer.set(i, col, true);
                    }
                }
                Some(_) => {}
                None => hidden += sum,
            }
        }
        if hidden == self.clues.hidden_cols_budget() {
            for (col, &total) in self.clues.cols().iter().enumerate() {
                if total.is_none() {
                    for i in 0..h {
                        layer.set(i, col, true);
                    }
                }
            }
        }

        // a known-occupied cell outside the placed ships must stay
        // reachable for the ships still to come
        for i in 0..h {
            for j in 0..w {
                if self.blocked[idx].get(i, j)
                    && !self.ship_cells.get(i, j)
                    && self.enriched.get(i, j).is_occupied()
                {
                    return false;
                }
            }
        }
        true
    }

    /// Final verification once every ship is down: exact visible totals,
    /// and every disclosed cell consistent with the arrangement.
    fn complete(&self) -> bool {
        use CellState::{East, Inner, North, South, West};

        let (h, w) = (self.clues.height(), self.clues.width());

        for (y, &total) in self.clues.rows().iter().enumerate() {
            if let Some(total) = total {
                let sum = (0..w).filter(|&x| self.ship_cells.get(y, x)).count();
                if sum != total as usize {
                    return false;
                }
            }
        }
        for (x, &total) in self.clues.cols().iter().enumerate() {
            if let Some(total) = total {
                let sum = (0..h).filter(|&y| self.ship_cells.get(y, x)).count();
                if sum != total as usize {
                    return false;
                }
            }
        }

        let occupied = |y: isize, x: isize| {
            y >= 0
                && x >= 0
                && (y as usize) < h
                && (x as usize) < w
                && self.ship_cells.get(y as usize, x as usize)
        };
        for y in 0..h {
            for x in 0..w {
                let state = self.enriched.get(y, x);
                if state.is_occupied() && !self.ship_cells.get(y, x) {
                    return false;
                }
                let (sy, sx) = (y as isize, x as isize);
                let ok = match state {
                    North => occupied(sy + 1, sx),
                    East => occupied(sy, sx - 1),
                    South => occupied(sy - 1, sx),
                    West => occupied(sy, sx + 1),
                    Inner => {
                        (occupied(sy - 1, sx) && occupied(sy + 1, sx))
                            || (occupied(sy, sx - 1) && occupied(sy, sx + 1))
                    }
                    _ => true,
                };
                if !ok {
                    return false;
                }
            }
        }
        true
    }
}
