use armada_core::{
    Board, CellState, Clues, Difficulty, Grid, Params, ShipPlacement, Solution,
};
use armada_solver::{ExactSolver, LogicSolver, LogicStatus, SearchOutcome};
use rand::{Rng, seq::SliceRandom as _};

use crate::{PuzzleSeed, placer};

/// Call budget for one random placement attempt.
const PLACEMENT_CALL_LIMIT: u32 = 1200;
/// Placement attempts before a ship is dropped from the fleet.
const PLACEMENT_ATTEMPTS: u32 = 5;
/// Call budget for the exhaustive search during tuning.
const SEARCH_CALL_LIMIT: u32 = 600;
/// Minimum search effort for an accepted Unreasonable instance.
const SEARCH_CALLS_FLOOR: u32 = 50;

/// A generated puzzle: the clues handed to the player, the hidden
/// arrangement they came from, the seed that reproduces the run, and a
/// trace of the tuning loop.
#[derive(Debug, Clone)]
pub struct GeneratedPuzzle {
    /// The puzzle as issued.
    pub clues: Clues,
    /// The hidden arrangement, in the same order as the clue ships.
    pub solution: Solution,
    /// The seed that reproduces this puzzle.
    pub seed: PuzzleSeed,
    /// What the tuning loop did.
    pub trace: GenerationTrace,
}

impl GeneratedPuzzle {
    /// The fully typed board of the hidden arrangement.
    #[must_use]
    pub fn solution_board(&self) -> Board {
        armada_core::render_solution(
            self.clues.height(),
            self.clues.width(),
            self.clues.ships(),
            &self.solution,
        )
    }
}

/// Bookkeeping from one generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationTrace {
    /// Random placement attempts, over all fleet sizes tried.
    pub placement_attempts: u32,
    /// Ships dropped because the fleet would not fit.
    pub ships_dropped: u32,
    /// Iterations of the clue tuning loop.
    pub tuning_rounds: u32,
    /// Whether the instance was accepted under the fast-return easing
    /// after a too-hard adjustment or an ambiguity repair.
    pub fast_return: bool,
    /// Grading of the accepted instance by the deductive solver.
    pub final_status: Option<LogicStatus>,
    /// Exhaustive-search calls on the accepted instance, for
    /// Unreasonable targets.
    pub search_calls: Option<u32>,
}

/// The puzzle generator.
///
/// Generation proceeds in four steps: choose a ship multiset for the
/// grid size and difficulty, sample a hidden arrangement, derive an
/// initial clue set from it, and then walk the clue set towards the
/// difficulty contract, hiding information while the puzzle is too easy
/// and disclosing more while it is too hard or ambiguous.
///
/// # Examples
///
/// ```
/// use armada_core::{Difficulty, Params};
/// use armada_generator::{PuzzleGenerator, PuzzleSeed};
///
/// let generator = PuzzleGenerator::new();
/// let params = Params::new(7, 7, Difficulty::Basic);
/// let seed = PuzzleSeed::from_bytes([21; 32]);
/// let puzzle = generator.generate_with_seed(&params, seed);
/// assert_eq!(puzzle.clues.ships(), &[4, 4, 3, 3, 2, 2, 2]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PuzzleGenerator;

impl PuzzleGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Generates a puzzle from a fresh random seed.
    ///
    /// # Panics
    ///
    /// Panics if the parameters fail [`Params::validate`].
    #[must_use]
    pub fn generate(&self, params: &Params) -> GeneratedPuzzle {
        self.generate_with_seed(params, PuzzleSeed::random())
    }

    /// Generates the puzzle determined by a seed.
    ///
    /// # Panics
    ///
    /// Panics if the parameters fail [`Params::validate`].
    #[must_use]
    pub fn generate_with_seed(&self, params: &Params, seed: PuzzleSeed) -> GeneratedPuzzle {
        params
            .validate()
            .expect("puzzle parameters must be validated before generation");
        let mut rng = seed.rng();
        let mut trace = GenerationTrace::default();

        let mut ships = choose_ships(params, &mut rng);
        let solution = sample_arrangement(params, &mut ships, &mut rng, &mut trace);
        let mut working = ClueSet::derive(params, &ships, &solution, &mut rng);
        tune(params, &ships, &mut working, &solution, &mut rng, &mut trace);

        GeneratedPuzzle {
            clues: working.into_clues(ships),
            solution,
            seed,
            trace,
        }
    }
}

/// Chooses the ship multiset for the grid size and difficulty, longest
/// first.
fn choose_ships<R: Rng>(params: &Params, rng: &mut R) -> Vec<u8> {
    let small = params.height.min(params.width);
    if small == 7 {
        return vec![4, 4, 3, 3, 2, 2, 2];
    }

    let count = if params.difficulty == Difficulty::Basic {
        7
    } else {
        7 + rng.random_range(0..2usize)
    };
    let mut ships = vec![0u8; count];

    // split the lengths 2..=longest into four groups and draw two from
    // each of the three upper ones; the divisor sits just under 4 so the
    // truncated group boundaries never collide
    let longest = (small as f64 * 0.6).round() as i32;
    let group = (longest - 1) as f32 / 3.9999;

    // the shortest ships are drawn from the lowest group; easy levels
    // take its largest length, singletons being hard to pin down
    if params.difficulty <= Difficulty::Intermediate {
        ships[6] = group as u8 + 1;
        ships[count - 1] = ships[6];
    } else {
        ships[6] = 1 + rng.random_range(0..group as u32 + 1) as u8;
        ships[count - 1] = 1 + rng.random_range(0..group as u32 + 1) as u8;
    }

    for i in 0..3 {
        let lo = (group * (i + 1) as f32) as u32;
        let hi = (group * (i + 2) as f32) as u32;
        ships[i * 2] = (lo + 2 + rng.random_range(0..hi - lo)) as u8;
        ships[i * 2 + 1] = (lo + 2 + rng.random_range(0..hi - lo)) as u8;
    }

    ships.sort_unstable_by(|a, b| b.cmp(a));
    ships
}

/// Samples a hidden arrangement, dropping the median-length ship when
/// the fleet repeatedly fails to fit.
fn sample_arrangement<R: Rng>(
    params: &Params,
    ships: &mut Vec<u8>,
    rng: &mut R,
    trace: &mut GenerationTrace,
) -> Solution {
    loop {
        for _ in 0..PLACEMENT_ATTEMPTS {
            trace.placement_attempts += 1;
            if let Some(placements) = placer::place_fleet(
                params.height,
                params.width,
                ships,
                rng,
                PLACEMENT_CALL_LIMIT,
            ) {
                return placements;
            }
        }
        let median = (ships.len() + 1) / 2 - 1;
        ships.remove(median);
        trace.ships_dropped += 1;
    }
}

/// The mutable clue set walked by the tuning loop.
struct ClueSet {
    rows: Vec<Option<u8>>,
    cols: Vec<Option<u8>>,
    /// The true totals, for restoring a hidden one.
    rows_full: Vec<u8>,
    cols_full: Vec<u8>,
    init: Board,
    occupancy: Grid<bool>,
    hidden_sums: usize,
    vacant_disclosed: usize,
    occ_disclosed: usize,
    typed_disclosed: usize,
}

impl ClueSet {
    /// Derives the first clue set from the hidden arrangement: exact
    /// totals with a difficulty-dependent number of them hidden, and a
    /// difficulty-dependent mix of disclosed cells.
    fn derive<R: Rng>(
        params: &Params,
        ships: &[u8],
        solution: &[ShipPlacement],
        rng: &mut R,
    ) -> Self {
        let (h, w) = (params.height, params.width);
        let cells: usize = ships.iter().map(|&s| s as usize).sum();

        let mut occupancy = Grid::new(h, w, false);
        for (&len, placement) in ships.iter().zip(solution) {
            for c in placement.cells(len as usize) {
                occupancy[c] = true;
            }
        }

        let rows_full: Vec<u8> = (0..h)
            .map(|y| (0..w).filter(|&x| occupancy.get(y, x)).count() as u8)
            .collect();
        let cols_full: Vec<u8> = (0..w)
            .map(|x| (0..h).filter(|&y| occupancy.get(y, x)).count() as u8)
            .collect();

        let round = |v: f64| v.round() as usize;
        let spare = h * w - cells;
        let (hidden_sums, mut vacant, mut occ, mut typed) = match params.difficulty {
            Difficulty::Basic => (0, round(spare as f64 * 0.2), 0, round(cells as f64 * 0.6)),
            Difficulty::Intermediate => {
                // a plain occupied disclosure says less than a typed one,
                // so it is half-weighted against the disclosure budget
                let budget = round(cells as f64 * 0.3);
                let occ = rng.random_range(0..round(cells as f64 * 0.2).max(1));
                (0, round(spare as f64 * 0.1), occ * 2, budget - occ)
            }
            Difficulty::Advanced => {
                let hidden = round((h + w) as f64 * 0.1) + rng.random_range(0..2);
                let budget = round(cells as f64 * 0.2);
                let occ = rng.random_range(0..budget.max(1));
                (hidden, round(spare as f64 * 0.05), occ * 2, budget - occ)
            }
            Difficulty::Unreasonable => {
                let hidden = round((h + w) as f64 * 0.2) + rng.random_range(0..3);
                let budget = round(cells as f64 * 0.15);
                let occ = rng.random_range(0..budget + 1);
                (hidden, 0, occ, budget - occ)
            }
        };
        vacant = vacant.min(spare);
        if occ + typed > cells {
            occ = 0;
            typed = cells;
        }

        let mut rows: Vec<Option<u8>> = rows_full.iter().copied().map(Some).collect();
        let mut cols: Vec<Option<u8>> = cols_full.iter().copied().map(Some).collect();
        if hidden_sums > 0 {
            let mut lines: Vec<usize> = (0..h + w).collect();
            lines.shuffle(rng);
            for &line in &lines[..hidden_sums] {
                if line < h {
                    rows[line] = None;
                } else {
                    cols[line - h] = None;
                }
            }
        }

        let mut init = Board::undef(h, w);

        // pick the disclosed ship cells through the concatenated fleet
        let mut ship_cells: Vec<usize> = (0..cells).collect();
        ship_cells.shuffle(rng);
        for (n, &cell_index) in ship_cells[..occ + typed].iter().enumerate() {
            let (ship, offset) = locate(ships, cell_index);
            let len = ships[ship] as usize;
            let pos = solution[ship].cells(len).nth(offset).unwrap();
            init[pos] = if n < occ {
                CellState::Occ
            } else {
                solution[ship].cell_state(len, offset)
            };
        }

        if vacant > 0 {
            let mut order: Vec<usize> = (0..spare).collect();
            order.shuffle(rng);
            let mut chosen = order[..vacant].to_vec();
            chosen.sort_unstable();
            let mut next = 0;
            let mut index = 0;
            'scan: for y in 0..h {
                for x in 0..w {
                    if occupancy.get(y, x) {
                        continue;
                    }
                    if next < chosen.len() && index == chosen[next] {
                        init.set(y, x, CellState::Vacant);
                        next += 1;
                        if next == chosen.len() {
                            break 'scan;
                        }
                    }
                    index += 1;
                }
            }
        }

        Self {
            rows,
            cols,
            rows_full,
            cols_full,
            init,
            occupancy,
            hidden_sums,
            vacant_disclosed: vacant,
            occ_disclosed: occ,
            typed_disclosed: typed,
        }
    }

    fn to_clues(&self, ships: &[u8]) -> Clues {
        Clues::new(
            ships.to_vec(),
            self.rows.clone(),
            self.cols.clone(),
            self.init.clone(),
        )
    }

    fn into_clues(self, ships: Vec<u8>) -> Clues {
        Clues::new(ships, self.rows, self.cols, self.init)
    }

    /// Hides one more visible total, chosen uniformly over rows then
    /// columns.
    fn hide_one_sum<R: Rng>(&mut self, rng: &mut R) {
        let visible = self.rows.len() + self.cols.len() - self.hidden_sums;
        let mut pick = rng.random_range(0..visible);
        for row in self.rows.iter_mut().filter(|r| r.is_some()) {
            if pick == 0 {
                *row = None;
                self.hidden_sums += 1;
                return;
            }
            pick -= 1;
        }
        for col in self.cols.iter_mut().filter(|c| c.is_some()) {
            if pick == 0 {
                *col = None;
                self.hidden_sums += 1;
                return;
            }
            pick -= 1;
        }
    }

    /// Restores one hidden total to its true value.
    fn restore_one_sum<R: Rng>(&mut self, rng: &mut R) {
        let mut pick = rng.random_range(0..self.hidden_sums);
        for (y, row) in self.rows.iter_mut().enumerate() {
            if row.is_none() {
                if pick == 0 {
                    *row = Some(self.rows_full[y]);
                    self.hidden_sums -= 1;
                    return;
                }
                pick -= 1;
            }
        }
        for (x, col) in self.cols.iter_mut().enumerate() {
            if col.is_none() {
                if pick == 0 {
                    *col = Some(self.cols_full[x]);
                    self.hidden_sums -= 1;
                    return;
                }
                pick -= 1;
            }
        }
    }

    /// Withdraws one disclosed cell, chosen uniformly.
    fn remove_one_disclosure<R: Rng>(&mut self, rng: &mut R) {
        let total = self.vacant_disclosed + self.occ_disclosed + self.typed_disclosed;
        if total == 0 {
            return;
        }
        let mut pick = rng.random_range(0..total);
        for y in 0..self.init.height() {
            for x in 0..self.init.width() {
                let state = self.init.get(y, x);
                if state == CellState::Undef {
                    continue;
                }
                if pick == 0 {
                    match state {
                        CellState::Vacant => self.vacant_disclosed -= 1,
                        CellState::Occ => self.occ_disclosed -= 1,
                        _ => self.typed_disclosed -= 1,
                    }
                    self.init.set(y, x, CellState::Undef);
                    return;
                }
                pick -= 1;
            }
        }
    }
}

/// Maps an index into the concatenated fleet cells to (ship, offset
/// within the ship).
fn locate(ships: &[u8], cell_index: usize) -> (usize, usize) {
    let mut aggregate = 0;
    for (ship, &len) in ships.iter().enumerate() {
        aggregate += len as usize;
        if aggregate > cell_index {
            return (ship, aggregate - cell_index - 1);
        }
    }
    unreachable!("cell index {cell_index} beyond the fleet");
}

/// The tuning loop: grade the instance and adjust the clue set until the
/// difficulty contract holds.
fn tune<R: Rng>(
    params: &Params,
    ships: &[u8],
    working: &mut ClueSet,
    solution: &[ShipPlacement],
    rng: &mut R,
    trace: &mut GenerationTrace,
) {
    let diff = params.difficulty;
    let logic_solver = LogicSolver::new(diff);

    let mut fast_return = false;
    loop {
        trace.tuning_rounds += 1;
        let clues = working.to_clues(ships);
        let logic = logic_solver.solve(&clues);
        let search = (diff == Difficulty::Unreasonable)
            .then(|| ExactSolver::with_call_limit(SEARCH_CALL_LIMIT).solve(&clues));

        let unique = search
            .as_ref()
            .map(|report| matches!(report.outcome, SearchOutcome::Unique(_)));
        let search_calls = search.as_ref().map(|report| report.calls);

        let accepted = match diff {
            Difficulty::Basic | Difficulty::Intermediate => {
                logic.status == LogicStatus::SolvedSimple
            }
            Difficulty::Advanced => {
                logic.status == LogicStatus::SolvedAdvanced
                    || (logic.status == LogicStatus::SolvedSimple && fast_return)
            }
            Difficulty::Unreasonable => {
                unique == Some(true)
                    && ((search_calls.unwrap_or(0) >= SEARCH_CALLS_FLOOR
                        && logic.status == LogicStatus::Stuck)
                        || fast_return)
            }
        };
        if accepted {
            trace.fast_return = fast_return;
            trace.final_status = Some(logic.status);
            trace.search_calls = search_calls;
            return;
        }

        let too_easy = match diff {
            Difficulty::Advanced => logic.status == LogicStatus::SolvedSimple,
            Difficulty::Unreasonable => {
                unique == Some(true)
                    && (search_calls.unwrap_or(0) < SEARCH_CALLS_FLOOR
                        || logic.status != LogicStatus::Stuck)
            }
            _ => false,
        };
        if too_easy {
            if rng.random_range(0..2) == 0 && working.hidden_sums < params.height + params.width
            {
                working.hide_one_sum(rng);
            } else {
                working.remove_one_disclosure(rng);
            }
            continue;
        }

        if let Some(report) = &search {
            if let SearchOutcome::NonUnique { first, second } = &report.outcome {
                // two arrangements fit: disclose as vacant one cell that
                // a wrong arrangement occupies, then take the next
                // acceptable state
                fast_return = true;
                disclose_wrong_cell(working, &clues, first, second, rng);
                continue;
            }
        }

        // no solution within the budget, or simply too hard: give the
        // player more, and accept the next reachable state
        fast_return = true;
        let change = rng.random_range(0..5);
        if change == 0 && working.hidden_sums > 0 {
            working.restore_one_sum(rng);
        } else if change < 4 {
            disclose_vacant_cell(diff, working, &logic.board, rng);
        } else if !disclose_typed_cell(diff, working, &clues, solution, &logic.board, rng) {
            // every ship cell is already disclosed; nothing left to give
            trace.fast_return = fast_return;
            trace.final_status = Some(logic.status);
            trace.search_calls = search_calls;
            return;
        }
    }
}

/// Discloses as vacant one true-vacant cell that one of the two found
/// arrangements wrongly occupies.
fn disclose_wrong_cell<R: Rng>(
    working: &mut ClueSet,
    clues: &Clues,
    first: &[ShipPlacement],
    second: &[ShipPlacement],
    rng: &mut R,
) {
    let ships = clues.ships();
    let wrong_slots: Vec<(usize, usize)> = ships
        .iter()
        .enumerate()
        .flat_map(|(k, &len)| (0..len as usize).map(move |i| (k, i)))
        .filter(|&(k, i)| {
            let len = ships[k] as usize;
            let a = first[k].cells(len).nth(i).unwrap();
            let b = second[k].cells(len).nth(i).unwrap();
            !working.occupancy[a] || !working.occupancy[b]
        })
        .collect();
    let &(k, i) = &wrong_slots[rng.random_range(0..wrong_slots.len())];
    let len = ships[k] as usize;
    let a = first[k].cells(len).nth(i).unwrap();
    let target = if !working.occupancy[a] {
        a
    } else {
        second[k].cells(len).nth(i).unwrap()
    };
    working.init[target] = CellState::Vacant;
    working.vacant_disclosed += 1;
}

/// Discloses as vacant one true-vacant cell, preferring cells the
/// deductive solver has not settled. Returns `false` when no candidate
/// is left.
fn disclose_vacant_cell<R: Rng>(
    diff: Difficulty,
    working: &mut ClueSet,
    logic_board: &Board,
    rng: &mut R,
) -> bool {
    let reference: &Board = if diff <= Difficulty::Advanced {
        logic_board
    } else {
        &working.init
    };
    let candidates: Vec<(usize, usize)> = (0..working.init.height())
        .flat_map(|y| (0..working.init.width()).map(move |x| (y, x)))
        .filter(|&(y, x)| {
            reference.get(y, x) == CellState::Undef && !working.occupancy.get(y, x)
        })
        .collect();
    if candidates.is_empty() {
        return false;
    }
    let (y, x) = candidates[rng.random_range(0..candidates.len())];
    working.init.set(y, x, CellState::Vacant);
    working.vacant_disclosed += 1;
    true
}

/// Discloses the true typed state of one ship cell, preferring cells the
/// deductive solver has not settled. Returns `false` when every ship
/// cell is already disclosed or settled.
fn disclose_typed_cell<R: Rng>(
    diff: Difficulty,
    working: &mut ClueSet,
    clues: &Clues,
    solution: &[ShipPlacement],
    logic_board: &Board,
    rng: &mut R,
) -> bool {
    let reference: &Board = if diff <= Difficulty::Advanced {
        logic_board
    } else {
        &working.init
    };
    let ships = clues.ships();
    let candidates: Vec<(usize, usize)> = ships
        .iter()
        .enumerate()
        .flat_map(|(k, &len)| (0..len as usize).map(move |i| (k, i)))
        .filter(|&(k, i)| {
            let pos = solution[k].cells(ships[k] as usize).nth(i).unwrap();
            reference[pos] == CellState::Undef
        })
        .collect();
    if candidates.is_empty() {
        return false;
    }
    let (k, i) = candidates[rng.random_range(0..candidates.len())];
    let len = ships[k] as usize;
    let pos = solution[k].cells(len).nth(i).unwrap();
    working.init[pos] = solution[k].cell_state(len, i);
    working.typed_disclosed += 1;
    true
}
