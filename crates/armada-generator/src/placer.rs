//! Random placement of a fleet on an empty grid.
//!
//! Ships are dropped one at a time at uniformly sampled positions; each
//! placed ship blocks its cells and their one-cell border for the ships
//! after it. When a ship cannot be placed, the ship before it is
//! resampled, and a call budget bounds the whole attempt so a hopeless
//! configuration is abandoned quickly.

use armada_core::{Grid, Orientation, ShipPlacement};
use rand::Rng;

/// Samples a non-touching arrangement of the fleet, or gives up when the
/// call budget runs out.
///
/// Positions are drawn uniformly over the union of the horizontal and
/// vertical position spaces. For a one-cell ship the two spaces coincide,
/// so each cell is counted twice; that only doubles every weight and
/// keeps the draw uniform.
pub(crate) fn place_fleet<R: Rng + ?Sized>(
    height: usize,
    width: usize,
    ships: &[u8],
    rng: &mut R,
    call_limit: u32,
) -> Option<Vec<ShipPlacement>> {
    let mut placer = Placer {
        height,
        width,
        ships,
        blocked: vec![Grid::new(height, width, false); ships.len().saturating_sub(1)],
        placements: vec![ShipPlacement::new(Orientation::Horizontal, 0, 0); ships.len()],
        calls: 0,
        call_limit,
    };
    placer.place(0, rng).then_some(placer.placements)
}

struct Placer<'a> {
    height: usize,
    width: usize,
    ships: &'a [u8],
    blocked: Vec<Grid<bool>>,
    placements: Vec<ShipPlacement>,
    calls: u32,
    call_limit: u32,
}

impl Placer<'_> {
    fn place<R: Rng + ?Sized>(&mut self, idx: usize, rng: &mut R) -> bool {
        self.calls += 1;
        if self.calls > self.call_limit {
            return false;
        }

        let (h, w) = (self.height, self.width);
        let len = self.ships[idx] as usize;
        let horizontal_count = h * (w - len + 1);
        let position_count = horizontal_count + (h - len + 1) * w;

        loop {
            let pos = rng.random_range(0..position_count);
            let (vert, y, x) = if pos < horizontal_count {
                (false, pos / (w - len + 1), pos % (w - len + 1))
            } else {
                let pos = pos - horizontal_count;
                (true, pos / w, pos % w)
            };
            let (ship_h, ship_w) = if vert { (len, 1) } else { (1, len) };

            // collision with an earlier ship bubbles up as a failure,
            // which makes the caller resample its own ship
            let mut hit = false;
            'layers: for layer in &self.blocked[..idx] {
                for i in 0..ship_h {
                    for j in 0..ship_w {
                        if layer.get(y + i, x + j) {
                            hit = true;
                            break 'layers;
                        }
                    }
                }
            }
            if hit {
                return false;
            }

            let orientation = if vert && len > 1 {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            };

            if idx == self.ships.len() - 1 {
                self.placements[idx] = ShipPlacement::new(orientation, y, x);
                return true;
            }

            for i in y.saturating_sub(1)..(y + ship_h + 1).min(h) {
                for j in x.saturating_sub(1)..(x + ship_w + 1).min(w) {
                    self.blocked[idx].set(i, j, true);
                }
            }
            if self.place(idx + 1, rng) {
                self.placements[idx] = ShipPlacement::new(orientation, y, x);
                return true;
            }
            if self.calls > self.call_limit {
                return false;
            }
            self.blocked[idx].fill(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn test_places_full_fleet() {
        let ships = [4u8, 4, 3, 3, 2, 2, 2];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let placements = place_fleet(7, 7, &ships, &mut rng, 1200).unwrap();
        assert_eq!(placements.len(), ships.len());

        // cells are distinct, in bounds, and no two ships touch
        let mut owner = Grid::new(7, 7, None::<usize>);
        for (idx, (&len, p)) in ships.iter().zip(&placements).enumerate() {
            for c in p.cells(len as usize) {
                assert!(owner[c].is_none(), "overlap at {c:?}");
                owner[c] = Some(idx);
            }
        }
        for y in 0..7i32 {
            for x in 0..7i32 {
                let Some(a) = owner.get(y as usize, x as usize) else {
                    continue;
                };
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let Some(b) = owner
                            .at(y as isize + dy as isize, x as isize + dx as isize)
                            .flatten()
                        else {
                            continue;
                        };
                        assert_eq!(a, b, "ships {a} and {b} touch near ({y},{x})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_impossible_fleet_hits_the_budget() {
        // eight ships of four cannot fit a 7-wide board without touching
        let ships = [4u8; 8];
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert_eq!(place_fleet(7, 7, &ships, &mut rng, 500), None);
    }

    #[test]
    fn test_deterministic_for_a_seed() {
        let ships = [3u8, 2, 2];
        let mut rng1 = ChaCha8Rng::seed_from_u64(9);
        let mut rng2 = ChaCha8Rng::seed_from_u64(9);
        let a = place_fleet(8, 10, &ships, &mut rng1, 1200);
        let b = place_fleet(8, 10, &ships, &mut rng2, 1200);
        assert_eq!(a, b);
        assert!(a.is_some());
    }
}
