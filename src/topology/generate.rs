//! Perfect maze generation with an iterative recursive backtracker
//!
//! Starting from `(0, 0)`, repeatedly move to a random unvisited neighbour, knocking down the
//! wall in between, and backtrack when none is left. Every interior midpoint starts as a wall.

use std::collections::HashSet;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use strum::VariantArray;

use super::{Action, Coord, HalfPoint};

/// Wall midpoints left standing after carving a `size` x `size` grid
pub(super) fn carve(size: usize, seed: u64) -> HashSet<HalfPoint> {
    let side = size as i32;
    let in_grid = |c: Coord| (0..side).contains(&c.x) && (0..side).contains(&c.y);

    let mut walls = HashSet::new();
    for y in 0..side {
        for x in 0..side {
            let coord = Coord::new(x, y);
            for &action in &[Action::Right, Action::Down] {
                if in_grid(coord.shifted(action)) {
                    walls.insert(HalfPoint::between(coord, action));
                }
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut visited = vec![false; size * size];
    let index = |c: Coord| (c.y * side + c.x) as usize;

    let start = Coord::new(0, 0);
    visited[index(start)] = true;
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {
        let options = Action::VARIANTS
            .iter()
            .copied()
            .filter(|&a| {
                let next = current.shifted(a);
                in_grid(next) && !visited[index(next)]
            })
            .collect::<Vec<_>>();

        match options.choose(&mut rng) {
            Some(&action) => {
                let next = current.shifted(action);
                walls.remove(&HalfPoint::between(current, action));
                visited[index(next)] = true;
                stack.push(next);
            }
            None => {
                stack.pop();
            }
        }
    }

    walls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carving_is_deterministic() {
        assert_eq!(carve(6, 42), carve(6, 42));
        assert_ne!(carve(6, 42), carve(6, 43), "Different seeds give different mazes");
    }

    #[test]
    fn perfect_maze_wall_count() {
        // A spanning tree over n cells opens exactly n - 1 of the 2 * s * (s - 1) interior walls
        let size = 15;
        let interior = 2 * size * (size - 1);
        let opened = size * size - 1;
        assert_eq!(carve(size, 7).len(), interior - opened);
    }

    #[test]
    fn single_cell_has_no_walls() {
        assert!(carve(1, 0).is_empty());
    }
}
