use std::collections::{HashMap, HashSet};

use crate::{Error, Result};

use super::{generate, Action, Coord, HalfPoint, Topology};

/// A square grid maze of side `size`, with cells at integer coordinates and walls at the
/// midpoints between them
///
/// Cells need not cover the whole grid, but the mazes built by [`Maze::open`] and
/// [`Maze::generate`] do, indexed row-major (`index = y * size + x`).
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    size: usize,
    xc: Vec<i32>,
    yc: Vec<i32>,
    ce: HashMap<Coord, usize>,
    walls: HashSet<HalfPoint>,
}

impl Maze {
    /// Side length of the standard maze
    pub const STANDARD_SIZE: usize = 15;

    /// Build a maze from explicit cell coordinates and wall midpoints
    ///
    /// Cell `i` sits at `cells[i]`. Fails if two cells share coordinates or a cell lies outside
    /// `[0, size - 1]` on either axis.
    pub fn new(
        size: usize,
        cells: impl IntoIterator<Item = Coord>,
        walls: impl IntoIterator<Item = HalfPoint>,
    ) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidSize { size });
        }
        let bound = size as i32 - 1;

        let mut xc = Vec::new();
        let mut yc = Vec::new();
        let mut ce = HashMap::new();
        for (i, coord) in cells.into_iter().enumerate() {
            let Coord { x, y } = coord;
            if !(0..=bound).contains(&x) || !(0..=bound).contains(&y) {
                return Err(Error::OutOfBounds { x, y, bound });
            }
            if ce.insert(coord, i).is_some() {
                return Err(Error::DuplicateCell { x, y });
            }
            xc.push(x);
            yc.push(y);
        }

        Ok(Self {
            size,
            xc,
            yc,
            ce,
            walls: walls.into_iter().collect(),
        })
    }

    /// Build a maze from wall midpoints given as real coordinates, e.g. `(3.5, 4.0)`
    pub fn with_wall_midpoints(
        size: usize,
        cells: impl IntoIterator<Item = Coord>,
        walls: impl IntoIterator<Item = (f64, f64)>,
    ) -> Result<Self> {
        let walls = walls
            .into_iter()
            .map(|(x, y)| HalfPoint::from_f64(x, y).ok_or(Error::InvalidMidpoint { x, y }))
            .collect::<Result<Vec<_>>>()?;
        Self::new(size, cells, walls)
    }

    /// A `size` x `size` grid without any interior walls
    pub fn open(size: usize) -> Result<Self> {
        Self::new(size, row_major(size), std::iter::empty::<HalfPoint>())
    }

    /// A perfect maze on a `size` x `size` grid, carved by a randomized depth-first search
    ///
    /// The same `seed` always yields the same maze, and every cell is reachable from every
    /// other cell through exactly one path.
    pub fn generate(size: usize, seed: u64) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidSize { size });
        }
        Self::new(size, row_major(size), generate::carve(size, seed))
    }

    /// Side length of the grid
    pub fn size(&self) -> usize {
        self.size
    }

    /// x coordinate of every cell, by index
    pub fn xc(&self) -> &[i32] {
        &self.xc
    }

    /// y coordinate of every cell, by index
    pub fn yc(&self) -> &[i32] {
        &self.yc
    }

    /// Iterate over all wall midpoints
    pub fn walls(&self) -> impl Iterator<Item = HalfPoint> + '_ {
        self.walls.iter().copied()
    }

    /// Draw the maze as text, marking the cells of `path` with `*`, its first cell with `S`
    /// and its last with `G`
    ///
    /// Each cell occupies one character at `(2x + 1, 2y + 1)`; `#` marks walls, the grid edge
    /// and wall corners.
    pub fn render(&self, path: &[usize]) -> String {
        let side = 2 * self.size + 1;
        let mut canvas = vec![vec!['#'; side]; side];

        for (&x, &y) in self.xc.iter().zip(&self.yc) {
            let (cx, cy) = (2 * x as usize + 1, 2 * y as usize + 1);
            canvas[cy][cx] = ' ';
            let coord = Coord::new(x, y);
            for action in [Action::Right, Action::Down] {
                let next = coord.shifted(action);
                if self.ce.contains_key(&next) && !self.is_wall(HalfPoint::between(coord, action)) {
                    let (dx, dy) = action.delta();
                    canvas[(cy as i32 + dy) as usize][(cx as i32 + dx) as usize] = ' ';
                }
            }
        }

        let last = path.len().saturating_sub(1);
        for (step, &cell) in path.iter().enumerate() {
            let Some((&x, &y)) = self.xc.get(cell).zip(self.yc.get(cell)) else {
                continue;
            };
            let mark = match step {
                0 => 'S',
                s if s == last => 'G',
                _ => '*',
            };
            let slot = &mut canvas[2 * y as usize + 1][2 * x as usize + 1];
            if *slot != 'S' {
                *slot = mark;
            }
        }

        canvas
            .into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Topology for Maze {
    fn n_cells(&self) -> usize {
        self.xc.len()
    }

    fn coords(&self, cell: usize) -> Coord {
        Coord::new(self.xc[cell], self.yc[cell])
    }

    fn cell_at(&self, coord: Coord) -> Option<usize> {
        self.ce.get(&coord).copied()
    }

    fn is_wall(&self, midpoint: HalfPoint) -> bool {
        self.walls.contains(&midpoint)
    }

    fn bound(&self) -> i32 {
        self.size as i32 - 1
    }
}

fn row_major(size: usize) -> impl Iterator<Item = Coord> {
    let side = size as i32;
    (0..side).flat_map(move |y| (0..side).map(move |x| Coord::new(x, y)))
}
