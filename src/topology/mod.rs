mod action;
mod generate;
mod legal;
mod maze;

pub use action::Action;
pub use legal::LegalMoves;
pub use maze::Maze;

/// Integer grid coordinates of a cell
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate one move away in the direction of `action`
    pub const fn shifted(self, action: Action) -> Self {
        let (dx, dy) = action.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// The half-integer point between two adjacent cells, where a wall may stand
///
/// Stored as doubled coordinates so that `(x + 0.5, y)` becomes `(2x + 1, 2y)` and equality
/// is exact.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct HalfPoint {
    x2: i32,
    y2: i32,
}

impl HalfPoint {
    /// Midpoint between `coord` and its neighbour in the direction of `action`
    pub const fn between(coord: Coord, action: Action) -> Self {
        let (dx, dy) = action.delta();
        Self {
            x2: 2 * coord.x + dx,
            y2: 2 * coord.y + dy,
        }
    }

    /// Build a midpoint from real coordinates such as `(3.0, 4.5)`
    ///
    /// Exactly one of the two coordinates must be a half-integer and the other an integer,
    /// otherwise the point does not separate two cells and `None` is returned.
    pub fn from_f64(x: f64, y: f64) -> Option<Self> {
        let (x2, y2) = (x * 2.0, y * 2.0);
        if x2.fract() != 0.0 || y2.fract() != 0.0 || !x2.is_finite() || !y2.is_finite() {
            return None;
        }
        let (x2, y2) = (x2 as i32, y2 as i32);
        ((x2 & 1) + (y2 & 1) == 1).then_some(Self { x2, y2 })
    }

    /// Real coordinates of the midpoint
    pub fn to_f64(self) -> (f64, f64) {
        (self.x2 as f64 / 2.0, self.y2 as f64 / 2.0)
    }
}

/// Read-only description of a maze: where every cell is and which moves are walled off
pub trait Topology {
    /// Number of cells, indexed `0..n_cells`
    fn n_cells(&self) -> usize;

    /// Grid coordinates of a cell
    ///
    /// **Panics** if `cell` is out of range
    fn coords(&self, cell: usize) -> Coord;

    /// Index of the cell at the given coordinates, if there is one
    fn cell_at(&self, coord: Coord) -> Option<usize>;

    /// Whether a wall stands at the given midpoint
    fn is_wall(&self, midpoint: HalfPoint) -> bool;

    /// Largest valid coordinate on either axis
    fn bound(&self) -> i32 {
        14
    }
}
