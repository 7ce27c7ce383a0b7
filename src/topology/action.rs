use strum::{EnumIter, VariantArray};

/// A cardinal move on the grid
///
/// The y axis grows downward, so [`Action::Up`] decreases `y`. The declaration order
/// (`Up`, `Down`, `Left`, `Right`) is the order in which legal moves are listed.
#[derive(EnumIter, VariantArray, Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// Unit coordinate delta `(dx, dy)` of the move
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }

    /// Position on the clockwise compass `Right=1, Down=2, Left=3, Up=4`, taken mod 4
    pub const fn heading(self) -> i32 {
        match self {
            Action::Right => 1,
            Action::Down => 2,
            Action::Left => 3,
            Action::Up => 0, // 4 mod 4
        }
    }

    /// The move that undoes this one
    pub const fn inverse(self) -> Self {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
        }
    }
}
