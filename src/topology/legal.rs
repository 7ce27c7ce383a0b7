use strum::VariantArray;

use super::{Action, HalfPoint, Topology};

/// The legal moves out of every cell, derived once from a [`Topology`]
///
/// A move is legal iff no wall stands at the midpoint it crosses and the destination lies within
/// `[0, bound]` on both axes. Moves are listed in [`Action`] declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalMoves {
    moves: Vec<Vec<Action>>,
}

impl LegalMoves {
    /// Derive the legal-move table for every cell of `topology`
    pub fn derive(topology: &impl Topology) -> Self {
        let bound = topology.bound();
        let moves = (0..topology.n_cells())
            .map(|cell| {
                let coord = topology.coords(cell);
                Action::VARIANTS
                    .iter()
                    .copied()
                    .filter(|&action| {
                        let next = coord.shifted(action);
                        !topology.is_wall(HalfPoint::between(coord, action))
                            && (0..=bound).contains(&next.x)
                            && (0..=bound).contains(&next.y)
                    })
                    .collect()
            })
            .collect();

        Self { moves }
    }

    /// Legal moves out of `cell`, empty if `cell` is out of range
    pub fn get(&self, cell: usize) -> &[Action] {
        self.moves.get(cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `action` is legal from `cell`
    pub fn is_legal(&self, cell: usize, action: Action) -> bool {
        self.get(cell).contains(&action)
    }

    /// Number of cells covered by the table
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
