use std::collections::{hash_map::Iter, HashMap};

use super::Hashable;

/// Action-value table mapping `(state, action)` pairs to learned return estimates
///
/// Pairs that were never written read as the table's default value, so a miss is never an
/// error. Entries are updated in place and never removed.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable<S: Hashable, A: Hashable> {
    values: HashMap<(S, A), f32>,
    default_value: f32,
}

impl<S: Hashable, A: Hashable> Default for QTable<S, A> {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl<S: Hashable, A: Hashable> QTable<S, A> {
    pub fn new(default_value: f32) -> Self {
        Self {
            values: HashMap::new(),
            default_value,
        }
    }

    pub fn default_value(&self) -> f32 {
        self.default_value
    }

    pub fn get(&self, state: S, action: A) -> f32 {
        self.values
            .get(&(state, action))
            .copied()
            .unwrap_or(self.default_value)
    }

    pub fn set(&mut self, state: S, action: A, value: f32) {
        self.values.insert((state, action), value);
    }

    /// Move `q(state, action)` a fraction `alpha` of the way toward `target`
    ///
    /// **Returns** the new value
    pub fn update(&mut self, state: S, action: A, target: f32, alpha: f32) -> f32 {
        let default_value = self.default_value;
        let q = self.values.entry((state, action)).or_insert(default_value);
        *q += alpha * (target - *q);
        *q
    }

    /// Highest value among `actions` in `state`, or `None` if `actions` is empty
    pub fn max(&self, state: S, actions: &[A]) -> Option<f32> {
        self.best_action(state, actions).map(|a| self.get(state, a))
    }

    /// The action in `actions` with the highest value in `state`
    ///
    /// Ties go to the action listed first.
    pub fn best_action(&self, state: S, actions: &[A]) -> Option<A> {
        actions
            .iter()
            .copied()
            .fold(None, |best: Option<(A, f32)>, a| {
                let value = self.get(state, a);
                match best {
                    Some((_, best_value)) if best_value >= value => best,
                    _ => Some((a, value)),
                }
            })
            .map(|(a, _)| a)
    }

    /// Number of pairs that have been written
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the pairs that have been written
    pub fn iter(&self) -> Iter<'_, (S, A), f32> {
        self.values.iter()
    }
}
