use std::{
    collections::{btree_map::Entry, BTreeMap},
    ops::Index,
};

use rand::Rng;

use crate::Result;

/// Progress of the current episode
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum Status {
    /// Still looking for the goal
    #[default]
    Searching,
    /// The goal has been reached; terminal until the next reset
    WaterReached,
}

/// The result of a single successful [`Environment::step`]
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome<S> {
    /// State after the transition
    pub state: S,
    /// Reward for the transition
    pub reward: f32,
    /// Episode status after the transition
    pub status: Status,
}

impl<S> Outcome<S> {
    pub fn is_terminal(&self) -> bool {
        self.status == Status::WaterReached
    }
}

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite state space and action space.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Determine if the state is active or terminal
    fn is_active(&self) -> bool;

    /// Update the environment in response to an action taken by an agent, producing a new state
    /// and associated reward
    ///
    /// An `Err` means the action was rejected and the environment is unchanged.
    fn step(&mut self, action: Self::Action) -> Result<Outcome<Self::State>>;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;
}

/// An environment whose legal actions can be enumerated for the current state
pub trait DiscreteActionSpace: Environment {
    /// Get the legal actions for the current state
    fn actions(&self) -> Vec<Self::Action>;

    /// Sample one of the legal actions uniformly, or `None` if there are none
    fn random_action<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Self::Action> {
        let mut actions = self.actions();
        if actions.is_empty() {
            return None;
        }
        let i = rng.gen_range(0..actions.len());
        Some(actions.swap_remove(i))
    }
}

/// An environment that accumulates a [`Report`] while an episode runs
pub trait Reporting {
    /// Metrics accumulated since they were last taken
    fn report_mut(&mut self) -> &mut Report;
}

/// Named per-episode metrics accumulated by an environment
///
/// Keys are fixed at construction and iterate in sorted order, so [`Report::keys`] lines up with
/// the values of [`Report::take`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    values: BTreeMap<&'static str, f64>,
}

impl Report {
    pub fn new(keys: Vec<&'static str>) -> Self {
        Self {
            values: keys.into_iter().map(|k| (k, 0.0)).collect(),
        }
    }

    /// Metric names in iteration order
    pub fn keys(&self) -> Vec<&'static str> {
        self.values.keys().copied().collect()
    }

    /// Entry for a metric, for in-place updates
    pub fn entry(&mut self, key: &'static str) -> Entry<'_, &'static str, f64> {
        self.values.entry(key)
    }

    /// Return the accumulated metrics and zero them for the next episode
    pub fn take(&mut self) -> BTreeMap<&'static str, f64> {
        let zeroed = self.values.keys().map(|&k| (k, 0.0)).collect();
        std::mem::replace(&mut self.values, zeroed)
    }
}

impl Index<&str> for Report {
    type Output = f64;

    /// **Panics** if `key` is not a metric of this report
    fn index(&self, key: &str) -> &Self::Output {
        &self.values[key]
    }
}
