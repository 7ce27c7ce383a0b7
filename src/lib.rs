/// Tabular learning algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Error type shared by the environment and the agents
pub mod error;

/// Experience produced by a single environment transition
pub mod exp;

/// Exploration policies
pub mod exploration;

/// Maze environments
pub mod gym;

/// Maze geometry and move legality
pub mod topology;

/// Episode loop, checkpoints and per-episode statistics
pub mod train;

/// Terminal dashboard for watching a training run
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use error::{Error, Result};
