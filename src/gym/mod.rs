pub mod maze;
pub mod shaping;

pub use maze::{MazeConfig, MazeEnv};
pub use shaping::{Shaping, Turn, TurnTracker};
