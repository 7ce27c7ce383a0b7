use rand::Rng;

use crate::{decay::Decay, ensure_interval, Result};

use super::Choice;

/// Epsilon greedy exploration policy with an episode-indexed epsilon schedule
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Epsilon for the given episode
    pub fn epsilon(&self, episode: u32) -> f32 {
        self.epsilon.evaluate(episode as f32)
    }

    /// Check that the schedule starts inside `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        let epsilon = self.epsilon(0);
        ensure_interval!(epsilon, 0.0, 1.0);
        Ok(())
    }

    /// Invoke epsilon greedy policy for current episode
    ///
    /// Explores with probability epsilon: never when epsilon is 0, always when it is 1.
    pub fn choose<R: Rng + ?Sized>(&self, episode: u32, rng: &mut R) -> Choice {
        let epsilon = self.epsilon(episode);
        if rng.gen::<f32>() < epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}
