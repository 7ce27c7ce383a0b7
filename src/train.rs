use std::collections::BTreeMap;

use log::info;

use crate::{
    algo::tabular::{Hashable, QTable, TdAgent},
    decay::Decay,
    env::{DiscreteActionSpace, Environment, Reporting},
    exp::Episode,
    Result,
};

/// Configuration for a [`Trainer`]
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Number of episodes to run
    ///
    /// **Default**: `500`
    pub episodes: u32,
    /// Episode indices at which the table and path are snapshotted
    ///
    /// Indices past the last episode are ignored.
    ///
    /// **Default**: `[0, 1, 5, 10, 50, 100, 200, 500, 1000, 10000]`
    pub checkpoints: Vec<u32>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            checkpoints: vec![0, 1, 5, 10, 50, 100, 200, 500, 1000, 10000],
        }
    }
}

/// Summary of a single finished episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeStats {
    /// Index of the episode within the run, from `0`
    pub episode: u32,
    pub steps: usize,
    pub total_reward: f32,
    /// Metrics drained from the environment's [`Report`](crate::env::Report)
    pub metrics: BTreeMap<&'static str, f64>,
}

/// Value table and path as they stood right after a checkpoint episode
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint<S: Hashable, A: Hashable> {
    pub table: QTable<S, A>,
    pub path: Vec<S>,
}

/// Everything recorded over a training run
#[derive(Debug, Clone, PartialEq)]
pub struct History<S: Hashable, A: Hashable> {
    pub stats: Vec<EpisodeStats>,
    pub checkpoints: BTreeMap<u32, Checkpoint<S, A>>,
}

impl<S: Hashable, A: Hashable> History<S, A> {
    /// Mean step count over the last `n` episodes, or `None` if there are none
    pub fn mean_steps(&self, n: usize) -> Option<f64> {
        let tail = &self.stats[self.stats.len().saturating_sub(n)..];
        if tail.is_empty() {
            return None;
        }
        Some(tail.iter().map(|s| s.steps as f64).sum::<f64>() / tail.len() as f64)
    }
}

/// Runs an agent for a fixed number of episodes against one environment
///
/// The agent's table persists across episodes; the environment is reset at the start of each.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainConfig,
}

impl Trainer {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Train `agent` in `env`, calling `on_episode` after every episode
    pub fn run<E, D, F>(
        &self,
        agent: &mut TdAgent<E, D>,
        env: &mut E,
        mut on_episode: F,
    ) -> Result<History<E::State, E::Action>>
    where
        E: Environment + DiscreteActionSpace + Reporting,
        E::State: Hashable,
        E::Action: Hashable,
        D: Decay,
        F: FnMut(&EpisodeStats, &Episode<E::State>),
    {
        info!(
            "Training a {:?} agent for {} episodes",
            agent.rule(),
            self.config.episodes
        );

        let mut history = History {
            stats: Vec::with_capacity(self.config.episodes as usize),
            checkpoints: BTreeMap::new(),
        };

        for i in 0..self.config.episodes {
            let episode = agent.go(env)?;
            let stats = EpisodeStats {
                episode: i,
                steps: episode.steps(),
                total_reward: episode.total_reward,
                metrics: env.report_mut().take(),
            };

            if self.config.checkpoints.contains(&i) {
                info!("Checkpoint at episode {i}: {} steps", stats.steps);
                history.checkpoints.insert(
                    i,
                    Checkpoint {
                        table: agent.table().clone(),
                        path: episode.path.clone(),
                    },
                );
            }

            on_episode(&stats, &episode);
            history.stats.push(stats);
        }

        info!(
            "Training finished; mean steps over the last 10 episodes: {:.1}",
            history.mean_steps(10).unwrap_or(0.0)
        );
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algo::tabular::{TdAgentConfig, UpdateRule},
        decay,
        env::tests::MockEnv,
        exploration::EpsilonGreedy,
        gym::{MazeConfig, MazeEnv},
        topology::Maze,
    };

    #[test]
    fn records_stats_and_checkpoints() {
        let mut env = MockEnv::new(5);
        let mut agent = TdAgent::<MockEnv>::new(TdAgentConfig {
            seed: Some(1),
            ..Default::default()
        })
        .unwrap();
        let trainer = Trainer::new(TrainConfig {
            episodes: 12,
            checkpoints: vec![0, 5, 10, 50],
        });

        let mut seen = Vec::new();
        let history = trainer
            .run(&mut agent, &mut env, |stats, episode| {
                assert_eq!(stats.steps, episode.steps());
                seen.push(stats.episode);
            })
            .unwrap();

        assert_eq!(seen, (0..12).collect::<Vec<_>>());
        assert_eq!(history.stats.len(), 12);
        assert_eq!(
            history.checkpoints.keys().copied().collect::<Vec<_>>(),
            [0, 5, 10]
        );
        for stats in &history.stats {
            assert_eq!(stats.metrics["steps"], stats.steps as f64);
        }
        for checkpoint in history.checkpoints.values() {
            assert_eq!(checkpoint.path.first(), Some(&0));
            assert_eq!(checkpoint.path.last(), Some(&4));
        }
        assert!(
            history.checkpoints[&0].table.len() <= history.checkpoints[&10].table.len(),
            "Snapshots are taken as training goes"
        );
        assert_eq!(agent.episode(), 12);
    }

    #[test]
    fn learns_a_generated_maze() {
        for rule in [UpdateRule::QLearning, UpdateRule::Sarsa] {
            let maze = Maze::generate(15, 42).unwrap();
            let mut env = MazeEnv::new(maze, MazeConfig::default()).unwrap();
            let mut agent = TdAgent::<MazeEnv>::new(TdAgentConfig {
                exploration: EpsilonGreedy::new(decay::Constant::new(0.05)),
                alpha: 0.5,
                rule,
                seed: Some(7),
                ..Default::default()
            })
            .unwrap();
            let trainer = Trainer::new(TrainConfig {
                episodes: 300,
                ..Default::default()
            });

            let history = trainer.run(&mut agent, &mut env, |_, _| {}).unwrap();
            let early = history.stats[..10]
                .iter()
                .map(|s| s.steps as f64)
                .sum::<f64>()
                / 10.0;
            let late = history.mean_steps(20).unwrap();
            assert!(
                late < early,
                "{rule:?}: late mean {late} should beat early mean {early}"
            );
            for stats in &history.stats {
                assert_eq!(stats.metrics["steps"], stats.steps as f64);
            }
        }
    }

    #[test]
    fn mean_steps_of_empty_history() {
        let history = History::<usize, crate::topology::Action> {
            stats: Vec::new(),
            checkpoints: BTreeMap::new(),
        };
        assert_eq!(history.mean_steps(10), None);
    }
}
