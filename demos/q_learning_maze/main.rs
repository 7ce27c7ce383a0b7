use std::error::Error;

use maze_rl::{
    algo::tabular::{TdAgent, TdAgentConfig, UpdateRule},
    decay,
    exploration::EpsilonGreedy,
    gym::{MazeConfig, MazeEnv},
    topology::Maze,
    train::{TrainConfig, Trainer},
    viz,
};

const NUM_EPISODES: u32 = 2000;
const MAZE_SEED: u64 = 2024;

fn main() -> Result<(), Box<dyn Error>> {
    let maze = Maze::generate(15, MAZE_SEED)?;
    let mut env = MazeEnv::new(maze.clone(), MazeConfig::default())?;
    let exploration = EpsilonGreedy::new(decay::Exponential::new(5e-3, 0.5, 0.01)?);
    let mut agent = TdAgent::<MazeEnv, decay::Exponential>::new(TdAgentConfig {
        alpha: 0.5,
        rule: UpdateRule::QLearning,
        ..TdAgentConfig::with_exploration(exploration)
    })?;

    let (handle, tx) = viz::init(maze, env.report.keys(), NUM_EPISODES);

    let trainer = Trainer::new(TrainConfig {
        episodes: NUM_EPISODES,
        ..Default::default()
    });
    trainer.run(&mut agent, &mut env, |stats, episode| {
        let path = (stats.episode % 10 == 0 || stats.episode + 1 == NUM_EPISODES)
            .then(|| episode.path.clone());
        // The dashboard may already be closed
        let _ = tx.send(viz::Update {
            episode: stats.episode,
            data: stats.metrics.values().copied().collect(),
            path,
        });
    })?;
    drop(tx);

    match handle.join() {
        Ok(result) => Ok(result?),
        Err(_) => Err("dashboard thread panicked".into()),
    }
}
