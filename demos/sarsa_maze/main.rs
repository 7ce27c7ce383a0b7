use std::{error::Error, fs, path::Path};

use maze_rl::{
    algo::tabular::{TdAgent, TdAgentConfig, UpdateRule},
    decay,
    exploration::EpsilonGreedy,
    gym::{MazeConfig, MazeEnv, Shaping},
    topology::Maze,
    train::{TrainConfig, Trainer},
};

const NUM_EPISODES: u32 = 500;
const MAZE_SEED: u64 = 7;

fn main() -> Result<(), Box<dyn Error>> {
    let out = Path::new("demos/sarsa_maze/out");

    let maze = Maze::generate(15, MAZE_SEED)?;
    let mut env = MazeEnv::new(
        maze,
        MazeConfig {
            shaping: Shaping::turn_aware(),
            ..Default::default()
        },
    )?;
    let mut agent = TdAgent::<MazeEnv>::new(TdAgentConfig {
        exploration: EpsilonGreedy::new(decay::Constant::new(0.1)),
        alpha: 0.5,
        gamma: 0.9,
        rule: UpdateRule::Sarsa,
        seed: Some(0),
        ..Default::default()
    })?;

    fs::create_dir_all(out)?;
    let mut wtr = csv::Writer::from_path(out.join("data.csv"))?;
    wtr.write_record(["episode", "steps", "reward"])?;

    let trainer = Trainer::new(TrainConfig {
        episodes: NUM_EPISODES,
        ..Default::default()
    });
    let history = trainer.run(&mut agent, &mut env, |stats, _| {
        let record = [
            stats.episode.to_string(),
            stats.steps.to_string(),
            stats.total_reward.to_string(),
        ];
        if let Err(e) = wtr.write_record(&record) {
            eprintln!("Failed to write episode {}: {e}", stats.episode);
        }
    })?;
    wtr.flush()?;

    for (episode, checkpoint) in &history.checkpoints {
        println!(
            "Episode {episode}: {} steps",
            checkpoint.path.len().saturating_sub(1)
        );
    }
    if let Some((episode, checkpoint)) = history.checkpoints.last_key_value() {
        println!("\nPath at episode {episode}:");
        println!("{}", env.maze().render(&checkpoint.path));
    }

    Ok(())
}
