use std::collections::HashSet;

use log::{trace, warn};

use crate::{
    env::{DiscreteActionSpace, Environment, Outcome, Report, Reporting, Status},
    gym::shaping::Shaping,
    topology::{Action, LegalMoves, Maze, Topology},
    Error, Result,
};

/// Reward for reaching the goal
pub const GOAL_REWARD: f32 = 10.0;

/// Reward for moving into a cell already visited this episode
pub const REVISIT_PENALTY: f32 = -0.25;

/// Configuration for a [`MazeEnv`]
#[derive(Debug, Clone, PartialEq)]
pub struct MazeConfig {
    /// Cell every episode starts from
    ///
    /// **Default**: `0`
    pub start: usize,
    /// Cell holding the water; reaching it ends the episode
    ///
    /// **Default**: `165`
    pub goal: usize,
    /// Extra reward shaping on top of the goal and revisit rewards
    ///
    /// **Default**: [`Shaping::Base`]
    pub shaping: Shaping,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            start: 0,
            goal: 165,
            shaping: Shaping::Base,
        }
    }
}

/// An agent searching a walled maze for water
///
/// Intended for use with a [`TdAgent`](crate::algo::tabular::td::TdAgent)
pub struct MazeEnv<T: Topology = Maze> {
    maze: T,
    legal: LegalMoves,
    start: usize,
    goal: usize,
    current: usize,
    visited: HashSet<usize>,
    status: Status,
    shaping: Shaping,
    pub report: Report,
}

impl<T: Topology> MazeEnv<T> {
    /// Build the environment and derive its legal-move table
    ///
    /// Fails if the start or goal cell does not exist in `maze`.
    pub fn new(maze: T, config: MazeConfig) -> Result<Self> {
        let n_cells = maze.n_cells();
        for cell in [config.start, config.goal] {
            if cell >= n_cells {
                return Err(Error::CellOutOfRange { cell, n_cells });
            }
        }

        let legal = LegalMoves::derive(&maze);
        let mut shaping = config.shaping;
        shaping.reset();

        Ok(Self {
            maze,
            legal,
            start: config.start,
            goal: config.goal,
            current: config.start,
            visited: HashSet::new(),
            status: Status::Searching,
            shaping,
            report: Report::new(vec!["reward", "steps"]),
        })
    }

    pub fn maze(&self) -> &T {
        &self.maze
    }

    pub fn legal_moves(&self) -> &LegalMoves {
        &self.legal
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn goal(&self) -> usize {
        self.goal
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Cells left during the current episode
    pub fn visited(&self) -> &HashSet<usize> {
        &self.visited
    }

    pub fn shaping(&self) -> &Shaping {
        &self.shaping
    }

    fn reject(&self, error: Error) -> Result<Outcome<usize>> {
        warn!("{error}");
        Err(error)
    }
}

impl<T: Topology> Environment for MazeEnv<T> {
    type State = usize;
    type Action = Action;

    fn is_active(&self) -> bool {
        self.status == Status::Searching
    }

    fn step(&mut self, action: Self::Action) -> Result<Outcome<Self::State>> {
        if !self.is_active() {
            return self.reject(Error::EpisodeOver { cell: self.current });
        }
        if !self.legal.is_legal(self.current, action) {
            return self.reject(Error::IllegalAction {
                cell: self.current,
                action,
            });
        }

        let target = self.maze.coords(self.current).shifted(action);
        let Some(next) = self.maze.cell_at(target) else {
            return self.reject(Error::UnknownCoordinate {
                x: target.x,
                y: target.y,
            });
        };

        let shaped = self
            .shaping
            .shape(action, self.legal.get(self.current).len());
        let reward = if next == self.goal {
            GOAL_REWARD
        } else if self.visited.contains(&next) {
            REVISIT_PENALTY
        } else {
            shaped
        };

        self.visited.insert(self.current);
        trace!("{} --{action:?}--> {next} (reward {reward})", self.current);
        self.current = next;
        if next == self.goal {
            self.status = Status::WaterReached;
        }

        self.report.entry("steps").and_modify(|x| *x += 1.0);
        self.report
            .entry("reward")
            .and_modify(|x| *x += reward as f64);

        Ok(Outcome {
            state: next,
            reward,
            status: self.status,
        })
    }

    fn reset(&mut self) -> Self::State {
        self.current = self.start;
        self.visited.clear();
        self.status = Status::Searching;
        self.shaping.reset();
        self.current
    }
}

impl<T: Topology> DiscreteActionSpace for MazeEnv<T> {
    fn actions(&self) -> Vec<Self::Action> {
        self.legal.get(self.current).to_vec()
    }
}

impl<T: Topology> Reporting for MazeEnv<T> {
    fn report_mut(&mut self) -> &mut Report {
        &mut self.report
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::{
        gym::shaping::{Turn, TURN_PENALTY},
        topology::{Coord, HalfPoint},
    };

    /// Three cells in a row; the middle one also opens down onto the goal
    ///
    /// ```text
    /// 0 1 2
    ///   3
    /// ```
    fn t_maze(shaping: Shaping) -> MazeEnv {
        let cells = [
            Coord::new(0, 0),
            Coord::new(1, 0),
            Coord::new(2, 0),
            Coord::new(1, 1),
        ];
        let walls = [
            HalfPoint::between(Coord::new(0, 0), Action::Down),
            HalfPoint::between(Coord::new(2, 0), Action::Down),
        ];
        let maze = Maze::new(3, cells, walls).unwrap();
        let config = MazeConfig {
            start: 0,
            goal: 3,
            shaping,
        };
        MazeEnv::new(maze, config).unwrap()
    }

    fn open_env(start: usize, goal: usize, shaping: Shaping) -> MazeEnv {
        let config = MazeConfig {
            start,
            goal,
            shaping,
        };
        MazeEnv::new(Maze::open(15).unwrap(), config).unwrap()
    }

    #[test]
    fn reset_is_idempotent() {
        let mut env = open_env(0, 165, Shaping::Base);
        env.step(Action::Right).unwrap();
        env.step(Action::Down).unwrap();

        for _ in 0..2 {
            assert_eq!(env.reset(), 0);
            assert_eq!(env.current(), 0);
            assert_eq!(env.status(), Status::Searching);
            assert!(env.visited().is_empty());
        }
    }

    #[test]
    fn start_cell_actions() {
        let env = open_env(0, 165, Shaping::Base);
        assert_eq!(env.actions(), [Action::Down, Action::Right]);
    }

    #[test]
    fn step_then_goal() {
        let mut env = t_maze(Shaping::Base);
        env.reset();

        let first = env.step(Action::Right).unwrap();
        assert_eq!(first.state, 1);
        assert_eq!(first.reward, 0.0);
        assert_eq!(first.status, Status::Searching);

        let second = env.step(Action::Down).unwrap();
        assert_eq!(second.state, 3);
        assert_eq!(second.reward, GOAL_REWARD);
        assert_eq!(second.status, Status::WaterReached);
        assert!(!env.is_active());
    }

    #[test]
    fn illegal_action_changes_nothing() {
        let mut env = t_maze(Shaping::turn_aware());
        env.reset();
        env.step(Action::Right).unwrap();
        let shaping = env.shaping().clone();
        let report = env.report.clone();

        let result = env.step(Action::Up);
        assert_eq!(
            result,
            Err(Error::IllegalAction {
                cell: 1,
                action: Action::Up
            })
        );
        assert_eq!(env.current(), 1);
        assert_eq!(env.visited(), &HashSet::from([0]));
        assert_eq!(env.status(), Status::Searching);
        assert_eq!(env.shaping(), &shaping);
        assert_eq!(env.report, report);
    }

    #[test]
    fn terminal_state_is_absorbing() {
        let mut env = t_maze(Shaping::Base);
        env.reset();
        env.step(Action::Right).unwrap();
        env.step(Action::Down).unwrap();

        assert_eq!(env.step(Action::Up), Err(Error::EpisodeOver { cell: 3 }));
        assert_eq!(env.current(), 3);
        assert_eq!(env.status(), Status::WaterReached);
    }

    #[test]
    fn revisit_is_penalized() {
        let mut env = open_env(0, 165, Shaping::Base);
        env.reset();
        assert_eq!(env.step(Action::Right).unwrap().reward, 0.0);
        assert_eq!(env.step(Action::Left).unwrap().reward, REVISIT_PENALTY);
        assert_eq!(env.step(Action::Right).unwrap().reward, REVISIT_PENALTY);
        assert_eq!(env.step(Action::Down).unwrap().reward, 0.0);
    }

    #[test]
    fn goal_wins_over_revisit() {
        for shaping in [Shaping::Base, Shaping::turn_aware()] {
            // Starting on the goal puts it in the visited set as soon as the agent leaves
            let mut env = open_env(165, 165, shaping.clone());
            env.reset();
            env.step(Action::Down).unwrap();
            assert!(env.visited().contains(&165));

            let outcome = env.step(Action::Up).unwrap();
            assert_eq!(outcome.reward, GOAL_REWARD, "{shaping:?}");
            assert_eq!(outcome.status, Status::WaterReached);
        }
    }

    #[test]
    fn goal_wins_over_turn_penalty() {
        let mut env = open_env(112, 126, Shaping::turn_aware());
        env.reset();
        env.step(Action::Down).unwrap();
        let outcome = env.step(Action::Left).unwrap();
        assert_eq!(outcome.state, 126);
        assert_eq!(outcome.reward, GOAL_REWARD);
        assert!(outcome.is_terminal());
    }

    #[test]
    fn repeated_turn_in_maze() {
        // Start in the middle of an open grid, heading right
        let mut env = open_env(112, 0, Shaping::turn_aware());
        env.reset();

        assert_eq!(env.step(Action::Down).unwrap().reward, 0.0);
        let outcome = env.step(Action::Left).unwrap();
        assert_eq!(outcome.reward, TURN_PENALTY);

        let Shaping::TurnAware(tracker) = env.shaping() else {
            panic!("Turn-aware shaping expected");
        };
        assert_eq!(tracker.current_run(), 0);
        assert_eq!(tracker.last_turn(), Some(Turn::Right));
        assert_eq!(tracker.last_action(), Action::Left);
    }

    #[test]
    fn revisit_overrides_turn_penalty() {
        let mut env = open_env(112, 0, Shaping::turn_aware());
        env.reset();
        env.step(Action::Down).unwrap();
        env.step(Action::Left).unwrap();
        env.step(Action::Up).unwrap();
        // Up to Right repeats the remembered right turn, but 112 was already visited
        let outcome = env.step(Action::Right).unwrap();
        assert_eq!(outcome.state, 112);
        assert_eq!(outcome.reward, REVISIT_PENALTY);
    }

    #[test]
    fn report_tracks_episode() {
        let mut env = t_maze(Shaping::Base);
        env.reset();
        env.step(Action::Right).unwrap();
        env.step(Action::Left).unwrap();
        env.step(Action::Right).unwrap();
        env.step(Action::Down).unwrap();

        let report = env.report.take();
        assert_eq!(report["steps"], 4.0);
        assert_eq!(report["reward"], 10.0 - 0.25 - 0.25);
    }

    #[test]
    fn new_rejects_missing_cells() {
        let config = MazeConfig {
            goal: 300,
            ..Default::default()
        };
        let result = MazeEnv::new(Maze::open(15).unwrap(), config);
        assert!(matches!(
            result,
            Err(Error::CellOutOfRange {
                cell: 300,
                n_cells: 225
            })
        ));
    }

    #[test]
    fn every_legal_action_is_accepted() {
        let maze = Maze::generate(15, 3).unwrap();
        let mut env = MazeEnv::new(maze, MazeConfig::default()).unwrap();
        env.reset();
        for action in Action::iter() {
            let legal = env.actions().contains(&action);
            let mut probe = MazeEnv::new(env.maze().clone(), MazeConfig::default()).unwrap();
            probe.reset();
            assert_eq!(probe.step(action).is_ok(), legal, "{action:?}");
        }
    }
}
