use crate::env::{Environment, Outcome};

/// Represents a single experience or transition in the environment
pub struct Exp<E: Environment> {
    /// The state of the environment before taking the action
    pub state: E::State,
    /// The action taken in the given state
    pub action: E::Action,
    /// The state of the environment after the action is taken, or if terminal, `None`
    pub next_state: Option<E::State>,
    /// The reward received after taking the action
    pub reward: f32,
}

impl<E: Environment> Exp<E> {
    /// Pair the state and action that produced `outcome` with the outcome itself
    pub fn from_outcome(state: E::State, action: E::Action, outcome: Outcome<E::State>) -> Self {
        let terminal = outcome.is_terminal();
        Self {
            state,
            action,
            next_state: (!terminal).then_some(outcome.state),
            reward: outcome.reward,
        }
    }
}

impl<E: Environment> Clone for Exp<E>
where
    E::State: Clone,
    E::Action: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            action: self.action.clone(),
            next_state: self.next_state.clone(),
            reward: self.reward,
        }
    }
}

/// The trajectory of one episode, from the reset state to the terminal state
#[derive(Debug, Clone, PartialEq)]
pub struct Episode<S> {
    /// Every state visited, in order, starting with the reset state
    pub path: Vec<S>,
    /// Sum of the rewards received
    pub total_reward: f32,
}

impl<S> Episode<S> {
    pub fn new(start: S) -> Self {
        Self {
            path: vec![start],
            total_reward: 0.0,
        }
    }

    pub fn push(&mut self, state: S, reward: f32) {
        self.path.push(state);
        self.total_reward += reward;
    }

    /// Number of transitions taken
    pub fn steps(&self) -> usize {
        self.path.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{env::tests::MockEnv, env::Status, topology::Action};

    #[test]
    fn terminal_outcome_drops_next_state() {
        let outcome = Outcome {
            state: 2,
            reward: 1.0,
            status: Status::WaterReached,
        };
        let exp = Exp::<MockEnv>::from_outcome(1, Action::Right, outcome);
        assert_eq!(exp.next_state, None);
        assert_eq!(exp.reward, 1.0);

        let outcome = Outcome {
            state: 1,
            reward: -1.0,
            status: Status::Searching,
        };
        let exp = Exp::<MockEnv>::from_outcome(0, Action::Right, outcome);
        assert_eq!(exp.next_state, Some(1));
    }

    #[test]
    fn episode_accumulates() {
        let mut episode = Episode::new(0);
        assert_eq!(episode.steps(), 0);
        episode.push(1, -0.25);
        episode.push(2, 10.0);
        assert_eq!(episode.path, [0, 1, 2]);
        assert_eq!(episode.steps(), 2);
        assert_eq!(episode.total_reward, 9.75);
    }
}
