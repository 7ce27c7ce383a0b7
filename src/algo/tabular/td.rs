use log::{debug, warn};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    decay::{self, Decay},
    ensure_interval,
    env::{DiscreteActionSpace, Environment},
    exp::{Episode, Exp},
    exploration::{Choice, EpsilonGreedy},
    Error, Result,
};

use super::{Hashable, QTable};

/// Temporal-difference rule used to update the table after each step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateRule {
    /// Off-policy: bootstrap from the best legal action in the next state
    #[default]
    QLearning,
    /// On-policy: bootstrap from the action the agent will actually take next
    Sarsa,
}

/// Configuration for the [`TdAgent`]
#[derive(Debug, Clone)]
pub struct TdAgentConfig<D: Decay> {
    /// Exploration policy, evaluated per episode
    ///
    /// **Default**: a [`Constant`](decay::Constant) epsilon of `0.1`
    pub exploration: EpsilonGreedy<D>,
    /// Learning rate, in `(0, 1]`
    ///
    /// **Default**: `0.1`
    pub alpha: f32,
    /// Discount factor, in `[0, 1]`
    ///
    /// **Default**: `0.9`
    pub gamma: f32,
    /// **Default**: [`UpdateRule::QLearning`]
    pub rule: UpdateRule,
    /// Value of state-action pairs that have not been updated yet
    ///
    /// **Default**: `0.0`
    pub default_value: f32,
    /// Seed for exploration; `None` seeds from system entropy
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
}

impl<D: Decay> TdAgentConfig<D> {
    /// Configuration with the given exploration schedule and every other field at its default
    pub fn with_exploration(exploration: EpsilonGreedy<D>) -> Self {
        Self {
            exploration,
            alpha: 0.1,
            gamma: 0.9,
            rule: UpdateRule::QLearning,
            default_value: 0.0,
            seed: None,
        }
    }
}

impl Default for TdAgentConfig<decay::Constant> {
    fn default() -> Self {
        Self::with_exploration(EpsilonGreedy::new(decay::Constant::new(0.1)))
    }
}

/// A tabular agent learning with Q-learning or SARSA under an epsilon-greedy policy
///
/// The value table persists across episodes and is updated in place after every step. Under
/// [`UpdateRule::Sarsa`] the action picked for the next state inside [`update`](Self::update)
/// is committed: the following [`get_action`](Self::get_action) for that state returns it
/// unchanged, so the action used in the update is always the action executed next.
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
///     - State and action types must be [`Hashable`] to key the table
/// - `D` - The epsilon schedule
pub struct TdAgent<E, D = decay::Constant>
where
    E: Environment + DiscreteActionSpace,
    E::State: Hashable,
    E::Action: Hashable,
    D: Decay,
{
    table: QTable<E::State, E::Action>,
    exploration: EpsilonGreedy<D>,
    alpha: f32,
    gamma: f32,
    rule: UpdateRule,
    rng: StdRng,
    committed: Option<(E::State, E::Action)>,
    episode: u32,
}

impl<E, D> TdAgent<E, D>
where
    E: Environment + DiscreteActionSpace,
    E::State: Hashable,
    E::Action: Hashable,
    D: Decay,
{
    /// Initialize a new agent with an empty table
    ///
    /// Fails if `alpha` is not in `(0, 1]`, `gamma` is not in `[0, 1]`, or epsilon does not
    /// start in `[0, 1]`.
    pub fn new(config: TdAgentConfig<D>) -> Result<Self> {
        let table = QTable::new(config.default_value);
        Self::with_table(config, table)
    }

    /// Initialize an agent that continues learning from an existing table
    ///
    /// The table's own default value is kept; `config.default_value` is ignored.
    pub fn with_table(
        config: TdAgentConfig<D>,
        table: QTable<E::State, E::Action>,
    ) -> Result<Self> {
        let TdAgentConfig {
            exploration,
            alpha,
            gamma,
            rule,
            seed,
            ..
        } = config;

        ensure_interval!(alpha, 0.0, 1.0);
        if alpha == 0.0 {
            return Err(Error::InvalidParameter {
                name: "alpha",
                value: 0.0,
                min: 0.0,
                max: 1.0,
            });
        }
        ensure_interval!(gamma, 0.0, 1.0);
        exploration.validate()?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            table,
            exploration,
            alpha,
            gamma,
            rule,
            rng,
            committed: None,
            episode: 0,
        })
    }

    pub fn table(&self) -> &QTable<E::State, E::Action> {
        &self.table
    }

    pub fn into_table(self) -> QTable<E::State, E::Action> {
        self.table
    }

    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    /// Number of episodes completed through [`go`](Self::go)
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Choose an action among the legal `actions` of `state`
    ///
    /// Returns the committed SARSA action if one is pending for `state`, otherwise follows the
    /// epsilon-greedy policy. Greedy ties go to the action listed first. Returns `None` if
    /// `actions` is empty.
    pub fn get_action(&mut self, state: E::State, actions: &[E::Action]) -> Option<E::Action> {
        if let Some((committed_state, action)) = self.committed.take() {
            if committed_state == state && actions.contains(&action) {
                return Some(action);
            }
            debug!("Dropping action {action:?} committed for {committed_state:?}, now at {state:?}");
        }
        self.select(state, actions)
    }

    fn select(&mut self, state: E::State, actions: &[E::Action]) -> Option<E::Action> {
        match self.exploration.choose(self.episode, &mut self.rng) {
            Choice::Explore => actions.choose(&mut self.rng).copied(),
            Choice::Exploit => self.table.best_action(state, actions),
        }
    }

    /// Learn from a given experience and update the table
    ///
    /// `next_actions` are the legal actions of the next state. Under SARSA the action chosen
    /// for the next state is returned and committed for the next [`get_action`](Self::get_action).
    /// A terminal experience bootstraps from zero, as does a next state without legal actions.
    pub fn update(&mut self, exp: Exp<E>, next_actions: &[E::Action]) -> Option<E::Action> {
        let Exp {
            state,
            action,
            next_state,
            reward,
        } = exp;

        let (bootstrap, committed) = match next_state {
            None => (0.0, None),
            Some(next) if next_actions.is_empty() => {
                warn!("No legal actions from non-terminal state {next:?}; bootstrapping from 0");
                (0.0, None)
            }
            Some(next) => match self.rule {
                UpdateRule::QLearning => (self.table.max(next, next_actions).unwrap_or(0.0), None),
                UpdateRule::Sarsa => match self.select(next, next_actions) {
                    Some(a) => (self.table.get(next, a), Some((next, a))),
                    None => (0.0, None),
                },
            },
        };

        self.table
            .update(state, action, reward + self.gamma * bootstrap, self.alpha);
        self.committed = committed;
        committed.map(|(_, a)| a)
    }

    /// Run the agent in the given environment for one episode
    ///
    /// Episodes end only when the environment becomes inactive.
    pub fn go(&mut self, env: &mut E) -> Result<Episode<E::State>> {
        let mut state = env.reset();
        self.committed = None;
        let mut episode = Episode::new(state);

        while env.is_active() {
            let action = self
                .get_action(state, &env.actions())
                .ok_or_else(|| Error::NoLegalAction {
                    state: format!("{state:?}"),
                })?;
            let outcome = env.step(action)?;
            let next = outcome.state;
            episode.push(next, outcome.reward);

            let exp = Exp::from_outcome(state, action, outcome);
            self.update(exp, &env.actions());
            state = next;
        }

        debug!(
            "Episode {} finished in {} steps with return {}",
            self.episode,
            episode.steps(),
            episode.total_reward
        );
        self.episode += 1;
        Ok(episode)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{
        env::tests::MockEnv,
        gym::{MazeConfig, MazeEnv},
        topology::{Action, Maze},
    };

    fn config(epsilon: f32, rule: UpdateRule, seed: u64) -> TdAgentConfig<decay::Constant> {
        TdAgentConfig {
            exploration: EpsilonGreedy::new(decay::Constant::new(epsilon)),
            alpha: 0.5,
            gamma: 0.9,
            rule,
            default_value: 0.0,
            seed: Some(seed),
        }
    }

    fn open_maze() -> MazeEnv {
        MazeEnv::new(Maze::open(15).unwrap(), MazeConfig::default()).unwrap()
    }

    fn exp(state: usize, action: Action, next_state: Option<usize>, reward: f32) -> Exp<MazeEnv> {
        Exp {
            state,
            action,
            next_state,
            reward,
        }
    }

    #[test]
    fn config_is_validated() {
        let ok = TdAgent::<MazeEnv>::new(TdAgentConfig::default());
        assert!(ok.is_ok());

        let zero_alpha = TdAgentConfig {
            alpha: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            TdAgent::<MazeEnv>::new(zero_alpha),
            Err(Error::InvalidParameter { name: "alpha", .. })
        ));

        let big_gamma = TdAgentConfig {
            gamma: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            TdAgent::<MazeEnv>::new(big_gamma),
            Err(Error::InvalidParameter { name: "gamma", .. })
        ));

        let big_epsilon = config(1.5, UpdateRule::QLearning, 0);
        assert!(TdAgent::<MazeEnv>::new(big_epsilon).is_err());
    }

    #[test]
    fn greedy_first_action_on_empty_table() {
        let mut env = open_maze();
        let mut agent = TdAgent::<MazeEnv>::new(config(0.0, UpdateRule::QLearning, 0)).unwrap();

        let start = env.reset();
        let actions = env.actions();
        assert_eq!(actions, [Action::Down, Action::Right]);
        assert_eq!(
            agent.get_action(start, &actions),
            Some(Action::Down),
            "All values tie, so the first legal action wins"
        );
    }

    #[test]
    fn explore_samples_legal_actions() {
        let mut agent = TdAgent::<MazeEnv>::new(config(1.0, UpdateRule::QLearning, 5)).unwrap();
        let actions = [Action::Up, Action::Left];
        let seen = (0..100)
            .map(|_| agent.get_action(112, &actions).unwrap())
            .collect::<HashSet<_>>();
        assert_eq!(seen, HashSet::from(actions));
        assert_eq!(agent.get_action(112, &[]), None);
    }

    #[test]
    fn q_learning_update() {
        let mut agent = TdAgent::<MazeEnv>::new(config(0.0, UpdateRule::QLearning, 0)).unwrap();
        agent.table.set(1, Action::Down, 2.0);
        agent.table.set(1, Action::Left, 1.0);

        let next = [Action::Down, Action::Left, Action::Right];
        let committed = agent.update(exp(0, Action::Right, Some(1), -0.25), &next);
        assert_eq!(committed, None, "Q-learning commits to nothing");

        let expected = 0.5 * (-0.25 + 0.9 * 2.0);
        assert!((agent.table().get(0, Action::Right) - expected).abs() < 1e-6);
    }

    #[test]
    fn q_learning_max_skips_illegal_actions() {
        let mut agent = TdAgent::<MazeEnv>::new(TdAgentConfig {
            alpha: 1.0,
            gamma: 1.0,
            ..config(0.0, UpdateRule::QLearning, 0)
        })
        .unwrap();
        agent.table.set(1, Action::Up, 100.0);
        agent.table.set(1, Action::Down, 1.0);

        agent.update(exp(0, Action::Right, Some(1), 0.0), &[Action::Down]);
        assert_eq!(
            agent.table().get(0, Action::Right),
            1.0,
            "Up is not legal at the next state"
        );
    }

    #[test]
    fn only_sarsa_follows_executed_action() {
        let legal = [Action::Down, Action::Left];
        for rule in [UpdateRule::QLearning, UpdateRule::Sarsa] {
            let mut executed = HashSet::new();
            for (epsilon, seed) in [0.0, 1.0].into_iter().flat_map(|e| (0..20).map(move |s| (e, s))) {
                let mut agent = TdAgent::<MazeEnv>::new(config(epsilon, rule, seed)).unwrap();
                agent.table.set(1, Action::Down, 2.0);
                agent.table.set(1, Action::Left, -3.0);

                agent.update(exp(0, Action::Right, Some(1), 0.0), &legal);
                let next = agent.get_action(1, &legal).unwrap();
                executed.insert(next);

                let value = agent.table().get(0, Action::Right);
                let expected = match rule {
                    UpdateRule::QLearning => 0.5 * 0.9 * 2.0,
                    UpdateRule::Sarsa => 0.5 * 0.9 * agent.table().get(1, next),
                };
                assert!(
                    (value - expected).abs() < 1e-6,
                    "{rule:?} after executing {next:?}: {value} != {expected}"
                );
            }
            assert_eq!(executed.len(), 2, "{rule:?}: both next actions were executed");
        }
    }

    #[test]
    fn decaying_exploration_agent() {
        let schedule = decay::Exponential::new(5e-3, 0.5, 0.01).unwrap();
        let mut agent = TdAgent::<MockEnv, decay::Exponential>::new(TdAgentConfig {
            alpha: 0.5,
            seed: Some(2),
            ..TdAgentConfig::with_exploration(EpsilonGreedy::new(schedule))
        })
        .unwrap();
        assert_eq!(agent.rule(), UpdateRule::QLearning);

        let mut env = MockEnv::new(3);
        let episode = agent.go(&mut env).unwrap();
        assert_eq!(episode.path.last(), Some(&2));

        let too_greedy = decay::Exponential::new(5e-3, 1.5, 0.01).unwrap();
        assert!(TdAgent::<MockEnv, decay::Exponential>::new(TdAgentConfig::with_exploration(
            EpsilonGreedy::new(too_greedy)
        ))
        .is_err());
    }

    #[test]
    fn sarsa_depends_on_next_action() {
        let values = (0..20)
            .map(|seed| {
                let mut agent =
                    TdAgent::<MazeEnv>::new(config(1.0, UpdateRule::Sarsa, seed)).unwrap();
                agent.table.set(1, Action::Down, 2.0);
                agent.table.set(1, Action::Left, -3.0);
                let next = agent
                    .update(exp(0, Action::Right, Some(1), 0.0), &[Action::Down, Action::Left])
                    .unwrap();
                let expected = 0.5 * 0.9 * agent.table().get(1, next);
                assert!((agent.table().get(0, Action::Right) - expected).abs() < 1e-6);
                agent.table().get(0, Action::Right).to_bits()
            })
            .collect::<HashSet<_>>();
        assert_eq!(values.len(), 2, "Both next actions were sampled");
    }

    #[test]
    fn sarsa_executes_committed_action() {
        let mut env = open_maze();
        let mut agent = TdAgent::<MazeEnv>::new(config(1.0, UpdateRule::Sarsa, 9)).unwrap();

        let mut state = env.reset();
        let mut committed = None;
        for _ in 0..50 {
            let action = agent.get_action(state, &env.actions()).unwrap();
            if let Some(expected) = committed {
                assert_eq!(action, expected, "Executed action is the one used in the update");
            }
            let outcome = env.step(action).unwrap();
            let next = outcome.state;
            if outcome.is_terminal() {
                break;
            }
            committed = agent.update(Exp::from_outcome(state, action, outcome), &env.actions());
            assert!(committed.is_some());
            state = next;
        }
    }

    #[test]
    fn stale_commitment_is_dropped() {
        let mut agent = TdAgent::<MazeEnv>::new(config(0.0, UpdateRule::Sarsa, 0)).unwrap();
        let committed = agent
            .update(exp(0, Action::Right, Some(1), 0.0), &[Action::Left])
            .unwrap();
        assert_eq!(committed, Action::Left);

        // Asked about another state, the agent chooses afresh
        assert_eq!(agent.get_action(2, &[Action::Down]), Some(Action::Down));
        // And the commitment is gone for the original state too
        assert_eq!(
            agent.get_action(1, &[Action::Down, Action::Left]),
            Some(Action::Down)
        );
    }

    #[test]
    fn terminal_and_dead_end_bootstrap_zero() {
        for rule in [UpdateRule::QLearning, UpdateRule::Sarsa] {
            let mut agent = TdAgent::<MazeEnv>::new(config(0.0, rule, 0)).unwrap();
            agent.table.set(165, Action::Up, 100.0);

            assert_eq!(agent.update(exp(150, Action::Down, None, 10.0), &[Action::Up]), None);
            assert_eq!(agent.table().get(150, Action::Down), 5.0);

            assert_eq!(agent.update(exp(3, Action::Down, Some(4), 1.0), &[]), None);
            assert_eq!(agent.table().get(3, Action::Down), 0.5);
        }
    }

    #[test]
    fn go_reaches_goal() {
        for rule in [UpdateRule::QLearning, UpdateRule::Sarsa] {
            let mut env = MockEnv::new(4);
            let mut agent = TdAgent::<MockEnv>::new(config(0.1, rule, 3)).unwrap();

            for i in 0..5 {
                let episode = agent.go(&mut env).unwrap();
                assert_eq!(episode.path.first(), Some(&0));
                assert_eq!(episode.path.last(), Some(&3));
                assert_eq!(episode.steps(), env.taken.len());
                assert_eq!(agent.episode(), i + 1);
            }
            assert!(agent.table().get(2, Action::Right) > 0.0, "Goal value propagated");
        }
    }
}
