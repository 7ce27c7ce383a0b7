use crate::topology::Action;

/// Penalty for repeating a turn direction or running straight through a junction
pub const TURN_PENALTY: f32 = -0.1;

/// Straight-run length from which continuing straight through a junction is penalized
pub const LONG_RUN: u32 = 4;

/// Direction of a turn relative to the previous heading
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    /// Signed heading difference that produces this turn
    pub const fn value(self) -> i32 {
        match self {
            Turn::Left => 1,
            Turn::Right => -1,
        }
    }

    fn from_diff(diff: i32) -> Option<Self> {
        match diff {
            1 => Some(Turn::Left),
            -1 => Some(Turn::Right),
            _ => None,
        }
    }
}

/// Reward shaping applied on top of the goal and revisit rewards of a maze step
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Shaping {
    /// No shaping: only the goal and revisit rewards apply
    #[default]
    Base,
    /// Penalize zig-zagging and long straight runs through junctions
    TurnAware(TurnTracker),
}

impl Shaping {
    pub fn turn_aware() -> Self {
        Shaping::TurnAware(TurnTracker::default())
    }

    /// Forget everything observed during the previous episode
    pub fn reset(&mut self) {
        if let Shaping::TurnAware(tracker) = self {
            *tracker = TurnTracker::default();
        }
    }

    /// Shaped reward for taking `action` from a cell with `legal_here` legal moves
    ///
    /// The goal and revisit rewards are applied afterwards by the environment and replace
    /// whatever this returns.
    pub fn shape(&mut self, action: Action, legal_here: usize) -> f32 {
        match self {
            Shaping::Base => 0.0,
            Shaping::TurnAware(tracker) => tracker.observe(action, legal_here),
        }
    }
}

/// Heading history used by [`Shaping::TurnAware`]
///
/// Headings are compared on the clockwise compass of [`Action::heading`]; the difference
/// `heading(last) - heading(action)` is `0` going straight, `-1` for a right turn and `1` for a
/// left turn. Any other difference (a reversal, or a turn across the `Up`/`Right` seam of the
/// compass) resets the straight run without touching the remembered turn.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnTracker {
    last_action: Action,
    last_turn: Option<Turn>,
    current_run: u32,
}

impl Default for TurnTracker {
    fn default() -> Self {
        Self {
            last_action: Action::Right,
            last_turn: None,
            current_run: 0,
        }
    }
}

impl TurnTracker {
    pub fn last_action(&self) -> Action {
        self.last_action
    }

    pub fn last_turn(&self) -> Option<Turn> {
        self.last_turn
    }

    pub fn current_run(&self) -> u32 {
        self.current_run
    }

    /// Record `action` and return the shaped reward for it
    pub fn observe(&mut self, action: Action, legal_here: usize) -> f32 {
        let mut reward = 0.0;
        let diff = self.last_action.heading() - action.heading();

        match self.last_turn {
            Some(turn) if diff == turn.value() => {
                reward = TURN_PENALTY;
                self.current_run = 0;
            }
            _ if diff == 0 => self.current_run += 1,
            _ => self.current_run = 0,
        }

        self.last_turn = match self.last_turn {
            Some(turn) => Turn::from_diff(diff).or(Some(turn)),
            None => match action {
                Action::Down => Some(Turn::Right),
                Action::Up => Some(Turn::Left),
                _ => None,
            },
        };

        if self.current_run >= LONG_RUN && legal_here > 1 && action == self.last_action {
            reward = TURN_PENALTY;
        }

        self.last_action = action;
        reward
    }
}
