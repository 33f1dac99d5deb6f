//! # Scripted Input
//!
//! The headless demo has no keyboard or mouse. Instead it replays a list of steps, each
//! holding one kind of input for a number of frames. Once the script runs out, every further
//! frame is idle.

use fastrand::Rng;
use serde::Deserialize;

use crate::engine_state::PlayerAction;

/// Input held for the duration of one step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptAction {
    /// No input
    Idle,
    /// Hold movement keys
    Move {
        /// Move along the view direction
        #[serde(default)]
        forward: bool,
        /// Move against the view direction
        #[serde(default)]
        backward: bool,
        /// Strafe left
        #[serde(default)]
        left: bool,
        /// Strafe right
        #[serde(default)]
        right: bool,
        /// Fly up
        #[serde(default)]
        up: bool,
        /// Fly down
        #[serde(default)]
        down: bool,
    },
    /// Turn the view by the same delta every frame
    Look {
        /// Horizontal delta per frame
        delta_x: f64,
        /// Vertical delta per frame
        delta_y: f64,
    },
    /// Random lateral movement and turning, reproducible from `seed`
    Wander {
        /// Seed of the random sequence
        seed: u64,
    },
}

/// One entry of an input script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptStep {
    /// Number of frames the action is held
    pub frames: u32,
    /// The input held
    pub action: ScriptAction,
}

impl ScriptStep {
    /// Creates a step.
    pub fn new(frames: u32, action: ScriptAction) -> Self {
        ScriptStep { frames, action }
    }
}

/// Expands a list of [`ScriptStep`]s into one [`PlayerAction`] per frame.
pub struct InputScript {
    steps: Vec<ScriptStep>,
    step_index: usize,
    frame_in_step: u32,
    /// Random source of the current wander step
    rng: Option<Rng>,
}

impl InputScript {
    /// Creates a script positioned at its first frame.
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        InputScript {
            steps,
            step_index: 0,
            frame_in_step: 0,
            rng: None,
        }
    }

    /// Whether every step has been played.
    pub fn is_finished(&self) -> bool {
        self.skip_empty_steps_from(self.step_index) >= self.steps.len()
    }

    /// The input for the next frame.
    pub fn next_action(&mut self) -> PlayerAction {
        if self.frame_in_step == 0 {
            self.step_index = self.skip_empty_steps_from(self.step_index);
        }
        let Some(step) = self.steps.get(self.step_index) else {
            return PlayerAction::default();
        };

        let action = match &step.action {
            ScriptAction::Idle => PlayerAction::default(),
            ScriptAction::Move {
                forward,
                backward,
                left,
                right,
                up,
                down,
            } => PlayerAction {
                move_forward: *forward,
                move_backward: *backward,
                move_left: *left,
                move_right: *right,
                move_up: *up,
                move_down: *down,
                rotate_view: None,
            },
            ScriptAction::Look { delta_x, delta_y } => PlayerAction {
                rotate_view: Some((*delta_x, *delta_y)),
                ..PlayerAction::default()
            },
            ScriptAction::Wander { seed } => {
                let seed = *seed;
                let rng = self.rng.get_or_insert_with(|| Rng::with_seed(seed));
                wander(rng)
            }
        };

        self.frame_in_step += 1;
        if self.frame_in_step >= step.frames {
            self.step_index += 1;
            self.frame_in_step = 0;
            self.rng = None;
        }

        action
    }

    fn skip_empty_steps_from(&self, mut index: usize) -> usize {
        while index < self.steps.len() && self.steps[index].frames == 0 {
            index += 1;
        }
        index
    }
}

impl Iterator for InputScript {
    type Item = PlayerAction;

    fn next(&mut self) -> Option<PlayerAction> {
        Some(self.next_action())
    }
}

fn wander(rng: &mut Rng) -> PlayerAction {
    let mut action = PlayerAction::default();
    match rng.usize(0..4) {
        0 => action.move_forward = true,
        1 => action.move_backward = true,
        2 => action.move_left = true,
        _ => action.move_right = true,
    }
    if rng.usize(0..4) == 0 {
        action.rotate_view = Some((rng.f64() * 20.0 - 10.0, 0.0));
    }
    action
}
