// src/animation/state.rs

use crate::constants::FULL_TURN_DEG;

/// Lifecycle of an animation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Idle,
    Rendering,
    /// Interactive run past its last frame; ticks only poll for cancellation.
    Paused,
    Finished,
}

/// Frame position and view rotation of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    pub frame: usize,
    pub start: usize,
    pub end: usize,
    pub rotation_deg: f64,
    pub phase: AnimationPhase,
}

impl AnimationState {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            frame: start,
            start,
            end,
            rotation_deg: 0.0,
            phase: AnimationPhase::Idle,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == AnimationPhase::Finished
    }

    pub fn past_end(&self) -> bool {
        self.frame > self.end
    }
}

/// View angle for `frame`: one `step_deg` increment every `every_nth` frames, wrapped to [0, 360).
pub fn rotation_for_frame(frame: usize, every_nth: usize, step_deg: f64) -> f64 {
    let steps = frame / every_nth.max(1);
    (steps as f64 * step_deg).rem_euclid(FULL_TURN_DEG)
}


// src/animation/state.rs
