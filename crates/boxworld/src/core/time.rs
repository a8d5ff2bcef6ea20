use log::warn;

/// Fixed timestep accumulator, in milliseconds.
/// Turns the host's variable frame time into whole simulation steps.
pub struct FixedTimestep {
    step_ms: f32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Most steps a single frame may run before the backlog is dropped.
    pub const MAX_STEPS: u32 = 10;

    pub fn new(step_ms: f32) -> Self {
        Self {
            step_ms,
            accumulator: 0.0,
        }
    }

    /// Add frame time. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_ms: f32) -> u32 {
        if !(self.step_ms > 0.0) {
            return 0;
        }
        self.accumulator += frame_ms.max(0.0);
        let steps = (self.accumulator / self.step_ms) as u32;
        if steps > Self::MAX_STEPS {
            warn!(
                "frame of {frame_ms:.1}ms exceeds {} steps; dropping backlog",
                Self::MAX_STEPS
            );
            self.accumulator = 0.0;
            return Self::MAX_STEPS;
        }
        self.accumulator = (self.accumulator - steps as f32 * self.step_ms).max(0.0);
        steps
    }

    /// Progress towards the next step (0.0 to 1.0), for render interpolation.
    pub fn alpha(&self) -> f32 {
        if self.step_ms > 0.0 {
            self.accumulator / self.step_ms
        } else {
            0.0
        }
    }

    pub fn step_ms(&self) -> f32 {
        self.step_ms
    }
}
