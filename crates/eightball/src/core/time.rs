/// Fixed timestep accumulator.
/// Turns variable frame deltas into a whole number of simulation ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    /// Default catch-up cap per frame.
    pub const MAX_STEPS: u32 = 10;

    pub fn new(dt: f32) -> Self {
        Self::with_max_steps(dt, Self::MAX_STEPS)
    }

    pub fn with_max_steps(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: max_steps.max(1),
        }
    }

    /// Add frame time. Returns how many fixed ticks to run now.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        // Capped so a stalled tab does not replay seconds of play.
        self.accumulator = (self.accumulator + frame_dt.max(0.0)).min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Countdown before a fired shot is checked for rest, followed by an
/// accelerated checking window that lasts until the table settles.
#[derive(Debug, Clone, PartialEq)]
pub struct SettleTimer {
    remaining: f32,
}

/// Where a settle wait currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleStatus {
    /// Still inside the post-shot delay.
    Waiting,
    /// Delay elapsed; check for rest every tick.
    Checking,
}

impl SettleTimer {
    pub fn new(delay: f32) -> Self {
        Self { remaining: delay }
    }

    /// Advance by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> SettleStatus {
        if self.remaining > 0.0 {
            self.remaining -= dt;
        }
        self.status()
    }

    pub fn status(&self) -> SettleStatus {
        if self.remaining > 0.0 {
            SettleStatus::Waiting
        } else {
            SettleStatus::Checking
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }
}
