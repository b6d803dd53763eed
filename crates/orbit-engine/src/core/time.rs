/// Upper bound on fixed steps per frame, so a long stall does not spiral.
const MAX_STEPS_PER_FRAME: u32 = 10;

/// Fixed timestep accumulator.
/// Keeps the simulation ticking at a consistent rate regardless of frame time.
pub struct FixedTimestep {
    /// The fixed delta time per tick, in seconds.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator = (self.accumulator + frame_dt).min(self.dt * MAX_STEPS_PER_FRAME as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Simulation clock in milliseconds.
///
/// `timestamp` advances by the scaled tick length after every physics step.
/// `last_timestamp` remembers the timestamp the gravity pass last consumed,
/// so the force of each pass scales with the time that really elapsed.
#[derive(Debug, Clone)]
pub struct SimClock {
    timestamp: f64,
    last_timestamp: f64,
    time_scale: f32,
}

impl SimClock {
    pub fn new(time_scale: f32) -> Self {
        Self {
            timestamp: 0.0,
            last_timestamp: 0.0,
            time_scale,
        }
    }

    /// Current simulation timestamp in milliseconds.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Milliseconds elapsed since the previous call. Marks the current
    /// timestamp as processed. The very first call returns 0.
    pub fn take_elapsed(&mut self) -> f32 {
        let elapsed = self.timestamp - self.last_timestamp;
        self.last_timestamp = self.timestamp;
        elapsed as f32
    }

    /// Advance by one tick of `dt` real seconds, scaled by the time scale.
    pub fn advance(&mut self, dt: f32) {
        self.timestamp += dt as f64 * 1000.0 * self.time_scale as f64;
    }
}
