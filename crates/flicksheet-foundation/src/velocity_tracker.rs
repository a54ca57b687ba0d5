//! Release-velocity estimation for the pan gesture.
//!
//! Impulse-strategy 1D velocity calculation over a ring buffer of timestamped
//! pointer positions. The impulse strategy derives velocity from the kinetic
//! energy imparted by the touch samples, which is robust against the uneven
//! event spacing real input streams have.

/// Ring buffer size for velocity samples.
const HISTORY_SIZE: usize = 20;

/// Only samples within the last 100ms participate in the estimate.
const HORIZON_MS: i64 = 100;

/// A gap of this long between samples means the pointer stopped moving.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy, Default)]
struct Sample {
    time_ms: i64,
    position: f32,
}

/// 1D velocity tracker over absolute pointer positions.
///
/// Feed it every vertical pointer position during a pan; ask for the velocity
/// at release. Stale samples age out automatically.
#[derive(Clone)]
pub struct VelocityTracker {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
        }
    }

    /// Records the pointer position at `time_ms`.
    pub fn add_sample(&mut self, time_ms: i64, position: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, position });
    }

    /// The estimated velocity in units/second.
    ///
    /// Returns 0.0 with fewer than two usable samples or when the pointer
    /// held still long enough to be considered stopped.
    pub fn velocity(&self) -> f32 {
        let mut positions = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let mut count = 0;

        let newest = match self.samples[self.index] {
            Some(sample) => sample,
            None => return 0.0,
        };

        let mut current_index = self.index;
        let mut previous = newest;

        while let Some(sample) = self.samples[current_index] {
            let age = (newest.time_ms - sample.time_ms) as f32;
            let gap = (sample.time_ms - previous.time_ms).abs() as f32;
            previous = sample;

            if age > HORIZON_MS as f32 || gap > ASSUME_STOPPED_MS as f32 {
                break;
            }

            positions[count] = sample.position;
            times[count] = -age;

            current_index = if current_index == 0 {
                HISTORY_SIZE - 1
            } else {
                current_index - 1
            };

            count += 1;
            if count >= HISTORY_SIZE {
                break;
            }
        }

        if count < 2 {
            return 0.0;
        }

        impulse_velocity(&positions, &times, count) * 1000.0
    }

    /// The estimated velocity clamped to `[-max, max]`.
    ///
    /// Returns 0.0 for a non-finite or non-positive `max`.
    pub fn velocity_capped(&self, max: f32) -> f32 {
        if !max.is_finite() || max <= 0.0 {
            return 0.0;
        }

        let velocity = self.velocity();
        if velocity == 0.0 || velocity.is_nan() {
            return 0.0;
        }

        velocity.clamp(-max, max)
    }

    /// Drops all recorded samples.
    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.index = 0;
    }
}

/// Impulse-strategy velocity in units/millisecond.
fn impulse_velocity(positions: &[f32; HISTORY_SIZE], times: &[f32; HISTORY_SIZE], count: usize) -> f32 {
    if count < 2 {
        return 0.0;
    }

    let mut work = 0.0f32;
    let oldest = count - 1;
    let mut next_time = times[oldest];

    for i in (1..=oldest).rev() {
        let current_time = next_time;
        next_time = times[i - 1];
        if current_time == next_time {
            continue;
        }

        let delta = positions[i] - positions[i - 1];
        let v_curr = delta / (current_time - next_time);
        let v_prev = kinetic_energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == oldest {
            work *= 0.5;
        }
    }

    kinetic_energy_to_velocity(work)
}

/// E = 0.5 * m * v^2 with m = 1, inverted.
#[inline]
fn kinetic_energy_to_velocity(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}
