//! Sensor fuzzification: raw distance readings to membership snapshots.
//!
//! Each of the 5 sensors reports a normalized distance in `[0, 100]`
//! (0 = touching an obstacle, 100 = nothing within range). Every reading is
//! mapped onto 5 overlapping fuzzy distance levels, producing the 25-value
//! snapshot consumed by the controller. Memberships of adjacent levels overlap
//! on purpose: a reading near a level boundary partially activates both sides,
//! which keeps the controller output continuous in the input.

use crate::genome::INPUT_CHANNELS;

/// Number of distance sensors feeding the controller.
pub const SENSOR_COUNT: usize = 5;
/// Number of fuzzy distance levels per sensor.
pub const LEVEL_COUNT: usize = 5;

/// Fuzzy distance levels, ordered from closest to farthest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceLevel {
    VeryNear,
    Near,
    Medium,
    Far,
    VeryFar,
}

impl DistanceLevel {
    pub const ALL: [Self; LEVEL_COUNT] = [
        Self::VeryNear,
        Self::Near,
        Self::Medium,
        Self::Far,
        Self::VeryFar,
    ];
}

/// Membership degree of `distance` in the given fuzzy level.
///
/// `distance` is clamped to `[0, 100]` before evaluation, so the result is
/// always in `[0, 1]` and never NaN. The extreme levels are trapezoids with a
/// plateau at the domain edge; the interior levels are triangles.
#[must_use]
pub fn membership(distance: f32, level: DistanceLevel) -> f32 {
    let d = distance.clamp(0.0, 100.0);
    match level {
        DistanceLevel::VeryNear => trapezoid(d, 0.0, 0.0, 10.0, 20.0),
        DistanceLevel::Near => triangle(d, 15.0, 27.5, 40.0),
        DistanceLevel::Medium => triangle(d, 35.0, 50.0, 65.0),
        DistanceLevel::Far => triangle(d, 60.0, 72.5, 85.0),
        DistanceLevel::VeryFar => trapezoid(d, 80.0, 90.0, 100.0, 100.0),
    }
}

fn triangle(x: f32, a: f32, b: f32, c: f32) -> f32 {
    if x == b {
        return 1.0;
    }
    if x <= a || x >= c {
        return 0.0;
    }
    if x < b { (x - a) / (b - a) } else { (c - x) / (c - b) }
}

fn trapezoid(x: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    // Plateau first: the edge trapezoids are degenerate (a == b or c == d),
    // and the plateau must win at the domain extremes.
    if (b..=c).contains(&x) {
        return 1.0;
    }
    if x <= a || x >= d {
        return 0.0;
    }
    if x < b { (x - a) / (b - a) } else { (d - x) / (d - c) }
}

/// Ordered membership vector over all sensors and levels.
///
/// Layout is sensor-major, level-minor: channel `sensor * LEVEL_COUNT + level`
/// matches the bit layout of the genome's clause masks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzySnapshot([f32; INPUT_CHANNELS]);

impl FuzzySnapshot {
    /// Snapshot with every membership zero (no sensor signal).
    pub const ZERO: Self = Self([0.0; INPUT_CHANNELS]);

    #[must_use]
    pub const fn new(values: [f32; INPUT_CHANNELS]) -> Self {
        Self(values)
    }

    #[must_use]
    pub const fn values(&self) -> &[f32; INPUT_CHANNELS] {
        &self.0
    }

    /// Membership of one (sensor, level) channel.
    #[must_use]
    pub fn channel(&self, sensor: usize, level: DistanceLevel) -> f32 {
        self.0[sensor * LEVEL_COUNT + level as usize]
    }
}

/// Fuzzifies 5 raw sensor readings into the 25-channel snapshot.
#[must_use]
pub fn fuzzify(readings: &[f32; SENSOR_COUNT]) -> FuzzySnapshot {
    let mut values = [0.0; INPUT_CHANNELS];
    for (sensor, &reading) in readings.iter().enumerate() {
        for (offset, level) in DistanceLevel::ALL.iter().enumerate() {
            values[sensor * LEVEL_COUNT + offset] = membership(reading, *level);
        }
    }
    FuzzySnapshot(values)
}
