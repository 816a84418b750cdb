use std::sync::Arc;

use fuzzdrive_brain::{FuzzySnapshot, SENSOR_COUNT, fuzzify};

use crate::track_map::TrackMap;

/// Relative ray angles in degrees, fanned across the car's heading.
pub const SENSOR_ANGLES: [f32; SENSOR_COUNT] = [-45.0, -22.5, 0.0, 22.5, 45.0];

/// Long-range vision: how far a ray reaches, in pixels.
pub const MAX_SENSOR_RANGE: f32 = 300.0;

/// Five-ray distance sensor marching through the wall grid.
///
/// Readings are normalized to `[0, 100]`: 0 means an obstacle at the origin,
/// 100 means nothing within [`MAX_SENSOR_RANGE`]. The sensor holds the last
/// readings until the next [`update`](Self::update) from the vehicle pose.
#[derive(Debug, Clone)]
pub struct RaySensor {
    map: Arc<TrackMap>,
    readings: [f32; SENSOR_COUNT],
}

impl RaySensor {
    #[must_use]
    pub fn new(map: Arc<TrackMap>) -> Self {
        Self {
            map,
            readings: [100.0; SENSOR_COUNT],
        }
    }

    /// Re-casts all rays from the given pixel position and heading.
    pub fn update(&mut self, x: f32, y: f32, heading: f32) {
        for (reading, angle) in self.readings.iter_mut().zip(SENSOR_ANGLES) {
            *reading = cast_ray(&self.map, x, y, heading + angle);
        }
    }

    /// Latest normalized readings, one per ray in [`SENSOR_ANGLES`] order.
    #[must_use]
    pub const fn readings(&self) -> &[f32; SENSOR_COUNT] {
        &self.readings
    }

    /// 25-channel membership snapshot of the latest readings.
    #[must_use]
    pub fn fuzzy_snapshot(&self) -> FuzzySnapshot {
        fuzzify(&self.readings)
    }
}

/// Marches a ray in half-cell steps until it leaves the road or runs out of
/// range, returning the normalized hit distance.
fn cast_ray(map: &TrackMap, x: f32, y: f32, angle: f32) -> f32 {
    let (dir_x, dir_y) = (angle.to_radians().cos(), angle.to_radians().sin());
    let step = map.cell_width().min(map.cell_height()) / 2.0;

    let mut distance = 0.0;
    while distance < MAX_SENSOR_RANGE {
        distance += step;
        let (test_x, test_y) = (x + dir_x * distance, y + dir_y * distance);
        if map.is_wall_at(test_x, test_y) {
            return distance / MAX_SENSOR_RANGE * 100.0;
        }
    }
    100.0
}
