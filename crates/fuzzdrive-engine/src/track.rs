use std::{collections::HashSet, sync::Arc};

use crate::{
    car::Car,
    sensor::RaySensor,
    track_map::{StartPose, TrackMap},
};

/// Spacing between consecutive checkpoint probes, in pixels.
const CHECKPOINT_SPACING: f32 = 100.0;
/// Upper bound on generated checkpoints per circuit.
const MAX_CHECKPOINTS: usize = 60;
/// How far the centerline probe searches for walls on each side.
const CENTER_PROBE_RANGE: f32 = 200.0;

/// Circular capture region on the track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkpoint {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl Checkpoint {
    /// Whether the pixel-space point lies inside the capture radius.
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let (dx, dy) = (x - self.x, y - self.y);
        dx.hypot(dy) < self.radius
    }
}

/// Ordered checkpoint circuit plus the lap-completion target.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    checkpoints: Vec<Checkpoint>,
    laps_to_win: u32,
}

impl Track {
    #[must_use]
    pub const fn new(checkpoints: Vec<Checkpoint>, laps_to_win: u32) -> Self {
        Self {
            checkpoints,
            laps_to_win,
        }
    }

    #[must_use]
    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    #[must_use]
    pub const fn laps_to_win(&self) -> u32 {
        self.laps_to_win
    }

    /// Walks the map forward from the start pose and drops checkpoints along
    /// the track centerline.
    ///
    /// Each step probes [`CHECKPOINT_SPACING`] ahead; when the probe lands in
    /// a wall, nearby headings are scanned for an open path (so the walk
    /// follows curves). Candidate points snap to the centerline between the
    /// side walls, take half the local track width as capture radius, and are
    /// deduplicated by coarse grid region. The walk stops when it returns
    /// near the start, finds no open path, or reaches [`MAX_CHECKPOINTS`].
    #[must_use]
    pub fn generate(map: &TrackMap, start: StartPose, laps_to_win: u32) -> Self {
        let mut checkpoints = Vec::new();
        let mut visited_regions = HashSet::new();

        let center = find_track_center(map, start.x, start.y, start.heading);
        let (mut x, mut y) = (center.x, center.y);
        let mut heading = start.heading;

        for i in 0..MAX_CHECKPOINTS {
            let mut next_x = x + heading.to_radians().cos() * CHECKPOINT_SPACING;
            let mut next_y = y + heading.to_radians().sin() * CHECKPOINT_SPACING;

            if map.is_wall_at(next_x, next_y) {
                // Probe fan of headings for an open path around the curve.
                let mut found = false;
                let mut offset = -90.0_f32;
                while offset <= 90.0 {
                    let test_heading = heading + offset;
                    let test_x =
                        x + test_heading.to_radians().cos() * CHECKPOINT_SPACING * 0.6;
                    let test_y =
                        y + test_heading.to_radians().sin() * CHECKPOINT_SPACING * 0.6;
                    if !map.is_wall_at(test_x, test_y) {
                        next_x = test_x;
                        next_y = test_y;
                        heading = test_heading;
                        found = true;
                        break;
                    }
                    offset += 10.0;
                }
                if !found {
                    break;
                }
            }

            // Once past the first few probes, stop when the walk closes the loop.
            if i > 4 {
                let dist_to_start = (next_x - start.x).hypot(next_y - start.y);
                if dist_to_start < CHECKPOINT_SPACING * 0.8 {
                    break;
                }
            }

            let center = find_track_center(map, next_x, next_y, heading);
            #[expect(clippy::cast_possible_truncation)]
            let region = (
                (center.x / (map.cell_width() * 3.0)) as i32,
                (center.y / (map.cell_height() * 3.0)) as i32,
            );
            if visited_regions.insert(region) {
                checkpoints.push(Checkpoint {
                    x: center.x,
                    y: center.y,
                    radius: center.track_width / 2.0,
                });
                x = center.x;
                y = center.y;
            } else {
                x = next_x;
                y = next_y;
            }
        }

        Self::new(checkpoints, laps_to_win)
    }
}

struct CenterPoint {
    x: f32,
    y: f32,
    track_width: f32,
}

/// Snaps a point to the centerline by probing wall distance perpendicular to
/// the travel heading on both sides.
fn find_track_center(map: &TrackMap, x: f32, y: f32, heading: f32) -> CenterPoint {
    let perp = (heading + 90.0).to_radians();
    let (dir_x, dir_y) = (perp.cos(), perp.sin());
    let left = wall_distance(map, x, y, dir_x, dir_y, CENTER_PROBE_RANGE);
    let right = wall_distance(map, x, y, -dir_x, -dir_y, CENTER_PROBE_RANGE);
    CenterPoint {
        x: x + dir_x * (left - right) / 2.0,
        y: y + dir_y * (left - right) / 2.0,
        track_width: left + right,
    }
}

fn wall_distance(map: &TrackMap, x: f32, y: f32, dir_x: f32, dir_y: f32, max: f32) -> f32 {
    let step = map.cell_width().min(map.cell_height()) / 2.0;
    let mut distance = 0.0;
    while distance < max {
        distance += step;
        if map.is_wall_at(x + dir_x * distance, y + dir_y * distance) {
            return distance - step;
        }
    }
    max
}

/// Shared read-only world: map, checkpoint circuit, and spawn pose.
///
/// Every agent in a population borrows the same world; fresh cars and sensors
/// are spawned from it so no mutable state is ever aliased between agents.
#[derive(Debug, Clone)]
pub struct TrackWorld {
    map: Arc<TrackMap>,
    track: Track,
    start: StartPose,
}

impl TrackWorld {
    #[must_use]
    pub const fn new(map: Arc<TrackMap>, track: Track, start: StartPose) -> Self {
        Self { map, track, start }
    }

    #[must_use]
    pub const fn map(&self) -> &Arc<TrackMap> {
        &self.map
    }

    #[must_use]
    pub const fn track(&self) -> &Track {
        &self.track
    }

    #[must_use]
    pub const fn start(&self) -> StartPose {
        self.start
    }

    /// Fresh car at the start pose.
    #[must_use]
    pub fn spawn_car(&self) -> Car {
        Car::new(Arc::clone(&self.map), self.start)
    }

    /// Fresh sensor over the shared map.
    #[must_use]
    pub fn spawn_sensor(&self) -> RaySensor {
        RaySensor::new(Arc::clone(&self.map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_contains_is_strict_radius() {
        let cp = Checkpoint {
            x: 100.0,
            y: 100.0,
            radius: 50.0,
        };
        assert!(cp.contains(120.0, 100.0));
        assert!(cp.contains(100.0, 149.0));
        assert!(!cp.contains(100.0, 151.0));
    }

    #[test]
    fn ring_circuit_generates_a_loop_of_checkpoints() {
        let map = TrackMap::ring_circuit();
        let start = StartPose {
            x: 140.0,
            y: 360.0,
            heading: 270.0,
        };
        let track = Track::generate(&map, start, 3);

        assert!(
            track.checkpoints().len() >= 8,
            "only {} checkpoints",
            track.checkpoints().len()
        );
        for cp in track.checkpoints() {
            assert!(!map.is_wall_at(cp.x, cp.y), "checkpoint in wall: {cp:?}");
            assert!(cp.radius > 0.0);
        }
    }

    #[test]
    fn open_arena_walk_terminates() {
        let map = TrackMap::open_arena(30, 30);
        let start = StartPose {
            x: 150.0,
            y: 150.0,
            heading: 0.0,
        };
        let track = Track::generate(&map, start, 1);
        assert!(track.checkpoints().len() <= MAX_CHECKPOINTS);
    }
}
