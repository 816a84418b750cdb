use std::sync::Arc;

use crate::track_map::{StartPose, TrackMap};

const ACCELERATION: f32 = 200.0;
const BRAKING_FORCE: f32 = 300.0;
const MAX_FORWARD_SPEED: f32 = 300.0;
const MAX_REVERSE_SPEED: f32 = -100.0;
const DRAG: f32 = 40.0;

/// Default body size in pixels.
const CAR_WIDTH: f32 = 20.0;
const CAR_HEIGHT: f32 = 10.0;

/// Kinematic vehicle with throttle/brake/drag physics and grid collision.
///
/// The car integrates speed along its heading each update; moving into a wall
/// cell destroys it permanently. A destroyed car ignores all control inputs
/// and never moves again. All lengths are in pixels, speeds in pixels/second,
/// and the heading in degrees (0 toward +x, 90 toward +y).
#[derive(Debug, Clone)]
pub struct Car {
    map: Arc<TrackMap>,
    x: f32,
    y: f32,
    heading: f32,
    speed: f32,
    throttle: f32,
    braking: bool,
    destroyed: bool,
}

impl Car {
    #[must_use]
    pub fn new(map: Arc<TrackMap>, pose: StartPose) -> Self {
        Self {
            map,
            x: pose.x,
            y: pose.y,
            heading: pose.heading,
            speed: 0.0,
            throttle: 0.0,
            braking: false,
            destroyed: false,
        }
    }

    #[must_use]
    pub const fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Heading in degrees; not normalized to any range.
    #[must_use]
    pub const fn heading(&self) -> f32 {
        self.heading
    }

    #[must_use]
    pub const fn current_speed(&self) -> f32 {
        self.speed
    }

    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Sets the throttle input, clamped to `[-1, 1]`. Ignored when destroyed.
    pub fn set_throttle(&mut self, throttle: f32) {
        if !self.destroyed {
            self.throttle = throttle.clamp(-1.0, 1.0);
        }
    }

    pub fn set_braking(&mut self, braking: bool) {
        if !self.destroyed {
            self.braking = braking;
        }
    }

    /// Turns the car by `delta_degrees`. Rate limiting is the caller's job.
    pub fn apply_steering(&mut self, delta_degrees: f32) {
        if !self.destroyed {
            self.heading += delta_degrees;
        }
    }

    /// Permanently destroys the car and zeroes its motion state.
    pub fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.speed = 0.0;
            self.throttle = 0.0;
            self.braking = true;
        }
    }

    /// Integrates one step of `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 || self.destroyed {
            return;
        }

        self.speed = (self.speed + self.acceleration() * dt)
            .clamp(MAX_REVERSE_SPEED, MAX_FORWARD_SPEED);

        let heading = self.heading.to_radians();
        let new_x = self.x + self.speed * heading.cos() * dt;
        let new_y = self.y + self.speed * heading.sin() * dt;
        if self.collides(new_x, new_y) {
            self.destroy();
        } else {
            self.x = new_x;
            self.y = new_y;
        }
    }

    fn acceleration(&self) -> f32 {
        let mut accel = self.throttle * ACCELERATION;
        if self.braking {
            if self.speed > 0.0 {
                accel -= BRAKING_FORCE;
            } else if self.speed < 0.0 {
                accel += BRAKING_FORCE;
            }
        }
        if self.speed > 0.0 {
            accel -= DRAG;
        } else if self.speed < 0.0 {
            accel += DRAG;
        }
        accel
    }

    /// Axis-aligned bounding box test against the wall grid.
    fn collides(&self, x: f32, y: f32) -> bool {
        let corners = [
            (x, y),
            (x + CAR_WIDTH, y),
            (x, y + CAR_HEIGHT),
            (x + CAR_WIDTH, y + CAR_HEIGHT),
        ];
        corners.iter().any(|&(cx, cy)| self.map.is_wall_at(cx, cy))
    }
}
