use fuzzdrive_brain::{FuzzyController, Genome};
use fuzzdrive_engine::{Car, RaySensor, Track, TrackWorld};

/// Time budget at spawn, in simulated seconds.
pub const INITIAL_TIME_REMAINING: f32 = 6.0;
/// Time refunded per captured checkpoint.
pub const TIME_BONUS_PER_CHECKPOINT: f32 = 4.0;
/// Hard cap on the accumulated time budget.
pub const MAX_TIME_REMAINING: f32 = 15.0;
/// Fitness weight per captured checkpoint.
pub const FITNESS_PER_CHECKPOINT: f32 = 2000.0;
/// Fitness lost per simulated second of lifetime.
pub const SLOWNESS_PENALTY_FACTOR: f32 = 2.0;
/// Maximum steering rate in degrees per simulated second.
pub const STEERING_RATE_LIMIT: f32 = 180.0;

/// Throttle applied when the controller outputs exactly zero.
///
/// The forward bias keeps the degenerate all-zero-gene brain moving, so "do
/// nothing" is not a locally optimal survival strategy from generation zero.
const THROTTLE_FORWARD_BIAS: f32 = 0.5;

/// One genome driving one simulated vehicle.
///
/// The agent owns its controller, car, and sensor exclusively; nothing is
/// shared with other agents except the read-only world. An agent terminates
/// when its car collides or its time budget runs out, and its fitness is
/// frozen from that point on.
#[derive(Debug, Clone)]
pub struct Agent {
    controller: FuzzyController,
    car: Car,
    sensor: RaySensor,
    fitness: f32,
    laps: u32,
    next_checkpoint: usize,
    checkpoints_passed: u32,
    time_remaining: f32,
    lifetime: f32,
    distance_traveled: f32,
    last_position: (f32, f32),
}

impl Agent {
    #[must_use]
    pub fn new(genome: Genome, world: &TrackWorld) -> Self {
        let car = world.spawn_car();
        let last_position = car.position();
        Self {
            controller: FuzzyController::new(genome),
            car,
            sensor: world.spawn_sensor(),
            fitness: 0.0,
            laps: 0,
            next_checkpoint: 0,
            checkpoints_passed: 0,
            time_remaining: INITIAL_TIME_REMAINING,
            lifetime: 0.0,
            distance_traveled: 0.0,
            last_position,
        }
    }

    /// Advances the agent by one control tick of `dt` simulated seconds.
    ///
    /// Burns the time budget, queries sensors, runs fuzzy inference, applies
    /// the rate-clamped steering and throttle/brake mapping, and integrates
    /// the car. Does nothing once the agent is terminated.
    pub fn control(&mut self, dt: f32) {
        if self.is_destroyed() {
            return;
        }

        self.lifetime += dt;
        self.time_remaining -= dt;
        if self.time_remaining <= 0.0 {
            // Forward progress or death: stalled agents do not linger.
            self.car.destroy();
            return;
        }

        let (x, y) = self.car.position();
        self.sensor.update(x, y, self.car.heading());
        let snapshot = self.sensor.fuzzy_snapshot();

        let desired_steering = self.controller.evaluate_steering(&snapshot);
        let mut desired_throttle = self.controller.evaluate_throttle(&snapshot);

        if desired_throttle == 0.0 {
            desired_throttle = THROTTLE_FORWARD_BIAS;
        }
        if desired_throttle < 0.0 {
            self.car.set_throttle(0.0);
            self.car.set_braking(true);
        } else {
            self.car.set_braking(false);
            self.car.set_throttle(desired_throttle);
        }

        // Hard per-tick clamp, relative to the (possibly scaled) dt.
        let steering_limit = STEERING_RATE_LIMIT * dt;
        self.car
            .apply_steering(desired_steering.clamp(-steering_limit, steering_limit));
        self.car.update(dt);
    }

    /// Updates the fitness accumulator after physical integration.
    ///
    /// Captures the next checkpoint when inside its radius (wrapping advances
    /// the lap counter and refunds time up to [`MAX_TIME_REMAINING`]), tracks
    /// signed travel along the heading, and recomputes
    /// `fitness = checkpoints * weight + max(0, distance) - lifetime * penalty`.
    pub fn update_fitness(&mut self, track: &Track) {
        let checkpoints = track.checkpoints();
        let (x, y) = self.car.position();

        if let Some(next) = checkpoints.get(self.next_checkpoint)
            && next.contains(x, y)
        {
            self.next_checkpoint += 1;
            self.checkpoints_passed += 1;
            self.time_remaining =
                (self.time_remaining + TIME_BONUS_PER_CHECKPOINT).min(MAX_TIME_REMAINING);
            if self.next_checkpoint >= checkpoints.len() {
                self.next_checkpoint = 0;
                self.laps += 1;
            }
        }

        let (dx, dy) = (x - self.last_position.0, y - self.last_position.1);
        let tick_distance = dx.hypot(dy);
        let heading = self.car.heading().to_radians();
        // Signed travel: reversing against the heading loses ground.
        if dx * heading.cos() + dy * heading.sin() > 0.0 {
            self.distance_traveled += tick_distance;
        } else {
            self.distance_traveled -= tick_distance;
        }

        #[expect(clippy::cast_precision_loss)]
        let checkpoint_score = self.checkpoints_passed as f32 * FITNESS_PER_CHECKPOINT;
        self.fitness = checkpoint_score + self.distance_traveled.max(0.0)
            - self.lifetime * SLOWNESS_PENALTY_FACTOR;
        self.last_position = (x, y);
    }

    #[must_use]
    pub const fn fitness(&self) -> f32 {
        self.fitness
    }

    #[must_use]
    pub const fn laps(&self) -> u32 {
        self.laps
    }

    #[must_use]
    pub const fn checkpoints_passed(&self) -> u32 {
        self.checkpoints_passed
    }

    #[must_use]
    pub const fn time_remaining(&self) -> f32 {
        self.time_remaining
    }

    #[must_use]
    pub const fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Net signed distance traveled along the heading, may be negative.
    #[must_use]
    pub const fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.car.is_destroyed()
    }

    #[must_use]
    pub const fn car(&self) -> &Car {
        &self.car
    }

    #[must_use]
    pub const fn genome(&self) -> &Genome {
        self.controller.genome()
    }
}
