//! Track simulation: grid maps, vehicle kinematics, and ray sensors.
//!
//! This crate provides the simulated world the evolved controllers drive in:
//!
//! - [`TrackMap`] - Grid of wall cells over a pixel-space canvas, loadable from
//!   a JSON [`TrackLayout`].
//! - [`Track`] / [`Checkpoint`] - Ordered checkpoint circuit derived from the
//!   map, plus the lap-completion target.
//! - [`Car`] - Kinematic vehicle with throttle/brake/drag physics and grid
//!   collision; a collision permanently destroys the car.
//! - [`RaySensor`] - Five forward-facing distance rays producing normalized
//!   readings in `[0, 100]` and, via `fuzzdrive-brain`, fuzzy snapshots.
//! - [`TrackWorld`] - Shared read-only bundle (map + track + start pose) from
//!   which fresh cars and sensors are spawned.
//!
//! Everything here is deterministic and synchronous; there is no rendering,
//! input handling, or UI concern in this crate.

pub use self::{car::*, sensor::*, track::*, track_map::*};

mod car;
mod sensor;
mod track;
mod track_map;
