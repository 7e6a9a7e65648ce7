//! `peace_core`: math and per-frame derived state for the PEACE engine.
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | `transform`   | `Transform` with cached, lazily rebuilt model matrix       |
//! | `bounds`      | `Aabb` fitted to transformed vertex positions              |
//! | `frustum`     | Six-plane frustum extracted from a view-projection matrix  |
//! | `ray`         | `Ray`, slab test against boxes, ray/plane intersection     |
//! | `raycaster`   | Screen position → world-space pick ray                     |
//! | `camera`      | Free-fly camera and its keyboard controller                |
//! | `lighting`    | Day/night clock, sun orbit, colour keyframes               |
//! | `input`       | Keyboard / mouse state fed by the platform layer           |
//! | `time`        | Frame clock with optional FPS cap                          |
//!
//! Nothing in this crate touches a GPU.

pub mod bounds;
pub mod camera;
pub mod error;
pub mod frustum;
pub mod lighting;
pub mod ray;
pub mod raycaster;
pub mod time;
pub mod transform;

#[cfg(feature = "input")]
pub mod input;

// ── Public re-exports ────────────────────────────────────────────────────────

pub use bounds::Aabb;
pub use camera::Camera;
#[cfg(feature = "input")]
pub use camera::Controller;
pub use error::{ClockParseError, MathError};
pub use frustum::{Frustum, FrustumPlane};
pub use lighting::{light_space_matrix, lighting_at, parse_clock_time, DayCycle, LightingState};
pub use ray::{intersect_ray_aabb, intersect_ray_plane, Ray};
pub use raycaster::Raycaster;
pub use time::{FrameClock, Time};
pub use transform::Transform;

#[cfg(feature = "input")]
pub use input::{InputState, KeyCode, MouseButton};
