//! Canopy Transparency Engine
//!
//! Decides, for trees and roofs placed on a grid map, whether each one should
//! render with its transparent shader because a pawn or item is standing in
//! the area it watches. The engine keeps the derived state incremental:
//! - Area calculation and per-object caching
//! - Occupant classification per configuration
//! - Transparent-set tracking and recheck on movement
//! - Per-map reverse index from cell to watching objects
//!
//! The host simulation owns the world and calls the lifecycle hooks on
//! [`TransparencyEngine`]; the engine reads and writes the world only through
//! [`HostWorld`].

pub mod area;
pub mod engine;
pub mod host;
pub mod index;
pub mod occupancy;
pub mod roof;
pub mod sim;
pub mod state;

pub use area::{compute_watch_area, AreaCache};
pub use engine::{TransparencyEngine, SWEEP_RADIUS};
pub use host::{HostWorld, Roof, ThingView};
pub use index::{MapIndex, WatchRegistry, WatchedObject};
pub use occupancy::{is_occupant, matches, OccupancyCache};
pub use sim::{SimSession, SimWorld};
pub use state::{transparency_shader, RecheckOutcome, TransparencyTracker};
