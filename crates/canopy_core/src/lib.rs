//! Canopy Core
//!
//! Shared primitives for the transparency engine and its hosts:
//! - Grid cells, rectangles and map bounds
//! - Generational object handles and map/definition identifiers
//! - Integer math (re-exported glam)

pub mod grid;
pub mod handle;
pub mod math;

pub use glam;
pub use grid::{Cell, CellRect, MapBounds};
pub use handle::{DefId, MapId, ThingId};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
