//! Boundary between the engine and the host world simulation.

use canopy_core::{Cell, CellRect, DefId, MapBounds, MapId, ThingId};

/// Snapshot of a host object, as much as the engine needs to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThingView {
    pub id: ThingId,
    pub def: DefId,
    /// `None` while the object is not spawned.
    pub map: Option<MapId>,
    pub position: Cell,
    /// Cells the object occupies on its map.
    pub footprint: CellRect,
}

/// Roof kinds the engine writes to the host roof grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Roof {
    Constructed,
}

/// Services the host simulation exposes to the engine.
///
/// Hooks never run concurrently, so implementations need no interior locking.
pub trait HostWorld {
    /// Look up a live object.
    fn thing(&self, id: ThingId) -> Option<ThingView>;

    /// Objects currently registered at `cell` on `map`.
    fn things_at(&self, map: MapId, cell: Cell) -> &[ThingId];

    fn map_bounds(&self, map: MapId) -> Option<MapBounds>;

    /// Ask the host to regenerate the thing meshes covering `cell`.
    fn mark_mesh_dirty(&mut self, map: MapId, cell: Cell);

    fn set_roof(&mut self, map: MapId, cell: Cell, roof: Option<Roof>);

    /// Toggle whether objects of `def` can be selected by the player.
    fn set_def_selectable(&mut self, def: DefId, selectable: bool);
}
