//! In-memory host world.
//!
//! `SimWorld` implements [`HostWorld`] with plain tables and records every
//! effect the engine produces. `SimSession` pairs it with an engine and fires
//! the lifecycle hooks in the order a host simulation does.

use crate::engine::TransparencyEngine;
use crate::host::{HostWorld, Roof, ThingView};
use canopy_asset::Graphic;
use canopy_core::{Cell, CellRect, DefId, MapBounds, MapId, ThingId};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    thing: Option<ThingView>,
    size: (i32, i32),
}

#[derive(Debug, Default)]
pub struct SimWorld {
    slots: Vec<Slot>,
    free: Vec<u32>,
    maps: Vec<MapBounds>,
    grid: HashMap<(MapId, Cell), Vec<ThingId>>,
    roofs: HashMap<(MapId, Cell), Roof>,
    selectable: HashMap<DefId, bool>,
    dirty: Vec<(MapId, Cell)>,
}

/// Footprint of an object of `size` centred on `position`.
fn footprint(position: Cell, size: (i32, i32)) -> CellRect {
    CellRect::new(
        position.x - (size.0 - 1) / 2,
        position.z - (size.1 - 1) / 2,
        size.0,
        size.1,
    )
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_map(&mut self, bounds: MapBounds) -> MapId {
        self.maps.push(bounds);
        MapId(self.maps.len() as u32 - 1)
    }

    /// Put a new object on `map`. Slots of removed objects are reused with a
    /// bumped generation.
    pub fn place(&mut self, def: DefId, map: MapId, position: Cell, size: (i32, i32)) -> ThingId {
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index as usize].generation += 1;
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    thing: None,
                    size,
                });
                self.slots.len() as u32 - 1
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = ThingId::new(index, slot.generation);
        let view = ThingView {
            id,
            def,
            map: Some(map),
            position,
            footprint: footprint(position, size),
        };
        slot.thing = Some(view);
        slot.size = size;
        self.link(&view);
        id
    }

    /// Move an object; returns its previous position.
    pub fn move_to(&mut self, id: ThingId, position: Cell) -> Option<Cell> {
        let mut view = self.thing(id)?;
        let previous = view.position;
        if previous == position {
            return Some(previous);
        }
        let size = self.slots[id.index() as usize].size;
        self.unlink(&view);
        view.position = position;
        view.footprint = footprint(position, size);
        self.link(&view);
        self.slots[id.index() as usize].thing = Some(view);
        Some(previous)
    }

    /// Take an object off its map and free its slot.
    pub fn remove(&mut self, id: ThingId) -> bool {
        let Some(view) = self.thing(id) else {
            return false;
        };
        self.unlink(&view);
        self.slots[id.index() as usize].thing = None;
        self.free.push(id.index());
        true
    }

    pub fn roof(&self, map: MapId, cell: Cell) -> Option<Roof> {
        self.roofs.get(&(map, cell)).copied()
    }

    pub fn is_selectable(&self, def: DefId) -> Option<bool> {
        self.selectable.get(&def).copied()
    }

    /// Mesh-dirty requests recorded so far.
    pub fn dirty(&self) -> &[(MapId, Cell)] {
        &self.dirty
    }

    /// Drain the recorded mesh-dirty requests.
    pub fn take_dirty(&mut self) -> Vec<(MapId, Cell)> {
        std::mem::take(&mut self.dirty)
    }

    fn link(&mut self, view: &ThingView) {
        let Some(map) = view.map else {
            return;
        };
        for cell in view.footprint.cells() {
            self.grid.entry((map, cell)).or_default().push(view.id);
        }
    }

    fn unlink(&mut self, view: &ThingView) {
        let Some(map) = view.map else {
            return;
        };
        for cell in view.footprint.cells() {
            if let Some(list) = self.grid.get_mut(&(map, cell)) {
                list.retain(|&id| id != view.id);
                if list.is_empty() {
                    self.grid.remove(&(map, cell));
                }
            }
        }
    }
}

impl HostWorld for SimWorld {
    fn thing(&self, id: ThingId) -> Option<ThingView> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.thing
    }

    fn things_at(&self, map: MapId, cell: Cell) -> &[ThingId] {
        self.grid
            .get(&(map, cell))
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    fn map_bounds(&self, map: MapId) -> Option<MapBounds> {
        self.maps.get(map.0 as usize).copied()
    }

    fn mark_mesh_dirty(&mut self, map: MapId, cell: Cell) {
        self.dirty.push((map, cell));
    }

    fn set_roof(&mut self, map: MapId, cell: Cell, roof: Option<Roof>) {
        match roof {
            Some(roof) => {
                self.roofs.insert((map, cell), roof);
            }
            None => {
                self.roofs.remove(&(map, cell));
            }
        }
    }

    fn set_def_selectable(&mut self, def: DefId, selectable: bool) {
        self.selectable.insert(def, selectable);
    }
}

/// A host world wired to an engine.
pub struct SimSession {
    pub world: SimWorld,
    pub engine: TransparencyEngine,
}

impl SimSession {
    pub fn new(engine: TransparencyEngine) -> Self {
        let mut session = Self {
            world: SimWorld::new(),
            engine,
        };
        session.engine.init(&mut session.world);
        session
    }

    pub fn add_map(&mut self, bounds: MapBounds) -> MapId {
        self.world.add_map(bounds)
    }

    /// Spawn an object of the named definition. Returns `None` for an unknown name.
    pub fn spawn(&mut self, def: &str, map: MapId, position: Cell, size: (i32, i32)) -> Option<ThingId> {
        self.spawn_with(def, map, position, size, false)
    }

    /// Spawn as part of loading a saved game.
    pub fn respawn_after_load(&mut self, def: &str, map: MapId, position: Cell, size: (i32, i32)) -> Option<ThingId> {
        self.spawn_with(def, map, position, size, true)
    }

    fn spawn_with(
        &mut self,
        def: &str,
        map: MapId,
        position: Cell,
        size: (i32, i32),
        respawning_after_load: bool,
    ) -> Option<ThingId> {
        let def = self.engine.defs().id_of(def)?;
        let id = self.world.place(def, map, position, size);
        self.engine.on_spawn(&mut self.world, id, respawning_after_load);
        self.engine.on_position_changed(&mut self.world, id, None);
        Some(id)
    }

    /// Move an object, firing the position hook only if it actually moved.
    pub fn move_to(&mut self, id: ThingId, position: Cell) {
        if let Some(previous) = self.world.move_to(id, position) {
            if previous != position {
                self.engine.on_position_changed(&mut self.world, id, Some(previous));
            }
        }
    }

    pub fn despawn(&mut self, id: ThingId) {
        self.engine.on_despawn(&mut self.world, id);
        self.world.remove(id);
    }

    pub fn destroy(&mut self, id: ThingId) {
        self.engine.on_destroy(&mut self.world, id);
        self.despawn(id);
    }

    /// Graphic the draw path would use for `id` right now.
    pub fn render(&mut self, id: ThingId) -> Option<Graphic> {
        let view = self.world.thing(id)?;
        let base = Graphic::from_data(&self.engine.defs().get(view.def)?.graphic_data);
        Some(self.engine.resolve_graphic(&self.world, id, base))
    }

    /// A saved game starts loading: the engine forgets everything and the
    /// world is replaced.
    pub fn begin_load(&mut self) {
        self.engine.on_load_start();
        self.world = SimWorld::new();
        self.engine.init(&mut self.world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_is_centred_on_position() {
        assert_eq!(footprint(Cell::new(5, 0, 5), (1, 1)), CellRect::new(5, 5, 1, 1));
        assert_eq!(footprint(Cell::new(5, 0, 5), (3, 3)), CellRect::new(4, 4, 3, 3));
        assert_eq!(footprint(Cell::new(5, 0, 5), (2, 2)), CellRect::new(5, 5, 2, 2));
    }

    #[test]
    fn grid_follows_moves_and_removal() {
        let mut world = SimWorld::new();
        let map = world.add_map(MapBounds::new(10, 10));
        let id = world.place(DefId(0), map, Cell::new(1, 0, 1), (1, 1));
        assert_eq!(world.things_at(map, Cell::new(1, 0, 1)), &[id]);

        assert_eq!(world.move_to(id, Cell::new(2, 0, 2)), Some(Cell::new(1, 0, 1)));
        assert!(world.things_at(map, Cell::new(1, 0, 1)).is_empty());
        assert_eq!(world.things_at(map, Cell::new(2, 0, 2)), &[id]);

        assert!(world.remove(id));
        assert!(world.thing(id).is_none());
        assert!(world.things_at(map, Cell::new(2, 0, 2)).is_empty());
    }

    #[test]
    fn reused_slot_gets_new_generation() {
        let mut world = SimWorld::new();
        let map = world.add_map(MapBounds::new(10, 10));
        let first = world.place(DefId(0), map, Cell::new(1, 0, 1), (1, 1));
        world.remove(first);
        let second = world.place(DefId(0), map, Cell::new(1, 0, 1), (1, 1));
        assert_eq!(first.index(), second.index());
        assert_ne!(first, second);
        assert!(world.thing(first).is_none());
    }
}
