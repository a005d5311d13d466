//! Watched-object registry and per-map reverse index.
//!
//! The registry records which spawned objects take part in transparency and
//! on which map they live. The map index maps each watched cell back to the
//! objects watching it, so a move only rechecks the objects that care about
//! the cells involved. The index of a map is rebuilt in full whenever its set
//! of watched objects changes.

use crate::area::AreaCache;
use crate::host::HostWorld;
use canopy_asset::DefDatabase;
use canopy_core::{Cell, DefId, MapId, ThingId};
use std::collections::HashMap;

/// A spawned object whose definition requests transparency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchedObject {
    pub id: ThingId,
    pub def: DefId,
    pub map: MapId,
}

#[derive(Debug, Default)]
pub struct WatchRegistry {
    by_thing: HashMap<ThingId, WatchedObject>,
    by_map: HashMap<MapId, Vec<WatchedObject>>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `object`. Returns false if it was already listed on its map.
    pub fn register(&mut self, object: WatchedObject) -> bool {
        self.by_thing.insert(object.id, object);
        let list = self.by_map.entry(object.map).or_default();
        if list.iter().any(|existing| existing.id == object.id) {
            return false;
        }
        list.push(object);
        true
    }

    /// Drop the extension association of `id`; returns the entry it had.
    pub fn unregister(&mut self, id: ThingId) -> Option<WatchedObject> {
        self.by_thing.remove(&id)
    }

    /// Remove `id` from the watched list of `map`. Returns true if the list changed.
    pub fn remove_from_map(&mut self, map: MapId, id: ThingId) -> bool {
        let Some(list) = self.by_map.get_mut(&map) else {
            return false;
        };
        let before = list.len();
        list.retain(|object| object.id != id);
        list.len() != before
    }

    pub fn contains(&self, id: ThingId) -> bool {
        self.by_thing.contains_key(&id)
    }

    /// Watched objects of `map`, `None` if nothing was ever registered there.
    pub fn on_map(&self, map: MapId) -> Option<&[WatchedObject]> {
        self.by_map.get(&map).map(|list| list.as_slice())
    }

    pub fn len(&self) -> usize {
        self.by_thing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_thing.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_thing.clear();
        self.by_map.clear();
    }
}

/// Reverse index from cell to the objects watching it, per map.
#[derive(Debug, Default)]
pub struct MapIndex {
    maps: HashMap<MapId, HashMap<Cell, Vec<ThingId>>>,
}

impl MapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the index of `map` from its registered watched objects.
    ///
    /// Maps that never had a watched object get no table. Objects the host no
    /// longer knows, or whose definition stopped requesting transparency, are
    /// left out.
    pub fn rebuild<H: HostWorld>(
        &mut self,
        map: MapId,
        registry: &WatchRegistry,
        areas: &mut AreaCache,
        host: &H,
        defs: &DefDatabase,
    ) {
        let Some(watched) = registry.on_map(map) else {
            return;
        };
        let table = self.maps.entry(map).or_default();
        table.clear();

        for object in watched {
            let Some(view) = host.thing(object.id) else {
                tracing::debug!(thing = object.id.to_bits(), "watched object missing from host");
                continue;
            };
            let Some(configuration) = defs.get(object.def).and_then(|def| def.transparency_request())
            else {
                continue;
            };
            for &cell in areas.get_or_compute(host, &view, configuration) {
                table.entry(cell).or_default().push(object.id);
            }
        }

        tracing::debug!(map = map.0, objects = watched.len(), cells = table.len(), "rebuilt transparency index");
    }

    /// Watched objects whose area includes `cell`.
    pub fn lookup(&self, map: MapId, cell: Cell) -> &[ThingId] {
        self.maps
            .get(&map)
            .and_then(|table| table.get(&cell))
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// Number of indexed cells on `map`, `None` if the map has no table.
    pub fn cell_count(&self, map: MapId) -> Option<usize> {
        self.maps.get(&map).map(|table| table.len())
    }

    pub fn clear(&mut self) {
        self.maps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(index: u32, map: u32) -> WatchedObject {
        WatchedObject {
            id: ThingId::new(index, 0),
            def: DefId(0),
            map: MapId(map),
        }
    }

    #[test]
    fn registration_is_deduplicated_per_identity() {
        let mut registry = WatchRegistry::new();
        assert!(registry.register(object(1, 0)));
        assert!(!registry.register(object(1, 0)));
        assert_eq!(registry.on_map(MapId(0)).unwrap().len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn removal_reports_whether_list_changed() {
        let mut registry = WatchRegistry::new();
        registry.register(object(1, 0));
        assert!(!registry.remove_from_map(MapId(0), ThingId::new(2, 0)));
        assert!(!registry.remove_from_map(MapId(5), ThingId::new(1, 0)));
        assert!(registry.remove_from_map(MapId(0), ThingId::new(1, 0)));
        assert_eq!(registry.on_map(MapId(0)), Some(&[][..]));
    }

    #[test]
    fn unregister_returns_association() {
        let mut registry = WatchRegistry::new();
        registry.register(object(4, 2));
        assert_eq!(registry.unregister(ThingId::new(4, 0)).map(|o| o.map), Some(MapId(2)));
        assert!(!registry.contains(ThingId::new(4, 0)));
    }

    #[test]
    fn lookup_on_unknown_map_is_empty() {
        let index = MapIndex::new();
        assert!(index.lookup(MapId(3), Cell::new(0, 0, 0)).is_empty());
        assert_eq!(index.cell_count(MapId(3)), None);
    }
}
