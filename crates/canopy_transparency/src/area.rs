//! Watch-area calculation.
//!
//! A watch area is the set of in-bounds cells covered by one or two rectangles
//! anchored at the bottom-left corner of an object's footprint. Footprints do
//! not change while an object is spawned, so areas are computed once per
//! object and kept until it despawns.

use crate::host::{HostWorld, ThingView};
use canopy_asset::Configuration;
use canopy_core::math::is_zero;
use canopy_core::{Cell, CellRect, MapBounds, ThingId};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Cells `configuration` watches for an object occupying `footprint`.
pub fn compute_watch_area(
    footprint: CellRect,
    configuration: &Configuration,
    bounds: MapBounds,
) -> HashSet<Cell> {
    let anchor = footprint.bottom_left();
    let first = CellRect::new(
        anchor.x,
        anchor.z,
        configuration.first_area.x,
        configuration.first_area.y,
    )
    .moved_by(configuration.first_area_offset);

    let mut cells: HashSet<Cell> = first.cells().filter(|&c| bounds.contains(c)).collect();

    if !is_zero(configuration.second_area) {
        let second = CellRect::new(
            anchor.x,
            anchor.z,
            configuration.second_area.x,
            configuration.second_area.y,
        )
        .moved_by(configuration.second_area_offset);
        cells.extend(second.cells().filter(|&c| bounds.contains(c)));
    }

    cells
}

/// Lazily filled per-object watch areas.
#[derive(Debug, Default)]
pub struct AreaCache {
    areas: HashMap<ThingId, HashSet<Cell>>,
    empty: HashSet<Cell>,
}

impl AreaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached area of `thing`, computing it on first access.
    ///
    /// An unspawned object (or one on a map the host no longer knows) watches
    /// nothing; that result is not cached.
    pub fn get_or_compute<H: HostWorld>(
        &mut self,
        host: &H,
        thing: &ThingView,
        configuration: &Configuration,
    ) -> &HashSet<Cell> {
        let Some(bounds) = thing.map.and_then(|map| host.map_bounds(map)) else {
            return &self.empty;
        };
        match self.areas.entry(thing.id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let area = compute_watch_area(thing.footprint, configuration, bounds);
                tracing::trace!(thing = thing.id.to_bits(), cells = area.len(), "computed watch area");
                entry.insert(area)
            }
        }
    }

    pub fn get(&self, id: ThingId) -> Option<&HashSet<Cell>> {
        self.areas.get(&id)
    }

    pub fn remove(&mut self, id: ThingId) -> bool {
        self.areas.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn clear(&mut self) {
        self.areas.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_core::glam::IVec2;

    fn config(first: (i32, i32), first_offset: (i32, i32), second: (i32, i32), second_offset: (i32, i32)) -> Configuration {
        Configuration {
            item_triggers: true,
            first_area: IVec2::new(first.0, first.1),
            first_area_offset: IVec2::new(first_offset.0, first_offset.1),
            second_area: IVec2::new(second.0, second.1),
            second_area_offset: IVec2::new(second_offset.0, second_offset.1),
            ..Default::default()
        }
    }

    fn cells(list: &[(i32, i32)]) -> HashSet<Cell> {
        list.iter().map(|&(x, z)| Cell::new(x, 0, z)).collect()
    }

    #[test]
    fn single_rectangle_anchored_at_footprint() {
        let area = compute_watch_area(
            CellRect::new(5, 5, 1, 1),
            &config((2, 2), (0, 0), (0, 0), (0, 0)),
            MapBounds::new(50, 50),
        );
        assert_eq!(area, cells(&[(5, 5), (6, 5), (5, 6), (6, 6)]));
    }

    #[test]
    fn anchor_is_bottom_left_of_multi_cell_footprint() {
        let area = compute_watch_area(
            CellRect::new(3, 4, 2, 2),
            &config((1, 1), (0, 0), (0, 0), (0, 0)),
            MapBounds::new(50, 50),
        );
        assert_eq!(area, cells(&[(3, 4)]));
    }

    #[test]
    fn offset_shifts_first_rectangle() {
        let area = compute_watch_area(
            CellRect::new(5, 5, 1, 1),
            &config((3, 3), (-1, -1), (0, 0), (0, 0)),
            MapBounds::new(50, 50),
        );
        assert_eq!(area.len(), 9);
        assert!(area.contains(&Cell::new(4, 0, 4)));
        assert!(area.contains(&Cell::new(6, 0, 6)));
        assert!(!area.contains(&Cell::new(7, 0, 5)));
    }

    #[test]
    fn overlapping_rectangles_union_without_duplicates() {
        let area = compute_watch_area(
            CellRect::new(0, 0, 1, 1),
            &config((2, 2), (0, 0), (2, 2), (1, 0)),
            MapBounds::new(50, 50),
        );
        assert_eq!(area, cells(&[(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]));
    }

    #[test]
    fn cells_outside_map_are_dropped() {
        let area = compute_watch_area(
            CellRect::new(0, 9, 1, 1),
            &config((3, 3), (-1, 0), (0, 0), (0, 0)),
            MapBounds::new(10, 10),
        );
        assert_eq!(area, cells(&[(0, 9), (1, 9)]));
    }

    #[test]
    fn area_entirely_off_map_is_empty() {
        let area = compute_watch_area(
            CellRect::new(0, 0, 1, 1),
            &config((2, 2), (-5, -5), (0, 0), (0, 0)),
            MapBounds::new(10, 10),
        );
        assert!(area.is_empty());
    }

    #[test]
    fn zero_first_area_with_second_area() {
        let area = compute_watch_area(
            CellRect::new(4, 4, 1, 1),
            &config((0, 0), (0, 0), (1, 2), (0, 1)),
            MapBounds::new(10, 10),
        );
        assert_eq!(area, cells(&[(4, 5), (4, 6)]));
    }
}
