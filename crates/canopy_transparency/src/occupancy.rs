//! Occupant classification.
//!
//! Whether an object standing in a watch area counts as "present" depends only
//! on its definition and the watching configuration, both immutable for the
//! session, so verdicts are memoized per `(occupant, configuration owner)`.

use crate::host::HostWorld;
use canopy_asset::{Configuration, DefDatabase, ThingCategory, ThingClass, ThingDef};
use canopy_core::{Cell, DefId, MapId, ThingId};
use std::collections::HashMap;

/// Pawns and items are the only objects whose movement is tracked.
pub fn is_occupant(def: &ThingDef) -> bool {
    def.thing_class == ThingClass::Pawn || def.category == ThingCategory::Item
}

/// Does an object of `occupant` definition count as present for `configuration`?
pub fn matches(occupant: &ThingDef, configuration: &Configuration) -> bool {
    let triggers = (occupant.thing_class == ThingClass::Pawn && configuration.pawn_triggers)
        || (occupant.category == ThingCategory::Item && configuration.item_triggers);
    triggers && !configuration.ignores(occupant.id)
}

/// Memoized verdicts keyed by occupant identity and the definition that owns
/// the configuration it was tested against.
#[derive(Debug, Default)]
pub struct OccupancyCache {
    verdicts: HashMap<(ThingId, DefId), bool>,
}

impl OccupancyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached verdict for `occupant` against the configuration of `watcher_def`.
    pub fn matches(
        &mut self,
        defs: &DefDatabase,
        occupant: ThingId,
        occupant_def: DefId,
        watcher_def: DefId,
        configuration: &Configuration,
    ) -> bool {
        *self
            .verdicts
            .entry((occupant, watcher_def))
            .or_insert_with(|| {
                defs.get(occupant_def)
                    .is_some_and(|def| matches(def, configuration))
            })
    }

    /// Whether any object in `cells` on `map` counts as present. `exclude` is
    /// skipped, for an occupant that is still in the host but leaving it.
    #[allow(clippy::too_many_arguments)]
    pub fn any_present<'a, H: HostWorld>(
        &mut self,
        host: &H,
        defs: &DefDatabase,
        map: MapId,
        cells: impl IntoIterator<Item = &'a Cell>,
        watcher_def: DefId,
        configuration: &Configuration,
        exclude: Option<ThingId>,
    ) -> bool {
        cells.into_iter().any(|&cell| {
            host.things_at(map, cell).iter().any(|&occupant| {
                Some(occupant) != exclude
                    && host.thing(occupant).is_some_and(|view| {
                        self.matches(defs, occupant, view.def, watcher_def, configuration)
                    })
            })
        })
    }

    /// Drop every verdict held for `occupant`.
    pub fn purge(&mut self, occupant: ThingId) {
        self.verdicts.retain(|&(id, _), _| id != occupant);
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn clear(&mut self) {
        self.verdicts.clear();
    }
}
