//! Top-level engine owning every piece of derived transparency state.
//!
//! The host calls one hook per lifecycle event; each hook runs to completion
//! before the next one fires, so spawn and despawn always finish rebuilding
//! the map index before any recheck or graphic lookup reads it.

use crate::area::AreaCache;
use crate::host::HostWorld;
use crate::index::{MapIndex, WatchRegistry, WatchedObject};
use crate::occupancy::{is_occupant, OccupancyCache};
use crate::roof;
use crate::state::{transparency_shader, RecheckOutcome, TransparencyTracker};
use canopy_asset::{DefDatabase, Graphic, ThingClass};
use canopy_core::{Cell, MapId, ThingId};
use canopy_metrics::Counter;
use canopy_services::TransparencySettings;
use std::collections::HashSet;

/// Transparent objects closer than this many cells to a mover are rechecked
/// even when the index does not link them to the cells involved.
pub const SWEEP_RADIUS: f32 = 20.0;

pub struct TransparencyEngine {
    defs: DefDatabase,
    settings: TransparencySettings,
    registry: WatchRegistry,
    index: MapIndex,
    areas: AreaCache,
    verdicts: OccupancyCache,
    tracker: TransparencyTracker,
    counters: Counter,
}

impl TransparencyEngine {
    pub fn new(defs: DefDatabase, settings: TransparencySettings) -> Self {
        tracing::info!(
            trees = defs.has_transparent_trees(),
            roofs = defs.has_transparent_roofs(),
            "transparency engine created"
        );
        Self {
            defs,
            settings,
            registry: WatchRegistry::new(),
            index: MapIndex::new(),
            areas: AreaCache::new(),
            verdicts: OccupancyCache::new(),
            tracker: TransparencyTracker::new(),
            counters: Counter::new(),
        }
    }

    /// Push the persisted roof selectability to the host.
    pub fn init<H: HostWorld>(&mut self, host: &mut H) {
        self.apply_roof_selectability(host);
    }

    pub fn defs(&self) -> &DefDatabase {
        &self.defs
    }

    pub fn settings(&self) -> &TransparencySettings {
        &self.settings
    }

    /// Replace the settings. Objects already registered stay registered; the
    /// new toggles only gate future spawns and graphic lookups.
    pub fn set_settings(&mut self, settings: TransparencySettings) {
        self.settings = settings;
    }

    pub fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    pub fn index(&self) -> &MapIndex {
        &self.index
    }

    pub fn areas(&self) -> &AreaCache {
        &self.areas
    }

    pub fn tracker(&self) -> &TransparencyTracker {
        &self.tracker
    }

    pub fn counters(&self) -> &Counter {
        &self.counters
    }

    pub fn is_currently_transparent(&self, id: ThingId) -> bool {
        self.tracker.is_transparent(id)
    }

    /// A saved game is about to load: identities from the previous session
    /// must not survive.
    pub fn on_load_start(&mut self) {
        self.registry.clear();
        self.index.clear();
        self.areas.clear();
        self.verdicts.clear();
        self.tracker.clear();
        tracing::debug!("cleared transparency state for game load");
    }

    /// An object finished spawning.
    pub fn on_spawn<H: HostWorld>(&mut self, host: &mut H, id: ThingId, respawning_after_load: bool) {
        let Some(view) = host.thing(id) else {
            return;
        };
        let Some(def) = self.defs.get(view.def) else {
            tracing::debug!(thing = id.to_bits(), "spawned object has unknown definition");
            return;
        };

        if def.thing_class == ThingClass::RoofSetter && !respawning_after_load {
            roof::cover_footprint(host, &view);
        }

        if !self.settings.allows(def.thing_class) || def.transparency_request().is_none() {
            return;
        }
        let Some(map) = view.map else {
            return;
        };

        let object = WatchedObject {
            id,
            def: def.id,
            map,
        };
        if self.registry.register(object) {
            tracing::debug!(thing = id.to_bits(), def = %def.name, map = map.0, "registered watched object");
        }
        self.rebuild(host, map);
    }

    /// An object is about to despawn; it is still present in the host.
    pub fn on_despawn<H: HostWorld>(&mut self, host: &mut H, id: ThingId) {
        self.recheck_after_departure(host, id);

        let watched = self.registry.unregister(id);
        self.areas.remove(id);
        self.verdicts.purge(id);
        self.tracker.forget(id);

        if let Some(object) = watched {
            if self.registry.remove_from_map(object.map, id) {
                tracing::debug!(thing = id.to_bits(), map = object.map.0, "unregistered watched object");
                self.rebuild(host, object.map);
            }
        }
    }

    /// An object is being destroyed; called before the matching despawn.
    pub fn on_destroy<H: HostWorld>(&mut self, host: &mut H, id: ThingId) {
        let Some(view) = host.thing(id) else {
            return;
        };
        let is_roof_setter = self
            .defs
            .get(view.def)
            .is_some_and(|def| def.thing_class == ThingClass::RoofSetter);
        if is_roof_setter {
            roof::clear_footprint(host, &view);
        }
    }

    /// A pawn or item changed position. `from` is `None` when the object was
    /// just placed on the map.
    pub fn on_position_changed<H: HostWorld>(&mut self, host: &mut H, mover: ThingId, from: Option<Cell>) {
        let Some(view) = host.thing(mover) else {
            return;
        };
        let Some(map) = view.map else {
            return;
        };
        if from == Some(view.position) {
            return;
        }
        if !self.defs.get(view.def).is_some_and(is_occupant) {
            return;
        }

        let candidates = self.recheck_candidates(host, map, view.position, from);
        for watched in candidates {
            self.recheck_transparency(host, watched, mover);
        }
    }

    /// A departing occupant may have been the last one keeping nearby objects
    /// transparent. Those objects are rechecked as if it were already gone.
    fn recheck_after_departure<H: HostWorld>(&mut self, host: &mut H, leaving: ThingId) {
        let Some(view) = host.thing(leaving) else {
            return;
        };
        let Some(map) = view.map else {
            return;
        };
        if !self.defs.get(view.def).is_some_and(is_occupant) {
            return;
        }

        for watched in self.recheck_candidates(host, map, view.position, None) {
            self.counters.increment("rechecks", 1);
            let outcome = self.tracker.recheck_departure(
                host,
                &self.defs,
                &mut self.areas,
                &mut self.verdicts,
                watched,
                leaving,
            );
            self.record_outcome(outcome, watched, leaving);
        }
    }

    /// Index entries of the destination and origin cells, then every
    /// transparent object on the same map within [`SWEEP_RADIUS`] of the mover.
    /// Each object appears once.
    fn recheck_candidates<H: HostWorld>(
        &self,
        host: &H,
        map: MapId,
        position: Cell,
        from: Option<Cell>,
    ) -> Vec<ThingId> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        let mut push = |id: ThingId| {
            if seen.insert(id) {
                candidates.push(id);
            }
        };

        self.index.lookup(map, position).iter().copied().for_each(&mut push);
        if let Some(from) = from {
            self.index.lookup(map, from).iter().copied().for_each(&mut push);
        }
        for id in self.tracker.transparent() {
            let nearby = host.thing(id).is_some_and(|thing| {
                thing.map == Some(map) && thing.position.distance_to(position) < SWEEP_RADIUS
            });
            if nearby {
                push(id);
            }
        }
        candidates
    }

    /// Re-evaluate one watched object against one mover.
    pub fn recheck_transparency<H: HostWorld>(
        &mut self,
        host: &mut H,
        watched: ThingId,
        mover: ThingId,
    ) -> RecheckOutcome {
        self.counters.increment("rechecks", 1);
        let outcome = self.tracker.recheck(
            host,
            &self.defs,
            &mut self.areas,
            &mut self.verdicts,
            watched,
            mover,
        );
        self.record_outcome(outcome, watched, mover);
        outcome
    }

    fn record_outcome(&mut self, outcome: RecheckOutcome, watched: ThingId, other: ThingId) {
        match outcome {
            RecheckOutcome::Entered => {
                self.counters.increment("mesh_dirty", 1);
                self.counters.increment("enter_transparent", 1);
                tracing::trace!(thing = watched.to_bits(), other = other.to_bits(), "became transparent");
            }
            RecheckOutcome::Exited => {
                self.counters.increment("mesh_dirty", 1);
                self.counters.increment("exit_transparent", 1);
                tracing::trace!(thing = watched.to_bits(), other = other.to_bits(), "became opaque");
            }
            RecheckOutcome::Skipped | RecheckOutcome::Unchanged => {}
        }
    }

    /// The draw path requests the graphic of `id`; `base` is the graphic it
    /// would use without transparency. This is where substitution happens.
    pub fn resolve_graphic<H: HostWorld>(&mut self, host: &H, id: ThingId, base: Graphic) -> Graphic {
        let Some(view) = host.thing(id) else {
            return base;
        };
        let Some(map) = view.map else {
            return base;
        };
        let Some(def) = self.defs.get(view.def) else {
            return base;
        };
        if !self.settings.allows(def.thing_class) || !self.registry.contains(id) {
            return base;
        }
        let Some(configuration) = def.transparency_request() else {
            return base;
        };

        let area = self.areas.get_or_compute(host, &view, configuration);
        let occupied = self
            .verdicts
            .any_present(host, &self.defs, map, area, def.id, configuration, None);

        if occupied {
            let shader = transparency_shader(def.thing_class);
            self.tracker.enter(id, shader);
            base.transparent_variant(shader, def.graphic_data.draw_size)
        } else {
            self.tracker.exit(id, def.graphic_data.shader_type);
            base
        }
    }

    /// Play-settings toggle for roof selectability. Returns true if the value
    /// changed and was pushed to the host.
    pub fn set_roofs_selectable<H: HostWorld>(&mut self, host: &mut H, selectable: bool, world_view: bool) -> bool {
        if world_view || !self.defs.has_transparent_roofs() {
            return false;
        }
        if self.settings.make_roofs_selectable == selectable {
            return false;
        }
        self.settings.make_roofs_selectable = selectable;
        self.apply_roof_selectability(host);
        true
    }

    fn apply_roof_selectability<H: HostWorld>(&self, host: &mut H) {
        for def in self.defs.transparent_roofs() {
            host.set_def_selectable(def, self.settings.make_roofs_selectable);
        }
    }

    fn rebuild<H: HostWorld>(&mut self, host: &H, map: MapId) {
        self.index
            .rebuild(map, &self.registry, &mut self.areas, host, &self.defs);
        self.counters.increment("index_rebuilds", 1);
    }
}
