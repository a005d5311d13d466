//! Transparency state tracking.
//!
//! The tracker remembers the shader last assigned to each watched object and
//! the set of objects currently rendered transparent. An object is in the
//! transparent set exactly when its watch area holds a qualifying occupant.
//!
//! Entering transparency only needs the one occupant that moved; leaving it
//! requires confirming that no occupant anywhere in the area still qualifies.

use crate::area::AreaCache;
use crate::host::HostWorld;
use crate::occupancy::OccupancyCache;
use canopy_asset::{DefDatabase, Shader, ThingClass};
use canopy_core::ThingId;
use std::collections::{BTreeSet, HashMap};

/// Shader an object of `class` renders with while transparent.
pub fn transparency_shader(class: ThingClass) -> Shader {
    match class {
        ThingClass::Plant => Shader::TransparentPlant,
        _ => Shader::TransparentPostLight,
    }
}

/// What a recheck did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecheckOutcome {
    /// Same object, unspawned, different maps or not watched.
    Skipped,
    Unchanged,
    Entered,
    Exited,
}

#[derive(Debug, Default)]
pub struct TransparencyTracker {
    last_shaders: HashMap<ThingId, Shader>,
    transparent: BTreeSet<ThingId>,
}

impl TransparencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_transparent(&self, id: ThingId) -> bool {
        self.transparent.contains(&id)
    }

    /// Currently transparent objects in ascending id order.
    pub fn transparent(&self) -> impl Iterator<Item = ThingId> + '_ {
        self.transparent.iter().copied()
    }

    pub fn transparent_count(&self) -> usize {
        self.transparent.len()
    }

    pub fn last_shader(&self, id: ThingId) -> Option<Shader> {
        self.last_shaders.get(&id).copied()
    }

    /// Record a transparent assignment.
    pub fn enter(&mut self, id: ThingId, shader: Shader) {
        self.last_shaders.insert(id, shader);
        self.transparent.insert(id);
    }

    /// Record a return to the default shader.
    pub fn exit(&mut self, id: ThingId, shader: Shader) {
        self.last_shaders.insert(id, shader);
        self.transparent.remove(&id);
    }

    /// Forget everything held for `id`.
    pub fn forget(&mut self, id: ThingId) {
        self.last_shaders.remove(&id);
        self.transparent.remove(&id);
    }

    pub fn clear(&mut self) {
        self.last_shaders.clear();
        self.transparent.clear();
    }

    /// Re-evaluate `watched` after `mover` changed position.
    ///
    /// Marks the watched object's cell dirty when its rendering mode flips so
    /// the host re-requests its graphic.
    pub fn recheck<H: HostWorld>(
        &mut self,
        host: &mut H,
        defs: &DefDatabase,
        areas: &mut AreaCache,
        verdicts: &mut OccupancyCache,
        watched: ThingId,
        mover: ThingId,
    ) -> RecheckOutcome {
        if watched == mover {
            return RecheckOutcome::Skipped;
        }
        let (Some(thing), Some(other)) = (host.thing(watched), host.thing(mover)) else {
            return RecheckOutcome::Skipped;
        };
        let map = match (thing.map, other.map) {
            (Some(a), Some(b)) if a == b => a,
            _ => return RecheckOutcome::Skipped,
        };
        let Some(def) = defs.get(thing.def) else {
            return RecheckOutcome::Skipped;
        };
        let Some(configuration) = def.transparency_request() else {
            return RecheckOutcome::Skipped;
        };

        let transparent_shader = transparency_shader(def.thing_class);
        let default_shader = def.graphic_data.shader_type;
        let last = *self.last_shaders.entry(watched).or_insert(default_shader);

        if last != transparent_shader {
            let present = verdicts.matches(defs, mover, other.def, def.id, configuration)
                && areas
                    .get_or_compute(&*host, &thing, configuration)
                    .contains(&other.position);
            if present {
                host.mark_mesh_dirty(map, thing.position);
                self.enter(watched, transparent_shader);
                return RecheckOutcome::Entered;
            }
        } else {
            let area = areas.get_or_compute(&*host, &thing, configuration);
            let occupied = verdicts.any_present(&*host, defs, map, area, def.id, configuration, None);
            if !occupied {
                host.mark_mesh_dirty(map, thing.position);
                self.exit(watched, default_shader);
                return RecheckOutcome::Exited;
            }
        }
        RecheckOutcome::Unchanged
    }

    /// Re-evaluate a transparent `watched` object while `leaving` is about to
    /// be removed from the host. Only the exit path applies.
    pub fn recheck_departure<H: HostWorld>(
        &mut self,
        host: &mut H,
        defs: &DefDatabase,
        areas: &mut AreaCache,
        verdicts: &mut OccupancyCache,
        watched: ThingId,
        leaving: ThingId,
    ) -> RecheckOutcome {
        if watched == leaving || !self.is_transparent(watched) {
            return RecheckOutcome::Skipped;
        }
        let Some(thing) = host.thing(watched) else {
            return RecheckOutcome::Skipped;
        };
        let Some(map) = thing.map else {
            return RecheckOutcome::Skipped;
        };
        let Some(def) = defs.get(thing.def) else {
            return RecheckOutcome::Skipped;
        };
        let Some(configuration) = def.transparency_request() else {
            return RecheckOutcome::Skipped;
        };

        let area = areas.get_or_compute(&*host, &thing, configuration);
        let occupied = verdicts.any_present(&*host, defs, map, area, def.id, configuration, Some(leaving));
        if occupied {
            return RecheckOutcome::Unchanged;
        }
        host.mark_mesh_dirty(map, thing.position);
        self.exit(watched, def.graphic_data.shader_type);
        RecheckOutcome::Exited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plants_and_roofs_use_distinct_shaders() {
        assert_eq!(transparency_shader(ThingClass::Plant), Shader::TransparentPlant);
        assert_eq!(transparency_shader(ThingClass::RoofSetter), Shader::TransparentPostLight);
        assert_ne!(
            transparency_shader(ThingClass::Plant),
            transparency_shader(ThingClass::RoofSetter)
        );
    }

    #[test]
    fn enter_is_idempotent() {
        let mut tracker = TransparencyTracker::new();
        let id = ThingId::new(3, 0);
        tracker.enter(id, Shader::TransparentPostLight);
        tracker.enter(id, Shader::TransparentPostLight);
        assert_eq!(tracker.transparent_count(), 1);
        assert_eq!(tracker.last_shader(id), Some(Shader::TransparentPostLight));
    }

    #[test]
    fn exit_and_forget() {
        let mut tracker = TransparencyTracker::new();
        let id = ThingId::new(3, 0);
        tracker.enter(id, Shader::TransparentPlant);
        tracker.exit(id, Shader::CutoutPlant);
        assert!(!tracker.is_transparent(id));
        assert_eq!(tracker.last_shader(id), Some(Shader::CutoutPlant));
        tracker.forget(id);
        assert_eq!(tracker.last_shader(id), None);
    }
}
