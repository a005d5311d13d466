//! Per-definition transparency configuration.
//!
//! The asset form ([`ConfigurationAsset`]) names ignored definitions; the loaded
//! form ([`Configuration`]) holds them resolved to [`DefId`]s and is immutable
//! for the rest of the session.

use canopy_core::DefId;
use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Transparency configuration as written in the definition asset.
///
/// Areas are `[width, height]`, offsets `[dx, dz]`; a zero second area means
/// only the first zone is watched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigurationAsset {
    pub transparent_when_pawn_is_inside_area: bool,
    pub transparent_when_item_is_inside_area: bool,
    pub first_area: IVec2,
    pub first_area_offset: IVec2,
    pub second_area: IVec2,
    pub second_area_offset: IVec2,
    pub ignored_things: Option<Vec<String>>,
}

/// Loaded transparency configuration, shared by every instance of a definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    pub pawn_triggers: bool,
    pub item_triggers: bool,
    pub first_area: IVec2,
    pub first_area_offset: IVec2,
    pub second_area: IVec2,
    pub second_area_offset: IVec2,
    /// `None` means nothing is excluded.
    pub ignored_things: Option<HashSet<DefId>>,
}

impl Configuration {
    /// Whether any occupant kind can trigger transparency at all.
    pub fn requests_transparency(&self) -> bool {
        self.pawn_triggers || self.item_triggers
    }

    pub fn ignores(&self, def: DefId) -> bool {
        self.ignored_things
            .as_ref()
            .is_some_and(|ignored| ignored.contains(&def))
    }
}
