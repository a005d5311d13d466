//! Definition database.
//!
//! Definitions are loaded once from a JSON asset and never change afterwards,
//! apart from the selectability flag the play-settings toggle pushes to the host.

use crate::config::{Configuration, ConfigurationAsset};
use crate::error::AssetError;
use crate::graphic::GraphicData;
use canopy_core::DefId;
use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Runtime class of the objects a definition spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThingClass {
    Pawn,
    Plant,
    /// Building that writes a constructed roof over its footprint.
    RoofSetter,
    Other,
}

/// Broad category used by occupancy matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThingCategory {
    Pawn,
    Item,
    Plant,
    Building,
    Other,
}

/// A definition as written in the asset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThingDefAsset {
    pub name: String,
    pub thing_class: ThingClass,
    pub category: ThingCategory,
    pub graphic_data: GraphicData,
    #[serde(default = "default_selectable")]
    pub selectable: bool,
    #[serde(default)]
    pub transparency: Option<ConfigurationAsset>,
}

fn default_selectable() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct DefFile {
    defs: Vec<ThingDefAsset>,
}

/// A loaded definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ThingDef {
    pub id: DefId,
    pub name: String,
    pub thing_class: ThingClass,
    pub category: ThingCategory,
    pub graphic_data: GraphicData,
    pub selectable: bool,
    pub transparency: Option<Configuration>,
}

impl ThingDef {
    /// Configuration, only if it asks for pawn- or item-triggered transparency.
    pub fn transparency_request(&self) -> Option<&Configuration> {
        self.transparency
            .as_ref()
            .filter(|config| config.requests_transparency())
    }
}

/// All loaded definitions, addressable by [`DefId`] or name.
#[derive(Debug, Default)]
pub struct DefDatabase {
    defs: Vec<ThingDef>,
    by_name: HashMap<String, DefId>,
}

impl DefDatabase {
    /// Load definitions from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Load definitions from a JSON document of the form `{ "defs": [...] }`.
    pub fn from_json_str(text: &str) -> Result<Self, AssetError> {
        let file: DefFile = serde_json::from_str(text)?;
        Self::from_assets(file.defs)
    }

    /// Build the database, resolving ignored-definition names to ids.
    pub fn from_assets(assets: Vec<ThingDefAsset>) -> Result<Self, AssetError> {
        let mut by_name = HashMap::with_capacity(assets.len());
        for (index, asset) in assets.iter().enumerate() {
            if by_name.insert(asset.name.clone(), DefId(index as u32)).is_some() {
                return Err(AssetError::DuplicateDef {
                    name: asset.name.clone(),
                });
            }
        }

        let mut defs = Vec::with_capacity(assets.len());
        for (index, asset) in assets.into_iter().enumerate() {
            let transparency = match asset.transparency {
                Some(config) => Some(resolve_configuration(&asset.name, config, &by_name)?),
                None => None,
            };
            defs.push(ThingDef {
                id: DefId(index as u32),
                name: asset.name,
                thing_class: asset.thing_class,
                category: asset.category,
                graphic_data: asset.graphic_data,
                selectable: asset.selectable,
                transparency,
            });
        }

        tracing::debug!(count = defs.len(), "loaded thing definitions");
        Ok(Self { defs, by_name })
    }

    pub fn get(&self, id: DefId) -> Option<&ThingDef> {
        self.defs.get(id.0 as usize)
    }

    pub fn id_of(&self, name: &str) -> Option<DefId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&ThingDef> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThingDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Whether any plant definition requests transparency.
    pub fn has_transparent_trees(&self) -> bool {
        self.defs
            .iter()
            .any(|def| def.thing_class == ThingClass::Plant && def.transparency_request().is_some())
    }

    /// Roof-setter definitions that request transparency.
    pub fn transparent_roofs(&self) -> Vec<DefId> {
        self.defs
            .iter()
            .filter(|def| {
                def.thing_class == ThingClass::RoofSetter && def.transparency_request().is_some()
            })
            .map(|def| def.id)
            .collect()
    }

    pub fn has_transparent_roofs(&self) -> bool {
        !self.transparent_roofs().is_empty()
    }
}

fn resolve_configuration(
    def: &str,
    asset: ConfigurationAsset,
    by_name: &HashMap<String, DefId>,
) -> Result<Configuration, AssetError> {
    check_area(def, "firstArea", asset.first_area)?;
    check_area(def, "secondArea", asset.second_area)?;

    let ignored_things = asset.ignored_things.map(|names| {
        names
            .iter()
            .filter_map(|name| {
                let id = by_name.get(name).copied();
                if id.is_none() {
                    tracing::warn!(def, ignored = %name, "unknown definition in ignoredThings");
                }
                id
            })
            .collect::<HashSet<_>>()
    });

    Ok(Configuration {
        pawn_triggers: asset.transparent_when_pawn_is_inside_area,
        item_triggers: asset.transparent_when_item_is_inside_area,
        first_area: asset.first_area,
        first_area_offset: asset.first_area_offset,
        second_area: asset.second_area,
        second_area_offset: asset.second_area_offset,
        ignored_things,
    })
}

fn check_area(def: &str, field: &'static str, area: IVec2) -> Result<(), AssetError> {
    if area.x < 0 || area.y < 0 {
        return Err(AssetError::NegativeArea {
            def: def.to_string(),
            field,
            x: area.x,
            z: area.y,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DEFS: &str = r#"{
        "defs": [
            {
                "name": "TreeOak",
                "thingClass": "Plant",
                "category": "Plant",
                "graphicData": { "texPath": "Things/Plant/TreeOak", "shaderType": "CutoutPlant" },
                "transparency": {
                    "transparentWhenPawnIsInsideArea": true,
                    "firstArea": [1, 2],
                    "ignoredThings": ["WoodLog", "Unobtainium"]
                }
            },
            {
                "name": "TinRoof",
                "thingClass": "RoofSetter",
                "category": "Building",
                "graphicData": { "texPath": "Roof/Tin" },
                "transparency": { "transparentWhenItemIsInsideArea": true, "firstArea": [3, 3] }
            },
            {
                "name": "DecorRoof",
                "thingClass": "RoofSetter",
                "category": "Building",
                "graphicData": { "texPath": "Roof/Decor" },
                "transparency": { "firstArea": [3, 3] }
            },
            {
                "name": "WoodLog",
                "thingClass": "Other",
                "category": "Item",
                "graphicData": { "texPath": "Things/Item/WoodLog" }
            }
        ]
    }"#;

    #[test]
    fn loads_and_resolves_ignored_names() {
        let db = DefDatabase::from_json_str(DEFS).unwrap();
        assert_eq!(db.len(), 4);
        let oak = db.by_name("TreeOak").unwrap();
        let config = oak.transparency.as_ref().unwrap();
        let wood = db.id_of("WoodLog").unwrap();
        assert!(config.ignores(wood));
        assert_eq!(config.ignored_things.as_ref().unwrap().len(), 1);
        assert!(db.by_name("WoodLog").unwrap().selectable);
    }

    #[test]
    fn startup_summary() {
        let db = DefDatabase::from_json_str(DEFS).unwrap();
        assert!(db.has_transparent_trees());
        assert_eq!(db.transparent_roofs(), vec![db.id_of("TinRoof").unwrap()]);
        assert!(db.by_name("DecorRoof").unwrap().transparency_request().is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let text = r#"{ "defs": [
            { "name": "A", "thingClass": "Other", "category": "Item", "graphicData": { "texPath": "a" } },
            { "name": "A", "thingClass": "Other", "category": "Item", "graphicData": { "texPath": "a" } }
        ] }"#;
        let err = DefDatabase::from_json_str(text).unwrap_err();
        assert!(matches!(err, AssetError::DuplicateDef { name } if name == "A"));
    }

    #[test]
    fn negative_area_is_rejected() {
        let text = r#"{ "defs": [
            { "name": "Bad", "thingClass": "Plant", "category": "Plant", "graphicData": { "texPath": "b" },
              "transparency": { "firstArea": [-1, 2] } }
        ] }"#;
        let err = DefDatabase::from_json_str(text).unwrap_err();
        assert!(matches!(err, AssetError::NegativeArea { field: "firstArea", .. }));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DEFS.as_bytes()).unwrap();
        let db = DefDatabase::from_path(file.path()).unwrap();
        assert!(db.has_transparent_roofs());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = DefDatabase::from_path("/nonexistent/defs.json").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
