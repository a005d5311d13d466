//! Canopy Asset Pipeline
//!
//! Static definition data loaded once at startup: thing definitions, their
//! transparency configuration and the graphic/shader descriptors the render
//! path substitutes.

pub mod config;
pub mod defs;
pub mod error;
pub mod graphic;

pub use config::{Configuration, ConfigurationAsset};
pub use defs::{DefDatabase, ThingCategory, ThingClass, ThingDef, ThingDefAsset};
pub use error::AssetError;
pub use graphic::{Graphic, GraphicData, GraphicKind, Shader};
