//! Graphic and shader descriptors.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// Shaders the host render path knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shader {
    Cutout,
    CutoutComplex,
    CutoutPlant,
    Transparent,
    /// Transparency variant used by plants.
    TransparentPlant,
    /// Transparency variant used by every other watched object (roofs).
    TransparentPostLight,
}

/// Graphic class; preserved when a transparent variant is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GraphicKind {
    #[default]
    Single,
    Random,
    Multi,
}

/// Static graphic data attached to a definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicData {
    pub tex_path: String,
    #[serde(default = "default_shader")]
    pub shader_type: Shader,
    #[serde(default = "default_draw_size")]
    pub draw_size: Vec2,
    #[serde(default)]
    pub graphic_class: GraphicKind,
}

fn default_shader() -> Shader {
    Shader::Cutout
}

fn default_draw_size() -> Vec2 {
    Vec2::ONE
}

/// A resolved graphic as handed to the draw path.
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    pub kind: GraphicKind,
    pub path: String,
    pub shader: Shader,
    pub draw_size: Vec2,
    pub color: Vec4,
    pub color_two: Vec4,
}

impl Graphic {
    /// Default graphic for a definition's graphic data.
    pub fn from_data(data: &GraphicData) -> Self {
        Self {
            kind: data.graphic_class,
            path: data.tex_path.clone(),
            shader: data.shader_type,
            draw_size: data.draw_size,
            color: Vec4::ONE,
            color_two: Vec4::ONE,
        }
    }

    /// Transparent variant: same class and colors, the definition's draw size,
    /// texture looked up under the `Transparent/` asset folder.
    pub fn transparent_variant(&self, shader: Shader, draw_size: Vec2) -> Self {
        Self {
            kind: self.kind,
            path: transparent_path(&self.path),
            shader,
            draw_size,
            color: self.color,
            color_two: self.color_two,
        }
    }
}

/// Asset path of the transparent texture for `path`.
pub fn transparent_path(path: &str) -> String {
    format!("Transparent/{path}")
}
