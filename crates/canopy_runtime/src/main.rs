//! Canopy Runtime
//!
//! Boots logging, loads definitions and settings, then drives a scripted
//! session against the in-memory host world.
//!
//! Usage: `canopy [DEFS_JSON] [SETTINGS_JSON]`

use anyhow::{Context, Result};
use canopy_asset::DefDatabase;
use canopy_core::{Cell, MapBounds};
use canopy_services::{settings_category_label, TransparencySettings};
use canopy_transparency::{SimSession, TransparencyEngine};
use tracing_subscriber::EnvFilter;

const BUILTIN_DEFS: &str = include_str!("../assets/defs.json");

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Canopy v{}", canopy_core::VERSION);

    let mut args = std::env::args().skip(1);
    let defs = match args.next() {
        Some(path) => DefDatabase::from_path(&path)
            .with_context(|| format!("loading definitions from {path}"))?,
        None => DefDatabase::from_json_str(BUILTIN_DEFS).context("loading built-in definitions")?,
    };
    let settings = match args.next() {
        Some(path) => TransparencySettings::load(&path)?,
        None => TransparencySettings::default(),
    };
    tracing::info!(category = settings_category_label(&defs), ?settings, "settings loaded");

    let mut session = SimSession::new(TransparencyEngine::new(defs, settings));
    run_demo(&mut session)?;

    for (name, value) in session.engine.counters().snapshot() {
        tracing::info!(counter = name, value, "engine counter");
    }
    Ok(())
}

/// A colonist walks under a roof and past a tree, then a roof is torn down.
fn run_demo(session: &mut SimSession) -> Result<()> {
    let map = session.add_map(MapBounds::new(40, 40));
    let at = |x, z| Cell::new(x, 0, z);

    let roof = session
        .spawn("TinRoof", map, at(10, 10), (3, 3))
        .context("TinRoof definition missing")?;
    let tree = session
        .spawn("TreeOak", map, at(20, 10), (1, 1))
        .context("TreeOak definition missing")?;
    let colonist = session
        .spawn("Colonist", map, at(5, 10), (1, 1))
        .context("Colonist definition missing")?;
    session.spawn("WoodLog", map, at(20, 11), (1, 1));

    for x in 6..=22 {
        session.move_to(colonist, at(x, 10));
        let dirty = session.world.take_dirty();
        if !dirty.is_empty() {
            let roof_graphic = session.render(roof);
            let tree_graphic = session.render(tree);
            tracing::info!(
                x,
                roof = session.engine.is_currently_transparent(roof),
                tree = session.engine.is_currently_transparent(tree),
                roof_shader = ?roof_graphic.map(|g| g.shader),
                tree_shader = ?tree_graphic.map(|g| g.shader),
                "meshes invalidated"
            );
        }
    }

    session.engine.set_roofs_selectable(&mut session.world, false, false);
    session.destroy(roof);
    tracing::info!(
        watched = session.engine.registry().len(),
        transparent = session.engine.tracker().transparent_count(),
        "roof destroyed"
    );
    Ok(())
}
