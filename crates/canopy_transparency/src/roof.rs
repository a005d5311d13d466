//! Roof-setter buildings cover their footprint with a constructed roof while
//! they stand.

use crate::host::{HostWorld, Roof, ThingView};

/// Write a constructed roof over every cell of `thing`'s footprint.
pub fn cover_footprint<H: HostWorld>(host: &mut H, thing: &ThingView) {
    set_footprint(host, thing, Some(Roof::Constructed));
}

/// Clear the roof over every cell of `thing`'s footprint.
pub fn clear_footprint<H: HostWorld>(host: &mut H, thing: &ThingView) {
    set_footprint(host, thing, None);
}

fn set_footprint<H: HostWorld>(host: &mut H, thing: &ThingView, roof: Option<Roof>) {
    let Some(map) = thing.map else {
        return;
    };
    for cell in thing.footprint.cells() {
        host.set_roof(map, cell, roof);
    }
}
