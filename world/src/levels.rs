//! Compiled-in level catalog.
//!
//! Every level ships as a `const` byte table authored through the nibble
//! codec, so the packing happens at compile time and the blobs live in the
//! binary for the lifetime of the program. [`MapId`] values index the
//! catalog in order, starting from zero.

use tilefall_core::{MapId, Tile};

use crate::maps::MapData;

/// Single hallway with one button, used to teach the controls.
const FIRST_STEPS: [u8; 6] = [
    3,
    1,
    0,
    0,
    Tile::pack_pair(Tile::Solid, Tile::Button(false)),
    Tile::pack_pair(Tile::Solid, Tile::Broken(0)),
];

/// Long corridor alternating cracked panels and buttons.
const BUTTON_ROW: [u8; 7] = [
    5,
    1,
    0,
    0,
    Tile::pack_pair(Tile::Solid, Tile::Broken(1)),
    Tile::pack_pair(Tile::Button(false), Tile::Broken(1)),
    Tile::pack_pair(Tile::Button(false), Tile::Broken(0)),
];

/// Ring of cracked panels around a collapsed centre, buttons on opposite
/// corners.
const CRACKED_RING: [u8; 10] = [
    3,
    3,
    0,
    0,
    Tile::pack_pair(Tile::Solid, Tile::Broken(1)),
    Tile::pack_pair(Tile::Button(false), Tile::Broken(0)),

    Tile::pack_pair(Tile::Broken(1), Tile::Broken(0)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(0)),

    Tile::pack_pair(Tile::Button(false), Tile::Broken(1)),
    Tile::pack_pair(Tile::Solid, Tile::Broken(0)),
];

/// Narrow climb whose midpoint button starts engaged; crossing it twice is
/// part of the route.
const SWITCHBACK_TOWER: [u8; 14] = [
    3,
    5,
    0,
    4,
    Tile::pack_pair(Tile::Button(false), Tile::Broken(1)),
    Tile::pack_pair(Tile::Button(false), Tile::Broken(0)),

    Tile::pack_pair(Tile::Broken(1), Tile::Broken(0)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(0)),

    Tile::pack_pair(Tile::Button(true), Tile::Broken(1)),
    Tile::pack_pair(Tile::Button(false), Tile::Broken(0)),

    Tile::pack_pair(Tile::Broken(2), Tile::Broken(0)),
    Tile::pack_pair(Tile::Broken(0), Tile::Broken(0)),

    Tile::pack_pair(Tile::Button(false), Tile::Broken(0)),
    Tile::pack_pair(Tile::Broken(0), Tile::Broken(0)),
];

/// Wide field of cracked panels dotted with buttons; every panel supports a
/// single crossing.
const PANEL_FIELD: [u8; 32] = [
    7,
    7,
    0,
    0,
    Tile::pack_pair(Tile::Button(false), Tile::Broken(1)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(1)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(1)),
    Tile::pack_pair(Tile::Button(false), Tile::Broken(0)),

    Tile::pack_pair(Tile::Broken(1), Tile::Button(false)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(1)),
    Tile::pack_pair(Tile::Broken(1), Tile::Button(false)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(0)),

    Tile::pack_pair(Tile::Broken(1), Tile::Broken(1)),
    Tile::pack_pair(Tile::Button(false), Tile::Broken(1)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(1)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(0)),

    Tile::pack_pair(Tile::Broken(1), Tile::Broken(1)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(1)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(1)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(0)),

    Tile::pack_pair(Tile::Broken(1), Tile::Broken(1)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(1)),
    Tile::pack_pair(Tile::Button(false), Tile::Broken(1)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(0)),

    Tile::pack_pair(Tile::Broken(1), Tile::Button(false)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(1)),
    Tile::pack_pair(Tile::Broken(1), Tile::Button(false)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(0)),

    Tile::pack_pair(Tile::Button(false), Tile::Broken(1)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(1)),
    Tile::pack_pair(Tile::Broken(1), Tile::Broken(1)),
    Tile::pack_pair(Tile::Button(false), Tile::Broken(0)),
];

static CATALOG: [MapData<'static>; 5] = [
    MapData::new(&FIRST_STEPS),
    MapData::new(&BUTTON_ROW),
    MapData::new(&CRACKED_RING),
    MapData::new(&SWITCHBACK_TOWER),
    MapData::new(&PANEL_FIELD),
];

/// All shipped levels in play order.
#[must_use]
pub fn catalog() -> &'static [MapData<'static>] {
    &CATALOG
}

/// Looks up the catalog entry behind the provided handle.
#[must_use]
pub fn get(map: MapId) -> Option<MapData<'static>> {
    let index = usize::try_from(map.get()).ok()?;
    CATALOG.get(index).copied()
}
