#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tilefall engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. The crate also owns the [`Tile`] vocabulary
//! together with its nibble codec, which doubles as the authoring surface for
//! the compiled-in level catalog.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tilefall.";

/// Bit mask selecting the kind code inside a tile nibble.
const KIND_MASK: u8 = 0b0011;
/// Kind code of a decaying floor panel.
const KIND_BROKEN: u8 = 0;
/// Kind code of plain solid floor.
const KIND_SOLID: u8 = 1;
/// Kind code of a pressure button.
const KIND_BUTTON: u8 = 2;
/// Number of bits the parameter is shifted past the kind code.
const PARAMETER_SHIFT: u8 = 2;
/// Bit mask selecting the parameter once shifted down.
const PARAMETER_MASK: u8 = 0b0011;

/// State of a single board cell.
///
/// The serialized form is a 4-bit nibble: bits 0 and 1 carry the kind code,
/// bits 2 and 3 carry a per-kind parameter. Two tiles pack into one byte in
/// the level wire format, left tile in the low nibble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Plain floor with no behavior attached.
    Solid,
    /// Decaying panel with the given number of safe crossings remaining.
    ///
    /// A count of zero is a collapsed panel: stepping onto it loses the
    /// attempt. Counts above three are not representable in the wire format
    /// and are never produced by the loader or by gameplay.
    Broken(u8),
    /// Pressure button that is currently engaged when the flag is set.
    Button(bool),
}

impl Tile {
    /// Encodes the tile into its 4-bit wire representation.
    ///
    /// Usable in const context, which lets level tables pack their byte
    /// streams at compile time.
    #[must_use]
    pub const fn to_nibble(self) -> u8 {
        match self {
            Self::Solid => KIND_SOLID,
            Self::Broken(steps) => KIND_BROKEN | ((steps & PARAMETER_MASK) << PARAMETER_SHIFT),
            Self::Button(engaged) => KIND_BUTTON | ((engaged as u8) << PARAMETER_SHIFT),
        }
    }

    /// Decodes a 4-bit wire representation back into a tile.
    ///
    /// Total over its input: bits above the nibble are ignored, the reserved
    /// kind code decodes to [`Tile::Solid`], and a button takes its engaged
    /// flag from parameter bit 0. Exact inverse of [`Tile::to_nibble`] for
    /// every tile that encoder can produce.
    #[must_use]
    pub const fn from_nibble(nibble: u8) -> Self {
        let parameter = (nibble >> PARAMETER_SHIFT) & PARAMETER_MASK;
        match nibble & KIND_MASK {
            KIND_BROKEN => Self::Broken(parameter),
            KIND_BUTTON => Self::Button(parameter & 1 == 1),
            _ => Self::Solid,
        }
    }

    /// Packs two tiles into one wire byte, left tile in the low nibble.
    #[must_use]
    pub const fn pack_pair(left: Self, right: Self) -> u8 {
        left.to_nibble() | (right.to_nibble() << 4)
    }

    /// Splits a wire byte into its `(left, right)` tile pair.
    #[must_use]
    pub const fn unpack_pair(byte: u8) -> (Self, Self) {
        (Self::from_nibble(byte & 0x0f), Self::from_nibble(byte >> 4))
    }
}

impl Default for Tile {
    /// The all-zero wire encoding: a collapsed panel.
    fn default() -> Self {
        Self::Broken(0)
    }
}

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    x: u8,
    y: u8,
}

impl GridPos {
    /// Creates a new board position.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u8 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u8 {
        self.y
    }
}

/// Opaque handle identifying one entry of the compiled-in level catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId(u32);

impl MapId {
    /// Creates a new map handle with the provided catalog index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Gameplay mode the world is currently resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// The player moves freely and the win condition is checked every frame.
    Playing,
    /// Every button is engaged; the world waits for an acknowledgement.
    Success,
    /// The player stepped onto a collapsed panel; the world waits for a
    /// retry or abandon decision.
    Failure,
}

/// How a finished attempt handed control back to the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelOutcome {
    /// The attempt ended with every button engaged.
    Completed,
    /// The player abandoned the attempt after a failure.
    Abandoned,
}

/// Edge-triggered input sampled for a single frame.
///
/// Every flag means "was pressed on this frame"; debouncing and edge
/// detection are the input collaborator's responsibility. Held buttons do
/// not repeat: each [`Command::Advance`] consumes exactly one frame's edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputFrame {
    /// Step or cursor intent toward decreasing column indices.
    pub left: bool,
    /// Step or cursor intent toward increasing column indices.
    pub right: bool,
    /// Step or cursor intent toward decreasing row indices.
    pub up: bool,
    /// Step or cursor intent toward increasing row indices.
    pub down: bool,
    /// Primary acknowledgement, retry, or selection action.
    pub confirm: bool,
    /// Secondary dismissal or abandon action.
    pub cancel: bool,
}

impl InputFrame {
    /// Creates an input frame with explicit flag values.
    #[must_use]
    pub const fn new(
        left: bool,
        right: bool,
        up: bool,
        down: bool,
        confirm: bool,
        cancel: bool,
    ) -> Self {
        Self {
            left,
            right,
            up,
            down,
            confirm,
            cancel,
        }
    }

    /// Reports whether no flag is set on this frame.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !(self.left || self.right || self.up || self.down || self.confirm || self.cancel)
    }
}

impl Default for InputFrame {
    fn default() -> Self {
        Self::new(false, false, false, false, false, false)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Loads a catalog level into the board and begins a fresh attempt.
    LoadMap {
        /// Handle of the catalog entry to load.
        map: MapId,
    },
    /// Advances the gameplay state machine by one frame of input.
    Advance {
        /// Edge-triggered input sampled for this frame.
        input: InputFrame,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a catalog level was decoded into the board.
    MapLoaded {
        /// Handle of the catalog entry that was loaded.
        map: MapId,
        /// Number of active columns declared by the level.
        width: u8,
        /// Number of active rows declared by the level.
        height: u8,
        /// Cell the player occupies after the load.
        player: GridPos,
    },
    /// Confirms that the player resolved a step between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: GridPos,
        /// Cell the player occupies after the move.
        to: GridPos,
    },
    /// Reports that a board cell changed state.
    TileChanged {
        /// Cell whose tile changed.
        position: GridPos,
        /// Tile now stored at the cell.
        tile: Tile,
    },
    /// Announces that the gameplay phase machine entered a new phase.
    PhaseChanged {
        /// Phase that became active after processing the command.
        phase: GamePhase,
    },
    /// Announces that the world finished an attempt and the shell should
    /// take control back.
    ControlYielded {
        /// How the attempt ended.
        outcome: LevelOutcome,
    },
}

/// Read-only view into the board arena captured for queries and rendering.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    cells: &'a [Tile],
    stride: u8,
    width: u8,
    height: u8,
}

impl<'a> BoardView<'a> {
    /// Captures a new view backed by the provided row-major cell slice.
    ///
    /// `stride` is the arena width backing the slice; `width` and `height`
    /// describe the active region of the loaded level inside it.
    #[must_use]
    pub fn new(cells: &'a [Tile], stride: u8, width: u8, height: u8) -> Self {
        Self {
            cells,
            stride,
            width,
            height,
        }
    }

    /// Returns the tile stored at the provided cell.
    ///
    /// Cells outside the arena read as the default collapsed panel, which is
    /// exactly what the loader leaves there.
    #[must_use]
    pub fn tile(&self, position: GridPos) -> Tile {
        if position.x() >= self.stride {
            return Tile::default();
        }
        let index =
            usize::from(position.y()) * usize::from(self.stride) + usize::from(position.x());
        self.cells.get(index).copied().unwrap_or_default()
    }

    /// Active dimensions of the loaded level measured in cells.
    #[must_use]
    pub const fn dimensions(&self) -> (u8, u8) {
        (self.width, self.height)
    }

    /// Width of the backing arena measured in cells.
    #[must_use]
    pub const fn stride(&self) -> u8 {
        self.stride
    }

    /// Counts the buttons in the active region that are not yet engaged.
    #[must_use]
    pub fn buttons_remaining(&self) -> u32 {
        let mut remaining = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                if let Tile::Button(false) = self.tile(GridPos::new(x, y)) {
                    remaining += 1;
                }
            }
        }
        remaining
    }
}

#[cfg(test)]
mod tests {
    use super::{GamePhase, GridPos, InputFrame, LevelOutcome, MapId, Tile};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn nibble_codec_round_trips_every_valid_tile() {
        let mut tiles = vec![Tile::Solid, Tile::Button(false), Tile::Button(true)];
        for steps in 0..=3 {
            tiles.push(Tile::Broken(steps));
        }
        for tile in tiles {
            assert_eq!(Tile::from_nibble(tile.to_nibble()), tile);
        }
    }

    #[test]
    fn nibble_layout_matches_wire_format() {
        assert_eq!(Tile::Broken(0).to_nibble(), 0b0000);
        assert_eq!(Tile::Broken(2).to_nibble(), 0b1000);
        assert_eq!(Tile::Solid.to_nibble(), 0b0001);
        assert_eq!(Tile::Button(false).to_nibble(), 0b0010);
        assert_eq!(Tile::Button(true).to_nibble(), 0b0110);
    }

    #[test]
    fn reserved_kind_code_decodes_to_solid_floor() {
        for parameter in 0..=3u8 {
            assert_eq!(Tile::from_nibble(0b11 | (parameter << 2)), Tile::Solid);
        }
    }

    #[test]
    fn pack_pair_places_left_tile_in_low_nibble() {
        let byte = Tile::pack_pair(Tile::Broken(1), Tile::Button(true));
        assert_eq!(byte & 0x0f, Tile::Broken(1).to_nibble());
        assert_eq!(byte >> 4, Tile::Button(true).to_nibble());
    }

    #[test]
    fn unpack_pair_inverts_pack_pair() {
        let pair = (Tile::Button(false), Tile::Solid);
        assert_eq!(Tile::unpack_pair(Tile::pack_pair(pair.0, pair.1)), pair);
    }

    #[test]
    fn default_tile_is_a_collapsed_panel() {
        assert_eq!(Tile::default(), Tile::Broken(0));
        assert_eq!(Tile::default().to_nibble(), 0);
    }

    #[test]
    fn default_input_frame_is_idle() {
        assert!(InputFrame::default().is_idle());
        assert!(!InputFrame {
            confirm: true,
            ..InputFrame::default()
        }
        .is_idle());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tile_round_trips_through_bincode() {
        assert_round_trip(&Tile::Broken(3));
        assert_round_trip(&Tile::Button(true));
    }

    #[test]
    fn grid_pos_round_trips_through_bincode() {
        assert_round_trip(&GridPos::new(4, 7));
    }

    #[test]
    fn map_id_round_trips_through_bincode() {
        assert_round_trip(&MapId::new(3));
    }

    #[test]
    fn phase_and_outcome_round_trip_through_bincode() {
        assert_round_trip(&GamePhase::Failure);
        assert_round_trip(&LevelOutcome::Abandoned);
    }
}
