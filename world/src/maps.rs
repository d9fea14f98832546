//! Binary level descriptors and their decoding into the board arena.

use tilefall_core::{GridPos, Tile};

use crate::board::{Board, CAPACITY};

/// Number of bytes preceding the packed tile stream.
const HEADER_LEN: usize = 4;

/// Compact binary description of one level.
///
/// Layout: width, height, player spawn column, player spawn row, followed by
/// the packed tile stream in row-major order with `ceil(width / 2)` bytes
/// per row and the left tile of each pair in the low nibble. Catalog blobs
/// live in the binary for the lifetime of the program; share-code previews
/// may borrow from shorter-lived buffers.
///
/// Accessors index the header directly. A blob without a full header is a
/// programming error; the decode path checks the contract in debug builds
/// and trusts the compiled-in catalog in release builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapData<'a> {
    bytes: &'a [u8],
}

impl<'a> MapData<'a> {
    /// Wraps a level blob without validating it.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Number of active columns declared by the level.
    #[must_use]
    pub fn width(&self) -> u8 {
        self.bytes[0]
    }

    /// Number of active rows declared by the level.
    #[must_use]
    pub fn height(&self) -> u8 {
        self.bytes[1]
    }

    /// Cell the player occupies when the level begins.
    ///
    /// The spawn tile receives no step-on effect: a player starting on a
    /// button leaves it disengaged until they step away and return.
    #[must_use]
    pub fn player_spawn(&self) -> GridPos {
        GridPos::new(self.bytes[2], self.bytes[3])
    }

    /// Number of packed bytes backing each row of the tile stream.
    #[must_use]
    pub fn row_stride(&self) -> usize {
        (usize::from(self.width()) + 1) / 2
    }

    /// Packed tile stream that follows the header.
    #[must_use]
    pub fn tile_stream(&self) -> &'a [u8] {
        &self.bytes[HEADER_LEN..]
    }

    /// Raw bytes backing the descriptor, header included.
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Verifies the blob against the contract the decode path assumes.
    ///
    /// Holds when the header is complete, both dimensions fit the arena, the
    /// player spawn lies inside the declared region and the tile stream
    /// covers it. Boundary code handling untrusted blobs checks this before
    /// touching any other accessor.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        if self.bytes.len() < HEADER_LEN {
            return false;
        }
        if !(1..=CAPACITY).contains(&self.width()) || !(1..=CAPACITY).contains(&self.height()) {
            return false;
        }
        let spawn = self.player_spawn();
        if spawn.x() >= self.width() || spawn.y() >= self.height() {
            return false;
        }
        self.tile_stream().len() >= usize::from(self.height()) * self.row_stride()
    }

    /// Decodes the level into the provided arena.
    ///
    /// The arena is cleared first, so every cell outside the declared region
    /// ends as a default collapsed panel. With an odd width the final high
    /// nibble of each row never reaches the board, and no byte beyond
    /// `height * row_stride` is read; trailing bytes are ignored.
    pub(crate) fn decode_into(&self, board: &mut Board) {
        debug_assert!(
            self.bytes.len() >= HEADER_LEN,
            "level blob shorter than its header"
        );
        debug_assert!(
            (1..=CAPACITY).contains(&self.width()),
            "level width {} outside 1..={CAPACITY}",
            self.width()
        );
        debug_assert!(
            (1..=CAPACITY).contains(&self.height()),
            "level height {} outside 1..={CAPACITY}",
            self.height()
        );
        debug_assert!(
            self.player_spawn().x() < self.width() && self.player_spawn().y() < self.height(),
            "player spawn ({}, {}) outside the {}x{} region",
            self.player_spawn().x(),
            self.player_spawn().y(),
            self.width(),
            self.height()
        );
        debug_assert!(
            self.tile_stream().len() >= usize::from(self.height()) * self.row_stride(),
            "tile stream shorter than the declared {}x{} region",
            self.width(),
            self.height()
        );

        board.clear();
        board.set_dimensions(self.width(), self.height());
        for y in 0..self.height() {
            for x in 0..self.width() {
                board.set_tile(GridPos::new(x, y), self.tile_at(x, y));
            }
        }
    }

    /// Reads one tile of the declared region from the packed stream.
    ///
    /// Panics when the blob is malformed or the position lies outside the
    /// declared region; callers verify [`Self::is_well_formed`] first when
    /// the blob is untrusted.
    #[must_use]
    pub fn tile_at(&self, x: u8, y: u8) -> Tile {
        let byte = self.tile_stream()[usize::from(y) * self.row_stride() + usize::from(x) / 2];
        let (left, right) = Tile::unpack_pair(byte);
        if x % 2 == 0 {
            left
        } else {
            right
        }
    }
}
