//! Fixed-capacity tile arena shared by every loaded level.

use tilefall_core::{GridPos, Tile};

/// Number of cells along each edge of the arena.
pub(crate) const CAPACITY: u8 = 8;

const AREA: usize = CAPACITY as usize * CAPACITY as usize;

/// Dense row-major tile storage reused across level loads.
///
/// The arena always holds [`CAPACITY`] by [`CAPACITY`] tiles. A loaded level
/// occupies the upper-left `width` by `height` region and every cell outside
/// it is a default collapsed panel, so the rim of a small level is lethal
/// without any special casing in the movement rules.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    cells: [Tile; AREA],
    width: u8,
    height: u8,
}

impl Board {
    /// Creates an arena with every cell collapsed and no active region.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            cells: [Tile::default(); AREA],
            width: 0,
            height: 0,
        }
    }

    /// Column index of the western movement bound.
    #[must_use]
    pub(crate) const fn left_edge() -> u8 {
        0
    }

    /// Column index of the eastern movement bound.
    #[must_use]
    pub(crate) const fn right_edge() -> u8 {
        CAPACITY - 1
    }

    /// Row index of the northern movement bound.
    #[must_use]
    pub(crate) const fn top_edge() -> u8 {
        0
    }

    /// Row index of the southern movement bound.
    #[must_use]
    pub(crate) const fn bottom_edge() -> u8 {
        CAPACITY - 1
    }

    /// Tile stored at the provided cell.
    ///
    /// The cell must lie inside the arena; movement clamping upholds this
    /// for every caller in the gameplay path.
    #[must_use]
    pub(crate) fn tile(&self, position: GridPos) -> Tile {
        self.cells[Self::index(position)]
    }

    /// Replaces the tile stored at the provided cell.
    pub(crate) fn set_tile(&mut self, position: GridPos, tile: Tile) {
        self.cells[Self::index(position)] = tile;
    }

    /// Resets every cell to the default collapsed panel and forgets the
    /// active region.
    pub(crate) fn clear(&mut self) {
        self.cells.fill(Tile::default());
        self.width = 0;
        self.height = 0;
    }

    /// Records the active region declared by a loaded level.
    pub(crate) fn set_dimensions(&mut self, width: u8, height: u8) {
        self.width = width;
        self.height = height;
    }

    /// Number of active columns.
    #[must_use]
    pub(crate) fn width(&self) -> u8 {
        self.width
    }

    /// Number of active rows.
    #[must_use]
    pub(crate) fn height(&self) -> u8 {
        self.height
    }

    /// Dense tile storage in row-major order.
    #[must_use]
    pub(crate) fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Reports whether every button in the active region is engaged.
    ///
    /// Returns false at the first disengaged button; a board without any
    /// buttons is vacuously complete.
    #[must_use]
    pub(crate) fn all_buttons_engaged(&self) -> bool {
        for y in 0..self.height {
            for x in 0..self.width {
                if let Tile::Button(false) = self.tile(GridPos::new(x, y)) {
                    return false;
                }
            }
        }
        true
    }

    fn index(position: GridPos) -> usize {
        assert!(
            position.x() < CAPACITY && position.y() < CAPACITY,
            "cell ({}, {}) lies outside the {CAPACITY}x{CAPACITY} arena",
            position.x(),
            position.y()
        );
        usize::from(position.y()) * usize::from(CAPACITY) + usize::from(position.x())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_is_fully_collapsed() {
        let board = Board::new();

        assert_eq!(board.width(), 0);
        assert_eq!(board.height(), 0);
        for tile in board.cells() {
            assert_eq!(*tile, Tile::Broken(0));
        }
    }

    #[test]
    fn set_tile_round_trips_through_tile() {
        let mut board = Board::new();
        let position = GridPos::new(3, 5);

        board.set_tile(position, Tile::Button(true));

        assert_eq!(board.tile(position), Tile::Button(true));
        assert_eq!(board.tile(GridPos::new(5, 3)), Tile::Broken(0));
    }

    #[test]
    fn clear_resets_cells_and_active_region() {
        let mut board = Board::new();
        board.set_dimensions(4, 4);
        board.set_tile(GridPos::new(1, 1), Tile::Solid);

        board.clear();

        assert_eq!(board.tile(GridPos::new(1, 1)), Tile::Broken(0));
        assert_eq!(board.width(), 0);
        assert_eq!(board.height(), 0);
    }

    #[test]
    fn edges_match_arena_capacity() {
        assert_eq!(Board::left_edge(), 0);
        assert_eq!(Board::top_edge(), 0);
        assert_eq!(Board::right_edge(), CAPACITY - 1);
        assert_eq!(Board::bottom_edge(), CAPACITY - 1);
    }

    #[test]
    fn all_buttons_engaged_is_vacuously_true_without_buttons() {
        let mut board = Board::new();
        board.set_dimensions(2, 2);
        board.set_tile(GridPos::new(0, 0), Tile::Solid);
        board.set_tile(GridPos::new(1, 0), Tile::Broken(2));

        assert!(board.all_buttons_engaged());
    }

    #[test]
    fn all_buttons_engaged_sees_the_first_disengaged_button() {
        let mut board = Board::new();
        board.set_dimensions(2, 1);
        board.set_tile(GridPos::new(0, 0), Tile::Button(true));
        board.set_tile(GridPos::new(1, 0), Tile::Button(false));

        assert!(!board.all_buttons_engaged());

        board.set_tile(GridPos::new(1, 0), Tile::Button(true));
        assert!(board.all_buttons_engaged());
    }

    #[test]
    fn disengaged_button_outside_active_region_is_ignored() {
        let mut board = Board::new();
        board.set_dimensions(1, 1);
        board.set_tile(GridPos::new(0, 0), Tile::Solid);
        board.set_tile(GridPos::new(4, 4), Tile::Button(false));

        assert!(board.all_buttons_engaged());
    }

    #[test]
    #[should_panic(expected = "outside the 8x8 arena")]
    fn tile_access_outside_the_arena_panics() {
        let board = Board::new();
        let _ = board.tile(GridPos::new(8, 0));
    }
}
