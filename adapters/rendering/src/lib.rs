#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tilefall adapters.

use anyhow::Result as AnyResult;
use std::{error::Error, fmt};
use tilefall_core::{BoardView, GamePhase, GridPos, InputFrame, Tile};

/// How a single board cell should be presented by a backend.
///
/// Every backend draws from this vocabulary instead of matching on [`Tile`]
/// directly, so the rendering of a tile state cannot drift from its gameplay
/// effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileVisual {
    /// Nothing remains where the floor collapsed.
    Hole,
    /// Cracked panel annotated with its remaining crossings.
    Cracked(u8),
    /// Intact floor panel.
    Floor,
    /// Button still waiting for the player.
    ButtonOff,
    /// Button locked in the pressed position.
    ButtonOn,
}

impl TileVisual {
    /// Derives the visual for a tile state.
    #[must_use]
    pub const fn from_tile(tile: Tile) -> Self {
        match tile {
            Tile::Solid => Self::Floor,
            Tile::Broken(0) => Self::Hole,
            Tile::Broken(steps) => Self::Cracked(steps),
            Tile::Button(false) => Self::ButtonOff,
            Tile::Button(true) => Self::ButtonOn,
        }
    }
}

/// Visual state of a level's active region in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardPresentation {
    /// Number of columns covered by the presentation.
    pub width: u8,
    /// Number of rows covered by the presentation.
    pub height: u8,
    /// One visual per cell, rows stored top to bottom.
    pub visuals: Vec<TileVisual>,
}

impl BoardPresentation {
    /// Creates a board presentation from explicit dimensions and visuals.
    ///
    /// Returns an error when the visual count does not cover the declared
    /// dimensions exactly.
    pub fn new(
        width: u8,
        height: u8,
        visuals: Vec<TileVisual>,
    ) -> std::result::Result<Self, RenderingError> {
        let expected = usize::from(width) * usize::from(height);
        if visuals.len() != expected {
            return Err(RenderingError::VisualCountMismatch {
                expected,
                actual: visuals.len(),
            });
        }

        Ok(Self {
            width,
            height,
            visuals,
        })
    }

    /// Captures the visuals of a board view's active region.
    #[must_use]
    pub fn from_view(view: BoardView<'_>) -> Self {
        let (width, height) = view.dimensions();
        let mut visuals = Vec::with_capacity(usize::from(width) * usize::from(height));
        for y in 0..height {
            for x in 0..width {
                visuals.push(TileVisual::from_tile(view.tile(GridPos::new(x, y))));
            }
        }

        Self {
            width,
            height,
            visuals,
        }
    }

    /// Visual of the cell at the provided position.
    ///
    /// Positions outside the covered region present as [`TileVisual::Hole`],
    /// matching the cleared arena surrounding a loaded level.
    #[must_use]
    pub fn visual(&self, position: GridPos) -> TileVisual {
        if position.x() >= self.width {
            return TileVisual::Hole;
        }
        let index = usize::from(position.y()) * usize::from(self.width) + usize::from(position.x());
        self.visuals.get(index).copied().unwrap_or(TileVisual::Hole)
    }
}

/// Counters displayed alongside the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HudPresentation {
    /// Resolved moves in the current attempt.
    pub moves_taken: u32,
    /// Buttons that still need to be engaged.
    pub buttons_remaining: u32,
}

impl HudPresentation {
    /// Creates a new HUD descriptor.
    #[must_use]
    pub const fn new(moves_taken: u32, buttons_remaining: u32) -> Self {
        Self {
            moves_taken,
            buttons_remaining,
        }
    }
}

/// Menu state drawn while the level select owns the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MenuPresentation {
    /// Catalog slot the cursor rests on.
    pub cursor: usize,
    /// Number of levels the catalog offers.
    pub level_count: usize,
}

impl MenuPresentation {
    /// Creates a new menu descriptor.
    #[must_use]
    pub const fn new(cursor: usize, level_count: usize) -> Self {
        Self {
            cursor,
            level_count,
        }
    }
}

/// Surface that currently owns the screen and the player's input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScreenFlow {
    /// The level-select menu is on screen.
    LevelSelect,
    /// A running attempt is on screen.
    Gameplay,
}

/// Scene description combining the board, its inhabitant and the HUD.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Surface that owns the screen.
    pub flow: ScreenFlow,
    /// Visual state of the level's active region.
    pub board: BoardPresentation,
    /// Cell the player avatar occupies.
    pub player: GridPos,
    /// Phase the gameplay state machine is in.
    pub phase: GamePhase,
    /// Counters drawn alongside the board.
    pub hud: HudPresentation,
    /// Menu state drawn while the level select owns the screen.
    pub menu: MenuPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        flow: ScreenFlow,
        board: BoardPresentation,
        player: GridPos,
        phase: GamePhase,
        hud: HudPresentation,
        menu: MenuPresentation,
    ) -> Self {
        Self {
            flow,
            board,
            player,
            phase,
            hud,
            menu,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Title used by the created window or terminal banner.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Tilefall scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives per-frame input captured
    /// by the adapter and may mutate the scene before it is rendered. Frame
    /// cadence and input edge detection stay backend concerns.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(InputFrame, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Visual count must cover the declared board dimensions exactly.
    VisualCountMismatch {
        /// Number of visuals the dimensions require.
        expected: usize,
        /// Number of visuals actually provided.
        actual: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VisualCountMismatch { expected, actual } => {
                write!(
                    f,
                    "board presentation requires {expected} visuals (received {actual})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
