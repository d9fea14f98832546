#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the Tilefall experience.

use tilefall_core::BoardView;
use tilefall_world::{levels, query, World};

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner(&self, world: &World) -> &'static str {
        query::welcome_banner(world)
    }

    /// Exposes the board arena for presentation purposes.
    #[must_use]
    pub fn board_view<'world>(&self, world: &'world World) -> BoardView<'world> {
        query::board_view(world)
    }

    /// Number of levels the catalog offers to the level select screen.
    #[must_use]
    pub fn level_count(&self) -> usize {
        levels::catalog().len()
    }
}
