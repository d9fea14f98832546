#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure level-select system that turns menu input into level load commands.

use tilefall_core::{Command, Event, InputFrame, MapId};

/// Menu system that walks a cursor over the level catalog.
///
/// The menu owns player input until a level loads and regains ownership when
/// the world yields control back after a finished attempt.
#[derive(Debug, Clone)]
pub struct LevelSelect {
    cursor: usize,
    level_count: usize,
    menu_active: bool,
}

impl LevelSelect {
    /// Creates a level-select system over a catalog of `level_count` levels.
    #[must_use]
    pub const fn new(level_count: usize) -> Self {
        Self {
            cursor: 0,
            level_count,
            menu_active: true,
        }
    }

    /// Catalog slot the cursor currently rests on.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Indicates whether the menu currently owns player input.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.menu_active
    }

    /// Consumes world events and frame input to emit level load commands.
    ///
    /// The cursor clamps at both catalog ends and never wraps. A confirm
    /// press loads the highlighted level after any cursor movement carried
    /// by the same frame has been applied.
    pub fn handle(&mut self, events: &[Event], input: InputFrame, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::MapLoaded { map, .. } => {
                    self.align_cursor(*map);
                    self.menu_active = false;
                }
                Event::ControlYielded { .. } => self.menu_active = true,
                _ => {}
            }
        }

        if !self.menu_active {
            return;
        }

        if input.up && self.cursor > 0 {
            self.cursor -= 1;
        }
        if input.down && self.cursor + 1 < self.level_count {
            self.cursor += 1;
        }

        if input.confirm && self.level_count > 0 {
            if let Ok(map) = u32::try_from(self.cursor) {
                out.push(Command::LoadMap {
                    map: MapId::new(map),
                });
            }
        }
    }

    fn align_cursor(&mut self, map: MapId) {
        if let Ok(slot) = usize::try_from(map.get()) {
            if slot < self.level_count {
                self.cursor = slot;
            }
        }
    }
}
