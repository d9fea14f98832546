#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tilefall.

mod board;
pub mod levels;
pub mod maps;

use board::Board;
use tilefall_core::{
    Command, Event, GamePhase, GridPos, InputFrame, LevelOutcome, MapId, Tile, WELCOME_BANNER,
};

/// Represents the authoritative Tilefall world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    board: Board,
    player: GridPos,
    moves: u32,
    phase: GamePhase,
    current_map: Option<MapId>,
}

impl World {
    /// Creates a new Tilefall world with an empty arena.
    ///
    /// No attempt is in progress until a [`Command::LoadMap`] arrives;
    /// advancing an unloaded world is inert.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            board: Board::new(),
            player: GridPos::new(0, 0),
            moves: 0,
            phase: GamePhase::Playing,
            current_map: None,
        }
    }

    fn load_map(&mut self, map: MapId, out_events: &mut Vec<Event>) {
        let Some(data) = levels::get(map) else {
            debug_assert!(false, "unknown map handle {map:?}");
            return;
        };

        data.decode_into(&mut self.board);
        self.player = data.player_spawn();
        self.moves = 0;
        self.current_map = Some(map);

        let previous_phase = self.phase;
        self.phase = GamePhase::Playing;

        out_events.push(Event::MapLoaded {
            map,
            width: data.width(),
            height: data.height(),
            player: self.player,
        });
        if previous_phase != GamePhase::Playing {
            out_events.push(Event::PhaseChanged {
                phase: GamePhase::Playing,
            });
        }
    }

    fn advance(&mut self, input: InputFrame, out_events: &mut Vec<Event>) {
        if self.current_map.is_none() {
            return;
        }

        match self.phase {
            GamePhase::Playing => self.advance_playing(input, out_events),
            GamePhase::Success => self.advance_success(input, out_events),
            GamePhase::Failure => self.advance_failure(input, out_events),
        }
    }

    fn advance_playing(&mut self, input: InputFrame, out_events: &mut Vec<Event>) {
        let from = self.player;
        let mut x = from.x();
        let mut y = from.y();

        if input.left && x > Board::left_edge() {
            x -= 1;
        }
        if input.right && x < Board::right_edge() {
            x += 1;
        }
        if input.up && y > Board::top_edge() {
            y -= 1;
        }
        if input.down && y < Board::bottom_edge() {
            y += 1;
        }

        let to = GridPos::new(x, y);
        if to != from {
            self.player = to;
            self.moves = self.moves.saturating_add(1);
            out_events.push(Event::PlayerMoved { from, to });
            self.step_off(from, out_events);
            self.step_on(to, out_events);
        }

        if self.phase == GamePhase::Playing && self.board.all_buttons_engaged() {
            self.phase = GamePhase::Success;
            out_events.push(Event::PhaseChanged {
                phase: GamePhase::Success,
            });
        }
    }

    fn advance_success(&mut self, input: InputFrame, out_events: &mut Vec<Event>) {
        if input.confirm || input.cancel {
            self.phase = GamePhase::Playing;
            out_events.push(Event::PhaseChanged {
                phase: GamePhase::Playing,
            });
            out_events.push(Event::ControlYielded {
                outcome: LevelOutcome::Completed,
            });
        }
    }

    fn advance_failure(&mut self, input: InputFrame, out_events: &mut Vec<Event>) {
        if input.confirm {
            if let Some(map) = self.current_map {
                self.load_map(map, out_events);
            }
        } else if input.cancel {
            self.phase = GamePhase::Playing;
            out_events.push(Event::PhaseChanged {
                phase: GamePhase::Playing,
            });
            out_events.push(Event::ControlYielded {
                outcome: LevelOutcome::Abandoned,
            });
        }
    }

    fn step_off(&mut self, position: GridPos, out_events: &mut Vec<Event>) {
        match self.board.tile(position) {
            Tile::Broken(steps) if steps > 0 => {
                let tile = Tile::Broken(steps - 1);
                self.board.set_tile(position, tile);
                out_events.push(Event::TileChanged { position, tile });
            }
            Tile::Broken(_) | Tile::Solid | Tile::Button(_) => {}
        }
    }

    fn step_on(&mut self, position: GridPos, out_events: &mut Vec<Event>) {
        match self.board.tile(position) {
            Tile::Button(engaged) => {
                let tile = Tile::Button(!engaged);
                self.board.set_tile(position, tile);
                out_events.push(Event::TileChanged { position, tile });
            }
            Tile::Broken(0) => {
                self.phase = GamePhase::Failure;
                out_events.push(Event::PhaseChanged {
                    phase: GamePhase::Failure,
                });
            }
            Tile::Broken(_) | Tile::Solid => {}
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// `Command::Advance` resolves one frame. In the playing phase the four
/// directional flags are evaluated in the order left, right, up, down, each
/// clamped at the arena rim; when the resolved position differs from the
/// origin the world emits [`Event::PlayerMoved`], applies the step-off
/// effect of the origin tile and then the step-on effect of the destination
/// tile, exactly one pair even when both axes moved. The win scan runs at
/// the end of every playing frame. Waiting phases consume only the confirm
/// and cancel flags.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadMap { map } => world.load_map(map, out_events),
        Command::Advance { input } => world.advance(input, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{board, World};
    use tilefall_core::{BoardView, GamePhase, GridPos, MapId};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current phase of the gameplay state machine.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Cell the player currently occupies.
    #[must_use]
    pub fn player(world: &World) -> GridPos {
        world.player
    }

    /// Number of resolved moves in the current attempt.
    #[must_use]
    pub fn moves_taken(world: &World) -> u32 {
        world.moves
    }

    /// Handle of the currently loaded catalog level, if any.
    #[must_use]
    pub fn current_map(world: &World) -> Option<MapId> {
        world.current_map
    }

    /// Captures a read-only view of the board arena.
    #[must_use]
    pub fn board_view(world: &World) -> BoardView<'_> {
        BoardView::new(
            world.board.cells(),
            board::CAPACITY,
            world.board.width(),
            world.board.height(),
        )
    }

    /// Counts the buttons that still need to be engaged.
    #[must_use]
    pub fn buttons_remaining(world: &World) -> u32 {
        board_view(world).buttons_remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_world(level: u32) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadMap {
                map: MapId::new(level),
            },
            &mut events,
        );
        world
    }

    fn apply_frame(world: &mut World, input: InputFrame) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::Advance { input }, &mut events);
        events
    }

    fn right() -> InputFrame {
        InputFrame {
            right: true,
            ..InputFrame::default()
        }
    }

    fn left() -> InputFrame {
        InputFrame {
            left: true,
            ..InputFrame::default()
        }
    }

    fn up() -> InputFrame {
        InputFrame {
            up: true,
            ..InputFrame::default()
        }
    }

    fn down() -> InputFrame {
        InputFrame {
            down: true,
            ..InputFrame::default()
        }
    }

    fn confirm() -> InputFrame {
        InputFrame {
            confirm: true,
            ..InputFrame::default()
        }
    }

    fn cancel() -> InputFrame {
        InputFrame {
            cancel: true,
            ..InputFrame::default()
        }
    }

    #[test]
    fn new_world_awaits_its_first_level() {
        let world = World::new();

        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert_eq!(query::phase(&world), GamePhase::Playing);
        assert_eq!(query::current_map(&world), None);
        assert_eq!(query::moves_taken(&world), 0);
    }

    #[test]
    fn advancing_an_unloaded_world_is_inert() {
        let mut world = World::new();

        let events = apply_frame(&mut world, confirm());

        assert!(events.is_empty());
        assert_eq!(query::phase(&world), GamePhase::Playing);
    }

    #[test]
    fn load_map_begins_a_fresh_attempt() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::LoadMap {
                map: MapId::new(1),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::MapLoaded {
                map: MapId::new(1),
                width: 5,
                height: 1,
                player: GridPos::new(0, 0),
            }],
        );
        assert_eq!(query::player(&world), GridPos::new(0, 0));
        assert_eq!(query::moves_taken(&world), 0);
        assert_eq!(query::current_map(&world), Some(MapId::new(1)));
        let view = query::board_view(&world);
        assert_eq!(view.dimensions(), (5, 1));
        assert_eq!(view.tile(GridPos::new(0, 0)), Tile::Solid);
        assert_eq!(view.tile(GridPos::new(2, 0)), Tile::Button(false));
    }

    #[test]
    #[should_panic(expected = "unknown map handle")]
    fn unknown_map_handle_fails_loudly_in_debug_builds() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadMap {
                map: MapId::new(99),
            },
            &mut events,
        );
    }

    #[test]
    fn opposing_directions_cancel_within_one_frame() {
        let mut world = loaded_world(4);
        let _ = apply_frame(&mut world, right());

        let events = apply_frame(
            &mut world,
            InputFrame {
                left: true,
                right: true,
                ..InputFrame::default()
            },
        );

        assert!(events.is_empty(), "cancelled frame resolves no step");
        assert_eq!(query::player(&world), GridPos::new(1, 0));
        assert_eq!(query::moves_taken(&world), 1);
    }

    #[test]
    fn diagonal_input_resolves_a_single_step_pair() {
        let mut world = loaded_world(4);

        let events = apply_frame(
            &mut world,
            InputFrame {
                right: true,
                down: true,
                ..InputFrame::default()
            },
        );

        assert_eq!(
            events,
            vec![
                Event::PlayerMoved {
                    from: GridPos::new(0, 0),
                    to: GridPos::new(1, 1),
                },
                Event::TileChanged {
                    position: GridPos::new(1, 1),
                    tile: Tile::Button(true),
                },
            ],
            "two axes still resolve exactly one step-off/step-on pair",
        );
        assert_eq!(query::moves_taken(&world), 1);
    }

    #[test]
    fn movement_clamps_at_the_arena_rim_not_the_level_rim() {
        let mut world = loaded_world(0);

        assert!(apply_frame(&mut world, up()).is_empty());
        assert!(apply_frame(&mut world, left()).is_empty());
        assert_eq!(query::player(&world), GridPos::new(0, 0));

        let events = apply_frame(&mut world, down());

        assert_eq!(
            events,
            vec![
                Event::PlayerMoved {
                    from: GridPos::new(0, 0),
                    to: GridPos::new(0, 1),
                },
                Event::PhaseChanged {
                    phase: GamePhase::Failure,
                },
            ],
            "the cleared rim below a one-row level is a collapsed panel",
        );
        assert_eq!(query::phase(&world), GamePhase::Failure);
    }

    #[test]
    fn leaving_a_cracked_panel_spends_one_crossing() {
        let mut world = loaded_world(1);

        let first = apply_frame(&mut world, right());
        assert_eq!(
            first,
            vec![Event::PlayerMoved {
                from: GridPos::new(0, 0),
                to: GridPos::new(1, 0),
            }],
            "stepping onto an intact panel changes nothing yet",
        );

        let second = apply_frame(&mut world, right());
        assert_eq!(
            second,
            vec![
                Event::PlayerMoved {
                    from: GridPos::new(1, 0),
                    to: GridPos::new(2, 0),
                },
                Event::TileChanged {
                    position: GridPos::new(1, 0),
                    tile: Tile::Broken(0),
                },
                Event::TileChanged {
                    position: GridPos::new(2, 0),
                    tile: Tile::Button(true),
                },
            ],
        );
        assert_eq!(query::moves_taken(&world), 2);
    }

    #[test]
    fn stepping_onto_a_collapsed_panel_fails_the_attempt() {
        let mut world = loaded_world(1);
        let _ = apply_frame(&mut world, right());
        let _ = apply_frame(&mut world, left());

        let events = apply_frame(&mut world, right());

        assert_eq!(
            events,
            vec![
                Event::PlayerMoved {
                    from: GridPos::new(0, 0),
                    to: GridPos::new(1, 0),
                },
                Event::PhaseChanged {
                    phase: GamePhase::Failure,
                },
            ],
        );
        assert_eq!(query::phase(&world), GamePhase::Failure);
        assert_eq!(query::player(&world), GridPos::new(1, 0));
    }

    #[test]
    fn walking_onto_an_engaged_button_disengages_it() {
        let mut world = loaded_world(3);

        let _ = apply_frame(&mut world, up());
        let events = apply_frame(&mut world, up());

        assert_eq!(
            events,
            vec![
                Event::PlayerMoved {
                    from: GridPos::new(0, 3),
                    to: GridPos::new(0, 2),
                },
                Event::TileChanged {
                    position: GridPos::new(0, 3),
                    tile: Tile::Broken(1),
                },
                Event::TileChanged {
                    position: GridPos::new(0, 2),
                    tile: Tile::Button(false),
                },
            ],
        );
        assert_eq!(
            query::board_view(&world).tile(GridPos::new(0, 2)),
            Tile::Button(false),
        );
    }

    #[test]
    fn engaging_every_button_completes_the_level() {
        let mut world = loaded_world(0);
        assert_eq!(query::buttons_remaining(&world), 1);

        let events = apply_frame(&mut world, right());

        assert_eq!(
            events,
            vec![
                Event::PlayerMoved {
                    from: GridPos::new(0, 0),
                    to: GridPos::new(1, 0),
                },
                Event::TileChanged {
                    position: GridPos::new(1, 0),
                    tile: Tile::Button(true),
                },
                Event::PhaseChanged {
                    phase: GamePhase::Success,
                },
            ],
        );
        assert_eq!(query::phase(&world), GamePhase::Success);
        assert_eq!(query::buttons_remaining(&world), 0);
        assert_eq!(query::moves_taken(&world), 1);
    }

    #[test]
    fn success_acknowledgement_yields_control_without_reloading() {
        let mut world = loaded_world(0);
        let _ = apply_frame(&mut world, right());

        let events = apply_frame(&mut world, confirm());

        assert_eq!(
            events,
            vec![
                Event::PhaseChanged {
                    phase: GamePhase::Playing,
                },
                Event::ControlYielded {
                    outcome: LevelOutcome::Completed,
                },
            ],
        );
        assert_eq!(query::phase(&world), GamePhase::Playing);
        assert_eq!(
            query::board_view(&world).tile(GridPos::new(1, 0)),
            Tile::Button(true),
            "yielding control leaves the completed board in place",
        );
        assert_eq!(query::moves_taken(&world), 1);
    }

    #[test]
    fn success_dismissal_also_yields_control() {
        let mut world = loaded_world(0);
        let _ = apply_frame(&mut world, right());

        let events = apply_frame(&mut world, cancel());

        assert_eq!(
            events,
            vec![
                Event::PhaseChanged {
                    phase: GamePhase::Playing,
                },
                Event::ControlYielded {
                    outcome: LevelOutcome::Completed,
                },
            ],
        );
    }

    #[test]
    fn retrying_a_failed_attempt_restores_the_level_exactly() {
        let mut world = loaded_world(1);
        let _ = apply_frame(&mut world, right());
        let _ = apply_frame(&mut world, left());
        let _ = apply_frame(&mut world, right());
        assert_eq!(query::phase(&world), GamePhase::Failure);

        let events = apply_frame(&mut world, confirm());

        assert_eq!(
            events,
            vec![
                Event::MapLoaded {
                    map: MapId::new(1),
                    width: 5,
                    height: 1,
                    player: GridPos::new(0, 0),
                },
                Event::PhaseChanged {
                    phase: GamePhase::Playing,
                },
            ],
        );
        assert_eq!(query::moves_taken(&world), 0);
        assert_eq!(query::player(&world), GridPos::new(0, 0));

        let fresh = loaded_world(1);
        let reloaded_view = query::board_view(&world);
        let fresh_view = query::board_view(&fresh);
        for y in 0..reloaded_view.stride() {
            for x in 0..reloaded_view.stride() {
                let position = GridPos::new(x, y);
                assert_eq!(reloaded_view.tile(position), fresh_view.tile(position));
            }
        }
    }

    #[test]
    fn abandoning_a_failed_attempt_preserves_the_wreckage() {
        let mut world = loaded_world(1);
        let _ = apply_frame(&mut world, right());
        let _ = apply_frame(&mut world, left());
        let _ = apply_frame(&mut world, right());
        assert_eq!(query::phase(&world), GamePhase::Failure);

        let events = apply_frame(&mut world, cancel());

        assert_eq!(
            events,
            vec![
                Event::PhaseChanged {
                    phase: GamePhase::Playing,
                },
                Event::ControlYielded {
                    outcome: LevelOutcome::Abandoned,
                },
            ],
        );
        assert_eq!(
            query::board_view(&world).tile(GridPos::new(1, 0)),
            Tile::Broken(0),
            "abandoning does not repair the board",
        );
        assert_eq!(query::current_map(&world), Some(MapId::new(1)));
        assert_eq!(query::moves_taken(&world), 3);
    }

    #[test]
    fn failure_waits_until_the_player_decides() {
        let mut world = loaded_world(0);
        let _ = apply_frame(&mut world, down());
        assert_eq!(query::phase(&world), GamePhase::Failure);

        let events = apply_frame(&mut world, right());

        assert!(events.is_empty(), "directional input cannot leave failure");
        assert_eq!(query::phase(&world), GamePhase::Failure);
    }

    #[test]
    fn moves_count_only_resolved_steps() {
        let mut world = loaded_world(4);

        assert!(apply_frame(&mut world, InputFrame::default()).is_empty());
        assert!(apply_frame(&mut world, left()).is_empty());
        assert_eq!(query::moves_taken(&world), 0);

        let _ = apply_frame(&mut world, right());
        assert_eq!(query::moves_taken(&world), 1);
    }
}
