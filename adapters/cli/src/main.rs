#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Tilefall from a scripted input string.

use anyhow::{anyhow, bail, Context, Result as AnyResult};
use clap::Parser;
use log::{debug, info};
use std::fmt::Write as _;
use tilefall_core::{Command, Event, GamePhase, GridPos, InputFrame, MapId};
use tilefall_rendering::{
    BoardPresentation, HudPresentation, MenuPresentation, Presentation, RenderingBackend, Scene,
    ScreenFlow, TileVisual,
};
use tilefall_system_bootstrap::Bootstrap;
use tilefall_system_level_select::LevelSelect;
use tilefall_world::{self as world, levels, maps::MapData, query, World};

mod share_code;

use share_code::LevelSnapshot;

/// Frame-stepped Tilefall shell driven by a scripted input string.
#[derive(Parser, Debug)]
#[command(name = "tilefall")]
struct Args {
    /// Catalog level to load immediately, numbered from 1.
    #[arg(long)]
    level: Option<u32>,

    /// Input script, one character per frame: L R U D move, A confirms, B cancels, '.' waits.
    #[arg(long, default_value = "")]
    script: String,

    /// Print the share code of a catalog level and exit.
    #[arg(long, value_name = "LEVEL", conflicts_with_all = ["level", "import"])]
    export: Option<u32>,

    /// Decode a share code, preview the level it carries and exit.
    #[arg(long, value_name = "CODE", conflicts_with = "level")]
    import: Option<String>,

    /// Upper bound on simulated frames.
    #[arg(long, default_value_t = 600)]
    max_frames: usize,
}

/// Entry point for the Tilefall command-line interface.
fn main() -> AnyResult<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(level) = args.export {
        return export_level(level);
    }
    if let Some(code) = args.import.as_deref() {
        return preview_import(code);
    }

    run_playback(args)
}

fn run_playback(args: Args) -> AnyResult<()> {
    let mut world = World::new();
    let bootstrap = Bootstrap::default();
    let mut menu = LevelSelect::new(bootstrap.level_count());
    let mut pending_events = Vec::new();

    if let Some(level) = args.level {
        let map = catalog_slot(level, bootstrap.level_count())?;
        world::apply(&mut world, Command::LoadMap { map }, &mut pending_events);
        log_events(&pending_events);

        // Hand the load events to the menu now so the boot frame already
        // shows gameplay instead of the level list.
        let mut commands = Vec::new();
        menu.handle(&pending_events, InputFrame::default(), &mut commands);
        pending_events.clear();
    }

    let frames = parse_script(&args.script)?;
    let scene = capture_scene(&world, &menu, &bootstrap);
    let presentation = Presentation::new(bootstrap.welcome_banner(&world), scene);

    let backend = ScriptedBackend::new(frames, args.max_frames);
    backend.run(presentation, move |input, scene| {
        let mut commands = Vec::new();
        menu.handle(&pending_events, input, &mut commands);
        pending_events.clear();

        if !menu.is_active() {
            commands.push(Command::Advance { input });
        }

        for command in commands {
            world::apply(&mut world, command, &mut pending_events);
        }
        log_events(&pending_events);

        *scene = capture_scene(&world, &menu, &bootstrap);
    })
}

fn export_level(level: u32) -> AnyResult<()> {
    let count = Bootstrap::default().level_count();
    let map = catalog_slot(level, count)?;
    let data = levels::get(map).ok_or_else(|| anyhow!("level {level} is not in the catalog"))?;

    println!("{}", LevelSnapshot::from_map(data).encode());
    Ok(())
}

fn preview_import(code: &str) -> AnyResult<()> {
    let snapshot = LevelSnapshot::decode(code).context("share code rejected")?;
    let level_bytes = snapshot.level_bytes();
    let data = MapData::new(&level_bytes);

    let mut visuals = Vec::with_capacity(usize::from(data.width()) * usize::from(data.height()));
    for y in 0..data.height() {
        for x in 0..data.width() {
            visuals.push(TileVisual::from_tile(data.tile_at(x, y)));
        }
    }
    let buttons_remaining = visuals
        .iter()
        .filter(|visual| matches!(visual, TileVisual::ButtonOff))
        .count();
    let board = BoardPresentation::new(data.width(), data.height(), visuals)?;

    info!(
        "imported a {}x{} level with {} disengaged buttons",
        data.width(),
        data.height(),
        buttons_remaining,
    );
    let scene = Scene::new(
        ScreenFlow::Gameplay,
        board,
        data.player_spawn(),
        GamePhase::Playing,
        HudPresentation::new(0, u32::try_from(buttons_remaining).unwrap_or(u32::MAX)),
        MenuPresentation::default(),
    );
    print!("{}", present_scene(&scene));
    Ok(())
}

/// Converts a player-facing level number into its catalog handle.
fn catalog_slot(level: u32, count: usize) -> AnyResult<MapId> {
    let Some(slot) = level.checked_sub(1) else {
        bail!("levels are numbered from 1");
    };
    if usize::try_from(slot).map_or(true, |slot| slot >= count) {
        bail!("level {level} is not in the catalog (1..={count})");
    }
    Ok(MapId::new(slot))
}

fn parse_script(script: &str) -> AnyResult<Vec<InputFrame>> {
    script.chars().map(frame_for).collect()
}

fn frame_for(step: char) -> AnyResult<InputFrame> {
    let frame = match step.to_ascii_uppercase() {
        'L' => InputFrame {
            left: true,
            ..InputFrame::default()
        },
        'R' => InputFrame {
            right: true,
            ..InputFrame::default()
        },
        'U' => InputFrame {
            up: true,
            ..InputFrame::default()
        },
        'D' => InputFrame {
            down: true,
            ..InputFrame::default()
        },
        'A' => InputFrame {
            confirm: true,
            ..InputFrame::default()
        },
        'B' => InputFrame {
            cancel: true,
            ..InputFrame::default()
        },
        '.' => InputFrame::default(),
        other => bail!("script step '{other}' is not one of L R U D A B ."),
    };
    Ok(frame)
}

fn log_events(events: &[Event]) {
    for event in events {
        debug!("event: {event:?}");
        match event {
            Event::MapLoaded {
                map,
                width,
                height,
                ..
            } => info!(
                "level {} loaded ({width}x{height})",
                map.get().saturating_add(1),
            ),
            Event::PhaseChanged { phase } => info!("phase changed: {phase:?}"),
            Event::ControlYielded { outcome } => info!("control returned to the menu: {outcome:?}"),
            Event::PlayerMoved { .. } | Event::TileChanged { .. } => {}
        }
    }
}

fn capture_scene(world: &World, menu: &LevelSelect, bootstrap: &Bootstrap) -> Scene {
    let flow = if menu.is_active() {
        ScreenFlow::LevelSelect
    } else {
        ScreenFlow::Gameplay
    };

    Scene::new(
        flow,
        BoardPresentation::from_view(bootstrap.board_view(world)),
        query::player(world),
        query::phase(world),
        HudPresentation::new(query::moves_taken(world), query::buttons_remaining(world)),
        MenuPresentation::new(menu.cursor(), bootstrap.level_count()),
    )
}

fn present_scene(scene: &Scene) -> String {
    match scene.flow {
        ScreenFlow::LevelSelect => present_menu(&scene.menu),
        ScreenFlow::Gameplay => present_board(scene),
    }
}

fn present_menu(menu: &MenuPresentation) -> String {
    let mut out = String::new();
    for slot in 0..menu.level_count {
        let marker = if slot == menu.cursor { '>' } else { ' ' };
        let _ = writeln!(out, "{marker} level {}", slot.saturating_add(1));
    }
    out
}

fn present_board(scene: &Scene) -> String {
    let mut out = String::new();
    for y in 0..scene.board.height {
        for x in 0..scene.board.width {
            let position = GridPos::new(x, y);
            if position == scene.player {
                out.push('@');
            } else {
                out.push(glyph_for(scene.board.visual(position)));
            }
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "moves: {}  buttons left: {}",
        scene.hud.moves_taken, scene.hud.buttons_remaining,
    );
    match scene.phase {
        GamePhase::Playing => {}
        GamePhase::Success => {
            let _ = writeln!(out, "level complete, press A or B to continue");
        }
        GamePhase::Failure => {
            let _ = writeln!(out, "the floor gave way, A retries and B abandons");
        }
    }
    out
}

const fn glyph_for(visual: TileVisual) -> char {
    match visual {
        TileVisual::Hole => ' ',
        TileVisual::Cracked(steps) => b'0'.saturating_add(steps) as char,
        TileVisual::Floor => '#',
        TileVisual::ButtonOff => '-',
        TileVisual::ButtonOn => '+',
    }
}

struct ScriptedBackend {
    frames: Vec<InputFrame>,
    max_frames: usize,
}

impl ScriptedBackend {
    fn new(frames: Vec<InputFrame>, max_frames: usize) -> Self {
        Self { frames, max_frames }
    }
}

impl RenderingBackend for ScriptedBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(InputFrame, &mut Scene) + 'static,
    {
        println!("{}", presentation.title);
        let mut scene = presentation.scene;
        print!("{}", present_scene(&scene));

        for (frame, input) in self.frames.into_iter().take(self.max_frames).enumerate() {
            if input.is_idle() {
                debug!("frame {frame}: waiting");
            } else {
                debug!("frame {frame}: {input:?}");
            }

            update_scene(input, &mut scene);
            println!();
            print!("{}", present_scene(&scene));
        }

        Ok(())
    }
}
