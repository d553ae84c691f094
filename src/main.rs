//! Ledgehop main entry point.
//!
//! Opens the raylib window, assembles the world from the level and animation
//! files and runs the frame loop:
//!
//! 1. poll the keyboard into [`InputState`](ledgehop::resources::input::InputState)
//! 2. run the player controller, the fixed-step physics and the camera rig
//! 3. build the render queue and draw it
//!
//! Every step above is a system in the
//! [`SystemScheduler`](ledgehop::scheduler::SystemScheduler).
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --level assets/levels/level01.json
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;
use std::process::ExitCode;

use bevy_ecs::prelude::*;
use clap::Parser;
use ledgehop::game;
use ledgehop::resources::animationstore::AnimationStore;
use ledgehop::resources::debugmode::DebugMode;
use ledgehop::resources::gameconfig::GameConfig;
use ledgehop::resources::screensize::ScreenSize;
use ledgehop::resources::texturestore::TextureStore;
use ledgehop::scheduler::priority;
use ledgehop::systems::input::update_input_state;
use ledgehop::systems::render::render_system;

/// Ledgehop, a small 2D platformer
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file. Defaults are used when the default file is absent.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Level collision file.
    #[arg(long, value_name = "PATH", default_value = "assets/levels/level01.json")]
    level: PathBuf,

    /// Animation definitions file.
    #[arg(long, value_name = "PATH", default_value = "assets/animations.json")]
    animations: PathBuf,

    /// Start with debug overlays on.
    #[arg(long)]
    debug: bool,
}

fn load_config(cli: &Cli) -> Result<GameConfig, String> {
    match &cli.config {
        Some(path) => {
            let mut config = GameConfig::with_path(path);
            config.load_from_file()?;
            Ok(config)
        }
        None => {
            let mut config = GameConfig::new();
            if let Err(e) = config.load_from_file() {
                log::warn!("{}; using defaults", e);
            }
            Ok(config)
        }
    }
}

fn load_textures(
    rl: &mut raylib::RaylibHandle,
    thread: &raylib::RaylibThread,
    animations: &AnimationStore,
) -> Result<TextureStore, String> {
    let mut store = TextureStore::default();
    for (key, path) in animations.textures.iter() {
        let texture = rl
            .load_texture(thread, path)
            .map_err(|e| format!("Failed to load texture '{}' from {}: {}", key, path, e))?;
        log::info!("Loaded texture '{}' from {}", key, path);
        store.map.insert(key.clone(), texture);
    }
    Ok(store)
}

fn run(cli: Cli) -> Result<(), String> {
    let config = load_config(&cli)?;

    let mut world = World::new();
    game::setup_world(&mut world, &config);
    game::load_game(&mut world, &cli.level, &cli.animations)?;
    if cli.debug {
        world.insert_resource(DebugMode {});
    }

    let mut builder = raylib::init();
    builder
        .size(config.window_width as i32, config.window_height as i32)
        .resizable()
        .title("Ledgehop");
    if config.vsync {
        builder.vsync();
    }
    if config.fullscreen {
        builder.fullscreen();
    }
    let (mut rl, thread) = builder.build();
    if config.target_fps > 0 {
        rl.set_target_fps(config.target_fps);
    }
    // Disable ESC to exit
    rl.set_exit_key(None);

    let textures = load_textures(&mut rl, &thread, world.resource::<AnimationStore>())?;
    world.insert_resource(textures);
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);

    let mut scheduler = game::build_scheduler(&mut world)?;
    scheduler.add(&mut world, "input", priority::INPUT, update_input_state)?;
    scheduler.add(&mut world, "render", priority::RENDER, render_system)?;
    log::info!("Systems: {}", scheduler.names().join(", "));

    // --------------- Main loop ---------------
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
    {
        let (dt, w, h) = {
            let rl = world.non_send_resource::<raylib::RaylibHandle>();
            (rl.get_frame_time(), rl.get_screen_width(), rl.get_screen_height())
        };
        *world.resource_mut::<ScreenSize>() = ScreenSize { w, h };

        scheduler.run_frame(&mut world, dt)?;

        world.clear_trackers();
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
