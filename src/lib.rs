#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Minecum
//!
//! The chunk streaming and activation core of a voxel engine.
//!
//! The world is an unbounded grid of fixed-size chunk columns. Around the player the engine
//! keeps a square of active chunks: every active chunk has its four lateral neighbors
//! generated and linked, and carries a mesh built with faces between chunks culled. Chunks
//! are created on demand and kept for the lifetime of the world.
//!
//! ## Key Modules
//!
//! * `application_state` - Configuration, scripted input and the demo run loop
//! * `engine_state` - The per-frame pipeline: camera, player, world streaming, meshing, drawing
//!
//! ## Architecture
//!
//! Drawing goes through the [`engine_state::rendering::ChunkRenderer`] trait, so the core
//! runs headless. The bundled binary runs a scripted demo against a renderer that only
//! records draw calls.
//!
//! ## Usage
//!
//! ```text
//! MINECUM_CONFIG=demo.json RUST_LOG=info cargo run --release
//! ```

use application_state::{
    config::{AppConfig, ConfigError},
    ApplicationState, DemoSummary,
};
use log::{error, info};

pub mod application_state;
pub mod engine_state;

/// Initializes logging, loads the configuration and runs the demo.
///
/// # Errors
/// Returns the configuration error that prevented startup, after logging it.
pub fn run() -> Result<DemoSummary, ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let mut state = AppConfig::from_env()
        .and_then(ApplicationState::new)
        .inspect_err(|e| error!("Startup failed: {e}"))?;

    Ok(state.run())
}
