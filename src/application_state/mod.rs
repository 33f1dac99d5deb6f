//! # Application State Management
//!
//! This module handles the application's lifecycle around the engine:
//! - Configuration loading and validation
//! - Scripted input standing in for a keyboard and mouse
//! - The fixed-timestep frame loop of the headless demo

pub mod config;
pub mod input_script;

use cgmath::Point3;
use log::info;
use web_time::{Duration, Instant};

use config::{AppConfig, ConfigError};
use input_script::InputScript;

use crate::engine_state::{rendering::DrawListRenderer, EngineState, FrameReport};

/// Totals of a demo run.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoSummary {
    /// Frames run
    pub frames: u32,
    /// Frames whose activation pass was not skipped
    pub activation_passes: u32,
    /// Meshes built over the whole run
    pub meshes_rebuilt: usize,
    /// Chunks in the registry at the end
    pub chunks_created: usize,
    /// Where the player ended up
    pub final_position: Point3<f32>,
}

/// The main application state container.
///
/// Owns the engine, drives it with scripted input and keeps frame timing.
pub struct ApplicationState {
    /// The core engine state and logic
    pub engine_state: EngineState<DrawListRenderer>,
    /// Source of per-frame input
    pub script: InputScript,
    /// Simulated time between frames
    pub frame_time: Duration,
    /// Frames run by [`ApplicationState::run`]
    pub demo_frames: u32,
}

impl ApplicationState {
    /// Builds the engine described by `config`.
    ///
    /// # Errors
    /// Returns the first invalid setting found.
    pub fn new(config: AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let world = config.world.build_world()?;
        let player = config.player.build_player();
        info!(
            "Creating world: {:?} chunks, draw distance {}, {:?} generation",
            config.world.chunk_extents, config.world.draw_distance, config.world.generation
        );

        let engine_state =
            EngineState::new(world, player, config.player.sensitivity, DrawListRenderer::new());

        Ok(ApplicationState {
            engine_state,
            script: InputScript::new(config.demo.script),
            frame_time: Duration::from_millis(config.demo.frame_time_ms),
            demo_frames: config.demo.frames,
        })
    }

    /// Runs `frames` frames and returns what each of them did.
    pub fn run_frames(&mut self, frames: u32) -> Vec<FrameReport> {
        (0..frames).map(|_| self.step()).collect()
    }

    /// Runs the configured demo.
    pub fn run(&mut self) -> DemoSummary {
        let start = Instant::now();
        let mut summary = DemoSummary {
            frames: 0,
            activation_passes: 0,
            meshes_rebuilt: 0,
            chunks_created: 0,
            final_position: self.engine_state.player().position,
        };

        for _ in 0..self.demo_frames {
            let report = self.step();
            summary.frames += 1;
            if !report.activation.skipped {
                summary.activation_passes += 1;
            }
            summary.meshes_rebuilt += report.meshes_rebuilt;
            summary.final_position = report.player_position;
        }
        summary.chunks_created = self.engine_state.world().registry_len();

        info!(
            "Demo finished in {:?}: {} frames, {} activation passes, {} meshes built, {} chunks, player at {:?}",
            start.elapsed(),
            summary.frames,
            summary.activation_passes,
            summary.meshes_rebuilt,
            summary.chunks_created,
            summary.final_position
        );

        summary
    }

    fn step(&mut self) -> FrameReport {
        let actions = self.script.next_action();
        self.engine_state.frame(self.frame_time, &actions)
    }
}
