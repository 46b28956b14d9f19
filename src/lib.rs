#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! Procedural block terrain streamed in chunks around a moving camera.
//!
//! The terrain is generated from two seeded noise fields: a 2D elevation
//! field that sets the height of every column and a 3D density field that
//! carves caves out of it. The world is split into cubic chunks that are
//! generated on demand, classified block by block (culling, materials) and
//! drawn as one instanced call per material.
//!
//! ## Key Modules
//!
//! * `config` - Startup settings loaded from JSON and the environment
//! * `engine_state` - The frame loop, the camera, the chunk manager and the draw seam
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_terrain::{ChunkManager, WorldConfig};
//!
//! let config = WorldConfig { chunk_size: 16, ..WorldConfig::default() };
//! let mut world = ChunkManager::new(&config).unwrap();
//!
//! let visible = world.visible_chunks(Point3::new(0.0, 20.0, 0.0), None).unwrap();
//! assert_eq!(visible.chunks.len(), 9);
//! ```
//!
//! The binary runs a headless flight over the terrain and logs what it would
//! have drawn. Logging goes to stdout at `info` and follows `RUST_LOG`.

use log::{error, info};
use web_time::{Duration, Instant};

pub mod config;
pub mod engine_state;

pub use config::{ConfigError, WorldConfig};
pub use engine_state::{
    rendering::{DrawStats, RenderAdapter},
    voxels::{
        block::{Block, Material},
        chunk::{Chunk, ChunkError, ChunkKey, InstanceTransform, RockRule},
        terrain::TerrainGenerator,
        terrain_noise::{normalize, NoiseField, NoiseProfile, NoiseSource},
        world::{ChunkManager, EdgePolicy, VisibleChunks},
    },
    EngineError, EngineState,
};

/// Initializes logging and flies the camera over the terrain.
///
/// Errors are logged, not returned.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    if let Err(err) = run_demo() {
        error!("{}", err);
    }
}

fn run_demo() -> Result<(), EngineError> {
    let config = WorldConfig::from_env()?;
    info!(
        "Seed {}, chunk size {}, edge policy {:?}, rock rule {:?}",
        config.seed, config.chunk_size, config.edge_policy, config.rock_rule
    );

    let mut engine = EngineState::new(&config)?;
    let frame_time = Duration::from_secs_f64(1.0 / config.demo.frame_rate.max(1) as f64);
    let mut stats = DrawStats::default();

    let started = Instant::now();
    for _ in 0..config.demo.frames {
        engine.update(frame_time)?;
        stats.reset();
        engine.render(&mut stats);
    }

    info!(
        "Flew {} frames in {:?}: {} chunks generated, {} loaded",
        config.demo.frames,
        started.elapsed(),
        engine.world.generated_count(),
        engine.world.loaded_count()
    );
    info!(
        "Last frame: {} draws, {} instances",
        stats.draws, stats.instances
    );
    for (material, instances) in &stats.per_material {
        info!(
            "  {}: {} instances ({})",
            material,
            instances,
            material.texture_name()
        );
    }

    Ok(())
}
