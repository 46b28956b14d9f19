//! # Engine State Module
//!
//! The per-frame coordinator of the voxel terrain.
//!
//! ## Key Components
//!
//! * `EngineState` - Ties the camera, the chunk manager and the renderer together
//! * `camera_state` - Camera positioning and movement
//! * `rendering` - The draw seam and its headless implementation
//! * `voxels` - Blocks, chunks, terrain generation and the chunk manager
//!
//! ## Frame
//!
//! 1. The camera moves.
//! 2. The chunk manager resolves the camera's chunk and its eight neighbors,
//!    generating any that are missing.
//! 3. Every visible chunk is drawn, one instanced call per material.
//!
//! The only state carried from one frame to the next is the key of the chunk
//! the camera was in, which the engine hands back to the chunk manager.

use std::rc::Rc;

use camera_state::CameraState;
use log::{debug, trace};
use rendering::RenderAdapter;
use thiserror::Error;
use voxels::{
    chunk::{Chunk, ChunkError, ChunkKey},
    world::ChunkManager,
};

use crate::config::{ConfigError, WorldConfig};

pub mod camera_state;
pub mod rendering;
pub mod voxels;

/// Errors that stop the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The configuration cannot build a world
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// A chunk could not be generated
    #[error("Chunk generation failed: {0}")]
    Chunk(#[from] ChunkError),
}

/// The main state container of the voxel terrain.
///
/// # Examples
///
/// ```
/// use voxel_terrain::{DrawStats, EngineState, WorldConfig};
/// use web_time::Duration;
///
/// let config = WorldConfig { chunk_size: 8, ..WorldConfig::default() };
/// let mut engine = EngineState::new(&config).unwrap();
/// let mut stats = DrawStats::default();
///
/// engine.update(Duration::from_millis(16)).unwrap();
/// engine.render(&mut stats);
/// assert!(stats.draws > 0);
/// ```
pub struct EngineState {
    /// Camera position and movement
    pub camera_state: CameraState,
    /// All loaded chunks and the terrain behind them
    pub world: ChunkManager,
    /// Chunk the camera was in at the last update
    current_chunk: Option<ChunkKey>,
    /// Chunks drawn by the next `render` call
    visible: Vec<Rc<Chunk>>,
}

impl EngineState {
    /// Builds the world and places the camera.
    ///
    /// Chunks are not generated until the first [`EngineState::update`].
    pub fn new(config: &WorldConfig) -> Result<Self, EngineError> {
        let world = ChunkManager::new(config)?;
        let camera_state = CameraState::new(&config.camera, config.demo.wander_seed);

        Ok(EngineState {
            camera_state,
            world,
            current_chunk: None,
            visible: Vec::new(),
        })
    }

    /// Key of the chunk the camera was in at the last update.
    pub fn current_chunk(&self) -> Option<ChunkKey> {
        self.current_chunk
    }

    /// Chunks drawn by the next [`EngineState::render`], current chunk first.
    pub fn visible_chunks(&self) -> &[Rc<Chunk>] {
        &self.visible
    }

    /// Moves the camera and refreshes the visible chunks.
    ///
    /// # Arguments
    /// * `dt` - Time elapsed since the last frame
    pub fn update(&mut self, dt: web_time::Duration) -> Result<(), EngineError> {
        let position = self.camera_state.update(dt);
        let visible = self.world.visible_chunks(position, self.current_chunk)?;

        if self.current_chunk != Some(visible.current) {
            debug!("{}", self.world.debug_report(position));
        }
        self.current_chunk = Some(visible.current);
        self.visible = visible.chunks;

        Ok(())
    }

    /// Draws every visible chunk through `adapter`.
    ///
    /// # Returns
    /// The number of draw calls issued
    pub fn render(&self, adapter: &mut dyn RenderAdapter) -> usize {
        let draws = rendering::render_chunks(self.visible.iter().map(|chunk| &**chunk), adapter);
        trace!("Frame issued {} draws", draws);
        draws
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point2;
    use web_time::Duration;

    use super::*;
    use crate::config::CameraConfig;
    use rendering::DrawStats;

    fn config() -> WorldConfig {
        WorldConfig {
            chunk_size: 8,
            max_loaded_chunks: 12,
            camera: CameraConfig {
                start: [0.0, 10.0, 0.0],
                speed: 8.0,
                ..CameraConfig::default()
            },
            ..WorldConfig::default()
        }
    }

    #[test]
    fn nothing_is_drawn_before_the_first_update() {
        let engine = EngineState::new(&config()).unwrap();
        let mut stats = DrawStats::default();

        assert_eq!(engine.render(&mut stats), 0);
        assert_eq!(engine.current_chunk(), None);
        assert_eq!(engine.world.generated_count(), 0);
    }

    #[test]
    fn update_tracks_the_camera_chunk() {
        let mut engine = EngineState::new(&config()).unwrap();

        engine.update(Duration::from_millis(100)).unwrap();
        assert_eq!(engine.current_chunk(), Some(Point2::new(0, 0)));
        assert_eq!(engine.visible_chunks().len(), 9);
        assert_eq!(engine.world.generated_count(), 9);

        // one second along +X at 8 blocks/s crosses into the next chunk
        engine.update(Duration::from_secs(1)).unwrap();
        assert_eq!(engine.current_chunk(), Some(Point2::new(1, 0)));
        assert_eq!(engine.visible_chunks()[0].key, Point2::new(1, 0));
        assert_eq!(engine.world.generated_count(), 12);
        assert!(engine.world.loaded_count() <= 12);
    }

    #[test]
    fn render_draws_every_visible_batch() {
        let mut engine = EngineState::new(&config()).unwrap();
        engine.update(Duration::from_millis(16)).unwrap();

        let mut stats = DrawStats::default();
        let draws = engine.render(&mut stats);

        let expected_draws: usize = engine
            .visible_chunks()
            .iter()
            .map(|chunk| chunk.instances().draw_count())
            .sum();
        let expected_instances: usize = engine
            .visible_chunks()
            .iter()
            .map(|chunk| chunk.instances().total())
            .sum();
        assert_eq!(draws, expected_draws);
        assert_eq!(stats.draws, expected_draws);
        assert_eq!(stats.instances, expected_instances);
    }

    #[test]
    fn invalid_config_is_reported() {
        let config = WorldConfig {
            chunk_size: 0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            EngineState::new(&config),
            Err(EngineError::Config(ConfigError::ChunkSizeZero))
        ));
    }
}
