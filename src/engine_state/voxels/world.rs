//! # World Module
//!
//! This module provides the `ChunkManager`, which owns every loaded chunk of
//! the voxel world and streams chunks in around the camera.
//!
//! ## Architecture
//!
//! Chunks live in an LRU cache keyed by their [`ChunkKey`]. A lookup either
//! returns the cached chunk or generates it from the terrain on the spot, so
//! the world is effectively infinite while memory stays bounded. Generation is
//! deterministic: a chunk that was evicted comes back identical.
//!
//! ## Visibility
//!
//! The camera's chunk is found by floor division of its position. It is drawn
//! together with its eight horizontal neighbors, listed by [`Direction::ALL`].
//!
//! ## Performance Considerations
//!
//! - Chunks are generated inline the first time they come into range
//! - Loaded chunks are shared as `Rc<Chunk>` and never mutated afterwards
//! - The cache must hold at least one full neighborhood ([`MIN_LOADED_CHUNKS`])

use std::{fmt::Write as _, num::NonZeroUsize, rc::Rc};

use cgmath::{MetricSpace, Point2, Point3, Vector2};
use log::{debug, info};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::config::{ConfigError, WorldConfig};

use super::{
    chunk::{Chunk, ChunkBuilder, ChunkError, ChunkKey, NeighborLookup, NoNeighbors, RockRule},
    terrain::TerrainGenerator,
};

/// Chunks visible at once: the camera's chunk and its eight neighbors.
pub const MIN_LOADED_CHUNKS: usize = 9;

/// Largest accepted chunk edge length in blocks.
pub const MAX_CHUNK_SIZE: usize = 256;

/// How the classification pass sees past a chunk's horizontal edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgePolicy {
    /// Positions past the edge are answered from the terrain itself
    #[default]
    Seamless,
    /// Positions past the edge are empty
    Isolated,
}

/// A horizontal neighbor of a chunk. North is +Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// +Z
    North,
    /// +X, +Z
    NorthEast,
    /// +X
    East,
    /// +X, -Z
    SouthEast,
    /// -Z
    South,
    /// -X, -Z
    SouthWest,
    /// -X
    West,
    /// -X, +Z
    NorthWest,
}

impl Direction {
    /// Every neighbor direction, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Offset of the neighbor in chunk-key space.
    pub fn offset(self) -> Vector2<i32> {
        match self {
            Direction::North => Vector2::new(0, 1),
            Direction::NorthEast => Vector2::new(1, 1),
            Direction::East => Vector2::new(1, 0),
            Direction::SouthEast => Vector2::new(1, -1),
            Direction::South => Vector2::new(0, -1),
            Direction::SouthWest => Vector2::new(-1, -1),
            Direction::West => Vector2::new(-1, 0),
            Direction::NorthWest => Vector2::new(-1, 1),
        }
    }

    /// Key of the neighbor of `key` in this direction, saturating at the
    /// edge of the key range.
    pub fn step(self, key: ChunkKey) -> ChunkKey {
        let offset = self.offset();
        Point2::new(key.x.saturating_add(offset.x), key.y.saturating_add(offset.y))
    }
}

/// The chunks to draw this frame.
pub struct VisibleChunks {
    /// Key of the chunk containing the camera; pass it back next frame.
    pub current: ChunkKey,
    /// The current chunk first, then one chunk per [`Direction::ALL`] entry.
    pub chunks: Vec<Rc<Chunk>>,
}

/// Owns the loaded chunks and generates missing ones on demand.
///
/// # Examples
///
/// ```
/// use cgmath::Point2;
/// use voxel_terrain::{ChunkManager, WorldConfig};
///
/// let config = WorldConfig { chunk_size: 8, ..WorldConfig::default() };
/// let mut world = ChunkManager::new(&config).unwrap();
///
/// let chunk = world.get_chunk(Point2::new(0, 0)).unwrap();
/// assert!(chunk.block_count() >= 64);
/// assert_eq!(world.generated_count(), 1);
/// ```
pub struct ChunkManager {
    /// Loaded chunks, least recently used evicted first.
    chunks: LruCache<ChunkKey, Rc<Chunk>>,
    terrain: TerrainGenerator,
    chunk_size: usize,
    edge_policy: EdgePolicy,
    rock_rule: RockRule,
    /// Chunks generated since creation, regenerations included.
    generated: usize,
}

impl ChunkManager {
    /// Creates an empty world from `config`.
    ///
    /// # Errors
    /// Any [`ConfigError`] reported by [`WorldConfig::validate`].
    pub fn new(config: &WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let capacity =
            NonZeroUsize::new(config.max_loaded_chunks).ok_or(ConfigError::CacheTooSmall {
                requested: config.max_loaded_chunks,
                minimum: MIN_LOADED_CHUNKS,
            })?;

        let terrain = TerrainGenerator::new(
            config.seed,
            &config.elevation,
            &config.density,
            config.chunk_size as u32,
        );

        Ok(ChunkManager {
            chunks: LruCache::new(capacity),
            terrain,
            chunk_size: config.chunk_size,
            edge_policy: config.edge_policy,
            rock_rule: config.rock_rule,
            generated: 0,
        })
    }

    /// Returns the chunk at `key`, generating it if it is not loaded.
    ///
    /// A cached chunk is marked as most recently used. Generating a chunk may
    /// evict the least recently used one.
    ///
    /// # Arguments
    /// * `key` - Grid coordinate of the chunk
    ///
    /// # Returns
    /// A shared handle to the chunk; repeated calls return the same `Rc`
    /// while the chunk stays loaded.
    pub fn get_chunk(&mut self, key: ChunkKey) -> Result<Rc<Chunk>, ChunkError> {
        if let Some(chunk) = self.chunks.get(&key) {
            return Ok(Rc::clone(chunk));
        }

        let chunk = Rc::new(self.generate(key)?);
        self.generated += 1;

        if let Some((evicted, _)) = self.chunks.push(key, Rc::clone(&chunk)) {
            if evicted != key {
                debug!("Evicted chunk {:?}", evicted);
            }
        }

        Ok(chunk)
    }

    fn generate(&self, key: ChunkKey) -> Result<Chunk, ChunkError> {
        let started = Instant::now();

        let lookup: &dyn NeighborLookup = match self.edge_policy {
            EdgePolicy::Seamless => &self.terrain,
            EdgePolicy::Isolated => &NoNeighbors,
        };
        let chunk = ChunkBuilder::new(key, self.chunk_size)
            .fill_from(&self.terrain)?
            .return_chunk(lookup, self.rock_rule);

        debug!(
            "Generated chunk {:?} in {:?}: {} blocks, {} carved, {} instances",
            key,
            started.elapsed(),
            chunk.block_count(),
            chunk.carved_count(),
            chunk.instances().total()
        );

        Ok(chunk)
    }

    /// Key of the chunk containing the world position `position`.
    ///
    /// Chunk `k` starts at `k * size - size / 2` and spans `size` blocks on each
    /// horizontal axis; the height is ignored.
    ///
    /// Keys are clamped so that the chunk and its neighbors keep their block
    /// coordinates inside `i32`.
    pub fn chunk_key_at(&self, position: Point3<f32>) -> ChunkKey {
        let size = self.chunk_size as f32;
        let half = (self.chunk_size / 2) as f32;
        let limit = self.key_limit();
        let key = |at: f32| (((at + half) / size).floor() as i32).clamp(-limit, limit);
        Point2::new(key(position.x), key(position.z))
    }

    /// Largest key magnitude whose neighborhood stays addressable.
    fn key_limit(&self) -> i32 {
        i32::MAX / self.chunk_size as i32 - 2
    }

    /// World-space XZ center of the chunk at `key`.
    pub fn center_of(&self, key: ChunkKey) -> Point2<f32> {
        let size = self.chunk_size as i32;
        Point2::new(
            key.x.saturating_mul(size) as f32,
            key.y.saturating_mul(size) as f32,
        )
    }

    /// Collects the chunks around `camera`, generating any that are missing.
    ///
    /// # Arguments
    /// * `camera` - World position of the camera
    /// * `previous` - The `current` key returned on the previous frame, if any
    ///
    /// # Returns
    /// The current chunk followed by its eight neighbors, each fetched once.
    pub fn visible_chunks(
        &mut self,
        camera: Point3<f32>,
        previous: Option<ChunkKey>,
    ) -> Result<VisibleChunks, ChunkError> {
        let current = self.chunk_key_at(camera);
        if previous != Some(current) {
            info!("Camera entered chunk {:?} (from {:?})", current, previous);
        }

        let mut chunks = Vec::with_capacity(MIN_LOADED_CHUNKS);
        chunks.push(self.get_chunk(current)?);
        for direction in Direction::ALL {
            chunks.push(self.get_chunk(direction.step(current))?);
        }

        Ok(VisibleChunks { current, chunks })
    }

    /// Number of chunks currently held in memory.
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of chunks generated so far, regenerations included.
    pub fn generated_count(&self) -> usize {
        self.generated
    }

    /// Whether the chunk at `key` is loaded. Does not affect eviction order.
    pub fn contains(&self, key: ChunkKey) -> bool {
        self.chunks.contains(&key)
    }

    /// A short multi-line description of where the camera is in the grid.
    pub fn debug_report(&self, camera: Point3<f32>) -> String {
        let current = self.chunk_key_at(camera);
        let center = self.center_of(current);
        let distance = Point2::new(camera.x, camera.z).distance(center);

        let mut report = String::new();
        let _ = writeln!(report, "camera xz: ({:.2}, {:.2})", camera.x, camera.z);
        let _ = writeln!(
            report,
            "chunk: ({}, {}) centered at ({}, {})",
            current.x, current.y, center.x, center.y
        );
        let _ = writeln!(report, "distance to center: {:.2}", distance);
        let _ = write!(
            report,
            "chunks loaded: {} / generated: {}",
            self.loaded_count(),
            self.generated
        );
        report
    }
}
