//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size 3D grid of terrain
//! blocks together with the per-material instance transforms that feed the
//! renderer.
//!
//! ## Addressing
//!
//! Blocks are addressed by local integer coordinates in
//! `[0, width) × [0, height) × [0, length)`. Every query accepts any `i32`
//! coordinate: positions outside the grid (including negative ones) simply
//! report "no block". Only insertion outside the grid is an error.
//!
//! ## World placement
//!
//! A chunk is identified by its [`ChunkKey`], an integer grid coordinate. Its
//! center sits at `key * width` in world space and the chunk covers
//! `[center - width/2, center + width/2)` on X (likewise Z on the key's `y`
//! component). Chunks are not stacked vertically: local Y equals world Y.
//!
//! ## Edges
//!
//! Culling needs to look one block past the grid. What lies there is answered
//! by a [`NeighborLookup`] passed to the classification pass.

use cgmath::{Point2, Point3};
use thiserror::Error;

use super::block::Block;

pub use chunk_classification::RockRule;
pub use chunk_creation::ChunkBuilder;
pub use instance_batches::{InstanceBatches, InstanceTransform};

mod chunk_classification;
mod chunk_creation;
pub mod chunk_iteration;
mod instance_batches;

/// Integer grid coordinate of a chunk. The `y` component is the world Z axis.
pub type ChunkKey = Point2<i32>;

/// Errors raised while filling a chunk.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ChunkError {
    /// The insertion coordinate lies outside the chunk grid.
    #[error("not enough space to add block at ({x}, {y}, {z})")]
    NoSpace {
        /// Local X coordinate of the rejected insertion
        x: i32,
        /// Local Y coordinate of the rejected insertion
        y: i32,
        /// Local Z coordinate of the rejected insertion
        z: i32,
    },
}

/// What occupies a block position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockProbe {
    /// Nothing is there
    Absent,
    /// A present, uncarved block
    Solid,
    /// A block that has been carved out
    Carved,
}

impl BlockProbe {
    /// Whether the position holds a block that counts for neighbor checks.
    pub fn is_present(self) -> bool {
        self == BlockProbe::Solid
    }
}

/// Answers what occupies a world position outside the chunk being classified.
pub trait NeighborLookup {
    /// Probes the block at world coordinate `world`.
    fn probe(&self, world: Point3<i32>) -> BlockProbe;
}

/// A lookup that treats everything beyond the chunk as empty.
pub struct NoNeighbors;

impl NeighborLookup for NoNeighbors {
    fn probe(&self, _world: Point3<i32>) -> BlockProbe {
        BlockProbe::Absent
    }
}

/// A fixed-size grid of terrain blocks.
pub struct Chunk {
    /// Grid coordinate of this chunk.
    pub key: ChunkKey,
    width: usize,
    height: usize,
    length: usize,
    /// Blocks in x-major, then y, then z order; `None` where nothing was placed.
    blocks: Vec<Option<Block>>,
    instances: InstanceBatches,
}

impl Chunk {
    /// Creates an empty chunk with fixed dimensions.
    pub fn new(key: ChunkKey, width: usize, height: usize, length: usize) -> Self {
        Chunk {
            key,
            width,
            height,
            length,
            blocks: vec![None; width * height * length],
            instances: InstanceBatches::default(),
        }
    }

    /// `(width, height, length)` of the grid.
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.length)
    }

    /// World-space XZ center of the chunk.
    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            self.key.x.saturating_mul(self.width as i32) as f32,
            self.key.y.saturating_mul(self.length as i32) as f32,
        )
    }

    /// World coordinate of the local grid position `local`.
    ///
    /// Saturates at the `i32` range for keys too far out to address.
    pub fn to_world(&self, local: Point3<i32>) -> Point3<i32> {
        let axis = |key: i32, size: usize, local: i32| {
            key.saturating_mul(size as i32)
                .saturating_add(local)
                .saturating_sub((size / 2) as i32)
        };
        Point3::new(
            axis(self.key.x, self.width, local.x),
            local.y,
            axis(self.key.y, self.length, local.z),
        )
    }

    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        if x >= self.width || y >= self.height || z >= self.length {
            return None;
        }
        Some((x * self.height + y) * self.length + z)
    }

    /// Whether `(x, y, z)` lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        self.index(x, y, z).is_some()
    }

    /// The block at `(x, y, z)`, carved or not. `None` outside the grid.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<&Block> {
        self.index(x, y, z).and_then(|i| self.blocks[i].as_ref())
    }

    pub(crate) fn block_mut(&mut self, at: Point3<i32>) -> Option<&mut Block> {
        let index = self.index(at.x, at.y, at.z)?;
        self.blocks[index].as_mut()
    }

    /// Whether a present, uncarved block occupies `(x, y, z)`.
    pub fn has_block(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z).is_some_and(|b| !b.is_carved())
    }

    /// Whether the block at `(x, y, z)` will be drawn.
    pub fn is_enabled(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z)
            .is_some_and(|b| b.is_enabled() && !b.is_carved())
    }

    /// Whether the block at `(x, y, z)` exists and is carved out.
    pub fn is_carved(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z).is_some_and(|b| b.is_carved())
    }

    /// Probes a local position inside the grid.
    pub fn probe(&self, x: i32, y: i32, z: i32) -> BlockProbe {
        match self.get_block(x, y, z) {
            None => BlockProbe::Absent,
            Some(block) if block.is_carved() => BlockProbe::Carved,
            Some(_) => BlockProbe::Solid,
        }
    }

    /// Places `block` at `(x, y, z)`, replacing whatever was there.
    ///
    /// # Errors
    /// [`ChunkError::NoSpace`] if the position is outside the grid.
    pub fn add_block(&mut self, block: Block, x: i32, y: i32, z: i32) -> Result<(), ChunkError> {
        let index = self.index(x, y, z).ok_or(ChunkError::NoSpace { x, y, z })?;
        self.blocks[index] = Some(block);
        Ok(())
    }

    /// Number of placed blocks, carved ones included.
    pub fn block_count(&self) -> usize {
        self.blocks.iter().flatten().count()
    }

    /// Number of carved blocks.
    pub fn carved_count(&self) -> usize {
        self.blocks.iter().flatten().filter(|b| b.is_carved()).count()
    }

    /// Per-material transforms of every visible block.
    pub fn instances(&self) -> &InstanceBatches {
        &self.instances
    }
}
