//! # Chunk Creation Module
//!
//! This module provides the builder that fills a chunk from the terrain
//! generator and hands it over fully classified.
//!
//! ## Fill order
//!
//! Columns are visited X outermost, then Z. Inside a column every height from
//! the floor up to the column's elevation (cut at the chunk top) receives a
//! block. Blocks above the floor whose density falls under the carve threshold
//! are inserted carved, which keeps them addressable for the rock test while
//! hiding them from rendering.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::{block::Block, terrain::TerrainGenerator};

use super::{Chunk, ChunkError, ChunkKey, NeighborLookup, RockRule};

/// A builder for creating and populating chunks.
///
/// The builder owns the chunk until [`ChunkBuilder::return_chunk`] runs the
/// classification pass, so a chunk is never observed half built.
pub struct ChunkBuilder {
    /// The chunk under construction
    chunk: Chunk,
}

impl ChunkBuilder {
    /// Starts an empty cubic chunk.
    ///
    /// # Arguments
    /// * `key` - Grid coordinate of the chunk
    /// * `size` - Edge length of the cube in blocks
    pub fn new(key: ChunkKey, size: usize) -> Self {
        ChunkBuilder {
            chunk: Chunk::new(key, size, size, size),
        }
    }

    /// Places every block the terrain holds inside this chunk.
    ///
    /// # Errors
    /// [`ChunkError::NoSpace`] if a block would land outside the grid.
    pub fn fill_from(mut self, terrain: &TerrainGenerator) -> Result<Self, ChunkError> {
        let (width, height, length) = self.chunk.dimensions();

        for x in 0..width as i32 {
            for z in 0..length as i32 {
                let column = self.chunk.to_world(Point3::new(x, 0, z));
                let column_height = terrain.column_height(column.x, column.z);

                for y in 0..height as i32 {
                    if !terrain.block_exists(column_height, y) {
                        continue;
                    }
                    let carved = terrain.is_carved_at(column.x, y, column.z);
                    let position = Vector3::new(column.x as f32, y as f32, column.z as f32);
                    self.chunk.add_block(Block::new(position, carved), x, y, z)?;
                }
            }
        }

        Ok(self)
    }

    /// Classifies the filled chunk and returns it.
    ///
    /// # Arguments
    /// * `lookup` - Answers for positions past the chunk's horizontal edges
    /// * `rule` - Which neighborhood marks a block as rock
    pub fn return_chunk(mut self, lookup: &dyn NeighborLookup, rule: RockRule) -> Chunk {
        self.chunk.classify(lookup, rule);
        self.chunk
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point2;

    use super::*;
    use crate::engine_state::voxels::{
        block::Material,
        chunk::NoNeighbors,
        terrain_noise::NoiseProfile,
    };

    fn terrain(height: u32) -> TerrainGenerator {
        TerrainGenerator::new(
            1337,
            &NoiseProfile::elevation(),
            &NoiseProfile::density(),
            height,
        )
    }

    fn build(key: ChunkKey, size: usize, terrain: &TerrainGenerator) -> Chunk {
        ChunkBuilder::new(key, size)
            .fill_from(terrain)
            .unwrap()
            .return_chunk(terrain, RockRule::Bracketed)
    }

    #[test]
    fn every_column_has_an_uncarved_ground_floor() {
        let terrain = terrain(8);
        let chunk = build(Point2::new(0, 0), 8, &terrain);

        for x in 0..8 {
            for z in 0..8 {
                let floor = chunk.get_block(x, 0, z).unwrap();
                assert!(!floor.is_carved());
                assert_eq!(floor.material, Material::Ground);
            }
        }
    }

    #[test]
    fn columns_are_filled_up_to_their_height() {
        let terrain = terrain(8);
        let chunk = build(Point2::new(-2, 3), 8, &terrain);

        let mut expected = 0;
        for x in 0..8 {
            for z in 0..8 {
                let column = chunk.to_world(Point3::new(x, 0, z));
                let height = terrain.column_height(column.x, column.z) as usize;
                expected += height.clamp(1, 8);
            }
        }
        assert_eq!(chunk.block_count(), expected);
    }

    #[test]
    fn block_positions_are_world_coordinates() {
        let terrain = terrain(8);
        let chunk = build(Point2::new(3, -1), 8, &terrain);

        for (local, block) in chunk.iter_blocks() {
            let world = chunk.to_world(local);
            assert_eq!(
                block.position,
                Vector3::new(world.x as f32, world.y as f32, world.z as f32)
            );
            assert_eq!(block.is_carved(), terrain.is_carved_at(world.x, world.y, world.z));
        }
    }

    #[test]
    fn same_terrain_builds_the_same_chunk() {
        let terrain = terrain(8);
        let a = build(Point2::new(5, 5), 8, &terrain);
        let b = ChunkBuilder::new(Point2::new(5, 5), 8)
            .fill_from(&terrain)
            .unwrap()
            .return_chunk(&NoNeighbors, RockRule::Bracketed);

        assert_eq!(a.block_count(), b.block_count());
        assert_eq!(a.carved_count(), b.carved_count());
    }
}
