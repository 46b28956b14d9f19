//! # Chunk Iteration Module
//!
//! An iterator over every placed block in a chunk, carved ones included,
//! together with its local grid position.
//!
//! Blocks are visited in storage order: X outermost, then Y, then Z. The
//! classification pass and the instance batches rely on this order, so
//! instance lists come out identical for identical terrain.

use cgmath::Point3;

use crate::engine_state::voxels::block::Block;

use super::Chunk;

/// Iterator over `(local position, block)` pairs of a chunk.
pub struct ChunkBlockIterator<'a> {
    chunk_ref: &'a Chunk,
    /// Next flat index into the chunk's block storage
    offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates an iterator positioned before the first block of `chunk_ref`.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            offset: 0,
        }
    }

    fn position_of(&self, offset: usize) -> Point3<i32> {
        let (_, height, length) = self.chunk_ref.dimensions();
        let z = offset % length;
        let y = (offset / length) % height;
        let x = offset / (length * height);
        Point3::new(x as i32, y as i32, z as i32)
    }
}

impl<'a> Iterator for ChunkBlockIterator<'a> {
    type Item = (Point3<i32>, &'a Block);

    fn next(&mut self) -> Option<Self::Item> {
        let blocks = &self.chunk_ref.blocks;
        while self.offset < blocks.len() {
            let offset = self.offset;
            self.offset += 1;
            if let Some(block) = &blocks[offset] {
                return Some((self.position_of(offset), block));
            }
        }
        None
    }
}

impl Chunk {
    /// Iterates over every placed block with its local position.
    pub fn iter_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }
}
