//! # Terrain Module
//!
//! The `TerrainGenerator` turns the two noise fields into block decisions for
//! any world coordinate:
//! - the 2D elevation field gives the height of every column,
//! - the 3D density field decides which blocks above the floor are carved out.
//!
//! Because every answer is a pure function of the seed and the coordinate, the
//! generator doubles as the [`NeighborLookup`] for chunk edges: it reports what
//! an adjacent chunk contains without that chunk having to exist.

use cgmath::Point3;

use super::{
    chunk::{BlockProbe, NeighborLookup},
    terrain_noise::{normalize, NoiseField, NoiseProfile, NoiseSource, CARVE_DENSITY},
};

/// Height and carving decisions for the whole world.
pub struct TerrainGenerator {
    elevation: NoiseField,
    density: NoiseField,
    /// Vertical extent of every chunk; blocks are only placed below it.
    height: u32,
}

impl TerrainGenerator {
    /// Creates a generator for `seed` with the given noise profiles.
    ///
    /// # Arguments
    /// * `seed` - Seed of the shared noise source
    /// * `elevation` - 2D profile sampled for column heights
    /// * `density` - 3D profile sampled for carving
    /// * `height` - Vertical extent of a chunk in blocks
    pub fn new(seed: u32, elevation: &NoiseProfile, density: &NoiseProfile, height: u32) -> Self {
        let noise = NoiseSource::new(seed);
        TerrainGenerator {
            elevation: noise.field(elevation),
            density: noise.field(density),
            height,
        }
    }

    /// Normalized elevation of the world column `(wx, wz)`.
    pub fn column_height(&self, wx: i32, wz: i32) -> u32 {
        let raw = self.elevation.sample_2d(wx as f64, wz as f64);
        normalize(raw as f32)
    }

    /// Normalized density at the world position `(wx, y, wz)`.
    pub fn density_at(&self, wx: i32, y: i32, wz: i32) -> u32 {
        let raw = self.density.sample_3d(wx as f64, y as f64, wz as f64);
        normalize(raw as f32)
    }

    /// Whether a column of height `column_height` holds a block at `y`.
    ///
    /// Every column has a floor block, even where the elevation is zero.
    pub fn block_exists(&self, column_height: u32, y: i32) -> bool {
        if y < 0 || y >= self.height as i32 {
            return false;
        }
        y == 0 || (y as u32) < column_height
    }

    /// Whether the block at `(wx, y, wz)` is carved out. The floor never is.
    pub fn is_carved_at(&self, wx: i32, y: i32, wz: i32) -> bool {
        y > 0 && self.density_at(wx, y, wz) < CARVE_DENSITY
    }
}

impl NeighborLookup for TerrainGenerator {
    fn probe(&self, world: Point3<i32>) -> BlockProbe {
        let column_height = self.column_height(world.x, world.z);
        if !self.block_exists(column_height, world.y) {
            BlockProbe::Absent
        } else if self.is_carved_at(world.x, world.y, world.z) {
            BlockProbe::Carved
        } else {
            BlockProbe::Solid
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point2;

    use super::*;
    use crate::engine_state::voxels::chunk::{ChunkBuilder, NoNeighbors, RockRule};

    fn generator(height: u32) -> TerrainGenerator {
        TerrainGenerator::new(
            1337,
            &NoiseProfile::elevation(),
            &NoiseProfile::density(),
            height,
        )
    }

    #[test]
    fn floor_always_exists_and_is_never_carved() {
        let terrain = generator(16);
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let (wx, wz) = (rng.i32(-500..500), rng.i32(-500..500));
            assert!(terrain.block_exists(terrain.column_height(wx, wz), 0));
            assert!(!terrain.is_carved_at(wx, 0, wz));
            assert_eq!(terrain.probe(Point3::new(wx, 0, wz)), BlockProbe::Solid);
        }
    }

    #[test]
    fn block_exists_respects_column_and_chunk_height() {
        let terrain = generator(8);
        assert!(terrain.block_exists(0, 0));
        assert!(!terrain.block_exists(0, 1));
        assert!(terrain.block_exists(5, 4));
        assert!(!terrain.block_exists(5, 5));
        // column taller than the chunk is cut at the top
        assert!(terrain.block_exists(40, 7));
        assert!(!terrain.block_exists(40, 8));
        assert!(!terrain.block_exists(40, -1));
    }

    #[test]
    fn heights_stay_on_the_normalized_scale() {
        let terrain = generator(64);
        for wx in -40..40 {
            for wz in -40..40 {
                assert!(terrain.column_height(wx, wz) <= 48);
            }
        }
    }

    #[test]
    fn generators_with_the_same_seed_agree() {
        let a = generator(32);
        let b = generator(32);
        for (wx, y, wz) in [(0, 3, 0), (-17, 9, 44), (120, 20, -3)] {
            assert_eq!(a.column_height(wx, wz), b.column_height(wx, wz));
            assert_eq!(a.density_at(wx, y, wz), b.density_at(wx, y, wz));
        }
    }

    #[test]
    fn lookup_matches_the_adjacent_chunk() {
        let terrain = generator(8);
        let neighbor = ChunkBuilder::new(Point2::new(1, 0), 8)
            .fill_from(&terrain)
            .unwrap()
            .return_chunk(&NoNeighbors, RockRule::Bracketed);

        for x in 0..8 {
            for y in 0..8 {
                for z in 0..8 {
                    let local = Point3::new(x, y, z);
                    assert_eq!(
                        terrain.probe(neighbor.to_world(local)),
                        neighbor.probe(x, y, z),
                        "disagreement at local {:?}",
                        local
                    );
                }
            }
        }
    }
}
