//! # Chunk Classification Module
//!
//! The pass that runs once after a chunk has been filled. For every placed
//! block it decides
//! 1. whether the block is enclosed on all sides of the neighbor lattice and
//!    can be culled,
//! 2. which material it is drawn with,
//!
//! and then rebuilds the chunk's per-material instance batches.
//!
//! ## Material precedence
//!
//! Later rules override earlier ones:
//! 1. `Dirt`
//! 2. `Rock` when the rock test holds (see [`RockRule`])
//! 3. `Snow` above the snow line, `Grass` otherwise, when nothing sits on top
//! 4. `Ground` on the floor layer (`y == 0`)
//!
//! ## Edges
//!
//! Neighbor positions outside the grid horizontally are answered by the
//! injected [`NeighborLookup`]. Positions above or below the grid are always
//! empty.

use cgmath::Point3;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::{
    block::{
        block_side::{BlockSide, ABOVE},
        Material,
    },
    terrain_noise::SNOW_LINE,
};

use super::{BlockProbe, Chunk, InstanceTransform, NeighborLookup, NoNeighbors};

/// Which neighborhood turns a block into rock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RockRule {
    /// Some front-side neighbor and some back-side neighbor are present.
    ///
    /// In practice this marks blocks bracketed by solid terrain, not blocks
    /// next to caves.
    #[default]
    Bracketed,
    /// Some lattice neighbor is a carved block.
    CaveWall,
}

/// A chunk seen together with whatever lies past its horizontal edges.
struct Neighborhood<'a> {
    chunk: &'a Chunk,
    lookup: &'a dyn NeighborLookup,
}

impl Neighborhood<'_> {
    fn probe(&self, at: Point3<i32>) -> BlockProbe {
        let (_, height, _) = self.chunk.dimensions();
        if self.chunk.in_bounds(at.x, at.y, at.z) {
            self.chunk.probe(at.x, at.y, at.z)
        } else if at.y < 0 || at.y >= height as i32 {
            BlockProbe::Absent
        } else {
            self.lookup.probe(self.chunk.to_world(at))
        }
    }

    fn has_block(&self, at: Point3<i32>) -> bool {
        self.probe(at).is_present()
    }

    /// Presence of the four neighbors on one side of the lattice.
    fn side_present(&self, at: Point3<i32>, side: BlockSide) -> [bool; 4] {
        let offsets = *side.offsets();
        offsets.map(|offset| self.has_block(at + offset))
    }

    fn is_surrounded(&self, at: Point3<i32>) -> bool {
        BlockSide::all()
            .into_iter()
            .all(|side| self.side_present(at, side).iter().all(|present| *present))
    }

    fn is_surrounded_by_carved(&self, at: Point3<i32>, rule: RockRule) -> bool {
        match rule {
            RockRule::Bracketed => BlockSide::all()
                .into_iter()
                .all(|side| self.side_present(at, side).iter().any(|present| *present)),
            RockRule::CaveWall => BlockSide::all().into_iter().any(|side| {
                side.offsets()
                    .iter()
                    .any(|offset| self.probe(at + *offset) == BlockProbe::Carved)
            }),
        }
    }

    fn material_for(&self, at: Point3<i32>, rule: RockRule) -> Material {
        let mut material = Material::Dirt;

        if self.is_surrounded_by_carved(at, rule) {
            material = Material::Rock;
        }

        if !self.has_block(at + ABOVE) {
            material = if at.y > SNOW_LINE {
                Material::Snow
            } else {
                Material::Grass
            };
        }

        if at.y == 0 {
            material = Material::Ground;
        }

        material
    }
}

impl Chunk {
    /// Whether all eight lattice neighbors inside this chunk are present.
    ///
    /// Neighbors outside the grid count as missing.
    pub fn is_surrounded(&self, x: i32, y: i32, z: i32) -> bool {
        self.isolated().is_surrounded(Point3::new(x, y, z))
    }

    /// The rock test under [`RockRule::Bracketed`], looking only inside this chunk.
    pub fn is_surrounded_by_carved(&self, x: i32, y: i32, z: i32) -> bool {
        self.isolated()
            .is_surrounded_by_carved(Point3::new(x, y, z), RockRule::Bracketed)
    }

    fn isolated(&self) -> Neighborhood<'_> {
        Neighborhood {
            chunk: self,
            lookup: &NoNeighbors,
        }
    }

    /// Culls enclosed blocks, assigns materials and rebuilds the instance batches.
    pub fn classify(&mut self, lookup: &dyn NeighborLookup, rule: RockRule) {
        let decisions: Vec<(Point3<i32>, bool, Material)> = {
            let neighborhood = Neighborhood {
                chunk: self,
                lookup,
            };
            self.iter_blocks()
                .map(|(at, _)| {
                    (
                        at,
                        neighborhood.is_surrounded(at),
                        neighborhood.material_for(at, rule),
                    )
                })
                .collect()
        };

        let mut culled = 0;
        for (at, surrounded, material) in decisions {
            if let Some(block) = self.block_mut(at) {
                if surrounded {
                    block.disable();
                    culled += 1;
                }
                block.material = material;
            }
        }

        self.rebuild_instances();

        trace!(
            "Classified chunk {:?}: {} culled, {} instances in {} batches",
            self.key,
            culled,
            self.instances.total(),
            self.instances.draw_count()
        );
    }

    fn rebuild_instances(&mut self) {
        let mut instances = std::mem::take(&mut self.instances);
        instances.clear();

        for (_, block) in self.iter_blocks() {
            if block.is_enabled() && !block.is_carved() {
                instances.push(block.material, InstanceTransform::from_translation(block.position));
            }
        }

        self.instances = instances;
    }
}
