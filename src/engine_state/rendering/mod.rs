//! Rendering seam for the voxel terrain.
//!
//! The terrain does not talk to a graphics API. It hands each visible chunk's
//! per-material instance lists to a [`RenderAdapter`], one instanced draw per
//! non-empty material. A windowed backend uploads the transforms and draws the
//! material's cube mesh; [`DrawStats`] just counts, for headless runs and
//! tests.

use std::collections::BTreeMap;

use log::trace;

use super::voxels::{
    block::Material,
    chunk::{Chunk, InstanceTransform},
};

/// Receives instanced draw calls.
pub trait RenderAdapter {
    /// Draws one cube of `material` per transform.
    ///
    /// `instances` is never empty and stays valid only for the call; copy it
    /// into a GPU buffer (it casts to bytes with `bytemuck::cast_slice`).
    fn draw_instanced(&mut self, material: Material, instances: &[InstanceTransform]);
}

/// Issues every draw needed for `chunks`.
///
/// # Arguments
/// * `chunks` - Chunks to draw, in order
/// * `adapter` - Backend receiving the draws
///
/// # Returns
/// The number of draw calls issued
pub fn render_chunks<'a, I>(chunks: I, adapter: &mut dyn RenderAdapter) -> usize
where
    I: IntoIterator<Item = &'a Chunk>,
{
    let mut draws = 0;
    for chunk in chunks {
        for (material, instances) in chunk.instances().iter() {
            adapter.draw_instanced(material, instances);
            draws += 1;
        }
        trace!(
            "Drew chunk {:?} with {} instances",
            chunk.key,
            chunk.instances().total()
        );
    }
    draws
}

/// A headless [`RenderAdapter`] that tallies draws per material.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DrawStats {
    /// Draw calls received
    pub draws: usize,
    /// Instances received over all draws
    pub instances: usize,
    /// Instances received per material
    pub per_material: BTreeMap<Material, usize>,
}

impl DrawStats {
    /// Clears the tallies, typically at the start of a frame.
    pub fn reset(&mut self) {
        *self = DrawStats::default();
    }
}

impl RenderAdapter for DrawStats {
    fn draw_instanced(&mut self, material: Material, instances: &[InstanceTransform]) {
        self.draws += 1;
        self.instances += instances.len();
        *self.per_material.entry(material).or_default() += instances.len();
    }
}
