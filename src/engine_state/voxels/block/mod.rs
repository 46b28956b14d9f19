//! # Block Module
//!
//! This module provides the terrain block, its material classification and
//! the neighbor lattice used to cull it.

use cgmath::Vector3;

pub use block_material::Material;

pub mod block_material;
pub mod block_side;

/// A single terrain block.
///
/// Blocks are created during chunk generation and only touched again by the
/// chunk's classification pass.
///
/// # Invariants
/// A carved block is never enabled.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Block {
    /// World-space position of the block's origin.
    pub position: Vector3<f32>,
    /// Material assigned by the classification pass.
    pub material: Material,
    enabled: bool,
    carved: bool,
}

impl Block {
    /// Creates a dirt block at `position`.
    ///
    /// Solid blocks start enabled; carved blocks start (and stay) disabled.
    pub fn new(position: Vector3<f32>, carved: bool) -> Self {
        Block {
            position,
            material: Material::Dirt,
            enabled: !carved,
            carved,
        }
    }

    /// Whether the block survived culling and will be drawn.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the block has been carved out into a cave pocket.
    pub fn is_carved(&self) -> bool {
        self.carved
    }

    /// Hides the block from rendering.
    pub fn disable(&mut self) {
        self.enabled = false;
    }
}
