//! # Block Side Module
//!
//! This module defines the neighbor lattice used by block culling.
//!
//! The lattice has two sides of four offsets each. The front side looks along
//! +X, +Y, +Z and the +X+Y diagonal; the back side mirrors it.

use cgmath::Vector3;

/// One half of the culling neighbor lattice.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// Offsets towards positive X, Y and Z
    FRONT,
    /// Offsets towards negative X, Y and Z
    BACK,
}

const FRONT_OFFSETS: [Vector3<i32>; 4] = [
    Vector3 { x: 1, y: 0, z: 0 },
    Vector3 { x: 0, y: 1, z: 0 },
    Vector3 { x: 0, y: 0, z: 1 },
    Vector3 { x: 1, y: 1, z: 0 },
];

const BACK_OFFSETS: [Vector3<i32>; 4] = [
    Vector3 { x: -1, y: 0, z: 0 },
    Vector3 { x: 0, y: -1, z: 0 },
    Vector3 { x: 0, y: 0, z: -1 },
    Vector3 { x: -1, y: -1, z: 0 },
];

impl BlockSide {
    /// Both lattice sides.
    pub fn all() -> [BlockSide; 2] {
        [BlockSide::FRONT, BlockSide::BACK]
    }

    /// The four neighbor offsets on this side.
    pub fn offsets(self) -> &'static [Vector3<i32>; 4] {
        match self {
            BlockSide::FRONT => &FRONT_OFFSETS,
            BlockSide::BACK => &BACK_OFFSETS,
        }
    }
}

/// Offset of the block directly above.
pub const ABOVE: Vector3<i32> = Vector3 { x: 0, y: 1, z: 0 };
