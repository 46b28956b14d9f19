//! # Block Material Module
//!
//! This module defines the materials a terrain block can be classified as.
//! Every material maps to one instanced draw call per chunk.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Material classification of a terrain block.
///
/// The derived ordering is the order in which a chunk's instance batches are
/// drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Material {
    /// Default material for blocks below the surface.
    Dirt,
    /// Surface blocks at or below the snow line.
    Grass,
    /// Surface blocks above the snow line.
    Snow,
    /// Buried blocks that pass the rock test.
    Rock,
    /// The bedrock floor layer at height zero.
    Ground,
}

impl Material {
    /// Every material, in draw order.
    pub const ALL: [Material; 5] = [
        Material::Dirt,
        Material::Grass,
        Material::Snow,
        Material::Rock,
        Material::Ground,
    ];

    /// Texture file the rendering backend binds for this material.
    pub fn texture_name(self) -> &'static str {
        match self {
            Material::Dirt => "dirt.png",
            Material::Grass => "gras.png",
            Material::Snow => "snow.png",
            Material::Rock => "rock.png",
            Material::Ground => "ground.png",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Material::Dirt => "dirt",
            Material::Grass => "grass",
            Material::Snow => "snow",
            Material::Rock => "rock",
            Material::Ground => "ground",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn materials_have_distinct_names_and_textures() {
        let names: Vec<String> = Material::ALL.iter().map(|m| m.to_string()).collect();
        assert_eq!(names, ["dirt", "grass", "snow", "rock", "ground"]);

        for material in Material::ALL {
            let texture = material.texture_name();
            assert!(texture.ends_with(".png"));
            assert_eq!(
                Material::ALL.iter().filter(|m| m.texture_name() == texture).count(),
                1
            );
        }
    }
}
