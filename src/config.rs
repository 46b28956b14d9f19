//! # Configuration
//!
//! Startup settings for the terrain world, the camera and the headless demo.
//!
//! Settings are read from the JSON file named by `VOXEL_TERRAIN_CONFIG` when
//! that variable is set; every missing field falls back to its default. The
//! seed can additionally be overridden through `VOXEL_TERRAIN_SEED`.
//!
//! ```json
//! {
//!     "seed": 42,
//!     "chunk_size": 32,
//!     "edge_policy": "Isolated",
//!     "camera": { "start": [0.0, 30.0, 0.0] }
//! }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine_state::voxels::{
    chunk::RockRule,
    terrain_noise::{NoiseProfile, MAX_OCTAVES},
    world::{EdgePolicy, MAX_CHUNK_SIZE, MIN_LOADED_CHUNKS},
};

/// Environment variable holding the path of a JSON configuration file.
pub const CONFIG_PATH_VAR: &str = "VOXEL_TERRAIN_CONFIG";

/// Environment variable overriding the world seed.
pub const SEED_VAR: &str = "VOXEL_TERRAIN_SEED";

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration is not valid JSON for [`WorldConfig`]
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// `chunk_size` is zero
    #[error("Chunk size must be greater than zero")]
    ChunkSizeZero,
    /// `chunk_size` exceeds [`MAX_CHUNK_SIZE`]
    #[error("Chunk size {requested} exceeds the maximum of {maximum}")]
    #[allow(missing_docs)]
    ChunkSizeTooLarge { requested: usize, maximum: usize },
    /// `max_loaded_chunks` cannot hold one visible neighborhood
    #[error("Chunk cache holds {requested} chunks but at least {minimum} are visible at once")]
    #[allow(missing_docs)]
    CacheTooSmall { requested: usize, minimum: usize },
    /// A noise profile requests no octaves or more than the source holds
    #[error("{profile} profile requests {octaves} octaves, expected 1..={max}", max = MAX_OCTAVES)]
    #[allow(missing_docs)]
    Octaves { profile: &'static str, octaves: u32 },
    /// A noise profile frequency is zero, negative or not finite
    #[error("{profile} profile frequency must be positive and finite")]
    #[allow(missing_docs)]
    Frequency { profile: &'static str },
    /// The seed override is not an unsigned 32-bit integer
    #[error("Invalid seed override: {0:?}")]
    Seed(String),
}

/// Settings of the generated world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed of every noise field
    pub seed: u32,
    /// Edge length of a cubic chunk in blocks
    pub chunk_size: usize,
    /// Upper bound on chunks kept in memory
    pub max_loaded_chunks: usize,
    /// How classification sees past a chunk's horizontal edges
    pub edge_policy: EdgePolicy,
    /// Which neighborhood marks a block as rock
    pub rock_rule: RockRule,
    /// 2D profile for column heights
    pub elevation: NoiseProfile,
    /// 3D profile for carving
    pub density: NoiseProfile,
    /// Starting pose and speed of the camera
    pub camera: CameraConfig,
    /// Length of the headless demo flight
    pub demo: DemoConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 1337,
            chunk_size: 64,
            max_loaded_chunks: 25,
            edge_policy: EdgePolicy::default(),
            rock_rule: RockRule::default(),
            elevation: NoiseProfile::elevation(),
            density: NoiseProfile::density(),
            camera: CameraConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

/// Camera start pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// World position `[x, y, z]`
    pub start: [f32; 3],
    /// Heading in degrees, 0 looks along +X
    pub yaw_degrees: f32,
    /// Elevation angle in degrees
    pub pitch_degrees: f32,
    /// Movement speed in blocks per second
    pub speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            start: [0.0, 20.0, 0.0],
            yaw_degrees: 0.0,
            pitch_degrees: 0.0,
            speed: 13.0,
        }
    }
}

/// Parameters of the scripted flight run by the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of frames to simulate
    pub frames: u32,
    /// Simulated frames per second
    pub frame_rate: u32,
    /// Seed of the heading drift; `None` flies straight
    pub wander_seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            frames: 600,
            frame_rate: 60,
            wander_seed: None,
        }
    }
}

impl WorldConfig {
    /// Loads the configuration from the environment.
    ///
    /// Reads the file named by [`CONFIG_PATH_VAR`] if set, otherwise starts
    /// from defaults, then applies [`SEED_VAR`] and validates the result.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };

        if let Ok(seed) = std::env::var(SEED_VAR) {
            config.seed = parse_seed(&seed)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parses a JSON configuration; absent fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the settings a world cannot be built without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ChunkSizeZero);
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::ChunkSizeTooLarge {
                requested: self.chunk_size,
                maximum: MAX_CHUNK_SIZE,
            });
        }
        if self.max_loaded_chunks < MIN_LOADED_CHUNKS {
            return Err(ConfigError::CacheTooSmall {
                requested: self.max_loaded_chunks,
                minimum: MIN_LOADED_CHUNKS,
            });
        }
        validate_profile("elevation", &self.elevation)?;
        validate_profile("density", &self.density)?;
        Ok(())
    }
}

fn validate_profile(name: &'static str, profile: &NoiseProfile) -> Result<(), ConfigError> {
    if profile.octaves == 0 || profile.octaves > MAX_OCTAVES {
        return Err(ConfigError::Octaves {
            profile: name,
            octaves: profile.octaves,
        });
    }
    if !(profile.frequency.is_finite() && profile.frequency > 0.0) {
        return Err(ConfigError::Frequency { profile: name });
    }
    Ok(())
}

fn parse_seed(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Seed(raw.to_string()))
}
