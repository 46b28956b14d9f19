//! # Terrain Noise Module
//!
//! Multi-octave coherent noise used by the terrain generator.
//!
//! Sampling and fractal layering (FBm, ridged, ping-pong) come from
//! `fastnoise-lite`. A [`NoiseSource`] only holds the seed: every sample call
//! receives its full configuration as a [`NoiseProfile`], and a [`NoiseField`]
//! binds one profile to the seed for repeated sampling. The elevation and
//! density profiles can therefore be interleaved freely.
//!
//! ## Normalization
//!
//! Raw samples in `[-1, 1]` are mapped onto the block height scale by
//! [`normalize`]. The terrain thresholds ([`CARVE_DENSITY`], [`SNOW_LINE`])
//! are tuned against that exact mapping.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use serde::{Deserialize, Serialize};

/// Highest number of octaves a profile may request.
pub const MAX_OCTAVES: u32 = 8;

/// Size of the normalized scale; raw `1.0` normalizes to this value.
pub const NORMALIZED_SPAN: f32 = 48.0;

/// Blocks above the floor whose normalized density is below this are carved out.
pub const CARVE_DENSITY: u32 = 10;

/// Surface blocks strictly above this height are snow.
pub const SNOW_LINE: i32 = 38;

/// Maps a raw noise sample onto the non-negative integer block scale.
///
/// `round(abs((raw + 1) / 2 * -48))`, evaluated in `f32` with rounding half
/// away from zero.
pub fn normalize(raw: f32) -> u32 {
    let scaled = (raw - -1.0) / (1.0 - -1.0) * (0.0 - NORMALIZED_SPAN);
    scaled.abs().round() as u32
}

/// The base gradient noise sampled by every octave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoiseKind {
    /// Classic Perlin gradient noise
    Perlin,
    /// OpenSimplex noise
    OpenSimplex,
    /// SuperSimplex noise
    SuperSimplex,
    /// Interpolated value noise
    Value,
}

impl NoiseKind {
    fn noise_type(self) -> NoiseType {
        match self {
            NoiseKind::Perlin => NoiseType::Perlin,
            NoiseKind::OpenSimplex => NoiseType::OpenSimplex2,
            NoiseKind::SuperSimplex => NoiseType::OpenSimplex2S,
            NoiseKind::Value => NoiseType::Value,
        }
    }
}

/// How octaves are combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractalKind {
    /// A single octave at the base frequency
    None,
    /// Fractional Brownian motion
    Fbm,
    /// Ridged multifractal, sharp crests where the base noise crosses zero
    Ridged,
    /// Ping-pong folding of the base noise, produces banded pockets
    PingPong,
}

impl FractalKind {
    fn fractal_type(self) -> FractalType {
        match self {
            FractalKind::None => FractalType::None,
            FractalKind::Fbm => FractalType::FBm,
            FractalKind::Ridged => FractalType::Ridged,
            FractalKind::PingPong => FractalType::PingPong,
        }
    }
}

/// A complete, immutable noise configuration.
///
/// Profiles are passed to every [`NoiseSource`] sample call. The two profiles
/// the terrain generator uses are [`NoiseProfile::elevation`] and
/// [`NoiseProfile::density`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseProfile {
    /// Base noise sampled by each octave
    pub kind: NoiseKind,
    /// Octave combination mode
    pub fractal: FractalKind,
    /// Scale applied to input coordinates before sampling
    pub frequency: f64,
    /// Number of octaves (1..=MAX_OCTAVES)
    pub octaves: u32,
    /// Amplitude multiplier between octaves
    pub gain: f64,
    /// Frequency multiplier between octaves
    pub lacunarity: f64,
    /// How strongly an octave's value attenuates the next octave's amplitude
    pub weighted_strength: f64,
    /// Folding strength of the ping-pong fractal
    pub ping_pong_strength: f64,
}

impl Default for NoiseProfile {
    fn default() -> Self {
        NoiseProfile {
            kind: NoiseKind::Perlin,
            fractal: FractalKind::Fbm,
            frequency: 0.01,
            octaves: 3,
            gain: 0.5,
            lacunarity: 2.0,
            weighted_strength: 0.0,
            ping_pong_strength: 2.0,
        }
    }
}

impl NoiseProfile {
    /// Coarse 2D elevation: ridged Perlin, 4 octaves.
    pub fn elevation() -> Self {
        NoiseProfile {
            fractal: FractalKind::Ridged,
            octaves: 4,
            ..Default::default()
        }
    }

    /// 3D cave density: ping-pong Perlin, 6 octaves.
    pub fn density() -> Self {
        NoiseProfile {
            fractal: FractalKind::PingPong,
            octaves: 6,
            ..Default::default()
        }
    }

    /// Number of octaves actually layered.
    fn layered_octaves(&self) -> u32 {
        self.octaves.clamp(1, MAX_OCTAVES)
    }
}

/// A [`NoiseProfile`] bound to a seed.
///
/// Octave `i` samples base noise seeded with `seed + i`, so octaves are
/// decorrelated while the whole field stays reproducible.
pub struct NoiseField {
    noise: FastNoiseLite,
}

impl NoiseField {
    fn new(seed: u32, profile: &NoiseProfile) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(profile.kind.noise_type()));
        noise.set_frequency(Some(profile.frequency as f32));
        noise.set_fractal_type(Some(profile.fractal.fractal_type()));
        noise.set_fractal_octaves(Some(profile.layered_octaves() as i32));
        noise.set_fractal_gain(Some(profile.gain as f32));
        noise.set_fractal_lacunarity(Some(profile.lacunarity as f32));
        noise.set_fractal_weighted_strength(Some(profile.weighted_strength as f32));
        noise.set_fractal_ping_pong_strength(Some(profile.ping_pong_strength as f32));
        NoiseField { noise }
    }

    /// Samples the 2D field at `(x, z)`.
    pub fn sample_2d(&self, x: f64, z: f64) -> f64 {
        self.noise.get_noise_2d(x as f32, z as f32) as f64
    }

    /// Samples the 3D field at `(x, y, z)`.
    pub fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.noise.get_noise_3d(x as f32, y as f32, z as f32) as f64
    }
}

/// Deterministic multi-octave noise for a fixed seed.
///
/// # Examples
///
/// ```
/// use voxel_terrain::{NoiseProfile, NoiseSource};
///
/// let source = NoiseSource::new(1337);
/// let elevation = NoiseProfile::elevation();
/// let a = source.sample_2d(&elevation, 10.0, -4.0);
/// let b = source.sample_2d(&elevation, 10.0, -4.0);
/// assert_eq!(a, b);
/// ```
pub struct NoiseSource {
    seed: u32,
}

impl NoiseSource {
    /// Creates a source for `seed`.
    pub fn new(seed: u32) -> Self {
        NoiseSource { seed }
    }

    /// Binds `profile` to this source's seed.
    pub fn field(&self, profile: &NoiseProfile) -> NoiseField {
        NoiseField::new(self.seed, profile)
    }

    /// Samples the 2D field described by `profile` at `(x, z)`.
    pub fn sample_2d(&self, profile: &NoiseProfile, x: f64, z: f64) -> f64 {
        self.field(profile).sample_2d(x, z)
    }

    /// Samples the 3D field described by `profile` at `(x, y, z)`.
    pub fn sample_3d(&self, profile: &NoiseProfile, x: f64, y: f64, z: f64) -> f64 {
        self.field(profile).sample_3d(x, y, z)
    }
}
