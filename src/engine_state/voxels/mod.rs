//! # Voxel Terrain Core
//!
//! This module contains the data and generation side of the terrain.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: A single terrain block, its material and the neighbor lattice
//! * **Chunk**: A fixed-size 3D grid of blocks with per-material instance batches
//! * **Terrain**: Column heights and cave carving derived from noise
//! * **Terrain noise**: Seeded multi-octave noise and the normalization scale
//! * **World**: The LRU-bounded chunk manager that streams chunks around the camera
//!
//! ## Data Flow
//!
//! 1. The world is asked for a chunk key
//! 2. Missing chunks are filled from the terrain generator
//! 3. The chunk classifies its blocks and builds its instance batches
//! 4. The renderer draws the batches

pub mod block;
pub mod chunk;
pub mod terrain;
pub mod terrain_noise;
pub mod world;
