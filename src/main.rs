//! # Voxel Terrain Entry Point
//!
//! Calls into the library's `run()` function, which sets up logging and flies
//! a headless camera over the generated terrain.
//!
//! ## Usage
//!
//! ```bash
//! VOXEL_TERRAIN_SEED=42 RUST_LOG=debug cargo run --release
//! ```

fn main() {
    voxel_terrain::run();
}
