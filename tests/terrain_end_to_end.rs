use std::{collections::BTreeSet, rc::Rc};

use cgmath::{Point2, Point3};
use voxel_terrain::{
    normalize, ChunkManager, DrawStats, EdgePolicy, EngineState, Material, NoiseProfile,
    NoiseSource, RenderAdapter, WorldConfig,
};
use web_time::Duration;

fn small_world(seed: u32) -> WorldConfig {
    WorldConfig {
        seed,
        chunk_size: 8,
        max_loaded_chunks: 9,
        ..WorldConfig::default()
    }
}

#[test]
fn chunk_generation_is_deterministic_across_managers() {
    let mut a = ChunkManager::new(&small_world(2024)).unwrap();
    let mut b = ChunkManager::new(&small_world(2024)).unwrap();

    let first = a.get_chunk(Point2::new(0, 0)).unwrap();
    let second = b.get_chunk(Point2::new(0, 0)).unwrap();

    assert_eq!(first.block_count(), second.block_count());
    assert_eq!(first.carved_count(), second.carved_count());
    assert_eq!(
        first.iter_blocks().collect::<Vec<_>>(),
        second.iter_blocks().collect::<Vec<_>>()
    );
    for material in Material::ALL {
        assert_eq!(
            first.instances().get(material),
            second.instances().get(material)
        );
    }
}

#[test]
fn lattice_aligned_profiles_pin_block_counts() {
    // at frequency 1 every sample lands on the noise lattice, where Perlin is
    // zero: columns rise to the top of the chunk and ping-pong carves all of
    // it but the floor
    let config = WorldConfig {
        elevation: NoiseProfile {
            frequency: 1.0,
            ..NoiseProfile::elevation()
        },
        density: NoiseProfile {
            frequency: 1.0,
            ..NoiseProfile::density()
        },
        ..small_world(2024)
    };
    let mut world = ChunkManager::new(&config).unwrap();
    let chunk = world.get_chunk(Point2::new(0, 0)).unwrap();

    assert_eq!(chunk.block_count(), 8 * 8 * 8);
    assert_eq!(chunk.carved_count(), 8 * 8 * 7);
    assert_eq!(chunk.instances().total(), 8 * 8);
    assert_eq!(chunk.instances().get(Material::Ground).len(), 8 * 8);
}

#[test]
fn floor_plane_is_uncarved_ground() {
    let mut world = ChunkManager::new(&small_world(2024)).unwrap();
    let chunk = world.get_chunk(Point2::new(0, 0)).unwrap();

    for x in 0..8 {
        for z in 0..8 {
            let block = chunk.get_block(x, 0, z).unwrap();
            assert!(!block.is_carved());
            assert!(chunk.has_block(x, 0, z));
            assert_eq!(block.material, Material::Ground);
        }
    }
}

#[test]
fn surface_blocks_follow_the_snow_line() {
    let config = WorldConfig {
        chunk_size: 64,
        ..small_world(1337)
    };
    let mut world = ChunkManager::new(&config).unwrap();
    let chunk = world.get_chunk(Point2::new(0, 0)).unwrap();

    for (local, block) in chunk.iter_blocks() {
        if block.is_carved() || local.y == 0 {
            continue;
        }
        if !chunk.has_block(local.x, local.y + 1, local.z) {
            let expected = if local.y > 38 {
                Material::Snow
            } else {
                Material::Grass
            };
            assert_eq!(block.material, expected, "surface block at {:?}", local);
        }
    }
}

#[test]
fn different_seeds_produce_different_terrain() {
    let mut a = ChunkManager::new(&small_world(1)).unwrap();
    let mut b = ChunkManager::new(&small_world(2)).unwrap();

    let differs = (0..4).any(|x| {
        let key = Point2::new(x, 0);
        let left = a.get_chunk(key).unwrap();
        let right = b.get_chunk(key).unwrap();
        left.iter_blocks().collect::<Vec<_>>() != right.iter_blocks().collect::<Vec<_>>()
    });
    assert!(differs);
}

#[test]
fn column_heights_come_from_normalized_elevation() {
    let config = small_world(77);
    let mut world = ChunkManager::new(&config).unwrap();
    let chunk = world.get_chunk(Point2::new(-1, 1)).unwrap();
    let noise = NoiseSource::new(77);
    let elevation = NoiseProfile::elevation();

    for x in 0..8 {
        for z in 0..8 {
            let column = chunk.to_world(Point3::new(x, 0, z));
            let raw = noise.sample_2d(&elevation, column.x as f64, column.z as f64);
            let height = (normalize(raw as f32) as i32).clamp(1, 8);
            let filled = (0..8).filter(|&y| chunk.get_block(x, y, z).is_some()).count() as i32;
            assert_eq!(filled, height);
        }
    }
}

#[test]
fn neighborhood_follows_the_camera() {
    let config = WorldConfig {
        max_loaded_chunks: 18,
        ..small_world(5)
    };
    let mut world = ChunkManager::new(&config).unwrap();

    let first = world
        .visible_chunks(Point3::new(0.0, 20.0, 0.0), None)
        .unwrap();
    let moved = world
        .visible_chunks(Point3::new(-5.0, 20.0, 12.5), Some(first.current))
        .unwrap();

    assert_eq!(first.current, Point2::new(0, 0));
    assert_eq!(moved.current, Point2::new(-1, 2));
    assert_eq!(moved.chunks[0].key, moved.current);
    assert_eq!(world.loaded_count(), 16);

    // the chunks shared by both neighborhoods were not regenerated
    let shared = first
        .chunks
        .iter()
        .filter(|chunk| moved.chunks.iter().any(|other| Rc::ptr_eq(chunk, other)))
        .count();
    assert_eq!(shared, 2);
    assert_eq!(world.generated_count(), 9 + 7);
}

#[test]
fn isolated_edges_still_generate_the_same_blocks() {
    let mut seamless = ChunkManager::new(&small_world(9)).unwrap();
    let mut isolated = ChunkManager::new(&WorldConfig {
        edge_policy: EdgePolicy::Isolated,
        ..small_world(9)
    })
    .unwrap();

    let a = seamless.get_chunk(Point2::new(3, 3)).unwrap();
    let b = isolated.get_chunk(Point2::new(3, 3)).unwrap();
    assert_eq!(a.block_count(), b.block_count());
    assert_eq!(a.carved_count(), b.carved_count());
}

struct ByteUploader {
    uploaded: usize,
}

impl RenderAdapter for ByteUploader {
    fn draw_instanced(&mut self, _material: Material, instances: &[voxel_terrain::InstanceTransform]) {
        let bytes: &[u8] = bytemuck::cast_slice(instances);
        self.uploaded += bytes.len();
    }
}

#[derive(Default)]
struct TextureBinder {
    bound: Vec<&'static str>,
}

impl RenderAdapter for TextureBinder {
    fn draw_instanced(&mut self, material: Material, _instances: &[voxel_terrain::InstanceTransform]) {
        self.bound.push(material.texture_name());
    }
}

#[test]
fn adapters_bind_one_texture_per_draw() {
    let mut world = ChunkManager::new(&small_world(1337)).unwrap();
    let visible = world
        .visible_chunks(Point3::new(0.0, 20.0, 0.0), None)
        .unwrap();
    let mut stats = DrawStats::default();
    let mut binder = TextureBinder::default();

    for chunk in &visible.chunks {
        for (material, instances) in chunk.instances().iter() {
            stats.draw_instanced(material, instances);
            binder.draw_instanced(material, instances);
        }
    }

    assert_eq!(binder.bound.len(), stats.draws);
    let textures: BTreeSet<&str> = binder.bound.iter().copied().collect();
    let expected: BTreeSet<&str> = stats
        .per_material
        .keys()
        .map(|material| material.texture_name())
        .collect();
    assert_eq!(textures, expected);
    assert!(textures.contains("ground.png"));
}

#[test]
fn engine_frames_feed_any_render_adapter() {
    let config = WorldConfig {
        max_loaded_chunks: 16,
        ..small_world(1337)
    };
    let mut engine = EngineState::new(&config).unwrap();
    let mut stats = DrawStats::default();
    let mut uploader = ByteUploader { uploaded: 0 };

    for _ in 0..30 {
        engine.update(Duration::from_millis(33)).unwrap();
    }
    stats.reset();
    engine.render(&mut stats);
    engine.render(&mut uploader);

    assert!(stats.draws > 0);
    assert_eq!(uploader.uploaded, stats.instances * 64);
    assert_eq!(engine.visible_chunks().len(), 9);
}
