use std::hint::black_box;
use std::sync::Arc;
use std::time::Instant;

use cityforge_layout::{CityLayout, LayoutConfig, LayoutGenerator};
use cityforge_mesh::{FlatGround, MeshConfig};
use cityforge_noise::NoiseField;
use cityforge_stream::{ChunkConfig, ChunkCoord, ChunkIndex, ChunkManager};

fn make_layout(world_size: f64) -> CityLayout {
    let config = LayoutConfig {
        world_size,
        ..LayoutConfig::default()
    };
    match LayoutGenerator::new(config) {
        Ok(generator) => generator.generate(42),
        Err(err) => panic!("bench layout config rejected: {err}"),
    }
}

fn make_manager(layout: &Arc<CityLayout>, config: ChunkConfig) -> ChunkManager {
    match ChunkManager::new(layout.clone(), NoiseField::new(42), config) {
        Ok(manager) => manager,
        Err(err) => panic!("bench chunk config rejected: {err}"),
    }
}

fn bench_generate(world_size: f64, iterations: usize) {
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(make_layout(black_box(world_size)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  generate (world {world_size}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_index_rebuild(iterations: usize) {
    let layout = make_layout(2000.0);
    let mut index = ChunkIndex::new(64.0);

    let start = Instant::now();
    for _ in 0..iterations {
        index.rebuild(black_box(&layout));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  index rebuild ({} plots, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        layout.plots().len()
    );
}

fn bench_update(view_distance: f64, iterations: usize) {
    let layout = Arc::new(make_layout(2000.0));
    let config = ChunkConfig {
        view_distance,
        unload_distance: view_distance * 1.25,
        ..ChunkConfig::default()
    };
    let mut manager = make_manager(&layout, config);

    let start = Instant::now();
    for i in 0..iterations {
        // Observer walking east and wrapping.
        let x = -800.0 + (i % 100) as f64 * 16.0;
        let _ = black_box(manager.update_position(black_box(x), 0.0, 0.0));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  update (view {view_distance}, {iterations} iters): {per_iter:?}/iter, \
         avg frame {:?}, max frame {:?}",
        manager.frame_timer().average(),
        manager.frame_timer().max()
    );
}

fn bench_mesh_chunks(iterations: usize) {
    let layout = Arc::new(make_layout(2000.0));
    let manager = make_manager(&layout, ChunkConfig::default());
    let mesh_config = MeshConfig::default();
    let mut vertices = 0;

    let start = Instant::now();
    for i in 0..iterations {
        let coord = ChunkCoord::new((i % 9) as i32 - 4, 0);
        let set = black_box(manager.mesh_job(coord).build(&FlatGround(0.0), &mesh_config));
        vertices += set.vertex_count();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  chunk mesh ({iterations} iters, {vertices} vertices): {per_iter:?}/iter, \
         total {elapsed:?}"
    );
}

fn main() {
    println!("=== Chunk Streaming Benchmarks ===\n");

    println!("Layout generation:");
    bench_generate(1000.0, 20);
    bench_generate(2000.0, 5);

    println!("\nChunk index rebuild:");
    bench_index_rebuild(50);

    println!("\nPosition update:");
    bench_update(200.0, 10000);
    bench_update(800.0, 1000);

    println!("\nChunk meshing:");
    bench_mesh_chunks(500);

    println!("\n=== Done ===");
}
