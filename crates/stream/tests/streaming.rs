use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use cityforge_mesh::MeshQueue;
use cityforge_stream::{ChunkCoord, CityWorld, Lod, WorldConfig, WorldState};

fn world() -> CityWorld {
    CityWorld::new(WorldConfig::default()).expect("default config is valid")
}

#[test]
fn observer_at_origin() {
    let mut world = world();
    let state = world.update_position(0.0, 0.0, 0.0);

    assert_eq!(state.lod_of(ChunkCoord::new(0, 0)), Some(Lod::Full));
    assert_eq!(state.lod_of(ChunkCoord::new(11, 0)), Some(Lod::Proxy));
    assert!(!state.is_visible(ChunkCoord::new(12, 0)));
    assert!(!state.nearby_roads.is_empty());
    for chunk in &state.visible {
        assert!(chunk.distance <= 800.0);
    }
}

#[test]
fn same_seed_and_path_give_same_states() {
    let path = [(0.0, 0.0), (150.0, -40.0), (420.0, 300.0), (-700.0, 610.0)];
    let run = || {
        let mut world = world();
        path.iter()
            .map(|&(x, z)| world.update_position(x, 2.0, z))
            .collect::<Vec<WorldState>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn callback_sees_every_update() {
    let mut world = world();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    world.on_update(move |state| sink.borrow_mut().push(state.tick));

    for i in 0..5 {
        world.update_position(i as f64 * 100.0, 0.0, 0.0);
    }
    assert_eq!(*seen.borrow(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn nearby_plots_are_close_to_observer() {
    let mut world = world();
    let state = world.update_position(-250.0, 0.0, 380.0);
    let observer = glam::DVec2::new(-250.0, 380.0);
    for id in &state.nearby_plots {
        let plot = world.layout().plot(*id).expect("plot id from snapshot");
        assert!(plot.center.distance(observer) <= 128.0 + 1e-9);
    }
}

#[test]
fn reseed_queues_loaded_chunks_for_unload() {
    let mut world = world();
    let mut queue = world.inline_mesh_queue().expect("default mesh config is valid");
    world.update_position(0.0, 0.0, 0.0);
    let loaded = world.manager_mut().process_load_queue(16, &mut queue);

    world.reseed(1337);
    let mut released = Vec::new();
    while let Some(request) = world.manager_mut().pop_unload() {
        released.push(request);
    }
    assert_eq!(released.len(), loaded.len());
    for request in released {
        let ticket = request.mesh.expect("loaded chunks carry a mesh ticket");
        assert!(queue.take(ticket).is_some());
    }

    let state = world.update_position(0.0, 0.0, 0.0);
    assert_eq!(state.loaded_count, 0);
    assert_eq!(state.load_queue_len, state.visible_count());
}

#[test]
fn batched_queue_meshes_on_flush() {
    let mut world = world();
    let mut queue = world.batched_mesh_queue(2).expect("pool builds");
    world.update_position(300.0, 0.0, -300.0);

    let submitted = world.manager_mut().process_load_queue(8, &mut queue);
    assert_eq!(queue.pending(), submitted.len());
    assert_eq!(queue.flush(), submitted.len());
    assert_eq!(queue.pending(), 0);
    for (_, ticket) in submitted {
        assert!(queue.take(ticket).is_some());
    }
}

#[test]
fn world_config_file_drives_the_world() {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("temp file");
    writeln!(
        file,
        "seed: 9\nlayout:\n  world_size: 1000\n\
         chunks:\n  chunk_size: 32\n  view_distance: 200\n  unload_distance: 300\n"
    )
    .expect("write config");

    let config = WorldConfig::load(file.path()).expect("config parses");
    let mut world = CityWorld::new(config).expect("config is valid");
    assert_eq!(world.seed(), 9);
    assert_eq!(world.layout().world_size(), 1000.0);

    let state = world.update_position(0.0, 0.0, 0.0);
    assert!(state.visible.iter().all(|c| c.distance <= 200.0));
    assert_eq!(world.manager().config().chunk_size, 32.0);
}

#[test]
fn world_state_serializes_to_json() {
    let mut world = world();
    let state = world.update_position(10.0, 0.0, 10.0);
    let json = serde_json::to_value(&state).expect("state serializes");
    assert_eq!(json["tick"], 1);
    assert_eq!(json["visible"].as_array().map(Vec::len), Some(state.visible_count()));
}
