use cityforge_common::{DistrictType, RoadKind};
use cityforge_layout::{CityLayout, LandmarkCatalog, LayoutConfig, LayoutGenerator};

fn generate(seed: u64) -> CityLayout {
    LayoutGenerator::new(LayoutConfig::default())
        .expect("default config is valid")
        .generate(seed)
}

#[test]
fn same_seed_reproduces_snapshot() {
    let a = generate(42);
    let b = generate(42);
    assert_eq!(a, b);
    assert_eq!(a.state_hash(), b.state_hash());
}

#[test]
fn different_seeds_diverge() {
    assert_ne!(generate(42).state_hash(), generate(1337).state_hash());
}

#[test]
fn seed_42_grid_shape() {
    let city = generate(42);
    assert_eq!(city.road_count(RoadKind::Boulevard), 22);
    assert_eq!(city.road_count(RoadKind::Street), 20);
    assert!(city.road_count(RoadKind::Alley) > 0);
    assert_eq!(city.diagnostics().skipped_streets, 22);

    // 21 lines per axis cross pairwise; alley crossings come on top.
    let alley_nodes = city.road_count(RoadKind::Alley) / 2;
    assert_eq!(city.intersections().len(), 21 * 21 + alley_nodes);
}

#[test]
fn every_road_stays_inside_the_world() {
    let city = generate(42);
    let world = city.world_bounds();
    for road in city.roads() {
        assert!(world.contains(road.start), "{:?}", road);
        assert!(world.contains(road.end), "{:?}", road);
    }
}

#[test]
fn plots_partition_their_blocks() {
    let city = generate(42);
    for block in city.blocks() {
        assert!(!block.plots.is_empty());
        for plot in city.plots_in_block(block.id) {
            assert_eq!(plot.block, block.id);
            assert_eq!(plot.district, block.district);
            let (center, bounds) = (plot.center, block.bounds);
            assert!(bounds.contains(center), "{center:?} outside {bounds:?}");
            if !plot.landmark {
                assert!(plot.width <= block.bounds.width());
                assert!(plot.depth <= block.bounds.depth());
            }
        }
    }
    let owned: usize = city.blocks().iter().map(|b| b.plots.len()).sum();
    assert_eq!(owned, city.plots().len());
}

#[test]
fn blocks_do_not_overlap() {
    let city = generate(42);
    let blocks = city.blocks();
    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            let overlap_x = a.bounds.min.x < b.bounds.max.x && b.bounds.min.x < a.bounds.max.x;
            let overlap_z = a.bounds.min.y < b.bounds.max.y && b.bounds.min.y < a.bounds.max.y;
            assert!(!(overlap_x && overlap_z), "{:?} overlaps {:?}", a.id, b.id);
        }
    }
}

#[test]
fn block_districts_match_classification() {
    let city = generate(42);
    for block in city.blocks() {
        let c = block.bounds.center();
        assert_eq!(city.district_at(c.x, c.y), block.district);
    }
}

#[test]
fn landmark_blocks_have_no_buildable_plots() {
    let city = generate(42);
    assert_eq!(city.landmarks().len(), LandmarkCatalog::standard().len());
    assert!(city.diagnostics().unmatched_landmarks.is_empty());

    for landmark in city.landmarks() {
        let block = city.block(landmark.block).expect("landmark block exists");
        assert!(block.is_landmark());
        assert!(city.plots_in_block(block.id).all(|p| !p.is_buildable()));
        let footprint = city.plot(landmark.plot).expect("footprint plot exists");
        assert!(footprint.landmark);
        assert_eq!(footprint.building.as_deref(), Some(landmark.definition.name.as_str()));
    }
}

#[test]
fn buildable_plots_are_not_in_landmark_blocks() {
    let city = generate(42);
    for plot in city.buildable_plots() {
        let block = city.block(plot.block).unwrap();
        assert!(!block.is_landmark());
        assert!(!plot.landmark);
    }
}

#[test]
fn default_layout_drops_nothing() {
    let city = generate(42);
    assert!(city.diagnostics().dropped_blocks.is_empty());
    assert!(city.diagnostics().is_clean());
}

#[test]
fn origin_is_downtown() {
    let city = generate(42);
    assert_eq!(city.district_at(0.0, 0.0), DistrictType::Downtown);
}

#[test]
fn about_85_percent_of_regular_plots_are_buildable() {
    for seed in [1, 42, 1337] {
        let city = generate(seed);
        let regular: Vec<_> = city
            .blocks()
            .iter()
            .filter(|b| !b.is_landmark())
            .flat_map(|b| city.plots_in_block(b.id))
            .collect();
        assert!(!regular.is_empty());
        let buildable = regular.iter().filter(|p| p.is_buildable()).count();
        let share = buildable as f64 / regular.len() as f64;
        assert!((0.80..=0.90).contains(&share), "seed {seed}: {share:.3} buildable");
    }
}

#[test]
fn larger_world_has_more_blocks() {
    let small = generate(5);
    let config = LayoutConfig {
        world_size: 3000.0,
        ..LayoutConfig::default()
    };
    let large = LayoutGenerator::new(config).unwrap().generate(5);
    assert!(large.blocks().len() > small.blocks().len());
}
