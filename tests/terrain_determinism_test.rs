use mam::core::generator::generate_chunk;
use mam::core::quantum::quantum_terrain;
use mam::domain::model::{ChunkCoord, TerrainMode, TileCoord};
use mam::{GameSession, IsoGrid, TerrainGenerator, TerrainRegion};
use mam::config::settings::{RunnerConfig, WorldConfig};

#[test]
fn test_quantum_region_matches_pointwise_function() {
    let grid = IsoGrid::default();
    let region = TerrainRegion::collect(
        &TerrainGenerator::new(12345),
        &grid,
        TerrainMode::Quantum,
        TileCoord::new(-20, -20),
        40,
        40,
    )
    .unwrap();

    for x in -20..20 {
        for y in -20..20 {
            let tile = TileCoord::new(x, y);
            assert_eq!(region.get(tile).unwrap().element, quantum_terrain(x, y));
        }
    }
}

#[test]
fn test_streamed_chunks_equal_fresh_generation() {
    let world = WorldConfig {
        terrain_mode: TerrainMode::Random,
        render_distance: 1,
        ..WorldConfig::default()
    };
    let generator = TerrainGenerator::from_world(&world);
    let grid = IsoGrid::from_world(&world);
    let mut session = GameSession::new(generator, world.clone(), RunnerConfig::default());

    for _ in 0..100 {
        session.tick();
    }

    for state in session.chunks().active_chunks() {
        let fresh = generate_chunk(&generator, &grid, state.chunk.coord, TerrainMode::Random);
        assert_eq!(state.chunk, fresh);
    }
}

#[test]
fn test_random_forest_differs_by_seed_but_quantum_does_not() {
    let grid = IsoGrid::default();
    let coord = ChunkCoord::new(0, 0);
    let quantum_a = generate_chunk(&TerrainGenerator::new(1), &grid, coord, TerrainMode::Quantum);
    let quantum_b = generate_chunk(&TerrainGenerator::new(9), &grid, coord, TerrainMode::Quantum);
    assert_eq!(quantum_a.placements, quantum_b.placements);

    let random_a = generate_chunk(&TerrainGenerator::new(1), &grid, coord, TerrainMode::Random);
    let random_b = generate_chunk(&TerrainGenerator::new(9), &grid, coord, TerrainMode::Random);
    assert_ne!(random_a.placements, random_b.placements);
}

#[test]
fn test_scene_render_order_puts_ground_first() {
    let world = WorldConfig {
        render_distance: 1,
        ..WorldConfig::default()
    };
    let session = GameSession::new(TerrainGenerator::from_world(&world), world, RunnerConfig::default());
    let scene = session.scene();
    let order = scene.render_order();
    assert_eq!(order[0].layer, mam::domain::model::Layer::Ground);
    assert_eq!(order.last().map(|s| s.layer != mam::domain::model::Layer::Ground), Some(true));
    assert_eq!(session.hud(), vec!["Distance: 0".to_string()]);
}
