//! End-to-end simulation scenarios

use globule_core::glam::Vec2;
use globule_core::{SimulationConfig, SimulationState, MAX_METABALLS};

#[test]
fn spawn_then_advance_moves_along_drawn_heading() {
    let mut sim = SimulationState::with_seed(MAX_METABALLS, 2024);
    sim.initialize();
    assert_eq!(sim.count(), 0);

    assert!(sim.spawn(100.0, 100.0, 25.0));
    let heading = sim.balls()[0].direction();

    sim.advance(200.0, 200.0, 2.0);

    let expected = Vec2::new(100.0 + 2.0 * heading.x, 100.0 + 2.0 * heading.y);
    let ball = sim.balls()[0];
    assert!((ball.position() - expected).length() < 1e-4);
    assert_eq!(sim.positions().get(0), Some(ball.position()));
    assert_eq!(sim.positions().as_slice(), &[ball.position().x, ball.position().y]);
}

#[test]
fn hundred_and_first_spawn_is_ignored() {
    let mut sim = SimulationState::from_config(&SimulationConfig {
        seed: Some(5),
        ..Default::default()
    });
    for i in 0..100 {
        assert!(sim.spawn(i as f32, i as f32, 25.0));
    }
    let before: Vec<_> = sim.balls().to_vec();

    assert!(!sim.spawn(1.0, 1.0, 25.0));
    assert_eq!(sim.count(), 100);
    assert_eq!(sim.balls(), before.as_slice());
}

#[test]
fn clear_then_advance_uploads_nothing() {
    let mut sim = SimulationState::with_seed(MAX_METABALLS, 8);
    for _ in 0..3 {
        sim.spawn(50.0, 60.0, 25.0);
    }
    sim.clear_all();
    assert_eq!(sim.count(), 0);

    sim.advance(200.0, 200.0, 2.0);
    assert!(sim.positions().as_slice().is_empty());
    assert_eq!(sim.positions().iter().count(), 0);
}
