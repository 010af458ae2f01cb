//! Property tests for the simulation invariants:
//!
//! 1. Capacity bound: the live count never exceeds the cap
//! 2. Clear always empties, whatever came before
//! 3. A step moves a ball by exactly `direction * speed`
//! 4. Steps compose linearly while no edge is touched
//! 5. Each axis reflects independently at the edges

use globule_core::glam::Vec2;
use globule_core::{Metaball, SimulationState, MAX_METABALLS};
use proptest::prelude::*;

proptest! {
    #[test]
    fn count_never_exceeds_capacity(
        capacity in 1usize..=MAX_METABALLS,
        spawns in 0usize..150,
        seed in any::<u64>(),
    ) {
        let mut sim = SimulationState::with_seed(capacity, seed);
        for i in 0..spawns {
            let before = sim.count();
            let added = sim.spawn(i as f32, i as f32, 25.0);
            prop_assert!(sim.count() <= capacity);
            if before == capacity {
                prop_assert!(!added);
                prop_assert_eq!(sim.count(), before);
            }
        }
        prop_assert_eq!(sim.count(), spawns.min(capacity));
    }

    #[test]
    fn clear_always_empties(spawns in 0usize..120, advance in any::<bool>()) {
        let mut sim = SimulationState::with_seed(MAX_METABALLS, 11);
        for i in 0..spawns {
            sim.spawn(10.0 + i as f32, 10.0, 25.0);
        }
        if advance {
            sim.advance(400.0, 400.0, 2.0);
        }
        sim.clear_all();
        prop_assert_eq!(sim.count(), 0);
        prop_assert!(sim.positions().is_empty());
    }

    #[test]
    fn one_step_moves_by_direction_times_speed(
        angle in 0.0f32..std::f32::consts::TAU,
        speed in 0.1f32..5.0,
    ) {
        let start = Vec2::new(500.0, 500.0);
        let mut sim = SimulationState::with_seed(1, 0);
        sim.push(Metaball::from_angle(start, angle, 25.0));
        let direction = sim.balls()[0].direction();

        sim.advance(1000.0, 1000.0, speed);

        let moved = sim.balls()[0].position() - start;
        prop_assert!((moved - direction * speed).length() < 1e-3);
        prop_assert_eq!(sim.positions().get(0), Some(sim.balls()[0].position()));
    }

    #[test]
    fn steps_compose_linearly_inside_bounds(
        angle in 0.0f32..std::f32::consts::TAU,
        speed in 0.1f32..3.0,
        steps in 1usize..50,
    ) {
        // 50 steps of at most 3px never leave a 1000px box from its center.
        let start = Vec2::new(500.0, 500.0);
        let mut sim = SimulationState::with_seed(1, 0);
        sim.push(Metaball::from_angle(start, angle, 25.0));
        let direction = sim.balls()[0].direction();

        for _ in 0..steps {
            sim.advance(1000.0, 1000.0, speed);
        }

        let expected = start + direction * speed * steps as f32;
        prop_assert!((sim.balls()[0].position() - expected).length() < 1e-2);
        prop_assert_eq!(sim.balls()[0].direction(), direction);
    }
}

/// Returns the heading before and after one step inside a 200x100 surface.
fn single_step(position: Vec2, direction: Vec2) -> (Vec2, Metaball) {
    let mut sim = SimulationState::with_seed(1, 0);
    sim.push(Metaball::with_direction(position, direction, 25.0));
    let before = sim.balls()[0].direction();
    sim.advance(200.0, 100.0, 2.0);
    (before, sim.balls()[0])
}

#[test]
fn reflects_off_right_edge() {
    let (before, ball) = single_step(Vec2::new(199.0, 50.0), Vec2::new(0.6, 0.8));
    assert_eq!(ball.direction(), Vec2::new(-before.x, before.y));
}

#[test]
fn reflects_off_left_edge() {
    let (before, ball) = single_step(Vec2::new(1.0, 50.0), Vec2::new(-0.6, 0.8));
    assert_eq!(ball.direction(), Vec2::new(-before.x, before.y));
}

#[test]
fn reflects_off_bottom_edge() {
    let (before, ball) = single_step(Vec2::new(100.0, 99.0), Vec2::new(0.6, 0.8));
    assert_eq!(ball.direction(), Vec2::new(before.x, -before.y));
}

#[test]
fn reflects_off_top_edge() {
    let (before, ball) = single_step(Vec2::new(100.0, 1.0), Vec2::new(0.6, -0.8));
    assert_eq!(ball.direction(), Vec2::new(before.x, -before.y));
}

#[test]
fn landing_exactly_on_edge_counts_as_contact() {
    let (_, ball) = single_step(Vec2::new(198.0, 50.0), Vec2::X);
    assert_eq!(ball.position().x, 200.0);
    assert_eq!(ball.direction().x, -1.0);
}

#[test]
fn interior_step_keeps_heading() {
    let (before, ball) = single_step(Vec2::new(100.0, 50.0), Vec2::new(0.6, 0.8));
    assert_eq!(ball.direction(), before);
}
