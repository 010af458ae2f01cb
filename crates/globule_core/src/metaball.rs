//! A single influence source

use glam::Vec2;

/// Point source whose field contribution is `radius² / distance²`.
///
/// The heading is unit length at creation and the radius never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metaball {
    position: Vec2,
    direction: Vec2,
    radius: f32,
    active: bool,
}

impl Metaball {
    /// Ball heading along `angle` radians, measured from +x toward +y.
    pub fn from_angle(position: Vec2, angle: f32, radius: f32) -> Self {
        Self::with_direction(position, Vec2::from_angle(angle), radius)
    }

    /// Ball heading along `direction`, normalized. A zero vector heads along +x.
    pub fn with_direction(position: Vec2, direction: Vec2, radius: f32) -> Self {
        Self {
            position,
            direction: direction.try_normalize().unwrap_or(Vec2::X),
            radius,
            active: true,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Move one step and bounce off the `[0, bounds]` rectangle.
    ///
    /// Each axis reflects independently once the coordinate reaches or passes
    /// an edge. The position itself is left where the step put it, so a ball
    /// can sit on or just past the boundary for a frame before heading back.
    pub fn step(&mut self, bounds: Vec2, speed: f32) {
        self.position += self.direction * speed;

        if self.position.x >= bounds.x || self.position.x <= 0.0 {
            self.direction.x = -self.direction.x;
        }
        if self.position.y >= bounds.y || self.position.y <= 0.0 {
            self.direction.y = -self.direction.y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn headings_are_unit_length() {
        let a = Metaball::from_angle(Vec2::ZERO, 1.234, 10.0);
        let b = Metaball::with_direction(Vec2::ZERO, Vec2::new(3.0, 4.0), 10.0);
        assert!((a.direction().length() - 1.0).abs() < 1e-6);
        assert!((b.direction().length() - 1.0).abs() < 1e-6);
        assert_eq!(b.direction(), Vec2::new(0.6, 0.8));
    }

    #[test]
    fn zero_direction_falls_back_to_x_axis() {
        let ball = Metaball::with_direction(Vec2::ZERO, Vec2::ZERO, 5.0);
        assert_eq!(ball.direction(), Vec2::X);
    }

    #[test]
    fn angle_maps_to_cos_sin() {
        let ball = Metaball::from_angle(Vec2::ZERO, FRAC_PI_2, 5.0);
        assert!(ball.direction().x.abs() < 1e-6);
        assert!((ball.direction().y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn step_overshoots_without_clamping() {
        let mut ball = Metaball::with_direction(Vec2::new(199.0, 50.0), Vec2::X, 5.0);
        ball.step(Vec2::new(200.0, 100.0), 2.0);

        assert_eq!(ball.position(), Vec2::new(201.0, 50.0));
        assert_eq!(ball.direction(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn radius_is_untouched_by_motion() {
        let mut ball = Metaball::from_angle(Vec2::new(10.0, 10.0), 0.3, 25.0);
        for _ in 0..50 {
            ball.step(Vec2::new(40.0, 40.0), 3.0);
        }
        assert_eq!(ball.radius(), 25.0);
        assert!(ball.is_active());
    }
}
