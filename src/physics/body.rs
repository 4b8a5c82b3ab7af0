// body.rs - Point mass with explicit Euler integration
//
// Forces accumulate into `acceleration` (already divided by mass) and are
// consumed by integrate(). Each applied force also counts one damping step;
// integrate() applies them all at once as damping^steps.

use glam::Vec2;

use crate::error::{Result, SceneError};

#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub position: Vec2,
    pub velocity: Vec2,
    acceleration: Vec2,
    mass: f32,
    pub friction: f32,
    pub damping: f32,
    /// Kinematic bodies are placed by the caller and never integrated
    pub pinned: bool,
    damping_steps: u32,
}

impl PhysicsBody {
    pub fn new(position: Vec2, mass: f32, friction: f32, damping: f32) -> Result<Self> {
        if !(mass > 0.0) || !mass.is_finite() {
            return Err(SceneError::InvalidMass(mass));
        }
        Ok(Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass,
            friction,
            damping,
            pinned: false,
            damping_steps: 0,
        })
    }

    pub fn pinned(position: Vec2, mass: f32) -> Result<Self> {
        let mut body = Self::new(position, mass, 0.0, 1.0)?;
        body.pinned = true;
        Ok(body)
    }

    #[inline]
    pub fn mass(&self) -> f32 { self.mass }

    #[inline]
    pub fn acceleration(&self) -> Vec2 { self.acceleration }

    /// F = ma
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force / self.mass;
        self.damping_steps += 1;
    }

    pub fn apply_gravity(&mut self, gravity: f32, divisor: f32) {
        let divisor = if divisor > 0.0 { divisor } else { 1.0 };
        self.apply_force(Vec2::new(0.0, self.mass * gravity / divisor));
    }

    pub fn apply_friction(&mut self) {
        self.apply_force(-self.velocity * self.friction);
    }

    /// Push away from `center` when closer than `radius`, strongest at the center.
    pub fn apply_repulsion(&mut self, center: Vec2, radius: f32, strength: f32) {
        let offset = self.position - center;
        let dist = offset.length();
        if dist >= radius || dist < 1e-4 { return; }
        let falloff = 1.0 - dist / radius;
        self.apply_force(offset / dist * strength * falloff * self.mass);
    }

    /// Move the body by hand (kinematic driver), zeroing its velocity.
    pub fn place(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self.damping_steps = 0;
    }

    /// One Euler step. `ground_y` is the ground line in px; bodies below it are
    /// put back on it and bounce with their friction as restitution.
    pub fn integrate(&mut self, ground_y: Option<f32>) {
        if self.pinned {
            self.acceleration = Vec2::ZERO;
            self.damping_steps = 0;
            return;
        }

        self.velocity *= self.damping.powi(self.damping_steps as i32);
        self.velocity += self.acceleration;
        self.position += self.velocity;

        if let Some(ground) = ground_y {
            if self.position.y > ground {
                self.position.y = ground;
                self.velocity.y = -self.velocity.y * self.friction;
            }
        }

        self.acceleration = Vec2::ZERO;
        self.damping_steps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_mass() {
        assert!(matches!(PhysicsBody::new(Vec2::ZERO, 0.0, 0.0, 1.0), Err(SceneError::InvalidMass(_))));
        assert!(PhysicsBody::new(Vec2::ZERO, -2.0, 0.0, 1.0).is_err());
        assert!(PhysicsBody::new(Vec2::ZERO, f32::NAN, 0.0, 1.0).is_err());
        assert!(PhysicsBody::new(Vec2::ZERO, f32::INFINITY, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_force_divided_by_mass() {
        let mut b = PhysicsBody::new(Vec2::ZERO, 4.0, 0.0, 1.0).unwrap();
        b.apply_force(Vec2::new(8.0, -4.0));
        assert_eq!(b.acceleration(), Vec2::new(2.0, -1.0));
    }

    #[test]
    fn test_gravity_independent_of_mass() {
        let mut light = PhysicsBody::new(Vec2::ZERO, 1.0, 0.0, 1.0).unwrap();
        let mut heavy = PhysicsBody::new(Vec2::ZERO, 10.0, 0.0, 1.0).unwrap();
        light.apply_gravity(0.3, 1.0);
        heavy.apply_gravity(0.3, 1.0);
        assert!((light.acceleration().y - heavy.acceleration().y).abs() < 1e-6);
    }

    #[test]
    fn test_integrate_euler_and_reset() {
        let mut b = PhysicsBody::new(Vec2::new(1.0, 1.0), 1.0, 0.0, 1.0).unwrap();
        b.apply_force(Vec2::new(1.0, 2.0));
        b.integrate(None);
        assert_eq!(b.velocity, Vec2::new(1.0, 2.0));
        assert_eq!(b.position, Vec2::new(2.0, 3.0));
        assert_eq!(b.acceleration(), Vec2::ZERO);
    }

    #[test]
    fn test_damping_compounds_per_force() {
        let mut b = PhysicsBody::new(Vec2::ZERO, 1.0, 0.0, 0.5).unwrap();
        b.velocity = Vec2::new(8.0, 0.0);
        b.apply_force(Vec2::ZERO);
        b.apply_force(Vec2::ZERO);
        b.integrate(None);
        assert_eq!(b.velocity, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_ground_collision_bounces_with_loss() {
        let mut b = PhysicsBody::new(Vec2::new(0.0, 95.0), 1.0, 0.5, 1.0).unwrap();
        b.velocity = Vec2::new(0.0, 10.0);
        b.integrate(Some(100.0));
        assert_eq!(b.position.y, 100.0);
        assert_eq!(b.velocity.y, -5.0);
    }

    #[test]
    fn test_pinned_body_does_not_move() {
        let mut b = PhysicsBody::pinned(Vec2::new(3.0, 3.0), 1.0).unwrap();
        b.apply_gravity(0.3, 1.0);
        b.integrate(None);
        assert_eq!(b.position, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_repulsion_pushes_outward_inside_radius_only() {
        let mut b = PhysicsBody::new(Vec2::new(10.0, 0.0), 1.0, 0.0, 1.0).unwrap();
        b.apply_repulsion(Vec2::ZERO, 45.0, 1.0);
        assert!(b.acceleration().x > 0.0);

        let mut far = PhysicsBody::new(Vec2::new(100.0, 0.0), 1.0, 0.0, 1.0).unwrap();
        far.apply_repulsion(Vec2::ZERO, 45.0, 1.0);
        assert_eq!(far.acceleration(), Vec2::ZERO);
    }
}
