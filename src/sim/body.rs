//! Rigid sphere body
//!
//! Forces accumulate between steps and are consumed by [`RigidBody::integrate`];
//! impulses change velocity immediately. Semi-implicit Euler.

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub radius: f32,
    /// Force accumulated since the last step
    #[serde(skip)]
    force: Vec3,
}

impl RigidBody {
    pub fn new(position: Vec3, mass: f32, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass,
            radius,
            force: Vec3::ZERO,
        }
    }

    /// Add a continuous force for the next step
    pub fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Apply an instantaneous change of momentum
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse / self.mass;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Advance one step under accumulated force plus gravity, then clear the accumulator
    pub fn integrate(&mut self, dt: f32, gravity: Vec3, damping: f32) {
        let accel = self.force / self.mass + gravity;
        self.velocity += accel * dt;
        if damping > 0.0 {
            self.velocity *= (1.0 - damping * dt).max(0.0);
        }
        self.position += self.velocity * dt;
        self.force = Vec3::ZERO;
    }

    /// Cancel velocity into a surface and push out of it
    pub fn resolve_contact(&mut self, normal: Vec3, penetration: f32, restitution: f32) {
        self.position += normal * penetration;
        let vn = self.velocity.dot(normal);
        if vn < 0.0 {
            self.velocity -= normal * vn * (1.0 + restitution);
        }
    }

    /// Spin to match rolling without slipping on a surface with `normal`
    pub fn roll_on(&mut self, normal: Vec3) {
        self.angular_velocity = normal.cross(self.velocity) / self.radius;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_is_consumed_per_step() {
        let mut body = RigidBody::new(Vec3::ZERO, 2.0, 0.5);
        body.add_force(Vec3::new(4.0, 0.0, 0.0));
        body.integrate(0.5, Vec3::ZERO, 0.0);
        assert!((body.velocity.x - 1.0).abs() < 1e-6);
        assert_eq!(body.force, Vec3::ZERO);

        body.integrate(0.5, Vec3::ZERO, 0.0);
        assert!((body.velocity.x - 1.0).abs() < 1e-6, "no force, no acceleration");
    }

    #[test]
    fn test_impulse_is_immediate() {
        let mut body = RigidBody::new(Vec3::ZERO, 1.0, 0.5);
        body.apply_impulse(Vec3::Y * 2.0);
        assert_eq!(body.velocity, Vec3::Y * 2.0);
    }

    #[test]
    fn test_resolve_contact_removes_inward_velocity() {
        let mut body = RigidBody::new(Vec3::new(0.0, 0.4, 0.0), 1.0, 0.5);
        body.velocity = Vec3::new(3.0, -2.0, 0.0);
        body.resolve_contact(Vec3::Y, 0.1, 0.0);
        assert!((body.position.y - 0.5).abs() < 1e-6);
        assert_eq!(body.velocity, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_roll_on_ground() {
        let mut body = RigidBody::new(Vec3::ZERO, 1.0, 0.5);
        body.velocity = Vec3::new(0.0, 0.0, 1.0);
        body.roll_on(Vec3::Y);
        // Rolling forward (+z) spins about +x
        assert!((body.angular_velocity.x - 2.0).abs() < 1e-6);
    }
}
