// physics/ - Point masses, distance constraints, wind
//
// Bodies are stored in plain slices; constraints refer to them by index.

mod body;
mod constraint;
mod wind;

pub use body::PhysicsBody;
pub use constraint::{ConstraintLimits, DistanceConstraint};
pub use wind::WindField;

/// Run every constraint `iterations` times over the body set.
pub fn relax(bodies: &mut [PhysicsBody], constraints: &[DistanceConstraint], iterations: u32, resolution: f32) {
    for _ in 0..iterations {
        for c in constraints {
            c.apply(bodies, resolution);
        }
    }
}
