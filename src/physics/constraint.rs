// constraint.rs - Two-body distance constraint
//
// Bodies live in a slice owned by the caller; a constraint only stores the
// two indices. Each apply() nudges both velocities and positions toward the
// rest length, split by mass so the heavier body moves less.

use super::PhysicsBody;
use crate::config::PhysicsConfig;

#[derive(Debug, Clone, Copy)]
pub struct ConstraintLimits {
    pub max_difference: f32,
    pub max_adjustment: f32,
    pub max_velocity_correction: f32,
}

impl From<&PhysicsConfig> for ConstraintLimits {
    fn from(cfg: &PhysicsConfig) -> Self {
        Self {
            max_difference: cfg.max_difference,
            max_adjustment: cfg.max_adjustment,
            max_velocity_correction: cfg.max_velocity_correction,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DistanceConstraint {
    pub a: usize,
    pub b: usize,
    /// Rest length in grid cells (scaled by resolution when applied)
    pub rest_length: f32,
    pub stiffness: f32,
    pub limits: ConstraintLimits,
    /// Stretch ratio at which the link would snap. Kept for tuning only:
    /// nothing sets `broken`, over-extension is simply corrected.
    pub break_threshold: f32,
    pub broken: bool,
}

impl DistanceConstraint {
    pub fn new(a: usize, b: usize, rest_length: f32, cfg: &PhysicsConfig) -> Self {
        Self {
            a,
            b,
            rest_length,
            stiffness: cfg.stiffness.clamp(0.0, 1.0),
            limits: cfg.into(),
            break_threshold: cfg.break_threshold,
            broken: false,
        }
    }

    /// Target separation in px
    #[inline]
    pub fn target(&self, resolution: f32) -> f32 {
        self.rest_length * resolution
    }

    /// One relaxation pass. Returns the clamped length error that was corrected.
    pub fn apply(&self, bodies: &mut [PhysicsBody], resolution: f32) -> f32 {
        if self.broken { return 0.0; }
        let Some((b1, b2)) = pair_mut(bodies, self.a, self.b) else { return 0.0 };

        let delta = b2.position - b1.position;
        let distance = delta.length();
        if distance < 1e-6 { return 0.0; }
        let dir = delta / distance;

        let lim = self.limits;
        let difference = (self.target(resolution) - distance).clamp(-lim.max_difference, lim.max_difference);

        // share of the correction each body takes: the other body's mass fraction
        let (share1, share2) = match (b1.pinned, b2.pinned) {
            (true, true) => return 0.0,
            (true, false) => (0.0, 1.0),
            (false, true) => (1.0, 0.0),
            (false, false) => {
                let total = b1.mass() + b2.mass();
                (b2.mass() / total, b1.mass() / total)
            }
        };

        let adj1 = (difference * share1).clamp(-lim.max_adjustment, lim.max_adjustment);
        let adj2 = (difference * share2).clamp(-lim.max_adjustment, lim.max_adjustment);

        let vel1 = adj1.clamp(-lim.max_velocity_correction, lim.max_velocity_correction);
        let vel2 = adj2.clamp(-lim.max_velocity_correction, lim.max_velocity_correction);

        if !b1.pinned {
            b1.velocity -= dir * vel1;
            b1.position -= dir * adj1 * self.stiffness;
        }
        if !b2.pinned {
            b2.velocity += dir * vel2;
            b2.position += dir * adj2 * self.stiffness;
        }

        difference
    }
}

/// Two distinct mutable elements of a slice
fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> Option<(&mut T, &mut T)> {
    if a == b || a >= items.len() || b >= items.len() {
        return None;
    }
    if a < b {
        let (lo, hi) = items.split_at_mut(b);
        Some((&mut lo[a], &mut hi[0]))
    } else {
        let (lo, hi) = items.split_at_mut(a);
        Some((&mut hi[0], &mut lo[b]))
    }
}
