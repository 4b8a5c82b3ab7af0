// light/ - Light sources
//
// Every variant embeds a LightSource (position + falloff) and adds its own
// behavior on top. Shading only ever asks a light for its distance to a
// cell and its tint, so new variants don't touch the shading code.

mod fire;
mod lantern;
mod point;

pub use fire::Fire;
pub use lantern::{LightContext, SuspendedLantern};
pub use point::LightSource;

use glam::Vec2;

use crate::color::Rgba;
use crate::grid::PixelGrid;
use crate::sim::{PurpleAura, SceneRng};

/// Global multipliers applied when drawing lights this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightLevels {
    pub light: f32,
    pub aura: f32,
}

impl Default for LightLevels {
    fn default() -> Self {
        Self { light: 1.0, aura: 1.0 }
    }
}

pub enum Light {
    Point(LightSource),
    Lantern(Box<SuspendedLantern>),
    Aura(Box<PurpleAura>),
}

impl Light {
    pub fn source(&self) -> &LightSource {
        match self {
            Light::Point(l) => l,
            Light::Lantern(l) => &l.light,
            Light::Aura(a) => a.source(),
        }
    }

    /// Screen-space position, px
    pub fn position(&self) -> Vec2 {
        self.source().position
    }

    pub fn grid_position(&self) -> Vec2 {
        self.source().grid_position()
    }

    /// Normalized distance to cell (x, y); for a lantern this is measured
    /// from the lantern itself, never the anchor.
    pub fn distance(&self, x: f32, y: f32) -> f32 {
        self.source().distance(x, y)
    }

    pub fn tint(&self) -> Rgba {
        self.source().tint
    }

    /// Advance one tick toward the anchor.
    pub fn step(&mut self, ctx: &LightContext, rng: &mut SceneRng) {
        match self {
            Light::Point(l) => l.move_to(ctx.anchor),
            Light::Lantern(l) => l.step(ctx, rng),
            Light::Aura(a) => a.step(ctx.anchor, ctx.aura_reach, rng),
        }
    }

    pub fn render(&self, grid: &mut PixelGrid, levels: LightLevels) {
        match self {
            Light::Point(l) => l.render(grid, levels.light),
            Light::Lantern(l) => l.render(grid, levels.light),
            Light::Aura(a) => a.render(grid, levels.light * levels.aura),
        }
    }

    pub fn as_aura_mut(&mut self) -> Option<&mut PurpleAura> {
        match self {
            Light::Aura(a) => Some(a.as_mut()),
            _ => None,
        }
    }

    pub fn as_aura(&self) -> Option<&PurpleAura> {
        match self {
            Light::Aura(a) => Some(a.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LanternConfig, PhysicsConfig};
    use rand::SeedableRng;

    fn ctx(anchor: Vec2) -> LightContext {
        LightContext { anchor, pointer: anchor, wind: Vec2::ZERO, ground_y: 1e4, aura_reach: 1.0 }
    }

    #[test]
    fn test_point_light_follows_anchor() {
        let mut rng = SceneRng::seed_from_u64(0);
        let src = LightSource::new(Vec2::ZERO, 50.0, Rgba::from_rgb(255, 255, 255), Rgba::from_rgb(255, 255, 255), 5, 3.0);
        let mut light = Light::Point(src);
        light.step(&ctx(Vec2::new(80.0, 45.0)), &mut rng);
        assert_eq!(light.grid_position(), Vec2::new(16.0, 9.0));
        assert!(light.distance(16.0, 9.0) < 1e-6);
    }

    #[test]
    fn test_lantern_distance_uses_bob() {
        let mut rng = SceneRng::seed_from_u64(0);
        let anchor = Vec2::new(100.0, 20.0);
        let lantern = SuspendedLantern::new(anchor, &LanternConfig::default(), &PhysicsConfig::default(), 5, 3.0).unwrap();
        let mut light = Light::Lantern(Box::new(lantern));
        light.step(&ctx(anchor), &mut rng);

        let bob = light.grid_position();
        assert!(light.distance(bob.x, bob.y) < 1e-6);
        assert!(light.distance(20.0, 4.0) > 0.0);
    }
}
