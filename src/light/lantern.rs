// lantern.rs - Lantern hanging from a simulated chain
//
// bodies[0] is the kinematic top link glued to the anchor, bodies[1..n] are
// free links, bodies[n] is the lantern. Link i+1 is always constrained to
// link i and the lantern to the last link. Shading treats the lantern as
// the light; the chain is only drawn.

use glam::Vec2;

use super::{Fire, LightSource};
use crate::color::Rgba;
use crate::config::{LanternConfig, PhysicsConfig};
use crate::error::Result;
use crate::grid::PixelGrid;
use crate::physics::{DistanceConstraint, PhysicsBody, relax};
use crate::sim::SceneRng;

/// Everything a light needs from the current tick
#[derive(Debug, Clone, Copy)]
pub struct LightContext {
    pub anchor: Vec2,
    pub pointer: Vec2,
    pub wind: Vec2,
    /// Ground line in px
    pub ground_y: f32,
    /// Aura halo radius multiplier
    pub aura_reach: f32,
}

#[derive(Debug, Clone)]
pub struct SuspendedLantern {
    pub light: LightSource,
    bodies: Vec<PhysicsBody>,
    constraints: Vec<DistanceConstraint>,
    physics: PhysicsConfig,
    chain_color: Rgba,
    body_radius: f32,
    tilt: f32,
    tilt_smoothing: f32,
    max_tilt: f32,
    fire: Fire,
}

impl SuspendedLantern {
    pub fn new(
        anchor: Vec2,
        cfg: &LanternConfig,
        physics: &PhysicsConfig,
        resolution: u32,
        area_scale: f32,
    ) -> Result<Self> {
        let res = resolution.max(1) as f32;
        let links = cfg.link_count.max(1);
        let spacing = cfg.link_length * res;

        let mut bodies = Vec::with_capacity(links + 1);
        bodies.push(PhysicsBody::pinned(anchor, cfg.link_mass)?);
        for i in 1..links {
            let pos = anchor + Vec2::new(0.0, i as f32 * spacing);
            bodies.push(PhysicsBody::new(pos, cfg.link_mass, cfg.friction, cfg.damping)?);
        }
        let lantern_pos = anchor + Vec2::new(0.0, links as f32 * spacing);
        bodies.push(PhysicsBody::new(lantern_pos, cfg.lantern_mass, cfg.friction, cfg.damping)?);

        let constraints = (0..links)
            .map(|i| DistanceConstraint::new(i, i + 1, cfg.link_length, physics))
            .collect();

        let color: Rgba = cfg.color.parse()?;
        let tint: Rgba = cfg.tint.parse()?;
        let ember_colors = [cfg.ember_colors[0].parse()?, cfg.ember_colors[1].parse()?];

        log::debug!("lantern: {} links, spacing {:.1}px", links, spacing);

        Ok(Self {
            light: LightSource::new(lantern_pos, cfg.radius, color, tint, resolution, area_scale),
            bodies,
            constraints,
            physics: physics.clone(),
            chain_color: cfg.chain_color.parse()?,
            body_radius: cfg.body_radius.max(1.0),
            tilt: 0.0,
            tilt_smoothing: cfg.tilt_smoothing.clamp(0.0, 1.0),
            max_tilt: cfg.max_tilt,
            fire: Fire::new(lantern_pos, cfg.body_radius * 0.5, ember_colors),
        })
    }

    pub fn bodies(&self) -> &[PhysicsBody] { &self.bodies }

    pub fn constraints(&self) -> &[DistanceConstraint] { &self.constraints }

    pub fn lantern(&self) -> &PhysicsBody {
        &self.bodies[self.bodies.len() - 1]
    }

    /// Smoothed rendering angle, radians; positive swings right
    pub fn tilt(&self) -> f32 { self.tilt }

    pub fn step(&mut self, ctx: &LightContext, rng: &mut SceneRng) {
        let res = self.light.resolution();
        let p = &self.physics;

        self.bodies[0].place(ctx.anchor);

        for body in self.bodies.iter_mut().skip(1) {
            body.apply_gravity(p.gravity, p.gravity_divisor);
            body.apply_force(ctx.wind);
            body.apply_friction();
            body.apply_repulsion(ctx.pointer, p.mouse_radius, p.mouse_repulsion);
            body.integrate(Some(ctx.ground_y));
        }

        relax(&mut self.bodies, &self.constraints, p.constraint_iterations, res);

        let n = self.bodies.len();
        let lantern = self.bodies[n - 1].position;
        let last_link = self.bodies[n - 2].position;
        let offset = lantern - last_link;
        let target = offset.x.atan2(offset.y.max(1e-3)).clamp(-self.max_tilt, self.max_tilt);
        self.tilt += (target - self.tilt) * self.tilt_smoothing;

        self.light.move_to(lantern);
        let center = self.body_center();
        self.fire.update(center, res, rng);
    }

    /// Center of the lantern body in px, hanging below the attachment point
    fn body_center(&self) -> Vec2 {
        let res = self.light.resolution();
        let dir = Vec2::new(self.tilt.sin(), self.tilt.cos());
        self.lantern().position + dir * self.body_radius * res
    }

    pub fn render(&self, grid: &mut PixelGrid, intensity: f32) {
        let res = grid.resolution() as f32;

        for (i, pair) in self.bodies.windows(2).enumerate() {
            let a = pair[0].position / res;
            let b = pair[1].position / res;
            let color = if i % 2 == 0 { self.chain_color.fade(0.5) } else { self.chain_color };
            grid.draw_line(a.x, a.y, b.x, b.y, color);
        }

        let center = self.body_center() / res;
        let r = self.body_radius;
        let ring = self.light.color.fade(intensity.clamp(0.0, 1.0));
        let steps = (r * 12.0).ceil().max(8.0) as i32;
        for s in 0..steps {
            let a = s as f32 / steps as f32 * std::f32::consts::TAU + self.tilt;
            let x = center.x + r * a.cos();
            let y = center.y + r * a.sin();
            grid.set_pixel(x.floor() as i32, y.floor() as i32, ring);
        }

        self.fire.render(grid, intensity.clamp(0.0, 1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn lantern_at(anchor: Vec2) -> SuspendedLantern {
        SuspendedLantern::new(anchor, &LanternConfig::default(), &PhysicsConfig::default(), 5, 3.0).unwrap()
    }

    fn calm(anchor: Vec2) -> LightContext {
        LightContext { anchor, pointer: Vec2::new(-1000.0, -1000.0), wind: Vec2::ZERO, ground_y: 10_000.0, aura_reach: 1.0 }
    }

    #[test]
    fn test_chain_topology() {
        let l = lantern_at(Vec2::new(100.0, 20.0));
        let n = LanternConfig::default().link_count;
        assert_eq!(l.bodies().len(), n + 1);
        assert_eq!(l.constraints().len(), n);
        for (i, c) in l.constraints().iter().enumerate() {
            assert_eq!((c.a, c.b), (i, i + 1));
        }
        assert!(l.bodies()[0].pinned);
        assert_eq!(l.lantern().mass(), LanternConfig::default().lantern_mass);
    }

    #[test]
    fn test_rejects_bad_mass_and_color() {
        let bad_mass = LanternConfig { lantern_mass: 0.0, ..LanternConfig::default() };
        assert!(SuspendedLantern::new(Vec2::ZERO, &bad_mass, &PhysicsConfig::default(), 5, 3.0).is_err());

        let bad_color = LanternConfig { tint: "warm".into(), ..LanternConfig::default() };
        assert!(SuspendedLantern::new(Vec2::ZERO, &bad_color, &PhysicsConfig::default(), 5, 3.0).is_err());
    }

    #[test]
    fn test_first_link_follows_anchor() {
        let mut rng = SceneRng::seed_from_u64(1);
        let mut l = lantern_at(Vec2::new(100.0, 20.0));
        let anchor = Vec2::new(140.0, 35.0);
        l.step(&calm(anchor), &mut rng);
        assert_eq!(l.bodies()[0].position, anchor);
    }

    #[test]
    fn test_hangs_below_anchor_at_rest() {
        let mut rng = SceneRng::seed_from_u64(1);
        let anchor = Vec2::new(100.0, 20.0);
        let mut l = lantern_at(anchor);
        for _ in 0..600 {
            l.step(&calm(anchor), &mut rng);
        }
        let lantern = l.lantern().position;
        assert!(lantern.y > anchor.y);
        assert!((lantern.x - anchor.x).abs() < 2.0);
        assert!(l.tilt().abs() < 0.1);

        let cfg = LanternConfig::default();
        let full = cfg.link_count as f32 * cfg.link_length * 5.0;
        let hang = lantern.y - anchor.y;
        assert!(hang > full * 0.5 && hang < full * 1.5, "hang {hang} vs {full}");
    }

    #[test]
    fn test_light_tracks_lantern_not_anchor() {
        let mut rng = SceneRng::seed_from_u64(1);
        let anchor = Vec2::new(100.0, 20.0);
        let mut l = lantern_at(anchor);
        l.step(&calm(anchor), &mut rng);
        assert_eq!(l.light.position, l.lantern().position);
        assert_ne!(l.light.position, anchor);
    }

    #[test]
    fn test_wind_swings_and_tilt_follows() {
        let mut rng = SceneRng::seed_from_u64(1);
        let anchor = Vec2::new(100.0, 20.0);
        let mut l = lantern_at(anchor);
        let ctx = LightContext { wind: Vec2::new(0.2, 0.0), ..calm(anchor) };
        for _ in 0..200 {
            l.step(&ctx, &mut rng);
        }
        assert!(l.lantern().position.x > anchor.x);
        assert!(l.tilt() > 0.0);
    }

    #[test]
    fn test_render_draws_chain_and_body() {
        let mut rng = SceneRng::seed_from_u64(1);
        let anchor = Vec2::new(100.0, 20.0);
        let mut l = lantern_at(anchor);
        l.step(&calm(anchor), &mut rng);
        let mut grid = PixelGrid::new(200, 200, 5);
        l.render(&mut grid, 1.0);
        assert!(grid.get_pixel(20, 4).is_some());
        assert!(grid.dirty_count() > 10);
    }
}
