// aura.rs - Purple halo that follows the pointer
//
// A light source plus two particle pools: ambient particles drift out of
// the center continuously, burst particles are thrown out on a click. The
// halo itself is a precomputed falloff kernel blended over whatever is
// already in the grid this frame.

use glam::Vec2;

use super::{SceneRng, random_between};
use crate::color::Rgba;
use crate::config::AuraConfig;
use crate::error::Result;
use crate::grid::PixelGrid;
use crate::light::LightSource;

const FLOAT_DRAG: f32 = 0.96;
const BURST_DRAG: f32 = 0.92;
const SPAWN_JITTER: f32 = 6.0;
const BURST_JITTER: f32 = 3.0;
const NEIGHBOR_BLEED: f32 = 0.35;
const BURST_ALPHA: f32 = 0.45;
const MAX_MULTIPLIER: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelCell {
    pub dx: i32,
    pub dy: i32,
    pub alpha: f32,
}

/// Radial falloff `alpha = base * (1 - d^2/R^2)^2`, precomputed per radius.
#[derive(Debug, Clone, Default)]
pub struct FalloffKernel {
    radius: i32,
    cells: Vec<KernelCell>,
}

impl FalloffKernel {
    pub fn new(radius_cells: i32, base_alpha: f32) -> Self {
        let r = radius_cells.max(1);
        let max_sq = (r * r) as f32;
        // large halos are sampled every other cell
        let stride = if r > 18 { 2 } else { 1 };

        let mut cells = Vec::new();
        for dy in (-r..=r).step_by(stride) {
            for dx in (-r..=r).step_by(stride) {
                let dist_sq = (dx * dx + dy * dy) as f32;
                if dist_sq > max_sq { continue; }
                let n = 1.0 - dist_sq / max_sq;
                let alpha = base_alpha * n * n;
                if alpha < 0.01 { continue; }
                cells.push(KernelCell { dx, dy, alpha });
            }
        }
        Self { radius: r, cells }
    }

    pub fn radius(&self) -> i32 { self.radius }

    pub fn cells(&self) -> &[KernelCell] { &self.cells }
}

#[derive(Debug, Clone, Copy)]
struct AuraParticle {
    pos: Vec2,
    vel: Vec2,
    life: u32,
    max_life: u32,
    radius: f32,
}

impl AuraParticle {
    #[inline]
    fn life_fraction(&self) -> f32 {
        self.life as f32 / self.max_life.max(1) as f32
    }

    fn advance(&mut self, drag: f32) {
        self.pos += self.vel;
        self.vel *= drag;
        self.life = self.life.saturating_sub(1);
    }
}

fn age(pool: &mut Vec<AuraParticle>, drag: f32) {
    let mut i = pool.len();
    while i > 0 {
        i -= 1;
        pool[i].advance(drag);
        if pool[i].life == 0 {
            pool.swap_remove(i);
        }
    }
}

#[derive(Debug, Clone)]
pub struct PurpleAura {
    light: LightSource,
    cfg: AuraConfig,
    particle_color: Rgba,
    reach: f32,
    kernel: FalloffKernel,
    particles: Vec<AuraParticle>,
    bursts: Vec<AuraParticle>,
}

impl PurpleAura {
    pub fn new(anchor: Vec2, cfg: &AuraConfig, resolution: u32, area_scale: f32) -> Result<Self> {
        let color: Rgba = cfg.color.parse()?;
        let particle_color: Rgba = cfg.particle_color.parse()?;
        let light = LightSource::new(anchor, cfg.radius, color, color, resolution, area_scale);
        let kernel = FalloffKernel::new(Self::radius_cells(cfg.radius, resolution), cfg.base_alpha);

        Ok(Self {
            light,
            cfg: cfg.clone(),
            particle_color,
            reach: 1.0,
            kernel,
            particles: Vec::with_capacity(cfg.max_particles),
            bursts: Vec::new(),
        })
    }

    fn radius_cells(radius: f32, resolution: u32) -> i32 {
        ((radius / resolution.max(1) as f32).floor() as i32).max(1)
    }

    pub fn source(&self) -> &LightSource { &self.light }

    pub fn kernel(&self) -> &FalloffKernel { &self.kernel }

    pub fn particle_count(&self) -> usize { self.particles.len() }

    pub fn burst_count(&self) -> usize { self.bursts.len() }

    /// Follow the anchor, then spawn and age both pools.
    pub fn step(&mut self, anchor: Vec2, reach: f32, rng: &mut SceneRng) {
        self.light.move_to(anchor);
        self.set_reach(reach);
        self.spawn(rng);
        age(&mut self.particles, FLOAT_DRAG);
        age(&mut self.bursts, BURST_DRAG);
    }

    /// Scale the halo radius; the kernel is rebuilt only when its size in
    /// cells changes.
    pub fn set_reach(&mut self, reach: f32) {
        self.reach = reach.max(0.0);
        let res = self.light.resolution() as u32;
        let cells = Self::radius_cells(self.cfg.radius * self.reach, res);
        if cells != self.kernel.radius() {
            log::trace!("aura kernel rebuilt: {} -> {} cells", self.kernel.radius(), cells);
            self.kernel = FalloffKernel::new(cells, self.cfg.base_alpha);
        }
    }

    fn spawn(&mut self, rng: &mut SceneRng) {
        let c = &self.cfg;
        let [min_r, max_r] = c.particle_radius;
        for _ in 0..c.spawn_per_frame {
            if self.particles.len() >= c.max_particles { break; }
            let angle = random_between(rng, 0.0, std::f32::consts::TAU);
            let speed = random_between(rng, c.particle_speed * 0.4, c.particle_speed);
            let offset = Vec2::new(
                random_between(rng, -SPAWN_JITTER, SPAWN_JITTER),
                random_between(rng, -SPAWN_JITTER, SPAWN_JITTER),
            );
            self.particles.push(AuraParticle {
                pos: self.light.position + offset,
                vel: Vec2::from_angle(angle) * speed,
                life: c.particle_life,
                max_life: c.particle_life,
                radius: random_between(rng, min_r, max_r),
            });
        }
    }

    /// Throw a ring of short-lived particles out of the center.
    pub fn trigger_burst(&mut self, rng: &mut SceneRng) {
        let c = &self.cfg;
        for _ in 0..c.burst_particles {
            let angle = random_between(rng, 0.0, std::f32::consts::TAU);
            let speed = random_between(rng, c.burst_speed * 0.6, c.burst_speed);
            let offset = Vec2::new(
                random_between(rng, -BURST_JITTER, BURST_JITTER),
                random_between(rng, -BURST_JITTER, BURST_JITTER),
            );
            self.bursts.push(AuraParticle {
                pos: self.light.position + offset,
                vel: Vec2::from_angle(angle) * speed,
                life: c.burst_life,
                max_life: c.burst_life,
                radius: 1.0,
            });
        }
    }

    /// Blend halo and particles over the grid. `multiplier` is the combined
    /// light and aura level, clamped to [0, 1.5].
    pub fn render(&self, grid: &mut PixelGrid, multiplier: f32) {
        let m = multiplier.clamp(0.0, MAX_MULTIPLIER);
        let res = grid.resolution() as f32;
        let center = self.light.position / res;
        let (cx, cy) = (center.x.floor() as i32, center.y.floor() as i32);

        for k in self.kernel.cells() {
            grid.blend_pixel(cx + k.dx, cy + k.dy, self.light.color, k.alpha * m);
        }

        let max_radius = self.cfg.particle_radius[1].max(1e-3);
        for p in &self.particles {
            let life = p.life_fraction();
            if life <= 0.0 { continue; }
            let (x, y) = cell_of(p.pos, res);
            if !grid.in_bounds(x, y) { continue; }

            let alpha = self.cfg.particle_boost_alpha * life * (p.radius / max_radius) * m;
            grid.blend_pixel(x, y, self.particle_color, alpha);
            if p.radius > 3.0 {
                let bleed = alpha * NEIGHBOR_BLEED;
                for (nx, ny) in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
                    grid.blend_pixel(nx, ny, self.particle_color, bleed);
                }
            }
        }

        for p in &self.bursts {
            let life = p.life_fraction();
            if life <= 0.0 { continue; }
            let (x, y) = cell_of(p.pos, res);
            let alpha = self.cfg.particle_boost_alpha * BURST_ALPHA * life * m;
            grid.blend_pixel(x, y, self.particle_color, alpha);
        }
    }
}

#[inline]
fn cell_of(pos: Vec2, res: f32) -> (i32, i32) {
    ((pos.x / res).floor() as i32, (pos.y / res).floor() as i32)
}
