// droplet.rs - Falling rain droplets
//
// Structure-of-Arrays layout for cache-friendly iteration. Positions are in
// grid cells. A drop falls along one wind-biased angle fixed at spawn; while
// an aura pulse is active, drops in reach are captured and orbit the pulse
// center until it ends.

use glam::Vec2;

use super::{SceneRng, Splashes, random_between};
use crate::color::Rgba;
use crate::config::RainConfig;
use crate::grid::PixelGrid;
use crate::light::Light;
use crate::shading::{ShadeParams, shade_point};

/// Where a drop reached the ground line, in cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub x: f32,
    pub y: f32,
}

/// Per-tick inputs for the rain
#[derive(Debug, Clone, Copy)]
pub struct RainContext {
    /// Tilt from vertical in degrees; negative leans right
    pub tilt_deg: f32,
    /// Drops spawned per frame (fractional values accumulate)
    pub density: f32,
    /// Pulse center in cells while an aura pulse is running
    pub pulse: Option<Vec2>,
    /// Capture radius around the pulse, cells
    pub reach: f32,
    pub pull: f32,
    pub spin: f32,
}

impl Default for RainContext {
    fn default() -> Self {
        Self { tilt_deg: 0.0, density: 1.0, pulse: None, reach: 0.0, pull: 0.05, spin: 0.1 }
    }
}

pub struct Droplets {
    // Position of the head, cells
    pub x: Vec<f32>,
    pub y: Vec<f32>,

    // Fixed fall direction and speed
    pub dir: Vec<Vec2>,
    pub speed: Vec<f32>,
    pub len: Vec<u32>,

    // Orbit state
    pub vel: Vec<Vec2>,
    pub orbiting: Vec<bool>,

    cfg: RainConfig,
    spawn_budget: f32,
}

impl Droplets {
    pub fn new(cfg: &RainConfig) -> Self {
        let cap = cfg.max_drops;
        Self {
            x: Vec::with_capacity(cap),
            y: Vec::with_capacity(cap),
            dir: Vec::with_capacity(cap),
            speed: Vec::with_capacity(cap),
            len: Vec::with_capacity(cap),
            vel: Vec::with_capacity(cap),
            orbiting: Vec::with_capacity(cap),
            cfg: cfg.clone(),
            spawn_budget: 0.0,
        }
    }

    pub fn len(&self) -> usize { self.x.len() }

    pub fn is_empty(&self) -> bool { self.x.is_empty() }

    pub fn orbiting_count(&self) -> usize {
        self.orbiting.iter().filter(|&&o| o).count()
    }

    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.dir.clear();
        self.speed.clear();
        self.len.clear();
        self.vel.clear();
        self.orbiting.clear();
        self.spawn_budget = 0.0;
    }

    /// Spawn `count` drops above the grid, all falling at `tilt_deg`.
    pub fn spawn(&mut self, count: usize, grid: &PixelGrid, tilt_deg: f32, rng: &mut SceneRng) {
        let res = grid.resolution() as f32;
        let (w, h) = (grid.width() as f32, grid.height() as f32);
        let angle = std::f32::consts::FRAC_PI_2 + tilt_deg.to_radians();
        let dir = Vec2::from_angle(angle);

        // start upwind far enough that drops can reach the whole width
        let drift = if dir.y > 1e-3 { dir.x / dir.y * h } else { 0.0 };
        let (min_x, max_x) = ((-drift).min(0.0), w + (-drift).max(0.0));

        for _ in 0..count {
            if self.len() >= self.cfg.max_drops { return; }

            let c = &self.cfg;
            let len = random_between(rng, c.line_length[0], c.line_length[1]).floor().max(1.0);
            let width = random_between(rng, c.width[0], c.width[1]);
            let speed = (random_between(rng, c.speed[0], c.speed[1]) / res + width).floor().max(1.0);

            self.x.push(random_between(rng, min_x, max_x).floor());
            self.y.push(-len);
            self.dir.push(dir);
            self.speed.push(speed);
            self.len.push(len as u32);
            self.vel.push(dir * speed);
            self.orbiting.push(false);
        }
    }

    /// Spawn for this frame, advance every drop, and hand ground hits to the
    /// splash spawner.
    pub fn update(
        &mut self,
        grid: &PixelGrid,
        ground_level: i32,
        ctx: &RainContext,
        splashes: &mut Splashes,
        rng: &mut SceneRng,
    ) {
        self.spawn_budget += ctx.density.max(0.0);
        let count = self.spawn_budget.floor();
        self.spawn_budget -= count;
        self.spawn(count as usize, grid, ctx.tilt_deg, rng);

        let ground = (grid.height() - ground_level) as f32;
        let width = grid.width() as f32;
        let mut write = 0;

        for read in 0..self.len() {
            // landed last tick and was drawn on the ground line
            if self.y[read] >= ground {
                continue;
            }

            let mut pos = Vec2::new(self.x[read], self.y[read]);
            let mut vel = self.vel[read];
            let mut orbiting = self.orbiting[read];

            match ctx.pulse {
                Some(center) => {
                    if !orbiting && pos.distance(center) <= ctx.reach {
                        orbiting = true;
                    }
                }
                None => {
                    if orbiting {
                        orbiting = false;
                        vel = self.dir[read] * self.speed[read];
                    }
                }
            }

            match (orbiting, ctx.pulse) {
                (true, Some(center)) => {
                    vel = self.orbit_velocity(pos, vel, center, ctx);
                    pos += vel;
                }
                _ => pos += self.dir[read] * self.speed[read],
            }

            if pos.y >= ground {
                pos.y = ground;
                splashes.on_ground_hit(GroundHit { x: pos.x, y: ground }, rng);
            } else if leaves_horizontally(pos.x, if orbiting { vel.x } else { self.dir[read].x }, width) {
                continue;
            }

            self.x[write] = pos.x;
            self.y[write] = pos.y;
            self.dir[write] = self.dir[read];
            self.speed[write] = self.speed[read];
            self.len[write] = self.len[read];
            self.vel[write] = vel;
            self.orbiting[write] = orbiting;
            write += 1;
        }

        self.truncate(write);
    }

    fn orbit_velocity(&self, pos: Vec2, vel: Vec2, center: Vec2, ctx: &RainContext) -> Vec2 {
        let to_center = center - pos;
        let dist = to_center.length().max(1.0);
        let attraction = to_center * ctx.pull;
        let tangent = to_center.perp() / dist * ctx.spin;
        let gravity = Vec2::new(0.0, self.cfg.orbit_gravity);

        let v = (vel + attraction + tangent + gravity) * self.cfg.orbit_damping;
        v.clamp_length_max(self.cfg.orbit_max_speed)
    }

    fn truncate(&mut self, n: usize) {
        self.x.truncate(n);
        self.y.truncate(n);
        self.dir.truncate(n);
        self.speed.truncate(n);
        self.len.truncate(n);
        self.vel.truncate(n);
        self.orbiting.truncate(n);
    }

    /// Draw each drop as a short line; every sample is shaded on its own.
    pub fn render(&self, grid: &mut PixelGrid, lights: &[Light], base: Rgba, params: &ShadeParams) {
        for i in 0..self.len() {
            let dir = if self.orbiting[i] {
                self.vel[i].try_normalize().unwrap_or(self.dir[i])
            } else {
                self.dir[i]
            };
            for s in 0..self.len[i] {
                let x = (self.x[i] + dir.x * s as f32).floor() as i32;
                let y = (self.y[i] + dir.y * s as f32).floor() as i32;
                if !grid.in_bounds(x, y) { continue; }
                let color = shade_point(lights, x as f32, y as f32, base, params);
                grid.set_pixel(x, y, color);
            }
        }
    }
}

/// A drop is gone once it is past the grid edge it is moving toward.
#[inline]
fn leaves_horizontally(x: f32, dx: f32, width: f32) -> bool {
    (dx >= 0.0 && x > width) || (dx < 0.0 && x < 0.0) || x < -2.0 * width || x > 3.0 * width
}
