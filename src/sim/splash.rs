// splash.rs - Water splash effects
//
// Small particles thrown up where a drop meets the ground. They drift up
// with a horizontal jitter and are shaded fresh each frame like the rain.

use super::{GroundHit, SceneRng, random_between, random_int};
use crate::color::Rgba;
use crate::config::SplashConfig;
use crate::grid::PixelGrid;
use crate::light::Light;
use crate::shading::{ShadeParams, shade_point};

pub struct Splashes {
    // Position, cells
    pub x: Vec<f32>,
    pub y: Vec<f32>,

    // Upward speed, cells/frame
    pub speed: Vec<f32>,
    pub frame: Vec<u32>,

    cfg: SplashConfig,
}

impl Splashes {
    pub fn new(cfg: &SplashConfig) -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            speed: Vec::new(),
            frame: Vec::new(),
            cfg: cfg.clone(),
        }
    }

    pub fn len(&self) -> usize { self.x.len() }

    pub fn is_empty(&self) -> bool { self.x.is_empty() }

    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.speed.clear();
        self.frame.clear();
    }

    /// Spawn between `min_count` and `max_count` splashes at the hit.
    pub fn on_ground_hit(&mut self, hit: GroundHit, rng: &mut SceneRng) {
        let count = random_int(rng, self.cfg.min_count as i32, self.cfg.max_count as i32).max(0);
        for _ in 0..count {
            if self.len() >= self.cfg.max_splashes { return; }
            self.x.push(hit.x);
            self.y.push(hit.y);
            self.speed.push(random_between(rng, 0.0, self.cfg.max_speed));
            self.frame.push(0);
        }
    }

    /// Advance, then drop splashes that expired or left the grid.
    pub fn update(&mut self, grid: &PixelGrid, rng: &mut SceneRng) {
        let (w, h) = (grid.width() as f32, grid.height() as f32);
        let mut write = 0;

        for read in 0..self.len() {
            let frame = self.frame[read] + 1;
            let y = self.y[read] - self.speed[read];
            let x = self.x[read] + random_int(rng, -1, 1) as f32;

            if frame >= self.cfg.duration { continue; }
            if x < 0.0 || x >= w || y < 0.0 || y >= h { continue; }

            self.x[write] = x;
            self.y[write] = y;
            self.speed[write] = self.speed[read];
            self.frame[write] = frame;
            write += 1;
        }

        self.x.truncate(write);
        self.y.truncate(write);
        self.speed.truncate(write);
        self.frame.truncate(write);
    }

    pub fn render(&self, grid: &mut PixelGrid, lights: &[Light], base: Rgba, params: &ShadeParams) {
        for i in 0..self.len() {
            let (x, y) = (self.x[i].floor() as i32, self.y[i].floor() as i32);
            if !grid.in_bounds(x, y) { continue; }
            grid.set_pixel(x, y, shade_point(lights, x as f32, y as f32, base, params));
        }
    }
}
