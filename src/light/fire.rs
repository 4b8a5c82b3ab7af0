// fire.rs - Ember emitter inside the lantern
//
// Embers are spawned in pairs every fourth tick and move on the same beat;
// they rise, fade with their remaining life, and drop out once it runs out.
// A two-color ring sits under the emitter center.

use glam::Vec2;

use crate::color::Rgba;
use crate::grid::PixelGrid;
use crate::sim::{SceneRng, random_between};

const EMIT_EVERY: u32 = 4;
const EMBERS_PER_EMIT: usize = 2;
const MAX_LIFE: f32 = 20.0;
const RISE: f32 = 0.5;
/// Inward offset of the inner ring, cells
const INNER_OFFSET: f32 = 1.5;

#[derive(Debug, Clone, Copy)]
struct Ember {
    pos: Vec2,
    vel: Vec2,
    life: f32,
    color: usize,
}

#[derive(Debug, Clone)]
pub struct Fire {
    /// Emitter center, px
    pub origin: Vec2,
    /// Spawn spread, cells
    radius: f32,
    colors: [Rgba; 2],
    embers: Vec<Ember>,
    counter: u32,
}

impl Fire {
    pub fn new(origin: Vec2, radius: f32, colors: [Rgba; 2]) -> Self {
        Self { origin, radius: radius.floor().max(1.0), colors, embers: Vec::new(), counter: 0 }
    }

    pub fn len(&self) -> usize { self.embers.len() }

    pub fn is_empty(&self) -> bool { self.embers.is_empty() }

    pub fn update(&mut self, origin: Vec2, resolution: f32, rng: &mut SceneRng) {
        self.origin = origin;
        if self.counter + 1 < EMIT_EVERY {
            self.counter += 1;
            return;
        }
        self.counter = 0;
        self.emit(resolution, rng);

        for e in &mut self.embers {
            e.life -= 1.0;
            e.pos += e.vel;
            e.vel.y -= RISE;
        }
        self.embers.retain(|e| e.life > 0.0);
    }

    fn emit(&mut self, resolution: f32, rng: &mut SceneRng) {
        let spread = self.radius * resolution;
        for _ in 0..EMBERS_PER_EMIT {
            let pos = self.origin + Vec2::new(
                random_between(rng, -spread / 2.0, spread / 2.0),
                random_between(rng, -spread / 2.0, spread / 2.0),
            );
            let vel = Vec2::new(random_between(rng, -1.0, 1.0), random_between(rng, -1.5, 0.5));
            // survives at least the aging pass that follows its emit
            let life = random_between(rng, 2.0, MAX_LIFE);
            let color = if random_between(rng, 0.0, 1.0) < 0.5 { 0 } else { 1 };
            self.embers.push(Ember { pos, vel, life, color });
        }
    }

    pub fn render(&self, grid: &mut PixelGrid, intensity: f32) {
        let res = grid.resolution() as f32;
        let outer = self.colors[0].fade(intensity);
        let inner = self.colors[1].fade(intensity);

        let samples = grid.resolution() * 100;
        let reach = self.radius * res;
        for i in 0..samples {
            let (sin, cos) = (i as f32 * std::f32::consts::TAU / samples as f32).sin_cos();
            let x = ((self.origin.x + reach * cos) / res).floor();
            let y = ((self.origin.y + reach * sin) / res).floor() + self.radius;
            grid.set_pixel(x as i32, y as i32, outer);
            grid.set_pixel(
                (x - INNER_OFFSET * cos).floor() as i32,
                (y - INNER_OFFSET * sin).floor() as i32,
                inner,
            );
        }

        for e in &self.embers {
            let alpha = (e.life / 10.0).min(1.0) * intensity;
            let p = e.pos / res;
            grid.set_pixel(p.x.floor() as i32, p.y.floor() as i32, self.colors[e.color].fade(alpha));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn fire() -> Fire {
        Fire::new(Vec2::new(50.0, 50.0), 1.0, [Rgba::from_rgb(255, 100, 100), Rgba::from_rgb(255, 200, 100)])
    }

    #[test]
    fn test_emits_on_fourth_tick() {
        let mut rng = SceneRng::seed_from_u64(3);
        let mut f = fire();
        for _ in 0..3 {
            f.update(Vec2::new(50.0, 50.0), 5.0, &mut rng);
            assert!(f.is_empty());
        }
        f.update(Vec2::new(50.0, 50.0), 5.0, &mut rng);
        assert_eq!(f.len(), EMBERS_PER_EMIT);

        // quiet again until the next fourth tick
        for _ in 0..3 {
            f.update(Vec2::new(50.0, 50.0), 5.0, &mut rng);
            assert_eq!(f.len(), EMBERS_PER_EMIT);
        }
    }

    #[test]
    fn test_ring_uses_both_colors() {
        let colors = [Rgba::from_rgb(255, 100, 100), Rgba::from_rgb(255, 200, 100)];
        let f = Fire::new(Vec2::new(102.5, 102.5), 2.0, colors);
        let mut grid = PixelGrid::new(200, 200, 5);
        f.render(&mut grid, 1.0);

        let mut seen = [0usize; 2];
        for y in 14..30 {
            for x in 14..30 {
                if let Some(c) = grid.get_pixel(x, y) {
                    if c == colors[0] { seen[0] += 1; }
                    if c == colors[1] { seen[1] += 1; }
                }
            }
        }
        assert!(seen[0] >= 4, "outer ring cells: {}", seen[0]);
        assert!(seen[1] >= 2, "inner ring cells: {}", seen[1]);

        // the ring hangs below the center by its radius
        assert!(grid.get_pixel(22, 22).is_some());
        assert!(grid.get_pixel(20, 14).is_none());
    }

    #[test]
    fn test_ring_fades_with_intensity() {
        let colors = [Rgba::from_rgb(255, 100, 100), Rgba::from_rgb(255, 200, 100)];
        let f = Fire::new(Vec2::new(102.5, 102.5), 2.0, colors);
        let mut grid = PixelGrid::new(200, 200, 5);
        f.render(&mut grid, 0.5);
        assert_eq!(grid.get_pixel(22, 22), Some(colors[0].fade(0.5)));
    }

    #[test]
    fn test_embers_expire() {
        let mut rng = SceneRng::seed_from_u64(3);
        let mut f = fire();
        for _ in 0..400 {
            f.update(Vec2::new(50.0, 50.0), 5.0, &mut rng);
        }
        // at most MAX_LIFE emits can be alive at once
        assert!(f.len() <= EMBERS_PER_EMIT * MAX_LIFE as usize);
        assert!(f.embers.iter().all(|e| e.life > 0.0));
    }

    #[test]
    fn test_embers_rise() {
        let mut rng = SceneRng::seed_from_u64(11);
        let mut f = fire();
        for _ in 0..12 {
            f.update(Vec2::new(50.0, 50.0), 5.0, &mut rng);
        }
        assert!(f.embers.iter().all(|e| e.vel.y < 0.5));
    }
}
