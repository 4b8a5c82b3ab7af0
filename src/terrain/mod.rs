// terrain/ - Static background pixels
//
// Generators fill a PixelMap once at construction; the result is frozen
// into a TerrainLayer that re-shades its pixels every frame through its
// own shading cache.

mod plants;
mod wall;

pub use plants::generate_plants;
pub use wall::{BRICK_PATTERNS, generate_wall};

use ahash::AHashMap;

use crate::color::Rgba;
use crate::grid::PixelGrid;
use crate::light::Light;
use crate::shading::{LightingCalculator, ShadeParams};

/// One immutable terrain cell with its unshaded color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticPixel {
    pub x: i32,
    pub y: i32,
    pub color: Rgba,
}

/// Insertion-ordered pixel set keyed by cell. Adding a cell that already
/// exists replaces its color but keeps its original position in the order.
/// Coordinates are clamped into the grid.
#[derive(Debug, Default)]
pub struct PixelMap {
    width: i32,
    height: i32,
    index: AHashMap<(i32, i32), usize>,
    pixels: Vec<StaticPixel>,
}

impl PixelMap {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width: width.max(1), height: height.max(1), ..Self::default() }
    }

    #[inline]
    pub fn clamp_x(&self, x: i32) -> i32 { x.clamp(0, self.width - 1) }

    #[inline]
    pub fn clamp_y(&self, y: i32) -> i32 { y.clamp(0, self.height - 1) }

    pub fn add(&mut self, x: i32, y: i32, color: Rgba) {
        let (x, y) = (self.clamp_x(x), self.clamp_y(y));
        match self.index.get(&(x, y)) {
            Some(&i) => self.pixels[i].color = color,
            None => {
                self.index.insert((x, y), self.pixels.len());
                self.pixels.push(StaticPixel { x, y, color });
            }
        }
    }

    pub fn len(&self) -> usize { self.pixels.len() }

    pub fn is_empty(&self) -> bool { self.pixels.is_empty() }

    pub fn into_pixels(self) -> Vec<StaticPixel> {
        self.pixels
    }
}

/// A frozen set of static pixels plus the cache that shades them.
#[derive(Debug)]
pub struct TerrainLayer {
    pixels: Vec<StaticPixel>,
    lighting: LightingCalculator,
}

impl TerrainLayer {
    pub fn new(map: PixelMap, movement_threshold: f32) -> Self {
        Self { pixels: map.into_pixels(), lighting: LightingCalculator::new(movement_threshold) }
    }

    pub fn pixels(&self) -> &[StaticPixel] { &self.pixels }

    pub fn lighting(&self) -> &LightingCalculator { &self.lighting }

    pub fn render(&mut self, grid: &mut PixelGrid, lights: &[Light], params: &ShadeParams) {
        self.lighting.shade_all(&self.pixels, lights, params, |px, color| {
            grid.set_pixel(px.x, px.y, color);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::LightSource;
    use glam::Vec2;

    #[test]
    fn test_pixel_map_last_write_wins_first_position_kept() {
        let mut map = PixelMap::new(10, 10);
        map.add(1, 1, Rgba::gray(10, 1.0));
        map.add(2, 2, Rgba::gray(20, 1.0));
        map.add(1, 1, Rgba::gray(30, 1.0));

        let px = map.into_pixels();
        assert_eq!(px.len(), 2);
        assert_eq!((px[0].x, px[0].y), (1, 1));
        assert_eq!(px[0].color, Rgba::gray(30, 1.0));
    }

    #[test]
    fn test_pixel_map_clamps_into_grid() {
        let mut map = PixelMap::new(10, 5);
        map.add(-3, 99, Rgba::gray(10, 1.0));
        let px = map.into_pixels();
        assert_eq!((px[0].x, px[0].y), (0, 4));
    }

    #[test]
    fn test_layer_renders_every_pixel() {
        let mut map = PixelMap::new(32, 18);
        for x in 0..8 {
            map.add(x, 10, Rgba::gray(90, 0.8));
        }
        let mut layer = TerrainLayer::new(map, 2.0);
        let lights = vec![Light::Point(LightSource::new(
            Vec2::new(80.0, 45.0), 50.0, Rgba::from_rgb(255, 255, 255), Rgba::from_rgb(255, 255, 255), 5, 3.0,
        ))];
        let params = ShadeParams { min_lightness: 0.05, intensity: 1.0, tint_strength: 0.0, early_exit: 0.3 };
        let mut grid = PixelGrid::new(160, 90, 5);
        layer.render(&mut grid, &lights, &params);
        assert_eq!(grid.dirty_count(), 8);
        assert_eq!(layer.lighting().cached_len(), 8);
    }
}
