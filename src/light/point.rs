// point.rs - Plain light source that follows an anchor

use glam::Vec2;

use crate::color::Rgba;
use crate::grid::PixelGrid;

/// Position and falloff shared by every light variant.
#[derive(Debug, Clone)]
pub struct LightSource {
    /// Screen-space position, px
    pub position: Vec2,
    pub radius: f32,
    pub color: Rgba,
    pub tint: Rgba,
    resolution: f32,
    lighting_area: f32,
}

impl LightSource {
    pub fn new(position: Vec2, radius: f32, color: Rgba, tint: Rgba, resolution: u32, area_scale: f32) -> Self {
        let resolution = resolution.max(1) as f32;
        Self {
            position,
            radius,
            color,
            tint,
            resolution,
            lighting_area: (radius * area_scale / resolution).max(1e-3),
        }
    }

    /// Screen px per grid cell
    #[inline]
    pub fn resolution(&self) -> f32 { self.resolution }

    /// Radius of the primary falloff, in cells
    #[inline]
    pub fn lighting_area(&self) -> f32 { self.lighting_area }

    #[inline]
    pub fn grid_position(&self) -> Vec2 {
        self.position / self.resolution
    }

    /// Distance from the light to cell (x, y), normalized by the lighting
    /// area: below 1 is inside the main falloff.
    pub fn distance(&self, x: f32, y: f32) -> f32 {
        self.grid_position().distance(Vec2::new(x, y)) / self.lighting_area
    }

    pub fn move_to(&mut self, anchor: Vec2) {
        self.position = anchor;
    }

    /// Filled disc at the light position, alpha scaled by `intensity`.
    pub fn render(&self, grid: &mut PixelGrid, intensity: f32) {
        let center = self.grid_position();
        let r = (self.radius / self.resolution / 5.0).max(1.0);
        let color = self.color.fade(intensity.clamp(0.0, 1.0));
        let ri = r.ceil() as i32;
        let (cx, cy) = (center.x.floor() as i32, center.y.floor() as i32);

        for dy in -ri..=ri {
            for dx in -ri..=ri {
                if (dx * dx + dy * dy) as f32 <= r * r {
                    grid.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }
}
