// grid.rs - Low-resolution virtual raster
//
// Every component draws into this grid in cell coordinates. Only touched
// cells are remembered, so clear() and render() cost O(dirty), not O(area).

use crate::color::Rgba;
use crate::render::Surface;

pub struct PixelGrid {
    width: i32,
    height: i32,
    resolution: u32,

    cells: Vec<Option<Rgba>>,
    dirty: Vec<u32>,       // indices written since the last clear
    is_dirty: Vec<bool>,
}

impl PixelGrid {
    /// Grid covering a `canvas_w x canvas_h` pixel canvas. Partial cells at
    /// the right/bottom edge count as whole cells.
    pub fn new(canvas_w: u32, canvas_h: u32, resolution: u32) -> Self {
        let res = resolution.max(1);
        let width = canvas_w.div_ceil(res) as i32;
        let height = canvas_h.div_ceil(res) as i32;
        let size = (width * height) as usize;

        Self {
            width,
            height,
            resolution: res,
            cells: vec![None; size],
            dirty: Vec::with_capacity(size.min(4096)),
            is_dirty: vec![false; size],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 { self.width }

    #[inline]
    pub fn height(&self) -> i32 { self.height }

    #[inline]
    pub fn resolution(&self) -> u32 { self.resolution }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Out-of-bounds writes are dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if !self.in_bounds(x, y) { return; }
        let idx = self.index(x, y);
        self.cells[idx] = Some(color);
        if !self.is_dirty[idx] {
            self.is_dirty[idx] = true;
            self.dirty.push(idx as u32);
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        if !self.in_bounds(x, y) { return None; }
        self.cells[self.index(x, y)]
    }

    /// Composite `tint` over whatever is already in the cell this frame.
    pub fn blend_pixel(&mut self, x: i32, y: i32, tint: Rgba, tint_alpha: f32) {
        if !self.in_bounds(x, y) { return; }
        let base = self.get_pixel(x, y).unwrap_or(Rgba::new(0.0, 0.0, 0.0, 0.0));
        self.set_pixel(x, y, base.blend_over(tint, tint_alpha));
    }

    /// Straight segment between two cell positions, sampled once per cell step.
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as i32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            self.set_pixel(x.floor() as i32, y.floor() as i32, color);
        }
    }

    /// Reset only the cells written since the previous clear.
    pub fn clear(&mut self) {
        for &idx in &self.dirty {
            self.cells[idx as usize] = None;
            self.is_dirty[idx as usize] = false;
        }
        self.dirty.clear();
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Draw each written cell as a `resolution x resolution` square.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        let res = self.resolution;
        for &idx in &self.dirty {
            let Some(color) = self.cells[idx as usize] else { continue };
            let x = idx as i32 % self.width;
            let y = idx as i32 / self.width;
            surface.fill_rect(x * res as i32, y * res as i32, res, res, color);
        }
    }
}
