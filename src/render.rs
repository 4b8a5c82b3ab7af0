// render.rs - Flush targets for the pixel grid
//
// `Surface` is the boundary to the real canvas. `Encoder` is the one the
// browser build uses: an RGBA8 buffer the size of the canvas that JS wraps
// in an ImageData via output_ptr()/output_len().

use crate::color::Rgba;

pub trait Surface {
    /// Fill an axis-aligned rectangle in screen pixels.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba);
}

pub struct Encoder {
    out: Vec<u8>,
    w: u32,
    h: u32,
    background: [u8; 4],
}

impl Encoder {
    pub fn new(w: u32, h: u32, background: Rgba) -> Self {
        let background = background.with_alpha(1.0).to_rgba8();
        let mut enc = Self {
            out: vec![0; (w * h * 4) as usize],
            w,
            h,
            background,
        };
        enc.clear();
        enc
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
        self.out.resize((w * h * 4) as usize, 0);
        self.clear();
    }

    pub fn clear(&mut self) {
        let bg = self.background;
        for px in self.out.chunks_exact_mut(4) {
            px.copy_from_slice(&bg);
        }
    }

    pub fn width(&self) -> u32 { self.w }

    pub fn height(&self) -> u32 { self.h }

    pub fn pixels(&self) -> &[u8] { &self.out }

    pub fn ptr(&self) -> *const u8 { self.out.as_ptr() }

    pub fn len(&self) -> usize { self.out.len() }

    pub fn is_empty(&self) -> bool { self.out.is_empty() }

    /// RGBA at a screen pixel, None outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.w || y >= self.h { return None; }
        let i = ((y * self.w + x) * 4) as usize;
        Some([self.out[i], self.out[i + 1], self.out[i + 2], self.out[i + 3]])
    }
}

impl Surface for Encoder {
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w as i32).min(self.w as i32);
        let y1 = (y + h as i32).min(self.h as i32);
        if x0 >= x1 || y0 >= y1 { return; }

        let a = color.a.clamp(0.0, 1.0);
        let [sr, sg, sb, _] = color.to_rgba8();

        for py in y0..y1 {
            let row = (py as u32 * self.w) as usize * 4;
            for px in x0..x1 {
                let i = row + px as usize * 4;
                let dst = &mut self.out[i..i + 4];
                dst[0] = mix(dst[0], sr, a);
                dst[1] = mix(dst[1], sg, a);
                dst[2] = mix(dst[2], sb, a);
                dst[3] = 255;
            }
        }
    }
}

#[inline]
fn mix(dst: u8, src: u8, a: f32) -> u8 {
    (dst as f32 + (src as f32 - dst as f32) * a).round() as u8
}

/// Records draw calls instead of rasterizing them.
#[derive(Debug, Default)]
pub struct DrawList {
    pub rects: Vec<DrawRect>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
    pub color: Rgba,
}

impl Surface for DrawList {
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
        self.rects.push(DrawRect { x, y, w, h, color });
    }
}
