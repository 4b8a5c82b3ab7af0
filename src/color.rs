// color.rs - Color values, CSS parsing, HSL conversion, compositing
//
// Channels are kept as f32 (r, g, b in 0..=255, alpha in 0..=1) so shading
// can scale them without repeated rounding.

use std::str::FromStr;

use crate::error::SceneError;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r: r as f32, g: g as f32, b: b as f32, a: 1.0 }
    }

    pub fn gray(level: u8, alpha: f32) -> Self {
        Self::from_rgb(level, level, level).with_alpha(alpha)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// Multiply alpha, leaving rgb untouched
    pub fn fade(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor)
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [
            self.r.round().clamp(0.0, 255.0) as u8,
            self.g.round().clamp(0.0, 255.0) as u8,
            self.b.round().clamp(0.0, 255.0) as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Convert to (hue in degrees, saturation, lightness)
    pub fn to_hsl(self) -> (f32, f32, f32) {
        let r = self.r / 255.0;
        let g = self.g / 255.0;
        let b = self.b / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if (max - min).abs() < f32::EPSILON {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        (h * 60.0, s, l)
    }

    pub fn from_hsl(h: f32, s: f32, l: f32, a: f32) -> Self {
        if s <= 0.0 {
            let v = l * 255.0;
            return Self::new(v, v, v, a);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = h / 360.0;

        Self::new(
            hue_to_channel(p, q, h + 1.0 / 3.0) * 255.0,
            hue_to_channel(p, q, h) * 255.0,
            hue_to_channel(p, q, h - 1.0 / 3.0) * 255.0,
            a,
        )
    }

    /// Linear rgb mix toward `other`, alpha of `self` kept
    pub fn mix_rgb(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a,
        }
    }

    /// Source-over compositing of `tint` at `tint_alpha` onto `self`.
    ///
    /// Channels are the alpha-weighted average of base and tint; the
    /// output alpha is `a + t * (1 - a)`.
    pub fn blend_over(self, tint: Rgba, tint_alpha: f32) -> Self {
        let t = tint_alpha.clamp(0.0, 1.0);
        let out_alpha = (self.a + t * (1.0 - self.a)).min(1.0);
        let weight_base = self.a * (1.0 - t);
        let total = weight_base + t;
        let total = if total > 0.0 { total } else { 1.0 };

        Self {
            r: (self.r * weight_base + tint.r * t) / total,
            g: (self.g * weight_base + tint.g * t) / total,
            b: (self.b * weight_base + tint.b * t) / total,
            a: out_alpha,
        }
    }
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 { t += 1.0; }
    if t > 1.0 { t -= 1.0; }
    if t < 1.0 / 6.0 { return p + (q - p) * 6.0 * t; }
    if t < 0.5 { return q; }
    if t < 2.0 / 3.0 { return p + (q - p) * (2.0 / 3.0 - t) * 6.0; }
    p
}

/// Parses `rgba(r, g, b, a)`, `rgb(r, g, b)` and `#rrggbb`.
impl FromStr for Rgba {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || SceneError::InvalidColor(s.to_string());
        let t = s.trim();

        if let Some(hex) = t.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(bad());
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
            return Ok(Self::from_rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let (body, expected) = if let Some(rest) = t.strip_prefix("rgba(") {
            (rest, 4)
        } else if let Some(rest) = t.strip_prefix("rgb(") {
            (rest, 3)
        } else {
            return Err(bad());
        };

        let inner = body.strip_suffix(')').ok_or_else(bad)?;
        let parts: Vec<f32> = inner
            .split(',')
            .map(|p| p.trim().parse::<f32>())
            .collect::<Result<_, _>>()
            .map_err(|_| bad())?;

        if parts.len() != expected || parts.iter().any(|v| !v.is_finite()) {
            return Err(bad());
        }
        if parts[..3].iter().any(|v| !(0.0..=255.0).contains(v)) {
            return Err(bad());
        }

        let a = parts.get(3).copied().unwrap_or(1.0);
        if !(0.0..=1.0).contains(&a) {
            return Err(bad());
        }
        Ok(Self::new(parts[0], parts[1], parts[2], a))
    }
}
