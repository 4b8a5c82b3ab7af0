// shading.rs - Closest-light shading and the static shading cache
//
// Colors are dimmed in HSL space: only lightness is scaled, so hue and
// saturation survive and dark cells stay colored instead of going gray.

use ahash::AHashMap;
use glam::Vec2;

use crate::color::Rgba;
use crate::config::LightingConfig;
use crate::light::Light;
use crate::terrain::StaticPixel;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeParams {
    pub min_lightness: f32,
    /// Global multiplier (light intensity control, pulse boost)
    pub intensity: f32,
    pub tint_strength: f32,
    pub early_exit: f32,
}

impl ShadeParams {
    pub fn new(cfg: &LightingConfig, intensity: f32) -> Self {
        Self {
            min_lightness: cfg.min_lightness,
            intensity,
            tint_strength: cfg.tint_strength,
            early_exit: cfg.early_exit_distance,
        }
    }
}

/// 1 at the light, 0 at and beyond the edge of the lighting area
#[inline]
pub fn falloff(distance: f32) -> f32 {
    let f = (1.0 - distance).clamp(0.0, 1.0);
    f * f
}

/// Shade `color` as seen from a light `distance` away (normalized).
pub fn dim_color(color: Rgba, distance: f32, params: &ShadeParams, tint: Option<Rgba>) -> Rgba {
    let (h, s, l) = color.to_hsl();
    let f = falloff(distance);
    let lit = (l * f * params.intensity).min(l).max(params.min_lightness);
    let shaded = Rgba::from_hsl(h, s, lit, color.a);

    match tint {
        Some(t) if params.tint_strength > 0.0 => shaded.mix_rgb(t, params.tint_strength * f),
        _ => shaded,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Closest {
    pub index: usize,
    pub distance: f32,
}

/// Nearest light to cell (x, y). Stops as soon as one is closer than
/// `early_exit`. Also returns how many distances were evaluated.
pub fn closest_light(lights: &[Light], x: f32, y: f32, early_exit: f32) -> (Option<Closest>, u32) {
    let mut best: Option<Closest> = None;
    let mut evaluated = 0;
    for (index, light) in lights.iter().enumerate() {
        let distance = light.distance(x, y);
        evaluated += 1;
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(Closest { index, distance });
            if distance < early_exit { break; }
        }
    }
    (best, evaluated)
}

/// Uncached shading for things that move every frame (rain, splashes).
pub fn shade_point(lights: &[Light], x: f32, y: f32, base: Rgba, params: &ShadeParams) -> Rgba {
    match closest_light(lights, x, y, params.early_exit).0 {
        Some(c) => dim_color(base, c.distance, params, Some(lights[c.index].tint())),
        None => base,
    }
}

/// Shading cache for a set of static pixels.
///
/// Entries survive until a light drifts more than `threshold` cells from
/// where it was when the cache was filled, or the global intensity changes;
/// then the whole cache is dropped.
#[derive(Debug, Default)]
pub struct LightingCalculator {
    threshold: f32,
    cached_positions: Vec<Vec2>,
    cached_intensity: Option<f32>,
    shaded: AHashMap<(i32, i32), Rgba>,
    evaluations: u64,
}

impl LightingCalculator {
    pub fn new(threshold: f32) -> Self {
        Self { threshold, ..Self::default() }
    }

    /// Total light distance evaluations so far
    pub fn evaluations(&self) -> u64 { self.evaluations }

    pub fn cached_len(&self) -> usize { self.shaded.len() }

    pub fn clear(&mut self) {
        self.shaded.clear();
    }

    pub fn lights_moved(&self, lights: &[Light]) -> bool {
        if self.cached_positions.len() != lights.len() {
            return true;
        }
        lights.iter().zip(&self.cached_positions).any(|(light, cached)| {
            let d = (light.grid_position() - *cached).abs();
            d.x > self.threshold || d.y > self.threshold
        })
    }

    /// Shade every pixel, calling `draw` with the resulting color.
    pub fn shade_all<F>(&mut self, pixels: &[StaticPixel], lights: &[Light], params: &ShadeParams, mut draw: F)
    where
        F: FnMut(&StaticPixel, Rgba),
    {
        if pixels.is_empty() { return; }

        let moved = self.lights_moved(lights);
        let intensity_changed = self.cached_intensity != Some(params.intensity);
        if moved || intensity_changed {
            log::trace!("shading cache dropped (moved={moved}, intensity_changed={intensity_changed})");
            self.shaded.clear();
        }

        for px in pixels {
            let key = (px.x, px.y);
            let color = match self.shaded.get(&key) {
                Some(&c) => c,
                None => {
                    let (closest, evaluated) = closest_light(lights, px.x as f32, px.y as f32, params.early_exit);
                    self.evaluations += evaluated as u64;
                    let c = match closest {
                        Some(c) => dim_color(px.color, c.distance, params, Some(lights[c.index].tint())),
                        None => px.color,
                    };
                    self.shaded.insert(key, c);
                    c
                }
            };
            draw(px, color);
        }

        if moved {
            self.cached_positions = lights.iter().map(Light::grid_position).collect();
        }
        self.cached_intensity = Some(params.intensity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::LightSource;

    fn params(intensity: f32) -> ShadeParams {
        ShadeParams { min_lightness: 0.05, intensity, tint_strength: 0.0, early_exit: 0.3 }
    }

    fn point(x: f32, y: f32) -> Light {
        Light::Point(LightSource::new(
            Vec2::new(x, y),
            50.0,
            Rgba::from_rgb(255, 255, 255),
            Rgba::from_rgb(255, 180, 110),
            5,
            3.0,
        ))
    }

    #[test]
    fn test_dim_color_monotonic_in_distance() {
        let base = Rgba::from_rgb(180, 90, 60);
        let p = params(1.0);
        let mut last = f32::INFINITY;
        for i in 0..=40 {
            let d = i as f32 * 0.05;
            let (_, _, l) = dim_color(base, d, &p, None).to_hsl();
            assert!(l <= last + 1e-5, "lightness rose at d={d}");
            last = l;
        }
    }

    #[test]
    fn test_dim_color_at_light_keeps_hue_and_saturation() {
        let base = Rgba::from_rgb(180, 90, 60).with_alpha(0.6);
        let (h0, s0, l0) = base.to_hsl();
        let out = dim_color(base, 0.0, &params(1.0), None);
        let (h1, s1, l1) = out.to_hsl();
        assert!((h0 - h1).abs() < 0.5);
        assert!((s0 - s1).abs() < 0.01);
        assert!((l0 - l1).abs() < 0.01);
        assert_eq!(out.a, 0.6);
    }

    #[test]
    fn test_dim_color_floors_at_min_lightness() {
        let out = dim_color(Rgba::from_rgb(200, 200, 200), 5.0, &params(1.0), None);
        let (_, _, l) = out.to_hsl();
        assert!((l - 0.05).abs() < 0.01);
    }

    #[test]
    fn test_dim_color_never_brighter_than_base() {
        let base = Rgba::from_rgb(100, 120, 140);
        let (_, _, l0) = base.to_hsl();
        let (_, _, l1) = dim_color(base, 0.0, &params(1.5), None).to_hsl();
        assert!(l1 <= l0 + 1e-3);
    }

    #[test]
    fn test_tint_blends_toward_light_color() {
        let base = Rgba::from_rgb(100, 100, 100);
        let p = ShadeParams { tint_strength: 0.5, ..params(1.0) };
        let out = dim_color(base, 0.0, &p, Some(Rgba::from_rgb(255, 0, 0)));
        assert!(out.r > out.g);
    }

    #[test]
    fn test_closest_light_early_exit() {
        let lights = vec![point(80.0, 45.0), point(0.0, 0.0), point(150.0, 80.0)];
        let (c, evaluated) = closest_light(&lights, 16.0, 9.0, 0.3);
        assert_eq!(c.unwrap().index, 0);
        assert_eq!(evaluated, 1);

        let (c, evaluated) = closest_light(&lights, 29.0, 15.0, 0.0);
        assert_eq!(c.unwrap().index, 2);
        assert_eq!(evaluated, 3);

        assert_eq!(closest_light(&[], 0.0, 0.0, 0.3), (None, 0));
    }

    fn pixels() -> Vec<StaticPixel> {
        (0..10)
            .map(|i| StaticPixel { x: i, y: i % 4, color: Rgba::gray(90, 0.8) })
            .collect()
    }

    fn frame(calc: &mut LightingCalculator, px: &[StaticPixel], lights: &[Light], p: &ShadeParams) -> Vec<Rgba> {
        let mut out = Vec::new();
        calc.shade_all(px, lights, p, |_, c| out.push(c));
        out
    }

    #[test]
    fn test_cache_hit_when_lights_still() {
        let px = pixels();
        let mut lights = vec![point(80.0, 45.0)];
        let mut calc = LightingCalculator::new(2.0);
        let p = params(0.7);

        let first = frame(&mut calc, &px, &lights, &p);
        let evals = calc.evaluations();
        assert_eq!(evals, px.len() as u64);

        // sub-threshold drift: 1 cell
        if let Light::Point(l) = &mut lights[0] {
            l.move_to(Vec2::new(85.0, 45.0));
        }
        let second = frame(&mut calc, &px, &lights, &p);
        assert_eq!(first, second);
        assert_eq!(calc.evaluations(), evals);
    }

    #[test]
    fn test_cache_dropped_when_light_moves() {
        let px = pixels();
        let mut lights = vec![point(80.0, 45.0)];
        let mut calc = LightingCalculator::new(2.0);
        let p = params(0.7);

        let first = frame(&mut calc, &px, &lights, &p);
        if let Light::Point(l) = &mut lights[0] {
            l.move_to(Vec2::new(0.0, 0.0));
        }
        let second = frame(&mut calc, &px, &lights, &p);
        assert_eq!(calc.evaluations(), 2 * px.len() as u64);
        assert_ne!(first, second);
    }

    #[test]
    fn test_cache_dropped_when_intensity_changes() {
        let px = pixels();
        let lights = vec![point(80.0, 45.0)];
        let mut calc = LightingCalculator::new(2.0);

        frame(&mut calc, &px, &lights, &params(0.7));
        frame(&mut calc, &px, &lights, &params(0.7));
        assert_eq!(calc.evaluations(), px.len() as u64);

        frame(&mut calc, &px, &lights, &params(1.0));
        assert_eq!(calc.evaluations(), 2 * px.len() as u64);
    }

    #[test]
    fn test_drift_accumulates_until_threshold() {
        let px = pixels();
        let mut lights = vec![point(80.0, 45.0)];
        let mut calc = LightingCalculator::new(2.0);
        let p = params(0.7);
        frame(&mut calc, &px, &lights, &p);

        // 1 cell per frame: the third frame is 3 cells from the cached position
        for (step, expect_recompute) in [(1, false), (2, false), (3, true)] {
            let before = calc.evaluations();
            if let Light::Point(l) = &mut lights[0] {
                l.move_to(Vec2::new(80.0 + 5.0 * step as f32, 45.0));
            }
            frame(&mut calc, &px, &lights, &p);
            assert_eq!(calc.evaluations() > before, expect_recompute, "step {step}");
        }
    }
}
