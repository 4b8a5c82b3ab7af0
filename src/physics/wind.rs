// wind.rs - Time-varying horizontal wind
//
// Two phase accumulators: a slow base swell and a slower gust envelope.
// The gust is the product of two sinusoids at unrelated frequencies, which
// never lines up into an obvious period.

use glam::Vec2;

use crate::config::WindConfig;

const GUST_HARMONIC: f32 = 2.7;

#[derive(Debug, Clone)]
pub struct WindField {
    cfg: WindConfig,
    phase: f32,
    gust_phase: f32,
}

impl WindField {
    pub fn new(cfg: WindConfig) -> Self {
        Self { cfg, phase: 0.0, gust_phase: 0.0 }
    }

    pub fn update(&mut self) {
        self.phase += self.cfg.frequency;
        self.gust_phase += self.cfg.gust_frequency;
    }

    pub fn force(&self) -> Vec2 {
        Vec2::new(self.strength(), 0.0)
    }

    pub fn strength(&self) -> f32 {
        let base = self.phase.sin() * self.cfg.variation_strength;
        let gust = self.gust_phase.sin() * (self.gust_phase * GUST_HARMONIC).sin() * self.cfg.gust_strength;
        self.cfg.base_strength + base + gust
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_force_is_base_strength() {
        let wind = WindField::new(WindConfig::default());
        assert_eq!(wind.force(), Vec2::new(WindConfig::default().base_strength, 0.0));
    }

    #[test]
    fn test_deterministic_for_equal_tick_counts() {
        let mut a = WindField::new(WindConfig::default());
        let mut b = WindField::new(WindConfig::default());
        for i in 0..5000 {
            a.update();
            b.update();
            if i % 97 == 0 {
                assert_eq!(a.force(), b.force());
            }
        }
        assert_eq!(a.force(), b.force());
    }

    #[test]
    fn test_force_is_bounded_and_horizontal() {
        let cfg = WindConfig::default();
        let bound = cfg.base_strength.abs() + cfg.variation_strength.abs() + cfg.gust_strength.abs();
        let mut wind = WindField::new(cfg);
        for _ in 0..10_000 {
            wind.update();
            let f = wind.force();
            assert_eq!(f.y, 0.0);
            assert!(f.x.abs() <= bound + 1e-6);
        }
    }

    #[test]
    fn test_matches_closed_form() {
        let cfg = WindConfig::default();
        let mut wind = WindField::new(cfg.clone());
        for _ in 0..250 {
            wind.update();
        }
        let t = 250.0 * cfg.frequency;
        let g = 250.0 * cfg.gust_frequency;
        let expected = cfg.base_strength + t.sin() * cfg.variation_strength + g.sin() * (g * 2.7).sin() * cfg.gust_strength;
        assert!((wind.strength() - expected).abs() < 1e-3);
    }
}
