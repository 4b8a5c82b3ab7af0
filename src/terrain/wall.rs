// wall.rs - Broken brick wall fragments
//
// Clusters of small brick stamps scattered over the upper part of the
// grid, kept clear of the ground line. 1 is a brick cell, 2 mortar, 0 a gap.

use super::PixelMap;
use crate::color::Rgba;
use crate::config::WallConfig;
use crate::sim::{SceneRng, chance, random_between, random_int};

pub const BRICK_PATTERNS: [&[&[u8]]; 4] = [
    &[&[2, 1, 1, 2], &[1, 0, 1, 1], &[2, 1, 1, 2]],
    &[&[1, 1, 2, 1, 1], &[2, 1, 1, 1, 2]],
    &[&[2, 1, 1, 2, 1], &[1, 0, 1, 1, 1], &[2, 1, 1, 2, 1]],
    &[&[1, 2, 1, 2, 1], &[1, 1, 1, 1, 1]],
];

/// Cluster count from the config, or one per `cluster_count_factor` cells.
pub fn cluster_count(cfg: &WallConfig, width: i32, height: i32) -> usize {
    cfg.cluster_count.unwrap_or_else(|| {
        let area = (width.max(0) * height.max(0)) as usize;
        (area / cfg.cluster_count_factor.max(1)).max(cfg.min_cluster_count)
    })
}

pub fn generate_wall(width: i32, height: i32, ground_level: i32, cfg: &WallConfig, rng: &mut SceneRng) -> PixelMap {
    let mut map = PixelMap::new(width, height);
    let ground = height - ground_level;
    let min_y = (height as f32 * cfg.min_height_factor).floor() as i32;
    let max_y = ((height as f32 * cfg.max_height_factor).floor() as i32).min(ground - 2);

    let clusters = cluster_count(cfg, width, height);
    for _ in 0..clusters {
        let pattern = BRICK_PATTERNS[random_int(rng, 0, BRICK_PATTERNS.len() as i32 - 1) as usize];
        let rows = pattern.len() as i32;
        let cols = pattern[0].len() as i32;

        let x0 = random_int(rng, 0, (width - cols).max(0));
        let y0 = random_int(rng, min_y, min_y.max(max_y - rows));
        place_pattern(&mut map, x0, y0, pattern, cfg, rng);
    }

    log::debug!("wall: {} clusters, {} pixels", clusters, map.len());
    map
}

fn place_pattern(map: &mut PixelMap, x0: i32, y0: i32, pattern: &[&[u8]], cfg: &WallConfig, rng: &mut SceneRng) {
    for (row, cells) in pattern.iter().enumerate() {
        for (col, &cell) in cells.iter().enumerate() {
            if cell == 0 { continue; }
            if chance(rng, cfg.erosion_chance) { continue; }

            let (gray, alpha) = match cell {
                1 => (cfg.brick_gray, cfg.brick_alpha),
                _ => (cfg.mortar_gray, cfg.mortar_alpha),
            };
            let level = random_int(rng, gray[0] as i32, gray[1] as i32).clamp(0, 255) as u8;
            let a = random_between(rng, alpha[0], alpha[1]);
            map.add(x0 + col as i32, y0 + row as i32, Rgba::gray(level, a));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_cluster_count_from_area() {
        let cfg = WallConfig::default();
        assert_eq!(cluster_count(&cfg, 32, 18), 6);
        assert_eq!(cluster_count(&cfg, 100, 90), 50);
        let fixed = WallConfig { cluster_count: Some(3), ..WallConfig::default() };
        assert_eq!(cluster_count(&fixed, 100, 90), 3);
    }

    #[test]
    fn test_wall_stays_above_ground() {
        let mut rng = SceneRng::seed_from_u64(12);
        let cfg = WallConfig::default();
        let px = generate_wall(64, 36, 5, &cfg, &mut rng).into_pixels();
        assert!(!px.is_empty());
        for p in &px {
            assert!(p.y < 36 - 5, "brick at {} on the ground", p.y);
            assert!((0..64).contains(&p.x));
        }
    }

    #[test]
    fn test_wall_colors_in_ranges() {
        let mut rng = SceneRng::seed_from_u64(12);
        let cfg = WallConfig { erosion_chance: 0.0, ..WallConfig::default() };
        let px = generate_wall(64, 36, 5, &cfg, &mut rng).into_pixels();
        for p in &px {
            assert_eq!(p.color.r, p.color.g);
            assert!(p.color.r >= 40.0 && p.color.r <= 100.0);
            assert!(p.color.a >= 0.4 && p.color.a <= 0.8);
        }
    }

    #[test]
    fn test_full_erosion_leaves_nothing() {
        let mut rng = SceneRng::seed_from_u64(12);
        let cfg = WallConfig { erosion_chance: 1.0, ..WallConfig::default() };
        assert!(generate_wall(64, 36, 5, &cfg, &mut rng).is_empty());
    }

    #[test]
    fn test_same_seed_same_wall() {
        let cfg = WallConfig::default();
        let a = generate_wall(64, 36, 5, &cfg, &mut SceneRng::seed_from_u64(5)).into_pixels();
        let b = generate_wall(64, 36, 5, &cfg, &mut SceneRng::seed_from_u64(5)).into_pixels();
        assert_eq!(a, b);
    }
}
