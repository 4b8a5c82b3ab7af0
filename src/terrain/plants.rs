// plants.rs - Climbing vines
//
// Vines start on evenly spaced columns at the ground line and climb to the
// top row, meandering sideways. Along the way they grow leaf clusters,
// short diagonal branches, and a few long branches that can sprout.

use super::PixelMap;
use crate::color::Rgba;
use crate::config::PlantConfig;
use crate::error::Result;
use crate::sim::{SceneRng, chance, random_int};

const COLUMN_MARGIN: i32 = 2;
const LEAF_OFFSETS: [(i32, i32); 5] = [(1, 0), (-1, 0), (0, -1), (1, -1), (-1, -1)];

struct VineGrower<'a> {
    map: PixelMap,
    cfg: &'a PlantConfig,
    stem: Rgba,
    leaf: Rgba,
    faded: Rgba,
}

pub fn generate_plants(width: i32, height: i32, ground_level: i32, cfg: &PlantConfig, rng: &mut SceneRng) -> Result<PixelMap> {
    let mut g = VineGrower {
        map: PixelMap::new(width, height),
        cfg,
        stem: cfg.stem_color.parse()?,
        leaf: cfg.leaf_color.parse()?,
        faded: cfg.faded_leaf_color.parse()?,
    };

    let ground = height - ground_level;
    let columns = start_columns(cfg.vine_count, width);
    for &x in &columns {
        g.vine(x, ground, rng);
    }

    log::debug!("plants: {} vines, {} pixels", columns.len(), g.map.len());
    Ok(g.map)
}

/// Evenly spaced start columns, inset from both edges.
pub fn start_columns(vine_count: usize, width: i32) -> Vec<i32> {
    let n = vine_count.min(width.max(0) as usize).max(1);
    let span = (width - COLUMN_MARGIN * 2 - 1).max(0) as f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / (n.max(2) - 1) as f32;
            ((COLUMN_MARGIN as f32 + t * span).floor() as i32).clamp(0, (width - 1).max(0))
        })
        .collect()
}

impl VineGrower<'_> {
    fn vine(&mut self, start_x: i32, ground: i32, rng: &mut SceneRng) {
        let cfg = self.cfg;
        let mut x = start_x;
        let mut long_branches = 0;

        for y in (0..=ground).rev() {
            self.map.add(x, y, self.stem);

            if chance(rng, cfg.leaf_probability) {
                self.leaf_cluster(x, y, rng);
            } else if chance(rng, cfg.sparse_leaf_probability) {
                self.sparse_leaf(x, y, rng);
            }

            if y < ground - 4 && long_branches < cfg.max_long_branches && chance(rng, cfg.long_branch_probability) {
                let dir = if chance(rng, 0.5) { -1 } else { 1 };
                let [lo, hi] = cfg.long_branch_length;
                let len = random_int(rng, lo as i32, hi as i32).max(lo as i32);
                self.long_branch(x, y, dir, len, rng);
                long_branches += 1;
            } else if chance(rng, cfg.branch_probability) {
                let dir = if chance(rng, 0.5) { -1 } else { 1 };
                let len = random_int(rng, 1, cfg.branch_length.max(1) as i32);
                self.branch(x, y, dir, len, rng);
            }

            x = self.map.clamp_x(x + random_int(rng, -cfg.meander, cfg.meander));
        }
    }

    /// Short diagonal branch climbing up and away from the stem.
    fn branch(&mut self, x0: i32, y0: i32, dir: i32, len: i32, rng: &mut SceneRng) {
        let mut x = x0;
        for i in 1..=len {
            x = self.map.clamp_x(x + dir);
            let y = (y0 - i).max(0);
            self.map.add(x, y, self.stem);
            if chance(rng, 0.4) {
                self.leaf_cluster(x, y, rng);
            } else if chance(rng, self.cfg.sparse_leaf_probability) {
                self.sparse_leaf(x, y, rng);
            }
        }
    }

    fn long_branch(&mut self, x0: i32, y0: i32, dir: i32, len: i32, rng: &mut SceneRng) {
        let cfg = self.cfg;
        let (mut x, mut y) = (x0, y0);
        for _ in 0..len {
            let step = if chance(rng, cfg.long_branch_extra_step_chance) { 2 } else { 1 };
            x = self.map.clamp_x(x + dir * step);
            if chance(rng, cfg.long_branch_rise_chance) {
                y = self.map.clamp_y(y - 1);
            } else if chance(rng, cfg.long_branch_droop_chance) {
                y = self.map.clamp_y(y + 1);
            }

            self.map.add(x, y, self.stem);
            if chance(rng, 0.5) {
                self.leaf_cluster(x, y, rng);
            } else if chance(rng, cfg.sparse_leaf_probability) {
                self.sparse_leaf(x, y, rng);
            }

            if chance(rng, cfg.long_branch_sprout_chance) {
                let sprout_dir = if chance(rng, 0.5) { -dir } else { dir };
                self.sprout(x, y, sprout_dir, rng);
            }
        }
    }

    fn sprout(&mut self, x0: i32, y0: i32, dir: i32, rng: &mut SceneRng) {
        let len = random_int(rng, 1, self.cfg.sprout_length.max(1) as i32);
        let (mut x, mut y) = (x0, y0);
        for _ in 0..len {
            x = self.map.clamp_x(x + dir);
            y = self.map.clamp_y(y - 1);
            self.map.add(x, y, self.stem);
            if chance(rng, 0.3) {
                self.sparse_leaf(x, y, rng);
            }
        }
    }

    fn leaf_cluster(&mut self, x: i32, y: i32, rng: &mut SceneRng) {
        let size = random_int(rng, 2, LEAF_OFFSETS.len() as i32 + 1);
        for _ in 0..size {
            let (dx, dy) = LEAF_OFFSETS[random_int(rng, 0, LEAF_OFFSETS.len() as i32 - 1) as usize];
            self.map.add(x + dx, y + dy, self.leaf);
        }
    }

    fn sparse_leaf(&mut self, x: i32, y: i32, rng: &mut SceneRng) {
        self.map.add(x, y, self.faded);
        if chance(rng, 0.3) {
            let dx = if chance(rng, 0.5) { -1 } else { 1 };
            self.map.add(x + dx, y, self.faded);
        }
    }
}
