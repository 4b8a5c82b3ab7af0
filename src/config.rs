// config.rs - Scene configuration and per-tick control snapshots
//
// SceneConfig is fixed for the lifetime of a scene (rebuild to change it).
// Controls is the small set of live values a UI may change at any tick
// boundary; the host hands the scene a fresh, validated snapshot.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Edge length of one grid cell in screen pixels
    pub resolution: u32,
    /// Ground line, in cells above the bottom of the grid
    pub ground_level: i32,
    pub background: String,
    pub physics: PhysicsConfig,
    pub wind: WindConfig,
    pub lighting: LightingConfig,
    pub lantern: LanternConfig,
    pub rain: RainConfig,
    pub splash: SplashConfig,
    pub aura: AuraConfig,
    pub wall: WallConfig,
    pub plants: PlantConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            resolution: 5,
            ground_level: 5,
            background: "#131313".into(),
            physics: PhysicsConfig::default(),
            wind: WindConfig::default(),
            lighting: LightingConfig::default(),
            lantern: LanternConfig::default(),
            rain: RainConfig::default(),
            splash: SplashConfig::default(),
            aura: AuraConfig::default(),
            wall: WallConfig::default(),
            plants: PlantConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject tuning values the per-frame code cannot run with. Checked
    /// once when a scene is built; nothing after that re-validates.
    pub fn validate(&self) -> Result<()> {
        let p = &self.physics;
        require("physics.gravity", p.gravity, p.gravity.is_finite())?;
        require("physics.gravity_divisor", p.gravity_divisor, p.gravity_divisor > 0.0 && p.gravity_divisor.is_finite())?;
        require("physics.stiffness", p.stiffness, (0.0..=1.0).contains(&p.stiffness))?;
        require("physics.max_difference", p.max_difference, p.max_difference >= 0.0)?;
        require("physics.max_adjustment", p.max_adjustment, p.max_adjustment >= 0.0)?;
        require("physics.max_velocity_correction", p.max_velocity_correction, p.max_velocity_correction >= 0.0)?;

        let l = &self.lantern;
        require("lantern.max_tilt", l.max_tilt, l.max_tilt >= 0.0)?;
        require("lantern.tilt_smoothing", l.tilt_smoothing, (0.0..=1.0).contains(&l.tilt_smoothing))?;
        require("lantern.damping", l.damping, (0.0..=1.0).contains(&l.damping))?;

        let lit = &self.lighting;
        require("lighting.min_lightness", lit.min_lightness, (0.0..=1.0).contains(&lit.min_lightness))?;
        require("lighting.movement_threshold", lit.movement_threshold, lit.movement_threshold >= 0.0)?;
        require("lighting.area_scale", lit.area_scale, lit.area_scale > 0.0 && lit.area_scale.is_finite())?;

        let a = &self.aura;
        require("aura.radius", a.radius, a.radius >= 0.0 && a.radius.is_finite())?;
        require("aura.base_alpha", a.base_alpha, a.base_alpha >= 0.0)?;
        Ok(())
    }
}

// NaN fails every comparison above, so it is rejected along with bad ranges.
fn require(field: &'static str, value: f32, ok: bool) -> Result<()> {
    if ok { Ok(()) } else { Err(SceneError::InvalidConfigValue { field, value }) }
}

/// Point-mass integration and chain constraint tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity in px/frame^2 before the divisor
    pub gravity: f32,
    pub gravity_divisor: f32,
    /// Constraint passes per tick
    pub constraint_iterations: u32,
    pub stiffness: f32,
    /// Clamp on the raw length error, px
    pub max_difference: f32,
    /// Clamp on each body's share of the correction, px
    pub max_adjustment: f32,
    /// Clamp on the instantaneous velocity correction, px/frame
    pub max_velocity_correction: f32,
    /// Stretch ratio past which a constraint would break (never enforced)
    pub break_threshold: f32,
    /// Radius around the pointer that pushes chain bodies away, px
    pub mouse_radius: f32,
    pub mouse_repulsion: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.3,
            gravity_divisor: 1.0,
            constraint_iterations: 3,
            stiffness: 0.5,
            max_difference: 20.0,
            max_adjustment: 6.0,
            max_velocity_correction: 2.0,
            break_threshold: 4.0,
            mouse_radius: 45.0,
            mouse_repulsion: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Phase increment of the base oscillation, rad/frame
    pub frequency: f32,
    /// Phase increment of the gust oscillation, rad/frame
    pub gust_frequency: f32,
    pub base_strength: f32,
    pub variation_strength: f32,
    pub gust_strength: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            frequency: 0.01,
            gust_frequency: 0.0037,
            base_strength: 0.02,
            variation_strength: 0.03,
            gust_strength: 0.06,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Floor on the HSL lightness of any shaded color
    pub min_lightness: f32,
    /// Grid cells a light may drift before cached shading is dropped
    pub movement_threshold: f32,
    /// Fraction of the light tint mixed into lit colors
    pub tint_strength: f32,
    /// lighting area = radius * area_scale / resolution
    pub area_scale: f32,
    /// Closest-light search stops below this normalized distance
    pub early_exit_distance: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            min_lightness: 0.06,
            movement_threshold: 2.0,
            tint_strength: 0.12,
            area_scale: 3.0,
            early_exit_distance: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanternConfig {
    pub enabled: bool,
    /// Light radius, px
    pub radius: f32,
    pub color: String,
    pub tint: String,
    pub chain_color: String,
    pub link_count: usize,
    /// Rest length between links, in cells
    pub link_length: f32,
    pub link_mass: f32,
    pub lantern_mass: f32,
    pub friction: f32,
    pub damping: f32,
    /// Lantern body radius, in cells
    pub body_radius: f32,
    /// Exponential smoothing factor for the rendered tilt
    pub tilt_smoothing: f32,
    pub max_tilt: f32,
    pub ember_colors: [String; 2],
}

impl Default for LanternConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 50.0,
            color: "rgba(255, 214, 150, 1)".into(),
            tint: "rgba(255, 180, 110, 1)".into(),
            chain_color: "rgba(150, 150, 150, 1)".into(),
            link_count: 6,
            link_length: 2.0,
            link_mass: 1.0,
            lantern_mass: 4.0,
            friction: 0.05,
            damping: 0.98,
            body_radius: 2.0,
            tilt_smoothing: 0.15,
            max_tilt: 0.6,
            ember_colors: ["rgba(255, 100, 100, 1)".into(), "rgba(255, 200, 100, 1)".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RainConfig {
    pub color: String,
    /// Line length range, cells
    pub line_length: [f32; 2],
    pub width: [f32; 2],
    /// Fall speed range, px/frame (divided by resolution)
    pub speed: [f32; 2],
    pub max_drops: usize,
    /// Orbit mode (captured by an aura pulse)
    pub orbit_gravity: f32,
    pub orbit_damping: f32,
    pub orbit_max_speed: f32,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            color: "rgba(200, 215, 235, 0.9)".into(),
            line_length: [2.0, 4.0],
            width: [2.0, 5.0],
            speed: [20.0, 60.0],
            max_drops: 600,
            orbit_gravity: 0.04,
            orbit_damping: 0.92,
            orbit_max_speed: 2.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashConfig {
    pub min_count: usize,
    pub max_count: usize,
    /// Lifetime in frames
    pub duration: u32,
    /// Upward speed ceiling, cells/frame
    pub max_speed: f32,
    pub max_splashes: usize,
}

impl Default for SplashConfig {
    fn default() -> Self {
        Self {
            min_count: 1,
            max_count: 5,
            duration: 24,
            max_speed: 0.5,
            max_splashes: 400,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraConfig {
    pub enabled: bool,
    /// Halo radius, px (multiplied by the reach control)
    pub radius: f32,
    pub color: String,
    pub particle_color: String,
    pub base_alpha: f32,
    pub max_particles: usize,
    pub spawn_per_frame: usize,
    pub particle_speed: f32,
    pub particle_life: u32,
    pub particle_radius: [f32; 2],
    pub particle_boost_alpha: f32,
    pub burst_particles: usize,
    pub burst_speed: f32,
    pub burst_life: u32,
    pub pulse_frames: u32,
    pub light_boost: f32,
    pub aura_boost: f32,
}

impl Default for AuraConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 40.0,
            color: "rgba(150, 80, 230, 1)".into(),
            particle_color: "rgba(200, 140, 255, 1)".into(),
            base_alpha: 0.35,
            max_particles: 40,
            spawn_per_frame: 2,
            particle_speed: 1.2,
            particle_life: 40,
            particle_radius: [1.0, 5.0],
            particle_boost_alpha: 0.6,
            burst_particles: 24,
            burst_speed: 2.5,
            burst_life: 18,
            pulse_frames: 60,
            light_boost: 1.25,
            aura_boost: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    /// Fixed cluster count; derived from the grid area when unset
    pub cluster_count: Option<usize>,
    pub min_cluster_count: usize,
    /// One cluster per this many cells
    pub cluster_count_factor: usize,
    pub min_height_factor: f32,
    pub max_height_factor: f32,
    pub brick_gray: [u8; 2],
    pub brick_alpha: [f32; 2],
    pub mortar_gray: [u8; 2],
    pub mortar_alpha: [f32; 2],
    pub erosion_chance: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            cluster_count: None,
            min_cluster_count: 6,
            cluster_count_factor: 180,
            min_height_factor: 0.25,
            max_height_factor: 0.9,
            brick_gray: [70, 100],
            brick_alpha: [0.5, 0.8],
            mortar_gray: [40, 60],
            mortar_alpha: [0.4, 0.6],
            erosion_chance: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    pub vine_count: usize,
    pub stem_color: String,
    pub leaf_color: String,
    pub faded_leaf_color: String,
    pub leaf_probability: f32,
    pub sparse_leaf_probability: f32,
    pub branch_probability: f32,
    pub branch_length: usize,
    pub long_branch_probability: f32,
    pub max_long_branches: usize,
    pub long_branch_length: [usize; 2],
    /// Chance a long-branch step moves two columns instead of one
    pub long_branch_extra_step_chance: f32,
    pub long_branch_rise_chance: f32,
    pub long_branch_droop_chance: f32,
    pub long_branch_sprout_chance: f32,
    pub sprout_length: usize,
    /// Max horizontal drift per row, cells
    pub meander: i32,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            vine_count: 4,
            stem_color: "rgba(60, 90, 50, 1)".into(),
            leaf_color: "rgba(70, 130, 60, 1)".into(),
            faded_leaf_color: "rgba(60, 100, 60, 0.6)".into(),
            leaf_probability: 0.25,
            sparse_leaf_probability: 0.2,
            branch_probability: 0.15,
            branch_length: 3,
            long_branch_probability: 0.05,
            max_long_branches: 2,
            long_branch_length: [4, 8],
            long_branch_extra_step_chance: 0.3,
            long_branch_rise_chance: 0.3,
            long_branch_droop_chance: 0.15,
            long_branch_sprout_chance: 0.2,
            sprout_length: 3,
            meander: 1,
        }
    }
}

// ============================================================================
// Live controls
// ============================================================================

pub const DEFAULT_WIND_ANGLE_DEG: f32 = -12.0;

/// Values a control panel can change between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    pub light_intensity: f32,
    pub rain_density: f32,
    pub aura_reach: f32,
    pub aura_pull: f32,
    pub wind_strength: f32,
    pub wind_angle_deg: f32,
    pub aura_glow: f32,
    pub burst_boost: f32,
    pub orbit_spin: f32,
    pub playing: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            light_intensity: 0.7,
            rain_density: 1.0,
            aura_reach: 1.0,
            aura_pull: 0.05,
            wind_strength: 1.0,
            wind_angle_deg: DEFAULT_WIND_ANGLE_DEG,
            aura_glow: 1.0,
            burst_boost: 1.0,
            orbit_spin: 0.1,
            playing: true,
        }
    }
}

impl Controls {
    /// Clamp every value into its accepted range. NaN falls back to the default.
    pub fn validated(self) -> Self {
        let d = Self::default();
        Self {
            light_intensity: clamp_or(self.light_intensity, 0.2, 1.0, d.light_intensity),
            rain_density: clamp_or(self.rain_density, 0.0, 5.0, d.rain_density),
            aura_reach: clamp_or(self.aura_reach, 1.0, 5.0, d.aura_reach),
            aura_pull: clamp_or(self.aura_pull, 0.01, 0.4, d.aura_pull),
            wind_strength: clamp_or(self.wind_strength, 0.0, 2.0, d.wind_strength),
            wind_angle_deg: clamp_or(self.wind_angle_deg, -45.0, 45.0, d.wind_angle_deg),
            aura_glow: clamp_or(self.aura_glow, 0.0, 2.0, d.aura_glow),
            burst_boost: clamp_or(self.burst_boost, 1.0, 2.0, d.burst_boost),
            orbit_spin: clamp_or(self.orbit_spin, 0.0, 0.3, d.orbit_spin),
            playing: self.playing,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Self = serde_json::from_str(json)?;
        Ok(raw.validated())
    }
}

fn clamp_or(v: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if v.is_nan() { fallback } else { v.clamp(min, max) }
}

/// Map a 10 m wind speed (km/h) from a weather feed onto the wind strength range.
pub fn wind_intensity_from_speed(speed_kmh: f32) -> f32 {
    if !speed_kmh.is_finite() {
        return Controls::default().wind_strength;
    }
    (speed_kmh / 20.0).clamp(0.0, 2.0)
}
