// scene/ - Frame driver
//
// Owns every component and runs one frame in a fixed order:
//   1. advance (when playing): wind, lights, rain, splashes, pulse
//   2. clear grid
//   3. wall, plants (cached shading)
//   4. rain, splashes (fresh shading)
//   5. lights (aura blends over everything above)
// flush() then copies the dirty cells onto a Surface.

use glam::Vec2;

use crate::color::Rgba;
use crate::config::{Controls, SceneConfig};
use crate::error::{Result, SceneError};
use crate::grid::PixelGrid;
use crate::light::{Light, LightContext, LightLevels, SuspendedLantern};
use crate::physics::WindField;
use crate::render::Surface;
use crate::shading::ShadeParams;
use crate::sim::{Droplets, PurpleAura, RainContext, SceneRng, Splashes};
use crate::terrain::{TerrainLayer, generate_plants, generate_wall};

use rand::SeedableRng;

/// Countdown of an active aura pulse
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pulse {
    remaining: u32,
}

pub struct Scene {
    config: SceneConfig,
    controls: Controls,
    canvas: (u32, u32),
    grid: PixelGrid,
    wind: WindField,
    lights: Vec<Light>,
    wall: TerrainLayer,
    plants: TerrainLayer,
    drops: Droplets,
    splashes: Splashes,
    rain_color: Rgba,
    rng: SceneRng,
    pointer: Vec2,
    pulse: Option<Pulse>,
    frame: u64,
}

impl Scene {
    /// Scene with the configured lantern and aura, both following the pointer.
    pub fn new(config: SceneConfig, width: u32, height: u32, seed: u64) -> Result<Self> {
        config.validate()?;
        let anchor = Vec2::new(width as f32 / 2.0, height as f32 / 3.0);
        let res = config.resolution;
        let area = config.lighting.area_scale;

        let mut lights = Vec::new();
        if config.lantern.enabled {
            let lantern = SuspendedLantern::new(anchor, &config.lantern, &config.physics, res, area)?;
            lights.push(Light::Lantern(Box::new(lantern)));
        }
        if config.aura.enabled {
            let aura = PurpleAura::new(anchor, &config.aura, res, area)?;
            lights.push(Light::Aura(Box::new(aura)));
        }
        Self::with_lights(config, width, height, lights, seed)
    }

    pub fn with_lights(config: SceneConfig, width: u32, height: u32, lights: Vec<Light>, seed: u64) -> Result<Self> {
        if config.resolution == 0 {
            return Err(SceneError::InvalidResolution(config.resolution));
        }
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidDimensions { width, height });
        }
        if lights.is_empty() {
            return Err(SceneError::NoLights);
        }
        config.validate()?;

        let rain_color: Rgba = config.rain.color.parse()?;
        let mut rng = SceneRng::seed_from_u64(seed);
        let grid = PixelGrid::new(width, height, config.resolution);
        let (wall, plants) = Self::build_terrain(&config, &grid, &mut rng)?;

        log::info!(
            "scene: {}x{} cells at res {}, {} lights, {} wall + {} plant pixels",
            grid.width(),
            grid.height(),
            config.resolution,
            lights.len(),
            wall.pixels().len(),
            plants.pixels().len(),
        );

        Ok(Self {
            wind: WindField::new(config.wind.clone()),
            drops: Droplets::new(&config.rain),
            splashes: Splashes::new(&config.splash),
            controls: Controls::default(),
            canvas: (width, height),
            pointer: Vec2::new(width as f32 / 2.0, height as f32 / 3.0),
            pulse: None,
            frame: 0,
            config,
            grid,
            lights,
            wall,
            plants,
            rain_color,
            rng,
        })
    }

    fn build_terrain(config: &SceneConfig, grid: &PixelGrid, rng: &mut SceneRng) -> Result<(TerrainLayer, TerrainLayer)> {
        let (w, h, ground) = (grid.width(), grid.height(), config.ground_level);
        let threshold = config.lighting.movement_threshold;
        let wall = generate_wall(w, h, ground, &config.wall, rng);
        let plants = generate_plants(w, h, ground, &config.plants, rng)?;
        Ok((TerrainLayer::new(wall, threshold), TerrainLayer::new(plants, threshold)))
    }

    // ------------------------------------------------------------------
    // Host inputs
    // ------------------------------------------------------------------

    /// Pointer position in screen px; lights anchor here.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.pointer = Vec2::new(x, y);
        }
    }

    pub fn set_controls(&mut self, controls: Controls) {
        let validated = controls.validated();
        if validated != controls {
            log::warn!("controls clamped into range: {:?}", controls);
        }
        self.controls = validated;
    }

    /// Wind from the external weather feed. Values are clamped like any
    /// other control; the last accepted values persist.
    pub fn set_wind(&mut self, intensity: f32, angle_deg: f32) {
        self.set_controls(Controls { wind_strength: intensity, wind_angle_deg: angle_deg, ..self.controls });
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.controls.playing = playing;
    }

    /// Click: burst every aura and start a pulse.
    pub fn trigger_pulse(&mut self) {
        for light in &mut self.lights {
            if let Some(aura) = light.as_aura_mut() {
                aura.trigger_burst(&mut self.rng);
            }
        }
        self.pulse = Some(Pulse { remaining: self.config.aura.pulse_frames });
    }

    /// Rebuild grid and terrain for a new canvas; particles are dropped,
    /// lights are kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidDimensions { width, height });
        }
        self.grid = PixelGrid::new(width, height, self.config.resolution);
        let (wall, plants) = Self::build_terrain(&self.config, &self.grid, &mut self.rng)?;
        self.wall = wall;
        self.plants = plants;
        self.drops.clear();
        self.splashes.clear();
        self.canvas = (width, height);
        log::info!("scene resized to {}x{} cells", self.grid.width(), self.grid.height());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn grid(&self) -> &PixelGrid { &self.grid }

    pub fn lights(&self) -> &[Light] { &self.lights }

    pub fn controls(&self) -> &Controls { &self.controls }

    pub fn config(&self) -> &SceneConfig { &self.config }

    pub fn canvas_size(&self) -> (u32, u32) { self.canvas }

    pub fn drops(&self) -> &Droplets { &self.drops }

    pub fn splashes(&self) -> &Splashes { &self.splashes }

    pub fn wall(&self) -> &TerrainLayer { &self.wall }

    pub fn plants(&self) -> &TerrainLayer { &self.plants }

    pub fn frame_count(&self) -> u64 { self.frame }

    pub fn pulse_active(&self) -> bool { self.pulse.is_some() }

    /// Pulse strength, 1 right after the click fading to 0
    fn pulse_fade(&self) -> f32 {
        match self.pulse {
            Some(p) => p.remaining as f32 / self.config.aura.pulse_frames.max(1) as f32,
            None => 0.0,
        }
    }

    /// Global light and aura multipliers for this frame
    pub fn levels(&self) -> LightLevels {
        let fade = self.pulse_fade() * self.controls.burst_boost;
        let a = &self.config.aura;
        LightLevels {
            light: self.controls.light_intensity * (1.0 + (a.light_boost - 1.0) * fade),
            aura: self.controls.aura_glow * (1.0 + (a.aura_boost - 1.0) * fade),
        }
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Run one frame into the grid. Paused scenes redraw without advancing.
    pub fn tick(&mut self) {
        if self.controls.playing {
            self.advance();
            self.frame += 1;
        }
        self.draw();
    }

    fn advance(&mut self) {
        let res = self.config.resolution as f32;
        let c = self.controls;

        self.wind.update();
        let ground_y = (self.grid.height() - self.config.ground_level) as f32 * res;
        let ctx = LightContext {
            anchor: self.pointer,
            pointer: self.pointer,
            wind: self.wind.force() * c.wind_strength,
            ground_y,
            aura_reach: c.aura_reach,
        };
        for light in &mut self.lights {
            light.step(&ctx, &mut self.rng);
        }

        let pulse_center = self.pulse.map(|_| {
            let center = self.lights.iter().find_map(Light::as_aura).map_or(self.pointer, |a| a.source().position);
            center / res
        });
        let rain = RainContext {
            tilt_deg: c.wind_angle_deg * c.wind_strength,
            density: c.rain_density,
            pulse: pulse_center,
            reach: self.config.aura.radius * c.aura_reach / res,
            pull: c.aura_pull,
            spin: c.orbit_spin,
        };
        self.drops.update(&self.grid, self.config.ground_level, &rain, &mut self.splashes, &mut self.rng);
        self.splashes.update(&self.grid, &mut self.rng);

        if let Some(p) = &mut self.pulse {
            p.remaining = p.remaining.saturating_sub(1);
            if p.remaining == 0 {
                self.pulse = None;
            }
        }
    }

    fn draw(&mut self) {
        let levels = self.levels();
        let params = ShadeParams::new(&self.config.lighting, levels.light);

        self.grid.clear();
        self.wall.render(&mut self.grid, &self.lights, &params);
        self.plants.render(&mut self.grid, &self.lights, &params);
        self.drops.render(&mut self.grid, &self.lights, self.rain_color, &params);
        self.splashes.render(&mut self.grid, &self.lights, self.rain_color, &params);
        for light in &self.lights {
            light.render(&mut self.grid, levels);
        }
    }

    /// Copy this frame's cells onto `surface`.
    pub fn flush<S: Surface + ?Sized>(&self, surface: &mut S) {
        self.grid.render(surface);
    }
}
