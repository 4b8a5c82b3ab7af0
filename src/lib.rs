use wasm_bindgen::prelude::*;

pub mod color;
pub mod config;
pub mod error;
pub mod grid;
pub mod light;
pub mod physics;
pub mod render;
pub mod scene;
pub mod shading;
pub mod sim;
pub mod terrain;

pub use color::Rgba;
pub use config::{Controls, SceneConfig, wind_intensity_from_speed};
pub use error::{Result, SceneError};
pub use grid::PixelGrid;
pub use render::{DrawList, Encoder, Surface};
pub use scene::Scene;

// ============================================================================
// WEATHER WORLD - Pixel-grid weather scene rendered into an RGBA buffer
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // a second init (hot reload) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
}

fn js_err(e: SceneError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WeatherWorld {
    scene: Scene,
    out: Encoder,
}

#[wasm_bindgen]
impl WeatherWorld {
    /// Default scene. `config_json` may be empty or a partial SceneConfig.
    #[wasm_bindgen(constructor)]
    pub fn new(w: u32, h: u32, config_json: Option<String>) -> std::result::Result<WeatherWorld, JsValue> {
        let config = match config_json.as_deref().map(str::trim) {
            Some(json) if !json.is_empty() => SceneConfig::from_json(json).map_err(js_err)?,
            _ => SceneConfig::default(),
        };
        let background: Rgba = config.background.parse().map_err(js_err)?;
        let seed = js_sys::Date::now() as u64;
        let scene = Scene::new(config, w, h, seed).map_err(js_err)?;

        Ok(Self { scene, out: Encoder::new(w, h, background) })
    }

    pub fn tick(&mut self) {
        self.scene.tick();
        self.out.clear();
        self.scene.flush(&mut self.out);
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.scene.set_pointer(x, y);
    }

    /// Replace the control snapshot. Unknown fields are ignored and missing
    /// ones take their defaults; malformed JSON leaves the old snapshot.
    pub fn set_controls(&mut self, json: &str) -> std::result::Result<(), JsValue> {
        match Controls::from_json(json) {
            Ok(controls) => {
                self.scene.set_controls(controls);
                Ok(())
            }
            Err(e) => {
                log::warn!("rejected controls: {e}");
                Err(js_err(e))
            }
        }
    }

    pub fn set_wind(&mut self, intensity: f32, angle_deg: f32) {
        self.scene.set_wind(intensity, angle_deg);
    }

    /// Wind from a 10 m wind speed in km/h, keeping the current angle.
    pub fn set_wind_speed(&mut self, speed_kmh: f32) {
        let angle = self.scene.controls().wind_angle_deg;
        self.scene.set_wind(wind_intensity_from_speed(speed_kmh), angle);
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.scene.set_playing(playing);
    }

    pub fn pulse(&mut self) {
        self.scene.trigger_pulse();
    }

    pub fn resize(&mut self, w: u32, h: u32) -> std::result::Result<(), JsValue> {
        self.scene.resize(w, h).map_err(js_err)?;
        self.out.resize(w, h);
        Ok(())
    }

    pub fn output_ptr(&self) -> *const u8 { self.out.ptr() }
    pub fn output_len(&self) -> usize { self.out.len() }
    pub fn width(&self) -> u32 { self.out.width() }
    pub fn height(&self) -> u32 { self.out.height() }
}
