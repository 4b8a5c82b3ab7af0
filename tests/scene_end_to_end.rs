// End-to-end: one point light over a 160x90 canvas at resolution 5.

use glam::Vec2;
use weather_engine::config::LightingConfig;
use weather_engine::light::{Light, LightSource};
use weather_engine::shading::ShadeParams;
use weather_engine::terrain::{PixelMap, TerrainLayer};
use weather_engine::{Controls, DrawList, Encoder, PixelGrid, Rgba, Scene, SceneConfig};

fn point_light() -> Light {
    Light::Point(LightSource::new(
        Vec2::new(80.0, 45.0),
        50.0,
        Rgba::from_rgb(255, 240, 220),
        Rgba::from_rgb(255, 200, 150),
        5,
        3.0,
    ))
}

fn lightness(c: Rgba) -> f32 {
    c.to_hsl().2
}

#[test]
fn test_grid_and_lighting_area() {
    let grid = PixelGrid::new(160, 90, 5);
    assert_eq!((grid.width(), grid.height()), (32, 18));

    let light = point_light();
    assert_eq!(light.source().lighting_area(), 30.0);
    assert!(light.distance(16.0, 9.0) < 1e-6);
    assert!(light.distance(0.0, 0.0) > 0.5);
}

#[test]
fn test_terrain_shading_under_and_far_from_light() {
    let base = Rgba::gray(90, 0.8);
    let mut map = PixelMap::new(32, 18);
    map.add(16, 9, base);
    map.add(0, 0, base);

    let lights = vec![point_light()];
    let cfg = LightingConfig { tint_strength: 0.0, ..LightingConfig::default() };
    let params = ShadeParams::new(&cfg, 1.0);
    let mut layer = TerrainLayer::new(map, cfg.movement_threshold);
    let mut grid = PixelGrid::new(160, 90, 5);
    layer.render(&mut grid, &lights, &params);

    let under = grid.get_pixel(16, 9).unwrap();
    let corner = grid.get_pixel(0, 0).unwrap();

    // directly under the light: full base lightness
    assert!((lightness(under) - lightness(base)).abs() < 0.01);
    // the corner sits at the lightness floor
    assert!((lightness(corner) - cfg.min_lightness).abs() < 0.01);
    assert!(lightness(corner) < lightness(under));
    assert_eq!(under.a, base.a);
    assert_eq!(corner.a, base.a);
}

#[test]
fn test_static_light_frames_are_identical_and_cached() {
    let mut map = PixelMap::new(32, 18);
    for x in 0..32 {
        map.add(x, 12, Rgba::gray(80, 0.7));
    }
    let lights = vec![point_light()];
    let params = ShadeParams::new(&LightingConfig::default(), 0.7);
    let mut layer = TerrainLayer::new(map, 2.0);

    let mut first = PixelGrid::new(160, 90, 5);
    layer.render(&mut first, &lights, &params);
    let evals = layer.lighting().evaluations();

    let mut second = PixelGrid::new(160, 90, 5);
    layer.render(&mut second, &lights, &params);

    assert_eq!(layer.lighting().evaluations(), evals);
    for x in 0..32 {
        assert_eq!(first.get_pixel(x, 12), second.get_pixel(x, 12));
    }
}

#[test]
fn test_scene_frame_reaches_the_buffer() {
    let mut scene = Scene::with_lights(SceneConfig::default(), 160, 90, vec![point_light()], 7).unwrap();
    scene.set_pointer(80.0, 45.0);
    scene.set_controls(Controls { rain_density: 3.0, ..Controls::default() });
    for _ in 0..20 {
        scene.tick();
    }

    let mut list = DrawList::default();
    scene.flush(&mut list);
    assert!(!list.rects.is_empty());
    assert!(list.rects.iter().all(|r| r.x % 5 == 0 && r.y % 5 == 0));

    let background = Rgba::from_rgb(0x13, 0x13, 0x13);
    let mut out = Encoder::new(160, 90, background);
    scene.flush(&mut out);
    assert_eq!(out.len(), 160 * 90 * 4);

    // the light disc is drawn over the center cell
    let center = out.pixel(82, 47).unwrap();
    assert_ne!(center, background.to_rgba8());
}

#[test]
fn test_paused_scene_redraws_same_frame() {
    let mut scene = Scene::with_lights(SceneConfig::default(), 160, 90, vec![point_light()], 7).unwrap();
    for _ in 0..10 {
        scene.tick();
    }
    scene.set_playing(false);

    let capture = |scene: &mut Scene| {
        scene.tick();
        let mut list = DrawList::default();
        scene.flush(&mut list);
        list.rects
    };
    let a = capture(&mut scene);
    let b = capture(&mut scene);
    assert_eq!(a, b);
}
