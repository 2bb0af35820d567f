//! Demo building a lit scene, running a few frames and round-tripping it to disk

use std::error::Error;

use stagecraft::prelude::*;

fn build_lights(engine: &mut Engine) -> Result<(), Box<dyn Error>> {
    let warm = engine
        .lights
        .point(DVec3::new(2.0, 3.0, 2.0), Color::rgb(1.0, 0.9, 0.8))
        .with_intensity(1.5)
        .with_radius(15.0)
        .with_shadows(ShadowSettings::new(2048).with_filter_size(2.0))
        .with_far_attenuation(150.0)
        .with_volumetric(true);
    engine.create_light(warm)?;

    let cool = engine
        .lights
        .spot(DVec3::new(0.0, 5.0, 0.0), Color::rgb(0.9, 0.9, 1.0))
        .with_intensity(2.0)
        .with_fov(35.0)
        .with_range(25.0)
        .with_shadows(ShadowSettings::new(4096).with_filter_size(1.5));
    engine.create_light(cool)?;

    let sun = engine
        .lights
        .directional(DVec3::new(45.0, -45.0, 0.0), Color::rgb(1.0, 1.0, 0.9))
        .with_shadows(ShadowSettings::new(8192).with_filter_size(3.0));
    engine.create_light(sun)?;

    let ambient = engine
        .lights
        .ambient(Color::rgb(0.1, 0.1, 0.15))
        .with_intensity(0.2);
    engine.create_light(ambient)?;

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default().with_title("Stagecraft Demo"),
    };
    let mut engine = Engine::new(config);

    engine.create_scene("main")?;
    build_lights(&mut engine)?;

    let grass = engine.resources.load_texture("grass", "textures/grass.png");
    log::info!("Registered texture {} ({})", grass.id(), grass.path.display());

    engine.create_light_entity(DVec3::new(2.0, 3.0, 2.0), Color::WHITE)?;
    let ground = engine.create_entity(
        &EntityDesc::model("plane")
            .named("ground")
            .scaled(DVec3::new(20.0, 1.0, 20.0))
            .colored(Color::GRAY)
            .textured("grass"),
    )?;
    let cube = engine.create_entity(
        &EntityDesc::model("cube")
            .at(DVec3::new(0.0, 1.0, 0.0))
            .colored(Color::WHITE),
    )?;
    let player = engine.create_fps_controller(DVec3::new(0.0, 2.0, 0.0))?;

    engine.add_physics(ground)?;
    engine.add_physics(cube)?;
    engine.set_parent(cube, Some(ground))?;

    let agent = engine.ai.create_agent(cube, Behavior::Follow);
    engine.ai.set_target(agent, Some(player));
    for _ in 0..60 {
        engine.update(1.0 / 60.0);
    }
    log::info!("{}", engine.stats().format_stats());

    let path = engine.save_scene("main")?;
    log::info!("Saved scene to {}", path.display());

    let loaded = engine.load_scene_file(&path)?;
    log::info!(
        "Reloaded {} entities ({} lights configured)",
        loaded.len(),
        engine.lights.len()
    );

    Ok(())
}
