// Copyright 2020 TwoCookingMice

use trirender::core::acceleration::AccelerationStructure;
use trirender::core::error::Result;
use trirender::core::settings::CliOptions;
use trirender::core::tracer::RayTracer;
use trirender::io::{exr_utils, image_utils, obj_utils};
use trirender::renderers::raytracer::{RayTracingRenderer, Renderer};
use trirender::sensors::perspective::PerspectiveCamera;
use trirender::shaders::basic::VisibilityShader;
use trirender::shaders::direct_light::DirectLightShader;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <model.obj> <output.png> [--width N] [--height N] [--frames N] [--max-depth N] \
                   [--samples N] [--threads N] [--seed N] [--progress] [--camera-pos X Y Z] [--theta DEG] \
                   [--phi DEG] [--fov DEG] [--near Z] [--far Z] [--light X Y Z] [--background black|sky] \
                   [--exr PATH]", args[0]);
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let mut options = CliOptions::new(PathBuf::from(&args[1])).parse_flags(&args[3..])?;
    options.output_path = Some(PathBuf::from(&args[2]));
    if !options.seed_given {
        options.settings.seed = clock_seed();
    }
    let settings = options.settings.clone().validate()?;
    log::info!("Seed: {}.", settings.seed);

    let geometry = obj_utils::load_geometry_from_file(&options.model_path)?;
    let index = Arc::new(AccelerationStructure::build(&geometry)?);

    let mut shader = DirectLightShader::new(settings.samples_per_hit)
        .with_background(options.background);
    if !options.lights.is_empty() {
        let shadow_tracer = RayTracer::new(Arc::clone(&index), VisibilityShader, settings.max_depth);
        shader = shader.with_lights(options.lights.clone()).with_shadow_tracer(shadow_tracer);
    }

    let camera = PerspectiveCamera::from_angles(options.camera_position,
                                                options.camera_theta,
                                                options.camera_phi,
                                                options.fov_y_degrees.to_radians(),
                                                settings.aspect(),
                                                options.z_near,
                                                options.z_far);

    let mut renderer = RayTracingRenderer::new(settings, index, shader)?;
    let image = renderer.render(&camera);

    if let Some(output_path) = &options.output_path {
        image_utils::write_png(image, output_path)?;
    }
    if let Some(exr_path) = &options.exr_path {
        exr_utils::write_exr_to_file(image, exr_path)?;
    }
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
