use trirender::core::acceleration::AccelerationStructure;
use trirender::core::error::Result;
use trirender::core::rng::{mix_seed, LcgRng};
use trirender::core::sensor::Sensor;
use trirender::core::settings::CliOptions;
use trirender::core::shader::Trace;
use trirender::core::tracer::RayTracer;
use trirender::io::obj_utils;
use trirender::math::bitmap::blend;
use trirender::math::constants::{Float, Vector2f, Vector3f};
use trirender::sensors::perspective::PerspectiveCamera;
use trirender::shaders::direct_light::DirectLightShader;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

fn main() {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <model.obj> <x> <y> [--width N] [--height N] [--frames N] [--max-depth N] \
                   [--samples N] [--seed N] [--camera-pos X Y Z] [--theta DEG] [--phi DEG] [--fov DEG]", args[0]);
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        eprintln!("trace_pixel: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let x: usize = args[2].parse().unwrap_or(0);
    let y: usize = args[3].parse().unwrap_or(0);
    let options = CliOptions::new(PathBuf::from(&args[1])).parse_flags(&args[4..])?;
    let settings = options.settings.clone().validate()?;

    if x >= settings.width || y >= settings.height {
        eprintln!("Pixel out of bounds: ({}, {}) for size {}x{}", x, y, settings.width, settings.height);
        std::process::exit(2);
    }

    let geometry = obj_utils::load_geometry_from_file(&options.model_path)?;
    let index = Arc::new(AccelerationStructure::build(&geometry)?);
    let shader = DirectLightShader::new(settings.samples_per_hit).with_background(options.background);
    let tracer = RayTracer::new(Arc::clone(&index), shader, settings.max_depth);
    let camera = PerspectiveCamera::from_angles(options.camera_position,
                                                options.camera_theta,
                                                options.camera_phi,
                                                options.fov_y_degrees.to_radians(),
                                                settings.aspect(),
                                                options.z_near,
                                                options.z_far);

    println!("trace_pixel: model={} pixel=({}, {}) seed={}", options.model_path.display(), x, y, settings.seed);

    let center = Vector2f::new((x as Float + 0.5) / settings.width as Float,
                               (y as Float + 0.5) / settings.height as Float);
    match index.intersect_closest(&camera.sample_ray(&center)) {
        Some(hit) => println!("primary hit: t={:.6} bary=({:.5}, {:.5}, {:.5}) emissive=({:.5}, {:.5}, {:.5})",
                              hit.payload.t,
                              hit.payload.bary.x, hit.payload.bary.y, hit.payload.bary.z,
                              hit.triangle.emissive.x, hit.triangle.emissive.y, hit.triangle.emissive.z),
        None => println!("primary hit: miss"),
    }

    let mut mean = Vector3f::zeros();
    for frame in 0..settings.frames {
        let mut rng = LcgRng::new(mix_seed(settings.seed, 0, frame));
        let u = Vector2f::new((x as Float + rng.next_f32()) / settings.width as Float,
                              (y as Float + rng.next_f32()) / settings.height as Float);
        let sample = tracer.trace_ray(&camera.sample_ray(&u), 0, &mut rng).color;
        blend(&mut mean, &sample, 1.0 / (frame as Float + 1.0));
        println!("frame {}: sample=({:.6}, {:.6}, {:.6}) mean=({:.6}, {:.6}, {:.6})",
                 frame, sample.x, sample.y, sample.z, mean.x, mean.y, mean.z);
    }
    Ok(())
}
