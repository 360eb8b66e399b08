// Copyright @yucwang 2021

use crate::core::acceleration::AccelerationStructure;
use crate::core::error::{RenderError, Result};
use crate::core::geometry::GeometryBuffer;
use crate::core::rng::{mix_seed, LcgRng};
use crate::core::sensor::Sensor;
use crate::core::settings::RenderSettings;
use crate::core::shader::{Shader, Trace};
use crate::core::tracer::RayTracer;
use crate::math::bitmap::{blend, Bitmap};
use crate::math::constants::{Float, Vector2f, Vector3f};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::thread;

pub use super::renderer::Renderer;

/// Rows per unit of work handed to a worker.
const BAND_HEIGHT: usize = 16;

pub struct RayTracingRenderer<S> {
    settings: RenderSettings,
    tracer: RayTracer<S>,
    render_target: Bitmap,
    frames_rendered: u32,
}

impl<S: Shader> Renderer for RayTracingRenderer<S> {
    fn render(&mut self, camera: &dyn Sensor) -> &Bitmap {
        let frames = self.settings.frames;
        log::info!("Ray tracing {}x{} with {} accumulation frames on {} workers.",
                   self.render_target.width(), self.render_target.height(),
                   frames, self.settings.worker_count());
        log::debug!("{}", camera.describe());

        self.clear_render_target(Vector3f::zeros());

        let progress = if self.settings.progress {
            let bar = ProgressBar::new(frames as u64);
            bar.set_style(
                ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        for frame_id in 0..frames {
            self.ray_generation(camera, 1.0 / (frame_id as Float + 1.0));
            progress.inc(1);
            log::debug!("Accumulation frame {}/{} done.", frame_id + 1, frames);
        }
        progress.finish_and_clear();

        log::info!("Render finished after {} frames.", self.frames_rendered);
        &self.render_target
    }
}

impl<S: Shader> RayTracingRenderer<S> {
    pub fn new(settings: RenderSettings, index: Arc<AccelerationStructure>, shader: S) -> Result<Self> {
        let settings = settings.validate()?;
        if settings.width.checked_mul(settings.height).is_none() {
            return Err(RenderError::InvalidConfig(
                format!("viewport {}x{} is too large", settings.width, settings.height)));
        }

        let tracer = RayTracer::new(index, shader, settings.max_depth);
        let render_target = Bitmap::new(settings.width, settings.height);
        Ok(Self { settings, tracer, render_target, frames_rendered: 0 })
    }

    pub fn from_geometry(settings: RenderSettings, geometry: &GeometryBuffer, shader: S) -> Result<Self> {
        let settings = settings.validate()?;
        let index = Arc::new(AccelerationStructure::build(geometry)?);
        Self::new(settings, index, shader)
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn tracer(&self) -> &RayTracer<S> {
        &self.tracer
    }

    pub fn accumulation(&self) -> &Bitmap {
        &self.render_target
    }

    pub fn frames_rendered(&self) -> u32 {
        self.frames_rendered
    }

    /// Refills the target and restarts the running mean.
    pub fn clear_render_target(&mut self, color: Vector3f) {
        self.render_target.fill(color);
        self.frames_rendered = 0;
    }

    /// One full-frame pass: a jittered primary ray per pixel, blended into
    /// the target with `weight`. Returns once every worker is done.
    pub fn ray_generation(&mut self, camera: &dyn Sensor, weight: Float) {
        let width = self.render_target.width();
        let height = self.render_target.height();
        let workers = self.settings.worker_count();
        let seed = self.settings.seed;
        let frame = self.frames_rendered;
        let tracer = &self.tracer;

        // Bands are dealt round-robin so the split depends only on the
        // worker count, never on scheduling.
        let mut assignments: Vec<Vec<(usize, &mut [Vector3f])>> = (0..workers).map(|_| Vec::new()).collect();
        for (band_idx, band) in self.render_target.bands_mut(BAND_HEIGHT).enumerate() {
            assignments[band_idx % workers].push((band_idx * BAND_HEIGHT, band));
        }

        thread::scope(|scope| {
            for (worker, bands) in assignments.into_iter().enumerate() {
                scope.spawn(move || {
                    let mut rng = LcgRng::new(mix_seed(seed, worker, frame));
                    for (y0, band) in bands {
                        for (i, cell) in band.iter_mut().enumerate() {
                            let x = i % width;
                            let y = y0 + i / width;
                            let u = Vector2f::new((x as Float + rng.next_f32()) / width as Float,
                                                  (y as Float + rng.next_f32()) / height as Float);
                            let ray = camera.sample_ray(&u);
                            let payload = tracer.trace_ray(&ray, 0, &mut rng);
                            blend(cell, &payload.color, weight);
                        }
                    }
                });
            }
        });

        self.frames_rendered += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::spectrum::{luminance, UnsignedColor};
    use crate::sensors::perspective::PerspectiveCamera;
    use crate::shaders::background::Background;
    use crate::shaders::basic::{ConstantShader, EmissiveShader};
    use crate::shaders::direct_light::DirectLightShader;
    use crate::shapes::triangle::Triangle;

    fn camera(fov_degrees: Float, aspect: Float) -> PerspectiveCamera {
        PerspectiveCamera::look_at(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0),
                                   Vector3f::new(0.0, 1.0, 0.0),
                                   fov_degrees.to_radians(), aspect, 0.0, 100.0)
    }

    fn index(triangles: Vec<Triangle>) -> Arc<AccelerationStructure> {
        Arc::new(AccelerationStructure::from_triangles(triangles))
    }

    // Centroid on the view axis at z = 5, facing the camera.
    fn target_triangle() -> Triangle {
        Triangle::new(Vector3f::new(-1.0, -1.0, 5.0),
                      Vector3f::new(0.0, 2.0, 5.0),
                      Vector3f::new(1.0, -1.0, 5.0))
    }

    fn pixel_variance(bitmap: &Bitmap) -> Float {
        let values: Vec<Float> = bitmap.pixels().iter().map(luminance).collect();
        let n = values.len() as Float;
        let mean = values.iter().sum::<Float>() / n;
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<Float>() / n
    }

    #[test]
    fn test_single_triangle_end_to_end() {
        let emissive = Vector3f::new(0.2, 0.6, 0.8);
        let settings = RenderSettings::new(1, 1, 1).with_seed(7);
        let shader = EmissiveShader { background: Background::Black };
        let mut renderer = RayTracingRenderer::new(settings, index(vec![target_triangle().with_emissive(emissive)]), shader)
            .expect("renderer");

        let image = renderer.render(&camera(10.0, 1.0));
        assert_eq!(image[(0, 0)], emissive);
        assert_eq!(image.to_unsigned()[0], UnsignedColor::from_float3(&emissive));
        assert_eq!(renderer.frames_rendered(), 1);
    }

    #[test]
    fn test_empty_scene_is_background_everywhere() {
        let sky = Vector3f::new(0.25, 0.5, 0.75);
        let shader = DirectLightShader::new(4).with_background(Background::Constant(sky));
        let mut renderer = RayTracingRenderer::from_geometry(RenderSettings::new(9, 5, 3).with_threads(2),
                                                             &GeometryBuffer::default(), shader)
            .expect("renderer");
        let image = renderer.render(&camera(60.0, 9.0 / 5.0));
        assert!(image.pixels().iter().all(|p| *p == sky));
    }

    #[test]
    fn test_constant_shading_accumulates_exactly() {
        let color = Vector3f::new(0.3, 0.7, 0.11);
        for frames in [1u32, 3, 7].iter() {
            let settings = RenderSettings::new(20, 37, *frames).with_threads(3);
            let mut renderer = RayTracingRenderer::new(settings, index(vec![target_triangle()]), ConstantShader { color })
                .expect("renderer");
            let image = renderer.render(&camera(40.0, 20.0 / 37.0));
            assert!(image.pixels().iter().all(|p| *p == color), "frames = {}", frames);
            assert_eq!(renderer.frames_rendered(), *frames);
        }
    }

    #[test]
    fn test_variance_shrinks_with_more_frames() {
        let wall = Triangle::new(Vector3f::new(-50.0, -50.0, 5.0),
                                 Vector3f::new(0.0, 100.0, 5.0),
                                 Vector3f::new(50.0, -50.0, 5.0))
            .with_diffuse(Vector3f::new(1.0, 1.0, 1.0));
        let scene = index(vec![wall]);
        let cam = camera(30.0, 1.0);

        let mut variances = Vec::new();
        for frames in [1u32, 10, 100].iter() {
            let settings = RenderSettings::new(16, 16, *frames).with_seed(1234).with_threads(4);
            let shader = DirectLightShader::new(1).with_background(Background::Constant(Vector3f::new(1.0, 1.0, 1.0)));
            let mut renderer = RayTracingRenderer::new(settings, Arc::clone(&scene), shader).expect("renderer");
            variances.push(pixel_variance(renderer.render(&cam)));
        }

        assert!(variances[0] > 0.0);
        assert!(variances[1] <= variances[0], "{:?}", variances);
        assert!(variances[2] <= variances[1], "{:?}", variances);
    }

    #[test]
    fn test_same_seed_same_image() {
        let wall = Triangle::new(Vector3f::new(-50.0, -50.0, 5.0),
                                 Vector3f::new(0.0, 100.0, 5.0),
                                 Vector3f::new(50.0, -50.0, 5.0))
            .with_diffuse(Vector3f::new(0.7, 0.7, 0.7));
        let scene = index(vec![wall]);
        let cam = camera(30.0, 1.0);
        let render = |seed: u64| {
            let settings = RenderSettings::new(8, 20, 2).with_seed(seed).with_threads(2);
            let shader = DirectLightShader::new(3).with_background(Background::SkyGradient);
            let mut renderer = RayTracingRenderer::new(settings, Arc::clone(&scene), shader).expect("renderer");
            renderer.render(&cam).clone()
        };

        assert_eq!(render(5), render(5));
        assert_ne!(render(5), render(6));
    }

    #[test]
    fn test_manual_frames_match_render() {
        let color = Vector3f::new(0.5, 0.25, 1.0);
        let settings = RenderSettings::new(4, 4, 2).with_threads(1);
        let mut renderer = RayTracingRenderer::new(settings, index(Vec::new()), ConstantShader { color })
            .expect("renderer");
        let cam = camera(45.0, 1.0);

        renderer.clear_render_target(Vector3f::zeros());
        renderer.ray_generation(&cam, 1.0);
        renderer.ray_generation(&cam, 0.5);
        assert_eq!(renderer.frames_rendered(), 2);
        assert!(renderer.accumulation().pixels().iter().all(|p| *p == color));

        renderer.clear_render_target(Vector3f::new(1.0, 1.0, 1.0));
        assert_eq!(renderer.frames_rendered(), 0);
        assert_eq!(renderer.accumulation()[(3, 3)], Vector3f::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_invalid_settings_rejected_before_work() {
        let shader = ConstantShader { color: Vector3f::zeros() };
        assert!(RayTracingRenderer::new(RenderSettings::new(0, 4, 1), index(Vec::new()), shader).is_err());
        assert!(RayTracingRenderer::new(RenderSettings::new(4, 4, 0), index(Vec::new()), shader).is_err());
    }
}
