// Copyright @yucwang 2026

use crate::core::error::{RenderError, Result};
use crate::core::tracer::MAX_TRACE_DEPTH;
use crate::math::constants::{Float, Vector3f};
use crate::shaders::background::Background;
use crate::shaders::direct_light::{PointLight, DEFAULT_SAMPLES};

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub width: usize,
    pub height: usize,
    pub frames: u32,
    pub max_depth: u32,
    pub samples_per_hit: usize,
    pub seed: u64,
    pub threads: Option<usize>,
    pub progress: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            frames: 1,
            max_depth: 1,
            samples_per_hit: DEFAULT_SAMPLES,
            seed: 0,
            threads: None,
            progress: false,
        }
    }
}

impl RenderSettings {
    pub fn new(width: usize, height: usize, frames: u32) -> Self {
        Self { width, height, frames, ..Self::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Rejects settings that leave nothing to render and clamps the depth.
    pub fn validate(mut self) -> Result<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(
                format!("viewport must be non-empty, got {}x{}", self.width, self.height)));
        }
        if self.frames == 0 {
            return Err(RenderError::InvalidConfig(String::from("accumulation frame count must be positive")));
        }
        if self.threads == Some(0) {
            return Err(RenderError::InvalidConfig(String::from("thread count must be positive")));
        }
        if self.max_depth > MAX_TRACE_DEPTH {
            log::warn!("Max depth {} clamped to {}.", self.max_depth, MAX_TRACE_DEPTH);
            self.max_depth = MAX_TRACE_DEPTH;
        }
        Ok(self)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn worker_count(&self) -> usize {
        let requested = self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        });
        requested.max(1).min(self.height.max(1))
    }
}

/// Everything the renderer binaries take from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub model_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub exr_path: Option<PathBuf>,
    pub settings: RenderSettings,
    pub camera_position: Vector3f,
    pub camera_theta: Float,
    pub camera_phi: Float,
    pub fov_y_degrees: Float,
    pub z_near: Float,
    pub z_far: Float,
    pub background: Background,
    pub lights: Vec<PointLight>,
    pub seed_given: bool,
}

impl CliOptions {
    pub fn new(model_path: PathBuf) -> Self {
        Self {
            model_path,
            output_path: None,
            exr_path: None,
            settings: RenderSettings::default(),
            camera_position: Vector3f::new(0.0, 0.0, 3.0),
            camera_theta: 0.0,
            camera_phi: 0.0,
            fov_y_degrees: 60.0,
            z_near: 0.001,
            z_far: 100.0,
            background: Background::Black,
            lights: Vec::new(),
            seed_given: false,
        }
    }

    /// Parses `--flag value` pairs. Unknown flags are ignored with a warning.
    pub fn parse_flags(mut self, args: &[String]) -> Result<Self> {
        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--width" => self.settings.width = parse_value(args, &mut i, flag)?,
                "--height" => self.settings.height = parse_value(args, &mut i, flag)?,
                "--frames" => self.settings.frames = parse_value(args, &mut i, flag)?,
                "--max-depth" => self.settings.max_depth = parse_value(args, &mut i, flag)?,
                "--samples" => self.settings.samples_per_hit = parse_value(args, &mut i, flag)?,
                "--threads" => self.settings.threads = Some(parse_value(args, &mut i, flag)?),
                "--seed" => {
                    self.settings.seed = parse_value(args, &mut i, flag)?;
                    self.seed_given = true;
                }
                "--progress" => self.settings.progress = true,
                "--camera-pos" => {
                    let x = parse_value(args, &mut i, flag)?;
                    let y = parse_value(args, &mut i, flag)?;
                    let z = parse_value(args, &mut i, flag)?;
                    self.camera_position = Vector3f::new(x, y, z);
                }
                "--light" => {
                    let x = parse_value(args, &mut i, flag)?;
                    let y = parse_value(args, &mut i, flag)?;
                    let z = parse_value(args, &mut i, flag)?;
                    self.lights.push(PointLight::new(Vector3f::new(x, y, z), Vector3f::new(1.0, 1.0, 1.0)));
                }
                "--theta" => self.camera_theta = parse_value(args, &mut i, flag)?,
                "--phi" => self.camera_phi = parse_value(args, &mut i, flag)?,
                "--fov" => self.fov_y_degrees = parse_value(args, &mut i, flag)?,
                "--near" => self.z_near = parse_value(args, &mut i, flag)?,
                "--far" => self.z_far = parse_value(args, &mut i, flag)?,
                "--exr" => self.exr_path = Some(PathBuf::from(next_arg(args, &mut i, flag)?)),
                "--background" => {
                    self.background = match next_arg(args, &mut i, flag)? {
                        "black" => Background::Black,
                        "sky" => Background::SkyGradient,
                        other => {
                            return Err(RenderError::InvalidConfig(format!("unknown background '{}'", other)));
                        }
                    }
                }
                other => log::warn!("Ignoring unknown argument '{}'.", other),
            }
            i += 1;
        }
        Ok(self)
    }
}

fn next_arg<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(|s| s.as_str())
        .ok_or_else(|| RenderError::InvalidConfig(format!("{} expects a value", flag)))
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: &mut usize, flag: &str) -> Result<T> {
    let raw = next_arg(args, i, flag)?;
    raw.parse::<T>()
        .map_err(|_| RenderError::InvalidConfig(format!("{}: cannot parse '{}'", flag, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sized_viewport_is_rejected() {
        assert!(matches!(RenderSettings::new(0, 10, 1).validate(), Err(RenderError::InvalidConfig(_))));
        assert!(matches!(RenderSettings::new(10, 0, 1).validate(), Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_frames_is_rejected() {
        assert!(matches!(RenderSettings::new(4, 4, 0).validate(), Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_threads_is_rejected() {
        let settings = RenderSettings::new(4, 4, 1).with_threads(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_depth_is_clamped() {
        let settings = RenderSettings::new(4, 4, 1).with_max_depth(99).validate().expect("valid");
        assert_eq!(settings.max_depth, MAX_TRACE_DEPTH);
    }

    #[test]
    fn test_worker_count_is_bounded_by_rows() {
        let settings = RenderSettings::new(8, 3, 1).with_threads(16);
        assert_eq!(settings.worker_count(), 3);
        assert!(RenderSettings::new(8, 64, 1).worker_count() >= 1);
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cli_flags() {
        let options = CliOptions::new(PathBuf::from("model.obj"))
            .parse_flags(&args(&["--width", "32", "--height", "16", "--frames", "4",
                                 "--seed", "77", "--camera-pos", "0", "1.5", "-2",
                                 "--background", "sky", "--light", "1", "2", "3", "--bogus"]))
            .expect("parse");
        assert_eq!(options.settings.width, 32);
        assert_eq!(options.settings.height, 16);
        assert_eq!(options.settings.frames, 4);
        assert_eq!(options.settings.seed, 77);
        assert!(options.seed_given);
        assert_eq!(options.camera_position, Vector3f::new(0.0, 1.5, -2.0));
        assert_eq!(options.background, Background::SkyGradient);
        assert_eq!(options.lights.len(), 1);
        assert_eq!(options.lights[0].position, Vector3f::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_cli_missing_or_bad_value() {
        let base = CliOptions::new(PathBuf::from("model.obj"));
        assert!(base.clone().parse_flags(&args(&["--width"])).is_err());
        assert!(base.clone().parse_flags(&args(&["--frames", "many"])).is_err());
        assert!(base.parse_flags(&args(&["--background", "plaid"])).is_err());
    }
}
