// Copyright @yucwang 2021

pub mod acceleration;
pub mod bvh;
pub mod error;
pub mod geometry;
pub mod payload;
pub mod rng;
pub mod sensor;
pub mod settings;
pub mod shader;
pub mod tracer;
