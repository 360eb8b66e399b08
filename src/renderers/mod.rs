// Copyright @yucwang 2021

pub mod raytracer;
pub mod renderer;
