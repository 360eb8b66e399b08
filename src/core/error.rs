// Copyright @yucwang 2026

use crate::io::obj_utils::ObjLoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("shape {shape}: index {index} out of range for {vertex_count} vertices")]
    InvalidGeometry { shape: usize, index: usize, vertex_count: usize },

    #[error("allocation failed: {0}")]
    Allocation(String),

    #[error("obj load error: {0}")]
    Obj(#[from] ObjLoadError),

    #[error("image write error: {0}")]
    Image(#[from] image::ImageError),

    #[error("exr write error: {0}")]
    Exr(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
