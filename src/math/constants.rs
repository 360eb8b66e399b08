/* Copyright 2020 @Yuchen Wong */

pub type Float = f32;
pub type Int = i32;

pub type Vector2f = nalgebra::Vector2<Float>;
pub type Vector3f = nalgebra::Vector3<Float>;

pub const FLOAT_MIN: Float = std::f32::MIN;
pub const FLOAT_MAX: Float = std::f32::MAX;

// Möller-Trumbore determinant threshold. Anything below it is a back face,
// a ray parallel to the plane or a zero-area triangle.
pub const DET_EPSILON: Float = 1e-8;

// Hits closer than this are self-intersections.
pub const T_EPSILON: Float = 1e-4;

// Offset along the normal for rays spawned at a surface.
pub const RAY_OFFSET: Float = 1e-4;
