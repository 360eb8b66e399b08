// Copyright 2020 @TwoCookingMice

pub mod exr_utils;
pub mod image_utils;
pub mod obj_utils;
