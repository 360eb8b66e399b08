// Copyright @yucwang 2026

pub mod background;
pub mod basic;
pub mod direct_light;
