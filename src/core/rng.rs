// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};

pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.state >> 32) as u32
    }

    /// Uniform in [0, 1).
    pub fn next_f32(&mut self) -> Float {
        // 24 high bits fit the f32 mantissa exactly, so 1.0 is never returned.
        ((self.next_u32() >> 8) as Float) * (1.0 / (1u32 << 24) as Float)
    }

    pub fn next_vector3(&mut self) -> Vector3f {
        let x = self.next_f32();
        let y = self.next_f32();
        let z = self.next_f32();
        Vector3f::new(x, y, z)
    }
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Seed for one worker stream within one accumulation frame.
pub fn mix_seed(seed: u64, worker: usize, frame: u32) -> u64 {
    let s = splitmix64(seed);
    let s = splitmix64(s ^ (worker as u64));
    splitmix64(s ^ ((frame as u64) << 32))
}
