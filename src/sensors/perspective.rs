// Copyright @yucwang 2026

use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

pub struct PerspectiveCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    aspect: Float,
    near_clip: Float,
    far_clip: Float,
}

impl PerspectiveCamera {
    pub fn look_at(origin: Vector3f,
                   target: Vector3f,
                   up: Vector3f,
                   fov_y_radians: Float,
                   aspect: Float,
                   near_clip: Float,
                   far_clip: Float) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward).normalize();

        Self::from_basis(origin, forward, right, up, fov_y_radians, aspect, near_clip, far_clip)
    }

    /// Spherical angles in degrees. theta turns around +y, phi tilts up;
    /// (0, 0) looks down -z with +x on the right.
    pub fn from_angles(origin: Vector3f,
                       theta_degrees: Float,
                       phi_degrees: Float,
                       fov_y_radians: Float,
                       aspect: Float,
                       near_clip: Float,
                       far_clip: Float) -> Self {
        let theta = theta_degrees.to_radians();
        let phi = phi_degrees.to_radians();
        let forward = Vector3f::new(theta.sin() * phi.cos(), phi.sin(), -theta.cos() * phi.cos());
        let right = Vector3f::new(theta.cos(), 0.0, theta.sin());
        let up = right.cross(&forward);

        Self::from_basis(origin, forward, right, up, fov_y_radians, aspect, near_clip, far_clip)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_basis(origin: Vector3f,
                      forward: Vector3f,
                      right: Vector3f,
                      up: Vector3f,
                      fov_y_radians: Float,
                      aspect: Float,
                      near_clip: Float,
                      far_clip: Float) -> Self {
        Self {
            origin,
            forward: forward.normalize(),
            right: right.normalize(),
            up: up.normalize(),
            tan_half_fov_y: (0.5 * fov_y_radians).tan(),
            aspect,
            near_clip: near_clip.max(0.0),
            far_clip,
        }
    }
}

impl Sensor for PerspectiveCamera {
    fn sample_ray(&self, u: &Vector2f) -> Ray3f {
        // Film point on the plane one unit down the view axis.
        let film_x = (u.x * 2.0 - 1.0) * self.tan_half_fov_y * self.aspect;
        let film_y = (1.0 - u.y * 2.0) * self.tan_half_fov_y;
        let toward = self.forward + self.right * film_x + self.up * film_y;

        // Clip planes are distances along the view axis, so scale them by
        // the length of the unnormalized direction.
        let stretch = toward.norm();
        let far_t = if self.far_clip.is_finite() { self.far_clip * stretch } else { std::f32::MAX };
        Ray3f::new(self.origin, toward, Some(self.near_clip * stretch), Some(far_t))
    }

    fn position(&self) -> Vector3f {
        self.origin
    }

    fn direction(&self) -> Vector3f {
        self.forward
    }

    fn right(&self) -> Vector3f {
        self.right
    }

    fn up(&self) -> Vector3f {
        self.up
    }

    fn describe(&self) -> String {
        format!("PerspectiveCamera origin={:?} forward={:?} fov_y={:.3} aspect={:.3} near={} far={}",
                self.origin.as_slice(), self.forward.as_slice(),
                2.0 * self.tan_half_fov_y.atan(), self.aspect, self.near_clip, self.far_clip)
    }
}
