//! A field of stars flying toward the camera.
//!
//! Each star lives in camera space and moves along -Z every update. A star
//! that reaches the camera plane or projects off screen is respawned at a
//! fresh random position. Projection is the plain pinhole divide
//! `screen = (p / (z * tan(fov / 2))) * half + half`; stars never go through
//! the clipper or the rasterizer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::colors;
use crate::render::RenderTarget;

/// Keeps a respawned star off the camera plane.
const MIN_DEPTH_FRACTION: f32 = 0.00001;

/// One point in camera space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

pub struct StarField {
    stars: Vec<Star>,
    spread: f32,
    speed: f32,
    tan_half_fov: f32,
    rng: StdRng,
}

impl StarField {
    /// `count` stars spread over `[-spread, spread]` in x and y and
    /// `(0, spread]` in z, approaching at `speed` units per second.
    ///
    /// The same `seed` always produces the same field. Field of view starts
    /// at 90 degrees.
    pub fn new(count: usize, spread: f32, speed: f32, seed: u64) -> Self {
        let mut field = Self {
            stars: Vec::with_capacity(count),
            spread,
            speed,
            tan_half_fov: (90.0_f32.to_radians() / 2.0).tan(),
            rng: StdRng::seed_from_u64(seed),
        };
        for _ in 0..count {
            let star = field.spawn();
            field.stars.push(star);
        }
        field
    }

    /// Sets the field of view in degrees.
    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.tan_half_fov = (fov_degrees.to_radians() / 2.0).tan();
        self
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    fn spawn(&mut self) -> Star {
        Star {
            x: 2.0 * (self.rng.random::<f32>() - 0.5) * self.spread,
            y: 2.0 * (self.rng.random::<f32>() - 0.5) * self.spread,
            z: (self.rng.random::<f32>() + MIN_DEPTH_FRACTION) * self.spread,
        }
    }

    /// Screen position of `star`, or `None` if it lands outside the target.
    fn project(&self, star: &Star, width: u32, height: u32) -> Option<(i32, i32)> {
        let half_width = width as f32 / 2.0;
        let half_height = height as f32 / 2.0;
        let depth = star.z * self.tan_half_fov;

        let x = ((star.x / depth) * half_width + half_width) as i32;
        let y = ((star.y / depth) * half_height + half_height) as i32;

        let on_screen = x >= 0 && x < width as i32 && y >= 0 && y < height as i32;
        on_screen.then_some((x, y))
    }

    /// Advances every star by `delta` seconds and returns where the
    /// survivors land on a `width` x `height` screen.
    ///
    /// Stars that pass the camera are respawned before projecting; stars
    /// that project off screen are respawned and left out of the result.
    pub fn update(&mut self, delta: f32, width: u32, height: u32) -> Vec<(i32, i32)> {
        let mut visible = Vec::with_capacity(self.stars.len());

        for i in 0..self.stars.len() {
            self.stars[i].z -= delta * self.speed;
            if self.stars[i].z <= 0.0 {
                self.stars[i] = self.spawn();
            }

            match self.project(&self.stars[i], width, height) {
                Some(point) => visible.push(point),
                None => self.stars[i] = self.spawn(),
            }
        }

        visible
    }

    /// Updates the field and plots each visible star as one white pixel.
    ///
    /// The target is not cleared first.
    pub fn render<T: RenderTarget + ?Sized>(&mut self, target: &mut T, delta: f32) -> usize {
        let points = self.update(delta, target.width(), target.height());
        for &(x, y) in &points {
            target.set_pixel(x, y, colors::STAR);
        }
        points.len()
    }
}
