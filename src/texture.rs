use std::path::Path;

use log::info;

use crate::colors::{self, lerp_color};
use crate::error::LoadError;

/// Anything the rasterizer can read a color from.
///
/// Coordinates are normalized; wrapping and filtering are up to the
/// implementation.
pub trait Sampler {
    /// Returns the ARGB color at `(u, v)`.
    fn sample(&self, u: f32, v: f32) -> u32;
}

/// A sampler that returns the same color everywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolidColor(pub u32);

impl Sampler for SolidColor {
    #[inline]
    fn sample(&self, _u: f32, _v: f32) -> u32 {
        self.0
    }
}

/// Texel filtering used by [`Texture::sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    Nearest,
    Bilinear,
}

/// Represents a 2D texture for texture mapping.
pub struct Texture {
    data: Vec<u32>, // ARGB, row-major, top row first
    width: u32,
    height: u32,
    filter: Filter,
}

impl Texture {
    /// Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();

        let data: Vec<u32> = img.pixels().map(|p| colors::from_rgba_bytes(p.0)).collect();

        info!("Loaded texture {:?} ({}x{})", path, width, height);
        Self::from_pixels(width, height, data)
    }

    /// Wrap raw ARGB pixels, row-major with the top row first.
    ///
    /// Fails if a dimension is zero or `data` does not hold exactly
    /// `width * height` pixels.
    pub fn from_pixels(width: u32, height: u32, data: Vec<u32>) -> Result<Self, LoadError> {
        if width == 0 || height == 0 {
            return Err(LoadError::EmptyTexture);
        }
        if data.len() != width as usize * height as usize {
            return Err(LoadError::TextureSize {
                width,
                height,
                pixels: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            filter: Filter::default(),
        })
    }

    /// A `size`x`size` checkerboard with `cells` squares per side.
    /// `size` is raised to at least one texel.
    pub fn checkerboard(size: u32, cells: u32, light: u32, dark: u32) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let data = (0..size)
            .flat_map(|y| (0..size).map(move |x| ((x / cell) + (y / cell)) % 2 == 0))
            .map(|even| if even { light } else { dark })
            .collect();
        Self {
            data,
            width: size,
            height: size,
            filter: Filter::default(),
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn texel(&self, x: u32, y: u32) -> u32 {
        self.data[(y * self.width + x) as usize]
    }

    /// Nearest-neighbor lookup.
    ///
    /// UVs wrap (repeat) and V is flipped: OBJ texture coordinates have a
    /// bottom-left origin while rows are stored top first.
    #[inline]
    fn sample_nearest(&self, u: f32, v: f32) -> u32 {
        let u = u.rem_euclid(1.0);
        let v = (1.0 - v).rem_euclid(1.0);

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        self.texel(x, y)
    }

    /// Bilinear lookup between the four nearest texel centers, wrapping at
    /// the edges.
    fn sample_bilinear(&self, u: f32, v: f32) -> u32 {
        let fx = u.rem_euclid(1.0) * self.width as f32 - 0.5;
        let fy = (1.0 - v).rem_euclid(1.0) * self.height as f32 - 0.5;

        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;

        let wrap = |c: f32, size: u32| (c as i64).rem_euclid(size as i64) as u32;
        let (x0, x1) = (wrap(x0, self.width), wrap(x0 + 1.0, self.width));
        let (y0, y1) = (wrap(y0, self.height), wrap(y0 + 1.0, self.height));

        let top = lerp_color(self.texel(x0, y0), self.texel(x1, y0), tx);
        let bottom = lerp_color(self.texel(x0, y1), self.texel(x1, y1), tx);
        lerp_color(top, bottom, ty)
    }
}

impl Sampler for Texture {
    #[inline]
    fn sample(&self, u: f32, v: f32) -> u32 {
        match self.filter {
            Filter::Nearest => self.sample_nearest(u, v),
            Filter::Bilinear => self.sample_bilinear(u, v),
        }
    }
}
