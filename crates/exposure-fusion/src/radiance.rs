use core::ops::{Add, AddAssign, Div, Mul};

use bytemuck::{Pod, Zeroable};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::{BitDepth, Exposure, exposure::triple};

/// A linear light triple.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Rgb {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
}

impl Rgb {
    /// No light.
    pub const BLACK: Self = Self::splat(0.0);

    /// Creates a triple.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a triple with every channel set to `value`.
    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }

    /// The mean of the three channels, used as the brightness proxy for weighting.
    pub fn brightness(self) -> f32 {
        (self.r + self.g + self.b) / 3.0
    }

    /// The largest channel.
    pub fn max_channel(self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    /// Applies `f` to each channel.
    pub fn map<F: Fn(f32) -> f32>(self, f: F) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// The channels as an array.
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(value: [f32; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl Add for Rgb {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Rgb {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul for Rgb {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b)
    }
}

impl Mul<f32> for Rgb {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        self.map(|channel| channel * rhs)
    }
}

impl Div<f32> for Rgb {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        self.map(|channel| channel / rhs)
    }
}

/// Rescales a sample triple into `[0,1]` as the exact ratio `sample / max_sample`.
///
/// Gamma encoded sources are not linearized.
pub fn to_radiance(sample: [u16; 3], depth: BitDepth) -> Rgb {
    let max = f32::from(depth.max_sample());
    Rgb::new(
        f32::from(sample[0]) / max,
        f32::from(sample[1]) / max,
        f32::from(sample[2]) / max,
    )
}

/// An exposure converted to normalized radiance, one triple per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct RadianceGrid {
    size: [u32; 2],
    pixels: Box<[Rgb]>,
}

impl RadianceGrid {
    /// Converts every pixel of the exposure with [`to_radiance`].
    pub fn from_exposure(exposure: &Exposure) -> Self {
        let [width, height] = exposure.size();
        let model = exposure.model();
        let channels = model.layout.channels();

        let mut pixels = vec![Rgb::BLACK; width as usize * height as usize].into_boxed_slice();
        pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                let samples = exposure.row(y as u32);
                for (pixel, sample) in row.iter_mut().zip(samples.chunks_exact(channels)) {
                    *pixel = to_radiance(triple(model.layout, sample), model.depth);
                }
            });

        Self {
            size: exposure.size(),
            pixels,
        }
    }

    /// Creates a grid from existing triples in row-major order.
    ///
    /// Returns `None` if the number of pixels does not match the size.
    pub fn from_pixels(size: [u32; 2], pixels: Vec<Rgb>) -> Option<Self> {
        if pixels.len() != size[0] as usize * size[1] as usize {
            return None;
        }

        Some(Self {
            size,
            pixels: pixels.into_boxed_slice(),
        })
    }

    /// The `[width, height]` of the grid.
    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    /// The triples in row-major order.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// The triple at `(x, y)`.
    ///
    /// # Panics
    /// If `(x, y)` lies outside the grid.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let [width, height] = self.size;
        assert!(x < width && y < height, "({x}, {y}) is out of bounds");
        self.pixels[y as usize * width as usize + x as usize]
    }

    /// The channel values as a flat `[r, g, b, r, g, b, ...]` slice.
    pub fn as_channels(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }
}
