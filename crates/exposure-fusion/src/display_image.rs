use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

use crate::Rgb;

/// A display ready image using the RGBA_u8 pixel format.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct DisplayImage {
    /// Interleaved RGBA bytes in row-major order.
    pub data: Box<[u8]>,
    /// `[width, height]` in pixels.
    pub size: [u32; 2],
}

impl DisplayImage {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size[0]
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size[1]
    }

    /// The RGBA bytes of the pixel at `(x, y)`.
    ///
    /// # Panics
    /// If `(x, y)` lies outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let [width, height] = self.size;
        assert!(x < width && y < height, "({x}, {y}) is out of bounds");
        let pixels: &[[u8; 4]] = bytemuck::cast_slice(&self.data);
        pixels[y as usize * width as usize + x as usize]
    }

    /// Every pixel as RGBA bytes.
    pub fn pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.data)
    }
}

/// Scales a display value in `[0,1]` to a byte, rounding to nearest.
#[inline]
pub fn quantize(value: f32) -> u8 {
    // Saturating cast, NaN becomes 0.
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Packs tone mapped triples into an opaque 8-bit image.
///
/// Pixels beyond the end of `tone_mapped` are left transparent black.
pub fn assemble(width: u32, height: u32, tone_mapped: &[Rgb]) -> DisplayImage {
    let mut data = vec![0u8; width as usize * height as usize * 4].into_boxed_slice();

    if width > 0 && height > 0 {
        data.par_chunks_mut(width as usize * 4)
            .zip(tone_mapped.par_chunks(width as usize))
            .for_each(|(row, values)| {
                let pixels: &mut [[u8; 4]] = bytemuck::cast_slice_mut(row);
                for (pixel, value) in pixels.iter_mut().zip(values) {
                    *pixel = [
                        quantize(value.r),
                        quantize(value.g),
                        quantize(value.b),
                        u8::MAX,
                    ];
                }
            });
    }

    DisplayImage {
        data,
        size: [width, height],
    }
}
