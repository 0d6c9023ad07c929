use core::fmt;

use thiserror::Error;

/// The arrangement of channels for each pixel in an exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// A single luminance channel.
    Gray,
    /// Luminance followed by alpha.
    GrayAlpha,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl ChannelLayout {
    /// The number of interleaved samples per pixel.
    pub const fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// The integer range each sample is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// Samples in `0..=255`.
    Eight,
    /// Samples in `0..=65535`.
    Sixteen,
}

impl BitDepth {
    /// The largest sample value representable at this depth.
    pub const fn max_sample(self) -> u16 {
        match self {
            Self::Eight => 255,
            Self::Sixteen => u16::MAX,
        }
    }

    /// The number of bits per sample.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }
}

/// The channel encoding of an exposure, compared across a set before merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelModel {
    /// Channel arrangement.
    pub layout: ChannelLayout,
    /// Sample range.
    pub depth: BitDepth,
}

impl ChannelModel {
    /// 8-bit RGB.
    pub const RGB8: Self = Self::new(ChannelLayout::Rgb, BitDepth::Eight);
    /// 8-bit RGBA.
    pub const RGBA8: Self = Self::new(ChannelLayout::Rgba, BitDepth::Eight);
    /// 16-bit RGB.
    pub const RGB16: Self = Self::new(ChannelLayout::Rgb, BitDepth::Sixteen);
    /// 8-bit grayscale.
    pub const GRAY8: Self = Self::new(ChannelLayout::Gray, BitDepth::Eight);

    /// Creates a channel model.
    pub const fn new(layout: ChannelLayout, depth: BitDepth) -> Self {
        Self { layout, depth }
    }
}

impl fmt::Display for ChannelModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = match self.layout {
            ChannelLayout::Gray => "grayscale",
            ChannelLayout::GrayAlpha => "grayscale with alpha",
            ChannelLayout::Rgb => "RGB",
            ChannelLayout::Rgba => "RGBA",
        };

        write!(f, "{}-bit {layout}", self.depth.bits())
    }
}

/// A single photograph of the scene, stored as interleaved integer samples.
///
/// Exposures are immutable once constructed. Alpha samples are kept so the
/// buffer matches its source, but nothing reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exposure {
    size: [u32; 2],
    model: ChannelModel,
    samples: Box<[u16]>,
}

impl Exposure {
    /// Creates an exposure from interleaved samples in row-major order.
    pub fn new<S: Into<Box<[u16]>>>(
        size: [u32; 2],
        model: ChannelModel,
        samples: S,
    ) -> Result<Self, Error> {
        let samples = samples.into();

        if size[0] == 0 || size[1] == 0 {
            return Err(Error::Empty(size));
        }

        let expected = size[0] as usize * size[1] as usize * model.layout.channels();
        if samples.len() != expected {
            return Err(Error::SampleCount {
                expected,
                found: samples.len(),
            });
        }

        let max_sample = model.depth.max_sample();
        if let Some(&sample) = samples.iter().find(|&&sample| sample > max_sample) {
            return Err(Error::SampleRange {
                sample,
                depth: model.depth.bits(),
            });
        }

        Ok(Self {
            size,
            model,
            samples,
        })
    }

    /// Creates an 8-bit exposure from raw bytes.
    pub fn from_bytes(size: [u32; 2], layout: ChannelLayout, bytes: &[u8]) -> Result<Self, Error> {
        let samples: Box<[u16]> = bytes.iter().map(|&byte| u16::from(byte)).collect();
        Self::new(size, ChannelModel::new(layout, BitDepth::Eight), samples)
    }

    /// Creates an exposure where every pixel has the same colour.
    pub fn solid(size: [u32; 2], model: ChannelModel, colour: [u16; 3]) -> Result<Self, Error> {
        let pixel: Vec<u16> = match model.layout {
            ChannelLayout::Gray => vec![colour[0]],
            ChannelLayout::GrayAlpha => vec![colour[0], model.depth.max_sample()],
            ChannelLayout::Rgb => colour.to_vec(),
            ChannelLayout::Rgba => vec![colour[0], colour[1], colour[2], model.depth.max_sample()],
        };

        let pixels = size[0] as usize * size[1] as usize;
        let samples: Box<[u16]> = pixel
            .iter()
            .copied()
            .cycle()
            .take(pixels * pixel.len())
            .collect();

        Self::new(size, model, samples)
    }

    /// The `[width, height]` of the exposure.
    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size[0]
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size[1]
    }

    /// The channel encoding.
    pub fn model(&self) -> ChannelModel {
        self.model
    }

    /// The raw interleaved samples.
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// The interleaved samples of row `y`.
    ///
    /// # Panics
    /// If `y` is not less than the height.
    pub fn row(&self, y: u32) -> &[u16] {
        let stride = self.size[0] as usize * self.model.layout.channels();
        let start = y as usize * stride;
        &self.samples[start..start + stride]
    }

    /// The colour triple of the pixel at `(x, y)`, ignoring alpha.
    ///
    /// Grayscale pixels are returned as `(y, y, y)`.
    ///
    /// # Panics
    /// If `(x, y)` lies outside the exposure.
    pub fn pixel(&self, x: u32, y: u32) -> [u16; 3] {
        let [width, height] = self.size;
        assert!(x < width && y < height, "({x}, {y}) is out of bounds");
        let channels = self.model.layout.channels();
        let index = (y as usize * width as usize + x as usize) * channels;
        triple(self.model.layout, &self.samples[index..index + channels])
    }
}

/// Reads the colour triple out of one pixel's samples.
pub(crate) fn triple(layout: ChannelLayout, pixel: &[u16]) -> [u16; 3] {
    match layout {
        ChannelLayout::Gray | ChannelLayout::GrayAlpha => [pixel[0]; 3],
        ChannelLayout::Rgb | ChannelLayout::Rgba => [pixel[0], pixel[1], pixel[2]],
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("An exposure must contain at least one pixel, got {}x{}", .0[0], .0[1])]
    Empty([u32; 2]),

    #[error("Expected {expected} samples for the exposure size, found {found}")]
    SampleCount { expected: usize, found: usize },

    #[error("Sample {sample} is out of range for a {depth}-bit exposure")]
    SampleRange { sample: u16, depth: u32 },
}
