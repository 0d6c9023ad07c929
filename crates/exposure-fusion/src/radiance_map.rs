use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::Rgb;

/// Offset added before taking logarithms so black pixels stay finite.
const LOG_DELTA: f32 = 1e-6;

/// The fused linear light estimate of a scene, unbounded above.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RadianceMap {
    size: [u32; 2],
    pixels: Box<[Rgb]>,
}

impl RadianceMap {
    pub(crate) fn new(size: [u32; 2], pixels: Box<[Rgb]>) -> Self {
        Self { size, pixels }
    }

    /// The `[width, height]` of the map.
    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    /// The fused triples in row-major order.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// The fused triple at `(x, y)`.
    ///
    /// # Panics
    /// If `(x, y)` lies outside the map.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let [width, height] = self.size;
        assert!(x < width && y < height, "({x}, {y}) is out of bounds");
        self.pixels[y as usize * width as usize + x as usize]
    }

    /// The channel values as a flat `[r, g, b, r, g, b, ...]` slice.
    pub fn as_channels(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Summarises the brightness of the map for adaptive tone mappers.
    pub fn statistics(&self) -> RadianceStatistics {
        if self.pixels.is_empty() {
            return RadianceStatistics::default();
        }

        let accumulated = self
            .pixels
            .par_iter()
            .map(|&pixel| Accumulator::from_pixel(pixel))
            .reduce(Accumulator::empty, Accumulator::combine);

        let count = self.pixels.len() as f64;
        RadianceStatistics {
            minimum: accumulated.minimum,
            maximum: accumulated.maximum,
            average: (accumulated.sum / count) as f32,
            log_average: (accumulated.log_sum / count).exp() as f32,
            peak: accumulated.peak,
        }
    }
}

/// Brightness summary of a [`RadianceMap`], brightness being the mean of each triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadianceStatistics {
    /// Dimmest pixel brightness.
    pub minimum: f32,
    /// Brightest pixel brightness.
    pub maximum: f32,
    /// Arithmetic mean brightness.
    pub average: f32,
    /// Geometric mean brightness.
    pub log_average: f32,
    /// Largest single channel value in the map.
    pub peak: f32,
}

impl Default for RadianceStatistics {
    /// Statistics of a map evenly lit at mid exposure.
    fn default() -> Self {
        Self {
            minimum: 0.5,
            maximum: 0.5,
            average: 0.5,
            log_average: 0.5,
            peak: 0.5,
        }
    }
}

#[derive(Clone, Copy)]
struct Accumulator {
    minimum: f32,
    maximum: f32,
    peak: f32,
    sum: f64,
    log_sum: f64,
}

impl Accumulator {
    fn empty() -> Self {
        Self {
            minimum: f32::INFINITY,
            maximum: f32::NEG_INFINITY,
            peak: f32::NEG_INFINITY,
            sum: 0.0,
            log_sum: 0.0,
        }
    }

    fn from_pixel(pixel: Rgb) -> Self {
        let brightness = pixel.brightness().max(0.0);
        Self {
            minimum: brightness,
            maximum: brightness,
            peak: pixel.max_channel(),
            sum: f64::from(brightness),
            log_sum: f64::from(brightness + LOG_DELTA).ln(),
        }
    }

    fn combine(self, other: Self) -> Self {
        Self {
            minimum: self.minimum.min(other.minimum),
            maximum: self.maximum.max(other.maximum),
            peak: self.peak.max(other.peak),
            sum: self.sum + other.sum,
            log_sum: self.log_sum + other.log_sum,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn statistics_of_uniform_map() {
        let map = RadianceMap::new([2, 2], vec![Rgb::splat(0.25); 4].into_boxed_slice());
        let statistics = map.statistics();

        assert_eq!(statistics.minimum, 0.25);
        assert_eq!(statistics.maximum, 0.25);
        assert_relative_eq!(statistics.average, 0.25);
        assert_relative_eq!(statistics.log_average, 0.25, epsilon = 1e-5);
        assert_eq!(statistics.peak, 0.25);
    }

    #[test]
    fn statistics_track_peak_channel() {
        let map = RadianceMap::new(
            [2, 1],
            vec![Rgb::new(0.9, 0.0, 0.0), Rgb::splat(0.1)].into_boxed_slice(),
        );
        let statistics = map.statistics();

        assert_relative_eq!(statistics.maximum, 0.3, epsilon = 1e-6);
        assert_relative_eq!(statistics.minimum, 0.1, epsilon = 1e-6);
        assert_eq!(statistics.peak, 0.9);
    }

    #[test]
    fn empty_map_has_default_statistics() {
        let statistics = RadianceMap::default().statistics();
        assert_eq!(statistics, RadianceStatistics::default());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn pixel_outside_the_map() {
        let map = RadianceMap::new([2, 1], vec![Rgb::splat(0.5); 2].into_boxed_slice());
        map.pixel(2, 0);
    }
}
