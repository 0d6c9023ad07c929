use core::{fmt, str::FromStr};

use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{RadianceGrid, RadianceMap, Rgb};

/// The reliability of a normalized channel value.
///
/// A bump peaking at `1` for mid exposure and vanishing at the clipped
/// extremes: `1 - (2v - 1)^2` inside `(0,1)`, `0` at or beyond either end.
#[inline]
pub fn weight(value: f32) -> f32 {
    let in_range = value > 0.0 && value < 1.0;
    if !in_range {
        return 0.0;
    }

    let centered = 2.0 * value - 1.0;
    1.0 - centered * centered
}

/// How weights are computed for the three channels of a pixel.
///
/// A merge uses one policy for every pixel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightingPolicy {
    /// One weight per exposure from the mean of its triple, shared by all
    /// channels. Avoids colour shifts between channels.
    #[default]
    Brightness,

    /// Each channel is weighted by its own value.
    PerChannel,
}

impl WeightingPolicy {
    /// The name used in settings and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::PerChannel => "per-channel",
        }
    }
}

impl fmt::Display for WeightingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightingPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "brightness" => Ok(Self::Brightness),
            "per-channel" | "channel" => Ok(Self::PerChannel),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// An unrecognised weighting policy name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown weighting policy '{0}', expected 'brightness' or 'per-channel'")]
pub struct ParsePolicyError(pub String);

/// Fuses aligned radiance grids into a single radiance estimate.
///
/// Each output channel is `sum(v_i * w_i) / sum(w_i)` over the grids. Where
/// every weight is zero the output is `0`. The output takes the size of the
/// first grid; a grid with fewer pixels contributes nothing where it has none.
pub fn merge(grids: &[RadianceGrid], policy: WeightingPolicy) -> RadianceMap {
    let Some(first) = grids.first() else {
        return RadianceMap::default();
    };

    let [width, height] = first.size();
    if width == 0 || height == 0 {
        return RadianceMap::new([width, height], Box::default());
    }

    let mut pixels = vec![Rgb::BLACK; width as usize * height as usize].into_boxed_slice();

    pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let start = y * width as usize;
            for (x, pixel) in row.iter_mut().enumerate() {
                let index = start + x;
                let samples = grids
                    .iter()
                    .map(|grid| grid.pixels().get(index).copied().unwrap_or(Rgb::BLACK));

                *pixel = match policy {
                    WeightingPolicy::Brightness => merge_brightness(samples),
                    WeightingPolicy::PerChannel => merge_per_channel(samples),
                };
            }
        });

    RadianceMap::new([width, height], pixels)
}

fn merge_brightness<I: Iterator<Item = Rgb>>(samples: I) -> Rgb {
    let mut total = Rgb::BLACK;
    let mut total_weight = 0.0;
    for sample in samples {
        let weight = weight(sample.brightness());
        total += sample * weight;
        total_weight += weight;
    }

    if total_weight == 0.0 {
        return Rgb::BLACK;
    }

    total / total_weight
}

fn merge_per_channel<I: Iterator<Item = Rgb>>(samples: I) -> Rgb {
    let mut total = Rgb::BLACK;
    let mut total_weight = Rgb::BLACK;
    for sample in samples {
        let weights = sample.map(weight);
        total += sample * weights;
        total_weight += weights;
    }

    Rgb::new(
        fuse(total.r, total_weight.r),
        fuse(total.g, total_weight.g),
        fuse(total.b, total_weight.b),
    )
}

#[inline]
fn fuse(total: f32, total_weight: f32) -> f32 {
    if total_weight == 0.0 {
        0.0
    } else {
        total / total_weight
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn weight_vanishes_at_extremes() {
        assert_eq!(weight(0.0), 0.0);
        assert_eq!(weight(1.0), 0.0);
        assert_eq!(weight(-0.5), 0.0);
        assert_eq!(weight(1.5), 0.0);
        assert_eq!(weight(f32::NAN), 0.0);
    }

    #[test]
    fn weight_peaks_at_mid_exposure() {
        assert_eq!(weight(0.5), 1.0);
    }

    #[test]
    fn weight_is_symmetric_and_non_negative() {
        for step in 0..=100 {
            let value = step as f32 / 100.0;
            let weight_value = weight(value);

            assert!(weight_value >= 0.0);
            assert!(weight_value <= 1.0);
            assert_relative_eq!(weight_value, weight(1.0 - value), epsilon = 1e-6);
        }
    }

    #[test]
    fn policy_parses_names() {
        assert_eq!("brightness".parse(), Ok(WeightingPolicy::Brightness));
        assert_eq!("Per-Channel".parse(), Ok(WeightingPolicy::PerChannel));
        assert!("average".parse::<WeightingPolicy>().is_err());
    }

    #[test]
    fn per_channel_fuses_each_channel_alone() {
        let samples = [Rgb::new(0.25, 1.0, 0.5), Rgb::new(0.75, 1.0, 0.0)];
        let merged = merge_per_channel(samples.into_iter());

        // Equal weights for red, green clipped in both, blue only from the first.
        assert_relative_eq!(merged.r, 0.5);
        assert_eq!(merged.g, 0.0);
        assert_relative_eq!(merged.b, 0.5);
    }
}
