use super::{Error, ToneMapOperator, keys, parameters::Parameters};
use crate::RadianceStatistics;

/// `ln(1 + iv) / ln(1 + i * peak)`, where `peak` is the largest channel in the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Logarithmic {
    intensity: f32,
    denominator: f32,
}

impl Logarithmic {
    /// Registry name.
    pub const NAME: &'static str = "logarithmic";

    pub(crate) fn from_parameters(parameters: &Parameters<'_>) -> Result<Self, Error> {
        let intensity = parameters.positive(keys::INTENSITY, 1.0)?;
        Ok(Self::with_peak(intensity, 1.0))
    }

    fn with_peak(intensity: f32, peak: f32) -> Self {
        // An all black map still needs a finite curve.
        let peak = if peak > 0.0 && peak.is_finite() {
            peak
        } else {
            1.0
        };

        Self {
            intensity,
            denominator: (intensity * peak).ln_1p(),
        }
    }
}

impl Default for Logarithmic {
    fn default() -> Self {
        Self::with_peak(1.0, 1.0)
    }
}

impl ToneMapOperator for Logarithmic {
    fn tone_map(&self, radiance: f32) -> f32 {
        let radiance = radiance.max(0.0);
        ((radiance * self.intensity).ln_1p() / self.denominator).clamp(0.0, 1.0)
    }

    fn adapt(&mut self, statistics: &RadianceStatistics) {
        *self = Self::with_peak(self.intensity, statistics.peak);
    }
}
