use super::{Error, ToneMapOperator, keys, parameters::Parameters};
use crate::RadianceStatistics;

/// Smallest luminance fed into the logarithms.
const EPSILON: f32 = 1e-6;

/// Reinhard and Devlin's photoreceptor tone mapping.
///
/// `v / (v + (e^-f * I_a)^m)` where the adaptation level `I_a` blends the
/// pixel's own value with the map's average brightness by `light`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reinhard05 {
    /// `e^-intensity`.
    brightness: f32,
    /// User supplied contrast, derived from the map when absent.
    contrast: Option<f32>,
    light: f32,

    adaptation: f32,
    effective_contrast: f32,
}

impl Reinhard05 {
    /// Registry name.
    pub const NAME: &'static str = "reinhard05";

    /// Contrast used before the operator is adapted to a map.
    pub const DEFAULT_CONTRAST: f32 = 0.3;

    pub(crate) fn from_parameters(parameters: &Parameters<'_>) -> Result<Self, Error> {
        let intensity =
            parameters.within(keys::INTENSITY, 0.0, -8.0, 8.0, "must be between -8 and 8")?;
        let contrast =
            parameters.optional_between(keys::CONTRAST, 0.0, 1.0, "must be between 0 and 1")?;
        let light = parameters.within(keys::LIGHT, 0.0, 0.0, 1.0, "must be between 0 and 1")?;

        // Channels are mapped one at a time, so there is no separate pixel
        // luminance for chromatic adaptation to blend with. Only validated.
        parameters.within(keys::CHROMATIC, 0.0, 0.0, 1.0, "must be between 0 and 1")?;

        let defaults = RadianceStatistics::default();
        Ok(Self {
            brightness: (-intensity).exp(),
            contrast,
            light,
            adaptation: defaults.average,
            effective_contrast: contrast.unwrap_or(Self::DEFAULT_CONTRAST),
        })
    }

    /// The contrast in use, either supplied or derived from the last adapted map.
    pub fn contrast(&self) -> f32 {
        self.effective_contrast
    }

    /// Contrast from the spread of the map's log brightness, `0.3 + 0.7 k^1.4`.
    fn derive_contrast(statistics: &RadianceStatistics) -> f32 {
        let log_max = statistics.maximum.max(EPSILON).ln();
        let log_min = statistics.minimum.max(EPSILON).ln();
        let log_average = statistics.log_average.max(EPSILON).ln();

        let range = log_max - log_min;
        let key = if range > 0.0 {
            ((log_max - log_average) / range).clamp(0.0, 1.0)
        } else {
            0.0
        };

        0.3 + 0.7 * key.powf(1.4)
    }
}

impl Default for Reinhard05 {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: None,
            light: 0.0,
            adaptation: RadianceStatistics::default().average,
            effective_contrast: Self::DEFAULT_CONTRAST,
        }
    }
}

impl ToneMapOperator for Reinhard05 {
    fn tone_map(&self, radiance: f32) -> f32 {
        let radiance = radiance.max(0.0);
        if radiance == 0.0 {
            return 0.0;
        }

        if radiance == f32::INFINITY {
            return 1.0;
        }

        let adaptation = self.light * radiance + (1.0 - self.light) * self.adaptation;
        let sigma = (self.brightness * adaptation).powf(self.effective_contrast);

        (radiance / (radiance + sigma)).clamp(0.0, 1.0)
    }

    fn adapt(&mut self, statistics: &RadianceStatistics) {
        self.adaptation = statistics.average;
        self.effective_contrast = self
            .contrast
            .unwrap_or_else(|| Self::derive_contrast(statistics));
    }
}
