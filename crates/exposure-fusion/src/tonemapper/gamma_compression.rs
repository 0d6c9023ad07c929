use super::{Error, ToneMapOperator, keys, parameters::Parameters};
use crate::RadianceStatistics;

/// Gamma compression, `alpha * v^gamma`.
///
/// Maps the domain <code>\[0,alpha^(-1/gamma)]</code> to <code>\[0,1]</code>.<br>
/// 0 < gamma <= 1; gamma regulates contrast.<br>
/// alpha regulates brightness and is fitted so the brightest channel of the
/// map lands on `1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaCompression {
    alpha: f32,
    gamma: f32,
}

impl GammaCompression {
    /// Registry name.
    pub const NAME: &'static str = "gamma-compression";

    /// Default exponent.
    pub const DEFAULT_GAMMA: f32 = 0.5;

    pub(crate) fn from_parameters(parameters: &Parameters<'_>) -> Result<Self, Error> {
        let gamma = parameters.within(
            keys::GAMMA,
            Self::DEFAULT_GAMMA,
            f32::MIN_POSITIVE,
            1.0,
            "must be greater than 0 and at most 1",
        )?;

        Ok(Self { alpha: 1.0, gamma })
    }

    /// The brightness factor.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// `whitepoint^-gamma`, so that the whitepoint maps to `1`.
    fn calculate_alpha(&self, whitepoint: f32) -> f32 {
        if whitepoint > 0.0 && whitepoint.is_finite() {
            whitepoint.powf(-self.gamma)
        } else {
            1.0
        }
    }
}

impl Default for GammaCompression {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            gamma: Self::DEFAULT_GAMMA,
        }
    }
}

impl ToneMapOperator for GammaCompression {
    fn tone_map(&self, radiance: f32) -> f32 {
        (self.alpha * radiance.max(0.0).powf(self.gamma)).clamp(0.0, 1.0)
    }

    fn adapt(&mut self, statistics: &RadianceStatistics) {
        self.alpha = self.calculate_alpha(statistics.peak);
    }
}
