use super::{Error, ToneMapOperator, keys, parameters::Parameters};

/// Smallest radiance fed into the logarithms.
const EPSILON: f32 = 1e-6;

/// Overall brightness scale of the curve.
const BRIGHTNESS_SCALE: f32 = 0.01;

/// Drago adaptive logarithmic tone mapping.
///
/// `ln(1 + 0.01v) / ln(2 + 8 (v / ld_max)^(ln(bias) / ln(0.5)))`, clamped to `[0,1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drago {
    ld_max: f32,
    bias: f32,
    bias_exponent: f32,
}

impl Drago {
    /// Registry name.
    pub const NAME: &'static str = "drago";

    /// Default target display maximum luminance.
    pub const DEFAULT_LD_MAX: f32 = 100.0;

    /// Default bias.
    pub const DEFAULT_BIAS: f32 = 0.85;

    /// Expects `ld_max > 0` and `0 < bias < 1`, checked by `from_parameters`.
    fn new(ld_max: f32, bias: f32) -> Self {
        Self {
            ld_max,
            bias,
            bias_exponent: bias.ln() / 0.5f32.ln(),
        }
    }

    pub(crate) fn from_parameters(parameters: &Parameters<'_>) -> Result<Self, Error> {
        let ld_max = parameters.positive(keys::LD_MAX, Self::DEFAULT_LD_MAX)?;
        let bias = parameters.between(
            keys::BIAS,
            Self::DEFAULT_BIAS,
            0.0,
            1.0,
            "must be between 0 and 1",
        )?;

        Ok(Self::new(ld_max, bias))
    }

    /// The target display maximum luminance.
    pub fn ld_max(&self) -> f32 {
        self.ld_max
    }

    /// The bias.
    pub fn bias(&self) -> f32 {
        self.bias
    }
}

impl Default for Drago {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LD_MAX, Self::DEFAULT_BIAS)
    }
}

impl ToneMapOperator for Drago {
    fn tone_map(&self, radiance: f32) -> f32 {
        if radiance.is_nan() || radiance <= 0.0 {
            return 0.0;
        }

        if radiance == f32::INFINITY {
            return 1.0;
        }

        let radiance = radiance.max(EPSILON);
        let numerator = (radiance * BRIGHTNESS_SCALE).ln_1p();
        let denominator = (2.0 + 8.0 * (radiance / self.ld_max).powf(self.bias_exponent)).ln();

        (numerator / denominator).clamp(0.0, 1.0)
    }
}
