use super::{Error, ToneMapOperator, keys, parameters::Parameters};

/// Scales radiance by `intensity` and clips to `[0,1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linear {
    intensity: f32,
}

impl Linear {
    /// Registry name.
    pub const NAME: &'static str = "linear";

    pub(crate) fn from_parameters(parameters: &Parameters<'_>) -> Result<Self, Error> {
        let intensity = parameters.positive(keys::INTENSITY, 1.0)?;
        Ok(Self { intensity })
    }
}

impl Default for Linear {
    fn default() -> Self {
        Self { intensity: 1.0 }
    }
}

impl ToneMapOperator for Linear {
    fn tone_map(&self, radiance: f32) -> f32 {
        (radiance.max(0.0) * self.intensity).min(1.0)
    }
}
