use super::{Error, ToneMapOperator, parameters::Parameters};

/// Simple Reinhard tone mapping, `v / (1 + v)`.
///
/// Monotonic, maps `0` to `0`, `1` to `0.5` and approaches `1` as `v` grows.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Reinhard;

impl Reinhard {
    /// Registry name.
    pub const NAME: &'static str = "reinhard";

    pub(crate) fn from_parameters(_parameters: &Parameters<'_>) -> Result<Self, Error> {
        Ok(Self)
    }
}

impl ToneMapOperator for Reinhard {
    fn tone_map(&self, radiance: f32) -> f32 {
        // Light intensity cannot be negative.
        let radiance = radiance.max(0.0);

        if radiance == f32::INFINITY {
            return 1.0;
        }

        radiance / (1.0 + radiance)
    }
}
