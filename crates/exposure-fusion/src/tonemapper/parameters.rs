use alloc::collections::BTreeMap;

use super::Error;

/// Recognised parameter keys. Each operator reads a subset and ignores the rest.
pub mod keys {
    /// Display gamma, or the exponent for gamma compression.
    pub const GAMMA: &str = "gamma";
    /// Exposure adjustment.
    pub const INTENSITY: &str = "intensity";
    /// Light adaptation, `0` global to `1` local.
    pub const LIGHT: &str = "light";
    /// Target display maximum luminance.
    pub const LD_MAX: &str = "ldMax";
    /// Drago bias.
    pub const BIAS: &str = "bias";
    /// Colour saturation.
    pub const SATURATION: &str = "saturation";
    /// Contrast.
    pub const CONTRAST: &str = "contrast";
    /// Chromatic adaptation.
    pub const CHROMATIC: &str = "chromatic";

    /// Every recognised key.
    pub const ALL: [&str; 8] = [
        GAMMA, INTENSITY, LIGHT, LD_MAX, BIAS, SATURATION, CONTRAST, CHROMATIC,
    ];
}

/// Reads and checks the parameters of one operator.
pub(crate) struct Parameters<'a> {
    operator: &'static str,
    values: &'a BTreeMap<String, f32>,
}

impl<'a> Parameters<'a> {
    pub fn new(operator: &'static str, values: &'a BTreeMap<String, f32>) -> Self {
        Self { operator, values }
    }

    pub fn get(&self, key: &'static str) -> Option<f32> {
        self.values.get(key).copied()
    }

    /// A value that must be greater than zero.
    pub fn positive(&self, key: &'static str, default: f32) -> Result<f32, Error> {
        self.checked(key, default, |value| value > 0.0, "must be greater than 0")
    }

    /// A value in the closed interval `[min, max]`.
    pub fn within(
        &self,
        key: &'static str,
        default: f32,
        min: f32,
        max: f32,
        reason: &'static str,
    ) -> Result<f32, Error> {
        self.checked(key, default, |value| value >= min && value <= max, reason)
    }

    /// A value in the open interval `(min, max)`.
    pub fn between(
        &self,
        key: &'static str,
        default: f32,
        min: f32,
        max: f32,
        reason: &'static str,
    ) -> Result<f32, Error> {
        self.checked(key, default, |value| value > min && value < max, reason)
    }

    /// An optional value in the open interval `(min, max)`.
    pub fn optional_between(
        &self,
        key: &'static str,
        min: f32,
        max: f32,
        reason: &'static str,
    ) -> Result<Option<f32>, Error> {
        match self.get(key) {
            Some(value) => self.between(key, value, min, max, reason).map(Some),
            None => Ok(None),
        }
    }

    fn checked<F: Fn(f32) -> bool>(
        &self,
        key: &'static str,
        default: f32,
        is_valid: F,
        reason: &'static str,
    ) -> Result<f32, Error> {
        let value = self.get(key).unwrap_or(default);

        // NaN fails every comparison so it is rejected here too.
        if !is_valid(value) {
            return Err(Error::InvalidParameter {
                operator: self.operator,
                key,
                value,
                reason,
            });
        }

        Ok(value)
    }
}
