//! Tone mapping operators that compress fused radiance into the `[0,1]` display range.
//!

use alloc::collections::BTreeMap;

use parameters::Parameters;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use drago::Drago;
pub use gamma_compression::GammaCompression;
pub use linear::Linear;
pub use logarithmic::Logarithmic;
pub use parameters::keys;
pub use reinhard::Reinhard;
pub use reinhard05::Reinhard05;

use crate::{RadianceStatistics, Rgb};

mod drago;
mod gamma_compression;
mod linear;
mod logarithmic;
mod parameters;
mod reinhard;
mod reinhard05;

/// An operator mapping one radiance channel value to a display value in `[0,1]`.
pub trait ToneMapOperator {
    /// Maps a single channel value. Negative input is treated as no light.
    fn tone_map(&self, radiance: f32) -> f32;

    /// Fits the operator to the radiance map it is about to process.
    ///
    /// Called once per map before any pixel is tone mapped.
    fn adapt(&mut self, _statistics: &RadianceStatistics) {}

    /// Maps each channel of a triple.
    fn tone_map_rgb(&self, radiance: Rgb) -> Rgb {
        radiance.map(|channel| self.tone_map(channel))
    }
}

/// The operator algorithms.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// `v / (1 + v)`.
    Reinhard(Reinhard),
    /// Adaptive logarithmic mapping.
    Drago(Drago),
    /// Clamped scaling.
    Linear(Linear),
    /// Logarithm normalised to the map maximum.
    Logarithmic(Logarithmic),
    /// Reinhard-Devlin photoreceptor model.
    Reinhard05(Reinhard05),
    /// `alpha * v^gamma` normalised to the map maximum.
    GammaCompression(GammaCompression),
}

impl Operator {
    /// The canonical registry name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reinhard(_) => Reinhard::NAME,
            Self::Drago(_) => Drago::NAME,
            Self::Linear(_) => Linear::NAME,
            Self::Logarithmic(_) => Logarithmic::NAME,
            Self::Reinhard05(_) => Reinhard05::NAME,
            Self::GammaCompression(_) => GammaCompression::NAME,
        }
    }

    fn as_operator(&self) -> &dyn ToneMapOperator {
        match self {
            Self::Reinhard(operator) => operator,
            Self::Drago(operator) => operator,
            Self::Linear(operator) => operator,
            Self::Logarithmic(operator) => operator,
            Self::Reinhard05(operator) => operator,
            Self::GammaCompression(operator) => operator,
        }
    }

    fn as_operator_mut(&mut self) -> &mut dyn ToneMapOperator {
        match self {
            Self::Reinhard(operator) => operator,
            Self::Drago(operator) => operator,
            Self::Linear(operator) => operator,
            Self::Logarithmic(operator) => operator,
            Self::Reinhard05(operator) => operator,
            Self::GammaCompression(operator) => operator,
        }
    }
}

type Constructor = fn(&Parameters<'_>) -> Result<Operator, Error>;

/// Operator names and aliases, matched case-insensitively.
const REGISTRY: &[(&str, Constructor)] = &[
    (Reinhard::NAME, build_reinhard),
    (Drago::NAME, build_drago),
    ("drago03", build_drago),
    (Linear::NAME, build_linear),
    (Logarithmic::NAME, build_logarithmic),
    ("log", build_logarithmic),
    (Reinhard05::NAME, build_reinhard05),
    (GammaCompression::NAME, build_gamma_compression),
];

fn build_reinhard(parameters: &Parameters<'_>) -> Result<Operator, Error> {
    Reinhard::from_parameters(parameters).map(Operator::Reinhard)
}

fn build_drago(parameters: &Parameters<'_>) -> Result<Operator, Error> {
    Drago::from_parameters(parameters).map(Operator::Drago)
}

fn build_linear(parameters: &Parameters<'_>) -> Result<Operator, Error> {
    Linear::from_parameters(parameters).map(Operator::Linear)
}

fn build_logarithmic(parameters: &Parameters<'_>) -> Result<Operator, Error> {
    Logarithmic::from_parameters(parameters).map(Operator::Logarithmic)
}

fn build_reinhard05(parameters: &Parameters<'_>) -> Result<Operator, Error> {
    Reinhard05::from_parameters(parameters).map(Operator::Reinhard05)
}

fn build_gamma_compression(parameters: &Parameters<'_>) -> Result<Operator, Error> {
    GammaCompression::from_parameters(parameters).map(Operator::GammaCompression)
}

/// Every name accepted by [`ToneMapper::new`], aliases included.
pub fn operator_names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(name, _)| *name)
}

/// Selects a tone mapping operator by name and parameterises it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneMapperConfig {
    /// Registry name of the operator.
    pub operator: String,

    /// Operator parameters, keyed by the names in [`keys`].
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
}

impl ToneMapperConfig {
    /// A config for the named operator with no parameters.
    pub fn new<S: Into<String>>(operator: S) -> Self {
        Self {
            operator: operator.into(),
            params: BTreeMap::new(),
        }
    }

    /// Sets a parameter.
    #[must_use]
    pub fn with_param<S: Into<String>>(mut self, key: S, value: f32) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

impl Default for ToneMapperConfig {
    fn default() -> Self {
        Self::new(Reinhard::NAME)
    }
}

/// A validated operator plus the display gamma applied to its output.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneMapper {
    operator: Operator,
    inverse_gamma: Option<f32>,
}

impl ToneMapper {
    /// Looks up the operator and validates its parameters.
    ///
    /// Fails before any pixel is processed if the name is unknown or a
    /// parameter is out of its domain. Unknown parameter keys are ignored.
    pub fn new(config: &ToneMapperConfig) -> Result<Self, Error> {
        Self::from_name(&config.operator, &config.params)
    }

    /// Looks up the operator by name, see [`ToneMapper::new`].
    pub fn from_name(name: &str, params: &BTreeMap<String, f32>) -> Result<Self, Error> {
        let normalized = name.trim().to_ascii_lowercase();
        let Some((registered, constructor)) = REGISTRY
            .iter()
            .find(|(registered, _)| *registered == normalized)
        else {
            return Err(Error::UnsupportedOperator(name.to_string()));
        };

        let parameters = Parameters::new(*registered, params);
        let operator = constructor(&parameters)?;

        // Gamma compression consumes `gamma` as its own exponent.
        let inverse_gamma = match operator {
            Operator::GammaCompression(_) => None,
            _ => {
                let gamma = parameters.positive(keys::GAMMA, 1.0)?;
                (gamma != 1.0).then(|| gamma.recip())
            }
        };

        Ok(Self {
            operator,
            inverse_gamma,
        })
    }

    /// The operator algorithm.
    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// The canonical name of the operator.
    pub fn name(&self) -> &'static str {
        self.operator.name()
    }

    /// A copy of this tone mapper fitted to a radiance map.
    #[must_use]
    pub fn adapted(&self, statistics: &RadianceStatistics) -> Self {
        let mut adapted = self.clone();
        adapted.adapt(statistics);
        adapted
    }
}

impl Default for ToneMapper {
    fn default() -> Self {
        Self {
            operator: Operator::Reinhard(Reinhard),
            inverse_gamma: None,
        }
    }
}

impl ToneMapOperator for ToneMapper {
    fn tone_map(&self, radiance: f32) -> f32 {
        let display = self.operator.as_operator().tone_map(radiance);

        match self.inverse_gamma {
            Some(inverse_gamma) => display.powf(inverse_gamma).clamp(0.0, 1.0),
            None => display,
        }
    }

    fn adapt(&mut self, statistics: &RadianceStatistics) {
        self.operator.as_operator_mut().adapt(statistics);
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Unsupported tone mapper '{0}'")]
    UnsupportedOperator(String),

    #[error("Invalid value {value} for parameter '{key}' of the {operator} tone mapper: {reason}")]
    InvalidParameter {
        operator: &'static str,
        key: &'static str,
        value: f32,
        reason: &'static str,
    },
}
