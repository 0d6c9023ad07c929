use thiserror::Error;
use tracing::debug;

use crate::{ChannelModel, Exposure};

/// The fewest exposures a merge accepts.
pub const MINIMUM_EXPOSURES: usize = 2;

/// Checks that a candidate set of exposures can be merged.
///
/// The checks run in order, the first failure is returned:
/// 1. At least [`MINIMUM_EXPOSURES`] slots are supplied.
/// 1. Every slot holds an exposure.
/// 1. Every exposure has the size of the first.
/// 1. Every exposure has the channel model of the first.
pub fn validate(exposures: &[Option<&Exposure>]) -> Result<(), Error> {
    if exposures.len() < MINIMUM_EXPOSURES {
        return Err(Error::InsufficientCount {
            minimum: MINIMUM_EXPOSURES,
            found: exposures.len(),
        });
    }

    if let Some(index) = exposures.iter().position(Option::is_none) {
        return Err(Error::NilExposure { index });
    }

    let mut present = exposures.iter().flatten().enumerate();
    let Some((_, base)) = present.next() else {
        return Err(Error::NilExposure { index: 0 });
    };

    for (index, exposure) in present {
        if exposure.size() != base.size() {
            return Err(Error::DimensionMismatch {
                index,
                expected: base.size(),
                found: exposure.size(),
            });
        }

        if exposure.model() != base.model() {
            return Err(Error::ChannelModelMismatch {
                index,
                expected: base.model(),
                found: exposure.model(),
            });
        }
    }

    Ok(())
}

/// An ordered set of exposures that passed [`validate`].
///
/// Every exposure shares the size and channel model of the first.
#[derive(Debug, Clone)]
pub struct ExposureSet {
    exposures: Vec<Exposure>,
}

impl ExposureSet {
    /// Validates the slots and takes ownership of the exposures.
    pub fn new(slots: Vec<Option<Exposure>>) -> Result<Self, Error> {
        {
            let borrowed: Vec<Option<&Exposure>> = slots.iter().map(Option::as_ref).collect();
            validate(&borrowed)?;
        }

        let exposures: Vec<Exposure> = slots.into_iter().flatten().collect();
        debug!(
            "Validated {} exposures of {}x{} {}",
            exposures.len(),
            exposures[0].width(),
            exposures[0].height(),
            exposures[0].model()
        );

        Ok(Self { exposures })
    }

    /// Validates a list where every slot is filled.
    pub fn from_exposures(exposures: Vec<Exposure>) -> Result<Self, Error> {
        Self::new(exposures.into_iter().map(Some).collect())
    }

    /// The `[width, height]` shared by every exposure.
    pub fn size(&self) -> [u32; 2] {
        self.exposures[0].size()
    }

    /// The channel model shared by every exposure.
    pub fn model(&self) -> ChannelModel {
        self.exposures[0].model()
    }

    /// The number of exposures.
    pub fn len(&self) -> usize {
        self.exposures.len()
    }

    /// Always false, a validated set has at least [`MINIMUM_EXPOSURES`].
    pub fn is_empty(&self) -> bool {
        self.exposures.is_empty()
    }

    /// The exposures in their original order.
    pub fn exposures(&self) -> &[Exposure] {
        &self.exposures
    }

    /// Returns the owned exposures.
    pub fn into_exposures(self) -> Vec<Exposure> {
        self.exposures
    }
}

/// Reasons an exposure set cannot be merged.
///
/// Indices are zero-based, the messages are one-based.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("At least {minimum} exposures are required, found {found}")]
    InsufficientCount { minimum: usize, found: usize },

    #[error("Exposure {} is missing", .index + 1)]
    NilExposure { index: usize },

    #[error(
        "Exposure {} has different dimensions than the first exposure: expected {}x{}, found {}x{}",
        .index + 1, .expected[0], .expected[1], .found[0], .found[1]
    )]
    DimensionMismatch {
        index: usize,
        expected: [u32; 2],
        found: [u32; 2],
    },

    #[error(
        "Exposure {} has a different channel model: expected {expected}, found {found}",
        .index + 1
    )]
    ChannelModelMismatch {
        index: usize,
        expected: ChannelModel,
        found: ChannelModel,
    },
}
