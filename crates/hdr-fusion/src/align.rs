use exposure_fusion::{Exposure, MINIMUM_EXPOSURES};
use thiserror::Error;
use tracing::debug;

/// Registers a set of exposures to a common frame before they are merged.
pub trait Aligner {
    /// Returns the aligned exposures in their original order.
    ///
    /// On failure the unaligned exposures are handed back inside the error.
    fn align(&self, exposures: Vec<Exposure>) -> Result<Vec<Exposure>, Error>;
}

/// Checks the exposures share one frame and returns them unchanged.
///
/// Does no pixel level registration.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicAligner;

impl BasicAligner {
    fn check(exposures: &[Exposure]) -> Result<(), String> {
        if exposures.len() < MINIMUM_EXPOSURES {
            return Err(format!(
                "at least {MINIMUM_EXPOSURES} exposures are required for alignment, found {}",
                exposures.len()
            ));
        }

        let base = exposures[0].size();
        for (index, exposure) in exposures.iter().enumerate().skip(1) {
            if exposure.size() != base {
                return Err(format!(
                    "exposure {} has different dimensions than the base exposure",
                    index + 1
                ));
            }
        }

        Ok(())
    }
}

impl Aligner for BasicAligner {
    fn align(&self, exposures: Vec<Exposure>) -> Result<Vec<Exposure>, Error> {
        if let Err(reason) = Self::check(&exposures) {
            return Err(Error::AlignmentFailed { reason, exposures });
        }

        debug!("Aligned {} exposures", exposures.len());
        Ok(exposures)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to align exposures: {reason}")]
    AlignmentFailed {
        reason: String,
        exposures: Vec<Exposure>,
    },
}

impl Error {
    /// The exposures as they were before alignment was attempted.
    pub fn into_exposures(self) -> Vec<Exposure> {
        match self {
            Self::AlignmentFailed { exposures, .. } => exposures,
        }
    }
}
