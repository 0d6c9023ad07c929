//! Merges differently exposed photographs of one scene into a radiance map
//! and tone maps it into a displayable 8-bit image.
//!
//! The pipeline is validate, convert to radiance, merge, tone map, assemble.
//! [`Engine`] runs it end to end; each stage is also exposed on its own.

extern crate alloc;

mod display_image;
mod engine;
mod exposure;
mod merge;
mod radiance;
mod radiance_map;
mod timing;
pub mod tonemapper;
mod validate;

pub use display_image::{DisplayImage, assemble, quantize};
pub use engine::{Engine, EngineConfig, process};
pub use exposure::{BitDepth, ChannelLayout, ChannelModel, Error as ExposureError, Exposure};
pub use merge::{ParsePolicyError, WeightingPolicy, merge, weight};
pub use radiance::{RadianceGrid, Rgb, to_radiance};
pub use radiance_map::{RadianceMap, RadianceStatistics};
pub use timing::Elapsed;
pub use tonemapper::{Error as ToneMapperError, ToneMapOperator, ToneMapper, ToneMapperConfig};
pub use validate::{Error as ValidationError, ExposureSet, MINIMUM_EXPOSURES, validate};

/// Any failure of the fusion pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to validate exposures:\n{0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to create tone mapper:\n{0}")]
    ToneMapper(#[from] ToneMapperError),

    #[error("Failed to create exposure:\n{0}")]
    Exposure(#[from] ExposureError),
}
