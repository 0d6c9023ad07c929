//! # HDR Fusion
//! Loads bracketed exposures, fuses them with [`exposure_fusion`] and saves
//! the tone mapped result.
//!

pub mod align;
pub mod codec;
pub mod logger;
pub mod settings;

pub use align::{Aligner, BasicAligner, Error as AlignmentError};
pub use codec::{Error as CodecError, load_exposure, save_display_image};
pub use logger::setup_logger;
pub use settings::Settings;
