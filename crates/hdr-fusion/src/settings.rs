use std::{
    fs, io,
    path::{Path, PathBuf},
};

use exposure_fusion::{EngineConfig, ToneMapperConfig, WeightingPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::codec::JPEG_QUALITY;

const SETTINGS_FILE: &str = "hdr-fusion.toml";
const PROJECT_DIRECTORY: &str = "hdr-fusion";

/// The directory holding the settings file and logs.
pub fn project_directory() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(PROJECT_DIRECTORY))
}

/// Defaults for every run, overridden by command line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Quality of JPEG output, `1` to `100`.
    pub jpeg_quality: u8,
    /// How exposures are weighted when merged.
    pub weighting: WeightingPolicy,
    /// The default tone mapper and its parameters.
    pub tone_mapper: ToneMapperConfig,
}

/// Reading or writing the settings file failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to find a config directory on this platform")]
    NoProjectDirectory,

    #[error("Failed to read {}:\n{source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Settings in {} are malformed:\n{source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to encode settings as TOML:\n{0}")]
    Encode(#[from] toml::ser::Error),

    #[error("Failed to write {}:\n{source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Settings {
    /// Loads the settings at `path`, writing the defaults there first if the file does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, Error> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.save(path)?;
                info!("Created default settings at {}", path.display());

                return Ok(settings);
            }
            Err(source) => {
                return Err(Error::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&contents).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the settings to `path`, creating its parent directories.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let contents = toml::to_string_pretty(self)?;
        let write_error = |source| Error::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        fs::write(path, contents).map_err(write_error)
    }

    /// `hdr-fusion.toml` in the project directory.
    pub fn default_path() -> Result<PathBuf, Error> {
        project_directory()
            .map(|dir| dir.join(SETTINGS_FILE))
            .ok_or(Error::NoProjectDirectory)
    }

    /// The engine configuration described by these settings.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            tone_mapper: self.tone_mapper.clone(),
            weighting: self.weighting,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jpeg_quality: JPEG_QUALITY,
            weighting: WeightingPolicy::default(),
            tone_mapper: ToneMapperConfig::default(),
        }
    }
}
