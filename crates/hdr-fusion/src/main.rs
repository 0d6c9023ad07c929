//! # HDR Fusion
//! Command line front end, merges a low, mid and high exposure into one image.
//!

use std::{fs, io, path::PathBuf, process::ExitCode};

use clap::Parser;
use exposure_fusion::{Engine, EngineConfig, ExposureSet, WeightingPolicy, tonemapper::keys};
use hdr_fusion::{
    Aligner, BasicAligner, CodecError,
    codec::{ImageFormat, load_exposure, save_display_image_with_quality},
    settings::{Error as SettingsError, Settings, project_directory},
    setup_logger,
};
use mimalloc::MiMalloc;
use thiserror::Error;
use tracing::{error, info, info_span, warn};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(name = "hdr-fusion")]
#[command(about = "Merge bracketed exposures into a single tone mapped image")]
#[command(version)]
struct Args {
    /// Path to the low exposure image
    #[arg(long, value_name = "PATH")]
    low: PathBuf,

    /// Path to the mid exposure image
    #[arg(long, value_name = "PATH")]
    mid: PathBuf,

    /// Path to the high exposure image
    #[arg(long, value_name = "PATH")]
    high: PathBuf,

    /// Additional exposures to merge with the other three
    #[arg(long, value_name = "PATH", num_args = 1..)]
    extra: Vec<PathBuf>,

    /// Path for the output image, PNG or JPEG
    #[arg(long, value_name = "PATH", default_value = "hdr_output.jpg")]
    output: PathBuf,

    /// Tone mapping operator (reinhard, drago, linear, logarithmic, reinhard05, gamma-compression)
    #[arg(long, value_name = "NAME")]
    tonemapper: Option<String>,

    /// Gamma correction value
    #[arg(long)]
    gamma: Option<f32>,

    /// Intensity adjustment
    #[arg(long)]
    intensity: Option<f32>,

    /// Light adaptation (reinhard05 only)
    #[arg(long)]
    light: Option<f32>,

    /// Target display maximum luminance (drago only)
    #[arg(long)]
    ld_max: Option<f32>,

    /// Bias (drago only)
    #[arg(long)]
    bias: Option<f32>,

    /// Exposure weighting policy (brightness, per-channel)
    #[arg(long, value_name = "POLICY")]
    weighting: Option<WeightingPolicy>,

    /// Settings file to use instead of the default
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn exposure_paths(&self) -> Vec<PathBuf> {
        [&self.low, &self.mid, &self.high]
            .into_iter()
            .chain(&self.extra)
            .cloned()
            .collect()
    }

    /// The settings with any flags that were passed applied over them.
    fn engine_config(&self, settings: &Settings) -> EngineConfig {
        let mut config = settings.engine_config();

        if let Some(tonemapper) = &self.tonemapper {
            config.tone_mapper.operator.clone_from(tonemapper);
        }

        if let Some(weighting) = self.weighting {
            config.weighting = weighting;
        }

        let overrides = [
            (keys::GAMMA, self.gamma),
            (keys::INTENSITY, self.intensity),
            (keys::LIGHT, self.light),
            (keys::LD_MAX, self.ld_max),
            (keys::BIAS, self.bias),
        ];

        for (key, value) in overrides {
            if let Some(value) = value {
                config.tone_mapper.params.insert(key.to_string(), value);
            }
        }

        config
    }
}

#[derive(Debug, Error)]
enum AppError {
    #[error("Failed to load settings:\n{0}")]
    Settings(#[from] SettingsError),

    #[error("Failed to load exposure:\n{0}")]
    LoadExposure(#[source] CodecError),

    #[error("Failed to process HDR:\n{0}")]
    Process(#[from] exposure_fusion::Error),

    #[error("Failed to create output directory {}:\n{source}", .path.display())]
    CreateOutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to save output image:\n{0}")]
    SaveImage(#[source] CodecError),
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_directory = project_directory().filter(|dir| fs::create_dir_all(dir).is_ok());
    let _logger_guards = match setup_logger(args.debug, log_directory.as_deref()) {
        Ok(guards) => Some(guards),
        Err(e) => {
            eprintln!("{e}");
            None
        }
    };

    let _span = info_span!("[Main]").entered();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    let settings = {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => Settings::default_path()?,
        };

        Settings::load_or_create(&path)?
    };

    let config = args.engine_config(&settings);
    let engine = Engine::new(&config)?;

    // Check every extension before decoding anything.
    let paths = args.exposure_paths();
    for path in &paths {
        ImageFormat::from_path(path).map_err(AppError::LoadExposure)?;
    }
    ImageFormat::from_path(&args.output).map_err(AppError::SaveImage)?;

    let exposures = paths
        .iter()
        .map(|path| load_exposure(path))
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::LoadExposure)?;

    let exposures = match BasicAligner.align(exposures) {
        Ok(aligned) => aligned,
        Err(e) => {
            warn!("Image alignment failed: {e}");
            warn!("Proceeding with unaligned images");
            e.into_exposures()
        }
    };

    let exposures = ExposureSet::from_exposures(exposures).map_err(exposure_fusion::Error::from)?;
    let image = engine.process(&exposures);

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| AppError::CreateOutputDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    save_display_image_with_quality(&image, &args.output, settings.jpeg_quality)
        .map_err(AppError::SaveImage)?;
    info!("Saved {}", args.output.display());

    println!("HDR image successfully saved to {}", args.output.display());
    println!("Processing parameters:");
    println!("- Tone mapper: {}", engine.tone_mapper().name());
    println!("- Weighting: {}", engine.weighting());
    for (key, value) in &config.tone_mapper.params {
        println!("- {key}: {value:.2}");
    }

    Ok(())
}
