use alloc::collections::BTreeMap;

use rayon::iter::{IntoParallelIterator, IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::{
    DisplayImage, Error, Exposure, ExposureSet, RadianceGrid, RadianceMap, Rgb, ToneMapOperator,
    ToneMapper, ToneMapperConfig, WeightingPolicy, assemble, merge, timing::StageTimer,
};

/// Everything that selects how a set of exposures is fused and displayed.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The tone mapping operator and its parameters.
    #[serde(default)]
    pub tone_mapper: ToneMapperConfig,

    /// How exposures are weighted against each other.
    #[serde(default)]
    pub weighting: WeightingPolicy,
}

/// Fuses validated exposure sets into display images.
///
/// The engine holds no per-call state, one engine can process any number of
/// sets, including from several threads at once.
#[derive(Debug, Clone)]
pub struct Engine {
    tone_mapper: ToneMapper,
    weighting: WeightingPolicy,
}

impl Engine {
    /// Builds the tone mapper described by the config, failing on an unknown
    /// operator or an invalid parameter.
    pub fn new(config: &EngineConfig) -> Result<Self, Error> {
        let tone_mapper = ToneMapper::new(&config.tone_mapper)?;

        debug!(
            "Created engine with {} tone mapper and {} weighting",
            tone_mapper.name(),
            config.weighting
        );

        Ok(Self {
            tone_mapper,
            weighting: config.weighting,
        })
    }

    /// The tone mapper before adaptation.
    pub fn tone_mapper(&self) -> &ToneMapper {
        &self.tone_mapper
    }

    /// The weighting policy used for every merge.
    pub fn weighting(&self) -> WeightingPolicy {
        self.weighting
    }

    /// Converts each exposure to radiance and fuses them.
    pub fn merge(&self, exposures: &ExposureSet) -> RadianceMap {
        let _span = info_span!("merge", exposures = exposures.len()).entered();

        let grids: Vec<RadianceGrid> = {
            let _timer = StageTimer::start("Radiance conversion", exposures.size());
            exposures
                .exposures()
                .par_iter()
                .map(RadianceGrid::from_exposure)
                .collect()
        };

        let _timer = StageTimer::start("Merge", exposures.size());
        merge(&grids, self.weighting)
    }

    /// Fits the tone mapper to the map and compresses it to 8-bit.
    pub fn tone_map(&self, radiance: &RadianceMap) -> DisplayImage {
        let _span = info_span!("tone_map", operator = self.tone_mapper.name()).entered();
        let [width, height] = radiance.size();

        let statistics = radiance.statistics();
        debug!("Radiance statistics: {statistics:?}");
        let tone_mapper = self.tone_mapper.adapted(&statistics);

        let tone_mapped: Vec<Rgb> = {
            let _timer = StageTimer::start("Tone mapping", radiance.size());
            radiance
                .pixels()
                .into_par_iter()
                .map(|&pixel| tone_mapper.tone_map_rgb(pixel))
                .collect()
        };

        let _timer = StageTimer::start("Assembly", radiance.size());
        assemble(width, height, &tone_mapped)
    }

    /// Merges the set and tone maps the result.
    pub fn process(&self, exposures: &ExposureSet) -> DisplayImage {
        let radiance = self.merge(exposures);
        self.tone_map(&radiance)
    }
}

/// Fuses a list of exposure slots with the named tone mapper.
///
/// The tone mapper is built before the exposures are validated, so a bad
/// operator name or parameter fails without touching any pixel. Uses
/// [`WeightingPolicy::Brightness`].
pub fn process(
    exposures: Vec<Option<Exposure>>,
    tone_mapper_name: &str,
    params: &BTreeMap<String, f32>,
) -> Result<DisplayImage, Error> {
    let config = EngineConfig {
        tone_mapper: ToneMapperConfig {
            operator: tone_mapper_name.to_string(),
            params: params.clone(),
        },
        weighting: WeightingPolicy::default(),
    };

    let engine = Engine::new(&config)?;
    let exposures = ExposureSet::new(exposures)?;

    Ok(engine.process(&exposures))
}
