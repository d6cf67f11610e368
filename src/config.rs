//! Pipeline configuration.
//!
//! Defaults reproduce the reference network: 15 nearest neighbours above a
//! 0.3 similarity floor, Louvain at resolution 0.8, a 3D spring layout with
//! k = 0.35 over 50 iterations, coordinates normalized into [-10, 10].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::FeatureColumn;
use crate::GeoweaveError;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "geoweave.toml";

/// Env var holding a JSON-encoded `PipelineConfig`.
pub const CONFIG_ENV_VAR: &str = "GEOWEAVE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub aggregation: AggregationConfig,
    pub similarity: SimilarityConfig,
    pub community: CommunityConfig,
    pub layout: LayoutConfig,
    pub community_layout: CommunityLayoutConfig,
    pub normalize: NormalizeConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Locations with fewer kept records than this are dropped.
    pub min_records: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self { min_records: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub features: Vec<FeatureColumn>,
    pub k_neighbors: usize,
    pub weight_threshold: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            features: FeatureColumn::DEFAULT.to_vec(),
            k_neighbors: 15,
            weight_threshold: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    pub resolution: f64,
    pub seed: u64,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            resolution: 0.8,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub dim: usize,
    /// Spacing constant; larger values spread connected nodes further apart.
    pub k: f64,
    pub iterations: usize,
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            dim: 3,
            k: 0.35,
            iterations: 50,
            seed: 42,
        }
    }
}

/// Independent layout of the community graph (separate community-only view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityLayoutConfig {
    pub enabled: bool,
    pub k: f64,
    pub iterations: usize,
    pub seed: u64,
}

impl Default for CommunityLayoutConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            k: 2.0,
            iterations: 100,
            seed: 42,
        }
    }
}

impl CommunityLayoutConfig {
    pub fn as_layout(&self) -> LayoutConfig {
        LayoutConfig {
            dim: 3,
            k: self.k,
            iterations: self.iterations,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NormalizeConfig {
    pub range: CoordRange,
}

/// Target interval applied to every axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordRange {
    pub min: f64,
    pub max: f64,
}

impl Default for CoordRange {
    fn default() -> Self {
        Self {
            min: -10.0,
            max: 10.0,
        }
    }
}

impl CoordRange {
    pub fn new(min: f64, max: f64) -> Result<Self, GeoweaveError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), GeoweaveError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(GeoweaveError::Configuration(format!(
                "coordinate range must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.min >= self.max {
            return Err(GeoweaveError::Configuration(format!(
                "coordinate range min ({}) must be below max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExportConfig {
    /// Keep only the strongest N location edges in the export. `None` keeps all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_edges: Option<usize>,
}

impl PipelineConfig {
    /// Reject parameter sets the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), GeoweaveError> {
        let sim = &self.similarity;
        if sim.features.is_empty() {
            return Err(GeoweaveError::Configuration(
                "similarity.features must name at least one column".to_string(),
            ));
        }
        if sim.k_neighbors == 0 {
            return Err(GeoweaveError::Configuration(
                "similarity.k_neighbors must be positive".to_string(),
            ));
        }
        if !sim.weight_threshold.is_finite() || !(0.0..1.0).contains(&sim.weight_threshold) {
            return Err(GeoweaveError::Configuration(format!(
                "similarity.weight_threshold must lie in [0, 1), got {}",
                sim.weight_threshold
            )));
        }

        if !self.community.resolution.is_finite() || self.community.resolution <= 0.0 {
            return Err(GeoweaveError::Configuration(format!(
                "community.resolution must be positive, got {}",
                self.community.resolution
            )));
        }

        validate_layout("layout", &self.layout)?;
        if self.community_layout.enabled {
            validate_layout("community_layout", &self.community_layout.as_layout())?;
        }

        self.normalize.range.validate()
    }
}

fn validate_layout(section: &str, layout: &LayoutConfig) -> Result<(), GeoweaveError> {
    if layout.dim != 3 {
        return Err(GeoweaveError::Configuration(format!(
            "{section}.dim must be 3, got {}",
            layout.dim
        )));
    }
    if layout.iterations == 0 {
        return Err(GeoweaveError::Configuration(format!(
            "{section}.iterations must be positive"
        )));
    }
    if !layout.k.is_finite() || layout.k <= 0.0 {
        return Err(GeoweaveError::Configuration(format!(
            "{section}.k must be positive, got {}",
            layout.k
        )));
    }
    Ok(())
}

/// Read a config file. The format follows the extension: `.json` is JSON,
/// anything else is TOML.
pub fn read_config_file(path: &Path) -> Result<PipelineConfig, GeoweaveError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        GeoweaveError::Input(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&contents)?)
    } else {
        Ok(toml::from_str(&contents)?)
    }
}

/// Load pipeline config with priority:
/// 1. explicit `path` (errors are fatal)
/// 2. `{dir}/geoweave.toml`
/// 3. `GEOWEAVE_CONFIG` env var (JSON)
/// 4. Defaults
pub fn load_pipeline_config(
    path: Option<&Path>,
    dir: &Path,
) -> Result<PipelineConfig, GeoweaveError> {
    if let Some(path) = path {
        let config = read_config_file(path)?;
        tracing::info!("Loaded pipeline config from {}", path.display());
        return Ok(config);
    }

    let config_path: PathBuf = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        match read_config_file(&config_path) {
            Ok(config) => {
                tracing::info!("Loaded pipeline config from {}", config_path.display());
                return Ok(config);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load {}: {}. Using default.",
                    config_path.display(),
                    e
                );
            }
        }
    }

    if let Ok(json) = std::env::var(CONFIG_ENV_VAR) {
        match serde_json::from_str::<PipelineConfig>(&json) {
            Ok(config) => {
                tracing::info!("Loaded pipeline config from {} env", CONFIG_ENV_VAR);
                return Ok(config);
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}. Using default.", CONFIG_ENV_VAR, e);
            }
        }
    }

    Ok(PipelineConfig::default())
}
