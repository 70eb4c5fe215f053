use std::path::{Path, PathBuf};

use cityforge_common::WorldSeed;
use cityforge_layout::{LayoutConfig, LayoutError};
use cityforge_mesh::{MeshConfig, MeshError};
use serde::{Deserialize, Serialize};

/// Invalid chunk manager configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StreamError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("unload distance {unload} must not be inside view distance {view}")]
    UnloadInsideView { view: f64, unload: f64 },
    #[error("LOD bands out of order: full {full} > simplified {simplified}")]
    LodBandsOutOfOrder { full: f64, simplified: f64 },
    #[error("max_chunks {max_chunks} cannot hold the {required} chunks of one view")]
    CapacityTooSmall { max_chunks: usize, required: usize },
    #[error("view spans {rings} chunk rings, at most {max} are supported")]
    ViewTooWide { rings: f64, max: i32 },
}

/// Widest ring enumeration the manager will walk.
pub const MAX_RINGS: i32 = 4096;

/// Errors from loading or validating a [`WorldConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {} (expected .yaml, .yml or .json)", .0.display())]
    UnknownFormat(PathBuf),
    #[error("layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("chunks: {0}")]
    Stream(#[from] StreamError),
    #[error("mesh: {0}")]
    Mesh(#[from] MeshError),
}

/// Chunk grid, visibility and LOD settings. Fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    pub chunk_size: f64,
    /// Chunks whose centre is within this distance are visible.
    pub view_distance: f64,
    /// Invisible chunks beyond this distance are queued for unload.
    pub unload_distance: f64,
    /// Chunks inside this distance get the high priority band.
    pub priority_distance: f64,
    /// Upper distance of LOD 0.
    pub lod_full_distance: f64,
    /// Upper distance of LOD 1; anything farther is LOD 2.
    pub lod_simplified_distance: f64,
    /// Ceiling on cached chunk states; least recently seen are evicted.
    pub max_chunks: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64.0,
            view_distance: 800.0,
            unload_distance: 1000.0,
            priority_distance: 300.0,
            lod_full_distance: 250.0,
            lod_simplified_distance: 500.0,
            max_chunks: 2048,
        }
    }
}

impl ChunkConfig {
    fn ring_span(&self) -> f64 {
        (self.view_distance / self.chunk_size).ceil()
    }

    /// Rings of chunks enumerated around the observer, capped at [`MAX_RINGS`].
    pub fn rings(&self) -> i32 {
        self.ring_span().clamp(0.0, MAX_RINGS as f64) as i32
    }

    /// Chunk count of one full ring enumeration. Saturates instead of
    /// overflowing for degenerate sizes.
    pub fn chunks_per_view(&self) -> usize {
        let side = 2.0 * self.ring_span().max(0.0) + 1.0;
        (side * side) as usize
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        let positive = [
            ("chunk_size", self.chunk_size),
            ("view_distance", self.view_distance),
            ("unload_distance", self.unload_distance),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(StreamError::NonPositive { field, value });
            }
        }
        if self.unload_distance < self.view_distance {
            return Err(StreamError::UnloadInsideView {
                view: self.view_distance,
                unload: self.unload_distance,
            });
        }
        if self.lod_full_distance > self.lod_simplified_distance {
            return Err(StreamError::LodBandsOutOfOrder {
                full: self.lod_full_distance,
                simplified: self.lod_simplified_distance,
            });
        }
        let rings = self.ring_span();
        if !(rings <= MAX_RINGS as f64) {
            return Err(StreamError::ViewTooWide {
                rings,
                max: MAX_RINGS,
            });
        }
        let required = self.chunks_per_view();
        if self.max_chunks < required {
            return Err(StreamError::CapacityTooSmall {
                max_chunks: self.max_chunks,
                required,
            });
        }
        Ok(())
    }
}

/// Everything needed to build a [`crate::CityWorld`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: WorldSeed,
    pub layout: LayoutConfig,
    pub chunks: ChunkConfig,
    pub mesh: MeshConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            layout: LayoutConfig::default(),
            chunks: ChunkConfig::default(),
            mesh: MeshConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => return Err(ConfigError::UnknownFormat(path.to_path_buf())),
        };
        tracing::debug!(path = %path.display(), seed = config.seed, "world config loaded");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.chunks.validate()?;
        self.mesh.validate()?;
        Ok(())
    }
}
