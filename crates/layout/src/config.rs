use serde::{Deserialize, Serialize};

/// Errors from layout generator construction.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LayoutError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("world size {world_size} must span at least one boulevard cell ({min})")]
    WorldTooSmall { world_size: f64, min: f64 },
    #[error("{field} must be within [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },
}

/// Generator configuration. Everything that is not the seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Edge length of the square world, centred on the origin.
    pub world_size: f64,
    /// Street spacing. Boulevards run every `2 * grid_spacing`.
    pub grid_spacing: f64,
    pub boulevard_width: f64,
    pub street_width: f64,
    pub alley_width: f64,
    /// Maximum perpendicular displacement of a boulevard.
    pub boulevard_jitter: f64,
    /// Maximum perpendicular displacement of a street.
    pub street_jitter: f64,
    /// Streets closer than this fraction of `grid_spacing` to a boulevard are skipped.
    pub street_skip_ratio: f64,
    /// Cells narrower than this fraction of `grid_spacing` get no alleys.
    pub alley_min_cell_ratio: f64,
    /// Blocks with either edge below this length are dropped.
    pub min_block_edge: f64,
    /// Gap left between neighbouring plots.
    pub plot_margin: f64,
    /// Plots with building noise above this value are buildable.
    pub buildable_threshold: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            world_size: 2000.0,
            grid_spacing: 100.0,
            boulevard_width: 24.0,
            street_width: 14.0,
            alley_width: 6.0,
            boulevard_jitter: 20.0,
            street_jitter: 8.0,
            street_skip_ratio: 0.3,
            alley_min_cell_ratio: 0.75,
            min_block_edge: 20.0,
            plot_margin: 1.0,
            buildable_threshold: 0.15,
        }
    }
}

impl LayoutConfig {
    /// Half the world edge; the world spans `[-half, half]` on both axes.
    pub fn half_extent(&self) -> f64 {
        self.world_size * 0.5
    }

    pub fn boulevard_spacing(&self) -> f64 {
        self.grid_spacing * 2.0
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = [
            ("world_size", self.world_size),
            ("grid_spacing", self.grid_spacing),
            ("boulevard_width", self.boulevard_width),
            ("street_width", self.street_width),
            ("alley_width", self.alley_width),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(LayoutError::NonPositive { field, value });
            }
        }
        if self.world_size < self.boulevard_spacing() {
            return Err(LayoutError::WorldTooSmall {
                world_size: self.world_size,
                min: self.boulevard_spacing(),
            });
        }
        let unit = [
            ("buildable_threshold", self.buildable_threshold),
            ("street_skip_ratio", self.street_skip_ratio),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(LayoutError::OutOfUnitRange { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LayoutConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.boulevard_spacing(), 200.0);
        assert_eq!(config.half_extent(), 1000.0);
    }

    #[test]
    fn rejects_non_positive_spacing() {
        let config = LayoutConfig {
            grid_spacing: 0.0,
            ..LayoutConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(LayoutError::NonPositive {
                field: "grid_spacing",
                value: 0.0
            })
        );
    }

    #[test]
    fn rejects_nan_width() {
        let config = LayoutConfig {
            street_width: f64::NAN,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LayoutError::NonPositive { field: "street_width", .. })
        ));
    }

    #[test]
    fn rejects_tiny_world() {
        let config = LayoutConfig {
            world_size: 150.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(config.validate(), Err(LayoutError::WorldTooSmall { .. })));
    }

    #[test]
    fn rejects_threshold_outside_unit_range() {
        let config = LayoutConfig {
            buildable_threshold: 1.5,
            ..LayoutConfig::default()
        };
        assert!(matches!(config.validate(), Err(LayoutError::OutOfUnitRange { .. })));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: LayoutConfig = serde_json::from_str(r#"{ "world_size": 1000.0 }"#).unwrap();
        assert_eq!(config.world_size, 1000.0);
        assert_eq!(config.grid_spacing, 100.0);
    }
}
