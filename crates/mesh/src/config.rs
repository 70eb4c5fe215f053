use cityforge_common::RoadKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MeshError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("failed to build mesh worker pool: {0}")]
    WorkerPool(String),
}

/// Dimensions of road geometry in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// Longest run between two cross-sections of a road strip.
    pub max_step: f64,
    /// Lift of the road surface above sampled terrain.
    pub surface_offset: f64,
    /// Sidewalk top above the road surface.
    pub curb_height: f64,
    /// Lift of paint above the road surface.
    pub marking_offset: f64,
    pub boulevard_sidewalk: f64,
    pub street_sidewalk: f64,
    pub alley_sidewalk: f64,
    pub dash_length: f64,
    pub dash_gap: f64,
    pub line_width: f64,
    /// Distance from the road edge to the centre of a boulevard edge line.
    pub edge_line_inset: f64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            max_step: 8.0,
            surface_offset: 0.05,
            curb_height: 0.15,
            marking_offset: 0.02,
            boulevard_sidewalk: 4.0,
            street_sidewalk: 3.0,
            alley_sidewalk: 0.0,
            dash_length: 3.0,
            dash_gap: 3.0,
            line_width: 0.15,
            edge_line_inset: 0.5,
        }
    }
}

impl MeshConfig {
    pub fn sidewalk_width(&self, kind: RoadKind) -> f64 {
        match kind {
            RoadKind::Boulevard => self.boulevard_sidewalk,
            RoadKind::Street => self.street_sidewalk,
            RoadKind::Alley => self.alley_sidewalk,
        }
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        let positive = [
            ("max_step", self.max_step),
            ("dash_length", self.dash_length),
            ("line_width", self.line_width),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(MeshError::NonPositive { field, value });
            }
        }
        let non_negative = [
            ("surface_offset", self.surface_offset),
            ("curb_height", self.curb_height),
            ("marking_offset", self.marking_offset),
            ("boulevard_sidewalk", self.boulevard_sidewalk),
            ("street_sidewalk", self.street_sidewalk),
            ("alley_sidewalk", self.alley_sidewalk),
            ("dash_gap", self.dash_gap),
            ("edge_line_inset", self.edge_line_inset),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(MeshError::Negative { field, value });
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
        assert!(MeshConfig::default().validate().is_ok());
    }

    #[test]
    fn sidewalks_shrink_down_the_hierarchy() {
        let config = MeshConfig::default();
        let boulevard = config.sidewalk_width(RoadKind::Boulevard);
        assert!(boulevard > config.sidewalk_width(RoadKind::Street));
        assert_eq!(config.sidewalk_width(RoadKind::Alley), 0.0);
    }

    #[test]
    fn zero_dash_is_rejected() {
        let config = MeshConfig {
            dash_length: 0.0,
            ..MeshConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(MeshError::NonPositive {
                field: "dash_length",
                value: 0.0
            })
        );
    }
}
