use cityforge_common::{DistrictType, WorldSeed};
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// District returned for points no polygon claims.
pub const FALLBACK_DISTRICT: DistrictType = DistrictType::Suburbs;

/// A district outline in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictBoundary {
    pub district: DistrictType,
    /// Vertex centroid of the polygon.
    pub center: DVec2,
    /// Largest centre-to-vertex distance.
    pub radius: f64,
    /// Closed, non-self-intersecting outline. The closing edge is implicit.
    pub polygon: Vec<DVec2>,
}

impl DistrictBoundary {
    pub fn new(district: DistrictType, polygon: Vec<DVec2>) -> Self {
        let center = if polygon.is_empty() {
            DVec2::ZERO
        } else {
            polygon.iter().copied().sum::<DVec2>() / polygon.len() as f64
        };
        let radius = polygon
            .iter()
            .map(|v| v.distance(center))
            .fold(0.0, f64::max);
        Self {
            district,
            center,
            radius,
            polygon,
        }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        point_in_polygon(p, &self.polygon)
    }
}

/// Hand-authored outline in normalized coordinates (`[-0.5, 0.5]` on both
/// axes), scaled by the world size when boundaries are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictTemplate {
    pub district: DistrictType,
    pub outline: Vec<DVec2>,
}

/// Ordered set of district templates. Order is classification priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictMap {
    templates: Vec<DistrictTemplate>,
}

impl DistrictMap {
    pub fn new(templates: Vec<DistrictTemplate>) -> Self {
        Self { templates }
    }

    /// The city's named geography: downtown in the middle, four quarter
    /// districts around it and industrial/waterfront strips on the east and
    /// west edges. The cross-shaped corridors between them are left to the
    /// fallback district.
    pub fn standard() -> Self {
        fn outline(points: &[(f64, f64)]) -> Vec<DVec2> {
            points.iter().map(|&(x, z)| DVec2::new(x, z)).collect()
        }

        let templates = vec![
            DistrictTemplate {
                district: DistrictType::Downtown,
                outline: outline(&[
                    (0.12, 0.05),
                    (0.05, 0.12),
                    (-0.05, 0.12),
                    (-0.12, 0.05),
                    (-0.12, -0.05),
                    (-0.05, -0.12),
                    (0.05, -0.12),
                    (0.12, -0.05),
                ]),
            },
            DistrictTemplate {
                district: DistrictType::FinancialDistrict,
                outline: outline(&[
                    (0.10, -0.40),
                    (0.40, -0.40),
                    (0.40, -0.10),
                    (0.16, -0.10),
                    (0.10, -0.16),
                ]),
            },
            DistrictTemplate {
                district: DistrictType::ArtsDistrict,
                outline: outline(&[
                    (-0.40, -0.40),
                    (-0.10, -0.40),
                    (-0.10, -0.16),
                    (-0.16, -0.10),
                    (-0.40, -0.10),
                ]),
            },
            DistrictTemplate {
                district: DistrictType::Entertainment,
                outline: outline(&[
                    (0.16, 0.10),
                    (0.40, 0.10),
                    (0.40, 0.40),
                    (0.10, 0.40),
                    (0.10, 0.16),
                ]),
            },
            DistrictTemplate {
                district: DistrictType::Residential,
                outline: outline(&[
                    (-0.40, 0.10),
                    (-0.16, 0.10),
                    (-0.10, 0.16),
                    (-0.10, 0.40),
                    (-0.40, 0.40),
                ]),
            },
            DistrictTemplate {
                district: DistrictType::Industrial,
                outline: outline(&[(0.40, -0.50), (0.50, -0.50), (0.50, 0.50), (0.40, 0.50)]),
            },
            DistrictTemplate {
                district: DistrictType::Waterfront,
                outline: outline(&[(-0.50, -0.50), (-0.40, -0.50), (-0.40, 0.50), (-0.50, 0.50)]),
            },
        ];
        Self { templates }
    }

    pub fn templates(&self) -> &[DistrictTemplate] {
        &self.templates
    }

    /// Scale every template to `world_size` and return boundaries in
    /// priority order.
    pub fn boundaries(&self, world_size: f64) -> Vec<DistrictBoundary> {
        self.templates
            .iter()
            .map(|t| {
                let polygon = t.outline.iter().map(|v| *v * world_size).collect();
                DistrictBoundary::new(t.district, polygon)
            })
            .collect()
    }
}

impl Default for DistrictMap {
    fn default() -> Self {
        Self::standard()
    }
}

/// Build the standard district boundaries for a world.
///
/// The seed is accepted so callers do not need to change when boundaries
/// start varying per world; today the geography is the same for every seed.
pub fn generate_district_boundaries(world_size: f64, seed: WorldSeed) -> Vec<DistrictBoundary> {
    tracing::trace!(world_size, seed, "building district boundaries");
    DistrictMap::standard().boundaries(world_size)
}

/// Outcome of classifying one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub district: DistrictType,
    /// False when no polygon contained the point and the fallback was used.
    pub matched: bool,
}

/// District at `(x, z)`: the first boundary containing the point, else
/// [`FALLBACK_DISTRICT`].
pub fn classify(x: f64, z: f64, boundaries: &[DistrictBoundary]) -> DistrictType {
    classify_detailed(x, z, boundaries).district
}

pub fn classify_detailed(x: f64, z: f64, boundaries: &[DistrictBoundary]) -> Classification {
    let p = DVec2::new(x, z);
    boundaries
        .iter()
        .find(|b| b.contains(p))
        .map(|b| Classification {
            district: b.district,
            matched: true,
        })
        .unwrap_or(Classification {
            district: FALLBACK_DISTRICT,
            matched: false,
        })
}

/// Even-odd ray casting along +X.
pub fn point_in_polygon(p: DVec2, polygon: &[DVec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) {
            let cross_x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(half: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(-half, -half),
            DVec2::new(half, -half),
            DVec2::new(half, half),
            DVec2::new(-half, half),
        ]
    }

    #[test]
    fn point_in_square() {
        let poly = square(1.0);
        assert!(point_in_polygon(DVec2::ZERO, &poly));
        assert!(point_in_polygon(DVec2::new(0.9, -0.9), &poly));
        assert!(!point_in_polygon(DVec2::new(1.5, 0.0), &poly));
    }

    #[test]
    fn point_in_concave_polygon() {
        // L shape: the notch at the top right is outside.
        let poly = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(1.0, 2.0),
            DVec2::new(0.0, 2.0),
        ];
        assert!(point_in_polygon(DVec2::new(0.5, 1.5), &poly));
        assert!(point_in_polygon(DVec2::new(1.5, 0.5), &poly));
        assert!(!point_in_polygon(DVec2::new(1.5, 1.5), &poly));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        assert!(!point_in_polygon(DVec2::ZERO, &[DVec2::ZERO, DVec2::ONE]));
    }

    #[test]
    fn origin_is_downtown() {
        let boundaries = generate_district_boundaries(2000.0, 42);
        assert_eq!(classify(0.0, 0.0, &boundaries), DistrictType::Downtown);
    }

    #[test]
    fn boundaries_scale_with_world_size() {
        let small = generate_district_boundaries(1000.0, 1);
        let large = generate_district_boundaries(2000.0, 1);
        assert_eq!(small.len(), large.len());
        for (s, l) in small.iter().zip(&large) {
            assert!((l.radius - s.radius * 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn boundaries_ignore_seed() {
        assert_eq!(
            generate_district_boundaries(2000.0, 1),
            generate_district_boundaries(2000.0, 999)
        );
    }

    #[test]
    fn quarter_districts_classify() {
        let b = generate_district_boundaries(2000.0, 0);
        assert_eq!(classify(500.0, -500.0, &b), DistrictType::FinancialDistrict);
        assert_eq!(classify(-500.0, -500.0, &b), DistrictType::ArtsDistrict);
        assert_eq!(classify(500.0, 500.0, &b), DistrictType::Entertainment);
        assert_eq!(classify(-500.0, 500.0, &b), DistrictType::Residential);
        assert_eq!(classify(900.0, 0.0, &b), DistrictType::Industrial);
        assert_eq!(classify(-900.0, 0.0, &b), DistrictType::Waterfront);
    }

    #[test]
    fn gaps_fall_back() {
        let b = generate_district_boundaries(2000.0, 0);
        let c = classify_detailed(0.0, 600.0, &b);
        assert_eq!(c.district, FALLBACK_DISTRICT);
        assert!(!c.matched);
        assert!(classify_detailed(0.0, 0.0, &b).matched);
    }

    #[test]
    fn classification_is_stable() {
        let b = generate_district_boundaries(2000.0, 0);
        for i in 0..100 {
            let x = (i % 10) as f64 * 190.0 - 950.0;
            let z = (i / 10) as f64 * 190.0 - 950.0;
            let first = classify(x, z, &b);
            for _ in 0..3 {
                assert_eq!(classify(x, z, &b), first);
            }
        }
    }

    #[test]
    fn priority_order_resolves_overlaps() {
        let b = vec![
            DistrictBoundary::new(DistrictType::Downtown, square(10.0)),
            DistrictBoundary::new(DistrictType::Industrial, square(20.0)),
        ];
        assert_eq!(classify(0.0, 0.0, &b), DistrictType::Downtown);
        assert_eq!(classify(15.0, 0.0, &b), DistrictType::Industrial);
    }
}
