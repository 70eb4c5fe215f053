use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seed driving the noise permutation table and every downstream choice.
pub type WorldSeed = u64;

/// Identifier of a road segment inside one layout snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoadId(pub u32);

/// Identifier of an intersection node inside one layout snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntersectionId(pub u32);

/// Identifier of a city block inside one layout snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// Identifier of a plot. Doubles as the index into the snapshot's plot arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlotId(pub u32);

/// Named district of the city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistrictType {
    Downtown,
    FinancialDistrict,
    ArtsDistrict,
    Entertainment,
    Residential,
    Industrial,
    Waterfront,
    Suburbs,
}

impl DistrictType {
    pub const ALL: [DistrictType; 8] = [
        DistrictType::Downtown,
        DistrictType::FinancialDistrict,
        DistrictType::ArtsDistrict,
        DistrictType::Entertainment,
        DistrictType::Residential,
        DistrictType::Industrial,
        DistrictType::Waterfront,
        DistrictType::Suburbs,
    ];

    /// Stable snake_case name, matching the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            DistrictType::Downtown => "downtown",
            DistrictType::FinancialDistrict => "financial_district",
            DistrictType::ArtsDistrict => "arts_district",
            DistrictType::Entertainment => "entertainment",
            DistrictType::Residential => "residential",
            DistrictType::Industrial => "industrial",
            DistrictType::Waterfront => "waterfront",
            DistrictType::Suburbs => "suburbs",
        }
    }
}

impl fmt::Display for DistrictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Axis-aligned rectangle on the ground plane. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Rectangle of the given extents centered on `center`.
    pub fn from_center(center: DVec2, width: f64, depth: f64) -> Self {
        let half = DVec2::new(width * 0.5, depth * 0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Extent along X.
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along Z.
    pub fn depth(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn area(&self) -> f64 {
        self.width() * self.depth()
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Grow the rectangle by `amount` on every side.
    pub fn expanded(&self, amount: f64) -> Self {
        Self {
            min: self.min - DVec2::splat(amount),
            max: self.max + DVec2::splat(amount),
        }
    }
}

/// Road hierarchy level. Drives width, sidewalk and marking treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadKind {
    Boulevard,
    Street,
    Alley,
}

impl RoadKind {
    pub fn name(self) -> &'static str {
        match self {
            RoadKind::Boulevard => "boulevard",
            RoadKind::Street => "street",
            RoadKind::Alley => "alley",
        }
    }

    /// Dashed centre line is painted on everything except alleys.
    pub fn has_center_dashes(self) -> bool {
        !matches!(self, RoadKind::Alley)
    }

    /// Solid edge lines are painted on boulevards only.
    pub fn has_edge_lines(self) -> bool {
        matches!(self, RoadKind::Boulevard)
    }
}

/// A straight road segment between two ground-plane points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub id: RoadId,
    pub kind: RoadKind,
    pub start: DVec2,
    pub end: DVec2,
    pub width: f64,
}

impl RoadSegment {
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    pub fn midpoint(&self) -> DVec2 {
        (self.start + self.end) * 0.5
    }

    /// Unit direction from start to end, or zero for a degenerate segment.
    pub fn direction(&self) -> DVec2 {
        (self.end - self.start).normalize_or_zero()
    }

    /// True when the segment runs mostly along X.
    pub fn is_horizontal(&self) -> bool {
        let d = self.end - self.start;
        d.x.abs() >= d.y.abs()
    }

    /// Bounding rectangle including half the road width on every side.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.start.min(self.end), self.start.max(self.end)).expanded(self.width * 0.5)
    }

    /// Shortest distance from `p` to the segment centre line.
    pub fn distance_to(&self, p: DVec2) -> f64 {
        let d = self.end - self.start;
        let len_sq = d.length_squared();
        if len_sq == 0.0 {
            return self.start.distance(p);
        }
        let t = ((p - self.start).dot(d) / len_sq).clamp(0.0, 1.0);
        (self.start + d * t).distance(p)
    }
}

/// A crossing between roads. Derived from the segments; never authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionNode {
    pub id: IntersectionId,
    pub position: DVec2,
    pub roads: Vec<RoadId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: DVec2, end: DVec2) -> RoadSegment {
        RoadSegment {
            id: RoadId(0),
            kind: RoadKind::Street,
            start,
            end,
            width: 10.0,
        }
    }

    #[test]
    fn rect_contains_is_inclusive() {
        let r = Rect::new(DVec2::new(0.0, 0.0), DVec2::new(10.0, 5.0));
        assert!(r.contains(DVec2::new(0.0, 0.0)));
        assert!(r.contains(DVec2::new(10.0, 5.0)));
        assert!(!r.contains(DVec2::new(10.1, 2.0)));
        assert_eq!(r.center(), DVec2::new(5.0, 2.5));
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(DVec2::ZERO, DVec2::splat(10.0));
        let b = Rect::new(DVec2::splat(5.0), DVec2::splat(15.0));
        let c = Rect::new(DVec2::splat(20.0), DVec2::splat(30.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn segment_orientation_and_distance() {
        let s = segment(DVec2::new(-50.0, 0.0), DVec2::new(50.0, 2.0));
        assert!(s.is_horizontal());
        assert!(s.distance_to(DVec2::new(0.0, 1.0)) < 1e-9);
        assert!((s.distance_to(DVec2::new(-60.0, 0.0)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_segment_has_zero_direction() {
        let s = segment(DVec2::splat(3.0), DVec2::splat(3.0));
        assert_eq!(s.direction(), DVec2::ZERO);
        assert_eq!(s.length(), 0.0);
    }

    #[test]
    fn marking_rules_by_kind() {
        assert!(RoadKind::Boulevard.has_edge_lines());
        assert!(!RoadKind::Street.has_edge_lines());
        assert!(!RoadKind::Alley.has_center_dashes());
    }

    #[test]
    fn district_names_are_snake_case() {
        assert_eq!(DistrictType::ArtsDistrict.to_string(), "arts_district");
        assert_eq!(DistrictType::ALL.len(), 8);
    }
}
