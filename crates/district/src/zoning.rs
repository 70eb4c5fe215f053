use cityforge_common::DistrictType;
use serde::{Deserialize, Serialize};

/// Plot size tier a zone may allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotTier {
    Small,
    Medium,
    Large,
    Estate,
}

impl PlotTier {
    /// Nominal (width, depth) footprint in world units.
    pub fn footprint(self) -> (f64, f64) {
        match self {
            PlotTier::Small => (20.0, 20.0),
            PlotTier::Medium => (30.0, 30.0),
            PlotTier::Large => (45.0, 45.0),
            PlotTier::Estate => (60.0, 60.0),
        }
    }
}

/// What a venue on a plot is used for. Descriptive metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueKind {
    Office,
    Retail,
    Restaurant,
    Gallery,
    Studio,
    Theater,
    Club,
    Arena,
    Housing,
    Warehouse,
    Factory,
    Marina,
    Park,
    Museum,
    Tower,
    Plaza,
}

/// Policy for one sub-area of a district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub name: String,
    pub plot_tiers: Vec<PlotTier>,
    pub venue_kinds: Vec<VenueKind>,
    pub density: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub park_probability: f64,
}

impl ZoneConfig {
    fn new(
        name: &str,
        plot_tiers: &[PlotTier],
        venue_kinds: &[VenueKind],
        density: f64,
        heights: (f64, f64),
        park_probability: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            plot_tiers: plot_tiers.to_vec(),
            venue_kinds: venue_kinds.to_vec(),
            density,
            min_height: heights.0,
            max_height: heights.1,
            park_probability,
        }
    }

    /// Building height for a `[0, 1]` sample, linearly inside the zone's range.
    pub fn height_for(&self, sample: f64) -> f64 {
        let t = sample.clamp(0.0, 1.0);
        self.min_height + (self.max_height - self.min_height) * t
    }
}

/// Everything the generator and gameplay layers know about a district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictProfile {
    pub district: DistrictType,
    pub display_name: String,
    /// Target (width, depth) of one plot before rescaling to the block.
    pub target_plot: (f64, f64),
    pub zones: Vec<ZoneConfig>,
    pub venues: Vec<VenueKind>,
}

impl DistrictProfile {
    /// Pick a zone for a `[-1, 1]` noise sample. Zones split the range evenly.
    pub fn zone_for(&self, sample: f64) -> Option<&ZoneConfig> {
        if self.zones.is_empty() {
            return None;
        }
        let t = ((sample.clamp(-1.0, 1.0) + 1.0) * 0.5).min(1.0 - f64::EPSILON);
        let index = (t * self.zones.len() as f64) as usize;
        self.zones.get(index.min(self.zones.len() - 1))
    }
}

/// Zoning and venue tables for every district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoningTable {
    profiles: Vec<DistrictProfile>,
}

impl ZoningTable {
    pub fn new(profiles: Vec<DistrictProfile>) -> Self {
        Self { profiles }
    }

    pub fn standard() -> Self {
        use PlotTier::*;
        use VenueKind::*;

        let profile = |district, name: &str, target_plot, zones, venues: &[VenueKind]| {
            DistrictProfile {
                district,
                display_name: name.to_string(),
                target_plot,
                zones,
                venues: venues.to_vec(),
            }
        };

        let profiles = vec![
            profile(
                DistrictType::Downtown,
                "Downtown",
                (30.0, 30.0),
                vec![
                    ZoneConfig::new(
                        "core",
                        &[Medium, Large],
                        &[Tower, Office, Retail],
                        1.6,
                        (40.0, 220.0),
                        0.02,
                    ),
                    ZoneConfig::new(
                        "plaza",
                        &[Medium],
                        &[Plaza, Restaurant, Retail],
                        1.2,
                        (12.0, 60.0),
                        0.10,
                    ),
                ],
                &[Tower, Office, Retail, Restaurant, Plaza],
            ),
            profile(
                DistrictType::FinancialDistrict,
                "Financial District",
                (40.0, 40.0),
                vec![
                    ZoneConfig::new(
                        "towers",
                        &[Large, Estate],
                        &[Tower, Office],
                        1.5,
                        (60.0, 260.0),
                        0.03,
                    ),
                    ZoneConfig::new(
                        "exchange",
                        &[Medium, Large],
                        &[Office, Restaurant],
                        1.2,
                        (25.0, 120.0),
                        0.05,
                    ),
                ],
                &[Tower, Office, Restaurant],
            ),
            profile(
                DistrictType::ArtsDistrict,
                "Arts District",
                (25.0, 25.0),
                vec![
                    ZoneConfig::new(
                        "galleries",
                        &[Small, Medium],
                        &[Gallery, Studio, Museum],
                        1.0,
                        (6.0, 30.0),
                        0.12,
                    ),
                    ZoneConfig::new(
                        "lofts",
                        &[Small, Medium],
                        &[Studio, Housing, Restaurant],
                        1.1,
                        (10.0, 40.0),
                        0.08,
                    ),
                ],
                &[Gallery, Studio, Museum, Theater, Restaurant],
            ),
            profile(
                DistrictType::Entertainment,
                "Entertainment Quarter",
                (35.0, 35.0),
                vec![
                    ZoneConfig::new(
                        "strip",
                        &[Medium, Large],
                        &[Club, Theater, Restaurant],
                        1.3,
                        (10.0, 70.0),
                        0.05,
                    ),
                    ZoneConfig::new("arena", &[Estate], &[Arena, Plaza], 0.6, (20.0, 50.0), 0.10),
                ],
                &[Club, Theater, Arena, Restaurant],
            ),
            profile(
                DistrictType::Residential,
                "Residential",
                (25.0, 30.0),
                vec![
                    ZoneConfig::new("townhouses", &[Small], &[Housing], 0.9, (6.0, 18.0), 0.15),
                    ZoneConfig::new(
                        "apartments",
                        &[Medium],
                        &[Housing, Retail],
                        1.1,
                        (15.0, 45.0),
                        0.10,
                    ),
                ],
                &[Housing, Retail, Park],
            ),
            profile(
                DistrictType::Industrial,
                "Industrial Park",
                (60.0, 50.0),
                vec![
                    ZoneConfig::new(
                        "yards",
                        &[Large, Estate],
                        &[Warehouse, Factory],
                        0.6,
                        (8.0, 25.0),
                        0.02,
                    ),
                ],
                &[Warehouse, Factory],
            ),
            profile(
                DistrictType::Waterfront,
                "Waterfront",
                (40.0, 30.0),
                vec![
                    ZoneConfig::new(
                        "boardwalk",
                        &[Medium],
                        &[Marina, Restaurant, Retail],
                        0.8,
                        (6.0, 25.0),
                        0.20,
                    ),
                    ZoneConfig::new(
                        "docks",
                        &[Large],
                        &[Warehouse, Marina],
                        0.5,
                        (8.0, 20.0),
                        0.05,
                    ),
                ],
                &[Marina, Restaurant, Retail, Park],
            ),
            profile(
                DistrictType::Suburbs,
                "Suburbs",
                (30.0, 40.0),
                vec![ZoneConfig::new(
                    "houses",
                    &[Medium, Large],
                    &[Housing, Park],
                    0.5,
                    (5.0, 12.0),
                    0.25,
                )],
                &[Housing, Park],
            ),
        ];
        Self { profiles }
    }

    pub fn profile(&self, district: DistrictType) -> Option<&DistrictProfile> {
        self.profiles.iter().find(|p| p.district == district)
    }

    pub fn profiles(&self) -> &[DistrictProfile] {
        &self.profiles
    }

    /// Target plot footprint for a district; districts missing from the
    /// table use the medium tier.
    pub fn target_plot(&self, district: DistrictType) -> (f64, f64) {
        self.profile(district)
            .map(|p| p.target_plot)
            .unwrap_or_else(|| PlotTier::Medium.footprint())
    }
}

impl Default for ZoningTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_district_has_a_profile() {
        let table = ZoningTable::standard();
        for district in DistrictType::ALL {
            let profile = table.profile(district).expect("missing profile");
            assert!(!profile.zones.is_empty());
            assert!(profile.target_plot.0 > 0.0 && profile.target_plot.1 > 0.0);
        }
    }

    #[test]
    fn zone_heights_are_ordered() {
        let table = ZoningTable::standard();
        for profile in table.profiles() {
            for zone in &profile.zones {
                assert!(zone.min_height <= zone.max_height, "{}", zone.name);
                assert!((0.0..=1.0).contains(&zone.park_probability));
            }
        }
    }

    #[test]
    fn zone_for_covers_full_range() {
        let table = ZoningTable::standard();
        let downtown = table.profile(DistrictType::Downtown).unwrap();
        assert_eq!(downtown.zone_for(-1.0).unwrap().name, "core");
        assert_eq!(downtown.zone_for(1.0).unwrap().name, "plaza");
        assert_eq!(downtown.zone_for(5.0).unwrap().name, "plaza");
    }

    #[test]
    fn height_for_interpolates() {
        let zone = ZoneConfig::new(
            "z",
            &[PlotTier::Small],
            &[VenueKind::Park],
            1.0,
            (10.0, 20.0),
            0.0,
        );
        assert_eq!(zone.height_for(0.0), 10.0);
        assert_eq!(zone.height_for(0.5), 15.0);
        assert_eq!(zone.height_for(2.0), 20.0);
    }

    #[test]
    fn missing_profile_uses_medium_tier() {
        let table = ZoningTable::new(Vec::new());
        assert_eq!(table.target_plot(DistrictType::Downtown), PlotTier::Medium.footprint());
    }
}
