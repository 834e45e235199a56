use crate::{
    error::{FleetError, FleetResult},
    geo::{BoundingBox, DensityCenter, DensityClass},
    name_generator::NameGenerator,
    sampler::Weighted,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fleet seed used by the dashboard's demo fleet.
pub const DEFAULT_FLEET_SEED: u32 = 42;
pub const DEFAULT_FLEET_SIZE: usize = 400;
pub const TEST_FLEET_SIZE: usize = 60;

// ── Regions ───────────────────────────────────────────────────────

/// One operating utility: its tag prefix, territory box and the density
/// centers assets cluster around.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionConfig {
    pub region_id: String,
    /// Tag prefix, e.g. `COMED` for `COMED-0001`.
    pub tag_prefix: String,
    pub utility: String,
    pub state: String,
    /// Relative share of fleet slots assigned to this region.
    pub fleet_share: f64,
    pub bbox: BoundingBox,
    pub centers: Vec<DensityCenter>,
}

impl Weighted for RegionConfig {
    fn weight(&self) -> f64 {
        self.fleet_share
    }
}

// ── Fleet ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FleetConfig {
    pub fleet_seed: u32,
    pub fleet_size: usize,
    /// Reference date standing in for "now". Health-record quarters and
    /// work-order months count back from here.
    pub as_of: NaiveDate,
    pub regions: Vec<RegionConfig>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            fleet_seed: DEFAULT_FLEET_SEED,
            fleet_size: DEFAULT_FLEET_SIZE,
            as_of: default_as_of(),
            regions: default_regions(),
        }
    }
}

impl FleetConfig {
    /// Load from a JSON file and validate.
    /// In tests, use FleetConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: FleetConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in regions with a small fleet, for fast tests.
    pub fn default_test() -> Self {
        Self {
            fleet_size: TEST_FLEET_SIZE,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, fleet_seed: u32) -> Self {
        self.fleet_seed = fleet_seed;
        self
    }

    pub fn validate(&self) -> FleetResult<()> {
        let invalid = |reason: String| Err(FleetError::InvalidConfig { reason });

        if self.regions.is_empty() {
            return invalid("no regions configured".into());
        }
        let mut prefixes = HashSet::new();
        for region in &self.regions {
            let id = &region.region_id;
            if region.tag_prefix.is_empty() {
                return invalid(format!("region {id} has an empty tag prefix"));
            }
            if !prefixes.insert(region.tag_prefix.as_str()) {
                return invalid(format!("duplicate tag prefix {}", region.tag_prefix));
            }
            if !(region.fleet_share > 0.0) {
                return invalid(format!("region {id} has non-positive fleet share"));
            }
            if !region.bbox.is_well_formed() {
                return invalid(format!("region {id} has an inverted bounding box"));
            }
            if region.centers.is_empty() {
                return invalid(format!("region {id} has no density centers"));
            }
            for c in &region.centers {
                if !(c.radius > 0.0) || !(c.weight > 0.0) {
                    return invalid(format!(
                        "center {} in {id} needs positive radius and weight",
                        c.name
                    ));
                }
                if !region.bbox.contains(c.lat, c.lng) {
                    return invalid(format!("center {} lies outside region {id}", c.name));
                }
            }
        }
        Ok(())
    }

    /// Resolve the region that owns `tag` by its prefix.
    pub fn region_for_tag(&self, tag: &str) -> FleetResult<&RegionConfig> {
        let (prefix, _) = NameGenerator::parse_tag(tag)?;
        self.regions
            .iter()
            .find(|r| r.tag_prefix == prefix)
            .ok_or_else(|| FleetError::UnknownRegion { tag: tag.to_string() })
    }
}

fn default_as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap_or_default()
}

fn center(
    name: &str,
    district: &str,
    lat: f64,
    lng: f64,
    radius: f64,
    weight: f64,
    density: DensityClass,
) -> DensityCenter {
    DensityCenter {
        name: name.into(),
        district: district.into(),
        lat,
        lng,
        radius,
        weight,
        density,
    }
}

/// The four utility territories of the demo fleet.
#[rustfmt::skip]
pub fn default_regions() -> Vec<RegionConfig> {
    use DensityClass::{Rural, Suburban, Urban};
    vec![
        RegionConfig {
            region_id: "northern_illinois".into(),
            tag_prefix: "COMED".into(),
            utility: "ComEd".into(),
            state: "IL".into(),
            fleet_share: 0.40,
            bbox: BoundingBox { lat_min: 41.35, lat_max: 42.5, lng_min: -88.9, lng_max: -87.3 },
            centers: vec![
                center("Chicago Loop",       "Chicago Central",    41.8781, -87.6298, 0.06, 0.26, Urban),
                center("Chicago North Side", "Chicago North",      41.9500, -87.7000, 0.07, 0.14, Urban),
                center("Chicago South Side", "Chicago South",      41.7500, -87.6200, 0.08, 0.12, Urban),
                center("Naperville",         "West Suburban",      41.7508, -88.1535, 0.08, 0.12, Suburban),
                center("Schaumburg",         "Northwest Suburban", 42.0334, -88.0834, 0.08, 0.10, Suburban),
                center("Joliet",             "Southern",           41.5250, -88.0817, 0.10, 0.09, Suburban),
                center("Aurora",             "West Suburban",      41.7606, -88.3201, 0.09, 0.07, Suburban),
                center("Waukegan",           "Northern",           42.3636, -87.8448, 0.08, 0.05, Suburban),
                center("DeKalb",             "Western Rural",      41.9295, -88.7504, 0.12, 0.05, Rural),
            ],
        },
        RegionConfig {
            region_id: "southeastern_pennsylvania".into(),
            tag_prefix: "PECO".into(),
            utility: "PECO".into(),
            state: "PA".into(),
            fleet_share: 0.25,
            bbox: BoundingBox { lat_min: 39.7, lat_max: 40.45, lng_min: -76.05, lng_max: -74.7 },
            centers: vec![
                center("Center City",        "Philadelphia",       39.9526, -75.1652, 0.05, 0.30, Urban),
                center("North Philadelphia", "Philadelphia",       40.0200, -75.1300, 0.06, 0.15, Urban),
                center("Norristown",         "Montgomery",         40.1215, -75.3399, 0.08, 0.12, Suburban),
                center("Chester",            "Delaware County",    39.8496, -75.3557, 0.07, 0.10, Suburban),
                center("West Chester",       "Chester County",     39.9607, -75.6055, 0.10, 0.10, Suburban),
                center("Doylestown",         "Bucks",              40.3101, -75.1299, 0.09, 0.08, Rural),
                center("Coatesville",        "Chester County",     39.9832, -75.8238, 0.12, 0.05, Rural),
            ],
        },
        RegionConfig {
            region_id: "central_maryland".into(),
            tag_prefix: "BGE".into(),
            utility: "BGE".into(),
            state: "MD".into(),
            fleet_share: 0.20,
            bbox: BoundingBox { lat_min: 38.85, lat_max: 39.75, lng_min: -77.3, lng_max: -76.3 },
            centers: vec![
                center("Baltimore Downtown", "Baltimore City",     39.2904, -76.6122, 0.05, 0.30, Urban),
                center("Towson",             "Baltimore County",   39.4015, -76.6019, 0.07, 0.14, Suburban),
                center("Columbia",           "Howard",             39.2037, -76.8610, 0.08, 0.14, Suburban),
                center("Glen Burnie",        "Anne Arundel",       39.1626, -76.6247, 0.07, 0.12, Suburban),
                center("Annapolis",          "Anne Arundel",       38.9784, -76.4922, 0.06, 0.10, Suburban),
                center("Bel Air",            "Harford",            39.5359, -76.3483, 0.08, 0.08, Rural),
                center("Westminster",        "Carroll",            39.5754, -76.9958, 0.12, 0.08, Rural),
            ],
        },
        RegionConfig {
            region_id: "national_capital".into(),
            tag_prefix: "PEPCO".into(),
            utility: "Pepco".into(),
            state: "DC".into(),
            fleet_share: 0.15,
            bbox: BoundingBox { lat_min: 38.75, lat_max: 39.2, lng_min: -77.25, lng_max: -76.85 },
            centers: vec![
                center("Downtown Washington", "District of Columbia", 38.9072, -77.0369, 0.04, 0.34, Urban),
                center("Bethesda",            "Montgomery",           38.9847, -77.0947, 0.05, 0.16, Suburban),
                center("Silver Spring",       "Montgomery",           38.9907, -77.0261, 0.05, 0.16, Suburban),
                center("Rockville",           "Montgomery",           39.0840, -77.1528, 0.06, 0.14, Suburban),
                center("Suitland",            "Prince George's",      38.8487, -76.9239, 0.05, 0.12, Suburban),
                center("Olney",               "Montgomery",           39.1532, -77.0669, 0.06, 0.08, Rural),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        FleetConfig::default().validate().expect("built-in regions must validate");
    }

    #[test]
    fn region_lookup_by_prefix() {
        let config = FleetConfig::default();
        assert_eq!(config.region_for_tag("COMED-0001").unwrap().state, "IL");
        assert_eq!(config.region_for_tag("PEPCO-0012").unwrap().utility, "Pepco");
        assert!(matches!(
            config.region_for_tag("DUKE-0001"),
            Err(FleetError::UnknownRegion { .. })
        ));
    }
}
