//! Grid asset synthesis: placement plus the correlated attribute chain.
//!
//! DRAW ORDER (fixed, documented, never reordered):
//!   Location channel:
//!     1. Density center          (1 draw)
//!     2. Lat / lng jitter        (3 + 3 draws)
//!     3. Display name            (2 draws)
//!   Attributes channel:
//!     1. Age                     (2 draws: band, year within band)
//!     2. Health                  (3 noise + 1 surprise coin [+ 1 surprise value])
//!     3. Load                    (1 draw)
//!     4. Failure mode            (1 draw)
//!     5. Time to failure         (1 draw)
//!     6. Repair duration         (1 draw)
//!     7. Voltage class           (1 draw)
//!     8. Customers served        (1 draw)
//!   Risk trend and repair window are pure functions of the above.
//!
//! Reordering any step reshuffles every asset in every fleet.

use crate::{
    catalog::{
        voltage_class, AGE_BANDS, AGE_MAX, AGE_MIN, HEALTH_BASELINE, HEALTH_DECAY_PER_YEAR,
        HEALTH_MAX, HEALTH_MIN, HEALTH_NOISE_SCALE, LOAD_SPREAD, SURPRISE_FAILURE_RATE,
        SURPRISE_HEALTH_MAX, SURPRISE_HEALTH_MIN, VOLTAGE_CLASSES,
    },
    config::RegionConfig,
    error::{FleetError, FleetResult},
    failure_mode::{FailureMode, FailureModeProfile, DEFAULT_FAILURE_MODE, FAILURE_MODES},
    geo::{self, DensityClass},
    name_generator::NameGenerator,
    rng::{Channel, ChannelBank, LcgRng},
    sampler::{pick_weighted, pick_weighted_by},
    types::{round1, AssetTag},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskTrend {
    Stable,
    Degrading,
    Critical,
}

impl RiskTrend {
    /// Never randomized: a pure function of already-derived fields.
    pub fn classify(health: f64, load: f64, age: u32) -> Self {
        if health < 40.0 && load > 70.0 {
            Self::Critical
        } else if health < 60.0 || (age > 35 && load > 60.0) {
            Self::Degrading
        } else {
            Self::Stable
        }
    }
}

/// One transformer / substation in the synthetic fleet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridAsset {
    pub tag: AssetTag,
    pub name: String,
    pub region_id: String,
    /// Owning organizational unit, e.g. "ComEd Chicago Central".
    pub org_unit: String,
    pub lat: f64,
    pub lng: f64,
    pub density: DensityClass,
    pub age_years: u32,
    pub health_index: f64,
    /// Percent of nameplate rating.
    pub load_factor: f64,
    pub voltage_class: String,
    pub customers_served: u32,
    pub failure_mode: FailureMode,
    pub time_to_failure_months: u32,
    pub time_to_failure: String,
    pub repair_window: String,
    pub repair_duration_hours: u32,
    pub repair_duration: String,
    pub materials: Vec<String>,
    pub skills: Vec<String>,
    pub risk_trend: RiskTrend,
}

/// Build the asset for `tag` inside `region`. Pure: same inputs, same
/// record, on every call.
pub fn synthesize_asset(tag: &str, region: &RegionConfig) -> GridAsset {
    let bank = ChannelBank::for_tag(tag);

    let mut loc = bank.for_channel(Channel::Location);
    let (lat, lng, center_name, district, density) =
        match geo::place(&mut loc, &region.centers, &region.bbox) {
            Some(p) => (
                p.lat,
                p.lng,
                p.center.name.clone(),
                p.center.district.clone(),
                p.center.density,
            ),
            // Validated configs always have centers; an empty one lands mid-box.
            None => (
                (region.bbox.lat_min + region.bbox.lat_max) / 2.0,
                (region.bbox.lng_min + region.bbox.lng_max) / 2.0,
                region.utility.clone(),
                region.utility.clone(),
                DensityClass::Suburban,
            ),
        };
    let name = NameGenerator::generate_substation_name(&mut loc, &center_name);

    let mut rng = bank.for_channel(Channel::Attributes);
    let age_years = sample_age(&mut rng);
    let health_index = sample_health(&mut rng, age_years);
    let load_factor = round1(density.load_baseline() + rng.range(0.0, LOAD_SPREAD));
    let failure_mode = sample_failure_mode(&mut rng, age_years);
    let time_to_failure_months = sample_time_to_failure(&mut rng, health_index);
    let repair_duration_hours = sample_repair_hours(&mut rng, failure_mode);

    let vclass = pick_weighted(&mut rng, VOLTAGE_CLASSES).unwrap_or(&VOLTAGE_CLASSES[0]);
    let customers = rng.range(f64::from(vclass.customers_min), f64::from(vclass.customers_max))
        * density.customer_factor();

    let profile = failure_mode.profile();
    GridAsset {
        tag: tag.to_string(),
        name,
        region_id: region.region_id.clone(),
        org_unit: format!("{} {}", region.utility, district),
        lat,
        lng,
        density,
        age_years,
        health_index,
        load_factor,
        voltage_class: vclass.label.to_string(),
        customers_served: customers.round() as u32,
        failure_mode,
        time_to_failure_months,
        time_to_failure: format_time_to_failure(time_to_failure_months),
        repair_window: repair_window(health_index).to_string(),
        repair_duration_hours,
        repair_duration: format_repair_duration(repair_duration_hours, failure_mode),
        materials: profile.materials.iter().map(|s| s.to_string()).collect(),
        skills: profile.skills.iter().map(|s| s.to_string()).collect(),
        risk_trend: RiskTrend::classify(health_index, load_factor, age_years),
    }
}

fn sample_age(rng: &mut LcgRng) -> u32 {
    let roll = rng.next_f64();
    let band = AGE_BANDS
        .iter()
        .find(|b| roll < b.cumulative)
        .unwrap_or(&AGE_BANDS[AGE_BANDS.len() - 1]);
    rng.int_range(band.min_years, band.max_years).clamp(AGE_MIN, AGE_MAX)
}

/// Linear decay with age plus centred noise; the surprise coin is flipped
/// on every asset and, when it lands, replaces the value outright.
fn sample_health(rng: &mut LcgRng, age: u32) -> f64 {
    let aged = HEALTH_BASELINE - f64::from(age) * HEALTH_DECAY_PER_YEAR;
    let mut health = aged + rng.triangular() * HEALTH_NOISE_SCALE;
    if rng.chance(SURPRISE_FAILURE_RATE) {
        health = rng.range(SURPRISE_HEALTH_MIN, SURPRISE_HEALTH_MAX);
    }
    round1(health.clamp(HEALTH_MIN, HEALTH_MAX))
}

fn sample_failure_mode(rng: &mut LcgRng, age: u32) -> FailureMode {
    let eligible: Vec<&FailureModeProfile> =
        FAILURE_MODES.iter().filter(|p| age >= p.min_age).collect();
    pick_weighted_by(rng, &eligible, |p| p.weight)
        .map(|p| p.mode)
        .unwrap_or(DEFAULT_FAILURE_MODE)
}

fn sample_time_to_failure(rng: &mut LcgRng, health: f64) -> u32 {
    let (lo, hi) = if health < 30.0 {
        (1, 6)
    } else if health < 50.0 {
        (6, 24)
    } else if health < 70.0 {
        (18, 54)
    } else {
        (36, 96)
    };
    rng.int_range(lo, hi)
}

fn sample_repair_hours(rng: &mut LcgRng, mode: FailureMode) -> u32 {
    if mode.is_heavy() {
        rng.int_range(72, 168)
    } else {
        rng.int_range(8, 36)
    }
}

pub fn format_time_to_failure(months: u32) -> String {
    match months {
        1 => "1 month".into(),
        m if m < 24 => format!("{m} months"),
        m => format!("{:.1} years", f64::from(m) / 12.0),
    }
}

/// Step function of health.
pub fn repair_window(health: f64) -> &'static str {
    if health < 30.0 {
        "Immediate (within 2 weeks)"
    } else if health < 50.0 {
        "Within 30 days"
    } else if health < 70.0 {
        "Within 90 days"
    } else {
        "Next planned outage (6-12 months)"
    }
}

fn format_repair_duration(hours: u32, mode: FailureMode) -> String {
    if mode.is_heavy() {
        format!("{} days", hours.div_ceil(24))
    } else {
        format!("{hours} hours")
    }
}

impl GridAsset {
    /// Replacement cost of a unit of this asset's voltage class.
    pub fn replacement_cost(&self) -> f64 {
        voltage_class(&self.voltage_class).replacement_cost
    }

    /// Verify the documented bounds and derivation rules. A failure here
    /// is a generator defect, not bad input.
    pub fn check_invariants(&self, region: &RegionConfig) -> FleetResult<()> {
        let violation = |detail: String| {
            Err(FleetError::InvariantViolation { tag: self.tag.clone(), detail })
        };
        if !(HEALTH_MIN..=HEALTH_MAX).contains(&self.health_index) {
            return violation(format!(
                "health {} outside [{HEALTH_MIN}, {HEALTH_MAX}]",
                self.health_index
            ));
        }
        if !(AGE_MIN..=AGE_MAX).contains(&self.age_years) {
            return violation(format!("age {} outside [{AGE_MIN}, {AGE_MAX}]", self.age_years));
        }
        if self.failure_mode != DEFAULT_FAILURE_MODE
            && !self.failure_mode.is_eligible_at(self.age_years)
        {
            return violation(format!(
                "{} requires age {} but asset is {}",
                self.failure_mode, self.failure_mode.min_age(), self.age_years
            ));
        }
        let expected = RiskTrend::classify(self.health_index, self.load_factor, self.age_years);
        if self.risk_trend != expected {
            return violation(format!("risk trend {:?} should be {expected:?}", self.risk_trend));
        }
        if !region.bbox.contains(self.lat, self.lng) {
            return violation(format!(
                "({}, {}) outside region {}",
                self.lat, self.lng, region.region_id
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FleetConfig;

    #[test]
    fn risk_trend_rule() {
        assert_eq!(RiskTrend::classify(35.0, 75.0, 10), RiskTrend::Critical);
        assert_eq!(RiskTrend::classify(35.0, 60.0, 10), RiskTrend::Degrading);
        assert_eq!(RiskTrend::classify(80.0, 65.0, 40), RiskTrend::Degrading);
        assert_eq!(RiskTrend::classify(80.0, 65.0, 30), RiskTrend::Stable);
        assert_eq!(RiskTrend::classify(60.0, 90.0, 5), RiskTrend::Stable);
    }

    #[test]
    fn time_to_failure_formatting() {
        assert_eq!(format_time_to_failure(1), "1 month");
        assert_eq!(format_time_to_failure(18), "18 months");
        assert_eq!(format_time_to_failure(30), "2.5 years");
    }

    #[test]
    fn young_assets_fall_back_to_default_mode() {
        let mut rng = LcgRng::new(17);
        for _ in 0..200 {
            assert_eq!(sample_failure_mode(&mut rng, 2), DEFAULT_FAILURE_MODE);
        }
    }

    #[test]
    fn health_stays_in_bounds_for_every_age() {
        let mut rng = LcgRng::new(2718);
        for age in AGE_MIN..=AGE_MAX {
            for _ in 0..200 {
                let h = sample_health(&mut rng, age);
                assert!((HEALTH_MIN..=HEALTH_MAX).contains(&h), "health {h} at age {age}");
            }
        }
    }

    #[test]
    fn surprise_failures_hit_young_assets() {
        let mut rng = LcgRng::new(1_000_003);
        let low = (0..5_000).filter(|_| sample_health(&mut rng, 3) < 45.0).count();
        // Age 3 alone never drops below ~80; only the surprise coin can.
        assert!(low > 50 && low < 400, "surprise rate off: {low}/5000");
    }

    #[test]
    fn ages_favor_mid_life() {
        let mut rng = LcgRng::new(55);
        let ages: Vec<u32> = (0..10_000).map(|_| sample_age(&mut rng)).collect();
        let mid = ages.iter().filter(|a| (16..=35).contains(*a)).count();
        let tail = ages.iter().filter(|a| **a > 50).count();
        assert!(mid > 5_000, "mid-life share too small: {mid}");
        assert!(tail > 100 && tail < 800, "tail share off: {tail}");
    }

    #[test]
    fn synthesized_asset_satisfies_invariants() {
        let config = FleetConfig::default();
        let region = config.region_for_tag("BGE-0042").unwrap();
        let asset = synthesize_asset("BGE-0042", region);
        asset.check_invariants(region).unwrap();
        assert_eq!(asset.materials.len(), asset.failure_mode.profile().materials.len());
    }
}
