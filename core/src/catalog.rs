//! Static lookup tables for the attribute correlator.

use crate::sampler::Weighted;

/// One rung of the age distribution. `cumulative` thresholds are walked
/// in order; the first one above the roll picks the band.
#[derive(Debug)]
pub struct AgeBand {
    pub cumulative: f64,
    pub min_years: u32,
    pub max_years: u32,
}

/// Skewed toward 15-35 year assets with a thin tail past 50.
#[rustfmt::skip]
pub const AGE_BANDS: &[AgeBand] = &[
    AgeBand { cumulative: 0.04, min_years: 1,  max_years: 5  },
    AgeBand { cumulative: 0.11, min_years: 6,  max_years: 10 },
    AgeBand { cumulative: 0.21, min_years: 11, max_years: 15 },
    AgeBand { cumulative: 0.34, min_years: 16, max_years: 20 },
    AgeBand { cumulative: 0.49, min_years: 21, max_years: 25 },
    AgeBand { cumulative: 0.63, min_years: 26, max_years: 30 },
    AgeBand { cumulative: 0.75, min_years: 31, max_years: 35 },
    AgeBand { cumulative: 0.84, min_years: 36, max_years: 40 },
    AgeBand { cumulative: 0.91, min_years: 41, max_years: 45 },
    AgeBand { cumulative: 0.96, min_years: 46, max_years: 50 },
    AgeBand { cumulative: 0.99, min_years: 51, max_years: 55 },
    AgeBand { cumulative: 1.00, min_years: 56, max_years: 60 },
];

#[derive(Debug)]
pub struct VoltageClass {
    pub label: &'static str,
    pub weight: f64,
    pub customers_min: u32,
    pub customers_max: u32,
    /// Installed replacement cost of a unit in this class, USD.
    pub replacement_cost: f64,
}

impl Weighted for VoltageClass {
    fn weight(&self) -> f64 {
        self.weight
    }
}

#[rustfmt::skip]
pub const VOLTAGE_CLASSES: &[VoltageClass] = &[
    VoltageClass { label: "12.47 kV",  weight: 0.34, customers_min: 600,    customers_max: 2_800,   replacement_cost: 650_000.0   },
    VoltageClass { label: "34.5 kV",   weight: 0.26, customers_min: 2_000,  customers_max: 9_000,   replacement_cost: 1_400_000.0 },
    VoltageClass { label: "69 kV",     weight: 0.18, customers_min: 6_000,  customers_max: 22_000,  replacement_cost: 2_600_000.0 },
    VoltageClass { label: "138 kV",    weight: 0.15, customers_min: 15_000, customers_max: 60_000,  replacement_cost: 4_800_000.0 },
    VoltageClass { label: "345 kV",    weight: 0.07, customers_min: 50_000, customers_max: 220_000, replacement_cost: 9_500_000.0 },
];

pub fn voltage_class(label: &str) -> &'static VoltageClass {
    VOLTAGE_CLASSES
        .iter()
        .find(|v| v.label == label)
        .unwrap_or(&VOLTAGE_CLASSES[0])
}

// ── Health shaping ──────────────────────────────────────────────────

pub const HEALTH_MIN: f64 = 12.0;
pub const HEALTH_MAX: f64 = 98.0;
/// Health at age zero before noise.
pub const HEALTH_BASELINE: f64 = 99.0;
/// Points of health lost per year of age.
pub const HEALTH_DECAY_PER_YEAR: f64 = 1.15;
/// Scale on the triangular noise (so ±15 at the extremes).
pub const HEALTH_NOISE_SCALE: f64 = 10.0;
/// Probability an asset is a surprise early failure.
pub const SURPRISE_FAILURE_RATE: f64 = 0.04;
pub const SURPRISE_HEALTH_MIN: f64 = 15.0;
pub const SURPRISE_HEALTH_MAX: f64 = 40.0;

pub const AGE_MIN: u32 = 1;
pub const AGE_MAX: u32 = 60;

/// Upper bound of the random addition on top of the density baseline.
pub const LOAD_SPREAD: f64 = 30.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_bands_are_contiguous_and_complete() {
        let mut expected_min = AGE_MIN;
        let mut last_cum = 0.0;
        for band in AGE_BANDS {
            assert_eq!(band.min_years, expected_min);
            assert!(band.cumulative > last_cum);
            expected_min = band.max_years + 1;
            last_cum = band.cumulative;
        }
        assert_eq!(expected_min - 1, AGE_MAX);
        assert_eq!(last_cum, 1.0);
    }

    #[test]
    fn unknown_voltage_label_falls_back() {
        assert_eq!(voltage_class("999 kV").label, "12.47 kV");
        assert_eq!(voltage_class("138 kV").label, "138 kV");
    }
}
