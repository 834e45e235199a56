//! Quarterly degradation time series.
//!
//! Four records, oldest first, ending at the as-of quarter. Each quarter's
//! health is pinned to `min(100, current + step * quarters_ago)`, so the
//! series can only move toward the present-day health. Every measured
//! quantity is then baseline-plus-noise scaled by a gas multiplier that
//! grows as the quarter's health falls.
//!
//! DRAW ORDER per quarter (HealthRecords channel):
//!   7 gases (H2, CH4, C2H6, C2H4, C2H2, CO, CO2), moisture, acidity,
//!   dielectric, IFT, power factor, furan, load, top-oil.

use crate::{
    asset_synthesizer::GridAsset,
    failure_mode::KeyGas,
    rng::{Channel, ChannelBank, LcgRng},
    types::{round1, round2},
};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

pub const QUARTERS: usize = 4;

/// One asset's quarterly records, oldest first.
pub type HealthSeries = [HealthRecord; QUARTERS];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Condition {
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Fair")]
    Fair,
    #[serde(rename = "Poor")]
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
    #[serde(rename = "End of Life")]
    EndOfLife,
}

impl Condition {
    pub fn from_health(health: f64) -> Self {
        if health >= 80.0 {
            Self::Good
        } else if health >= 60.0 {
            Self::Fair
        } else if health >= 40.0 {
            Self::Poor
        } else if health >= 25.0 {
            Self::VeryPoor
        } else {
            Self::EndOfLife
        }
    }

    #[rustfmt::skip]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good      => "Good",
            Self::Fair      => "Fair",
            Self::Poor      => "Poor",
            Self::VeryPoor  => "Very Poor",
            Self::EndOfLife => "End of Life",
        }
    }
}

/// Dissolved-gas analysis, ppm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DissolvedGases {
    pub hydrogen: f64,
    pub methane: f64,
    pub ethane: f64,
    pub ethylene: f64,
    pub acetylene: f64,
    pub carbon_monoxide: f64,
    pub carbon_dioxide: f64,
    /// Total dissolved combustible gas (everything but CO2).
    pub tdcg: f64,
}

#[rustfmt::skip]
impl DissolvedGases {
    pub fn get(&self, gas: KeyGas) -> f64 {
        match gas {
            KeyGas::Hydrogen       => self.hydrogen,
            KeyGas::Methane        => self.methane,
            KeyGas::Ethane         => self.ethane,
            KeyGas::Ethylene       => self.ethylene,
            KeyGas::Acetylene      => self.acetylene,
            KeyGas::CarbonMonoxide => self.carbon_monoxide,
            KeyGas::CarbonDioxide  => self.carbon_dioxide,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthRecord {
    pub timestamp: NaiveDate,
    pub quarter: String,
    pub gases: DissolvedGases,
    pub moisture_ppm: f64,
    pub acidity_mg_koh_g: f64,
    pub dielectric_strength_kv: f64,
    pub interfacial_tension_dynes_cm: f64,
    pub color_index: f64,
    pub power_factor_pct: f64,
    /// 2-furaldehyde, ppb.
    pub furan_ppb: f64,
    pub top_oil_temp_c: f64,
    pub hot_spot_temp_c: f64,
    pub load_percent: f64,
    pub health_index: f64,
    pub condition: Condition,
    pub remaining_life_years: f64,
}

struct GasProfile {
    gas: KeyGas,
    baseline: f64,
    exponent: f64,
    ceiling: f64,
}

/// Walked in draw order.
#[rustfmt::skip]
const GAS_PROFILES: &[GasProfile] = &[
    GasProfile { gas: KeyGas::Hydrogen,       baseline: 35.0,   exponent: 1.4, ceiling: 2_500.0  },
    GasProfile { gas: KeyGas::Methane,        baseline: 25.0,   exponent: 1.3, ceiling: 1_500.0  },
    GasProfile { gas: KeyGas::Ethane,         baseline: 20.0,   exponent: 1.2, ceiling: 1_200.0  },
    GasProfile { gas: KeyGas::Ethylene,       baseline: 12.0,   exponent: 1.5, ceiling: 1_500.0  },
    GasProfile { gas: KeyGas::Acetylene,      baseline: 0.4,    exponent: 1.5, ceiling: 400.0    },
    GasProfile { gas: KeyGas::CarbonMonoxide, baseline: 180.0,  exponent: 1.1, ceiling: 2_000.0  },
    GasProfile { gas: KeyGas::CarbonDioxide,  baseline: 1500.0, exponent: 1.0, ceiling: 15_000.0 },
];

/// Health points recovered per quarter going back in time.
pub fn degradation_step(current_health: f64) -> f64 {
    if current_health < 40.0 {
        6.0
    } else if current_health < 60.0 {
        4.0
    } else {
        2.0
    }
}

/// Lower health, higher gas. 1.0 at full health, ~8 at the floor.
pub fn gas_multiplier(health: f64) -> f64 {
    100.0 / health.max(12.0)
}

/// Four quarterly records, oldest first.
pub fn synthesize_health_records(asset: &GridAsset, as_of: NaiveDate) -> HealthSeries {
    let mut rng = ChannelBank::for_tag(&asset.tag).for_channel(Channel::HealthRecords);
    let step = degradation_step(asset.health_index);
    let key_gas = asset.failure_mode.profile().key_gas;

    // from_fn fills in index order, so draws stay oldest-quarter first.
    std::array::from_fn(|i| {
        let quarters_ago = (QUARTERS - 1 - i) as u32;
        let health = (asset.health_index + step * f64::from(quarters_ago)).min(100.0);
        let timestamp = as_of
            .checked_sub_months(Months::new(3 * quarters_ago))
            .unwrap_or(as_of);
        quarter_record(&mut rng, asset, key_gas, health, timestamp)
    })
}

fn quarter_record(
    rng: &mut LcgRng,
    asset: &GridAsset,
    key_gas: KeyGas,
    health: f64,
    timestamp: NaiveDate,
) -> HealthRecord {
    let gm = gas_multiplier(health);
    let wear = 100.0 - health;

    let mut ppm = [0.0; 7];
    for (slot, profile) in ppm.iter_mut().zip(GAS_PROFILES) {
        let mut value = profile.baseline * gm.powf(profile.exponent) * rng.range(0.85, 1.15);
        if profile.gas == key_gas {
            value *= 2.0 * gm;
        }
        *slot = round1(value.min(profile.ceiling));
    }
    let [hydrogen, methane, ethane, ethylene, acetylene, carbon_monoxide, carbon_dioxide] = ppm;
    let tdcg = round1(hydrogen + methane + ethane + ethylene + acetylene + carbon_monoxide);

    let moisture = (8.0 + wear * 0.3 + rng.triangular() * 2.0).clamp(3.0, 60.0);
    let acidity = (0.02 + wear * 0.004 + rng.range(0.0, 0.02)).clamp(0.01, 0.6);
    let dielectric = (62.0 - wear * 0.38 + rng.triangular() * 2.0).clamp(18.0, 70.0);
    let ift = (40.0 - wear * 0.22 + rng.triangular()).clamp(12.0, 45.0);
    let color = (0.5 + wear * 0.045).clamp(0.5, 8.0);
    let power_factor = (0.08 + wear * 0.012 + rng.range(0.0, 0.05)).clamp(0.05, 2.5);
    let furan = ((30.0 + f64::from(asset.age_years) * 12.0) * gm.powf(1.2) * rng.range(0.85, 1.15))
        .min(8_000.0);
    let load = (asset.load_factor + rng.triangular() * 4.0).clamp(10.0, 130.0);
    let top_oil = 35.0 + load * 0.35 + (gm - 1.0) * 2.0 + rng.triangular() * 2.0;
    let hot_spot = top_oil + 10.0 + load * 0.18;

    HealthRecord {
        timestamp,
        quarter: format!("{}-Q{}", timestamp.year(), timestamp.month0() / 3 + 1),
        gases: DissolvedGases {
            hydrogen,
            methane,
            ethane,
            ethylene,
            acetylene,
            carbon_monoxide,
            carbon_dioxide,
            tdcg,
        },
        moisture_ppm: round1(moisture),
        acidity_mg_koh_g: round2(acidity),
        dielectric_strength_kv: round1(dielectric),
        interfacial_tension_dynes_cm: round1(ift),
        color_index: round1(color),
        power_factor_pct: round2(power_factor),
        furan_ppb: round1(furan),
        top_oil_temp_c: round1(top_oil),
        hot_spot_temp_c: round1(hot_spot),
        load_percent: round1(load),
        health_index: round1(health),
        condition: Condition::from_health(health),
        remaining_life_years: remaining_life_years(health),
    }
}

pub fn remaining_life_years(health: f64) -> f64 {
    round1(((health - 10.0).max(0.0) / 90.0 * 35.0).max(0.5))
}
