//! Fleet composition: which region each slot belongs to, tag numbering,
//! summary statistics, and the entry points that deepen one asset.
//!
//! COMPOSITION (fixed):
//!   - One fleet stream, seeded by `fleet_seed`, draws one region per slot
//!     by fleet share. Nothing else reads that stream.
//!   - Tags are numbered per region in slot order: COMED-0001, COMED-0002...
//!   - Each asset is then synthesized from its tag alone, so a standalone
//!     `asset(tag)` is identical to the fleet's copy.

use crate::{
    asset_synthesizer::{synthesize_asset, GridAsset, RiskTrend},
    config::FleetConfig,
    diagnostic_synthesizer::{synthesize_diagnostic, DiagnosticRecord},
    error::FleetResult,
    health_record_synthesizer::{synthesize_health_records, HealthSeries},
    name_generator::NameGenerator,
    rng::LcgRng,
    sampler::pick_weighted,
    scenario_synthesizer::{synthesize_scenario, DecisionScenario},
    types::round1,
    work_order_synthesizer::{synthesize_work_orders, WorkOrder},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Age above which an asset counts as "aged" in the summary.
pub const AGED_YEARS: u32 = 40;
pub const CRITICAL_HEALTH: f64 = 40.0;
pub const POOR_HEALTH: f64 = 60.0;

#[rustfmt::skip]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FleetSummary {
    pub total_assets:       usize,
    pub total_customers:    u64,
    pub avg_age:            f64,
    pub avg_health:         f64,
    pub avg_load:           f64,
    pub aged_count:         usize,
    pub critical_count:     usize,
    pub poor_count:         usize,
    pub by_risk_trend:      BTreeMap<String, usize>,
    pub by_failure_mode:    BTreeMap<String, usize>,
    pub by_region:          BTreeMap<String, usize>,
}

impl FleetSummary {
    pub fn from_assets(assets: &[GridAsset]) -> Self {
        let mut s = FleetSummary {
            total_assets: assets.len(),
            ..Default::default()
        };
        if assets.is_empty() {
            return s;
        }

        let (mut age, mut health, mut load) = (0.0, 0.0, 0.0);
        for a in assets {
            s.total_customers += u64::from(a.customers_served);
            age += f64::from(a.age_years);
            health += a.health_index;
            load += a.load_factor;
            if a.age_years > AGED_YEARS {
                s.aged_count += 1;
            }
            if a.health_index < CRITICAL_HEALTH {
                s.critical_count += 1;
            }
            if a.health_index < POOR_HEALTH {
                s.poor_count += 1;
            }
            *s.by_risk_trend.entry(trend_key(a.risk_trend).to_string()).or_default() += 1;
            *s.by_failure_mode.entry(a.failure_mode.label().to_string()).or_default() += 1;
            *s.by_region.entry(a.region_id.clone()).or_default() += 1;
        }

        let n = assets.len() as f64;
        s.avg_age = round1(age / n);
        s.avg_health = round1(health / n);
        s.avg_load = round1(load / n);
        s
    }
}

#[rustfmt::skip]
fn trend_key(trend: RiskTrend) -> &'static str {
    match trend {
        RiskTrend::Stable    => "stable",
        RiskTrend::Degrading => "degrading",
        RiskTrend::Critical  => "critical",
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fleet {
    pub assets: Vec<GridAsset>,
    pub stats:  FleetSummary,
}

impl Fleet {
    pub fn find(&self, tag: &str) -> Option<&GridAsset> {
        self.assets.iter().find(|a| a.tag == tag)
    }
}

pub struct FleetGenerator {
    config: FleetConfig,
}

impl FleetGenerator {
    pub fn new(config: FleetConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Tags for every fleet slot, in slot order.
    pub fn fleet_tags(&self) -> Vec<String> {
        let mut counters: BTreeMap<&str, usize> = BTreeMap::new();
        let mut rng = LcgRng::new(u64::from(self.config.fleet_seed)).with_name("fleet");

        let mut tags = Vec::with_capacity(self.config.fleet_size);
        for _ in 0..self.config.fleet_size {
            let Some(region) = pick_weighted(&mut rng, &self.config.regions) else {
                break;
            };
            let n = counters.entry(region.tag_prefix.as_str()).or_insert(0);
            *n += 1;
            tags.push(NameGenerator::format_tag(&region.tag_prefix, *n));
        }
        tags
    }

    pub fn generate_fleet(&self) -> Fleet {
        let mut assets = Vec::with_capacity(self.config.fleet_size);
        for tag in self.fleet_tags() {
            let Ok(region) = self.config.region_for_tag(&tag) else {
                log::warn!("fleet: no region for generated tag {tag}");
                continue;
            };
            let asset = synthesize_asset(&tag, region);
            if let Err(e) = asset.check_invariants(region) {
                log::warn!("fleet: {e}");
            }
            assets.push(asset);
        }

        let stats = FleetSummary::from_assets(&assets);
        for (region, count) in &stats.by_region {
            log::debug!("fleet: region {region} has {count} assets");
        }
        log::info!(
            "Fleet built: {} assets across {} regions (seed {}, as of {})",
            stats.total_assets,
            stats.by_region.len(),
            self.config.fleet_seed,
            self.config.as_of,
        );
        Fleet { assets, stats }
    }

    /// Regenerate one asset from its tag, without building the fleet.
    pub fn asset(&self, tag: &str) -> FleetResult<GridAsset> {
        let region = self.config.region_for_tag(tag)?;
        Ok(synthesize_asset(tag, region))
    }

    pub fn health_records(&self, asset: &GridAsset) -> HealthSeries {
        synthesize_health_records(asset, self.config.as_of)
    }

    pub fn diagnostic(&self, asset: &GridAsset) -> DiagnosticRecord {
        synthesize_diagnostic(asset, self.config.as_of)
    }

    pub fn work_orders(&self, asset: &GridAsset) -> Vec<WorkOrder> {
        synthesize_work_orders(asset, self.config.as_of)
    }

    pub fn scenario(&self, asset: &GridAsset, diagnostic: &DiagnosticRecord) -> DecisionScenario {
        synthesize_scenario(asset, diagnostic)
    }
}

static DEFAULT_FLEET: OnceLock<Fleet> = OnceLock::new();

/// The built-in fleet, built on first use and shared for the life of the
/// process. Always equal to `FleetGenerator::new(FleetConfig::default()).generate_fleet()`.
pub fn default_fleet() -> &'static Fleet {
    DEFAULT_FLEET.get_or_init(|| FleetGenerator::new(FleetConfig::default()).generate_fleet())
}
