//! What-if decision scenarios: run-to-failure vs targeted repair vs full
//! replacement, costed from the asset and its diagnostic.
//!
//! DRAW ORDER (Scenario channel): replacement jitter, repair jitter,
//! failure-cost jitter. Everything else is a pure function of the inputs.

use crate::{
    asset_synthesizer::GridAsset,
    diagnostic_synthesizer::DiagnosticRecord,
    rng::{Channel, ChannelBank},
    types::round1,
};
use serde::{Deserialize, Serialize};

/// USD per customer-hour of unserved load.
pub const VALUE_OF_LOST_LOAD: f64 = 35.0;
/// An in-service failure costs more than a planned replacement: emergency
/// procurement, collateral damage, cleanup.
pub const FAILURE_REPLACEMENT_MULTIPLIER: f64 = 1.6;
pub const COST_JITTER: f64 = 0.10;

/// Repair cost as a share of replacement cost.
const HEAVY_REPAIR_SHARE: f64 = 0.30;
const LIGHT_REPAIR_SHARE: f64 = 0.07;
/// Share of 12-month failure risk removed by each intervention.
const HEAVY_REPAIR_RISK_REDUCTION: f64 = 0.50;
const LIGHT_REPAIR_RISK_REDUCTION: f64 = 0.65;
const REPLACEMENT_RISK_REDUCTION: f64 = 0.95;
/// Hours until field switching back-feeds most customers after a failure.
const RESTORATION_HOURS: f64 = 4.0;
/// Share of the repair duration the remaining customers stay dark.
const STRANDED_REPAIR_SHARE: f64 = 0.1;
pub const MIN_FAILURE_PROBABILITY: f64 = 0.002;
pub const MAX_FAILURE_PROBABILITY: f64 = 0.95;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioOptionKind {
    RunToFailure,
    TargetedRepair,
    FullReplacement,
}

#[rustfmt::skip]
impl ScenarioOptionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::RunToFailure    => "Run to failure",
            Self::TargetedRepair  => "Targeted repair",
            Self::FullReplacement => "Full replacement",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioOption {
    pub kind: ScenarioOptionKind,
    pub label: String,
    pub capital_cost: f64,
    /// Probability-weighted cost of an in-service failure over 12 months.
    pub expected_failure_cost: f64,
    pub expected_customer_outage_hours: f64,
    pub risk_reduction_pct: f64,
    /// Avoided expected failure cost minus capital cost, relative to
    /// running to failure.
    pub net_benefit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionScenario {
    pub asset_tag: String,
    pub headline: String,
    pub failure_probability_12mo: f64,
    pub options: Vec<ScenarioOption>,
    pub recommended: ScenarioOptionKind,
    pub narrative: String,
}

/// 12-month failure probability from health and diagnostic confidence.
/// Quadratic in wear, scaled by diagnostic confidence, held in
/// [MIN_FAILURE_PROBABILITY, MAX_FAILURE_PROBABILITY].
pub fn failure_probability(health: f64, confidence: f64) -> f64 {
    let wear = ((100.0 - health) / 100.0).clamp(0.0, 1.0);
    let certainty = 0.6 + 0.4 * (confidence / 100.0).clamp(0.0, 1.0);
    let p = (1.4 * wear * wear * certainty).clamp(MIN_FAILURE_PROBABILITY, MAX_FAILURE_PROBABILITY);
    (p * 1000.0).round() / 1000.0
}

/// Highest net benefit wins; on a tie the earlier option is kept.
pub fn recommend(options: &[ScenarioOption]) -> ScenarioOptionKind {
    let mut best: Option<&ScenarioOption> = None;
    for option in options {
        match best {
            Some(b) if option.net_benefit <= b.net_benefit => {}
            _ => best = Some(option),
        }
    }
    best.map(|o| o.kind).unwrap_or(ScenarioOptionKind::RunToFailure)
}

pub fn synthesize_scenario(asset: &GridAsset, diagnostic: &DiagnosticRecord) -> DecisionScenario {
    let mut rng = ChannelBank::for_tag(&asset.tag).for_channel(Channel::Scenario);
    let mut jitter = || rng.range(1.0 - COST_JITTER, 1.0 + COST_JITTER);

    let heavy = asset.failure_mode.is_heavy();
    let replacement_cost = asset.replacement_cost() * jitter();
    let repair_share = if heavy { HEAVY_REPAIR_SHARE } else { LIGHT_REPAIR_SHARE };
    let repair_cost = replacement_cost * repair_share * jitter();

    let customers = f64::from(asset.customers_served);
    let outage_hours =
        RESTORATION_HOURS + f64::from(asset.repair_duration_hours) * STRANDED_REPAIR_SHARE;
    let failure_cost = (replacement_cost * FAILURE_REPLACEMENT_MULTIPLIER
        + customers * outage_hours * VALUE_OF_LOST_LOAD)
        * jitter();

    let confidence = diagnostic.cross_validation.confidence;
    let p = failure_probability(asset.health_index, confidence);
    let baseline_failure_cost = p * failure_cost;

    let option = |kind: ScenarioOptionKind, capital: f64, reduction: f64| {
        let residual = p * (1.0 - reduction);
        let expected = residual * failure_cost;
        ScenarioOption {
            kind,
            label: kind.label().to_string(),
            capital_cost: capital.round(),
            expected_failure_cost: expected.round(),
            expected_customer_outage_hours: round1(residual * customers * outage_hours),
            risk_reduction_pct: round1(reduction * 100.0),
            net_benefit: (baseline_failure_cost - expected - capital).round(),
        }
    };
    let repair_reduction =
        if heavy { HEAVY_REPAIR_RISK_REDUCTION } else { LIGHT_REPAIR_RISK_REDUCTION };
    let options = vec![
        option(ScenarioOptionKind::RunToFailure, 0.0, 0.0),
        option(ScenarioOptionKind::TargetedRepair, repair_cost, repair_reduction),
        option(ScenarioOptionKind::FullReplacement, replacement_cost, REPLACEMENT_RISK_REDUCTION),
    ];
    let recommended = recommend(&options);

    let headline = format!(
        "{}: {:.0}% chance of in-service failure within 12 months",
        asset.name,
        p * 100.0
    );
    let narrative = narrative(asset, diagnostic, p, failure_cost, &options, recommended);

    log::debug!("scenario: {} recommends {:?} (p12={p})", asset.tag, recommended);
    DecisionScenario {
        asset_tag: asset.tag.clone(),
        headline,
        failure_probability_12mo: p,
        options,
        recommended,
        narrative,
    }
}

fn narrative(
    asset: &GridAsset,
    diagnostic: &DiagnosticRecord,
    p: f64,
    failure_cost: f64,
    options: &[ScenarioOption],
    recommended: ScenarioOptionKind,
) -> String {
    let chosen = options.iter().find(|o| o.kind == recommended);
    let mut text = format!(
        "{} ({}, {} customers) is at health {:.1} with {} as the predicted failure mode. \
         {} at {:.1}% confidence. An in-service failure would cost about ${:.0}k \
         including unserved load; the 12-month failure probability is {:.0}%.",
        asset.tag,
        asset.voltage_class,
        asset.customers_served,
        asset.health_index,
        asset.failure_mode,
        diagnostic.cross_validation.label,
        diagnostic.cross_validation.confidence,
        failure_cost / 1000.0,
        p * 100.0,
    );
    if let Some(o) = chosen {
        text.push_str(&format!(
            " Recommended: {} (capital ${:.0}k, net benefit ${:.0}k, risk reduced {:.0}%).",
            o.label,
            o.capital_cost / 1000.0,
            o.net_benefit / 1000.0,
            o.risk_reduction_pct,
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(kind: ScenarioOptionKind, net_benefit: f64) -> ScenarioOption {
        ScenarioOption {
            kind,
            label: kind.label().into(),
            capital_cost: 0.0,
            expected_failure_cost: 0.0,
            expected_customer_outage_hours: 0.0,
            risk_reduction_pct: 0.0,
            net_benefit,
        }
    }

    #[test]
    fn probability_rises_with_wear_and_confidence() {
        assert!(failure_probability(25.0, 85.0) > failure_probability(60.0, 85.0));
        assert!(failure_probability(40.0, 95.0) > failure_probability(40.0, 20.0));
        assert_eq!(failure_probability(98.0, 50.0), MIN_FAILURE_PROBABILITY);
        assert_eq!(failure_probability(0.0, 100.0), MAX_FAILURE_PROBABILITY);
    }

    #[test]
    fn highest_net_benefit_is_recommended() {
        let options = [
            opt(ScenarioOptionKind::RunToFailure, 0.0),
            opt(ScenarioOptionKind::TargetedRepair, 12_000.0),
            opt(ScenarioOptionKind::FullReplacement, 9_000.0),
        ];
        assert_eq!(recommend(&options), ScenarioOptionKind::TargetedRepair);
    }

    #[test]
    fn ties_keep_the_earlier_option() {
        let options = [
            opt(ScenarioOptionKind::RunToFailure, 0.0),
            opt(ScenarioOptionKind::TargetedRepair, 5_000.0),
            opt(ScenarioOptionKind::FullReplacement, 5_000.0),
        ];
        assert_eq!(recommend(&options), ScenarioOptionKind::TargetedRepair);

        let all_negative = [
            opt(ScenarioOptionKind::RunToFailure, 0.0),
            opt(ScenarioOptionKind::TargetedRepair, -1.0),
            opt(ScenarioOptionKind::FullReplacement, -2.0),
        ];
        assert_eq!(recommend(&all_negative), ScenarioOptionKind::RunToFailure);
    }
}
