//! Decision scenarios built from an asset and its diagnostic.

use gridfleet_core::{
    config::FleetConfig,
    fleet::{default_fleet, FleetGenerator},
    scenario_synthesizer::{
        recommend, ScenarioOptionKind, MAX_FAILURE_PROBABILITY, MIN_FAILURE_PROBABILITY,
    },
};

#[test]
fn three_options_in_fixed_order() {
    let g = FleetGenerator::new(FleetConfig::default());
    for asset in default_fleet().assets.iter().take(50) {
        let d = g.diagnostic(asset);
        let s = g.scenario(asset, &d);
        let kinds: Vec<ScenarioOptionKind> = s.options.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, [
            ScenarioOptionKind::RunToFailure,
            ScenarioOptionKind::TargetedRepair,
            ScenarioOptionKind::FullReplacement,
        ]);
        assert_eq!(s.asset_tag, asset.tag);
        assert_eq!(s.recommended, recommend(&s.options));
        let p = s.failure_probability_12mo;
        assert!((MIN_FAILURE_PROBABILITY..=MAX_FAILURE_PROBABILITY).contains(&p), "p12={p}");
        assert_eq!(s.options[0].capital_cost, 0.0);
        assert_eq!(s.options[0].net_benefit, 0.0);
        assert!(s.narrative.contains(&asset.tag));
    }
}

#[test]
fn failing_assets_justify_intervention() {
    let g = FleetGenerator::new(FleetConfig::default());
    let mut asset = g.asset("COMED-0002").unwrap();
    asset.health_index = 15.0;
    let d = g.diagnostic(&asset);
    let s = g.scenario(&asset, &d);
    assert_ne!(s.recommended, ScenarioOptionKind::RunToFailure,
        "p12={} options={:?}", s.failure_probability_12mo, s.options);
}

#[test]
fn healthy_assets_run_to_failure() {
    let g = FleetGenerator::new(FleetConfig::default());
    let mut asset = g.asset("COMED-0002").unwrap();
    asset.health_index = 97.0;
    let d = g.diagnostic(&asset);
    let s = g.scenario(&asset, &d);
    assert_eq!(s.recommended, ScenarioOptionKind::RunToFailure, "options={:?}", s.options);
}

#[test]
fn interventions_reduce_expected_failure_cost() {
    let g = FleetGenerator::new(FleetConfig::default());
    let asset = &default_fleet().assets[10];
    let s = g.scenario(asset, &g.diagnostic(asset));
    let [rtf, repair, replace] = [&s.options[0], &s.options[1], &s.options[2]];
    assert!(repair.expected_failure_cost <= rtf.expected_failure_cost);
    assert!(replace.expected_failure_cost <= repair.expected_failure_cost);
    assert!(replace.capital_cost > repair.capital_cost);
}
