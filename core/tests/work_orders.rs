//! 24-month work-order history.

use chrono::{Months, NaiveDate};
use gridfleet_core::{
    asset_synthesizer::GridAsset,
    config::FleetConfig,
    fleet::{default_fleet, FleetGenerator},
    work_order_synthesizer::{
        synthesize_work_orders, WorkOrder, WorkOrderCategory, WorkOrderStatus,
    },
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::collections::HashSet;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
}

fn count_titled(orders: &[WorkOrder], prefix: &str) -> usize {
    orders.iter().filter(|o| o.title.starts_with(prefix)).count()
}

fn asset_with_health(g: &FleetGenerator, tag: &str, health: f64) -> GridAsset {
    let mut asset = g.asset(tag).unwrap();
    asset.health_index = health;
    asset
}

#[test]
fn orders_are_sorted_newest_first() {
    for asset in default_fleet().assets.iter().take(60) {
        let orders = synthesize_work_orders(asset, as_of());
        assert!(orders.windows(2).all(|w| w[0].date >= w[1].date),
            "{}: work orders not sorted by date descending", asset.tag);
    }
}

#[test]
fn recurring_cadence_is_fixed_regardless_of_health() {
    let g = FleetGenerator::new(FleetConfig::default());
    for health in [98.0, 60.0, 15.0] {
        let orders = g.work_orders(&asset_with_health(&g, "COMED-0005", health));
        assert_eq!(count_titled(&orders, "Quarterly substation inspection"), 9, "health {health}");
        assert_eq!(count_titled(&orders, "Semiannual oil sampling"), 5, "health {health}");
        assert_eq!(count_titled(&orders, "Annual bushing inspection"), 2, "health {health}");
        assert_eq!(count_titled(&orders, "Cooling system service"), 2, "health {health}");
    }
}

#[test]
fn every_order_is_fully_populated() {
    for asset in default_fleet().assets.iter().take(100) {
        let orders = synthesize_work_orders(asset, as_of());
        let ids: HashSet<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids.len(), orders.len(), "{}: duplicate work order ids", asset.tag);

        let earliest = as_of().checked_sub_months(Months::new(25)).unwrap();
        for o in &orders {
            assert!(o.cost > 0.0, "{} has no cost", o.id);
            assert!(o.duration_hours > 0.0, "{} has no duration", o.id);
            assert!(!o.crew.is_empty(), "{} has no crew", o.id);
            assert!(o.date > earliest && o.date <= as_of(), "{} dated {}", o.id, o.date);
            if o.category.is_unplanned() {
                assert!(o.finding.is_some(), "{} is unplanned but has no finding", o.id);
            }
        }
    }
}

#[test]
fn unplanned_work_scales_with_poor_health() {
    let g = FleetGenerator::new(FleetConfig::default());
    let mut rng = Pcg64Mcg::seed_from_u64(2024);
    let (mut sick, mut healthy, mut healthy_emergencies) = (0usize, 0usize, 0usize);

    for _ in 0..300 {
        let tag = format!("PEPCO-{:04}", rng.gen_range(1..10_000));
        sick += g
            .work_orders(&asset_with_health(&g, &tag, 20.0))
            .iter()
            .filter(|o| o.category.is_unplanned())
            .count();
        let orders = g.work_orders(&asset_with_health(&g, &tag, 90.0));
        healthy += orders.iter().filter(|o| o.category.is_unplanned()).count();
        healthy_emergencies += orders
            .iter()
            .filter(|o| o.category == WorkOrderCategory::Emergency)
            .count();
    }

    assert!(sick > healthy, "health 20 gave {sick} unplanned orders, health 90 gave {healthy}");
    assert_eq!(healthy_emergencies, 0, "emergencies require health below 35");
}

#[test]
fn future_dated_orders_are_scheduled() {
    // Mid-month as-of so current-month events can land after it.
    let as_of = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    let mut saw_scheduled = false;
    for asset in default_fleet().assets.iter().take(40) {
        for o in synthesize_work_orders(asset, as_of) {
            if o.date > as_of {
                assert_eq!(o.status, WorkOrderStatus::Scheduled, "{}", o.id);
                saw_scheduled = true;
            } else if o.status == WorkOrderStatus::InProgress {
                assert!(o.category.is_unplanned(), "{} in progress but planned", o.id);
            } else {
                assert_eq!(o.status, WorkOrderStatus::Completed, "{}", o.id);
            }
        }
    }
    assert!(saw_scheduled, "expected at least one month-0 event after the 10th");
}
