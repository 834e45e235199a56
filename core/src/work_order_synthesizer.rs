//! 24-month maintenance history synthesis.
//!
//! Walks months 24 down to 0 before the as-of date. Every month rolls,
//! in this fixed order (WorkOrders channel):
//!   1. Quarterly inspection        (month % 3 == 0)
//!   2. Semiannual oil sampling     (month % 6 == 0)
//!   3. Annual bushing inspection   (month % 12 == 0, month != 0)
//!   4. Cooling system service      (month 12 and month 0)
//!   5. Extra preventive / inspection / test / modification
//!                                  (coin: 0.10 + 0.30 * wear)
//!   6. Corrective maintenance      (coin: 0.09 * health factor)
//!   7. Emergency de-energization   (health < 35 only; coin: 0.05 * health factor)
//! The recurring cadence (1-4) never depends on health. The finished
//! list is sorted newest first.

use crate::{
    asset_synthesizer::GridAsset,
    failure_mode::FailureMode,
    rng::{Channel, ChannelBank, LcgRng},
    sampler::pick_weighted_by,
    types::round1,
};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

pub const HISTORY_MONTHS: u32 = 24;
pub const EMERGENCY_HEALTH_CEILING: f64 = 35.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderCategory {
    Preventive,
    Corrective,
    Inspection,
    Emergency,
    Modification,
    DiagnosticTest,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    Completed,
    InProgress,
    Scheduled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkOrder {
    pub id: String,
    pub date: NaiveDate,
    pub category: WorkOrderCategory,
    pub title: String,
    pub description: String,
    pub duration_hours: f64,
    pub crew: String,
    pub status: WorkOrderStatus,
    pub finding: Option<String>,
    /// USD.
    pub cost: f64,
    pub priority: Priority,
}

impl WorkOrderCategory {
    pub fn is_unplanned(&self) -> bool {
        matches!(self, Self::Corrective | Self::Emergency)
    }
}

/// (100 - health) / 50, so 0 for a perfect asset and 2 at zero health.
pub fn health_factor(health: f64) -> f64 {
    ((100.0 - health) / 50.0).clamp(0.0, 2.0)
}

pub fn corrective_probability(health: f64) -> f64 {
    0.09 * health_factor(health)
}

pub fn emergency_probability(health: f64) -> f64 {
    if health < EMERGENCY_HEALTH_CEILING {
        0.05 * health_factor(health)
    } else {
        0.0
    }
}

pub fn extra_event_probability(health: f64) -> f64 {
    0.10 + 0.30 * (100.0 - health).clamp(0.0, 100.0) / 100.0
}

// ── Templates ─────────────────────────────────────────────────────

/// Shape of one kind of event: what it is, who does it, what it costs.
struct EventTemplate {
    category: WorkOrderCategory,
    title: &'static str,
    description: &'static str,
    crew: &'static str,
    hours: (f64, f64),
    cost: (f64, f64),
    priority: Priority,
    /// Chance a routine event records a finding.
    finding_rate: f64,
    findings: &'static [&'static str],
    /// Corrective events this failure mode makes more likely.
    mode: Option<FailureMode>,
    weight: f64,
}

const QUARTERLY_INSPECTION: EventTemplate = EventTemplate {
    category: WorkOrderCategory::Inspection,
    title: "Quarterly substation inspection",
    description: "Visual walkdown of tank, radiators, bushings, gauges and control cabinet; record counter and temperature readings.",
    crew: "Substation Inspector",
    hours: (2.0, 4.0),
    cost: (350.0, 900.0),
    priority: Priority::Low,
    finding_rate: 0.15,
    findings: &[
        "Minor oil weep at radiator flange gasket",
        "Silica gel breather 60% saturated",
        "Oil level gauge reading low against temperature curve",
        "Bird nesting material on bushing cap",
    ],
    mode: None,
    weight: 1.0,
};

const OIL_SAMPLING: EventTemplate = EventTemplate {
    category: WorkOrderCategory::Preventive,
    title: "Semiannual oil sampling (DGA and oil quality)",
    description: "Draw main tank oil sample for dissolved gas analysis, moisture, dielectric breakdown, acidity and IFT.",
    crew: "Oil Analysis Technician",
    hours: (1.5, 3.0),
    cost: (250.0, 600.0),
    priority: Priority::Medium,
    finding_rate: 0.0,
    findings: &[
        "DGA shows TDCG above IEEE C57.104 condition 1 limits; resample in 90 days",
        "Moisture in oil elevated relative to previous sample",
        "Acetylene detected at trace levels; increase sampling frequency",
        "Dielectric breakdown below service limit; recommend reconditioning",
    ],
    mode: None,
    weight: 1.0,
};

const BUSHING_INSPECTION: EventTemplate = EventTemplate {
    category: WorkOrderCategory::Preventive,
    title: "Annual bushing inspection and power factor test",
    description: "Clean porcelain, check oil level sight glasses, measure C1/C2 capacitance and power factor on all HV and LV bushings.",
    crew: "Substation Maintenance Crew",
    hours: (6.0, 10.0),
    cost: (2_500.0, 6_000.0),
    priority: Priority::Medium,
    finding_rate: 0.2,
    findings: &[
        "H2 bushing power factor up 0.1% from baseline",
        "Hairline crack in porcelain skirt on X1 bushing",
        "Bushing oil level low on H3; top-up performed",
    ],
    mode: None,
    weight: 1.0,
};

const COOLING_SERVICE: EventTemplate = EventTemplate {
    category: WorkOrderCategory::Preventive,
    title: "Cooling system service",
    description: "Test fan and pump motors, clean radiator fins, verify temperature-controlled stage pickup.",
    crew: "Substation Maintenance Crew",
    hours: (4.0, 8.0),
    cost: (1_800.0, 4_500.0),
    priority: Priority::Medium,
    finding_rate: 0.2,
    findings: &[
        "Fan group 2 motor bearing noisy; replaced",
        "Radiator fins 30% blocked by debris; cleaned",
        "Stage 2 cooling pickup set 5 C high; recalibrated",
    ],
    mode: None,
    weight: 1.0,
};

const EXTRA_EVENTS: &[EventTemplate] = &[
    EventTemplate {
        category: WorkOrderCategory::Preventive,
        title: "Infrared thermography survey",
        description: "Thermal scan of bushing terminals, tap changer compartment and radiator banks under load.",
        crew: "Diagnostic Test Crew",
        hours: (2.0, 4.0),
        cost: (900.0, 2_200.0),
        priority: Priority::Low,
        finding_rate: 0.3,
        findings: &[
            "Hot connection on X2 terminal pad, 18 C above ambient",
            "Uneven radiator temperature profile",
        ],
        mode: None,
        weight: 0.35,
    },
    EventTemplate {
        category: WorkOrderCategory::Inspection,
        title: "Follow-up condition inspection",
        description: "Targeted inspection requested by asset management after trend review.",
        crew: "Substation Inspector",
        hours: (2.0, 5.0),
        cost: (500.0, 1_400.0),
        priority: Priority::Medium,
        finding_rate: 0.4,
        findings: &["Confirmed gasket leak at main tank cover", "No abnormal condition observed"],
        mode: None,
        weight: 0.30,
    },
    EventTemplate {
        category: WorkOrderCategory::DiagnosticTest,
        title: "Sweep frequency response analysis",
        description: "SFRA on all windings against fingerprint to detect mechanical displacement.",
        crew: "Diagnostic Test Crew",
        hours: (6.0, 12.0),
        cost: (3_000.0, 7_500.0),
        priority: Priority::Medium,
        finding_rate: 0.5,
        findings: &[
            "Mid-frequency deviation on phase B low-voltage winding",
            "Traces match fingerprint within tolerance",
        ],
        mode: None,
        weight: 0.20,
    },
    EventTemplate {
        category: WorkOrderCategory::Modification,
        title: "Install online DGA monitor",
        description: "Mount multi-gas online monitor on drain valve and commission SCADA telemetry.",
        crew: "Engineering & Construction Crew",
        hours: (10.0, 20.0),
        cost: (18_000.0, 45_000.0),
        priority: Priority::Low,
        finding_rate: 0.0,
        findings: &[],
        mode: None,
        weight: 0.15,
    },
];

const CORRECTIVE_EVENTS: &[EventTemplate] = &[
    EventTemplate {
        category: WorkOrderCategory::Corrective,
        title: "Oil reconditioning and leak repair",
        description: "Hot-oil vacuum processing to remove moisture and gas; replace leaking gaskets.",
        crew: "Oil Processing Crew",
        hours: (16.0, 40.0),
        cost: (9_000.0, 28_000.0),
        priority: Priority::Medium,
        finding_rate: 1.0,
        findings: &[
            "Water content reduced after processing; gasket at cover flange hardened and cracked",
        ],
        mode: Some(FailureMode::OilContamination),
        weight: 1.0,
    },
    EventTemplate {
        category: WorkOrderCategory::Corrective,
        title: "Bushing replacement",
        description: "De-energize, drain to below bushing level, replace failing condenser bushing and retest.",
        crew: "Transformer Repair Crew",
        hours: (24.0, 60.0),
        cost: (35_000.0, 90_000.0),
        priority: Priority::High,
        finding_rate: 1.0,
        findings: &["Removed bushing showed carbon tracking inside the condenser core"],
        mode: Some(FailureMode::BushingFailure),
        weight: 1.0,
    },
    EventTemplate {
        category: WorkOrderCategory::Corrective,
        title: "Winding internal inspection and repair",
        description: "Untank core and coil assembly, inspect for displaced turns and arcing damage, repair insulation.",
        crew: "Transformer Repair Crew",
        hours: (72.0, 160.0),
        cost: (120_000.0, 400_000.0),
        priority: Priority::High,
        finding_rate: 1.0,
        findings: &["Carbonized paper and arc pitting found between turns on phase A"],
        mode: Some(FailureMode::WindingFault),
        weight: 0.6,
    },
    EventTemplate {
        category: WorkOrderCategory::Corrective,
        title: "Tap changer contact overhaul",
        description: "Replace diverter contacts and transition resistors; change OLTC compartment oil.",
        crew: "Substation Maintenance Crew",
        hours: (12.0, 24.0),
        cost: (14_000.0, 38_000.0),
        priority: Priority::Medium,
        finding_rate: 1.0,
        findings: &["Arcing contacts worn past limit; coking on selector switch"],
        mode: Some(FailureMode::TapChangerWear),
        weight: 1.0,
    },
    EventTemplate {
        category: WorkOrderCategory::Corrective,
        title: "Cooling fan and pump replacement",
        description: "Replace failed fan motors and oil pump; verify cooling stage controls.",
        crew: "Substation Maintenance Crew",
        hours: (6.0, 14.0),
        cost: (6_000.0, 18_000.0),
        priority: Priority::Medium,
        finding_rate: 1.0,
        findings: &["Two of six fans seized; pump impeller eroded"],
        mode: Some(FailureMode::CoolingSystemFailure),
        weight: 1.0,
    },
    EventTemplate {
        category: WorkOrderCategory::Corrective,
        title: "Core ground repair",
        description: "Locate and remove unintended core ground; retest core insulation resistance.",
        crew: "Transformer Repair Crew",
        hours: (16.0, 36.0),
        cost: (20_000.0, 60_000.0),
        priority: Priority::High,
        finding_rate: 1.0,
        findings: &["Metallic debris bridging core to clamp frame removed"],
        mode: Some(FailureMode::CoreOverheating),
        weight: 0.6,
    },
    EventTemplate {
        category: WorkOrderCategory::Corrective,
        title: "Insulation dry-out",
        description: "Low-frequency heating dry-out of active part to restore insulation resistance.",
        crew: "Oil Processing Crew",
        hours: (48.0, 96.0),
        cost: (25_000.0, 70_000.0),
        priority: Priority::Medium,
        finding_rate: 1.0,
        findings: &["Polarization index improved after dry-out; paper remains brittle"],
        mode: Some(FailureMode::InsulationDegradation),
        weight: 0.8,
    },
    EventTemplate {
        category: WorkOrderCategory::Corrective,
        title: "Partial discharge source location",
        description: "Acoustic and UHF PD localization followed by targeted repair of the discharge site.",
        crew: "Diagnostic Test Crew",
        hours: (10.0, 24.0),
        cost: (12_000.0, 35_000.0),
        priority: Priority::High,
        finding_rate: 1.0,
        findings: &["PD source located at lead exit of HV winding; shielding repaired"],
        mode: Some(FailureMode::PartialDischarge),
        weight: 0.6,
    },
];

const EMERGENCY_EVENT: EventTemplate = EventTemplate {
    category: WorkOrderCategory::Emergency,
    title: "Emergency de-energization",
    description: "Unit tripped on sudden-pressure / Buchholz alarm; isolated, load transferred, crew dispatched.",
    crew: "Emergency Response Crew",
    hours: (8.0, 36.0),
    cost: (40_000.0, 250_000.0),
    priority: Priority::Critical,
    finding_rate: 1.0,
    findings: &[
        "Gas accumulation in Buchholz relay; DGA confirms active internal fault",
        "Sudden pressure relay operated; pressure relief device discharged oil",
        "Differential protection trip; internal flashover suspected",
    ],
    mode: None,
    weight: 1.0,
};

/// Corrective templates matching the asset's failure mode are this
/// many times more likely.
const MODE_BIAS: f64 = 4.0;

// ── Synthesis ─────────────────────────────────────────────────────

pub fn synthesize_work_orders(asset: &GridAsset, as_of: NaiveDate) -> Vec<WorkOrder> {
    let mut rng = ChannelBank::for_tag(&asset.tag).for_channel(Channel::WorkOrders);
    let health = asset.health_index;
    let mut log = HistoryLog::new(asset, as_of);

    for months_ago in (0..=HISTORY_MONTHS).rev() {
        if months_ago % 3 == 0 {
            log.emit(&mut rng, &QUARTERLY_INSPECTION, months_ago, None);
        }
        if months_ago % 6 == 0 {
            let finding_rate = if health < 60.0 { 0.6 } else { 0.0 };
            log.emit(&mut rng, &OIL_SAMPLING, months_ago, Some(finding_rate));
        }
        if months_ago % 12 == 0 && months_ago != 0 {
            log.emit(&mut rng, &BUSHING_INSPECTION, months_ago, None);
        }
        if months_ago == 12 || months_ago == 0 {
            log.emit(&mut rng, &COOLING_SERVICE, months_ago, None);
        }
        if rng.chance(extra_event_probability(health)) {
            if let Some(t) = pick_weighted_by(&mut rng, EXTRA_EVENTS, |t| t.weight) {
                log.emit(&mut rng, t, months_ago, None);
            }
        }
        if rng.chance(corrective_probability(health)) {
            let bias = |t: &EventTemplate| {
                if t.mode == Some(asset.failure_mode) { t.weight * MODE_BIAS } else { t.weight }
            };
            if let Some(t) = pick_weighted_by(&mut rng, CORRECTIVE_EVENTS, bias) {
                log.emit(&mut rng, t, months_ago, None);
            }
        }
        if health < EMERGENCY_HEALTH_CEILING && rng.chance(emergency_probability(health)) {
            log.emit(&mut rng, &EMERGENCY_EVENT, months_ago, None);
        }
    }

    let mut orders = log.orders;
    orders.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    log::debug!("work orders: {} generated {} events", asset.tag, orders.len());
    orders
}

struct HistoryLog<'a> {
    asset: &'a GridAsset,
    as_of: NaiveDate,
    orders: Vec<WorkOrder>,
}

impl<'a> HistoryLog<'a> {
    fn new(asset: &'a GridAsset, as_of: NaiveDate) -> Self {
        Self { asset, as_of, orders: Vec::new() }
    }

    /// Draws: day, duration, cost, finding coin [+ finding pick].
    fn emit(
        &mut self,
        rng: &mut LcgRng,
        template: &EventTemplate,
        months_ago: u32,
        finding_rate_override: Option<f64>,
    ) {
        let date = event_date(self.as_of, months_ago, rng.int_range(1, 28));
        let hours = round1(rng.range(template.hours.0, template.hours.1));
        let mut cost = rng.range(template.cost.0, template.cost.1);
        if template.category == WorkOrderCategory::Corrective
            && self.asset.failure_mode.is_heavy()
        {
            cost *= 1.5;
        }

        let finding_rate = finding_rate_override.unwrap_or(template.finding_rate);
        let finding = if rng.chance(finding_rate) && !template.findings.is_empty() {
            Some(template.findings[rng.index(template.findings.len())].to_string())
        } else {
            None
        };

        let status = if date > self.as_of {
            WorkOrderStatus::Scheduled
        } else if months_ago == 0 && template.category.is_unplanned() {
            WorkOrderStatus::InProgress
        } else {
            WorkOrderStatus::Completed
        };

        let priority = if template.category == WorkOrderCategory::Corrective
            && self.asset.health_index < 40.0
        {
            template.priority.max(Priority::High)
        } else {
            template.priority
        };

        let sequence = self.orders.len() + 1;
        self.orders.push(WorkOrder {
            id: format!("WO-{}-{sequence:03}", self.asset.tag),
            date,
            category: template.category,
            title: template.title.to_string(),
            description: template.description.to_string(),
            duration_hours: hours,
            crew: template.crew.to_string(),
            status,
            finding,
            cost: cost.round(),
            priority,
        });
    }
}

fn event_date(as_of: NaiveDate, months_ago: u32, day: u32) -> NaiveDate {
    let month = as_of
        .checked_sub_months(Months::new(months_ago))
        .unwrap_or(as_of);
    NaiveDate::from_ymd_opt(month.year(), month.month(), day).unwrap_or(month)
}
