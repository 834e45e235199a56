//! Diagnostic narrative synthesis.
//!
//! Each failure mode maps to one static template: three trigger signals,
//! three findings, three deep-analysis entries and a cross-validation
//! headline. Templates carry `{placeholder}` slots that are filled from
//! the asset's own attributes and its latest health record, never from
//! fresh randomness, so the narrative quotes the same numbers the rest of
//! the dashboard shows. The only draw on the Diagnostics channel is the
//! confidence jitter.

use crate::{
    asset_synthesizer::GridAsset,
    failure_mode::FailureMode,
    health_record_synthesizer::{synthesize_health_records, HealthSeries},
    rng::{Channel, ChannelBank},
    types::{round1, round2},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[rustfmt::skip]
impl Severity {
    pub fn color(&self) -> &'static str {
        match self {
            Self::Info     => "#3b82f6",
            Self::Warning  => "#f59e0b",
            Self::Critical => "#dc2626",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriggerSignal {
    pub label: String,
    pub detail: String,
    pub severity: Severity,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeepAnalysis {
    pub text: String,
    pub method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrossValidation {
    pub label: String,
    pub detail: String,
    /// Percent, in [0, 98].
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticRecord {
    pub asset_tag: String,
    pub failure_mode: FailureMode,
    pub triggers: Vec<TriggerSignal>,
    pub findings: Vec<Finding>,
    pub deep_analysis: Vec<DeepAnalysis>,
    pub cross_validation: CrossValidation,
    pub cross_links: Vec<String>,
}

// ── Templates ─────────────────────────────────────────────────────

struct SignalTemplate {
    label: &'static str,
    detail: &'static str,
    severity: Severity,
}

struct FindingTemplate {
    text: &'static str,
    severity: Severity,
}

struct AnalysisTemplate {
    text: &'static str,
    method: &'static str,
}

struct DiagnosticTemplate {
    mode: FailureMode,
    headline: &'static str,
    triggers: [SignalTemplate; 3],
    findings: [FindingTemplate; 3],
    analyses: [AnalysisTemplate; 3],
}

use Severity::{Critical, Info, Warning};

/// Partial discharge has no template of its own and reads as insulation
/// degradation.
#[rustfmt::skip]
const TEMPLATES: &[DiagnosticTemplate] = &[
    DiagnosticTemplate {
        mode: FailureMode::InsulationDegradation,
        headline: "Cellulose insulation degradation confirmed",
        triggers: [
            SignalTemplate { label: "Carbon oxides elevated", detail: "CO {co} ppm, CO2 {co2} ppm (CO2/CO ratio {ratio_co2_co})", severity: Warning },
            SignalTemplate { label: "Furan rise", detail: "2-FAL {furan} ppb at age {age} years", severity: Warning },
            SignalTemplate { label: "Oil quality drift", detail: "Moisture {moisture} ppm, IFT {ift} dynes/cm", severity: Info },
        ],
        findings: [
            FindingTemplate { text: "CO2/CO ratio of {ratio_co2_co} points to thermal ageing of paper insulation", severity: Warning },
            FindingTemplate { text: "Estimated degree of polymerization {dp}; end of life is conventionally DP 200", severity: Critical },
            FindingTemplate { text: "Moisture at {moisture} ppm accelerates cellulose hydrolysis", severity: Warning },
        ],
        analyses: [
            AnalysisTemplate { text: "2-FAL {furan} ppb converts to DP {dp} by the Chendong correlation", method: "Furan analysis (DP estimate)" },
            AnalysisTemplate { text: "CO {co} ppm against a TDCG of {tdcg} ppm isolates paper as the gas source", method: "IEEE C57.104 key gas" },
            AnalysisTemplate { text: "Hot spot {hot_spot} C at {load}% load doubles ageing rate every 6 C above 110 C", method: "IEEE C57.91 thermal ageing" },
        ],
    },
    DiagnosticTemplate {
        mode: FailureMode::WindingFault,
        headline: "Winding fault confirmed",
        triggers: [
            SignalTemplate { label: "Acetylene detected", detail: "C2H2 at {c2h2} ppm against a 2 ppm alarm level", severity: Critical },
            SignalTemplate { label: "TDCG rising", detail: "TDCG {tdcg_prev} to {tdcg} ppm ({tdcg_rise}% over three quarters)", severity: Warning },
            SignalTemplate { label: "Thermal stress", detail: "Load {load}% of nameplate, hot spot {hot_spot} C", severity: Warning },
        ],
        findings: [
            FindingTemplate { text: "Acetylene at {c2h2} ppm indicates high-energy arcing between winding turns", severity: Critical },
            FindingTemplate { text: "C2H2/C2H4 ratio {ratio_c2h2_c2h4} places the fault in the discharge zone", severity: Critical },
            FindingTemplate { text: "Winding insulation is {age} years old with estimated DP {dp}", severity: Warning },
        ],
        analyses: [
            AnalysisTemplate { text: "CH4 {ch4}, C2H4 {c2h4}, C2H2 {c2h2} ppm plot in zone D2 (high-energy discharge)", method: "Duval Triangle 1" },
            AnalysisTemplate { text: "C2H2/C2H4 = {ratio_c2h2_c2h4} is consistent with arcing, not thermal faulting", method: "Rogers Ratio" },
            AnalysisTemplate { text: "Turn-to-turn deformation expected at {voltage}; sweep response will confirm", method: "Frequency Response Analysis" },
        ],
    },
    DiagnosticTemplate {
        mode: FailureMode::BushingFailure,
        headline: "Bushing insulation breakdown confirmed",
        triggers: [
            SignalTemplate { label: "Power factor climb", detail: "Insulation power factor {pf}% (limit 0.5%)", severity: Warning },
            SignalTemplate { label: "Hydrogen generation", detail: "H2 at {h2} ppm with TDCG {tdcg} ppm", severity: Warning },
            SignalTemplate { label: "Thermal anomaly", detail: "Top oil {top_oil} C at {load}% load", severity: Info },
        ],
        findings: [
            FindingTemplate { text: "Power factor {pf}% indicates moisture ingress or void formation in the condenser core", severity: Critical },
            FindingTemplate { text: "Hydrogen at {h2} ppm is the signature of partial discharge in the bushing", severity: Warning },
            FindingTemplate { text: "Bushing age {age} years exceeds typical OIP service life", severity: Warning },
        ],
        analyses: [
            AnalysisTemplate { text: "C1 capacitance and PF trend point to a failing condenser layer", method: "Power factor / tan delta" },
            AnalysisTemplate { text: "H2 {h2} ppm dominant with low C2H2 ({c2h2} ppm) matches low-energy discharge", method: "IEEE C57.104 key gas" },
            AnalysisTemplate { text: "Terminal hot spot consistent with loose draw-lead connection", method: "Infrared thermography" },
        ],
    },
    DiagnosticTemplate {
        mode: FailureMode::OilContamination,
        headline: "Oil contamination confirmed",
        triggers: [
            SignalTemplate { label: "Moisture in oil", detail: "Water content {moisture} ppm", severity: Warning },
            SignalTemplate { label: "Dielectric loss", detail: "Breakdown voltage {dielectric} kV", severity: Warning },
            SignalTemplate { label: "Acidity rising", detail: "Neutralization number {acidity} mg KOH/g, IFT {ift} dynes/cm", severity: Info },
        ],
        findings: [
            FindingTemplate { text: "Dielectric strength {dielectric} kV is below the 30 kV service limit", severity: Critical },
            FindingTemplate { text: "Moisture {moisture} ppm suggests a failed breather or gasket leak", severity: Warning },
            FindingTemplate { text: "Acidity {acidity} mg KOH/g indicates oxidation sludge formation", severity: Warning },
        ],
        analyses: [
            AnalysisTemplate { text: "Breakdown {dielectric} kV with water {moisture} ppm classifies the oil for reconditioning", method: "ASTM D1816 dielectric" },
            AnalysisTemplate { text: "IFT {ift} dynes/cm with acidity {acidity} gives a low oil quality index", method: "Oil quality index (IFT/NN)" },
            AnalysisTemplate { text: "CO2 {co2} ppm is consistent with oxidation, not an active fault", method: "IEEE C57.104 key gas" },
        ],
    },
    DiagnosticTemplate {
        mode: FailureMode::TapChangerWear,
        headline: "On-load tap changer wear confirmed",
        triggers: [
            SignalTemplate { label: "Ethylene trend", detail: "C2H4 at {c2h4} ppm", severity: Warning },
            SignalTemplate { label: "Contact heating", detail: "Hot spot {hot_spot} C at {load}% load", severity: Warning },
            SignalTemplate { label: "Operation count", detail: "{age} years of regulation duty", severity: Info },
        ],
        findings: [
            FindingTemplate { text: "C2H4 {c2h4} ppm leaking from the diverter compartment indicates contact coking", severity: Warning },
            FindingTemplate { text: "Transition resistor overheating likely at {load}% average load", severity: Warning },
            FindingTemplate { text: "Gas ratios show thermal fault below 700 C, typical of worn contacts", severity: Critical },
        ],
        analyses: [
            AnalysisTemplate { text: "Contact make-break timing deviation expected across tap positions", method: "Dynamic resistance measurement" },
            AnalysisTemplate { text: "C2H4 {c2h4} ppm and CH4 {ch4} ppm plot in thermal zone T2", method: "Duval Triangle 1" },
            AnalysisTemplate { text: "Compartment temperature differential exceeds main tank", method: "Infrared thermography" },
        ],
    },
    DiagnosticTemplate {
        mode: FailureMode::CoolingSystemFailure,
        headline: "Cooling system degradation confirmed",
        triggers: [
            SignalTemplate { label: "Top oil temperature", detail: "Top oil {top_oil} C at {load}% load", severity: Warning },
            SignalTemplate { label: "Hot spot excursion", detail: "Winding hot spot {hot_spot} C", severity: Critical },
            SignalTemplate { label: "Low-temperature gassing", detail: "CH4 {ch4} ppm, C2H6 {c2h6} ppm", severity: Info },
        ],
        findings: [
            FindingTemplate { text: "Top oil {top_oil} C is above the expected rise for {load}% load", severity: Warning },
            FindingTemplate { text: "Hot spot {hot_spot} C accelerates insulation ageing", severity: Critical },
            FindingTemplate { text: "Methane-led gassing ({ch4} ppm) indicates overheating oil, not arcing", severity: Info },
        ],
        analyses: [
            AnalysisTemplate { text: "Radiator bank differential suggests blocked fins or failed fan group", method: "Infrared thermography" },
            AnalysisTemplate { text: "Measured rise exceeds nameplate ONAF rating curve", method: "IEEE C57.91 thermal model" },
            AnalysisTemplate { text: "CH4 {ch4} / C2H6 {c2h6} ppm ratios sit in the low-temperature thermal range", method: "Rogers Ratio" },
        ],
    },
    DiagnosticTemplate {
        mode: FailureMode::CoreOverheating,
        headline: "Core overheating confirmed",
        triggers: [
            SignalTemplate { label: "Ethylene elevated", detail: "C2H4 at {c2h4} ppm", severity: Warning },
            SignalTemplate { label: "TDCG rising", detail: "TDCG {tdcg_prev} to {tdcg} ppm ({tdcg_rise}%)", severity: Warning },
            SignalTemplate { label: "Thermal signature", detail: "Hot spot {hot_spot} C at {load}% load", severity: Info },
        ],
        findings: [
            FindingTemplate { text: "C2H4 {c2h4} ppm with low acetylene indicates a thermal fault above 700 C", severity: Critical },
            FindingTemplate { text: "Pattern matches circulating current from an unintended core ground", severity: Warning },
            FindingTemplate { text: "Oil at {top_oil} C top temperature is degrading around the hot area", severity: Warning },
        ],
        analyses: [
            AnalysisTemplate { text: "CH4 {ch4}, C2H4 {c2h4}, C2H2 {c2h2} ppm plot in zone T3", method: "Duval Triangle 1" },
            AnalysisTemplate { text: "Core-to-ground insulation resistance expected below 100 megohm", method: "Core ground test" },
            AnalysisTemplate { text: "C2H4/C2H6 ratio confirms high-temperature thermal fault", method: "Rogers Ratio" },
        ],
    },
];

const FALLBACK_MODE: FailureMode = FailureMode::InsulationDegradation;

fn template_for(mode: FailureMode) -> &'static DiagnosticTemplate {
    TEMPLATES
        .iter()
        .find(|t| t.mode == mode)
        .or_else(|| TEMPLATES.iter().find(|t| t.mode == FALLBACK_MODE))
        .unwrap_or(&TEMPLATES[0])
}

/// Whether `mode` has a template of its own.
pub fn has_template(mode: FailureMode) -> bool {
    TEMPLATES.iter().any(|t| t.mode == mode)
}

// ── Synthesis ─────────────────────────────────────────────────────

/// Worse health gives a clearer signal. Clipped to [0, 98].
pub fn base_confidence(health: f64) -> f64 {
    (98.0 - health * 0.35).clamp(0.0, 98.0)
}

/// Build the diagnostic for `asset`, generating its health records.
pub fn synthesize_diagnostic(asset: &GridAsset, as_of: NaiveDate) -> DiagnosticRecord {
    let records = synthesize_health_records(asset, as_of);
    synthesize_diagnostic_with(asset, &records)
}

/// Build the diagnostic from an already-generated health-record series.
pub fn synthesize_diagnostic_with(asset: &GridAsset, records: &HealthSeries) -> DiagnosticRecord {
    let template = template_for(asset.failure_mode);
    let slots = Slots::from_asset(asset, records);
    let escalate = asset.health_index < 35.0;

    let triggers: Vec<TriggerSignal> = template
        .triggers
        .iter()
        .map(|t| {
            let severity = if escalate && t.severity == Warning { Critical } else { t.severity };
            TriggerSignal {
                label: t.label.to_string(),
                detail: slots.fill(t.detail),
                severity,
                color: severity.color().to_string(),
            }
        })
        .collect();

    let findings = template
        .findings
        .iter()
        .map(|f| Finding { text: slots.fill(f.text), severity: f.severity })
        .collect();

    let deep_analysis = template
        .analyses
        .iter()
        .map(|a| DeepAnalysis { text: slots.fill(a.text), method: a.method.to_string() })
        .collect();

    let mut rng = ChannelBank::for_tag(&asset.tag).for_channel(Channel::Diagnostics);
    let jitter = (rng.next_f64() - 0.5) * 4.0;
    let confidence = round1((base_confidence(asset.health_index) + jitter).clamp(0.0, 98.0));

    let signal_names: Vec<&str> = triggers.iter().map(|t| t.label.as_str()).collect();
    let cross_validation = CrossValidation {
        label: template.headline.to_string(),
        detail: format!(
            "{} independent signals ({}) converge on {}. Predicted time to failure: {}.",
            signal_names.len(),
            signal_names.join(", ").to_lowercase(),
            asset.failure_mode.label().to_lowercase(),
            asset.time_to_failure
        ),
        confidence,
    };

    let cross_links = vec![
        slots.fill("Health records: TDCG {tdcg_prev} to {tdcg} ppm across four quarters, condition {condition}"),
        format!("Maintenance log: 24-month work order history for {}", asset.tag),
        format!("Materials to stage: {}", asset.materials.join(", ")),
        format!("Crew skills: {}", asset.skills.join(", ")),
        format!(
            "Service impact: {} customers on {} served by {}",
            asset.customers_served, asset.voltage_class, asset.org_unit
        ),
    ];

    log::debug!(
        "diagnostic: {} {} confidence={confidence}",
        asset.tag,
        asset.failure_mode
    );

    DiagnosticRecord {
        asset_tag: asset.tag.clone(),
        failure_mode: asset.failure_mode,
        triggers,
        findings,
        deep_analysis,
        cross_validation,
        cross_links,
    }
}

/// Placeholder values for one asset.
struct Slots {
    values: Vec<(&'static str, String)>,
}

impl Slots {
    fn from_asset(asset: &GridAsset, records: &HealthSeries) -> Self {
        let [first, .., latest] = records;
        let g = &latest.gases;
        let rise = if first.gases.tdcg > 0.0 {
            (latest.gases.tdcg / first.gases.tdcg - 1.0) * 100.0
        } else {
            0.0
        };
        let values = vec![
            ("age", asset.age_years.to_string()),
            ("health", fmt1(asset.health_index)),
            ("load", fmt1(asset.load_factor)),
            ("customers", asset.customers_served.to_string()),
            ("voltage", asset.voltage_class.clone()),
            ("ttf", asset.time_to_failure.clone()),
            ("h2", fmt1(g.hydrogen)),
            ("ch4", fmt1(g.methane)),
            ("c2h6", fmt1(g.ethane)),
            ("c2h4", fmt1(g.ethylene)),
            ("c2h2", fmt1(g.acetylene)),
            ("co", fmt1(g.carbon_monoxide)),
            ("co2", fmt1(g.carbon_dioxide)),
            ("tdcg", fmt1(g.tdcg)),
            ("tdcg_prev", fmt1(first.gases.tdcg)),
            ("tdcg_rise", format!("{rise:+.0}")),
            ("ratio_c2h2_c2h4", format!("{:.2}", ratio(g.acetylene, g.ethylene))),
            ("ratio_co2_co", format!("{:.1}", ratio(g.carbon_dioxide, g.carbon_monoxide))),
            ("moisture", fmt1(latest.moisture_ppm)),
            ("dielectric", fmt1(latest.dielectric_strength_kv)),
            ("acidity", format!("{:.2}", latest.acidity_mg_koh_g)),
            ("ift", fmt1(latest.interfacial_tension_dynes_cm)),
            ("pf", format!("{:.2}", latest.power_factor_pct)),
            ("furan", fmt1(latest.furan_ppb)),
            ("dp", format!("{:.0}", degree_of_polymerization(latest.furan_ppb))),
            ("top_oil", fmt1(latest.top_oil_temp_c)),
            ("hot_spot", fmt1(latest.hot_spot_temp_c)),
            ("condition", latest.condition.label().to_string()),
        ];
        Self { values }
    }

    fn fill(&self, template: &str) -> String {
        self.values.iter().fold(template.to_string(), |text, (key, value)| {
            text.replace(&format!("{{{key}}}"), value)
        })
    }
}

fn fmt1(v: f64) -> String {
    format!("{v:.1}")
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 { round2(num / den) } else { 0.0 }
}

/// Chendong: DP = (1.51 - log10(2FAL ppm)) / 0.0035, held to [150, 1200].
pub fn degree_of_polymerization(furan_ppb: f64) -> f64 {
    let ppm = (furan_ppb / 1000.0).max(1e-4);
    ((1.51 - ppm.log10()) / 0.0035).clamp(150.0, 1200.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{asset_synthesizer::synthesize_asset, config::FleetConfig};

    #[test]
    fn partial_discharge_falls_back_to_insulation() {
        assert!(!has_template(FailureMode::PartialDischarge));
        assert_eq!(template_for(FailureMode::PartialDischarge).mode, FALLBACK_MODE);
    }

    #[test]
    fn every_other_mode_has_its_own_template() {
        for mode in FailureMode::all().filter(|m| *m != FailureMode::PartialDischarge) {
            assert_eq!(template_for(mode).mode, mode);
        }
    }

    #[test]
    fn confidence_is_monotone_and_clipped() {
        assert!(base_confidence(20.0) > base_confidence(80.0));
        assert_eq!(base_confidence(-400.0), 98.0);
        assert!(base_confidence(98.0) >= 0.0);
    }

    #[test]
    fn dp_falls_as_furan_rises() {
        assert!(degree_of_polymerization(100.0) > degree_of_polymerization(4_000.0));
        assert_eq!(degree_of_polymerization(0.0), 1200.0);
    }

    #[test]
    fn no_placeholder_survives_filling() {
        let slots = Slots {
            values: vec![("c2h2", "12.0".into()), ("load", "71.0".into())],
        };
        assert_eq!(slots.fill("C2H2 {c2h2} at {load}%"), "C2H2 12.0 at 71.0%");
    }

    #[test]
    fn every_template_slot_has_a_value() {
        let config = FleetConfig::default();
        let asset = synthesize_asset("PEPCO-0003", &config.regions[3]);
        let records = synthesize_health_records(&asset, config.as_of);
        let slots = Slots::from_asset(&asset, &records);
        for t in TEMPLATES {
            let texts = t
                .triggers
                .iter()
                .map(|s| s.detail)
                .chain(t.findings.iter().map(|f| f.text))
                .chain(t.analyses.iter().map(|a| a.text));
            for text in texts {
                let filled = slots.fill(text);
                assert!(!filled.contains('{'), "{}: unfilled slot in {filled:?}", t.mode);
            }
        }
    }
}
