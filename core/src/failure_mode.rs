//! Failure-mode taxonomy.
//!
//! A failure mode is a key into a static profile table. Everything that
//! varies by mode (eligibility, repair class, bill of materials, which
//! gas it drives, which corrective work it causes) lives in the profile
//! record, not in per-mode code paths.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    InsulationDegradation,
    WindingFault,
    BushingFailure,
    OilContamination,
    TapChangerWear,
    CoolingSystemFailure,
    CoreOverheating,
    PartialDischarge,
}

/// Heavy repairs take days with the unit out of service; light ones
/// are done in a shift or two.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RepairClass {
    Heavy,
    Light,
}

/// Dissolved gas whose rise is the signature of a failure mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyGas {
    Hydrogen,
    Methane,
    Ethane,
    Ethylene,
    Acetylene,
    CarbonMonoxide,
    CarbonDioxide,
}

#[derive(Debug)]
pub struct FailureModeProfile {
    pub mode: FailureMode,
    pub label: &'static str,
    /// Assets younger than this are never assigned the mode.
    pub min_age: u32,
    pub weight: f64,
    pub repair_class: RepairClass,
    pub key_gas: KeyGas,
    pub materials: &'static [&'static str],
    pub skills: &'static [&'static str],
}

/// Assigned when no other mode is age-eligible.
pub const DEFAULT_FAILURE_MODE: FailureMode = FailureMode::OilContamination;

/// Order is part of the sampling contract: eligible modes are walked in
/// this order by the weighted picker.
#[rustfmt::skip]
pub const FAILURE_MODES: &[FailureModeProfile] = &[
    FailureModeProfile {
        mode: FailureMode::InsulationDegradation,
        label: "Insulation degradation",
        min_age: 15,
        weight: 0.24,
        repair_class: RepairClass::Light,
        key_gas: KeyGas::CarbonMonoxide,
        materials: &["Kraft paper insulation wrap", "Transformer oil (500 gal)", "Oil filtration cartridges"],
        skills: &["Oil processing", "Insulation resistance testing", "Dry-out procedures"],
    },
    FailureModeProfile {
        mode: FailureMode::WindingFault,
        label: "Winding fault",
        min_age: 20,
        weight: 0.14,
        repair_class: RepairClass::Heavy,
        key_gas: KeyGas::Acetylene,
        materials: &["Copper winding conductor", "Pressboard spacers", "Transformer oil (2,000 gal)", "Gasket kit"],
        skills: &["Winding repair", "Frequency response analysis", "Heavy rigging", "High-voltage testing"],
    },
    FailureModeProfile {
        mode: FailureMode::BushingFailure,
        label: "Bushing failure",
        min_age: 18,
        weight: 0.14,
        repair_class: RepairClass::Heavy,
        key_gas: KeyGas::Hydrogen,
        materials: &["Condenser bushing (OIP)", "Bushing gasket set", "Porcelain cleaning compound"],
        skills: &["Bushing replacement", "Power factor testing", "Crane operation"],
    },
    FailureModeProfile {
        mode: FailureMode::OilContamination,
        label: "Oil contamination",
        min_age: 3,
        weight: 0.14,
        repair_class: RepairClass::Light,
        key_gas: KeyGas::CarbonDioxide,
        materials: &["Transformer oil (1,000 gal)", "Desiccant breather", "Oil filtration cartridges"],
        skills: &["Oil processing", "Oil sampling", "Leak repair"],
    },
    FailureModeProfile {
        mode: FailureMode::TapChangerWear,
        label: "Tap changer wear",
        min_age: 10,
        weight: 0.12,
        repair_class: RepairClass::Light,
        key_gas: KeyGas::Ethylene,
        materials: &["OLTC contact set", "Diverter switch oil", "Drive mechanism lubricant"],
        skills: &["OLTC overhaul", "Dynamic resistance measurement", "Relay coordination"],
    },
    FailureModeProfile {
        mode: FailureMode::CoolingSystemFailure,
        label: "Cooling system failure",
        min_age: 5,
        weight: 0.10,
        repair_class: RepairClass::Light,
        key_gas: KeyGas::Methane,
        materials: &["Cooling fan assembly", "Oil pump motor", "Radiator valve set"],
        skills: &["Cooling system service", "Thermography", "Motor controls"],
    },
    FailureModeProfile {
        mode: FailureMode::CoreOverheating,
        label: "Core overheating",
        min_age: 12,
        weight: 0.06,
        repair_class: RepairClass::Light,
        key_gas: KeyGas::Ethylene,
        materials: &["Core ground strap", "Core insulation shims", "Transformer oil (500 gal)"],
        skills: &["Core ground testing", "Internal inspection", "Confined space entry"],
    },
    FailureModeProfile {
        mode: FailureMode::PartialDischarge,
        label: "Partial discharge",
        min_age: 8,
        weight: 0.06,
        repair_class: RepairClass::Light,
        key_gas: KeyGas::Hydrogen,
        materials: &["UHF PD sensor kit", "Shielding tape", "Transformer oil (500 gal)"],
        skills: &["Partial discharge measurement", "Acoustic emission testing", "Oil processing"],
    },
];

impl FailureMode {
    pub fn profile(&self) -> &'static FailureModeProfile {
        FAILURE_MODES
            .iter()
            .find(|p| p.mode == *self)
            .unwrap_or(&FAILURE_MODES[3])
    }

    pub fn label(&self) -> &'static str {
        self.profile().label
    }

    pub fn min_age(&self) -> u32 {
        self.profile().min_age
    }

    pub fn is_heavy(&self) -> bool {
        self.profile().repair_class == RepairClass::Heavy
    }

    pub fn is_eligible_at(&self, age: u32) -> bool {
        age >= self.min_age()
    }

    pub fn all() -> impl Iterator<Item = FailureMode> {
        FAILURE_MODES.iter().map(|p| p.mode)
    }
}

impl std::fmt::Display for FailureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_has_a_profile() {
        for mode in [
            FailureMode::InsulationDegradation,
            FailureMode::WindingFault,
            FailureMode::BushingFailure,
            FailureMode::OilContamination,
            FailureMode::TapChangerWear,
            FailureMode::CoolingSystemFailure,
            FailureMode::CoreOverheating,
            FailureMode::PartialDischarge,
        ] {
            assert_eq!(mode.profile().mode, mode);
        }
    }

    #[test]
    fn only_winding_and_bushing_are_heavy() {
        let heavy: Vec<_> = FailureMode::all().filter(FailureMode::is_heavy).collect();
        assert_eq!(heavy, vec![FailureMode::WindingFault, FailureMode::BushingFailure]);
    }

    #[test]
    fn default_mode_is_the_youngest_eligible() {
        let youngest = FailureMode::all().map(|m| m.min_age()).min().unwrap();
        assert_eq!(DEFAULT_FAILURE_MODE.min_age(), youngest);
    }
}
