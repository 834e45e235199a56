//! Deterministic substation naming and tag formatting.
//!
//! Display names combine the density center an asset landed near with a
//! curated suffix. All generation is deterministic (same stream = same name).

use crate::{error::{FleetError, FleetResult}, rng::LcgRng};

/// Deterministic name generator using curated suffix lists
pub struct NameGenerator;

impl NameGenerator {
    /// Generate a substation display name anchored on a center name
    pub fn generate_substation_name(rng: &mut LcgRng, center: &str) -> String {
        let landmarks = Self::landmarks();
        let kinds = Self::facility_kinds();
        let landmark = landmarks[rng.index(landmarks.len())];
        let kind = kinds[rng.index(kinds.len())];
        format!("{center} {landmark} {kind}")
    }

    /// Format a fleet tag: `PREFIX-NNNN`, numbered from 1
    pub fn format_tag(prefix: &str, number: usize) -> String {
        format!("{prefix}-{number:04}")
    }

    /// Split a tag into its region prefix and number
    pub fn parse_tag(tag: &str) -> FleetResult<(&str, usize)> {
        let malformed = || FleetError::MalformedTag { tag: tag.to_string() };
        let (prefix, number) = tag.rsplit_once('-').ok_or_else(malformed)?;
        if prefix.is_empty() {
            return Err(malformed());
        }
        let number = number.parse::<usize>().map_err(|_| malformed())?;
        Ok((prefix, number))
    }

    fn landmarks() -> &'static [&'static str] {
        &[
            "North", "South", "East", "West", "Ridge", "Park", "Junction", "Creek",
            "Harbor", "Mill", "Grove", "Crossing", "Heights", "Station", "Prairie",
            "Lakeside", "Riverside", "Summit", "Meadow", "Forge", "Yard", "Central",
            "Hollow", "Bluff", "Point", "Terrace", "Oak", "Maple", "Cedar", "Willow",
        ]
    }

    fn facility_kinds() -> &'static [&'static str] {
        &[
            "Substation",
            "Substation",
            "Substation",
            "TSS",
            "Switching Station",
            "Distribution Center",
        ]
    }
}
