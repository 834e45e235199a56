//! Shared primitive types used across the entire generator.

/// A stable asset tag, e.g. `COMED-0001`. Also the seed source.
pub type AssetTag = String;

/// A base seed derived from an asset tag (never zero).
pub type Seed = u32;

/// Round to one decimal place. Every displayed measurement goes through
/// this so serialized records stay compact and comparable.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Round to two decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
