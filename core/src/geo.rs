//! Spatial placement of assets around weighted density centers.
//!
//! A region is a bounding box plus a handful of named centers. An asset
//! picks a center by weight, is jittered on each axis with a triangular
//! offset scaled by the center's radius, and is clipped to the box.
//! The result clusters around heavy centers and thins out at the edges.

use crate::{rng::LcgRng, sampler::{pick_weighted, Weighted}};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lng_min..=self.lng_max).contains(&lng)
    }

    pub fn clamp(&self, lat: f64, lng: f64) -> (f64, f64) {
        (lat.clamp(self.lat_min, self.lat_max), lng.clamp(self.lng_min, self.lng_max))
    }

    pub fn is_well_formed(&self) -> bool {
        self.lat_min < self.lat_max && self.lng_min < self.lng_max
    }
}

/// Drives load baseline and customer density.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DensityClass {
    Urban,
    Suburban,
    Rural,
}

#[rustfmt::skip]
impl DensityClass {
    /// Baseline load factor (% of nameplate) before the random addition.
    pub fn load_baseline(&self) -> f64 {
        match self {
            Self::Urban    => 62.0,
            Self::Suburban => 50.0,
            Self::Rural    => 38.0,
        }
    }

    /// Multiplier on the voltage class' customer range.
    pub fn customer_factor(&self) -> f64 {
        match self {
            Self::Urban    => 1.35,
            Self::Suburban => 1.0,
            Self::Rural    => 0.55,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DensityCenter {
    pub name: String,
    /// Operating district that owns assets placed around this center.
    pub district: String,
    pub lat: f64,
    pub lng: f64,
    /// Jitter radius in degrees.
    pub radius: f64,
    pub weight: f64,
    pub density: DensityClass,
}

impl Weighted for DensityCenter {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// Where an asset landed.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<'a> {
    pub lat: f64,
    pub lng: f64,
    pub center: &'a DensityCenter,
}

/// Place one point. Consumes exactly seven draws: one for the center,
/// three per axis.
///
/// Returns `None` only when `centers` is empty.
pub fn place<'a>(
    rng: &mut LcgRng,
    centers: &'a [DensityCenter],
    bbox: &BoundingBox,
) -> Option<Placement<'a>> {
    let center = pick_weighted(rng, centers)?;
    let lat = center.lat + rng.triangular() * center.radius;
    let lng = center.lng + rng.triangular() * center.radius;
    let (lat, lng) = bbox.clamp(round_coord(lat), round_coord(lng));
    Some(Placement { lat, lng, center })
}

/// Five decimals (~1 m).
fn round_coord(v: f64) -> f64 {
    (v * 100_000.0).round() / 100_000.0
}
