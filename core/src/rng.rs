//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through `LcgRng` instances derived from an
//! asset tag (or, for fleet composition, from the fleet seed).
//!
//! Each synthesis channel gets its own stream, seeded from
//! (base_seed + channel offset). This means:
//!   - Drawing more values on one channel never shifts another channel.
//!   - Each channel's stream is fully reproducible in isolation.
//!
//! Neighbouring tags hash to seeds a few units apart, and one Park-Miller
//! step only multiplies that gap by 16807. Channel streams therefore
//! discard `WARM_UP_DRAWS` values before handing out the first one.

use crate::types::Seed;

const MODULUS: u64 = 2_147_483_647;
const MULTIPLIER: u64 = 16_807;
/// Draws discarded from every channel stream. Three is the minimum that
/// separates adjacent seeds; changing it regenerates every asset.
pub const WARM_UP_DRAWS: usize = 6;

/// Park-Miller minimal-standard generator.
///
/// `state = state * 16807 mod (2^31 - 1)`, output `(state - 1) / (2^31 - 2)`.
/// The recurrence is exact in u64 arithmetic, so output is bit-identical
/// across platforms.
#[derive(Debug, Clone)]
pub struct LcgRng {
    pub name: &'static str,
    state: u64,
}

impl LcgRng {
    /// Seeds are folded into `[1, 2^31 - 2]`; zero would lock the
    /// recurrence at zero forever.
    pub fn new(seed: u64) -> Self {
        let mut state = seed % MODULUS;
        if state == 0 {
            state = MODULUS - 1;
        }
        Self { name: "unnamed", state }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER) % MODULUS;
        (self.state - 1) as f64 / (MODULUS - 1) as f64
    }

    /// Uniform float in [lo, hi).
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform integer in [lo, hi] (inclusive).
    pub fn int_range(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = f64::from(hi - lo + 1);
        (lo + (self.next_f64() * span) as u32).min(hi)
    }

    /// Index into a slice of length `len` (0 when `len` is 0).
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Sum of three uniforms minus 1.5: a bell-ish shape on (-1.5, 1.5)
    /// centred on zero, used wherever a Gaussian would do.
    pub fn triangular(&mut self) -> f64 {
        self.next_f64() + self.next_f64() + self.next_f64() - 1.5
    }
}

/// Map an asset tag to a stable positive seed.
///
/// Polynomial hash over UTF-16 code units with i32 wraparound, then
/// `max(|h|, 1)`.
pub fn seed_from_tag(tag: &str) -> Seed {
    let h = tag
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
    h.unsigned_abs().max(1)
}

/// All channel streams for one asset, keyed by its base seed.
#[derive(Debug, Clone, Copy)]
pub struct ChannelBank {
    base_seed: Seed,
}

impl ChannelBank {
    pub fn new(base_seed: Seed) -> Self {
        Self { base_seed }
    }

    pub fn for_tag(tag: &str) -> Self {
        Self::new(seed_from_tag(tag))
    }

    /// A fresh stream for `channel`, already past its warm-up. Calling
    /// this twice returns two streams that replay the same values.
    pub fn for_channel(&self, channel: Channel) -> LcgRng {
        let mut rng =
            LcgRng::new(u64::from(self.base_seed) + channel.offset()).with_name(channel.name());
        for _ in 0..WARM_UP_DRAWS {
            rng.next_f64();
        }
        rng
    }
}

/// Stable channel offsets.
/// NEVER change an existing offset. Only append.
/// Changing one regenerates every asset's view on that channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Attributes,
    Location,
    HealthRecords,
    Diagnostics,
    WorkOrders,
    Scenario,
}

impl Channel {
    pub fn offset(&self) -> u64 {
        match self {
            Self::Attributes => 0,
            Self::Location => 999,
            Self::HealthRecords => 7777,
            Self::Diagnostics => 8888,
            Self::WorkOrders => 9999,
            Self::Scenario => 4242,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Attributes => "attributes",
            Self::Location => "location",
            Self::HealthRecords => "health_records",
            Self::Diagnostics => "diagnostics",
            Self::WorkOrders => "work_orders",
            Self::Scenario => "scenario",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn park_miller_reference_values() {
        // Seed 1: first state is 16807, the textbook check value.
        let mut rng = LcgRng::new(1);
        let first = rng.next_f64();
        assert_eq!(first, 16_806.0 / 2_147_483_646.0);
        // 10,000th state from seed 1 is 1043618065 (Park & Miller, 1988).
        let mut rng = LcgRng::new(1);
        for _ in 0..9_999 {
            rng.next_f64();
        }
        let v = rng.next_f64();
        assert_eq!(v, (1_043_618_065.0 - 1.0) / 2_147_483_646.0);
    }

    #[test]
    fn zero_seed_is_not_degenerate() {
        let mut rng = LcgRng::new(0);
        let a = rng.next_f64();
        let b = rng.next_f64();
        assert_ne!(a, b, "zero seed must not lock the stream");
        let mut modulus = LcgRng::new(MODULUS);
        assert_ne!(modulus.next_f64(), modulus.next_f64());
    }

    #[test]
    fn outputs_stay_in_unit_interval() {
        let mut rng = LcgRng::new(123_456);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "{v} outside [0,1)");
        }
    }

    #[test]
    fn seed_from_tag_matches_polynomial_hash() {
        // "ab" = 97 * 31 + 98
        assert_eq!(seed_from_tag("ab"), 97 * 31 + 98);
        assert_eq!(seed_from_tag("COMED-0001"), seed_from_tag("COMED-0001"));
        assert_ne!(seed_from_tag("COMED-0001"), seed_from_tag("COMED-0002"));
    }

    #[test]
    fn seed_from_tag_is_never_zero() {
        assert_eq!(seed_from_tag(""), 1);
        assert!(seed_from_tag("\0") >= 1);
    }

    #[test]
    fn seed_from_tag_wraps_like_i32() {
        // Long tags overflow i32 many times; the result must stay positive.
        let tag = "X".repeat(500);
        let seed = seed_from_tag(&tag);
        assert!(seed >= 1);
        assert!(u64::from(seed) <= 2_147_483_648);
    }

    #[test]
    fn channels_are_independent_streams() {
        let bank = ChannelBank::for_tag("PECO-0007");
        let mut a = bank.for_channel(Channel::Location);
        let mut b = bank.for_channel(Channel::WorkOrders);
        let xs: Vec<f64> = (0..5).map(|_| a.next_f64()).collect();
        let ys: Vec<f64> = (0..5).map(|_| b.next_f64()).collect();
        assert_ne!(xs, ys);

        let mut again = bank.for_channel(Channel::Location);
        let zs: Vec<f64> = (0..5).map(|_| again.next_f64()).collect();
        assert_eq!(xs, zs, "same channel must replay");
    }

    #[test]
    fn channel_streams_skip_the_warm_up() {
        let bank = ChannelBank::new(500);
        let mut raw = LcgRng::new(500 + Channel::Scenario.offset());
        for _ in 0..WARM_UP_DRAWS {
            raw.next_f64();
        }
        assert_eq!(bank.for_channel(Channel::Scenario).next_f64(), raw.next_f64());
    }

    #[test]
    fn adjacent_tags_start_far_apart() {
        // COMED-0001..0040 hash to consecutive seeds; their first draws
        // must cover the unit interval, not a sliver of it.
        let firsts: Vec<f64> = (1..=40)
            .map(|n| {
                let bank = ChannelBank::for_tag(&format!("COMED-{n:04}"));
                bank.for_channel(Channel::Attributes).next_f64()
            })
            .collect();
        for decile in 0..10u8 {
            let lo = f64::from(decile) / 10.0;
            assert!(
                firsts.iter().any(|v| (lo..lo + 0.1).contains(v)),
                "no first draw in [{lo:.1}, {:.1})", lo + 0.1
            );
        }
    }

    #[test]
    fn int_range_is_inclusive_and_bounded() {
        let mut rng = LcgRng::new(77);
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..5_000 {
            let v = rng.int_range(1, 6);
            assert!((1..=6).contains(&v));
            seen_lo |= v == 1;
            seen_hi |= v == 6;
        }
        assert!(seen_lo && seen_hi);
    }
}
