use std::fmt;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::config::OptimizerConfig;
use crate::error::BookingError;
use crate::money::Money;

// ============================================================================
// Tiers & Capacities
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Premium,
    Economy,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Premium => f.write_str("premium"),
            Tier::Economy => f.write_str("economy"),
        }
    }
}

/// Free rooms per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capacities {
    pub premium: usize,
    pub economy: usize,
}

impl Capacities {
    pub fn new(premium: usize, economy: usize) -> Self {
        Self { premium, economy }
    }

    /// Validate caller-supplied room counts. Negative counts are rejected.
    pub fn try_new(premium: i64, economy: i64) -> Result<Self, BookingError> {
        Ok(Self {
            premium: checked_capacity(Tier::Premium, premium)?,
            economy: checked_capacity(Tier::Economy, economy)?,
        })
    }
}

fn checked_capacity(tier: Tier, capacity: i64) -> Result<usize, BookingError> {
    usize::try_from(capacity).map_err(|_| BookingError::InvalidCapacity { tier, capacity })
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
pub struct TierResult {
    pub booked_rooms: usize,
    pub total_income: Money,
}

impl TierResult {
    fn from_bookings<'a>(bookings: impl IntoIterator<Item = &'a Money>) -> Self {
        bookings
            .into_iter()
            .fold(TierResult::default(), |acc, price| TierResult {
                booked_rooms: acc.booked_rooms + 1,
                total_income: acc.total_income + *price,
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct OptimizationResult {
    pub premium: TierResult,
    pub economy: TierResult,
}

impl OptimizationResult {
    pub fn total_booked(&self) -> usize {
        self.premium.booked_rooms + self.economy.booked_rooms
    }

    pub fn total_income(&self) -> Money {
        self.premium.total_income + self.economy.total_income
    }
}

// ============================================================================
// Problem Instance - the derived view of one optimization call
// ============================================================================

/// Offers split at the premium threshold and ranked best-first.
///
/// Everything else (which offers are booked where, which are rejected) is
/// index arithmetic over the two sorted lists:
///
/// ```text
/// high: [ true premium ............ | rejected ]
/// low:  [ upgraded | true economy   | rejected ]
///         ^ premium rooms ^ economy rooms
/// ```
#[derive(Debug, Clone)]
pub struct ProblemInstance {
    capacities: Capacities,
    threshold: Money,
    high: Vec<Money>,
    low: Vec<Money>,
}

impl ProblemInstance {
    pub fn new(capacities: Capacities, offers: &[Money], config: &OptimizerConfig) -> Self {
        let threshold = config.premium_threshold;
        let (mut high, mut low): (Vec<Money>, Vec<Money>) =
            offers.iter().partition(|&&offer| offer >= threshold);

        // Stable: equal prices keep their input order, so results are reproducible.
        high.sort_by(|a, b| b.cmp(a));
        low.sort_by(|a, b| b.cmp(a));

        Self {
            capacities,
            threshold,
            high,
            low,
        }
    }

    pub fn capacities(&self) -> Capacities {
        self.capacities
    }

    pub fn threshold(&self) -> Money {
        self.threshold
    }

    /// Offers at or above the threshold, best first.
    pub fn high_offers(&self) -> &[Money] {
        &self.high
    }

    /// Offers below the threshold, best first.
    pub fn low_offers(&self) -> &[Money] {
        &self.low
    }

    /// High offers booked into premium rooms at their own price.
    pub fn true_premium(&self) -> &[Money] {
        &self.high[..self.high.len().min(self.capacities.premium)]
    }

    /// Premium rooms left over once every high offer that fits is booked.
    pub fn upgrade_capacity(&self) -> usize {
        self.capacities.premium - self.true_premium().len()
    }

    /// How many low offers can be booked at all, as economy or as upgrades.
    pub fn low_offer_capacity(&self) -> usize {
        self.capacities
            .economy
            .saturating_add(self.upgrade_capacity())
    }

    fn accepted_low_count(&self) -> usize {
        self.low.len().min(self.low_offer_capacity())
    }

    /// Low offers that overflow economy spill into premium. Bounded by
    /// `upgrade_capacity` because accepted low offers never exceed
    /// `economy + upgrade_capacity`.
    fn upgraded_count(&self) -> usize {
        self.accepted_low_count()
            .saturating_sub(self.capacities.economy)
    }

    /// Accepted low offers, best first. Upgrades lead, true economy follows.
    pub fn accepted_low(&self) -> &[Money] {
        &self.low[..self.accepted_low_count()]
    }

    /// Best low offers, booked into leftover premium rooms at their own price.
    pub fn upgraded_economy(&self) -> &[Money] {
        &self.low[..self.upgraded_count()]
    }

    /// Low offers booked into economy rooms.
    pub fn true_economy(&self) -> &[Money] {
        &self.low[self.upgraded_count()..self.accepted_low_count()]
    }

    /// Offers that did not get a room: high offers beyond premium capacity,
    /// then low offers beyond the low-offer capacity.
    pub fn rejected(&self) -> impl Iterator<Item = &Money> + '_ {
        self.high[self.true_premium().len()..]
            .iter()
            .chain(&self.low[self.accepted_low_count()..])
    }

    pub fn result(&self) -> OptimizationResult {
        OptimizationResult {
            premium: TierResult::from_bookings(
                self.true_premium().iter().chain(self.upgraded_economy()),
            ),
            economy: TierResult::from_bookings(self.true_economy()),
        }
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Allocate rooms with the default 100.00 premium threshold.
pub fn optimize(
    premium_capacity: i64,
    economy_capacity: i64,
    offers: &[Money],
) -> Result<OptimizationResult, BookingError> {
    optimize_with(
        &OptimizerConfig::default(),
        premium_capacity,
        economy_capacity,
        offers,
    )
}

/// Allocate rooms among `offers`.
///
/// High offers fill premium rooms best-first. Low offers fill economy rooms
/// best-first; when they overflow economy, the best of them are upgraded into
/// any premium rooms the high offers left empty, still at their own price.
/// Everything else is rejected.
pub fn optimize_with(
    config: &OptimizerConfig,
    premium_capacity: i64,
    economy_capacity: i64,
    offers: &[Money],
) -> Result<OptimizationResult, BookingError> {
    let capacities = Capacities::try_new(premium_capacity, economy_capacity)?;
    let instance = ProblemInstance::new(capacities, offers, config);

    #[cfg(feature = "instrument")]
    tracing::debug!(
        threshold = %instance.threshold(),
        high = instance.high_offers().len(),
        low = instance.low_offers().len(),
        "partitioned offers"
    );

    let result = instance.result();

    #[cfg(feature = "instrument")]
    tracing::info!(
        target: "allocation",
        offers = offers.len() as u64,
        high_offers = instance.high_offers().len() as u64,
        low_offers = instance.low_offers().len() as u64,
        premium_capacity = capacities.premium as u64,
        economy_capacity = capacities.economy as u64,
        upgrade_capacity = instance.upgrade_capacity() as u64,
        premium_booked = result.premium.booked_rooms as u64,
        economy_booked = result.economy.booked_rooms as u64,
        upgraded = instance.upgraded_economy().len() as u64,
        rejected = instance.rejected().count() as u64,
        premium_income_cents = saturating_cents(result.premium.total_income),
        economy_income_cents = saturating_cents(result.economy.total_income),
    );

    Ok(result)
}

#[cfg(feature = "instrument")]
fn saturating_cents(amount: Money) -> u64 {
    u64::try_from(amount.cents_total()).unwrap_or(u64::MAX)
}
