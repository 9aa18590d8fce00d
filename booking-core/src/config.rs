use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Price at or above which an offer counts as a premium ("high") offer.
pub const DEFAULT_PREMIUM_THRESHOLD: Money = Money::from_euros(100);

/// Tunables for the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizerConfig {
    /// Offers priced `>=` this go to premium rooms first; the rest are economy
    /// offers, upgradable into leftover premium rooms.
    pub premium_threshold: Money,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            premium_threshold: DEFAULT_PREMIUM_THRESHOLD,
        }
    }
}

impl OptimizerConfig {
    pub fn with_premium_threshold(mut self, threshold: Money) -> Self {
        self.premium_threshold = threshold;
        self
    }
}
