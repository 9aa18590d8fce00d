use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::allocation::{OptimizationResult, optimize};
use crate::error::BookingError;
use crate::money::Money;

// ============================================================================
// Boundary shapes - what a frontend or server adapter hands us
// ============================================================================

/// Request body: free rooms per tier plus decimal client offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[serde(rename_all = "camelCase")]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct OptimizeBookingsRequest {
    pub free_premium_rooms: i64,
    pub free_economy_rooms: i64,
    pub client_offers: Vec<f64>,
}

impl OptimizeBookingsRequest {
    /// Convert decimal offers to canonical amounts. The first bad offer fails
    /// the whole request.
    pub fn offers(&self) -> Result<Vec<Money>, BookingError> {
        self.client_offers
            .iter()
            .map(|&offer| Money::from_decimal(offer))
            .collect()
    }
}

pub fn handle_request(
    request: &OptimizeBookingsRequest,
) -> Result<OptimizationResult, BookingError> {
    let offers = request.offers()?;
    optimize(
        request.free_premium_rooms,
        request.free_economy_rooms,
        &offers,
    )
}

/// JSON in, JSON out. Money is rendered as `{"euros":..,"cents":..}`.
pub fn optimize_bookings_json(request_json: &str) -> Result<String, BookingError> {
    let request: OptimizeBookingsRequest = serde_json::from_str(request_json)?;
    let result = handle_request(&request)?;
    Ok(serde_json::to_string(&result)?)
}
