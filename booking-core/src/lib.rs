use wasm_bindgen::prelude::*;

pub mod allocation;
pub mod config;
pub mod error;
pub mod money;
pub mod request;

pub use allocation::*;
pub use config::*;
pub use error::*;
pub use money::*;
pub use request::{OptimizeBookingsRequest, handle_request};

#[cfg(feature = "instrument")]
pub use instrument;

// ============================================================================
// WASM API
// ============================================================================

/// Allocate rooms for a typed request.
#[wasm_bindgen(js_name = optimizeBookings)]
pub fn optimize_bookings(
    request: OptimizeBookingsRequest,
) -> Result<OptimizationResult, JsError> {
    // Better panic messages in browser console
    console_error_panic_hook::set_once();

    Ok(handle_request(&request)?)
}

/// Allocate rooms for a JSON request body, returning the JSON response body.
#[wasm_bindgen(js_name = optimizeBookingsJson)]
pub fn optimize_bookings_json(request_json: &str) -> Result<String, JsError> {
    console_error_panic_hook::set_once();

    Ok(request::optimize_bookings_json(request_json)?)
}
