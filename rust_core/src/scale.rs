//! Fixed-point decoding for chain-encoded numeric strings.
//!
//! The upstream query service transmits every numeric field as an integer
//! string scaled by an implicit power of ten: prices carry 6 decimals,
//! quantities 18. Decoding divides by `10^decimals` to recover the real
//! value.
//!
//! Malformed input decodes to 0.0 instead of failing: upstream data is
//! best-effort, and a single bad field must not abort a whole fetch.

/// Decimal places used for price fields.
pub const PRICE_DECIMALS: u32 = 6;

/// Decimal places used for quantity fields.
pub const QUANTITY_DECIMALS: u32 = 18;

/// Decode a fixed-point integer string with the given number of decimals.
///
/// Returns 0.0 for anything that does not parse as a number.
pub fn decode_scaled(raw: &str, decimals: u32) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) => value / 10f64.powi(decimals as i32),
        Err(_) => {
            tracing::debug!(raw, decimals, "unparseable fixed-point field, substituting 0.0");
            0.0
        }
    }
}

/// Decode a price field (6 decimals by upstream convention).
pub fn decode_price(raw: &str) -> f64 {
    decode_scaled(raw, PRICE_DECIMALS)
}

/// Decode a quantity field (18 decimals by upstream convention).
pub fn decode_quantity(raw: &str) -> f64 {
    decode_scaled(raw, QUANTITY_DECIMALS)
}
