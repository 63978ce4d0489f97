use serde_json::Value;

use super::ApiError;

pub const MIN_STAR_RATING: f64 = 0.0;
pub const MAX_STAR_RATING: f64 = 10.0;

/// Returns the trimmed value when it is present and not blank.
pub fn required_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub fn validate_star_rating(rating: f64) -> Result<f64, ApiError> {
    if !rating.is_finite() || !(MIN_STAR_RATING..=MAX_STAR_RATING).contains(&rating) {
        return Err(ApiError::validation(
            "Invalid 'star_rating'. It must be between 0.0 and 10.0",
        ));
    }
    Ok(rating)
}

/// Reads `expiration_hours` from a token request body.
///
/// An empty body, a missing field or `null` all mean "use the default".
/// Numbers and numeric strings are accepted; the range is checked by the issuer.
pub fn parse_expiration_hours(body: &[u8]) -> Result<Option<f64>, ApiError> {
    const INVALID: &str = "expiration_hours must be a positive number";

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::validation(format!("Invalid JSON body: {e}")))?;

    let Value::Object(map) = value else {
        return Err(ApiError::validation("Request body must be a JSON object"));
    };

    match map.get("expiration_hours") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| ApiError::validation(INVALID)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ApiError::validation(INVALID)),
        Some(_) => Err(ApiError::validation(INVALID)),
    }
}
