//! Input checks performed before any network I/O.

use url::Url;

use crate::error::{BtebError, Result};

/// Longest roll number the board has issued is six digits; leave headroom.
pub const MAX_ROLL_DIGITS: usize = 12;

/// Validate a student roll number and return it trimmed.
pub fn validate_roll(roll: &str) -> Result<String> {
    let trimmed = roll.trim();
    if trimmed.is_empty() {
        return Err(BtebError::invalid_roll(roll, "Student ID is required"));
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(BtebError::invalid_roll(
            roll,
            "Roll number must contain digits only",
        ));
    }
    if trimmed.len() > MAX_ROLL_DIGITS {
        return Err(BtebError::invalid_roll(
            roll,
            format!("Roll number must be at most {MAX_ROLL_DIGITS} digits"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate the result-service endpoint. Only http and https are accepted.
pub fn validate_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|e| {
        BtebError::config_error("api_url", format!("Invalid URL '{endpoint}': {e}"))
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(BtebError::config_error(
                "api_url",
                format!("Unsupported URL scheme '{other}', expected http or https"),
            ))
        }
    }

    if url.host_str().is_none() {
        return Err(BtebError::config_error(
            "api_url",
            format!("URL '{endpoint}' has no host"),
        ));
    }

    Ok(url)
}
