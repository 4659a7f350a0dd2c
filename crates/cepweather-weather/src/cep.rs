//! CEP (Brazilian postal code) normalization.

use crate::types::WeatherError;

/// Number of digits in a CEP
pub const CEP_LEN: usize = 8;

/// Trim surrounding whitespace and require exactly eight ASCII digits.
///
/// No other normalization happens: `01310-100` is rejected, not rewritten.
pub fn normalize(raw: &str) -> Result<&str, WeatherError> {
    let trimmed = raw.trim();
    if is_valid(trimmed) {
        Ok(trimmed)
    } else {
        Err(WeatherError::InvalidCep)
    }
}

/// True when `cep` is exactly eight ASCII digits, with nothing around them.
pub fn is_valid(cep: &str) -> bool {
    cep.len() == CEP_LEN && cep.bytes().all(|b| b.is_ascii_digit())
}
