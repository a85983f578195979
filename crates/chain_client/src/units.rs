//! Hex decoding and decimal formatting of on-chain integers.

use crate::error::{ChainError, Result};

pub const ETHER_DECIMALS: u32 = 18;

const WORD_HEX_LEN: usize = 64;

fn strip_prefix(hex: &str) -> &str {
    hex.strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex)
}

fn parse_hex_u128(digits: &str, original: &str) -> Result<u128> {
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    if significant.len() > 32 {
        return Err(ChainError::Overflow(original.to_string()));
    }
    u128::from_str_radix(significant, 16)
        .map_err(|e| ChainError::InvalidResponse(format!("{original}: {e}")))
}

/// Parses a JSON-RPC quantity such as `"0x1bc16d674ec80000"`.
pub fn parse_quantity(hex: &str) -> Result<u128> {
    parse_hex_u128(strip_prefix(hex), hex)
}

/// Decodes the `index`-th 32-byte word of ABI-encoded return data.
pub fn decode_word(data: &str, index: usize) -> Result<u128> {
    let digits = strip_prefix(data);
    let start = index * WORD_HEX_LEN;
    let word = digits.get(start..start + WORD_HEX_LEN).ok_or_else(|| {
        ChainError::InvalidResponse(format!(
            "return data has {} hex digits, word {} needs {}",
            digits.len(),
            index,
            start + WORD_HEX_LEN
        ))
    })?;
    parse_hex_u128(word, data)
}

/// Renders `value / 10^decimals` exactly, keeping at least one fractional digit.
pub fn format_units(value: u128, decimals: u32) -> String {
    let decimals = decimals as usize;
    let digits = value.to_string();
    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{fraction}")
    }
}

pub fn format_ether(wei: u128) -> String {
    format_units(wei, ETHER_DECIMALS)
}
