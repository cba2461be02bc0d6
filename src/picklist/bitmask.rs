//! `validFor` bitmap decoding
//!
//! Each value of a controlling picklist carries a base64 bitmap with one bit
//! per value of the dependent picklist. Bit `n` lives in byte `n / 8`, at
//! offset `n % 8` counted from the least significant bit.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

/// Standard alphabet, padding optional
const VALID_FOR_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A decoded `validFor` bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFor {
    bytes: Vec<u8>,
}

impl ValidFor {
    /// Decode a base64 bitmap. Returns `None` for malformed input.
    pub fn decode(encoded: &str) -> Option<Self> {
        VALID_FOR_ENGINE
            .decode(encoded.trim())
            .ok()
            .map(|bytes| Self { bytes })
    }

    /// Whether the dependent value at `position` is permitted.
    /// Positions past the end of the bitmap are not.
    pub fn allows(&self, position: usize) -> bool {
        self.bytes
            .get(position / 8)
            .map(|byte| (byte >> (position % 8)) & 1 == 1)
            .unwrap_or(false)
    }

    /// Number of positions the bitmap covers
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8
    }
}

/// Test a single position of an encoded bitmap.
///
/// Fails closed: malformed base64, a negative position or one beyond the
/// decoded bytes all yield `false`.
pub fn is_valid_for_position(valid_for: &str, position: i64) -> bool {
    let Ok(position) = usize::try_from(position) else {
        return false;
    };
    ValidFor::decode(valid_for)
        .map(|bits| bits.allows(position))
        .unwrap_or(false)
}
