//! Compact (`nBits`) target decoding, difficulty calculation, and the
//! retarget algorithm.

use uint::construct_uint;

use crate::error::SPVError;
use crate::primitives::{reverse_endianness, safe_slice};

construct_uint! {
    /// A 256-bit unsigned integer, used for proof-of-work targets and
    /// cumulative difficulty. Arithmetic here truncates to 256 bits on
    /// overflow rather than panicking, matching Bitcoin Core's
    /// `arith_uint256`.
    pub struct U256(4);
}

/// The difficulty-1 target: `0xffff0000` followed by 192 zero bits,
/// i.e. `0xffff0000 * 2^192`.
pub const DIFF_ONE_TARGET: U256 = U256([0, 0, 0, 0xffff_0000]);

/// Bitcoin's retarget period, in seconds (two weeks).
pub const RETARGET_PERIOD: u64 = 1_209_600;

/// Shifts `x` left (`bits >= 0`) or right (`bits < 0`) by `bits.abs()`,
/// saturating to zero rather than panicking when the shift distance
/// reaches or exceeds the 256-bit width.
fn shift_u256(x: U256, bits: i32) -> U256 {
    if bits >= 0 {
        let bits = bits as u32;
        if bits >= 256 {
            U256::zero()
        } else {
            x << bits as usize
        }
    } else {
        let bits = (-bits) as u32;
        if bits >= 256 {
            U256::zero()
        } else {
            x >> bits as usize
        }
    }
}

/// Decodes the compact `nBits` target encoding at header bytes `[72, 76)`
/// into a full 256-bit target.
pub fn extract_target(header: &[u8]) -> Result<U256, SPVError> {
    let mantissa_le = safe_slice(header, 72, 75)?;
    let mantissa = U256::from_big_endian(&reverse_endianness(mantissa_le));
    let exponent = safe_slice(header, 75, 76)?[0] as i32;
    Ok(shift_u256(mantissa, (exponent - 3) * 8))
}

/// Converts a target into its corresponding difficulty
/// (`DIFF_ONE_TARGET / target`). Returns zero for a zero target, since
/// division by zero has no meaningful difficulty value.
pub fn calculate_difficulty(target: U256) -> U256 {
    if target.is_zero() {
        U256::zero()
    } else {
        DIFF_ONE_TARGET / target
    }
}

/// Decodes a header's target and converts it directly to a difficulty.
pub fn extract_difficulty(header: &[u8]) -> Result<U256, SPVError> {
    Ok(calculate_difficulty(extract_target(header)?))
}

/// Computes the new target for the next retarget period, given the
/// previous target and the first/second timestamps of the just-elapsed
/// period. The elapsed time is clamped to `[period/4, period*4]` before
/// being applied, matching Bitcoin's consensus rule against target swings
/// larger than 4x in either direction.
pub fn retarget_algorithm(previous_target: U256, first_timestamp: u64, second_timestamp: u64) -> U256 {
    let lower_bound = RETARGET_PERIOD / 4;
    let upper_bound = RETARGET_PERIOD * 4;
    let elapsed = second_timestamp
        .saturating_sub(first_timestamp)
        .clamp(lower_bound, upper_bound);
    let (product, _overflowed) = previous_target.overflowing_mul(U256::from(elapsed));
    product / U256::from(RETARGET_PERIOD)
}
