//! Common types and utilities
//!
//! Type aliases matching the DMG bus widths and the bit helpers every
//! register-level component shares.

/// 8-bit unsigned integer (Game Boy byte)
pub type Byte = u8;

/// 16-bit unsigned integer (Game Boy word)
pub type Word = u16;

/// Check if a specific bit is set in a byte value
///
/// # Arguments
/// * `value` - The byte value to check
/// * `n` - The bit position (0-7)
#[inline]
pub fn bit(value: Byte, n: u8) -> bool {
    (value & (1 << n)) != 0
}

/// Set or clear a specific bit in a byte value in place
///
/// # Arguments
/// * `value` - Mutable reference to the byte value
/// * `n` - The bit position (0-7)
/// * `on` - `true` to set the bit, `false` to clear it
#[inline]
pub fn bit_set(value: &mut Byte, n: u8, on: bool) {
    if on {
        *value |= 1 << n;
    } else {
        *value &= !(1 << n);
    }
}

/// Return `value` with bit `n` set
#[inline]
pub fn with_bit(value: Byte, n: u8) -> Byte {
    value | (1 << n)
}

/// Return `value` with bit `n` cleared
#[inline]
pub fn without_bit(value: Byte, n: u8) -> Byte {
    value & !(1 << n)
}
