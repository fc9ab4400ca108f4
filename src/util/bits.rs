//! Width checks for the fixed-size fields of the binary layout.
//!
//! Every packed field goes through one of these before being written,
//! so an out-of-range value surfaces as an error instead of bleeding
//! into its neighbouring bits.

use std::fmt::{Display, Formatter};

/// A value out of range for the bit field it is destined for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWidth {
    pub field: &'static str,
    pub value: i64,
    pub bits: u8,
}

impl Display for FieldWidth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "value {} is out of range for the {}-bit field `{}`",
            self.value, self.bits, self.field
        )
    }
}

impl std::error::Error for FieldWidth {}

/// Checks an unsigned field, returning the value as `u32` when it fits.
#[inline]
pub fn unsigned(field: &'static str, value: i64, bits: u8) -> Result<u32, FieldWidth> {
    let max = (1i64 << bits) - 1;
    if (0..=max).contains(&value) {
        Ok(value as u32)
    } else {
        Err(FieldWidth { field, value, bits })
    }
}

/// Checks an unsigned field which only takes values up to `max`, short
/// of what its width could hold.
#[inline]
pub fn bounded(field: &'static str, value: i64, bits: u8, max: i64) -> Result<u32, FieldWidth> {
    match unsigned(field, value, bits)? {
        fits if value <= max => Ok(fits),
        _ => Err(FieldWidth { field, value, bits }),
    }
}

/// Checks a two's complement field, returning the value masked to `bits`.
#[inline]
pub fn signed(field: &'static str, value: i64, bits: u8) -> Result<u32, FieldWidth> {
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << (bits - 1)) - 1;
    if (min..=max).contains(&value) {
        Ok((value & ((1i64 << bits) - 1)) as u32)
    } else {
        Err(FieldWidth { field, value, bits })
    }
}
