//! Fixed-point map coordinates and bounding areas.
//!
//! Positions are held in 24-bit map units, where a full turn of 360°
//! spans `2^24` units. A resolution level of `r` bits keeps the top `r`
//! bits of each value, so every level has a `shift` of `24 - r`.

/// Number of bits in a full-precision map unit.
pub const MAP_UNIT_BITS: u8 = 24;

/// Map units per degree of latitude or longitude.
pub const UNITS_PER_DEGREE: f64 = (1u32 << MAP_UNIT_BITS) as f64 / 360.0;

/// Fixed-point map unit.
pub type MapUnit = i32;

pub mod area;
pub mod coord;
#[doc(hidden)]
pub mod error;

#[doc(inline)]
pub use area::Area;
#[doc(inline)]
pub use coord::{Coord, CoordFlags};

/// The bit shift applied to full-precision units at `resolution`.
#[inline]
pub const fn shift_for(resolution: u8) -> u8 {
    MAP_UNIT_BITS.saturating_sub(resolution)
}

/// Rounds `value` down to the grid of `1 << shift` units.
///
/// Arithmetic shifts floor towards negative infinity, so values
/// south or west of the origin round away from it.
#[inline]
pub const fn round_down(value: MapUnit, shift: u8) -> MapUnit {
    (value >> shift) << shift
}

/// Rounds `value` up to the grid of `1 << shift` units.
#[inline]
pub const fn round_up(value: MapUnit, shift: u8) -> MapUnit {
    -round_down(-value, shift)
}

/// Rounds `value` to the nearest grid point of `1 << shift` units.
#[inline]
pub const fn round_nearest(value: MapUnit, shift: u8) -> MapUnit {
    if shift == 0 {
        return value;
    }

    round_down(value + (1 << (shift - 1)), shift)
}
