use bytes::BufMut;

use crate::geo::Coord;
use crate::level::error::SubdivisionError;
use crate::level::subdivision::{half_extents, Subdivision, TypeFlags};
use crate::util::bits;

/// Largest half width a header can carry, bit 15 marks the last sibling.
pub const MAX_HALF_WIDTH: i64 = 0x7fff;
pub const MAX_HALF_HEIGHT: i64 = 0xffff;

const LAST_SIBLING: u16 = 1 << 15;

/// The fixed layout a subdivision is written as.
///
/// | bytes | field |
/// |---|---|
/// | 3 | region data pointer |
/// | 1 | element type flags |
/// | 3 | centre longitude, signed |
/// | 3 | centre latitude, signed |
/// | 2 | half width in level steps, bit 15 set on the last sibling |
/// | 2 | half height in level steps |
/// | 2 | number of the first child, only present with children |
///
/// All fields are little endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubdivisionHeader {
    pub region_offset: u32,
    pub flags: TypeFlags,
    pub center: Coord,
    pub half_width: u16,
    pub half_height: u16,
    pub last: bool,
    pub first_child: Option<u16>,
}

impl SubdivisionHeader {
    pub const LEAF_LEN: usize = 14;
    pub const NODE_LEN: usize = 16;

    /// Describes `subdivision`, whose region data starts at `region_offset`.
    ///
    /// Fails when the subdivision spans further than its level can encode.
    pub fn describe(subdivision: &Subdivision, region_offset: u32) -> Result<Self, SubdivisionError> {
        let (half_width, half_height) = half_extents(&subdivision.bounds(), subdivision.shift());

        let too_large = |span: i64, max: i64| SubdivisionError::SpanTooLarge {
            level: subdivision.level(),
            subdivision: subdivision.number(),
            span,
            max,
        };

        if half_width > MAX_HALF_WIDTH {
            return Err(too_large(half_width, MAX_HALF_WIDTH));
        }

        if half_height > MAX_HALF_HEIGHT {
            return Err(too_large(half_height, MAX_HALF_HEIGHT));
        }

        Ok(SubdivisionHeader {
            region_offset,
            flags: subdivision.type_flags(),
            center: subdivision.center(),
            half_width: half_width as u16,
            half_height: half_height as u16,
            last: subdivision.is_last(),
            first_child: subdivision.first_child(),
        })
    }

    pub fn encoded_len(&self) -> usize {
        match self.first_child {
            Some(_) => Self::NODE_LEN,
            None => Self::LEAF_LEN,
        }
    }

    pub fn encode(&self, buf: &mut impl BufMut) -> Result<(), SubdivisionError> {
        let region = bits::unsigned("region pointer", self.region_offset as i64, 24)?;
        let lon = bits::signed("centre longitude", self.center.lon as i64, 24)?;
        let lat = bits::signed("centre latitude", self.center.lat as i64, 24)?;
        let width = bits::unsigned("half width", self.half_width as i64, 15)? as u16;

        buf.put_uint_le(region as u64, 3);
        buf.put_u8(self.flags.bits());
        buf.put_uint_le(lon as u64, 3);
        buf.put_uint_le(lat as u64, 3);
        buf.put_u16_le(if self.last { width | LAST_SIBLING } else { width });
        buf.put_u16_le(self.half_height);

        if let Some(child) = self.first_child {
            buf.put_u16_le(child);
        }

        Ok(())
    }
}
