//! The shared, per logical road record.
//!
//! A `RoadDef` lives in the [`RoadNetwork`](crate::road::RoadNetwork) arena
//! and is addressed by a [`RoadHandle`]. Every per-level copy of a road
//! carries the handle, never the record itself, so a change made during
//! finalisation is seen by all of them.

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::road::numbers::Numbers;
use crate::util::bits::{self, FieldWidth};

/// Stable index of a `RoadDef` inside its network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoadHandle(pub(crate) u32);

impl RoadHandle {
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RoadFlags: u16 {
        const ONEWAY = 1 << 0;
        const TOLL = 1 << 1;
        const ROUNDABOUT = 1 << 2;
        const CARPOOL = 1 << 3;
        const NO_THROUGH_ROUTING = 1 << 4;
        const PAVED = 1 << 5;
        const FERRY = 1 << 6;
        const SYNTHESIZED = 1 << 7;

        /// Keeps the road out of the routing graph. Never written to the
        /// flag byte, it only steers compilation.
        const SKIP_NOD = 1 << 8;

        const WIRE = 0x00FF;
    }
}

bitflags! {
    /// Vehicle classes, used both for the access byte of a road and the
    /// exemption mask of a turn restriction.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AccessMask: u8 {
        const EMERGENCY = 1 << 0;
        const DELIVERY = 1 << 1;
        const CAR = 1 << 2;
        const BUS = 1 << 3;
        const TAXI = 1 << 4;
        const FOOT = 1 << 5;
        const BICYCLE = 1 << 6;
        const TRUCK = 1 << 7;
    }
}

impl Default for AccessMask {
    fn default() -> Self {
        AccessMask::all()
    }
}

/// Highest road class, the major highways.
pub const MAX_ROAD_CLASS: u8 = 4;

/// Road class, `0..=4` in a 3-bit field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoadClass(u8);

impl RoadClass {
    pub fn new(class: u8) -> Result<Self, FieldWidth> {
        bits::bounded("road_class", class as i64, 3, MAX_ROAD_CLASS as i64)
            .map(|v| RoadClass(v as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Speed category, a 3-bit field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoadSpeed(u8);

impl RoadSpeed {
    pub fn new(speed: u8) -> Result<Self, FieldWidth> {
        bits::unsigned("road_speed", speed as i64, 3).map(|v| RoadSpeed(v as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// Marks the point at `index` of a road as the routing node
/// known upstream as `source_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadNodeRef {
    pub index: usize,
    pub source_id: i64,
}

#[derive(Debug, Clone)]
pub struct RoadDef {
    road_id: u64,
    source_id: i64,
    class: RoadClass,
    speed: RoadSpeed,
    flags: RoadFlags,
    access: AccessMask,
    nodes: Vec<RoadNodeRef>,
    numbers: Vec<Numbers>,
    cities: SmallVec<[u16; 2]>,
    zips: SmallVec<[u16; 2]>,
    skip_house_numbers: bool,
}

impl RoadDef {
    pub fn new(road_id: u64, source_id: i64) -> Self {
        RoadDef {
            road_id,
            source_id,
            class: RoadClass::default(),
            speed: RoadSpeed::default(),
            flags: RoadFlags::empty(),
            access: AccessMask::default(),
            nodes: Vec::new(),
            numbers: Vec::new(),
            cities: SmallVec::new(),
            zips: SmallVec::new(),
            skip_house_numbers: false,
        }
    }

    pub fn with_class(mut self, class: u8) -> Result<Self, FieldWidth> {
        self.class = RoadClass::new(class)?;
        Ok(self)
    }

    pub fn with_speed(mut self, speed: u8) -> Result<Self, FieldWidth> {
        self.speed = RoadSpeed::new(speed)?;
        Ok(self)
    }

    pub fn with_flags(mut self, flags: RoadFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_access(mut self, access: AccessMask) -> Self {
        self.access = access;
        self
    }

    pub fn with_nodes(mut self, nodes: impl IntoIterator<Item = RoadNodeRef>) -> Self {
        self.nodes.extend(nodes);
        self.nodes.sort_by_key(|node| node.index);
        self
    }

    pub fn with_city(mut self, city: u16) -> Self {
        self.cities.push(city);
        self
    }

    pub fn with_zip(mut self, zip: u16) -> Self {
        self.zips.push(zip);
        self
    }

    pub fn road_id(&self) -> u64 {
        self.road_id
    }

    pub fn source_id(&self) -> i64 {
        self.source_id
    }

    pub fn class(&self) -> RoadClass {
        self.class
    }

    pub fn speed(&self) -> RoadSpeed {
        self.speed
    }

    pub fn flags(&self) -> RoadFlags {
        self.flags
    }

    pub fn access(&self) -> AccessMask {
        self.access
    }

    pub fn nodes(&self) -> &[RoadNodeRef] {
        &self.nodes
    }

    pub fn numbers(&self) -> &[Numbers] {
        &self.numbers
    }

    pub fn cities(&self) -> &[u16] {
        &self.cities
    }

    pub fn zips(&self) -> &[u16] {
        &self.zips
    }

    #[inline]
    pub fn is_oneway(&self) -> bool {
        self.flags.contains(RoadFlags::ONEWAY)
    }

    #[inline]
    pub fn is_roundabout(&self) -> bool {
        self.flags.contains(RoadFlags::ROUNDABOUT)
    }

    #[inline]
    pub fn skip_nod(&self) -> bool {
        self.flags.contains(RoadFlags::SKIP_NOD)
    }

    pub fn skip_house_numbers(&self) -> bool {
        self.skip_house_numbers
    }

    pub fn set_speed(&mut self, speed: u8) -> Result<(), FieldWidth> {
        self.speed = RoadSpeed::new(speed)?;
        Ok(())
    }

    pub fn set_class(&mut self, class: u8) -> Result<(), FieldWidth> {
        self.class = RoadClass::new(class)?;
        Ok(())
    }

    pub fn set_flags(&mut self, flags: RoadFlags) {
        self.flags |= flags;
    }

    pub fn set_access(&mut self, access: AccessMask) {
        self.access = access;
    }

    pub fn set_skip_house_numbers(&mut self, skip: bool) {
        self.skip_house_numbers = skip;
    }

    pub(crate) fn set_numbers(&mut self, numbers: Vec<Numbers>) {
        self.numbers = numbers;
    }

    /// Class in bits 4..=6, speed in bits 0..=2.
    pub fn class_speed_byte(&self) -> u8 {
        (self.class.0 << 4) | self.speed.0
    }

    pub fn flag_byte(&self) -> u8 {
        (self.flags & RoadFlags::WIRE).bits() as u8
    }

    pub fn access_byte(&self) -> u8 {
        self.access.bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_class_and_speed() {
        let def = RoadDef::new(1, 100)
            .with_class(4)
            .and_then(|d| d.with_speed(7))
            .unwrap();

        assert_eq!(def.class_speed_byte(), 0b0100_0111);
    }

    #[test]
    fn rejects_wide_class_and_speed() {
        assert!(RoadClass::new(8).is_err());
        assert_eq!(RoadClass::new(4).map(|c| c.value()), Ok(4));
        let valid = (0..=7).filter(|c| RoadClass::new(*c).is_ok()).collect::<Vec<_>>();
        assert_eq!(valid, vec![0, 1, 2, 3, 4]);
        assert!(RoadSpeed::new(9).is_err());

        let mut def = RoadDef::new(1, 100);
        let err = def.set_speed(8).unwrap_err();
        assert_eq!(err.field, "road_speed");
        assert_eq!(def.speed().value(), 0);

        let err = def.set_class(5).unwrap_err();
        assert_eq!((err.field, err.value), ("road_class", 5));
        assert_eq!(def.class().value(), 0);
    }

    #[test]
    fn skip_nod_stays_off_the_wire() {
        let def = RoadDef::new(1, 100)
            .with_flags(RoadFlags::ONEWAY | RoadFlags::FERRY | RoadFlags::SKIP_NOD);

        assert_eq!(def.flag_byte(), 0b0100_0001);
        assert!(def.skip_nod());
    }

    #[test]
    fn access_byte_defaults_to_everyone() {
        let def = RoadDef::new(1, 100);
        assert_eq!(def.access_byte(), 0xFF);

        let def = def.with_access(AccessMask::FOOT | AccessMask::BICYCLE);
        assert_eq!(def.access_byte(), 0b0110_0000);
    }
}
