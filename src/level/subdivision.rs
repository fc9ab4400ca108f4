use bitflags::bitflags;

use crate::element::{Element, Feature};
use crate::geo::{Area, Coord};

/// Most elements of one category a subdivision may hold.
pub const MAX_ELEMENTS: usize = 0xff;

/// Most coordinates a subdivision may hold across all its elements.
pub const MAX_POINTS: usize = 0x4000;

bitflags! {
    /// Element categories present in a subdivision, as laid out in
    /// the type byte of its header.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u8 {
        const POINTS = 0x10;
        const INDEXED_POINTS = 0x20;
        const LINES = 0x40;
        const SHAPES = 0x80;
    }
}

/// City points are indexed for search, others are plain points.
#[inline]
pub fn is_indexed(feature: &Feature) -> bool {
    (0x01..=0x11).contains(&feature.type_code)
}

/// Element and coordinate counts of a set of elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub points: usize,
    pub indexed_points: usize,
    pub lines: usize,
    pub shapes: usize,
    pub coordinates: usize,
}

impl Counts {
    pub fn of<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Self {
        elements.into_iter().fold(Counts::default(), |mut counts, element| {
            match element {
                Element::Point(p) if is_indexed(&p.feature) => counts.indexed_points += 1,
                Element::Point(_) => counts.points += 1,
                Element::Line(_) | Element::Road(_) => counts.lines += 1,
                Element::Shape(_) => counts.shapes += 1,
            }

            counts.coordinates += element.points().len();
            counts
        })
    }

    pub fn fits(&self) -> bool {
        self.points <= MAX_ELEMENTS
            && self.indexed_points <= MAX_ELEMENTS
            && self.lines <= MAX_ELEMENTS
            && self.shapes <= MAX_ELEMENTS
            && self.coordinates <= MAX_POINTS
    }

    pub fn type_flags(&self) -> TypeFlags {
        let mut flags = TypeFlags::empty();
        flags.set(TypeFlags::POINTS, self.points > 0);
        flags.set(TypeFlags::INDEXED_POINTS, self.indexed_points > 0);
        flags.set(TypeFlags::LINES, self.lines > 0);
        flags.set(TypeFlags::SHAPES, self.shapes > 0);
        flags
    }
}

/// Half extents of `bounds` around its centre, in grid steps of `shift`,
/// rounded up.
pub fn half_extents(bounds: &Area, shift: u8) -> (i64, i64) {
    let center = bounds.center();
    let step = 1i64 << shift;

    let half = |min: i32, mid: i32, max: i32| {
        let units = (max as i64 - mid as i64).max(mid as i64 - min as i64);
        (units + step - 1) >> shift
    };

    (
        half(bounds.min_lon, center.lon, bounds.max_lon),
        half(bounds.min_lat, center.lat, bounds.max_lat),
    )
}

/// One node of the partition tree of a level.
#[derive(Debug, Clone)]
pub struct Subdivision {
    pub(crate) number: u16,
    pub(crate) level: u8,
    pub(crate) resolution: u8,
    pub(crate) shift: u8,
    /// The partition cell the subdivision was made for.
    pub(crate) cell: Area,
    /// Covers the cell's members, which may reach outside the cell.
    pub(crate) bounds: Area,
    pub(crate) elements: Vec<Element>,
    pub(crate) parent: Option<u16>,
    pub(crate) first_child: Option<u16>,
    pub(crate) last: bool,
}

impl Subdivision {
    /// Numbered from one, in level order.
    pub fn number(&self) -> u16 {
        self.number
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    pub fn shift(&self) -> u8 {
        self.shift
    }

    pub fn cell(&self) -> Area {
        self.cell
    }

    pub fn bounds(&self) -> Area {
        self.bounds
    }

    pub fn center(&self) -> Coord {
        self.bounds.center()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn parent(&self) -> Option<u16> {
        self.parent
    }

    pub fn first_child(&self) -> Option<u16> {
        self.first_child
    }

    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }

    /// Last of its parent's children.
    pub fn is_last(&self) -> bool {
        self.last
    }

    pub fn counts(&self) -> Counts {
        Counts::of(&self.elements)
    }

    pub fn type_flags(&self) -> TypeFlags {
        self.counts().type_flags()
    }
}
