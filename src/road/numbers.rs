use strum::{AsRefStr, Display, EnumString};

/// Which house numbers a side of the road carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum NumberStyle {
    #[default]
    None = 0,
    Even = 1,
    Odd = 2,
    Both = 3,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberRange {
    pub style: NumberStyle,
    pub start: u32,
    pub end: u32,
}

impl NumberRange {
    pub const fn new(style: NumberStyle, start: u32, end: u32) -> Self {
        NumberRange { style, start, end }
    }

    pub const fn none() -> Self {
        NumberRange {
            style: NumberStyle::None,
            start: 0,
            end: 0,
        }
    }
}

/// An address range, anchored to the road point at `index` and running
/// until the next record's anchor (or the end of the road).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numbers {
    pub index: usize,
    pub left: NumberRange,
    pub right: NumberRange,
    node_number: Option<u32>,
}

impl Numbers {
    pub fn new(index: usize, left: NumberRange, right: NumberRange) -> Self {
        Numbers {
            index,
            left,
            right,
            node_number: None,
        }
    }

    /// Position of the anchoring point among the road's node points,
    /// known once the network has finalised the road.
    pub fn node_number(&self) -> Option<u32> {
        self.node_number
    }

    pub(crate) fn assign_node_number(&mut self, node_number: u32) {
        self.node_number = Some(node_number);
    }
}
