use crate::element::Element;
use crate::filter::{Filter, FilterContext, Forward};

/// Drops lines and shapes too small to be seen at the level.
///
/// The minimum size is `threshold << shift`, compared against the larger
/// side of the bounding box, inclusively. Routable roads and features
/// marked to skip the filter are always kept.
pub struct SizeFilter {
    threshold: i32,
}

impl SizeFilter {
    pub fn new(threshold: i32) -> Self {
        SizeFilter { threshold }
    }

    #[inline]
    pub fn min_size(&self, shift: u8) -> i32 {
        self.threshold << shift
    }
}

impl Filter for SizeFilter {
    fn name(&self) -> &'static str {
        "size"
    }

    fn apply(&self, element: Element, context: &FilterContext<'_>, forward: &mut Forward<'_>) {
        let config = context.config;

        let exempt = match &element {
            Element::Point(_) => true,
            Element::Road(_) => config.has_net && config.routable,
            _ => false,
        } || element.feature().skip_size_filter;

        if exempt {
            return forward.pass(element);
        }

        let min_size = self.min_size(config.shift);
        let large_enough = element
            .bounds()
            .is_some_and(|bounds| bounds.max_dimension() >= min_size);

        if large_enough {
            forward.pass(element);
        }
    }
}
