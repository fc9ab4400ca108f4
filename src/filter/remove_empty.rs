use crate::element::Element;
use crate::filter::{Filter, FilterContext, Forward};

/// Drops lines left with fewer than two points and shapes left with
/// fewer than four, which happens once rounding has collapsed them.
pub struct RemoveEmptyFilter;

impl Filter for RemoveEmptyFilter {
    fn name(&self) -> &'static str {
        "remove_empty"
    }

    fn apply(&self, element: Element, _: &FilterContext<'_>, forward: &mut Forward<'_>) {
        let keep = match &element {
            Element::Point(_) => true,
            Element::Line(_) | Element::Road(_) => element.points().len() >= 2,
            Element::Shape(_) => element.points().len() >= 4,
        };

        if keep {
            forward.pass(element);
        }
    }
}
