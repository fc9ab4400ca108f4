use crate::element::Element;
use crate::filter::{Filter, FilterContext, Forward};

/// Roundabouts are drawn with their direction of travel. Away from the
/// routable level, one which rounding has collapsed onto a single grid
/// point is dropped.
pub struct RoundaboutFilter;

impl Filter for RoundaboutFilter {
    fn name(&self) -> &'static str {
        "roundabout"
    }

    fn apply(&self, mut element: Element, context: &FilterContext<'_>, forward: &mut Forward<'_>) {
        let Element::Road(road) = &mut element else {
            return forward.pass(element);
        };

        let roundabout = context
            .network
            .road(road.road)
            .is_some_and(|def| def.is_roundabout());

        if !roundabout {
            return forward.pass(element);
        }

        road.line.direction = true;

        let collapsed = element
            .bounds()
            .is_some_and(|bounds| bounds.max_dimension() == 0);

        if collapsed && !context.config.routable {
            return;
        }

        forward.pass(element);
    }
}
