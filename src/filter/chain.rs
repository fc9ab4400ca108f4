use log::trace;
use smallvec::SmallVec;

use crate::config::CompileOptions;
use crate::element::Element;
use crate::filter::{
    Filter, FilterContext, IndexBisect, LineSplitterFilter, PolygonSplitterFilter,
    RemoveEmptyFilter, RoundCoordsFilter, RoundaboutFilter, SizeFilter, SpanSplitterFilter,
};

/// Collects what a filter emits for one element.
pub struct Forward<'a> {
    stage: usize,
    emitted: &'a mut SmallVec<[(Element, usize); 2]>,
}

impl Forward<'_> {
    /// Hands the element on to the next filter.
    #[inline]
    pub fn pass(&mut self, element: Element) {
        self.emitted.push((element, self.stage + 1));
    }

    /// Feeds a newly created element back into the current filter.
    #[inline]
    pub fn again(&mut self, element: Element) {
        self.emitted.push((element, self.stage));
    }
}

/// An ordered list of filters run as a worklist of `(element, stage)`
/// pairs, until every element has left the last stage or been dropped.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// The chain every level is compiled with.
    pub fn standard(options: &CompileOptions) -> Self {
        FilterChain::new()
            .with(RoundCoordsFilter)
            .with(RemoveEmptyFilter)
            .with(SizeFilter::new(options.size_threshold))
            .with(RoundaboutFilter)
            .with(SpanSplitterFilter)
            .with(LineSplitterFilter::new(options.max_line_points))
            .with(PolygonSplitterFilter::new(
                options.max_shape_points,
                options.split_attempts,
                IndexBisect,
            ))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.filters.iter().map(|filter| filter.name())
    }

    /// Runs every element through the chain.
    ///
    /// Elements are finished depth first, so fragments come out in the
    /// order their filter emitted them, and before the next input element.
    pub fn run(
        &self,
        elements: impl IntoIterator<Item = Element>,
        context: &FilterContext<'_>,
    ) -> Vec<Element> {
        let mut output = Vec::new();
        let mut stack: Vec<(Element, usize)> = Vec::new();
        let mut emitted = SmallVec::<[(Element, usize); 2]>::new();

        for element in elements {
            stack.push((element, 0));

            while let Some((element, stage)) = stack.pop() {
                let Some(filter) = self.filters.get(stage) else {
                    output.push(element);
                    continue;
                };

                let mut forward = Forward {
                    stage,
                    emitted: &mut emitted,
                };
                filter.apply(element, context, &mut forward);

                if emitted.is_empty() {
                    trace!("{} dropped an element at level {}", filter.name(), context.config.level);
                }

                stack.extend(emitted.drain(..).rev());
            }
        }

        output
    }
}
