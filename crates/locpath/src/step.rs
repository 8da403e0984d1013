//! A single location step and its cursor.

use core::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::axes::Axis;
use crate::context::Context;
use crate::error::Error;
use crate::filter::{Filter, NodeTest};
use crate::model::{TreeNode, XdmNode};
use crate::position::PositionFilter;
use crate::predicate::Predicate;
use crate::reverse::reverse;
use crate::sequence::{self, NodeResult, NodeSeq};

/// Axis function: produces the axis sequence for one context node. Forward axes must
/// yield in document order, reverse axes in reverse document order.
pub type AxisFn<N> = Arc<dyn Fn(&N) -> NodeSeq<N> + Send + Sync>;

/// One location step: `axis::test[p1][p2]...`.
///
/// Immutable once built and cheap to clone; the same step can be evaluated any number of
/// times against different contexts.
pub struct Step<N> {
    axis: AxisFn<N>,
    reversed: bool,
    node_filter: Option<Filter>,
    predicates: Arc<[Predicate<N>]>,
}

impl<N> Clone for Step<N> {
    fn clone(&self) -> Self {
        Self {
            axis: Arc::clone(&self.axis),
            reversed: self.reversed,
            node_filter: self.node_filter.clone(),
            predicates: Arc::clone(&self.predicates),
        }
    }
}

impl<N> fmt::Debug for Step<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("reversed", &self.reversed)
            .field("node_filter", &self.node_filter)
            .field("predicates", &self.predicates.len())
            .finish_non_exhaustive()
    }
}

impl<N: XdmNode> Step<N> {
    pub fn builder() -> StepBuilder<N> {
        StepBuilder::default()
    }

    pub fn reversed(&self) -> bool {
        self.reversed
    }

    pub fn node_filter(&self) -> Option<&Filter> {
        self.node_filter.as_ref()
    }

    pub fn predicates(&self) -> &[Predicate<N>] {
        &self.predicates
    }

    /// A cursor with no evaluation in flight.
    pub fn cursor(&self) -> StepIter<N> {
        StepIter { step: self.clone(), state: CursorState::Idle }
    }

    /// Evaluate the step for every node of `nodes`, or for the context node when `nodes`
    /// is `None`. The result is pulled lazily.
    pub fn evaluate(&self, ctx: &Context<N>, nodes: Option<NodeSeq<N>>) -> StepIter<N> {
        let mut cursor = self.cursor();
        cursor.reset(ctx, nodes);
        cursor
    }

    /// axis -> node filter -> predicates (in order) -> optional reversal.
    fn expand(&self, ctx: &Context<N>, node: &N) -> NodeSeq<N> {
        let mut seq = (self.axis)(node);
        if let Some(filter) = &self.node_filter {
            seq = filter.apply(seq);
        }
        for predicate in self.predicates.iter() {
            seq = predicate.apply(ctx, seq);
        }
        if self.reversed {
            seq = reverse(seq);
        }
        seq
    }
}

impl<N: TreeNode> Step<N> {
    /// Builder preset with one of the standard axes.
    pub fn along(axis: Axis) -> StepBuilder<N> {
        StepBuilder::default().axis(axis.into_fn())
    }
}

/// Builder for [`Step`]. Fallible settings (`position`) record their error; `build`
/// reports the first one.
pub struct StepBuilder<N> {
    axis: Option<AxisFn<N>>,
    reversed: bool,
    node_filter: Option<Filter>,
    predicates: SmallVec<[Predicate<N>; 4]>,
    error: Option<Error>,
}

impl<N> Default for StepBuilder<N> {
    fn default() -> Self {
        Self { axis: None, reversed: false, node_filter: None, predicates: SmallVec::new(), error: None }
    }
}

impl<N: XdmNode> StepBuilder<N> {
    pub fn axis(mut self, axis: AxisFn<N>) -> Self {
        self.axis = Some(axis);
        self
    }

    pub fn axis_fn<F>(self, f: F) -> Self
    where
        F: Fn(&N) -> NodeSeq<N> + Send + Sync + 'static,
    {
        self.axis(Arc::new(f))
    }

    pub fn reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.node_filter = Some(filter.into());
        self
    }

    pub fn test(self, test: NodeTest) -> Self {
        self.filter(test)
    }

    /// Append a `[n]` predicate.
    pub fn position(self, n: usize) -> Self {
        match PositionFilter::new(n) {
            Ok(filter) => self.predicate(Predicate::from(filter)),
            Err(err) => self.fail(err),
        }
    }

    pub fn predicate(mut self, predicate: Predicate<N>) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(mut self, predicates: impl IntoIterator<Item = Predicate<N>>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    fn fail(mut self, err: Error) -> Self {
        self.error.get_or_insert(err);
        self
    }

    pub fn build(self) -> Result<Step<N>, Error> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let Some(axis) = self.axis else {
            tracing::debug!("rejecting step without axis");
            return Err(Error::invalid_argument("step requires an axis function"));
        };
        Ok(Step {
            axis,
            reversed: self.reversed,
            node_filter: self.node_filter,
            predicates: self.predicates.into_iter().collect(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    Idle,
    Draining,
    Exhausted,
}

enum CursorState<N> {
    Idle,
    Draining {
        ctx: Context<N>,
        // context nodes still to expand
        source: NodeSeq<N>,
        // output of the axis pipeline for the last expanded context node
        current: Option<NodeSeq<N>>,
    },
    Exhausted,
}

/// Lazily evaluated output of a [`Step`].
///
/// The cursor exclusively owns its upstream. [`StepIter::reset`] starts a new evaluation and
/// drops whatever the previous one had not yet yielded. After yielding an error the cursor
/// is exhausted.
pub struct StepIter<N> {
    step: Step<N>,
    state: CursorState<N>,
}

impl<N: XdmNode> StepIter<N> {
    pub fn reset(&mut self, ctx: &Context<N>, nodes: Option<NodeSeq<N>>) -> &mut Self {
        let source = nodes.unwrap_or_else(|| sequence::once(ctx.node().clone()));
        self.state = CursorState::Draining { ctx: ctx.clone(), source, current: None };
        self
    }

    pub fn phase(&self) -> StepPhase {
        match self.state {
            CursorState::Idle => StepPhase::Idle,
            CursorState::Draining { .. } => StepPhase::Draining,
            CursorState::Exhausted => StepPhase::Exhausted,
        }
    }

    pub fn step(&self) -> &Step<N> {
        &self.step
    }
}

impl<N: XdmNode> Iterator for StepIter<N> {
    type Item = NodeResult<N>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let CursorState::Draining { ctx, source, current } = &mut self.state else {
                return None;
            };
            if let Some(output) = current {
                match output.next() {
                    Some(Ok(node)) => return Some(Ok(node)),
                    Some(Err(err)) => {
                        self.state = CursorState::Exhausted;
                        return Some(Err(err));
                    }
                    None => *current = None,
                }
            }
            match source.next() {
                Some(Ok(node)) => {
                    *current = Some(self.step.expand(ctx, &node));
                }
                Some(Err(err)) => {
                    self.state = CursorState::Exhausted;
                    return Some(Err(err));
                }
                None => {
                    tracing::trace!(reversed = self.step.reversed, "step cursor exhausted");
                    self.state = CursorState::Exhausted;
                    return None;
                }
            }
        }
    }
}

impl<N: XdmNode> core::iter::FusedIterator for StepIter<N> {}
