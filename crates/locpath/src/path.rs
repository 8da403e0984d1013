use smallvec::SmallVec;

use crate::context::Context;
use crate::model::XdmNode;
use crate::sequence::{self, NodeResult, NodeSeq};
use crate::step::Step;

/// Relative location path: steps applied left to right, each step's output being the next
/// step's context nodes.
#[derive(Debug)]
pub struct Path<N> {
    steps: SmallVec<[Step<N>; 4]>,
}

impl<N> Clone for Path<N> {
    fn clone(&self) -> Self {
        Self { steps: self.steps.clone() }
    }
}

impl<N: XdmNode> Path<N> {
    pub fn new(steps: impl IntoIterator<Item = Step<N>>) -> Self {
        Self { steps: steps.into_iter().collect() }
    }

    #[must_use]
    pub fn then(mut self, step: Step<N>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[Step<N>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Evaluate against `nodes`, or the context node when `nodes` is `None`.
    ///
    /// Only the step cursors are created here; nothing is pulled until the result is.
    /// A path without steps yields its input.
    pub fn evaluate(&self, ctx: &Context<N>, nodes: Option<NodeSeq<N>>) -> PathIter<N> {
        let initial = nodes.unwrap_or_else(|| sequence::once(ctx.node().clone()));
        let inner = self
            .steps
            .iter()
            .fold(initial, |running, step| -> NodeSeq<N> { Box::new(step.evaluate(ctx, Some(running))) });
        PathIter { inner }
    }
}

impl<N: XdmNode> FromIterator<Step<N>> for Path<N> {
    fn from_iter<I: IntoIterator<Item = Step<N>>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Lazily evaluated output of a [`Path`].
pub struct PathIter<N> {
    inner: NodeSeq<N>,
}

impl<N: 'static> Iterator for PathIter<N> {
    type Item = NodeResult<N>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
