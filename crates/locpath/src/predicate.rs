//! Step predicates.
//!
//! Every predicate is a transformer from the running candidate sequence to a new one.
//! Numeric predicates (`[2]`, `[last()]`) and boolean predicates (`[@id]`) share that
//! contract, so a step applies them uniformly and in order; each one sees the sequence
//! left by the previous one and numbers proximity positions against it.

use core::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::error::Error;
use crate::model::XdmNode;
use crate::position::PositionFilter;
use crate::sequence::{NodeResult, NodeSeq};

pub type PredicateFn<N> = dyn Fn(&Context<N>, NodeSeq<N>) -> NodeSeq<N> + Send + Sync;
pub type TruthFn<N> = dyn Fn(&Context<N>) -> Result<bool, Error> + Send + Sync;

pub struct Predicate<N> {
    f: Arc<PredicateFn<N>>,
}

impl<N> Clone for Predicate<N> {
    fn clone(&self) -> Self {
        Self { f: Arc::clone(&self.f) }
    }
}

impl<N> fmt::Debug for Predicate<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").finish_non_exhaustive()
    }
}

impl<N: XdmNode> Predicate<N> {
    /// Arbitrary sequence transformer. It receives the step's evaluation context and the
    /// running sequence and may filter, truncate or reorder it.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Context<N>, NodeSeq<N>) -> NodeSeq<N> + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// `[n]`
    pub fn position(n: usize) -> Result<Self, Error> {
        let filter = PositionFilter::new(n)?;
        Ok(Self::from(filter))
    }

    /// `[last()]`
    pub fn last() -> Self {
        Self::new(|_, seq| Box::new(LastSeq { upstream: Some(seq) }))
    }

    /// Keep candidates for which `test` holds.
    ///
    /// `test` gets a context whose node is the candidate and whose position is the
    /// candidate's proximity position in the running sequence. The size is not known
    /// (`Context::size` is `None`); the input is streamed.
    pub fn boolean<F>(test: F) -> Self
    where
        F: Fn(&Context<N>) -> Result<bool, Error> + Send + Sync + 'static,
    {
        Self::truth(Arc::new(test), false)
    }

    /// Like [`Predicate::boolean`] but with the context size supplied, which buffers the
    /// running sequence on first pull.
    pub fn boolean_with_size<F>(test: F) -> Self
    where
        F: Fn(&Context<N>) -> Result<bool, Error> + Send + Sync + 'static,
    {
        Self::truth(Arc::new(test), true)
    }

    fn truth(test: Arc<TruthFn<N>>, needs_size: bool) -> Self {
        Self::new(move |_, seq| {
            Box::new(BooleanSeq { test: Arc::clone(&test), input: seq, position: 0, size: None, needs_size })
        })
    }

    pub fn apply(&self, ctx: &Context<N>, seq: NodeSeq<N>) -> NodeSeq<N> {
        (self.f)(ctx, seq)
    }
}

impl<N: XdmNode> From<PositionFilter> for Predicate<N> {
    fn from(filter: PositionFilter) -> Self {
        Self::new(move |_, seq| Box::new(filter.apply(seq)))
    }
}

struct LastSeq<N> {
    upstream: Option<NodeSeq<N>>,
}

impl<N: 'static> Iterator for LastSeq<N> {
    type Item = NodeResult<N>;

    fn next(&mut self) -> Option<Self::Item> {
        let upstream = self.upstream.take()?;
        let mut last = None;
        for item in upstream {
            match item {
                Ok(n) => last = Some(n),
                Err(err) => return Some(Err(err)),
            }
        }
        last.map(Ok)
    }
}

struct BooleanSeq<N> {
    test: Arc<TruthFn<N>>,
    input: NodeSeq<N>,
    position: usize,
    size: Option<usize>,
    needs_size: bool,
}

impl<N: XdmNode> BooleanSeq<N> {
    fn ensure_size(&mut self) -> Result<(), Error> {
        if !self.needs_size || self.size.is_some() {
            return Ok(());
        }
        let input = core::mem::replace(&mut self.input, crate::sequence::empty());
        let buffered = input.collect::<Result<Vec<N>, Error>>()?;
        self.size = Some(buffered.len());
        self.input = crate::sequence::from_nodes(buffered);
        Ok(())
    }
}

impl<N: XdmNode> Iterator for BooleanSeq<N> {
    type Item = NodeResult<N>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(err) = self.ensure_size() {
            // nothing further is produced after a failed buffering pass
            self.needs_size = false;
            return Some(Err(err));
        }
        loop {
            let node = match self.input.next()? {
                Ok(node) => node,
                Err(err) => return Some(Err(err)),
            };
            self.position += 1;
            let candidate = Context::new(node).with_position(self.position, self.size);
            match (self.test)(&candidate) {
                Ok(true) => return Some(Ok(candidate.into_node())),
                Ok(false) => {}
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
