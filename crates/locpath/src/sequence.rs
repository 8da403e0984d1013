//! Node sequences: the lazily pulled unit passed between axes, filters, predicates and steps.

use crate::error::Error;

pub type NodeResult<N> = Result<N, Error>;

/// A lazily pulled node sequence. Items are results so that a failure raised while
/// producing the next node reaches whoever pulled it.
pub type NodeSeq<N> = Box<dyn Iterator<Item = NodeResult<N>>>;

pub fn empty<N: 'static>() -> NodeSeq<N> {
    Box::new(core::iter::empty())
}

pub fn once<N: 'static>(node: N) -> NodeSeq<N> {
    Box::new(core::iter::once(Ok(node)))
}

pub fn from_nodes<N: 'static>(nodes: Vec<N>) -> NodeSeq<N> {
    Box::new(nodes.into_iter().map(Ok))
}

/// Wrap any infallible node iterator.
pub fn from_iter<N, I>(iter: I) -> NodeSeq<N>
where
    N: 'static,
    I: IntoIterator<Item = N>,
    I::IntoIter: 'static,
{
    Box::new(iter.into_iter().map(Ok))
}

/// A sequence that fails on its first pull.
pub fn failed<N: 'static>(err: Error) -> NodeSeq<N> {
    Box::new(core::iter::once(Err(err)))
}

/// Drain a sequence, stopping at the first error.
pub fn collect_nodes<N>(seq: impl Iterator<Item = NodeResult<N>>) -> Result<Vec<N>, Error> {
    seq.collect()
}
