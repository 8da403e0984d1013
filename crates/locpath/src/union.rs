//! Node-set union: identity deduplication and document-order sorting.

use core::cmp::Ordering;
use std::collections::HashSet;

use smallvec::SmallVec;

use crate::context::Context;
use crate::error::Error;
use crate::model::XdmNode;
use crate::path::Path;
use crate::sequence::{self, NodeResult, NodeSeq};

/// Drain every operand and return the distinct nodes in document order.
///
/// Duplicates are detected by node identity. Operands are drained in order until the first
/// error, which is returned; later operands are then left unpulled. A failing
/// document-order comparison is reported the same way.
pub fn union<N, I, S>(sequences: I) -> Result<Vec<N>, Error>
where
    N: XdmNode,
    I: IntoIterator<Item = S>,
    S: Iterator<Item = NodeResult<N>>,
{
    let mut seen: HashSet<N> = HashSet::new();
    let mut nodes: Vec<N> = Vec::new();
    let mut operands = 0usize;
    for seq in sequences {
        operands += 1;
        for item in seq {
            let node = item?;
            if seen.insert(node.clone()) {
                nodes.push(node);
            }
        }
    }
    tracing::trace!(operands, distinct = nodes.len(), "node-set union");
    sort_document_order(&mut nodes)?;
    Ok(nodes)
}

/// Remove identity duplicates from an already collected vector and sort it.
pub fn sort_distinct<N: XdmNode>(nodes: Vec<N>) -> Result<Vec<N>, Error> {
    union([nodes.into_iter().map(Ok)])
}

/// Sort by document order. Uses `doc_order_key` when every node provides one, the
/// adapter comparator otherwise.
pub fn sort_document_order<N: XdmNode>(nodes: &mut [N]) -> Result<(), Error> {
    if nodes.iter().all(|n| n.doc_order_key().is_some()) {
        nodes.sort_by_key(|n| n.doc_order_key());
        return Ok(());
    }
    let mut failure: Option<Error> = None;
    nodes.sort_by(|a, b| match a.compare_document_order(b) {
        Ok(ord) => ord,
        Err(err) => {
            failure.get_or_insert(err);
            Ordering::Equal
        }
    });
    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// `p1 | p2 | ...`
#[derive(Debug)]
pub struct Union<N> {
    paths: SmallVec<[Path<N>; 2]>,
}

impl<N> Clone for Union<N> {
    fn clone(&self) -> Self {
        Self { paths: self.paths.clone() }
    }
}

impl<N: XdmNode> Union<N> {
    pub fn new(paths: impl IntoIterator<Item = Path<N>>) -> Self {
        Self { paths: paths.into_iter().collect() }
    }

    pub fn paths(&self) -> &[Path<N>] {
        &self.paths
    }

    /// Evaluate every path against the same context (and the same input nodes, if given)
    /// and merge the results.
    pub fn evaluate(&self, ctx: &Context<N>, nodes: Option<&[N]>) -> Result<Vec<N>, Error> {
        union(self.paths.iter().map(|p| p.evaluate(ctx, nodes.map(|ns| sequence::from_nodes(ns.to_vec())))))
    }

    /// Like [`Union::evaluate`], deferred until the first pull.
    pub fn stream(&self, ctx: &Context<N>, nodes: Option<&[N]>) -> NodeSeq<N> {
        Box::new(MergedSeq::Pending { union: self.clone(), ctx: ctx.clone(), nodes: nodes.map(<[N]>::to_vec) })
    }
}

enum MergedSeq<N> {
    Pending { union: Union<N>, ctx: Context<N>, nodes: Option<Vec<N>> },
    Ready(std::vec::IntoIter<N>),
    Done,
}

impl<N: XdmNode> Iterator for MergedSeq<N> {
    type Item = NodeResult<N>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self, MergedSeq::Pending { .. }) {
            let MergedSeq::Pending { union, ctx, nodes } = core::mem::replace(self, MergedSeq::Done) else {
                return None;
            };
            match union.evaluate(&ctx, nodes.as_deref()) {
                Ok(merged) => *self = MergedSeq::Ready(merged.into_iter()),
                Err(err) => return Some(Err(err)),
            }
        }
        match self {
            MergedSeq::Ready(it) => it.next().map(Ok),
            MergedSeq::Pending { .. } | MergedSeq::Done => None,
        }
    }
}
