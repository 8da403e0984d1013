use core::num::NonZeroUsize;

use crate::error::Error;
use crate::sequence::{NodeResult, NodeSeq};

/// Numeric literal predicate `[n]`: keeps only the n-th (1-based) item of its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionFilter {
    position: NonZeroUsize,
}

impl PositionFilter {
    pub fn new(position: usize) -> Result<Self, Error> {
        match NonZeroUsize::new(position) {
            Some(position) => Ok(Self { position }),
            None => {
                tracing::debug!(position, "rejecting position filter");
                Err(Error::invalid_argument(format!("position filter requires a position >= 1, got {position}")))
            }
        }
    }

    pub fn position(&self) -> usize {
        self.position.get()
    }

    pub fn apply<N: 'static>(&self, upstream: NodeSeq<N>) -> PositionSeq<N> {
        PositionSeq { upstream: Some(upstream), position: self.position.get() }
    }
}

/// Sequence of at most one item produced by [`PositionFilter::apply`].
///
/// The first pull skips `n - 1` upstream items; afterwards the upstream is dropped without
/// being drained further.
pub struct PositionSeq<N> {
    upstream: Option<NodeSeq<N>>,
    position: usize,
}

impl<N: 'static> Iterator for PositionSeq<N> {
    type Item = NodeResult<N>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut upstream = self.upstream.take()?;
        // errors among skipped items surface instead of shifting positions
        for _ in 1..self.position {
            match upstream.next()? {
                Ok(_) => {}
                Err(err) => return Some(Err(err)),
            }
        }
        upstream.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(usize::from(self.upstream.is_some())))
    }
}

impl<N: 'static> core::iter::FusedIterator for PositionSeq<N> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{collect_nodes, from_nodes};

    #[test]
    fn zero_is_rejected() {
        let err = PositionFilter::new(0).unwrap_err();
        assert!(err.is_construction_error());
    }

    #[test]
    fn stops_pulling_after_the_selected_item() {
        let pulled = std::rc::Rc::new(std::cell::Cell::new(0usize));
        let counter = pulled.clone();
        let upstream: NodeSeq<u32> = Box::new((1..=100u32).map(move |n| {
            counter.set(counter.get() + 1);
            Ok(n)
        }));
        let out = collect_nodes(PositionFilter::new(3).unwrap().apply(upstream)).unwrap();
        assert_eq!(out, vec![3]);
        assert_eq!(pulled.get(), 3);
    }

    #[test]
    fn past_the_end_is_empty() {
        let out = collect_nodes(PositionFilter::new(4).unwrap().apply(from_nodes(vec![1u32, 2, 3]))).unwrap();
        assert!(out.is_empty());
    }
}
