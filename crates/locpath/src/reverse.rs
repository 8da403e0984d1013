use crate::error::Error;
use crate::sequence::{NodeResult, NodeSeq};

/// Buffered replay of a sequence from its last item to its first.
///
/// Reverse axes number proximity positions from the context node outward; this lets an
/// axis that is simpler to compute in one orientation be presented in the other.
#[derive(Debug, Clone)]
pub struct ReverseSequence<N> {
    buf: Vec<N>,
}

impl<N> ReverseSequence<N> {
    /// Materializes `source` completely. Fails with the first error the source yields.
    pub fn new(source: impl Iterator<Item = NodeResult<N>>) -> Result<Self, Error> {
        let buf = source.collect::<Result<Vec<N>, Error>>()?;
        Ok(Self { buf })
    }
}

impl<N> Iterator for ReverseSequence<N> {
    type Item = NodeResult<N>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.pop().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.buf.len(), Some(self.buf.len()))
    }
}

impl<N> ExactSizeIterator for ReverseSequence<N> {}
impl<N> core::iter::FusedIterator for ReverseSequence<N> {}

/// Reverse `source`; a materialization failure becomes the single item of the result.
pub fn reverse<N: 'static>(source: NodeSeq<N>) -> NodeSeq<N> {
    match ReverseSequence::new(source) {
        Ok(rev) => Box::new(rev),
        Err(err) => crate::sequence::failed(err),
    }
}
