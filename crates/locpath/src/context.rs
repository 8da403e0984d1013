/// Evaluation context: the context node plus its proximity position and, when known,
/// the context size.
///
/// Steps and paths hand the context to axis and predicate callbacks unchanged. Only
/// [`crate::Predicate::boolean`] and friends derive per-candidate contexts from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context<N> {
    node: N,
    position: usize,
    size: Option<usize>,
}

impl<N> Context<N> {
    /// Context for a single node: position 1 of 1.
    pub fn new(node: N) -> Self {
        Self { node, position: 1, size: Some(1) }
    }

    pub fn with_position(mut self, position: usize, size: impl Into<Option<usize>>) -> Self {
        self.position = position;
        self.size = size.into();
        self
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Context size, `None` when the sequence was not materialized to count it.
    pub fn size(&self) -> Option<usize> {
        self.size
    }

    pub fn is_last(&self) -> Option<bool> {
        self.size.map(|s| s == self.position)
    }

    pub fn into_node(self) -> N {
        self.node
    }
}
