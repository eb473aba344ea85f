use crate::Position;

/// The chain of nodes enclosing a position, outermost first.
///
/// The last entry is the position the chain was built for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AncestorChain {
    positions: Vec<Position>,
}

impl AncestorChain {
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The position the chain describes.
    pub fn target(&self) -> Option<&Position> {
        self.positions.last()
    }

    /// The node directly enclosing the target.
    pub fn immediate_parent(&self) -> Option<&Position> {
        self.positions.len().checked_sub(2).map(|i| &self.positions[i])
    }

    pub fn outermost(&self) -> Option<&Position> {
        self.positions.first()
    }

    /// The outermost entry accepted by `pred`, the target included.
    pub fn outermost_matching<F>(&self, mut pred: F) -> Option<&Position>
    where
        F: FnMut(&Position) -> bool,
    {
        self.positions.iter().find(|position| pred(position))
    }

    /// Enclosing nodes only, outermost first.
    pub fn enclosing(&self) -> &[Position] {
        match self.positions.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Position> {
        self.positions.iter()
    }
}

impl From<Vec<Position>> for AncestorChain {
    fn from(positions: Vec<Position>) -> Self {
        Self::new(positions)
    }
}
