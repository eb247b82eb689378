/// Index of a node in a [`crate::Pipeline`] arena.
///
/// Indices are allocated in DFS pre-order, so the root is always `NodeIdx(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub u32);

impl NodeIdx {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
