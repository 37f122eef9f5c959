/// Per-search bookkeeping keyed by a cell's row-major grid index.
///
/// A slot is `Some` exactly when the search has discovered that cell. The
/// table belongs to the search instance and disappears with it.
pub(crate) struct NodeTable<N> {
    slots: Vec<Option<N>>,
}

impl<N> NodeTable<N> {
    pub(crate) fn new(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self { slots }
    }

    #[inline]
    pub(crate) fn get(&self, idx: usize) -> Option<&N> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut N> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    #[inline]
    pub(crate) fn insert(&mut self, idx: usize, node: N) {
        if let Some(slot) = self.slots.get_mut(idx) {
            *slot = Some(node);
        }
    }
}
