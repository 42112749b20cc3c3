use super::handle::NodeId;

/// Slotted storage that owns every node in the tree.
///
/// A node is allocated when a split (or the first insertion) needs storage
/// and freed when a merge absorbs it. `clear()` releases everything at once;
/// dropping the arena drops whatever is still live. Because all links between
/// nodes are `NodeId` values into this arena, a node can never be freed while
/// a parent still references it without the bug surfacing as an invalid slot
/// access.
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<NodeId>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn alloc(&mut self, element: T) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(element);
            id
        } else {
            assert!(
                self.slots.len() <= NodeId::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                NodeId::MAX
            );
            self.slots.push(Some(element));
            NodeId::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &T {
        self.slots[id.index()].as_ref().expect("`Arena::get()` - `id` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
        self.slots[id.index()].as_mut().expect("`Arena::get_mut()` - `id` is invalid!")
    }

    /// Removes the element, returning it and recycling the slot.
    pub(crate) fn take(&mut self, id: NodeId) -> T {
        let element = self.slots[id.index()].take().expect("`Arena::take()` - `id` is invalid!");
        self.free.push(id);
        element
    }

    pub(crate) fn free(&mut self, id: NodeId) {
        drop(self.take(id));
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
