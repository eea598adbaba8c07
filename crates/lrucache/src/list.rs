//! Recency list for the LRU cache
//!
//! Arena-backed doubly-linked list ordered from most- to least-recently
//! used. Slots 0 and 1 are permanent head/tail sentinels, so every resident
//! node always has a neighbour on both sides and relinking never branches
//! on the empty or single-element case.
//!
//! Links are arena indices, never references: the "prev" direction is
//! purely navigational and owns nothing.

/// Head sentinel slot
const HEAD: usize = 0;

/// Tail sentinel slot
const TAIL: usize = 1;

/// Upper bound on eagerly reserved slots; larger caches grow on demand
pub(crate) const MAX_PREALLOC: usize = 1 << 16;

/// Stable handle to a node in the recency list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// Node in the recency list. Sentinels and free slots carry no entry.
struct Node<K, V> {
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

impl<K, V> Node<K, V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            prev: HEAD,
            next: TAIL,
        }
    }
}

/// Doubly-linked recency ordering over arena slots
pub(crate) struct RecencyList<K, V> {
    nodes: Vec<Node<K, V>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list with room for `capacity` entries
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        // Two sentinels plus one transient over-capacity entry.
        let mut nodes = Vec::with_capacity(capacity.min(MAX_PREALLOC) + 3);
        nodes.push(Node::sentinel());
        nodes.push(Node::sentinel());

        Self {
            nodes,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Number of linked entries (sentinels excluded)
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Store a new entry in a free slot. The node is not linked yet.
    pub(crate) fn alloc(&mut self, key: K, value: V) -> NodeId {
        let idx = match self.free_list.pop() {
            Some(idx) => idx,
            None => {
                self.nodes.push(Node::sentinel());
                self.nodes.len() - 1
            }
        };

        // Detached nodes link to themselves
        self.nodes[idx] = Node {
            entry: Some((key, value)),
            prev: idx,
            next: idx,
        };
        NodeId(idx)
    }

    /// Link `id` right after the head sentinel, making it most-recently used
    pub(crate) fn push_front(&mut self, id: NodeId) {
        let idx = self.resident(id);
        debug_assert!(self.is_detached(idx), "push_front on linked node {}", idx);

        let first = self.nodes[HEAD].next;
        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[HEAD].next = idx;
        self.len += 1;
    }

    /// Unlink `id`, joining its neighbours. The slot stays allocated.
    pub(crate) fn remove(&mut self, id: NodeId) {
        let idx = self.resident(id);
        debug_assert!(!self.is_detached(idx), "remove on detached node {}", idx);

        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.nodes[idx].prev = idx;
        self.nodes[idx].next = idx;
        self.len -= 1;
    }

    /// Unlink and relink `id` at the front
    pub(crate) fn move_to_front(&mut self, id: NodeId) {
        if self.front() == Some(id) {
            return; // Already at front
        }
        self.remove(id);
        self.push_front(id);
    }

    /// Free the slot of an unlinked node and hand back its entry
    pub(crate) fn release(&mut self, id: NodeId) -> (K, V) {
        let idx = self.resident(id);
        debug_assert!(self.is_detached(idx), "release on linked node {}", idx);

        match self.nodes[idx].entry.take() {
            Some(entry) => {
                self.free_list.push(idx);
                entry
            }
            None => stale(id),
        }
    }

    /// Most-recently used node
    pub(crate) fn front(&self) -> Option<NodeId> {
        let idx = self.nodes[HEAD].next;
        (idx != TAIL).then_some(NodeId(idx))
    }

    /// Least-recently used node
    pub(crate) fn back(&self) -> Option<NodeId> {
        let idx = self.nodes[TAIL].prev;
        (idx != HEAD).then_some(NodeId(idx))
    }

    pub(crate) fn entry(&self, id: NodeId) -> (&K, &V) {
        match self.nodes.get(id.0).and_then(|node| node.entry.as_ref()) {
            Some((key, value)) => (key, value),
            None => stale(id),
        }
    }

    pub(crate) fn value(&self, id: NodeId) -> &V {
        self.entry(id).1
    }

    pub(crate) fn value_mut(&mut self, id: NodeId) -> &mut V {
        match self.nodes.get_mut(id.0).and_then(|node| node.entry.as_mut()) {
            Some((_, value)) => value,
            None => stale(id),
        }
    }

    /// Drop every entry and reset to two linked sentinels
    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(2);
        self.nodes[HEAD] = Node::sentinel();
        self.nodes[TAIL] = Node::sentinel();
        self.free_list.clear();
        self.len = 0;
    }

    /// Iterate entries from most- to least-recently used
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.nodes[HEAD].next,
            remaining: self.len,
        }
    }

    fn resident(&self, id: NodeId) -> usize {
        match self.nodes.get(id.0) {
            Some(node) if node.entry.is_some() => id.0,
            _ => stale(id),
        }
    }

    fn is_detached(&self, idx: usize) -> bool {
        self.nodes[idx].prev == idx && self.nodes[idx].next == idx
    }

    #[cfg(test)]
    pub(crate) fn slots(&self) -> usize {
        self.nodes.len() - 2
    }
}

/// A handle outlived its entry; the index and list have diverged.
fn stale(id: NodeId) -> ! {
    panic!(
        "recency list handle {} does not refer to a resident entry",
        id.0
    )
}

/// Iterator over `(key, value)` pairs in recency order
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == TAIL {
            return None;
        }
        let list = self.list;
        let id = NodeId(self.cursor);
        self.cursor = list.nodes[self.cursor].next;
        self.remaining -= 1;
        Some(list.entry(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &RecencyList<u32, &str>) -> Vec<u32> {
        list.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_list_empty() {
        let list: RecencyList<u32, &str> = RecencyList::with_capacity(4);

        assert_eq!(list.len(), 0);
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn test_list_push_front_order() {
        let mut list = RecencyList::with_capacity(4);

        let a = list.alloc(1, "a");
        list.push_front(a);
        let b = list.alloc(2, "b");
        list.push_front(b);
        let c = list.alloc(3, "c");
        list.push_front(c);

        assert_eq!(keys(&list), vec![3, 2, 1]);
        assert_eq!(list.front(), Some(c));
        assert_eq!(list.back(), Some(a));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_list_remove_middle() {
        let mut list = RecencyList::with_capacity(4);

        let ids: Vec<_> = (1..=3)
            .map(|k| {
                let id = list.alloc(k, "x");
                list.push_front(id);
                id
            })
            .collect();

        list.remove(ids[1]);

        assert_eq!(keys(&list), vec![3, 1]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.release(ids[1]), (2, "x"));
    }

    #[test]
    fn test_list_remove_only_entry() {
        let mut list = RecencyList::with_capacity(1);

        let a = list.alloc(1, "a");
        list.push_front(a);
        list.remove(a);

        assert_eq!(list.len(), 0);
        assert_eq!(list.front(), None);
        assert_eq!(list.back(), None);
    }

    #[test]
    fn test_list_move_to_front() {
        let mut list = RecencyList::with_capacity(3);

        let a = list.alloc(1, "a");
        list.push_front(a);
        let b = list.alloc(2, "b");
        list.push_front(b);

        list.move_to_front(a);
        assert_eq!(keys(&list), vec![1, 2]);
        assert_eq!(list.back(), Some(b));

        // Front node stays put
        list.move_to_front(a);
        assert_eq!(keys(&list), vec![1, 2]);
    }

    #[test]
    fn test_list_release_recycles_slot() {
        let mut list = RecencyList::with_capacity(2);

        let a = list.alloc(1, "a");
        list.push_front(a);
        list.remove(a);
        list.release(a);

        let b = list.alloc(2, "b");
        assert_eq!(a, b);
        assert_eq!(list.slots(), 1);
    }

    #[test]
    fn test_list_value_mut() {
        let mut list = RecencyList::with_capacity(1);

        let a = list.alloc(1, "a");
        list.push_front(a);
        *list.value_mut(a) = "z";

        assert_eq!(list.value(a), &"z");
    }

    #[test]
    fn test_list_clear() {
        let mut list = RecencyList::with_capacity(2);

        for k in 0..2 {
            let id = list.alloc(k, "x");
            list.push_front(id);
        }
        list.clear();

        assert_eq!(list.len(), 0);
        assert_eq!(list.back(), None);
        assert_eq!(list.slots(), 0);
    }

    #[test]
    #[should_panic(expected = "does not refer to a resident entry")]
    fn test_list_stale_handle_panics() {
        let mut list = RecencyList::with_capacity(1);

        let a = list.alloc(1, "a");
        list.push_front(a);
        list.remove(a);
        list.release(a);

        list.value(a);
    }
}
