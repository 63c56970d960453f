//! Key List Module
//!
//! Doubly linked list of keys stored in an index arena. The cache keeps two of
//! these: one ordered by access recency, one ordered by insertion age.
//!
//! Nodes live in a `Vec` of slots and link to each other by index. Removed
//! slots are recycled through a free list, so a [`NodeHandle`] stays valid
//! until the node it names is removed.

use std::time::Instant;

/// Sentinel for "no neighbour".
const NIL: usize = usize::MAX;

// == Node Handle ==
/// Stable reference to a node, returned by [`KeyList::add_first`].
///
/// Holding a handle allows O(1) unlinking without searching for the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

// == Node ==
#[derive(Debug)]
struct Node<K, S> {
    key: K,
    /// Per-node payload, `()` for the access list, `Instant` for the age list
    stamp: S,
    prev: usize,
    next: usize,
}

// == Key List ==
/// Arena-backed doubly linked list.
///
/// - Head = most recently added (or moved) key
/// - Tail = oldest key
#[derive(Debug)]
pub struct KeyList<K, S = ()> {
    slots: Vec<Option<Node<K, S>>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    len: usize,
}

/// List ordered by access recency.
pub type AccessList<K> = KeyList<K>;

/// List ordered by insertion time; each node records when it was created.
pub type AgeList<K> = KeyList<K, Instant>;

impl<K, S> Default for KeyList<K, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> KeyList<K, S> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    // == Add First ==
    /// Inserts a key at the head and returns a handle to its node.
    pub fn add_first(&mut self, key: K, stamp: S) -> NodeHandle {
        let node = Node {
            key,
            stamp,
            prev: NIL,
            next: NIL,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        self.link_front(idx);
        self.len += 1;
        NodeHandle(idx)
    }

    // == Remove ==
    /// Unlinks the node behind `handle` and returns its key and stamp.
    ///
    /// Returns None if the handle does not name a live node.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<(K, S)> {
        if !self.is_live(handle.0) {
            return None;
        }

        self.unlink(handle.0);
        let node = self.slots[handle.0].take()?;
        self.free.push(handle.0);
        self.len -= 1;
        Some((node.key, node.stamp))
    }

    // == Move To Front ==
    /// Unlinks a node and reinserts it at the head. The handle stays valid.
    ///
    /// Returns false if the handle does not name a live node.
    pub fn move_to_front(&mut self, handle: NodeHandle) -> bool {
        if !self.is_live(handle.0) {
            return false;
        }
        if self.head != handle.0 {
            self.unlink(handle.0);
            self.link_front(handle.0);
        }
        true
    }

    // == Peek Last ==
    /// Returns the tail key and stamp without removing them.
    pub fn peek_last(&self) -> Option<(&K, &S)> {
        self.node(self.tail).map(|n| (&n.key, &n.stamp))
    }

    // == Peek First ==
    /// Returns the head key and stamp.
    pub fn peek_first(&self) -> Option<(&K, &S)> {
        self.node(self.head).map(|n| (&n.key, &n.stamp))
    }

    // == Remove Last ==
    /// Removes and returns the tail key and stamp.
    pub fn remove_last(&mut self) -> Option<(K, S)> {
        if self.tail == NIL {
            return None;
        }
        self.remove(NodeHandle(self.tail))
    }

    /// Returns the key and stamp behind a handle.
    pub fn get(&self, handle: NodeHandle) -> Option<(&K, &S)> {
        self.node(handle.0).map(|n| (&n.key, &n.stamp))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every node and releases the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
        self.len = 0;
    }

    /// Iterates keys and stamps from head to tail.
    pub fn iter(&self) -> Iter<'_, K, S> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Iterates keys from head to tail.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    // == Internal Helpers ==

    fn is_live(&self, idx: usize) -> bool {
        matches!(self.slots.get(idx), Some(Some(_)))
    }

    fn node(&self, idx: usize) -> Option<&Node<K, S>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K, S>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    /// Links a detached node in front of the current head.
    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(idx) {
            node.prev = NIL;
            node.next = old_head;
        }
        match self.node_mut(old_head) {
            Some(head) => head.prev = idx,
            None => self.tail = idx,
        }
        self.head = idx;
    }

    /// Detaches a node from its neighbours without freeing its slot.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.node(idx) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match self.node_mut(prev) {
            Some(p) => p.next = next,
            None => self.head = next,
        }
        match self.node_mut(next) {
            Some(n) => n.prev = prev,
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(idx) {
            node.prev = NIL;
            node.next = NIL;
        }
    }
}

// == Iterator ==
/// Head-to-tail iterator over a [`KeyList`].
pub struct Iter<'a, K, S> {
    list: &'a KeyList<K, S>,
    cursor: usize,
    remaining: usize,
}

impl<'a, K, S> Iterator for Iter<'a, K, S> {
    type Item = (&'a K, &'a S);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor)?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.stamp))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, S> ExactSizeIterator for Iter<'_, K, S> {}
