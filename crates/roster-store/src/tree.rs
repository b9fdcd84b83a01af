//! Unbalanced binary search tree of records, keyed by [`RecordKey`].
//!
//! Nodes live in an arena and reference their children by slot index, so
//! the tree has no ownership cycles and freed slots are reused. The tree is
//! never rebalanced: inserting keys in sorted order yields a chain whose
//! height equals the record count, and every keyed operation then costs
//! O(n). That shape is part of the contract.
//!
//! ## Deletion
//!
//! ```text
//! 0 or 1 child   splice the child into the parent's slot
//! 2 children     move the in-order successor's record into the node,
//!                then splice the successor's right child into its slot
//! ```

use std::cmp::Ordering;
use std::fmt::Write as _;

use tracing::{debug, info};

use crate::error::StoreError;
use crate::record::{Record, RecordKey};

type NodeId = usize;

#[derive(Debug, Clone)]
struct Node {
    record: Record,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// A child slot: the root, or one side of a parent node.
#[derive(Debug, Clone, Copy)]
enum Link {
    Root,
    Child(NodeId, Side),
}

/// Owns every record; ordered strictly by key.
#[derive(Debug, Clone, Default)]
pub struct OrderedStore {
    slots: Vec<Option<Node>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
}

impl OrderedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store by inserting `records` in iteration order.
    ///
    /// Feeding the output of [`OrderedStore::pre_order`] back in reproduces
    /// the original tree shape exactly.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Number of records. O(1).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, record: Record) -> Result<(), StoreError> {
        let key = record.key();
        let link = self.locate(key);
        if self.child(link).is_some() {
            return Err(StoreError::DuplicateKey(key));
        }

        let id = self.alloc(Node {
            record,
            left: None,
            right: None,
        });
        self.set_child(link, Some(id));
        self.len += 1;
        debug!(key, len = self.len, "record inserted");
        Ok(())
    }

    pub fn search(&self, key: RecordKey) -> Option<&Record> {
        self.child(self.locate(key))
            .map(|id| &self.node(id).record)
    }

    pub fn search_mut(&mut self, key: RecordKey) -> Option<&mut Record> {
        let id = self.child(self.locate(key))?;
        Some(&mut self.node_mut(id).record)
    }

    pub fn contains(&self, key: RecordKey) -> bool {
        self.search(key).is_some()
    }

    /// Remove the record stored under `key`.
    ///
    /// Returns `None`, leaving the tree untouched, when the key is absent.
    pub fn delete(&mut self, key: RecordKey) -> Option<Record> {
        let link = self.locate(key);
        let id = self.child(link)?;
        let (left, right) = {
            let node = self.node(id);
            (node.left, node.right)
        };

        let removed = match (left, right) {
            (None, child) | (child, None) => {
                self.set_child(link, child);
                self.release(id).record
            }
            (Some(_), Some(right)) => {
                let mut successor_link = Link::Child(id, Side::Right);
                let mut successor = right;
                while let Some(next) = self.node(successor).left {
                    successor_link = Link::Child(successor, Side::Left);
                    successor = next;
                }

                let successor_right = self.node(successor).right;
                self.set_child(successor_link, successor_right);
                let promoted = self.release(successor).record;
                debug!(key, promoted = promoted.key(), "successor promoted");
                std::mem::replace(&mut self.node_mut(id).record, promoted)
            }
        };

        self.len -= 1;
        debug!(key, len = self.len, "record deleted");
        Some(removed)
    }

    /// Ascending-by-key traversal. Lazy; call again to restart.
    pub fn in_order(&self) -> InOrder<'_> {
        InOrder {
            store: self,
            stack: Vec::new(),
            cursor: self.root,
            last_key: None,
            yielded: 0,
        }
    }

    /// Node, then left subtree, then right subtree.
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            store: self,
            stack: self.root.into_iter().collect(),
            yielded: 0,
        }
    }

    pub fn keys(&self) -> Vec<RecordKey> {
        self.in_order().map(Record::key).collect()
    }

    /// Materialised ascending copy of every record.
    pub fn snapshot(&self) -> Vec<Record> {
        self.in_order().cloned().collect()
    }

    /// Records whose name matches `name` ignoring case, in key order.
    pub fn find_by_name(&self, name: &str) -> Vec<&Record> {
        let wanted = name.trim().to_lowercase();
        self.in_order()
            .filter(|record| record.name.to_lowercase() == wanted)
            .collect()
    }

    /// Number of nodes on the longest root-to-leaf path; 0 when empty.
    pub fn height(&self) -> usize {
        let mut tallest = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|id| (id, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            tallest = tallest.max(depth);
            let node = self.node(id);
            stack.extend(node.left.map(|child| (child, depth + 1)));
            stack.extend(node.right.map(|child| (child, depth + 1)));
        }
        tallest
    }

    pub fn add_course(&mut self, key: RecordKey, course: impl Into<String>) -> Result<(), StoreError> {
        let course = course.into();
        let record = self
            .search_mut(key)
            .ok_or(StoreError::RecordNotFound(key))?;
        record.add_course(course.as_str())?;
        info!(key, course = %course, "course added");
        Ok(())
    }

    pub fn remove_course(&mut self, key: RecordKey, course: &str) -> Result<(), StoreError> {
        let record = self
            .search_mut(key)
            .ok_or(StoreError::RecordNotFound(key))?;
        record.remove_course(course)?;
        info!(key, course, "course removed");
        Ok(())
    }

    /// Sideways ASCII view of the tree: right subtree above, left below.
    pub fn render_shape(&self) -> String {
        let Some(root) = self.root else {
            return "<empty tree>".to_string();
        };
        let mut out = String::new();
        self.render_node(root, "", true, &mut out);
        out
    }

    fn render_node(&self, id: NodeId, prefix: &str, is_left: bool, out: &mut String) {
        let node = self.node(id);
        if let Some(right) = node.right {
            let next = format!("{prefix}{}", if is_left { "│   " } else { "    " });
            self.render_node(right, &next, false, out);
        }
        let connector = if is_left { "└── " } else { "┌── " };
        let _ = writeln!(out, "{prefix}{connector}{}", node.record.key());
        if let Some(left) = node.left {
            let next = format!("{prefix}{}", if is_left { "    " } else { "│   " });
            self.render_node(left, &next, true, out);
        }
    }

    pub(crate) fn root_slot(&self) -> Option<NodeId> {
        self.root
    }

    /// Non-panicking view of one slot for the integrity checker.
    pub(crate) fn slot(&self, id: NodeId) -> Option<(&Record, Option<NodeId>, Option<NodeId>)> {
        match self.slots.get(id) {
            Some(Some(node)) => Some((&node.record, node.left, node.right)),
            _ => None,
        }
    }

    /// The slot holding `key`, or the empty slot where it would attach.
    fn locate(&self, key: RecordKey) -> Link {
        let mut link = Link::Root;
        let mut steps = 0;
        while let Some(id) = self.child(link) {
            let node = self.node(id);
            link = match key.cmp(&node.record.key()) {
                Ordering::Less => Link::Child(id, Side::Left),
                Ordering::Greater => Link::Child(id, Side::Right),
                Ordering::Equal => return link,
            };
            steps += 1;
            if steps > self.len {
                panic!("ordered store corrupted: descent for key {key} exceeded {} nodes", self.len);
            }
        }
        link
    }

    fn child(&self, link: Link) -> Option<NodeId> {
        match link {
            Link::Root => self.root,
            Link::Child(parent, Side::Left) => self.node(parent).left,
            Link::Child(parent, Side::Right) => self.node(parent).right,
        }
    }

    fn set_child(&mut self, link: Link, child: Option<NodeId>) {
        match link {
            Link::Root => self.root = child,
            Link::Child(parent, Side::Left) => self.node_mut(parent).left = child,
            Link::Child(parent, Side::Right) => self.node_mut(parent).right = child,
        }
    }

    fn node(&self, id: NodeId) -> &Node {
        match self.slots.get(id) {
            Some(Some(node)) => node,
            _ => panic!("ordered store corrupted: dangling node reference {id}"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slots.get_mut(id) {
            Some(Some(node)) => node,
            _ => panic!("ordered store corrupted: dangling node reference {id}"),
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node {
        let node = match self.slots.get_mut(id).and_then(Option::take) {
            Some(node) => node,
            None => panic!("ordered store corrupted: releasing empty slot {id}"),
        };
        self.free.push(id);
        node
    }
}

/// Iterator returned by [`OrderedStore::in_order`].
///
/// Panics if it observes a key that is not strictly greater than the
/// previous one, or more nodes than the store holds.
pub struct InOrder<'a> {
    store: &'a OrderedStore,
    stack: Vec<NodeId>,
    cursor: Option<NodeId>,
    last_key: Option<RecordKey>,
    yielded: usize,
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let store = self.store;
        while let Some(id) = self.cursor {
            self.stack.push(id);
            if self.stack.len() > store.len {
                panic!("ordered store corrupted: left spine longer than {} nodes", store.len);
            }
            self.cursor = store.node(id).left;
        }

        let id = self.stack.pop()?;
        let node = store.node(id);
        self.cursor = node.right;

        let key = node.record.key();
        if let Some(last) = self.last_key
            && key <= last
        {
            panic!("ordered store corrupted: key {key} visited after {last}");
        }
        self.last_key = Some(key);
        self.yielded += 1;
        if self.yielded > store.len {
            panic!("ordered store corrupted: traversal exceeded {} records", store.len);
        }
        Some(&node.record)
    }
}

/// Iterator returned by [`OrderedStore::pre_order`].
pub struct PreOrder<'a> {
    store: &'a OrderedStore,
    stack: Vec<NodeId>,
    yielded: usize,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let store = self.store;
        let id = self.stack.pop()?;
        let node = store.node(id);
        self.stack.extend(node.right);
        self.stack.extend(node.left);

        self.yielded += 1;
        if self.yielded > store.len {
            panic!("ordered store corrupted: traversal exceeded {} records", store.len);
        }
        Some(&node.record)
    }
}
