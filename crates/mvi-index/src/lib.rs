//! Ordered key index over inventory records.
//!
//! A binary search tree keyed by engine number. Ordering is lexicographic
//! over the digit string, which coincides with numeric order because all
//! well-formed keys have equal length. The index never raises: absence is
//! represented, duplicates are dropped.
//!
//! Deterministic structural rules, observable from outside:
//! - inserting an already-present key leaves the stored record untouched
//!   and discards the new one;
//! - deleting a node with two children promotes the in-order successor
//!   (minimum of the right subtree) into the deleted position.

use std::cmp::Ordering;

use mvi_schemas::InventoryRecord;

type Link = Option<Box<Node>>;

struct Node {
    record: InventoryRecord,
    left: Link,
    right: Link,
}

impl Node {
    fn new(record: InventoryRecord) -> Self {
        Self {
            record,
            left: None,
            right: None,
        }
    }
}

/// In-memory sorted index, keyed by engine number.
#[derive(Default)]
pub struct InventoryIndex {
    root: Link,
    len: usize,
}

impl InventoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries (at most one per key).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a record. Returns false (and keeps the existing record intact)
    /// when the key is already present. Callers that need reject-vs-overwrite
    /// semantics must pre-check with [`search`](Self::search).
    pub fn insert(&mut self, record: InventoryRecord) -> bool {
        let inserted = insert_rec(&mut self.root, record);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Exact-key lookup.
    pub fn search(&self, engine_number: &str) -> Option<&InventoryRecord> {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            match engine_number.cmp(node.record.engine_number.as_str()) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
                Ordering::Equal => return Some(&node.record),
            }
        }
        None
    }

    /// Remove the entry for `engine_number` if present. Returns whether an
    /// entry was removed; absence is a no-op, never an error.
    pub fn delete(&mut self, engine_number: &str) -> bool {
        let removed = delete_rec(&mut self.root, engine_number);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// All records in ascending key order. Each call starts a fresh
    /// traversal over the current contents.
    pub fn records_ascending(&self) -> Vec<&InventoryRecord> {
        let mut out = Vec::with_capacity(self.len);
        collect_in_order(&self.root, &mut out);
        out
    }
}

impl FromIterator<InventoryRecord> for InventoryIndex {
    fn from_iter<I: IntoIterator<Item = InventoryRecord>>(iter: I) -> Self {
        let mut index = Self::new();
        for record in iter {
            index.insert(record);
        }
        index
    }
}

fn insert_rec(link: &mut Link, record: InventoryRecord) -> bool {
    match link {
        None => {
            *link = Some(Box::new(Node::new(record)));
            true
        }
        Some(node) => match record.engine_number.cmp(&node.record.engine_number) {
            Ordering::Less => insert_rec(&mut node.left, record),
            Ordering::Greater => insert_rec(&mut node.right, record),
            // Duplicate key: the incoming record is dropped.
            Ordering::Equal => false,
        },
    }
}

fn delete_rec(link: &mut Link, engine_number: &str) -> bool {
    {
        let Some(node) = link.as_mut() else {
            return false;
        };
        match engine_number.cmp(node.record.engine_number.as_str()) {
            Ordering::Less => return delete_rec(&mut node.left, engine_number),
            Ordering::Greater => return delete_rec(&mut node.right, engine_number),
            Ordering::Equal => {}
        }
    }

    let Some(mut node) = link.take() else {
        return false;
    };
    *link = match (node.left.take(), node.right.take()) {
        (None, right) => right,
        (left, None) => left,
        (left, mut right) => {
            // Two children: the in-order successor takes this position.
            if let Some(successor) = pop_min(&mut right) {
                node.record = successor;
            }
            node.left = left;
            node.right = right;
            Some(node)
        }
    };
    true
}

/// Unlink and return the minimum-key record of the subtree rooted at `link`.
fn pop_min(link: &mut Link) -> Option<InventoryRecord> {
    let node = link.as_mut()?;
    if node.left.is_some() {
        pop_min(&mut node.left)
    } else {
        let mut node = link.take()?;
        *link = node.right.take();
        Some(node.record)
    }
}

fn collect_in_order<'a>(link: &'a Link, out: &mut Vec<&'a InventoryRecord>) {
    if let Some(node) = link {
        collect_in_order(&node.left, out);
        out.push(&node.record);
        collect_in_order(&node.right, out);
    }
}
