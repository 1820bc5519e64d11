//! Slot arena for quadtree nodes.

use super::node::{NodeHandle, QuadTreeNode};

/// `Vec` of optional slots plus a free list. Handles stay valid until their
/// node is removed; freed slots are recycled by later inserts.
#[derive(Debug, Default)]
pub struct NodeArena {
  slots: Vec<Option<QuadTreeNode>>,
  free: Vec<u32>,
  len: usize,
}

impl NodeArena {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, node: QuadTreeNode) -> NodeHandle {
    self.len += 1;
    match self.free.pop() {
      Some(index) => {
        self.slots[index as usize] = Some(node);
        NodeHandle(index)
      }
      None => {
        self.slots.push(Some(node));
        NodeHandle((self.slots.len() - 1) as u32)
      }
    }
  }

  pub fn remove(&mut self, handle: NodeHandle) -> Option<QuadTreeNode> {
    let node = self.slots.get_mut(handle.index())?.take()?;
    self.free.push(handle.0);
    self.len -= 1;
    Some(node)
  }

  #[inline]
  pub fn get(&self, handle: NodeHandle) -> Option<&QuadTreeNode> {
    self.slots.get(handle.index())?.as_ref()
  }

  #[inline]
  pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut QuadTreeNode> {
    self.slots.get_mut(handle.index())?.as_mut()
  }

  pub fn contains(&self, handle: NodeHandle) -> bool {
    self.get(handle).is_some()
  }

  /// Live nodes.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Allocated slots, live or free.
  pub fn slot_count(&self) -> usize {
    self.slots.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &QuadTreeNode)> {
    self
      .slots
      .iter()
      .enumerate()
      .filter_map(|(i, slot)| slot.as_ref().map(|node| (NodeHandle(i as u32), node)))
  }

  pub fn clear(&mut self) {
    self.slots.clear();
    self.free.clear();
    self.len = 0;
  }
}
