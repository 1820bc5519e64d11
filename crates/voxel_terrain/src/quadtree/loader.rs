//! QuadTreeLoader - camera-driven LOD refinement over a chunk store.
//!
//! Each `update` runs one pass:
//!
//! ```text
//! drain completions ──► walk tree from root ──► pump scheduler ──► stats
//!   (install/replace)     (split, collapse,        (dispatch up to
//!                          request, activate)       max_in_flight)
//! ```
//!
//! A node never hides its own chunk until all four children are resident, and
//! never tears its children down until its own chunk is resident, so the
//! visible surface has no holes while detail streams in.

use std::sync::Arc;

use glam::Vec3;
use smallvec::SmallVec;
use tracing::{debug, error, trace};

use super::arena::NodeArena;
use super::config::{ConfigError, LoaderConfig};
use super::node::{NodeHandle, QuadTreeNode};
use super::state::{LoaderStats, NodeState};
use crate::chunk_store::{ChunkStore, CompleteOutcome};
use crate::field::ScalarField;
use crate::render_sink::RenderSink;
use crate::scheduler::{
  ChunkCompletion, ChunkGenerationScheduler, ChunkRequest, RequestStatus, WorkSource,
};
use crate::types::ChunkKey;

/// Streams chunk meshes around a moving camera.
pub struct QuadTreeLoader<F, S: RenderSink> {
  config: LoaderConfig,
  arena: NodeArena,
  root: NodeHandle,
  store: ChunkStore<S>,
  scheduler: ChunkGenerationScheduler<F>,
  stats: LoaderStats,
  camera: Vec3,
}

impl<F, S> QuadTreeLoader<F, S>
where
  F: ScalarField + Send + Sync + 'static,
  S: RenderSink,
{
  pub fn new(config: LoaderConfig, field: F, sink: S) -> Result<Self, ConfigError> {
    Self::with_shared_field(config, Arc::new(field), sink)
  }

  pub fn with_shared_field(config: LoaderConfig, field: Arc<F>, sink: S) -> Result<Self, ConfigError> {
    config.validate()?;

    let mut arena = NodeArena::new();
    let root = arena.insert(QuadTreeNode::root(config.root_min(), config.root_lod_scale()));
    let scheduler = ChunkGenerationScheduler::with_shared_field(field, config.scheduler.clone());

    debug!(
      max_lod = config.max_lod,
      chunk_size = config.chunk_size,
      half_extent = config.half_extent(),
      "quadtree loader created"
    );

    Ok(Self {
      config,
      arena,
      root,
      store: ChunkStore::new(sink),
      scheduler,
      stats: LoaderStats::default(),
      camera: Vec3::ZERO,
    })
  }

  /// Run one refinement pass for the given camera position. Never blocks.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "quadtree::update"))]
  pub fn update(&mut self, camera: Vec3) -> &LoaderStats {
    self.stats = LoaderStats::default();
    self.camera = camera;

    self.apply_completions();
    self.update_node(self.root, true);
    self.scheduler.pump();

    debug_assert!(self.validate_tree(), "quadtree shape invariant violated");

    self.stats.node_count = self.arena.len();
    self.stats.resident_chunks = self.store.len();
    self.stats.visible_chunks = self.store.visible_count();
    &self.stats
  }

  fn apply_completions(&mut self) {
    for completion in self.scheduler.drain_completions() {
      let ChunkCompletion { key, source, mesh, .. } = completion;

      if source == WorkSource::Invalidation && self.store.is_ready(&key) {
        if self.store.replace(key, &mesh) {
          self.stats.replaced += 1;
        }
        continue;
      }

      match self.store.complete(key, &mesh) {
        Ok(CompleteOutcome::Installed) => self.stats.installed += 1,
        Ok(CompleteOutcome::Orphaned) => {
          trace!(?key, "dropping mesh for unloaded chunk");
          self.stats.orphaned += 1;
        }
        Err(err) => {
          error!(%err, "chunk mesh completed twice");
          debug_assert!(false, "{err}");
        }
      }
    }
  }

  fn update_node(&mut self, handle: NodeHandle, siblings_loaded: bool) {
    let Some(node) = self.arena.get(handle) else {
      return;
    };
    let key = node.key();
    let leaf = self.config.is_leaf(node.min, node.lod_scale, node.has_children(), self.camera);
    let loaded = self.store.is_ready(&key);

    // Tear down before recursing so doomed children are not refreshed.
    if leaf && loaded && node.has_children() {
      self.collapse(handle);
    }

    let mut children_loaded = false;
    match self.arena.get(handle).and_then(|node| node.children) {
      Some(children) => {
        children_loaded = children.iter().all(|&child| self.node_ready(child));
        for child in children {
          self.update_node(child, children_loaded);
        }
      }
      None if !leaf && siblings_loaded => self.split(handle),
      None => {}
    }

    if leaf || !children_loaded {
      self.ensure_chunk(handle, key);
      if self.store.activate(&key, true) {
        self.stats.activated += 1;
      }
    } else if self.store.activate(&key, false) {
      self.stats.deactivated += 1;
    }

    if loaded {
      self.reload_if_dirty(handle, key);
    }
  }

  fn node_ready(&self, handle: NodeHandle) -> bool {
    self
      .arena
      .get(handle)
      .and_then(|node| node.chunk)
      .is_some_and(|key| self.store.is_ready(&key))
  }

  fn request_for(&self, key: ChunkKey, source: WorkSource) -> ChunkRequest {
    ChunkRequest::for_key(
      key,
      self.config.chunk_size,
      self.config.voxel_size,
      self.config.interpolate,
      source,
    )
  }

  /// Make sure the node's chunk is resident or on its way.
  fn ensure_chunk(&mut self, handle: NodeHandle, key: ChunkKey) {
    if !self.store.contains(&key) {
      let request = self.request_for(key, WorkSource::Refinement);
      let origin = request.origin;

      if self.scheduler.request(request) == RequestStatus::Deferred {
        self.stats.deferred += 1;
        return;
      }
      if let Err(err) = self.store.reserve(key, origin) {
        error!(%err, "placeholder already present");
        debug_assert!(false, "{err}");
      }
      self.stats.requested += 1;
    }

    if let Some(node) = self.arena.get_mut(handle) {
      node.chunk = Some(key);
    }
  }

  fn split(&mut self, handle: NodeHandle) {
    let Some(node) = self.arena.get(handle) else {
      return;
    };
    let half = node.lod_scale / 2;
    let mins = node.child_mins(self.config.chunk_size);

    let arena = &mut self.arena;
    let children: [NodeHandle; 4] =
      std::array::from_fn(|i| arena.insert(QuadTreeNode::child(mins[i], half, i as u8, handle)));

    if let Some(node) = self.arena.get_mut(handle) {
      debug!(min = ?node.min, lod_scale = node.lod_scale, "split");
      node.children = Some(children);
    }
    self.stats.splits += 1;
  }

  fn collapse(&mut self, handle: NodeHandle) {
    let Some(children) = self.arena.get_mut(handle).and_then(|node| node.children.take()) else {
      return;
    };

    let removed: usize = children.into_iter().map(|child| self.destroy_subtree(child)).sum();
    debug!(?handle, removed, "collapse");
    self.stats.collapses += 1;
  }

  /// Post-order teardown: children first, then the node's own chunk.
  /// Returns the number of chunks removed from the store.
  fn destroy_subtree(&mut self, handle: NodeHandle) -> usize {
    let mut removed = 0;

    if let Some(children) = self.arena.get(handle).and_then(|node| node.children) {
      for child in children {
        removed += self.destroy_subtree(child);
      }
    }

    if let Some(node) = self.arena.remove(handle) {
      let key = node.key();
      self.scheduler.cancel(&key);
      if self.store.remove(&key) {
        self.stats.removed += 1;
        removed += 1;
      }
    }

    removed
  }

  fn reload_if_dirty(&mut self, handle: NodeHandle, key: ChunkKey) {
    if !self.arena.get(handle).is_some_and(|node| node.dirty) {
      return;
    }

    let request = self.request_for(key, WorkSource::Invalidation);
    match self.scheduler.request(request) {
      RequestStatus::Queued => {
        if let Some(node) = self.arena.get_mut(handle) {
          node.dirty = false;
        }
        self.stats.reloads += 1;
      }
      // Retry once the job already running for this key lands.
      RequestStatus::AlreadyInFlight => {}
      RequestStatus::Deferred => self.stats.deferred += 1,
    }
  }

  /// Flag the node showing `key` for a rebuild. Returns false if no node
  /// owns that key.
  pub fn mark_dirty(&mut self, key: ChunkKey) -> bool {
    let found = self
      .arena
      .iter()
      .find(|(_, node)| node.key() == key)
      .map(|(handle, _)| handle);

    match found.and_then(|handle| self.arena.get_mut(handle)) {
      Some(node) => {
        node.dirty = true;
        true
      }
      None => false,
    }
  }

  /// Flag every node whose footprint contains the XZ position of `position`.
  /// Returns the number of nodes marked.
  pub fn mark_dirty_at(&mut self, position: Vec3) -> usize {
    let chunk_size = self.config.chunk_size;
    let voxel_size = self.config.voxel_size;
    let mut marked = 0;
    let mut stack: SmallVec<[NodeHandle; 32]> = SmallVec::new();
    stack.push(self.root);

    while let Some(handle) = stack.pop() {
      let Some(node) = self.arena.get_mut(handle) else {
        continue;
      };
      if !node.contains_xz(position, chunk_size, voxel_size) {
        continue;
      }
      node.dirty = true;
      marked += 1;
      if let Some(children) = node.children {
        stack.extend(children);
      }
    }

    marked
  }

  /// Flag every node for a rebuild.
  pub fn mark_all_dirty(&mut self) {
    let handles: Vec<NodeHandle> = self.arena.iter().map(|(handle, _)| handle).collect();
    for handle in handles {
      if let Some(node) = self.arena.get_mut(handle) {
        node.dirty = true;
      }
    }
  }

  /// Swap the density field and rebuild every chunk against it. Old meshes
  /// stay visible until their replacements land.
  pub fn replace_field(&mut self, field: F) {
    self.scheduler.set_field(Arc::new(field));
    self.mark_all_dirty();
  }

  /// Destroy every node and chunk and cancel outstanding work. The loader
  /// starts again from a bare root on the next update.
  /// Returns the number of chunks removed.
  pub fn shutdown(&mut self) -> usize {
    let removed = self.destroy_subtree(self.root);
    self.scheduler.cancel_all();
    self.scheduler.drain_completions();

    self.arena.clear();
    self.root = self
      .arena
      .insert(QuadTreeNode::root(self.config.root_min(), self.config.root_lod_scale()));

    debug!(removed, "quadtree loader shut down");
    removed
  }

  /// Check the tree shape: every child handle is live, halves its parent's
  /// scale, sits at its quadrant, and every live node is reachable.
  pub fn validate_tree(&self) -> bool {
    let mut reachable = 0;
    let mut stack: SmallVec<[NodeHandle; 32]> = SmallVec::new();
    stack.push(self.root);

    while let Some(handle) = stack.pop() {
      let Some(node) = self.arena.get(handle) else {
        return false;
      };
      reachable += 1;

      if node.lod_scale < 1 || node.chunk.is_some_and(|key| key != node.key()) {
        return false;
      }

      let Some(children) = node.children else {
        continue;
      };
      let mins = node.child_mins(self.config.chunk_size);
      for (i, &child) in children.iter().enumerate() {
        let Some(child_node) = self.arena.get(child) else {
          return false;
        };
        if child_node.lod_scale * 2 != node.lod_scale
          || child_node.min != mins[i]
          || child_node.child_index as usize != i
          || child_node.parent != Some(handle)
        {
          return false;
        }
        stack.push(child);
      }
    }

    reachable == self.arena.len()
  }

  pub fn root(&self) -> NodeHandle {
    self.root
  }

  pub fn node(&self, handle: NodeHandle) -> Option<&QuadTreeNode> {
    self.arena.get(handle)
  }

  /// Leaf predicate against the camera of the last update.
  pub fn is_leaf(&self, handle: NodeHandle) -> bool {
    self.arena.get(handle).is_some_and(|node| {
      self
        .config
        .is_leaf(node.min, node.lod_scale, node.has_children(), self.camera)
    })
  }

  /// Lifecycle state against the camera of the last update.
  pub fn node_state(&self, handle: NodeHandle) -> Option<NodeState> {
    let node = self.arena.get(handle)?;
    let children_ready = node
      .children
      .is_some_and(|children| children.iter().all(|&child| self.node_ready(child)));
    Some(NodeState::classify(
      self.is_leaf(handle),
      node.has_children(),
      self.store.is_ready(&node.key()),
      children_ready,
    ))
  }

  pub fn node_count(&self) -> usize {
    self.arena.len()
  }

  /// Handles of all nodes without children.
  pub fn leaf_nodes(&self) -> Vec<NodeHandle> {
    self
      .arena
      .iter()
      .filter(|(_, node)| !node.has_children())
      .map(|(handle, _)| handle)
      .collect()
  }

  pub fn arena(&self) -> &NodeArena {
    &self.arena
  }

  pub fn store(&self) -> &ChunkStore<S> {
    &self.store
  }

  pub fn store_mut(&mut self) -> &mut ChunkStore<S> {
    &mut self.store
  }

  pub fn scheduler(&self) -> &ChunkGenerationScheduler<F> {
    &self.scheduler
  }

  pub fn stats(&self) -> &LoaderStats {
    &self.stats
  }

  pub fn config(&self) -> &LoaderConfig {
    &self.config
  }

  /// Camera position of the last update.
  pub fn camera(&self) -> Vec3 {
    self.camera
  }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;
