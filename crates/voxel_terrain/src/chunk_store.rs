//! Registry of resident chunk meshes keyed by [`ChunkKey`].
//!
//! The store is the single owner of every renderable handle. A chunk enters as
//! a placeholder when its mesh is requested, becomes ready when the mesh is
//! completed, and leaves through [`ChunkStore::remove`], which is the only path
//! that releases the handle back to the sink.
//!
//! ```text
//!  reserve ──► placeholder ──complete──► ready ──remove──► gone
//!                   │                     │ ▲
//!                   └──────remove─────────┘ └─ replace / activate
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use glam::Vec3;
use thiserror::Error;

use crate::render_sink::RenderSink;
use crate::types::{ChunkKey, MeshOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
  #[error("chunk {0:?} is already resident")]
  DuplicateInstall(ChunkKey),
}

/// What happened to a completed mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompleteOutcome {
  /// The placeholder was filled.
  Installed,
  /// No placeholder existed; the mesh was dropped.
  Orphaned,
}

/// One resident chunk.
#[derive(Debug)]
pub struct LoadedChunk<H> {
  pub key: ChunkKey,
  /// World-space origin of the mesh's local frame.
  pub origin: Vec3,
  /// Renderable handle; `None` while the chunk is a placeholder.
  pub handle: Option<H>,
  pub ready: bool,
  pub visible: bool,
  pub triangle_count: usize,
}

impl<H> LoadedChunk<H> {
  fn placeholder(key: ChunkKey, origin: Vec3) -> Self {
    Self {
      key,
      origin,
      handle: None,
      ready: false,
      visible: false,
      triangle_count: 0,
    }
  }
}

/// Map from chunk key to resident chunk, backed by a [`RenderSink`].
pub struct ChunkStore<S: RenderSink> {
  chunks: HashMap<ChunkKey, LoadedChunk<S::Handle>>,
  sink: S,
}

impl<S: RenderSink> ChunkStore<S> {
  pub fn new(sink: S) -> Self {
    Self {
      chunks: HashMap::new(),
      sink,
    }
  }

  /// Register a placeholder for a chunk whose mesh is being generated.
  pub fn reserve(&mut self, key: ChunkKey, origin: Vec3) -> Result<(), StoreError> {
    match self.chunks.entry(key) {
      Entry::Occupied(_) => Err(StoreError::DuplicateInstall(key)),
      Entry::Vacant(slot) => {
        slot.insert(LoadedChunk::placeholder(key, origin));
        Ok(())
      }
    }
  }

  /// Insert a ready chunk directly, bypassing the placeholder stage.
  pub fn install(&mut self, key: ChunkKey, origin: Vec3, mesh: &MeshOutput) -> Result<(), StoreError> {
    match self.chunks.entry(key) {
      Entry::Occupied(_) => Err(StoreError::DuplicateInstall(key)),
      Entry::Vacant(slot) => {
        let handle = self.sink.create_renderable(key, origin, mesh);
        slot.insert(LoadedChunk {
          key,
          origin,
          handle: Some(handle),
          ready: true,
          visible: false,
          triangle_count: mesh.triangle_count(),
        });
        Ok(())
      }
    }
  }

  /// Fill a placeholder with its finished mesh.
  pub fn complete(&mut self, key: ChunkKey, mesh: &MeshOutput) -> Result<CompleteOutcome, StoreError> {
    let Some(chunk) = self.chunks.get_mut(&key) else {
      return Ok(CompleteOutcome::Orphaned);
    };
    if chunk.ready {
      return Err(StoreError::DuplicateInstall(key));
    }

    let handle = self.sink.create_renderable(key, chunk.origin, mesh);
    chunk.handle = Some(handle);
    chunk.ready = true;
    chunk.triangle_count = mesh.triangle_count();
    Ok(CompleteOutcome::Installed)
  }

  /// Swap the mesh of a ready chunk, keeping its visibility.
  ///
  /// Returns false if the chunk is missing or still a placeholder.
  pub fn replace(&mut self, key: ChunkKey, mesh: &MeshOutput) -> bool {
    let Some(chunk) = self.chunks.get_mut(&key) else {
      return false;
    };
    if !chunk.ready {
      return false;
    }

    let handle = self.sink.create_renderable(key, chunk.origin, mesh);
    if chunk.visible {
      self.sink.set_visible(&handle, true);
    }
    if let Some(old) = chunk.handle.replace(handle) {
      self.sink.destroy_renderable(old);
    }
    chunk.triangle_count = mesh.triangle_count();
    true
  }

  pub fn get(&self, key: &ChunkKey) -> Option<&LoadedChunk<S::Handle>> {
    self.chunks.get(key)
  }

  pub fn contains(&self, key: &ChunkKey) -> bool {
    self.chunks.contains_key(key)
  }

  pub fn is_ready(&self, key: &ChunkKey) -> bool {
    self.chunks.get(key).is_some_and(|chunk| chunk.ready)
  }

  pub fn is_visible(&self, key: &ChunkKey) -> bool {
    self.chunks.get(key).is_some_and(|chunk| chunk.visible)
  }

  /// Drop a chunk and release its renderable. Idempotent.
  pub fn remove(&mut self, key: &ChunkKey) -> bool {
    match self.chunks.remove(key) {
      Some(chunk) => {
        if let Some(handle) = chunk.handle {
          self.sink.destroy_renderable(handle);
        }
        true
      }
      None => false,
    }
  }

  /// Show or hide a ready chunk. Returns true if visibility changed.
  pub fn activate(&mut self, key: &ChunkKey, visible: bool) -> bool {
    let Some(chunk) = self.chunks.get_mut(key) else {
      return false;
    };
    if !chunk.ready || chunk.visible == visible {
      return false;
    }
    let Some(handle) = chunk.handle.as_ref() else {
      return false;
    };

    self.sink.set_visible(handle, visible);
    chunk.visible = visible;
    true
  }

  /// Total resident chunks, placeholders included.
  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }

  pub fn ready_count(&self) -> usize {
    self.chunks.values().filter(|chunk| chunk.ready).count()
  }

  pub fn visible_count(&self) -> usize {
    self.chunks.values().filter(|chunk| chunk.visible).count()
  }

  pub fn visible_triangles(&self) -> usize {
    self
      .chunks
      .values()
      .filter(|chunk| chunk.visible)
      .map(|chunk| chunk.triangle_count)
      .sum()
  }

  pub fn iter(&self) -> impl Iterator<Item = &LoadedChunk<S::Handle>> {
    self.chunks.values()
  }

  pub fn keys(&self) -> impl Iterator<Item = &ChunkKey> {
    self.chunks.keys()
  }

  /// Remove every chunk, releasing all renderables.
  pub fn clear(&mut self) {
    for (_, chunk) in self.chunks.drain() {
      if let Some(handle) = chunk.handle {
        self.sink.destroy_renderable(handle);
      }
    }
  }

  pub fn sink(&self) -> &S {
    &self.sink
  }

  pub fn sink_mut(&mut self) -> &mut S {
    &mut self.sink
  }
}

impl<S: RenderSink> Drop for ChunkStore<S> {
  fn drop(&mut self) {
    self.clear();
  }
}

#[cfg(test)]
#[path = "chunk_store_test.rs"]
mod chunk_store_test;
