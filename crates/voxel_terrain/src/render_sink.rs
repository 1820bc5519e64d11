//! Consumer-side renderable lifecycle.
//!
//! The chunk store never touches a graphics API; it hands finished meshes to a
//! [`RenderSink`] and keeps the returned handle. Engines implement the trait to
//! upload meshes, toggle draw visibility and free GPU resources.

use std::collections::{HashMap, HashSet};

use glam::Vec3;

use crate::types::{ChunkKey, MeshOutput};

/// Receives mesh lifecycle events for resident chunks.
///
/// Every handle returned by `create_renderable` is passed back to
/// `destroy_renderable` exactly once.
pub trait RenderSink {
  type Handle;

  /// Upload a mesh. New renderables start hidden.
  fn create_renderable(&mut self, key: ChunkKey, origin: Vec3, mesh: &MeshOutput) -> Self::Handle;

  fn set_visible(&mut self, handle: &Self::Handle, visible: bool);

  fn destroy_renderable(&mut self, handle: Self::Handle);
}

/// Sink that discards everything. Handles are unit values.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
  type Handle = ();

  fn create_renderable(&mut self, _key: ChunkKey, _origin: Vec3, _mesh: &MeshOutput) {}

  fn set_visible(&mut self, _handle: &(), _visible: bool) {}

  fn destroy_renderable(&mut self, _handle: ()) {}
}

/// Opaque handle issued by [`RecordingSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

/// Sink that tracks live renderables and counts every call.
#[derive(Debug, Default)]
pub struct RecordingSink {
  next_id: u64,
  live: HashSet<RenderHandle>,
  visible: HashSet<RenderHandle>,
  /// Total `create_renderable` calls.
  pub created: usize,
  /// Total `destroy_renderable` calls.
  pub destroyed: usize,
  /// Total `set_visible` calls.
  pub visibility_changes: usize,
  /// Triangles currently uploaded across all live handles.
  pub live_triangles: usize,
  triangles: HashMap<RenderHandle, usize>,
}

impl RecordingSink {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn live_count(&self) -> usize {
    self.live.len()
  }

  pub fn visible_count(&self) -> usize {
    self.visible.len()
  }

  pub fn is_live(&self, handle: &RenderHandle) -> bool {
    self.live.contains(handle)
  }

  pub fn is_visible(&self, handle: &RenderHandle) -> bool {
    self.visible.contains(handle)
  }

  /// Triangles across visible handles.
  pub fn visible_triangles(&self) -> usize {
    self
      .visible
      .iter()
      .filter_map(|handle| self.triangles.get(handle))
      .sum()
  }
}

impl RenderSink for RecordingSink {
  type Handle = RenderHandle;

  fn create_renderable(&mut self, _key: ChunkKey, _origin: Vec3, mesh: &MeshOutput) -> RenderHandle {
    let handle = RenderHandle(self.next_id);
    self.next_id += 1;
    self.created += 1;
    self.live.insert(handle);
    self.triangles.insert(handle, mesh.triangle_count());
    self.live_triangles += mesh.triangle_count();
    handle
  }

  fn set_visible(&mut self, handle: &RenderHandle, visible: bool) {
    debug_assert!(self.live.contains(handle), "visibility change on dead handle");
    self.visibility_changes += 1;
    if visible {
      self.visible.insert(*handle);
    } else {
      self.visible.remove(handle);
    }
  }

  fn destroy_renderable(&mut self, handle: RenderHandle) {
    let was_live = self.live.remove(&handle);
    debug_assert!(was_live, "double destroy of {:?}", handle);
    self.destroyed += 1;
    self.visible.remove(&handle);
    if let Some(triangles) = self.triangles.remove(&handle) {
      self.live_triangles -= triangles;
    }
  }
}

#[cfg(test)]
mod tests {
  use glam::IVec3;

  use super::*;

  #[test]
  fn test_recording_sink_lifecycle() {
    let mut sink = RecordingSink::new();
    let key = ChunkKey::new(IVec3::ZERO, 1);
    let mut mesh = MeshOutput::new();
    mesh.positions.extend([[0.0; 3]; 3]);
    mesh.indices.extend([0, 1, 2]);

    let a = sink.create_renderable(key, Vec3::ZERO, &mesh);
    let b = sink.create_renderable(key, Vec3::ZERO, &mesh);
    assert_ne!(a, b);
    assert_eq!(sink.live_count(), 2);
    assert_eq!(sink.visible_count(), 0);
    assert_eq!(sink.live_triangles, 2);

    sink.set_visible(&a, true);
    assert!(sink.is_visible(&a));
    assert_eq!(sink.visible_triangles(), 1);

    sink.destroy_renderable(a);
    assert!(!sink.is_live(&a));
    assert!(!sink.is_visible(&a));
    assert_eq!(sink.live_count(), 1);
    assert_eq!(sink.created, 2);
    assert_eq!(sink.destroyed, 1);
    assert_eq!(sink.live_triangles, 1);
  }
}
