//! Render sink that records chunk lifecycles and traces them.
//!
//! Stands in for an engine: nothing is drawn, but every upload, visibility
//! flip and destroy is counted and visible through `RUST_LOG=trace`.

use glam::Vec3;
use tracing::trace;
use voxel_terrain::{ChunkKey, MeshOutput, RecordingSink, RenderHandle, RenderSink};

#[derive(Debug, Default)]
pub struct LoggingSink {
	inner: RecordingSink,
	/// Largest number of simultaneously live renderables.
	pub peak_live: usize,
	/// Triangles uploaded over the whole run.
	pub uploaded_triangles: usize,
}

impl LoggingSink {
	pub fn new() -> Self {
		Self::default()
	}

	#[inline]
	pub fn recording(&self) -> &RecordingSink {
		&self.inner
	}
}

impl RenderSink for LoggingSink {
	type Handle = RenderHandle;

	fn create_renderable(&mut self, key: ChunkKey, origin: Vec3, mesh: &MeshOutput) -> RenderHandle {
		let handle = self.inner.create_renderable(key, origin, mesh);
		self.peak_live = self.peak_live.max(self.inner.live_count());
		self.uploaded_triangles += mesh.triangle_count();
		trace!(
			handle = handle.0,
			lod = key.lod_scale,
			x = key.origin.x,
			z = key.origin.z,
			triangles = mesh.triangle_count(),
			"upload"
		);
		handle
	}

	fn set_visible(&mut self, handle: &RenderHandle, visible: bool) {
		trace!(handle = handle.0, visible, "visibility");
		self.inner.set_visible(handle, visible);
	}

	fn destroy_renderable(&mut self, handle: RenderHandle) {
		trace!(handle = handle.0, "destroy");
		self.inner.destroy_renderable(handle);
	}
}
