//! Job body executed on worker threads.
//!
//! Each thread keeps its own extractor so lattice and output buffers are
//! reused across jobs without synchronization.

use std::cell::RefCell;

use web_time::Instant;

use super::request::{ChunkCompletion, ChunkRequest};
use crate::field::ScalarField;
use crate::marching_cubes::MarchingCubes;

thread_local! {
  static EXTRACTOR: RefCell<MarchingCubes> = RefCell::new(MarchingCubes::new());
}

/// Run `f` with this thread's extractor.
#[inline]
pub fn with_extractor<R>(f: impl FnOnce(&mut MarchingCubes) -> R) -> R {
  EXTRACTOR.with(|extractor| f(&mut extractor.borrow_mut()))
}

/// Extract one chunk.
pub(crate) fn run<F: ScalarField + ?Sized>(field: &F, request: ChunkRequest) -> ChunkCompletion {
  #[cfg(feature = "profiling")]
  let _span = tracing::info_span!("scheduler::job", lod_scale = request.key.lod_scale).entered();

  let start = Instant::now();
  let mesh = with_extractor(|extractor| {
    extractor
      .extract(
        field,
        request.origin,
        request.voxel_count,
        request.voxel_size,
        request.interpolate,
      )
      .clone()
  });

  ChunkCompletion {
    key: request.key,
    source: request.source,
    mesh,
    elapsed_us: start.elapsed().as_micros() as u64,
  }
}
